// RenderSync: one-way projection of the region store onto the overlay
// renderer and the text-list view
//
// Invoked after every mutation that should be visible. The overlay draw per
// region is: blurred crop duplicate (obscures the original text), an
// eight-direction 1px outline halo, then the fill text on top. The text
// list is fully rebuilt every time, which keeps it correct after arbitrary
// edits.

use crate::capabilities::{OverlayRenderer, TextListView};
use crate::core::types::{Region, RenderHandle};
use crate::services::store::RegionStore;
use crate::utils::image_ops::blur;
use tracing::debug;

/// The 8 compass directions of the legibility halo.
const OUTLINE_OFFSETS: [(i32, i32); 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
];

/// Text is inset from the region corner and wrapped 4px short of the region
/// width so it stays inside the obscured area.
const TEXT_INSET: i32 = 2;

pub struct RenderSync {
    renderer: Box<dyn OverlayRenderer>,
    text_list: Box<dyn TextListView>,
    blur_sigma: f32,
}

impl RenderSync {
    pub fn new(
        renderer: Box<dyn OverlayRenderer>,
        text_list: Box<dyn TextListView>,
        blur_sigma: f32,
    ) -> Self {
        Self {
            renderer,
            text_list,
            blur_sigma,
        }
    }

    /// Remove visuals whose handles were surrendered by a store mutation.
    pub fn remove_handles(&mut self, handles: Vec<RenderHandle>) {
        for handle in handles {
            self.renderer.remove(handle);
        }
    }

    /// Project the full store onto both consumers.
    ///
    /// Idempotent from the consumers' perspective: any handles still
    /// recorded on regions are removed before redrawing, so calling this
    /// twice in a row leaves exactly one set of visuals.
    pub fn sync(&mut self, store: &RegionStore, font_size: u32) {
        let regions = store.get_all();
        debug!("Syncing {} regions at font size {}", regions.len(), font_size);

        for (index, region) in regions.iter().enumerate() {
            for &handle in &region.render_handles {
                self.renderer.remove(handle);
            }
            let handles = self.draw_region(region, font_size);
            store.set_render_handles(index, handles);
        }

        self.sync_text_list(&regions);
    }

    /// Draw one region's visuals, reusing the stored pre-blur crop and
    /// sampled colors. Returns the issued handles in draw order.
    fn draw_region(&mut self, region: &Region, font_size: u32) -> Vec<RenderHandle> {
        let bbox = region.bbox;
        let wrap_width = bbox.width.saturating_sub(2 * TEXT_INSET as u32).max(1);
        let mut handles = Vec::with_capacity(OUTLINE_OFFSETS.len() + 2);

        let blurred = blur(&region.crop_image, self.blur_sigma);
        handles.push(self.renderer.draw_image(bbox.x, bbox.y, &blurred));

        for (dx, dy) in OUTLINE_OFFSETS {
            handles.push(self.renderer.draw_text(
                bbox.x + TEXT_INSET + dx,
                bbox.y + TEXT_INSET + dy,
                &region.translation,
                region.outline_color,
                font_size,
                wrap_width,
            ));
        }

        handles.push(self.renderer.draw_text(
            bbox.x + TEXT_INSET,
            bbox.y + TEXT_INSET,
            &region.translation,
            region.text_color,
            font_size,
            wrap_width,
        ));

        handles
    }

    /// Rebuild both text blocks wholesale, entries separated by a blank
    /// line, in store order.
    pub fn sync_text_list(&mut self, regions: &[Region]) {
        let detected = join_block(regions.iter().map(|r| r.original_text.as_str()));
        let translated = join_block(regions.iter().map(|r| r.translation.as_str()));
        self.text_list.replace(&detected, &translated);
    }

    /// Refresh only the text-list view from the current store state.
    pub fn sync_text_list_from(&mut self, store: &RegionStore) {
        let regions = store.get_all();
        self.sync_text_list(&regions);
    }
}

fn join_block<'a>(entries: impl Iterator<Item = &'a str>) -> String {
    entries.collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BBox, Rgb};
    use image::DynamicImage;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum DrawOp {
        Image {
            x: i32,
            y: i32,
            handle: u64,
        },
        Text {
            x: i32,
            y: i32,
            text: String,
            color: Rgb,
            font_size: u32,
            wrap_width: u32,
            handle: u64,
        },
    }

    #[derive(Default)]
    struct RecorderState {
        next_handle: u64,
        ops: Vec<DrawOp>,
        live: HashSet<u64>,
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<RecorderState>>);

    impl OverlayRenderer for Recorder {
        fn draw_image(&mut self, x: i32, y: i32, _image: &DynamicImage) -> RenderHandle {
            let mut state = self.0.lock();
            state.next_handle += 1;
            let handle = state.next_handle;
            state.live.insert(handle);
            state.ops.push(DrawOp::Image { x, y, handle });
            RenderHandle(handle)
        }

        fn draw_text(
            &mut self,
            x: i32,
            y: i32,
            text: &str,
            color: Rgb,
            font_size: u32,
            wrap_width: u32,
        ) -> RenderHandle {
            let mut state = self.0.lock();
            state.next_handle += 1;
            let handle = state.next_handle;
            state.live.insert(handle);
            state.ops.push(DrawOp::Text {
                x,
                y,
                text: text.to_string(),
                color,
                font_size,
                wrap_width,
                handle,
            });
            RenderHandle(handle)
        }

        fn remove(&mut self, handle: RenderHandle) {
            let mut state = self.0.lock();
            assert!(
                state.live.remove(&handle.0),
                "removed a handle that was not live: {:?}",
                handle
            );
        }
    }

    #[derive(Clone, Default)]
    struct ListRecorder(Arc<Mutex<Vec<(String, String)>>>);

    impl TextListView for ListRecorder {
        fn replace(&mut self, detected: &str, translated: &str) {
            self.0.lock().push((detected.to_string(), translated.to_string()));
        }
    }

    fn region(x: i32, y: i32, width: u32, text: &str, translation: &str) -> Region {
        Region {
            bbox: BBox::new(x, y, width, 20),
            original_text: text.to_string(),
            translation: translation.to_string(),
            text_color: Rgb::new(10, 10, 10),
            outline_color: Rgb::WHITE,
            crop_image: Arc::new(DynamicImage::new_rgb8(width, 20)),
            render_handles: Vec::new(),
        }
    }

    fn render_sync(recorder: &Recorder, list: &ListRecorder) -> RenderSync {
        RenderSync::new(Box::new(recorder.clone()), Box::new(list.clone()), 5.0)
    }

    #[test]
    fn one_region_draws_blur_plus_halo_plus_fill() {
        let recorder = Recorder::default();
        let list = ListRecorder::default();
        let mut sync = render_sync(&recorder, &list);

        let store = RegionStore::new();
        let _ = store.replace_all(vec![region(100, 50, 64, "Hi", "Oi")]);
        sync.sync(&store, 12);

        let state = recorder.0.lock();
        // 1 image + 8 outline copies + 1 fill
        assert_eq!(state.ops.len(), 10);
        assert_eq!(
            state.ops[0],
            DrawOp::Image {
                x: 100,
                y: 50,
                handle: 1
            }
        );

        let outline_positions: Vec<(i32, i32)> = state.ops[1..9]
            .iter()
            .map(|op| match op {
                DrawOp::Text { x, y, color, .. } => {
                    assert_eq!(*color, Rgb::WHITE);
                    (*x, *y)
                }
                other => panic!("expected text op, got {:?}", other),
            })
            .collect();
        let expected: Vec<(i32, i32)> = OUTLINE_OFFSETS
            .iter()
            .map(|(dx, dy)| (102 + dx, 52 + dy))
            .collect();
        assert_eq!(outline_positions, expected);

        match &state.ops[9] {
            DrawOp::Text {
                x,
                y,
                text,
                color,
                font_size,
                wrap_width,
                ..
            } => {
                assert_eq!((*x, *y), (102, 52));
                assert_eq!(text, "Oi");
                assert_eq!(*color, Rgb::new(10, 10, 10));
                assert_eq!(*font_size, 12);
                assert_eq!(*wrap_width, 60);
            }
            other => panic!("expected fill text op, got {:?}", other),
        }

        drop(state);
        assert_eq!(store.get_all()[0].render_handles.len(), 10);
    }

    #[test]
    fn resync_replaces_visuals_without_leaking_handles() {
        let recorder = Recorder::default();
        let list = ListRecorder::default();
        let mut sync = render_sync(&recorder, &list);

        let store = RegionStore::new();
        let _ = store.replace_all(vec![region(0, 0, 40, "a", "A"), region(10, 10, 40, "b", "B")]);
        sync.sync(&store, 12);
        assert_eq!(recorder.0.lock().live.len(), 20);

        // Font size change path: same regions, new draw
        sync.sync(&store, 18);
        assert_eq!(recorder.0.lock().live.len(), 20);
    }

    #[test]
    fn replace_all_between_syncs_leaves_zero_stale_handles() {
        let recorder = Recorder::default();
        let list = ListRecorder::default();
        let mut sync = render_sync(&recorder, &list);

        let store = RegionStore::new();
        let _ = store.replace_all(vec![region(0, 0, 40, "first", "1st")]);
        sync.sync(&store, 12);

        let old = store.replace_all(vec![region(5, 5, 40, "second", "2nd")]);
        sync.remove_handles(old);
        sync.sync(&store, 12);

        // Only the second scan's visuals are live
        assert_eq!(recorder.0.lock().live.len(), 10);
    }

    #[test]
    fn empty_store_sync_clears_the_text_list() {
        let recorder = Recorder::default();
        let list = ListRecorder::default();
        let mut sync = render_sync(&recorder, &list);

        let store = RegionStore::new();
        sync.sync(&store, 12);

        let calls = list.0.lock();
        assert_eq!(calls.as_slice(), &[(String::new(), String::new())]);
    }

    #[test]
    fn text_list_blocks_are_ordered_and_blank_line_separated() {
        let recorder = Recorder::default();
        let list = ListRecorder::default();
        let mut sync = render_sync(&recorder, &list);

        let store = RegionStore::new();
        let _ = store.replace_all(vec![
            region(0, 0, 40, "Hello", "Olá"),
            region(0, 30, 40, "World", "Mundo"),
        ]);
        sync.sync(&store, 12);

        let calls = list.0.lock();
        let (detected, translated) = calls.last().unwrap();
        assert_eq!(detected, "Hello\n\nWorld");
        assert_eq!(translated, "Olá\n\nMundo");
    }

    #[test]
    fn narrow_region_wrap_width_clamps_to_one() {
        let recorder = Recorder::default();
        let list = ListRecorder::default();
        let mut sync = render_sync(&recorder, &list);

        let store = RegionStore::new();
        let _ = store.replace_all(vec![region(0, 0, 3, "x", "y")]);
        sync.sync(&store, 12);

        let state = recorder.0.lock();
        match &state.ops[9] {
            DrawOp::Text { wrap_width, .. } => assert_eq!(*wrap_width, 1),
            other => panic!("expected text op, got {:?}", other),
        }
    }
}
