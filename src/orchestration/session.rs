// Session: explicit application state plus command dispatch
//
// The original app wired hotkeys and buttons straight onto ambient mutable
// state. Here the live region set, font size, HUD visibility, and the
// area-selection state machine live on one session object, and every user
// gesture arrives as an Action dispatched from the host event loop.
//
// Threading model: dispatch/pump run on the UI thread, which owns the
// renderer, text list, and status indicator. Each scan runs on its own
// worker thread and hands a completed Region sequence back over an mpsc
// channel; the worker never touches UI state.

use crate::capabilities::{
    OverlayRenderer, ScreenCapture, StatusIndicator, TextDetector, TextListView, Translator,
};
use crate::core::config::Config;
use crate::core::errors::ScanError;
use crate::core::types::{Action, BBox, ScanStatus, UiEvent};
use crate::orchestration::pipeline::RegionPipeline;
use crate::services::rendering::RenderSync;
use crate::services::store::RegionStore;
use crate::services::translation::TranslationBatcher;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Sends `ScanFinished` when dropped, so the idle indicator is restored on
/// every worker exit path, including panics.
struct IdleGuard {
    tx: Sender<UiEvent>,
}

impl Drop for IdleGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(UiEvent::ScanFinished);
    }
}

pub struct Session {
    config: Arc<Config>,
    store: Arc<RegionStore>,
    pipeline: Arc<RegionPipeline>,
    capture: Arc<dyn ScreenCapture>,
    batcher: TranslationBatcher,
    render: RenderSync,
    status: Box<dyn StatusIndicator>,
    events_tx: Sender<UiEvent>,
    events_rx: Receiver<UiEvent>,
    font_size: u32,
    hud_visible: bool,
    selecting: bool,
    selection: Option<BBox>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<Config>,
        capture: Arc<dyn ScreenCapture>,
        detector: Arc<dyn TextDetector>,
        translator: Arc<dyn Translator>,
        renderer: Box<dyn OverlayRenderer>,
        text_list: Box<dyn TextListView>,
        status: Box<dyn StatusIndicator>,
    ) -> Self {
        let pipeline = Arc::new(RegionPipeline::new(
            config.clone(),
            detector,
            translator.clone(),
        ));
        let render = RenderSync::new(renderer, text_list, config.blur_sigma());
        let batcher = TranslationBatcher::new(translator, &config.translation);
        let (events_tx, events_rx) = channel();
        let font_size = config.default_font_size();

        Self {
            config,
            store: Arc::new(RegionStore::new()),
            pipeline,
            capture,
            batcher,
            render,
            status,
            events_tx,
            events_rx,
            font_size,
            hud_visible: true,
            selecting: false,
            selection: None,
        }
    }

    /// Handle one user command. UI thread only.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Scan => self.start_scan(None),
            Action::BeginAreaSelection => self.begin_area_selection(),
            Action::UpdateSelection(bbox) => {
                if self.selecting {
                    self.selection = Some(bbox);
                }
            }
            Action::ConfirmSelection => self.confirm_selection(),
            Action::ClearOverlay => self.clear_overlay(),
            Action::ToggleHud => {
                self.hud_visible = !self.hud_visible;
                debug!("HUD visible: {}", self.hud_visible);
            }
            Action::ApplyEdits { originals } => self.apply_edits(&originals),
            Action::ReapplyOverlay => self.render.sync(&self.store, self.font_size),
            Action::SetFontSize(input) => self.set_font_size(&input),
        }
    }

    /// Drain pending worker events without blocking. Call from the host
    /// event loop tick.
    pub fn pump_events(&mut self) {
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Block until the in-flight scan finishes and its events are applied.
    ///
    /// Intended for hosts (and tests) that trigger a scan and want the
    /// result before the next frame; interactive hosts should prefer
    /// `pump_events`.
    pub fn pump_events_until_idle(&mut self) {
        while let Ok(event) = self.events_rx.recv() {
            let finished = matches!(event, UiEvent::ScanFinished);
            self.apply_event(event);
            if finished {
                break;
            }
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ScanCompleted(regions) => {
                // Teardown of the old sequence is part of the same mutation
                // as installing the new one; an empty result still clears
                // all prior visuals.
                let old = self.store.replace_all(regions);
                self.render.remove_handles(old);
                self.render.sync(&self.store, self.font_size);
            }
            UiEvent::ScanFailed(reason) => {
                // Prior overlay stays up; see DESIGN.md on the
                // validate-first policy.
                warn!("Scan aborted: {}", reason);
            }
            UiEvent::ScanFinished => self.status.set_status(ScanStatus::Idle),
        }
    }

    /// Spawn a scan worker for the given capture area (None = full screen).
    fn start_scan(&mut self, area: Option<BBox>) {
        self.hud_visible = true;
        self.status.set_status(ScanStatus::Scanning);

        let tx = self.events_tx.clone();
        let capture = Arc::clone(&self.capture);
        let pipeline = Arc::clone(&self.pipeline);

        thread::spawn(move || {
            let _idle = IdleGuard { tx: tx.clone() };

            let image = match capture.capture(area) {
                Ok(image) => image,
                Err(e) => {
                    let e = ScanError::CaptureFailed(e);
                    error!("{:#}", e);
                    let _ = tx.send(UiEvent::ScanFailed(e.to_string()));
                    return;
                }
            };

            let origin = area.map(|b| (b.x, b.y)).unwrap_or((0, 0));
            match pipeline.scan(&image, origin) {
                Ok(regions) => {
                    let _ = tx.send(UiEvent::ScanCompleted(regions));
                }
                Err(e @ ScanError::DegenerateCapture { .. }) => {
                    warn!("{}", e);
                    let _ = tx.send(UiEvent::ScanFailed(e.to_string()));
                }
                Err(e) => {
                    error!("Scan pass failed: {:#}", e);
                    let _ = tx.send(UiEvent::ScanFailed(e.to_string()));
                }
            }
        });
    }

    fn begin_area_selection(&mut self) {
        if self.selecting {
            return;
        }
        self.selecting = true;
        self.selection = None;
        self.hud_visible = true;
        self.status.set_status(ScanStatus::Selecting);
    }

    /// Confirm the pending selection. With no rectangle the capture is
    /// abandoned; with a rectangle under the minimum extent the scan is
    /// rejected and the prior overlay kept.
    fn confirm_selection(&mut self) {
        if !self.selecting {
            return;
        }
        self.selecting = false;
        self.status.set_status(ScanStatus::Idle);

        let Some(bbox) = self.selection.take() else {
            debug!("Area selection abandoned with no rectangle");
            return;
        };

        let min_extent = self.config.min_capture_extent();
        if bbox.width < min_extent || bbox.height < min_extent {
            warn!(
                "Selection {}x{} below minimum extent of {}px, not scanning",
                bbox.width, bbox.height, min_extent
            );
            return;
        }

        self.start_scan(Some(bbox));
    }

    fn clear_overlay(&mut self) {
        self.hud_visible = true;
        let old = self.store.clear();
        self.render.remove_handles(old);
        self.render.sync_text_list_from(&self.store);
        info!("Overlay cleared");
    }

    /// Bulk retranslation from edited source lines, matched to regions by
    /// position. Blank lines and lines past the current region count are
    /// skipped; a failed retranslation keeps the edited source for that
    /// line. Only the text list is refreshed; the overlay redraws on
    /// ReapplyOverlay.
    fn apply_edits(&mut self, originals: &[String]) {
        let region_count = self.store.len();
        for (index, line) in originals.iter().enumerate() {
            let line = line.trim();
            if line.is_empty() || index >= region_count {
                continue;
            }
            let translation = self.batcher.translate_or_fallback(line);
            self.store.update_translation(index, &translation);
        }
        self.render.sync_text_list_from(&self.store);
    }

    /// Parse and apply a font-size input. Zero, negative, non-numeric, or
    /// out-of-range input is rejected and the prior size stays in effect;
    /// no partial re-render happens.
    fn set_font_size(&mut self, input: &str) {
        match input.trim().parse::<u32>() {
            Ok(size) if size > 0 => {
                self.font_size = size;
                self.render.sync(&self.store, self.font_size);
            }
            Ok(_) => warn!("Rejected zero font size"),
            Err(_) => warn!("Rejected font size input: {:?}", input),
        }
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn hud_visible(&self) -> bool {
        self.hud_visible
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }
}
