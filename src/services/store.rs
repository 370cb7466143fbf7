// RegionStore: single source of truth for the current region set
//
// The ordered sequence backs both the overlay and the text-list view;
// positional correspondence between the two is what makes bulk edits by
// line index work. Every public method is one critical section, so
// concurrent triggers can never interleave partial updates.

use crate::core::types::{Region, RenderHandle};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Default)]
pub struct RegionStore {
    regions: Mutex<Vec<Region>>,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically swap in a new region sequence.
    ///
    /// Returns the render handles of the replaced regions; the caller must
    /// hand them to RenderSync for removal as part of the same mutation, so
    /// no stale visuals survive the swap.
    #[must_use = "returned handles must be torn down"]
    pub fn replace_all(&self, regions: Vec<Region>) -> Vec<RenderHandle> {
        let mut guard = self.regions.lock();
        let old = std::mem::replace(&mut *guard, regions);
        debug!("Store replaced: {} → {} regions", old.len(), guard.len());
        drain_handles(old)
    }

    /// Empty the sequence. Same teardown contract as `replace_all`.
    #[must_use = "returned handles must be torn down"]
    pub fn clear(&self) -> Vec<RenderHandle> {
        self.replace_all(Vec::new())
    }

    /// Replace the translation at `index`.
    ///
    /// Out-of-range indexes and blank texts are silently ignored: bulk user
    /// edits may carry more or fewer lines than there are regions. Returns
    /// whether anything changed.
    pub fn update_translation(&self, index: usize, new_text: &str) -> bool {
        if new_text.trim().is_empty() {
            return false;
        }
        let mut guard = self.regions.lock();
        match guard.get_mut(index) {
            Some(region) => {
                region.translation = new_text.to_string();
                true
            }
            None => false,
        }
    }

    /// Read-only snapshot in store order. Crop images are shared, so the
    /// clone is cheap.
    pub fn get_all(&self) -> Vec<Region> {
        self.regions.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.regions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.lock().is_empty()
    }

    /// Record the visuals RenderSync drew for the region at `index`.
    pub fn set_render_handles(&self, index: usize, handles: Vec<RenderHandle>) {
        if let Some(region) = self.regions.lock().get_mut(index) {
            region.render_handles = handles;
        }
    }
}

fn drain_handles(regions: Vec<Region>) -> Vec<RenderHandle> {
    regions
        .into_iter()
        .flat_map(|region| region.render_handles)
        .collect()
}
