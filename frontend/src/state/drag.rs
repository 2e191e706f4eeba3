//! Drag highlight reference counting.
//!
//! Browsers fire `dragenter`/`dragleave` once per element boundary, children
//! included, so the region sees `enter(region) enter(child) leave(region)`
//! while the pointer is still inside. Counting unresolved enters and only
//! toggling the highlight at the 0 <-> 1 boundary keeps it stable.

/// Number of unresolved `dragenter` events over the region and its descendants.
///
/// Only [`DropZoneController`] touches it.
#[derive(Debug, Default)]
struct DragState {
    depth: u32,
}

impl DragState {
    fn read(&self) -> u32 {
        self.depth
    }

    fn increment(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    fn decrement(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn reset(&mut self) {
        self.depth = 0;
    }
}

/// Visible effect of a drag event on the region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightChange {
    /// Counter went 0 -> 1.
    Apply,
    /// Counter reached 0 from above.
    Remove,
    Unchanged,
}

/// Reconciles bubbling drag events into a single highlighted flag.
#[derive(Debug, Default)]
pub struct DropZoneController {
    drag: DragState,
}

impl DropZoneController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> u32 {
        self.drag.read()
    }

    pub fn is_highlighted(&self) -> bool {
        self.drag.read() > 0
    }

    pub fn drag_enter(&mut self) -> HighlightChange {
        self.drag.increment();
        if self.drag.read() == 1 {
            HighlightChange::Apply
        } else {
            HighlightChange::Unchanged
        }
    }

    /// A stray leave with nothing entered leaves the counter at 0.
    pub fn drag_leave(&mut self) -> HighlightChange {
        let before = self.drag.read();
        self.drag.decrement();
        if before == 1 {
            HighlightChange::Remove
        } else {
            HighlightChange::Unchanged
        }
    }

    /// Drops are not reliably followed by a matching `dragleave`, so the
    /// counter is forced back to 0 whatever its value.
    pub fn drop_files(&mut self) -> HighlightChange {
        let was_highlighted = self.is_highlighted();
        self.drag.reset();
        if was_highlighted {
            HighlightChange::Remove
        } else {
            HighlightChange::Unchanged
        }
    }
}
