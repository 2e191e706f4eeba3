//! Pure state for the widget, free of any browser API.
//!
//! - [`drag`] - reference-counted drag highlight for the drop region
//! - [`task`] - per-file upload lifecycle state machine

pub mod drag;
pub mod task;

pub use drag::*;
pub use task::*;
