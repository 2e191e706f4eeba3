//! UI Components for the drop upload widget.
//!
//! # Feature Components
//! - [`DropZone`] - Drop region with drag & drop and file picker
//! - [`FileList`] - One row per upload with progress and status
//!
//! # Presenter
//! - [`RowPresenter`] - Renders upload transitions into row signals

mod dropzone;
mod rows;

pub use dropzone::*;
pub use rows::*;
