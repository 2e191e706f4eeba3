//! Application configuration.
//!
//! Centralized constants for the drop zone widget. There is no runtime
//! configuration surface: everything here is fixed at compile time.

/// Upload endpoint.
///
/// Relative to the page, so a widget served from `/` posts to `/upload`.
pub const UPLOAD_URL: &str = "upload";

/// Multipart field carrying the file content and its name.
pub const UPLOAD_FIELD: &str = "file";

/// HTTP status treated as success. Every other status is a failure.
pub const SUCCESS_STATUS: u16 = 200;

/// Period of the elapsed-time ticker shown while the server processes a file.
pub const PROCESSING_TICK_MS: u32 = 100;

/// Element id of the drop region.
pub const DROP_ZONE_ID: &str = "dropZone";

/// Element id of the hidden file picker.
pub const FILE_INPUT_ID: &str = "fileInput";

/// Element id of the list of rows.
pub const FILE_LIST_ID: &str = "files";

/// Class applied to the drop region while a drag hovers over it.
pub const HIGHLIGHT_CLASS: &str = "highlight";
