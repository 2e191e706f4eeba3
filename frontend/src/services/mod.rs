//! Upload services.
//!
//! # Services
//!
//! - [`coordinator`] - per-file lifecycle, one independent transfer per file
//! - [`transport`] - multipart `POST` with upload progress (`XMLHttpRequest`)
//! - [`timer`] - clock, repeating timers, and the processing elapsed ticker

pub mod coordinator;
pub mod timer;
pub mod transport;

pub use coordinator::*;
pub use timer::*;
pub use transport::*;
