//! Dropload - Frontend Rust/Leptos Application
//!
//! A WebAssembly widget that uploads every file dropped on it to the
//! server, showing per-file progress, a processing phase, and the outcome.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ files ┌───────────────────┐ transitions ┌──────────────┐
//! │   DropZone   │──────▶│ UploadCoordinator │────────────▶│ RowPresenter │
//! │ (drag count) │       │ (task lifecycle)  │             │ (rows+ticker)│
//! └──────────────┘       └─────────┬─────────┘             └──────────────┘
//!                                  │ POST /upload
//!                                  ▼
//!                            XhrTransport
//! ```
//!
//! # Modules
//!
//! - [`config`] - Endpoint, timings, element ids
//! - [`types`] - Errors and row display types
//! - [`state`] - Drag reference count and upload state machine
//! - [`services`] - Coordinator, transport, timers
//! - [`components`] - Leptos components and the row presenter

use std::rc::Rc;

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod state;
pub mod services;
pub mod components;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Errors
    TransportError, UploadError, TransitionError,
    // Rows
    ProgressSlot, DetailSlot, DetailStatus,
};

// State
pub use state::{
    DropZoneController, HighlightChange,
    TransferEvent, UploadState, UploadTask,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Dropload"/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=UploadPage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn UploadPage() -> impl IntoView {
    let rows = create_rw_signal(Vec::<RowHandle>::new());

    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    let presenter = RowPresenter::new(rows, IntervalScheduler, clock.clone());
    let coordinator = UploadCoordinator::new(XhrTransport::new(UPLOAD_URL), presenter, clock);

    let on_file = move |file: web_sys::File| coordinator.submit(file);

    view! {
        <div class="container">
            <h1>"Upload files"</h1>
            <DropZone on_file=on_file/>
            <FileList rows=rows/>
        </div>
    }
}
