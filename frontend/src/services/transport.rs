//! Network transfer of one file to the upload endpoint.
//!
//! `fetch` (and so `gloo-net`) cannot observe upload progress, so the browser
//! transport drives an `XMLHttpRequest` directly and turns its events into
//! [`TransferEvent`]s.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, File, FormData, ProgressEvent, XmlHttpRequest};

use crate::config::UPLOAD_FIELD;
use crate::state::TransferEvent;
use crate::types::TransportError;

/// Receives every event of one transfer, in transport order.
pub type EventSink = Rc<dyn Fn(TransferEvent)>;

/// A file as the coordinator sees it.
pub trait UploadSource {
    fn name(&self) -> String;
    fn size(&self) -> u64;
}

impl UploadSource for File {
    fn name(&self) -> String {
        File::name(self)
    }

    fn size(&self) -> u64 {
        Blob::size(self) as u64
    }
}

/// Starts one independent transfer per call.
pub trait Transport {
    type File: UploadSource;

    /// Begins sending `file`. Completion is reported through `on_event`;
    /// an `Err` means the transfer never started and no event will follow.
    fn send(&self, file: Self::File, on_event: EventSink) -> Result<(), TransportError>;
}

/// `POST` of a single-field multipart form through `XMLHttpRequest`.
#[derive(Clone, Debug)]
pub struct XhrTransport {
    url: String,
}

impl XhrTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

fn setup_error(what: &str, err: JsValue) -> TransportError {
    TransportError::Setup(format!("{}: {:?}", what, err))
}

/// Attaches `handler` as an event listener property. The closure is leaked,
/// it has to live as long as the request and nothing owns the request.
fn leak_handler(
    handler: impl FnMut(ProgressEvent) + 'static,
    attach: impl FnOnce(Option<&js_sys::Function>),
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(ProgressEvent)>);
    attach(Some(closure.as_ref().unchecked_ref()));
    closure.forget();
}

impl Transport for XhrTransport {
    type File = File;

    fn send(&self, file: File, on_event: EventSink) -> Result<(), TransportError> {
        let form = FormData::new().map_err(|e| setup_error("Failed to create FormData", e))?;
        form.append_with_blob_and_filename(UPLOAD_FIELD, &file, &file.name())
            .map_err(|e| setup_error("Failed to append file", e))?;

        let xhr = XmlHttpRequest::new().map_err(|e| setup_error("Failed to create request", e))?;
        xhr.open_with_async("POST", &self.url, true)
            .map_err(|e| setup_error("Failed to open request", e))?;
        let upload = xhr
            .upload()
            .map_err(|e| setup_error("Upload progress unavailable", e))?;

        let sink = on_event.clone();
        leak_handler(
            move |ev: ProgressEvent| {
                if ev.length_computable() {
                    sink(TransferEvent::Progress {
                        loaded: ev.loaded() as u64,
                        total: ev.total() as u64,
                    });
                }
            },
            |f| upload.set_onprogress(f),
        );

        // load, error, abort and timeout are mutually exclusive: exactly one fires.
        let sink = on_event.clone();
        let request = xhr.clone();
        leak_handler(
            move |_: ProgressEvent| {
                let status = request.status().unwrap_or(0);
                let body = request.response_text().ok().flatten().unwrap_or_default();
                sink(TransferEvent::Completed { status, body });
            },
            |f| xhr.set_onload(f),
        );

        let sink = on_event.clone();
        leak_handler(
            move |_: ProgressEvent| sink(TransferEvent::Failed(TransportError::Network)),
            |f| xhr.set_onerror(f),
        );

        let sink = on_event.clone();
        leak_handler(
            move |_: ProgressEvent| sink(TransferEvent::Failed(TransportError::Aborted)),
            |f| xhr.set_onabort(f),
        );

        let sink = on_event;
        leak_handler(
            move |_: ProgressEvent| sink(TransferEvent::Failed(TransportError::TimedOut)),
            |f| xhr.set_ontimeout(f),
        );

        xhr.send_with_opt_form_data(Some(&form))
            .map_err(|e| setup_error("Failed to send request", e))?;

        log::debug!("POST {} <- {} ({} bytes)", self.url, file.name(), Blob::size(&file));
        Ok(())
    }
}
