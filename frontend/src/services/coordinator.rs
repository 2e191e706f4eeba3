//! Upload coordination.
//!
//! [`UploadCoordinator::submit`] creates one [`UploadTask`] and one row per
//! file, starts its transfer, and feeds every transport event through the
//! task's state machine before rendering the result. Tasks never share
//! state, so transfers run side by side with no cap and no queue.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use super::timer::Clock;
use super::transport::{EventSink, Transport, UploadSource};
use crate::state::{Effect, TransferEvent, UploadTask};

/// Renders task transitions into a visual row.
pub trait Presenter {
    /// Opaque handle to one row. Never reassigned to another task.
    type Row;

    /// Appends a row after all previous ones.
    fn create_row(&self, file_name: &str) -> Self::Row;

    fn on_progress(&self, row: &Self::Row, sent: u64, total: u64);

    /// Called once per task, when every byte has been handed to the transport.
    fn on_processing_start(&self, row: &Self::Row, started_at: DateTime<Utc>);

    /// Called once per task. Must stop any elapsed ticker the row runs.
    fn on_terminal(&self, row: &Self::Row, succeeded: bool, text: &str);
}

struct Inner<T: Transport, P: Presenter> {
    transport: T,
    presenter: P,
    clock: Rc<dyn Clock>,
    tasks: RefCell<Vec<Rc<RefCell<UploadTask>>>>,
}

/// Owns every upload started by the widget.
pub struct UploadCoordinator<T: Transport, P: Presenter> {
    inner: Rc<Inner<T, P>>,
}

impl<T: Transport, P: Presenter> Clone for UploadCoordinator<T, P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, P> UploadCoordinator<T, P>
where
    T: Transport + 'static,
    P: Presenter + 'static,
    P::Row: 'static,
{
    pub fn new(transport: T, presenter: P, clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(Inner {
                transport,
                presenter,
                clock,
                tasks: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Starts uploading `file`. Every outcome is observed through its row.
    pub fn submit(&self, file: T::File) {
        let id = self.inner.tasks.borrow().len();
        let task = UploadTask::new(id, file.name(), file.size());
        log::info!("📤 Upload #{} accepted: {} ({} bytes)", id, task.file_name(), task.file_size());

        let row = Rc::new(self.inner.presenter.create_row(task.file_name()));
        let task = Rc::new(RefCell::new(task));
        self.inner.tasks.borrow_mut().push(task.clone());

        self.inner.dispatch(&task, &row, TransferEvent::Started);

        let on_event: EventSink = {
            let inner = self.inner.clone();
            let task = task.clone();
            let row = row.clone();
            Rc::new(move |event: TransferEvent| inner.dispatch(&task, &row, event))
        };
        if let Err(err) = self.inner.transport.send(file, on_event) {
            self.inner.dispatch(&task, &row, TransferEvent::Failed(err));
        }
    }

    /// Snapshots of every task, in submission order.
    pub fn tasks(&self) -> Vec<UploadTask> {
        self.inner
            .tasks
            .borrow()
            .iter()
            .map(|task| task.borrow().clone())
            .collect()
    }
}

impl<T: Transport, P: Presenter> Inner<T, P> {
    fn dispatch(&self, task: &RefCell<UploadTask>, row: &P::Row, event: TransferEvent) {
        let now = self.clock.now();
        let (id, effects) = {
            let mut task = task.borrow_mut();
            match task.apply(event, now) {
                Ok(effects) => (task.id(), effects),
                Err(err) => {
                    log::warn!(
                        "Upload #{} ({}) ignored transfer event: {}",
                        task.id(),
                        task.state().name(),
                        err
                    );
                    return;
                }
            }
        };

        for effect in effects {
            match effect {
                Effect::Progress { sent, total } => {
                    log::debug!("Upload #{}: {}/{} bytes", id, sent, total);
                    self.presenter.on_progress(row, sent, total);
                }
                Effect::ProcessingStarted { started_at } => {
                    log::info!("⏳ Upload #{} sent, waiting for the server", id);
                    self.presenter.on_processing_start(row, started_at);
                }
                Effect::Finished(Ok(body)) => {
                    log::info!("✅ Upload #{} succeeded", id);
                    self.presenter.on_terminal(row, true, &body);
                }
                Effect::Finished(Err(err)) => {
                    log::warn!("❌ Upload #{} failed: {:?}", id, err);
                    self.presenter.on_terminal(row, false, &err.to_string());
                }
            }
        }
    }
}
