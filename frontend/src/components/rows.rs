//! One row per upload: file name, progress bar, and a detail slot.
//!
//! [`RowPresenter`] is the [`Presenter`] the coordinator drives. Each row is a
//! [`RowHandle`] of signals; [`FileList`] renders them in creation order.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use leptos::*;

use crate::config::{FILE_LIST_ID, PROCESSING_TICK_MS};
use crate::services::{Clock, ElapsedTimer, Presenter, Scheduler};
use crate::types::{DetailSlot, DetailStatus, ProgressSlot};

/// Named handles to the parts of one row.
#[derive(Clone)]
pub struct RowHandle {
    pub id: usize,
    pub file_name: String,
    pub progress: RwSignal<ProgressSlot>,
    pub detail: RwSignal<DetailSlot>,
    timer: Rc<RefCell<ElapsedTimer>>,
}

impl RowHandle {
    /// Whether the processing ticker of this row is running.
    pub fn is_ticking(&self) -> bool {
        self.timer.borrow().is_running()
    }
}

fn processing_label(elapsed_secs: Option<i64>) -> String {
    match elapsed_secs {
        None => "Processing…".to_string(),
        Some(secs) => format!("Processing… {}s", secs),
    }
}

/// Appends rows to a signal-backed list and keeps them in sync with their tasks.
pub struct RowPresenter<S: Scheduler> {
    rows: RwSignal<Vec<RowHandle>>,
    scheduler: S,
    clock: Rc<dyn Clock>,
}

impl<S: Scheduler> RowPresenter<S> {
    pub fn new(rows: RwSignal<Vec<RowHandle>>, scheduler: S, clock: Rc<dyn Clock>) -> Self {
        Self {
            rows,
            scheduler,
            clock,
        }
    }
}

impl<S: Scheduler> Presenter for RowPresenter<S> {
    type Row = RowHandle;

    fn create_row(&self, file_name: &str) -> RowHandle {
        let row = RowHandle {
            id: self.rows.with_untracked(|rows| rows.len()),
            file_name: file_name.to_string(),
            progress: create_rw_signal(ProgressSlot::default()),
            detail: create_rw_signal(DetailSlot::default()),
            timer: Rc::new(RefCell::new(ElapsedTimer::new())),
        };
        self.rows.update(|rows| rows.push(row.clone()));
        row
    }

    fn on_progress(&self, row: &RowHandle, sent: u64, total: u64) {
        row.progress.set(ProgressSlot {
            value: Some(sent),
            max: Some(total),
        });
    }

    fn on_processing_start(&self, row: &RowHandle, started_at: DateTime<Utc>) {
        row.progress.update(ProgressSlot::saturate);
        row.detail.set(DetailSlot {
            status: DetailStatus::Processing,
            text: processing_label(None),
        });

        let detail = row.detail;
        row.timer.borrow_mut().start(
            &self.scheduler,
            PROCESSING_TICK_MS,
            self.clock.clone(),
            started_at,
            move |secs| detail.update(|d| d.text = processing_label(Some(secs))),
        );
    }

    fn on_terminal(&self, row: &RowHandle, succeeded: bool, text: &str) {
        row.timer.borrow_mut().stop();
        row.progress.update(ProgressSlot::saturate);
        row.detail.set(DetailSlot {
            status: if succeeded {
                DetailStatus::Success
            } else {
                DetailStatus::Failure
            },
            text: text.to_string(),
        });
    }
}

/// The list of rows, append-only.
#[component]
pub fn FileList(rows: RwSignal<Vec<RowHandle>>) -> impl IntoView {
    view! {
        <ul id=FILE_LIST_ID class="file-list">
            <For
                each=move || rows.get()
                key=|row| row.id
                children=move |row| view! { <FileRow row=row/> }
            />
        </ul>
    }
}

#[component]
fn FileRow(row: RowHandle) -> impl IntoView {
    let progress = row.progress;
    let detail = row.detail;

    view! {
        <li class="file-row">
            <span class="file-name">{row.file_name}</span>
            <br/>
            <progress
                value=move || progress.get().value.map(|v| v.to_string())
                max=move || progress.get().max.map(|m| m.to_string())
            ></progress>
            <span class=move || detail.get().status.css_class()>
                {move || detail.get().text}
            </span>
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::UploadCoordinator;
    use crate::state::TransferEvent;
    use crate::testing::{FakeFile, FakeTransport, ManualClock, ManualScheduler};
    use crate::types::TransportError;

    #[test]
    fn processing_ticker_runs_until_terminal() {
        let runtime = create_runtime();
        let clock = ManualClock::new();
        let scheduler = ManualScheduler::new();
        let rows = create_rw_signal(Vec::new());
        let presenter = RowPresenter::new(rows, scheduler.clone(), clock.shared());

        let row = presenter.create_row("a.txt");
        presenter.on_progress(&row, 4, 10);
        assert_eq!(
            row.progress.get_untracked(),
            ProgressSlot {
                value: Some(4),
                max: Some(10)
            }
        );

        presenter.on_processing_start(&row, clock.now());
        assert!(row.is_ticking());
        assert!(row.progress.get_untracked().is_saturated());
        assert_eq!(row.detail.get_untracked().status, DetailStatus::Processing);
        assert_eq!(row.detail.get_untracked().text, "Processing…");

        clock.advance_ms(2_100);
        scheduler.tick_all();
        assert_eq!(row.detail.get_untracked().text, "Processing… 2s");

        presenter.on_terminal(&row, true, "ok");
        assert!(!row.is_ticking());
        assert_eq!(scheduler.active(), 0);
        assert_eq!(scheduler.cancelled(), 1);

        clock.advance_ms(5_000);
        scheduler.tick_all();
        let detail = row.detail.get_untracked();
        assert_eq!(detail.status, DetailStatus::Success);
        assert_eq!(detail.text, "ok");

        runtime.dispose();
    }

    #[test]
    fn terminal_without_processing_is_safe() {
        let runtime = create_runtime();
        let clock = ManualClock::new();
        let scheduler = ManualScheduler::new();
        let rows = create_rw_signal(Vec::new());
        let presenter = RowPresenter::new(rows, scheduler.clone(), clock.shared());

        let row = presenter.create_row("a.txt");
        presenter.on_terminal(&row, false, "Upload failed: network error");

        assert_eq!(scheduler.cancelled(), 0);
        assert!(row.progress.get_untracked().is_saturated());
        assert_eq!(row.detail.get_untracked().status, DetailStatus::Failure);

        runtime.dispose();
    }

    #[test]
    fn rows_are_appended_in_order() {
        let runtime = create_runtime();
        let clock = ManualClock::new();
        let rows = create_rw_signal(Vec::new());
        let presenter = RowPresenter::new(rows, ManualScheduler::new(), clock.shared());

        for name in ["a.txt", "b.txt", "c.txt"] {
            presenter.create_row(name);
        }
        let listed: Vec<(usize, String)> = rows.with_untracked(|rows| {
            rows.iter().map(|r| (r.id, r.file_name.clone())).collect()
        });
        assert_eq!(
            listed,
            vec![
                (0, "a.txt".to_string()),
                (1, "b.txt".to_string()),
                (2, "c.txt".to_string()),
            ]
        );

        runtime.dispose();
    }

    #[test]
    fn two_file_drop_ends_with_one_success_and_one_failure() {
        let runtime = create_runtime();
        let clock = ManualClock::new();
        let scheduler = ManualScheduler::new();
        let transport = FakeTransport::new();
        let rows = create_rw_signal(Vec::new());
        let presenter = RowPresenter::new(rows, scheduler.clone(), clock.shared());
        let coordinator = UploadCoordinator::new(transport.clone(), presenter, clock.shared());

        coordinator.submit(FakeFile::new("a.txt", 10));
        coordinator.submit(FakeFile::new("b.txt", 20));
        let handles = rows.get_untracked();

        transport.emit(0, TransferEvent::Progress { loaded: 10, total: 10 });
        assert_eq!(handles[0].detail.get_untracked().status, DetailStatus::Processing);
        assert_eq!(handles[1].detail.get_untracked().status, DetailStatus::Idle);
        assert!(handles[0].is_ticking());

        transport.emit(1, TransferEvent::Progress { loaded: 7, total: 20 });
        transport.emit(1, TransferEvent::Progress { loaded: 20, total: 20 });
        clock.advance_ms(1_000);
        scheduler.tick_all();

        transport.emit(
            0,
            TransferEvent::Completed {
                status: 200,
                body: "ok".to_string(),
            },
        );
        transport.emit(
            1,
            TransferEvent::Completed {
                status: 500,
                body: "disk full".to_string(),
            },
        );

        let first = handles[0].detail.get_untracked();
        let second = handles[1].detail.get_untracked();
        assert_eq!(first, DetailSlot { status: DetailStatus::Success, text: "ok".to_string() });
        assert_eq!(
            second,
            DetailSlot { status: DetailStatus::Failure, text: "disk full".to_string() }
        );
        assert!(handles.iter().all(|h| h.progress.get_untracked().is_saturated()));
        assert!(handles.iter().all(|h| !h.is_ticking()));
        assert_eq!(scheduler.active(), 0);
        assert_eq!(scheduler.cancelled(), 2);

        runtime.dispose();
    }

    #[test]
    fn transport_failure_leaves_neighbours_untouched() {
        let runtime = create_runtime();
        let clock = ManualClock::new();
        let transport = FakeTransport::new();
        let rows = create_rw_signal(Vec::new());
        let presenter = RowPresenter::new(rows, ManualScheduler::new(), clock.shared());
        let coordinator = UploadCoordinator::new(transport.clone(), presenter, clock.shared());

        for name in ["1.bin", "2.bin", "3.bin"] {
            coordinator.submit(FakeFile::new(name, 8));
        }
        transport.emit(0, TransferEvent::Progress { loaded: 3, total: 8 });
        transport.emit(1, TransferEvent::Failed(TransportError::Network));

        let handles = rows.get_untracked();
        assert_eq!(
            handles[0].progress.get_untracked(),
            ProgressSlot { value: Some(3), max: Some(8) }
        );
        assert_eq!(handles[0].detail.get_untracked(), DetailSlot::default());
        assert_eq!(handles[1].detail.get_untracked().status, DetailStatus::Failure);
        assert_eq!(handles[2].progress.get_untracked(), ProgressSlot::default());

        runtime.dispose();
    }
}
