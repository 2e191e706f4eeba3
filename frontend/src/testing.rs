//! In-memory stand-ins for the browser seams, shared by unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::services::{Clock, EventSink, Presenter, Scheduler, TickerHandle, Transport, UploadSource};
use crate::state::TransferEvent;
use crate::types::TransportError;

// =============================================================================
// Clock
// =============================================================================

#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now.set(self.now.get() + Duration::milliseconds(ms));
    }

    pub fn shared(&self) -> Rc<dyn Clock> {
        Rc::new(self.clone())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

// =============================================================================
// Scheduler
// =============================================================================

struct Ticker {
    live: Rc<Cell<bool>>,
    tick: Box<dyn FnMut()>,
}

/// Fires every live ticker on [`ManualScheduler::tick_all`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    tickers: Rc<RefCell<Vec<Ticker>>>,
    cancelled: Rc<Cell<usize>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_all(&self) {
        let mut tickers = std::mem::take(&mut *self.tickers.borrow_mut());
        for ticker in tickers.iter_mut().filter(|t| t.live.get()) {
            (ticker.tick)();
        }
        tickers.retain(|t| t.live.get());
        self.tickers.borrow_mut().extend(tickers);
    }

    pub fn active(&self) -> usize {
        self.tickers.borrow().iter().filter(|t| t.live.get()).count()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.get()
    }
}

impl Scheduler for ManualScheduler {
    fn repeat(&self, _period_ms: u32, tick: Box<dyn FnMut()>) -> TickerHandle {
        let live = Rc::new(Cell::new(true));
        self.tickers.borrow_mut().push(Ticker {
            live: live.clone(),
            tick,
        });
        let cancelled = self.cancelled.clone();
        TickerHandle::new(move || {
            live.set(false);
            cancelled.set(cancelled.get() + 1);
        })
    }
}

// =============================================================================
// Transport
// =============================================================================

pub struct FakeFile {
    name: String,
    size: u64,
}

impl FakeFile {
    pub fn new(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            size,
        }
    }
}

impl UploadSource for FakeFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// Records every transfer; tests push events with [`FakeTransport::emit`].
#[derive(Clone, Default)]
pub struct FakeTransport {
    transfers: Rc<RefCell<Vec<(String, EventSink)>>>,
    refusal: Rc<RefCell<Option<String>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refuse_next(&self, reason: &str) {
        *self.refusal.borrow_mut() = Some(reason.to_string());
    }

    pub fn sent(&self) -> Vec<String> {
        self.transfers.borrow().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn emit(&self, index: usize, event: TransferEvent) {
        let sink = self.transfers.borrow()[index].1.clone();
        sink(event);
    }
}

impl Transport for FakeTransport {
    type File = FakeFile;

    fn send(&self, file: FakeFile, on_event: EventSink) -> Result<(), TransportError> {
        if let Some(reason) = self.refusal.borrow_mut().take() {
            return Err(TransportError::Setup(reason));
        }
        self.transfers.borrow_mut().push((file.name, on_event));
        Ok(())
    }
}

// =============================================================================
// Presenter
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Created(usize, String),
    Progress(usize, u64, u64),
    Processing(usize),
    Terminal(usize, bool, String),
}

impl Call {
    fn row(&self) -> usize {
        match self {
            Call::Created(row, _)
            | Call::Progress(row, ..)
            | Call::Processing(row)
            | Call::Terminal(row, ..) => *row,
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingPresenter {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_for(&self, row: usize) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.row() == row).collect()
    }
}

impl Presenter for RecordingPresenter {
    type Row = usize;

    fn create_row(&self, file_name: &str) -> usize {
        let mut calls = self.calls.borrow_mut();
        let row = calls.iter().filter(|c| matches!(c, Call::Created(..))).count();
        calls.push(Call::Created(row, file_name.to_string()));
        row
    }

    fn on_progress(&self, row: &usize, sent: u64, total: u64) {
        self.calls.borrow_mut().push(Call::Progress(*row, sent, total));
    }

    fn on_processing_start(&self, row: &usize, _started_at: DateTime<Utc>) {
        self.calls.borrow_mut().push(Call::Processing(*row));
    }

    fn on_terminal(&self, row: &usize, succeeded: bool, text: &str) {
        self.calls
            .borrow_mut()
            .push(Call::Terminal(*row, succeeded, text.to_string()));
    }
}
