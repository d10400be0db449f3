use crate::app::time::now_millis;
use crate::game::position::PositionFilter;
use crate::game::types::{Point, Viewport};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, Notify};

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single-slot outbox: a newer frame replaces one the socket has not sent yet.
#[derive(Debug)]
pub struct LatestFrame {
    frame: StdMutex<Option<String>>,
    notify: Notify,
}

impl LatestFrame {
    pub(crate) fn new() -> Self {
        Self {
            frame: StdMutex::new(None),
            notify: Notify::new(),
        }
    }

    pub(crate) fn store(&self, payload: String) {
        *lock(&self.frame) = Some(payload);
        self.notify.notify_one();
    }

    pub(crate) fn take_latest(&self) -> Option<String> {
        lock(&self.frame).take()
    }

    pub(crate) async fn wait_for_update(&self) {
        self.notify.notified().await;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InboundState {
    pub(crate) target: Option<Point>,
    pub(crate) viewport: Option<Viewport>,
    pub(crate) last_fix_at: Option<i64>,
}

#[derive(Debug)]
struct InboxInner {
    filter: PositionFilter,
    state: InboundState,
}

/// Latest smoothed fix and viewport, read by the tick loop.
#[derive(Debug)]
pub struct PositionInbox {
    inner: StdMutex<InboxInner>,
}

impl PositionInbox {
    pub(crate) fn new(window: usize) -> Self {
        Self {
            inner: StdMutex::new(InboxInner {
                filter: PositionFilter::new(window),
                state: InboundState::default(),
            }),
        }
    }

    /// Feeds a raw reading through the smoothing window and returns the result.
    pub(crate) fn push_fix(&self, reading: Point) -> Point {
        let mut inner = lock(&self.inner);
        let smoothed = inner.filter.push(reading);
        inner.state.target = Some(smoothed);
        inner.state.last_fix_at = Some(now_millis());
        smoothed
    }

    pub(crate) fn update_view(&self, viewport: Viewport) {
        lock(&self.inner).state.viewport = Some(viewport);
    }

    pub(crate) fn snapshot(&self) -> InboundState {
        lock(&self.inner).state
    }
}

pub struct RoundIo {
    pub outbound_state: Arc<LatestFrame>,
    pub events_rx: mpsc::UnboundedReceiver<String>,
}
