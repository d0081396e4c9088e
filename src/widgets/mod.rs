//! Widgets — fetch-and-render units bound to the user selector.
//!
//! DESIGN
//! ======
//! A `Widget` knows one endpoint and how to turn its payload into a chart.
//! A `WidgetController` owns the shared lifecycle: on a non-empty selection
//! it shows the loading indicator, hides the chart, aborts whatever fetch
//! is still running and spawns a new one. A generation counter, checked
//! under the state lock right before drawing, keeps a superseded task from
//! rendering, so the latest selection always wins.
//!
//! FAILURES
//! ========
//! There is no error state. A failed fetch or an unbuildable table is
//! logged and the widget stays in `Loading` with the chart hidden.

pub mod mean_time;
pub mod selector;
pub mod timeline;
pub mod weekday;

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

pub use mean_time::MeanTimeWidget;
pub use selector::UserSelector;
pub use timeline::TimelineWidget;
pub use weekday::WeekdayWidget;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use time::macros::date;
use time::{Date, Duration, PrimitiveDateTime, Time};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::api::{ApiError, UserId};
use crate::chart::{ChartError, ChartKind, ChartRenderer, DataTable};
use crate::view::{SelectionChanged, ViewHandles};

/// Date the backend's second offsets are added to. Only the time of day of
/// the result means anything.
pub const PLACEHOLDER_DATE: Date = date!(1901-02-01);

/// Display pattern for time-of-day columns.
pub const TIME_PATTERN: &str = "HH:mm:ss";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("offset of {0} seconds does not fit a date-time")]
    OffsetOutOfRange(i64),
}

// =============================================================================
// WIDGET
// =============================================================================

/// A chart ready to draw.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub table: DataTable,
    pub options: Value,
}

/// Fetches one user's data and turns it into a chart.
#[async_trait::async_trait]
pub trait Widget: Send + Sync {
    fn name(&self) -> &'static str;

    async fn prepare(&self, user_id: UserId) -> Result<ChartSpec, WidgetError>;
}

/// Placeholder date at midnight plus `offset_secs`. Offsets past a day
/// roll into the following date, negative ones into the previous.
///
/// # Errors
///
/// Returns an error if the offset leaves the supported date range.
pub fn offset_datetime(offset_secs: i64) -> Result<PrimitiveDateTime, WidgetError> {
    PrimitiveDateTime::new(PLACEHOLDER_DATE, Time::MIDNIGHT)
        .checked_add(Duration::seconds(offset_secs))
        .ok_or(WidgetError::OffsetOutOfRange(offset_secs))
}

#[must_use]
pub fn seconds_of_day(value: PrimitiveDateTime) -> u32 {
    let (h, m, s) = value.time().as_hms();
    u32::from(h) * 3600 + u32::from(m) * 60 + u32::from(s)
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    Loading,
    Rendered,
}

struct ControllerInner {
    widget: Arc<dyn Widget>,
    renderer: Arc<dyn ChartRenderer>,
    view: ViewHandles,
    state: Mutex<WidgetState>,
    generation: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
}

/// Drives one widget from selection changes.
#[derive(Clone)]
pub struct WidgetController {
    inner: Arc<ControllerInner>,
}

impl WidgetController {
    #[must_use]
    pub fn new(widget: Arc<dyn Widget>, renderer: Arc<dyn ChartRenderer>, view: ViewHandles) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                widget,
                renderer,
                view,
                state: Mutex::new(WidgetState::Idle),
                generation: AtomicU64::new(0),
                in_flight: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.widget.name()
    }

    #[must_use]
    pub fn state(&self) -> WidgetState {
        *lock(&self.inner.state)
    }

    /// React to one selection change. Empty selections are ignored and
    /// leave the current chart as it is. Returns the spawned fetch task.
    pub fn on_selection(&self, change: SelectionChanged) -> Option<JoinHandle<()>> {
        let name = self.name();
        let Some(user_id) = change.0 else {
            debug!(widget = name, "empty selection; nothing to fetch");
            return None;
        };

        let generation = {
            let mut state = lock(&self.inner.state);
            *state = WidgetState::Loading;
            self.inner.view.loading.show();
            self.inner.view.chart.hide();
            self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let mut in_flight = lock(&self.inner.in_flight);
        if let Some(previous) = in_flight.take() {
            if !previous.is_finished() {
                debug!(widget = name, %user_id, "superseding in-flight fetch");
            }
            previous.abort();
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            match inner.widget.prepare(user_id).await {
                Ok(chart) => inner.render(generation, user_id, &chart),
                Err(e) => warn!(widget = name, %user_id, error = %e, "widget fetch failed; still loading"),
            }
        });
        *in_flight = Some(handle.abort_handle());
        Some(handle)
    }

    /// Follow selection changes until the stream closes, then wait for the
    /// last fetch to settle.
    pub async fn run(self, mut events: broadcast::Receiver<SelectionChanged>) {
        let mut last = None;
        loop {
            match events.recv().await {
                Ok(change) => {
                    if let Some(handle) = self.on_selection(change) {
                        last = Some(handle);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(widget = self.name(), skipped, "selection events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
        if let Some(handle) = last {
            if let Err(e) = handle.await {
                warn!(widget = self.name(), error = %e, "widget task failed");
            }
        }
        debug!(widget = self.name(), "selection stream closed");
    }

    /// Subscribe to the view's selector and follow it on a background task.
    #[must_use]
    pub fn bind(self) -> JoinHandle<()> {
        let events = self.inner.view.selector.subscribe();
        tokio::spawn(self.run(events))
    }
}

impl ControllerInner {
    fn render(&self, generation: u64, user_id: UserId, chart: &ChartSpec) {
        let name = self.widget.name();
        let mut state = lock(&self.state);
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(widget = name, %user_id, "dropping stale result");
            return;
        }

        self.view.chart.show();
        self.view.loading.hide();
        match self.renderer.draw(&self.view.chart, chart.kind, &chart.table, &chart.options) {
            Ok(()) => {
                *state = WidgetState::Rendered;
                info!(widget = name, %user_id, rows = chart.table.num_rows(), "chart rendered");
            }
            Err(e) => warn!(widget = name, %user_id, error = %e, "chart draw failed"),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
