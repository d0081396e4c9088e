//! View — the page elements widgets touch, as explicit handles.
//!
//! DESIGN
//! ======
//! `ViewHandles` bundles the loading indicator (`loading`), the user
//! selector (`user_id`) and the chart container (`chart_div`). Handles are
//! cheap `Arc` clones. Each widget gets its own page (loading indicator
//! and chart container) while one selector can drive several pages.
//! The selector broadcasts every change, including repeats of the same
//! value, so each subscribed widget sees each selection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

use crate::api::UserId;

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

pub const LOADING_ID: &str = "loading";
pub const SELECTOR_ID: &str = "user_id";
pub const CHART_ID: &str = "chart_div";

const SELECTION_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// VISIBILITY
// =============================================================================

/// Show/hide flag for a single element.
#[derive(Debug, Clone)]
pub struct Toggle {
    id: &'static str,
    visible: Arc<AtomicBool>,
}

impl Toggle {
    #[must_use]
    pub fn new(id: &'static str, visible: bool) -> Self {
        Self { id, visible: Arc::new(AtomicBool::new(visible)) }
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    pub fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

/// Container charts are drawn into.
#[derive(Debug, Clone)]
pub struct ChartArea {
    toggle: Toggle,
}

impl ChartArea {
    #[must_use]
    pub fn new(id: &'static str) -> Self {
        Self { toggle: Toggle::new(id, true) }
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        self.toggle.id()
    }

    pub fn show(&self) {
        self.toggle.show();
    }

    pub fn hide(&self) {
        self.toggle.hide();
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.toggle.is_visible()
    }
}

// =============================================================================
// SELECTOR
// =============================================================================

/// One entry of the user selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: UserId,
    pub label: String,
}

/// A change of the selector's value. `None` is the empty placeholder entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged(pub Option<UserId>);

#[derive(Debug)]
struct SelectorInner {
    options: Mutex<Vec<SelectOption>>,
    value: Mutex<Option<UserId>>,
    events: Mutex<Option<broadcast::Sender<SelectionChanged>>>,
}

/// Selection control listing users. Starts hidden and empty.
#[derive(Debug, Clone)]
pub struct Selector {
    toggle: Toggle,
    inner: Arc<SelectorInner>,
}

impl Selector {
    #[must_use]
    pub fn new(id: &'static str) -> Self {
        let (events, _) = broadcast::channel(SELECTION_CHANNEL_CAPACITY);
        Self {
            toggle: Toggle::new(id, false),
            inner: Arc::new(SelectorInner {
                options: Mutex::new(Vec::new()),
                value: Mutex::new(None),
                events: Mutex::new(Some(events)),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        self.toggle.id()
    }

    pub fn append(&self, option: SelectOption) {
        self.inner
            .options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(option);
    }

    #[must_use]
    pub fn options(&self) -> Vec<SelectOption> {
        self.inner
            .options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn value(&self) -> Option<UserId> {
        *self.inner.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the value and notify subscribers. Returns how many subscribers
    /// received the change.
    pub fn select(&self, value: Option<UserId>) -> usize {
        *self.inner.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
        let events = self.inner.events.lock().unwrap_or_else(PoisonError::into_inner);
        events
            .as_ref()
            .map_or(0, |tx| tx.send(SelectionChanged(value)).unwrap_or(0))
    }

    /// Subscribe to changes. After `close` the receiver is already closed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SelectionChanged> {
        let events = self.inner.events.lock().unwrap_or_else(PoisonError::into_inner);
        match events.as_ref() {
            Some(tx) => tx.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    /// Stop emitting changes. Subscribers drain what was sent, then see
    /// the channel closed.
    pub fn close(&self) {
        self.inner.events.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    pub fn show(&self) {
        self.toggle.show();
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.toggle.is_visible()
    }
}

// =============================================================================
// HANDLES
// =============================================================================

/// Everything a widget is allowed to touch on the page.
#[derive(Debug, Clone)]
pub struct ViewHandles {
    pub loading: Toggle,
    pub selector: Selector,
    pub chart: ChartArea,
}

impl ViewHandles {
    /// Fresh page: loading shown, selector hidden and empty, chart area shown.
    #[must_use]
    pub fn new() -> Self {
        Self::with_selector(Selector::new(SELECTOR_ID))
    }

    /// Fresh page whose loading indicator and chart area are its own but
    /// whose selector is shared with other pages.
    #[must_use]
    pub fn with_selector(selector: Selector) -> Self {
        Self { loading: Toggle::new(LOADING_ID, true), selector, chart: ChartArea::new(CHART_ID) }
    }
}

impl Default for ViewHandles {
    fn default() -> Self {
        Self::new()
    }
}
