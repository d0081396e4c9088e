use super::*;
use crate::widgets::test_helpers::{RecordingRenderer, StubApi, interval};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration as StdDuration;

fn stub() -> StubApi {
    StubApi {
        intervals: HashMap::from([
            (UserId(10), vec![interval("Mon", 32400, 61200), interval("Tue", 30000, 59000)]),
            (UserId(11), vec![interval("Wed", 28800, 57600)]),
        ]),
        ..StubApi::default()
    }
}

fn controller(api: &Arc<StubApi>, renderer: &Arc<RecordingRenderer>, view: &ViewHandles) -> WidgetController {
    let dyn_api: Arc<dyn crate::api::PresenceApi> = api.clone();
    WidgetController::new(Arc::new(TimelineWidget::new(dyn_api)), renderer.clone(), view.clone())
}

fn weekdays(drawn: &crate::widgets::test_helpers::Drawn) -> Vec<String> {
    drawn.table.rows().iter().map(|row| row[0].display()).collect()
}

// =============================================================
// Lifecycle
// =============================================================

#[tokio::test]
async fn selection_fetches_and_renders() {
    let api = Arc::new(stub());
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();
    let ctl = controller(&api, &renderer, &view);
    assert_eq!(ctl.state(), WidgetState::Idle);

    ctl.on_selection(SelectionChanged(Some(UserId(10)))).unwrap().await.unwrap();

    assert_eq!(ctl.state(), WidgetState::Rendered);
    assert!(!view.loading.is_visible());
    assert!(view.chart.is_visible());
    let draws = renderer.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].container, "chart_div");
    assert_eq!(draws[0].kind, ChartKind::Timeline);
    assert_eq!(weekdays(&draws[0]), vec!["Mon", "Tue"]);
    assert_eq!(api.calls(), vec![("presence_start_end", Some(UserId(10)))]);
}

#[tokio::test]
async fn loading_shown_while_fetch_is_pending() {
    let api = Arc::new(StubApi { delays: HashMap::from([(UserId(10), StdDuration::from_millis(50))]), ..stub() });
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();
    view.loading.hide();
    let ctl = controller(&api, &renderer, &view);

    let handle = ctl.on_selection(SelectionChanged(Some(UserId(10)))).unwrap();
    assert_eq!(ctl.state(), WidgetState::Loading);
    assert!(view.loading.is_visible());
    assert!(!view.chart.is_visible());

    handle.await.unwrap();
    assert_eq!(ctl.state(), WidgetState::Rendered);
}

#[tokio::test]
async fn empty_selection_does_not_fetch() {
    let api = Arc::new(stub());
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();
    let ctl = controller(&api, &renderer, &view);

    assert!(ctl.on_selection(SelectionChanged(None)).is_none());
    assert!(api.calls().is_empty());
    assert_eq!(ctl.state(), WidgetState::Idle);
    assert!(view.loading.is_visible());
    assert!(view.chart.is_visible());
}

#[tokio::test]
async fn empty_selection_keeps_previous_chart() {
    let api = Arc::new(stub());
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();
    let ctl = controller(&api, &renderer, &view);

    ctl.on_selection(SelectionChanged(Some(UserId(11)))).unwrap().await.unwrap();
    assert!(ctl.on_selection(SelectionChanged(None)).is_none());

    assert_eq!(ctl.state(), WidgetState::Rendered);
    assert!(view.chart.is_visible());
    assert_eq!(renderer.draws().len(), 1);
}

#[tokio::test]
async fn reselecting_same_user_fetches_again() {
    let api = Arc::new(stub());
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();
    let ctl = controller(&api, &renderer, &view);

    ctl.on_selection(SelectionChanged(Some(UserId(10)))).unwrap().await.unwrap();
    ctl.on_selection(SelectionChanged(Some(UserId(10)))).unwrap().await.unwrap();

    assert_eq!(api.calls().len(), 2);
    assert_eq!(renderer.draws().len(), 2);
}

// =============================================================
// Cancellation
// =============================================================

#[tokio::test]
async fn newer_selection_wins_over_slow_earlier_one() {
    let api = Arc::new(StubApi { delays: HashMap::from([(UserId(10), StdDuration::from_millis(200))]), ..stub() });
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();
    let ctl = controller(&api, &renderer, &view);

    let slow = ctl.on_selection(SelectionChanged(Some(UserId(10)))).unwrap();
    let fast = ctl.on_selection(SelectionChanged(Some(UserId(11)))).unwrap();

    fast.await.unwrap();
    assert!(slow.await.unwrap_err().is_cancelled());

    let draws = renderer.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(weekdays(&draws[0]), vec!["Wed"]);
    assert_eq!(ctl.state(), WidgetState::Rendered);
}

// =============================================================
// Failures
// =============================================================

#[tokio::test]
async fn failed_fetch_stays_loading() {
    let api = Arc::new(StubApi { fail: true, ..stub() });
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();
    let ctl = controller(&api, &renderer, &view);

    ctl.on_selection(SelectionChanged(Some(UserId(10)))).unwrap().await.unwrap();

    assert_eq!(ctl.state(), WidgetState::Loading);
    assert!(view.loading.is_visible());
    assert!(!view.chart.is_visible());
    assert!(renderer.draws().is_empty());
}

#[tokio::test]
async fn unbuildable_table_stays_loading() {
    let api: Arc<dyn crate::api::PresenceApi> = Arc::new(StubApi::default());
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();
    let ctl = WidgetController::new(Arc::new(WeekdayWidget::new(api)), renderer.clone(), view.clone());

    ctl.on_selection(SelectionChanged(Some(UserId(1)))).unwrap().await.unwrap();

    assert_eq!(ctl.state(), WidgetState::Loading);
    assert!(renderer.draws().is_empty());
}

// =============================================================
// Selector binding
// =============================================================

#[tokio::test]
async fn bound_controllers_follow_selector_until_closed() {
    let api = Arc::new(StubApi {
        weekday_rows: HashMap::from([(UserId(10), vec![vec![json!("Weekday"), json!("Count")], vec![json!("Mon"), json!(5)]])]),
        ..stub()
    });
    let dyn_api: Arc<dyn crate::api::PresenceApi> = api.clone();
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();

    let timeline = WidgetController::new(Arc::new(TimelineWidget::new(dyn_api.clone())), renderer.clone(), view.clone());
    let weekday = WidgetController::new(Arc::new(WeekdayWidget::new(dyn_api)), renderer.clone(), view.clone());
    let timeline_task = timeline.clone().bind();
    let weekday_task = weekday.clone().bind();

    view.selector.select(None);
    view.selector.select(Some(UserId(10)));
    view.selector.close();

    timeline_task.await.unwrap();
    weekday_task.await.unwrap();

    assert_eq!(timeline.state(), WidgetState::Rendered);
    assert_eq!(weekday.state(), WidgetState::Rendered);
    let mut kinds: Vec<&str> = renderer.draws().iter().map(|d| d.kind.as_str()).collect();
    kinds.sort_unstable();
    assert_eq!(kinds, vec!["PieChart", "Timeline"]);
}

// =============================================================
// Offsets
// =============================================================

#[test]
fn offsets_land_on_placeholder_date() {
    let value = offset_datetime(32400).unwrap();
    assert_eq!(value.date(), PLACEHOLDER_DATE);
    assert_eq!(seconds_of_day(value), 32400);
}

#[test]
fn offsets_past_midnight_roll_over() {
    let value = offset_datetime(86_400 + 3600).unwrap();
    assert_eq!(value.date(), PLACEHOLDER_DATE.next_day().unwrap());
    assert_eq!(seconds_of_day(value), 3600);

    let before = offset_datetime(-60).unwrap();
    assert_eq!(seconds_of_day(before), 86_340);
}

#[test]
fn huge_offsets_are_rejected() {
    assert!(matches!(offset_datetime(i64::MAX), Err(WidgetError::OffsetOutOfRange(i64::MAX))));
}

#[tokio::test]
async fn failing_widget_keeps_its_page_loading_while_sibling_renders() {
    let api: Arc<dyn crate::api::PresenceApi> = Arc::new(stub());
    let renderer = Arc::new(RecordingRenderer::default());
    let selector_page = ViewHandles::new();
    let timeline_page = ViewHandles::with_selector(selector_page.selector.clone());
    let weekday_page = ViewHandles::with_selector(selector_page.selector.clone());

    let timeline = WidgetController::new(Arc::new(TimelineWidget::new(api.clone())), renderer.clone(), timeline_page.clone());
    let weekday = WidgetController::new(Arc::new(WeekdayWidget::new(api)), renderer.clone(), weekday_page.clone());
    let timeline_task = timeline.clone().bind();
    let weekday_task = weekday.clone().bind();

    // No weekday rows for user 10, so the pie table cannot be built.
    selector_page.selector.select(Some(UserId(10)));
    selector_page.selector.close();
    timeline_task.await.unwrap();
    weekday_task.await.unwrap();

    assert_eq!(timeline.state(), WidgetState::Rendered);
    assert!(!timeline_page.loading.is_visible());
    assert!(timeline_page.chart.is_visible());

    assert_eq!(weekday.state(), WidgetState::Loading);
    assert!(weekday_page.loading.is_visible());
    assert!(!weekday_page.chart.is_visible());

    let draws = renderer.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].kind, ChartKind::Timeline);
}

struct PanickingWidget;

#[async_trait::async_trait]
impl Widget for PanickingWidget {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn prepare(&self, _user_id: UserId) -> Result<ChartSpec, WidgetError> {
        panic!("widget blew up");
    }
}

#[tokio::test]
async fn panicking_fetch_is_reported_and_loop_still_ends() {
    let renderer = Arc::new(RecordingRenderer::default());
    let view = ViewHandles::new();
    let ctl = WidgetController::new(Arc::new(PanickingWidget), renderer.clone(), view.clone());

    let direct = ctl.on_selection(SelectionChanged(Some(UserId(1)))).unwrap();
    assert!(direct.await.unwrap_err().is_panic());

    let task = ctl.clone().bind();
    view.selector.select(Some(UserId(2)));
    view.selector.close();
    task.await.unwrap();

    assert_eq!(ctl.state(), WidgetState::Loading);
    assert!(renderer.draws().is_empty());
}
