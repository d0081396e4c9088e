use super::*;
use crate::widgets::seconds_of_day;
use crate::widgets::test_helpers::StubApi;
use std::collections::HashMap;

fn row(weekday: &str, mean_secs: f64) -> MeanTimeRow {
    MeanTimeRow { weekday: weekday.into(), mean_secs }
}

#[test]
fn means_become_formatted_times() {
    let table = build_table(&[row("Mon", 24123.0), row("Tue", 16564.9)]).unwrap();
    assert_eq!(table.num_rows(), 2);
    assert_eq!(table.columns()[1].kind, ColumnType::DateTime);
    assert_eq!(table.cell(0, 1).unwrap().display(), "06:42:03");
    assert_eq!(table.cell(1, 1).unwrap().display(), "04:36:04");
    let CellValue::DateTime(tue) = table.cell(1, 1).unwrap().value else {
        panic!("expected datetime");
    };
    assert_eq!(seconds_of_day(tue), 16564);
}

#[test]
fn zero_mean_is_midnight() {
    let table = build_table(&[row("Sun", 0.0)]).unwrap();
    assert_eq!(table.cell(0, 1).unwrap().display(), "00:00:00");
}

#[tokio::test]
async fn prepare_builds_column_chart() {
    let api = Arc::new(StubApi {
        mean_rows: HashMap::from([(UserId(10), vec![row("Mon", 3600.0)])]),
        ..StubApi::default()
    });
    let chart = MeanTimeWidget::new(api.clone()).prepare(UserId(10)).await.unwrap();

    assert_eq!(chart.kind, ChartKind::ColumnChart);
    assert_eq!(chart.options["legend"]["position"], "none");
    assert_eq!(chart.table.cell(0, 1).unwrap().display(), "01:00:00");
    assert_eq!(api.calls(), vec![("mean_time_weekday", Some(UserId(10)))]);
}
