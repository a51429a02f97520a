use std::collections::BTreeMap;

use chrono::SecondsFormat;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::domain::common::model::{TimeRange, TimeSeriesPoint};
use crate::domain::stats::filter::apply_filter;
use crate::domain::stats::label::LabelFormatter;
use crate::domain::stats::rollup::RollupGranularity;
use crate::domain::stats::selection::RangeSelection;

/// One named series of a chart.
#[derive(Debug, Clone, Copy)]
pub struct SeriesDef {
    pub key: &'static str,
    pub name: &'static str,
    /// Shown when the chart first renders.
    pub visible: bool,
}

pub const STATUS_SERIES: [SeriesDef; 6] = [
    SeriesDef { key: "notProcessed", name: "Not processed", visible: true },
    SeriesDef { key: "waitingCustomerService", name: "Waiting on customer service", visible: true },
    SeriesDef { key: "waitingCustomer", name: "Waiting on customer", visible: false },
    SeriesDef { key: "preFulfilled", name: "Pending confirmation", visible: false },
    SeriesDef { key: "fulfilled", name: "Resolved", visible: false },
    SeriesDef { key: "closed", name: "Closed", visible: false },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// RFC 3339 with milliseconds, UTC.
    pub time: String,
    pub values: BTreeMap<String, f64>,
}

/// Everything a chart widget needs to render one series set.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub rollup: RollupGranularity,
    pub is_stack: bool,
    pub selection: Option<TimeRange>,
    pub points: Vec<ChartPoint>,
    pub tick_labels: Vec<String>,
    pub titles: Vec<String>,
    pub names: BTreeMap<String, String>,
    pub init_legend: BTreeMap<String, bool>,
}

/// Sort, filter and label `series` for display. Values of series not listed
/// in `defs` are dropped.
pub fn build_chart(
    defs: &[SeriesDef],
    series: &[TimeSeriesPoint],
    rollup: RollupGranularity,
    selection: &RangeSelection,
    formatter: &LabelFormatter,
    is_stack: bool,
) -> ChartSpec {
    let filtered = apply_filter(series, selection);
    let times: Vec<_> = filtered.iter().map(|p| p.time).collect();

    let points = filtered
        .iter()
        .map(|p| ChartPoint {
            time: p.time.to_rfc3339_opts(SecondsFormat::Millis, true),
            values: defs
                .iter()
                .map(|d| (d.key.to_string(), p.value(d.key).unwrap_or(0.0)))
                .collect(),
        })
        .collect();

    ChartSpec {
        rollup,
        is_stack,
        selection: selection.range(),
        points,
        tick_labels: formatter.tick_labels(&times, rollup),
        titles: times.iter().map(|t| formatter.title_label(*t)).collect(),
        names: defs
            .iter()
            .map(|d| (d.key.to_string(), d.name.to_string()))
            .collect(),
        init_legend: defs
            .iter()
            .filter(|d| !d.visible)
            .map(|d| (d.key.to_string(), false))
            .collect(),
    }
}

/// Stacked ticket-status chart.
pub fn build_status_chart(
    series: &[TimeSeriesPoint],
    rollup: RollupGranularity,
    selection: &RangeSelection,
    formatter: &LabelFormatter,
) -> ChartSpec {
    build_chart(&STATUS_SERIES, series, rollup, selection, formatter, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::ticket_status::ticket_status_entity::TicketStatusEntity;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap()
    }

    fn row(date: DateTime<Utc>, not_processed: u64) -> TimeSeriesPoint {
        TicketStatusEntity {
            not_processed,
            closed: 7,
            ..TicketStatusEntity::empty(date)
        }
        .to_point()
    }

    #[test]
    fn status_chart_sorts_labels_and_hides_legend_entries() {
        let series = vec![row(at(2, 1), 3), row(at(1, 23), 1), row(at(2, 0), 2)];
        let chart = build_status_chart(
            &series,
            RollupGranularity::Hour,
            &RangeSelection::Unselected,
            &LabelFormatter::utc(),
        );

        assert!(chart.is_stack);
        assert_eq!(chart.selection, None);
        let times: Vec<_> = chart.points.iter().map(|p| p.time.as_str()).collect();
        assert_eq!(
            times,
            vec![
                "2024-06-01T23:00:00.000Z",
                "2024-06-02T00:00:00.000Z",
                "2024-06-02T01:00:00.000Z"
            ]
        );
        assert_eq!(chart.points[0].values["notProcessed"], 1.0);
        assert_eq!(chart.points[0].values["closed"], 7.0);
        assert_eq!(chart.points[0].values.len(), 6);
        assert_eq!(chart.tick_labels, vec!["06-01 23:00", "06-02 00:00", "01:00"]);
        assert_eq!(chart.titles[2], "2024-06-02 01:00");
        assert_eq!(chart.names["preFulfilled"], "Pending confirmation");
        assert_eq!(chart.init_legend.len(), 4);
        assert_eq!(chart.init_legend.get("closed"), Some(&false));
        assert!(!chart.init_legend.contains_key("notProcessed"));
    }

    #[test]
    fn selection_restricts_points_and_is_reported() {
        let series = vec![row(at(1, 1), 1), row(at(1, 2), 2), row(at(1, 3), 3)];
        let range = TimeRange::new(at(1, 2), at(1, 3));
        let chart = build_status_chart(
            &series,
            RollupGranularity::Hour,
            &RangeSelection::Range(range),
            &LabelFormatter::utc(),
        );
        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.selection, Some(range));
        assert_eq!(chart.tick_labels, vec!["06-01 02:00", "03:00"]);
    }

    #[test]
    fn empty_series_renders_empty_chart() {
        let chart = build_status_chart(
            &[],
            RollupGranularity::Day,
            &RangeSelection::Unselected,
            &LabelFormatter::utc(),
        );
        assert!(chart.points.is_empty());
        assert!(chart.tick_labels.is_empty());
        assert_eq!(chart.names.len(), 6);
    }

    #[test]
    fn serializes_without_absent_selection() {
        let chart = build_status_chart(
            &[],
            RollupGranularity::Day,
            &RangeSelection::Unselected,
            &LabelFormatter::utc(),
        );
        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["rollup"], "day");
        assert_eq!(value["isStack"], true);
        assert!(value["tickLabels"].as_array().unwrap().is_empty());
        assert_eq!(value["initLegend"]["closed"], false);
        assert!(value.get("selection").is_none());
        assert!(value.get("tick_labels").is_none());
    }
}
