use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};
use tracing::{info, warn};

use crate::core::search_params::{NavigateOptions, Navigator, QueryParameterSet, SearchParamStore};
use crate::domain::common::model::{TimeRange, TimeSeriesPoint};
use crate::domain::common::service::StatusStatsSource;
use crate::domain::stats::chart::{build_status_chart, ChartSpec};
use crate::domain::stats::filter::TimeSeriesFilter;
use crate::domain::stats::label::LabelFormatter;
use crate::domain::stats::rollup::{resolve_time_window, RollupGranularity, TimeWindow};
use crate::domain::stats::selection::{RangeSelection, SelectionError, SelectionEvent};

pub const FROM_PARAM: &str = "from";
pub const TO_PARAM: &str = "to";

/// `from`/`to` exactly as the URL carried them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestedRange {
    from: Option<String>,
    to: Option<String>,
}

impl RequestedRange {
    fn read(params: &QueryParameterSet) -> Self {
        Self {
            from: params.get(FROM_PARAM).map(str::to_string),
            to: params.get(TO_PARAM).map(str::to_string),
        }
    }
}

struct LoadedSeries {
    requested: RequestedRange,
    window: TimeWindow,
    points: Vec<TimeSeriesPoint>,
}

/// Ticket-status dashboard: the requested range lives in the URL, the
/// brushed sub-range lives in the view.
pub struct StatusStatsView<N: Navigator, S: StatusStatsSource> {
    params: SearchParamStore<N>,
    source: S,
    filter: TimeSeriesFilter,
    formatter: LabelFormatter,
    loaded: Option<LoadedSeries>,
}

impl<N: Navigator, S: StatusStatsSource> StatusStatsView<N, S> {
    pub fn mount(navigator: N, source: S, formatter: LabelFormatter) -> Self {
        Self {
            params: SearchParamStore::mount(navigator),
            source,
            filter: TimeSeriesFilter::new(),
            formatter,
            loaded: None,
        }
    }

    pub fn params(&self) -> &SearchParamStore<N> {
        &self.params
    }

    pub fn selection(&self) -> RangeSelection {
        self.filter.selection()
    }

    /// Range named by the URL. Unreadable bounds are ignored (logged) and
    /// replaced by the default window.
    pub fn requested_window(&self, now: DateTime<Utc>) -> TimeWindow {
        let params = self.params.read();
        let from = self.read_bound(&params, FROM_PARAM, false);
        let to = self.read_bound(&params, TO_PARAM, true);
        resolve_time_window(from, to, None, now)
    }

    /// Write a new requested range as one merge.
    pub fn change_range(&mut self, from: DateTime<Utc>, to: DateTime<Utc>, options: NavigateOptions) {
        let range = TimeRange::new(from, to);
        let partial = QueryParameterSet::new()
            .with(FROM_PARAM, range.start().to_rfc3339_opts(SecondsFormat::Secs, true))
            .with(TO_PARAM, range.end().to_rfc3339_opts(SecondsFormat::Secs, true));
        self.params.merge(&partial, options);
    }

    /// Fetch the requested range and render it. A change of the URL's
    /// `from`/`to` drops the brushed selection; a failed fetch changes nothing.
    pub async fn load(&mut self, now: DateTime<Utc>) -> Result<ChartSpec> {
        let requested = RequestedRange::read(&self.params.read());
        let window = self.requested_window(now);

        let rows = self
            .source
            .fetch_ticket_status(window.start, window.end)
            .await?;
        info!(
            start = %window.start,
            end = %window.end,
            rollup = window.rollup.as_code(),
            rows = rows.len(),
            "ticket status loaded"
        );

        let range_changed = self
            .loaded
            .as_ref()
            .map(|l| l.requested != requested)
            .unwrap_or(false);
        if range_changed {
            self.filter.clear();
        }

        self.loaded = Some(LoadedSeries {
            requested,
            window,
            points: rows.iter().map(|r| r.to_point()).collect(),
        });
        Ok(self.chart())
    }

    /// Apply a chart brush event to the data already loaded.
    pub fn select(&mut self, event: &SelectionEvent) -> Result<ChartSpec, SelectionError> {
        self.filter.handle(event)?;
        Ok(self.chart())
    }

    pub fn chart(&self) -> ChartSpec {
        match &self.loaded {
            Some(loaded) => build_status_chart(
                &loaded.points,
                loaded.window.rollup,
                &self.filter.selection(),
                &self.formatter,
            ),
            None => build_status_chart(
                &[],
                RollupGranularity::Hour,
                &self.filter.selection(),
                &self.formatter,
            ),
        }
    }

    pub fn unmount(self) {}

    fn read_bound(&self, params: &QueryParameterSet, key: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
        let raw = params.get(key)?;
        let parsed = parse_bound(raw, &self.formatter, end_of_day);
        if parsed.is_none() {
            warn!("Ignoring unreadable '{}' parameter: {:?}", key, raw);
        }
        parsed
    }
}

/// RFC 3339 instant, or a `YYYY-MM-DD` calendar day in the formatter's
/// offset (its first instant, or its last millisecond for an end bound).
fn parse_bound(raw: &str, formatter: &LabelFormatter, end_of_day: bool) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let day_start = formatter
        .offset()
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .single()?
        .with_timezone(&Utc);

    if end_of_day {
        Some(day_start + Duration::days(1) - Duration::milliseconds(1))
    } else {
        Some(day_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::ticket_status::ticket_status_entity::TicketStatusEntity;
    use crate::core::search_params::MemoryRouter;
    use crate::domain::stats::selection::AxisValue;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockSource {
        rows: Vec<TicketStatusEntity>,
        calls: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
        unavailable: Mutex<bool>,
    }

    #[async_trait]
    impl StatusStatsSource for MockSource {
        async fn fetch_ticket_status(
            &self,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> Result<Vec<TicketStatusEntity>> {
            self.calls.lock().unwrap().push((from, to));
            if *self.unavailable.lock().unwrap() {
                return Err(anyhow::anyhow!("stats source unavailable"));
            }
            Ok(self
                .rows
                .iter()
                .filter(|r| r.date >= from && r.date <= to)
                .cloned()
                .collect())
        }
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap()
    }

    fn source() -> MockSource {
        let rows = (0..48)
            .rev()
            .map(|h| TicketStatusEntity {
                not_processed: h,
                ..TicketStatusEntity::empty(at(1, 0) + Duration::hours(h as i64))
            })
            .collect();
        MockSource {
            rows,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn loads_the_range_named_by_the_url() {
        let router = MemoryRouter::new("from=2024-06-01T00:00:00Z&to=2024-06-01T05:00:00Z");
        let mut view = StatusStatsView::mount(router, source(), LabelFormatter::utc());

        let chart = view.load(at(10, 0)).await.unwrap();
        assert_eq!(chart.rollup, RollupGranularity::Hour);
        assert_eq!(chart.points.len(), 6);
        assert_eq!(chart.points[0].time, "2024-06-01T00:00:00.000Z");
        assert_eq!(view.source.calls.lock().unwrap()[0], (at(1, 0), at(1, 5)));
    }

    #[tokio::test]
    async fn date_only_bounds_cover_whole_days() {
        let router = MemoryRouter::new("from=2024-06-01&to=2024-06-01");
        let view = StatusStatsView::mount(router, source(), LabelFormatter::utc());
        let window = view.requested_window(at(10, 0));
        assert_eq!(window.start, at(1, 0));
        assert_eq!(window.end, at(2, 0) - Duration::milliseconds(1));
    }

    #[tokio::test]
    async fn unreadable_bounds_fall_back_to_default_window() {
        let router = MemoryRouter::new("from=yesterday&to=soon");
        let view = StatusStatsView::mount(router, source(), LabelFormatter::utc());
        let window = view.requested_window(at(10, 0));
        assert_eq!(window.end, at(10, 0));
        assert_eq!(window.start, at(3, 0));
        assert_eq!(window.rollup, RollupGranularity::Day);
    }

    #[tokio::test]
    async fn brushing_filters_cached_data_without_refetch() {
        let router = MemoryRouter::new("from=2024-06-01T00:00:00Z&to=2024-06-01T23:00:00Z");
        let mut view = StatusStatsView::mount(router, source(), LabelFormatter::utc());
        view.load(at(10, 0)).await.unwrap();

        let chart = view
            .select(&SelectionEvent::from_axis_values(Some(vec![
                AxisValue::from(at(1, 6)),
                AxisValue::from(at(1, 4)),
            ])))
            .unwrap();
        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.tick_labels, vec!["06-01 04:00", "05:00", "06:00"]);
        assert_eq!(view.source.calls.lock().unwrap().len(), 1);

        let chart = view.select(&SelectionEvent::RangeCleared).unwrap();
        assert_eq!(chart.points.len(), 24);
    }

    #[tokio::test]
    async fn changing_the_range_refetches_and_clears_selection() {
        let router = MemoryRouter::new("from=2024-06-01T00:00:00Z&to=2024-06-01T23:00:00Z&tab=status");
        let mut view = StatusStatsView::mount(router.clone(), source(), LabelFormatter::utc());
        view.load(at(10, 0)).await.unwrap();
        view.select(&SelectionEvent::RangeSelected(at(1, 2).into(), at(1, 3).into()))
            .unwrap();
        assert!(view.selection().is_selected());

        view.change_range(at(2, 23), at(1, 12), NavigateOptions::push());
        router.flush();
        assert_eq!(view.params().get("tab").as_deref(), Some("status"));
        assert_eq!(view.params().get(FROM_PARAM).as_deref(), Some("2024-06-01T12:00:00Z"));

        let chart = view.load(at(10, 0)).await.unwrap();
        assert_eq!(view.selection(), RangeSelection::Unselected);
        assert_eq!(chart.points.len(), 36);
        assert_eq!(view.source.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reload_of_same_range_keeps_selection() {
        let router = MemoryRouter::new("from=2024-06-01T00:00:00Z&to=2024-06-01T23:00:00Z");
        let mut view = StatusStatsView::mount(router, source(), LabelFormatter::utc());
        view.load(at(10, 0)).await.unwrap();
        view.select(&SelectionEvent::RangeSelected(at(1, 2).into(), at(1, 3).into()))
            .unwrap();
        let chart = view.load(at(10, 0)).await.unwrap();
        assert_eq!(chart.points.len(), 2);
    }

    #[tokio::test]
    async fn later_reload_of_default_window_keeps_selection() {
        let mut view = StatusStatsView::mount(MemoryRouter::default(), source(), LabelFormatter::utc());
        view.load(at(10, 0)).await.unwrap();
        view.select(&SelectionEvent::RangeSelected(at(4, 0).into(), at(5, 0).into()))
            .unwrap();

        view.load(at(10, 0) + Duration::seconds(30)).await.unwrap();
        assert!(view.selection().is_selected());
        assert_eq!(view.source.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_data_and_selection() {
        let router = MemoryRouter::new("from=2024-06-01T00:00:00Z&to=2024-06-01T23:00:00Z");
        let mut view = StatusStatsView::mount(router.clone(), source(), LabelFormatter::utc());
        view.load(at(10, 0)).await.unwrap();
        view.select(&SelectionEvent::RangeSelected(at(1, 2).into(), at(1, 3).into()))
            .unwrap();

        view.change_range(at(2, 0), at(2, 12), NavigateOptions::push());
        router.flush();
        *view.source.unavailable.lock().unwrap() = true;

        assert!(view.load(at(10, 0)).await.is_err());
        assert!(view.selection().is_selected());
        assert_eq!(view.chart().points.len(), 2);

        // the URL already names the new range; a successful retry applies it
        *view.source.unavailable.lock().unwrap() = false;
        let chart = view.load(at(10, 0)).await.unwrap();
        assert_eq!(view.selection(), RangeSelection::Unselected);
        assert_eq!(chart.points.len(), 13);
    }

    #[test]
    fn chart_before_load_is_empty() {
        let view = StatusStatsView::mount(MemoryRouter::default(), source(), LabelFormatter::utc());
        assert!(view.chart().points.is_empty());
    }
}
