use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::domain::stats::rollup::RollupGranularity;

const DATE_TIME_TICK: &str = "%m-%d %H:%M";
const TIME_TICK: &str = "%H:%M";
const TITLE: &str = "%Y-%m-%d %H:%M";

/// Axis and tooltip labels, rendered in the viewer's UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct LabelFormatter {
    offset: FixedOffset,
}

impl Default for LabelFormatter {
    fn default() -> Self {
        Self::utc()
    }
}

impl LabelFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// `None` when the offset is a day or more.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Tick label for the `index`-th tick.
    ///
    /// Day rollup: always date and time. Sub-day rollup: date and time for
    /// the first tick and for the first tick of each calendar day, time only
    /// otherwise.
    pub fn tick_label(
        &self,
        index: usize,
        time: DateTime<Utc>,
        previous: Option<DateTime<Utc>>,
        rollup: RollupGranularity,
    ) -> String {
        let local = time.with_timezone(&self.offset);
        if !rollup.is_sub_day() || index == 0 {
            return local.format(DATE_TIME_TICK).to_string();
        }
        match previous {
            Some(prev) if prev.with_timezone(&self.offset).date_naive() == local.date_naive() => {
                local.format(TIME_TICK).to_string()
            }
            _ => local.format(DATE_TIME_TICK).to_string(),
        }
    }

    pub fn tick_labels(&self, times: &[DateTime<Utc>], rollup: RollupGranularity) -> Vec<String> {
        times
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let previous = i.checked_sub(1).map(|p| times[p]);
                self.tick_label(i, *t, previous, rollup)
            })
            .collect()
    }

    pub fn title_label(&self, time: DateTime<Utc>) -> String {
        time.with_timezone(&self.offset).format(TITLE).to_string()
    }
}
