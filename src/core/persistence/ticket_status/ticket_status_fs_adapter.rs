use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::core::persistence::storage_path::ticket_status_month_file;

use super::ticket_status_entity::TicketStatusEntity;

const HEADER: &str =
    "TIME|NOT_PROCESSED|WAITING_CUSTOMER_SERVICE|WAITING_CUSTOMER|PRE_FULFILLED|FULFILLED|CLOSED";

pub trait TicketStatusFsAdapterTrait: Send + Sync {
    fn append_row(&self, row: &TicketStatusEntity) -> Result<()>;

    /// Rows with `start <= date <= end`, in file order.
    fn get_row_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<TicketStatusEntity>>;
}

/// Pipe-delimited snapshot rows, partitioned by month of the snapshot time.
#[derive(Debug, Clone)]
pub struct TicketStatusFsAdapter {
    root: PathBuf,
}

impl TicketStatusFsAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn build_path_for(&self, date: NaiveDate) -> PathBuf {
        let month_str = date.format("%Y-%m").to_string();
        ticket_status_month_file(&self.root, &month_str)
    }

    fn parse_line(line: &str) -> Option<TicketStatusEntity> {
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() != 7 {
            return None;
        }

        Some(TicketStatusEntity {
            date: parts[0].parse::<DateTime<Utc>>().ok()?,
            not_processed: parts[1].parse().ok()?,
            waiting_customer_service: parts[2].parse().ok()?,
            waiting_customer: parts[3].parse().ok()?,
            pre_fulfilled: parts[4].parse().ok()?,
            fulfilled: parts[5].parse().ok()?,
            closed: parts[6].parse().ok()?,
        })
    }

    fn read_file(path: &Path, start: DateTime<Utc>, end: DateTime<Utc>, out: &mut Vec<TicketStatusEntity>) -> Result<()> {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let reader = BufReader::new(file);

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line == HEADER {
                continue;
            }
            match Self::parse_line(line) {
                Some(row) if row.date >= start && row.date <= end => out.push(row),
                Some(_) => {}
                None => tracing::warn!("Skipping malformed row {} in {:?}", idx + 1, path),
            }
        }
        Ok(())
    }
}

impl TicketStatusFsAdapterTrait for TicketStatusFsAdapter {
    fn append_row(&self, row: &TicketStatusEntity) -> Result<()> {
        // partition by the snapshot time, not by "now"
        let path = self.build_path_for(row.date.date_naive());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create ticket status directory")?;
        }

        let new = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);

        if new {
            writeln!(writer, "{}", HEADER)?;
        }
        writeln!(
            writer,
            "{}|{}|{}|{}|{}|{}|{}",
            row.date.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            row.not_processed,
            row.waiting_customer_service,
            row.waiting_customer,
            row.pre_fulfilled,
            row.fulfilled,
            row.closed,
        )?;

        writer.flush()?;
        Ok(())
    }

    fn get_row_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<TicketStatusEntity>> {
        let mut rows = Vec::new();
        if start > end {
            return Ok(rows);
        }

        let first_month = NaiveDate::from_ymd_opt(start.year(), start.month(), 1)
            .ok_or_else(|| anyhow!("Invalid start month {}-{}", start.year(), start.month()))?;
        let last_month = NaiveDate::from_ymd_opt(end.year(), end.month(), 1)
            .ok_or_else(|| anyhow!("Invalid end month {}-{}", end.year(), end.month()))?;

        let mut month = first_month;
        while month <= last_month {
            let path = self.build_path_for(month);
            if path.exists() {
                Self::read_file(&path, start, end, &mut rows)?;
            }
            month = month
                .checked_add_months(Months::new(1))
                .ok_or_else(|| anyhow!("Month overflow after {}", month))?;
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("ticket-stats-test-{}", uuid::Uuid::new_v4()))
    }

    fn row(y: i32, m: u32, d: u32, not_processed: u64) -> TicketStatusEntity {
        TicketStatusEntity {
            not_processed,
            ..TicketStatusEntity::empty(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
        }
    }

    #[test]
    fn rows_round_trip_across_month_files() {
        let root = temp_root();
        let adapter = TicketStatusFsAdapter::new(&root);
        for r in [row(2024, 1, 31, 1), row(2024, 2, 1, 2), row(2024, 3, 15, 3)] {
            adapter.append_row(&r).unwrap();
        }
        assert!(root.join("ticket_status/2024-02.rcd").exists());

        let all = adapter
            .get_row_between(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap(),
            )
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1], row(2024, 2, 1, 2));

        let bounded = adapter
            .get_row_between(row(2024, 2, 1, 0).date, row(2024, 3, 15, 0).date)
            .unwrap();
        assert_eq!(bounded.iter().map(|r| r.not_processed).collect::<Vec<_>>(), vec![2, 3]);

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn missing_files_and_malformed_lines_are_skipped() {
        let root = temp_root();
        let adapter = TicketStatusFsAdapter::new(&root);
        adapter.append_row(&row(2024, 5, 2, 9)).unwrap();

        let path = root.join("ticket_status/2024-05.rcd");
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, "not|a|row").unwrap();

        let rows = adapter
            .get_row_between(
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap(),
            )
            .unwrap();
        assert_eq!(rows, vec![row(2024, 5, 2, 9)]);

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn reversed_range_is_empty() {
        let adapter = TicketStatusFsAdapter::new(temp_root());
        let rows = adapter
            .get_row_between(row(2024, 5, 2, 0).date, row(2024, 5, 1, 0).date)
            .unwrap();
        assert!(rows.is_empty());
    }
}
