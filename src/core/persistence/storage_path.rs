//! On-disk layout of the stats data directory.

use std::path::{Path, PathBuf};

pub fn ticket_status_dir(root: &Path) -> PathBuf {
    root.join("ticket_status")
}

/// One file per calendar month (UTC), e.g. `ticket_status/2024-06.rcd`.
pub fn ticket_status_month_file(root: &Path, month: &str) -> PathBuf {
    ticket_status_dir(root).join(format!("{}.rcd", month))
}
