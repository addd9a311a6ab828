//! Status line and report rendering.
//!
//! The summary line is `OK` or `FAIL`, followed (when rows exist) by one
//! space and the rows in ascending index order. Values within a row are
//! joined with `", "` in arrival order; rows are joined with `"; "`.
//!
//! ```text
//! OK md0, raid1, sda1,sdb1, 2, 2; md1, raid5, sdc1,sdd1,sde1, 3, 2
//! ```

use std::fmt;

use serde::Serialize;

use crate::row_table::Row;

/// Prefix for a healthy report.
pub const STATUS_OK: &str = "OK";

/// Prefix for an unhealthy report.
pub const STATUS_FAIL: &str = "FAIL";

/// Formats the summary line for `rows` (must already be index-sorted).
pub fn format_summary(rows: &[&Row], healthy: bool) -> String {
    let prefix = if healthy { STATUS_OK } else { STATUS_FAIL };
    if rows.is_empty() {
        return prefix.to_string();
    }

    let body = rows
        .iter()
        .map(|row| row.rendered_values().join(", "))
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} {}", prefix, body)
}

/// Rendered form of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    /// Table index.
    pub index: i64,
    /// Row health.
    pub healthy: bool,
    /// Rendered values in arrival order.
    pub values: Vec<String>,
}

impl From<&Row> for RowReport {
    fn from(row: &Row) -> Self {
        Self {
            index: row.index,
            healthy: row.healthy,
            values: row.rendered_values(),
        }
    }
}

/// Final result of one check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// True iff every row is healthy (vacuously true with no rows).
    pub healthy: bool,
    /// The status line.
    pub summary: String,
    /// Rows in ascending index order.
    pub rows: Vec<RowReport>,
}

impl Report {
    /// Builds the report for index-sorted `rows`.
    pub fn new(rows: &[&Row], healthy: bool) -> Self {
        Self {
            healthy,
            summary: format_summary(rows, healthy),
            rows: rows.iter().map(|row| RowReport::from(*row)).collect(),
        }
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}
