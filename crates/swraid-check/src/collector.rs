//! SwRaidCollector - aggregates walked swRaidTable leaves into rows.
//!
//! The table is read in two phases. The index walk materializes one empty
//! row per `swRaidIndex` leaf; the column walks then append every value to
//! the row named by the OID's trailing index and, for the status column,
//! decide the row's health.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use swraid_common::{oid_body, SnmpValue, SwRaidError, SwRaidResult, Varbind};

use crate::oids;
use crate::report::Report;
use crate::row_table::{Row, RowTable};
use crate::value::Value;

/// Trailing row index: digits after the final dot.
const ROW_INDEX_PATTERN: &str = r"\.(\d+)$";

/// Addressing of the table being aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Subtree walked first; each leaf is one row index.
    pub index_oid: String,
    /// Data columns walked second, in order.
    pub column_oids: Vec<String>,
    /// Status column, walked after the data columns.
    pub status_oid: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            index_oid: oids::SW_RAID_INDEX.to_string(),
            column_oids: oids::SW_RAID_COLUMNS.iter().map(|s| s.to_string()).collect(),
            status_oid: oids::SW_RAID_STATUS.to_string(),
        }
    }
}

impl CollectorConfig {
    /// Checks that the required OIDs are present.
    pub fn validate(&self) -> SwRaidResult<()> {
        if self.index_oid.trim().is_empty() {
            return Err(SwRaidError::invalid_config("index_oid", "must not be empty"));
        }
        if self.status_oid.trim().is_empty() {
            return Err(SwRaidError::invalid_config("status_oid", "must not be empty"));
        }
        if let Some(pos) = self.column_oids.iter().position(|oid| oid.trim().is_empty()) {
            return Err(SwRaidError::invalid_config(
                format!("column_oids[{}]", pos),
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Row aggregator for one check run.
///
/// Ingestion is strictly sequential: a walker calls [`collect_index`] or
/// [`collect_value`] once per leaf and never concurrently.
///
/// [`collect_index`]: SwRaidCollector::collect_index
/// [`collect_value`]: SwRaidCollector::collect_value
#[derive(Debug)]
pub struct SwRaidCollector {
    config: CollectorConfig,
    row_index_re: Regex,
    rows: RowTable,
}

impl SwRaidCollector {
    /// Creates a collector for the given table addressing.
    pub fn new(config: CollectorConfig) -> SwRaidResult<Self> {
        config.validate()?;
        let row_index_re = Regex::new(ROW_INDEX_PATTERN)
            .map_err(|e| SwRaidError::internal(format!("row index pattern: {}", e)))?;

        Ok(Self {
            config,
            row_index_re,
            rows: RowTable::new(),
        })
    }

    /// Returns the index subtree OID.
    pub fn index_oid(&self) -> &str {
        &self.config.index_oid
    }

    /// Returns the data column OIDs.
    pub fn column_oids(&self) -> &[String] {
        &self.config.column_oids
    }

    /// Returns the status column OID.
    pub fn status_oid(&self) -> &str {
        &self.config.status_oid
    }

    /// Returns the second-phase walk order: data columns, then status.
    pub fn walk_oids(&self) -> Vec<String> {
        let mut oids = self.config.column_oids.clone();
        oids.push(self.config.status_oid.clone());
        oids
    }

    /// Handles one leaf of the index walk.
    ///
    /// An INTEGER leaf creates (or resets) the row with that index. Any
    /// other type fails with `UnsupportedIndexType` and changes nothing.
    #[instrument(level = "debug", skip(self, varbind), fields(oid = %varbind.oid))]
    pub fn collect_index(&mut self, varbind: &Varbind) -> SwRaidResult<()> {
        match varbind.value {
            SnmpValue::Integer(index) => {
                debug!("collect index: {} = {}", varbind.oid, index);
                if self.rows.insert(Row::new(index)).is_some() {
                    debug!("Row {} seen twice in the index walk, reset", index);
                }
                Ok(())
            }
            _ => {
                let err = SwRaidError::UnsupportedIndexType {
                    oid: varbind.oid.clone(),
                    value_type: varbind.value.type_name().to_string(),
                };
                warn!("{}", err);
                Err(err)
            }
        }
    }

    /// Handles one leaf of a column walk.
    ///
    /// Leaves without a trailing `.<digits>` are ignored. Otherwise the
    /// value is appended to its row, creating the row if the index walk
    /// never reported it. A leaf at `<status_oid>.<index>` sets the row's
    /// health: true for INTEGER 2, false for anything else.
    #[instrument(level = "debug", skip(self, varbind), fields(oid = %varbind.oid))]
    pub fn collect_value(&mut self, varbind: &Varbind) -> SwRaidResult<()> {
        let Some(suffix) = self
            .row_index_re
            .captures(&varbind.oid)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            debug!("No row index in {}, skipped", varbind.oid);
            return Ok(());
        };

        let index = suffix
            .parse::<i64>()
            .map_err(|source| SwRaidError::IndexParse {
                oid: varbind.oid.clone(),
                suffix: suffix.to_string(),
                source,
            })?;

        let is_status = is_status_leaf(&varbind.oid, &self.config.status_oid, suffix);

        let (row, created) = self.rows.get_or_create(index);
        if created {
            debug!("Row {} not seen in the index walk, created", index);
        }
        row.values.push(Value::from(varbind));
        if is_status {
            row.healthy = matches!(varbind.value, SnmpValue::Integer(oids::STATUS_ACTIVE));
            debug!("Row {} status {:?} -> healthy={}", index, varbind.value, row.healthy);
        }

        debug!("collect value: {} -> row {}", varbind.oid, index);
        Ok(())
    }

    /// Returns all rows sorted ascending by index.
    pub fn rows(&self) -> Vec<&Row> {
        self.rows.sorted()
    }

    /// Returns true iff every row is healthy; true when there are no rows.
    pub fn is_healthy(&self) -> bool {
        self.rows.iter().all(|row| row.healthy)
    }

    /// Builds the report from the current rows.
    pub fn report(&self) -> Report {
        Report::new(&self.rows(), self.is_healthy())
    }
}

/// True when `oid` is exactly `<status_oid>.<suffix>`, ignoring a leading
/// dot on either OID.
fn is_status_leaf(oid: &str, status_oid: &str, suffix: &str) -> bool {
    oid_body(oid)
        .strip_prefix(oid_body(status_oid))
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| rest == suffix)
}
