//! Software RAID status check over SNMP.
//!
//! This crate reads the UCD-SNMP-MIB `swRaidTable` of a remote host and
//! renders a single status line, `OK` or `FAIL` followed by one group of
//! values per md array.
//!
//! # Walk phases
//!
//! | Phase | Subtree | Handler |
//! |-------|---------|---------|
//! | 1 | `swRaidIndex` | [`SwRaidCollector::collect_index`] |
//! | 2 | `swRaidDevice` .. `swRaidUnitCount` | [`SwRaidCollector::collect_value`] |
//! | 2 | `swRaidStatus` | [`SwRaidCollector::collect_value`] (sets row health) |
//!
//! # Example
//!
//! ```ignore
//! use swraid_check::{run_check, CollectorConfig, SwRaidCollector};
//! use swraid_common::{BulkWalker, SnmpTarget};
//!
//! let mut walker = BulkWalker::new(SnmpTarget::default());
//! let mut collector = SwRaidCollector::new(CollectorConfig::default())?;
//! let report = run_check(&mut walker, &mut collector).await?;
//! println!("{}", report);
//! ```

mod check;
mod collector;
mod config;
mod report;
mod row_table;
mod value;

pub mod oids;

pub use check::run_check;
pub use collector::{CollectorConfig, SwRaidCollector};
pub use config::CheckConfig;
pub use report::{format_summary, Report, RowReport, STATUS_FAIL, STATUS_OK};
pub use row_table::{Row, RowTable};
pub use value::Value;
