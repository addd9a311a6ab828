//! SNMP walk plumbing shared by the swraid-check tools.
//!
//! This crate provides everything between the aggregation engine and the
//! SNMP agent:
//!
//! - [`Walker`]: callback-driven subtree enumeration, one leaf at a time
//! - [`BulkWalker`]: a walker that runs net-snmp's `snmpbulkwalk`
//! - [`StaticWalker`]: an in-memory walker for tests and replayed output
//! - [`shell`]: external program execution
//! - [`error`]: the error type shared with the engine
//!
//! # Example
//!
//! ```ignore
//! use swraid_common::{StaticWalker, Varbind, Walker};
//!
//! let mut walker = StaticWalker::new(vec![Varbind::integer(".1.3.6.1.1", 1)]);
//! walker.walk(".1.3.6.1", &mut |vb: &Varbind| {
//!     println!("{}", vb.oid);
//!     Ok(())
//! }).await?;
//! ```

pub mod bulkwalk;
pub mod error;
pub mod shell;
pub mod walk;

// Re-export commonly used items at crate root
pub use bulkwalk::{parse_walk_output, BulkWalker, SnmpTarget};
pub use error::{SwRaidError, SwRaidResult};
pub use walk::{
    compare_oids, exceptions, oid_body, oid_in_subtree, SnmpValue, StaticWalker, ValueType, Varbind, Walker,
};
