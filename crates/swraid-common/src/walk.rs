//! The walk capability consumed by the aggregation engine.
//!
//! A [`Walker`] enumerates every leaf under a subtree OID and hands each one
//! to a caller-supplied handler, strictly one at a time and in ascending OID
//! order, returning only after the subtree is exhausted.

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::bulkwalk::parse_walk_output;
use crate::error::SwRaidResult;

/// Type tag of a walked value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// ASN.1 INTEGER.
    Integer,
    /// ASN.1 OCTET STRING.
    OctetString,
    /// Any other SNMP type (counters, gauges, OIDs, exceptions, ...).
    Other,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => write!(f, "Integer"),
            ValueType::OctetString => write!(f, "OctetString"),
            ValueType::Other => write!(f, "Other"),
        }
    }
}

/// SNMP exception type names, reported as [`SnmpValue::Other`].
pub mod exceptions {
    pub const NO_SUCH_OBJECT: &str = "NoSuchObject";
    pub const NO_SUCH_INSTANCE: &str = "NoSuchInstance";
    pub const END_OF_MIB_VIEW: &str = "EndOfMibView";
}

/// Typed payload of a walked leaf.
///
/// Integers are held as 64-bit signed values. SNMP INTEGER is 32 bits on
/// the wire, and wider counters (Counter64) are reported as `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnmpValue {
    /// INTEGER payload.
    Integer(i64),
    /// OCTET STRING payload as raw bytes.
    OctetString(Vec<u8>),
    /// Any other type, kept as the transport's text rendering.
    Other {
        /// SNMP type name as reported by the transport (e.g. "Counter64").
        asn1_type: String,
        /// Text rendering of the value, possibly empty.
        text: String,
    },
}

impl SnmpValue {
    /// Returns the type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            SnmpValue::Integer(_) => ValueType::Integer,
            SnmpValue::OctetString(_) => ValueType::OctetString,
            SnmpValue::Other { .. } => ValueType::Other,
        }
    }

    /// Returns a descriptive type name, using the SNMP type for `Other`.
    pub fn type_name(&self) -> &str {
        match self {
            SnmpValue::Integer(_) => "Integer",
            SnmpValue::OctetString(_) => "OctetString",
            SnmpValue::Other { asn1_type, .. } => asn1_type,
        }
    }

    /// Returns true for SNMP exception values (noSuchObject, noSuchInstance,
    /// endOfMibView), which mark the end of a walk rather than a leaf.
    pub fn is_exception(&self) -> bool {
        match self {
            SnmpValue::Other { asn1_type, .. } => matches!(
                asn1_type.as_str(),
                exceptions::NO_SUCH_OBJECT
                    | exceptions::NO_SUCH_INSTANCE
                    | exceptions::END_OF_MIB_VIEW
            ),
            _ => false,
        }
    }

    /// Creates an OCTET STRING value from text.
    pub fn octet_string(s: impl Into<String>) -> Self {
        SnmpValue::OctetString(s.into().into_bytes())
    }

    /// Creates an `Other` value.
    pub fn other(asn1_type: impl Into<String>, text: impl Into<String>) -> Self {
        SnmpValue::Other {
            asn1_type: asn1_type.into(),
            text: text.into(),
        }
    }
}

/// One walked leaf: the OID and its typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Varbind {
    /// Numeric dotted OID, e.g. `.1.3.6.1.4.1.2021.13.18.1.1.6.1`.
    pub oid: String,
    /// The typed value.
    pub value: SnmpValue,
}

impl Varbind {
    /// Creates a new varbind.
    pub fn new(oid: impl Into<String>, value: SnmpValue) -> Self {
        Self {
            oid: oid.into(),
            value,
        }
    }

    /// Creates an INTEGER varbind.
    pub fn integer(oid: impl Into<String>, value: i64) -> Self {
        Self::new(oid, SnmpValue::Integer(value))
    }

    /// Creates an OCTET STRING varbind.
    pub fn octet_string(oid: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(oid, SnmpValue::octet_string(value))
    }
}

/// Callback-driven subtree enumeration.
#[async_trait]
pub trait Walker: Send {
    /// Walks `subtree`, invoking `handler` once per leaf in ascending OID
    /// order. The first handler error stops the walk and is returned.
    async fn walk(
        &mut self,
        subtree: &str,
        handler: &mut (dyn for<'v> FnMut(&'v Varbind) -> SwRaidResult<()> + Send),
    ) -> SwRaidResult<()>;
}

/// Returns `oid` without its leading dot.
///
/// net-snmp prints absolute OIDs as `.1.3.6...` but accepts `1.3.6...` on
/// input, so both spellings name the same node.
pub fn oid_body(oid: &str) -> &str {
    oid.strip_prefix('.').unwrap_or(oid)
}

/// Returns true if `oid` equals `subtree` or lies beneath it. A leading dot
/// on either side is ignored.
pub fn oid_in_subtree(oid: &str, subtree: &str) -> bool {
    let subtree = oid_body(subtree.trim_end_matches('.'));
    match oid_body(oid).strip_prefix(subtree) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Orders OIDs by their numeric components (`.1.10` sorts after `.1.9`).
///
/// Non-numeric components compare as text after all numeric ones.
pub fn compare_oids(a: &str, b: &str) -> Ordering {
    let parts = |oid: &str| -> Vec<String> {
        oid.split('.')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    };
    let (pa, pb) = (parts(a), parts(b));
    for (x, y) in pa.iter().zip(pb.iter()) {
        let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(nx), Ok(ny)) => nx.cmp(&ny),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    pa.len().cmp(&pb.len())
}

/// In-memory walker over a fixed set of leaves.
///
/// Used for tests and for replaying saved `snmpbulkwalk -On` output.
#[derive(Debug, Clone, Default)]
pub struct StaticWalker {
    varbinds: Vec<Varbind>,
}

impl StaticWalker {
    /// Creates a walker over the given leaves (any order).
    pub fn new(mut varbinds: Vec<Varbind>) -> Self {
        varbinds.sort_by(|a, b| compare_oids(&a.oid, &b.oid));
        Self { varbinds }
    }

    /// Creates a walker from saved net-snmp walk output.
    pub fn from_walk_output(output: &str) -> SwRaidResult<Self> {
        Ok(Self::new(parse_walk_output(output)?))
    }

    /// Returns the number of leaves held.
    pub fn len(&self) -> usize {
        self.varbinds.len()
    }

    /// Returns true if no leaves are held.
    pub fn is_empty(&self) -> bool {
        self.varbinds.is_empty()
    }
}

#[async_trait]
impl Walker for StaticWalker {
    #[instrument(skip(self, handler))]
    async fn walk(
        &mut self,
        subtree: &str,
        handler: &mut (dyn for<'v> FnMut(&'v Varbind) -> SwRaidResult<()> + Send),
    ) -> SwRaidResult<()> {
        let mut count = 0usize;
        for varbind in self
            .varbinds
            .iter()
            .filter(|vb| oid_in_subtree(&vb.oid, subtree))
        {
            if varbind.value.is_exception() {
                break;
            }
            handler(varbind)?;
            count += 1;
        }
        debug!("Walked {} leaves under {}", count, subtree);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwRaidError;

    #[test]
    fn test_value_type() {
        assert_eq!(SnmpValue::Integer(2).value_type(), ValueType::Integer);
        assert_eq!(
            SnmpValue::octet_string("md0").value_type(),
            ValueType::OctetString
        );
        assert_eq!(
            SnmpValue::other("Counter64", "1").value_type(),
            ValueType::Other
        );
        assert_eq!(SnmpValue::other("Gauge32", "7").type_name(), "Gauge32");
    }

    #[test]
    fn test_oid_in_subtree() {
        assert!(oid_in_subtree(".1.3.6.1.2", ".1.3.6"));
        assert!(oid_in_subtree(".1.3.6", ".1.3.6"));
        assert!(oid_in_subtree(".1.3.6.1", ".1.3.6."));
        assert!(!oid_in_subtree(".1.3.61", ".1.3.6"));
        assert!(!oid_in_subtree(".1.3", ".1.3.6"));
    }

    #[test]
    fn test_oid_in_subtree_ignores_leading_dot() {
        assert!(oid_in_subtree(
            ".1.3.6.1.4.1.2021.13.18.1.1.1.1",
            "1.3.6.1.4.1.2021.13.18.1.1.1"
        ));
        assert!(oid_in_subtree("1.3.6.1", ".1.3.6"));
        assert!(!oid_in_subtree(".1.3.61", "1.3.6"));
        assert_eq!(oid_body(".1.3.6"), "1.3.6");
        assert_eq!(oid_body("1.3.6"), "1.3.6");
    }

    #[test]
    fn test_compare_oids_numeric() {
        assert_eq!(compare_oids(".1.9", ".1.10"), Ordering::Less);
        assert_eq!(compare_oids(".1.10", ".1.9"), Ordering::Greater);
        assert_eq!(compare_oids(".1.2", ".1.2.1"), Ordering::Less);
        assert_eq!(compare_oids("1.2", ".1.2"), Ordering::Equal);
        assert_eq!(compare_oids("status.2", "status.10"), Ordering::Less);
    }

    #[tokio::test]
    async fn test_static_walker_filters_and_orders() {
        let mut walker = StaticWalker::new(vec![
            Varbind::integer(".1.3.6.10", 10),
            Varbind::integer(".1.3.7.1", 99),
            Varbind::integer(".1.3.6.2", 2),
            Varbind::integer(".1.3.60.1", 60),
        ]);
        assert_eq!(walker.len(), 4);

        let mut seen = Vec::new();
        walker
            .walk(".1.3.6", &mut |vb: &Varbind| {
                seen.push(vb.oid.clone());
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(seen, vec![".1.3.6.2".to_string(), ".1.3.6.10".to_string()]);
    }

    #[tokio::test]
    async fn test_static_walker_stops_on_handler_error() {
        let mut walker = StaticWalker::new(vec![
            Varbind::integer(".1.1", 1),
            Varbind::integer(".1.2", 2),
        ]);

        let mut calls = 0;
        let result = walker
            .walk(".1", &mut |_vb: &Varbind| {
                calls += 1;
                Err(SwRaidError::internal("stop"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
