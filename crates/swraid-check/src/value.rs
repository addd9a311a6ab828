//! Walked values as stored in a row.

use std::fmt;

use swraid_common::{SnmpValue, ValueType, Varbind};

/// An immutable typed datum taken from one walked leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    oid: String,
    data: SnmpValue,
}

impl Value {
    /// Creates a value from its source OID and payload.
    pub fn new(oid: impl Into<String>, data: SnmpValue) -> Self {
        Self {
            oid: oid.into(),
            data,
        }
    }

    /// Returns the OID the value was read from.
    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Returns the type tag.
    pub fn type_tag(&self) -> ValueType {
        self.data.value_type()
    }

    /// Returns the payload.
    pub fn data(&self) -> &SnmpValue {
        &self.data
    }
}

impl From<&Varbind> for Value {
    fn from(varbind: &Varbind) -> Self {
        Self::new(varbind.oid.clone(), varbind.value.clone())
    }
}

/// Renders the payload:
/// - Integer: decimal
/// - OctetString: the bytes as text, unescaped (invalid UTF-8 becomes U+FFFD)
/// - Other: the transport's text, or the type name when that is empty
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            SnmpValue::Integer(n) => write!(f, "{}", n),
            SnmpValue::OctetString(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            SnmpValue::Other { asn1_type, text } => {
                if !text.is_empty() {
                    f.write_str(text)
                } else if asn1_type.is_empty() {
                    write!(f, "{}", ValueType::Other)
                } else {
                    f.write_str(asn1_type)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_integer() {
        let value = Value::new(".1.6.1", SnmpValue::Integer(-42));
        assert_eq!(value.to_string(), "-42");
        assert_eq!(value.type_tag(), ValueType::Integer);

        let wide = Value::new(".1.6.1", SnmpValue::Integer(i64::MAX));
        assert_eq!(wide.to_string(), "9223372036854775807");
    }

    #[test]
    fn test_render_octet_string_verbatim() {
        let value = Value::new(".1.4.1", SnmpValue::octet_string("sda1,sdb1 \"x\"\n"));
        assert_eq!(value.to_string(), "sda1,sdb1 \"x\"\n");
        assert_eq!(value.type_tag(), ValueType::OctetString);
    }

    #[test]
    fn test_render_invalid_utf8() {
        let value = Value::new(".1.4.1", SnmpValue::OctetString(vec![b'm', b'd', 0xff]));
        assert_eq!(value.to_string(), "md\u{fffd}");
    }

    #[test]
    fn test_render_other() {
        let gauge = Value::new(".1.5.1", SnmpValue::other("Gauge32", "2"));
        assert_eq!(gauge.to_string(), "2");
        assert_eq!(gauge.type_tag(), ValueType::Other);

        let empty = Value::new(".1.5.1", SnmpValue::other("Opaque", ""));
        assert_eq!(empty.to_string(), "Opaque");
    }

    #[test]
    fn test_from_varbind() {
        let varbind = Varbind::octet_string(".1.2.3", "md0");
        let value = Value::from(&varbind);
        assert_eq!(value.oid(), ".1.2.3");
        assert_eq!(value.data(), &SnmpValue::octet_string("md0"));
    }
}
