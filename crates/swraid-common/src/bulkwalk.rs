//! SNMP bulk walk transport backed by the net-snmp `snmpbulkwalk` tool.
//!
//! The tool is run with numeric output options (`-OenUt`) so every leaf is
//! printed as `<numeric-oid> = <TYPE>: <value>`, which [`parse_walk_output`]
//! turns back into typed [`Varbind`]s.
//!
//! # Example
//!
//! ```ignore
//! use swraid_common::{BulkWalker, SnmpTarget, Walker};
//!
//! let mut walker = BulkWalker::new(SnmpTarget {
//!     host: "10.0.0.1".to_string(),
//!     ..Default::default()
//! });
//! walker.walk(".1.3.6.1.4.1.2021.13.18.1.1.1", &mut |vb| {
//!     println!("{} = {:?}", vb.oid, vb.value);
//!     Ok(())
//! }).await?;
//! ```

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{SwRaidError, SwRaidResult};
use crate::shell::{self, SNMPBULKWALK_CMD};
use crate::walk::{exceptions, oid_in_subtree, SnmpValue, Varbind, Walker};

/// Default SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;

/// Default community string.
pub const DEFAULT_COMMUNITY: &str = "public";

/// Default agent host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default per-request timeout in seconds (suited to walking).
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default number of retries per request.
pub const DEFAULT_RETRIES: u32 = 5;

/// Start of a leaf line: `<oid> = <rest>`.
static LEAF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\.?\d+(?:\.\d+)*) = (.*)$").expect("Invalid regex pattern"));

/// Typed value: `<TYPE>: <text>`, text may span lines.
static TYPED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([A-Za-z][A-Za-z0-9-]*): ?(.*)$").expect("Invalid regex pattern"));

/// Symbolic enumeration form `name(n)`.
static ENUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((-?\d+)\)\s*$").expect("Invalid regex pattern"));

/// Address and credentials of the SNMP agent to walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnmpTarget {
    /// Agent host name or address.
    pub host: String,
    /// Agent UDP port.
    pub port: u16,
    /// SNMPv2c community string.
    pub community: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries per request.
    pub retries: u32,
    /// Path or name of the `snmpbulkwalk` program.
    pub program: String,
}

impl Default for SnmpTarget {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            community: DEFAULT_COMMUNITY.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
            program: SNMPBULKWALK_CMD.to_string(),
        }
    }
}

impl SnmpTarget {
    /// Returns the net-snmp agent specifier (`host:port`, `udp6:[addr]:port`).
    ///
    /// Any host containing `:` is an IPv6 address, bracketed or not.
    pub fn agent(&self) -> String {
        if !self.host.contains(':') {
            format!("{}:{}", self.host, self.port)
        } else if self.host.starts_with('[') {
            format!("udp6:{}:{}", self.host, self.port)
        } else {
            format!("udp6:[{}]:{}", self.host, self.port)
        }
    }

    /// Builds the argument vector for walking `subtree`.
    pub fn walk_args(&self, subtree: &str) -> Vec<String> {
        vec![
            "-v2c".to_string(),
            "-c".to_string(),
            self.community.clone(),
            "-t".to_string(),
            self.timeout_secs.to_string(),
            "-r".to_string(),
            self.retries.to_string(),
            "-OenUt".to_string(),
            self.agent(),
            subtree.to_string(),
        ]
    }
}

/// Walker that shells out to `snmpbulkwalk` once per subtree.
#[derive(Debug, Clone)]
pub struct BulkWalker {
    target: SnmpTarget,
}

impl BulkWalker {
    /// Creates a walker for the given agent.
    pub fn new(target: SnmpTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Walker for BulkWalker {
    #[instrument(skip(self, handler), fields(agent = %self.target.agent()))]
    async fn walk(
        &mut self,
        subtree: &str,
        handler: &mut (dyn for<'v> FnMut(&'v Varbind) -> SwRaidResult<()> + Send),
    ) -> SwRaidResult<()> {
        let args = self.target.walk_args(subtree);
        let result = shell::exec(&self.target.program, &args).await?;
        if !result.success() {
            return Err(SwRaidError::walk_failed(subtree, result.combined_output()));
        }

        let varbinds = parse_walk_output(&result.stdout)?;
        let mut delivered = 0usize;
        for varbind in &varbinds {
            if varbind.value.is_exception() {
                debug!("Walk of {} ended with {}", subtree, varbind.value.type_name());
                break;
            }
            if !oid_in_subtree(&varbind.oid, subtree) {
                debug!("Ignoring {} outside of {}", varbind.oid, subtree);
                continue;
            }
            handler(varbind)?;
            delivered += 1;
        }

        info!("Walked {}: {} leaves", subtree, delivered);
        Ok(())
    }
}

/// Parses `snmpbulkwalk -On` output into varbinds, in output order.
///
/// Lines that do not start a new leaf continue the previous leaf's value
/// (net-snmp wraps long strings over several lines).
pub fn parse_walk_output(output: &str) -> SwRaidResult<Vec<Varbind>> {
    // (line number, oid, raw value text)
    let mut entries: Vec<(usize, String, String)> = Vec::new();

    for (idx, line) in output.lines().enumerate() {
        let line_no = idx + 1;
        if let Some(caps) = LEAF_RE.captures(line) {
            entries.push((line_no, caps[1].to_string(), caps[2].to_string()));
        } else if let Some((_, _, text)) = entries.last_mut() {
            text.push('\n');
            text.push_str(line);
        } else if !line.trim().is_empty() {
            return Err(SwRaidError::output_parse(
                line_no,
                format!("expected '<oid> = <value>', got '{}'", line),
            ));
        }
    }

    entries
        .into_iter()
        .map(|(line_no, oid, text)| Ok(Varbind::new(oid, parse_value(line_no, &text)?)))
        .collect()
}

/// Interprets the right-hand side of a leaf line.
fn parse_value(line_no: usize, text: &str) -> SwRaidResult<SnmpValue> {
    let Some(caps) = TYPED_RE.captures(text) else {
        return Ok(parse_untyped(text));
    };
    let asn1_type = &caps[1];
    let body = caps.get(2).map_or("", |m| m.as_str());

    match asn1_type {
        "INTEGER" => parse_integer(line_no, body).map(SnmpValue::Integer),
        "STRING" => Ok(SnmpValue::OctetString(unquote(body).into_bytes())),
        "Hex-STRING" => parse_hex(line_no, body).map(SnmpValue::OctetString),
        _ => Ok(SnmpValue::other(asn1_type, body.trim())),
    }
}

fn parse_untyped(text: &str) -> SnmpValue {
    let trimmed = text.trim();
    if trimmed.starts_with('"') {
        SnmpValue::OctetString(unquote(trimmed).into_bytes())
    } else if trimmed.starts_with("No Such Object") {
        SnmpValue::other(exceptions::NO_SUCH_OBJECT, trimmed)
    } else if trimmed.starts_with("No Such Instance") {
        SnmpValue::other(exceptions::NO_SUCH_INSTANCE, trimmed)
    } else if trimmed.starts_with("No more variables") {
        SnmpValue::other(exceptions::END_OF_MIB_VIEW, trimmed)
    } else {
        SnmpValue::other("Unknown", trimmed)
    }
}

fn parse_integer(line_no: usize, body: &str) -> SwRaidResult<i64> {
    let body = body.trim();
    if let Ok(value) = body.parse::<i64>() {
        return Ok(value);
    }
    ENUM_RE
        .captures(body)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .ok_or_else(|| SwRaidError::output_parse(line_no, format!("invalid INTEGER '{}'", body)))
}

fn parse_hex(line_no: usize, body: &str) -> SwRaidResult<Vec<u8>> {
    body.split_whitespace()
        .map(|byte| {
            u8::from_str_radix(byte, 16).map_err(|_| {
                SwRaidError::output_parse(line_no, format!("invalid hex byte '{}'", byte))
            })
        })
        .collect()
}

/// Strips the surrounding quotes of a net-snmp string and undoes its
/// backslash escapes. Unquoted text is returned as is.
fn unquote(body: &str) -> String {
    let trimmed = body.trim_end();
    let inner = match trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return body.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}
