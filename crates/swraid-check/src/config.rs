//! YAML configuration file for swraid-check.
//!
//! File format (every key is optional):
//!
//! ```yaml
//! snmp:
//!   host: 10.0.0.5
//!   port: 161
//!   community: monitoring
//!   timeout_secs: 5
//!   retries: 5
//!   program: /usr/bin/snmpbulkwalk
//! table:
//!   index_oid: .1.3.6.1.4.1.2021.13.18.1.1.1
//!   column_oids:
//!     - .1.3.6.1.4.1.2021.13.18.1.1.2
//!   status_oid: .1.3.6.1.4.1.2021.13.18.1.1.6
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use swraid_common::{SnmpTarget, SwRaidError, SwRaidResult};

use crate::collector::CollectorConfig;

/// Complete check configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Agent to walk.
    pub snmp: SnmpTarget,
    /// Table addressing.
    pub table: CollectorConfig,
}

impl CheckConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml(text: &str) -> SwRaidResult<Self> {
        let config: CheckConfig = serde_yaml::from_str(text)
            .map_err(|e| SwRaidError::invalid_config("config", e.to_string()))?;
        config.table.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> SwRaidResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SwRaidError::io(path.display().to_string(), e))?;
        let config = Self::from_yaml(&text)?;
        info!(
            "Loaded configuration from {}: agent {}, {} columns",
            path.display(),
            config.snmp.agent(),
            config.table.column_oids.len()
        );
        Ok(config)
    }
}
