//! OID constants for the UCD-SNMP-MIB software RAID table.
//!
//! These match `swRaidTable` (`.1.3.6.1.4.1.2021.13.18.1`) as exported by
//! net-snmp's `ucd-snmp/swRaid` module.

/// `swRaidIndex`: integer row index.
pub const SW_RAID_INDEX: &str = ".1.3.6.1.4.1.2021.13.18.1.1.1";

/// `swRaidDevice`: md device name (e.g. "md0").
pub const SW_RAID_DEVICE: &str = ".1.3.6.1.4.1.2021.13.18.1.1.2";

/// `swRaidPersonality`: RAID level (e.g. "raid1").
pub const SW_RAID_PERSONALITY: &str = ".1.3.6.1.4.1.2021.13.18.1.1.3";

/// `swRaidUnits`: member devices (e.g. "sda1,sdb1").
pub const SW_RAID_UNITS: &str = ".1.3.6.1.4.1.2021.13.18.1.1.4";

/// `swRaidUnitCount`: number of member devices.
pub const SW_RAID_UNIT_COUNT: &str = ".1.3.6.1.4.1.2021.13.18.1.1.5";

/// `swRaidStatus`: array status.
pub const SW_RAID_STATUS: &str = ".1.3.6.1.4.1.2021.13.18.1.1.6";

/// `swRaidStatus` value of a healthy array.
pub const STATUS_ACTIVE: i64 = 2;

/// Data columns walked in the second phase, in output order.
pub const SW_RAID_COLUMNS: &[&str] = &[
    SW_RAID_DEVICE,
    SW_RAID_PERSONALITY,
    SW_RAID_UNITS,
    SW_RAID_UNIT_COUNT,
];
