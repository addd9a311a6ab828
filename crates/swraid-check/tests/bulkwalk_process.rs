//! Drives `BulkWalker` against stand-in `snmpbulkwalk` programs.
//!
//! Every script is written before anything is spawned so no child can
//! inherit a script file that is still open for writing.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use swraid_check::{run_check, CollectorConfig, SwRaidCollector};
use swraid_common::{BulkWalker, SnmpTarget, SwRaidError};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn target(program: &Path) -> SnmpTarget {
    SnmpTarget {
        program: program.display().to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_bulkwalk_programs() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/swraid_walk.txt");

    // Prints the whole table for every subtree; the walker keeps only the
    // leaves under the requested one.
    let table = write_script(dir.path(), "table", &format!("cat '{}'", fixture.display()));
    let timeout = write_script(
        dir.path(),
        "timeout",
        "echo 'Timeout: No Response from 127.0.0.1:161' >&2\nexit 1",
    );
    let no_such_object = write_script(
        dir.path(),
        "no-such-object",
        "echo '.1.3.6.1.4.1.2021.13.18.1.1.1 = No Such Object available on this agent at this OID'",
    );

    // Full table
    let mut walker = BulkWalker::new(target(&table));
    let mut collector = SwRaidCollector::new(CollectorConfig::default()).unwrap();
    let report = run_check(&mut walker, &mut collector).await.unwrap();
    assert!(!report.healthy);
    assert_eq!(
        report.summary,
        "FAIL md0, raid1, sda1[0] sdb1[1], 2, 2; md1, raid5, sdc1[0] sdd1[1] sde1[2](F), 3, 4"
    );

    // Table OIDs configured without the leading dot net-snmp prints
    let undotted = CollectorConfig::default();
    let undotted = CollectorConfig {
        index_oid: undotted.index_oid.trim_start_matches('.').to_string(),
        column_oids: undotted
            .column_oids
            .iter()
            .map(|oid| oid.trim_start_matches('.').to_string())
            .collect(),
        status_oid: undotted.status_oid.trim_start_matches('.').to_string(),
    };
    let mut walker = BulkWalker::new(target(&table));
    let mut collector = SwRaidCollector::new(undotted).unwrap();
    let undotted_report = run_check(&mut walker, &mut collector).await.unwrap();
    assert!(!undotted_report.healthy);
    assert_eq!(undotted_report.summary, report.summary);

    // Agent does not answer
    let mut walker = BulkWalker::new(target(&timeout));
    let mut collector = SwRaidCollector::new(CollectorConfig::default()).unwrap();
    let err = run_check(&mut walker, &mut collector).await.unwrap_err();
    assert!(err.is_retryable());
    match err {
        SwRaidError::WalkFailed { subtree, message } => {
            assert_eq!(subtree, ".1.3.6.1.4.1.2021.13.18.1.1.1");
            assert!(message.contains("Timeout"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // Agent without the table
    let mut walker = BulkWalker::new(target(&no_such_object));
    let mut collector = SwRaidCollector::new(CollectorConfig::default()).unwrap();
    let report = run_check(&mut walker, &mut collector).await.unwrap();
    assert!(report.healthy);
    assert_eq!(report.summary, "OK");

    // Program missing altogether
    let mut walker = BulkWalker::new(target(&dir.path().join("missing")));
    let mut collector = SwRaidCollector::new(CollectorConfig::default()).unwrap();
    let err = run_check(&mut walker, &mut collector).await.unwrap_err();
    assert!(matches!(err, SwRaidError::ProcessSpawn { .. }));
}
