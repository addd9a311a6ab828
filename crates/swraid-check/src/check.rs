//! Two-phase walk driver.

use tracing::{info, instrument};

use swraid_common::{SwRaidResult, Varbind, Walker};

use crate::collector::SwRaidCollector;
use crate::report::Report;

/// Walks the index subtree, then every column and the status column, and
/// returns the report.
///
/// The first walk or ingestion error aborts the run. Rows ingested before
/// the error remain in `collector`.
#[instrument(skip(walker, collector), fields(index = %collector.index_oid()))]
pub async fn run_check<W>(walker: &mut W, collector: &mut SwRaidCollector) -> SwRaidResult<Report>
where
    W: Walker + ?Sized,
{
    let index_oid = collector.index_oid().to_string();
    walker
        .walk(&index_oid, &mut |vb: &Varbind| collector.collect_index(vb))
        .await?;
    info!("Index walk complete: {} rows", collector.rows().len());

    for oid in collector.walk_oids() {
        walker
            .walk(&oid, &mut |vb: &Varbind| collector.collect_value(vb))
            .await?;
    }

    let report = collector.report();
    info!("Check complete: healthy={}, {} rows", report.healthy, report.rows.len());
    Ok(report)
}
