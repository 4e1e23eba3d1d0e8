use crate::client::RemoteStore;
use crate::error::{ReportError, ReportResult};
use crate::model::{Record, ReportContent};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Select property telling visits apart from the animals' entries.
pub const KIND_PROPERTY: &str = "Tipo";
pub const VISIT_KIND: &str = "Visita";

pub fn find_report_by_date<S: RemoteStore + ?Sized>(
    store: &S,
    database_id: &str,
    date: NaiveDate,
) -> ReportResult<Record> {
    let mut reports = store.query_by_date(database_id, date)?;
    match reports.len() {
        0 => Err(ReportError::not_found(date)),
        1 => {
            let report = reports.remove(0);
            info!(target: "parte::locator", %date, report_id = %report.id, "report located");
            Ok(report)
        }
        count => Err(ReportError::ambiguous(date, count)),
    }
}

pub fn find_sub_database_and_fetch<S: RemoteStore + ?Sized>(
    store: &S,
    report_id: &str,
) -> ReportResult<ReportContent> {
    let children = store.fetch_children(report_id)?;
    let databases: Vec<_> = children
        .iter()
        .filter(|block| block.is_child_database())
        .collect();
    let database = match databases.as_slice() {
        [database] => *database,
        other => return Err(ReportError::malformed(report_id, other.len())),
    };

    let records = store.query_all(&database.id)?;
    let content = partition(records);
    info!(
        target: "parte::locator",
        %report_id,
        database_id = %database.id,
        visits = content.visits.len(),
        entries = content.entries.len(),
        "nested database fetched"
    );
    Ok(content)
}

fn is_visit(record: &Record) -> bool {
    record
        .property(KIND_PROPERTY)
        .and_then(|value| value.select_name())
        == Some(VISIT_KIND)
}

fn partition(records: Vec<Record>) -> ReportContent {
    let (visits, entries): (Vec<_>, Vec<_>) = records.into_iter().partition(is_visit);
    debug!(target: "parte::locator", visits = visits.len(), entries = entries.len(), "records partitioned");
    ReportContent { visits, entries }
}
