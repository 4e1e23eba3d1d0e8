//! Mandatory-field checks and defaults, turning raw records into [`ReportInfo`] and
//! [`Entry`] values. Everything here is pure: the same records always give the same result.

use crate::error::{ReportError, ReportResult};
use crate::model::{Entry, PropertyValue, Record, ReportInfo};
use chrono::NaiveDate;
use tracing::debug;

pub const DATE_FIELD: &str = "Día";
pub const SHIFT_FIELD: &str = "Horario";
pub const COLLEAGUES_FIELD: &str = "Compañeros";
pub const COMMENTS_FIELD: &str = "Comentarios importantes";
pub const IMPRESSION_FIELD: &str = "Impresión";

pub const NAME_FIELD: &str = "Nombre";
pub const YARD_FIELD: &str = "Patio";
pub const STATE_FIELD: &str = "Estado";
pub const OBSERVATIONS_FIELD: &str = "Observaciones";
pub const IMPORTANT_FIELD: &str = "Importante";

fn lookup<'a, T: ?Sized + 'a>(
    record: &'a Record,
    field: &str,
    extract: impl Fn(&'a PropertyValue) -> Option<&'a T>,
) -> Option<&'a T> {
    record.property(field).and_then(extract)
}

fn text_or_default(record: &Record, field: &str) -> String {
    lookup(record, field, PropertyValue::first_text)
        .unwrap_or_default()
        .to_string()
}

fn required<'a>(value: Option<&'a str>, field: &str, record: &Record) -> ReportResult<&'a str> {
    value.ok_or_else(|| ReportError::missing(field, Some(&record.id)))
}

fn parse_date(text: &str, record: &Record) -> ReportResult<NaiveDate> {
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|err| {
        ReportError::validation(
            DATE_FIELD,
            Some(&record.id),
            format!("`{text}` is not a date: {err}"),
        )
    })
}

pub fn normalize_report_info(report: &Record, visits: &[Record]) -> ReportResult<ReportInfo> {
    let date_text = required(
        lookup(report, DATE_FIELD, PropertyValue::date_text),
        DATE_FIELD,
        report,
    )?;
    let date = parse_date(date_text, report)?;
    let shift = required(
        lookup(report, SHIFT_FIELD, PropertyValue::select_name),
        SHIFT_FIELD,
        report,
    )?;

    let mut colleagues: Vec<String> = Vec::new();
    if let Some(value) = report.property(COLLEAGUES_FIELD) {
        for name in value.multi_select_names() {
            if !colleagues.iter().any(|known| known == name) {
                colleagues.push(name.to_string());
            }
        }
    }

    let visits = visits
        .iter()
        .map(|visit| {
            required(
                lookup(visit, IMPRESSION_FIELD, PropertyValue::first_text),
                IMPRESSION_FIELD,
                visit,
            )
            .map(str::to_string)
        })
        .collect::<ReportResult<Vec<_>>>()?;

    debug!(
        target: "parte::normalize",
        report_id = %report.id,
        %date,
        shift,
        colleagues = colleagues.len(),
        visits = visits.len(),
        "report info normalized"
    );

    Ok(ReportInfo {
        date,
        shift: shift.to_string(),
        colleagues,
        comments: text_or_default(report, COMMENTS_FIELD),
        visits,
    })
}

pub fn normalize_entry(record: &Record) -> ReportResult<Entry> {
    let name = required(
        lookup(record, NAME_FIELD, PropertyValue::first_text),
        NAME_FIELD,
        record,
    )?;
    let yard = required(
        lookup(record, YARD_FIELD, PropertyValue::select_name),
        YARD_FIELD,
        record,
    )?;

    Ok(Entry {
        name: name.to_string(),
        yard: yard.to_string(),
        state: lookup(record, STATE_FIELD, PropertyValue::select_name)
            .unwrap_or_default()
            .to_string(),
        observations: text_or_default(record, OBSERVATIONS_FIELD),
        important: text_or_default(record, IMPORTANT_FIELD),
    })
}

/// Normalizes every record, stopping at the first invalid one.
pub fn normalize_entries(records: &[Record]) -> ReportResult<Vec<Entry>> {
    let entries = records
        .iter()
        .map(normalize_entry)
        .collect::<ReportResult<Vec<_>>>()?;
    debug!(target: "parte::normalize", entries = entries.len(), "entries normalized");
    Ok(entries)
}
