use crate::client::RemoteStore;
use crate::config::Config;
use crate::error::ReportResult;
use crate::locator::{find_report_by_date, find_sub_database_and_fetch};
use crate::model::{Entry, EntryRow, ReportInfo};
use crate::normalize::{normalize_entries, normalize_report_info};
use crate::render::render;
use chrono::NaiveDate;
use csv::Writer;
use std::fmt;
use std::path::Path;
use tracing::info;

pub const STATUS_LEFT: &str = "Baja";
pub const STATUS_ADOPTED: &str = "Adoptado";
pub const STATUS_FOSTERED: &str = "Acogida";

/// One day's report: its header data, the entries in source order and who was on shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub info: ReportInfo,
    pub entries: Vec<Entry>,
    pub participants: Vec<String>,
}

impl Report {
    pub fn new(info: ReportInfo, entries: Vec<Entry>, author: &str) -> Self {
        let mut participants: Vec<String> = info
            .colleagues
            .iter()
            .filter(|name| name.as_str() != author)
            .cloned()
            .collect();
        participants.push(author.to_string());
        Self {
            info,
            entries,
            participants,
        }
    }

    pub fn count_by_status(&self, status: &str) -> usize {
        self.entries.iter().filter(|e| e.state == status).count()
    }

    /// Entries grouped by yard, yards in order of first appearance.
    pub fn group_by_category(&self) -> Vec<(&str, Vec<&Entry>)> {
        let mut groups: Vec<(&str, Vec<&Entry>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter().position(|(yard, _)| *yard == entry.yard) {
                Some(index) => groups[index].1.push(entry),
                None => groups.push((entry.yard.as_str(), vec![entry])),
            }
        }
        groups
    }

    pub fn entries_with_important_note(&self) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| !e.important.is_empty())
            .collect()
    }

    pub fn entries_with_observations<'a>(group: &[&'a Entry]) -> Vec<&'a Entry> {
        group
            .iter()
            .copied()
            .filter(|e| !e.observations.is_empty())
            .collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} - {}: {})",
            self.info.date.format("%Y.%m.%d"),
            self.info.shift,
            self.participants.join(", ")
        )
    }
}

/// Locates the report written on `date`, normalizes it and builds the [`Report`].
pub fn obtain_report<S: RemoteStore + ?Sized>(
    store: &S,
    config: &Config,
    date: NaiveDate,
) -> ReportResult<Report> {
    let record = find_report_by_date(store, &config.database_id, date)?;
    let content = find_sub_database_and_fetch(store, &record.id)?;
    let info = normalize_report_info(&record, &content.visits)?;
    let entries = normalize_entries(&content.entries)?;
    Ok(Report::new(info, entries, &config.author))
}

/// Full retrieval-and-render cycle for one date.
pub fn generate_report<S: RemoteStore + ?Sized>(
    store: &S,
    config: &Config,
    date: NaiveDate,
) -> ReportResult<String> {
    let report = obtain_report(store, config, date)?;
    let text = render(&report)?;
    info!(
        target: "parte::report",
        %report,
        entries = report.entries.len(),
        bytes = text.len(),
        "report rendered"
    );
    Ok(text)
}

pub fn export_entries_csv<P: AsRef<Path>>(entries: &[Entry], path: P) -> ReportResult<()> {
    let mut wtr = Writer::from_path(path.as_ref())?;
    for entry in entries {
        wtr.serialize(EntryRow::from(entry))?;
    }
    wtr.flush()?;
    info!(
        target: "parte::report",
        path = %path.as_ref().display(),
        rows = entries.len(),
        "entries exported"
    );
    Ok(())
}
