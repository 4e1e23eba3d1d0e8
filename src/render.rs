use crate::error::{ReportError, ReportResult};
use crate::report::{Report, STATUS_ADOPTED, STATUS_FOSTERED, STATUS_LEFT};
use std::str::FromStr;

pub const LINE_WIDTH: usize = 100;
const INDENT: &str = "    ";
/// New intakes are not derived from the data yet.
const NEW_INTAKES_MARKER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Morning,
    Afternoon,
}

impl Shift {
    /// Clock-in and clock-out times.
    pub fn hours(self) -> (&'static str, &'static str) {
        match self {
            Shift::Morning => ("08:00", "15:00"),
            Shift::Afternoon => ("15:00", "22:00"),
        }
    }
}

impl FromStr for Shift {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mañana" => Ok(Shift::Morning),
            "Tarde" => Ok(Shift::Afternoon),
            other => Err(ReportError::config(format!("unknown shift `{other}`"))),
        }
    }
}

/// Greedy word wrap; every produced line starts with `indent`.
fn wrap(text: &str, indent: &str, width: usize) -> Vec<String> {
    let indent_len = indent.chars().count();
    let mut lines = Vec::new();
    for paragraph in text.lines().filter(|p| !p.trim().is_empty()) {
        let mut line = indent.to_string();
        let mut len = indent_len;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if len > indent_len && len + 1 + word_len > width {
                lines.push(std::mem::replace(&mut line, indent.to_string()));
                len = indent_len;
            }
            if len > indent_len {
                line.push(' ');
                len += 1;
            }
            line.push_str(word);
            len += word_len;
        }
        lines.push(line);
    }
    lines
}

fn join_participants(participants: &[String]) -> String {
    match participants {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} y {}", rest.join(", "), last),
    }
}

fn noted_line(name: &str, note: &str) -> String {
    format!("{}: {}", name.to_uppercase(), note)
}

pub fn render(report: &Report) -> ReportResult<String> {
    let info = &report.info;
    let (start, end) = info.shift.parse::<Shift>()?.hours();
    let mut sections: Vec<Vec<String>> = Vec::new();

    sections.push(wrap(
        &format!(
            "{} {} ({})",
            info.date.format("%Y.%m.%d"),
            join_participants(&report.participants),
            info.shift.to_lowercase()
        ),
        "",
        LINE_WIDTH,
    ));

    sections.push(vec![
        format!("Hora de entrada: {start}"),
        format!("Hora de salida: {end}"),
    ]);

    sections.push(vec![
        format!("Nuevos ingresos: {NEW_INTAKES_MARKER}"),
        format!("Bajas: {}", report.count_by_status(STATUS_LEFT)),
        format!("Adopciones: {}", report.count_by_status(STATUS_ADOPTED)),
        format!("Acogidas: {}", report.count_by_status(STATUS_FOSTERED)),
    ]);

    let mut visits = vec![format!("Visitas: {}", info.visits.len())];
    for (index, impression) in info.visits.iter().enumerate() {
        visits.extend(wrap(
            &format!("{} - {}", index + 1, impression),
            INDENT,
            LINE_WIDTH,
        ));
    }
    sections.push(visits);

    let mut notes = vec!["Notas:".to_string()];
    notes.extend(wrap(&info.comments, INDENT, LINE_WIDTH));
    sections.push(notes);

    let mut important = vec!["Importante:".to_string()];
    for entry in report.entries_with_important_note() {
        important.extend(wrap(
            &noted_line(&entry.name, &entry.important),
            INDENT,
            LINE_WIDTH,
        ));
    }
    sections.push(important);

    for (yard, members) in report.group_by_category() {
        let mut section = vec![format!("Patio {yard}:")];
        for entry in Report::entries_with_observations(&members) {
            section.extend(wrap(
                &noted_line(&entry.name, &entry.observations),
                INDENT,
                LINE_WIDTH,
            ));
        }
        sections.push(section);
    }

    let body = sections
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");
    Ok(body + "\n")
}
