use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use super::layout::{find_column, find_prefixed_column, DutyColumn, SurveyLayout};
use super::volunteer::{Contact, Roster, Volunteer};
use crate::error::RosterError;

/// Everything read from the survey export.
#[derive(Debug, Clone, Default)]
pub struct SurveyImport {
    pub roster: Roster,
    pub contacts: Vec<Contact>,
    /// "First Last" of respondents who declined to volunteer.
    pub withdrawn: Vec<String>,
    /// 1-based data row numbers that could not be read.
    pub malformed_rows: Vec<usize>,
}

/// Column indices resolved once from the header row.
#[derive(Debug, Clone, Default)]
struct Columns {
    first_name: usize,
    last_name: usize,
    email: Option<usize>,
    withdrawal: Option<usize>,
    duration: Option<usize>,
    hours: Option<usize>,
    accepted_duties: Option<usize>,
    self_description: Option<usize>,
    first_aid: Option<usize>,
    bar: Option<usize>,
    catering: Option<usize>,
    token_sales: Option<usize>,
    workshops: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, layout: &SurveyLayout) -> Result<Self, RosterError> {
        let names: Vec<&str> = headers.iter().collect();
        let find = |marker: &str| find_column(names.iter().copied(), marker);
        let optional = |label: &str, marker: &str| {
            let col = find(marker);
            if col.is_none() {
                warn!(column = label, marker, "survey column not found, answers treated as blank");
            }
            col
        };
        let prefixed = |column: DutyColumn| {
            let prefix = layout.duty_prefix(column);
            let col = find_prefixed_column(names.iter().copied(), prefix);
            if col.is_none() {
                warn!(?column, prefix, "duty column not found, answers treated as blank");
            }
            col
        };

        Ok(Columns {
            first_name: find(&layout.first_name)
                .ok_or_else(|| RosterError::MissingColumn(layout.first_name.clone()))?,
            last_name: find(&layout.last_name)
                .ok_or_else(|| RosterError::MissingColumn(layout.last_name.clone()))?,
            email: optional("email", &layout.email),
            withdrawal: optional("withdrawal", &layout.withdrawal),
            duration: optional("duration", &layout.duration),
            hours: optional("hours", &layout.hours),
            accepted_duties: optional("accepted_duties", &layout.accepted_duties),
            self_description: optional("self_description", &layout.self_description),
            first_aid: optional("first_aid", &layout.first_aid),
            bar: prefixed(DutyColumn::Bar),
            catering: prefixed(DutyColumn::Catering),
            token_sales: prefixed(DutyColumn::TokenSales),
            workshops: prefixed(DutyColumn::Workshops),
        })
    }

    fn duty(&self, column: DutyColumn) -> Option<usize> {
        match column {
            DutyColumn::Bar => self.bar,
            DutyColumn::Catering => self.catering,
            DutyColumn::TokenSales => self.token_sales,
            DutyColumn::Workshops => self.workshops,
        }
    }
}

/// Non-blank, trimmed cell value. Missing and blank cells are `None`.
fn cell(record: &StringRecord, col: Option<usize>) -> Option<&str> {
    col.and_then(|c| record.get(c))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn contains(value: Option<&str>, marker: &str) -> bool {
    value.map(|v| v.contains(marker)).unwrap_or(false)
}

/// Splits the comma-separated availability answer into hour labels.
pub fn parse_available_hours(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

fn build_volunteer(
    first_name: &str,
    last_name: &str,
    record: &StringRecord,
    cols: &Columns,
    layout: &SurveyLayout,
) -> Volunteer {
    let mut volunteer = Volunteer::new(first_name, last_name);

    if let Some(hours) = cell(record, cols.hours) {
        volunteer.available_hours = parse_available_hours(hours).collect();
    }
    volunteer.max_hours = cell(record, cols.duration).and_then(|d| layout.cap_for(d));

    let accepted = cell(record, cols.accepted_duties);
    volunteer.strong = contains(accepted, &layout.strong_duty_marker)
        || contains(cell(record, cols.self_description), &layout.strong_self_marker);
    volunteer.first_aid = contains(cell(record, cols.first_aid), &layout.first_aid_marker);
    volunteer.accepts_any = !accepted
        .map(|a| a.starts_with(&layout.decline_prefix))
        .unwrap_or(false);

    for rule in &layout.affinity_markers {
        let answer = cell(record, cols.duty(rule.column));
        let ticked = if rule.markers.is_empty() {
            answer.is_some()
        } else {
            rule.markers.iter().any(|m| contains(answer, m))
        };
        if ticked {
            volunteer.affinities.insert(rule.affinity);
        }
    }

    volunteer
}

/// Loads the survey export into a volunteer roster.
///
/// Withdrawn respondents are left out of the roster but kept in `contacts`
/// and listed in `withdrawn`. Unreadable rows are skipped with a warning.
pub fn load_roster<P: AsRef<Path>>(
    csv_path: P,
    layout: &SurveyLayout,
) -> Result<SurveyImport, RosterError> {
    let path = csv_path.as_ref();
    if !path.exists() {
        return Err(RosterError::NotFound(path.to_path_buf()));
    }
    let reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let import = read_roster(reader, layout)?;
    info!(
        path = %path.display(),
        volunteers = import.roster.len(),
        withdrawn = import.withdrawn.len(),
        malformed = import.malformed_rows.len(),
        "roster loaded"
    );
    Ok(import)
}

/// Same as [`load_roster`] over any CSV reader.
pub fn read_roster<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    layout: &SurveyLayout,
) -> Result<SurveyImport, RosterError> {
    let headers = reader.headers()?.clone();
    let cols = Columns::resolve(&headers, layout)?;
    let mut import = SurveyImport::default();

    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(row, error = %e, "unreadable survey row skipped");
                import.malformed_rows.push(row);
                continue;
            }
        };

        if record.len() <= cols.first_name.max(cols.last_name) {
            warn!(row, fields = record.len(), "survey row too short, skipped");
            import.malformed_rows.push(row);
            continue;
        }

        let first_name = record.get(cols.first_name).unwrap_or("").trim();
        let last_name = record.get(cols.last_name).unwrap_or("").trim();
        if first_name.is_empty() && last_name.is_empty() {
            warn!(row, "survey row without a name, skipped");
            import.malformed_rows.push(row);
            continue;
        }

        import.contacts.push(Contact {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: cell(&record, cols.email).map(str::to_string),
        });

        if cell(&record, cols.withdrawal) == Some(layout.withdrawal_decline.as_str()) {
            debug!(row, first_name, last_name, "respondent withdrew");
            import.withdrawn.push(format!("{} {}", first_name, last_name));
            continue;
        }

        let volunteer = build_volunteer(first_name, last_name, &record, &cols, layout);
        if volunteer.max_hours.is_none() {
            debug!(row, first_name, last_name, "unrecognised duration answer, volunteer not assignable");
        }
        import.roster.push(volunteer);
    }

    Ok(import)
}
