use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::grid::{parse_quota, Grid, FIRST_ROLE_ROW};
use crate::roster::Contact;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub role: String,
    pub hour: String,
}

/// Everything one person does on the day, in hour order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerMissions {
    pub name: String,
    pub email: Option<String>,
    pub missions: Vec<Mission>,
}

/// Role each row belongs to: its own label, or the last labelled row above
/// it. Skipped labels neither count nor carry over.
fn row_roles(grid: &Grid, skip_roles: &[String]) -> Vec<Option<String>> {
    let mut current: Option<String> = None;
    (0..grid.height())
        .map(|row| {
            if row < FIRST_ROLE_ROW {
                return None;
            }
            let label = grid.label(row);
            if skip_roles.iter().any(|s| s.trim() == label) {
                return None;
            }
            if !label.is_empty() {
                current = Some(label.to_string());
            }
            current.clone()
        })
        .collect()
}

/// Collects each volunteer's missions from a completed grid.
///
/// A cell may hold several comma-separated names. Names are grouped without
/// regard to case; the first spelling met is kept. Count cells are ignored.
pub fn extract_missions(
    grid: &Grid,
    skip_roles: &[String],
    skip_names: &[String],
) -> Vec<VolunteerMissions> {
    let roles = row_roles(grid, skip_roles);
    let mut volunteers: Vec<VolunteerMissions> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (col, hour) in grid.hour_columns() {
        for (row, role) in roles.iter().enumerate() {
            let Some(role) = role else { continue };
            let cell = grid.cell(row, col).trim();
            if cell.is_empty() || parse_quota(cell).is_some() {
                continue;
            }
            for name in cell.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                if skip_names.iter().any(|s| s.trim() == name) {
                    continue;
                }
                let key = name.to_lowercase();
                let slot = *index.entry(key).or_insert_with(|| {
                    volunteers.push(VolunteerMissions {
                        name: name.to_string(),
                        email: None,
                        missions: Vec::new(),
                    });
                    volunteers.len() - 1
                });
                volunteers[slot].missions.push(Mission {
                    role: role.clone(),
                    hour: hour.to_string(),
                });
            }
        }
    }

    volunteers
}

/// Finds a survey address for a name as written in the grid.
///
/// First token against the first name and the rest against the last name,
/// exactly; failing that, the whole name case-insensitively.
pub fn find_email<'a>(name: &str, contacts: &'a [Contact]) -> Option<&'a str> {
    let name = name.trim();
    let with_email = || contacts.iter().filter(|c| c.email.is_some());

    let exact = name.split_once(char::is_whitespace).and_then(|(first, rest)| {
        let (first, rest) = (first.trim(), rest.trim());
        with_email().find(|c| c.first_name == first && c.last_name == rest)
    });

    exact
        .or_else(|| {
            let key = name.to_lowercase();
            with_email().find(|c| c.full_name().to_lowercase() == key)
        })
        .and_then(|c| c.email.as_deref())
}

/// Fills in `email` for every volunteer; returns how many stayed without one.
pub fn attach_emails(
    volunteers: &mut [VolunteerMissions],
    contacts: &[Contact],
    overrides: &BTreeMap<String, String>,
) -> usize {
    let mut unmatched = 0;
    for v in volunteers.iter_mut() {
        v.email = overrides
            .get(&v.name)
            .map(String::as_str)
            .or_else(|| find_email(&v.name, contacts))
            .map(str::to_string);
        if v.email.is_none() {
            debug!(name = v.name.as_str(), "no email found");
            unmatched += 1;
        }
    }
    unmatched
}
