use std::collections::BTreeSet;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Duties a respondent explicitly ticked in the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affinity {
    Bar,
    Dishwashing,
    SetupTeardownCatering,
    SetupTeardownWorkshops,
    FacePainting,
    TokenSales,
}

/// Stable handle into a [`Roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolunteerId(pub usize);

/// One respondent that stays in the pool for the run.
#[derive(Debug, Clone)]
pub struct Volunteer {
    pub first_name: String,
    pub last_name: String,
    /// Hour labels the volunteer said they can work. Only ever shrinks.
    pub available_hours: BTreeSet<String>,
    /// `None` when the duration answer was not recognised: never assignable.
    pub max_hours: Option<u32>,
    pub strong: bool,
    pub first_aid: bool,
    pub accepts_any: bool,
    pub affinities: BTreeSet<Affinity>,
    pub assigned_hours: u32,
    /// Hours already consumed, by hand or by the engine.
    pub booked_hours: BTreeSet<String>,
    pub assigned_roles: Vec<String>,
}

impl Volunteer {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Volunteer {
            first_name: first_name.into(),
            last_name: last_name.into(),
            available_hours: BTreeSet::new(),
            max_hours: None,
            strong: false,
            first_aid: false,
            accepts_any: true,
            affinities: BTreeSet::new(),
            assigned_hours: 0,
            booked_hours: BTreeSet::new(),
            assigned_roles: Vec::new(),
        }
    }

    /// The "First Last" form written into the grid.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Key used to recognise hand-written names in the grid.
    pub fn match_key(&self) -> String {
        self.full_name().trim().to_lowercase()
    }

    pub fn capacity(&self) -> u32 {
        self.max_hours.unwrap_or(0)
    }

    pub fn has_capacity(&self) -> bool {
        self.assigned_hours < self.capacity()
    }

    pub fn has(&self, affinity: Affinity) -> bool {
        self.affinities.contains(&affinity)
    }

    pub fn has_done(&self, role: &str) -> bool {
        self.assigned_roles.iter().any(|r| r == role)
    }

    /// Available at `hour` and not already booked for it.
    pub fn is_free_at(&self, hour: &str) -> bool {
        self.available_hours.contains(hour) && !self.booked_hours.contains(hour)
    }

    pub(crate) fn record_assignment(&mut self, hour: &str, role: &str) {
        self.assigned_hours += 1;
        self.booked_hours.insert(hour.to_string());
        self.assigned_roles.push(role.to_string());
    }

    /// Accounts for a name somebody already typed into the grid.
    pub(crate) fn record_manual(&mut self, hour: &str) {
        self.assigned_hours = (self.assigned_hours + 1).min(self.capacity());
        self.available_hours.remove(hour);
        self.booked_hours.insert(hour.to_string());
    }
}

/// Name and address of every survey respondent, withdrawn or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Arena of volunteers for one run, addressed by [`VolunteerId`].
#[derive(Debug, Clone, Default)]
pub struct Roster {
    volunteers: Vec<Volunteer>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, volunteer: Volunteer) -> VolunteerId {
        self.volunteers.push(volunteer);
        VolunteerId(self.volunteers.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.volunteers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volunteers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VolunteerId, &Volunteer)> {
        self.volunteers
            .iter()
            .enumerate()
            .map(|(i, v)| (VolunteerId(i), v))
    }

    /// Case-insensitive, whitespace-trimmed "first last" lookup.
    pub fn find_by_name(&self, name: &str) -> Option<VolunteerId> {
        let key = name.trim().to_lowercase();
        self.iter()
            .find(|(_, v)| v.match_key() == key)
            .map(|(id, _)| id)
    }
}

impl Index<VolunteerId> for Roster {
    type Output = Volunteer;

    fn index(&self, id: VolunteerId) -> &Volunteer {
        &self.volunteers[id.0]
    }
}

impl IndexMut<VolunteerId> for Roster {
    fn index_mut(&mut self, id: VolunteerId) -> &mut Volunteer {
        &mut self.volunteers[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_cap_is_never_assignable() {
        let mut v = Volunteer::new("Ada", "Martin");
        v.available_hours.insert("14h-15h".to_string());
        assert_eq!(v.capacity(), 0);
        assert!(!v.has_capacity());
    }

    #[test]
    fn manual_assignment_is_capped_and_consumes_the_hour() {
        let mut v = Volunteer::new("Ada", "Martin");
        v.max_hours = Some(1);
        v.available_hours.insert("14h-15h".to_string());
        v.available_hours.insert("15h-16h".to_string());

        v.record_manual("14h-15h");
        v.record_manual("15h-16h");

        assert_eq!(v.assigned_hours, 1);
        assert!(v.available_hours.is_empty());
        assert!(!v.is_free_at("14h-15h"));
        assert!(v.assigned_roles.is_empty());
    }

    #[test]
    fn find_by_name_ignores_case_and_padding() {
        let mut roster = Roster::new();
        roster.push(Volunteer::new("Ada", "Martin"));
        let id = roster.push(Volunteer::new("Léa", "Dupont"));

        assert_eq!(roster.find_by_name("  léa DUPONT "), Some(id));
        assert_eq!(roster.find_by_name("Lea Dupont"), None);
    }
}
