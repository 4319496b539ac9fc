pub mod layout;
pub mod parser;
pub mod volunteer;

pub use layout::{AffinityMarker, DutyColumn, SurveyLayout};
pub use parser::{load_roster, read_roster, SurveyImport};
pub use volunteer::{Affinity, Contact, Roster, Volunteer, VolunteerId};
