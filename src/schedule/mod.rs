pub mod fill;
pub mod rules;
pub mod select;
pub mod types;

pub use rules::{default_role_rules, ResolvedRole, RoleRule, RoleTable};
pub use select::FillEngine;
pub use types::{FillReport, ReconcileSummary, SlotOutcome};
