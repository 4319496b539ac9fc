use serde::{Deserialize, Serialize};

use crate::roster::{Affinity, Volunteer};

/// Maps grid role labels to eligibility and staffing requirements.
///
/// `pattern` is matched case-insensitively as a substring of the role
/// label; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    pub pattern: String,
    #[serde(default)]
    pub affinity: Option<Affinity>,
    #[serde(default)]
    pub require_first_aid: bool,
    #[serde(default)]
    pub require_strong: bool,
    /// Hours at which the role needs strong volunteers even if it normally does not.
    #[serde(default)]
    pub strong_at_hours: Vec<String>,
}

impl RoleRule {
    fn new(pattern: &str, affinity: Affinity) -> Self {
        RoleRule {
            pattern: pattern.to_string(),
            affinity: Some(affinity),
            require_first_aid: false,
            require_strong: false,
            strong_at_hours: Vec::new(),
        }
    }
}

/// The event's roles as they appear in the planning grid.
pub fn default_role_rules() -> Vec<RoleRule> {
    vec![
        RoleRule {
            strong_at_hours: vec!["23h-00h".to_string()],
            ..RoleRule::new("service au bar", Affinity::Bar)
        },
        RoleRule::new("vaisselle", Affinity::Dishwashing),
        RoleRule::new("installation/rangement", Affinity::SetupTeardownCatering),
        RoleRule {
            require_strong: true,
            ..RoleRule::new("installation ateliers et rangement", Affinity::SetupTeardownWorkshops)
        },
        RoleRule::new("anaïs et ses pinceaux", Affinity::FacePainting),
        RoleRule {
            require_first_aid: true,
            ..RoleRule::new("vente cacoins", Affinity::TokenSales)
        },
    ]
}

/// Requirements for one role label, resolved once per quota row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    pub name: String,
    pub affinity: Option<Affinity>,
    pub require_first_aid: bool,
    pub require_strong: bool,
    pub strong_at_hours: Vec<String>,
}

impl ResolvedRole {
    pub fn requires_strong_at(&self, hour: &str) -> bool {
        self.require_strong || self.strong_at_hours.iter().any(|h| h == hour)
    }

    /// Whether the volunteer ticked this role's duty. Roles without an
    /// affinity never match; `accepts_any` is applied by the engine.
    pub fn prefers(&self, volunteer: &Volunteer) -> bool {
        self.affinity.map(|a| volunteer.has(a)).unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct RoleTable {
    rules: Vec<(String, RoleRule)>,
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::new(default_role_rules())
    }
}

impl RoleTable {
    pub fn new(rules: Vec<RoleRule>) -> Self {
        RoleTable {
            rules: rules
                .into_iter()
                .map(|r| (r.pattern.trim().to_lowercase(), r))
                .collect(),
        }
    }

    pub fn resolve(&self, label: &str) -> ResolvedRole {
        let name = label.trim().to_string();
        let lowered = name.to_lowercase();
        match self.rules.iter().find(|(p, _)| lowered.contains(p.as_str())) {
            Some((_, rule)) => ResolvedRole {
                name,
                affinity: rule.affinity,
                require_first_aid: rule.require_first_aid,
                require_strong: rule.require_strong,
                strong_at_hours: rule.strong_at_hours.clone(),
            },
            None => ResolvedRole {
                name,
                affinity: None,
                require_first_aid: false,
                require_strong: false,
                strong_at_hours: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_maps_event_roles() {
        let table = RoleTable::default();

        let bar = table.resolve("  SERVICE AU BAR (tireuse) ");
        assert_eq!(bar.name, "SERVICE AU BAR (tireuse)");
        assert_eq!(bar.affinity, Some(Affinity::Bar));
        assert!(!bar.requires_strong_at("20h-21h"));
        assert!(bar.requires_strong_at("23h-00h"));

        let workshops = table.resolve("Installation ateliers et rangement");
        assert_eq!(workshops.affinity, Some(Affinity::SetupTeardownWorkshops));
        assert!(workshops.requires_strong_at("14h-15h"));

        let catering = table.resolve("Catering installation/rangement");
        assert_eq!(catering.affinity, Some(Affinity::SetupTeardownCatering));

        let tokens = table.resolve("Vente cacoins et adhésion");
        assert_eq!(tokens.affinity, Some(Affinity::TokenSales));
        assert!(tokens.require_first_aid);

        let faces = table.resolve("Anaïs et ses pinceaux");
        assert_eq!(faces.affinity, Some(Affinity::FacePainting));

        assert_eq!(table.resolve("Vaisselle bar").affinity, Some(Affinity::Dishwashing));
    }

    #[test]
    fn unknown_roles_fall_through_to_accepts_any() {
        let role = RoleTable::default().resolve("Toilettes");
        assert_eq!(role.affinity, None);
        assert!(!role.require_first_aid);
        assert!(!role.requires_strong_at("23h-00h"));

        let mut v = Volunteer::new("Léa", "Dupont");
        v.affinities.insert(Affinity::Bar);
        assert!(!role.prefers(&v));
    }

    #[test]
    fn rules_deserialize_with_defaults() {
        #[derive(Deserialize)]
        struct Doc {
            roles: Vec<RoleRule>,
        }
        let doc: Doc = toml::from_str(
            r#"
[[roles]]
pattern = "Free shop"

[[roles]]
pattern = "Canards costauds"
require_strong = true
affinity = "setup_teardown_workshops"
"#,
        )
        .unwrap();
        let table = RoleTable::new(doc.roles);
        assert_eq!(table.resolve("free shop").affinity, None);
        let ducks = table.resolve("Canards costauds");
        assert!(ducks.require_strong);
        assert_eq!(ducks.affinity, Some(Affinity::SetupTeardownWorkshops));
    }
}
