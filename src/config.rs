//! shifts.toml configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::roster::SurveyLayout;
use crate::schedule::{default_role_rules, RoleRule};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fixed seed for reproducible tie-breaks. Random when unset.
    pub seed: Option<u64>,
    pub survey: SurveyLayout,
    pub grid: GridConfig,
    pub roles: Vec<RoleRule>,
    pub mail: MailConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: None,
            survey: SurveyLayout::default(),
            grid: GridConfig::default(),
            roles: default_role_rules(),
            mail: MailConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Most rows beneath a quota cell that can hold its names.
    pub max_rows_per_slot: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            max_rows_per_slot: 9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Environment variable holding the SMTP login.
    pub username_env: String,
    /// Environment variable holding the SMTP password.
    pub password_env: String,
    /// From address; the SMTP login when unset.
    pub sender: Option<String>,
    /// Send to the real addresses. Otherwise everything goes to `test_address`.
    pub production: bool,
    pub test_address: String,
    pub sheet_link: String,
    pub questionnaire_link: String,
    pub assignment_subject: String,
    pub thanks_subject: String,
    /// Grid rows with these labels are not volunteer missions.
    pub skip_roles: Vec<String>,
    /// Names in the grid that never get a mission email.
    pub skip_names: Vec<String>,
    /// Name as written in the grid -> address, for names the survey cannot match.
    pub email_overrides: BTreeMap<String, String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        MailConfig {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username_env: "SMTP_USERNAME".to_string(),
            password_env: "SMTP_PASSWORD".to_string(),
            sender: None,
            production: false,
            test_address: String::new(),
            sheet_link: String::new(),
            questionnaire_link: String::new(),
            assignment_subject: "Un grand merci chers bénévoles ! Voici vos missions".to_string(),
            thanks_subject: "Merci pour ton aide !".to_string(),
            skip_roles: ["Responsable", "Responsable benevole", "Responsable caisse", "Responsable Artistes"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_names: Vec::new(),
            email_overrides: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Reads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.grid.max_rows_per_slot, 9);
        assert_eq!(config.roles, default_role_rules());
        assert_eq!(config.mail.smtp_port, 587);
        assert!(!config.mail.production);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn sections_override_independently() {
        let config: Config = toml::from_str(
            r#"
seed = 7

[grid]
max_rows_per_slot = 4

[mail]
production = true
test_address = "test@example.org"

[mail.email_overrides]
"Anaïs" = "anais@example.org"

[[roles]]
pattern = "bar"
affinity = "bar"
"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.grid.max_rows_per_slot, 4);
        assert!(config.mail.production);
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(config.mail.email_overrides["Anaïs"], "anais@example.org");
        assert_eq!(config.roles.len(), 1);
        assert_eq!(config.survey.first_name, "Prénom");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/shifts.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shifts.toml");
        std::fs::write(&path, "[grid]\nmax_rows_per_slot = 3\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.grid.max_rows_per_slot, 3);
    }
}
