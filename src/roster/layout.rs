use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::volunteer::Affinity;

/// The four duty multi-select questions, found by header prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyColumn {
    Bar,
    Catering,
    TokenSales,
    Workshops,
}

/// Sets an affinity when the answer in `column` contains one of `markers`.
/// An empty marker list means any non-blank answer counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffinityMarker {
    pub affinity: Affinity,
    pub column: DutyColumn,
    #[serde(default)]
    pub markers: Vec<String>,
}

/// Where each survey question lives and how its free-text answers are read.
///
/// Header markers are matched against the export's header row: an exact
/// (trimmed) header wins, otherwise the first header containing the marker.
/// Duty columns are matched by prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyLayout {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub withdrawal: String,
    pub duration: String,
    pub hours: String,
    pub accepted_duties: String,
    pub self_description: String,
    pub first_aid: String,
    pub bar_prefix: String,
    pub catering_prefix: String,
    pub token_sales_prefix: String,
    pub workshops_prefix: String,

    /// Withdrawal answer that removes the respondent from the pool.
    pub withdrawal_decline: String,
    /// Accepted-duties answers starting with this decline every duty.
    pub decline_prefix: String,
    /// Duration answer -> hour cap. Anything else leaves the volunteer unassignable.
    pub duration_caps: BTreeMap<String, u32>,
    pub strong_duty_marker: String,
    pub strong_self_marker: String,
    pub first_aid_marker: String,
    pub affinity_markers: Vec<AffinityMarker>,
}

impl Default for SurveyLayout {
    fn default() -> Self {
        let duration_caps = [
            ("1h", 1),
            ("2h !", 2),
            ("Pas de limite j'adore le travail !", 5),
        ]
        .into_iter()
        .map(|(answer, hours)| (answer.to_string(), hours))
        .collect();

        let marker = |affinity, column, markers: &[&str]| AffinityMarker {
            affinity,
            column,
            markers: markers.iter().map(|m| m.to_string()).collect(),
        };

        SurveyLayout {
            first_name: "Prénom".to_string(),
            last_name: "NOM".to_string(),
            email: "Adresse mail".to_string(),
            withdrawal: "envie d'être bénévole".to_string(),
            duration: "Combien de temps".to_string(),
            hours: "Quelles sont tes disponibilités".to_string(),
            accepted_duties: "Acceptes-tu de faire".to_string(),
            self_description: "Tu te sens plutôt".to_string(),
            first_aid: "brevet de secourisme".to_string(),
            bar_prefix: "Bar 14h-23h".to_string(),
            catering_prefix: "Catering 17h-22h".to_string(),
            token_sales_prefix: "Billetterie".to_string(),
            workshops_prefix: "Ateliers 14h 18h".to_string(),
            withdrawal_decline: "Non !".to_string(),
            decline_prefix: "Non".to_string(),
            duration_caps,
            strong_duty_marker: "gros biscotos".to_string(),
            strong_self_marker: "Gros biscotos".to_string(),
            first_aid_marker: "Oui".to_string(),
            affinity_markers: vec![
                marker(Affinity::Bar, DutyColumn::Bar, &["Service au bar"]),
                marker(Affinity::Dishwashing, DutyColumn::Bar, &["Vaisselle"]),
                marker(
                    Affinity::SetupTeardownCatering,
                    DutyColumn::Catering,
                    &["Installation", "rangement"],
                ),
                marker(
                    Affinity::SetupTeardownWorkshops,
                    DutyColumn::Workshops,
                    &["Installation", "Rangement"],
                ),
                marker(Affinity::FacePainting, DutyColumn::Workshops, &["Maquillages enfants"]),
                marker(Affinity::TokenSales, DutyColumn::TokenSales, &[]),
            ],
        }
    }
}

impl SurveyLayout {
    pub fn duty_prefix(&self, column: DutyColumn) -> &str {
        match column {
            DutyColumn::Bar => &self.bar_prefix,
            DutyColumn::Catering => &self.catering_prefix,
            DutyColumn::TokenSales => &self.token_sales_prefix,
            DutyColumn::Workshops => &self.workshops_prefix,
        }
    }

    /// Exact lookup of the duration answer, ignoring surrounding whitespace only.
    pub fn cap_for(&self, duration_answer: &str) -> Option<u32> {
        self.duration_caps.get(duration_answer.trim()).copied()
    }
}

/// Exact header first, then the first header containing `marker`.
pub fn find_column<'a, I>(headers: I, marker: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let headers = headers.into_iter();
    headers
        .clone()
        .position(|h| h.trim() == marker)
        .or_else(|| headers.clone().position(|h| h.contains(marker)))
}

pub fn find_prefixed_column<'a, I>(headers: I, prefix: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    headers.into_iter().position(|h| h.starts_with(prefix))
}
