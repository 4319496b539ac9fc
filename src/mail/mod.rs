//! Mission emails built from a completed grid.

pub mod missions;
pub mod sender;
pub mod template;

pub use missions::{attach_emails, extract_missions, find_email, Mission, VolunteerMissions};
pub use sender::{
    deliver_all, DeliveryMode, DeliveryReport, Mailer, OutgoingMail, Recipient, SmtpMailer,
};

use crate::config::MailConfig;
use crate::roster::Contact;

/// One assignment message per volunteer found in the grid.
pub fn assignment_recipients(
    volunteers: &[VolunteerMissions],
    config: &MailConfig,
) -> Vec<Recipient> {
    volunteers
        .iter()
        .map(|v| Recipient {
            name: v.name.clone(),
            email: v.email.clone(),
            subject: config.assignment_subject.clone(),
            body: template::assignment_body(&v.name, &v.missions, &config.sheet_link),
        })
        .collect()
}

/// One thank-you message per survey respondent, addressed by first name.
pub fn thanks_recipients(contacts: &[Contact], config: &MailConfig) -> Vec<Recipient> {
    contacts
        .iter()
        .map(|c| Recipient {
            name: c.full_name(),
            email: c.email.clone(),
            subject: config.thanks_subject.clone(),
            body: template::thanks_body(&c.first_name, &config.questionnaire_link),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_messages_use_configured_subject_and_link() {
        let config = MailConfig {
            sheet_link: "https://sheet.example.org".to_string(),
            ..MailConfig::default()
        };
        let volunteers = vec![VolunteerMissions {
            name: "Léa Roux".to_string(),
            email: Some("lea@example.org".to_string()),
            missions: vec![Mission {
                role: "Vaisselle".to_string(),
                hour: "18h-19h".to_string(),
            }],
        }];

        let recipients = assignment_recipients(&volunteers, &config);

        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].subject, config.assignment_subject);
        assert!(recipients[0].body.starts_with("Bonjour Léa Roux,"));
        assert!(recipients[0].body.contains("• Vaisselle : 18h-19h"));
        assert!(recipients[0].body.contains("https://sheet.example.org"));
    }

    #[test]
    fn thanks_messages_greet_by_first_name() {
        let contacts = vec![Contact {
            first_name: "Paul".to_string(),
            last_name: "Martin".to_string(),
            email: None,
        }];

        let recipients = thanks_recipients(&contacts, &MailConfig::default());

        assert_eq!(recipients[0].name, "Paul Martin");
        assert_eq!(recipients[0].email, None);
        assert!(recipients[0].body.starts_with("Chèr·e Paul,"));
    }
}
