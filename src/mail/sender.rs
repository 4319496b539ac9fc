use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{error, info, warn};

use crate::config::MailConfig;
use crate::error::MailError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Somewhere messages can be handed to.
pub trait Mailer {
    /// A [`MailError::Connection`] means the channel is gone and the batch stops.
    fn send(&mut self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Authenticated STARTTLS submission.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

fn env_setting(name: &str) -> Result<String, MailError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| MailError::MissingSetting(format!("environment variable {name}")))
}

impl SmtpMailer {
    /// Opens and authenticates the channel once so bad credentials fail
    /// before anything is sent.
    pub fn connect(config: &MailConfig) -> Result<Self, MailError> {
        let username = env_setting(&config.username_env)?;
        let password = env_setting(&config.password_env)?;
        let sender = config.sender.clone().unwrap_or_else(|| username.clone());
        let from: Mailbox = sender
            .parse()
            .map_err(|_| MailError::Address(sender.clone()))?;

        let endpoint = format!("{}:{}", config.smtp_host, config.smtp_port);
        let transport = SmtpTransport::starttls_relay(&config.smtp_host)
            .map_err(|e| MailError::Connection {
                reason: format!("cannot reach {endpoint}: {e}"),
            })?
            .port(config.smtp_port)
            .credentials(Credentials::new(username, password))
            .build();

        match transport.test_connection() {
            Ok(true) => {}
            Ok(false) => {
                return Err(MailError::Connection {
                    reason: format!("cannot connect to {endpoint}"),
                })
            }
            Err(e) => {
                return Err(MailError::Connection {
                    reason: format!("cannot connect to {endpoint}: {e}"),
                })
            }
        }
        info!(%endpoint, "smtp connection ready");
        Ok(SmtpMailer { transport, from })
    }
}

impl Mailer for SmtpMailer {
    fn send(&mut self, mail: &OutgoingMail) -> Result<(), MailError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|_| MailError::Address(mail.to.clone()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| MailError::Message(e.to_string()))?;

        self.transport.send(&message).map_err(|e| {
            if e.is_permanent() || e.is_transient() {
                MailError::Delivery(e.to_string())
            } else {
                MailError::Connection {
                    reason: e.to_string(),
                }
            }
        })?;
        Ok(())
    }
}

/// Where messages really go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    Production,
    /// Every message is redirected to one address.
    Test { address: String },
}

impl DeliveryMode {
    pub fn from_config(config: &MailConfig, production: bool) -> Result<Self, MailError> {
        if production || config.production {
            return Ok(DeliveryMode::Production);
        }
        let address = config.test_address.trim();
        if address.is_empty() {
            return Err(MailError::MissingSetting("mail.test_address".to_string()));
        }
        Ok(DeliveryMode::Test {
            address: address.to_string(),
        })
    }

    pub fn recipient<'a>(&'a self, email: &'a str) -> &'a str {
        match self {
            DeliveryMode::Production => email,
            DeliveryMode::Test { address } => address,
        }
    }
}

/// One message to render and send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: Option<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
    /// No address known.
    pub skipped: usize,
    pub total: usize,
    /// Set when the channel dropped and the rest of the batch was abandoned.
    pub aborted: Option<String>,
}

/// Sends every message, counting outcomes. A failure for one recipient does
/// not stop the batch; a connection failure does.
pub fn deliver_all<M: Mailer>(
    mailer: &mut M,
    recipients: &[Recipient],
    mode: &DeliveryMode,
) -> DeliveryReport {
    let mut report = DeliveryReport {
        total: recipients.len(),
        ..DeliveryReport::default()
    };

    for r in recipients {
        let name = r.name.as_str();
        let email = match r.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => email,
            None => {
                warn!(name, "no email address, skipped");
                report.skipped += 1;
                continue;
            }
        };

        let mail = OutgoingMail {
            to: mode.recipient(email).to_string(),
            subject: r.subject.clone(),
            body: r.body.clone(),
        };
        match mailer.send(&mail) {
            Ok(()) => {
                info!(name, to = mail.to.as_str(), "mail sent");
                report.sent += 1;
            }
            Err(MailError::Connection { reason }) => {
                error!(name, %reason, "mail channel lost, stopping");
                report.failed += 1;
                report.aborted = Some(reason);
                break;
            }
            Err(e) => {
                warn!(name, to = mail.to.as_str(), error = %e, "mail not sent");
                report.failed += 1;
            }
        }
    }

    report
}
