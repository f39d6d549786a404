use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use super::message::OutboundMessage;
use crate::config::SmtpConfig;

/// Outbound email hand-off. One call per submission, no retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<DeliveryReceipt, TransportError>;
}

/// Acknowledgement returned by the transport for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub response: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid {field} address: {reason}")]
    Address { field: &'static str, reason: String },
    #[error("unable to build email: {0}")]
    Build(String),
    #[error("smtp relay error: {0}")]
    Relay(String),
    #[error("smtp send failed: {0}")]
    Send(String),
    #[error("mail worker failed: {0}")]
    Worker(String),
}

/// SMTP delivery through a relay such as Google Workspace.
///
/// `lettre`'s blocking transport runs on the blocking pool so a slow relay
/// only holds up the submission that is waiting on it.
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: SmtpTransport,
}

impl SmtpMailTransport {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, TransportError> {
        let mut builder = SmtpTransport::relay(&config.host)
            .map_err(|err| TransportError::Relay(err.to_string()))?
            .port(config.port)
            .timeout(config.timeout);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: OutboundMessage) -> Result<DeliveryReceipt, TransportError> {
        let email = build_email(&message)?;
        let transport = self.transport.clone();

        let response = tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|err| TransportError::Worker(err.to_string()))?
            .map_err(|err| TransportError::Send(err.to_string()))?;

        let response = response.message().collect::<Vec<_>>().join(" ");
        info!(to = %message.to, subject = %message.subject, %response, "email sent");
        Ok(DeliveryReceipt { response })
    }
}

/// Converts the composed message into a MIME email: plain text alone, or a
/// mixed multipart when a brief is attached.
pub fn build_email(message: &OutboundMessage) -> Result<Message, TransportError> {
    let from: Mailbox = message
        .from
        .parse()
        .map_err(|err: lettre::address::AddressError| TransportError::Address {
            field: "from",
            reason: err.to_string(),
        })?;
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|err: lettre::address::AddressError| TransportError::Address {
            field: "to",
            reason: err.to_string(),
        })?;

    let builder = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone());

    let email = match &message.attachment {
        Some(attachment) => {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|err| TransportError::Build(err.to_string()))?;
            let parts = MultiPart::mixed()
                .singlepart(SinglePart::plain(message.body.clone()))
                .singlepart(
                    Attachment::new(attachment.filename.clone())
                        .body(attachment.content.clone(), content_type),
                );
            builder.multipart(parts)
        }
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone()),
    };

    email.map_err(|err| TransportError::Build(err.to_string()))
}

/// Transport used when no SMTP relay is configured: validates and logs the
/// message, then reports it as delivered.
#[derive(Debug, Clone, Default)]
pub struct LogOnlyTransport;

#[async_trait]
impl MailTransport for LogOnlyTransport {
    async fn send(&self, message: OutboundMessage) -> Result<DeliveryReceipt, TransportError> {
        build_email(&message)?;
        info!(
            to = %message.to,
            subject = %message.subject,
            attachment = message.attachment_name().unwrap_or("none"),
            "smtp relay not configured; email logged only"
        );
        Ok(DeliveryReceipt {
            response: "logged".to_string(),
        })
    }
}
