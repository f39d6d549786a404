use async_trait::async_trait;
use inquiry_desk::config::MailConfig;
use inquiry_desk::workflows::submission::{
    DeliveryReceipt, LogOnlyTransport, MailRoute, MailTransport, OutboundMessage,
    SmtpMailTransport, TransportError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Transport picked at startup from the mail configuration.
pub(crate) enum ConfiguredTransport {
    Smtp(SmtpMailTransport),
    LogOnly(LogOnlyTransport),
}

impl ConfiguredTransport {
    pub(crate) fn from_config(config: &MailConfig) -> Result<Self, TransportError> {
        match &config.smtp {
            Some(smtp) => Ok(Self::Smtp(SmtpMailTransport::from_config(smtp)?)),
            None => {
                warn!("SMTP_HOST not set; inquiries will be logged instead of emailed");
                Ok(Self::LogOnly(LogOnlyTransport))
            }
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::LogOnly(_) => "log-only",
        }
    }
}

#[async_trait]
impl MailTransport for ConfiguredTransport {
    async fn send(&self, message: OutboundMessage) -> Result<DeliveryReceipt, TransportError> {
        match self {
            Self::Smtp(transport) => transport.send(message).await,
            Self::LogOnly(transport) => transport.send(message).await,
        }
    }
}

pub(crate) fn mail_route(config: &MailConfig) -> MailRoute {
    MailRoute {
        from: config.from.clone(),
        to: config.to.clone(),
    }
}
