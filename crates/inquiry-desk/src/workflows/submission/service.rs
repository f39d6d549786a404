use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{debug, info};

use super::brief::{BriefError, BriefWriter, MeetingBrief};
use super::domain::Inquiry;
use super::message::{compose_body, MailAttachment, MailRoute, OutboundMessage};
use super::routing::{Classification, RoutingTable};
use super::transport::{MailTransport, TransportError};

/// Service composing the routing table, brief writer, and mail transport.
pub struct SubmissionService<T> {
    routing: Arc<RoutingTable>,
    briefs: BriefWriter,
    transport: Arc<T>,
    route: MailRoute,
}

impl<T> SubmissionService<T>
where
    T: MailTransport + 'static,
{
    pub fn new(
        routing: Arc<RoutingTable>,
        briefs: BriefWriter,
        transport: Arc<T>,
        route: MailRoute,
    ) -> Self {
        Self {
            routing,
            briefs,
            transport,
            route,
        }
    }

    pub fn routing(&self) -> &Arc<RoutingTable> {
        &self.routing
    }

    pub fn classify(&self, inquiry: &Inquiry) -> Classification {
        self.routing.classify(inquiry)
    }

    /// Classifies the inquiry, writes the meeting brief when one is needed,
    /// and composes the outbound email. Nothing is sent, but a meeting or
    /// event request still leaves its brief file in the output directory.
    pub async fn compose(&self, inquiry: &Inquiry) -> Result<OutboundMessage, SubmissionError> {
        let Classification {
            subject,
            needs_document,
        } = self.classify(inquiry);
        debug!(category = inquiry.category(), %subject, needs_document, "inquiry classified");

        let brief = needs_document.then(|| MeetingBrief::from_inquiry(inquiry));
        let attachment = match &brief {
            Some(brief) => Some(MailAttachment::from(
                self.briefs.write_detached(brief.clone()).await?,
            )),
            None => None,
        };

        Ok(OutboundMessage {
            from: self.route.from.clone(),
            to: self.route.to.clone(),
            subject,
            body: compose_body(inquiry, brief.as_ref()),
            attachment,
        })
    }

    /// Runs one submission to completion. A brief failure aborts before any
    /// email is sent; a transport failure is reported once, never retried.
    pub async fn submit(&self, inquiry: Inquiry) -> Result<SubmissionReceipt, SubmissionError> {
        let message = self.compose(&inquiry).await?;
        let subject = message.subject.clone();
        let attachment = message.attachment_name().map(str::to_string);

        let delivery = self.transport.send(message).await?;
        info!(%subject, attachment = attachment.as_deref().unwrap_or("none"), "inquiry delivered");

        Ok(SubmissionReceipt {
            subject,
            attachment,
            transport_response: delivery.response,
        })
    }
}

/// Summary of a delivered submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub subject: String,
    pub attachment: Option<String>,
    pub transport_response: String,
}

/// Terminal state of one submission as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    DocumentBuildFailure,
    TransportFailure,
    MalformedInput,
    /// A failure nothing anticipated, such as a panicking handler.
    Unexpected,
}

impl SubmissionOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::MalformedInput => StatusCode::BAD_REQUEST,
            Self::DocumentBuildFailure | Self::TransportFailure | Self::Unexpected => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing text. Internal causes stay in the server log.
    pub fn client_message(self) -> &'static str {
        match self {
            Self::Success => "Inquiry submitted successfully.",
            Self::DocumentBuildFailure => "Server error.",
            Self::TransportFailure => "Email failed to send.",
            Self::MalformedInput => "Malformed submission.",
            Self::Unexpected => "Server error.",
        }
    }
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Brief(#[from] BriefError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SubmissionError {
    pub fn outcome(&self) -> SubmissionOutcome {
        match self {
            SubmissionError::Brief(_) => SubmissionOutcome::DocumentBuildFailure,
            SubmissionError::Transport(_) => SubmissionOutcome::TransportFailure,
        }
    }
}
