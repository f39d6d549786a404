//! Inquiry submission pipeline: classify the inquiry, draft a meeting brief
//! when the category calls for one, compose the outbound email, and hand it to
//! the mail transport.

pub mod brief;
pub mod domain;
pub mod message;
pub mod router;
pub mod routing;
pub mod service;
pub mod transport;

#[cfg(test)]
mod tests;

pub use brief::{BriefError, BriefWriter, GeneratedBrief, MeetingBrief};
pub use domain::{field_text, Inquiry};
pub use message::{MailAttachment, MailRoute, OutboundMessage};
pub use router::submission_router;
pub use routing::{Classification, RoutingTable};
pub use service::{SubmissionError, SubmissionOutcome, SubmissionReceipt, SubmissionService};
pub use transport::{
    DeliveryReceipt, LogOnlyTransport, MailTransport, SmtpMailTransport, TransportError,
};
