use std::fmt::Write as _;
use std::path::PathBuf;

use super::brief::{GeneratedBrief, MeetingBrief, DOCX_CONTENT_TYPE};
use super::domain::{field_text, Inquiry};

/// Fixed sender and recipient for every inquiry email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailRoute {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
    pub path: PathBuf,
}

impl From<GeneratedBrief> for MailAttachment {
    fn from(brief: GeneratedBrief) -> Self {
        Self {
            filename: brief.filename,
            content_type: DOCX_CONTENT_TYPE.to_string(),
            content: brief.content,
            path: brief.path,
        }
    }
}

/// Email composed for one submission. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<MailAttachment>,
}

impl OutboundMessage {
    pub fn attachment_name(&self) -> Option<&str> {
        self.attachment
            .as_ref()
            .map(|attachment| attachment.filename.as_str())
    }
}

/// Plain-text body for the inquiry inbox.
///
/// The sub-category line only appears when one was chosen. Meeting and event
/// requests repeat the brief fields so the inbox can triage without opening
/// the attachment.
pub fn compose_body(inquiry: &Inquiry, brief: Option<&MeetingBrief>) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "Inquiry Category: {}", inquiry.category());
    if let Some(sub_category) = inquiry.sub_category() {
        let _ = writeln!(body, "Sub Category: {sub_category}");
    }
    let _ = writeln!(body, "Name: {}", field_text(&inquiry.name));
    let _ = writeln!(body, "Email: {}", field_text(&inquiry.email));
    let _ = writeln!(body, "Phone: {}", field_text(&inquiry.phone));
    let _ = writeln!(body, "Message: {}", field_text(&inquiry.message));
    let _ = writeln!(body, "Additional Details: {}", field_text(&inquiry.details));

    if let Some(brief) = brief {
        body.push('\n');
        for line in brief.field_lines() {
            let _ = writeln!(body, "{line}");
        }
    }

    body
}
