use serde::{Deserialize, Serialize};

/// Category whose submissions carry a meeting brief.
pub const MEETING_REQUEST: &str = "Meeting Request";
/// Category whose submissions carry a meeting brief.
pub const EVENT_INVITATION: &str = "Event Invitation";

/// One form submission as posted by the microsite.
///
/// Every field is optional free text; the form only sends the fields that are
/// visible for the selected category. Field names follow the form's camelCase
/// input names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Inquiry {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub meeting_title: Option<String>,
    pub location: Option<String>,
    pub meeting_date_time: Option<String>,
    pub attendees: Option<String>,
    pub contact_person: Option<String>,
    pub meeting_purpose: Option<String>,
    pub previous_notes: Option<String>,
    pub initiated_by: Option<String>,
    pub agenda: Option<String>,
    pub background_notes: Option<String>,
    pub meeting_notes: Option<String>,
}

impl Inquiry {
    pub fn category(&self) -> &str {
        field_text(&self.category)
    }

    /// Sub-category, only when it carries text.
    pub fn sub_category(&self) -> Option<&str> {
        self.sub_category
            .as_deref()
            .filter(|value| !value.is_empty())
    }
}

/// Renders an optional form field for composed text: absent means empty.
pub fn field_text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_form_fields() {
        let inquiry: Inquiry = serde_json::from_str(
            r#"{"category":"Services Australia","subCategory":"Centrelink","meetingDateTime":"Fri 10am","unknown":"ignored"}"#,
        )
        .expect("payload parses");

        assert_eq!(inquiry.category(), "Services Australia");
        assert_eq!(inquiry.sub_category(), Some("Centrelink"));
        assert_eq!(inquiry.meeting_date_time.as_deref(), Some("Fri 10am"));
        assert!(inquiry.name.is_none());
    }

    #[test]
    fn absent_fields_render_empty() {
        let inquiry = Inquiry::default();
        assert_eq!(inquiry.category(), "");
        assert_eq!(field_text(&inquiry.phone), "");
        assert_eq!(inquiry.sub_category(), None);
    }

    #[test]
    fn empty_sub_category_is_ignored() {
        let inquiry = Inquiry {
            sub_category: Some(String::new()),
            ..Inquiry::default()
        };
        assert_eq!(inquiry.sub_category(), None);
    }
}
