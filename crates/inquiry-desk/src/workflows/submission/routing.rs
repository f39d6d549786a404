use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;

use super::domain::{Inquiry, EVENT_INVITATION, MEETING_REQUEST};

/// Subject used for categories the routing table does not know.
pub const GENERAL_INQUIRY_SUBJECT: &str = "General Inquiry";

const DEFAULT_RULES: [(&str, &str); 9] = [
    ("NDIS", "NDIS Inquiry"),
    ("Services Australia", "Services Australia Inquiry"),
    ("Aged Care", "Aged Care Inquiry"),
    ("Medicare", "Medicare Inquiry"),
    ("Australian Tax Office", "ATO Inquiry"),
    ("Visa and Immigration Issues", "Visa/Immigration Inquiry"),
    ("Flag Request", "Flag Request Inquiry"),
    (MEETING_REQUEST, "Meeting Request"),
    (EVENT_INVITATION, "Event Invitation"),
];

/// Category to email-subject mapping shared by every in-flight submission.
///
/// Readers never hold the lock across an await point: lookups clone the
/// subject out and `snapshot` copies the whole table.
#[derive(Debug)]
pub struct RoutingTable {
    rules: RwLock<BTreeMap<String, String>>,
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl RoutingTable {
    pub fn new(rules: BTreeMap<String, String>) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }

    /// Table pre-populated with one subject per known inquiry category.
    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(category, subject)| (category.to_string(), subject.to_string()))
                .collect(),
        )
    }

    pub fn subject_for(&self, category: &str) -> Option<String> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(category)
            .cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Insert or replace a rule, returning the subject it displaced.
    pub fn update(
        &self,
        category: impl Into<String>,
        subject: impl Into<String>,
    ) -> Option<String> {
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category.into(), subject.into())
    }

    pub fn classify(&self, inquiry: &Inquiry) -> Classification {
        let category = inquiry.category();
        let mut subject = self
            .subject_for(category)
            .unwrap_or_else(|| GENERAL_INQUIRY_SUBJECT.to_string());
        // Suffix applies to every category, not only Services Australia.
        if let Some(sub_category) = inquiry.sub_category() {
            subject.push_str(" - ");
            subject.push_str(sub_category);
        }

        Classification {
            subject,
            needs_document: needs_document(category),
        }
    }
}

/// Routing decision for a single inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub subject: String,
    pub needs_document: bool,
}

/// Exact, case-sensitive match on the categories that carry a meeting brief.
pub fn needs_document(category: &str) -> bool {
    category == MEETING_REQUEST || category == EVENT_INVITATION
}
