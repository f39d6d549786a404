use std::collections::BTreeMap;

use crate::workflows::submission::routing::{needs_document, GENERAL_INQUIRY_SUBJECT};
use crate::workflows::submission::{Inquiry, RoutingTable};

fn inquiry(category: Option<&str>, sub_category: Option<&str>) -> Inquiry {
    Inquiry {
        category: category.map(str::to_string),
        sub_category: sub_category.map(str::to_string),
        ..Inquiry::default()
    }
}

#[test]
fn known_categories_map_to_table_subjects() {
    let table = RoutingTable::with_defaults();

    for (category, subject) in table.snapshot() {
        let classification = table.classify(&inquiry(Some(category.as_str()), None));
        assert_eq!(classification.subject, subject, "category {category}");
    }
}

#[test]
fn unknown_categories_fall_back_to_general_inquiry() {
    let table = RoutingTable::with_defaults();

    for category in ["", "ndis", "Meeting request", " NDIS", "Pension"] {
        let classification = table.classify(&inquiry(Some(category), None));
        assert_eq!(classification.subject, GENERAL_INQUIRY_SUBJECT);
        assert!(!classification.needs_document);
    }
}

#[test]
fn missing_category_is_a_general_inquiry() {
    let classification = RoutingTable::with_defaults().classify(&inquiry(None, None));
    assert_eq!(classification.subject, "General Inquiry");
    assert!(!classification.needs_document);
}

#[test]
fn sub_category_suffix_applies_to_any_category() {
    let table = RoutingTable::with_defaults();

    let services = table.classify(&inquiry(Some("Services Australia"), Some("Centrelink")));
    assert_eq!(services.subject, "Services Australia Inquiry - Centrelink");

    let medicare = table.classify(&inquiry(Some("Medicare"), Some("Child Support")));
    assert_eq!(medicare.subject, "Medicare Inquiry - Child Support");

    let unknown = table.classify(&inquiry(Some("Other"), Some("Centrelink")));
    assert_eq!(unknown.subject, "General Inquiry - Centrelink");
}

#[test]
fn empty_sub_category_adds_no_suffix() {
    let table = RoutingTable::with_defaults();
    let classification = table.classify(&inquiry(Some("NDIS"), Some("")));
    assert_eq!(classification.subject, "NDIS Inquiry");
}

#[test]
fn only_meeting_and_event_categories_need_documents() {
    assert!(needs_document("Meeting Request"));
    assert!(needs_document("Event Invitation"));

    for category in [
        "",
        "meeting request",
        "Meeting Request ",
        "EVENT INVITATION",
        "NDIS",
        "Flag Request",
    ] {
        assert!(!needs_document(category), "category {category:?}");
    }
}

#[test]
fn injected_tables_are_isolated() {
    let mut rules = BTreeMap::new();
    rules.insert("NDIS".to_string(), "Disability Desk".to_string());
    let custom = RoutingTable::new(rules);
    let defaults = RoutingTable::with_defaults();

    assert_eq!(
        custom.classify(&inquiry(Some("NDIS"), None)).subject,
        "Disability Desk"
    );
    assert_eq!(
        defaults.classify(&inquiry(Some("NDIS"), None)).subject,
        "NDIS Inquiry"
    );
}

#[test]
fn update_replaces_subject_for_later_reads() {
    let table = RoutingTable::with_defaults();

    let previous = table.update("Medicare", "Medicare Desk");

    assert_eq!(previous.as_deref(), Some("Medicare Inquiry"));
    assert_eq!(
        table.classify(&inquiry(Some("Medicare"), None)).subject,
        "Medicare Desk"
    );
    assert_eq!(table.update("Pension", "Pension Inquiry"), None);
    assert_eq!(table.snapshot().len(), 10);
}
