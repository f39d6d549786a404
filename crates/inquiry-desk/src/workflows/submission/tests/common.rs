use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tempfile::TempDir;

use crate::workflows::submission::{
    submission_router, BriefWriter, DeliveryReceipt, Inquiry, MailRoute, MailTransport,
    OutboundMessage, RoutingTable, SubmissionService, TransportError,
};

pub(super) const FROM: &str = "\"Microsite Inquiry\" <desk@example.com>";
pub(super) const TO: &str = "inbox@example.com";

pub(super) fn mail_route() -> MailRoute {
    MailRoute {
        from: FROM.to_string(),
        to: TO.to_string(),
    }
}

/// Transport double that keeps every message it is handed.
#[derive(Default)]
pub(super) struct RecordingTransport {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingTransport {
    pub(super) fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("transport mutex poisoned").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: OutboundMessage) -> Result<DeliveryReceipt, TransportError> {
        self.sent
            .lock()
            .expect("transport mutex poisoned")
            .push(message);
        Ok(DeliveryReceipt {
            response: "250 OK".to_string(),
        })
    }
}

pub(super) struct FailingTransport;

#[async_trait]
impl MailTransport for FailingTransport {
    async fn send(&self, _message: OutboundMessage) -> Result<DeliveryReceipt, TransportError> {
        Err(TransportError::Send(
            "535 5.7.8 credentials rejected".to_string(),
        ))
    }
}

pub(super) struct PanickingTransport;

#[async_trait]
impl MailTransport for PanickingTransport {
    async fn send(&self, _message: OutboundMessage) -> Result<DeliveryReceipt, TransportError> {
        panic!("relay client crashed");
    }
}

pub(super) fn service_with<T>(transport: Arc<T>, output: &TempDir) -> SubmissionService<T>
where
    T: MailTransport + 'static,
{
    SubmissionService::new(
        Arc::new(RoutingTable::with_defaults()),
        BriefWriter::new(output.path().join("generated_docs")),
        transport,
        mail_route(),
    )
}

pub(super) fn build_service() -> (
    SubmissionService<RecordingTransport>,
    Arc<RecordingTransport>,
    TempDir,
) {
    let output = TempDir::new().expect("tempdir");
    let transport = Arc::new(RecordingTransport::default());
    let service = service_with(transport.clone(), &output);
    (service, transport, output)
}

pub(super) fn router_for<T>(service: SubmissionService<T>) -> axum::Router
where
    T: MailTransport + 'static,
{
    submission_router(Arc::new(service))
}

pub(super) fn ndis_inquiry() -> Inquiry {
    Inquiry {
        category: Some("NDIS".to_string()),
        name: Some("Jane".to_string()),
        email: Some("j@x.com".to_string()),
        message: Some("Help".to_string()),
        ..Inquiry::default()
    }
}

pub(super) fn meeting_inquiry() -> Inquiry {
    Inquiry {
        category: Some("Meeting Request".to_string()),
        meeting_title: Some("Budget Review".to_string()),
        location: Some("Room 4".to_string()),
        ..Inquiry::default()
    }
}

pub(super) fn json_request(uri: &str, body: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
