use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, warn};

use super::domain::Inquiry;
use super::service::{SubmissionOutcome, SubmissionService};
use super::transport::MailTransport;

/// Router builder exposing the form submission and admin endpoints.
pub fn submission_router<T>(service: Arc<SubmissionService<T>>) -> Router
where
    T: MailTransport + 'static,
{
    Router::new()
        .route("/submit", post(submit_handler::<T>))
        .route("/admin", get(admin_handler::<T>))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(service)
}

/// Wire body for every `/submit` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
}

impl From<SubmissionOutcome> for SubmissionResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            message: outcome.client_message().to_string(),
        }
    }
}

pub(crate) fn outcome_response(outcome: SubmissionOutcome) -> Response {
    (outcome.status_code(), Json(SubmissionResponse::from(outcome))).into_response()
}

/// Inquiry decoded from either a JSON or a urlencoded form body.
#[derive(Debug)]
pub struct InquiryPayload(pub Inquiry);

#[async_trait]
impl<S> FromRequest<S> for InquiryPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let parsed = if is_form {
            Form::<Inquiry>::from_request(req, state)
                .await
                .map(|Form(inquiry)| inquiry)
                .map_err(|rejection| rejection.body_text())
        } else {
            Json::<Inquiry>::from_request(req, state)
                .await
                .map(|Json(inquiry)| inquiry)
                .map_err(|rejection| rejection.body_text())
        };

        parsed.map(InquiryPayload).map_err(|detail| {
            warn!(%detail, "rejected malformed submission");
            outcome_response(SubmissionOutcome::MalformedInput)
        })
    }
}

pub(crate) async fn submit_handler<T>(
    State(service): State<Arc<SubmissionService<T>>>,
    InquiryPayload(inquiry): InquiryPayload,
) -> Response
where
    T: MailTransport + 'static,
{
    match service.submit(inquiry).await {
        Ok(_) => outcome_response(SubmissionOutcome::Success),
        Err(err) => {
            error!(error = %err, "inquiry submission failed");
            outcome_response(err.outcome())
        }
    }
}

pub(crate) async fn admin_handler<T>(
    State(service): State<Arc<SubmissionService<T>>>,
) -> Html<String>
where
    T: MailTransport + 'static,
{
    Html(render_admin_page(&service.routing().snapshot()))
}

/// Read-only listing of the routing rules. There is no update form.
pub fn render_admin_page(rules: &BTreeMap<String, String>) -> String {
    let rules_json = serde_json::to_string_pretty(rules).unwrap_or_else(|_| "{}".to_string());
    format!(
        "<html><head><title>Admin Panel</title></head><body>\n\
         <h1>Email Routing Rules</h1>\n\
         <pre>{}</pre>\n\
         </body></html>",
        escape_html(&rules_json)
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(%detail, "submission handler panicked");
    outcome_response(SubmissionOutcome::Unexpected)
}
