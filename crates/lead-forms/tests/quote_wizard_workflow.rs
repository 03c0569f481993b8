use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use lead_forms::config::{EndpointConfig, PresentationConfig};
use lead_forms::forms::{
    Container, FormSchema, FormView, HttpSubmissionEndpoint, SubmissionEndpoint,
    SubmissionError, SubmissionPayload, SubmissionResolution, WizardController, WizardPhase,
};

#[derive(Clone, Copy)]
enum MockReply {
    Accept,
    Busy,
    ServerError,
    Garbage,
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    received: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn receive(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .received
        .lock()
        .expect("received mutex")
        .push((content_type, body));

    match state.reply {
        MockReply::Accept => Json(json!({
            "success": true,
            "message": "Quote request received!"
        }))
        .into_response(),
        MockReply::Busy => Json(json!({ "success": false, "message": "Busy" })).into_response(),
        MockReply::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        MockReply::Garbage => (StatusCode::OK, "<html>oops</html>").into_response(),
    }
}

async fn mock_endpoint(reply: MockReply) -> (EndpointConfig, MockState) {
    let state = MockState {
        reply,
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/request-quote", post(receive))
        .route("/request-consultation", post(receive))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock endpoint serves");
    });

    let config = EndpointConfig::new(format!("http://{addr}")).expect("valid base url");
    (config, state)
}

fn filled_quote_wizard() -> WizardController<FormView> {
    let schema = FormSchema::quote_request();
    let view = FormView::for_schema(&schema);
    let mut wizard = WizardController::new(Arc::new(schema), view, PresentationConfig::default());

    wizard
        .choose("project_type", "new_construction")
        .expect("project type");
    wizard
        .set_value("project_location", "Waukee, IA")
        .expect("location");
    wizard.choose("project_timeline", "3-6_months").expect("timeline");
    assert_eq!(wizard.advance(), Ok(2));

    wizard.choose("budget_range", "250k-500k").expect("budget");
    assert_eq!(wizard.advance(), Ok(3));

    wizard.set_value("full_name", "Avery Lind").expect("name");
    wizard.set_value("email", "a@b.co").expect("email");
    wizard.set_value("phone", "(515) 555-0134").expect("phone");
    wizard
}

#[tokio::test]
async fn accepted_quote_replaces_container_with_thank_you() {
    let (config, state) = mock_endpoint(MockReply::Accept).await;
    let endpoint = HttpSubmissionEndpoint::new(config).expect("client builds");
    let mut wizard = filled_quote_wizard();

    let resolution = wizard.submit(&endpoint).await.expect("submission resolves");
    assert_eq!(resolution, SubmissionResolution::Succeeded);
    assert!(matches!(wizard.phase(), WizardPhase::Succeeded { .. }));

    let view = wizard.presenter();
    assert!(matches!(view.container(), Container::Success { .. }));
    assert!(view.render_text().contains("Thank You!"));

    let received = state.received.lock().expect("received mutex").clone();
    assert_eq!(received.len(), 1);
    let (content_type, body) = &received[0];
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body["project_type"], "new_construction");
    assert_eq!(body["project_timeline"], "3-6_months");
    assert_eq!(body["phone"], "(515) 555-0134");
    assert!(body.get("preferred_contact").is_none());
}

#[tokio::test]
async fn busy_endpoint_leaves_form_interactive() {
    let (config, _state) = mock_endpoint(MockReply::Busy).await;
    let endpoint = HttpSubmissionEndpoint::new(config).expect("client builds");
    let mut wizard = filled_quote_wizard();

    let resolution = wizard.submit(&endpoint).await.expect("submission resolves");
    assert!(matches!(resolution, SubmissionResolution::Failed { .. }));

    let view = wizard.presenter();
    assert_eq!(view.container(), &Container::Form);
    assert!(view.render_text().contains("Error: Busy"));
    assert!(!view.submit_control().disabled);
    assert_eq!(wizard.state().value("full_name"), Some("Avery Lind"));

    assert_eq!(wizard.retreat(), Ok(2));
    assert_eq!(wizard.phase(), &WizardPhase::Editing);
}

#[tokio::test]
async fn server_errors_and_garbage_bodies_become_typed_failures() {
    let payload = SubmissionPayload::default();

    let (config, _) = mock_endpoint(MockReply::ServerError).await;
    let endpoint = HttpSubmissionEndpoint::new(config).expect("client builds");
    let err = endpoint
        .submit("/request-quote", &payload)
        .await
        .expect_err("500 is a failure");
    assert!(matches!(err, SubmissionError::Status(500)));

    let (config, _) = mock_endpoint(MockReply::Garbage).await;
    let endpoint = HttpSubmissionEndpoint::new(config).expect("client builds");
    let err = endpoint
        .submit("/request-quote", &payload)
        .await
        .expect_err("html is not an outcome");
    assert!(matches!(err, SubmissionError::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_shows_network_banner() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let config = EndpointConfig::new(format!("http://{addr}")).expect("valid base url");
    let endpoint = HttpSubmissionEndpoint::new(config).expect("client builds");
    let mut wizard = filled_quote_wizard();

    let resolution = wizard.submit(&endpoint).await.expect("submission resolves");
    match resolution {
        SubmissionResolution::Failed { message, .. } => {
            assert!(message.starts_with("Network error"))
        }
        other => panic!("expected network failure, got {other:?}"),
    }
    assert_eq!(wizard.presenter().banners().len(), 1);
}
