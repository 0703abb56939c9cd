use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::rejection::FormRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::catalog::{self, Place};
use crate::config::Config;
use crate::contact::{self, transport_for, ContactError, ContactForm, MailTransport};
use crate::engine::ScoredPlace;
use crate::output::cards::{render_cards, APOLOGY_HTML};
use crate::prefs::{PreferenceForm, Preferences};
use crate::session::Session;

#[derive(Clone)]
pub struct ApiState {
    config: Config,
    session: Option<Arc<Mutex<Session>>>,
    transport: Arc<dyn MailTransport>,
}

impl ApiState {
    /// `session` is `None` when the catalog could not be loaded.
    pub fn new(config: Config, session: Option<Session>, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            config,
            session: session.map(|s| Arc::new(Mutex::new(s))),
            transport,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn unavailable() -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "catalog unavailable".to_string(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    places: usize,
}

#[derive(Debug, Serialize)]
struct PickView {
    place: Place,
    score: u32,
    copy_text: String,
}

#[derive(Debug, Serialize)]
struct PicksResponse {
    prefs: Preferences,
    picks: Vec<PickView>,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/places", get(places))
        .route("/v1/picks", post(picks))
        .route("/v1/reroll", post(reroll))
        .route("/picks", get(picks_html))
        .route("/contact", post(submit_contact).fallback(method_not_allowed))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let session = match catalog::load_from_config(&config.catalog).await {
        Ok(catalog) => Some(Session::new(catalog)),
        Err(err) => {
            warn!("serving without a catalog: {err}");
            None
        }
    };
    let transport = transport_for(&config.contact.webhook_url);
    let app = router(ApiState::new(config, session, transport));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<ApiState>) -> Json<ApiResponse<HealthResponse>> {
    let places = state
        .session
        .as_ref()
        .and_then(|session| session.lock().ok().map(|s| s.catalog().len()))
        .unwrap_or(0);
    ok(HealthResponse {
        status: "ok",
        places,
    })
}

async fn places(State(state): State<ApiState>) -> ApiResult<Vec<Place>> {
    let session = state.session.as_ref().ok_or_else(ApiError::unavailable)?;
    let guard = session.lock().map_err(ApiError::internal)?;
    Ok(ok(guard.catalog().places().to_vec()))
}

async fn picks(
    State(state): State<ApiState>,
    Json(form): Json<PreferenceForm>,
) -> ApiResult<PicksResponse> {
    let prefs =
        Preferences::try_from(&form).map_err(|err| ApiError::bad_request(err.to_string()))?;
    let session = state.session.as_ref().ok_or_else(ApiError::unavailable)?;
    let mut guard = session.lock().map_err(ApiError::internal)?;
    let picks = guard.compute(prefs, &mut rand::thread_rng()).to_vec();
    Ok(ok(picks_response(guard.last_prefs().clone(), picks)))
}

async fn reroll(State(state): State<ApiState>) -> ApiResult<PicksResponse> {
    let session = state.session.as_ref().ok_or_else(ApiError::unavailable)?;
    let mut guard = session.lock().map_err(ApiError::internal)?;
    let picks = guard.reroll(&mut rand::thread_rng()).to_vec();
    Ok(ok(picks_response(guard.last_prefs().clone(), picks)))
}

async fn picks_html(State(state): State<ApiState>, Query(form): Query<PreferenceForm>) -> Response {
    let prefs = match Preferences::try_from(&form) {
        Ok(prefs) => prefs,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };
    let Some(session) = state.session.as_ref() else {
        return Html(APOLOGY_HTML).into_response();
    };
    let Ok(mut guard) = session.lock() else {
        return Html(APOLOGY_HTML).into_response();
    };
    let picks = guard.compute(prefs, &mut rand::thread_rng());
    Html(render_cards(picks.iter().map(|pick| &pick.place))).into_response()
}

async fn submit_contact(
    State(state): State<ApiState>,
    form: std::result::Result<Form<ContactForm>, FormRejection>,
) -> Response {
    // An unreadable body carries no fields at all.
    let Ok(Form(form)) = form else {
        return (StatusCode::BAD_REQUEST, ContactError::MissingFields.to_string()).into_response();
    };
    match contact::relay(&form, &state.config.contact, state.transport.as_ref()).await {
        Ok(_) => Redirect::to(&state.config.contact.redirect_to).into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn picks_response(prefs: Preferences, picks: Vec<ScoredPlace>) -> PicksResponse {
    PicksResponse {
        prefs,
        picks: picks
            .into_iter()
            .map(|pick| PickView {
                copy_text: pick.place.copy_text(),
                place: pick.place,
                score: pick.score,
            })
            .collect(),
    }
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::{Catalog, DurationRange, Links, SocialEnergy};
    use crate::contact::MemoryTransport;

    fn catalog() -> Catalog {
        let places = (0..6)
            .map(|id| Place {
                id: id.to_string(),
                name: format!("Place {id}"),
                category: "museum".to_string(),
                area: "Ixelles".to_string(),
                address: String::new(),
                transit: Vec::new(),
                budget: None,
                duration: DurationRange::default(),
                time_of_day: vec!["morning".to_string()],
                rainy_ok: Some(true),
                social_energy: Some(SocialEnergy::Low),
                solo_why: "Calme".to_string(),
                links: Links::default(),
            })
            .collect();
        Catalog::new(places, "test")
    }

    fn app(outbox: MemoryTransport) -> Router {
        router(ApiState::new(
            Config::default(),
            Some(Session::new(catalog())),
            Arc::new(outbox),
        ))
    }

    fn offline_app() -> Router {
        router(ApiState::new(
            Config::default(),
            None,
            Arc::new(MemoryTransport::default()),
        ))
    }

    fn contact_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("failed to build request")
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        String::from_utf8(bytes.to_vec()).expect("body is not utf-8")
    }

    #[tokio::test]
    async fn contact_rejects_other_methods() {
        let response = app(MemoryTransport::default())
            .oneshot(
                Request::builder()
                    .uri("/contact")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_text(response).await, "Method not allowed");
    }

    #[tokio::test]
    async fn contact_with_empty_why_is_bad_request() {
        let outbox = MemoryTransport::default();
        let response = app(outbox.clone())
            .oneshot(contact_request(
                "name=Ana&email=ana%40example.be&place=Wiels&why=",
            ))
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing required fields");
        assert!(outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn contact_with_bad_email_is_bad_request() {
        let response = app(MemoryTransport::default())
            .oneshot(contact_request(
                "name=Ana&email=ana&place=Wiels&why=Calme",
            ))
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid email");
    }

    #[tokio::test]
    async fn contact_success_redirects_and_sends() {
        let outbox = MemoryTransport::default();
        let response = app(outbox.clone())
            .oneshot(contact_request(
                "name=Ana&email=ana%40example.be&place=Wiels&why=Expo+au+calme",
            ))
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/merci.html");
        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Expo au calme"));
    }

    #[tokio::test]
    async fn contact_with_json_body_is_plain_bad_request() {
        let outbox = MemoryTransport::default();
        let response = app(outbox.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/contact")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Ana"}"#))
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing required fields");
        assert!(outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn picks_returns_at_most_three() {
        let response = app(MemoryTransport::default())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/picks")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"moment":"morning","energy":"low"}"#))
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::OK);
        let payload: Value =
            serde_json::from_str(&body_text(response).await).expect("invalid json");
        let picks = payload["data"]["picks"].as_array().expect("missing picks");
        assert_eq!(picks.len(), 3);
        assert!(picks.iter().all(|p| p["score"].as_u64() == Some(6)));
        assert_eq!(picks[0]["copy_text"].as_str().map(|s| s.ends_with("— Ixelles")), Some(true));
    }

    #[tokio::test]
    async fn picks_rejects_unknown_preference() {
        let response = app(MemoryTransport::default())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/picks")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"budget":"lavish"}"#))
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cards_fragment_renders_picks() {
        let response = app(MemoryTransport::default())
            .oneshot(
                Request::builder()
                    .uri("/picks?rain=rain&category=museum")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert_eq!(html.matches("<article").count(), 3);
    }

    #[tokio::test]
    async fn offline_catalog_renders_apology() {
        let response = offline_app()
            .oneshot(
                Request::builder()
                    .uri("/picks")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(body_text(response).await, APOLOGY_HTML);

        let response = offline_app()
            .oneshot(
                Request::builder()
                    .uri("/v1/places")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
