//! HTTP routes: webhook receiver, notifier, processing endpoint and the
//! token-checked listing/score intake.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::journal::Journal;
use crate::model::{Character, ListedCharacter, ScoreReport, ScoredCharacter, static_roster};

/// Header carrying the shared API token
const TOKEN_HEADER: &str = "token";

/// Runtime configuration for the roster server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// JSON array of every received character
    pub log_file: PathBuf,
    /// One line per received character
    pub notification_file: PathBuf,
    /// Pinged (GET) after each webhook; failures only logged
    pub notify_url: Option<String>,
    /// Required by `/personnages` and `/scores`; unset rejects every call
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            log_file: PathBuf::from("webhook_log.json"),
            notification_file: PathBuf::from("notifications.txt"),
            notify_url: Some("http://localhost:8000/notifier".to_string()),
            api_token: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    journal: Arc<Mutex<Journal>>,
    notify_url: Option<Arc<str>>,
    api_token: Option<Arc<str>>,
    roster: Arc<Vec<ListedCharacter>>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            journal: Arc::new(Mutex::new(Journal::new(
                &config.log_file,
                &config.notification_file,
            ))),
            notify_url: config.notify_url.as_deref().map(Arc::from),
            api_token: config.api_token.as_deref().map(Arc::from),
            roster: Arc::new(static_roster()),
        }
    }
}

/// Route-level failures, rendered as `{ "detail": ... }`
#[derive(Debug)]
pub enum ApiError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::MissingToken => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "En-tête 'token' manquant",
            ),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Token invalide"),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

fn check_token(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let presented = headers.get(TOKEN_HEADER).ok_or(ApiError::MissingToken)?;
    match &state.api_token {
        Some(expected) if presented.as_bytes() == expected.as_bytes() => Ok(()),
        _ => Err(ApiError::InvalidToken),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/personnage", post(receive_character))
        .route("/notifier", get(notifier))
        .route("/traitement", post(process_character))
        .route("/personnages", get(list_characters))
        .route("/scores", post(submit_score))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<()> {
    if config.api_token.is_none() {
        log::warn!("No API token configured: /personnages and /scores will reject every call");
    }
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Cannot bind {}", config.bind))?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(AppState::new(&config)))
        .await
        .context("Server error")
}

async fn receive_character(
    State(state): State<AppState>,
    Json(character): Json<Character>,
) -> Json<Value> {
    log::info!(
        "Character received: {}, score {}",
        character.name,
        character.score
    );
    let scored = character.classify();
    record(&state, &scored).await;

    if let Some(url) = &state.notify_url {
        ping_notifier(url).await;
    }

    Json(json!({
        "message": "Personnage reçu et enregistré avec succès",
        "niveau": scored.level,
    }))
}

/// Journal and notification writes; failures are logged, the webhook still answers.
///
/// File I/O runs on the blocking pool, one writer at a time.
async fn record(state: &AppState, scored: &ScoredCharacter) {
    let journal = Arc::clone(&state.journal);
    let scored = scored.clone();
    let task = tokio::task::spawn_blocking(move || {
        let journal = journal.lock().unwrap_or_else(PoisonError::into_inner);
        match journal.append(&scored) {
            Ok(count) => log::debug!("Journal now holds {count} entries"),
            Err(e) => log::error!("Journal write failed: {e:#}"),
        }
        match journal.notify(&scored) {
            Ok(()) => log::info!("Notification: {} added", scored.name),
            Err(e) => log::error!("Notification write failed: {e:#}"),
        }
    });
    if let Err(e) = task.await {
        log::error!("Journal task failed: {e}");
    }
}

async fn ping_notifier(url: &str) {
    let timeout = drillbox_core::http_config().timeout;
    let result = drillbox_core::http_client()
        .get(url)
        .timeout(timeout)
        .send()
        .await;
    if let Err(e) = result {
        log::warn!(
            "Notifier unavailable: {}",
            drillbox_core::FetchError::from_reqwest(&e)
        );
    }
}

async fn notifier() -> Json<Value> {
    log::info!("[notifier] a character was just added");
    Json(json!({ "status": "notification envoyée" }))
}

async fn process_character(Json(character): Json<Character>) -> Json<ScoredCharacter> {
    Json(character.classify())
}

async fn list_characters(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ListedCharacter>>, ApiError> {
    check_token(&state, &headers)?;
    Ok(Json(state.roster.as_ref().clone()))
}

async fn submit_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(report): Json<ScoreReport>,
) -> Result<Json<Value>, ApiError> {
    check_token(&state, &headers)?;
    log::info!("Score received: {report:?}");
    Ok(Json(json!({
        "message": "Score bien enregistré",
        "data": report,
    })))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    fn config(dir: &TempDir) -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:0".to_string(),
            log_file: dir.path().join("webhook_log.json"),
            notification_file: dir.path().join("notifications.txt"),
            notify_url: None,
            api_token: Some("s3cret".to_string()),
        }
    }

    fn app(config: &ServerConfig) -> Router {
        router(AppState::new(config))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn webhook_classifies_and_journals() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let response = app(&config)
            .oneshot(post_json(
                "/webhook/personnage",
                json!({ "nom": "Gandalf", "score": 93 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["niveau"], "expert");
        assert_eq!(body["message"], "Personnage reçu et enregistré avec succès");

        let log: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&config.log_file).unwrap()).unwrap();
        assert_eq!(log, vec![json!({ "nom": "Gandalf", "score": 93, "niveau": "expert" })]);
        let notes = std::fs::read_to_string(&config.notification_file).unwrap();
        assert_eq!(notes, "📝 Gandalf ajouté avec le niveau expert\n");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_webhooks_all_land_in_journal() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let app = app(&config);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    app.oneshot(post_json(
                        "/webhook/personnage",
                        json!({ "nom": format!("Hobbit {i}"), "score": i * 6 }),
                    ))
                    .await
                    .unwrap()
                    .status()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        let log: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&config.log_file).unwrap()).unwrap();
        assert_eq!(log.len(), 16);
        let notes = std::fs::read_to_string(&config.notification_file).unwrap();
        assert_eq!(notes.lines().count(), 16);
    }

    #[tokio::test]
    async fn webhook_still_answers_when_log_is_not_an_array() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        std::fs::write(&config.log_file, r#"{"keep": "me"}"#).unwrap();

        let response = app(&config)
            .oneshot(post_json(
                "/webhook/personnage",
                json!({ "nom": "Merry", "score": 66 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            std::fs::read_to_string(&config.log_file).unwrap(),
            r#"{"keep": "me"}"#
        );
        let notes = std::fs::read_to_string(&config.notification_file).unwrap();
        assert_eq!(notes, "📝 Merry ajouté avec le niveau intermédiaire\n");
    }

    #[tokio::test]
    async fn webhook_survives_unreachable_notifier() {
        let dir = TempDir::new().unwrap();
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .unwrap()
            .port();
        let config = ServerConfig {
            notify_url: Some(format!("http://127.0.0.1:{port}/notifier")),
            ..config(&dir)
        };

        let response = app(&config)
            .oneshot(post_json(
                "/webhook/personnage",
                json!({ "nom": "Pippin", "score": 40 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["niveau"], "débutant");
    }

    #[tokio::test]
    async fn webhook_rejects_bad_payload() {
        let dir = TempDir::new().unwrap();
        let response = app(&config(&dir))
            .oneshot(post_json("/webhook/personnage", json!({ "nom": "Sam" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn notifier_acknowledges() {
        let dir = TempDir::new().unwrap();
        let response = app(&config(&dir))
            .oneshot(Request::get("/notifier").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({ "status": "notification envoyée" })
        );
    }

    #[tokio::test]
    async fn traitement_returns_level_without_journaling() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let response = app(&config)
            .oneshot(post_json("/traitement", json!({ "nom": "Frodo", "score": 70 })))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({ "nom": "Frodo", "score": 70, "niveau": "confirmé" })
        );
        assert!(!config.log_file.exists());
    }

    #[tokio::test]
    async fn listing_requires_matching_token() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let ok = app(&config)
            .oneshot(
                Request::get("/personnages")
                    .header("token", "s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        let listed = body_json(ok).await;
        assert_eq!(listed.as_array().unwrap().len(), 4);
        assert_eq!(listed[3]["univers"], "The Witcher");

        let wrong = app(&config)
            .oneshot(
                Request::get("/personnages")
                    .header("token", "guess")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong).await["detail"], "Token invalide");

        let missing = app(&config)
            .oneshot(Request::get("/personnages").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unset_token_rejects_everyone() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            api_token: None,
            ..config(&dir)
        };
        let response = app(&config)
            .oneshot(
                Request::get("/personnages")
                    .header("token", "")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn scores_echo_report() {
        let dir = TempDir::new().unwrap();
        let report = json!({ "nom": "Chat Noir", "ville": "Paris", "revenu": 1250.5, "avis": "bon" });
        let mut request = post_json("/scores", report.clone());
        request
            .headers_mut()
            .insert("token", "s3cret".parse().unwrap());

        let response = app(&config(&dir)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Score bien enregistré");
        assert_eq!(body["data"], report);
    }
}
