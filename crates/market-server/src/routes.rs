//! Router and handlers

use crate::api::ApiResponse;
use crate::error::{Result, ServerError};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use market_scripts::Prediction;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

/// Maximum accepted request body
pub const BODY_LIMIT_BYTES: usize = 16 * 1024;

/// Body of `POST /api/v1/query/prompt`
#[derive(Debug, Deserialize)]
struct QueryRequest {
    #[serde(rename = "Query", default)]
    query: Option<Value>,
}

/// Data returned by `POST /api/v1/data/collect`
#[derive(Debug, Serialize)]
struct CollectionLog {
    log: String,
}

/// Build the application router
///
/// With `cors_origin` set, only that origin is allowed and credentials are
/// enabled; otherwise CORS is permissive.
pub fn router(state: AppState, cors_origin: Option<&str>) -> Result<Router> {
    let cors = match cors_origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .map_err(|e| ServerError::Config(format!("invalid CORS origin {origin:?}: {e}")))?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        }
        None => CorsLayer::permissive(),
    };

    Ok(Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/query/prompt", post(query_prompt))
        .route("/api/v1/data/collect", post(collect_data))
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "Server is running" }))
}

#[instrument(skip_all)]
async fn query_prompt(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<ApiResponse<Prediction>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected prompt body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge {
                limit: BODY_LIMIT_BYTES,
            }
        } else {
            ServerError::MissingQuery
        }
    })?;

    let query = match request.query {
        Some(Value::String(text)) if !text.trim().is_empty() => text,
        _ => return Err(ServerError::MissingQuery),
    };

    let extraction = state.extractor.extract_detailed(&query).await;
    if extraction.outcome.is_failure() {
        warn!(
            outcome = ?extraction.outcome,
            "Entity extraction failed, treating prompt as unresolved"
        );
    }
    let entities = extraction.result;
    info!(
        company = ?entities.company_name,
        ticker = ?entities.ticker,
        date_range = ?entities.date_range,
        "Extracted entities"
    );

    let (Some(ticker), Some(_)) = (entities.ticker, entities.date_range) else {
        return Err(ServerError::EntitiesNotFound);
    };

    let prediction = state
        .scripts
        .predict(&ticker)
        .await
        .map_err(ServerError::prediction)?;

    Ok(ApiResponse::ok(prediction, "Prediction successful."))
}

#[instrument(skip_all)]
async fn collect_data(State(state): State<AppState>) -> Result<ApiResponse<CollectionLog>> {
    info!("Triggering data collection");
    let log = state
        .scripts
        .collect_data()
        .await
        .map_err(ServerError::collection)?;

    Ok(ApiResponse::ok(
        CollectionLog { log },
        "Data collection process finished successfully.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use market_llm::{CompletionProvider, CompletionRequest, CompletionResponse, LLMError};
    use market_ner::EntityExtractor;
    use market_scripts::{DataWindow, MarketScripts, PricePoint, ScriptError};
    use mockall::mock;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    mock! {
        pub Scripts {}

        #[async_trait]
        impl MarketScripts for Scripts {
            async fn collect_data(&self) -> market_scripts::Result<String>;
            async fn predict(&self, ticker: &str) -> market_scripts::Result<Prediction>;
        }
    }

    /// Provider that always answers with the same completion, or fails
    struct CannedProvider {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> market_llm::Result<CompletionResponse> {
            match self.reply {
                Some(text) => Ok(CompletionResponse {
                    text: text.to_string(),
                    finish_reason: None,
                    usage: None,
                }),
                None => Err(LLMError::RequestFailed("connection refused".to_string())),
            }
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    const RELIANCE_REPLY: &str = r#" {"company_name": "Reliance Industries", "ticker": "RELIANCE.NS", "date_range": "next month"}"#;
    const NO_TICKER_REPLY: &str =
        r#"{"company_name": null, "ticker": null, "date_range": "next week"}"#;

    fn sample_prediction(ticker: &str) -> Prediction {
        Prediction {
            ticker: ticker.to_string(),
            prediction_date: "2025-01-03".to_string(),
            predicted_price: 2950.5,
            data_used: DataWindow {
                start_point: PricePoint {
                    date: "2024-11-20".to_string(),
                    price: 2800.0,
                },
                end_point: PricePoint {
                    date: "2025-01-02".to_string(),
                    price: 2941.2,
                },
            },
        }
    }

    fn app(reply: Option<&'static str>, scripts: MockScripts) -> Router {
        let extractor = EntityExtractor::new(Arc::new(CannedProvider { reply }));
        router(AppState::new(extractor, Arc::new(scripts)), None).unwrap()
    }

    fn prompt_request(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/query/prompt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn collect_request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/data/collect")
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(
            app(None, MockScripts::new()),
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "OK", "message": "Server is running"}));
    }

    #[tokio::test]
    async fn test_prompt_success() {
        let mut scripts = MockScripts::new();
        scripts
            .expect_predict()
            .times(1)
            .returning(|ticker| Ok(sample_prediction(ticker)));

        let (status, body) = send(
            app(Some(RELIANCE_REPLY), scripts),
            prompt_request(r#"{"Query": "What do you think about reliance industries for next month?"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Prediction successful.");
        assert_eq!(body["data"]["ticker"], "RELIANCE.NS");
        assert_eq!(body["data"]["data_used"]["end_point"]["price"], 2941.2);
    }

    #[tokio::test]
    async fn test_prompt_missing_query() {
        for payload in [r#"{}"#, r#"{"Query": "   "}"#, r#"{"Query": 42}"#, "not json"] {
            let (status, body) = send(
                app(Some(RELIANCE_REPLY), MockScripts::new()),
                prompt_request(payload),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
            assert_eq!(
                body,
                json!({
                    "statusCode": 400,
                    "message": "The 'Query' field is required in the request body.",
                    "success": false,
                    "errors": []
                })
            );
        }
    }

    #[tokio::test]
    async fn test_prompt_without_ticker() {
        let mut scripts = MockScripts::new();
        scripts.expect_predict().never();

        let (status, body) = send(
            app(Some(NO_TICKER_REPLY), scripts),
            prompt_request(r#"{"Query": "what is the general market trend"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Could not extract a valid stock ticker and date range from the prompt."
        );
    }

    #[tokio::test]
    async fn test_prompt_when_model_unreachable() {
        let mut scripts = MockScripts::new();
        scripts.expect_predict().never();

        let (status, body) = send(
            app(None, scripts),
            prompt_request(r#"{"Query": "How is TCS doing this week?"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_prompt_script_failure() {
        let mut scripts = MockScripts::new();
        scripts.expect_predict().times(1).returning(|_| {
            Err(ScriptError::Failed {
                script: "prediction_handler.py".to_string(),
                code: Some(1),
                stderr: "FileNotFoundError: model.keras\n".to_string(),
            })
        });

        let (status, body) = send(
            app(Some(RELIANCE_REPLY), scripts),
            prompt_request(r#"{"Query": "reliance next month"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["statusCode"], 500);
        assert_eq!(body["message"], "Prediction script failed.");
        assert_eq!(body["errors"], json!(["FileNotFoundError: model.keras"]));
    }

    #[tokio::test]
    async fn test_prompt_script_reported_error() {
        let mut scripts = MockScripts::new();
        scripts
            .expect_predict()
            .returning(|_| Err(ScriptError::Reported("Not enough data".to_string())));

        let (status, body) = send(
            app(Some(RELIANCE_REPLY), scripts),
            prompt_request(r#"{"Query": "reliance next month"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "The prediction script returned an error.");
        assert_eq!(body["errors"], json!(["Not enough data"]));
    }

    #[tokio::test]
    async fn test_prompt_body_too_large() {
        let query = "a".repeat(BODY_LIMIT_BYTES);
        let payload = json!({ "Query": query }).to_string();

        let (status, body) = send(
            app(Some(RELIANCE_REPLY), MockScripts::new()),
            prompt_request(payload),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["statusCode"], 413);
    }

    #[tokio::test]
    async fn test_collect_success() {
        let mut scripts = MockScripts::new();
        scripts
            .expect_collect_data()
            .times(1)
            .returning(|| Ok("Inserted 50 rows\n".to_string()));

        let (status, body) = send(app(None, scripts), collect_request()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "statusCode": 200,
                "data": {"log": "Inserted 50 rows\n"},
                "message": "Data collection process finished successfully.",
                "success": true
            })
        );
    }

    #[tokio::test]
    async fn test_collect_timeout() {
        let mut scripts = MockScripts::new();
        scripts.expect_collect_data().returning(|| {
            Err(ScriptError::TimedOut {
                script: "daily_collector.py".to_string(),
                timeout: Duration::from_secs(300),
            })
        });

        let (status, body) = send(app(None, scripts), collect_request()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["message"],
            "Data collection script timed out after 300 seconds."
        );
    }

    #[tokio::test]
    async fn test_cors_with_configured_origin() {
        let extractor = EntityExtractor::new(Arc::new(CannedProvider { reply: None }));
        let app = router(
            AppState::new(extractor, Arc::new(MockScripts::new())),
            Some("http://localhost:5173"),
        )
        .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[test]
    fn test_invalid_cors_origin() {
        let extractor = EntityExtractor::new(Arc::new(CannedProvider { reply: None }));
        let result = router(
            AppState::new(extractor, Arc::new(MockScripts::new())),
            Some("http://bad\norigin"),
        );
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
