use analytics::StatisticsEngine;
use axum::{Router, routing::get};
use configuration::{Config, StorageBackend};
use database::{CsvSource, ObservationSource, ObservationStore, PgSource};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: StatisticsEngine,
}

impl AppState {
    pub fn new(config: Arc<Config>, engine: StatisticsEngine) -> Self {
        Self { config, engine }
    }

    /// Wires the observation source named by the configuration into a
    /// statistics engine over the configured symbol universe.
    pub async fn from_config(config: Arc<Config>) -> anyhow::Result<Self> {
        let source: Arc<dyn ObservationSource> = match config.storage.backend {
            StorageBackend::Csv => {
                let dir = config
                    .storage
                    .path
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("storage.path must be set for the csv backend"))?;
                tracing::info!(path = %dir.display(), "Using CSV observation source.");
                Arc::new(CsvSource::new(dir))
            }
            StorageBackend::Postgres => {
                let pool = database::connect().await?;
                database::run_migrations(&pool).await?;
                tracing::info!("Using PostgreSQL observation source.");
                Arc::new(PgSource::new(pool))
            }
        };

        let engine = StatisticsEngine::new(ObservationStore::new(source), config.symbols.clone());
        Ok(Self::new(config, engine))
    }
}

/// Builds the application routes on top of the given state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/currency/symbols", get(handlers::get_symbols))
        .route("/currency/:symbol/statistics", get(handlers::get_statistics))
        .route("/currency/:symbol/statistics/:date", get(handlers::get_statistics_for_day))
        .route("/currency/sorted-by-normalized-range", get(handlers::get_sorted_by_normalized_range))
        .route("/currency/normalized-ranges", get(handlers::get_normalized_ranges))
        .route("/currency/highest-normalized-range/:date", get(handlers::get_highest_normalized_range))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Runs the HTTP server until Ctrl-C.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use configuration::{Logging, Server, Storage};
    use core_types::{Observation, SymbolUniverse};
    use database::MemorySource;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_app(source: MemorySource) -> Router {
        let symbols = SymbolUniverse::new(["BTC", "ETH", "LTC", "XRP"]).unwrap();
        let config = Arc::new(Config {
            symbols: symbols.clone(),
            storage: Storage {
                backend: StorageBackend::Csv,
                path: None,
            },
            server: Server::default(),
            logging: Logging::default(),
        });
        let engine = StatisticsEngine::new(ObservationStore::new(Arc::new(source)), symbols);
        router(Arc::new(AppState::new(config, engine)))
    }

    fn reference_source() -> MemorySource {
        let at = |hour| Utc.with_ymd_and_hms(2022, 1, 1, hour, 0, 0).unwrap();
        MemorySource::new()
            .with_observations(
                "BTC",
                vec![
                    Observation::new(at(4), "BTC", dec!(10)),
                    Observation::new(at(5), "BTC", dec!(2)),
                ],
            )
            .with_observations(
                "ETH",
                vec![
                    Observation::new(at(4), "ETH", dec!(1)),
                    Observation::new(at(5), "ETH", dec!(10)),
                ],
            )
            .with_observations(
                "LTC",
                vec![
                    Observation::new(at(4), "LTC", dec!(3)),
                    Observation::new(at(5), "LTC", dec!(10)),
                ],
            )
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn statistics_for_a_valid_symbol() {
        let (status, body) = get(test_app(reference_source()), "/currency/BTC/statistics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["minimum"]["price"], "2");
        assert_eq!(body["maximum"]["price"], "10");
        assert_eq!(body["oldest"]["timestamp"], "2022-01-01T04:00:00Z");
        assert_eq!(body["newest"]["timestamp"], "2022-01-01T05:00:00Z");
    }

    #[tokio::test]
    async fn statistics_for_a_symbol_without_data_are_nulls() {
        let (status, body) = get(test_app(reference_source()), "/currency/XRP/statistics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "minimum": null, "maximum": null, "oldest": null, "newest": null })
        );
    }

    #[tokio::test]
    async fn unknown_symbol_is_forbidden() {
        let (status, body) = get(test_app(reference_source()), "/currency/DOGE/statistics").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Invalid crypto currency symbol: DOGE");
    }

    #[tokio::test]
    async fn statistics_for_a_day() {
        let app = test_app(reference_source());

        let (status, body) = get(app.clone(), "/currency/ETH/statistics/2022-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["minimum"]["price"], "1");

        let (status, body) = get(app, "/currency/ETH/statistics/2022-01-02").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["minimum"], Value::Null);
    }

    #[tokio::test]
    async fn sorted_by_normalized_range() {
        let (status, body) = get(test_app(reference_source()), "/currency/sorted-by-normalized-range").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["ETH", "BTC", "LTC"]));
    }

    #[tokio::test]
    async fn normalized_ranges_carry_their_values() {
        let (status, body) = get(test_app(reference_source()), "/currency/normalized-ranges").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                { "symbol": "ETH", "normalized_range": "9.00" },
                { "symbol": "BTC", "normalized_range": "4.00" },
                { "symbol": "LTC", "normalized_range": "2.33" },
            ])
        );
    }

    #[tokio::test]
    async fn highest_normalized_range_for_a_day() {
        let app = test_app(reference_source());

        let (status, body) = get(app.clone(), "/currency/highest-normalized-range/2022-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("ETH"));

        let (status, body) = get(app, "/currency/highest-normalized-range/2022-01-02").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("2022-01-02"));
    }

    #[tokio::test]
    async fn malformed_date_is_a_bad_request() {
        let (status, body) = get(test_app(reference_source()), "/currency/highest-normalized-range/01-01-2022").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn unavailable_source_is_an_internal_error() {
        let (status, body) = get(
            test_app(reference_source().with_unavailable("LTC")),
            "/currency/sorted-by-normalized-range",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Price data is currently unavailable");
    }

    #[tokio::test]
    async fn lists_configured_symbols() {
        let (status, body) = get(test_app(MemorySource::new()), "/currency/symbols").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["BTC", "ETH", "LTC", "XRP"]));
    }
}
