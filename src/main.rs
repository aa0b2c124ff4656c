use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use fitjourney::config::Settings;
use fitjourney::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use fitjourney::services::{AiPlanClient, AuthService, PlanCache, PlanService, PostgresClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is configured from settings, so configuration errors surface on stderr
    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting FitJourney plan service...");

    // PostgreSQL is required
    let db = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("PostgreSQL connection error: {}", e),
            )
        })?,
    );

    info!(
        "PostgreSQL client initialized (max: {} connections)",
        settings.database.max_connections.unwrap_or(10)
    );

    // Cache is optional; an unreachable Redis falls back to an in-process cache
    let cache = match &settings.cache.redis_url {
        Some(redis_url) => {
            let ttl = settings.cache.ttl_secs.unwrap_or(300);
            let capacity = settings.cache.local_capacity.unwrap_or(1000);
            let cache = match PlanCache::connect(redis_url, ttl).await {
                Ok(cache) => cache,
                Err(e) => {
                    warn!("Failed to connect to Redis ({}), caching in process only", e);
                    PlanCache::local_only(capacity, ttl)
                }
            };
            info!(
                "Plan cache initialized ({} entries, TTL: {}s, shared: {})",
                capacity,
                ttl,
                cache.is_shared()
            );
            Some(Arc::new(cache))
        }
        None => {
            info!("No Redis URL configured, running without cache");
            None
        }
    };

    // AI client is optional - plans fall back to the local generators
    let ai = match settings.ai.api_key.as_deref().filter(|key| !key.is_empty()) {
        Some(api_key) => match AiPlanClient::new(
            settings.ai.endpoint.clone(),
            api_key.to_string(),
            settings.ai.model.clone(),
            Duration::from_secs(settings.ai.timeout_secs),
        ) {
            Ok(client) => {
                info!("AI plan client initialized (model: {})", settings.ai.model);
                Some(client.with_sampling(settings.ai.max_tokens, settings.ai.temperature))
            }
            Err(e) => {
                warn!("Failed to build AI client ({}), using fallback generators only", e);
                None
            }
        },
        None => {
            warn!("AI API key not configured, using fallback generators only");
            None
        }
    };

    let auth = AuthService::new(
        &settings.auth.jwt_secret,
        settings.auth.token_ttl_days,
        settings.auth.bcrypt_cost,
        settings.server.production,
    );

    let app_state = AppState {
        db,
        cache,
        auth: Arc::new(auth),
        planner: Arc::new(PlanService::new(ai)),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
