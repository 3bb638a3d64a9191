use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter; `lectern` also matches the `lectern_*` workspace crates.
const DEFAULT_FILTER: &str = "lectern=info,tower_http=warn,sqlx=warn";

fn env_filter() -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match std::env::var("LOG_LEVEL") {
        Ok(level) => EnvFilter::new(format!("lectern={level},tower_http=warn,sqlx=warn")),
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Console logging, plus daily rolling JSON files under `LOG_DIR` when set.
pub fn init_tracing() -> anyhow::Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(env_filter());

    let json_layer = match std::env::var("LOG_DIR") {
        Ok(log_dir) if !log_dir.is_empty() => {
            std::fs::create_dir_all(&log_dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "lectern.json");
            Some(
                fmt::layer()
                    .json()
                    .with_writer(appender)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_filter(env_filter()),
            )
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .try_init()?;

    Ok(())
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match status {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %matched_path,
            status,
            latency_ms,
            "Request completed"
        ),
    }

    response
}
