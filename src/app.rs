use std::{net::SocketAddr, time::Duration};

use axum::{http::Request, http::Response, routing::get, Router};
use time::Duration as SessionDuration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing::{error, info, info_span, Span};

use crate::session::SESSION_COOKIE;
use crate::state::AppState;
use crate::{auth, pages, predict};

pub fn build_app(state: AppState) -> Router {
    let cfg = &state.config.session;
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(cfg.secure_cookie)
        .with_expiry(Expiry::OnInactivity(SessionDuration::minutes(cfg.ttl_minutes)))
        .with_signed(state.session_key.clone());

    let trace = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<_>| {
            info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri(),
                status = tracing::field::Empty,
            )
        })
        .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
            let status = res.status();
            span.record("status", tracing::field::display(status));
            let latency_ms = latency.as_millis() as u64;
            if status.is_server_error() {
                error!(%status, latency_ms, "response");
            } else {
                info!(%status, latency_ms, "response");
            }
        });

    Router::new()
        .merge(pages::router())
        .merge(auth::router())
        .merge(predict::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(sessions)
        .layer(CorsLayer::permissive())
        .layer(trace)
}

fn listen_addr() -> anyhow::Result<SocketAddr> {
    let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port = std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into());
    format!("{host}:{port}")
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address {host}:{port}: {e}"))
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr = listen_addr()?;
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;
    Ok(())
}
