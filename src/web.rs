use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use log::info;
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::output::render_page;
use crate::pipeline::{Outcome, Pipeline};
use crate::summarize::Summarize;
use crate::youtube::TranscriptProvider;

/// Shared by every request; read-only
pub struct AppState<P, S> {
    pub provider: Arc<P>,
    pub summarizer: Arc<S>,
    pub languages: Arc<Vec<String>>,
}

impl<P, S> AppState<P, S> {
    pub fn new(provider: P, summarizer: S, languages: Vec<String>) -> Self {
        Self {
            provider: Arc::new(provider),
            summarizer: Arc::new(summarizer),
            languages: Arc::new(languages),
        }
    }

    fn pipeline(&self) -> Pipeline<'_, P, S> {
        Pipeline {
            provider: self.provider.as_ref(),
            summarizer: self.summarizer.as_ref(),
            languages: self.languages.as_slice(),
        }
    }
}

impl<P, S> Clone for AppState<P, S> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            summarizer: self.summarizer.clone(),
            languages: self.languages.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}

pub fn router<P, S>(state: AppState<P, S>) -> Router
where
    P: TranscriptProvider + Send + Sync + 'static,
    S: Summarize + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(page::<P, S>))
        .route("/api/summarize", post(summarize::<P, S>))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn serve<P, S>(addr: SocketAddr, state: AppState<P, S>) -> std::io::Result<()>
where
    P: TranscriptProvider + Send + Sync + 'static,
    S: Summarize + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl-C, shutting down");
    }
}

async fn page<P, S>(State(state): State<AppState<P, S>>, Query(query): Query<PageQuery>) -> Html<String>
where
    P: TranscriptProvider + Send + Sync + 'static,
    S: Summarize + Send + Sync + 'static,
{
    let url = query.url.unwrap_or_default();
    let url = url.trim();
    if url.is_empty() {
        return Html(render_page("", None));
    }

    let outcome = state.pipeline().run(url).await;
    Html(render_page(url, Some(&outcome)))
}

async fn summarize<P, S>(State(state): State<AppState<P, S>>, Json(req): Json<SummarizeRequest>) -> impl IntoResponse
where
    P: TranscriptProvider + Send + Sync + 'static,
    S: Summarize + Send + Sync + 'static,
{
    let outcome = state.pipeline().run(req.url.trim()).await;
    (status_code(&outcome), Json(outcome))
}

async fn health() -> &'static str {
    "ok"
}

fn status_code(outcome: &Outcome) -> StatusCode {
    match outcome {
        Outcome::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
        Outcome::NoTranscript { .. } => StatusCode::NOT_FOUND,
        Outcome::FetchError { .. } | Outcome::SummaryFailed { .. } => StatusCode::BAD_GATEWAY,
        Outcome::Summarized { .. } => StatusCode::OK,
    }
}
