use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Router};
use log::{debug, info};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::handler::{DisplayModel, RequestHandler};
use crate::output::render_page;

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeForm {
    #[serde(default)]
    pub video_url: String,
}

pub fn router(handler: Arc<RequestHandler>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/summarize", post(summarize))
        .with_state(handler)
}

/// Serve the summarizer on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, handler: Arc<RequestHandler>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Listening on http://{addr}");
    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn index() -> Html<String> {
    Html(render_page(&DisplayModel::default()))
}

async fn summarize(State(handler): State<Arc<RequestHandler>>, Form(form): Form<SummarizeForm>) -> Html<String> {
    debug!("Summarize request for {:?}", form.video_url);
    let model = handler.handle(&form.video_url).await;
    Html(render_page(&model))
}
