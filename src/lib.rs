use anyhow::Result;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, decompression::DecompressionLayer, trace::TraceLayer,
};

use crate::controllers::{comments, content, episodes, media, requests};
use crate::state::AppState;

pub mod controllers;
pub mod datasource;
pub mod errors;
pub mod models;
pub mod request_cache;
pub mod state;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/content",
            get(content::get_collection).post(content::create),
        )
        .route(
            "/api/content/bulk",
            post(content::create_bulk).delete(content::remove_bulk),
        )
        .route(
            "/api/content/:id",
            put(content::update).delete(content::remove),
        )
        .route("/api/media/:id", get(media::get_bundle))
        .route("/api/media/:id/:kind", post(media::add).delete(media::remove))
        .route("/api/episodes/:id", get(episodes::get_tree))
        .route("/api/episodes/:id/seasons", post(episodes::add_season))
        .route(
            "/api/episodes/:id/seasons/:season",
            delete(episodes::remove_season),
        )
        .route(
            "/api/episodes/:id/seasons/:season/episodes",
            post(episodes::add_episode)
                .put(episodes::update_episode)
                .delete(episodes::remove_episode),
        )
        .route(
            "/api/comments/:content_id",
            get(comments::get_merged).post(comments::add),
        )
        .route("/api/comments/:content_id/reply", post(comments::reply))
        .route(
            "/api/comments/:content_id/:comment_id",
            delete(comments::remove),
        )
        .route("/api/comments_all", get(comments::overview))
        .route(
            "/api/requests",
            get(requests::get_collection).post(requests::create),
        )
        .route("/api/requests/:id", delete(requests::remove))
        .route("/api/requests/:id/reply", post(requests::reply))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(DecompressionLayer::new()),
        )
}

pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::debug!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
