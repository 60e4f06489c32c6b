//! TMDb passthrough API routes.

use axum::{extract::State, routing::get, Json, Router};

use super::error::AppError;
use super::{request_cancellation, AppContext};
use crate::metadata::client::ImageConfiguration;

pub fn tmdb_routes() -> Router<AppContext> {
    Router::new().route("/textless/ClientConfiguration", get(client_configuration))
}

/// Image part of TMDb's client configuration (base URLs and size lists).
async fn client_configuration(
    State(ctx): State<AppContext>,
) -> Result<Json<ImageConfiguration>, AppError> {
    let (cancel, _guard) = request_cancellation();
    let configuration = ctx.tmdb.client_configuration(&cancel).await?;
    Ok(Json(configuration.images))
}
