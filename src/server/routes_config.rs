//! Plugin configuration API routes.

use crate::config::persist;
use crate::plugin::PluginConfiguration;
use crate::server::AppContext;
use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};

const CONFIGURATION_PAGE: &str = include_str!("../../assets/config.html");

pub fn config_routes() -> Router<AppContext> {
    Router::new().route(
        "/textless/Configuration",
        get(get_configuration).put(update_configuration),
    )
}

async fn get_configuration(State(ctx): State<AppContext>) -> Json<PluginConfiguration> {
    Json(ctx.plugin_config.read().clone())
}

async fn update_configuration(
    State(ctx): State<AppContext>,
    Json(req): Json<PluginConfiguration>,
) -> Json<PluginConfiguration> {
    // The guard spans the file write so memory and disk change in the same order.
    let mut current = ctx.plugin_config.write();
    *current = req.clone();

    tracing::info!(
        exclude_text_less_images = req.exclude_text_less_images,
        "Plugin configuration updated"
    );

    // Persist to file
    if let Some(ref path) = ctx.config_path {
        if let Err(e) = persist::update_plugin(path, &req) {
            tracing::error!("Failed to persist plugin configuration: {}", e);
        }
    }
    drop(current);

    Json(req)
}

pub(super) async fn configuration_page() -> Html<&'static str> {
    Html(CONFIGURATION_PAGE)
}
