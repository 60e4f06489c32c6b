//! Plugin descriptor routes.

use axum::{routing::get, Json, Router};

use super::AppContext;
use crate::metadata::external_id::{external_ids, ExternalIdInfo};
use crate::plugin::PluginInfo;

pub fn plugin_routes() -> Router<AppContext> {
    Router::new()
        .route("/textless/Plugin", get(plugin_info))
        .route("/textless/ExternalIds", get(list_external_ids))
}

async fn plugin_info() -> Json<PluginInfo> {
    Json(PluginInfo::current())
}

async fn list_external_ids() -> Json<Vec<ExternalIdInfo>> {
    Json(external_ids())
}
