//! JSON HTTP search endpoint.
//!
//! One GET route serves every action, dispatched on the `action`
//! parameter the way the original AJAX endpoint did:
//!
//! | Action | Description |
//! |--------|-------------|
//! | `search` (default) | Run a search and return the result page |
//! | `suggest` | Autocomplete suggestions for a partial query |
//! | `trending` | Most-searched queries within a timeframe |
//! | `analytics` | Aggregated search analytics |
//! | `stats` | Cache and engine statistics |
//! | `clear_cache` | Administrative cache flush |
//!
//! Recognized parameters: `q`, `limit`, `offset`, `category`
//! (comma-separated ids), `type` (`article` | `sp` | `custom` | `all`),
//! `action`, `debug`, `timeframe`, `lang`.
//!
//! Validation failures are reported in-band as `{"success": false,
//! "error": ...}`; the HTTP status stays 200 so browser callers always get
//! a parseable body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::content::item::SourceType;
use crate::context::RequestContext;
use crate::search::engine::SearchEngine;
use crate::search::types::SearchOptions;
use crate::suggest::analytics::Timeframe;

/// Query string of the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
    /// Comma-separated category ids.
    pub category: Option<String>,
    /// Source filter: `article`, `sp`, `custom`, or `all`.
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default)]
    pub debug: bool,
    pub timeframe: Option<String>,
    /// Content language tag; defaults to any.
    pub lang: Option<String>,
}

fn default_action() -> String {
    "search".to_string()
}

impl SearchParams {
    fn options(&self) -> SearchOptions {
        let categories = self
            .category
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect();

        let source_types = match self.source_type.as_deref() {
            None | Some("all") | Some("") => Vec::new(),
            Some(name) => SourceType::parse(name).into_iter().collect(),
        };

        SearchOptions {
            limit: self.limit,
            offset: self.offset,
            categories,
            source_types,
            debug: self.debug,
        }
    }

    fn timeframe(&self) -> Timeframe {
        Timeframe::parse(self.timeframe.as_deref().unwrap_or("week"))
    }
}

/// Start the HTTP server on the given bind address. Runs until the
/// process is terminated.
pub async fn run_server(engine: Arc<SearchEngine>, bind: &str) -> anyhow::Result<()> {
    let app = router(engine);

    info!(bind = %bind, "search endpoint listening");
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Build the router; separated from [`run_server`] for tests.
pub fn router(engine: Arc<SearchEngine>) -> Router {
    Router::new()
        .route("/search", get(handle_search))
        .route("/health", get(handle_health))
        .with_state(engine)
}

async fn handle_health() -> Json<Value> {
    Json(json!({"status": "ok", "version": crate::VERSION}))
}

/// The single action-dispatching handler.
async fn handle_search(
    State(engine): State<Arc<SearchEngine>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    let ctx = request_context(&params, &peer, &headers);

    let response = match params.action.as_str() {
        "search" => {
            if params.q.trim().is_empty() {
                json!({
                    "success": false,
                    "error": "missing query parameter",
                    "results": [],
                    "total": 0,
                })
            } else {
                let response = engine.search(&params.q, &params.options(), &ctx);
                serde_json::to_value(response).unwrap_or_else(|_| {
                    json!({"success": false, "error": "failed to serialize response"})
                })
            }
        }
        "suggest" => match engine.suggest(&params.q, params.limit.unwrap_or(0), &ctx) {
            Ok(suggestions) => json!({
                "success": true,
                "suggestions": suggestions,
                "query": params.q,
            }),
            Err(e) => json!({"success": false, "error": e.to_string()}),
        },
        "trending" => match engine.trending(params.limit.unwrap_or(10), params.timeframe()) {
            Ok(trending) => json!({
                "success": true,
                "trending": trending,
                "timeframe": params.timeframe(),
            }),
            Err(e) => json!({"success": false, "error": e.to_string()}),
        },
        "analytics" => match engine.analytics(params.timeframe()) {
            Ok(analytics) => json!({
                "success": true,
                "analytics": analytics,
                "timeframe": params.timeframe(),
            }),
            Err(e) => json!({"success": false, "error": e.to_string()}),
        },
        "stats" => match engine.stats() {
            Ok(stats) => json!({"success": true, "stats": stats}),
            Err(e) => json!({"success": false, "error": e.to_string()}),
        },
        "clear_cache" => {
            let cleared = engine.clear_cache();
            json!({"success": true, "cleared": cleared})
        }
        _ => json!({"success": false, "error": "Invalid action specified"}),
    };

    Json(response)
}

/// Assemble the viewer context for one HTTP request. The demo server
/// serves anonymous public viewers; host applications embedding the
/// engine supply their own authenticated context.
fn request_context(params: &SearchParams, peer: &SocketAddr, headers: &HeaderMap) -> RequestContext {
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut ctx = RequestContext::anonymous().with_session(Uuid::new_v4().to_string());
    ctx.ip_address = peer.ip().to_string();
    ctx.user_agent = user_agent;
    if let Some(lang) = &params.lang {
        ctx.language = lang.clone();
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_parse_categories_and_type() {
        let params = SearchParams {
            q: "test".to_string(),
            category: Some("1, 2,x,9".to_string()),
            source_type: Some("sp".to_string()),
            ..Default::default()
        };

        let options = params.options();
        assert_eq!(options.categories, vec![1, 2, 9]);
        assert_eq!(options.source_types, vec![SourceType::PageBuilder]);
    }

    #[test]
    fn test_all_type_means_no_filter() {
        let params = SearchParams {
            source_type: Some("all".to_string()),
            ..Default::default()
        };
        assert!(params.options().source_types.is_empty());

        let unknown = SearchParams {
            source_type: Some("bogus".to_string()),
            ..Default::default()
        };
        // Unrecognized names fall back to all sources
        assert!(unknown.options().source_types.is_empty());
    }

    #[test]
    fn test_timeframe_defaults_to_week() {
        let params = SearchParams::default();
        assert_eq!(params.timeframe(), Timeframe::Week);
    }
}
