use cosmoscope_atoms as atoms;
use cosmoscope_shared::http::{bad_request, finalize_response, method_not_allowed, not_found, preflight};
use cosmoscope_shared::AppState;
use lambda_http::{http::Method, Body, Error, Request, RequestExt, Response};
use std::sync::Arc;

fn query_param<'a>(event: &'a Request, key: &str) -> Option<&'a str> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first(key))
}

/// Main Lambda handler - routes catalog requests to the entity atoms
pub(crate) async fn function_handler(event: Request, state: Arc<AppState>) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    let allow_origin = state.settings.cors_allow_origin.as_str();
    tracing::info!(method = %method, path = %path, "request");

    // Handle CORS preflight
    if *method == Method::OPTIONS {
        return finalize_response(preflight(), allow_origin);
    }

    let client = &state.dynamo_client;
    let table_name = state.table_name();
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let resp = match (method, parts.as_slice()) {
        // --- ASSETS ---
        // GET /assets/{id} - asset with its labels
        (&Method::GET, ["assets", asset_id]) => {
            atoms::assets::get_asset_handler(client, table_name, asset_id).await
        }
        // GET /assets/{id}/labels
        (&Method::GET, ["assets", asset_id, "labels"]) => {
            atoms::labels::list_asset_labels_handler(client, table_name, asset_id).await
        }

        // --- LABELS ---
        // GET /labels?assetId=
        (&Method::GET, ["labels"]) => match query_param(&event, "assetId").map(str::trim) {
            Some(asset_id) if !asset_id.is_empty() => {
                atoms::labels::list_asset_labels_handler(client, table_name, asset_id).await
            }
            _ => bad_request("Asset ID required"),
        },
        // POST /labels
        (&Method::POST, ["labels"]) => atoms::labels::create_label_handler(client, table_name, body).await,

        // --- COMMENTS ---
        // GET /comments?assetId=|labelId=
        (&Method::GET, ["comments"]) => {
            atoms::comments::list_comments_handler(
                client,
                table_name,
                query_param(&event, "assetId"),
                query_param(&event, "labelId"),
            )
            .await
        }
        // POST /comments
        (&Method::POST, ["comments"]) => atoms::comments::create_comment_handler(client, table_name, body).await,

        // --- SEARCH ---
        // GET /search?q=
        (&Method::GET, ["search"]) => {
            atoms::assets::search_handler(
                client,
                table_name,
                query_param(&event, "q"),
                state.settings.search_page_size,
            )
            .await
        }

        // --- CATEGORIES ---
        (&Method::GET, ["categories"]) => atoms::categories::list_categories_handler(client, table_name).await,
        (&Method::POST, ["categories"]) => {
            atoms::categories::create_category_handler(client, table_name, body).await
        }

        (_, ["assets", _] | ["assets", _, "labels"] | ["labels"] | ["comments"] | ["search"] | ["categories"]) => {
            method_not_allowed()
        }
        _ => {
            tracing::warn!(method = %method, path = %path, "no route matched");
            not_found()
        }
    };

    finalize_response(resp, allow_origin)
}
