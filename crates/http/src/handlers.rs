//! Conan v1 read endpoints: pure functions over store contents. See
//! SPEC_FULL §4.7.
//!
//! Each function is deliberately axum-agnostic in its core logic so it
//! can be exercised directly in tests (SPEC_FULL §10.5) — the axum
//! handlers at the bottom of this module are thin extraction/response
//! wrappers around them.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use conan_index_core::model::{BINARY_MANIFEST, RECIPE_MANIFEST};
use conan_index_core::pathutil::next_segment;
use conan_index_core::Store;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ini::IniDocument;
use crate::md5fmt::md5_bigint_hex;

/// Shared state for the read endpoints: just the store, since readers
/// never lock (spec §4.6).
#[derive(Clone)]
pub struct HttpState {
    pub store: Arc<dyn Store>,
}

/// The outcome of an endpoint computation, independent of how it gets
/// turned into an HTTP response.
pub enum EndpointResult {
    Json(Value),
    NotFound(String),
}

impl IntoResponse for EndpointResult {
    fn into_response(self) -> Response {
        match self {
            EndpointResult::Json(body) => (StatusCode::OK, Json(body)).into_response(),
            EndpointResult::NotFound(text) => (
                StatusCode::NOT_FOUND,
                [("content-type", "text/plain; charset=UTF-8")],
                text,
            )
                .into_response(),
        }
    }
}

fn not_found_uri(uri: &str) -> EndpointResult {
    EndpointResult::NotFound(format!("URI {uri} not found."))
}

// ---------------------------------------------------------------------------
// 4.7.1 / 4.7.2 — download_urls
// ---------------------------------------------------------------------------

async fn download_urls(
    store: &dyn Store,
    manifest: &[&str],
    base: &str,
    host: &str,
    request_uri: &str,
) -> conan_index_core::Result<EndpointResult> {
    let mut map = serde_json::Map::new();
    for file in manifest {
        let key = format!("{base}/{file}");
        if store.exists(&key).await? {
            map.insert((*file).to_string(), Value::String(format!("http://{host}/{key}")));
        }
    }
    if map.is_empty() {
        Ok(not_found_uri(request_uri))
    } else {
        Ok(EndpointResult::Json(Value::Object(map)))
    }
}

pub async fn recipe_download_urls(
    store: &dyn Store,
    pkg: &str,
    host: &str,
) -> conan_index_core::Result<EndpointResult> {
    let base = format!("{pkg}/0/export");
    let uri = format!("/v1/conans/{pkg}/download_urls");
    download_urls(store, RECIPE_MANIFEST, &base, host, &uri).await
}

pub async fn binary_download_urls(
    store: &dyn Store,
    pkg: &str,
    hash: &str,
    host: &str,
) -> conan_index_core::Result<EndpointResult> {
    let base = format!("{pkg}/0/package/{hash}/0");
    let uri = format!("/v1/conans/{pkg}/packages/{hash}/download_urls");
    download_urls(store, BINARY_MANIFEST, &base, host, &uri).await
}

// ---------------------------------------------------------------------------
// 4.7.3 — package info
// ---------------------------------------------------------------------------

pub async fn package_info(store: &dyn Store, pkg: &str, hash: &str) -> conan_index_core::Result<EndpointResult> {
    let base = format!("{pkg}/0/package/{hash}/0");
    let uri = format!("/v1/conans/{pkg}/packages/{hash}");
    let mut map = serde_json::Map::new();
    for file in BINARY_MANIFEST {
        let key = format!("{base}/{file}");
        if store.exists(&key).await? {
            let bytes = store.value(&key).await?;
            map.insert((*file).to_string(), Value::String(md5_bigint_hex(&bytes)));
        }
    }
    if map.is_empty() {
        Ok(not_found_uri(&uri))
    } else {
        Ok(EndpointResult::Json(Value::Object(map)))
    }
}

// ---------------------------------------------------------------------------
// 4.7.4 — package-binary search
// ---------------------------------------------------------------------------

pub async fn package_binary_search(store: &dyn Store, pkg: &str) -> conan_index_core::Result<EndpointResult> {
    let prefix = format!("{pkg}/0/package");
    let keys = store.list(&prefix).await?;

    let Some(conaninfo_key) = keys.iter().find(|k| k.ends_with("conaninfo.txt")) else {
        return Ok(EndpointResult::NotFound(format!("Package binaries not found: {pkg}")));
    };

    let hash = next_segment(&prefix, conaninfo_key).to_string();
    let bytes = store.value(conaninfo_key).await?;
    let text = String::from_utf8_lossy(&bytes);
    let doc = IniDocument::parse(&text);

    let mut package = serde_json::Map::new();
    for (section, entries) in &doc.sections {
        let mut section_map = serde_json::Map::new();
        for (k, v) in entries {
            // Null/empty INI values are omitted (spec §4.7.4).
            if !v.is_empty() {
                section_map.insert(k.clone(), Value::String(v.clone()));
            }
        }
        package.insert(section.clone(), Value::Object(section_map));
    }
    if let Some(recipe_hash) = doc.first_key("recipe_hash") {
        package.insert("recipe_hash".to_string(), Value::String(recipe_hash.to_string()));
    }

    Ok(EndpointResult::Json(json!({ hash: package })))
}

// ---------------------------------------------------------------------------
// 4.7.5 — recipe search
// ---------------------------------------------------------------------------

pub async fn recipe_search(store: &dyn Store, query: &str) -> conan_index_core::Result<EndpointResult> {
    let keys = store.list("").await?;
    let mut results = BTreeSet::new();

    for key in keys {
        let Some(export_idx) = key.find("/0/export/") else { continue };
        let cut = match key.find("/_/_") {
            Some(us_idx) if us_idx + 4 < export_idx => us_idx + 4,
            _ => export_idx,
        };
        let derived = &key[..cut];
        if derived.contains(query) {
            results.insert(derived.to_string());
        }
    }

    Ok(EndpointResult::Json(json!({ "results": results.into_iter().collect::<Vec<_>>() })))
}

// ---------------------------------------------------------------------------
// 4.7.6 — health check (ambient)
// ---------------------------------------------------------------------------

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// axum wiring
// ---------------------------------------------------------------------------

/// Path params shared by every `/v1/conans/{name}/{version}/{user}/{channel}/...` route.
#[derive(Debug, Deserialize)]
pub struct PkgParams {
    pub name: String,
    pub version: String,
    pub user: String,
    pub channel: String,
}

impl PkgParams {
    pub fn coordinate(&self) -> String {
        format!("{}/{}/{}/{}", self.name, self.version, self.user, self.channel)
    }
}

#[derive(Debug, Deserialize)]
pub struct HashParams {
    pub name: String,
    pub version: String,
    pub user: String,
    pub channel: String,
    pub hash: String,
}

impl HashParams {
    pub fn coordinate(&self) -> String {
        format!("{}/{}/{}/{}", self.name, self.version, self.user, self.channel)
    }
}

fn host_header(headers: &HeaderMap) -> String {
    headers.get("host").and_then(|v| v.to_str().ok()).unwrap_or("localhost").to_string()
}

async fn map_error(result: conan_index_core::Result<EndpointResult>) -> Response {
    match result {
        Ok(outcome) => outcome.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "endpoint failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn recipe_download_urls_handler(
    State(state): State<HttpState>,
    Path(params): Path<PkgParams>,
    headers: HeaderMap,
) -> Response {
    let host = host_header(&headers);
    map_error(recipe_download_urls(state.store.as_ref(), &params.coordinate(), &host).await).await
}

pub async fn binary_download_urls_handler(
    State(state): State<HttpState>,
    Path(params): Path<HashParams>,
    headers: HeaderMap,
) -> Response {
    let host = host_header(&headers);
    map_error(binary_download_urls(state.store.as_ref(), &params.coordinate(), &params.hash, &host).await).await
}

pub async fn package_info_handler(State(state): State<HttpState>, Path(params): Path<HashParams>) -> Response {
    map_error(package_info(state.store.as_ref(), &params.coordinate(), &params.hash).await).await
}

pub async fn package_binary_search_handler(
    State(state): State<HttpState>,
    Path(params): Path<PkgParams>,
) -> Response {
    map_error(package_binary_search(state.store.as_ref(), &params.coordinate()).await).await
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn recipe_search_handler(State(state): State<HttpState>, Query(query): Query<SearchQuery>) -> Response {
    map_error(recipe_search(state.store.as_ref(), &query.q).await).await
}
