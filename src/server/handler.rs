//! Request handling for the lookup endpoint

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Deserializer, Serialize};

use crate::resolve::types::ResolutionRequest;
use crate::server::error::ServiceError;
use crate::service::LookupService;

const NODE_VERSION_HEADER: HeaderName = HeaderName::from_static("x-node-version");
const DOWNLOAD_URL_HEADER: HeaderName = HeaderName::from_static("x-download-url");
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf8";

/// Query parameters accepted by the lookup endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LookupQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub security: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Parameters the lookup ignores, kept so the 404 body echoes the whole query
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Response representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => Err(ServiceError::UnrecognizedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
struct NotFoundBody<'a> {
    tag: &'a str,
    query: &'a LookupQuery,
    error: &'static str,
}

/// Parse a yes/no style flag. Unrecognized values are treated as unset.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "on" => Some(true),
        "n" | "no" | "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_flag))
}

/// Format name requested by the caller: the `format` parameter, else `json`
/// when the Accept header mentions json, else `text`
fn requested_format(query: &LookupQuery, headers: &HeaderMap) -> String {
    if let Some(format) = query.format.as_deref().filter(|f| !f.is_empty()) {
        return format.to_string();
    }

    let wants_json = headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("json"));

    let format = if wants_json { "json" } else { "text" };
    format.to_string()
}

/// Tag from the query string, else the path, else `*`
fn requested_tag(query: &LookupQuery, path_tag: &str) -> String {
    query
        .tag
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(Some(path_tag).filter(|t| !t.is_empty()))
        .unwrap_or("*")
        .to_string()
}

pub async fn lookup_root(
    State(service): State<Arc<LookupService>>,
    Query(query): Query<LookupQuery>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    lookup(&service, "", query, &headers).await
}

pub async fn lookup_path(
    State(service): State<Arc<LookupService>>,
    Path(path_tag): Path<String>,
    Query(query): Query<LookupQuery>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    lookup(&service, &path_tag, query, &headers).await
}

async fn lookup(
    service: &LookupService,
    path_tag: &str,
    query: LookupQuery,
    headers: &HeaderMap,
) -> Result<Response, ServiceError> {
    let format = requested_format(&query, headers);
    let tag = requested_tag(&query, path_tag);

    let request = ResolutionRequest {
        tag: tag.clone(),
        security_only: query.security.unwrap_or(false),
        platform: query.platform.clone(),
        arch: query.arch.clone(),
    };

    let Some(result) = service.lookup(&request).await? else {
        let body = NotFoundBody {
            tag: &tag,
            query: &query,
            error: "No match found",
        };
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    };

    let mut response_headers = HeaderMap::new();
    if let Some(url) = &result.url
        && let Ok(value) = HeaderValue::from_str(url)
    {
        response_headers.insert(DOWNLOAD_URL_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(result.version()) {
        response_headers.insert(NODE_VERSION_HEADER, value);
    }

    match format.parse::<OutputFormat>()? {
        OutputFormat::Json => Ok((response_headers, Json(result)).into_response()),
        OutputFormat::Text => {
            response_headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE));
            Ok((response_headers, result.version().to_string()).into_response())
        }
    }
}
