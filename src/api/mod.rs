//! Small HTTP API serving portfolio content alongside the backdrop.
//!
//! Two endpoints, both JSON: `POST /api/gemini-vision` proxies a topic to
//! an upstream chat service, `GET /api/linkedin-articles` lists published
//! articles from a web search. Both degrade to canned content when the
//! upstream is unreachable, so the server never surfaces a proxy failure
//! to the page.

pub mod analysis;
pub mod articles;


use log::{info, warn};
use serde_json::json;

use crate::error::ApiError;

use analysis::{ChatBackend, HttpChatBackend};
use articles::{ArticleSearch, HttpArticleSearch};

const DEFAULT_ADDR: &str = "127.0.0.1:3001";
const DEFAULT_CHAT_URL: &str = "https://chat.sergiomonteiro.iahub360.com/api/chat";

/// Listen address and upstream endpoints, overridable via environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub addr: String,
    pub chat_url: String,
    /// Web search endpoint for the articles feed. Unset means the feed
    /// always serves the seed list.
    pub search_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            search_url: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            addr: std::env::var("HOLOFIELD_API_ADDR").unwrap_or(defaults.addr),
            chat_url: std::env::var("HOLOFIELD_CHAT_URL").unwrap_or(defaults.chat_url),
            search_url: std::env::var("HOLOFIELD_SEARCH_URL").ok(),
        }
    }
}

/// A finished JSON response, ready to hand to the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn ok(body: serde_json::Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

/// Dispatch one request to its handler. Pure so tests can drive it with
/// mock backends.
pub fn route(
    method: &str,
    path: &str,
    body: &str,
    chat: &dyn ChatBackend,
    search: &dyn ArticleSearch,
) -> ApiResponse {
    match (method, path) {
        ("POST", "/api/gemini-vision") => analysis::handle(body, chat),
        ("GET", "/api/linkedin-articles") => articles::handle(search),
        _ => ApiResponse::error(404, "Not found"),
    }
}

/// Serve the API until the process exits. Blocks the calling thread.
pub fn serve(config: ApiConfig) -> Result<(), ApiError> {
    let server =
        tiny_http::Server::http(config.addr.as_str()).map_err(|e| ApiError::Bind(e.to_string()))?;
    info!("Content API listening on {}", config.addr);

    let chat = HttpChatBackend::new(config.chat_url);
    let search = HttpArticleSearch::new(config.search_url);
    let json_header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| ApiError::Bind("invalid content-type header".to_string()))?;

    for mut request in server.incoming_requests() {
        let mut body = String::new();
        if let Err(err) = request.as_reader().read_to_string(&mut body) {
            warn!("Failed to read request body: {err}");
            body.clear();
        }

        let method = request.method().as_str().to_string();
        let path = request.url().to_string();
        let response = route(&method, &path, &body, &chat, &search);

        let http_response = tiny_http::Response::from_string(response.body.to_string())
            .with_status_code(response.status)
            .with_header(json_header.clone());

        if let Err(err) = request.respond(http_response) {
            warn!("Failed to send response: {err}");
        }
    }

    Ok(())
}
