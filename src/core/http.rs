//! Blocking HTTP POST used by workflow dispatch.
//!
//! A fresh client is built per request; there is no pooling and no timeout.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("bloom/", env!("CARGO_PKG_VERSION"));

fn http_error(url: &str, e: reqwest::Error) -> Error {
    Error::remote_request_failed(url, e.to_string())
}

/// POST `body` as JSON with the given headers and return the HTTP status code.
///
/// Any status is a successful call here; only transport failures are errors.
pub fn post_json(url: &str, headers: &[(String, String)], body: &Value) -> Result<u16> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| http_error(url, e))?;

    let bytes = serde_json::to_vec(body).map_err(|e| {
        Error::internal_json(e.to_string(), Some("serialize request body".to_string()))
    })?;

    let mut request = client.post(url).body(bytes);
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request.send().map_err(|e| http_error(url, e))?;
    let status = response.status().as_u16();
    log::debug!("POST {} -> {}", url, status);
    Ok(status)
}
