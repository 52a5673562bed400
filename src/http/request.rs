//! Capturing inbound requests.
//!
//! # Responsibilities
//! - Flatten the header map into name → value
//! - Parse urlencoded form bodies; everything else becomes `{}`
//! - Normalize the client address

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::http::{header, HeaderMap};
use serde_json::{Map, Value};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Header names to values. Repeated headers are joined with `", "`, except
/// `cookie` which joins with `"; "`.
pub fn capture_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut captured: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        let separator = if *name == header::COOKIE { "; " } else { ", " };
        captured
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(separator);
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    captured
}

/// Whether the request declares a urlencoded form body.
pub fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Decode a form body into ordered key/value pairs.
///
/// Returns an empty list for non-form requests and undecodable bodies.
pub fn form_pairs(headers: &HeaderMap, body: &[u8]) -> Vec<(String, String)> {
    if !is_form(headers) {
        return Vec::new();
    }
    serde_urlencoded::from_bytes(body).unwrap_or_default()
}

/// The body as a JSON object. Repeated keys collect into an array.
pub fn parse_form_body(headers: &HeaderMap, body: &[u8]) -> Value {
    let mut object = Map::new();
    for (key, value) in form_pairs(headers, body) {
        match object.get_mut(&key) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                object.insert(key, Value::String(value));
            }
        }
    }
    Value::Object(object)
}

/// First value of form field `name`.
pub fn form_field(headers: &HeaderMap, body: &[u8], name: &str) -> Option<String> {
    form_pairs(headers, body)
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

/// Client IP as text; IPv4-mapped IPv6 addresses are shown as IPv4.
pub fn client_address(addr: &SocketAddr) -> String {
    addr.ip().to_canonical().to_string()
}
