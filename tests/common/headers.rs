#![allow(dead_code)]

use bunner_serverless_rs::HeaderMap;
use bunner_serverless_rs::constants::header;
use indexmap::IndexMap;
use std::collections::HashSet;

pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)
}

pub fn has_header(headers: &HeaderMap, name: &str) -> bool {
    headers.contains(name)
}

/// Looks a header up in a serialized reply map, ignoring case.
pub fn reply_header<'a, V>(headers: &'a IndexMap<String, V>, name: &str) -> Option<&'a V> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

pub fn cors_header_names(headers: &HeaderMap) -> Vec<String> {
    headers
        .iter()
        .map(|(name, _)| name.to_string())
        .filter(|name| name.to_ascii_lowercase().starts_with("access-control-"))
        .collect()
}

pub fn vary_values(headers: &HeaderMap) -> HashSet<String> {
    header_value(headers, header::VARY)
        .map(|value| {
            value
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect::<HashSet<_>>()
        })
        .unwrap_or_default()
}
