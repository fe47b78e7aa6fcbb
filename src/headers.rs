use std::collections::HashMap;

pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Look up a header value by name, ignoring ASCII case.
///
/// Gateway events carry headers exactly as the client sent them, so no
/// canonical casing can be assumed for the key.
pub fn find_header<'a>(
    headers: Option<&'a HashMap<String, String>>,
    name: &str,
) -> Option<&'a str> {
    headers?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

pub fn extract_auth_header(headers: Option<&HashMap<String, String>>) -> Option<&str> {
    find_header(headers, AUTHORIZATION_HEADER)
}
