//! Preset records
//!
//! A preset is a saved station target: URL plus a resolved address fallback.

use std::net::Ipv4Addr;

use crate::config::preset::URL_LEN;

/// A saved station definition.
///
/// `url` holds `host/path` without a scheme (exactly one `/` separates the
/// two for a valid stream target). `ip4` is the resolved-address fallback
/// used when host resolution is unavailable. The record is read-only for the
/// engine; `open` never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetRecord {
    pub url: String,
    pub ip4: Ipv4Addr,
    pub port: u16,
}

impl PresetRecord {
    /// Create a record, truncating the URL to its stored bound.
    pub fn new(url: impl Into<String>, ip4: impl Into<Ipv4Addr>, port: u16) -> Self {
        let mut url = url.into();
        if url.len() >= URL_LEN {
            url.truncate(URL_LEN - 1);
        }
        Self {
            url,
            ip4: ip4.into(),
            port,
        }
    }

    /// An empty slot: no URL, unspecified address.
    pub fn empty() -> Self {
        Self {
            url: String::new(),
            ip4: Ipv4Addr::UNSPECIFIED,
            port: 80,
        }
    }
}

/// Split a preset URL into `(host, path)` at the first `/`.
///
/// Returns borrowed views so the caller's URL is never touched; the path
/// excludes the separator. `None` when the URL has no separator or an empty
/// host.
pub fn split_url(url: &str) -> Option<(&str, &str)> {
    let sep = url.find('/')?;
    if sep == 0 {
        return None;
    }
    Some((&url[..sep], &url[sep + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_host_and_path() {
        assert_eq!(
            split_url("radio.example.com/stream/high"),
            Some(("radio.example.com", "stream/high"))
        );
    }

    #[test]
    fn split_empty_path() {
        assert_eq!(split_url("radio.example.com/"), Some(("radio.example.com", "")));
    }

    #[test]
    fn split_rejects_missing_separator() {
        assert_eq!(split_url("radio.example.com"), None);
    }

    #[test]
    fn split_rejects_empty_host() {
        assert_eq!(split_url("/stream"), None);
    }

    #[test]
    fn split_rejects_empty_url() {
        assert_eq!(split_url(""), None);
    }

    #[test]
    fn split_borrows_from_input() {
        let url = String::from("host.example/path");
        let (host, path) = split_url(&url).unwrap();
        assert_eq!(host, "host.example");
        assert_eq!(path, "path");
        // the caller's URL is untouched
        assert_eq!(url, "host.example/path");
    }

    #[test]
    fn new_truncates_oversized_url() {
        let long = "h/".repeat(100);
        let preset = PresetRecord::new(long, [1, 2, 3, 4], 8000);
        assert!(preset.url.len() < URL_LEN);
        assert_eq!(preset.ip4, Ipv4Addr::new(1, 2, 3, 4));
        assert_eq!(preset.port, 8000);
    }

    #[test]
    fn empty_slot_has_no_url() {
        let preset = PresetRecord::empty();
        assert!(preset.url.is_empty());
        assert_eq!(preset.ip4, Ipv4Addr::UNSPECIFIED);
    }
}
