use serde::Serialize;
use url::Url;

const EXTENSION_SCHEMES: [&str; 3] = [
    "moz-extension://",
    "chrome-extension://",
    "safari-web-extension://",
];

/// Identity of the last tab the restore submenu was built for. A refresh only
/// happens when this changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationKey {
    pub window_id: i64,
    pub tab_id: i64,
    pub domain: String,
}

impl Default for ActivationKey {
    fn default() -> Self {
        Self {
            window_id: -1,
            tab_id: -1,
            domain: String::new(),
        }
    }
}

/// A resolved tab that finished navigating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabTarget {
    pub window_id: i64,
    pub tab_id: i64,
    pub url: String,
}

impl TabTarget {
    pub fn key(&self) -> ActivationKey {
        ActivationKey {
            window_id: self.window_id,
            tab_id: self.tab_id,
            domain: hostname_from_url(&self.url),
        }
    }
}

/// Host part of `url` as the browser reports it: lowercased, IDNA hosts in their
/// punycode form. Empty for URLs without one (`about:blank`, `data:`, `file:`).
pub fn hostname_from_url(url: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .unwrap_or_default()
}

/// Pages that belong to the extension itself (manager, options); these never
/// change the restore submenu.
pub fn is_extension_page(url: &str) -> bool {
    EXTENSION_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_is_extracted_from_web_urls() {
        assert_eq!(hostname_from_url("https://Example.com/path?q=1"), "example.com");
        assert_eq!(hostname_from_url("http://user:pw@intra.net:8080/"), "intra.net");
        assert_eq!(hostname_from_url("about:blank"), "");
        assert_eq!(hostname_from_url("file:///tmp/form.html"), "");
        assert_eq!(hostname_from_url("not a url"), "");
    }

    #[test]
    fn international_hosts_use_their_punycode_form() {
        assert_eq!(hostname_from_url("https://Bücher.de/form"), "xn--bcher-kva.de");
    }

    #[test]
    fn backslash_ends_the_host_on_web_urls() {
        assert_eq!(hostname_from_url("https://example.com\\path"), "example.com");
    }

    #[test]
    fn extension_pages_are_recognised() {
        assert!(is_extension_page("moz-extension://abc/popup/manage.html"));
        assert!(is_extension_page("chrome-extension://abc/options.html"));
        assert!(!is_extension_page("https://example.com"));
    }

    #[test]
    fn default_key_matches_no_tab() {
        let key = ActivationKey::default();
        assert_eq!((key.window_id, key.tab_id), (-1, -1));
        assert!(key.domain.is_empty());
    }
}
