//! Utility functions and helpers.

pub mod console;
pub mod http;
pub mod retry;

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Leading `./` and `../` segments of a Parsoid resource path.
static RELATIVE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\.\.?/)+").expect("relative prefix pattern is valid"));

/// Strip leading `./` / `../` segments so one image has one lookup key.
pub fn normalize_resource(resource: &str) -> &str {
    match RELATIVE_PREFIX.find(resource) {
        Some(prefix) => &resource[prefix.end()..],
        None => resource,
    }
}

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_relative_prefixes() {
        assert_eq!(normalize_resource("./File:Foo.jpg"), "File:Foo.jpg");
        assert_eq!(normalize_resource("../../File:Foo.jpg"), "File:Foo.jpg");
        assert_eq!(normalize_resource("./.././File:Foo.jpg"), "File:Foo.jpg");
        assert_eq!(normalize_resource("File:Foo.jpg"), "File:Foo.jpg");
    }

    #[test]
    fn test_normalize_keeps_inner_segments() {
        assert_eq!(normalize_resource("./a/../File:Foo.jpg"), "a/../File:Foo.jpg");
        assert_eq!(normalize_resource(".../File:Foo.jpg"), ".../File:Foo.jpg");
        assert_eq!(normalize_resource(".hidden"), ".hidden");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in ["./File:A.png", "../../../File:B.svg", "File:C.jpg", "./", "../"] {
            let once = normalize_resource(name);
            assert_eq!(normalize_resource(once), once);
        }
    }

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://en.wikipedia.org/w/api.php").unwrap();
        assert_eq!(
            resolve_url(&base, "//upload.wikimedia.org/thumb/a.jpg"),
            "https://upload.wikimedia.org/thumb/a.jpg"
        );
        assert_eq!(
            resolve_url(&base, "https://upload.wikimedia.org/b.jpg"),
            "https://upload.wikimedia.org/b.jpg"
        );
    }
}
