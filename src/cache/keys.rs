// Cache key construction.
// Keys encode the operation kind and full server address so entries never collide.

use std::fmt;

/// Prefix shared by every offline cache entry.
pub const NAMESPACE: &str = "__WEBBER_OFFLINE";

/// Which retrieval mode an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Raw response text.
    Text,
    /// Response text that is decoded as a JSON array on read.
    JsonArray,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Text => "getFromAPI",
            CacheKind::JsonArray => "getJSONArrayFromAPI",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the store key for `path` on `server`.
///
/// The path is used verbatim: `"a"` and `"/a"` are distinct keys.
pub fn cache_key(kind: CacheKind, server: &str, path: &str) -> String {
    format!("{}_{}_{}/{}", NAMESPACE, kind, server, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(
            cache_key(CacheKind::Text, "https://api.example.com", "users"),
            "__WEBBER_OFFLINE_getFromAPI_https://api.example.com/users"
        );
        assert_eq!(
            cache_key(CacheKind::JsonArray, "https://api.example.com", "users"),
            "__WEBBER_OFFLINE_getJSONArrayFromAPI_https://api.example.com/users"
        );
    }

    #[test]
    fn test_kinds_never_collide() {
        for path in ["", "users", "users/1?x=y", "/leading"] {
            assert_ne!(
                cache_key(CacheKind::Text, "http://s", path),
                cache_key(CacheKind::JsonArray, "http://s", path)
            );
        }
    }

    #[test]
    fn test_servers_never_collide() {
        let a = cache_key(CacheKind::Text, "http://one.test", "items");
        let b = cache_key(CacheKind::Text, "http://two.test", "items");
        assert_ne!(a, b);
    }

    #[test]
    fn test_leading_slash_is_distinct() {
        assert_ne!(
            cache_key(CacheKind::Text, "http://s", "items"),
            cache_key(CacheKind::Text, "http://s", "/items")
        );
    }
}
