//! Network-origin authorization.
//!
//! The allow-list is matched by exact string equality against the
//! caller's observed source address. No subnet matching, no proxy-header
//! resolution, no IPv6 normalization.

use std::collections::HashSet;

/// Configured set of permitted source addresses.
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    origins: HashSet<String>,
}

impl OriginAllowList {
    pub fn new<I>(origins: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            origins: origins.into_iter().collect(),
        }
    }

    /// Pure membership test, evaluated per request.
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.contains(origin)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowlist(entries: &[&str]) -> OriginAllowList {
        OriginAllowList::new(entries.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_allowed_origin() {
        let list = allowlist(&["10.0.0.1", "127.0.0.1"]);
        assert!(list.is_allowed("10.0.0.1"));
        assert!(list.is_allowed("127.0.0.1"));
    }

    #[test]
    fn test_denied_origin() {
        let list = allowlist(&["10.0.0.1"]);
        assert!(!list.is_allowed("10.0.0.2"));
        assert!(!list.is_allowed(""));
    }

    #[test]
    fn test_no_normalization() {
        let list = allowlist(&["::1"]);
        // Equivalent IPv6 spellings are distinct strings and stay denied.
        assert!(!list.is_allowed("0:0:0:0:0:0:0:1"));
        assert!(!list.is_allowed(" ::1"));
        assert!(list.is_allowed("::1"));
    }

    #[test]
    fn test_empty_allowlist_denies_everything() {
        let list = OriginAllowList::default();
        assert!(list.is_empty());
        assert!(!list.is_allowed("127.0.0.1"));
    }
}
