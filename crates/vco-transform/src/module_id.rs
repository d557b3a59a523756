//! Splitting bundler module ids into path and query

use url::form_urlencoded;

/// A module id such as `/src/App.vue?vue&type=script&setup=true`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleId<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
}

impl<'a> ModuleId<'a> {
    pub fn parse(id: &'a str) -> Self {
        let id = id.split_once('#').map_or(id, |(before, _)| before);
        match id.split_once('?') {
            Some((path, query)) => ModuleId {
                path,
                query: Some(query),
            },
            None => ModuleId { path: id, query: None },
        }
    }

    pub fn is_vue(&self) -> bool {
        self.path.ends_with(".vue")
    }

    /// First value of a query parameter; flags without `=` have an empty value
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query?;
        form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// The `<script setup>` block of a single-file component
    pub fn is_setup_script(&self) -> bool {
        self.query_param("setup").as_deref() == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        let id = ModuleId::parse("/src/main.ts");
        assert_eq!(id.path, "/src/main.ts");
        assert_eq!(id.query, None);
        assert!(!id.is_vue());
    }

    #[test]
    fn test_vue_setup_query() {
        let id = ModuleId::parse("/src/App.vue?vue&type=script&setup=true&lang.ts");
        assert!(id.is_vue());
        assert!(id.is_setup_script());
        assert_eq!(id.query_param("type").as_deref(), Some("script"));
        assert_eq!(id.query_param("vue").as_deref(), Some(""));
    }

    #[test]
    fn test_setup_must_be_true() {
        assert!(!ModuleId::parse("/src/App.vue?vue&setup=false").is_setup_script());
        assert!(!ModuleId::parse("/src/App.vue").is_setup_script());
    }

    #[test]
    fn test_fragment_is_dropped() {
        let id = ModuleId::parse("/src/App.vue?setup=true#hash");
        assert_eq!(id.query, Some("setup=true"));
        assert!(id.is_setup_script());
    }
}
