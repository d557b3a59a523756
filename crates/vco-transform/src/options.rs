//! Transformer configuration

use serde::{Deserialize, Serialize};

use crate::error::TransformError;

/// Package the generated resolver import points at
pub const DEFAULT_RUNTIME_MODULE: &str = "vite-plugin-vue-component-override";

/// Settings for [`crate::ComponentOverrideTransformer`].
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// extensions = ["ts", "vue"]
/// exclude = ["**/node_modules/**"]
/// handle-dynamic-imports = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransformOptions {
    /// File extensions (without the dot) of modules to transform
    pub extensions: Vec<String>,
    /// Rewrite `import X from './X.vue'`
    pub handle_static_imports: bool,
    /// Rewrite `const X = defineAsyncComponent(() => import('./X.vue'))`
    pub handle_dynamic_imports: bool,
    /// Globs of module ids to leave alone
    pub exclude: Vec<String>,
    /// Regexes of module ids to leave alone
    pub exclude_regex: Vec<String>,
    pub runtime_module: String,
    /// Fixed suffix for the resolver identifier. A random one is chosen
    /// when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            extensions: ["js", "ts", "jsx", "tsx", "vue"]
                .into_iter()
                .map(String::from)
                .collect(),
            handle_static_imports: true,
            handle_dynamic_imports: true,
            exclude: Vec::new(),
            exclude_regex: Vec::new(),
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
            uid: None,
        }
    }
}

impl TransformOptions {
    /// Parse options from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, TransformError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let options = TransformOptions::from_toml_str("").unwrap();
        assert_eq!(options, TransformOptions::default());
        assert_eq!(options.extensions.len(), 5);
        assert_eq!(options.runtime_module, DEFAULT_RUNTIME_MODULE);
    }

    #[test]
    fn test_kebab_case_keys() {
        let options = TransformOptions::from_toml_str(
            r#"
            extensions = ["ts"]
            handle-static-imports = false
            exclude-regex = ["Legacy"]
            runtime-module = "my-runtime"
            uid = "abc123"
            "#,
        )
        .unwrap();
        assert_eq!(options.extensions, vec!["ts".to_string()]);
        assert!(!options.handle_static_imports);
        assert!(options.handle_dynamic_imports);
        assert_eq!(options.exclude_regex, vec!["Legacy".to_string()]);
        assert_eq!(options.runtime_module, "my-runtime");
        assert_eq!(options.uid.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_unknown_value_type_is_an_error() {
        let err = TransformOptions::from_toml_str("extensions = 3").unwrap_err();
        assert!(matches!(err, TransformError::Config(_)));
    }
}
