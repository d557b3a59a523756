use thiserror::Error;
use vco_edit::EditError;
use vco_exclude::ExcludeError;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Invalid transformer configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Exclude(#[from] ExcludeError),

    #[error("Invalid pattern built from configuration: {0}")]
    Pattern(#[source] regex::Error),

    #[error("Failed to rewrite {id}: {source}")]
    Edit {
        id: String,
        #[source]
        source: EditError,
    },
}
