use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or storing query definitions.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The definition file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error.
    #[error("invalid YAML definition{}: {message}", display_path(.path))]
    Yaml {
        path: Option<PathBuf>,
        message: String,
    },

    /// JSON parse error.
    #[error("invalid JSON definition{}: {message}", display_path(.path))]
    Json {
        path: Option<PathBuf>,
        message: String,
    },

    /// The file extension maps to no known format.
    #[error("unsupported definition format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A required field is empty.
    #[error("definition '{id}' is missing {field}")]
    Missing { id: String, field: &'static str },

    /// The store has no definition with this id.
    #[error("no definition with id '{0}'")]
    NotFound(String),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_path() {
        let err = DefinitionError::Yaml {
            path: Some(PathBuf::from("q.yaml")),
            message: "bad indent".into(),
        };
        assert_eq!(err.to_string(), "invalid YAML definition in q.yaml: bad indent");

        let err = DefinitionError::Json {
            path: None,
            message: "EOF".into(),
        };
        assert_eq!(err.to_string(), "invalid JSON definition: EOF");
    }
}
