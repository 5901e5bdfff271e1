use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for svgs operations
#[derive(Error, Debug)]
pub enum SvgsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("{0}")]
    Duplicate(#[from] DuplicateError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conversion(#[from] ConversionError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Transform failed for {component}: {message}")]
    Transform { component: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Asset scanning errors
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Assets have not been scanned yet")]
    NotScanned,

    #[error("Assets directory not found: {path:?}")]
    MissingRoot { path: PathBuf },

    #[error("{} invalid asset(s) found:{}", .errors.len(), bullet_list(.errors))]
    Invalid { errors: Vec<String> },
}

/// Uniqueness violations found while building
#[derive(Error, Debug)]
pub enum DuplicateError {
    #[error("Duplicate component name detected: {name}\n - {existing:?}\n - {new:?}\nPlease rename one of the files to ensure unique component names.")]
    Name {
        name: String,
        existing: PathBuf,
        new: PathBuf,
    },

    #[error("Duplicate SVG content detected:\n - {existing:?}\n - {new:?}\nThese files contain identical SVG code. Please remove one or modify the content.")]
    Content { existing: PathBuf, new: PathBuf },
}

/// Every validation problem found during change detection, reported together
#[derive(Error, Debug)]
#[error("Validation errors detected during change detection.{}", bullet_list(.errors))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

/// Batch conversion or deletion failures
#[derive(Error, Debug)]
#[error("Conversion failed due to errors.{}", bullet_list(.failures))]
pub struct ConversionError {
    pub failures: Vec<String>,
}

/// Database errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database not loaded. Call load() before performing operations.")]
    NotLoaded,

    #[error("Database file at {path:?} is corrupted: {source}")]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize database: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Database at {path:?} was already being saved; this run's changes were not persisted")]
    SaveInFlight { path: PathBuf },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration file already exists at {path:?}")]
    AlreadyExists { path: PathBuf },
}

/// Build orchestration errors
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Icon {file:?} must be placed inside a category folder (e.g., assets/media/{file})")]
    MissingFamily { file: String },

    #[error("Invalid filename: {name:?}. Filenames must be strictly kebab-case (lowercase letters and single dashes only, e.g., \"my-icon\")")]
    InvalidName { name: String },
}

/// Result type alias for svgs operations
pub type SvgsResult<T> = Result<T, SvgsError>;

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|item| format!("\n  - {}", item)).collect()
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    fn context<C>(self, context: C) -> SvgsResult<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    fn with_context<C, F>(self, f: F) -> SvgsResult<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> ErrorContext<T> for Result<T, io::Error> {
    fn context<C>(self, context: C) -> SvgsResult<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| SvgsError::Io(io::Error::new(e.kind(), format!("{}: {}", context, e))))
    }

    fn with_context<C, F>(self, f: F) -> SvgsResult<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| SvgsError::Io(io::Error::new(e.kind(), format!("{}: {}", f(), e))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_entry() {
        let error = ValidationError {
            errors: vec![
                "Duplicate name \"home\"".to_string(),
                "Duplicate content".to_string(),
            ],
        };

        let display = error.to_string();
        assert!(display.starts_with("Validation errors detected during change detection."));
        assert!(display.contains("  - Duplicate name \"home\""));
        assert!(display.contains("  - Duplicate content"));
    }

    #[test]
    fn test_error_context() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let result: Result<(), io::Error> = Err(io_error);

        let error = result.context("Failed to read manifest").unwrap_err();
        match &error {
            SvgsError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(error.to_string().contains("Failed to read manifest"));
    }

    #[test]
    fn test_duplicate_error_names_both_paths() {
        let error = DuplicateError::Content {
            existing: PathBuf::from("assets/a.svg"),
            new: PathBuf::from("assets/b.svg"),
        };

        let display = SvgsError::from(error).to_string();
        assert!(display.contains("assets/a.svg"));
        assert!(display.contains("assets/b.svg"));
    }
}
