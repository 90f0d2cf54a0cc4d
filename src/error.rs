//! Error types for the content layer

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering, reading, parsing or compiling posts
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Post not found: {slug} ({path:?})")]
    NotFound { slug: String, path: PathBuf },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front-matter{}: {message}", display_path(.path))]
    FrontMatter {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Compile error{}: {message}", display_path(.path))]
    Compile {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Failed to discover posts with pattern {pattern}: {message}")]
    Discovery { pattern: String, message: String },

    #[error("Failed to load code theme {source_name}: {message}")]
    Theme { source_name: String, message: String },

    #[error("Invalid configuration {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ContentError {
    /// Build a front-matter error without a known file
    pub fn front_matter(message: impl Into<String>) -> Self {
        Self::FrontMatter {
            path: None,
            message: message.into(),
        }
    }

    /// Build a compile error without a known file
    pub fn compile(message: impl Into<String>) -> Self {
        Self::Compile {
            path: None,
            message: message.into(),
        }
    }

    /// Attach a file path to parse and compile errors that lack one
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            Self::FrontMatter {
                path: None,
                message,
            } => Self::FrontMatter {
                path: Some(file.into()),
                message,
            },
            Self::Compile {
                path: None,
                message,
            } => Self::Compile {
                path: Some(file.into()),
                message,
            },
            other => other,
        }
    }

    /// Whether this error means the requested post does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {:?}", p),
        None => String::new(),
    }
}
