//! Error types for parsing and rendering documents

use thiserror::Error;

/// Front-matter parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing front-matter: document must start with a '---', ';;;' or '+++' line")]
    MissingFrontMatter,

    #[error("Unterminated front-matter: no closing '{marker}' line")]
    Unterminated { marker: &'static str },

    #[error("Malformed {format} front-matter: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    #[error("Missing required front-matter field '{field}'")]
    MissingField { field: &'static str },

    #[error("Invalid front-matter field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ParseError {
    /// Name of the offending field, if the error is about one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ParseError::MissingField { field } | ParseError::InvalidField { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}

/// Page rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Layout not found: {0}")]
    UnknownLayout(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
