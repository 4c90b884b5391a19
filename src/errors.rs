use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FileOperation {
    #[error("reading a file")]
    Read,
    #[error("writing a file")]
    Write,
    #[error("creating a directory")]
    Mkdir,
    #[error("removing an entry")]
    Remove,
    #[error("renaming a file")]
    Rename,
    #[error("copying a file")]
    Copy,
}
#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} on path '{path}'")]
#[diagnostic(
    code(vue_scaffold::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    pub path: std::path::PathBuf,
    #[source]
    pub source: std::io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: std::path::PathBuf, error: std::io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum FileFormat {
    #[error("json")]
    Json,
    #[error("toml")]
    Toml,
}
#[derive(Debug, Error, Diagnostic)]
#[error("Parsing error: {file_format} on '{path}'")]
#[diagnostic(code(vue_scaffold::parse), help("Review file"))]
pub struct ParseError {
    pub file_format: FileFormat,
    pub path: std::path::PathBuf,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}
impl ParseError {
    pub fn json(path: std::path::PathBuf, error: serde_json::Error) -> Self {
        Self {
            file_format: FileFormat::Json,
            path,
            source: Box::new(error),
        }
    }

    pub fn toml(path: std::path::PathBuf, error: toml::de::Error) -> Self {
        Self {
            file_format: FileFormat::Toml,
            path,
            source: Box::new(error),
        }
    }
}
