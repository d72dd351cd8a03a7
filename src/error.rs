//! Error types for the tabsql library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tabsql operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while processing a workbook.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The path does not reference an existing regular file.
    #[error("{0} is not a valid file path")]
    InvalidPath(PathBuf),

    /// The path does not end in a recognized workbook extension.
    #[error("{0} is not a valid tableau file (expected .twb or .twbx)")]
    UnsupportedExtension(PathBuf),

    /// Error reading the .twbx ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// A .twbx package contained no inner .twb document.
    #[error("{0} contains no .twb document")]
    EmptyArchive(PathBuf),

    /// The workbook XML is not well-formed.
    #[error("XML parse error: {0}")]
    MalformedDocument(String),

    /// A structurally required element is absent.
    #[error("missing required element: {path}")]
    MissingElement {
        /// Element path relative to its parent, e.g. `datasource/connection`.
        path: String,
    },

    /// A structurally required attribute is absent.
    #[error("missing required attribute `{attribute}` on <{element}>")]
    MissingAttribute {
        /// The element the attribute was expected on.
        element: String,
        /// The attribute name.
        attribute: String,
    },
}

impl Error {
    pub(crate) fn missing_element(path: impl Into<String>) -> Self {
        Error::MissingElement { path: path.into() }
    }

    pub(crate) fn missing_attribute(
        element: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Error::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedExtension(PathBuf::from("report.xlsx"));
        assert_eq!(
            err.to_string(),
            "report.xlsx is not a valid tableau file (expected .twb or .twbx)"
        );

        let err = Error::missing_attribute("worksheet", "name");
        assert_eq!(
            err.to_string(),
            "missing required attribute `name` on <worksheet>"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
