// Named failures that callers distinguish via anyhow::Error::downcast_ref

use std::fmt;

/// An import was blocked because one or more rows failed content validation.
#[derive(Debug)]
pub struct ValidationFailedError {
    pub errors: Vec<String>,
}

impl fmt::Display for ValidationFailedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Import failed:")?;
        for error in &self.errors {
            write!(f, "\n{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailedError {}

#[derive(Debug)]
pub struct UnsupportedFormatError {
    pub extension: String,
}

impl fmt::Display for UnsupportedFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.extension.is_empty() {
            write!(f, "File has no extension; cannot determine its format")
        } else {
            write!(f, "Unsupported file extension for table import: {}", self.extension)
        }
    }
}

impl std::error::Error for UnsupportedFormatError {}

#[derive(Debug)]
pub struct DecodeError {
    pub file: String,
    pub message: String,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Failed to decode {}: {}", self.file, self.message)
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug)]
pub struct SerializationError {
    pub message: String,
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Failed to serialize RDF: {}", self.message)
    }
}

impl std::error::Error for SerializationError {}

#[derive(Debug)]
pub struct InvalidInsertModeError {
    pub mode: String,
}

impl fmt::Display for InvalidInsertModeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid insert mode \"{}\"; expected \"append\" or \"replace\"",
            self.mode
        )
    }
}

impl std::error::Error for InvalidInsertModeError {}
