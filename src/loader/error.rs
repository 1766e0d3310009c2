//! Errors produced by the descriptor loaders

use std::error::Error as _;
use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A structurally valid JSON document that does not satisfy its schema
#[derive(Debug, Error)]
pub enum SchemaMismatch {
    /// The component descriptor names a type nobody registered
    #[error("unregistered component type `{type_name}`")]
    UnknownType {
        /// The `type` string from the component descriptor
        type_name: String,
    },
    /// The `fields` object is missing a field, has an extra one, or a value of the wrong type
    #[error("component `{type_name}` fields do not match its schema")]
    Fields {
        /// The registered type the fields were decoded against
        type_name: String,
        #[source]
        source: serde_json::Error,
    },
    /// The document itself is not shaped like the expected descriptor
    #[error("expected {expected}")]
    Shape {
        /// Human-readable name of the expected descriptor shape
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Any failure on the way from a descriptor file to live objects.
///
/// Loader boundaries wrap causes in [`LoadError::Context`], so by the time an
/// error surfaces at the driver it names the whole chain:
/// scene file → entity file → component file → root cause.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The descriptor file is missing or unreadable
    #[error("could not read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The descriptor file is not valid JSON
    #[error("malformed JSON in `{}`", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Valid JSON that fails schema validation
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
    /// A lower-level failure, annotated with the file that was being loaded
    #[error("while loading `{}`", .path.display())]
    Context {
        path: PathBuf,
        #[source]
        source: Box<LoadError>,
    },
    /// The load observed its cancellation token. Not a user-visible error.
    #[error("load cancelled")]
    Cancelled,
    /// A load worker thread died without reporting a result
    #[error("load worker terminated unexpectedly")]
    Worker,
}

impl LoadError {
    /// Wrap this error with the path of the descriptor that was being loaded.
    ///
    /// No-op when the error already names that path, so loader boundaries can
    /// wrap unconditionally without producing `while loading x: could not
    /// read x` chains.
    #[must_use]
    pub fn at(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if self.names(&path) {
            return self;
        }
        Self::Context {
            path,
            source: Box::new(self),
        }
    }

    fn names(&self, path: &std::path::Path) -> bool {
        match self {
            Self::Io { path: p, .. }
            | Self::Parse { path: p, .. }
            | Self::Context { path: p, .. } => p == path,
            _ => false,
        }
    }

    /// Whether this is a cancellation, which callers discard silently
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Context { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// Render the error and every source below it on one line
    #[must_use]
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let _ = write!(rendered, ": {cause}");
            source = cause.source();
        }
        rendered
    }
}
