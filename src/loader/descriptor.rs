//! Descriptor documents
//!
//! The three JSON shapes the loader tree understands, plus the file read and
//! path resolution rules shared by every loader level.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use super::error::{LoadError, SchemaMismatch};

/// Scene-level metadata carried alongside the entity list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneMetadata {
    /// Display name of the scene
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form values interpreted by the scene implementation
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Describes one scene: which entity files to load, plus metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescriptor {
    /// Entity descriptor paths, relative to this file's directory
    pub entities: Vec<String>,
    #[serde(default)]
    pub metadata: SceneMetadata,
}

/// Describes one entity: which component files make it up
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDescriptor {
    /// Component descriptor paths, relative to this file's directory
    pub components: Vec<String>,
}

/// Describes one component value: a registered type name and its fields
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDescriptor {
    /// Key into the schema registry
    #[serde(rename = "type")]
    pub type_name: String,
    /// Field values, validated against the registered schema
    pub fields: Value,
}

impl SceneDescriptor {
    /// Interpret an already-parsed JSON value as a scene descriptor
    ///
    /// # Errors
    ///
    /// Returns [`SchemaMismatch::Shape`] if the value has the wrong shape.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        shaped(value, "a scene descriptor ({entities, metadata?})")
    }
}

impl EntityDescriptor {
    /// Interpret an already-parsed JSON value as an entity descriptor
    ///
    /// # Errors
    ///
    /// Returns [`SchemaMismatch::Shape`] if the value has the wrong shape.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        shaped(value, "an entity descriptor ({components})")
    }
}

impl ComponentDescriptor {
    /// Interpret an already-parsed JSON value as a component descriptor
    ///
    /// # Errors
    ///
    /// Returns [`SchemaMismatch::Shape`] if the value has the wrong shape.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        shaped(value, "a component descriptor ({type, fields})")
    }
}

fn shaped<T: for<'de> Deserialize<'de>>(
    value: Value,
    expected: &'static str,
) -> Result<T, LoadError> {
    serde_json::from_value(value)
        .map_err(|source| SchemaMismatch::Shape { expected, source }.into())
}

/// Read a descriptor file into a JSON value.
///
/// Parsing to `Value` first keeps unreadable files ([`LoadError::Io`]),
/// malformed text ([`LoadError::Parse`]) and shape problems
/// ([`SchemaMismatch`]) distinguishable.
///
/// # Errors
///
/// Returns [`LoadError::Io`] or [`LoadError::Parse`], tagged with `path`.
pub fn read_json(path: &Path) -> Result<Value, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve a reference found in a descriptor against that descriptor's
/// own directory, never the process working directory, so bundles can be
/// relocated as a unit.
#[must_use]
pub fn sibling_path(referencing_file: &Path, relative: &str) -> PathBuf {
    match referencing_file.parent() {
        Some(dir) => dir.join(relative),
        None => PathBuf::from(relative),
    }
}
