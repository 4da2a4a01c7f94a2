//! Structured values carried by row data.
//!
//! Query results and view parameters arrive as `Value`s. The JSON form is
//! plain JSON, except that file references are written as
//! `{"$file": "sha256:<hex>"}` so they can't be confused with strings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SpecError;

const SHA256_PREFIX: &str = "sha256:";

/// A content-addressed reference to a stored file.
///
/// The renderer never looks inside a file reference; it is handed to the
/// file-URL collaborator as an opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FileRefRepr", into = "FileRefRepr")]
pub struct FileRef {
    /// Lowercase hex sha256 digest.
    digest: String,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileRefRepr {
    #[serde(rename = "$file")]
    file: String,
}

impl FileRef {
    /// Build a reference from a hex sha256 digest.
    pub fn sha256(digest: impl Into<String>) -> Result<Self, SpecError> {
        let digest = digest.into().to_ascii_lowercase();
        if digest.is_empty() || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SpecError::FileRef(format!("{}{}", SHA256_PREFIX, digest)));
        }
        Ok(Self { digest })
    }

    /// The token form (`sha256:<hex>`) passed to collaborators.
    pub fn token(&self) -> String {
        format!("{}{}", SHA256_PREFIX, self.digest)
    }
}

impl FromStr for FileRef {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(SHA256_PREFIX) {
            Some(digest) => FileRef::sha256(digest),
            None => Err(SpecError::FileRef(s.to_string())),
        }
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SHA256_PREFIX, self.digest)
    }
}

impl TryFrom<FileRefRepr> for FileRef {
    type Error = SpecError;

    fn try_from(repr: FileRefRepr) -> Result<Self, Self::Error> {
        repr.file.parse()
    }
}

impl From<FileRef> for FileRefRepr {
    fn from(file: FileRef) -> Self {
        FileRefRepr { file: file.token() }
    }
}

/// A structured value bound into the widget tree.
///
/// Variant order matters for deserialization: a `{"$file": ..}` object is
/// tried as a file reference before falling back to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON null
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Reference to a stored file
    File(FileRef),
    /// Ordered list of values
    List(Vec<Value>),
    /// Ordered key-value pairs
    Record(IndexMap<String, Value>),
}

impl Value {
    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::File(_) => "file",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Lists and records can't be shown in a leaf.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::List(_) | Value::Record(_))
    }

    pub fn as_record(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a record field. Returns `None` for non-records.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_record()?.get(field)
    }

    /// Compact JSON rendering. Only used for debug output.
    pub fn to_json_string(&self) -> String {
        // Every variant maps onto plain JSON; f64 non-finite values become null.
        serde_json::to_string(self).unwrap_or_else(|_| "null".to_string())
    }

    /// Parse a value from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(text)?)
    }
}

// Convenient conversions
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<FileRef> for Value {
    fn from(file: FileRef) -> Self {
        Value::File(file)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Record(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
