use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{GraphError, Result};

/// Scheme used for documents addressed by a workspace path.
pub const FILE_SCHEME: &str = "file";

/// Reserved scheme for synthetic nodes standing in for unresolved targets.
pub const PLACEHOLDER_SCHEME: &str = "placeholder";

/// Normalized, comparable identity of a resource.
///
/// Two identities are equal iff their scheme and normalized path match.
/// File identities display as their bare path; every other scheme displays
/// as `scheme://path`, and [`Uri::parse`] reads both forms back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uri {
    scheme: String,
    path: String,
}

impl Uri {
    /// Creates an identity with an explicit scheme. Absolute paths are
    /// normalized; anything else is kept verbatim.
    pub fn new(scheme: impl Into<String>, path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let path = if path.starts_with('/') {
            normalize_path(path)
        } else {
            path.to_string()
        };
        Self {
            scheme: scheme.into(),
            path,
        }
    }

    /// Creates a `file` identity from a workspace path.
    pub fn file(path: impl AsRef<str>) -> Self {
        Self {
            scheme: FILE_SCHEME.to_string(),
            path: normalize_path(path.as_ref()),
        }
    }

    /// Creates a placeholder identity holding the unresolved reference.
    pub fn placeholder(reference: impl AsRef<str>) -> Self {
        Self::new(PLACEHOLDER_SCHEME, reference)
    }

    /// Parses `scheme://path` or a bare path (which becomes a `file` identity).
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(GraphError::InvalidUri {
                input: input.to_string(),
            });
        }
        match split_scheme(input) {
            Some((scheme, path)) if path.is_empty() => Err(GraphError::InvalidUri {
                input: format!("{scheme}://"),
            }),
            Some((scheme, path)) if scheme == FILE_SCHEME => Ok(Self::file(path)),
            Some((scheme, path)) => Ok(Self::new(scheme, path)),
            None => Ok(Self::file(input)),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_placeholder(&self) -> bool {
        self.scheme == PLACEHOLDER_SCHEME
    }

    /// Last path segment, e.g. `page-b.md` for `/path/to/page-b.md`.
    pub fn basename(&self) -> &str {
        basename(&self.path)
    }

    /// Extension of the last path segment including the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        extension(&self.path)
    }

    /// Directory containing this identity's path, without a trailing slash.
    pub fn dirname(&self) -> &str {
        match self.path.rfind('/') {
            Some(0) => "/",
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }

    /// Resolves a path reference against this identity's directory.
    /// Absolute references ignore the directory.
    pub fn resolve(&self, reference: &str) -> Uri {
        if reference.starts_with('/') {
            return Uri::file(reference);
        }
        Uri::file(format!("{}/{}", self.dirname(), reference))
    }

    /// Returns a copy of this identity with `suffix` appended to its path.
    pub fn with_suffix(&self, suffix: &str) -> Uri {
        Uri {
            scheme: self.scheme.clone(),
            path: format!("{}{}", self.path, suffix),
        }
    }

    /// Store and index key. Folds the path to lowercase when the workspace
    /// is case-insensitive.
    pub fn key(&self, case_sensitive: bool) -> String {
        if case_sensitive {
            format!("{}:{}", self.scheme, self.path)
        } else {
            format!("{}:{}", self.scheme, self.path.to_lowercase())
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scheme == FILE_SCHEME {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}://{}", self.scheme, self.path)
        }
    }
}

impl TryFrom<String> for Uri {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self> {
        Uri::parse(&value)
    }
}

impl From<Uri> for String {
    fn from(uri: Uri) -> Self {
        uri.to_string()
    }
}

/// Splits `scheme://rest` when the prefix is a syntactically valid scheme.
pub(crate) fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let idx = input.find("://")?;
    let scheme = &input[..idx];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some((scheme, &input[idx + 3..]))
}

/// Collapses repeated separators, `.` and `..` segments.
///
/// `..` never climbs above the root of an absolute path; on relative paths
/// leading `..` segments are kept.
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            s => segments.push(s),
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

pub(crate) fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub(crate) fn extension(path: &str) -> Option<&str> {
    let name = basename(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 == name.len() => None,
        Some(idx) => Some(&name[idx..]),
    }
}

/// The path with the extension of its last segment removed.
pub(crate) fn strip_extension(path: &str) -> &str {
    match extension(path) {
        Some(ext) => &path[..path.len() - ext.len()],
        None => path,
    }
}
