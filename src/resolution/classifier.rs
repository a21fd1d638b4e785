use crate::uri::{split_scheme, Uri};

/// A reference as it appears in a link or a lookup: either free text or an
/// identity that is already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    Uri(Uri),
    Text(String),
}

impl Reference {
    /// Wraps text, promoting `scheme://...` strings to identities.
    pub fn parse(text: &str) -> Self {
        if split_scheme(text).is_some() {
            if let Ok(uri) = Uri::parse(text) {
                return Reference::Uri(uri);
            }
        }
        Reference::Text(text.to_string())
    }
}

impl From<Uri> for Reference {
    fn from(uri: Uri) -> Self {
        Reference::Uri(uri)
    }
}

impl From<&Uri> for Reference {
    fn from(uri: &Uri) -> Self {
        Reference::Uri(uri.clone())
    }
}

impl From<&str> for Reference {
    fn from(text: &str) -> Self {
        Reference::parse(text)
    }
}

impl From<String> for Reference {
    fn from(text: String) -> Self {
        Reference::parse(&text)
    }
}

/// Kinds of references, deciding how a reference is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// Starts with a path separator; resolved against the workspace root.
    AbsolutePath,
    /// Starts with `./` or `../`; resolved against the source's directory.
    RelativePath,
    /// Anything else: a wikilink slug matched by path suffix.
    Key,
    /// Already an identity.
    Uri,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::AbsolutePath => "absolute-path",
            ReferenceKind::RelativePath => "relative-path",
            ReferenceKind::Key => "key",
            ReferenceKind::Uri => "uri",
        }
    }
}

/// Classifies a reference. Total: anything that is not an identity and does
/// not carry a path prefix is a key.
pub fn classify(reference: &Reference) -> ReferenceKind {
    match reference {
        Reference::Uri(_) => ReferenceKind::Uri,
        Reference::Text(text) => classify_text(text),
    }
}

pub(crate) fn classify_text(text: &str) -> ReferenceKind {
    if text.starts_with('/') {
        ReferenceKind::AbsolutePath
    } else if text.starts_with("./") || text.starts_with("../") {
        ReferenceKind::RelativePath
    } else {
        ReferenceKind::Key
    }
}
