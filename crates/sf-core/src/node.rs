//! Signal identifiers.
//!
//! A node is either *global* (used verbatim everywhere in the network) or
//! *local* (starts with [`ANON_MARKER`] and is qualified by the enclosing
//! submodel). The bare marker asks the builder for an auto-generated name.
//! Once a scope has resolved a node it is *locked* and never rewritten again.

use std::fmt;

/// Prefix of local signal names.
pub const ANON_MARKER: char = '-';

/// Spelling of the bare anonymous marker accepted besides `"-"` and `""`.
const AUTO: &str = "auto";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    text: String,
    locked: bool,
}

impl Node {
    /// A node as written by model code; rewritten by the enclosing scope.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locked: false,
        }
    }

    /// The bare anonymous marker.
    pub fn auto() -> Self {
        Self::new(ANON_MARKER.to_string())
    }

    /// A named local signal, qualified by the enclosing scope path.
    pub fn local(name: impl fmt::Display) -> Self {
        Self::new(format!("{ANON_MARKER}{name}"))
    }

    /// A node whose text is final.
    pub fn locked(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locked: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// `true` for the bare marker (`-`, empty, or `auto`).
    pub fn is_anonymous(&self) -> bool {
        let t = self.text.as_str();
        t.is_empty() || t == AUTO || (t.len() == 1 && t.starts_with(ANON_MARKER))
    }

    /// `true` for names that belong to a scope (including the bare marker).
    pub fn is_local(&self) -> bool {
        self.is_anonymous() || self.text.starts_with(ANON_MARKER)
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&Node> for Node {
    fn from(node: &Node) -> Self {
        node.clone()
    }
}

impl AsRef<str> for Node {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
