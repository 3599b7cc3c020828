//! Validated SQL identifiers
//!
//! Table and column names are the only text spliced into statements, so they
//! are restricted to plain identifiers and always rendered quoted.

use std::fmt;

use super::error::{VaultError, VaultResult};

const MAX_IDENT_LEN: usize = 64;

/// A table or column name that is safe to place in SQL text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(String);

impl Ident {
    /// Accepts `[A-Za-z_][A-Za-z0-9_]*`, at most 64 characters
    pub fn new(name: impl Into<String>) -> VaultResult<Self> {
        let name = name.into();
        if is_plain_identifier(&name) {
            Ok(Self(name))
        } else {
            Err(VaultError::InvalidIdentifier(name))
        }
    }

    /// The name as stored, which is also how result rows label the column
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= MAX_IDENT_LEN
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
