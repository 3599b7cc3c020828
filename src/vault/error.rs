//! Vault errors and write outcomes

use thiserror::Error;

/// Result type for entity store operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors from entity store operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No row matched the requested key.
    #[error("no row in {table} matches {key}")]
    NotFound {
        /// Table that was searched.
        table: String,
        /// Key that was searched for.
        key: String,
    },

    /// A row came back but could not be turned into an entity.
    ///
    /// Usually a mismatch between the configured layout and the table.
    #[error("malformed row in {table}: {reason}")]
    MalformedRow {
        /// Table the row came from.
        table: String,
        /// What was missing or wrong.
        reason: String,
    },

    /// An entity had no role or attribute that maps to a column, so nothing
    /// readable could be written.
    #[error("nothing in {key} maps to a column of {table}")]
    Unmapped {
        /// Table the write was meant for.
        table: String,
        /// Key of the rejected entity.
        key: String,
    },

    /// The backing connection reported an error.
    #[error("backing store failure: {0:#}")]
    Backend(anyhow::Error),

    /// A configured table or column name is not a plain SQL identifier.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),

    /// A store layout is inconsistent.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl VaultError {
    pub(crate) fn not_found(table: &str, key: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.to_string(),
            key: key.into(),
        }
    }

    pub(crate) fn malformed(table: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unmapped(table: &str, key: impl Into<String>) -> Self {
        Self::Unmapped {
            table: table.to_string(),
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRow { .. })
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, Self::Unmapped { .. })
    }
}

/// Successful result of a dedup insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new row was written.
    Inserted,
    /// A row with the same key was already there; nothing was written.
    AlreadyPresent,
}

impl SaveOutcome {
    pub(crate) fn from_affected(rows: usize) -> Self {
        if rows == 0 {
            Self::AlreadyPresent
        } else {
            Self::Inserted
        }
    }

    pub fn was_inserted(self) -> bool {
        self == Self::Inserted
    }
}
