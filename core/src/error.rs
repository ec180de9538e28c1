use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuarryError {
    /// Schema configuration that reaches outside the definition being built
    #[error("Configuration scope error: {0}")]
    ConfigurationScope(String),

    /// A column handle that no alias of the current query can resolve
    #[error("Unresolved column: {0}")]
    UnresolvedColumn(String),

    /// Update, merge or keyed delete on a type without a primary key
    #[error("Table {0} declares no primary key")]
    NoPrimaryKey(String),

    /// The same alias instance registered twice in one query
    #[error("Ambiguous alias: {0}")]
    AmbiguousAlias(String),

    /// Error reported by the underlying store
    #[error("Storage execution error: {0}")]
    StorageExecution(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Error mapping data between columns and fields
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Error in statement
    #[error("Statement error: {0}")]
    Statement(String),
}

#[cfg(feature = "rusqlite")]
impl From<rusqlite::Error> for QuarryError {
    fn from(error: rusqlite::Error) -> Self {
        QuarryError::StorageExecution(Box::new(error))
    }
}

/// Result type for mapping, rendering and execution
pub type Result<T> = std::result::Result<T, QuarryError>;
