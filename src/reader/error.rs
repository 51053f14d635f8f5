use crate::schema::Datatype;
use crate::storage::StorageError;

/// Errors raised while reading fragments back
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A fragment's metadata document could not be parsed
    #[error("metadata parse error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// The requested attribute is not part of the fragment
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    /// A typed accessor was used against the wrong datatype or cell layout
    #[error("attribute '{field}' holds {actual}, not {requested}")]
    TypeMismatch {
        /// Attribute name
        field: String,
        /// Datatype recorded in the fragment
        actual: Datatype,
        /// Datatype the accessor expected
        requested: Datatype,
    },

    /// A fixed-length typed accessor was used on a variable-length
    /// attribute, or the other way around
    #[error("attribute '{field}' does not match the accessor's cell layout")]
    VarLengthAttribute {
        /// Attribute name
        field: String,
    },

    /// Serialized tile data is shorter than its index entry claims
    #[error("fragment '{fragment}' is corrupt: {reason}")]
    Corrupt {
        /// Fragment name
        fragment: String,
        /// What failed to decode
        reason: String,
    },
}
