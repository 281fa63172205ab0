use thiserror::Error;

/// Failure taxonomy of the dictionary.
///
/// Absent entities are never errors — lookups return `None` or empty
/// collections for those. Errors are reserved for queries that are
/// malformed regardless of corpus content ([`Error::InvalidQuery`]),
/// corpora that violate their own format or invariants
/// ([`Error::Corpus`]), and I/O failures while resolving the corpus
/// ([`Error::Store`]).
#[derive(Debug, Error)]
pub enum Error {
    /// The query itself is malformed: `PosSelect::All` where a single
    /// result is required, a non-positive or out-of-range sense number.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The corpus violated its documented format or an internal invariant;
    /// continuing would return wrong answers.
    #[error("corpus integrity: {0}")]
    Corpus(String),

    /// Reading or mapping a backing file failed.
    #[error(transparent)]
    Store(#[from] wordnet_store::StoreError),
}

impl Error {
    pub(crate) fn corpus(msg: impl Into<String>) -> Self {
        Error::Corpus(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidQuery(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
