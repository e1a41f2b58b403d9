//! The error taxonomy every component in this crate reports through.

/// A failure from any layer of the MUD codec.
///
/// Friendly getters/setters (see [`crate::friendly`]) never surface this
/// type directly — they fold it into `Option`/`bool` per the format's
/// documented "never raise" contract — but everything below that boundary
/// (the buffer, the registry dispatch, the tree, the file driver) reports
/// through `MudError`.
#[derive(Debug, thiserror::Error)]
pub enum MudError {
    /// The outer Core has an unrecognized `secID`, or the stream is shorter
    /// than a single Core.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// A `nextOffset`/`size` would overrun the enclosing scope, or a
    /// length-prefixed string's declared length exceeds the remaining
    /// payload.
    #[error("corrupt section: {0}")]
    CorruptSection(String),

    /// `secID` is not in the registry. Not fatal on its own — the default
    /// reader folds this into an opaque payload rather than ever returning
    /// it — but callers building a strict-mode reader can match on it.
    #[error("unknown section id 0x{0:08x}")]
    UnknownSection(u32),

    /// A friendly getter/setter addressed a Section absent from the tree.
    #[error("section not found: {0}")]
    NotFound(String),

    /// A friendly setter received a value that violates a type constraint.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The underlying read/write/open failed.
    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MudError>;
