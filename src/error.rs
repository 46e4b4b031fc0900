//! Error type shared by every stage of the codec.

use std::io;

/// Errors produced while building, writing, or reading a Huffman-coded file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source handed to the encoder contained no bytes.
    #[error("input is empty")]
    EmptyInput,

    /// Open, read, write, seek, or close failed on one of the files.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The magic sentinel at the start of the file did not match.
    #[error("corrupted file")]
    CorruptedFile,

    /// The serialized tree ended before all of its entries were read.
    #[error("truncated tree")]
    TruncatedTree,

    /// The payload ended before the declared number of symbols was decoded.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// A bit reader ran out of bytes.
    #[error("end of stream")]
    EndOfStream,

    /// A bit writer was handed something other than 0 or 1.
    #[error("invalid bit value: {0}")]
    InvalidArgument(u8),

    /// `pop_min` was called on an empty queue.
    #[error("priority queue is empty")]
    EmptyQueue,

    /// The declared output length cannot be held in memory.
    #[error("declared length {0} is too large to decode into memory")]
    TooLarge(u64),

    /// The serialized tree is well-formed on the wire but cannot describe a prefix code.
    #[error("invalid tree: {0}")]
    InvalidTree(&'static str),
}

impl Error {
    /// Returns true if the error comes from malformed input rather than the environment.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::CorruptedFile
                | Error::TruncatedTree
                | Error::UnexpectedEndOfStream
                | Error::InvalidTree(_)
        )
    }

    /// Maps a bit reader's end-of-stream onto the error that fits the caller's stage.
    pub(crate) fn or_eof(self, eof: Error) -> Error {
        match self {
            Error::EndOfStream => eof,
            Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => eof,
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
