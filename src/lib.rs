//! Byte-oriented Huffman compression of whole files.
//!
//! ```no_run
//! huffc::encode("notes.txt", "notes.huff")?;
//! huffc::decode("notes.huff", "notes.txt")?;
//! # Ok::<(), huffc::Error>(())
//! ```

pub mod bitio;
pub mod codec;
pub mod codes;
pub mod error;
pub mod format;
pub mod queue;
pub mod tree;

pub use codec::{decode, decode_from, decode_into, encode, encode_to, EncodeSummary};
pub use codes::{derive_codes, CodeTable};
pub use error::{Error, Result};
pub use tree::{build_tree, Frequencies, Node};
