//! On-disk layout of an encoded file.
//!
//! ```text
//! magic       6 bytes   b"mooose"
//! length      8 bytes   original byte count, little-endian u64
//! tree        1 byte    symbol count - 1
//!             per symbol: symbol (1 byte), code length in bits (1 byte),
//!             code bits packed LSB-first and padded to a byte
//! payload     one code per original byte, LSB-first, last byte zero-padded
//! ```

use crate::bitio::{BitReader, BitWriter};
use crate::codes::CodeTable;
use crate::error::{Error, Result};
use crate::tree::Node;
use log::trace;
use std::io::{self, Read, Write};

pub const MAGIC: [u8; 6] = *b"mooose";

pub const LENGTH_FIELD_LEN: usize = 8;

pub const HEADER_LEN: usize = MAGIC.len() + LENGTH_FIELD_LEN;

/// The fixed-size prefix of an encoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of bytes in the decoded output.
    pub original_len: u64,
}

impl Header {
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..MAGIC.len()].copy_from_slice(&MAGIC);
        out[MAGIC.len()..].copy_from_slice(&self.original_len.to_le_bytes());
        out
    }

    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Reads and checks the magic sentinel, then the length field.
    ///
    /// Input too short to hold the sentinel counts as corrupted.
    pub fn read<R: Read>(input: &mut R) -> Result<Self> {
        let mut magic = [0u8; MAGIC.len()];
        input.read_exact(&mut magic).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::CorruptedFile,
            _ => Error::Io(e),
        })?;
        if magic != MAGIC {
            return Err(Error::CorruptedFile);
        }

        let mut len = [0u8; LENGTH_FIELD_LEN];
        input
            .read_exact(&mut len)
            .map_err(|e| Error::Io(e).or_eof(Error::UnexpectedEndOfStream))?;

        Ok(Self {
            original_len: u64::from_le_bytes(len),
        })
    }
}

/// Writes the tree description for `codes`, entries in ascending symbol order.
pub fn write_tree<W: Write>(out: &mut W, codes: &CodeTable) -> Result<()> {
    let count = codes.len();
    if count == 0 {
        return Err(Error::InvalidTree("no symbols"));
    }
    out.write_all(&[(count - 1) as u8])?;

    for (symbol, code) in codes.iter() {
        let bit_len =
            u8::try_from(code.len()).map_err(|_| Error::InvalidTree("code longer than 255 bits"))?;
        trace!("tree entry {:#04x}: {} bits", symbol, bit_len);

        out.write_all(&[symbol, bit_len])?;

        let mut bw = BitWriter::new(&mut *out);
        bw.write_bits(code)?;
        bw.finish()?;
    }

    Ok(())
}

/// Partially rebuilt tree. Slots are filled in as codes arrive.
#[derive(Default)]
struct Slot {
    symbol: Option<u8>,
    children: [Option<Box<Slot>>; 2],
}

impl Slot {
    fn insert(&mut self, code: impl Iterator<Item = u8>, symbol: u8) -> Result<()> {
        let mut cur = self;
        for bit in code {
            if cur.symbol.is_some() {
                return Err(Error::InvalidTree("code extends another code"));
            }
            cur = &mut **cur.children[bit as usize].get_or_insert_with(Box::default);
        }

        if cur.symbol.is_some() || cur.children.iter().any(Option::is_some) {
            return Err(Error::InvalidTree("code collides with another code"));
        }
        cur.symbol = Some(symbol);
        Ok(())
    }

    fn into_node(self) -> Result<Node> {
        match (self.symbol, self.children) {
            (Some(symbol), [None, None]) => Ok(Node::leaf(symbol, 0)),
            (None, [Some(left), Some(right)]) => {
                Ok(Node::from_children(left.into_node()?, right.into_node()?))
            }
            _ => Err(Error::InvalidTree("branch is missing a child")),
        }
    }
}

/// Reads a tree written by [`write_tree`] and rebuilds it.
///
/// Weights are not stored on disk, so every node of the result weighs zero.
pub fn read_tree<R: Read>(input: &mut R) -> Result<Node> {
    let mut byte = [0u8];
    input
        .read_exact(&mut byte)
        .map_err(|e| Error::Io(e).or_eof(Error::TruncatedTree))?;
    let count = byte[0] as usize + 1;

    let mut seen = [false; 256];
    let mut root = Slot::default();

    for _ in 0..count {
        let mut entry = [0u8; 2];
        input
            .read_exact(&mut entry)
            .map_err(|e| Error::Io(e).or_eof(Error::TruncatedTree))?;
        let [symbol, bit_len] = entry;

        if std::mem::replace(&mut seen[symbol as usize], true) {
            return Err(Error::InvalidTree("symbol listed twice"));
        }

        let mut br = BitReader::new(&mut *input);
        let code = br
            .read_bits(bit_len as usize)
            .map_err(|e| e.or_eof(Error::TruncatedTree))?;
        trace!("tree entry {:#04x}: {} bits", symbol, bit_len);

        root.insert(code.iter().by_vals().map(u8::from), symbol)?;
    }

    root.into_node()
}
