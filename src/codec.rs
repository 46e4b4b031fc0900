use crate::bitio::{BitReader, BitWriter};
use crate::codes::{derive_codes, CodeTable};
use crate::error::{Error, Result};
use crate::format::{self, Header, HEADER_LEN};
use crate::tree::{build_tree, Frequencies, Node};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// What an encode produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Bytes in the source.
    pub original_len: u64,
    /// Bytes written to the destination, header included.
    pub encoded_len: u64,
    pub distinct_symbols: usize,
}

impl EncodeSummary {
    /// Encoded size over original size.
    pub fn ratio(&self) -> f64 {
        self.encoded_len as f64 / self.original_len as f64
    }
}

struct Plan {
    freq: Frequencies,
    codes: CodeTable,
}

impl Plan {
    fn new(data: &[u8]) -> Result<Self> {
        let freq = Frequencies::from_bytes(data);
        let root = build_tree(&freq)?;
        let codes = derive_codes(&root);
        Ok(Self { freq, codes })
    }

    fn write<W: Write + Seek>(&self, data: &[u8], out: &mut W) -> Result<EncodeSummary> {
        let start = out.stream_position()?;

        // placeholder until the payload is written
        out.write_all(&[0u8; HEADER_LEN])?;
        format::write_tree(out, &self.codes)?;

        let mut bw = BitWriter::new(&mut *out);
        for &b in data {
            let code = self.codes.get(b).ok_or(Error::InvalidTree("symbol missing from table"))?;
            bw.write_bits(code)?;
        }
        bw.finish()?;
        debug!(
            "wrote {} payload bits for {} symbols",
            self.codes.encoded_bits(&self.freq),
            data.len()
        );

        let end = out.stream_position()?;
        out.seek(SeekFrom::Start(start))?;
        Header {
            original_len: data.len() as u64,
        }
        .write(out)?;
        out.seek(SeekFrom::Start(end))?;
        out.flush()?;

        Ok(EncodeSummary {
            original_len: data.len() as u64,
            encoded_len: end - start,
            distinct_symbols: self.codes.len(),
        })
    }
}

/// Encodes `data` into `out`, starting at the current position.
pub fn encode_to<W: Write + Seek>(data: &[u8], out: &mut W) -> Result<EncodeSummary> {
    Plan::new(data)?.write(data, out)
}

/// Bytes of the lone symbol written per call when the tree is a single leaf.
const RUN_CHUNK: usize = 8 * 1024;

fn read_prelude<R: Read>(input: &mut R) -> Result<(u64, Node)> {
    let header = Header::read(input)?;
    let root = format::read_tree(input)?;
    debug!("decoding {} symbols", header.original_len);
    Ok((header.original_len, root))
}

fn write_payload<R: Read, W: Write>(
    root: &Node,
    len: u64,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    if let Node::Leaf { symbol, .. } = *root {
        // one symbol, zero bits each
        let run = [symbol; RUN_CHUNK];
        let mut left = len;
        while left > 0 {
            let n = left.min(RUN_CHUNK as u64) as usize;
            out.write_all(&run[..n])?;
            left -= n as u64;
        }
        out.flush()?;
        return Ok(());
    }

    let mut br = BitReader::new(input);
    for _ in 0..len {
        let mut cur = root;
        while !cur.is_leaf() {
            let bit = br
                .read_bit()
                .map_err(|e| e.or_eof(Error::UnexpectedEndOfStream))?;
            cur = cur.child(bit).ok_or(Error::CorruptedFile)?;
        }
        if let Some(symbol) = cur.symbol() {
            out.write_all(&[symbol])?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Reads one encoded file from `input` and streams the decoded bytes to `out`.
///
/// The declared length never has to fit in memory. Returns the number of
/// bytes written.
pub fn decode_into<R: Read, W: Write>(input: &mut R, out: &mut W) -> Result<u64> {
    let (len, root) = read_prelude(input)?;
    write_payload(&root, len, input, out)?;
    Ok(len)
}

/// Reads one encoded file from `input` and returns the decoded bytes.
///
/// A single-symbol file declaring more bytes than can be allocated fails with
/// [`Error::TooLarge`].
pub fn decode_from<R: Read>(input: &mut R) -> Result<Vec<u8>> {
    let (len, root) = read_prelude(input)?;

    let mut out: Vec<u8> = Vec::new();
    if root.is_leaf() {
        let n = usize::try_from(len).map_err(|_| Error::TooLarge(len))?;
        out.try_reserve_exact(n).map_err(|_| Error::TooLarge(len))?;
    }

    write_payload(&root, len, input, &mut out)?;
    Ok(out)
}

/// Removes the file at `path` on drop unless `keep` was called.
struct PartialOutput {
    path: PathBuf,
    keep: bool,
}

impl PartialOutput {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            keep: false,
        }
    }

    fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("removed partial output {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Compresses the file at `from` into `to`.
///
/// An empty source fails with [`Error::EmptyInput`] before `to` is created.
/// On any later failure `to` is removed.
pub fn encode(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<EncodeSummary> {
    let (from, to) = (from.as_ref(), to.as_ref());

    let data = fs::read(from)?;
    let plan = Plan::new(&data)?;

    let guard = PartialOutput::new(to);
    let mut out = BufWriter::new(File::create(to)?);
    let summary = plan.write(&data, &mut out)?;
    out.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    guard.keep();

    debug!(
        "encoded {} -> {}: {} -> {} bytes",
        from.display(),
        to.display(),
        summary.original_len,
        summary.encoded_len
    );
    Ok(summary)
}

/// Decompresses the file at `from` into `to`, replacing anything already there.
///
/// On failure `to` is removed. Returns the number of bytes written.
pub fn decode(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<u64> {
    let (from, to) = (from.as_ref(), to.as_ref());

    let guard = PartialOutput::new(to);
    let mut input = BufReader::new(File::open(from)?);
    let mut out = BufWriter::new(File::create(to)?);
    let n = decode_into(&mut input, &mut out)?;
    out.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    guard.keep();

    debug!("decoded {} -> {}: {} bytes", from.display(), to.display(), n);
    Ok(n)
}
