//! Single-bit access on top of byte streams.
//!
//! Bits are packed least-significant first: the first bit written lands in
//! bit 0 of a byte, the eighth in bit 7.

use crate::error::{Error, Result};
use bitvec::prelude::*;
use std::io::{self, Read, Write};

/// Buffers bits and writes them to `W` a byte at a time.
#[derive(Debug)]
pub struct BitWriter<W> {
    out: W,
    cur: u8,
    used: u8,
}

impl<W: Write> BitWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, cur: 0, used: 0 }
    }

    /// Writes one bit. Anything other than 0 or 1 is rejected.
    pub fn write_bit(&mut self, bit: u8) -> Result<()> {
        if bit > 1 {
            return Err(Error::InvalidArgument(bit));
        }

        self.cur |= bit << self.used;
        self.used += 1;

        if self.used == 8 {
            self.flush_byte()?;
        }
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &BitSlice) -> Result<()> {
        for b in bits.iter().by_vals() {
            self.write_bit(b as u8)?;
        }
        Ok(())
    }

    /// Pads the pending byte with zeros, flushes it, and hands the stream back.
    ///
    /// A writer with nothing pending writes nothing.
    pub fn finish(mut self) -> Result<W> {
        if self.used > 0 {
            self.flush_byte()?;
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn flush_byte(&mut self) -> io::Result<()> {
        self.out.write_all(&[self.cur])?;
        self.cur = 0;
        self.used = 0;
        Ok(())
    }
}

/// Pulls bytes from `R` one at a time and hands them out bit by bit.
///
/// Never reads a byte before the first of its bits is requested, so the
/// stream can be handed to the next stage once `into_inner` is called.
#[derive(Debug)]
pub struct BitReader<R> {
    input: R,
    cur: u8,
    left: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(input: R) -> Self {
        Self { input, cur: 0, left: 0 }
    }

    /// Returns the next bit, 0 or 1.
    pub fn read_bit(&mut self) -> Result<u8> {
        if self.left == 0 {
            let mut byte = [0u8];
            loop {
                match self.input.read(&mut byte) {
                    Ok(0) => return Err(Error::EndOfStream),
                    Ok(_) => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            self.cur = byte[0];
            self.left = 8;
        }

        let bit = self.cur & 1;
        self.cur >>= 1;
        self.left -= 1;
        Ok(bit)
    }

    pub fn read_bits(&mut self, n: usize) -> Result<BitVec> {
        let mut bits = BitVec::with_capacity(n);
        for _ in 0..n {
            bits.push(self.read_bit()? == 1);
        }
        Ok(bits)
    }

    /// Drops the unread pad bits of the current byte and returns the stream.
    pub fn into_inner(self) -> R {
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn write_all(bits: &[u8]) -> Vec<u8> {
        let mut w = BitWriter::new(Vec::new());
        for &b in bits {
            w.write_bit(b).unwrap();
        }
        w.finish().unwrap()
    }

    #[test]
    fn lsb_first() {
        assert_eq!(write_all(&[1]), vec![0b0000_0001]);
        assert_eq!(write_all(&[0, 1]), vec![0b0000_0010]);
        assert_eq!(write_all(&[1, 0, 0, 0, 0, 0, 0, 1]), vec![0b1000_0001]);
        assert_eq!(write_all(&[0, 0, 0, 0, 0, 0, 0, 0, 1]), vec![0, 1]);
    }

    #[test]
    fn empty_writer_writes_nothing() {
        assert!(write_all(&[]).is_empty());
    }

    #[test]
    fn invalid_bit() {
        let mut w = BitWriter::new(Vec::new());
        assert!(matches!(w.write_bit(2), Err(Error::InvalidArgument(2))));
        assert!(matches!(w.write_bit(255), Err(Error::InvalidArgument(255))));
        assert!(w.finish().unwrap().is_empty());
    }

    #[test]
    fn symmetric() {
        for n in 0..40usize {
            let bits: Vec<u8> = (0..n).map(|i| ((i * 7 + i / 3) % 2) as u8).collect();
            let bytes = write_all(&bits);
            assert_eq!(bytes.len(), n.div_ceil(8));

            let mut r = BitReader::new(Cursor::new(bytes));
            let back: Vec<u8> = (0..n).map(|_| r.read_bit().unwrap()).collect();
            assert_eq!(back, bits);
        }
    }

    #[test]
    fn pad_bits_are_zero() {
        let bytes = write_all(&[1, 1, 1]);
        let mut r = BitReader::new(Cursor::new(bytes));
        let bits = r.read_bits(8).unwrap();
        assert_eq!(bits.as_bitslice(), bits![1, 1, 1, 0, 0, 0, 0, 0]);
        assert!(matches!(r.read_bit(), Err(Error::EndOfStream)));
    }

    #[test]
    fn reader_does_not_read_ahead() {
        let mut r = BitReader::new(Cursor::new(vec![0xff, 0x2a]));
        assert_eq!(r.read_bit().unwrap(), 1);
        let mut rest = r.into_inner();
        let mut buf = Vec::new();
        rest.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![0x2a]);
    }

    #[test]
    fn write_bits_slice() {
        let mut w = BitWriter::new(Vec::new());
        w.write_bits(bits![0, 1, 1]).unwrap();
        w.write_bits(bits![1, 0, 0, 0, 0, 1]).unwrap();
        assert_eq!(w.finish().unwrap(), vec![0b0000_1110, 0b0000_0001]);
    }
}
