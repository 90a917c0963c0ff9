use super::block::{BlockError, decode_block};
use std::io::{self, Read};
use thiserror::Error;

const CHUNK_COMPRESSED: u8 = 0x00;
const CHUNK_UNCOMPRESSED: u8 = 0x01;
const CHUNK_STREAM_IDENTIFIER: u8 = 0xff;

const S2_MAGIC: &[u8] = b"S2sTwO";
const SNAPPY_MAGIC: &[u8] = b"sNaPpY";

const CHECKSUM_LEN: usize = 4;
const MAX_S2_BLOCK: usize = 4 << 20;
const MAX_SNAPPY_BLOCK: usize = 64 << 10;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("stream does not start with a stream identifier")]
    MissingStreamIdentifier,

    #[error("unknown stream identifier {0:?}")]
    UnknownMagic(Vec<u8>),

    #[error("unsupported chunk type 0x{0:02x}")]
    UnsupportedChunkType(u8),

    #[error("chunk length {len} out of range for chunk type 0x{chunk_type:02x}")]
    ChunkLength { chunk_type: u8, len: usize },

    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Checksum { expected: u32, actual: u32 },

    #[error("corrupt block: {0}")]
    Block(#[from] BlockError),
}

impl From<FrameError> for io::Error {
    fn from(e: FrameError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

/// CRC-32C of `data`, masked the way the framing format stores it.
pub fn masked_checksum(data: &[u8]) -> u32 {
    let crc = crc32c::crc32c(data);
    crc.rotate_right(15).wrapping_add(0xa282_ead8)
}

/// Fills `buf` completely. Returns `false` on a clean EOF before the first
/// byte; EOF part-way through is an error.
fn read_exact_or_eof<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Streaming reader for S2 framed streams. Streams that carry the snappy
/// identifier are accepted too, with snappy's 64 KiB block limit.
pub struct FrameReader<R> {
    inner: R,
    max_block: Option<usize>,
    chunk: Vec<u8>,
    decoded: Vec<u8>,
    pos: usize,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            max_block: None,
            chunk: Vec::new(),
            decoded: Vec::new(),
            pos: 0,
        }
    }

    /// Reads chunks until one yields data. Returns `false` at end of stream.
    fn fill(&mut self) -> io::Result<bool> {
        loop {
            let mut header = [0u8; 4];
            if !read_exact_or_eof(&mut self.inner, &mut header)? {
                return Ok(false);
            }
            let chunk_type = header[0];
            let len = usize::from(header[1])
                | usize::from(header[2]) << 8
                | usize::from(header[3]) << 16;

            let max_block = match (chunk_type, self.max_block) {
                (CHUNK_STREAM_IDENTIFIER, _) => 0,
                (_, Some(max_block)) => max_block,
                (_, None) => return Err(FrameError::MissingStreamIdentifier.into()),
            };

            match chunk_type {
                CHUNK_STREAM_IDENTIFIER => {
                    if len != S2_MAGIC.len() {
                        return Err(FrameError::ChunkLength { chunk_type, len }.into());
                    }
                    self.read_chunk(len)?;
                    self.max_block = Some(match self.chunk.as_slice() {
                        S2_MAGIC => MAX_S2_BLOCK,
                        SNAPPY_MAGIC => MAX_SNAPPY_BLOCK,
                        other => return Err(FrameError::UnknownMagic(other.to_vec()).into()),
                    });
                }
                CHUNK_COMPRESSED => {
                    // Worst-case encoded size of a block, plus its checksum.
                    let max_len = CHECKSUM_LEN + 32 + max_block + max_block / 6;
                    if len <= CHECKSUM_LEN || len > max_len {
                        return Err(FrameError::ChunkLength { chunk_type, len }.into());
                    }
                    self.read_chunk(len)?;
                    let (checksum, block) = self.chunk.split_at(CHECKSUM_LEN);
                    decode_block(block, &mut self.decoded, max_block).map_err(FrameError::from)?;
                    verify(checksum, &self.decoded)?;
                    self.pos = 0;
                    return Ok(true);
                }
                CHUNK_UNCOMPRESSED => {
                    if len < CHECKSUM_LEN || len - CHECKSUM_LEN > max_block {
                        return Err(FrameError::ChunkLength { chunk_type, len }.into());
                    }
                    self.read_chunk(len)?;
                    let (checksum, data) = self.chunk.split_at(CHECKSUM_LEN);
                    verify(checksum, data)?;
                    self.decoded.clear();
                    self.decoded.extend_from_slice(data);
                    self.pos = 0;
                    return Ok(true);
                }
                0x02..=0x7f => return Err(FrameError::UnsupportedChunkType(chunk_type).into()),
                // Skippable chunks, padding, and S2 seek indexes.
                _ => self.skip(len)?,
            }
        }
    }

    fn read_chunk(&mut self, len: usize) -> io::Result<()> {
        self.chunk.resize(len, 0);
        self.inner.read_exact(&mut self.chunk)
    }

    fn skip(&mut self, len: usize) -> io::Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(len as u64), &mut io::sink())?;
        if skipped < len as u64 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(())
    }
}

fn verify(stored: &[u8], data: &[u8]) -> Result<(), FrameError> {
    let expected = u32::from_le_bytes([stored[0], stored[1], stored[2], stored[3]]);
    let actual = masked_checksum(data);
    if expected != actual {
        return Err(FrameError::Checksum { expected, actual });
    }
    Ok(())
}

impl<R: Read> Read for FrameReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos >= self.decoded.len() {
            if !self.fill()? {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.decoded.len() - self.pos);
        buf[..n].copy_from_slice(&self.decoded[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
