//! S2 block format. A block is a uvarint decoded length followed by tagged
//! literal and copy elements. Snappy blocks are a subset; S2 adds repeat
//! copies, which reuse the previous copy offset.

use thiserror::Error;

const TAG_LITERAL: u8 = 0x00;
const TAG_COPY1: u8 = 0x01;
const TAG_COPY2: u8 = 0x02;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BlockError {
    #[error("invalid block length header")]
    Header,

    #[error("decoded length {len} exceeds block limit {max}")]
    TooLarge { len: u64, max: usize },

    #[error("block ends inside an element")]
    Truncated,

    #[error("element writes past the decoded length")]
    Overflow,

    #[error("copy offset {offset} out of range at position {position}")]
    Offset { offset: usize, position: usize },

    #[error("decoded {actual} bytes, header declared {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

fn read_uvarint(src: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, &b) in src.iter().enumerate().take(10) {
        value |= u64::from(b & 0x7f) << (7 * i);
        if b < 0x80 {
            return Some((value, i + 1));
        }
    }
    None
}

fn read_le(src: &[u8], at: usize, width: usize) -> Result<usize, BlockError> {
    let bytes = src.get(at..at + width).ok_or(BlockError::Truncated)?;
    Ok(bytes
        .iter()
        .rev()
        .fold(0usize, |acc, &b| (acc << 8) | usize::from(b)))
}

/// Decodes one block into `dst`, replacing its contents.
pub fn decode_block(src: &[u8], dst: &mut Vec<u8>, max_len: usize) -> Result<(), BlockError> {
    let (declared, mut s) = read_uvarint(src).ok_or(BlockError::Header)?;
    let decoded_len = usize::try_from(declared)
        .ok()
        .filter(|&len| len <= max_len)
        .ok_or(BlockError::TooLarge {
            len: declared,
            max: max_len,
        })?;

    dst.clear();
    dst.reserve(decoded_len);

    // Last copy offset; zero until the first copy.
    let mut offset = 0usize;

    while s < src.len() {
        let tag = src[s];
        let length = match tag & 0x03 {
            TAG_LITERAL => {
                let (length, width) = match tag >> 2 {
                    n @ 0..=59 => (usize::from(n) + 1, 0),
                    n => {
                        let width = usize::from(n - 59);
                        (read_le(src, s + 1, width)? + 1, width)
                    }
                };
                s += 1 + width;

                let end = s.checked_add(length).ok_or(BlockError::Truncated)?;
                let literal = src.get(s..end).ok_or(BlockError::Truncated)?;
                if length > decoded_len - dst.len() {
                    return Err(BlockError::Overflow);
                }
                dst.extend_from_slice(literal);
                s = end;
                continue;
            }
            TAG_COPY1 => {
                let low = read_le(src, s + 1, 1)?;
                let encoded = usize::from((tag >> 2) & 0x07);
                let copy_offset = (usize::from(tag & 0xe0) << 3) | low;
                s += 2;

                if copy_offset != 0 {
                    offset = copy_offset;
                    encoded + 4
                } else {
                    let length = match encoded {
                        5 => {
                            s += 1;
                            read_le(src, s - 1, 1)? + 4
                        }
                        6 => {
                            s += 2;
                            read_le(src, s - 2, 2)? + (1 << 8)
                        }
                        7 => {
                            s += 3;
                            read_le(src, s - 3, 3)? + (1 << 16)
                        }
                        n => n,
                    };
                    length + 4
                }
            }
            TAG_COPY2 => {
                offset = read_le(src, s + 1, 2)?;
                s += 3;
                usize::from(tag >> 2) + 1
            }
            _ => {
                offset = read_le(src, s + 1, 4)?;
                s += 5;
                usize::from(tag >> 2) + 1
            }
        };

        let position = dst.len();
        if offset == 0 || offset > position {
            return Err(BlockError::Offset { offset, position });
        }
        if length > decoded_len - position {
            return Err(BlockError::Overflow);
        }

        let start = position - offset;
        if offset >= length {
            dst.extend_from_within(start..start + length);
        } else {
            // Overlapping copy repeats the last `offset` bytes.
            for i in 0..length {
                let b = dst[start + i];
                dst.push(b);
            }
        }
    }

    if dst.len() != decoded_len {
        return Err(BlockError::LengthMismatch {
            expected: decoded_len,
            actual: dst.len(),
        });
    }
    Ok(())
}
