use super::{DecodeError, frame::FrameReader};
use std::io::Read;

/// Decompresses an S2 (or snappy) framed stream and returns its contents
/// as text.
///
/// The decoder is drained to EOF, so a truncated stream or a bad chunk
/// checksum surfaces as an error rather than a short result. Bytes that are
/// not valid UTF-8 are replaced with U+FFFD.
pub fn decode_stream(src: &[u8]) -> Result<String, DecodeError> {
    let mut decoder = FrameReader::new(src);
    let mut buf = Vec::new();
    decoder.read_to_end(&mut buf).map_err(DecodeError::Stream)?;

    Ok(match String::from_utf8(buf) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
