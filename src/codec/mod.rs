//! LZHUF codec: sliding-window LZSS matching combined with adaptive
//! Huffman coding of literals/match-lengths and static Huffman coding
//! of match positions.
//!
//! `encode`/`decode` (component C5) are a direct port of `Encode`/
//! `Decode` in the original `lzhuf.c`, orchestrating the bit packer
//! (`bitio`), the match-search window (`window`), the adaptive tree
//! (`huffman`) and the position tables (`position`).

pub mod bitio;
pub mod constants;
pub mod huffman;
pub mod position;
pub mod window;

use self::bitio::{BitReader, BitWriter};
use self::constants::{F, N, THRESHOLD};
use self::huffman::AdaptiveHuffman;
use self::position::{decode_position, encode_position};
use self::window::Window;
use crate::error::Error;
use crate::yapp::crc;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// The original length field is a 4-byte signed integer.
pub const MAX_FILE_SIZE: usize = i32::MAX as usize;

/// Compress `input`, writing the framed LZHUF stream to `dst`. `dst`
/// must support `Read` as well as `Write`/`Seek` so the optional B2F
/// CRC prefix can be computed by reading the payload back after it has
/// been written — a `tempfile` or an in-memory `Cursor<Vec<u8>>` both
/// qualify.
pub fn encode<W: Write + Read + Seek>(input: &[u8], dst: &mut W, b2f: bool) -> Result<(), Error> {
    let filesize = input.len();
    if filesize == 0 {
        return Err(Error::EmptyInput);
    }
    if filesize > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge);
    }

    if b2f {
        dst.write_all(&[0u8; 2])?;
    }
    dst.write_all(&(filesize as u32).to_le_bytes())?;

    let mut huff = AdaptiveHuffman::new();
    let mut window = Window::new();
    window.init_tree();

    let mut s = 0usize;
    let mut r = N - F;
    for i in 0..r {
        window.text_buf[i] = b' ';
    }

    let mut pos = 0usize;
    let mut len = 0usize;
    while len < F && pos < input.len() {
        window.text_buf[r + len] = input[pos];
        pos += 1;
        len += 1;
    }

    for i in 1..=F {
        window.insert_node(r - i);
    }
    window.insert_node(r);

    let mut bw = BitWriter::new();
    loop {
        if window.match_length > len {
            window.match_length = len;
        }
        if window.match_length <= THRESHOLD {
            window.match_length = 1;
            huff.encode_char(&mut bw, dst, window.text_buf[r] as usize)?;
        } else {
            huff.encode_char(&mut bw, dst, 255 - THRESHOLD + window.match_length)?;
            encode_position(&mut bw, dst, window.match_position as usize)?;
        }

        let last_match_length = window.match_length;
        let mut i = 0usize;
        while i < last_match_length && pos < input.len() {
            let c = input[pos];
            pos += 1;
            window.delete_node(s);
            window.text_buf[s] = c;
            if s < F - 1 {
                window.text_buf[s + N] = c;
            }
            s = (s + 1) & (N - 1);
            r = (r + 1) & (N - 1);
            window.insert_node(r);
            i += 1;
        }
        while i < last_match_length {
            window.delete_node(s);
            s = (s + 1) & (N - 1);
            r = (r + 1) & (N - 1);
            len -= 1;
            if len > 0 {
                window.insert_node(r);
            }
            i += 1;
        }

        if len == 0 {
            break;
        }
    }
    bw.flush(dst)?;

    let compressed_size = dst.stream_position()? as usize;

    if b2f {
        dst.seek(SeekFrom::Start(2))?;
        let mut crc_val = 0u16;
        let mut buf = [0u8; 4096];
        loop {
            let n = dst.read(&mut buf)?;
            if n == 0 {
                break;
            }
            for &b in &buf[..n] {
                crc_val = crc::update(crc_val, b);
            }
        }
        crc_val = crc::finalize_b2f(crc_val);
        dst.seek(SeekFrom::Start(0))?;
        dst.write_all(&crc_val.to_le_bytes())?;
        dst.seek(SeekFrom::Start(compressed_size as u64))?;
    }

    log::debug!(
        "lzhuf compress {}/{} = {}%",
        compressed_size,
        filesize,
        if filesize > 0 {
            (filesize as i64 - compressed_size as i64) * 100 / filesize as i64
        } else {
            0
        }
    );

    Ok(())
}

/// Decompress an LZHUF stream produced by [`encode`].
pub fn decode<R: Read>(src: &mut R, b2f: bool) -> Result<Vec<u8>, Error> {
    if b2f {
        let mut crc_buf = [0u8; 2];
        src.read_exact(&mut crc_buf)?;
    }
    let mut len_buf = [0u8; 4];
    src.read_exact(&mut len_buf)?;
    let mut filesize = u32::from_le_bytes(len_buf) as usize;
    if filesize == 0 {
        return Err(Error::EmptyInput);
    }
    if b2f {
        filesize -= 2;
    }

    let mut huff = AdaptiveHuffman::new();
    let mut text_buf = vec![b' '; N + F - 1];
    let mut r = N - F;
    let mut br = BitReader::new(src);
    let mut out = Vec::with_capacity(filesize);

    let mut count = 0usize;
    while count < filesize {
        let c = huff.decode_char(&mut br)?;
        if c < 256 {
            out.push(c as u8);
            text_buf[r] = c as u8;
            r = (r + 1) & (N - 1);
            count += 1;
        } else {
            let p = decode_position(&mut br)?;
            let i = (r + N - p - 1) & (N - 1);
            let j = c - 255 + THRESHOLD;
            for k in 0..j {
                let byte = text_buf[(i + k) & (N - 1)];
                out.push(byte);
                text_buf[r] = byte;
                r = (r + 1) & (N - 1);
                count += 1;
            }
        }
    }

    log::debug!("lzhuf uncompress produced {count} bytes");
    Ok(out)
}

/// Convenience wrapper: compress a byte slice into a fresh in-memory
/// buffer.
pub fn encode_slice(input: &[u8], b2f: bool) -> Result<Vec<u8>, Error> {
    let mut cursor = Cursor::new(Vec::new());
    encode(input, &mut cursor, b2f)?;
    Ok(cursor.into_inner())
}

/// Convenience wrapper: decompress a byte slice produced by
/// [`encode_slice`].
pub fn decode_slice(input: &[u8], b2f: bool) -> Result<Vec<u8>, Error> {
    let mut cursor = Cursor::new(input);
    decode(&mut cursor, b2f)
}
