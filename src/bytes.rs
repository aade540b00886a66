//! Byte-level helpers used by the higher-level modules: stream compression,
//! hex formatting for the file `/ID`, and the checksum arithmetic the font
//! subsetter needs.

use miniz_oxide::deflate::compress_to_vec_zlib;

/// Deflate-compress `data` at the default level, wrapped in a zlib header as
/// required by the PDF `/FlateDecode` filter.
pub(crate) fn flate_compress(data: &[u8]) -> Vec<u8> {
    compress_to_vec_zlib(data, 6)
}

/// Hex-encode `bytes`, e.g. for a ToUnicode CMap's `<hhhh>` operands.
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 * bytes.len());
    for &byte in bytes {
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

/// Sum of the big-endian 32-bit words of `data`, with the final partial word
/// zero-padded on the right, wrapping on overflow.
///
/// This is the checksum algorithm `sfnt` uses both per-table and for the
/// whole file (the file-level sum additionally has `head.checksum_adjustment`
/// zeroed out before summing, then that field is set to
/// `0xB1B0AFBA - sum` so a fresh sum over the final bytes comes out to
/// `0xB1B0AFBA`).
pub(crate) fn ttf_checksum(data: &[u8]) -> u32 {
    let mut sum: u32 = 0;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        sum = sum.wrapping_add(u32::from_be_bytes(chunk.try_into().unwrap()));
    }
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut word = [0u8; 4];
        word[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_encodes_uppercase_with_leading_zeros() {
        assert_eq!(bytes_to_hex(&[0x00, 0xAB, 0xFF]), "00ABFF");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn checksum_sums_big_endian_words_with_padding() {
        assert_eq!(ttf_checksum(&[0, 0, 0, 1]), 1);
        assert_eq!(ttf_checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        // A trailing partial word is zero-padded on the right, not dropped.
        assert_eq!(ttf_checksum(&[0, 0, 0, 1, 0, 0]), 1);
    }

    #[test]
    fn flate_compress_round_trips_through_zlib_header() {
        let compressed = flate_compress(b"hello hello hello");
        // A zlib stream starts with a 2-byte header whose value is a
        // multiple of 31 (RFC 1950 `CMF`/`FLG` check).
        let header = u16::from_be_bytes([compressed[0], compressed[1]]);
        assert_eq!(header % 31, 0);
    }
}
