//! LZSS + adaptive Huffman coding constants.
//!
//! These values are part of the wire format and must not be changed
//! without breaking interop with existing peers. A direct descendant of
//! the constants in the original `lzhuf.h` (`N`, `F`, `THRESHOLD`, `NIL`,
//! `N_CHAR`, `T`, `R`, `MAX_FREQ`), ported with the window size pinned to
//! `2048` rather than the `4096` some later LZHUF variants used.

/// Sliding window size (power of two).
pub const N: usize = 2048;
/// Maximum match length / look-ahead size.
pub const F: usize = 60;
/// Minimum match length worth emitting as a back-reference.
pub const THRESHOLD: usize = 2;
/// Sentinel meaning "no child" in the match-search trees.
pub const NIL: usize = N;

/// Literal + match-length alphabet size.
pub const N_CHAR: usize = 256 - THRESHOLD + F;
/// Total nodes in the adaptive Huffman tree.
pub const T: usize = N_CHAR * 2 - 1;
/// Root index of the adaptive Huffman tree.
pub const R: usize = T - 1;
/// Frequency cap that triggers a rescale of the Huffman tree.
pub const MAX_FREQ: usize = 0x8000;
