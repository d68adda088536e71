//! # lzhuf-yapp
//!
//! An LZHUF codec (LZSS dictionary matching plus adaptive Huffman
//! coding) paired with the YAPP/B2F framing used to carry a compressed
//! message over an 8-bit-clean amateur-radio mail link.
//!
//! * `codec` is a direct port of `Encode`/`Decode` from the reference
//!   `lzhuf.c`, bit-exact with existing peers: same window size,
//!   alphabet, and output-bit ordering.
//! * `yapp` frames a compressed message as SOH (subject) / STX (data) /
//!   EOT (checksum) over a transport-agnostic [`yapp::Channel`], with an
//!   optional CRC-16/XMODEM prefix over the compressed body (the B2F
//!   extension).
//!
//! ## Buffer example
//!
//! ```rs
//! use lzhuf_yapp::codec;
//! let data = b"This is the chaunt of the priests.";
//! let compressed = codec::encode_slice(data, true).expect("compression failed");
//! let expanded = codec::decode_slice(&compressed, true).expect("expansion failed");
//! assert_eq!(expanded, data);
//! ```

pub mod codec;
pub mod error;
pub mod yapp;

pub use error::Error;
pub use yapp::session::{SessionOptions, STD_OPTIONS};
