//! Typed errors for the codec and transport layers.
//!
//! Nothing here is propagated as a panic or bare exception; every fallible
//! entry point in `codec` and `yapp` returns `Result<_, Error>`.

/// Errors produced by the codec or the YAPP/B2F transport.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is empty")]
    EmptyInput,

    #[error("file too large")]
    FileTooLarge,

    #[error("lzhuf: unexpected disconnect")]
    EarlyDisconnect,

    #[error("fbb protocol error: {0}")]
    ProtocolError(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,
}
