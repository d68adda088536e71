//! YAPP frame engine (component C6): the SOH/STX/EOT framing used to
//! carry a compressed LZHUF message over an 8-bit-clean byte stream.
//!
//! The transport is defined against an abstract bidirectional byte
//! channel with a configurable per-read timeout; no real socket is
//! implemented here — socket option handling is an external concern
//! left to the caller's `Channel` implementation.

pub mod crc;
pub mod loopback;
pub mod session;

use crate::error::Error;

/// Subject frame: one per message, carries the header.
pub const SOH: u8 = 0x01;
/// Data frame: carries up to 250 (send) / 256 (receive) payload bytes.
pub const STX: u8 = 0x02;
/// Terminator frame: carries the one-byte running checksum.
pub const EOT: u8 = 0x04;

/// Legacy cap on subject length (`SLEN` in the original).
pub const SUBJECT_MAX_LEN: usize = 79;
/// Maximum STX payload a sender emits per frame.
pub const SEND_CHUNK_LEN: usize = 250;

const EARLY_DISCONNECT_MSG: &str = "lzhuf: unexpected disconnect";

/// A bidirectional byte channel with a configurable per-read timeout.
/// Transport-agnostic by design: the frame engine never touches an
/// actual socket.
pub trait Channel {
    /// Read at least one byte into `buf`, blocking up to `timeout_ms`.
    /// Returns the number of bytes read, or `0` on a clean remote close.
    /// A genuine timeout with no bytes available is also reported as
    /// `EarlyDisconnect` by the frame engine, matching the legacy
    /// behavior of treating "nothing arrived before the deadline" the
    /// same as an EOF.
    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u64) -> Result<usize, Error>;

    /// Write the full buffer, blocking as needed.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), Error>;

    /// Bracket `f` with the original's binary-mode save/restore dance
    /// (`sockmode(usock, SOCK_BINARY)` / restore). There is no real
    /// socket mode to toggle here; the default implementation just runs
    /// `f`, but the bracket shape is kept so a real channel can override
    /// it and still guarantee the restore runs on every exit path,
    /// including errors.
    fn with_binary_mode<F, T>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Self) -> Result<T, Error>,
        Self: Sized,
    {
        f(self)
    }
}

/// One parsed YAPP frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Soh(Vec<u8>),
    Stx(Vec<u8>),
    Eot(u8),
}

/// Read exactly one frame: type byte, length byte, then `length` (or
/// 256 if `length == 0`) payload bytes for SOH/STX, or one checksum
/// byte for EOT.
pub fn read_frame<C: Channel>(chan: &mut C, timeout_ms: u64) -> Result<Frame, Error> {
    let mut type_byte = [0u8; 1];
    read_exact_timeout(chan, &mut type_byte, timeout_ms)?;

    match type_byte[0] {
        SOH | STX => {
            let mut len_byte = [0u8; 1];
            read_exact_timeout(chan, &mut len_byte, timeout_ms)?;
            let len = if len_byte[0] == 0 { 256 } else { len_byte[0] as usize };
            let mut payload = vec![0u8; len];
            read_exact_timeout(chan, &mut payload, timeout_ms)?;
            if type_byte[0] == SOH {
                Ok(Frame::Soh(payload))
            } else {
                Ok(Frame::Stx(payload))
            }
        }
        EOT => {
            let mut ck = [0u8; 1];
            read_exact_timeout(chan, &mut ck, timeout_ms)?;
            Ok(Frame::Eot(ck[0]))
        }
        other => Err(Error::ProtocolError(format!(
            "fbb protocol error: unexpected frame type {other:#04x}"
        ))),
    }
}

fn read_exact_timeout<C: Channel>(chan: &mut C, buf: &mut [u8], timeout_ms: u64) -> Result<(), Error> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = chan.read_timeout(&mut buf[filled..], timeout_ms)?;
        if n == 0 {
            log::warn!("{EARLY_DISCONNECT_MSG}");
            return Err(Error::EarlyDisconnect);
        }
        filled += n;
    }
    Ok(())
}

/// Build the SOH subject-frame payload the reference sender emits:
/// `subj, 0x00, '0', 0x00` (the non-REVISED legacy layout). `subj` is
/// truncated to [`SUBJECT_MAX_LEN`] bytes at the last valid UTF-8
/// boundary.
pub fn build_subject_payload(subj: &str) -> Vec<u8> {
    let truncated = truncate_subject(subj);
    let mut payload = Vec::with_capacity(truncated.len() + 3);
    payload.extend_from_slice(truncated.as_bytes());
    payload.push(0);
    payload.push(b'0');
    payload.push(0);
    payload
}

fn truncate_subject(subj: &str) -> &str {
    if subj.len() <= SUBJECT_MAX_LEN {
        return subj;
    }
    let mut end = SUBJECT_MAX_LEN;
    while end > 0 && !subj.is_char_boundary(end) {
        end -= 1;
    }
    &subj[..end]
}

/// Parse a SOH payload, accepting both legacy layouts: the reference
/// `"<subj>\x000\x00"` and the older `"<subj>\x00     0\x00"` (five
/// spaces before the offset digit).
pub fn parse_subject_payload(payload: &[u8]) -> String {
    let nul = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    String::from_utf8_lossy(&payload[..nul]).into_owned()
}

/// Receive-side state machine driving `recv_yapp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveState {
    /// S0: waiting for the subject (SOH) frame.
    AwaitSubject,
    /// S1: waiting for STX data frames or the terminating EOT.
    AwaitDataOrEot,
    /// S2: message complete.
    Done,
}

impl ReceiveState {
    /// Advance the state machine on a received frame, returning an
    /// error for any frame the current state does not accept.
    pub fn advance(self, frame: &Frame) -> Result<Self, Error> {
        match (self, frame) {
            (ReceiveState::AwaitSubject, Frame::Soh(_)) => Ok(ReceiveState::AwaitDataOrEot),
            (ReceiveState::AwaitDataOrEot, Frame::Stx(_)) => Ok(ReceiveState::AwaitDataOrEot),
            (ReceiveState::AwaitDataOrEot, Frame::Eot(_)) => Ok(ReceiveState::Done),
            (state, frame) => Err(Error::ProtocolError(format!(
                "fbb protocol error: frame {frame:?} not valid in state {state:?}"
            ))),
        }
    }
}

/// Running YAPP checksum: `(-sum_of_payload_bytes) & 0xFF` over every
/// STX payload byte in the message (the SOH payload is excluded).
#[derive(Debug, Default, Clone, Copy)]
pub struct Checksum {
    sum: u32,
}

impl Checksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.sum = self.sum.wrapping_add(b as u32);
        }
    }

    /// The EOT checksum byte to send.
    pub fn finish(self) -> u8 {
        (self.sum.wrapping_neg() & 0xFF) as u8
    }

    /// Whether a received EOT checksum byte matches the accumulated sum.
    pub fn verify(self, received: u8) -> bool {
        self.finish() == received
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_matches_manual_computation() {
        let mut ck = Checksum::new();
        ck.add(&[1, 2, 3, 4]);
        let sum: u32 = 1 + 2 + 3 + 4;
        assert_eq!(ck.finish(), (sum.wrapping_neg() & 0xFF) as u8);
        assert!(ck.verify(ck.finish()));
    }

    #[test]
    fn subject_round_trips_non_revised_layout() {
        let payload = build_subject_payload("test message");
        assert_eq!(payload, b"test message\x000\x00");
        assert_eq!(parse_subject_payload(&payload), "test message");
    }

    #[test]
    fn subject_parser_accepts_legacy_five_space_layout() {
        let mut payload = b"legacy".to_vec();
        payload.extend_from_slice(b"\x00     0\x00");
        assert_eq!(parse_subject_payload(&payload), "legacy");
    }

    #[test]
    fn subject_truncated_to_79_bytes() {
        let long = "x".repeat(200);
        let payload = build_subject_payload(&long);
        // minus the trailing NUL + '0' + NUL
        assert_eq!(payload.len() - 3, SUBJECT_MAX_LEN);
    }

    #[test]
    fn state_machine_rejects_stx_before_soh() {
        let result = ReceiveState::AwaitSubject.advance(&Frame::Stx(vec![1]));
        assert!(result.is_err());
    }

    #[test]
    fn state_machine_accepts_soh_then_stx_then_eot() {
        let mut state = ReceiveState::AwaitSubject;
        state = state.advance(&Frame::Soh(vec![])).unwrap();
        state = state.advance(&Frame::Stx(vec![1, 2])).unwrap();
        state = state.advance(&Frame::Eot(0)).unwrap();
        assert_eq!(state, ReceiveState::Done);
    }
}
