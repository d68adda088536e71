//! Session glue (component C7): `send_yapp` / `recv_yapp` drive the
//! codec (C5) and the frame engine (C6) together. Deliberately thin —
//! the original keeps this layer to little more than a loop over
//! `Encode`/`Decode` and the frame read/write calls.

use super::{
    build_subject_payload, parse_subject_payload, read_frame, Channel, Checksum, Frame,
    ReceiveState, EOT, SEND_CHUNK_LEN, SOH, STX,
};
use crate::codec;
use crate::error::Error;
use std::io::Cursor;

/// Tunables for a YAPP session.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub max_subject_len: usize,
    pub send_chunk_len: usize,
    pub receive_timeout_ms: u64,
    pub b2f: bool,
}

/// Defaults matching the legacy wire behavior: 79-byte subjects,
/// 250-byte send chunks, a 60-second read deadline, B2F enabled.
pub const STD_OPTIONS: SessionOptions = SessionOptions {
    max_subject_len: super::SUBJECT_MAX_LEN,
    send_chunk_len: SEND_CHUNK_LEN,
    receive_timeout_ms: 60_000,
    b2f: true,
};

/// Compress `src` and send it over `chan` as a subject frame followed
/// by chunked data frames and a terminating checksum frame.
pub fn send_yapp<C: Channel>(
    chan: &mut C,
    src: &[u8],
    subj: &str,
    opts: SessionOptions,
) -> Result<(), Error> {
    chan.with_binary_mode(|chan| {
        let mut compressed = Cursor::new(Vec::new());
        codec::encode(src, &mut compressed, opts.b2f)?;
        let compressed = compressed.into_inner();

        let subject_payload = build_subject_payload(subj);
        send_frame(chan, SOH, &subject_payload)?;

        let mut checksum = Checksum::new();
        for chunk in compressed.chunks(opts.send_chunk_len.max(1)) {
            checksum.add(chunk);
            send_frame(chan, STX, chunk)?;
        }

        chan.write_all(&[EOT, checksum.finish()])?;
        Ok(())
    })
}

fn send_frame<C: Channel>(chan: &mut C, kind: u8, payload: &[u8]) -> Result<(), Error> {
    debug_assert!(payload.len() <= 250);
    let len_byte = payload.len() as u8;
    chan.write_all(&[kind, len_byte])?;
    chan.write_all(payload)
}

/// Receive a framed message from `chan`, returning `(subject,
/// decompressed payload)`.
pub fn recv_yapp<C: Channel>(chan: &mut C, opts: SessionOptions) -> Result<(String, Vec<u8>), Error> {
    chan.with_binary_mode(|chan| {
        let mut state = ReceiveState::AwaitSubject;
        let mut subject = String::new();
        let mut compressed = Vec::new();
        let mut checksum = Checksum::new();

        loop {
            let frame = read_frame(chan, opts.receive_timeout_ms)?;
            state = state.advance(&frame)?;
            match frame {
                Frame::Soh(payload) => subject = parse_subject_payload(&payload),
                Frame::Stx(payload) => {
                    checksum.add(&payload);
                    compressed.extend_from_slice(&payload);
                }
                Frame::Eot(ck) => {
                    if !checksum.verify(ck) {
                        log::warn!("fbb protocol error: EOT checksum mismatch");
                    }
                }
            }
            if state == ReceiveState::Done {
                break;
            }
        }

        let decoded = codec::decode(&mut Cursor::new(compressed), opts.b2f)?;
        Ok((subject, decoded))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yapp::loopback::LoopbackChannel;

    fn roundtrip(data: &[u8], subj: &str, opts: SessionOptions) -> (String, Vec<u8>) {
        let mut sender = LoopbackChannel::from_bytes(&[]);
        send_yapp(&mut sender, data, subj, opts).unwrap();
        let sent_bytes = sender.written().to_vec();

        let mut receiver = LoopbackChannel::from_bytes(&sent_bytes);
        recv_yapp(&mut receiver, opts).unwrap()
    }

    #[test]
    fn send_then_receive_round_trips() {
        let opts = STD_OPTIONS;
        let (subject, payload) = roundtrip(b"Hello, world!\n", "test subject", opts);
        assert_eq!(subject, "test subject");
        assert_eq!(payload, b"Hello, world!\n");
    }

    #[test]
    fn send_then_receive_round_trips_without_b2f() {
        let mut opts = STD_OPTIONS;
        opts.b2f = false;
        let (_, payload) = roundtrip(&[0x41u8; 4000], "no crc", opts);
        assert_eq!(payload, vec![0x41u8; 4000]);
    }

    #[test]
    fn chunked_transport_splits_survive_reassembly() {
        let opts = STD_OPTIONS;
        let data = (0..3000u32).map(|i| (i % 256) as u8).collect::<Vec<_>>();

        let mut sender = LoopbackChannel::from_bytes(&[]);
        send_yapp(&mut sender, &data, "chunked", opts).unwrap();
        let sent_bytes = sender.written().to_vec();

        for split in [1usize, 3, 7, 64] {
            let mut receiver = LoopbackChannel::from_bytes(&sent_bytes).with_chunk_size(split);
            let (_, payload) = recv_yapp(&mut receiver, opts).unwrap();
            assert_eq!(payload, data, "split size {split}");
        }
    }

    #[test]
    fn early_disconnect_is_reported_at_every_offset() {
        let opts = STD_OPTIONS;
        let mut sender = LoopbackChannel::from_bytes(&[]);
        send_yapp(&mut sender, b"short message", "subj", opts).unwrap();
        let sent_bytes = sender.written().to_vec();

        for cut in 0..sent_bytes.len() {
            let mut receiver = LoopbackChannel::truncated(&sent_bytes, cut);
            let result = recv_yapp(&mut receiver, opts);
            assert!(matches!(result, Err(Error::EarlyDisconnect)));
        }
    }

    #[test]
    fn corrupted_eot_checksum_is_logged_not_fatal() {
        let opts = STD_OPTIONS;
        let mut sender = LoopbackChannel::from_bytes(&[]);
        send_yapp(&mut sender, b"checksum test", "subj", opts).unwrap();
        let mut sent_bytes = sender.written().to_vec();
        let last = sent_bytes.len() - 1;
        sent_bytes[last] ^= 0xFF; // corrupt the EOT checksum byte

        let mut receiver = LoopbackChannel::from_bytes(&sent_bytes);
        let result = recv_yapp(&mut receiver, opts);
        assert!(result.is_ok(), "checksum mismatch must not abort the session");
    }
}
