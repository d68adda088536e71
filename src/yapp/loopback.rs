//! An in-memory [`Channel`] used by tests: no sockets, no real time,
//! just a byte queue with an injectable read chunk size so tests can
//! exercise arbitrary splits of a send stream and early-disconnect
//! behavior at any offset.

use super::Channel;
use crate::error::Error;
use std::collections::VecDeque;

pub struct LoopbackChannel {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
    /// Maximum bytes served per `read_timeout` call; `0` means "serve as
    /// much as the caller's buffer holds".
    chunk_size: usize,
}

impl LoopbackChannel {
    /// A channel whose reads will hand back `data` in full.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            inbound: data.iter().copied().collect(),
            outbound: Vec::new(),
            chunk_size: 0,
        }
    }

    /// Like [`Self::from_bytes`] but only the first `keep` bytes are
    /// ever available — used to simulate a peer disconnecting partway
    /// through a frame.
    pub fn truncated(data: &[u8], keep: usize) -> Self {
        Self::from_bytes(&data[..keep.min(data.len())])
    }

    /// Serve reads in chunks of at most `size` bytes, splitting frames
    /// across multiple `read_timeout` calls the way a real slow link
    /// would.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn written(&self) -> &[u8] {
        &self.outbound
    }
}

impl Channel for LoopbackChannel {
    fn read_timeout(&mut self, buf: &mut [u8], _timeout_ms: u64) -> Result<usize, Error> {
        if self.inbound.is_empty() {
            return Ok(0);
        }
        let cap = if self.chunk_size == 0 {
            buf.len()
        } else {
            buf.len().min(self.chunk_size)
        };
        let n = cap.min(self.inbound.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.inbound.pop_front().unwrap();
        }
        Ok(n)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Error> {
        self.outbound.extend_from_slice(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_timeout_returns_zero_once_drained() {
        let mut chan = LoopbackChannel::from_bytes(&[1, 2, 3]);
        let mut buf = [0u8; 8];
        let n = chan.read_timeout(&mut buf, 1000).unwrap();
        assert_eq!(n, 3);
        assert_eq!(chan.read_timeout(&mut buf, 1000).unwrap(), 0);
    }

    #[test]
    fn chunked_reads_split_across_calls() {
        let mut chan = LoopbackChannel::from_bytes(&[1, 2, 3, 4, 5]).with_chunk_size(2);
        let mut buf = [0u8; 8];
        assert_eq!(chan.read_timeout(&mut buf, 0).unwrap(), 2);
        assert_eq!(chan.read_timeout(&mut buf, 0).unwrap(), 2);
        assert_eq!(chan.read_timeout(&mut buf, 0).unwrap(), 1);
        assert_eq!(chan.read_timeout(&mut buf, 0).unwrap(), 0);
    }
}
