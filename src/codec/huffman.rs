//! Adaptive Huffman coding over the literal/match-length alphabet.
//!
//! A direct port of `StartHuff`/`reconst`/`update`/`EncodeChar`/
//! `DecodeChar` from the original `lzhuf.c`. The tree is stored as three
//! parallel arrays (`freq`, `prnt`, `son`) rather than node objects,
//! preserving the sibling property: frequencies are non-decreasing by
//! index and any two siblings sit at consecutive indices.

use super::bitio::{BitReader, BitWriter};
use super::constants::{MAX_FREQ, N_CHAR, R, T};
use std::io::{self, Read, Write};

pub struct AdaptiveHuffman {
    freq: Vec<usize>,
    prnt: Vec<usize>,
    son: Vec<usize>,
}

impl AdaptiveHuffman {
    /// Build the initial tree: every symbol equally likely, siblings
    /// paired off two at a time bottom-up.
    pub fn new() -> Self {
        let mut freq = vec![0usize; T + 1];
        let mut prnt = vec![0usize; T + N_CHAR];
        let mut son = vec![0usize; T];

        let mut n = 0usize;
        while n < N_CHAR {
            freq[n] = 1;
            son[n] = n + T;
            prnt[n + T] = n;
            n += 1;
        }

        let mut i = 0usize;
        n = N_CHAR;
        while n <= R {
            freq[n] = freq[i] + freq[i + 1];
            son[n] = i;
            prnt[i] = n;
            prnt[i + 1] = n;
            i += 2;
            n += 1;
        }

        freq[T] = 0xffff;
        prnt[R] = 0;

        Self { freq, prnt, son }
    }

    /// Rebuild the tree from scratch after a frequency overflow: halve
    /// every leaf frequency (rounding up) and compact the leaves to the
    /// front, then re-pair them bottom-up, inserting each new internal
    /// node back into the ascending run to keep the sibling property —
    /// the same compact-then-reinsert shuffle as the original's
    /// `memmove`-based `reconst`.
    fn reconst(&mut self) {
        let mut freq = vec![0usize; T + 1];
        let mut son = vec![0usize; T];

        let mut j = 0usize;
        for i in 0..T {
            if self.son[i] >= T {
                freq[j] = (self.freq[i] + 1) / 2;
                son[j] = self.son[i];
                j += 1;
            }
        }

        let mut i = 0usize;
        let mut node = N_CHAR;
        while node < T {
            let f = freq[i] + freq[i + 1];
            freq[node] = f;
            let mut k = node;
            while k > 0 && f < freq[k - 1] {
                k -= 1;
            }
            for idx in (k..node).rev() {
                freq[idx + 1] = freq[idx];
                son[idx + 1] = son[idx];
            }
            freq[k] = f;
            son[k] = i;

            i += 2;
            node += 1;
        }

        let mut prnt = vec![0usize; T + N_CHAR];
        for i in 0..T {
            let k = son[i];
            if k >= T {
                prnt[k] = i;
            } else {
                prnt[k] = i;
                prnt[k + 1] = i;
            }
        }

        freq[T] = 0xffff;
        prnt[R] = 0;

        self.freq = freq;
        self.son = son;
        self.prnt = prnt;
    }

    /// Increment the frequency of leaf `c` and re-sort the tree to keep
    /// the sibling property, rescaling first if any frequency would hit
    /// the cap.
    pub fn update(&mut self, c: usize) {
        if self.freq[R] == MAX_FREQ {
            self.reconst();
        }
        let mut c = self.prnt[c + T];
        loop {
            self.freq[c] += 1;
            let mut k = self.freq[c];

            // Move `c` up past any sibling with lower frequency, swapping
            // subtrees so non-decreasing order by index is preserved.
            let mut l = c + 1;
            if k > self.freq[l] {
                // `freq[T]` is the 0xffff sentinel set in `new`/`reconst`,
                // which always bounds this search without an explicit
                // index check, exactly as in the original.
                while k > self.freq[l + 1] {
                    l += 1;
                }
                self.freq[c] = self.freq[l];
                self.freq[l] = k;

                let i = self.son[c];
                self.prnt[i] = l;
                if i < T {
                    self.prnt[i + 1] = l;
                }
                let j = self.son[l];
                self.son[l] = i;

                self.prnt[j] = c;
                if j < T {
                    self.prnt[j + 1] = c;
                }
                self.son[c] = j;

                c = l;
            }
            if self.prnt[c] == 0 {
                break;
            }
            c = self.prnt[c];
        }
    }

    /// Emit the code for leaf `c`: walk from the leaf's parent up to the
    /// root, recording at each step whether the node is its parent's odd
    /// (right) child. The walk builds the code LSB-first from the
    /// leaf side, shifting right each step, so the final value has the
    /// root-level branch direction at the top bit — exactly the order
    /// `put_code` needs to send it MSB-first, matching how `decode_char`
    /// walks root-to-leaf.
    pub fn encode_char<W: Write>(
        &mut self,
        bw: &mut BitWriter,
        out: &mut W,
        c: usize,
    ) -> io::Result<()> {
        let mut code: u16 = 0;
        let mut len: u16 = 0;
        let mut k = self.prnt[c + T];
        loop {
            code >>= 1;
            if k & 1 != 0 {
                code = code.wrapping_add(0x8000);
            }
            len += 1;
            k = self.prnt[k];
            if k == R {
                break;
            }
        }
        bw.put_code(len, code, out)?;
        self.update(c);
        Ok(())
    }

    /// Walk from the root down to a leaf, consuming one bit per branch.
    pub fn decode_char<R2: Read>(&mut self, br: &mut BitReader<R2>) -> io::Result<usize> {
        let mut c = self.son[R];
        while c < T {
            c += br.get_bit()? as usize;
            c = self.son[c];
        }
        let c = c - T;
        self.update(c);
        Ok(c)
    }
}

impl Default for AdaptiveHuffman {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn fresh_tree_round_trips_all_symbols() {
        let mut enc = AdaptiveHuffman::new();
        let mut dec = AdaptiveHuffman::new();
        let mut bw = BitWriter::new();
        let mut out = Vec::new();

        let symbols: Vec<usize> = (0..N_CHAR).step_by(7).collect();
        for &s in &symbols {
            enc.encode_char(&mut bw, &mut out, s).unwrap();
        }
        bw.flush(&mut out).unwrap();

        let mut br = BitReader::new(Cursor::new(out));
        for &s in &symbols {
            assert_eq!(dec.decode_char(&mut br).unwrap(), s);
        }
    }

    #[test]
    fn repeated_symbol_shrinks_code_length() {
        let mut enc = AdaptiveHuffman::new();
        let mut out_first = Vec::new();
        let mut bw = BitWriter::new();
        enc.encode_char(&mut bw, &mut out_first, 5).unwrap();
        bw.flush(&mut out_first).unwrap();
        let first_len = out_first.len();

        for _ in 0..200 {
            let mut throwaway = Vec::new();
            let mut bw2 = BitWriter::new();
            enc.encode_char(&mut bw2, &mut throwaway, 5).unwrap();
            bw2.flush(&mut throwaway).unwrap();
        }

        let mut out_later = Vec::new();
        let mut bw3 = BitWriter::new();
        enc.encode_char(&mut bw3, &mut out_later, 5).unwrap();
        bw3.flush(&mut out_later).unwrap();
        assert!(out_later.len() <= first_len);
    }

    #[test]
    fn rescale_triggers_after_overflow_and_decoding_still_works() {
        let mut enc = AdaptiveHuffman::new();
        let mut dec = AdaptiveHuffman::new();

        // freq[R] starts at N_CHAR and gains 1 per update(); driving past
        // MAX_FREQ forces at least one reconst() rescale.
        for _ in 0..33_000 {
            enc.update(5);
            dec.update(5);
        }
        assert!(enc.freq[R] < MAX_FREQ);
        assert!(dec.freq[R] < MAX_FREQ);

        let mut bw = BitWriter::new();
        let mut out = Vec::new();
        enc.encode_char(&mut bw, &mut out, 5).unwrap();
        bw.flush(&mut out).unwrap();

        let mut br = BitReader::new(Cursor::new(out));
        assert_eq!(dec.decode_char(&mut br).unwrap(), 5);
    }
}
