//! LZSS sliding window and match-search trees.
//!
//! A near-direct port of `InitTree`/`InsertNode`/`DeleteNode` from the
//! original `lzhuf.c`. The arena model (parallel `dad`/`lson`/`rson`
//! index vectors rather than heap-allocated nodes) is kept deliberately:
//! match positions are index arithmetic mod `N`, and the tie-break on
//! equal match length depends on comparing those indices directly, which
//! the arena makes natural.

use super::constants::{F, NIL, N};

/// Sliding dictionary plus the `N + 257` binary-search-tree roots/nodes
/// used to find matches. Position `N + 1 + b` is the root for first-byte
/// `b`; positions `[0, N)` double as dictionary offsets and tree nodes.
pub struct Window {
    /// `N + F - 1` bytes: the sliding window, with the first `F - 1`
    /// bytes mirrored past index `N` so match comparisons never wrap.
    pub text_buf: Vec<u8>,
    pub match_position: i32,
    pub match_length: usize,
    lson: Vec<usize>,
    rson: Vec<usize>,
    dad: Vec<usize>,
}

impl Window {
    pub fn new() -> Self {
        Self {
            text_buf: vec![b' '; N + F - 1],
            match_position: 0,
            match_length: 0,
            lson: vec![0; N + 1],
            rson: vec![0; N + 257],
            dad: vec![0; N + 1],
        }
    }

    /// Reset the tree to empty: every root and node points at `NIL`.
    pub fn init_tree(&mut self) {
        for i in N + 1..=N + 256 {
            self.rson[i] = NIL;
        }
        for i in 0..N {
            self.dad[i] = NIL;
        }
    }

    /// Find the best match for the look-ahead string starting at `r`,
    /// recording it in `match_position`/`match_length`, and insert `r`
    /// into the tree (possibly swapping it in for a maximal match).
    pub fn insert_node(&mut self, r: usize) {
        let mut cmp: i16 = 1;
        let key_start = r;
        let mut p = N + 1 + self.text_buf[key_start] as usize;
        self.rson[r] = NIL;
        self.lson[r] = NIL;
        self.match_length = 0;
        loop {
            if cmp >= 0 {
                if self.rson[p] != NIL {
                    p = self.rson[p];
                } else {
                    self.rson[p] = r;
                    self.dad[r] = p;
                    return;
                }
            } else if self.lson[p] != NIL {
                p = self.lson[p];
            } else {
                self.lson[p] = r;
                self.dad[r] = p;
                return;
            }
            let mut i: usize = 1;
            while i < F {
                cmp = self.text_buf[key_start + i] as i16 - self.text_buf[p + i] as i16;
                if cmp != 0 {
                    break;
                }
                i += 1;
            }
            if i > super::constants::THRESHOLD {
                if i > self.match_length {
                    self.match_position = ((r as i32 - p as i32) & (N as i32 - 1)) - 1;
                    self.match_length = i;
                    if self.match_length >= F {
                        break;
                    }
                }
                if i == self.match_length {
                    let c = ((r as i32 - p as i32) & (N as i32 - 1)) - 1;
                    if c < self.match_position {
                        self.match_position = c;
                    }
                }
            }
        }
        // `r` reached a maximal match (length == F): swap it in for `p`.
        self.dad[r] = self.dad[p];
        self.lson[r] = self.lson[p];
        self.rson[r] = self.rson[p];
        self.dad[self.lson[p]] = r;
        self.dad[self.rson[p]] = r;
        if self.rson[self.dad[p]] == p {
            self.rson[self.dad[p]] = r;
        } else {
            self.lson[self.dad[p]] = r;
        }
        self.dad[p] = NIL;
    }

    pub fn delete_node(&mut self, p: usize) {
        let mut q;
        if self.dad[p] == NIL {
            return; // not registered
        }
        if self.rson[p] == NIL {
            q = self.lson[p];
        } else if self.lson[p] == NIL {
            q = self.rson[p];
        } else {
            q = self.lson[p];
            if self.rson[q] != NIL {
                loop {
                    q = self.rson[q];
                    if self.rson[q] == NIL {
                        break;
                    }
                }
                self.rson[self.dad[q]] = self.lson[q];
                self.dad[self.lson[q]] = self.dad[q];
                self.lson[q] = self.lson[p];
                self.dad[self.lson[p]] = q;
            }
            self.rson[q] = self.rson[p];
            self.dad[self.rson[p]] = q;
        }
        self.dad[q] = self.dad[p];
        if self.rson[self.dad[p]] == p {
            self.rson[self.dad[p]] = q;
        } else {
            self.lson[self.dad[p]] = q;
        }
        self.dad[p] = NIL;
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}
