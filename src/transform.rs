//! Per-chunk byte transforms.
//!
//! A transform sees one chunk at a time and keeps no state between calls, so output bytes of
//! a chunk depend only on that chunk's input bytes. Transforms must preserve length and be
//! involutory (`apply(apply(b)) == b`): the engine relies on this to make "compress" and
//! "decompress" the same pipeline. None of them compress anything.

/// A stateless, length-preserving, self-inverse byte transform shared by all workers.
pub trait Transform: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Transform `buf` in place.
    fn apply_in_place(&self, buf: &mut [u8]);

    fn apply(&self, input: &[u8]) -> Vec<u8> {
        let mut out = input.to_vec();
        self.apply_in_place(&mut out);
        out
    }
}

/// Reverses byte order within the chunk. The reference transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseBytes;

impl Transform for ReverseBytes {
    fn name(&self) -> &'static str {
        "reverse"
    }

    fn apply_in_place(&self, buf: &mut [u8]) {
        buf.reverse();
    }
}

/// XORs every byte with a fixed key.
#[derive(Debug, Clone, Copy)]
pub struct XorMask {
    pub key: u8,
}

impl XorMask {
    pub fn new(key: u8) -> Self {
        XorMask { key }
    }
}

impl Transform for XorMask {
    fn name(&self) -> &'static str {
        "xor"
    }

    fn apply_in_place(&self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b ^= self.key;
        }
    }
}
