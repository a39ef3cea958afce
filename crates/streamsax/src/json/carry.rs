//! C2 — the carry buffer: a growable byte store the lexer uses to stitch
//! tokens that straddle chunk boundaries.

/// Owned by the [`super::lexer::Lexer`] for the lifetime of the parser.
///
/// Growth is amortised doubling — the same guarantee `Vec<u8>` already gives
/// `extend_from_slice`, so this wrapper leans on it rather than
/// reimplementing capacity doubling by hand.
#[derive(Debug, Default, Clone)]
pub struct CarryBuffer {
    data: Vec<u8>,
}

impl CarryBuffer {
    /// An empty carry buffer with no allocation yet.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Appends `bytes` to the end of the buffer.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Drops all content; capacity is retained for reuse.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Number of bytes currently held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer currently holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reads the byte at offset `off`, or `None` if out of range.
    pub fn readable_at(&self, off: usize) -> Option<u8> {
        self.data.get(off).copied()
    }

    /// The full held region.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::CarryBuffer;

    #[test]
    fn append_grows_monotonically() {
        let mut carry = CarryBuffer::new();
        carry.append(b"abc");
        carry.append(b"def");
        assert_eq!(carry.as_bytes(), b"abcdef");
        assert_eq!(carry.len(), 6);
    }

    #[test]
    fn clear_resets_content_not_capacity() {
        let mut carry = CarryBuffer::new();
        carry.append(b"0123456789");
        let cap_before = carry.data.capacity();
        carry.clear();
        assert!(carry.is_empty());
        assert_eq!(carry.data.capacity(), cap_before);
    }
}
