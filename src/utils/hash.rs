//! Content hashing for change detection using blake3.

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a byte slice.
    #[inline]
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }
}

/// Remembers the last hash seen so repeated saves of identical content
/// can be skipped.
#[derive(Debug, Default)]
pub struct Freshness {
    last: Option<ContentHash>,
}

impl Freshness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `data`; returns `true` if it differs from the previous record.
    pub fn update(&mut self, data: &[u8]) -> bool {
        let hash = ContentHash::of(data);
        if self.last == Some(hash) {
            return false;
        }
        self.last = Some(hash);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stable() {
        assert_eq!(ContentHash::of(b"# Title"), ContentHash::of(b"# Title"));
        assert_ne!(ContentHash::of(b"# Title"), ContentHash::of(b"# Title!"));
    }

    #[test]
    fn test_freshness_skips_identical() {
        let mut freshness = Freshness::new();
        assert!(freshness.update(b"one"));
        assert!(!freshness.update(b"one"));
        assert!(freshness.update(b"two"));
        assert!(freshness.update(b"one"));
    }
}
