//! Document identifier generation.
//!
//! IDs must be valid `xs:ID` values, so they start with a letter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of every generated identifier.
pub const ID_PREFIX: &str = "ID_";

/// Produces fresh identifiers for responses and assertions.
pub trait IdGenerator: Send + Sync + std::fmt::Debug {
    /// Returns a new identifier.
    fn next_id(&self) -> String;
}

/// `ID_` followed by a random v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        format!("{ID_PREFIX}{}", uuid::Uuid::new_v4())
    }
}

/// Deterministic identifiers `<prefix>1`, `<prefix>2`, ...
#[derive(Debug)]
pub struct SequenceIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequenceIdGenerator {
    /// Creates a generator whose IDs start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SequenceIdGenerator {
    fn default() -> Self {
        Self::new(ID_PREFIX)
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_prefixed_and_unique() {
        let ids = UuidIdGenerator;
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(a.starts_with("ID_"));
        assert_eq!(a.len(), ID_PREFIX.len() + 36);
        assert_ne!(a, b);
    }

    #[test]
    fn sequence_ids_count_up() {
        let ids = SequenceIdGenerator::new("ID_test_");
        assert_eq!(ids.next_id(), "ID_test_1");
        assert_eq!(ids.next_id(), "ID_test_2");
    }
}
