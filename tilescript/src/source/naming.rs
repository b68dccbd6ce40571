//! Fallback names for scripts that do not set `name`.

use std::sync::atomic::{AtomicUsize, Ordering};

const DEFAULT_PREFIX: &str = "Script map source";

/// Hands out `"<prefix> N"` labels with a counter owned by the caller.
///
/// A registry keeps one namer and asks it for a label before loading each
/// script.
#[derive(Debug)]
pub struct SourceNamer {
    prefix: String,
    next: AtomicUsize,
}

impl SourceNamer {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicUsize::new(0),
        }
    }

    /// Returns the next unused label.
    pub fn next_name(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{} {}", self.prefix, n)
    }
}

impl Default for SourceNamer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_sequential() {
        let namer = SourceNamer::new();
        assert_eq!(namer.next_name(), "Script map source 0");
        assert_eq!(namer.next_name(), "Script map source 1");
    }

    #[test]
    fn test_namers_are_independent() {
        let a = SourceNamer::with_prefix("A");
        let b = SourceNamer::with_prefix("B");
        a.next_name();
        assert_eq!(b.next_name(), "B 0");
        assert_eq!(a.next_name(), "A 1");
    }
}
