//! Session generation tokens.
//!
//! Every spawned backend call captures the generation current at spawn time.
//! "Start over" bumps the generation, so a result arriving for an earlier
//! generation is discarded by the reducer instead of being applied to state
//! that has already been reset.

/// A session generation token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Returns the token following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_differs() {
        let g = Generation::default();
        assert_ne!(g, g.next());
        assert_eq!(g.next(), g.next());
    }
}
