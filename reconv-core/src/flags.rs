//! Properties propagated bottom-up through the pattern grammar

bitflags::bitflags! {
    /// What is known about a converted subexpression.
    ///
    /// The empty set is the worst case: nothing can be assumed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flags: u8 {
        /// Provably consumes at least one input character
        const HAS_WIDTH = 0b01;
        /// A single matchable unit that a quantifier can apply to directly.
        ///
        /// Tracked for each atom but not consulted by the converter itself.
        const SIMPLE = 0b10;
    }
}

impl Flags {
    /// No assumption possible
    pub const WORST: Flags = Flags::empty();

    /// Whether the subexpression always consumes input
    pub fn has_width(self) -> bool {
        self.contains(Flags::HAS_WIDTH)
    }

    /// Whether the subexpression is a single unit
    pub fn is_simple(self) -> bool {
        self.contains(Flags::SIMPLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_is_empty() {
        assert!(!Flags::WORST.has_width());
        assert!(!Flags::WORST.is_simple());
    }

    #[test]
    fn test_width_propagation() {
        let atom = Flags::HAS_WIDTH | Flags::SIMPLE;
        assert!(atom.has_width());
        assert!(atom.is_simple());
        assert_eq!(atom & Flags::HAS_WIDTH, Flags::HAS_WIDTH);
    }
}
