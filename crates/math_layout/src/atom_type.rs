//! Atom classification

use serde::{Deserialize, Serialize};

/// Mathematical class of an atom, governing inter-atom spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AtomType {
    Ordinary = 0,
    BigOperator = 1,
    BinaryOperator = 2,
    Relation = 3,
    Opening = 4,
    Closing = 5,
    Punctuation = 6,
    Inner = 7,
    Accent = 8,
    Interior = 9,
    HlineRow = 10,
    MultiRow = 11,
    MultiColumn = 12,
}

impl AtomType {
    pub const ALL: [AtomType; 13] = [
        AtomType::Ordinary,
        AtomType::BigOperator,
        AtomType::BinaryOperator,
        AtomType::Relation,
        AtomType::Opening,
        AtomType::Closing,
        AtomType::Punctuation,
        AtomType::Inner,
        AtomType::Accent,
        AtomType::Interior,
        AtomType::HlineRow,
        AtomType::MultiRow,
        AtomType::MultiColumn,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row/column of the spacing table; classes outside the eight TeX
    /// classes space like ordinary atoms.
    pub const fn spacing_index(self) -> usize {
        match self {
            AtomType::Ordinary
            | AtomType::BigOperator
            | AtomType::BinaryOperator
            | AtomType::Relation
            | AtomType::Opening
            | AtomType::Closing
            | AtomType::Punctuation
            | AtomType::Inner => self as usize,
            _ => AtomType::Ordinary as usize,
        }
    }
}

/// Membership set over `AtomType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtomTypeSet(u16);

impl AtomTypeSet {
    pub const EMPTY: AtomTypeSet = AtomTypeSet(0);

    pub const fn of(types: &[AtomType]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < types.len() {
            bits |= 1 << types[i] as u16;
            i += 1;
        }
        AtomTypeSet(bits)
    }

    pub const fn contains(self, t: AtomType) -> bool {
        self.0 & (1 << t as u16) != 0
    }

    pub const fn with(self, t: AtomType) -> Self {
        AtomTypeSet(self.0 | (1 << t as u16))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Classes that turn a following binary operator into an ordinary atom:
/// a binary operator needs a left operand.
pub const BIN_SET: AtomTypeSet = AtomTypeSet::of(&[
    AtomType::BigOperator,
    AtomType::BinaryOperator,
    AtomType::Relation,
    AtomType::Opening,
    AtomType::Punctuation,
]);

/// Classes that take part in ligature and kern scanning
pub const LIG_KERN_SET: AtomTypeSet = AtomTypeSet::of(&[
    AtomType::Ordinary,
    AtomType::BigOperator,
    AtomType::BinaryOperator,
    AtomType::Relation,
    AtomType::Opening,
    AtomType::Closing,
    AtomType::Punctuation,
]);

/// Classes after which a binary operator has no right operand
pub const BIN_FOLLOW_SET: AtomTypeSet = AtomTypeSet::of(&[
    AtomType::Relation,
    AtomType::Closing,
    AtomType::Punctuation,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_in_sixteen_bits() {
        for t in AtomType::ALL {
            assert!(t.index() < 16);
        }
    }

    #[test]
    fn test_bin_set_membership() {
        assert!(BIN_SET.contains(AtomType::Relation));
        assert!(BIN_SET.contains(AtomType::Opening));
        assert!(BIN_SET.contains(AtomType::BinaryOperator));
        assert!(!BIN_SET.contains(AtomType::Ordinary));
        assert!(!BIN_SET.contains(AtomType::Closing));
        assert_eq!(BIN_SET.len(), 5);
    }

    #[test]
    fn test_lig_kern_set_membership() {
        assert!(LIG_KERN_SET.contains(AtomType::Ordinary));
        assert!(LIG_KERN_SET.contains(AtomType::Punctuation));
        assert!(!LIG_KERN_SET.contains(AtomType::Inner));
        assert!(!LIG_KERN_SET.contains(AtomType::Accent));
    }

    #[test]
    fn test_set_builders() {
        let set = AtomTypeSet::EMPTY.with(AtomType::Inner);
        assert!(set.contains(AtomType::Inner));
        assert!(!set.is_empty());
        assert!(AtomTypeSet::default().is_empty());
    }

    #[test]
    fn test_spacing_index_collapses_extra_classes() {
        assert_eq!(AtomType::Inner.spacing_index(), 7);
        assert_eq!(AtomType::Accent.spacing_index(), 0);
        assert_eq!(AtomType::MultiColumn.spacing_index(), 0);
    }

    #[test]
    fn test_total_order() {
        assert!(AtomType::Ordinary < AtomType::Inner);
        assert!(AtomType::Relation < AtomType::Opening);
    }
}
