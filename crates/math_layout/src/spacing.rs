//! Inter-atom spacing

use crate::atom_type::AtomType;
use crate::env::{Env, MathStyle};
use crate::layout::LayoutBox;

/// TeX's inter-atom spacing table, rows indexed by the left atom's right type
/// and columns by the right atom's left type, both in the order
/// Ord Op Bin Rel Open Close Punct Inner.
///
/// `0` none, `1` thin unless script, `2` thin, `3` medium unless script,
/// `4` thick unless script, `*` a pair that cannot occur.
const SPACING_TABLE: [&[u8; 8]; 8] = [
    b"02340001",
    b"22*40001",
    b"33**3**3",
    b"44*04004",
    b"00*00000",
    b"02340001",
    b"11*11111",
    b"12341011",
];

/// Kind of inter-atom space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceKind {
    None,
    Thin,
    Medium,
    Thick,
}

impl SpaceKind {
    /// Glue in mu as (space, stretch, shrink)
    pub fn glue_mu(self) -> (f32, f32, f32) {
        match self {
            SpaceKind::None => (0.0, 0.0, 0.0),
            SpaceKind::Thin => (3.0, 0.0, 0.0),
            SpaceKind::Medium => (4.0, 2.0, 4.0),
            SpaceKind::Thick => (5.0, 5.0, 0.0),
        }
    }
}

/// Space between two adjacent atoms in the given style
pub fn space_between(left: AtomType, right: AtomType, style: MathStyle) -> SpaceKind {
    let entry = SPACING_TABLE[left.spacing_index()][right.spacing_index()];
    let conditional = |kind| if style.is_script() { SpaceKind::None } else { kind };
    match entry {
        b'1' => conditional(SpaceKind::Thin),
        b'2' => SpaceKind::Thin,
        b'3' => conditional(SpaceKind::Medium),
        b'4' => conditional(SpaceKind::Thick),
        // '0' and the impossible pairs
        _ => SpaceKind::None,
    }
}

/// Glue box for a pair, or `None` when the pair gets no space
pub fn glue_box(left: AtomType, right: AtomType, env: &Env) -> Option<LayoutBox> {
    let kind = space_between(left, right, env.style());
    if kind == SpaceKind::None {
        return None;
    }
    let (space, stretch, shrink) = kind.glue_mu();
    Some(LayoutBox::glue(
        env.mu_to_pt(space),
        env.mu_to_pt(stretch),
        env.mu_to_pt(shrink),
    ))
}
