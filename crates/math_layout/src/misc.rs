//! Decorating composites: rotation and cancellation

use crate::atom::{Atom, AtomRef};
use crate::atom_type::AtomType;
use crate::env::{Env, Length};
use crate::layout::{CancelStroke, LayoutBox, RotationOrigin};
use crate::row::RowAtom;
use std::sync::Arc;
use tracing::warn;

/// Rotation pivot: a named point of the box, or an offset from its
/// baseline-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pivot {
    Origin(RotationOrigin),
    Offset { x: Length, y: Length },
}

impl Default for Pivot {
    fn default() -> Self {
        Pivot::Origin(RotationOrigin::BottomLeft)
    }
}

impl Pivot {
    /// Parse `origin=cc` or `x=1em,y=2pt`. Unknown keys and malformed values
    /// are skipped.
    pub fn parse(options: &str) -> Self {
        let mut x = Length::zero();
        let mut y = Length::zero();
        let mut offset = false;
        for option in options.split(',') {
            let Some((key, value)) = option.split_once('=') else {
                continue;
            };
            match key.trim() {
                "origin" => match RotationOrigin::parse(value) {
                    Some(origin) => return Pivot::Origin(origin),
                    None => warn!(origin = value, "unknown rotation origin"),
                },
                "x" => {
                    if let Some(length) = Length::parse(value) {
                        x = length;
                        offset = true;
                    }
                }
                "y" => {
                    if let Some(length) = Length::parse(value) {
                        y = length;
                        offset = true;
                    }
                }
                _ => {}
            }
        }
        if offset {
            Pivot::Offset { x, y }
        } else {
            Pivot::default()
        }
    }
}

/// A base rotated about a pivot
#[derive(Debug, Clone)]
pub struct RotateAtom {
    base: AtomRef,
    angle: f32,
    pivot: Pivot,
}

impl RotateAtom {
    /// Rotate `angle` degrees counterclockwise about the bottom-left corner
    pub fn new(base: AtomRef, angle: f32) -> Self {
        Self::with_pivot(base, angle, Pivot::default())
    }

    pub fn with_pivot(base: AtomRef, angle: f32, pivot: Pivot) -> Self {
        Self { base, angle, pivot }
    }

    pub fn with_origin(base: AtomRef, angle: f32, origin: RotationOrigin) -> Self {
        Self::with_pivot(base, angle, Pivot::Origin(origin))
    }

    /// Rotation configured from an option list such as `origin=cc`
    pub fn with_options(base: AtomRef, angle: f32, options: &str) -> Self {
        Self::with_pivot(base, angle, Pivot::parse(options))
    }

    /// Rotate a row of atoms
    pub fn of_row(row: RowAtom, angle: f32, pivot: Pivot) -> Self {
        Self::with_pivot(Arc::new(row), angle, pivot)
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn pivot(&self) -> Pivot {
        self.pivot
    }
}

impl Atom for RotateAtom {
    fn atom_type(&self) -> AtomType {
        self.base.atom_type()
    }

    fn left_type(&self) -> AtomType {
        self.base.left_type()
    }

    fn right_type(&self) -> AtomType {
        self.base.right_type()
    }

    fn create_box(&self, env: &Env) -> LayoutBox {
        let base = self.base.create_box(env);
        let pivot = match self.pivot {
            Pivot::Origin(origin) => origin.point(base.width, base.height, base.depth),
            Pivot::Offset { x, y } => (env.to_pt(x), env.to_pt(y)),
        };
        LayoutBox::rotated(base, self.angle, pivot)
    }
}

/// A base struck through
#[derive(Debug, Clone)]
pub struct CancelAtom {
    base: AtomRef,
    stroke: CancelStroke,
}

impl CancelAtom {
    pub fn new(base: AtomRef, stroke: CancelStroke) -> Self {
        Self { base, stroke }
    }

    /// `\cancel`
    pub fn slash(base: AtomRef) -> Self {
        Self::new(base, CancelStroke::Slash)
    }

    /// `\bcancel`
    pub fn back_slash(base: AtomRef) -> Self {
        Self::new(base, CancelStroke::BackSlash)
    }

    /// `\xcancel`
    pub fn cross(base: AtomRef) -> Self {
        Self::new(base, CancelStroke::Cross)
    }

    pub fn stroke(&self) -> CancelStroke {
        self.stroke
    }
}

impl Atom for CancelAtom {
    fn atom_type(&self) -> AtomType {
        AtomType::Ordinary
    }

    fn create_box(&self, env: &Env) -> LayoutBox {
        LayoutBox::cancelled(self.base.create_box(env), self.stroke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{CharAtom, SymbolAtom};
    use crate::config::LayoutConfig;
    use crate::env::Unit;
    use crate::layout::LayoutContent;

    fn env() -> Env {
        Env::new(LayoutConfig::for_size(10.0))
    }

    fn xy() -> RowAtom {
        [CharAtom::math('x'), CharAtom::math('y')]
            .into_iter()
            .map(|c| Arc::new(c) as AtomRef)
            .collect()
    }

    #[test]
    fn test_pivot_parse() {
        assert_eq!(Pivot::parse("origin=cc"), Pivot::Origin(RotationOrigin::Center));
        assert_eq!(
            Pivot::parse("x=1em, y=2pt"),
            Pivot::Offset {
                x: Length::new(1.0, Unit::Em),
                y: Length::new(2.0, Unit::Pt),
            }
        );
        assert_eq!(Pivot::parse(""), Pivot::default());
        assert_eq!(Pivot::parse("origin=zz"), Pivot::default());
    }

    #[test]
    fn test_rotation_keeps_base_class() {
        let rel = RotateAtom::new(SymbolAtom::get_ref("equals").unwrap(), 45.0);
        assert_eq!(rel.left_type(), AtomType::Relation);
        assert_eq!(rel.right_type(), AtomType::Relation);
    }

    #[test]
    fn test_half_turn_about_center() {
        let env = env();
        let plain = xy().create_box(&env);
        let turned = RotateAtom::of_row(xy(), 180.0, Pivot::Origin(RotationOrigin::Center))
            .create_box(&env);
        assert!((turned.width - plain.width).abs() < 1e-3);
        assert!((turned.total_height() - plain.total_height()).abs() < 1e-3);
        assert!(matches!(turned.content, LayoutContent::Rotated { angle, .. } if angle == 180.0));
    }

    #[test]
    fn test_offset_pivot_in_points() {
        let atom = RotateAtom::with_options(Arc::new(xy()), 90.0, "x=1em,y=0pt");
        match atom.create_box(&env()).content {
            LayoutContent::Rotated { pivot, .. } => assert_eq!(pivot, (10.0, 0.0)),
            other => panic!("expected rotation, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_wraps_base() {
        let env = env();
        let base = xy().create_box(&env);
        let cancelled = CancelAtom::cross(Arc::new(xy())).create_box(&env);
        assert_eq!(cancelled.width, base.width);
        assert_eq!(cancelled.children.len(), 1);
        assert_eq!(cancelled.text_content(), "xy");
        assert!(matches!(
            cancelled.content,
            LayoutContent::Cancel {
                stroke: CancelStroke::Cross
            }
        ));
    }
}
