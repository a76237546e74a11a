//! Row composition
//!
//! A `RowAtom` lays its children out on one baseline. Each build walks the
//! children left to right and decides, pair by pair:
//!
//! - whether a binary operator has operands, and is otherwise set as ordinary
//! - whether adjacent characters fold into a ligature or receive a font kern
//! - how much inter-atom glue the TeX spacing table puts between them
//!
//! All of those decisions are recorded on stack-local `AtomDecor`s, so the
//! same row can be built any number of times, under any context, from any
//! thread.

use crate::atom::{Atom, AtomRef, Row};
use crate::atom_type::{AtomType, BIN_FOLLOW_SET, BIN_SET, LIG_KERN_SET};
use crate::atoms::{FixedCharAtom, TextAtom};
use crate::decor::AtomDecor;
use crate::env::Env;
use crate::layout::LayoutBox;
use crate::spacing::glue_box;
use math_font::Script;
use std::sync::Arc;
use tracing::{debug, trace};

/// A horizontal list of atoms separated by glue
#[derive(Debug, Clone)]
pub struct RowAtom {
    elements: Vec<AtomRef>,
    breakable: bool,
    look_at_last_atom: bool,
    previous: Option<AtomDecor>,
}

impl Default for RowAtom {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<AtomRef> for RowAtom {
    fn from_iter<I: IntoIterator<Item = AtomRef>>(iter: I) -> Self {
        let mut row = RowAtom::new();
        for atom in iter {
            row.add(atom);
        }
        row
    }
}

impl RowAtom {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            breakable: true,
            look_at_last_atom: false,
            previous: None,
        }
    }

    /// Row holding a single child
    pub fn from_atom(atom: AtomRef) -> Self {
        let mut row = Self::new();
        row.add(atom);
        row
    }

    pub fn add(&mut self, atom: AtomRef) {
        self.elements.push(atom);
    }

    pub fn first_atom(&self) -> Option<AtomRef> {
        self.elements.first().cloned()
    }

    /// Remove and return the last child
    pub fn pop_back(&mut self) -> Option<AtomRef> {
        self.elements.pop()
    }

    pub fn get(&self, pos: usize) -> Option<AtomRef> {
        self.elements.get(pos).cloned()
    }

    pub fn elements(&self) -> &[AtomRef] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Allow line breaks at the glue points of this row
    pub fn set_breakable(&mut self, breakable: bool) {
        self.breakable = breakable;
    }

    pub fn is_breakable(&self) -> bool {
        self.breakable
    }

    /// Leave the trailing edge open: a binary operator at the end keeps its
    /// class, expecting a continuation.
    pub fn set_look_at_last_atom(&mut self, look: bool) {
        self.look_at_last_atom = look;
    }

    pub fn looks_at_last_atom(&self) -> bool {
        self.look_at_last_atom
    }

    /// Context of whatever precedes this row. Unlike a context handed over
    /// through `create_box_after`, it is not consumed by a build: it applies
    /// to every later build until replaced or cleared with `None`.
    pub fn set_previous_atom(&mut self, previous: Option<AtomDecor>) {
        self.previous = previous.map(|d| d.detached());
    }

    pub fn previous_atom(&self) -> Option<&AtomDecor> {
        self.previous.as_ref()
    }

    /// Index of the first element after `index` that takes part in layout
    fn next_index(&self, index: usize) -> Option<usize> {
        (index + 1..self.elements.len()).find(|&j| !self.elements[j].is_break_mark())
    }

    /// Set a binary operator without operands as ordinary
    fn change_to_ord(&self, cur: &mut AtomDecor, prev: Option<&AtomDecor>, index: usize) {
        if cur.left_type() == AtomType::BinaryOperator
            && prev.map_or(true, |p| BIN_SET.contains(p.right_type()))
        {
            cur.set_type(AtomType::Ordinary);
        } else if cur.right_type() == AtomType::BinaryOperator {
            let no_right_operand = match self.next_index(index) {
                Some(j) => BIN_FOLLOW_SET.contains(self.elements[j].left_type()),
                None => !self.look_at_last_atom,
            };
            if no_right_operand {
                cur.set_type(AtomType::Ordinary);
            }
        }
    }

    /// Collect the characters from `start` on that the font cannot set.
    /// Returns the literal text and the index of the last one taken.
    fn collect_unresolvable(&self, start: usize, math_mode: bool, env: &Env) -> (String, usize) {
        let mut text = String::new();
        let mut last = start;
        for (j, atom) in self.elements.iter().enumerate().skip(start) {
            let Some(symbol) = atom.as_char_symbol() else {
                break;
            };
            if symbol.is_math_mode() != math_mode || symbol.char_font(env).is_some() {
                break;
            }
            text.push(symbol.code_point());
            last = j;
        }
        (text, last)
    }

    /// Extend a character run from `cur`, folding ligatures. Returns the
    /// index of the last element consumed and the kern to the next element
    /// when the run ends in a kern pair.
    fn scan_run(
        &self,
        cur: &mut AtomDecor,
        start: usize,
        start_char: char,
        env: &Env,
    ) -> (usize, Option<f32>) {
        let script = Script::of(start_char);
        let mut i = start;
        while i + 1 < self.elements.len() {
            let next = &self.elements[i + 1];
            let Some(symbol) = next.as_char_symbol() else {
                break;
            };
            if symbol.is_math_mode() != cur.is_math_mode()
                || Script::of(symbol.code_point()) != script
            {
                break;
            }
            let (Some(glyph), Some(next_glyph)) = (cur.resolve_char(env), symbol.char_font(env))
            else {
                break;
            };

            let mut next_decor = AtomDecor::new(next.clone());
            self.change_to_ord(&mut next_decor, Some(&*cur), i + 1);
            let class = next_decor.left_type();
            if class != cur.right_type() || !LIG_KERN_SET.contains(class) {
                break;
            }

            match env.font().ligature(&glyph, &next_glyph) {
                Some(ligature) => {
                    trace!(
                        left = %glyph.code_point,
                        right = %next_glyph.code_point,
                        result = %ligature.code_point,
                        "ligature"
                    );
                    cur.change_atom(FixedCharAtom::with_type(ligature, class));
                    i += 1;
                }
                None => {
                    let kern = env.font().kern(&glyph, &next_glyph);
                    trace!(
                        left = %glyph.code_point,
                        right = %next_glyph.code_point,
                        kern,
                        "kern pair"
                    );
                    cur.mark_as_text_symbol();
                    return (i, Some(kern));
                }
            }
        }
        (i, None)
    }

    fn compose(&self, env: &Env, seed: Option<&AtomDecor>) -> LayoutBox {
        let n = self.elements.len();
        let breakable = self.breakable || env.break_everywhere();

        let mut children: Vec<LayoutBox> = Vec::with_capacity(n * 2);
        let mut breaks: Vec<usize> = Vec::new();
        // the enclosing row already spaced the first element against the seed
        let mut prev: Option<AtomDecor> = seed.map(AtomDecor::detached);
        let mut first = true;
        let mut joined = false;
        let mut break_pending = false;

        let mut i = 0;
        while i < n {
            let atom = &self.elements[i];
            if atom.is_break_mark() {
                break_pending = true;
                i += 1;
                continue;
            }

            let mut cur = AtomDecor::new(atom.clone());
            self.change_to_ord(&mut cur, prev.as_ref(), i);

            let mut last = i;
            let mut kern = None;
            if let Some(c) = cur.code_point().filter(|_| LIG_KERN_SET.contains(cur.right_type())) {
                if cur.resolve_char(env).is_none() {
                    let (text, end) = self.collect_unresolvable(i, cur.is_math_mode(), env);
                    debug!(text = %text, from = i, to = end, "no glyph, setting literal text");
                    cur = AtomDecor::new(Arc::new(TextAtom::new(text)));
                    last = end;
                } else {
                    (last, kern) = self.scan_run(&mut cur, i, c, env);
                }
            }

            if break_pending {
                if breaks.last() != Some(&children.len()) {
                    breaks.push(children.len());
                }
                break_pending = false;
            }

            if let Some(p) = prev.as_ref().filter(|_| !first) {
                if !joined && !p.is_kern() && !cur.is_kern() {
                    if let Some(glue) = glue_box(p.right_type(), cur.left_type(), env) {
                        if breakable && breaks.last() != Some(&children.len()) {
                            breaks.push(children.len());
                        }
                        children.push(glue);
                    }
                }
            }

            if cur.as_row().is_some() {
                cur.set_previous_atom(prev.as_ref().map(AtomDecor::detached));
            }
            children.push(cur.create_box(env));

            first = false;
            joined = false;
            if let Some(k) = kern {
                if k.abs() >= env.config().kern_threshold {
                    children.push(LayoutBox::kern(env.em_to_pt(k)));
                }
                joined = true;
            }

            // kerns do not interrupt spacing between their neighbours
            if !cur.is_kern() {
                cur.set_previous_atom(None);
                prev = Some(cur);
            }
            i = last + 1;
        }

        LayoutBox::hbox(children, breaks)
    }
}

impl Atom for RowAtom {
    fn atom_type(&self) -> AtomType {
        self.left_type()
    }

    fn left_type(&self) -> AtomType {
        self.elements
            .iter()
            .find(|a| !a.is_break_mark())
            .map_or(AtomType::Ordinary, |a| a.left_type())
    }

    fn right_type(&self) -> AtomType {
        match self.elements.iter().rev().find(|a| !a.is_break_mark()) {
            None => AtomType::Ordinary,
            Some(a) => match a.right_type() {
                AtomType::BinaryOperator if !self.look_at_last_atom => AtomType::Ordinary,
                t => t,
            },
        }
    }

    fn create_box(&self, env: &Env) -> LayoutBox {
        self.compose(env, self.previous.as_ref())
    }

    fn as_row(&self) -> Option<&dyn Row> {
        Some(self)
    }
}

impl Row for RowAtom {
    fn create_box_after(&self, env: &Env, previous: Option<&AtomDecor>) -> LayoutBox {
        self.compose(env, previous.or(self.previous.as_ref()))
    }
}
