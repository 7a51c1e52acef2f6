//! Horizontal geometry for vertical movement and seeking.
//!
//! The editor only ever needs left/right bounds: moving up into a fraction
//! lands at the position closest to the cursor's current x. A rendering
//! layer can supply real measurements through [`Geometry`]; without one,
//! [`MonospaceLayout`] lays the tree out on a character grid.

use std::collections::HashMap;

use crate::kinds::{BlockRole, NodeKind, SymbolClass};
use crate::tree::{Dir, NodeId, Point, Tree};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn mid(&self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

pub trait Geometry {
    fn bounds(&self, id: NodeId) -> Option<Bounds>;
}

/// Fixed-width layout: every character is one unit wide.
#[derive(Debug, Clone, Default)]
pub struct MonospaceLayout {
    bounds: HashMap<NodeId, Bounds>,
}

impl Geometry for MonospaceLayout {
    fn bounds(&self, id: NodeId) -> Option<Bounds> {
        self.bounds.get(&id).copied()
    }
}

impl MonospaceLayout {
    pub fn compute(tree: &Tree) -> Self {
        let mut widths = HashMap::new();
        measure(tree, tree.root(), &mut widths);
        let mut layout = Self::default();
        layout.place(tree, tree.root(), 0.0, &widths);
        layout
    }

    fn place(&mut self, tree: &Tree, id: NodeId, left: f64, widths: &HashMap<NodeId, f64>) {
        let width = widths.get(&id).copied().unwrap_or(0.0);
        self.bounds.insert(
            id,
            Bounds {
                left,
                right: left + width,
            },
        );
        let width_of = |n: NodeId| widths.get(&n).copied().unwrap_or(0.0);
        match tree.kind(id) {
            NodeKind::Symbol(_) => {}
            NodeKind::Block(_) => {
                let mut x = left;
                for child in tree.child_ids(id) {
                    self.place(tree, child, x, widths);
                    x += width_of(child);
                }
            }
            NodeKind::Fraction => {
                for block in tree.child_ids(id) {
                    let offset = (width - width_of(block)) / 2.0;
                    self.place(tree, block, left + offset, widths);
                }
            }
            NodeKind::NthRoot => {
                let mut x = left;
                for block in tree.child_ids(id) {
                    if tree.role(block) == Some(BlockRole::Radicand) {
                        x += ROOT_SIGN;
                    }
                    self.place(tree, block, x, widths);
                    x += width_of(block);
                }
            }
            NodeKind::SquareRoot | NodeKind::Bracket(_) => {
                for block in tree.child_ids(id) {
                    self.place(tree, block, left + 1.0, widths);
                }
            }
            NodeKind::SupSub | NodeKind::Style(_) => {
                for block in tree.child_ids(id) {
                    self.place(tree, block, left, widths);
                }
            }
        }
    }
}

const ROOT_SIGN: f64 = 1.0;

fn measure(tree: &Tree, id: NodeId, widths: &mut HashMap<NodeId, f64>) -> f64 {
    let children: Vec<f64> = tree
        .child_ids(id)
        .map(|c| measure(tree, c, widths))
        .collect();
    let widest = children.iter().copied().fold(0.0, f64::max);
    let total: f64 = children.iter().sum();
    let width = match tree.kind(id) {
        NodeKind::Block(_) if children.is_empty() => 1.0,
        NodeKind::Block(_) => total,
        NodeKind::Symbol(s) => {
            let glyphs = s.html.chars().count().max(1) as f64;
            if s.class == SymbolClass::BinaryOperator {
                glyphs + 1.0
            } else {
                glyphs
            }
        }
        NodeKind::Fraction => widest + 0.5,
        NodeKind::SupSub | NodeKind::Style(_) => widest,
        NodeKind::SquareRoot => total + ROOT_SIGN,
        NodeKind::NthRoot => total + ROOT_SIGN,
        NodeKind::Bracket(_) => total + 2.0,
    };
    widths.insert(id, width);
    width
}

/// The x coordinate of a gap.
pub fn point_x(geometry: &dyn Geometry, point: &Point) -> Option<f64> {
    if let Some(left) = point.side(Dir::Left) {
        return geometry.bounds(left).map(|b| b.right);
    }
    if let Some(right) = point.side(Dir::Right) {
        return geometry.bounds(right).map(|b| b.left);
    }
    geometry.bounds(point.parent).map(|b| b.mid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::Grammar;
    use pretty_assertions::assert_eq;

    fn tree_of(latex: &str) -> Tree {
        let mut tree = Tree::new();
        let root = tree.root();
        let items = Grammar::default().parse(latex).unwrap();
        let mut frag = tree.instantiate(&items);
        frag.adopt(&mut tree, root, None, None);
        tree
    }

    #[test]
    fn symbols_sit_side_by_side() {
        let tree = tree_of("ab+c");
        let layout = MonospaceLayout::compute(&tree);
        let ids: Vec<_> = tree.child_ids(tree.root()).collect();
        let lefts: Vec<_> = ids.iter().map(|&i| layout.bounds(i).unwrap().left).collect();
        assert_eq!(lefts, vec![0.0, 1.0, 2.0, 4.0]);
        assert_eq!(layout.bounds(tree.root()).unwrap().width(), 5.0);
    }

    #[test]
    fn fraction_blocks_are_centred() {
        let tree = tree_of("\\frac{abc}{d}");
        let layout = MonospaceLayout::compute(&tree);
        let frac = tree.end(tree.root(), Dir::Left).unwrap();
        let numer = tree.end(frac, Dir::Left).unwrap();
        let denom = tree.end(frac, Dir::Right).unwrap();

        assert_eq!(layout.bounds(frac).unwrap().width(), 3.5);
        assert_eq!(layout.bounds(numer).unwrap().mid(), layout.bounds(denom).unwrap().mid());
    }

    #[test]
    fn point_x_uses_neighbours() {
        let tree = tree_of("ab");
        let layout = MonospaceLayout::compute(&tree);
        let root = tree.root();
        let a = tree.end(root, Dir::Left).unwrap();
        let b = tree.end(root, Dir::Right).unwrap();
        assert_eq!(point_x(&layout, &Point::new(root, Some(a), Some(b))), Some(1.0));
        assert_eq!(point_x(&layout, &Point::new(root, None, Some(a))), Some(0.0));
    }
}
