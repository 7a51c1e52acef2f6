//! Node kinds and the knowledge each one owns.
//!
//! Each submodule is the single place that knows about its kind: how it is
//! spelled in LaTeX, which registry entries produce it, how it renders and
//! how vertical movement treats its blocks. Adding a kind means adding a
//! module here and a call in [`register_all`].
//!
//! ## Module Structure
//!
//! ```text
//! kinds/
//! ├── mod.rs       # NodeKind, BlockRole, Item and movement hooks
//! ├── symbol.rs    # letters, digits, operators, Greek, operator names
//! ├── fraction.rs  # \frac
//! ├── root.rs      # \sqrt, \sqrt[n], \nthroot
//! ├── supsub.rs    # ^ and _
//! ├── bracket.rs   # \left ... \right and typed parentheses
//! └── style.rs     # \mathbf and friends
//! ```

pub mod bracket;
pub mod fraction;
pub mod root;
pub mod style;
pub mod supsub;
pub mod symbol;

pub use bracket::Bracket;
pub use style::Style;
pub use symbol::{Symbol, SymbolClass};

use mathfield_config::Vertical;

use crate::latex::Registry;
use crate::tree::{NodeId, Tree};

/// What a node is. Blocks and commands alternate by tree level; symbols
/// are leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Block(BlockRole),
    Symbol(Symbol),
    Fraction,
    SquareRoot,
    NthRoot,
    /// Subscript and/or superscript; the sub block comes first.
    SupSub,
    Bracket(Bracket),
    Style(Style),
}

/// Which slot of its command a block fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockRole {
    Root,
    Numerator,
    Denominator,
    Radicand,
    Index,
    Sub,
    Sup,
    Body,
}

impl NodeKind {
    /// Kind name used in rendered class attributes.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Block(_) => "block",
            NodeKind::Symbol(_) => "symbol",
            NodeKind::Fraction => "fraction",
            NodeKind::SquareRoot => "sqrt",
            NodeKind::NthRoot => "nthroot",
            NodeKind::SupSub => "supsub",
            NodeKind::Bracket(_) => "bracket",
            NodeKind::Style(_) => "style",
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            NodeKind::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

/// Detached content: what the parser produces and what typing inserts.
///
/// Items become tree nodes only through [`Tree::instantiate`], so a parse
/// that backtracks never touches the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub kind: NodeKind,
    pub blocks: Vec<ItemBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBlock {
    pub role: BlockRole,
    pub items: Vec<Item>,
}

impl Item {
    pub fn symbol(symbol: Symbol) -> Self {
        Self {
            kind: NodeKind::Symbol(symbol),
            blocks: Vec::new(),
        }
    }

    pub fn command(kind: NodeKind, blocks: Vec<(BlockRole, Vec<Item>)>) -> Self {
        Self {
            kind,
            blocks: blocks
                .into_iter()
                .map(|(role, items)| ItemBlock { role, items })
                .collect(),
        }
    }

    pub fn fraction(numerator: Vec<Item>, denominator: Vec<Item>) -> Self {
        Self::command(
            NodeKind::Fraction,
            vec![
                (BlockRole::Numerator, numerator),
                (BlockRole::Denominator, denominator),
            ],
        )
    }

    pub fn sqrt(radicand: Vec<Item>) -> Self {
        Self::command(NodeKind::SquareRoot, vec![(BlockRole::Radicand, radicand)])
    }

    pub fn nth_root(index: Vec<Item>, radicand: Vec<Item>) -> Self {
        Self::command(
            NodeKind::NthRoot,
            vec![(BlockRole::Index, index), (BlockRole::Radicand, radicand)],
        )
    }

    /// At least one of the two parts should be present.
    pub fn supsub(sub: Option<Vec<Item>>, sup: Option<Vec<Item>>) -> Self {
        let blocks = [(BlockRole::Sub, sub), (BlockRole::Sup, sup)]
            .into_iter()
            .filter_map(|(role, items)| items.map(|items| (role, items)))
            .collect();
        Self::command(NodeKind::SupSub, blocks)
    }

    pub fn bracket(bracket: Bracket, body: Vec<Item>) -> Self {
        Self::command(NodeKind::Bracket(bracket), vec![(BlockRole::Body, body)])
    }

    pub fn style(style: Style, body: Vec<Item>) -> Self {
        Self::command(NodeKind::Style(style), vec![(BlockRole::Body, body)])
    }

    pub fn is_command(&self) -> bool {
        !self.blocks.is_empty()
    }
}

/// Drop commands that would put blocks more than `levels` levels below the
/// block the items land in.
pub fn prune_deeper_than(items: &mut Vec<Item>, levels: usize) {
    items.retain_mut(|item| {
        if !item.is_command() {
            return true;
        }
        if levels == 0 {
            return false;
        }
        for block in &mut item.blocks {
            prune_deeper_than(&mut block.items, levels - 1);
        }
        true
    });
}

/// Populate `registry` with every built-in command and typed character.
pub fn register_all(registry: &mut Registry) {
    symbol::register(registry);
    fraction::register(registry);
    root::register(registry);
    supsub::register(registry);
    bracket::register(registry);
    style::register(registry);
}

/// Where leaving a block vertically should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VerticalExit {
    /// Into a sibling block, restoring a remembered position if any.
    Jump(NodeId),
    /// Beside the command: left of it unless the cursor is at the very end.
    BesideCommand,
}

/// The block of `command` that entering it vertically lands in.
pub(crate) fn into_block(tree: &Tree, command: NodeId, vertical: Vertical) -> Option<NodeId> {
    match (tree.kind(command), vertical) {
        (NodeKind::Fraction, Vertical::Up) => tree.block_with_role(command, BlockRole::Numerator),
        (NodeKind::Fraction, Vertical::Down) => {
            tree.block_with_role(command, BlockRole::Denominator)
        }
        (NodeKind::SupSub, Vertical::Up) => tree.block_with_role(command, BlockRole::Sup),
        (NodeKind::SupSub, Vertical::Down) => tree.block_with_role(command, BlockRole::Sub),
        _ => None,
    }
}

/// What leaving `block` vertically does, if its command defines anything.
pub(crate) fn out_of_block(tree: &Tree, block: NodeId, vertical: Vertical) -> Option<VerticalExit> {
    let command = tree.parent(block)?;
    let role = tree.role(block)?;
    let jump_or_beside = |target: BlockRole| {
        Some(
            tree.block_with_role(command, target)
                .map_or(VerticalExit::BesideCommand, VerticalExit::Jump),
        )
    };
    match (role, vertical) {
        (BlockRole::Denominator, Vertical::Up) => {
            tree.block_with_role(command, BlockRole::Numerator).map(VerticalExit::Jump)
        }
        (BlockRole::Numerator, Vertical::Down) => tree
            .block_with_role(command, BlockRole::Denominator)
            .map(VerticalExit::Jump),
        (BlockRole::Sup, Vertical::Down) => jump_or_beside(BlockRole::Sub),
        (BlockRole::Sub, Vertical::Up) => jump_or_beside(BlockRole::Sup),
        _ => None,
    }
}

/// What deleting past the start or end of a block does to its command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeleteExit {
    /// Replace the command by the contents of all its blocks.
    Unwrap,
    /// Remove only the block being left; its contents follow the command.
    DropBlock,
}

pub(crate) fn delete_out_of_block(tree: &Tree, block: NodeId) -> DeleteExit {
    let Some(command) = tree.parent(block) else {
        return DeleteExit::Unwrap;
    };
    match tree.kind(command) {
        NodeKind::SupSub if tree.child_ids(command).nth(1).is_some() => DeleteExit::DropBlock,
        _ => DeleteExit::Unwrap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn x() -> Item {
        Item::symbol(Symbol::variable('x'))
    }

    #[test]
    fn supsub_orders_sub_first() {
        let item = Item::supsub(Some(vec![x()]), Some(vec![]));
        let roles: Vec<_> = item.blocks.iter().map(|b| b.role).collect();
        assert_eq!(roles, vec![BlockRole::Sub, BlockRole::Sup]);
    }

    #[test]
    fn prune_drops_commands_below_the_limit() {
        let mut items = vec![
            x(),
            Item::fraction(vec![Item::sqrt(vec![x()])], vec![x()]),
        ];
        prune_deeper_than(&mut items, 1);
        assert_eq!(
            items,
            vec![x(), Item::fraction(vec![], vec![x()])]
        );

        prune_deeper_than(&mut items, 0);
        assert_eq!(items, vec![x()]);
    }

    #[test]
    fn only_a_two_part_supsub_drops_a_single_block() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut frag = tree.instantiate(&[
            Item::supsub(Some(vec![x()]), Some(vec![x()])),
            Item::supsub(None, Some(vec![x()])),
            Item::fraction(vec![x()], vec![]),
        ]);
        frag.adopt(&mut tree, root, None, None);
        let commands: Vec<_> = tree.child_ids(root).collect();
        let both_sup = tree.block_with_role(commands[0], BlockRole::Sup).unwrap();
        let lone_sup = tree.block_with_role(commands[1], BlockRole::Sup).unwrap();
        let numer = tree.block_with_role(commands[2], BlockRole::Numerator).unwrap();

        assert_eq!(delete_out_of_block(&tree, both_sup), DeleteExit::DropBlock);
        assert_eq!(delete_out_of_block(&tree, lone_sup), DeleteExit::Unwrap);
        assert_eq!(delete_out_of_block(&tree, numer), DeleteExit::Unwrap);
    }

    #[test]
    fn vertical_hooks_for_fraction_and_supsub() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut frag = tree.instantiate(&[
            Item::fraction(vec![], vec![]),
            Item::supsub(None, Some(vec![])),
        ]);
        frag.adopt(&mut tree, root, None, None);
        let frac = tree.child_ids(root).next().unwrap();
        let supsub = tree.child_ids(root).nth(1).unwrap();
        let numer = tree.block_with_role(frac, BlockRole::Numerator).unwrap();
        let denom = tree.block_with_role(frac, BlockRole::Denominator).unwrap();
        let sup = tree.block_with_role(supsub, BlockRole::Sup).unwrap();

        assert_eq!(into_block(&tree, frac, Vertical::Down), Some(denom));
        assert_eq!(out_of_block(&tree, denom, Vertical::Up), Some(VerticalExit::Jump(numer)));
        assert_eq!(out_of_block(&tree, numer, Vertical::Up), None);
        assert_eq!(into_block(&tree, supsub, Vertical::Down), None);
        assert_eq!(
            out_of_block(&tree, sup, Vertical::Down),
            Some(VerticalExit::BesideCommand)
        );
    }
}
