//! Typing and deleting at the cursor.

use log::debug;
use mathfield_config::Options;

use super::{Cursor, Notify};
use crate::kinds::{self, BlockRole, Bracket, DeleteExit, Item, NodeKind, Symbol, SymbolClass};
use crate::latex::{Registry, Template};
use crate::surface::{Edge, Notice};
use crate::tree::{Dir, Fragment, NodeId, Sides, Tree};

impl Cursor {
    /// Splice a detached fragment in at the cursor, leaving the cursor just
    /// right of it.
    pub(crate) fn insert_fragment(&mut self, tree: &mut Tree, mut fragment: Fragment) {
        let (left, right) = (self.side(Dir::Left), self.side(Dir::Right));
        fragment.adopt(tree, self.parent(), left, right);
        if let Some(last) = fragment.end(Dir::Right) {
            self.point.sides.left = Some(last);
        }
    }

    /// Backspace (`Left`) or Delete (`Right`).
    pub fn delete_dir(&mut self, tree: &mut Tree, dir: Dir) {
        if !self.delete_selection(tree) {
            match self.side(dir) {
                Some(node) => self.delete_towards(tree, dir, node),
                None => self.delete_out_of(tree, dir),
            }
        }
        self.notify(Notify::Edit);
    }

    /// Remove a symbol or an empty command; step into anything else.
    fn delete_towards(&mut self, tree: &mut Tree, dir: Dir, node: NodeId) {
        if tree.is_empty_node(node) {
            let next = tree.sibling(node, dir);
            Fragment::attached(node, node).remove(tree);
            self.point.sides[dir] = next;
        } else {
            self.move_towards(tree, dir, node, None);
        }
    }

    fn delete_out_of(&mut self, tree: &mut Tree, dir: Dir) {
        let block = self.parent();
        if tree.parent(block).is_none() {
            self.notice(Notice::Edge(Edge::DeleteOutOf(dir)));
            return;
        }
        match kinds::delete_out_of_block(tree, block) {
            DeleteExit::Unwrap => self.unwrap_gramp(tree),
            DeleteExit::DropBlock => self.drop_block(tree),
        }
    }

    /// Remove the cursor's block from its command. Its contents move out to
    /// just after the command and the cursor keeps its place among them.
    fn drop_block(&mut self, tree: &mut Tree) {
        let block = self.parent();
        let Some(command) = tree.parent(block) else {
            return;
        };
        let Some(outer) = tree.parent(command) else {
            return;
        };
        let anchor = self.side(Dir::Right);
        let mut contents = tree.children(block);
        contents.disown(tree);
        let after = tree.sibling(command, Dir::Right);
        contents.adopt(tree, outer, Some(command), after);

        match (anchor, contents.end(Dir::Right)) {
            (Some(node), _) => self.ins_left_of(tree, node),
            (None, Some(last)) => self.ins_right_of(tree, last),
            (None, None) => self.ins_right_of(tree, command),
        }
        Fragment::attached(block, block).remove(tree);
    }

    /// Replace the command around the cursor by the contents of its blocks,
    /// in order, keeping the cursor in front of what followed it.
    pub(crate) fn unwrap_gramp(&mut self, tree: &mut Tree) {
        let block = self.parent();
        let Some(gramp) = tree.parent(block) else {
            return;
        };
        let Some(outer) = tree.parent(gramp) else {
            return;
        };
        let blocks: Vec<NodeId> = tree.child_ids(gramp).collect();

        let cursor_left = self.side(Dir::Left);
        let later_first = blocks
            .iter()
            .skip_while(|&&b| b != block)
            .skip(1)
            .find_map(|&b| tree.end(b, Dir::Left));
        let mut anchor = self.side(Dir::Right);

        let mut left = tree.sibling(gramp, Dir::Left);
        let right = tree.sibling(gramp, Dir::Right);
        Fragment::attached(gramp, gramp).disown(tree);
        for b in blocks {
            let mut contents = tree.children(b);
            if contents.is_empty() {
                continue;
            }
            contents.disown(tree);
            contents.adopt(tree, outer, left, right);
            left = contents.end(Dir::Right);
        }

        if anchor.is_none() {
            anchor = match cursor_left {
                Some(l) => tree.sibling(l, Dir::Right),
                None => later_first.or(right),
            };
        }
        match anchor {
            Some(node) => self.ins_left_of(tree, node),
            None => self.ins_at_right_end(tree, outer),
        }
        tree.dispose(gramp);
    }

    /// Ctrl-Backspace and Ctrl-Delete: remove everything to the `dir` end of
    /// the block.
    pub fn ctrl_delete_dir(&mut self, tree: &mut Tree, dir: Dir) {
        let Some(near) = self.side(dir) else {
            self.delete_dir(tree, dir);
            return;
        };
        if self.selection.is_some() {
            self.delete_dir(tree, dir);
            return;
        }
        let block = self.parent();
        let Some(far) = tree.end(block, dir) else {
            return;
        };
        let fragment = match dir {
            Dir::Left => Fragment::attached(far, near),
            Dir::Right => Fragment::attached(near, far),
        };
        fragment.remove(tree);
        self.ins_at_dir_end(tree, dir, block);
        self.notify(Notify::Edit);
    }

    /// Insert one typed character.
    ///
    /// Letters and digits become symbols; registered characters insert their
    /// template; anything else becomes an escaped plain symbol. Returns
    /// whether the tree changed.
    pub fn write_char(
        &mut self,
        tree: &mut Tree,
        registry: &Registry,
        options: &Options,
        ch: char,
    ) -> bool {
        let template = registry.char_entry(ch).and_then(|e| e.template.clone());
        match template {
            Some(Template::Insert(item)) => self.write_item(tree, options, item),
            Some(Template::OpenBracket { open, close }) => {
                (open == close && self.solidify_bracket(tree, Dir::Right, &close))
                    || self.solidify_bracket(tree, Dir::Left, &open)
                    || self.open_bracket(tree, options, &open, &close)
            }
            Some(Template::CloseBracket { open, close }) => {
                self.solidify_bracket(tree, Dir::Right, &close)
                    || self.wrap_left_in_bracket(tree, options, &open, &close)
            }
            None if ch.is_ascii_alphabetic() => {
                self.write_symbol(tree, Symbol::variable(ch));
                self.auto_words(tree, registry, options);
                true
            }
            None if ch.is_ascii_digit() => {
                self.write_symbol(tree, Symbol::digit(ch));
                true
            }
            None if ch.is_whitespace() => false,
            None => {
                self.write_symbol(tree, Symbol::from_char(ch));
                true
            }
        }
    }

    /// Insert a symbol, replacing any selection.
    pub(crate) fn write_symbol(&mut self, tree: &mut Tree, symbol: Symbol) {
        self.delete_selection(tree);
        let fragment = tree.instantiate(&[Item::symbol(symbol)]);
        self.insert_fragment(tree, fragment);
    }

    /// Whether a command may be created here without exceeding the depth
    /// limit.
    fn room_for_command(&self, tree: &Tree, options: &Options) -> bool {
        match options.max_depth {
            Some(max) if self.depth(tree) >= max => {
                debug!("refusing command at depth {} (max {max})", self.depth(tree));
                false
            }
            _ => true,
        }
    }

    /// Insert a template item. A command takes the current selection into
    /// its first block. Returns false when the depth limit refuses it.
    pub(crate) fn write_item(&mut self, tree: &mut Tree, options: &Options, item: Item) -> bool {
        if let NodeKind::Symbol(symbol) = item.kind {
            self.write_symbol(tree, symbol);
            return true;
        }
        // an existing sub/superscript gains a block at its own depth
        if item.kind == NodeKind::SupSub
            && self.selection.is_none()
            && self.extend_supsub(tree, &item)
        {
            return true;
        }
        if !self.room_for_command(tree, options) {
            return false;
        }
        let mut replaced = self.replace_selection(tree);
        if item.kind == NodeKind::Fraction && replaced.is_none() {
            replaced = self.take_numerator(tree);
        }
        self.create_command(tree, &item, replaced);
        true
    }

    /// Instantiate `item` at the cursor, move `replaced` into its first
    /// block and put the cursor in the first empty block (else the last).
    fn create_command(
        &mut self,
        tree: &mut Tree,
        item: &Item,
        replaced: Option<Fragment>,
    ) -> NodeId {
        let fragment = tree.instantiate(std::slice::from_ref(item));
        let Some(command) = fragment.end(Dir::Left) else {
            unreachable!("instantiating one item yields one node");
        };
        self.insert_fragment(tree, fragment);
        if let (Some(mut replaced), Some(first)) = (replaced, tree.end(command, Dir::Left)) {
            replaced.adopt(tree, first, None, None);
        }
        let target = tree
            .child_ids(command)
            .find(|&b| tree.end(b, Dir::Left).is_none())
            .or_else(|| tree.end(command, Dir::Right));
        if let Some(block) = target {
            self.ins_at_right_end(tree, block);
        }
        command
    }

    /// The run left of the cursor back to the nearest binary operator, which
    /// a typed `/` turns into the numerator.
    fn take_numerator(&mut self, tree: &mut Tree) -> Option<Fragment> {
        let is_operator = |node: NodeId| {
            matches!(
                tree.kind(node),
                NodeKind::Symbol(s) if s.class == SymbolClass::BinaryOperator
            )
        };
        let last = self.side(Dir::Left).filter(|&n| !is_operator(n))?;
        let mut first = last;
        while let Some(prev) = tree.sibling(first, Dir::Left).filter(|&n| !is_operator(n)) {
            first = prev;
        }
        let outer_left = tree.sibling(first, Dir::Left);
        let mut fragment = Fragment::attached(first, last);
        fragment.disown(tree);
        self.point.sides.left = outer_left;
        Some(fragment)
    }

    /// Typing `^` or `_` right after a sub/superscript edits it instead of
    /// stacking a second one.
    fn extend_supsub(&mut self, tree: &mut Tree, item: &Item) -> bool {
        let Some(existing) = self.side(Dir::Left) else {
            return false;
        };
        if tree.kind(existing) != &NodeKind::SupSub {
            return false;
        }
        let Some(role) = item.blocks.first().map(|b| b.role) else {
            return false;
        };
        if let Some(block) = tree.block_with_role(existing, role) {
            self.ins_at_right_end(tree, block);
            return true;
        }
        let block = tree.alloc(NodeKind::Block(role));
        let mut fragment = Fragment::detached(Some(Sides::new(block, block)));
        match role {
            BlockRole::Sub => {
                let first = tree.end(existing, Dir::Left);
                fragment.adopt(tree, existing, None, first);
            }
            _ => {
                let last = tree.end(existing, Dir::Right);
                fragment.adopt(tree, existing, last, None);
            }
        }
        self.ins_at_right_end(tree, block);
        true
    }

    /// A typed opening bracket swallows everything to its right, or the
    /// selection, with the closing side left as a ghost.
    fn open_bracket(
        &mut self,
        tree: &mut Tree,
        options: &Options,
        open: &str,
        close: &str,
    ) -> bool {
        if !self.room_for_command(tree, options) {
            return false;
        }
        let (ghost, contents) = match self.replace_selection(tree) {
            Some(selected) => (None, selected),
            None => (Some(Dir::Right), self.take_rest(tree, Dir::Right)),
        };
        let item = Item::bracket(Bracket::new(open, close, ghost), Vec::new());
        let command = self.create_command(tree, &item, Some(contents));
        if ghost.is_none() {
            self.ins_right_of(tree, command);
        } else if let Some(body) = tree.end(command, Dir::Left) {
            self.ins_at_left_end(tree, body);
        }
        true
    }

    /// Solidify the enclosing half-open bracket whose ghost `side` is
    /// `delimiter`. Whatever lies beyond the cursor on that side moves out of
    /// the bracket. A typed close leaves the cursor after the bracket, a
    /// typed open leaves it just inside.
    ///
    /// With a selection this does nothing, so the typed bracket wraps the
    /// selection instead.
    fn solidify_bracket(&mut self, tree: &mut Tree, side: Dir, delimiter: &str) -> bool {
        if self.selection.is_some() {
            return false;
        }
        let body = self.parent();
        let Some(command) = tree.parent(body) else {
            return false;
        };
        let matches = matches!(
            tree.kind(command),
            NodeKind::Bracket(b) if b.ghost == Some(side) && b.delimiter(side) == delimiter
        );
        if !matches {
            return false;
        }
        let Some(outer) = tree.parent(command) else {
            return false;
        };
        let mut rest = self.take_rest(tree, side);
        match side {
            Dir::Left => {
                let before = tree.sibling(command, Dir::Left);
                rest.adopt(tree, outer, before, Some(command));
            }
            Dir::Right => {
                let after = tree.sibling(command, Dir::Right);
                rest.adopt(tree, outer, Some(command), after);
            }
        }
        if let NodeKind::Bracket(b) = tree.kind_mut(command) {
            b.ghost = None;
        }
        match side {
            Dir::Left => self.ins_at_left_end(tree, body),
            Dir::Right => self.ins_right_of(tree, command),
        }
        true
    }

    /// A closing bracket with nothing to close wraps everything to its left,
    /// with the opening side left as a ghost.
    fn wrap_left_in_bracket(
        &mut self,
        tree: &mut Tree,
        options: &Options,
        open: &str,
        close: &str,
    ) -> bool {
        if !self.room_for_command(tree, options) {
            return false;
        }
        let (ghost, contents) = match self.replace_selection(tree) {
            Some(selected) => (None, selected),
            None => (Some(Dir::Left), self.take_rest(tree, Dir::Left)),
        };
        let item = Item::bracket(Bracket::new(open, close, ghost), Vec::new());
        let command = self.create_command(tree, &item, Some(contents));
        self.ins_right_of(tree, command);
        true
    }

    /// Disown everything on the `dir` side of the cursor in its block.
    fn take_rest(&mut self, tree: &mut Tree, dir: Dir) -> Fragment {
        let Some(near) = self.side(dir) else {
            return Fragment::empty();
        };
        let Some(far) = tree.end(self.parent(), dir) else {
            return Fragment::empty();
        };
        let mut fragment = match dir {
            Dir::Left => Fragment::attached(far, near),
            Dir::Right => Fragment::attached(near, far),
        };
        fragment.disown(tree);
        self.point.sides[dir] = None;
        fragment
    }

    /// After a letter: turn a trailing run of letters into a command or an
    /// operator name when it spells one.
    fn auto_words(&mut self, tree: &mut Tree, registry: &Registry, options: &Options) {
        let longest = options.longest_auto_word();
        if longest < 2 {
            return;
        }
        let mut run: Vec<(NodeId, char)> = Vec::new();
        let mut scan = self.side(Dir::Left);
        while let Some(node) = scan {
            let Some(letter) = tree.kind(node).as_symbol().and_then(Symbol::letter) else {
                break;
            };
            if run.len() == longest {
                break;
            }
            run.push((node, letter));
            scan = tree.sibling(node, Dir::Left);
        }
        run.reverse();
        let word_from = |start: usize| run[start..].iter().map(|(_, c)| c).collect::<String>();
        let word = word_from(0);

        // a typed letter may extend an operator name, as in sin + h
        if let Some(prefix_node) = scan
            && let Some(prefix) = tree.kind(prefix_node).as_symbol()
            && prefix.class == SymbolClass::OperatorName
        {
            let extended = format!("{}{word}", prefix.text);
            if options.auto_operator_names.contains(&extended) {
                self.replace_run(tree, prefix_node, run.len());
                self.write_symbol(tree, Symbol::operator_name(&extended));
                return;
            }
        }

        for start in 0..run.len().saturating_sub(1) {
            let suffix = word_from(start);
            if options.auto_commands.contains(&suffix)
                && let Some(Template::Insert(item)) =
                    registry.command(&suffix).and_then(|e| e.template.clone())
                && (!item.is_command() || self.room_for_command(tree, options))
            {
                self.replace_run(tree, run[start].0, run.len() - start - 1);
                self.write_item(tree, options, item);
                return;
            }
            if options.auto_operator_names.contains(&suffix) {
                self.replace_run(tree, run[start].0, run.len() - start - 1);
                self.write_symbol(tree, Symbol::operator_name(&suffix));
                return;
            }
        }
    }

    /// Remove `first` and the `more` siblings after it, which end at the
    /// cursor.
    fn replace_run(&mut self, tree: &mut Tree, first: NodeId, more: usize) {
        let Some(last) = self.side(Dir::Left) else {
            return;
        };
        debug_assert_eq!(
            Fragment::attached(first, last).nodes(tree).len(),
            more + 1,
            "run must end at the cursor"
        );
        let outer_left = tree.sibling(first, Dir::Left);
        Fragment::attached(first, last).remove(tree);
        self.point.sides.left = outer_left;
    }
}
