//! [`MathField`]: one editable formula and everything needed to drive it.

use log::{debug, warn};
use mathfield_config::{Options, Vertical};

use crate::cursor::{Cursor, Notify};
use crate::error::EngineError;
use crate::keys::{Action, KeyTable};
use crate::kinds::{self, Item};
use crate::latex::{Grammar, Registry};
use crate::layout::{Geometry, MonospaceLayout};
use crate::surface::{Notice, NullSurface, Surface};
use crate::tree::{Dir, Tree};

/// An editable formula: the tree, a cursor in it, and the collaborators
/// that parse input and display output.
///
/// Every public operation leaves the tree valid and forwards whatever the
/// cursor noticed (focus changes, edges) to the [`Surface`]. After an edit
/// the root block's markup is registered again.
pub struct MathField<S: Surface = NullSurface> {
    tree: Tree,
    cursor: Cursor,
    grammar: Grammar,
    keys: KeyTable,
    options: Options,
    surface: S,
    edited: bool,
}

impl MathField<NullSurface> {
    pub fn new(options: Options) -> Self {
        Self::with_surface(options, NullSurface)
    }
}

impl Default for MathField<NullSurface> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<S: Surface> MathField<S> {
    pub fn with_surface(options: Options, surface: S) -> Self {
        let tree = Tree::new();
        let cursor = Cursor::new(tree.root());
        Self {
            tree,
            cursor,
            grammar: Grammar::default(),
            keys: KeyTable::standard(),
            options,
            surface,
            edited: false,
        }
    }

    /// Replace the command registry, e.g. to add custom commands.
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.grammar = Grammar::new(registry);
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn keys_mut(&mut self) -> &mut KeyTable {
        &mut self.keys
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Drop commands that would nest past `max_depth` once placed in a block
    /// at `depth`.
    fn prune(&self, items: &mut Vec<Item>, depth: usize) {
        if let Some(max) = self.options.max_depth {
            kinds::prune_deeper_than(items, max.saturating_sub(depth));
        }
    }

    /// Replace the whole content. Invalid LaTeX leaves the field empty.
    pub fn render_latex_math(&mut self, latex: &str) {
        let mut items = self.grammar.parse(latex).unwrap_or_else(|e| {
            warn!("cannot render {latex:?}, clearing instead: {e}");
            Vec::new()
        });
        self.prune(&mut items, 1);

        let root = self.tree.root();
        self.tree.children(root).remove(&mut self.tree);
        let mut fragment = self.tree.instantiate(&items);
        fragment.adopt(&mut self.tree, root, None, None);
        self.cursor.reset(&self.tree, root);
        self.edited = true;
        self.flush();
    }

    /// Parse `latex` and insert it at the cursor, replacing the selection.
    pub fn write_latex(&mut self, latex: &str) -> Result<(), EngineError> {
        let mut items = self.grammar.parse(latex)?;
        self.prune(&mut items, self.cursor.depth(&self.tree));
        self.cursor.delete_selection(&mut self.tree);
        let fragment = self.tree.instantiate(&items);
        self.cursor.insert_fragment(&mut self.tree, fragment);
        self.cursor.notify(Notify::Edit);
        self.edited = true;
        self.flush();
        Ok(())
    }

    /// Type each character of `text` in turn.
    pub fn typed_text(&mut self, text: &str) {
        for ch in text.chars() {
            let changed = self.cursor.write_char(
                &mut self.tree,
                self.grammar.registry(),
                &self.options,
                ch,
            );
            if changed {
                self.cursor.notify(Notify::Edit);
                self.edited = true;
            } else {
                debug!("typed {ch:?} left the field unchanged");
            }
        }
        self.flush();
    }

    /// Handle a key chord such as `"Shift-Left"`. Returns whether the chord
    /// did anything.
    pub fn keystroke(&mut self, chord: &str) -> bool {
        let Some(action) = self.keys.lookup(chord) else {
            debug!("no binding for {chord:?}");
            return false;
        };
        debug!("{chord:?} -> {action:?}");
        let handled = self.perform(action);
        if handled {
            self.surface.scroll_into_view();
        }
        handled
    }

    /// Run one editor action. Returns false only for actions that are
    /// switched off, such as space when it does not behave like Tab.
    pub fn perform(&mut self, action: Action) -> bool {
        let tree = &mut self.tree;
        let cursor = &mut self.cursor;
        match action {
            Action::Move(dir) => cursor.move_dir(tree, dir, self.options.left_right_into_cmd_goes),
            Action::MoveVertically(v) => {
                let layout = MonospaceLayout::compute(tree);
                cursor.move_vertically(tree, &layout, v);
            }
            Action::MoveToBlockEnd(dir) => cursor.move_to_block_end(tree, dir),
            Action::MoveToRootEnd(dir) => cursor.move_to_root_end(tree, dir),
            Action::Select(dir) => cursor.select_dir(tree, dir),
            Action::SelectVertically(dir) => cursor.select_vertically(tree, dir),
            Action::SelectToBlockEnd(dir) => cursor.select_to_block_end(tree, dir),
            Action::SelectToRootEnd(dir) => cursor.select_to_root_end(tree, dir),
            Action::SelectAll => cursor.select_all(tree),
            Action::Delete(dir) => {
                cursor.delete_dir(tree, dir);
                self.edited = true;
            }
            Action::DeleteToBlockEnd(dir) => {
                cursor.ctrl_delete_dir(tree, dir);
                self.edited = true;
            }
            Action::Escape(dir) => cursor.escape_dir(tree, dir),
            Action::Enter => cursor.notice(Notice::Enter),
            Action::Space if self.options.space_behaves_like_tab => {
                cursor.escape_dir(tree, Dir::Right)
            }
            Action::Space => return false,
        }
        self.flush();
        true
    }

    pub fn move_dir(&mut self, dir: Dir) {
        self.perform(Action::Move(dir));
    }

    pub fn move_vertically(&mut self, vertical: Vertical) {
        self.perform(Action::MoveVertically(vertical));
    }

    pub fn select_dir(&mut self, dir: Dir) {
        self.perform(Action::Select(dir));
    }

    pub fn delete_dir(&mut self, dir: Dir) {
        self.perform(Action::Delete(dir));
    }

    pub fn select_all(&mut self) {
        self.perform(Action::SelectAll);
    }

    /// Place the cursor at horizontal position `x` of the monospace layout.
    pub fn seek(&mut self, x: f64) {
        let layout = MonospaceLayout::compute(&self.tree);
        self.seek_with(&layout, x);
    }

    /// Place the cursor at `x` as measured by the display layer.
    pub fn seek_with(&mut self, geometry: &dyn Geometry, x: f64) {
        self.cursor.seek(&self.tree, geometry, x);
        self.flush();
    }

    pub fn latex(&self) -> String {
        self.tree.latex(self.tree.root())
    }

    pub fn text(&self) -> String {
        self.tree.text(self.tree.root())
    }

    pub fn html(&self) -> String {
        self.tree.html(self.tree.root())
    }

    pub fn selection_latex(&self) -> Option<String> {
        self.cursor.selection().map(|s| s.latex(&self.tree))
    }

    /// Forward queued cursor notices to the surface.
    fn flush(&mut self) {
        for notice in self.cursor.take_notices() {
            match notice {
                Notice::Focus(block) => self.surface.focus(block),
                Notice::Blur(block) => self.surface.blur(block),
                Notice::Edge(edge) => {
                    debug!("cursor hit {edge:?}");
                    self.surface.edge(edge);
                }
                Notice::Enter => self.surface.enter(),
            }
        }
        if std::mem::take(&mut self.edited) {
            let root = self.tree.root();
            self.surface.register(root, &self.tree.html(root));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Edge, Recorder, SurfaceEvent};
    use pretty_assertions::assert_eq;

    fn recorded(latex: &str) -> MathField<Recorder> {
        let mut field = MathField::with_surface(Options::default(), Recorder::default());
        field.render_latex_math(latex);
        field.surface_mut().events.clear();
        field
    }

    #[test]
    fn render_then_type_at_the_end() {
        let mut field = MathField::default();
        field.render_latex_math("x^2");
        field.typed_text("+1");
        assert_eq!(field.latex(), "x^2+1");
        assert_eq!(field.text(), "x^2+1");
    }

    #[test]
    fn invalid_render_clears() {
        let mut field = MathField::default();
        field.render_latex_math("a");
        field.render_latex_math("\\frac{");
        assert_eq!(field.latex(), "");
        field.tree().check_invariants().unwrap();
    }

    #[test]
    fn render_prunes_to_max_depth() {
        let options = Options {
            max_depth: Some(2),
            ..Options::default()
        };
        let mut field = MathField::new(options);
        field.render_latex_math("a\\frac{1}{x^2}b");
        assert_eq!(field.latex(), "a\\frac{1}{x}b");
    }

    #[test]
    fn write_latex_replaces_selection() {
        let mut field = MathField::default();
        field.render_latex_math("ab");
        assert!(field.keystroke("Ctrl-A"));
        assert_eq!(field.selection_latex().as_deref(), Some("ab"));
        field.write_latex("\\sqrt{x}").unwrap();
        assert_eq!(field.latex(), "\\sqrt{x}");
        assert_eq!(field.selection_latex(), None);
    }

    #[test]
    fn write_latex_reports_parse_errors() {
        let mut field = MathField::default();
        field.render_latex_math("a");
        let err = field.write_latex("\\frac{").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
        assert_eq!(field.latex(), "a");
    }

    #[test]
    fn keystrokes_reach_the_surface() {
        let mut field = recorded("a");
        assert!(field.keystroke("Right"));
        assert_eq!(
            field.surface().events,
            vec![
                SurfaceEvent::Edge(Edge::MoveOutOf(Dir::Right)),
                SurfaceEvent::ScrollIntoView,
            ]
        );
        assert!(!field.keystroke("F13"));
        assert!(field.keystroke("Enter"));
        assert!(field.surface().events.contains(&SurfaceEvent::Enter));
    }

    #[test]
    fn edits_register_markup() {
        let mut field = recorded("");
        field.typed_text("x");
        let root = field.tree().root();
        assert_eq!(field.surface().events, vec![SurfaceEvent::Register(root)]);
    }

    #[test]
    fn space_is_configurable() {
        let mut field = MathField::default();
        field.render_latex_math("\\sqrt{x}");
        field.keystroke("Left");
        assert!(!field.keystroke("Spacebar"));

        let options = Options {
            space_behaves_like_tab: true,
            ..Options::default()
        };
        let mut field = MathField::new(options);
        field.render_latex_math("\\sqrt{x}");
        field.keystroke("Left");
        assert!(field.keystroke("Spacebar"));
        assert_eq!(field.cursor().parent(), field.tree().root());
        field.typed_text("y");
        assert_eq!(field.latex(), "\\sqrt{x}y");
    }

    #[test]
    fn shift_arrows_select() {
        let mut field = MathField::default();
        field.render_latex_math("abc");
        field.keystroke("Shift-Left");
        field.keystroke("Shift-Left");
        assert_eq!(field.selection_latex().as_deref(), Some("bc"));
        field.keystroke("Backspace");
        assert_eq!(field.latex(), "a");
    }

    #[test]
    fn seek_places_the_cursor() {
        let mut field = MathField::default();
        field.render_latex_math("abc");
        field.seek(0.2);
        field.typed_text("x");
        assert_eq!(field.latex(), "xabc");
    }
}
