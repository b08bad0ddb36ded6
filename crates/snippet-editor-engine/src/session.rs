use crate::editing::{Cmd, Document, HotkeyMap, Operation, Patch, Snapshot};
use crate::error::EditorError;
use crate::lists::{DragResult, DropPlan, IgnoredDrop, SnippetLists};
use crate::models::seed;

/// One editing session: the document with its selection, the two snippet
/// lists, and the hotkey table.
///
/// All input goes through [`EditorSession::apply`]; each command either
/// fully applies or leaves the session as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSession {
    document: Document,
    lists: SnippetLists,
    hotkeys: HotkeyMap,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::welcome()
    }
}

impl EditorSession {
    pub fn new(document: Document, lists: SnippetLists) -> Self {
        Self {
            document,
            lists,
            hotkeys: HotkeyMap::default(),
        }
    }

    /// The welcome document with the standard snippet lists.
    pub fn welcome() -> Self {
        Self::new(
            Document::new(seed::welcome_blocks()),
            SnippetLists::seeded(seed::AVAILABLE_SNIPPETS, seed::SELECTED_SNIPPETS),
        )
    }

    pub fn with_hotkeys(mut self, hotkeys: HotkeyMap) -> Self {
        self.hotkeys = hotkeys;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn lists(&self) -> &SnippetLists {
        &self.lists
    }

    pub fn hotkeys(&self) -> &HotkeyMap {
        &self.hotkeys
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(&self.document, &self.lists)
    }

    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditorError> {
        log::debug!("applying {cmd:?} at version {}", self.document.version());
        let mut lists_changed = false;
        let operations = match cmd {
            Cmd::ToggleMark { mark } => self.document.toggle_mark(mark)?,
            Cmd::ToggleBlock { kind } => self.document.toggle_block(kind)?,
            Cmd::Hotkey { combo } => match self.hotkeys.resolve(&combo) {
                Some(mark) => self.document.toggle_mark(mark)?,
                None => {
                    log::warn!("no mark bound to hotkey {combo:?}");
                    Vec::new()
                }
            },
            Cmd::Drop { result } => {
                let (operations, changed) = self.handle_drop(&result)?;
                lists_changed = changed;
                operations
            }
            Cmd::Select { range } => self.document.select(range)?,
            Cmd::Deselect => self.document.deselect()?,
            Cmd::Move { forward, extend } => self.document.move_selection(forward, extend)?,
            Cmd::InsertText { text } => self.document.insert_text(&text)?,
            Cmd::InsertBreak => self.document.insert_break()?,
            Cmd::DeleteBackward => self.document.delete_backward()?,
        };
        Ok(Patch {
            version: self.document.version(),
            operations,
            selection: self.document.selection().cloned(),
            lists_changed,
        })
    }

    /// Carry out a finished drag. Returns the document operations and
    /// whether the lists changed.
    fn handle_drop(&mut self, result: &DragResult) -> Result<(Vec<Operation>, bool), EditorError> {
        match self.lists.plan(result)? {
            DropPlan::Ignore(IgnoredDrop::NoDestination) => {
                log::debug!("{} dropped outside every target", result.draggable_id);
                Ok((Vec::new(), false))
            }
            DropPlan::Ignore(reason) => {
                log::warn!("ignoring drop of {}: {reason:?}", result.draggable_id);
                Ok((Vec::new(), false))
            }
            DropPlan::Lists { items, selected } => {
                self.lists.commit(items, selected);
                Ok((Vec::new(), true))
            }
            DropPlan::Insert(payload) => Ok((self.document.insert_content(payload)?, false)),
        }
    }
}
