use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use snippet_editor_engine::editing::snapshot::TOOLBAR_BLOCKS;
use snippet_editor_engine::lists::DropTarget;
use snippet_editor_engine::{Cmd, DragResult, DraggableLocation, EditorSession, ListId, Range};

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    List(ListId),
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Editor => Focus::List(ListId::Items),
            Focus::List(ListId::Items) => Focus::List(ListId::Selected),
            Focus::List(ListId::Selected) => Focus::Editor,
        }
    }
}

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    CycleFocus,
    Focus(Focus),
    Highlight(ListId, usize),
    Apply(Cmd),
    Nothing,
}

pub struct App {
    pub session: EditorSession,
    pub focus: Focus,
    pub items_state: ListState,
    pub selected_state: ListState,
    pub status: String,
}

impl App {
    pub fn new(session: EditorSession) -> Self {
        Self {
            session,
            focus: Focus::Editor,
            items_state: ListState::default().with_selected(Some(0)),
            selected_state: ListState::default().with_selected(Some(0)),
            status: String::new(),
        }
    }

    pub fn list_state_mut(&mut self, list: ListId) -> &mut ListState {
        match list {
            ListId::Items => &mut self.items_state,
            ListId::Selected => &mut self.selected_state,
        }
    }

    /// The highlighted row of `list`, clamped to its length.
    pub fn highlighted(&self, list: ListId) -> Option<usize> {
        let len = self.session.lists().list(list).len();
        let state = match list {
            ListId::Items => &self.items_state,
            ListId::Selected => &self.selected_state,
        };
        (len > 0).then(|| state.selected().unwrap_or(0).min(len - 1))
    }

    /// Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.action_for(key) {
            Action::Quit => return true,
            Action::CycleFocus => self.focus = self.focus.next(),
            Action::Focus(focus) => self.focus = focus,
            Action::Highlight(list, index) => {
                self.list_state_mut(list).select(Some(index));
            }
            Action::Apply(cmd) => self.apply(cmd),
            Action::Nothing => {}
        }
        false
    }

    pub fn action_for(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char(c) => Action::Apply(Cmd::Hotkey {
                    combo: format!("mod+{}", c.to_ascii_lowercase()),
                }),
                _ => Action::Nothing,
            };
        }
        match key.code {
            KeyCode::Tab => Action::CycleFocus,
            KeyCode::F(n) if (2..=6).contains(&n) => Action::Apply(Cmd::ToggleBlock {
                kind: TOOLBAR_BLOCKS[usize::from(n - 2)].clone(),
            }),
            _ => match self.focus {
                Focus::Editor => self.editor_action(key),
                Focus::List(list) => self.list_action(list, key),
            },
        }
    }

    fn editor_action(&self, key: KeyEvent) -> Action {
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Esc => Action::Apply(Cmd::Deselect),
            KeyCode::Left => self.movement(false, extend),
            KeyCode::Right => self.movement(true, extend),
            KeyCode::Enter => Action::Apply(Cmd::InsertBreak),
            KeyCode::Backspace => Action::Apply(Cmd::DeleteBackward),
            KeyCode::Char(c) => Action::Apply(Cmd::InsertText {
                text: c.to_string(),
            }),
            _ => Action::Nothing,
        }
    }

    /// Arrow keys move the cursor; with no cursor yet they place one at the
    /// end of the document.
    fn movement(&self, forward: bool, extend: bool) -> Action {
        let doc = self.session.document();
        if doc.selection().is_some() {
            return Action::Apply(Cmd::Move { forward, extend });
        }
        match doc.end() {
            Some(end) => Action::Apply(Cmd::Select {
                range: Range::collapsed(end),
            }),
            None => Action::Nothing,
        }
    }

    fn list_action(&self, list: ListId, key: KeyEvent) -> Action {
        if key.code == KeyCode::Esc {
            return Action::Focus(Focus::Editor);
        }
        let Some(index) = self.highlighted(list) else {
            return Action::Nothing;
        };
        let lists = self.session.lists();
        let droppables = lists.droppables();
        let len = lists.list(list).len();
        let id = lists.list(list)[index].id.clone();
        let drag = |destination: Option<DraggableLocation>| {
            Action::Apply(Cmd::Drop {
                result: DragResult {
                    draggable_id: id.clone(),
                    source: DraggableLocation::new(droppables.id_of(list), index),
                    destination,
                },
            })
        };
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Up if shift && index > 0 => {
                drag(Some(DraggableLocation::new(droppables.id_of(list), index - 1)))
            }
            KeyCode::Down if shift && index + 1 < len => {
                drag(Some(DraggableLocation::new(droppables.id_of(list), index + 1)))
            }
            KeyCode::Up => Action::Highlight(list, index.saturating_sub(1)),
            KeyCode::Down => Action::Highlight(list, (index + 1).min(len - 1)),
            KeyCode::Char('m') => {
                let other = list.other();
                let end = lists.list(other).len();
                drag(Some(DraggableLocation::new(droppables.id_of(other), end)))
            }
            KeyCode::Enter => drag(Some(DraggableLocation::new(droppables.editor.as_str(), 0))),
            _ => Action::Nothing,
        }
    }

    fn apply(&mut self, cmd: Cmd) {
        let follow = match &cmd {
            Cmd::Drop {
                result:
                    DragResult {
                        destination: Some(destination),
                        ..
                    },
            } => match self
                .session
                .lists()
                .droppables()
                .resolve(&destination.droppable_id)
            {
                Some(DropTarget::List(list)) => Some((list, destination.index)),
                _ => None,
            },
            _ => None,
        };
        match self.session.apply(cmd) {
            Ok(patch) => {
                self.status = format!(
                    "version {} | {} operations",
                    patch.version,
                    patch.operations.len()
                );
                if patch.lists_changed
                    && let Some((list, index)) = follow
                {
                    self.focus = Focus::List(list);
                    self.list_state_mut(list).select(Some(index));
                }
            }
            Err(e) => {
                log::error!("command failed: {e}");
                self.status = format!("error: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use snippet_editor_engine::{Document, Element, ElementKind, SnippetLists};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(text: &str, items: usize) -> App {
        App::new(EditorSession::new(
            Document::new(vec![Element::paragraph(text)]),
            SnippetLists::seeded(items, 0),
        ))
    }

    fn item_ids(app: &App, list: ListId) -> Vec<String> {
        app.session
            .lists()
            .list(list)
            .iter()
            .map(|item| item.id.clone())
            .collect()
    }

    #[test]
    fn test_first_arrow_places_cursor_then_typing_inserts() {
        let mut app = app("ab", 0);
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.session.document().text(), "abc");
    }

    #[test]
    fn test_control_chords_map_to_hotkeys_and_quit() {
        let app = app("", 0);
        assert_eq!(
            app.action_for(KeyEvent::new(KeyCode::Char('B'), KeyModifiers::CONTROL)),
            Action::Apply(Cmd::Hotkey {
                combo: "mod+b".to_string()
            })
        );
        assert_eq!(
            app.action_for(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_function_keys_toggle_toolbar_blocks() {
        let app = app("", 0);
        assert_eq!(
            app.action_for(key(KeyCode::F(2))),
            Action::Apply(Cmd::ToggleBlock {
                kind: ElementKind::HeadingOne
            })
        );
        assert_eq!(
            app.action_for(key(KeyCode::F(6))),
            Action::Apply(Cmd::ToggleBlock {
                kind: ElementKind::BulletedList
            })
        );
        assert_eq!(app.action_for(key(KeyCode::F(7))), Action::Nothing);
    }

    #[test]
    fn test_shift_down_reorders_and_highlight_follows() {
        let mut app = app("", 3);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT));
        assert_eq!(item_ids(&app, ListId::Items), vec!["item-1", "item-0", "item-2"]);
        assert_eq!(app.highlighted(ListId::Items), Some(1));
    }

    #[test]
    fn test_m_moves_item_to_the_other_list() {
        let mut app = app("", 2);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(item_ids(&app, ListId::Items), vec!["item-1"]);
        assert_eq!(item_ids(&app, ListId::Selected), vec!["item-0"]);
        assert_eq!(app.focus, Focus::List(ListId::Selected));
    }

    #[test]
    fn test_enter_in_list_drops_into_editor() {
        let mut app = app("start", 1);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        let doc = app.session.document();
        assert_eq!(doc.children().len(), 2);
        assert_eq!(doc.children()[1].text(), "<span>item 0</span>");
        assert_eq!(app.focus, Focus::List(ListId::Items));
    }

    #[test]
    fn test_empty_list_ignores_keys() {
        let mut app = app("", 0);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.action_for(key(KeyCode::Enter)), Action::Nothing);
        assert_eq!(app.action_for(key(KeyCode::Esc)), Action::Focus(Focus::Editor));
    }
}
