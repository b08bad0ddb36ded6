use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::lists::DragResult;
use crate::models::{ElementKind, Mark, Range};

/// Commands the input layer sends to an [`crate::EditorSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Cmd {
    ToggleMark {
        mark: Mark,
    },
    ToggleBlock {
        kind: ElementKind,
    },
    /// A key combination already resolved to a name such as `mod+b`.
    Hotkey {
        combo: String,
    },
    Drop {
        result: DragResult,
    },
    Select {
        range: Range,
    },
    Deselect,
    Move {
        forward: bool,
        extend: bool,
    },
    InsertText {
        text: String,
    },
    InsertBreak,
    DeleteBackward,
}

/// Hotkey names mapped to the mark they toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyMap {
    bindings: BTreeMap<String, Mark>,
}

impl Default for HotkeyMap {
    fn default() -> Self {
        Self {
            bindings: BTreeMap::from([
                ("mod+b".to_string(), Mark::Bold),
                ("mod+i".to_string(), Mark::Italic),
                ("mod+u".to_string(), Mark::Underline),
                ("mod+`".to_string(), Mark::Code),
            ]),
        }
    }
}

impl HotkeyMap {
    /// Build from `combo -> mark name` pairs, as found in configuration.
    pub fn from_names<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, EditorError> {
        let mut bindings = BTreeMap::new();
        for (combo, mark) in pairs {
            bindings.insert(normalize_combo(combo), mark.parse::<Mark>()?);
        }
        Ok(Self { bindings })
    }

    pub fn resolve(&self, combo: &str) -> Option<Mark> {
        self.bindings.get(&normalize_combo(combo)).copied()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, Mark)> {
        self.bindings
            .iter()
            .map(|(combo, mark)| (combo.as_str(), *mark))
    }
}

fn normalize_combo(combo: &str) -> String {
    combo.trim().to_lowercase()
}
