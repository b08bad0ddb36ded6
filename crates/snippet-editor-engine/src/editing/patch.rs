use serde::Serialize;

use crate::editing::Operation;
use crate::models::Range;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patch {
    /// Document version after the command.
    pub version: u64,
    /// Primitive operations committed to the document, in order.
    pub operations: Vec<Operation>,
    pub selection: Option<Range>,
    pub lists_changed: bool,
}

impl Patch {
    /// True when neither the document nor the lists changed.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && !self.lists_changed
    }
}
