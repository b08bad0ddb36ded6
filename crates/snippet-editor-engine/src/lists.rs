//! Snippet lists and drag-and-drop reconciliation.
//!
//! Two ordered lists of [`DragItem`]s sit beside the editor. A finished drag
//! arrives as a [`DragResult`]; [`SnippetLists::plan`] decides what it means
//! without touching any state, and the session then commits the plan. The
//! list arithmetic itself ([`reorder`], [`move_between`]) is pure.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::models::Element;

/// A reorderable snippet. `content` is inserted into the document verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragItem {
    pub id: String,
    pub content: String,
}

impl DragItem {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    /// `count` items numbered from `offset`: ids `item-N`, content
    /// `<span>item N</span>`.
    pub fn numbered(count: usize, offset: usize) -> Vec<DragItem> {
        (offset..offset + count)
            .map(|n| DragItem::new(format!("item-{n}"), format!("<span>item {n}</span>")))
            .collect()
    }

    /// The inline node a drop on the editor inserts.
    pub fn payload(&self) -> Element {
        Element::inline_text(self.content.clone())
    }
}

/// Which snippet list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListId {
    Items,
    Selected,
}

impl ListId {
    pub fn name(&self) -> &'static str {
        match self {
            ListId::Items => "items",
            ListId::Selected => "selected",
        }
    }

    pub fn other(&self) -> ListId {
        match self {
            ListId::Items => ListId::Selected,
            ListId::Selected => ListId::Items,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraggableLocation {
    pub droppable_id: String,
    pub index: usize,
}

impl DraggableLocation {
    pub fn new(droppable_id: impl Into<String>, index: usize) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }
}

/// The outcome of a drag gesture, as delivered by the input layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResult {
    pub draggable_id: String,
    pub source: DraggableLocation,
    /// `None` when the item was dropped outside every target.
    pub destination: Option<DraggableLocation>,
}

/// Where a droppable id points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    List(ListId),
    Editor,
}

/// Droppable ids the input layer uses for each target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Droppables {
    pub items: String,
    pub selected: String,
    pub editor: String,
}

impl Default for Droppables {
    fn default() -> Self {
        Self {
            items: "droppable".to_string(),
            selected: "droppable2".to_string(),
            editor: "editor".to_string(),
        }
    }
}

impl Droppables {
    pub fn resolve(&self, droppable_id: &str) -> Option<DropTarget> {
        if droppable_id == self.items {
            Some(DropTarget::List(ListId::Items))
        } else if droppable_id == self.selected {
            Some(DropTarget::List(ListId::Selected))
        } else if droppable_id == self.editor {
            Some(DropTarget::Editor)
        } else {
            None
        }
    }

    pub fn id_of(&self, list: ListId) -> &str {
        match list {
            ListId::Items => &self.items,
            ListId::Selected => &self.selected,
        }
    }
}

/// Why a drop changed nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoredDrop {
    NoDestination,
    UnknownDroppable(String),
    UnknownItem(String),
    /// Dragged out of the editor, which is not a list.
    FromEditor,
}

/// What a drop should do, decided before anything changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropPlan {
    Ignore(IgnoredDrop),
    /// Replace both lists with these.
    Lists {
        items: Vec<DragItem>,
        selected: Vec<DragItem>,
    },
    /// Insert this payload into the document; the lists stay as they are.
    Insert(Element),
}

/// Move the element at `from` so it ends up at `to`.
///
/// Returns `None` when either index is outside the list.
pub fn reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from >= list.len() || to >= list.len() {
        return None;
    }
    let mut result = list.to_vec();
    let item = result.remove(from);
    result.insert(to, item);
    Some(result)
}

/// Take the element at `source_index` out of `source` and put it at
/// `dest_index` in `dest`. Returns the new `(source, dest)`.
///
/// Returns `None` when either index is outside its list.
pub fn move_between<T: Clone>(
    source: &[T],
    dest: &[T],
    source_index: usize,
    dest_index: usize,
) -> Option<(Vec<T>, Vec<T>)> {
    if source_index >= source.len() || dest_index > dest.len() {
        return None;
    }
    let mut source = source.to_vec();
    let mut dest = dest.to_vec();
    let item = source.remove(source_index);
    dest.insert(dest_index, item);
    Some((source, dest))
}

/// The two snippet lists beside the editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SnippetLists {
    items: Vec<DragItem>,
    selected: Vec<DragItem>,
    #[serde(skip)]
    droppables: Droppables,
}

impl SnippetLists {
    pub fn new(items: Vec<DragItem>, selected: Vec<DragItem>) -> Self {
        Self {
            items,
            selected,
            droppables: Droppables::default(),
        }
    }

    /// `available` numbered items in `items`, the next `selected` in
    /// `selected`.
    pub fn seeded(available: usize, selected: usize) -> Self {
        Self::new(
            DragItem::numbered(available, 0),
            DragItem::numbered(selected, available),
        )
    }

    pub fn with_droppables(mut self, droppables: Droppables) -> Self {
        self.droppables = droppables;
        self
    }

    pub fn droppables(&self) -> &Droppables {
        &self.droppables
    }

    pub fn items(&self) -> &[DragItem] {
        &self.items
    }

    pub fn selected(&self) -> &[DragItem] {
        &self.selected
    }

    pub fn list(&self, id: ListId) -> &[DragItem] {
        match id {
            ListId::Items => &self.items,
            ListId::Selected => &self.selected,
        }
    }

    /// Look an item up by id in either list.
    pub fn find(&self, id: &str) -> Option<&DragItem> {
        self.items
            .iter()
            .chain(self.selected.iter())
            .find(|item| item.id == id)
    }

    /// Decide what `result` does. Indices outside a list are an error; drops
    /// nowhere, on unknown targets, or of unknown items are ignored.
    pub fn plan(&self, result: &DragResult) -> Result<DropPlan, EditorError> {
        let Some(destination) = &result.destination else {
            return Ok(DropPlan::Ignore(IgnoredDrop::NoDestination));
        };
        let Some(target) = self.droppables.resolve(&destination.droppable_id) else {
            return Ok(DropPlan::Ignore(IgnoredDrop::UnknownDroppable(
                destination.droppable_id.clone(),
            )));
        };

        let dest = match target {
            DropTarget::List(dest) => dest,
            DropTarget::Editor => {
                return Ok(match self.find(&result.draggable_id) {
                    Some(item) => DropPlan::Insert(item.payload()),
                    None => {
                        DropPlan::Ignore(IgnoredDrop::UnknownItem(result.draggable_id.clone()))
                    }
                });
            }
        };
        let source = match self.droppables.resolve(&result.source.droppable_id) {
            Some(DropTarget::List(source)) => source,
            Some(DropTarget::Editor) => return Ok(DropPlan::Ignore(IgnoredDrop::FromEditor)),
            None => {
                return Ok(DropPlan::Ignore(IgnoredDrop::UnknownDroppable(
                    result.source.droppable_id.clone(),
                )));
            }
        };

        let from = result.source.index;
        let to = destination.index;
        let (items, selected) = if source == dest {
            let list = self.list(source);
            let reordered = reorder(list, from, to)
                .ok_or_else(|| index_error(source, from.max(to), list.len()))?;
            match source {
                ListId::Items => (reordered, self.selected.clone()),
                ListId::Selected => (self.items.clone(), reordered),
            }
        } else {
            let (source_list, dest_list) = (self.list(source), self.list(dest));
            let (source_after, dest_after) = move_between(source_list, dest_list, from, to)
                .ok_or_else(|| {
                    if from >= source_list.len() {
                        index_error(source, from, source_list.len())
                    } else {
                        index_error(dest, to, dest_list.len())
                    }
                })?;
            match source {
                ListId::Items => (source_after, dest_after),
                ListId::Selected => (dest_after, source_after),
            }
        };
        Ok(DropPlan::Lists { items, selected })
    }

    /// Replace both lists.
    pub(crate) fn commit(&mut self, items: Vec<DragItem>, selected: Vec<DragItem>) {
        self.items = items;
        self.selected = selected;
    }
}

fn index_error(list: ListId, index: usize, len: usize) -> EditorError {
    EditorError::ListIndexOutOfRange {
        list: list.name().to_string(),
        index,
        len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drag(id: &str, from: (&str, usize), to: Option<(&str, usize)>) -> DragResult {
        DragResult {
            draggable_id: id.to_string(),
            source: DraggableLocation::new(from.0, from.1),
            destination: to.map(|(droppable, index)| DraggableLocation::new(droppable, index)),
        }
    }

    #[test]
    fn test_reorder() {
        assert_eq!(reorder(&["a", "b", "c"], 0, 2), Some(vec!["b", "c", "a"]));
        assert_eq!(reorder(&["a", "b", "c"], 2, 0), Some(vec!["c", "a", "b"]));
        assert_eq!(reorder(&["a", "b", "c"], 1, 1), Some(vec!["a", "b", "c"]));
        assert_eq!(reorder(&["a", "b", "c"], 3, 0), None);
        assert_eq!(reorder(&["a", "b", "c"], 0, 3), None);
    }

    #[test]
    fn test_move_between() {
        let empty: [&str; 0] = [];
        assert_eq!(
            move_between(&["x", "y"], &empty, 0, 0),
            Some((vec!["y"], vec!["x"]))
        );
        assert_eq!(move_between(&["x"], &["a", "b"], 0, 2), Some((vec![], vec!["a", "b", "x"])));
        assert_eq!(move_between(&["x"], &["a"], 1, 0), None);
        assert_eq!(move_between(&["x"], &["a"], 0, 2), None);
    }

    #[test]
    fn test_seeded_lists_match_welcome_layout() {
        let lists = SnippetLists::seeded(10, 5);
        assert_eq!(lists.items().len(), 10);
        assert_eq!(lists.selected()[0], DragItem::new("item-10", "<span>item 10</span>"));
        assert_eq!(lists.find("item-14").unwrap().content, "<span>item 14</span>");
    }

    #[test]
    fn test_plan_reorder_within_selected_list() {
        let lists = SnippetLists::seeded(2, 3);
        let plan = lists
            .plan(&drag("item-2", ("droppable2", 0), Some(("droppable2", 2))))
            .unwrap();
        let DropPlan::Lists { items, selected } = plan else {
            panic!("expected a list change, got {plan:?}");
        };
        assert_eq!(items, lists.items());
        let ids: Vec<&str> = selected.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["item-3", "item-4", "item-2"]);
    }

    #[test]
    fn test_plan_move_from_selected_to_items() {
        let lists = SnippetLists::seeded(1, 1);
        let plan = lists
            .plan(&drag("item-1", ("droppable2", 0), Some(("droppable", 0))))
            .unwrap();
        assert_eq!(
            plan,
            DropPlan::Lists {
                items: vec![
                    DragItem::new("item-1", "<span>item 1</span>"),
                    DragItem::new("item-0", "<span>item 0</span>"),
                ],
                selected: vec![],
            }
        );
    }

    #[test]
    fn test_plan_ignores_unknown_targets_and_missing_destination() {
        let lists = SnippetLists::seeded(2, 2);
        assert_eq!(
            lists.plan(&drag("item-0", ("droppable", 0), None)).unwrap(),
            DropPlan::Ignore(IgnoredDrop::NoDestination)
        );
        assert_eq!(
            lists
                .plan(&drag("item-0", ("droppable", 0), Some(("trash", 0))))
                .unwrap(),
            DropPlan::Ignore(IgnoredDrop::UnknownDroppable("trash".to_string()))
        );
        assert_eq!(
            lists
                .plan(&drag("ghost", ("droppable", 0), Some(("editor", 0))))
                .unwrap(),
            DropPlan::Ignore(IgnoredDrop::UnknownItem("ghost".to_string()))
        );
    }

    #[test]
    fn test_plan_on_editor_builds_literal_payload() {
        let lists = SnippetLists::new(vec![DragItem::new("item3", "<section>3</section>")], vec![]);
        let plan = lists
            .plan(&drag("item3", ("droppable", 0), Some(("editor", 0))))
            .unwrap();
        assert_eq!(plan, DropPlan::Insert(Element::inline_text("<section>3</section>")));
    }

    #[test]
    fn test_plan_rejects_out_of_range_index() {
        let lists = SnippetLists::seeded(2, 0);
        assert_eq!(
            lists.plan(&drag("item-0", ("droppable", 0), Some(("droppable", 5)))),
            Err(EditorError::ListIndexOutOfRange {
                list: "items".to_string(),
                index: 5,
                len: 2,
            })
        );
    }

    #[test]
    fn test_drag_result_uses_input_layer_field_names() {
        let json = r#"{"draggableId":"item-1","source":{"droppableId":"droppable","index":1},"destination":null}"#;
        let result: DragResult = serde_json::from_str(json).unwrap();
        assert_eq!(result, drag("item-1", ("droppable", 1), None));
    }
}
