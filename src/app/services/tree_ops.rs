//! Immutable editing operations on a component's layer tree.
//!
//! Every mutation returns a rebuilt tree instead of editing in place:
//! ancestors of the touched node are new values, untouched siblings move
//! over unchanged. Past document states captured by the action log
//! therefore stay valid without defensive copying.

use crate::app::domain::Layer;
use crate::app::error::{EngineError, Result};

/// Target slot for an insertion: the container to insert into and the
/// offset among its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPosition {
    pub parent_id: String,
    pub position: usize,
}

impl InsertPosition {
    pub fn new(parent_id: impl Into<String>, position: usize) -> Self {
        Self { parent_id: parent_id.into(), position }
    }
}

/// One row of a flattened layer tree: the layer, the index of its parent
/// row (if any), and its nesting depth (root = 0).
#[derive(Debug, Clone, Copy)]
pub struct FlatLayerItem<'a> {
    pub layer: &'a Layer,
    pub parent: Option<usize>,
    pub depth: usize,
}

/// Depth-first search for a layer id. Absence is `NotFound`; callers
/// decide whether that is an error in their context.
pub fn find_layer_by_id<'a>(root: &'a Layer, id: &str) -> Result<&'a Layer> {
    find_in(root, id).ok_or_else(|| EngineError::NotFound(format!("layer {id}")))
}

fn find_in<'a>(root: &'a Layer, id: &str) -> Option<&'a Layer> {
    if root.id() == id {
        return Some(root);
    }
    root.children().iter().find_map(|child| find_in(child, id))
}

/// Replace the subtree whose root carries `replacement`'s id.
///
/// The matched node is swapped for `replacement` wholesale (subtree swap);
/// every ancestor container is rebuilt. With no current root the
/// replacement becomes the root. A tree with no matching id comes back
/// unchanged.
pub fn update_layer(root: Option<Layer>, replacement: Layer) -> Layer {
    match root {
        None => replacement,
        Some(layer) => replace_in(layer, &replacement),
    }
}

fn replace_in(layer: Layer, replacement: &Layer) -> Layer {
    if layer.id() == replacement.id() {
        return replacement.clone();
    }
    match layer {
        Layer::Container(mut container) => {
            container.children = container
                .children
                .into_iter()
                .map(|child| replace_in(child, replacement))
                .collect();
            Layer::Container(container)
        }
        other => other,
    }
}

/// Remove the layer with `target_id` wherever it occurs, rebuilding every
/// ancestor container without it. Returns `None` only when the root itself
/// was deleted.
pub fn delete_layer(root: Layer, target_id: &str) -> Option<Layer> {
    if root.id() == target_id {
        return None;
    }
    match root {
        Layer::Container(mut container) => {
            container.children = container
                .children
                .into_iter()
                .filter_map(|child| delete_layer(child, target_id))
                .collect();
            Some(Layer::Container(container))
        }
        other => Some(other),
    }
}

/// Insert `node` into the children of the container named by `position`,
/// clamping the offset into `[0, children.len()]`.
///
/// Fails with `InvalidParent` when the parent id names a non-container or
/// is absent from the tree.
pub fn insert_layer(root: Layer, node: Layer, position: &InsertPosition) -> Result<Layer> {
    let mut pending = Some(node);
    let tree = insert_in(root, &mut pending, position)?;
    if pending.is_some() {
        return Err(EngineError::InvalidParent(format!(
            "no layer {} in the tree",
            position.parent_id
        )));
    }
    Ok(tree)
}

fn insert_in(root: Layer, node: &mut Option<Layer>, position: &InsertPosition) -> Result<Layer> {
    match root {
        Layer::Container(mut container) => {
            if container.id == position.parent_id {
                if let Some(node) = node.take() {
                    let index = position.position.min(container.children.len());
                    container.children.insert(index, node);
                }
                return Ok(Layer::Container(container));
            }
            let children = std::mem::take(&mut container.children);
            container.children = children
                .into_iter()
                .map(|child| insert_in(child, node, position))
                .collect::<Result<_>>()?;
            Ok(Layer::Container(container))
        }
        other => {
            if other.id() == position.parent_id {
                return Err(EngineError::InvalidParent(format!(
                    "layer {} is not a container",
                    position.parent_id
                )));
            }
            Ok(other)
        }
    }
}

/// Delete `layer_id` from the tree and re-insert it at `position`.
///
/// Fails with `EmptyTreeAfterDelete` when the node is the root itself —
/// moving the root is not a valid move.
pub fn move_layer(root: Layer, layer_id: &str, position: &InsertPosition) -> Result<Layer> {
    let node = find_layer_by_id(&root, layer_id)?.clone();
    let remaining = delete_layer(root, layer_id).ok_or(EngineError::EmptyTreeAfterDelete)?;
    insert_layer(remaining, node, position)
}

/// Pre-order flattening: a container row precedes its children, children
/// keep their array order. Rows record their parent row index and depth so
/// drag code can walk ancestor chains without stored back-pointers.
///
/// The result is a snapshot: it is recomputed from the tree after every
/// edit, never maintained incrementally.
pub fn flatten_layer(root: Option<&Layer>) -> Vec<FlatLayerItem<'_>> {
    let mut items = Vec::new();
    if let Some(layer) = root {
        push_flat(layer, None, 0, &mut items);
    }
    items
}

fn push_flat<'a>(
    layer: &'a Layer,
    parent: Option<usize>,
    depth: usize,
    out: &mut Vec<FlatLayerItem<'a>>,
) {
    out.push(FlatLayerItem { layer, parent, depth });
    let index = out.len() - 1;
    for child in layer.children() {
        push_flat(child, Some(index), depth + 1, out);
    }
}

/// Add `new_layer` under the currently selected container.
///
/// With no existing root the new layer becomes the root regardless of
/// selection. Otherwise a container must be selected; `new_layer` is
/// appended to its children. A missing selection or a selected leaf is
/// `InvalidTarget`.
pub fn add_layer_under_selection(
    root: Option<Layer>,
    selected_id: Option<&str>,
    new_layer: Layer,
) -> Result<Layer> {
    let Some(root) = root else {
        return Ok(new_layer);
    };
    let Some(selected_id) = selected_id else {
        return Err(EngineError::InvalidTarget(
            "no layer selected to insert under".to_string(),
        ));
    };
    match find_layer_by_id(&root, selected_id)? {
        Layer::Container(container) => {
            let mut updated = container.clone();
            updated.children.push(new_layer);
            Ok(update_layer(Some(root), Layer::Container(updated)))
        }
        _ => Err(EngineError::InvalidTarget(format!(
            "layer {selected_id} cannot have children"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::LayerType;
    use crate::app::state::Project;

    fn container(id: &str, children: Vec<Layer>) -> Layer {
        let Layer::Container(mut c) = Project::default()
            .make_layer(LayerType::Container, id, None)
            .unwrap()
        else {
            unreachable!()
        };
        c.children = children;
        Layer::Container(c)
    }

    fn text(id: &str) -> Layer {
        Project::default().make_layer(LayerType::Text, id, None).unwrap()
    }

    /// root ├─ a ├─ a1
    ///      │    └─ a2
    ///      └─ b
    fn fixture() -> Layer {
        container(
            "root",
            vec![container("a", vec![text("a1"), text("a2")]), text("b")],
        )
    }

    #[test]
    fn test_find_layer_by_id() {
        let tree = fixture();
        assert_eq!(find_layer_by_id(&tree, "a2").unwrap().id(), "a2");
        assert_eq!(find_layer_by_id(&tree, "root").unwrap().id(), "root");
        assert_eq!(
            find_layer_by_id(&tree, "missing"),
            Err(EngineError::NotFound("layer missing".to_string()))
        );
    }

    #[test]
    fn test_update_layer_swaps_subtree() {
        let tree = fixture();
        let updated = update_layer(Some(tree), text("a"));
        // the whole "a" container (including a1/a2) became a text leaf
        let a = find_layer_by_id(&updated, "a").unwrap();
        assert!(!a.is_container());
        assert!(find_layer_by_id(&updated, "a1").is_err());
        // unrelated sibling survives
        assert!(find_layer_by_id(&updated, "b").is_ok());
    }

    #[test]
    fn test_update_layer_without_root() {
        let updated = update_layer(None, text("t"));
        assert_eq!(updated.id(), "t");
    }

    #[test]
    fn test_update_layer_no_match_leaves_tree_unchanged() {
        let tree = fixture();
        let updated = update_layer(Some(tree.clone()), text("unknown"));
        assert_eq!(updated, tree);
    }

    #[test]
    fn test_delete_layer_root() {
        assert!(delete_layer(fixture(), "root").is_none());
    }

    #[test]
    fn test_delete_layer_nested() {
        let updated = delete_layer(fixture(), "a1").unwrap();
        assert!(find_layer_by_id(&updated, "a1").is_err());
        let a = find_layer_by_id(&updated, "a").unwrap();
        assert_eq!(a.children().len(), 1);
        assert_eq!(a.children()[0].id(), "a2");
    }

    #[test]
    fn test_insert_layer_at_offset() {
        let updated =
            insert_layer(fixture(), text("new"), &InsertPosition::new("a", 1)).unwrap();
        let a = find_layer_by_id(&updated, "a").unwrap();
        let ids: Vec<&str> = a.children().iter().map(Layer::id).collect();
        assert_eq!(ids, vec!["a1", "new", "a2"]);
    }

    #[test]
    fn test_insert_layer_clamps_offset() {
        let updated =
            insert_layer(fixture(), text("new"), &InsertPosition::new("a", 99)).unwrap();
        let a = find_layer_by_id(&updated, "a").unwrap();
        assert_eq!(a.children().last().unwrap().id(), "new");
    }

    #[test]
    fn test_insert_layer_into_leaf_fails() {
        let result = insert_layer(fixture(), text("new"), &InsertPosition::new("b", 0));
        assert_eq!(
            result,
            Err(EngineError::InvalidParent("layer b is not a container".to_string()))
        );
    }

    #[test]
    fn test_insert_layer_unknown_parent_fails() {
        let result = insert_layer(fixture(), text("new"), &InsertPosition::new("ghost", 0));
        assert_eq!(
            result,
            Err(EngineError::InvalidParent("no layer ghost in the tree".to_string()))
        );
    }

    #[test]
    fn test_move_layer() {
        let updated = move_layer(fixture(), "b", &InsertPosition::new("a", 0)).unwrap();
        let a = find_layer_by_id(&updated, "a").unwrap();
        let ids: Vec<&str> = a.children().iter().map(Layer::id).collect();
        assert_eq!(ids, vec!["b", "a1", "a2"]);
        assert_eq!(updated.children().len(), 1);
    }

    #[test]
    fn test_move_layer_root_fails() {
        let result = move_layer(fixture(), "root", &InsertPosition::new("a", 0));
        assert_eq!(result, Err(EngineError::EmptyTreeAfterDelete));
    }

    #[test]
    fn test_move_layer_missing_node_fails() {
        let result = move_layer(fixture(), "ghost", &InsertPosition::new("a", 0));
        assert_eq!(result, Err(EngineError::NotFound("layer ghost".to_string())));
    }

    #[test]
    fn test_delete_then_insert_round_trips() {
        // Removing a node and putting it back leaves it structurally equal
        let tree = fixture();
        let original = find_layer_by_id(&tree, "a2").unwrap().clone();
        let without = delete_layer(tree, "a2").unwrap();
        let restored =
            insert_layer(without, original.clone(), &InsertPosition::new("a", 1)).unwrap();
        assert_eq!(find_layer_by_id(&restored, "a2").unwrap(), &original);
    }

    #[test]
    fn test_flatten_layer_pre_order() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        let ids: Vec<&str> = items.iter().map(|item| item.layer.id()).collect();
        assert_eq!(ids, vec!["root", "a", "a1", "a2", "b"]);

        let depths: Vec<usize> = items.iter().map(|item| item.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 2, 1]);

        let parents: Vec<Option<usize>> = items.iter().map(|item| item.parent).collect();
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(1), Some(0)]);
    }

    #[test]
    fn test_flatten_layer_empty() {
        assert!(flatten_layer(None).is_empty());
    }

    #[test]
    fn test_add_layer_under_selection_becomes_root() {
        let added = add_layer_under_selection(None, None, text("t")).unwrap();
        assert_eq!(added.id(), "t");
    }

    #[test]
    fn test_add_layer_under_selection_appends_to_container() {
        let added = add_layer_under_selection(Some(fixture()), Some("a"), text("new")).unwrap();
        let a = find_layer_by_id(&added, "a").unwrap();
        assert_eq!(a.children().last().unwrap().id(), "new");
    }

    #[test]
    fn test_add_layer_under_selection_without_selection_fails() {
        let result = add_layer_under_selection(Some(fixture()), None, text("new"));
        assert!(matches!(result, Err(EngineError::InvalidTarget(_))));
    }

    #[test]
    fn test_add_layer_under_selected_leaf_fails() {
        let result = add_layer_under_selection(Some(fixture()), Some("b"), text("new"));
        assert_eq!(
            result,
            Err(EngineError::InvalidTarget("layer b cannot have children".to_string()))
        );
    }

    #[test]
    fn test_add_layer_under_unknown_selection_fails() {
        let result = add_layer_under_selection(Some(fixture()), Some("ghost"), text("new"));
        assert_eq!(result, Err(EngineError::NotFound("layer ghost".to_string())));
    }
}
