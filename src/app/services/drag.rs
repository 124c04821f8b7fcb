//! Geometry for drag-and-drop reordering of the layer list.
//!
//! The host renders the flattened tree as rows and converts pointer pixel
//! coordinates into a raw [`DropPosition`] (row index from the vertical
//! offset, indent depth from the horizontal offset). The functions here
//! turn that raw position into a valid tree insertion slot: they clamp the
//! requested depth into the allowed range for the hovered row, reject drops
//! that would nest a node inside its own subtree, and resolve the final
//! row/depth pair into a parent id and child offset.

use crate::app::error::{EngineError, Result};
use crate::app::services::tree_ops::{FlatLayerItem, InsertPosition};

/// Raw drop target derived from pointer coordinates: the row the indicator
/// sits under and the requested indent depth. The depth is unclamped and
/// may even be negative when the pointer sits left of the first indent
/// stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropPosition {
    pub index: usize,
    pub depth: i32,
}

/// Allowed depth range for a drop row, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthBoundaries {
    pub min: i32,
    pub max: i32,
}

/// True when the row at `child` sits inside the subtree rooted at the row
/// at `root` (proper descendant: a row is not part of its own subtree).
/// Out-of-range indices are simply not descendants.
pub fn is_part_of_subtree(items: &[FlatLayerItem], child: usize, root: usize) -> bool {
    let Some(item) = items.get(child) else {
        return false;
    };
    let mut parent = item.parent;
    while let Some(index) = parent {
        if index == root {
            return true;
        }
        parent = items.get(index).and_then(|it| it.parent);
    }
    false
}

/// Allowed depth range when dropping below row `drop.index` while dragging
/// the row at `drag_index`.
///
/// The lower bound follows the next row's depth, or 1 when dropping below
/// the last row (depth 0 is reserved for the single root). For the upper
/// bound: when the row before the drop point is the tail of the dragged
/// subtree, the dragged row's own depth caps it — a node can never be
/// nested inside its own subtree. Otherwise a container row allows one
/// level deeper (the drop becomes its child) and a leaf row caps the depth
/// at its own level (the drop becomes its sibling).
pub fn depth_boundaries(
    items: &[FlatLayerItem],
    drag_index: usize,
    drop: DropPosition,
) -> Result<DepthBoundaries> {
    let before = items.get(drop.index).ok_or_else(|| {
        EngineError::InvalidArgument(format!("drop row {} is out of bounds", drop.index))
    })?;
    let dragged = items.get(drag_index).ok_or_else(|| {
        EngineError::InvalidArgument(format!("drag row {drag_index} is out of bounds"))
    })?;
    let min = items.get(drop.index + 1).map_or(1, |next| next.depth as i32);

    // When the row before the drop point is inside the dragged subtree it
    // is necessarily the last row of that subtree.
    if is_part_of_subtree(items, drop.index, drag_index) {
        return Ok(DepthBoundaries { min, max: dragged.depth as i32 });
    }

    let max = if before.layer.is_container() {
        before.depth as i32 + 1
    } else {
        before.depth as i32
    };
    Ok(DepthBoundaries { min, max })
}

/// Clamp the requested depth into the allowed range for the drop row. The
/// result is also where the host draws the drag indicator.
pub fn clamped_depth(items: &[FlatLayerItem], drag_index: usize, drop: DropPosition) -> Result<i32> {
    let boundaries = depth_boundaries(items, drag_index, drop)?;
    if drop.depth > boundaries.max {
        return Ok(boundaries.max);
    }
    if drop.depth < boundaries.min {
        return Ok(boundaries.min);
    }
    Ok(drop.depth)
}

/// A drop row is valid when it is in bounds and the row after it is not
/// part of the dragged subtree — dropping there would re-parent the node
/// into itself.
pub fn is_valid_drop_index(items: &[FlatLayerItem], drag_index: usize, index: usize) -> bool {
    index < items.len()
        && drag_index < items.len()
        && !is_part_of_subtree(items, index + 1, drag_index)
}

/// Resolve a drop row and *clamped* depth into a concrete insertion slot.
///
/// Walks upward from the drop row: rows already at the target depth count
/// toward the insertion offset; the nearest preceding row one level up is
/// the parent. `ParentNotFound` can only occur for depth 0, which is
/// reserved for the single root and invalid for insertion.
pub fn find_insertion_position(
    items: &[FlatLayerItem],
    drop: DropPosition,
) -> Result<InsertPosition> {
    if drop.index >= items.len() {
        return Err(EngineError::InvalidArgument(format!(
            "drop row {} is out of bounds",
            drop.index
        )));
    }

    let mut position = 0;
    for i in (0..=drop.index).rev() {
        let item = &items[i];
        let depth = item.depth as i32;
        if depth == drop.depth {
            position += 1;
        }
        if depth == drop.depth - 1 {
            return Ok(InsertPosition::new(item.layer.id(), position));
        }
    }
    Err(EngineError::ParentNotFound(drop.depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::{Layer, LayerType};
    use crate::app::services::tree_ops::flatten_layer;
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

    /// Rows: 0 root, 1 a, 2 a1, 3 a2, 4 b, 5 c
    /// root ├─ a (container) ├─ a1
    ///      │                └─ a2
    ///      ├─ b (text)
    ///      └─ c (container, empty)
    fn fixture() -> Layer {
        container(
            "root",
            vec![
                container("a", vec![text("a1"), text("a2")]),
                text("b"),
                container("c", vec![]),
            ],
        )
    }

    #[test]
    fn test_is_part_of_subtree() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        assert!(is_part_of_subtree(&items, 2, 1)); // a1 inside a
        assert!(is_part_of_subtree(&items, 3, 1)); // a2 inside a
        assert!(is_part_of_subtree(&items, 3, 0)); // a2 inside root
        assert!(!is_part_of_subtree(&items, 1, 1)); // a is not its own descendant
        assert!(!is_part_of_subtree(&items, 4, 1)); // b outside a
        assert!(!is_part_of_subtree(&items, 99, 1)); // out of range
    }

    #[test]
    fn test_depth_boundaries_below_container_row() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        // dragging b, hovering just below a: a is a container, so the drop
        // may become its first child
        let bounds = depth_boundaries(&items, 4, DropPosition { index: 1, depth: 0 }).unwrap();
        assert_eq!(bounds, DepthBoundaries { min: 2, max: 2 });
    }

    #[test]
    fn test_depth_boundaries_below_leaf_row() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        // dragging c, hovering below the leaf b: depth caps at b's own level
        let bounds = depth_boundaries(&items, 5, DropPosition { index: 4, depth: 9 }).unwrap();
        assert_eq!(bounds, DepthBoundaries { min: 1, max: 1 });
    }

    #[test]
    fn test_depth_boundaries_last_row() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        // no next row: lower bound is 1 (root-adjacent); c is a container
        let bounds = depth_boundaries(&items, 4, DropPosition { index: 5, depth: 0 }).unwrap();
        assert_eq!(bounds, DepthBoundaries { min: 1, max: 2 });
    }

    #[test]
    fn test_depth_boundaries_self_drop_guard() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        // dragging a (subtree rows 1..=3), hovering below a2 — the tail of
        // the dragged subtree. Max is a's own depth, never deeper.
        let bounds = depth_boundaries(&items, 1, DropPosition { index: 3, depth: 5 }).unwrap();
        assert_eq!(bounds, DepthBoundaries { min: 1, max: 1 });
    }

    #[test]
    fn test_depth_boundaries_out_of_bounds() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        let result = depth_boundaries(&items, 1, DropPosition { index: 42, depth: 0 });
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_clamped_depth() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        // last row allows [1, 2]
        let drop = |depth| DropPosition { index: 5, depth };
        assert_eq!(clamped_depth(&items, 4, drop(99)).unwrap(), 2);
        assert_eq!(clamped_depth(&items, 4, drop(-3)).unwrap(), 1);
        assert_eq!(clamped_depth(&items, 4, drop(2)).unwrap(), 2);
    }

    #[test]
    fn test_is_valid_drop_index_rejects_own_subtree() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        // dragging a, whose subtree spans rows 1..=3
        assert!(!is_valid_drop_index(&items, 1, 1));
        assert!(!is_valid_drop_index(&items, 1, 2));
        // dropping right after the subtree's last row is fine
        assert!(is_valid_drop_index(&items, 1, 3));
        assert!(is_valid_drop_index(&items, 1, 4));
    }

    #[test]
    fn test_is_valid_drop_index_bounds() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        assert!(is_valid_drop_index(&items, 1, 5)); // last row, no next item
        assert!(!is_valid_drop_index(&items, 1, 6)); // out of bounds
        assert!(!is_valid_drop_index(&items, 9, 0)); // bogus drag row
    }

    #[test]
    fn test_find_insertion_position_counts_siblings() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        // dropping below a2 at depth 2: third child of a
        let pos = find_insertion_position(&items, DropPosition { index: 3, depth: 2 }).unwrap();
        assert_eq!(pos, InsertPosition::new("a", 2));
    }

    #[test]
    fn test_find_insertion_position_at_depth_one() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        // dropping below b at depth 1: after a and b under root
        let pos = find_insertion_position(&items, DropPosition { index: 4, depth: 1 }).unwrap();
        assert_eq!(pos, InsertPosition::new("root", 2));
    }

    #[test]
    fn test_find_insertion_position_depth_zero_fails() {
        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        let result = find_insertion_position(&items, DropPosition { index: 0, depth: 0 });
        assert_eq!(result, Err(EngineError::ParentNotFound(0)));
    }

    #[test]
    fn test_drag_resolution_feeds_tree_move() {
        use crate::app::services::tree_ops::move_layer;

        let tree = fixture();
        let items = flatten_layer(Some(&tree));
        // drag b (row 4) below a (row 1), asking for a deep indent; the
        // clamp turns it into "first child of a"
        let raw = DropPosition { index: 1, depth: 7 };
        assert!(is_valid_drop_index(&items, 4, raw.index));
        let depth = clamped_depth(&items, 4, raw).unwrap();
        let pos =
            find_insertion_position(&items, DropPosition { index: raw.index, depth }).unwrap();
        assert_eq!(pos, InsertPosition::new("a", 0));

        let moved = move_layer(tree, "b", &pos).unwrap();
        let items = flatten_layer(Some(&moved));
        let ids: Vec<&str> = items.iter().map(|item| item.layer.id()).collect();
        assert_eq!(ids, vec!["root", "a", "b", "a1", "a2", "c"]);
    }
}
