use crate::arena::{Handle, TypedArena};
use crate::entry::Entry;
use crate::red_black_tree::node::{Color, Node, Side};
use log::trace;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::Debug;

pub type Tree = Option<Handle>;
pub type Arena<T, U> = TypedArena<Node<T, U>>;

// absent children count as black
pub fn is_red<T, U>(arena: &Arena<T, U>, tree: Tree) -> bool {
    match tree {
        None => false,
        Some(handle) => arena[handle].color == Color::Red,
    }
}

fn side_of<T, U>(arena: &Arena<T, U>, parent: Handle, child: Handle) -> Side {
    if arena[parent].left == Some(child) {
        Side::Left
    } else {
        Side::Right
    }
}

// re-points the slot holding `old` to `new`; the slot is the root when `parent` is `None`
fn replace_child<T, U>(
    arena: &mut Arena<T, U>,
    root: &mut Tree,
    parent: Tree,
    old: Handle,
    new: Tree,
) {
    match parent {
        None => *root = new,
        Some(parent) => {
            let side = side_of(arena, parent, old);
            *arena[parent].child_mut(side) = new;
        },
    }
}

fn transplant<T, U>(arena: &mut Arena<T, U>, root: &mut Tree, old: Handle, new: Tree) {
    let parent = arena[old].parent;
    replace_child(arena, root, parent, old, new);
    if let Some(new) = new {
        arena[new].parent = parent;
    }
}

// moves `handle` down towards `side` and promotes its child from the opposite side
fn rotate<T, U>(arena: &mut Arena<T, U>, root: &mut Tree, handle: Handle, side: Side) {
    trace!("rotating {:?} at slot {}", side, handle.index());
    let child = match arena[handle].child(side.opposite()) {
        Some(child) => child,
        None => unreachable!(),
    };

    let inner = arena[child].child(side);
    *arena[handle].child_mut(side.opposite()) = inner;
    if let Some(inner) = inner {
        arena[inner].parent = Some(handle);
    }

    let parent = arena[handle].parent;
    arena[child].parent = parent;
    replace_child(arena, root, parent, handle, Some(child));

    *arena[child].child_mut(side) = Some(handle);
    arena[handle].parent = Some(child);
}

fn leftmost<T, U>(arena: &Arena<T, U>, mut handle: Handle) -> Handle {
    while let Some(left) = arena[handle].left {
        handle = left;
    }
    handle
}

fn rightmost<T, U>(arena: &Arena<T, U>, mut handle: Handle) -> Handle {
    while let Some(right) = arena[handle].right {
        handle = right;
    }
    handle
}

fn insert_fixup<T, U>(arena: &mut Arena<T, U>, root: &mut Tree, mut node: Handle) {
    while let Some(parent) = arena[node].parent {
        if arena[parent].color == Color::Black {
            break;
        }

        // a red node is never the root, so a red parent always has a parent
        let grandparent = match arena[parent].parent {
            Some(grandparent) => grandparent,
            None => unreachable!(),
        };
        let side = side_of(arena, grandparent, parent);

        match arena[grandparent].child(side.opposite()) {
            Some(uncle) if arena[uncle].color == Color::Red => {
                arena[parent].color = Color::Black;
                arena[uncle].color = Color::Black;
                arena[grandparent].color = Color::Red;
                node = grandparent;
            },
            _ => {
                let mut top = parent;
                if side_of(arena, parent, node) != side {
                    rotate(arena, root, parent, side);
                    top = node;
                }
                rotate(arena, root, grandparent, side.opposite());
                arena[top].color = Color::Black;
                arena[grandparent].color = Color::Red;
                break;
            },
        }
    }

    if let Some(root) = *root {
        arena[root].color = Color::Black;
    }
}

// `node` is the subtree carrying the extra black, hanging off `side` of `parent`
fn remove_fixup<T, U>(
    arena: &mut Arena<T, U>,
    root: &mut Tree,
    mut node: Tree,
    mut parent: Tree,
    mut side: Side,
) {
    while node != *root && !is_red(arena, node) {
        let parent_handle = match parent {
            Some(parent_handle) => parent_handle,
            None => break,
        };

        // the sibling of a doubly black subtree has a black height of at least one
        let mut sibling = match arena[parent_handle].child(side.opposite()) {
            Some(sibling) => sibling,
            None => unreachable!(),
        };

        if arena[sibling].color == Color::Red {
            arena[sibling].color = Color::Black;
            arena[parent_handle].color = Color::Red;
            rotate(arena, root, parent_handle, side);
            continue;
        }

        if !is_red(arena, arena[sibling].child(side.opposite())) {
            let near = arena[sibling].child(side);
            if !is_red(arena, near) {
                arena[sibling].color = Color::Red;
                if arena[parent_handle].color == Color::Red {
                    arena[parent_handle].color = Color::Black;
                    return;
                }
                node = parent;
                parent = arena[parent_handle].parent;
                if let Some(grandparent) = parent {
                    side = side_of(arena, grandparent, parent_handle);
                }
                continue;
            }

            if let Some(near) = near {
                arena[near].color = Color::Black;
            }
            arena[sibling].color = Color::Red;
            rotate(arena, root, sibling, side.opposite());
            sibling = match arena[parent_handle].child(side.opposite()) {
                Some(sibling) => sibling,
                None => unreachable!(),
            };
        }

        let parent_color = arena[parent_handle].color;
        arena[sibling].color = parent_color;
        arena[parent_handle].color = Color::Black;
        if let Some(far) = arena[sibling].child(side.opposite()) {
            arena[far].color = Color::Black;
        }
        rotate(arena, root, parent_handle, side);
        return;
    }

    if let Some(node) = node {
        arena[node].color = Color::Black;
    }
}

/// Inserts an entry into the tree. If the key already exists in the tree, the tree is left
/// unchanged and the rejected entry is returned.
pub fn insert<T, U>(
    arena: &mut Arena<T, U>,
    root: &mut Tree,
    key: T,
    value: U,
) -> Option<Entry<T, U>>
where
    T: Ord,
{
    let mut parent = None;
    let mut side = Side::Left;
    let mut curr = *root;
    while let Some(handle) = curr {
        side = match key.cmp(&arena[handle].entry.key) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return Some(Entry { key, value }),
        };
        parent = curr;
        curr = arena[handle].child(side);
    }

    let handle = arena.allocate(Node::new(key, value, parent));
    match parent {
        None => *root = Some(handle),
        Some(parent) => *arena[parent].child_mut(side) = Some(handle),
    }
    insert_fixup(arena, root, handle);
    None
}

/// Removes the entry with a particular key from the tree and returns it.
pub fn remove<T, U, V>(arena: &mut Arena<T, U>, root: &mut Tree, key: &V) -> Option<Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let target = search(arena, *root, key)?;

    // the color that left the tree, and the subtree that took its place with its parent and side
    let (removed_color, child, parent, side) = match (arena[target].left, arena[target].right) {
        (None, child) | (child, None) => {
            let parent = arena[target].parent;
            let side = match parent {
                Some(parent) => side_of(arena, parent, target),
                None => Side::Left,
            };
            transplant(arena, root, target, child);
            (arena[target].color, child, parent, side)
        },
        (Some(left), Some(right)) => {
            let successor = leftmost(arena, right);
            let removed_color = arena[successor].color;
            let child = arena[successor].right;

            let (parent, side) = if successor == right {
                (Some(successor), Side::Right)
            } else {
                let parent = arena[successor].parent;
                transplant(arena, root, successor, child);
                arena[successor].right = Some(right);
                arena[right].parent = Some(successor);
                (parent, Side::Left)
            };

            transplant(arena, root, target, Some(successor));
            arena[successor].left = Some(left);
            arena[left].parent = Some(successor);
            let target_color = arena[target].color;
            arena[successor].color = target_color;
            (removed_color, child, parent, side)
        },
    };

    let Node { entry, .. } = arena.free(&target);
    if removed_color == Color::Black {
        remove_fixup(arena, root, child, parent, side);
    }
    Some(entry)
}

pub fn search<T, U, V>(arena: &Arena<T, U>, mut tree: Tree, key: &V) -> Option<Handle>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    while let Some(handle) = tree {
        let node = &arena[handle];
        tree = match key.cmp(node.entry.key.borrow()) {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => return Some(handle),
        };
    }
    None
}

pub fn get<'a, T, U, V>(arena: &'a Arena<T, U>, tree: Tree, key: &V) -> Option<&'a Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    search(arena, tree, key).map(|handle| &arena[handle].entry)
}

pub fn get_mut<'a, T, U, V>(
    arena: &'a mut Arena<T, U>,
    tree: Tree,
    key: &V,
) -> Option<&'a mut Entry<T, U>>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let handle = search(arena, tree, key)?;
    Some(&mut arena[handle].entry)
}

pub fn min<T, U>(arena: &Arena<T, U>, tree: Tree) -> Option<&Entry<T, U>> {
    tree.map(|handle| &arena[leftmost(arena, handle)].entry)
}

pub fn max<T, U>(arena: &Arena<T, U>, tree: Tree) -> Option<&Entry<T, U>> {
    tree.map(|handle| &arena[rightmost(arena, handle)].entry)
}

/// Renders the tree sideways with the right subtree above a node and the left subtree below
/// it. Each key is suffixed with `r` or `b` for its color.
pub fn dump<T, U>(arena: &Arena<T, U>, tree: Tree) -> String
where
    T: Debug,
{
    fn dump_subtree<T, U>(arena: &Arena<T, U>, tree: Tree, depth: usize, out: &mut String)
    where
        T: Debug,
    {
        if let Some(handle) = tree {
            let node = &arena[handle];
            let color = match node.color {
                Color::Red => 'r',
                Color::Black => 'b',
            };
            dump_subtree(arena, node.right, depth + 1, out);
            out.push_str(&format!(
                "{:indent$}{:?}{}\n",
                "",
                node.entry.key,
                color,
                indent = depth * 4,
            ));
            dump_subtree(arena, node.left, depth + 1, out);
        }
    }

    let mut out = String::new();
    dump_subtree(arena, tree, 0, &mut out);
    out
}

/// Asserts the binary search tree order, the parent links, and the red black invariants of the
/// tree. Returns the number of nodes in the tree.
#[cfg(test)]
pub fn validate<T, U>(arena: &Arena<T, U>, root: Tree) -> usize
where
    T: Ord,
{
    // returns the black height and the number of nodes of the subtree
    fn validate_subtree<'a, T, U>(
        arena: &'a Arena<T, U>,
        tree: Tree,
        parent: Tree,
        lower: Option<&'a T>,
        upper: Option<&'a T>,
    ) -> (usize, usize)
    where
        T: Ord,
    {
        let handle = match tree {
            Some(handle) => handle,
            None => return (1, 0),
        };
        let node = &arena[handle];
        assert_eq!(node.parent, parent, "parent link does not match child link");
        if let Some(lower) = lower {
            assert!(lower < &node.entry.key, "keys must be strictly increasing");
        }
        if let Some(upper) = upper {
            assert!(&node.entry.key < upper, "keys must be strictly increasing");
        }
        if node.color == Color::Red {
            assert!(!is_red(arena, node.left), "red node has a red child");
            assert!(!is_red(arena, node.right), "red node has a red child");
        }

        let (left_black_height, left_len) =
            validate_subtree(arena, node.left, tree, lower, Some(&node.entry.key));
        let (right_black_height, right_len) =
            validate_subtree(arena, node.right, tree, Some(&node.entry.key), upper);
        assert_eq!(left_black_height, right_black_height, "black heights differ");

        let black_height = match node.color {
            Color::Red => left_black_height,
            Color::Black => left_black_height + 1,
        };
        (black_height, left_len + right_len + 1)
    }

    assert!(!is_red(arena, root), "root is red");
    validate_subtree(arena, root, None, None, None).1
}

#[cfg(test)]
mod tests {
    use super::{dump, insert, max, min, remove, validate, Arena, Tree};
    use crate::arena::TypedArena;
    use rand::Rng;

    fn build(keys: &[u32]) -> (Arena<u32, u32>, Tree) {
        let mut arena = TypedArena::new(16);
        let mut root = None;
        for key in keys {
            assert!(insert(&mut arena, &mut root, *key, *key * 10).is_none());
            validate(&arena, root);
        }
        (arena, root)
    }

    fn in_order(arena: &Arena<u32, u32>, tree: Tree, keys: &mut Vec<u32>) {
        if let Some(handle) = tree {
            in_order(arena, arena[handle].left, keys);
            keys.push(arena[handle].entry.key);
            in_order(arena, arena[handle].right, keys);
        }
    }

    #[test]
    fn test_insert_rotates_at_grandparent() {
        let (arena, root) = build(&[1, 2, 3]);
        assert_eq!(dump(&arena, root), "    3r\n2b\n    1r\n");
    }

    #[test]
    fn test_insert_zig_zag() {
        let (arena, root) = build(&[3, 1, 2]);
        assert_eq!(dump(&arena, root), "    3r\n2b\n    1r\n");
    }

    #[test]
    fn test_insert_recolors_red_uncle() {
        let (arena, root) = build(&[2, 1, 3, 4]);
        assert_eq!(dump(&arena, root), "        4r\n    3b\n2b\n    1b\n");
    }

    #[test]
    fn test_insert_duplicate_is_rejected() {
        let (mut arena, mut root) = build(&[2, 1, 3]);
        let ret = insert(&mut arena, &mut root, 1, 100);
        assert_eq!(ret.map(|entry| entry.into_pair()), Some((1, 100)));
        assert_eq!(arena[root.unwrap()].entry.key, 2);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_scenario() {
        let (mut arena, mut root) = build(&[5, 2, 8, 4, 3, 6, 10, 9, 1]);
        for key in &[6u32, 9] {
            let ret = remove(&mut arena, &mut root, key);
            assert_eq!(ret.map(|entry| entry.into_pair()), Some((*key, *key * 10)));
            validate(&arena, root);
        }

        let mut keys = Vec::new();
        in_order(&arena, root, &mut keys);
        assert_eq!(keys, vec![1, 2, 3, 4, 5, 8, 10]);
        assert_eq!(min(&arena, root).map(|entry| entry.key), Some(1));
        assert_eq!(max(&arena, root).map(|entry| entry.key), Some(10));
    }

    #[test]
    fn test_remove_missing() {
        let (mut arena, mut root) = build(&[2, 1, 3]);
        assert!(remove(&mut arena, &mut root, &4u32).is_none());
        assert_eq!(validate(&arena, root), 3);
    }

    #[test]
    fn test_remove_root_with_two_children() {
        let (mut arena, mut root) = build(&[2, 1, 3]);
        assert!(remove(&mut arena, &mut root, &2u32).is_some());
        assert_eq!(validate(&arena, root), 2);
        assert_eq!(arena[root.unwrap()].entry.key, 3);
    }

    #[test]
    fn test_remove_black_leaf_with_red_sibling() {
        let (mut arena, mut root) = build(&[10, 5, 20, 15, 25, 30]);
        assert!(remove(&mut arena, &mut root, &5u32).is_some());
        assert_eq!(validate(&arena, root), 5);
    }

    #[test]
    fn test_remove_all() {
        let keys: Vec<u32> = (0..256).map(|i| (i * 37) % 256).collect();
        let (mut arena, mut root) = build(&keys);
        for key in &keys {
            assert!(remove(&mut arena, &mut root, key).is_some());
            validate(&arena, root);
        }
        assert_eq!(root, None);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_random_operations() {
        let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
        let mut arena = TypedArena::new(8);
        let mut root = None;
        let mut expected = Vec::new();

        for _ in 0..2000 {
            let key = rng.gen_range(0, 200);
            if rng.gen::<bool>() {
                if insert(&mut arena, &mut root, key, key).is_none() {
                    expected.push(key);
                }
            } else if remove(&mut arena, &mut root, &key).is_some() {
                expected.retain(|other| *other != key);
            }
            assert_eq!(validate(&arena, root), expected.len());
        }

        expected.sort();
        let mut keys = Vec::new();
        in_order(&arena, root, &mut keys);
        assert_eq!(keys, expected);
    }
}
