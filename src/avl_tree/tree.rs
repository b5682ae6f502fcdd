use crate::arena::{Handle, TypedArena};
use crate::avl_tree::node::Node;
use crate::entry::Entry;
use log::trace;
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::fmt::Debug;
use std::mem;

pub type Tree = Option<Handle>;
pub type Arena<T, U> = TypedArena<Node<T, U>>;

pub fn height<T, U>(arena: &Arena<T, U>, tree: Tree) -> i32 {
    match tree {
        None => -1,
        Some(handle) => arena[handle].height,
    }
}

fn update<T, U>(arena: &mut Arena<T, U>, handle: Handle) {
    let (left, right) = (arena[handle].left, arena[handle].right);
    let height = cmp::max(height(arena, left), height(arena, right)) + 1;
    arena[handle].height = height;
}

fn balance_factor<T, U>(arena: &Arena<T, U>, handle: Handle) -> i32 {
    let node = &arena[handle];
    height(arena, node.right) - height(arena, node.left)
}

fn rotate_left<T, U>(arena: &mut Arena<T, U>, handle: Handle) -> Handle {
    let child = match arena[handle].right {
        Some(child) => child,
        None => unreachable!(),
    };
    let inner = arena[child].left;
    arena[handle].right = inner;
    update(arena, handle);
    arena[child].left = Some(handle);
    update(arena, child);
    child
}

fn rotate_right<T, U>(arena: &mut Arena<T, U>, handle: Handle) -> Handle {
    let child = match arena[handle].left {
        Some(child) => child,
        None => unreachable!(),
    };
    let inner = arena[child].right;
    arena[handle].left = inner;
    update(arena, handle);
    arena[child].right = Some(handle);
    update(arena, child);
    child
}

// returns the handle of the node that roots the subtree after rebalancing
fn balance<T, U>(arena: &mut Arena<T, U>, handle: Handle) -> Handle {
    update(arena, handle);
    let factor = balance_factor(arena, handle);

    if factor > 1 {
        trace!("rotating left at slot {}", handle.index());
        let child = match arena[handle].right {
            Some(child) => child,
            None => unreachable!(),
        };
        if balance_factor(arena, child) < 0 {
            let child = rotate_right(arena, child);
            arena[handle].right = Some(child);
        }
        rotate_left(arena, handle)
    } else if factor < -1 {
        trace!("rotating right at slot {}", handle.index());
        let child = match arena[handle].left {
            Some(child) => child,
            None => unreachable!(),
        };
        if balance_factor(arena, child) > 0 {
            let child = rotate_left(arena, child);
            arena[handle].left = Some(child);
        }
        rotate_right(arena, handle)
    } else {
        handle
    }
}

// precondition: `handle` roots a non-empty subtree
// returns the remaining subtree and the detached maximum node
fn remove_max<T, U>(arena: &mut Arena<T, U>, handle: Handle) -> (Tree, Handle) {
    match arena[handle].right {
        Some(right) => {
            let (subtree, max) = remove_max(arena, right);
            arena[handle].right = subtree;
            (Some(balance(arena, handle)), max)
        },
        None => (arena[handle].left.take(), handle),
    }
}

/// Inserts an entry into the subtree rooted at `tree`. Returns the new root of the subtree and
/// the entry that was replaced if the key already existed.
pub fn insert<T, U>(
    arena: &mut Arena<T, U>,
    tree: Tree,
    key: T,
    value: U,
) -> (Handle, Option<Entry<T, U>>)
where
    T: Ord,
{
    let handle = match tree {
        Some(handle) => handle,
        None => return (arena.allocate(Node::new(key, value)), None),
    };

    let ret = match key.cmp(&arena[handle].entry.key) {
        Ordering::Less => {
            let left = arena[handle].left;
            let (child, ret) = insert(arena, left, key, value);
            arena[handle].left = Some(child);
            ret
        },
        Ordering::Greater => {
            let right = arena[handle].right;
            let (child, ret) = insert(arena, right, key, value);
            arena[handle].right = Some(child);
            ret
        },
        Ordering::Equal => {
            let old_entry = mem::replace(&mut arena[handle].entry, Entry { key, value });
            return (handle, Some(old_entry));
        },
    };

    (balance(arena, handle), ret)
}

/// Removes the entry with a particular key from the subtree rooted at `tree`. Returns the new
/// root of the subtree and the removed entry.
pub fn remove<T, U, V>(
    arena: &mut Arena<T, U>,
    tree: Tree,
    key: &V,
) -> (Tree, Option<Entry<T, U>>)
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let handle = match tree {
        Some(handle) => handle,
        None => return (None, None),
    };

    let ret = match key.cmp(arena[handle].entry.key.borrow()) {
        Ordering::Less => {
            let left = arena[handle].left;
            let (subtree, ret) = remove(arena, left, key);
            arena[handle].left = subtree;
            ret
        },
        Ordering::Greater => {
            let right = arena[handle].right;
            let (subtree, ret) = remove(arena, right, key);
            arena[handle].right = subtree;
            ret
        },
        Ordering::Equal => {
            let (left, right) = (arena[handle].left, arena[handle].right);
            let replacement = match (left, right) {
                (None, right) => right,
                (left, None) => left,
                (Some(left), right) => {
                    let (left, max) = remove_max(arena, left);
                    arena[max].left = left;
                    arena[max].right = right;
                    Some(balance(arena, max))
                },
            };
            let Node { entry, .. } = arena.free(&handle);
            return (replacement, Some(entry));
        },
    };

    (Some(balance(arena, handle)), ret)
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
    let mut curr = tree?;
    while let Some(left) = arena[curr].left {
        curr = left;
    }
    Some(&arena[curr].entry)
}

pub fn max<T, U>(arena: &Arena<T, U>, tree: Tree) -> Option<&Entry<T, U>> {
    let mut curr = tree?;
    while let Some(right) = arena[curr].right {
        curr = right;
    }
    Some(&arena[curr].entry)
}

/// Renders the tree sideways: the right subtree above a node, the left subtree below it, and
/// four spaces of indentation per level.
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
            dump_subtree(arena, node.right, depth + 1, out);
            out.push_str(&format!("{:indent$}{:?}\n", "", node.entry.key, indent = depth * 4));
            dump_subtree(arena, node.left, depth + 1, out);
        }
    }

    let mut out = String::new();
    dump_subtree(arena, tree, 0, &mut out);
    out
}

/// Asserts the binary search tree order, the stored heights, and the balance of every node.
/// Returns the number of nodes in the tree.
#[cfg(test)]
pub fn validate<T, U>(arena: &Arena<T, U>, tree: Tree) -> usize
where
    T: Ord,
{
    fn validate_subtree<'a, T, U>(
        arena: &'a Arena<T, U>,
        tree: Tree,
        lower: Option<&'a T>,
        upper: Option<&'a T>,
    ) -> (i32, usize)
    where
        T: Ord,
    {
        let handle = match tree {
            Some(handle) => handle,
            None => return (-1, 0),
        };
        let node = &arena[handle];
        if let Some(lower) = lower {
            assert!(lower < &node.entry.key, "keys must be strictly increasing");
        }
        if let Some(upper) = upper {
            assert!(&node.entry.key < upper, "keys must be strictly increasing");
        }

        let (left_height, left_len) =
            validate_subtree(arena, node.left, lower, Some(&node.entry.key));
        let (right_height, right_len) =
            validate_subtree(arena, node.right, Some(&node.entry.key), upper);
        assert!((right_height - left_height).abs() <= 1, "subtree is unbalanced");
        assert_eq!(node.height, cmp::max(left_height, right_height) + 1);
        (node.height, left_len + right_len + 1)
    }

    validate_subtree(arena, tree, None, None).1
}

#[cfg(test)]
mod tests {
    use super::{dump, height, insert, max, min, remove, validate, Arena, Tree};
    use crate::arena::TypedArena;

    fn build(keys: &[u32]) -> (Arena<u32, u32>, Tree) {
        let mut arena = TypedArena::new(16);
        let mut tree = None;
        for key in keys {
            let (root, ret) = insert(&mut arena, tree, *key, *key * 10);
            assert!(ret.is_none());
            tree = Some(root);
        }
        (arena, tree)
    }

    #[test]
    fn test_insert_ascending_stays_balanced() {
        let keys: Vec<u32> = (0..1024).collect();
        let (arena, tree) = build(&keys);
        assert_eq!(validate(&arena, tree), 1024);
        assert_eq!(height(&arena, tree), 10);
    }

    #[test]
    fn test_insert_zig_zag() {
        let (arena, tree) = build(&[3, 1, 2]);
        assert_eq!(validate(&arena, tree), 3);
        let root = tree.unwrap();
        assert_eq!(arena[root].entry.key, 2);
        assert_eq!(arena[root].height, 1);
    }

    #[test]
    fn test_insert_replace() {
        let (mut arena, tree) = build(&[2, 1, 3]);
        let (root, ret) = insert(&mut arena, tree, 1, 100);
        assert_eq!(Some(root), tree);
        assert_eq!(ret.map(|entry| entry.into_pair()), Some((1, 10)));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_remove_leaf_and_inner() {
        let (mut arena, mut tree) = build(&[5, 2, 8, 4, 3, 6, 10, 9, 1]);
        for key in &[6u32, 9, 5] {
            let (root, ret) = remove(&mut arena, tree, key);
            assert_eq!(ret.map(|entry| entry.into_pair()), Some((*key, *key * 10)));
            tree = root;
            validate(&arena, tree);
        }
        assert_eq!(validate(&arena, tree), 6);
        assert_eq!(arena.len(), 6);
        assert_eq!(min(&arena, tree).map(|entry| entry.key), Some(1));
        assert_eq!(max(&arena, tree).map(|entry| entry.key), Some(10));
    }

    #[test]
    fn test_remove_two_children_uses_left_maximum() {
        let (mut arena, tree) = build(&[2, 1, 3]);
        let (root, ret) = remove(&mut arena, tree, &2u32);
        assert!(ret.is_some());
        assert_eq!(arena[root.unwrap()].entry.key, 1);
        assert_eq!(validate(&arena, root), 2);
    }

    #[test]
    fn test_remove_missing() {
        let (mut arena, tree) = build(&[2, 1, 3]);
        let (root, ret) = remove(&mut arena, tree, &4u32);
        assert!(ret.is_none());
        assert_eq!(root, tree);
        assert_eq!(validate(&arena, root), 3);
    }

    #[test]
    fn test_remove_all() {
        let keys: Vec<u32> = (0..256).map(|i| (i * 37) % 256).collect();
        let (mut arena, mut tree) = build(&keys);
        for key in keys.iter().rev() {
            let (root, ret) = remove(&mut arena, tree, key);
            assert!(ret.is_some());
            tree = root;
            validate(&arena, tree);
        }
        assert_eq!(tree, None);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_dump() {
        let (arena, tree) = build(&[2, 1, 3]);
        assert_eq!(dump(&arena, tree), "    3\n2\n    1\n");
    }
}
