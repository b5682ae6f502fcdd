use crate::avl_tree::tree::Tree;
use crate::entry::Entry;

/// A struct representing an internal node of an avl tree.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub height: i32,
    pub left: Tree,
    pub right: Tree,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U) -> Self {
        Node {
            entry: Entry { key, value },
            height: 0,
            left: None,
            right: None,
        }
    }
}
