use crate::arena::{Handle, TypedArena, DEFAULT_CHUNK_SIZE};
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::map::OrderedMap;
use crate::red_black_tree::node::Node;
use crate::red_black_tree::tree;
use std::borrow::Borrow;
use std::fmt::Debug;
use std::ops::{Index, IndexMut};

/// An ordered map implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors each node red or black.
/// The root is black, a red node never has a red child, and every path from the root to an
/// absent child passes through the same number of black nodes. Nodes keep a link to their
/// parent and are stored in a `TypedArena`, so the slots of removed nodes are reused by later
/// insertions.
///
/// Unlike `AvlMap`, inserting a key that already exists leaves the map unchanged.
///
/// # Examples
///
/// ```
/// use balanced_collections::red_black_tree::RedBlackMap;
/// use balanced_collections::Error;
///
/// let mut map = RedBlackMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.find(&1), Err(Error::NotFound));
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Ok((&0, &1)));
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Ok(Some((0, 2))));
/// assert_eq!(map.remove(&1), Ok(None));
/// ```
pub struct RedBlackMap<T, U> {
    root: tree::Tree,
    arena: tree::Arena<T, U>,
}

impl<T, U> RedBlackMap<T, U> {
    /// Constructs a new, empty `RedBlackMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackMap<T, U>` whose arena allocates nodes in chunks of
    /// `chunk_size` slots.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackMap {
            root: None,
            arena: TypedArena::new(chunk_size),
        }
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, the map is
    /// left unchanged and the rejected key-value pair is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some((1, 2)));
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<(T, U)>
    where
        T: Ord,
    {
        let RedBlackMap {
            ref mut root,
            ref mut arena,
        } = self;
        tree::insert(arena, root, key, value).map(Entry::into_pair)
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. If the key does not exist, it will return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyMap` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    /// use balanced_collections::Error;
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.remove(&1), Err(Error::EmptyMap));
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.remove(&1), Ok(Some((1, 1))));
    /// assert_eq!(map.remove(&1), Ok(None));
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Result<Option<(T, U)>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let RedBlackMap {
            ref mut root,
            ref mut arena,
        } = self;
        if root.is_none() {
            return Err(Error::EmptyMap);
        }
        Ok(tree::remove(arena, root, key).map(Entry::into_pair))
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    pub fn get<V>(&self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get(&self.arena, self.root, key).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get_mut(&mut self.arena, self.root, key).map(|entry| &mut entry.value)
    }

    /// Returns an immutable reference to the value associated with a particular key.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    /// use balanced_collections::Error;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.find(&0), Err(Error::NotFound));
    /// assert_eq!(map.find(&1), Ok(&"a"));
    /// ```
    pub fn find<V>(&self, key: &V) -> Result<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get(key).ok_or(Error::NotFound)
    }

    /// Returns a mutable reference to the value associated with a particular key.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the key does not exist in the map.
    pub fn find_mut<V>(&mut self, key: &V) -> Result<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get_mut(key).ok_or(Error::NotFound)
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of node slots held by the arena of the map, including vacant slots
    /// that are waiting to be reused.
    pub fn slots(&self) -> usize {
        self.arena.slots()
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    /// Returns the entry with the minimum key of the map.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyMap` if the map is empty.
    pub fn min(&self) -> Result<(&T, &U)> {
        tree::min(&self.arena, self.root)
            .map(|entry| (&entry.key, &entry.value))
            .ok_or(Error::EmptyMap)
    }

    /// Returns the entry with the maximum key of the map.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyMap` if the map is empty.
    pub fn max(&self) -> Result<(&T, &U)> {
        tree::max(&self.arena, self.root)
            .map(|entry| (&entry.key, &entry.value))
            .ok_or(Error::EmptyMap)
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackMapIter<'_, T, U> {
        RedBlackMapIter {
            arena: &self.arena,
            current: self.root,
            stack: Vec::new(),
        }
    }

    /// Returns a human-readable rendering of the structure of the tree. The tree is drawn on its
    /// side with the right subtree of a node above it and the left subtree below it. Each key is
    /// followed by `r` for a red node or `b` for a black node.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, ());
    /// map.insert(2, ());
    /// map.insert(3, ());
    /// assert_eq!(map.dump(), "    3r\n2b\n    1r\n");
    /// ```
    pub fn dump(&self) -> String
    where
        T: Debug,
    {
        tree::dump(&self.arena, self.root)
    }
}

impl<T, U> OrderedMap<T, U> for RedBlackMap<T, U>
where
    T: Ord,
{
    fn insert(&mut self, key: T, value: U) -> Option<(T, U)> {
        RedBlackMap::insert(self, key, value)
    }

    fn find<V>(&self, key: &V) -> Result<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        RedBlackMap::find(self, key)
    }

    fn find_mut<V>(&mut self, key: &V) -> Result<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        RedBlackMap::find_mut(self, key)
    }

    fn remove<V>(&mut self, key: &V) -> Result<Option<(T, U)>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        RedBlackMap::remove(self, key)
    }

    fn min(&self) -> Result<(&T, &U)> {
        RedBlackMap::min(self)
    }

    fn max(&self) -> Result<(&T, &U)> {
        RedBlackMap::max(self)
    }

    fn len(&self) -> usize {
        RedBlackMap::len(self)
    }

    fn dump(&self) -> String
    where
        T: Debug,
    {
        RedBlackMap::dump(self)
    }
}

impl<T, U> IntoIterator for RedBlackMap<T, U> {
    type IntoIter = RedBlackMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            arena: self.arena,
            current: self.root,
            stack: Vec::new(),
        }
    }
}

impl<'a, T, U> IntoIterator for &'a RedBlackMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = RedBlackMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct RedBlackMapIntoIter<T, U> {
    arena: tree::Arena<T, U>,
    current: tree::Tree,
    stack: Vec<Handle>,
}

impl<T, U> Iterator for RedBlackMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.current {
            self.stack.push(handle);
            self.current = self.arena[handle].left;
        }
        self.stack.pop().map(|handle| {
            let Node { entry, right, .. } = self.arena.free(&handle);
            self.current = right;
            entry.into_pair()
        })
    }
}

/// An iterator for `RedBlackMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields immutable references.
pub struct RedBlackMapIter<'a, T, U> {
    arena: &'a tree::Arena<T, U>,
    current: tree::Tree,
    stack: Vec<Handle>,
}

impl<'a, T, U> Iterator for RedBlackMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        while let Some(handle) = self.current {
            self.stack.push(handle);
            self.current = arena[handle].left;
        }
        self.stack.pop().map(|handle| {
            let node = &arena[handle];
            self.current = node.right;
            (&node.entry.key, &node.entry.value)
        })
    }
}

impl<T, U> Default for RedBlackMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, U, V> Index<&'a V> for RedBlackMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    type Output = U;

    fn index(&self, key: &V) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, T, U, V> IndexMut<&'a V> for RedBlackMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    fn index_mut(&mut self, key: &V) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackMap;
    use crate::error::Error;
    use crate::red_black_tree::tree;

    #[test]
    fn test_len_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.min(), Err(Error::EmptyMap));
        assert_eq!(map.max(), Err(Error::EmptyMap));
    }

    #[test]
    fn test_find_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.find(&1), Err(Error::NotFound));
    }

    #[test]
    fn test_remove_empty() {
        let mut map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.remove(&1), Err(Error::EmptyMap));
    }

    #[test]
    fn test_insert() {
        let mut map = RedBlackMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut map = RedBlackMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert_eq!(map.insert(1, 3), Some((1, 3)));
        assert_eq!(map.get(&1), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        assert_eq!(map.remove(&1), Ok(Some((1, 1))));
        assert!(!map.contains_key(&1));
        assert_eq!(map.find(&1), Err(Error::NotFound));
    }

    #[test]
    fn test_min_max() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Ok((&1, &1)));
        assert_eq!(map.max(), Ok((&5, &5)));
    }

    #[test]
    fn test_get_mut() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        *map.get_mut(&1).unwrap() = 3;
        assert_eq!(map.get(&1), Some(&3));
        map[&1] += 1;
        assert_eq!(map.find_mut(&1), Ok(&mut 4));
    }

    #[test]
    fn test_scenario() {
        let mut map = RedBlackMap::new();
        for key in &[5, 2, 8, 4, 3, 6, 10, 9, 1] {
            map.insert(*key, format!("value {}", key));
        }
        assert_eq!(map.remove(&6), Ok(Some((6, String::from("value 6")))));
        assert_eq!(map.remove(&9), Ok(Some((9, String::from("value 9")))));

        assert_eq!(map.find(&3), Ok(&String::from("value 3")));
        assert_eq!(
            map.iter().map(|pair| *pair.0).collect::<Vec<u32>>(),
            vec![1, 2, 3, 4, 5, 8, 10],
        );
        assert_eq!(tree::validate(&map.arena, map.root), 7);
    }

    #[test]
    fn test_slots_recycled() {
        let mut map = RedBlackMap::new();
        for key in 0..100 {
            map.insert(key, key);
        }
        for key in 0..50 {
            map.remove(&(key * 2)).unwrap();
        }
        for key in 100..150 {
            map.insert(key, key);
        }
        assert_eq!(map.slots(), 100);
        assert_eq!(tree::validate(&map.arena, map.root), 100);
    }

    #[test]
    fn test_into_iter() {
        let mut map = RedBlackMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_iter() {
        let mut map = RedBlackMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            (&map).into_iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &2), (&3, &4), (&5, &6)],
        );
    }
}
