use crate::arena::{Handle, TypedArena, DEFAULT_CHUNK_SIZE};
use crate::avl_tree::node::Node;
use crate::avl_tree::tree;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::map::OrderedMap;
use std::borrow::Borrow;
use std::fmt::Debug;
use std::ops::{Index, IndexMut};

/// An ordered map implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. The nodes of the tree are
/// stored in a `TypedArena`, so the slots of removed nodes are reused by later insertions.
///
/// # Examples
///
/// ```
/// use balanced_collections::avl_tree::AvlMap;
/// use balanced_collections::Error;
///
/// let mut map = AvlMap::new();
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
pub struct AvlMap<T, U> {
    tree: tree::Tree,
    arena: tree::Arena<T, U>,
}

impl<T, U> AvlMap<T, U> {
    /// Constructs a new, empty `AvlMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `AvlMap<T, U>` whose arena allocates nodes in chunks of
    /// `chunk_size` slots.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::with_chunk_size(1024);
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        AvlMap {
            tree: None,
            arena: TypedArena::new(chunk_size),
        }
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, it will
    /// return and replace the old key-value pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some((1, 1)));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<(T, U)>
    where
        T: Ord,
    {
        let AvlMap {
            ref mut tree,
            ref mut arena,
        } = self;
        let (root, ret) = tree::insert(arena, *tree, key, value);
        *tree = Some(root);
        ret.map(Entry::into_pair)
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
    /// use balanced_collections::avl_tree::AvlMap;
    /// use balanced_collections::Error;
    ///
    /// let mut map = AvlMap::new();
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
        if self.tree.is_none() {
            return Err(Error::EmptyMap);
        }

        let AvlMap {
            ref mut tree,
            ref mut arena,
        } = self;
        let (root, ret) = tree::remove(arena, *tree, key);
        *tree = root;
        Ok(ret.map(Entry::into_pair))
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
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
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get<V>(&self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get(&self.arena, self.tree, key).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get_mut(&mut self.arena, self.tree, key).map(|entry| &mut entry.value)
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
    /// use balanced_collections::avl_tree::AvlMap;
    /// use balanced_collections::Error;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.find(&0), Err(Error::NotFound));
    /// assert_eq!(map.find(&1), Ok(&1));
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
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of node slots held by the arena of the map, including vacant slots
    /// that are waiting to be reused.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.remove(&1).unwrap();
    /// assert_eq!(map.slots(), 2);
    ///
    /// map.insert(3, 3);
    /// assert_eq!(map.slots(), 2);
    /// ```
    pub fn slots(&self) -> usize {
        self.arena.slots()
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree = None;
        self.arena.clear();
    }

    /// Returns the entry with the minimum key of the map.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyMap` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.min(), Ok((&1, &1)));
    /// ```
    pub fn min(&self) -> Result<(&T, &U)> {
        tree::min(&self.arena, self.tree)
            .map(|entry| (&entry.key, &entry.value))
            .ok_or(Error::EmptyMap)
    }

    /// Returns the entry with the maximum key of the map.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyMap` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Ok((&3, &3)));
    /// ```
    pub fn max(&self) -> Result<(&T, &U)> {
        tree::max(&self.arena, self.tree)
            .map(|entry| (&entry.key, &entry.value))
            .ok_or(Error::EmptyMap)
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlMapIter<'_, T, U> {
        AvlMapIter {
            arena: &self.arena,
            current: self.tree,
            stack: Vec::new(),
        }
    }

    /// Returns a human-readable rendering of the structure of the tree. The tree is drawn on its
    /// side with the right subtree of a node above it and the left subtree below it.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(2, ());
    /// map.insert(1, ());
    /// map.insert(3, ());
    /// assert_eq!(map.dump(), "    3\n2\n    1\n");
    /// ```
    pub fn dump(&self) -> String
    where
        T: Debug,
    {
        tree::dump(&self.arena, self.tree)
    }
}

impl<T, U> OrderedMap<T, U> for AvlMap<T, U>
where
    T: Ord,
{
    fn insert(&mut self, key: T, value: U) -> Option<(T, U)> {
        AvlMap::insert(self, key, value)
    }

    fn find<V>(&self, key: &V) -> Result<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        AvlMap::find(self, key)
    }

    fn find_mut<V>(&mut self, key: &V) -> Result<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        AvlMap::find_mut(self, key)
    }

    fn remove<V>(&mut self, key: &V) -> Result<Option<(T, U)>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        AvlMap::remove(self, key)
    }

    fn min(&self) -> Result<(&T, &U)> {
        AvlMap::min(self)
    }

    fn max(&self) -> Result<(&T, &U)> {
        AvlMap::max(self)
    }

    fn len(&self) -> usize {
        AvlMap::len(self)
    }

    fn dump(&self) -> String
    where
        T: Debug,
    {
        AvlMap::dump(self)
    }
}

impl<T, U> IntoIterator for AvlMap<T, U> {
    type IntoIter = AvlMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            arena: self.arena,
            current: self.tree,
            stack: Vec::new(),
        }
    }
}

impl<'a, T, U> IntoIterator for &'a AvlMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = AvlMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct AvlMapIntoIter<T, U> {
    arena: tree::Arena<T, U>,
    current: tree::Tree,
    stack: Vec<Handle>,
}

impl<T, U> Iterator for AvlMapIntoIter<T, U> {
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

/// An iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields immutable references.
pub struct AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    arena: &'a tree::Arena<T, U>,
    current: tree::Tree,
    stack: Vec<Handle>,
}

impl<'a, T, U> Iterator for AvlMapIter<'a, T, U>
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

impl<T, U> Default for AvlMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, U, V> Index<&'a V> for AvlMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    type Output = U;

    fn index(&self, key: &V) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, T, U, V> IndexMut<&'a V> for AvlMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    fn index_mut(&mut self, key: &V) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}
