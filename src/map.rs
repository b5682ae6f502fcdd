//! A common interface over the balanced tree maps, and a map whose balancing scheme is chosen
//! when it is constructed.

use crate::arena::DEFAULT_CHUNK_SIZE;
use crate::avl_tree::{AvlMap, AvlMapIter};
use crate::error::Result;
use crate::red_black_tree::{RedBlackMap, RedBlackMapIter};
use log::debug;
use std::borrow::Borrow;
use std::fmt::Debug;

/// An ordered key-value map.
///
/// Every lookup by key accepts any borrowed form of the key type, as long as the ordering of the
/// borrowed form matches the ordering of the key type.
pub trait OrderedMap<T, U>
where
    T: Ord,
{
    /// Inserts a key-value pair into the map. Returns the displaced or rejected key-value pair,
    /// if any. Whether an existing entry is replaced depends on the implementation.
    fn insert(&mut self, key: T, value: U) -> Option<(T, U)>;

    /// Returns an immutable reference to the value associated with a particular key, or
    /// `Error::NotFound` if the key does not exist.
    fn find<V>(&self, key: &V) -> Result<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized;

    /// Returns a mutable reference to the value associated with a particular key, or
    /// `Error::NotFound` if the key does not exist.
    fn find_mut<V>(&mut self, key: &V) -> Result<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized;

    /// Removes the entry with a particular key. Returns `Ok(None)` if the key does not exist and
    /// `Error::EmptyMap` if the map is empty.
    fn remove<V>(&mut self, key: &V) -> Result<Option<(T, U)>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized;

    /// Returns the entry with the minimum key, or `Error::EmptyMap` if the map is empty.
    fn min(&self) -> Result<(&T, &U)>;

    /// Returns the entry with the maximum key, or `Error::EmptyMap` if the map is empty.
    fn max(&self) -> Result<(&T, &U)>;

    /// Returns the number of elements in the map.
    fn len(&self) -> usize;

    /// Returns `true` if the map is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a human-readable rendering of the structure of the map.
    fn dump(&self) -> String
    where
        T: Debug;
}

/// The balancing scheme used by a `BalancedMap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Balance {
    /// Height balanced. Inserting an existing key replaces its value.
    Avl,
    /// Color balanced. Inserting an existing key leaves the map unchanged.
    RedBlack,
}

impl Default for Balance {
    fn default() -> Self {
        Balance::RedBlack
    }
}

/// An ordered map that dispatches to either an `AvlMap` or a `RedBlackMap`.
///
/// # Examples
///
/// ```
/// use balanced_collections::{Balance, BalancedMap, Error, OrderedMap};
///
/// let mut map = BalancedMap::new(Balance::Avl);
/// map.insert(1, "a");
/// map.insert(2, "b");
///
/// assert_eq!(map.balance(), Balance::Avl);
/// assert_eq!(map.find(&1), Ok(&"a"));
/// assert_eq!(map.find(&3), Err(Error::NotFound));
/// assert_eq!(map.max(), Ok((&2, &"b")));
///
/// assert_eq!(map.remove(&1), Ok(Some((1, "a"))));
/// assert_eq!(map.len(), 1);
/// ```
pub enum BalancedMap<T, U> {
    Avl(AvlMap<T, U>),
    RedBlack(RedBlackMap<T, U>),
}

impl<T, U> BalancedMap<T, U> {
    /// Constructs a new, empty `BalancedMap<T, U>` using a particular balancing scheme.
    pub fn new(balance: Balance) -> Self {
        Self::with_chunk_size(balance, DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `BalancedMap<T, U>` using a particular balancing scheme, whose
    /// arena allocates nodes in chunks of `chunk_size` slots.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(balance: Balance, chunk_size: usize) -> Self {
        debug!("creating {:?} map with chunk size {}", balance, chunk_size);
        match balance {
            Balance::Avl => BalancedMap::Avl(AvlMap::with_chunk_size(chunk_size)),
            Balance::RedBlack => BalancedMap::RedBlack(RedBlackMap::with_chunk_size(chunk_size)),
        }
    }

    /// Returns the balancing scheme of the map.
    pub fn balance(&self) -> Balance {
        match self {
            BalancedMap::Avl(_) => Balance::Avl,
            BalancedMap::RedBlack(_) => Balance::RedBlack,
        }
    }

    /// Returns the number of node slots held by the arena of the map.
    pub fn slots(&self) -> usize {
        match self {
            BalancedMap::Avl(map) => map.slots(),
            BalancedMap::RedBlack(map) => map.slots(),
        }
    }

    /// Clears the map, removing all values.
    pub fn clear(&mut self) {
        match self {
            BalancedMap::Avl(map) => map.clear(),
            BalancedMap::RedBlack(map) => map.clear(),
        }
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs in ascending
    /// order of keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::{Balance, BalancedMap, OrderedMap};
    ///
    /// let mut map = BalancedMap::new(Balance::RedBlack);
    /// map.insert(2, 2);
    /// map.insert(1, 1);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> BalancedMapIter<'_, T, U> {
        match self {
            BalancedMap::Avl(map) => BalancedMapIter::Avl(map.iter()),
            BalancedMap::RedBlack(map) => BalancedMapIter::RedBlack(map.iter()),
        }
    }
}

impl<T, U> OrderedMap<T, U> for BalancedMap<T, U>
where
    T: Ord,
{
    fn insert(&mut self, key: T, value: U) -> Option<(T, U)> {
        match self {
            BalancedMap::Avl(map) => map.insert(key, value),
            BalancedMap::RedBlack(map) => map.insert(key, value),
        }
    }

    fn find<V>(&self, key: &V) -> Result<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self {
            BalancedMap::Avl(map) => map.find(key),
            BalancedMap::RedBlack(map) => map.find(key),
        }
    }

    fn find_mut<V>(&mut self, key: &V) -> Result<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self {
            BalancedMap::Avl(map) => map.find_mut(key),
            BalancedMap::RedBlack(map) => map.find_mut(key),
        }
    }

    fn remove<V>(&mut self, key: &V) -> Result<Option<(T, U)>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self {
            BalancedMap::Avl(map) => map.remove(key),
            BalancedMap::RedBlack(map) => map.remove(key),
        }
    }

    fn min(&self) -> Result<(&T, &U)> {
        match self {
            BalancedMap::Avl(map) => map.min(),
            BalancedMap::RedBlack(map) => map.min(),
        }
    }

    fn max(&self) -> Result<(&T, &U)> {
        match self {
            BalancedMap::Avl(map) => map.max(),
            BalancedMap::RedBlack(map) => map.max(),
        }
    }

    fn len(&self) -> usize {
        match self {
            BalancedMap::Avl(map) => map.len(),
            BalancedMap::RedBlack(map) => map.len(),
        }
    }

    fn dump(&self) -> String
    where
        T: Debug,
    {
        match self {
            BalancedMap::Avl(map) => map.dump(),
            BalancedMap::RedBlack(map) => map.dump(),
        }
    }
}

impl<T, U> Default for BalancedMap<T, U> {
    fn default() -> Self {
        Self::new(Balance::default())
    }
}

impl<'a, T, U> IntoIterator for &'a BalancedMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = BalancedMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `BalancedMap<T, U>`.
pub enum BalancedMapIter<'a, T, U> {
    Avl(AvlMapIter<'a, T, U>),
    RedBlack(RedBlackMapIter<'a, T, U>),
}

impl<'a, T, U> Iterator for BalancedMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            BalancedMapIter::Avl(iter) => iter.next(),
            BalancedMapIter::RedBlack(iter) => iter.next(),
        }
    }
}
