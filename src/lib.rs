//! Ordered maps backed by self-balancing binary search trees.
//!
//! Both `AvlMap` and `RedBlackMap` store their nodes in a `TypedArena` and link them together
//! with generational handles. The slot of a removed node is recycled by the next insertion, and
//! a handle to a freed slot can never observe the node that replaces it.
//!
//! # Examples
//!
//! ```
//! use balanced_collections::{Balance, BalancedMap, OrderedMap};
//!
//! let mut map = BalancedMap::new(Balance::RedBlack);
//! for key in &[5, 2, 8, 4, 3, 6, 10, 9, 1] {
//!     map.insert(*key, *key);
//! }
//! map.remove(&6).unwrap();
//! map.remove(&9).unwrap();
//!
//! assert_eq!(map.find(&3), Ok(&3));
//! assert_eq!(
//!     map.iter().map(|pair| *pair.0).collect::<Vec<u32>>(),
//!     vec![1, 2, 3, 4, 5, 8, 10],
//! );
//! ```

pub mod arena;
pub mod avl_tree;
mod entry;
mod error;
pub mod map;
pub mod red_black_tree;

pub use crate::error::{Error, Result};
pub use crate::map::{Balance, BalancedMap, OrderedMap};
