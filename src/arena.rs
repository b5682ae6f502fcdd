//! Fast, but limited allocator that recycles the slots of freed objects.

use log::{debug, trace};
use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// The number of slots per chunk used by the maps when no chunk size is given.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// A handle to an object allocated in a `TypedArena<T>`.
///
/// Handles are positional and carry the generation of the allocation that produced them, so a
/// handle that outlives its object is rejected even after its slot has been reused.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    index: usize,
    generation: u64,
}

impl Handle {
    /// Returns the position of the slot that this handle refers to.
    pub fn index(self) -> usize {
        self.index
    }
}

enum Block<T> {
    Occupied { generation: u64, value: T },
    Vacant(Option<usize>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// Objects are stored in chunks of a fixed size. A chunk is never reallocated once it is
/// created, so growing the arena never moves a live object. Freed slots are threaded into a
/// last-in-first-out free list and are reused before the arena grows. Freeing the last slot of
/// the arena shrinks the arena instead.
///
/// # Examples
///
/// ```
/// use balanced_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert_eq!(arena.get(&x), None);
/// ```
pub struct TypedArena<T> {
    head: Option<usize>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    slots: usize,
    len: usize,
    generation: u64,
}

impl<T> TypedArena<T> {
    fn block(&self, index: usize) -> Option<&Block<T>> {
        self.chunks
            .get(index / self.chunk_size)
            .and_then(|chunk| chunk.get(index % self.chunk_size))
    }

    fn block_mut(&mut self, index: usize) -> Option<&mut Block<T>> {
        let chunk_size = self.chunk_size;
        self.chunks
            .get_mut(index / chunk_size)
            .and_then(|chunk| chunk.get_mut(index % chunk_size))
    }

    fn is_live(&self, handle: &Handle) -> bool {
        match self.block(handle.index) {
            Some(Block::Occupied { generation, .. }) => *generation == handle.generation,
            _ => false,
        }
    }

    /// Constructs a new, empty `TypedArena<T>` with a specific number of objects per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::arena::TypedArena;
    ///
    /// // creates a new TypedArena<T> that contains a maximum of 1024 u32's per chunk
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: chunk size must be positive.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            slots: 0,
            len: 0,
            generation: 0,
        }
    }

    /// Allocates an object in the typed arena and returns a `Handle`. The handle can later be
    /// used to retrieve mutable and immutable references to the object, and to deallocate the
    /// object. A vacant slot is reused if one exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// let y = arena.allocate(1);
    /// arena.free(&x);
    ///
    /// let z = arena.allocate(2);
    /// assert_eq!(z.index(), x.index());
    /// assert_eq!(arena.slots(), 2);
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.generation += 1;
        self.len += 1;
        let generation = self.generation;

        match self.head.take() {
            Some(index) => {
                let chunk_size = self.chunk_size;
                let vacant_block = mem::replace(
                    &mut self.chunks[index / chunk_size][index % chunk_size],
                    Block::Occupied { generation, value },
                );

                match vacant_block {
                    Block::Vacant(next_index) => self.head = next_index,
                    Block::Occupied { .. } => panic!("Expected a vacant block."),
                }
                trace!("recycled arena slot {}", index);
                Handle { index, generation }
            },
            None => {
                let index = self.slots;
                let chunk_index = index / self.chunk_size;
                if chunk_index == self.chunks.len() {
                    self.chunks.push(Vec::with_capacity(self.chunk_size));
                    debug!(
                        "arena grew to {} chunks of {} slots",
                        self.chunks.len(),
                        self.chunk_size,
                    );
                }
                self.chunks[chunk_index].push(Block::Occupied { generation, value });
                self.slots += 1;
                Handle { index, generation }
            },
        }
    }

    /// Deallocates an object in the typed arena and returns the object. If the object occupies
    /// the last slot of the arena, the arena shrinks by one slot. Otherwise the slot is kept for
    /// reuse.
    ///
    /// # Panics
    ///
    /// Panics if the handle corresponds to an invalid, vacant, or reused slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// assert_eq!(arena.slots(), 0);
    /// ```
    pub fn free(&mut self, handle: &Handle) -> T {
        if !self.is_live(handle) {
            panic!("Error: attempting to free invalid block.");
        }

        let index = handle.index;
        let chunk_size = self.chunk_size;
        let old_block = if index + 1 == self.slots {
            self.slots -= 1;
            trace!("shrank arena to {} slots", self.slots);
            match self.chunks[index / chunk_size].pop() {
                Some(block) => block,
                None => unreachable!(),
            }
        } else {
            let next_index = self.head.replace(index);
            mem::replace(
                &mut self.chunks[index / chunk_size][index % chunk_size],
                Block::Vacant(next_index),
            )
        };

        match old_block {
            Block::Occupied { value, .. } => {
                self.len -= 1;
                value
            },
            Block::Vacant(_) => panic!("Error: attempting to free vacant block."),
        }
    }

    /// Returns an immutable reference to an object in the typed arena. Returns `None` if the
    /// handle does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        match self.block(handle.index) {
            Some(Block::Occupied { generation, value }) if *generation == handle.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the typed arena. Returns `None` if the handle
    /// does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get_mut(&x), Some(&mut 0));
    /// ```
    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        match self.block_mut(handle.index) {
            Some(Block::Occupied { generation, value }) if *generation == handle.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns the number of live objects in the typed arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the typed arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the typed arena, including vacant slots awaiting reuse.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// arena.allocate(1);
    /// arena.free(&x);
    /// assert_eq!(arena.len(), 1);
    /// assert_eq!(arena.slots(), 2);
    /// ```
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Returns the number of slots reserved by the chunks of the typed arena.
    pub fn capacity(&self) -> usize {
        self.chunks.len() * self.chunk_size
    }

    /// Destroys every object in the typed arena and releases its chunks. Handles issued before
    /// the call remain invalid afterwards.
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.slots = 0;
        self.len = 0;
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle).expect("Error: handle out of bounds.")
    }
}
