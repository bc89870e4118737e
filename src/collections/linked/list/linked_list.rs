use std::convert::Infallible;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;
use std::num::NonZero;
use std::ops::{Index, IndexMut};

use derive_more::IsVariant;

use super::{Cursor, CursorMut, Iter, IterMut, Link, NodeRef};
use crate::alloc::{AllocError, Allocator, Global};
#[doc(inline)]
pub use crate::util::error::{
    CapacityOverflow, ConstructError, IndexOrAllocError, IndexOutOfBounds,
};
use crate::util::result::ResultExtension;

/// A list with links in both directions, whose nodes are obtained from an [`Allocator`]. See also:
/// [`Cursor`] and [`CursorMut`] for bi-directional traversal and positional mutation.
///
/// Every node is allocated, constructed, destroyed and deallocated through the list's allocator,
/// `A`, which defaults to the [`Global`] heap. Operations that allocate have a `try_` form that
/// reports an [`AllocError`] (or a [`ConstructError`] for fallible constructors) instead of
/// panicking, and a failed operation leaves the list exactly as it was.
///
/// # Positions
/// A list of `n` elements has `n + 1` positions: one per node, plus a 'ghost' position that sits
/// both after the last node and before the first. Moving forward from the last node reaches the
/// ghost, and moving forward again wraps to the first node (and likewise backwards), so the list
/// behaves as a ring through the ghost. The ghost is where a [`Cursor`] from
/// [`cursor_end`](List::cursor_end) points, and inserting before it appends to the list.
///
/// # Copying
/// [`Clone::clone`] builds the copy with [`Allocator::select_on_copy`], while
/// [`Clone::clone_from`] builds it with either the source's allocator or the target's own,
/// depending on [`Allocator::PROPAGATE_ON_COPY_ASSIGNMENT`]. Either way, the copy is completed
/// before the old contents are released.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the List.
/// - `i`: The index of the item in question.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `front/back` | `O(1)` |
/// | `push_front/back` | `O(1)` |
/// | `pop_front/back` | `O(1)` |
/// | `CursorMut::insert_before/after` | `O(1)` |
/// | `CursorMut::remove_current` | `O(1)` |
/// | `get` | `O(min(i, n-i))` |
/// | `insert` | `O(min(i, n-i))` |
/// | `remove` | `O(min(i, n-i))` |
/// | `contains` | `O(n)` |
/// | `clone` | `O(n)` |
pub struct List<T, A: Allocator = Global> {
    pub(crate) state: ListState<T>,
    pub(crate) alloc: A,
    pub(crate) _phantom: PhantomData<T>,
}

#[derive(IsVariant)]
pub(crate) enum ListState<T> {
    Empty,
    Full(ListContents<T>),
}

use ListState::*;

/// The ends of a non-empty list. Empty lists don't store a length at all.
pub(crate) struct ListContents<T> {
    pub len: NonZero<usize>,
    pub head: NodeRef<T>,
    pub tail: NodeRef<T>,
}

impl<T> List<T> {
    /// Creates a new List with no elements, allocating from the [`Global`] heap.
    pub const fn new() -> List<T> {
        List::new_in(Global)
    }

    /// Creates a List holding `len` default values.
    ///
    /// # Panics
    /// Panics if allocating a node fails.
    pub fn with_len(len: usize) -> List<T>
    where
        T: Default,
    {
        List::with_len_in(len, Global)
    }

    /// Creates a List holding `len` clones of `value`.
    ///
    /// # Panics
    /// Panics if allocating a node fails.
    pub fn from_elem(len: usize, value: T) -> List<T>
    where
        T: Clone,
    {
        List::from_elem_in(len, value, Global)
    }
}

impl<T, A: Allocator> List<T, A> {
    /// Creates a new List with no elements, which will allocate its nodes from `alloc`.
    pub const fn new_in(alloc: A) -> List<T, A> {
        List {
            state: Empty,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Creates a List holding `len` default values, allocated from `alloc`.
    ///
    /// # Panics
    /// Panics if allocating a node fails.
    pub fn with_len_in(len: usize, alloc: A) -> List<T, A>
    where
        T: Default,
    {
        List::try_with_len_in(len, alloc).throw()
    }

    /// Creates a List holding `len` default values, allocated from `alloc`, returning an [`Err`]
    /// if any node can't be allocated. No nodes are leaked on failure.
    pub fn try_with_len_in(len: usize, alloc: A) -> Result<List<T, A>, AllocError>
    where
        T: Default,
    {
        let mut list = List::new_in(alloc);
        for _ in 0..len {
            list.try_push_back(T::default())?;
        }
        Ok(list)
    }

    /// Creates a List holding `len` clones of `value`, allocated from `alloc`.
    ///
    /// # Panics
    /// Panics if allocating a node fails.
    pub fn from_elem_in(len: usize, value: T, alloc: A) -> List<T, A>
    where
        T: Clone,
    {
        List::try_from_elem_in(len, value, alloc).throw()
    }

    /// Creates a List holding `len` clones of `value`, allocated from `alloc`, returning an
    /// [`Err`] if any node can't be allocated.
    ///
    /// If either allocation or `T::clone` fails part way, every element built so far is dropped
    /// and its node released before the failure propagates.
    pub fn try_from_elem_in(len: usize, value: T, alloc: A) -> Result<List<T, A>, AllocError>
    where
        T: Clone,
    {
        let mut list = List::new_in(alloc);
        if let Some(clones) = len.checked_sub(1) {
            for _ in 0..clones {
                list.try_push_back(value.clone())?;
            }
            list.try_push_back(value)?;
        }
        Ok(list)
    }

    /// Creates a copy of this List whose nodes are allocated from `alloc`.
    ///
    /// # Panics
    /// Panics if allocating a node fails.
    pub fn clone_in<B: Allocator>(&self, alloc: B) -> List<T, B>
    where
        T: Clone,
    {
        self.try_clone_in(alloc).throw()
    }

    /// Creates a copy of this List whose nodes are allocated from `alloc`, returning an [`Err`] if
    /// any node can't be allocated. The copy is all-or-nothing, in the same way as
    /// [`try_from_elem_in`](List::try_from_elem_in).
    pub fn try_clone_in<B: Allocator>(&self, alloc: B) -> Result<List<T, B>, AllocError>
    where
        T: Clone,
    {
        let mut list = List::new_in(alloc);
        for item in self.iter() {
            list.try_push_back(item.clone())?;
        }
        Ok(list)
    }

    /// Returns the length of the List.
    pub const fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if the List contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Returns the allocator that this List uses for its nodes.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns a reference to the first element in the list, if it exists.
    pub const fn front(&self) -> Option<&T> {
        match self.state {
            Empty => None,
            Full(ListContents { head, .. }) => Some(head.value()),
        }
    }

    /// Returns a mutable reference to the first element in the list, if it exists.
    pub const fn front_mut(&mut self) -> Option<&mut T> {
        match self.state {
            Empty => None,
            Full(ListContents { mut head, .. }) => Some(head.value_mut()),
        }
    }

    /// Returns a reference to the last element in the list, if it exists.
    pub const fn back(&self) -> Option<&T> {
        match self.state {
            Empty => None,
            Full(ListContents { tail, .. }) => Some(tail.value()),
        }
    }

    /// Returns a mutable reference to the last element in the list, if it exists.
    pub const fn back_mut(&mut self) -> Option<&mut T> {
        match self.state {
            Empty => None,
            Full(ListContents { mut tail, .. }) => Some(tail.value_mut()),
        }
    }

    /// Add the provided element to the front of the List.
    ///
    /// # Panics
    /// Panics if allocating the node fails.
    pub fn push_front(&mut self, value: T) {
        self.try_push_front(value).throw()
    }

    /// Add the provided element to the front of the List, returning an [`Err`] if the node can't
    /// be allocated. In that case, `value` is dropped and the List is unchanged.
    pub fn try_push_front(&mut self, value: T) -> Result<(), AllocError> {
        let node = NodeRef::alloc_in(&self.alloc, value)?;
        // SAFETY: The node is detached and came from our allocator.
        unsafe { self.link_after(node, None); }
        Ok(())
    }

    /// Add the provided element to the back of the List.
    ///
    /// # Panics
    /// Panics if allocating the node fails.
    pub fn push_back(&mut self, value: T) {
        self.try_push_back(value).throw()
    }

    /// Add the provided element to the back of the List, returning an [`Err`] if the node can't
    /// be allocated. In that case, `value` is dropped and the List is unchanged.
    pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
        let node = NodeRef::alloc_in(&self.alloc, value)?;
        // SAFETY: The node is detached and came from our allocator.
        unsafe { self.link_before(node, None); }
        Ok(())
    }

    /// Constructs a new element at the front of the List using `f`, directly inside its node.
    ///
    /// # Panics
    /// Panics if allocating the node fails.
    pub fn emplace_front_with<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        self.try_emplace_front_with(|| Ok::<T, Infallible>(f())).throw()
    }

    /// Constructs a new element at the front of the List using the fallible constructor `f`.
    ///
    /// The node is allocated before `f` is called. If `f` returns an [`Err`] or panics, the node
    /// is released again and the List is unchanged.
    pub fn try_emplace_front_with<E, F>(&mut self, f: F) -> Result<&mut T, ConstructError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut node = NodeRef::try_alloc_with_in(&self.alloc, f)?;
        // SAFETY: The node is detached and came from our allocator.
        unsafe { self.link_after(node, None); }
        Ok(node.value_mut())
    }

    /// Constructs a new element at the back of the List using `f`, directly inside its node.
    ///
    /// # Panics
    /// Panics if allocating the node fails.
    pub fn emplace_back_with<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        self.try_emplace_back_with(|| Ok::<T, Infallible>(f())).throw()
    }

    /// Constructs a new element at the back of the List using the fallible constructor `f`. See
    /// [`try_emplace_front_with`](List::try_emplace_front_with) for the failure behaviour.
    pub fn try_emplace_back_with<E, F>(&mut self, f: F) -> Result<&mut T, ConstructError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut node = NodeRef::try_alloc_with_in(&self.alloc, f)?;
        // SAFETY: The node is detached and came from our allocator.
        unsafe { self.link_before(node, None); }
        Ok(node.value_mut())
    }

    /// Removes the first element from the list and returns it, if the list isn't empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head_link()?;
        // SAFETY: head is a node of this list.
        Some(unsafe { self.remove_node(head) })
    }

    /// Removes the last element from the list and returns it, if the list isn't empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail_link()?;
        // SAFETY: tail is a node of this list.
        Some(unsafe { self.remove_node(tail) })
    }

    /// Returns a reference to the element at the provided `index`, panicking on a failure.
    ///
    /// The same functionality can be achieved using the [`Index`] operator.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the List.
    pub fn get(&self, index: usize) -> &T {
        self.try_get(index).throw()
    }

    /// Returns a reference to the element at the provided `index`, returning an [`Err`] on a
    /// failure rather than panicking.
    pub fn try_get(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        Ok(self.checked_seek(index)?.value())
    }

    /// Returns a mutable reference to the element at the provided `index`, panicking on a failure.
    ///
    /// The same functionality can be achieved using the [`IndexMut`] operator.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the List.
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        self.try_get_mut(index).throw()
    }

    /// Returns a mutable reference to the element at the provided `index`, returning an [`Err`] on
    /// a failure rather than panicking.
    pub fn try_get_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        Ok(self.checked_seek(index)?.value_mut())
    }

    /// Inserts `value` so that it ends up at `index`, shifting every later element back by one.
    /// An `index` equal to the length appends.
    ///
    /// # Panics
    /// Panics if `index` is greater than the length, or if allocating the node fails.
    pub fn insert(&mut self, index: usize, value: T) {
        self.try_insert(index, value).throw()
    }

    /// Inserts `value` so that it ends up at `index`, returning an [`Err`] rather than panicking if
    /// the index is out of bounds or the node can't be allocated.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), IndexOrAllocError> {
        let len = self.len();
        let next = match index {
            i if i == len => None,
            i if i < len => Some(self.checked_seek(i)?),
            i => return Err(IndexOutOfBounds { index: i, len }.into()),
        };

        let node = NodeRef::alloc_in(&self.alloc, value)?;
        // SAFETY: The node is detached and came from our allocator, and next is one of our nodes.
        unsafe { self.link_before(node, next); }
        Ok(())
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds of the List.
    pub fn remove(&mut self, index: usize) -> T {
        self.try_remove(index).throw()
    }

    /// Removes and returns the element at `index`, returning an [`Err`] rather than panicking if
    /// the index is out of bounds.
    pub fn try_remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        let node = self.checked_seek(index)?;
        // SAFETY: node was found within this list.
        Ok(unsafe { self.remove_node(node) })
    }

    /// Drops every element of the List, releasing their nodes.
    ///
    /// If an element's destructor panics, the rest are still dropped while unwinding.
    pub fn clear(&mut self) {
        struct ClearGuard<'a, T, A: Allocator>(&'a mut List<T, A>);

        impl<'a, T, A: Allocator> Drop for ClearGuard<'a, T, A> {
            fn drop(&mut self) {
                while self.0.pop_front().is_some() {}
            }
        }

        while let Some(value) = self.pop_front() {
            let guard = ClearGuard(&mut *self);
            drop(value);
            mem::forget(guard);
        }
    }

    /// Swaps the contents and allocators of two Lists without touching any nodes.
    pub fn swap(&mut self, other: &mut List<T, A>) {
        mem::swap(self, other);
    }

    /// Returns a [`Cursor`] pointing at the first element, or at the ghost position if the List is
    /// empty.
    pub fn cursor_front(&self) -> Cursor<'_, T, A> {
        Cursor {
            list: self,
            current: self.head_link(),
            index: 0,
        }
    }

    /// Returns a [`Cursor`] pointing at the last element, or at the ghost position if the List is
    /// empty.
    pub fn cursor_back(&self) -> Cursor<'_, T, A> {
        Cursor {
            list: self,
            current: self.tail_link(),
            index: self.len().saturating_sub(1),
        }
    }

    /// Returns a [`Cursor`] pointing at the ghost position, one past the last element.
    pub fn cursor_end(&self) -> Cursor<'_, T, A> {
        Cursor {
            list: self,
            current: None,
            index: self.len(),
        }
    }

    /// Returns a [`CursorMut`] pointing at the first element, or at the ghost position if the List
    /// is empty.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
        CursorMut {
            current: self.head_link(),
            index: 0,
            list: self,
        }
    }

    /// Returns a [`CursorMut`] pointing at the last element, or at the ghost position if the List
    /// is empty.
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, A> {
        CursorMut {
            current: self.tail_link(),
            index: self.len().saturating_sub(1),
            list: self,
        }
    }

    /// Returns a [`CursorMut`] pointing at the ghost position, one past the last element.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, A> {
        CursorMut {
            current: None,
            index: self.len(),
            list: self,
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.into_iter()
    }
}

impl<T: PartialEq, A: Allocator> List<T, A> {
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|element| element == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|element| element == item)
    }
}

// Node level operations, shared with the cursors and with containers built on top of List.
impl<T, A: Allocator> List<T, A> {
    pub(crate) const fn head_link(&self) -> Link<T> {
        match self.state {
            Empty => None,
            Full(ListContents { head, .. }) => Some(head),
        }
    }

    pub(crate) const fn tail_link(&self) -> Link<T> {
        match self.state {
            Empty => None,
            Full(ListContents { tail, .. }) => Some(tail),
        }
    }

    /// Returns the position after `current` (None being the ghost), along with its index.
    pub(crate) fn next_position(&self, current: Link<T>, index: usize) -> (Link<T>, usize) {
        match current {
            Some(node) => (*node.next(), index + 1),
            None => (self.head_link(), 0),
        }
    }

    /// Returns the position before `current` (None being the ghost), along with its index.
    pub(crate) fn prev_position(&self, current: Link<T>, index: usize) -> (Link<T>, usize) {
        match current {
            Some(node) => match node.prev() {
                Some(prev) => (Some(*prev), index - 1),
                None => (None, self.len()),
            },
            None => (self.tail_link(), self.len().saturating_sub(1)),
        }
    }

    /// Links a detached node in front of `next`, or at the back of the list if `next` is None.
    ///
    /// # Safety
    /// `node` must be detached and allocated by this list's allocator. `next` must be None or a
    /// node of this list.
    pub(crate) unsafe fn link_before(&mut self, node: NodeRef<T>, next: Link<T>) {
        match &mut self.state {
            Empty => {
                *node.prev_mut() = None;
                *node.next_mut() = None;
                self.state = Full(ListContents {
                    len: NonZero::<usize>::MIN,
                    head: node,
                    tail: node,
                });
            },
            Full(contents) => {
                contents.len = contents.len.checked_add(1).ok_or(CapacityOverflow).throw();

                let prev = match next {
                    Some(next_node) => mem::replace(next_node.prev_mut(), Some(node)),
                    None => Some(mem::replace(&mut contents.tail, node)),
                };

                *node.prev_mut() = prev;
                *node.next_mut() = next;

                match prev {
                    Some(prev_node) => *prev_node.next_mut() = Some(node),
                    None => contents.head = node,
                }
            },
        }
    }

    /// Links a detached node after `prev`, or at the front of the list if `prev` is None.
    ///
    /// # Safety
    /// The same requirements as [`link_before`](List::link_before) apply, with `prev` in place of
    /// `next`.
    pub(crate) unsafe fn link_after(&mut self, node: NodeRef<T>, prev: Link<T>) {
        let next = match prev {
            Some(prev_node) => *prev_node.next(),
            None => self.head_link(),
        };
        // SAFETY: next is either None or a node of this list, because prev is.
        unsafe { self.link_before(node, next) }
    }

    /// Detaches `node` from the list without releasing it.
    ///
    /// # Safety
    /// `node` must be a node of this list.
    pub(crate) unsafe fn unlink(&mut self, node: NodeRef<T>) {
        if let Full(contents) = &mut self.state {
            match NonZero::new(contents.len.get() - 1) {
                Some(new_len) => {
                    let prev = *node.prev();
                    let next = *node.next();

                    match prev {
                        Some(prev_node) => *prev_node.next_mut() = next,
                        // SAFETY: The list holds at least two nodes, so the head has a successor.
                        None => contents.head = unsafe { next.unwrap_unchecked() },
                    }
                    match next {
                        Some(next_node) => *next_node.prev_mut() = prev,
                        // SAFETY: As above, the tail has a predecessor.
                        None => contents.tail = unsafe { prev.unwrap_unchecked() },
                    }
                    contents.len = new_len;
                },
                None => self.state = Empty,
            }
        }

        *node.prev_mut() = None;
        *node.next_mut() = None;
    }

    /// Unlinks `node`, moves its value out and releases it.
    ///
    /// # Safety
    /// `node` must be a node of this list.
    pub(crate) unsafe fn remove_node(&mut self, node: NodeRef<T>) -> T {
        // SAFETY: Upheld by the caller. Once unlinked, nothing else refers to the node.
        unsafe {
            self.unlink(node);
            node.take_node_in(&self.alloc).value
        }
    }

    pub(crate) fn checked_seek(&self, index: usize) -> Result<NodeRef<T>, IndexOutOfBounds> {
        match &self.state {
            Full(contents) if index < contents.len.get() => Ok(contents.seek(index)),
            _ => Err(IndexOutOfBounds {
                index,
                len: self.len(),
            }),
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    pub(crate) fn verify_double_links(&self) {
        match self.state {
            Empty => {},
            Full(ListContents { len, head, tail }) => {
                assert!(head.prev().is_none());
                let mut count = 1;
                let mut curr = head;
                while let Some(next) = curr.next() {
                    // UNWRAP: This needs to panic if prev is None.
                    assert!(next.prev().unwrap() == curr);
                    curr = *next;
                    count += 1;
                }
                assert!(tail == curr);
                assert_eq!(count, len.get());
            },
        }
    }
}

impl<T> ListContents<T> {
    pub fn seek(&self, index: usize) -> NodeRef<T> {
        if index < self.len.get() / 2 {
            self.seek_fwd(index, self.head)
        } else {
            self.seek_bwd(self.last_index() - index, self.tail)
        }
    }

    pub fn seek_fwd(&self, count: usize, mut node: NodeRef<T>) -> NodeRef<T> {
        for _ in 0..count {
            // SAFETY: The caller seeks to an index within the list, so there are enough nodes.
            node = unsafe { node.next().unwrap_unchecked() };
        }
        node
    }

    pub fn seek_bwd(&self, count: usize, mut node: NodeRef<T>) -> NodeRef<T> {
        for _ in 0..count {
            // SAFETY: As above.
            node = unsafe { node.prev().unwrap_unchecked() };
        }
        node
    }

    pub const fn last_index(&self) -> usize {
        self.len.get() - 1
    }
}

impl<T> Clone for ListContents<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListContents<T> {}

impl<T> ListState<T> {
    pub const fn len(&self) -> usize {
        match self {
            Empty => 0,
            Full(ListContents { len, .. }) => len.get(),
        }
    }
}

impl<T> Clone for ListState<T> {
    fn clone(&self) -> Self {
        match self {
            Empty => Empty,
            Full(contents) => Full(*contents),
        }
    }
}

impl<T, A: Allocator> Index<usize> for List<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index)
    }
}

impl<T, A: Allocator> IndexMut<usize> for List<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index)
    }
}

impl<T, A: Allocator + Default> FromIterator<T> for List<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new_in(A::default());
        list.extend(iter);
        list
    }
}

impl<T, A: Allocator> Extend<T> for List<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for List<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, A: Allocator + Default> Default for List<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator> Clone for List<T, A> {
    fn clone(&self) -> Self {
        self.clone_in(self.alloc.select_on_copy())
    }

    fn clone_from(&mut self, source: &Self) {
        let alloc = if A::PROPAGATE_ON_COPY_ASSIGNMENT {
            source.alloc.clone()
        } else {
            self.alloc.clone()
        };
        // The old contents are only dropped once the copy is complete.
        let mut copy = source.clone_in(alloc);
        self.swap(&mut copy);
    }
}

impl<T, A: Allocator> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<List<T, B>> for List<T, A> {
    fn eq(&self, other: &List<T, B>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator> Eq for List<T, A> {}

impl<T: Hash, A: Allocator> Hash for List<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }

        // Terminate variable length hashing sequence.
        0xFF.hash(state);
    }
}

impl<T: Debug, A: Allocator> Debug for List<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Debug, A: Allocator> Display for List<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, item) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ") -> (")?;
            }
            write!(f, "{item:?}")?;
        }
        write!(f, ")")
    }
}
