use std::convert::Infallible;
use std::fmt::{self, Debug, Formatter};

use super::{Link, List, NodeRef};
use crate::alloc::{AllocError, Allocator, Global};
use crate::util::error::ConstructError;
use crate::util::result::ResultExtension;

/// A read-only position within a [`List`]. See [`List::cursor_front`], [`List::cursor_back`] and
/// [`List::cursor_end`] to create one.
///
/// A Cursor either points at an element, or at the 'ghost' position that sits between the last
/// element and the first. Moving past either end of the List lands on the ghost, and moving again
/// wraps around to the other end.
pub struct Cursor<'a, T, A: Allocator = Global> {
    pub(crate) list: &'a List<T, A>,
    pub(crate) current: Link<T>,
    // Equal to the length of the list while at the ghost position.
    pub(crate) index: usize,
}

impl<'a, T, A: Allocator> Cursor<'a, T, A> {
    /// Returns the List that this Cursor points into.
    pub const fn as_list(&self) -> &'a List<T, A> {
        self.list
    }

    /// Returns the index of the current element, or None at the ghost position.
    pub const fn index(&self) -> Option<usize> {
        match self.current {
            Some(_) => Some(self.index),
            None => None,
        }
    }

    /// Returns true if the Cursor is at the ghost position.
    pub const fn is_ghost(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the current element, or None at the ghost position.
    pub fn current(&self) -> Option<&'a T> {
        self.current.map(|node| node.value())
    }

    /// Returns the element that [`move_next`](Cursor::move_next) would reach.
    pub fn peek_next(&self) -> Option<&'a T> {
        let (next, _) = self.list.next_position(self.current, self.index);
        next.map(|node| node.value())
    }

    /// Returns the element that [`move_prev`](Cursor::move_prev) would reach.
    pub fn peek_prev(&self) -> Option<&'a T> {
        let (prev, _) = self.list.prev_position(self.current, self.index);
        prev.map(|node| node.value())
    }

    /// Moves to the next position, wrapping from the ghost to the first element.
    pub fn move_next(&mut self) -> &mut Self {
        (self.current, self.index) = self.list.next_position(self.current, self.index);
        self
    }

    /// Moves to the previous position, wrapping from the ghost to the last element.
    pub fn move_prev(&mut self) -> &mut Self {
        (self.current, self.index) = self.list.prev_position(self.current, self.index);
        self
    }
}

impl<'a, T, A: Allocator> Clone for Cursor<'a, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, A: Allocator> Copy for Cursor<'a, T, A> {}

impl<'a, T: Debug, A: Allocator> Debug for Cursor<'a, T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index())
            .field("current", &self.current())
            .finish()
    }
}

/// A position within a [`List`] that can also modify it. See [`List::cursor_front_mut`],
/// [`List::cursor_back_mut`] and [`List::cursor_end_mut`] to create one.
///
/// Insertion and removal at a CursorMut take constant time and leave every other element where it
/// was. Positions follow the same ghost semantics as [`Cursor`].
pub struct CursorMut<'a, T, A: Allocator = Global> {
    pub(crate) list: &'a mut List<T, A>,
    pub(crate) current: Link<T>,
    pub(crate) index: usize,
}

impl<'a, T, A: Allocator> CursorMut<'a, T, A> {
    /// Returns a read-only Cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T, A> {
        Cursor {
            list: &*self.list,
            current: self.current,
            index: self.index,
        }
    }

    /// Returns the index of the current element, or None at the ghost position.
    pub const fn index(&self) -> Option<usize> {
        match self.current {
            Some(_) => Some(self.index),
            None => None,
        }
    }

    /// Returns true if the CursorMut is at the ghost position.
    pub const fn is_ghost(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the current element, or None at the ghost position.
    pub fn current(&mut self) -> Option<&mut T> {
        self.current.map(|mut node| node.value_mut())
    }

    /// Returns the element that [`move_next`](CursorMut::move_next) would reach.
    pub fn peek_next(&mut self) -> Option<&mut T> {
        let (next, _) = self.list.next_position(self.current, self.index);
        next.map(|mut node| node.value_mut())
    }

    /// Returns the element that [`move_prev`](CursorMut::move_prev) would reach.
    pub fn peek_prev(&mut self) -> Option<&mut T> {
        let (prev, _) = self.list.prev_position(self.current, self.index);
        prev.map(|mut node| node.value_mut())
    }

    /// Moves to the next position, wrapping from the ghost to the first element.
    pub fn move_next(&mut self) -> &mut Self {
        (self.current, self.index) = self.list.next_position(self.current, self.index);
        self
    }

    /// Moves to the previous position, wrapping from the ghost to the last element.
    pub fn move_prev(&mut self) -> &mut Self {
        (self.current, self.index) = self.list.prev_position(self.current, self.index);
        self
    }

    /// Inserts `value` immediately before the current position. At the ghost position, this
    /// appends to the List.
    ///
    /// # Panics
    /// Panics if allocating the node fails.
    pub fn insert_before(&mut self, value: T) {
        self.try_insert_before(value).throw()
    }

    /// Inserts `value` immediately before the current position, returning an [`Err`] if the node
    /// can't be allocated.
    pub fn try_insert_before(&mut self, value: T) -> Result<(), AllocError> {
        let node = NodeRef::alloc_in(&self.list.alloc, value)?;
        self.link_before_current(node);
        Ok(())
    }

    /// Inserts `value` immediately after the current position. At the ghost position, this
    /// prepends to the List.
    ///
    /// # Panics
    /// Panics if allocating the node fails.
    pub fn insert_after(&mut self, value: T) {
        self.try_insert_after(value).throw()
    }

    /// Inserts `value` immediately after the current position, returning an [`Err`] if the node
    /// can't be allocated.
    pub fn try_insert_after(&mut self, value: T) -> Result<(), AllocError> {
        let node = NodeRef::alloc_in(&self.list.alloc, value)?;
        // SAFETY: The node is fresh from the list's allocator and current belongs to the list.
        unsafe { self.list.link_after(node, self.current); }
        if self.current.is_none() {
            // The ghost's index tracks the length.
            self.index += 1;
        }
        Ok(())
    }

    /// Constructs a new element with `f` directly inside a node, and links it immediately before
    /// the current position.
    ///
    /// # Panics
    /// Panics if allocating the node fails.
    pub fn emplace_before_with<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        self.try_emplace_before_with(|| Ok::<T, Infallible>(f())).throw()
    }

    /// Constructs a new element with the fallible constructor `f`, and links it immediately before
    /// the current position.
    ///
    /// The node is allocated first. If `f` then returns an [`Err`] or panics, the node is released
    /// and the List is left untouched.
    pub fn try_emplace_before_with<E, F>(&mut self, f: F) -> Result<&mut T, ConstructError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut node = NodeRef::try_alloc_with_in(&self.list.alloc, f)?;
        self.link_before_current(node);
        Ok(node.value_mut())
    }

    /// Removes the current element and returns it, moving the cursor to the following position.
    /// Does nothing at the ghost position.
    pub fn remove_current(&mut self) -> Option<T> {
        let node = self.current?;
        self.current = *node.next();
        // SAFETY: node is the current element of the list.
        Some(unsafe { self.list.remove_node(node) })
    }

    fn link_before_current(&mut self, node: NodeRef<T>) {
        // SAFETY: The node is fresh from the list's allocator and current belongs to the list.
        unsafe { self.list.link_before(node, self.current); }
        self.index += 1;
    }
}

impl<'a, T: Debug, A: Allocator> Debug for CursorMut<'a, T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.as_cursor(), f)
    }
}
