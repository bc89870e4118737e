use std::ptr::NonNull;

use crate::alloc::{AllocError, Allocator, DeallocGuard};
use crate::util::error::ConstructError;

pub(crate) type Link<T> = Option<NodeRef<T>>;

// NOTE: Nodes are allocated through the list's Allocator rather than Box, so every NodeRef is
// only meaningful together with the allocator that produced it. The accessors below hand out
// references with unbounded lifetimes; it's up to the owning list to tie them to a borrow of
// itself.

#[derive(Debug)]
pub(crate) struct NodeRef<T>(pub NonNull<Node<T>>);

impl<T> NodeRef<T> {
    pub const fn value<'a>(&self) -> &'a T {
        // SAFETY: A NodeRef always points to a live, initialized node owned by a list.
        unsafe { &(*self.0.as_ptr()).value }
    }

    pub const fn value_mut<'a>(&mut self) -> &'a mut T {
        // SAFETY: As above. Exclusivity is enforced by the list handing out the reference.
        unsafe { &mut (*self.0.as_ptr()).value }
    }

    pub fn value_ptr(self) -> NonNull<T> {
        // SAFETY: The address of a field within a valid node is never null.
        unsafe { NonNull::new_unchecked(&raw mut (*self.0.as_ptr()).value) }
    }

    pub fn prev<'a>(&self) -> &'a Link<T> {
        // SAFETY: A NodeRef always points to a live node.
        unsafe { &(*self.0.as_ptr()).prev }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn prev_mut<'a>(&self) -> &'a mut Link<T> {
        // SAFETY: A NodeRef always points to a live node. Links are only written by the list
        // while it is borrowed mutably.
        unsafe { &mut (*self.0.as_ptr()).prev }
    }

    pub fn next<'a>(&self) -> &'a Link<T> {
        // SAFETY: A NodeRef always points to a live node.
        unsafe { &(*self.0.as_ptr()).next }
    }

    #[allow(clippy::mut_from_ref)]
    pub fn next_mut<'a>(&self) -> &'a mut Link<T> {
        // SAFETY: As for prev_mut.
        unsafe { &mut (*self.0.as_ptr()).next }
    }

    /// Allocates a detached node holding `value`.
    pub fn alloc_in<A: Allocator>(alloc: &A, value: T) -> Result<NodeRef<T>, AllocError> {
        let ptr = alloc.allocate_one::<Node<T>>()?;
        // SAFETY: ptr was just allocated for a Node<T>.
        unsafe { alloc.construct(ptr, Node::detached(value)); }
        Ok(NodeRef(ptr))
    }

    /// Allocates a detached node and then constructs its value with `f`. If `f` fails or panics,
    /// the allocation is released before the failure propagates.
    pub fn try_alloc_with_in<A, E, F>(alloc: &A, f: F) -> Result<NodeRef<T>, ConstructError<E>>
    where
        A: Allocator,
        F: FnOnce() -> Result<T, E>,
    {
        let ptr = alloc.allocate_one::<Node<T>>()?;
        let guard = DeallocGuard::new(alloc, ptr);
        let value = match f() {
            Ok(value) => value,
            Err(err) => return Err(ConstructError::Construct(err)),
        };
        let ptr = guard.disarm();
        // SAFETY: ptr was allocated for a Node<T> above and is still uninitialized.
        unsafe { alloc.construct(ptr, Node::detached(value)); }
        Ok(NodeRef(ptr))
    }

    /// Moves the node out of its allocation and releases the memory.
    ///
    /// # Safety
    /// The node must have been allocated by `alloc` (or a clone of it), must already be unlinked
    /// and must not be used again.
    pub unsafe fn take_node_in<A: Allocator>(self, alloc: &A) -> Node<T> {
        // SAFETY: Upheld by the caller.
        unsafe {
            let node = self.0.read();
            alloc.deallocate_one(self.0);
            node
        }
    }

    /// Destroys the node in place and releases the memory.
    ///
    /// # Safety
    /// The same requirements as [`take_node_in`](NodeRef::take_node_in) apply.
    pub unsafe fn drop_node_in<A: Allocator>(self, alloc: &A) {
        // SAFETY: Upheld by the caller.
        unsafe {
            alloc.destroy(self.0);
            alloc.deallocate_one(self.0);
        }
    }
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<T> {}

impl<T> PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for NodeRef<T> {}

pub(crate) struct Node<T> {
    pub value: T,
    pub prev: Link<T>,
    pub next: Link<T>,
}

impl<T> Node<T> {
    pub const fn detached(value: T) -> Node<T> {
        Node {
            value,
            prev: None,
            next: None,
        }
    }
}
