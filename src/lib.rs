//! Allocator-aware containers and reference-counted pointers, written from scratch.
//!
//! # Purpose
//! Every type in this crate manages the lifetime of heap-allocated nodes by hand: allocating them
//! through a pluggable [`Allocator`](alloc::Allocator), constructing payloads into them, and
//! tearing both down again exactly once. The containers are:
//! - [`List`](collections::linked::List): a doubly linked list whose nodes come from an
//!   allocator.
//! - [`UnorderedMap`](collections::hash::UnorderedMap): a hash map that keeps its entries as the
//!   nodes of a [`List`](collections::linked::List), with buckets pointing into the list.
//! - [`SharedPtr`](ptr::SharedPtr) / [`WeakPtr`](ptr::WeakPtr): strong and weak handles around a
//!   type-erased control block.
//!
//! # Allocation
//! [`Global`](alloc::Global) forwards to the process heap. [`StackAllocator`](alloc::StackAllocator)
//! bumps through a fixed [`StackStorage`](alloc::StackStorage) owned by the caller and never
//! reclaims anything until the storage itself goes away. Any other strategy can be plugged in by
//! implementing [`Allocator`](alloc::Allocator).
//!
//! # Error Handling
//! Operations that can fail come in pairs. The `try_` method returns a [`Result`] with a small,
//! strongly typed error (often a ZST) implementing [`Error`](std::error::Error). The plain method
//! calls the `try_` one and panics with the error's message. Failing to allocate or to construct a
//! payload never leaves a container half-modified: whatever was allocated for the operation is
//! released again before the error reaches the caller.
//!
//! # Threading
//! Nothing here is thread-safe. Reference counts are plain [`Cell`](std::cell::Cell)s and every
//! container and handle is `!Send` and `!Sync`.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod alloc;
#[cfg(feature = "collections")]
pub mod collections;
#[cfg(feature = "ptr")]
pub mod ptr;

pub(crate) mod util;
