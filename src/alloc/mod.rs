//! Allocation strategies for node-based containers.
//!
//! Containers in this crate never call into the heap directly. They hold an [`Allocator`] and
//! route every node (or control block) through it, which lets a caller swap the process heap
//! ([`Global`]) for a fixed arena ([`StackAllocator`]) or an instrumented wrapper without touching
//! the container code.
//!
//! [`Slot`] is the other half of manual memory management here: a place for one value that may or
//! may not be initialized, with construction and destruction made explicit.

mod allocator;
mod error;
mod guard;
mod slot;
mod stack;

#[cfg(test)]
mod tests;

pub use allocator::*;
pub use error::*;
pub(crate) use guard::*;
pub use slot::*;
pub use stack::*;
pub use crate::util::error::ConstructError;
