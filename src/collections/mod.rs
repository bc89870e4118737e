//! Node-based collection types whose memory is managed through an
//! [`Allocator`](crate::alloc::Allocator).
//!
//! # Purpose
//! Both collections here are built from the same parts: nodes with a payload and links in both
//! directions, allocated one at a time. [`UnorderedMap`](hash::UnorderedMap) doesn't have its own
//! node type at all, it stores its entries in a [`List`](linked::List) and only adds an index of
//! bucket heads on top.

#[cfg(feature = "hash")]
pub mod hash;
#[cfg(feature = "linked")]
pub mod linked;
