//! Reference-counted shared ownership through [`SharedPtr`] and [`WeakPtr`].
//!
//! # Purpose
//! Both handle types point at a type-erased control block, which owns the object and tracks how
//! many strong and weak handles refer to it. A block either wraps an object that was allocated
//! elsewhere together with a deleter for it ([`SharedPtr::from_box`], [`SharedPtr::from_raw_in`]),
//! or holds the object inline so that a single allocation covers both
//! ([`SharedPtr::make_shared`], [`SharedPtr::allocate_shared`]).
//!
//! The object is destroyed exactly once, when the last [`SharedPtr`] goes away. The block itself
//! is released once no handles of either kind remain. A [`WeakPtr`] never keeps the object alive,
//! but can be upgraded with [`WeakPtr::lock`] while it is.
//!
//! # Type Erasure
//! Handles only know the type they point at, not the type of their block. This is what allows
//! [`SharedPtr::project`] to produce a handle to a field, or to a trait object, that shares
//! ownership with the original. As a consequence, every object stored in a control block has to be
//! `'static`.

mod control_block;
mod error;
mod in_place;
mod regular;
mod shared_ptr;
mod weak_ptr;


pub(crate) use control_block::*;
pub use error::*;
pub(crate) use in_place::*;
pub(crate) use regular::*;
pub use shared_ptr::*;
pub use weak_ptr::*;
