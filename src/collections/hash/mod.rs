//! Hash-based collections. Currently this is just [`UnorderedMap`], which stores its entries in
//! a [`List`](crate::collections::linked::List).

pub mod map;

#[doc(inline)]
pub use map::UnorderedMap;
