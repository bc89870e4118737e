//! A module containing [`UnorderedMap`] and associated types.
//!
//! The other included types are for iteration, providing owned and borrowed iteration over
//! entries, keys or values in a map, and the errors returned by the map's `try_` methods.
//!
//! As a note, there is no mutable access to keys, because mutating the key of an entry in place
//! would break the bucket it is filed under.

mod buckets;
mod error;
mod iter;
mod unordered_map;


pub(crate) use buckets::*;
pub use error::*;
pub use iter::*;
pub use unordered_map::*;
