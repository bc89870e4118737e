use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant};

use crate::alloc::AllocError;
use crate::util::error::CapacityOverflow;

/// The requested key has no entry in the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNotFound;

impl Display for KeyNotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Key not found in map!")
    }
}

impl Error for KeyNotFound {}

/// A maximum load factor must be a positive number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidLoadFactor(pub f32);

impl Display for InvalidLoadFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid max load factor {}, expected a positive number!", self.0)
    }
}

impl Error for InvalidLoadFactor {}

/// The ways that sizing a map's bucket array can fail: the count can't be represented as an
/// allocation at all, or the allocator couldn't provide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, IsVariant)]
pub enum ReserveError {
    CapacityOverflow(CapacityOverflow),
    Alloc(AllocError),
}
