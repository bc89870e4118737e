use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// An attempt to access the object of an empty [`SharedPtr`](super::SharedPtr).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyPointer;

impl Display for EmptyPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Attempted to access the object of an empty SharedPtr!")
    }
}

impl Error for EmptyPointer {}

/// A [`WeakPtr`](super::WeakPtr) couldn't be upgraded, because its object has been destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired;

impl Display for Expired {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "WeakPtr has expired!")
    }
}

impl Error for Expired {}
