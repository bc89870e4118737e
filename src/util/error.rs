use std::convert::Infallible;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant};

use crate::alloc::AllocError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityOverflow;

impl Display for CapacityOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Capacity overflow!")
    }
}

impl Error for CapacityOverflow {}

/// The reasons that constructing a value in freshly allocated memory can fail: either the memory
/// couldn't be obtained (`R`, usually an [`AllocError`]), or the constructor itself reported an
/// error of type `E`.
///
/// Either way, nothing allocated for the construction outlives the error.
#[derive(Debug, Display, IsVariant)]
pub enum ConstructError<E, R = AllocError> {
    #[display("{_0}")]
    Alloc(R),
    #[display("Constructor failed: {_0}")]
    Construct(E),
}

impl<E, R> ConstructError<E, R> {
    /// Returns the constructor's error, if that was the cause of the failure.
    pub fn into_construct(self) -> Option<E> {
        match self {
            ConstructError::Alloc(_) => None,
            ConstructError::Construct(err) => Some(err),
        }
    }

    /// Converts the allocation side of the error with `f`, keeping a constructor error as is.
    pub fn map_alloc<T, F: FnOnce(R) -> T>(self, f: F) -> ConstructError<E, T> {
        match self {
            ConstructError::Alloc(err) => ConstructError::Alloc(f(err)),
            ConstructError::Construct(err) => ConstructError::Construct(err),
        }
    }
}

impl<E> From<AllocError> for ConstructError<E> {
    fn from(value: AllocError) -> Self {
        ConstructError::Alloc(value)
    }
}

impl<E: Error + 'static, R: Error + 'static> Error for ConstructError<E, R> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConstructError::Alloc(err) => Some(err),
            ConstructError::Construct(err) => Some(err),
        }
    }
}

/// The two ways an index-based insertion can fail.
#[derive(Debug, Display, Error, From, IsVariant)]
pub enum IndexOrAllocError {
    IndexOutOfBounds(IndexOutOfBounds),
    Alloc(AllocError),
}

impl<R> ConstructError<Infallible, R> {
    /// Unwraps the allocation failure, which is the only way an infallible construction can fail.
    pub fn into_alloc(self) -> R {
        match self {
            ConstructError::Alloc(err) => err,
            ConstructError::Construct(never) => match never {},
        }
    }
}
