use std::alloc::Layout;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// An [`Allocator`](super::Allocator) was unable to provide a block for the requested `layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    pub layout: Layout,
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to allocate {} bytes with alignment {}!",
            self.layout.size(),
            self.layout.align()
        )
    }
}

impl Error for AllocError {}
