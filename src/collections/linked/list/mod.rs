mod cursor;
mod iter;
mod linked_list;
mod node;

#[cfg(test)]
mod tests;

pub use cursor::*;
pub use iter::*;
pub use linked_list::*;
pub(crate) use node::*;

pub use crate::util::error::{CapacityOverflow, IndexOrAllocError, IndexOutOfBounds};
