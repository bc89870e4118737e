//! Linked collection types. Primarily revolves around [`List`] and its accompanying [`Cursor`] and
//! [`CursorMut`] types.

pub mod list;

#[doc(inline)]
pub use list::{Cursor, CursorMut, List};
