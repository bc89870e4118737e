use std::alloc::Layout;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

use super::ReserveError;
use crate::alloc::Allocator;
use crate::collections::linked::list::Link;
use crate::util::error::CapacityOverflow;

/// A fixed-size array of bucket heads, allocated through the same allocator as the map's nodes.
pub(crate) struct Buckets<T, A: Allocator> {
    ptr: NonNull<Link<T>>,
    len: usize,
    layout: Layout,
    alloc: A,
}

impl<T, A: Allocator> Buckets<T, A> {
    /// Allocates `len` empty buckets. Fails with [`CapacityOverflow`] if the array would be larger
    /// than `isize::MAX` bytes.
    pub fn try_new_in(len: usize, alloc: A) -> Result<Buckets<T, A>, ReserveError> {
        let layout = Layout::array::<Link<T>>(len).map_err(|_| CapacityOverflow)?;
        let ptr = alloc.allocate(layout)?.cast::<Link<T>>();
        for index in 0..len {
            // SAFETY: The block was allocated for len links, so every offset below len is in
            // bounds.
            unsafe { alloc.construct(ptr.add(index), None); }
        }
        Ok(Buckets { ptr, len, layout, alloc })
    }
}

impl<T, A: Allocator> Deref for Buckets<T, A> {
    type Target = [Link<T>];

    fn deref(&self) -> &Self::Target {
        // SAFETY: All len links were initialized on construction.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T, A: Allocator> DerefMut for Buckets<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As above, and we have exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T, A: Allocator> Drop for Buckets<T, A> {
    fn drop(&mut self) {
        // Links don't need dropping, so the block can be released straight away.
        // SAFETY: The block was allocated by alloc with this exact layout.
        unsafe { self.alloc.deallocate(self.ptr.cast(), self.layout) }
    }
}
