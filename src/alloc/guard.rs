use std::mem;
use std::ptr::NonNull;

use super::Allocator;

/// Owns a freshly allocated, still uninitialized block until construction into it has succeeded.
///
/// If the guard is dropped (an early return or a panicking constructor), the block goes back to
/// the allocator untouched. Once the block holds a value, [`disarm`](DeallocGuard::disarm) hands
/// ownership back to the caller.
pub(crate) struct DeallocGuard<'a, T, A: Allocator> {
    alloc: &'a A,
    ptr: NonNull<T>,
}

impl<'a, T, A: Allocator> DeallocGuard<'a, T, A> {
    pub const fn new(alloc: &'a A, ptr: NonNull<T>) -> DeallocGuard<'a, T, A> {
        DeallocGuard { alloc, ptr }
    }

    pub fn disarm(self) -> NonNull<T> {
        let ptr = self.ptr;
        mem::forget(self);
        ptr
    }
}

impl<'a, T, A: Allocator> Drop for DeallocGuard<'a, T, A> {
    fn drop(&mut self) {
        // SAFETY: The guard is only built around a block from allocate_one::<T> on this allocator,
        // and a disarmed guard is never dropped.
        unsafe { self.alloc.deallocate_one(self.ptr) }
    }
}
