use std::alloc::Layout;
use std::cell::{Cell, UnsafeCell};
use std::fmt::{self, Debug, Formatter};
use std::mem::MaybeUninit;
use std::ptr::{self, NonNull};

use log::debug;

use super::{AllocError, Allocator, dangling};

/// A fixed block of `N` bytes that [`StackAllocator`]s carve allocations out of.
///
/// The storage only ever grows its used region: nothing handed out is reclaimed until the storage
/// itself is dropped. It can't be copied or cloned, since allocators point into it.
pub struct StackStorage<const N: usize> {
    bytes: UnsafeCell<[MaybeUninit<u8>; N]>,
    shift: Cell<usize>,
}

impl<const N: usize> StackStorage<N> {
    /// Creates a new, completely unused storage.
    pub const fn new() -> StackStorage<N> {
        StackStorage {
            bytes: UnsafeCell::new([MaybeUninit::uninit(); N]),
            shift: Cell::new(0),
        }
    }

    /// Returns the total number of bytes in the storage.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns the number of bytes consumed so far, including any alignment padding.
    pub fn used(&self) -> usize {
        self.shift.get()
    }

    /// Returns the number of bytes that haven't been handed out yet.
    pub fn remaining(&self) -> usize {
        N - self.shift.get()
    }

    /// Returns an allocator drawing from this storage.
    pub const fn allocator(&self) -> StackAllocator<'_, N> {
        StackAllocator::new(self)
    }

    fn base(&self) -> *mut u8 {
        self.bytes.get().cast()
    }
}

impl<const N: usize> Default for StackStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Debug for StackStorage<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackStorage")
            .field("capacity", &N)
            .field("used", &self.used())
            .finish()
    }
}

/// A bump allocator over a borrowed [`StackStorage`].
///
/// Each allocation is placed at the next suitably aligned offset after the previous one.
/// Deallocation does nothing, so a container that churns through nodes will eventually exhaust
/// the storage, at which point allocation fails with an [`AllocError`].
///
/// Copies share the same storage and are therefore interchangeable; two StackAllocators are equal
/// if they point at the same storage.
pub struct StackAllocator<'a, const N: usize> {
    storage: &'a StackStorage<N>,
}

impl<'a, const N: usize> StackAllocator<'a, N> {
    /// Creates a new allocator for `storage`.
    pub const fn new(storage: &'a StackStorage<N>) -> StackAllocator<'a, N> {
        StackAllocator { storage }
    }

    /// Returns the storage this allocator draws from.
    pub const fn storage(&self) -> &'a StackStorage<N> {
        self.storage
    }
}

impl<'a, const N: usize> Clone for StackAllocator<'a, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, const N: usize> Copy for StackAllocator<'a, N> {}

impl<'a, const N: usize> PartialEq for StackAllocator<'a, N> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.storage, other.storage)
    }
}

impl<'a, const N: usize> Eq for StackAllocator<'a, N> {}

impl<'a, const N: usize> Debug for StackAllocator<'a, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StackAllocator").field(self.storage).finish()
    }
}

// SAFETY: Every block lies within the storage's byte array, is aligned as requested and starts
// after the end of the previous one, so no two live blocks overlap. The lifetime 'a ensures that
// the storage outlives any container holding the allocator.
unsafe impl<'a, const N: usize> Allocator for StackAllocator<'a, N> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }

        let base = self.storage.base();
        let shift = self.storage.shift.get();

        let addr = base as usize + shift;
        let padding = addr.next_multiple_of(layout.align()) - addr;

        let end = shift
            .checked_add(padding)
            .and_then(|start| start.checked_add(layout.size()))
            .filter(|end| *end <= N);

        match end {
            Some(end) => {
                self.storage.shift.set(end);
                // SAFETY: shift + padding is at most end, which is within the storage.
                Ok(unsafe { NonNull::new_unchecked(base.add(shift + padding)) })
            },
            None => {
                debug!(
                    "StackStorage<{N}> exhausted: {} bytes used, {} requested (align {})",
                    shift,
                    layout.size(),
                    layout.align()
                );
                Err(AllocError { layout })
            },
        }
    }

    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _layout: Layout) {}
}
