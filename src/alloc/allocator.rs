use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use super::AllocError;

/// A handle that a container uses to obtain, initialize, tear down and release the memory for its
/// nodes.
///
/// Allocators have value semantics: containers store one and clone it when they need another
/// (for instance, when a container is copied). Clones must be interchangeable, so that a block
/// allocated by one clone can be released by another.
///
/// # Copying Containers
/// Two hooks decide which allocator a copied container ends up with:
/// - [`select_on_copy`](Allocator::select_on_copy) provides the allocator for a brand new copy
///   (`Clone::clone`).
/// - [`PROPAGATE_ON_COPY_ASSIGNMENT`](Allocator::PROPAGATE_ON_COPY_ASSIGNMENT) decides whether a
///   container that is overwritten with a copy (`Clone::clone_from`) adopts the source's allocator
///   or keeps its own.
///
/// # Safety
/// A block returned by `allocate` must be valid for reads and writes of `layout.size()` bytes,
/// aligned to `layout.align()`, and must not overlap any other live block. It must stay valid
/// until it is passed to `deallocate` on this allocator or one of its clones.
pub unsafe trait Allocator: Clone {
    /// Whether `clone_from` should replace the target's allocator with the source's.
    const PROPAGATE_ON_COPY_ASSIGNMENT: bool = false;

    /// Allocates a block of memory fitting `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Releases a block of memory.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate` on this allocator (or a clone of it) with the
    /// same `layout`, and must not have been deallocated already. Any value stored in the block
    /// must already be destroyed or moved out.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Returns the allocator that a copy of a container using `self` should use.
    fn select_on_copy(&self) -> Self {
        self.clone()
    }

    /// Allocates uninitialized memory for a single `T`.
    fn allocate_one<T>(&self) -> Result<NonNull<T>, AllocError> {
        self.allocate(Layout::new::<T>()).map(NonNull::cast)
    }

    /// Releases memory obtained from [`allocate_one`](Allocator::allocate_one).
    ///
    /// # Safety
    /// The same requirements as [`deallocate`](Allocator::deallocate) apply, with the layout of
    /// `T`.
    unsafe fn deallocate_one<T>(&self, ptr: NonNull<T>) {
        // SAFETY: Upheld by the caller.
        unsafe { self.deallocate(ptr.cast(), Layout::new::<T>()) }
    }

    /// Moves `value` into the uninitialized memory at `ptr`.
    ///
    /// # Safety
    /// `ptr` must be valid for writes and properly aligned. Any previous value at `ptr` is
    /// overwritten without being dropped.
    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        // SAFETY: Upheld by the caller.
        unsafe { ptr.write(value) }
    }

    /// Drops the value at `ptr` in place, leaving the memory allocated but uninitialized.
    ///
    /// # Safety
    /// `ptr` must point to an initialized `T` which isn't used again afterwards.
    unsafe fn destroy<T: ?Sized>(&self, ptr: NonNull<T>) {
        // SAFETY: Upheld by the caller.
        unsafe { ptr::drop_in_place(ptr.as_ptr()) }
    }
}

/// The default allocator, which forwards to the global heap from [`std::alloc`].
///
/// Unlike most of the standard library, a failed heap allocation is reported as an
/// [`AllocError`] rather than aborting the process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

// SAFETY: Blocks come straight from std::alloc::alloc with the requested layout, or are dangling
// (but aligned) for zero sized layouts, which are never read or written.
unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }

        // SAFETY: The layout has a non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError { layout })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }

        // SAFETY: It is up to the caller to ensure that ptr was allocated by Global with layout.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// A well-aligned, non-null pointer that is only valid for zero sized accesses.
pub(crate) fn dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: Alignments are never zero.
    unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(layout.align())) }
}
