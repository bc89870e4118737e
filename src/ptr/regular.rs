use std::cell::Cell;
use std::ptr::NonNull;

use super::{ControlBlock, RefCounts};
use crate::alloc::{AllocError, Allocator};

/// A control block for an object that was allocated elsewhere. The object is destroyed by handing
/// it to a deleter, and the block itself is a separate allocation from `A`.
pub(crate) struct RegularBlock<T: ?Sized, D: FnOnce(NonNull<T>), A: Allocator> {
    counts: RefCounts,
    object: NonNull<T>,
    // Taken when the object is deleted.
    deleter: Cell<Option<D>>,
    alloc: A,
}

impl<T, D, A> RegularBlock<T, D, A>
where
    T: ?Sized + 'static,
    D: FnOnce(NonNull<T>) + 'static,
    A: Allocator + 'static,
{
    /// Allocates a block that takes ownership of `object`. If the block can't be allocated,
    /// `deleter` is run on `object` before the error is returned, so the object is never leaked.
    pub fn try_new_in(
        object: NonNull<T>,
        deleter: D,
        alloc: A,
    ) -> Result<NonNull<dyn ControlBlock>, AllocError> {
        let ptr = match alloc.allocate_one::<Self>() {
            Ok(ptr) => ptr,
            Err(err) => {
                deleter(object);
                return Err(err);
            },
        };

        let block = RegularBlock {
            counts: RefCounts::new(),
            object,
            deleter: Cell::new(Some(deleter)),
            alloc: alloc.clone(),
        };
        // SAFETY: ptr was just allocated for a RegularBlock.
        unsafe { alloc.construct(ptr, block); }

        let block: NonNull<dyn ControlBlock> = ptr;
        Ok(block)
    }

    /// # Safety
    /// `block` must point to a RegularBlock of exactly this type, with no remaining references.
    unsafe fn deallocate(block: NonNull<dyn ControlBlock>) {
        let ptr = block.cast::<Self>();
        // SAFETY: Upheld by the caller. The block is moved out first, so its allocator is still
        // usable once the memory is gone.
        unsafe {
            let block = ptr.read();
            block.alloc.deallocate_one(ptr);
            drop(block);
        }
    }
}

// SAFETY: The counts start from RefCounts::new, object is reported until the deleter takes it, and
// deallocate releases the block through the allocator stored inside it.
unsafe impl<T, D, A> ControlBlock for RegularBlock<T, D, A>
where
    T: ?Sized + 'static,
    D: FnOnce(NonNull<T>) + 'static,
    A: Allocator + 'static,
{
    fn counts(&self) -> &RefCounts {
        &self.counts
    }

    fn object(&self) -> NonNull<()> {
        self.object.cast()
    }

    unsafe fn delete_object(&self) {
        if let Some(deleter) = self.deleter.take() {
            deleter(self.object);
        }
    }

    fn delete_block(&self) -> unsafe fn(NonNull<dyn ControlBlock>) {
        Self::deallocate
    }
}
