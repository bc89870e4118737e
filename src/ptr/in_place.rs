use std::ptr::NonNull;

use super::{ControlBlock, RefCounts};
use crate::alloc::{Allocator, DeallocGuard, Slot};
use crate::util::error::ConstructError;

/// A control block that stores its object inline, so the counts and the object share a single
/// allocation.
pub(crate) struct InPlaceBlock<T, A: Allocator> {
    counts: RefCounts,
    object: Slot<T>,
    alloc: A,
}

impl<T: 'static, A: Allocator + 'static> InPlaceBlock<T, A> {
    /// Allocates a block and constructs its object with `f`, returning pointers to both.
    ///
    /// The block is allocated before `f` runs. If `f` fails or panics, the allocation is released
    /// before the failure propagates.
    pub fn try_new_with_in<E, F>(
        alloc: A,
        f: F,
    ) -> Result<(NonNull<T>, NonNull<dyn ControlBlock>), ConstructError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let ptr = alloc.allocate_one::<Self>()?;
        let guard = DeallocGuard::new(&alloc, ptr);
        let value = match f() {
            Ok(value) => value,
            Err(err) => return Err(ConstructError::Construct(err)),
        };
        let ptr = guard.disarm();

        let block = InPlaceBlock {
            counts: RefCounts::new(),
            object: Slot::empty(),
            alloc: alloc.clone(),
        };
        // SAFETY: ptr was allocated for an InPlaceBlock above and is still uninitialized.
        unsafe { alloc.construct(ptr, block); }
        // SAFETY: The block was just initialized, and never moves again.
        let object = unsafe { ptr.as_ref() }.object.construct(value);

        let block: NonNull<dyn ControlBlock> = ptr;
        Ok((object, block))
    }

    /// # Safety
    /// `block` must point to an InPlaceBlock of exactly this type, with no remaining references.
    unsafe fn deallocate(block: NonNull<dyn ControlBlock>) {
        let ptr = block.cast::<Self>();
        // SAFETY: Upheld by the caller. The object was already destroyed, so the slot is empty and
        // dropping the moved out block only drops the allocator.
        unsafe {
            let block = ptr.read();
            block.alloc.deallocate_one(ptr);
            drop(block);
        }
    }
}

// SAFETY: The counts start from RefCounts::new, the slot never moves while the block is alive, and
// deallocate releases the block through the allocator stored inside it.
unsafe impl<T: 'static, A: Allocator + 'static> ControlBlock for InPlaceBlock<T, A> {
    fn counts(&self) -> &RefCounts {
        &self.counts
    }

    fn object(&self) -> NonNull<()> {
        self.object.as_ptr().cast()
    }

    unsafe fn delete_object(&self) {
        // SAFETY: Upheld by the caller, no handle dereferences the object once it's deleted.
        unsafe { self.object.destroy(); }
    }

    fn delete_block(&self) -> unsafe fn(NonNull<dyn ControlBlock>) {
        Self::deallocate
    }
}
