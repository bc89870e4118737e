use std::cell::Cell;
use std::process;
use std::ptr::{self, NonNull};

use log::trace;

/// The strong and weak reference counts of a control block.
///
/// A block starts out with one strong reference (the handle that created it) and no weak ones.
/// While the object is being destroyed, the block holds an extra weak reference of its own, so
/// weak handles dropped by the object itself can't free the block early.
#[derive(Debug)]
pub(crate) struct RefCounts {
    shared: Cell<usize>,
    weak: Cell<usize>,
}

impl RefCounts {
    pub const fn new() -> RefCounts {
        RefCounts {
            shared: Cell::new(1),
            weak: Cell::new(0),
        }
    }

    pub fn shared(&self) -> usize {
        self.shared.get()
    }

    pub fn weak(&self) -> usize {
        self.weak.get()
    }

    pub fn inc_shared(&self) -> usize {
        increment(&self.shared)
    }

    pub fn inc_weak(&self) -> usize {
        increment(&self.weak)
    }

    pub fn dec_shared(&self) -> usize {
        decrement(&self.shared)
    }

    pub fn dec_weak(&self) -> usize {
        decrement(&self.weak)
    }
}

fn increment(count: &Cell<usize>) -> usize {
    match count.get().checked_add(1) {
        Some(new) => {
            count.set(new);
            new
        },
        // Matches Rc: there's no way to continue safely once a count wraps.
        None => process::abort(),
    }
}

fn decrement(count: &Cell<usize>) -> usize {
    let new = count.get() - 1;
    count.set(new);
    new
}

/// The type-erased record that owns a shared object and decides how to destroy it.
///
/// # Safety
/// Implementors must start with [`RefCounts::new`], must report the object's address from
/// [`object`](ControlBlock::object) until [`delete_object`](ControlBlock::delete_object) is called,
/// and the function returned from [`delete_block`](ControlBlock::delete_block) must release the
/// block through the allocator it was created with.
pub(crate) unsafe trait ControlBlock {
    fn counts(&self) -> &RefCounts;

    /// Returns the address of the owned object.
    fn object(&self) -> NonNull<()>;

    /// Destroys the owned object.
    ///
    /// # Safety
    /// Must be called at most once, after the strong count has reached zero.
    unsafe fn delete_object(&self);

    /// Returns the function that releases a block of this type. The block can't free itself from
    /// a method, because `&self` would outlive the memory behind it.
    fn delete_block(&self) -> unsafe fn(NonNull<dyn ControlBlock>);
}

/// A copyable pointer to a live control block, with the release protocol built in.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BlockRef(pub NonNull<dyn ControlBlock>);

impl BlockRef {
    /// Returns the counts with an unbounded lifetime, the caller has to make sure the block is
    /// still alive while they are used.
    pub fn counts<'a>(&self) -> &'a RefCounts {
        // SAFETY: A BlockRef is only held by handles which keep the block alive.
        unsafe { self.0.as_ref() }.counts()
    }

    pub fn object(&self) -> NonNull<()> {
        // SAFETY: As above.
        unsafe { self.0.as_ref() }.object()
    }

    /// Adds a strong reference if the object is still alive, returning whether it did.
    pub fn try_acquire_shared(self) -> bool {
        let counts = self.counts();
        if counts.shared() == 0 {
            return false;
        }
        counts.inc_shared();
        true
    }

    /// Drops a strong reference, destroying the object if it was the last one.
    ///
    /// # Safety
    /// The caller must own the strong reference being released.
    pub unsafe fn release_shared(self) {
        let counts = self.counts();
        if counts.dec_shared() != 0 {
            return;
        }

        counts.inc_weak();
        // Releases the implicit weak reference, even if the destructor panics.
        let _implicit = ImplicitWeak(self);

        trace!("Destroying the object of control block {:p}", self.0);
        // SAFETY: The strong count just reached zero, and it can never be raised again.
        unsafe { self.0.as_ref().delete_object() }
    }

    /// Drops a weak reference, releasing the block once no references of either kind remain.
    ///
    /// # Safety
    /// The caller must own the weak reference being released.
    pub unsafe fn release_weak(self) {
        let counts = self.counts();
        if counts.dec_weak() != 0 || counts.shared() != 0 {
            return;
        }

        trace!("Releasing control block {:p}", self.0);
        // SAFETY: The block is alive until this call.
        let delete = unsafe { self.0.as_ref() }.delete_block();
        // SAFETY: Both counts are zero and the object is gone, so nothing refers to the block.
        unsafe { delete(self.0) }
    }

    pub fn same_block(self, other: BlockRef) -> bool {
        ptr::addr_eq(self.0.as_ptr(), other.0.as_ptr())
    }
}

struct ImplicitWeak(BlockRef);

impl Drop for ImplicitWeak {
    fn drop(&mut self) {
        // SAFETY: The guard owns the weak reference added in release_shared.
        unsafe { self.0.release_weak() }
    }
}

/// The object and block pointers held by a non-empty handle. The object pointer may differ from
/// the block's own object after [`project`](super::SharedPtr::project).
pub(crate) struct Referent<T: ?Sized> {
    pub object: NonNull<T>,
    pub block: BlockRef,
}

impl<T: ?Sized> Clone for Referent<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Referent<T> {}
