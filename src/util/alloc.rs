use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::rc::Rc;

use crate::alloc::{AllocError, Allocator, Global};

#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<RefCell<usize>>);

impl CountedDrop {
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(RefCell::new(value)))
    }
}

impl Deref for CountedDrop {
    type Target = Rc<RefCell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CountedDrop {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.replace_with(|v| *v + 1);
    }
}

/// A value whose destructor panics if `panics` is set. Its `drops` counter is still bumped,
/// since the fields are dropped while unwinding.
#[derive(Debug)]
pub struct PanicOnDrop {
    pub panics: bool,
    pub drops: CountedDrop,
}

impl Drop for PanicOnDrop {
    fn drop(&mut self) {
        if self.panics {
            panic!("destructor panicked");
        }
    }
}

/// A value whose `clone` panics once a shared budget of successful clones is used up.
#[derive(Debug)]
pub struct PanicOnClone {
    pub id: usize,
    pub budget: Rc<Cell<usize>>,
    pub drops: CountedDrop,
}

impl Clone for PanicOnClone {
    fn clone(&self) -> Self {
        let left = self.budget.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }
        self.budget.set(left - 1);
        PanicOnClone {
            id: self.id,
            budget: self.budget.clone(),
            drops: self.drops.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct AllocStats {
    pub allocations: Cell<usize>,
    pub deallocations: Cell<usize>,
    /// Number of further allocations that succeed, or None for no limit.
    pub remaining: Cell<Option<usize>>,
}

impl AllocStats {
    pub fn live(&self) -> usize {
        self.allocations.get() - self.deallocations.get()
    }
}

/// Forwards to [`Global`] while counting calls, optionally failing once a budget runs out.
#[derive(Debug, Clone, Default)]
pub struct CountingAllocator {
    pub stats: Rc<AllocStats>,
}

impl CountingAllocator {
    pub fn new() -> CountingAllocator {
        CountingAllocator::default()
    }

    pub fn failing_after(successes: usize) -> CountingAllocator {
        let alloc = CountingAllocator::new();
        alloc.stats.remaining.set(Some(successes));
        alloc
    }

    pub fn allocations(&self) -> usize {
        self.stats.allocations.get()
    }

    pub fn live(&self) -> usize {
        self.stats.live()
    }
}

impl PartialEq for CountingAllocator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.stats, &other.stats)
    }
}

// SAFETY: Every block comes from Global and is returned to it.
unsafe impl Allocator for CountingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        match self.stats.remaining.get() {
            Some(0) => return Err(AllocError { layout }),
            Some(n) => self.stats.remaining.set(Some(n - 1)),
            None => {},
        }
        let ptr = Global.allocate(layout)?;
        self.stats.allocations.set(self.stats.allocations.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.stats.deallocations.set(self.stats.deallocations.get() + 1);
        // SAFETY: The block was allocated by Global with this layout.
        unsafe { Global.deallocate(ptr, layout) }
    }
}

/// A [`CountingAllocator`] that asks containers to adopt the source's allocator on copy
/// assignment, and hands out fresh counters on copy construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagatingAllocator(pub CountingAllocator);

// SAFETY: Forwards to CountingAllocator.
unsafe impl Allocator for PropagatingAllocator {
    const PROPAGATE_ON_COPY_ASSIGNMENT: bool = true;

    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.0.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: Forwarded from the caller.
        unsafe { self.0.deallocate(ptr, layout) }
    }

    fn select_on_copy(&self) -> Self {
        PropagatingAllocator(CountingAllocator::new())
    }
}
