#![cfg(test)]

use std::alloc::Layout;

use super::*;
use crate::util::alloc::{CountedDrop, CountingAllocator};
use crate::util::panic::assert_panics;

#[test]
fn test_global_round_trip() {
    let layout = Layout::new::<[u64; 4]>();
    let ptr = Global.allocate(layout).expect("heap allocation should succeed");
    assert_eq!(ptr.as_ptr() as usize % layout.align(), 0, "Blocks should be aligned.");

    let typed = ptr.cast::<[u64; 4]>();
    // SAFETY: The block is valid for [u64; 4] and is released right after.
    unsafe {
        Global.construct(typed, [1, 2, 3, 4]);
        assert_eq!(typed.read(), [1, 2, 3, 4]);
        Global.deallocate(ptr, layout);
    }
}

#[test]
fn test_global_zero_sized() {
    let layout = Layout::from_size_align(0, 16).expect("valid layout");
    let ptr = Global.allocate(layout).expect("zero sized allocations can't fail");
    assert_eq!(ptr.as_ptr() as usize % 16, 0);
    // SAFETY: Zero sized blocks are never dereferenced.
    unsafe { Global.deallocate(ptr, layout) };
}

#[test]
fn test_stack_allocator_bumps_and_aligns() {
    let storage = StackStorage::<64>::new();
    let alloc = storage.allocator();

    let a = alloc.allocate(Layout::new::<u8>()).expect("fits");
    let b = alloc.allocate(Layout::new::<u64>()).expect("fits");

    assert_eq!(b.as_ptr() as usize % 8, 0, "The second block should be realigned.");
    assert!(b.as_ptr() as usize > a.as_ptr() as usize, "Blocks should not overlap.");
    assert!(storage.used() >= 9);
    assert!(storage.used() <= 16);
}

#[test]
fn test_stack_allocator_exhaustion() {
    let storage = StackStorage::<16>::new();
    let alloc = storage.allocator();

    assert!(alloc.allocate(Layout::new::<[u8; 12]>()).is_ok());
    let err = alloc.allocate(Layout::new::<[u8; 8]>()).expect_err("storage is exhausted");
    assert_eq!(err.layout, Layout::new::<[u8; 8]>());
    assert_eq!(storage.remaining(), 4, "A failed allocation shouldn't consume any space.");

    // Deallocation is a no-op for bump storage.
    let before = storage.used();
    // SAFETY: Deallocating a StackAllocator block doesn't touch the memory.
    unsafe { alloc.deallocate(std::ptr::NonNull::dangling(), Layout::new::<u8>()) };
    assert_eq!(storage.used(), before);
}

#[test]
fn test_stack_allocator_identity() {
    let first = StackStorage::<8>::new();
    let second = StackStorage::<8>::new();

    assert_eq!(first.allocator(), first.allocator().select_on_copy());
    assert_ne!(first.allocator(), second.allocator());
}

#[test]
fn test_slot_lifecycle() {
    let counter = CountedDrop::new(0);
    let slot = Slot::empty();
    assert!(!slot.is_live());
    assert!(slot.get().is_none());

    slot.construct(counter.clone());
    assert!(slot.is_live());

    // SAFETY: No references into the slot are held.
    assert!(unsafe { slot.destroy() });
    assert_eq!(*counter.borrow(), 1, "Destroying a live slot should drop its value.");
    // SAFETY: As above.
    assert!(!unsafe { slot.destroy() }, "An empty slot has nothing to destroy.");

    slot.construct(counter.clone());
    drop(slot);
    assert_eq!(*counter.borrow(), 2, "Dropping a live slot should drop its value.");
}

#[test]
fn test_slot_double_construct_panics() {
    assert_panics!({
        let slot = Slot::empty();
        slot.construct(1_u32);
        slot.construct(2_u32);
    });
}

#[test]
fn test_dealloc_guard_rolls_back() {
    let alloc = CountingAllocator::new();

    let ptr = alloc.allocate_one::<u64>().expect("fits");
    drop(DeallocGuard::new(&alloc, ptr));
    assert_eq!(alloc.live(), 0, "A dropped guard should release its block.");

    let ptr = alloc.allocate_one::<u64>().expect("fits");
    let ptr = DeallocGuard::new(&alloc, ptr).disarm();
    assert_eq!(alloc.live(), 1, "A disarmed guard should leave the block allocated.");
    // SAFETY: The block came from allocate_one::<u64> and holds no value.
    unsafe { alloc.deallocate_one(ptr) };
    assert_eq!(alloc.live(), 0);
}

#[test]
fn test_counting_allocator_budget() {
    let alloc = CountingAllocator::failing_after(1);
    let ptr = alloc.allocate_one::<u8>().expect("the first allocation is within budget");
    assert!(alloc.allocate_one::<u8>().is_err());
    // SAFETY: Allocated above.
    unsafe { alloc.deallocate_one(ptr) };

    assert_eq!(alloc.allocations(), 1);
}
