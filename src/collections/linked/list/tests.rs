#![cfg(test)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::alloc::{Allocator, StackStorage};
use crate::util::alloc::{
    CountedDrop, CountingAllocator, PanicOnClone, PanicOnDrop, PropagatingAllocator,
};
use crate::util::panic::assert_panics;

fn contents<T: Clone, A: Allocator>(list: &List<T, A>) -> Vec<T> {
    list.iter().cloned().collect()
}

fn panicking_items(
    count: usize,
    budget: &Rc<Cell<usize>>,
    drops: &CountedDrop,
) -> Vec<PanicOnClone> {
    (0..count)
        .map(|id| PanicOnClone {
            id,
            budget: budget.clone(),
            drops: drops.clone(),
        })
        .collect()
}

#[test]
fn test_push_pop() {
    let mut list = List::new();
    for i in 0..5 {
        list.push_back(i);
    }
    list.push_front(-1);
    list.verify_double_links();

    assert_eq!(list.len(), 6);
    assert_eq!(list.front(), Some(&-1));
    assert_eq!(list.back(), Some(&4));

    assert_eq!(list.pop_front(), Some(-1));
    assert_eq!(list.pop_back(), Some(4));
    list.verify_double_links();
    assert_eq!(contents(&list), vec![0, 1, 2, 3]);

    *list.emplace_back_with(|| 9) += 1;
    if let Some(front) = list.front_mut() {
        *front = 100;
    }
    if let Some(back) = list.back_mut() {
        *back *= 2;
    }
    assert_eq!(contents(&list), vec![100, 1, 2, 3, 20]);
    list.pop_back();
    list[0] = 0;

    while list.pop_back().is_some() {}
    assert!(list.is_empty());
    assert_eq!(list.pop_front(), None, "Popping an empty list should do nothing.");
    list.verify_double_links();
}

#[test]
fn test_bidirectional_iteration() {
    let mut list: List<i32> = (1..=5).collect();

    assert_eq!(
        list.iter().rev().copied().collect::<Vec<_>>(),
        vec![5, 4, 3, 2, 1],
        "Reverse iteration should visit every element backwards."
    );

    let mut iter = list.iter();
    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next_back(), Some(&5));
    assert_eq!(iter.len(), 3, "Both ends should count towards the remaining length.");
    assert_eq!(iter.copied().collect::<Vec<_>>(), vec![2, 3, 4]);

    for item in list.iter_mut() {
        *item *= 10;
    }
    assert_eq!(
        list.into_iter().rev().collect::<Vec<_>>(),
        vec![50, 40, 30, 20, 10]
    );
}

#[test]
fn test_index_operations() {
    let mut list: List<i32> = List::from_iter([1, 3]);

    list.insert(0, 0);
    list.insert(2, 2);
    list.insert(4, 4);
    list.verify_double_links();
    assert_eq!(contents(&list), vec![0, 1, 2, 3, 4]);

    assert_eq!(list[3], 3);
    list[3] = 30;
    assert_eq!(*list.get(3), 30);

    assert_eq!(list.remove(3), 30);
    assert_eq!(list.remove(0), 0);
    list.verify_double_links();
    assert_eq!(contents(&list), vec![1, 2, 4]);

    assert_eq!(
        list.try_get(3).expect_err("index 3 is past the end"),
        IndexOutOfBounds { index: 3, len: 3 }
    );
    assert!(list.try_insert(5, 0).expect_err("index 5 is past the end").is_index_out_of_bounds());
    assert!(list.try_remove(3).is_err());
    assert_panics!({
        let list: List<i32> = List::new();
        list[0]
    });

    assert_eq!(list.index_of(&4), Some(2));
    assert!(list.contains(&2));
    assert!(!list.contains(&3));
}

#[test]
fn test_bulk_constructors() {
    let list = List::<u8>::with_len(3);
    assert_eq!(contents(&list), vec![0, 0, 0]);

    let list = List::from_elem(4, "a");
    assert_eq!(contents(&list), vec!["a"; 4]);

    let list = List::from_elem(0, "a");
    assert!(list.is_empty());

    let alloc = CountingAllocator::new();
    let list = List::from_elem_in(3, 7_u32, alloc.clone());
    assert_eq!(alloc.live(), 3, "Each element should have its own node.");
    drop(list);
    assert_eq!(alloc.live(), 0, "Every node should be released on drop.");
}

#[test]
fn test_cursor_wraps_through_ghost() {
    let list: List<i32> = (1..=3).collect();

    let mut cursor = list.cursor_end();
    assert!(cursor.is_ghost());
    assert_eq!(cursor.index(), None);
    assert_eq!(cursor.peek_next(), Some(&1));
    assert_eq!(cursor.peek_prev(), Some(&3));

    cursor.move_next();
    assert_eq!(cursor.current(), Some(&1));
    assert_eq!(cursor.index(), Some(0));

    cursor.move_prev();
    assert!(cursor.is_ghost(), "Moving back from the first element should reach the ghost.");

    cursor.move_prev();
    assert_eq!(cursor.current(), Some(&3));
    assert_eq!(cursor.index(), Some(2));

    cursor.move_next();
    assert!(cursor.is_ghost(), "Moving on from the last element should reach the ghost.");

    let mut cursor = list.cursor_back();
    cursor.move_prev().move_prev();
    assert_eq!(cursor.current(), Some(&1));
    assert!(ptr::eq(cursor.as_list(), &list));

    let empty: List<i32> = List::new();
    let mut cursor = empty.cursor_front();
    assert!(cursor.is_ghost());
    cursor.move_next().move_prev();
    assert!(cursor.is_ghost(), "An empty list only has the ghost position.");
}

#[test]
fn test_cursor_mut_insert_and_remove() {
    let mut list: List<i32> = List::from_iter([1, 3]);

    let mut cursor = list.cursor_front_mut();
    cursor.move_next();
    assert_eq!(cursor.current(), Some(&mut 3));

    cursor.insert_before(2);
    assert_eq!(cursor.current(), Some(&mut 3), "Inserting before shouldn't move the cursor.");
    assert_eq!(cursor.index(), Some(2), "The cursor's index should account for the insertion.");

    assert_eq!(cursor.remove_current(), Some(3));
    assert!(cursor.is_ghost(), "Removing the last element should move to the ghost.");
    assert_eq!(cursor.remove_current(), None, "The ghost can't be removed.");

    cursor.insert_before(4);
    cursor.insert_after(0);
    *cursor.emplace_before_with(|| 5) += 1;

    let mut cursor = cursor.as_cursor();
    cursor.move_prev();
    assert_eq!(cursor.current(), Some(&6));
    assert_eq!(cursor.index(), Some(4));

    list.verify_double_links();
    assert_eq!(contents(&list), vec![0, 1, 2, 4, 6]);

    let mut cursor = list.cursor_front_mut();
    *cursor.peek_next().unwrap() += 10;
    cursor.move_prev();
    assert!(cursor.is_ghost());
    assert_eq!(cursor.peek_prev(), Some(&mut 6));
    assert_eq!(cursor.peek_next(), Some(&mut 0));
    cursor.move_next();
    assert_eq!(cursor.index(), Some(0));
    assert_eq!(cursor.as_cursor().peek_next(), Some(&11));

    while cursor.remove_current().is_some() {}
    assert!(list.is_empty());
    list.verify_double_links();
}

#[test]
fn test_copies_are_independent() {
    let original: List<i32> = (1..=3).collect();
    let mut copy = original.clone();

    copy.push_back(4);
    copy[0] = 10;

    assert_eq!(contents(&original), vec![1, 2, 3]);
    assert_eq!(contents(&copy), vec![10, 2, 3, 4]);

    let mut target: List<i32> = (7..20).collect();
    target.clone_from(&original);
    assert_eq!(target, original);

    let moved = mem::take(&mut target);
    assert!(target.is_empty(), "A moved-from list should be left empty.");
    assert_eq!(moved, original);
}

#[test]
fn test_clone_is_all_or_nothing() {
    let alloc = CountingAllocator::new();
    let budget = Rc::new(Cell::new(usize::MAX));
    let drops = CountedDrop::new(0);

    let mut list: List<PanicOnClone, _> = List::new_in(alloc.clone());
    list.extend(panicking_items(4, &budget, &drops));
    assert_eq!(alloc.live(), 4);

    let copies = CountingAllocator::new();
    budget.set(2);
    let result = panic::catch_unwind(AssertUnwindSafe(|| list.clone_in(copies.clone())));

    assert!(result.is_err(), "The third clone should panic.");
    assert_eq!(copies.live(), 0, "The partial copy should release all of its nodes.");
    assert_eq!(copies.allocations(), 2);
    assert_eq!(*drops.borrow(), 2, "Both completed clones should be dropped exactly once.");

    assert_eq!(list.len(), 4, "The source shouldn't be affected.");
    assert_eq!(alloc.live(), 4);
    list.verify_double_links();

    drop(list);
    assert_eq!(*drops.borrow(), 6);
    assert_eq!(alloc.live(), 0);
}

#[test]
fn test_from_elem_is_all_or_nothing() {
    let alloc = CountingAllocator::new();
    let budget = Rc::new(Cell::new(2));
    let drops = CountedDrop::new(0);
    let item = panicking_items(1, &budget, &drops).remove(0);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        List::from_elem_in(5, item, alloc.clone())
    }));

    assert!(result.is_err());
    assert_eq!(alloc.live(), 0);
    assert_eq!(*drops.borrow(), 3, "Both clones and the original value should be dropped.");
}

#[test]
fn test_stack_allocator_exhaustion() {
    let storage = StackStorage::<256>::new();
    let mut list = List::new_in(storage.allocator());

    let mut pushed = 0_u64;
    while list.try_push_back(pushed).is_ok() {
        pushed += 1;
    }
    let len = list.len();
    assert_eq!(len as u64, pushed);
    assert!(len >= 9, "At least nine nodes should fit in the storage.");

    let err = list.try_push_front(0).expect_err("the storage is exhausted");
    assert_eq!(err.layout.size(), mem::size_of::<Node<u64>>());
    assert_eq!(list.len(), len, "A failed push should leave the list untouched.");

    list.pop_front();
    assert!(
        list.try_push_back(0).is_err(),
        "Stack storage never reuses released space."
    );

    list.verify_double_links();
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), (1..pushed).collect::<Vec<_>>());
}

#[test]
fn test_emplace_rolls_back() {
    let alloc = CountingAllocator::new();
    let mut list = List::new_in(alloc.clone());
    list.push_back(1);

    let err = list
        .try_emplace_back_with(|| Err::<i32, _>("bad value"))
        .expect_err("constructor fails");
    assert_eq!(err.into_construct(), Some("bad value"));
    assert_eq!(alloc.live(), 1, "The node for the failed value should be released.");
    assert_eq!(list.len(), 1);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        list.emplace_front_with(|| panic!("constructor panics"));
    }));
    assert!(result.is_err());
    assert_eq!(alloc.live(), 1, "A panicking constructor shouldn't leak its node.");
    list.verify_double_links();
    assert_eq!(contents(&list), vec![1]);

    let mut list = List::new_in(CountingAllocator::failing_after(1));
    list.push_back(1);
    let called = Cell::new(false);
    let err = list
        .try_emplace_back_with(|| {
            called.set(true);
            Ok::<_, ()>(2)
        })
        .expect_err("the allocator is out of budget");

    assert!(err.is_alloc());
    assert!(!called.get(), "The constructor shouldn't run without a node to put its value in.");
    assert_eq!(contents(&list), vec![1]);
}

#[test]
fn test_clone_from_allocator_propagation() {
    let source_alloc = PropagatingAllocator::default();
    let target_alloc = PropagatingAllocator::default();

    let mut source: List<i32, _> = List::new_in(source_alloc.clone());
    source.extend([1, 2, 3]);
    let mut target: List<i32, _> = List::new_in(target_alloc.clone());
    target.extend([9, 9]);

    target.clone_from(&source);
    assert_eq!(target, source);
    assert_eq!(target.allocator(), source.allocator(), "The source allocator should propagate.");
    assert_eq!(target_alloc.0.live(), 0, "The old nodes should go back to the old allocator.");
    assert_eq!(source_alloc.0.live(), 6);

    let copy = source.clone();
    assert_ne!(copy.allocator(), source.allocator(), "Copies use select_on_copy.");

    let source_alloc = CountingAllocator::new();
    let target_alloc = CountingAllocator::new();
    let mut source: List<i32, _> = List::new_in(source_alloc.clone());
    source.extend([1, 2, 3]);
    let mut target = List::new_in(target_alloc.clone());

    target.clone_from(&source);
    assert_eq!(target, source);
    assert_eq!(target.allocator(), &target_alloc, "Without propagation, the target keeps its own.");
    assert_eq!(target_alloc.live(), 3);
}

#[test]
fn test_drops_every_element_once() {
    let counter = CountedDrop::new(0);
    let mut list = List::new();
    for _ in 0..10 {
        list.push_back(counter.clone());
    }

    drop(list.pop_back());
    assert_eq!(*counter.borrow(), 1);

    let mut iter = list.into_iter();
    drop(iter.next());
    drop(iter);
    assert_eq!(*counter.borrow(), 10, "A partly consumed iterator should drop the rest.");
}

#[test]
fn test_panicking_destructor_drops_the_rest() {
    let drops = CountedDrop::new(0);
    let alloc = CountingAllocator::new();
    let items = |panicking: usize| -> Vec<PanicOnDrop> {
        (0..3)
            .map(|i| PanicOnDrop {
                panics: i == panicking,
                drops: drops.clone(),
            })
            .collect()
    };

    let mut list = List::new_in(alloc.clone());
    list.extend(items(0));
    let result = panic::catch_unwind(AssertUnwindSafe(move || drop(list)));
    assert!(result.is_err());
    assert_eq!(*drops.borrow(), 3, "Every element should be dropped despite the panic.");
    assert_eq!(alloc.live(), 0);

    let mut list = List::new_in(alloc.clone());
    list.extend(items(1));
    assert_panics!({ list.clear(); });
    assert!(list.is_empty());
    list.verify_double_links();
    assert_eq!(*drops.borrow(), 6);
    assert_eq!(alloc.live(), 0);

    let mut list = List::new_in(alloc.clone());
    list.extend(items(2));
    let mut iter = list.into_iter();
    drop(iter.next());
    assert_panics!({ drop(iter); });
    assert_eq!(*drops.borrow(), 9);
    assert_eq!(alloc.live(), 0);
}

#[test]
fn test_formatting() {
    let list: List<i32> = (1..=3).collect();
    assert_eq!(format!("{list}"), "(1) -> (2) -> (3)");
    assert_eq!(format!("{list:?}"), "[1, 2, 3]");
    assert_eq!(format!("{}", List::<i32>::new()), "()");
}

#[derive(Debug, Clone)]
enum Op {
    PushFront(i32),
    PushBack(i32),
    PopFront,
    PopBack,
    Insert(usize, i32),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::PushFront),
        any::<i32>().prop_map(Op::PushBack),
        Just(Op::PopFront),
        Just(Op::PopBack),
        (any::<usize>(), any::<i32>()).prop_map(|(index, value)| Op::Insert(index, value)),
        any::<usize>().prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn test_matches_vec_deque(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let mut list = List::new();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                Op::PushFront(value) => {
                    list.push_front(value);
                    model.push_front(value);
                },
                Op::PushBack(value) => {
                    list.push_back(value);
                    model.push_back(value);
                },
                Op::PopFront => {
                    prop_assert_eq!(list.pop_front(), model.pop_front());
                },
                Op::PopBack => {
                    prop_assert_eq!(list.pop_back(), model.pop_back());
                },
                Op::Insert(index, value) => {
                    let index = index % (model.len() + 1);
                    list.insert(index, value);
                    model.insert(index, value);
                },
                Op::Remove(index) => {
                    if !model.is_empty() {
                        let index = index % model.len();
                        prop_assert_eq!(Some(list.remove(index)), model.remove(index));
                    }
                },
            }
        }

        list.verify_double_links();
        prop_assert_eq!(list.len(), model.len());
        prop_assert!(list.iter().eq(model.iter()));
        prop_assert!(list.iter().rev().eq(model.iter().rev()));
    }
}
