use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::num::NonZero;

use ListState::*;

use super::{Link, List, ListState};
use crate::alloc::Allocator;

impl<T, A: Allocator> IntoIterator for List<T, A> {
    type Item = T;

    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            list: self,
        }
    }
}

/// A type for owned iteration over a [`List`]. Produces values of type `T`.
pub struct IntoIter<T, A: Allocator> {
    // Popping from the list itself means that dropping the iterator part way through releases
    // whatever is left.
    pub(crate) list: List<T, A>,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

/// The part of a list that a borrowing iterator hasn't visited yet. It has the same shape as the
/// list's own state, but only ever moves its ends inwards and never writes to the nodes.
pub(crate) struct Span<T> {
    state: ListState<T>,
}

impl<T> Span<T> {
    pub fn of<A: Allocator>(list: &List<T, A>) -> Span<T> {
        Span {
            state: list.state.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn take_front(&mut self) -> Link<T> {
        let Full(contents) = &mut self.state else {
            return None;
        };
        let node = contents.head;

        match NonZero::new(contents.len.get() - 1) {
            Some(len) => {
                // SAFETY: At least one more node is left, so the front has a successor.
                contents.head = unsafe { node.next().unwrap_unchecked() };
                contents.len = len;
            },
            None => self.state = Empty,
        }
        Some(node)
    }

    pub fn take_back(&mut self) -> Link<T> {
        let Full(contents) = &mut self.state else {
            return None;
        };
        let node = contents.tail;

        match NonZero::new(contents.len.get() - 1) {
            Some(len) => {
                // SAFETY: At least one more node is left, so the back has a predecessor.
                contents.tail = unsafe { node.prev().unwrap_unchecked() };
                contents.len = len;
            },
            None => self.state = Empty,
        }
        Some(node)
    }
}

impl<T> Clone for Span<T> {
    fn clone(&self) -> Self {
        Span {
            state: self.state.clone(),
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut List<T, A> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut {
            span: Span::of(self),
            _phantom: PhantomData,
        }
    }
}

/// A type for mutable borrowed iteration over a [`List`]. Produces values of type `&mut T`.
///
/// See [`List::iter_mut`].
pub struct IterMut<'a, T> {
    pub(crate) span: Span<T>,
    pub(crate) _phantom: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.span.take_front().map(|mut node| node.value_mut())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.span.len(), Some(self.span.len()))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.span.take_back().map(|mut node| node.value_mut())
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

impl<'a, T, A: Allocator> IntoIterator for &'a List<T, A> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            span: Span::of(self),
            _phantom: PhantomData,
        }
    }
}

/// A type for borrowed iteration over a [`List`]. Produces values of type `&T`.
///
/// See [`List::iter`].
pub struct Iter<'a, T> {
    pub(crate) span: Span<T>,
    pub(crate) _phantom: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.span.take_front().map(|node| node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.span.len(), Some(self.span.len()))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.span.take_back().map(|node| node.value())
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            span: self.span.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<'a, T: Debug> Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
