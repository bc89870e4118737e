use std::convert::Infallible;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::mem;
use std::ops::Deref;
use std::ptr::NonNull;

use super::{BlockRef, EmptyPointer, Expired, InPlaceBlock, Referent, RegularBlock, WeakPtr};
use crate::alloc::{AllocError, Allocator, Global};
use crate::util::error::ConstructError;
use crate::util::result::ResultExtension;

/// A strong, reference-counted handle to an object of type `T`, which may also be empty.
///
/// Cloning a SharedPtr adds another owner of the same object. The object is destroyed once the
/// last owner is dropped or [`reset`](SharedPtr::reset), although the memory for its control block
/// lives on for as long as any [`WeakPtr`] refers to it.
///
/// Unlike [`Rc`](std::rc::Rc), a SharedPtr can be empty. Dereferencing an empty SharedPtr panics,
/// while [`get`](SharedPtr::get) and [`try_get`](SharedPtr::try_get) report it instead.
///
/// # Time Complexity
/// Every operation is `O(1)`, apart from the object's own destructor when the last owner goes
/// away.
pub struct SharedPtr<T: ?Sized> {
    pub(crate) referent: Option<Referent<T>>,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T: 'static> SharedPtr<T> {
    /// Creates a SharedPtr owning `value`. This is the same as [`make_shared`](SharedPtr::make_shared).
    ///
    /// # Panics
    /// Panics if the control block can't be allocated.
    pub fn new(value: T) -> SharedPtr<T> {
        SharedPtr::make_shared(value)
    }

    /// Creates a SharedPtr owning `value`, with the object and its control block in a single
    /// allocation from [`Global`].
    ///
    /// # Panics
    /// Panics if the control block can't be allocated.
    pub fn make_shared(value: T) -> SharedPtr<T> {
        SharedPtr::try_make_shared(value).throw()
    }

    /// Creates a SharedPtr owning `value`, returning an [`Err`] if the control block can't be
    /// allocated.
    pub fn try_make_shared(value: T) -> Result<SharedPtr<T>, AllocError> {
        SharedPtr::try_allocate_shared(Global, value)
    }

    /// Creates a SharedPtr owning `value`, with the object and its control block in a single
    /// allocation from `alloc`.
    ///
    /// # Panics
    /// Panics if the control block can't be allocated.
    pub fn allocate_shared<A: Allocator + 'static>(alloc: A, value: T) -> SharedPtr<T> {
        SharedPtr::try_allocate_shared(alloc, value).throw()
    }

    /// Creates a SharedPtr owning `value` in a single allocation from `alloc`, returning an
    /// [`Err`] if the allocation fails. In that case, `value` is dropped.
    pub fn try_allocate_shared<A: Allocator + 'static>(
        alloc: A,
        value: T,
    ) -> Result<SharedPtr<T>, AllocError> {
        SharedPtr::try_allocate_shared_with(alloc, || Ok::<T, Infallible>(value))
            .map_err(ConstructError::into_alloc)
    }

    /// Allocates a control block from `alloc` and constructs the object directly inside it with
    /// the fallible constructor `f`.
    ///
    /// The block is allocated before `f` is called. If `f` returns an [`Err`] or panics, the block
    /// is released again and nothing is leaked.
    pub fn try_allocate_shared_with<A, E, F>(
        alloc: A,
        f: F,
    ) -> Result<SharedPtr<T>, ConstructError<E>>
    where
        A: Allocator + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let (object, block) = InPlaceBlock::try_new_with_in(alloc, f)?;
        debug_assert_eq!(BlockRef(block).object(), object.cast());
        Ok(SharedPtr::from_referent(object, BlockRef(block)))
    }
}

impl<T: ?Sized + 'static> SharedPtr<T> {
    /// Takes ownership of a boxed object. The Box is freed as usual once the last owner goes away,
    /// and the control block is a separate allocation.
    ///
    /// # Panics
    /// Panics if the control block can't be allocated. The Box is dropped first.
    pub fn from_box(value: Box<T>) -> SharedPtr<T> {
        let object = NonNull::from(Box::leak(value));
        let deleter = |object: NonNull<T>| {
            // SAFETY: The pointer came from Box::leak, and the deleter runs at most once.
            drop(unsafe { Box::from_raw(object.as_ptr()) })
        };
        // SAFETY: The Box is leaked, so only the deleter ever frees it.
        unsafe { SharedPtr::from_raw_in(object, deleter, Global) }
    }

    /// Takes ownership of the object at `object`, which is later destroyed by calling `deleter`
    /// on it. The control block is allocated from `alloc`.
    ///
    /// # Panics
    /// Panics if the control block can't be allocated. `deleter` is run first.
    ///
    /// # Safety
    /// `object` must stay valid for reads until `deleter` is called, and nothing else may destroy
    /// it or hand out mutable references to it.
    pub unsafe fn from_raw_in<D, A>(object: NonNull<T>, deleter: D, alloc: A) -> SharedPtr<T>
    where
        D: FnOnce(NonNull<T>) + 'static,
        A: Allocator + 'static,
    {
        // SAFETY: Upheld by the caller.
        unsafe { SharedPtr::try_from_raw_in(object, deleter, alloc) }.throw()
    }

    /// Takes ownership of the object at `object`, returning an [`Err`] if the control block can't
    /// be allocated. Even on failure, ownership has been taken: `deleter` is run on `object`
    /// before the error is returned.
    ///
    /// # Safety
    /// The same requirements as [`from_raw_in`](SharedPtr::from_raw_in) apply.
    pub unsafe fn try_from_raw_in<D, A>(
        object: NonNull<T>,
        deleter: D,
        alloc: A,
    ) -> Result<SharedPtr<T>, AllocError>
    where
        D: FnOnce(NonNull<T>) + 'static,
        A: Allocator + 'static,
    {
        let block = RegularBlock::try_new_in(object, deleter, alloc)?;
        debug_assert_eq!(BlockRef(block).object(), object.cast());
        Ok(SharedPtr::from_referent(object, BlockRef(block)))
    }

    /// Replaces the owned object with `value`. The new block is created before the old reference
    /// is released.
    ///
    /// # Panics
    /// Panics if the control block can't be allocated.
    pub fn reset_to(&mut self, value: Box<T>) {
        let mut replacement = SharedPtr::from_box(value);
        self.swap(&mut replacement);
    }
}

impl<T: ?Sized> SharedPtr<T> {
    /// Creates an empty SharedPtr, which owns nothing.
    pub const fn empty() -> SharedPtr<T> {
        SharedPtr {
            referent: None,
            _phantom: PhantomData,
        }
    }

    /// Wraps a freshly counted reference, without touching the counts.
    pub(crate) const fn from_referent(object: NonNull<T>, block: BlockRef) -> SharedPtr<T> {
        SharedPtr {
            referent: Some(Referent { object, block }),
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the object, or None if this SharedPtr is empty.
    pub fn get(&self) -> Option<&T> {
        // SAFETY: The object is alive for as long as we hold a strong reference.
        self.referent.map(|referent| unsafe { referent.object.as_ref() })
    }

    /// Returns a reference to the object, or an [`EmptyPointer`] error if this SharedPtr is empty.
    pub fn try_get(&self) -> Result<&T, EmptyPointer> {
        self.get().ok_or(EmptyPointer)
    }

    /// Returns a pointer to the object, or None if this SharedPtr is empty.
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        self.referent.map(|referent| referent.object)
    }

    /// Returns true if this SharedPtr doesn't own anything.
    pub const fn is_empty(&self) -> bool {
        self.referent.is_none()
    }

    /// Returns the number of SharedPtrs that own this object, or 0 if this SharedPtr is empty.
    pub fn use_count(&self) -> usize {
        self.referent.map_or(0, |referent| referent.block.counts().shared())
    }

    /// Returns the number of WeakPtrs that refer to this object, or 0 if this SharedPtr is empty.
    pub fn weak_count(&self) -> usize {
        self.referent.map_or(0, |referent| referent.block.counts().weak())
    }

    /// Releases this SharedPtr's ownership, leaving it empty.
    pub fn reset(&mut self) {
        self.swap(&mut SharedPtr::empty());
    }

    /// Swaps the objects owned by two SharedPtrs, without changing any counts.
    pub fn swap(&mut self, other: &mut SharedPtr<T>) {
        mem::swap(&mut self.referent, &mut other.referent);
    }

    /// Returns true if both SharedPtrs point at the same address. Two empty SharedPtrs are equal.
    pub fn ptr_eq<U: ?Sized>(&self, other: &SharedPtr<U>) -> bool {
        match (self.as_ptr(), other.as_ptr()) {
            (Some(a), Some(b)) => a.cast::<()>() == b.cast::<()>(),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns true if both SharedPtrs share ownership of the same object, even if they point at
    /// different parts of it after [`project`](SharedPtr::project).
    pub fn owner_eq<U: ?Sized>(&self, other: &SharedPtr<U>) -> bool {
        match (self.referent, other.referent) {
            (Some(a), Some(b)) => a.block.same_block(b.block),
            (None, None) => true,
            _ => false,
        }
    }

    /// Creates a [`WeakPtr`] to this object. Downgrading an empty SharedPtr gives an empty
    /// WeakPtr.
    pub fn downgrade(&self) -> WeakPtr<T> {
        WeakPtr::from(self)
    }

    /// Creates a SharedPtr to something reachable from this object, which shares ownership with
    /// this SharedPtr. This can be used to point at a field of the object, or to convert to a
    /// trait object:
    ///
    /// ```
    /// # use alloc_containers::ptr::SharedPtr;
    /// # use std::fmt::Debug;
    /// let pair = SharedPtr::new((1, String::from("two")));
    /// let second: SharedPtr<String> = pair.project(|pair| &pair.1);
    /// let debug: SharedPtr<dyn Debug> = pair.project(|pair| pair as &dyn Debug);
    ///
    /// assert_eq!(*second, "two");
    /// assert_eq!(pair.use_count(), 3);
    /// # drop(debug);
    /// ```
    ///
    /// Projecting an empty SharedPtr gives another empty SharedPtr, without calling `f`.
    pub fn project<U: ?Sized, F>(&self, f: F) -> SharedPtr<U>
    where
        F: FnOnce(&T) -> &U,
    {
        match self.referent {
            Some(referent) => {
                // SAFETY: The object is alive for as long as we hold a strong reference.
                let object = NonNull::from(f(unsafe { referent.object.as_ref() }));
                referent.block.counts().inc_shared();
                SharedPtr::from_referent(object, referent.block)
            },
            None => SharedPtr::empty(),
        }
    }
}

impl<T: ?Sized> Clone for SharedPtr<T> {
    fn clone(&self) -> Self {
        if let Some(referent) = self.referent {
            referent.block.counts().inc_shared();
        }
        SharedPtr {
            referent: self.referent,
            _phantom: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T: ?Sized> Drop for SharedPtr<T> {
    fn drop(&mut self) {
        if let Some(referent) = self.referent.take() {
            // SAFETY: We owned this strong reference.
            unsafe { referent.block.release_shared() }
        }
    }
}

impl<T: ?Sized> Deref for SharedPtr<T> {
    type Target = T;

    /// # Panics
    /// Panics if this SharedPtr is empty.
    fn deref(&self) -> &Self::Target {
        self.try_get().throw()
    }
}

impl<T: ?Sized> TryFrom<&WeakPtr<T>> for SharedPtr<T> {
    type Error = Expired;

    /// Upgrades a [`WeakPtr`], failing instead of returning an empty SharedPtr if it has expired.
    fn try_from(weak: &WeakPtr<T>) -> Result<Self, Self::Error> {
        let shared = weak.lock();
        if shared.is_empty() {
            Err(Expired)
        } else {
            Ok(shared)
        }
    }
}

impl<T: ?Sized> Default for SharedPtr<T> {
    fn default() -> Self {
        SharedPtr::empty()
    }
}

impl<T: ?Sized + Debug> Debug for SharedPtr<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("SharedPtr").field(&value).finish(),
            None => write!(f, "SharedPtr(<empty>)"),
        }
    }
}
