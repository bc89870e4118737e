use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use super::{Referent, SharedPtr};

/// A weak handle to an object owned by one or more [`SharedPtr`]s.
///
/// A WeakPtr keeps the control block alive but not the object. It can't be dereferenced directly,
/// instead [`lock`](WeakPtr::lock) returns a new owner if the object still exists.
pub struct WeakPtr<T: ?Sized> {
    pub(crate) referent: Option<Referent<T>>,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T: ?Sized> WeakPtr<T> {
    /// Creates an empty WeakPtr, which is always expired.
    pub const fn new() -> WeakPtr<T> {
        WeakPtr {
            referent: None,
            _phantom: PhantomData,
        }
    }

    /// Returns true if the object no longer exists, or this WeakPtr is empty.
    pub fn expired(&self) -> bool {
        self.use_count() == 0
    }

    /// Returns a new [`SharedPtr`] owning the object, or an empty one if the object has already
    /// been destroyed.
    pub fn lock(&self) -> SharedPtr<T> {
        match self.referent {
            Some(referent) if referent.block.try_acquire_shared() => {
                SharedPtr::from_referent(referent.object, referent.block)
            },
            _ => SharedPtr::empty(),
        }
    }

    /// Returns the number of SharedPtrs that own the object, which is 0 once it has expired.
    pub fn use_count(&self) -> usize {
        self.referent.map_or(0, |referent| referent.block.counts().shared())
    }

    /// Returns the number of WeakPtrs that refer to this object, or 0 if this WeakPtr is empty.
    pub fn weak_count(&self) -> usize {
        self.referent.map_or(0, |referent| referent.block.counts().weak())
    }

    /// Releases this WeakPtr's reference, leaving it empty.
    pub fn reset(&mut self) {
        self.swap(&mut WeakPtr::new());
    }

    pub fn swap(&mut self, other: &mut WeakPtr<T>) {
        mem::swap(&mut self.referent, &mut other.referent);
    }

    /// Creates a WeakPtr of another type that shares this one's control block, pointing wherever
    /// `f` maps the object's address. Unlike [`SharedPtr::project`] this works on an expired
    /// WeakPtr, because the object is never accessed:
    ///
    /// ```
    /// # use alloc_containers::ptr::{SharedPtr, WeakPtr};
    /// # use std::fmt::Debug;
    /// # use std::ptr::NonNull;
    /// let shared = SharedPtr::new(5);
    /// let weak = shared.downgrade();
    /// drop(shared);
    ///
    /// // SAFETY: Unsizing keeps the address and doesn't read through it.
    /// let debug: WeakPtr<dyn Debug> = unsafe { weak.cast(|ptr| -> NonNull<dyn Debug> { ptr }) };
    /// assert!(debug.expired());
    /// assert_eq!(weak.weak_count(), 2);
    /// ```
    ///
    /// Casting an empty WeakPtr gives another empty WeakPtr, without calling `f`.
    ///
    /// # Safety
    /// `f` must not read or write through the pointer it is given, since the object may already
    /// have been destroyed. The pointer it returns must lie within the same object, so that it is
    /// valid exactly when the object is.
    pub unsafe fn cast<U: ?Sized, F>(&self, f: F) -> WeakPtr<U>
    where
        F: FnOnce(NonNull<T>) -> NonNull<U>,
    {
        match self.referent {
            Some(referent) => {
                let object = f(referent.object);
                referent.block.counts().inc_weak();
                WeakPtr {
                    referent: Some(Referent {
                        object,
                        block: referent.block,
                    }),
                    _phantom: PhantomData,
                }
            },
            None => WeakPtr::new(),
        }
    }
}

impl<T: ?Sized> From<&SharedPtr<T>> for WeakPtr<T> {
    fn from(shared: &SharedPtr<T>) -> Self {
        if let Some(referent) = shared.referent {
            referent.block.counts().inc_weak();
        }
        WeakPtr {
            referent: shared.referent,
            _phantom: PhantomData,
        }
    }
}

impl<T: ?Sized> Clone for WeakPtr<T> {
    fn clone(&self) -> Self {
        if let Some(referent) = self.referent {
            referent.block.counts().inc_weak();
        }
        WeakPtr {
            referent: self.referent,
            _phantom: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T: ?Sized> Drop for WeakPtr<T> {
    fn drop(&mut self) {
        if let Some(referent) = self.referent.take() {
            // SAFETY: We owned this weak reference.
            unsafe { referent.block.release_weak() }
        }
    }
}

impl<T: ?Sized> Default for WeakPtr<T> {
    fn default() -> Self {
        WeakPtr::new()
    }
}

impl<T: ?Sized> Debug for WeakPtr<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.expired() {
            write!(f, "WeakPtr(<expired>)")
        } else {
            write!(f, "WeakPtr(..)")
        }
    }
}
