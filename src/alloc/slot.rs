use std::cell::{Cell, UnsafeCell};
use std::fmt::{self, Debug, Formatter};
use std::mem::MaybeUninit;
use std::ptr::{self, NonNull};

/// Storage for exactly one `T` that may or may not currently hold a value.
///
/// A Slot never initializes or drops its contents implicitly, except that dropping a live Slot
/// destroys the value it holds. Instead, [`construct`](Slot::construct) and
/// [`destroy`](Slot::destroy) move it between the empty and live states, and the Slot keeps track
/// of which state it is in.
///
/// The storage is interior-mutable and never moves while the Slot itself doesn't, so pointers
/// obtained from [`as_ptr`](Slot::as_ptr) remain valid for as long as the Slot is live.
pub struct Slot<T> {
    value: UnsafeCell<MaybeUninit<T>>,
    live: Cell<bool>,
}

impl<T> Slot<T> {
    /// Creates a Slot that doesn't hold a value.
    pub const fn empty() -> Slot<T> {
        Slot {
            value: UnsafeCell::new(MaybeUninit::uninit()),
            live: Cell::new(false),
        }
    }

    /// Returns true if the Slot currently holds a value.
    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Returns a pointer to the Slot's storage, whether or not it is live.
    pub const fn as_ptr(&self) -> NonNull<T> {
        // SAFETY: UnsafeCell::get never returns null.
        unsafe { NonNull::new_unchecked(self.value.get().cast::<T>()) }
    }

    /// Moves `value` into the Slot, returning a pointer to it.
    ///
    /// # Panics
    /// Panics if the Slot is already live.
    pub fn construct(&self, value: T) -> NonNull<T> {
        assert!(!self.is_live(), "Slot already holds a value!");
        let ptr = self.as_ptr();
        // SAFETY: The slot is empty, so nothing can be borrowing its contents, and the pointer is
        // valid and aligned for T.
        unsafe { ptr.write(value); }
        self.live.set(true);
        ptr
    }

    /// Returns a reference to the value, if the Slot is live.
    pub fn get(&self) -> Option<&T> {
        if self.is_live() {
            // SAFETY: The slot is live, so the value is initialized.
            Some(unsafe { self.as_ptr().as_ref() })
        } else {
            None
        }
    }

    /// Drops the value in place, returning the Slot to the empty state. Returns false if there was
    /// nothing to destroy.
    ///
    /// # Safety
    /// No references to the value (including ones derived from [`as_ptr`](Slot::as_ptr)) may be
    /// used after this call.
    pub unsafe fn destroy(&self) -> bool {
        if !self.live.replace(false) {
            return false;
        }
        // SAFETY: The slot was live, so the value is initialized, and it has been marked empty
        // before dropping so a panicking destructor can't cause a second drop.
        unsafe { ptr::drop_in_place(self.as_ptr().as_ptr()); }
        true
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Drop for Slot<T> {
    fn drop(&mut self) {
        // SAFETY: We have exclusive access, so there are no outstanding references.
        unsafe { self.destroy(); }
    }
}

impl<T: Debug> Debug for Slot<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("Slot").field(value).finish(),
            None => write!(f, "Slot(<empty>)"),
        }
    }
}
