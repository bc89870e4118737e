use std::borrow::Borrow;
use std::convert::Infallible;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{BuildHasher, Hash, RandomState};
use std::ops::Index;
use std::{cmp, mem};

use log::debug;

use super::{
    Buckets, IntoKeys, IntoValues, InvalidLoadFactor, Iter, IterMut, KeyNotFound, Keys,
    ReserveError, Values, ValuesMut,
};
use crate::alloc::{Allocator, Global};
use crate::collections::linked::list::{Link, List, NodeRef};
use crate::util::error::{CapacityOverflow, ConstructError};
use crate::util::result::ResultExtension;

pub(crate) const DEFAULT_BUCKET_COUNT: usize = 16;

pub(crate) const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.95;

const GROWTH_FACTOR: usize = 2;

/// A map of keys to values which relies on the keys implementing [`Hash`] and [`Eq`].
///
/// Entries are stored as the nodes of a [`List`], allocated through `A`. Each bucket points at the
/// first node of its run: all entries whose hash selects the same bucket sit next to each other in
/// the List, so a lookup walks from the bucket's head until it leaves the run. Rehashing only
/// relinks nodes, so references to entries stay valid until the entry is removed. Each entry
/// caches its full hash, so rehashing never calls the hasher.
///
/// Iteration follows List order, which isn't meaningful beyond same-bucket entries being
/// contiguous. The order of entries within a bucket is unspecified.
///
/// It is a logic error for keys in an UnorderedMap to be manipulated in a way that changes their
/// hash. Because of this, the API prevents mutable access to its keys.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the UnorderedMap.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `emplace/insert` | `O(1)`*, `O(n)`** |
/// | `get/find` | `O(1)`* |
/// | `remove` | `O(1)`* |
/// | `rehash` | `O(n)` |
///
/// \* In the event of hash collisions, these functions walk the whole bucket run.
///
/// \** Whenever an insertion pushes the load factor over the maximum, the map rehashes to at least
/// twice as many buckets.
pub struct UnorderedMap<K, V, S = RandomState, A: Allocator = Global> {
    pub(crate) list: List<Entry<K, V>, A>,
    pub(crate) buckets: Buckets<Entry<K, V>, A>,
    pub(crate) hasher: S,
    pub(crate) max_load_factor: f32,
}

#[derive(Clone)]
pub(crate) struct Entry<K, V> {
    pub hash: u64,
    pub key: K,
    pub value: V,
}

impl<K, V> UnorderedMap<K, V> {
    /// Creates a new UnorderedMap with the default number of buckets and a [`RandomState`]
    /// hasher.
    ///
    /// # Panics
    /// Panics if the bucket array can't be allocated.
    pub fn new() -> UnorderedMap<K, V> {
        UnorderedMap::with_hasher(RandomState::new())
    }

    /// Creates a new UnorderedMap with at least `bucket_count` buckets.
    ///
    /// # Panics
    /// Panics if the bucket array can't be allocated.
    pub fn with_bucket_count(bucket_count: usize) -> UnorderedMap<K, V> {
        UnorderedMap::with_buckets_and_hasher_in(bucket_count, RandomState::new(), Global)
    }
}

impl<K, V, S> UnorderedMap<K, V, S> {
    /// Creates a new UnorderedMap which will use the provided `hasher`.
    ///
    /// # Panics
    /// Panics if the bucket array can't be allocated.
    pub fn with_hasher(hasher: S) -> UnorderedMap<K, V, S> {
        UnorderedMap::with_hasher_in(hasher, Global)
    }
}

impl<K, V, S, A: Allocator> UnorderedMap<K, V, S, A> {
    /// Creates a new UnorderedMap that allocates from `alloc`, with the default hasher.
    ///
    /// # Panics
    /// Panics if the bucket array can't be allocated.
    pub fn new_in(alloc: A) -> UnorderedMap<K, V, S, A>
    where
        S: Default,
    {
        UnorderedMap::with_hasher_in(S::default(), alloc)
    }

    /// Creates a new UnorderedMap that allocates from `alloc` and uses the provided `hasher`.
    ///
    /// # Panics
    /// Panics if the bucket array can't be allocated.
    pub fn with_hasher_in(hasher: S, alloc: A) -> UnorderedMap<K, V, S, A> {
        UnorderedMap::with_buckets_and_hasher_in(DEFAULT_BUCKET_COUNT, hasher, alloc)
    }

    /// Creates a new UnorderedMap with at least `bucket_count` buckets, allocating from `alloc`
    /// and hashing with `hasher`.
    ///
    /// # Panics
    /// Panics if the bucket array can't be allocated.
    pub fn with_buckets_and_hasher_in(
        bucket_count: usize,
        hasher: S,
        alloc: A,
    ) -> UnorderedMap<K, V, S, A> {
        UnorderedMap::try_with_buckets_and_hasher_in(bucket_count, hasher, alloc).throw()
    }

    /// Creates a new UnorderedMap with at least `bucket_count` buckets, returning an [`Err`] if
    /// the bucket array is too large or can't be allocated.
    pub fn try_with_buckets_and_hasher_in(
        bucket_count: usize,
        hasher: S,
        alloc: A,
    ) -> Result<UnorderedMap<K, V, S, A>, ReserveError> {
        Ok(UnorderedMap {
            buckets: Buckets::try_new_in(cmp::max(bucket_count, 1), alloc.clone())?,
            list: List::new_in(alloc),
            hasher,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        })
    }

    /// Returns the number of entries in the UnorderedMap.
    pub const fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true if the UnorderedMap contains no entries.
    pub const fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the average number of entries per bucket.
    pub fn load_factor(&self) -> f32 {
        self.len() as f32 / self.bucket_count() as f32
    }

    /// Returns the load factor above which an insertion causes the map to grow.
    pub const fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Sets the maximum load factor. The bucket count isn't changed until the next insertion.
    ///
    /// # Panics
    /// Panics if `max_load_factor` isn't a positive number.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) {
        self.try_set_max_load_factor(max_load_factor).throw()
    }

    /// Sets the maximum load factor, returning an [`Err`] if it isn't a positive number.
    pub fn try_set_max_load_factor(&mut self, max_load_factor: f32) -> Result<(), InvalidLoadFactor> {
        // NaN fails this comparison too.
        if !(max_load_factor > 0.0) {
            return Err(InvalidLoadFactor(max_load_factor));
        }
        self.max_load_factor = max_load_factor;
        Ok(())
    }

    /// Returns the hasher used by this map.
    pub const fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the allocator used for this map's entries and buckets.
    pub const fn allocator(&self) -> &A {
        self.list.allocator()
    }

    /// Rebuilds the buckets with at least `bucket_count` buckets. The count is raised if needed, so
    /// that the current entries don't exceed the maximum load factor.
    ///
    /// # Panics
    /// Panics if the new bucket array can't be allocated.
    pub fn rehash(&mut self, bucket_count: usize) {
        self.try_rehash(bucket_count).throw()
    }

    /// Rebuilds the buckets with at least `bucket_count` buckets, returning an [`Err`] if the new
    /// bucket array is too large or can't be allocated. In that case, the map is unchanged.
    pub fn try_rehash(&mut self, bucket_count: usize) -> Result<(), ReserveError> {
        let required = required_buckets(self.len(), self.max_load_factor)?;
        self.rehash_to(cmp::max(bucket_count, required))
    }

    /// Makes room for `len` entries in total without exceeding the maximum load factor.
    ///
    /// # Panics
    /// Panics if the new bucket array can't be allocated.
    pub fn reserve(&mut self, len: usize) {
        self.try_reserve(len).throw()
    }

    /// Makes room for `len` entries in total, returning an [`Err`] if the new bucket array is too
    /// large or can't be allocated.
    pub fn try_reserve(&mut self, len: usize) -> Result<(), ReserveError> {
        let required = required_buckets(len, self.max_load_factor)?;
        if required > self.bucket_count() {
            self.rehash_to(required)?;
        }
        Ok(())
    }

    /// Removes every entry for which `f` returns false, visiting entries in iteration order.
    pub fn retain<F: FnMut(&K, &mut V) -> bool>(&mut self, mut f: F) {
        let mut link = self.list.head_link();
        while let Some(mut node) = link {
            link = *node.next();
            let entry = node.value_mut();
            if !f(&entry.key, &mut entry.value) {
                // SAFETY: node is one of our entries.
                drop(unsafe { self.remove_node(node) });
            }
        }
    }

    /// Removes every entry, keeping the current buckets.
    pub fn clear(&mut self) {
        self.buckets.fill(None);
        self.list.clear();
    }

    /// Swaps the entries, buckets, hashers and allocators of two maps.
    pub fn swap(&mut self, other: &mut UnorderedMap<K, V, S, A>) {
        mem::swap(self, other);
    }

    /// Returns an iterator over all key-value pairs in the UnorderedMap, as references.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.into_iter()
    }

    /// Returns an iterator over all key-value pairs, with mutable references to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.into_iter()
    }

    /// Returns an iterator over all keys in the UnorderedMap, as references.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Returns an iterator over all values in the UnorderedMap, as references.
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Returns an iterator over all values in the UnorderedMap, as mutable references.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }

    /// Consumes self and returns an iterator over all contained keys.
    pub fn into_keys(self) -> IntoKeys<K, V, A> {
        IntoKeys(self.into_iter())
    }

    /// Consumes self and returns an iterator over all contained values.
    pub fn into_values(self) -> IntoValues<K, V, A> {
        IntoValues(self.into_iter())
    }
}

impl<K, V, S, A> UnorderedMap<K, V, S, A>
where
    K: Hash + Eq,
    S: BuildHasher,
    A: Allocator,
{
    /// Returns the entry for the provided `key` as a key-value pair, or None if there is no entry.
    pub fn find<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        // Q is a borrowed form of K, where equality and hashing carry over the borrow.
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.find_node(self.hasher.hash_one(key), key)?.value();
        Some((&entry.key, &entry.value))
    }

    /// Returns the entry for the provided `key`, with a mutable reference to its value.
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<(&K, &mut V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.find_node(self.hasher.hash_one(key), key)?.value_mut();
        Some((&entry.key, &mut entry.value))
    }

    /// Returns a reference to the value associated with the provided `key`, or None if the map
    /// contains no values for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value associated with the provided `key`, or None if the
    /// map contains no values for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_mut(key).map(|(_, value)| value)
    }

    /// Returns true if there is a value associated with the provided `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a reference to the value associated with `key`.
    ///
    /// The same functionality can be achieved using the [`Index`] operator.
    ///
    /// # Panics
    /// Panics if the map has no entry for `key`.
    pub fn at<Q>(&self, key: &Q) -> &V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_at(key).throw()
    }

    /// Returns a reference to the value associated with `key`, or a [`KeyNotFound`] error.
    pub fn try_at<Q>(&self, key: &Q) -> Result<&V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with `key`.
    ///
    /// # Panics
    /// Panics if the map has no entry for `key`.
    pub fn at_mut<Q>(&mut self, key: &Q) -> &mut V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_at_mut(key).throw()
    }

    /// Returns a mutable reference to the value associated with `key`, or a [`KeyNotFound`]
    /// error.
    pub fn try_at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).ok_or(KeyNotFound)
    }

    /// Returns the value associated with `key`, inserting a default value first if there isn't
    /// one.
    ///
    /// # Panics
    /// Panics if allocating the entry or growing the buckets fails.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.try_emplace_with(key, || Ok::<V, Infallible>(V::default()))
            .map_err(ConstructError::into_alloc)
            .throw()
            .0
    }

    /// Inserts the provided `key`-`value` pair if the map has no entry for `key`. Returns the value
    /// now associated with `key`, and whether the pair was inserted.
    ///
    /// If the key already exists, the existing entry wins and the new pair is dropped.
    ///
    /// # Panics
    /// Panics if allocating the entry or growing the buckets fails.
    pub fn emplace(&mut self, key: K, value: V) -> (&mut V, bool) {
        self.try_emplace(key, value).throw()
    }

    /// Inserts the provided `key`-`value` pair if the map has no entry for `key`, returning an
    /// [`Err`] if the entry can't be allocated or the buckets can't grow. A failed insertion
    /// drops the pair and leaves the map as it was.
    pub fn try_emplace(&mut self, key: K, value: V) -> Result<(&mut V, bool), ReserveError> {
        self.try_emplace_with(key, || Ok::<V, Infallible>(value))
            .map_err(ConstructError::into_alloc)
    }

    /// Inserts an entry for `key` with a value from the fallible constructor `f`, if the map has
    /// no entry for `key` yet. `f` is only called if a new entry is needed.
    ///
    /// The entry's node is allocated before `f` is called, and released again if `f` fails or
    /// panics, or if the buckets need to grow and can't.
    pub fn try_emplace_with<E, F>(
        &mut self,
        key: K,
        f: F,
    ) -> Result<(&mut V, bool), ConstructError<E, ReserveError>>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let hash = self.hasher.hash_one(&key);
        if let Some(mut existing) = self.find_node(hash, &key) {
            return Ok((&mut existing.value_mut().value, false));
        }

        let mut node = NodeRef::try_alloc_with_in(self.list.allocator(), || {
            f().map(|value| Entry { hash, key, value })
        })
        .map_err(|err| err.map_alloc(ReserveError::from))?;

        if let Err(err) = self.grow_for(self.len() + 1) {
            // SAFETY: The node is detached and came from the list's allocator.
            unsafe { node.drop_node_in(self.list.allocator()); }
            return Err(ConstructError::Alloc(err));
        }

        // SAFETY: As above.
        unsafe { self.link_entry(node); }
        Ok((&mut node.value_mut().value, true))
    }

    /// Inserts the provided `key`-`value` pair if the map has no entry for `key`, returning true
    /// if it was inserted. An existing entry is left untouched.
    ///
    /// # Panics
    /// Panics if allocating the entry or growing the buckets fails.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.emplace(key, value).1
    }

    /// Associates `value` with `key`, returning the previous value if there was one.
    ///
    /// As with the standard library, the key isn't changed if it already exists.
    ///
    /// # Panics
    /// Panics if allocating the entry or growing the buckets fails.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V> {
        match self.get_mut(&key) {
            Some(existing) => Some(mem::replace(existing, value)),
            None => {
                self.emplace(key, value);
                None
            },
        }
    }

    /// Removes the entry associated with `key`, returning it if it exists.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.find_node(self.hasher.hash_one(key), key)?;
        // SAFETY: node was found within this map.
        let entry = unsafe { self.remove_node(node) };
        Some((entry.key, entry.value))
    }

    /// Removes the entry associated with `key`, returning the value if it exists.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Finds the node holding `key`, by walking the run of the bucket that `hash` selects.
    pub(crate) fn find_node<Q>(&self, hash: u64, key: &Q) -> Link<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let bucket = self.bucket_index(hash);
        let mut link = self.buckets[bucket];

        while let Some(node) = link {
            let entry = node.value();
            if self.bucket_index(entry.hash) != bucket {
                // Left the run.
                break;
            }
            if entry.hash == hash && entry.key.borrow() == key {
                return Some(node);
            }
            link = *node.next();
        }
        None
    }
}

impl<K, V, S, A: Allocator> UnorderedMap<K, V, S, A> {
    pub(crate) fn bucket_index(&self, hash: u64) -> usize {
        // The bucket count is never 0.
        (hash % self.buckets.len() as u64) as usize
    }

    /// Rehashes if holding `len` entries would exceed the maximum load factor.
    pub(crate) fn grow_for(&mut self, len: usize) -> Result<(), ReserveError> {
        if len as f32 / self.bucket_count() as f32 > self.max_load_factor {
            let grown = self.bucket_count().saturating_mul(GROWTH_FACTOR);
            let required = required_buckets(len, self.max_load_factor)?;
            self.rehash_to(cmp::max(grown, required))?;
        }
        Ok(())
    }

    /// Replaces the buckets with `bucket_count` fresh ones and refiles every entry.
    pub(crate) fn rehash_to(&mut self, bucket_count: usize) -> Result<(), ReserveError> {
        let buckets = Buckets::try_new_in(cmp::max(bucket_count, 1), self.allocator().clone())?;
        debug!(
            "Rehashing UnorderedMap with {} entries from {} to {} buckets",
            self.len(),
            self.bucket_count(),
            buckets.len()
        );
        self.buckets = buckets;
        self.refile_entries();
        Ok(())
    }

    /// Fills empty buckets from a single pass over the list. The first node seen for each bucket
    /// becomes its head, and every later one is moved directly after that head, which leaves
    /// each bucket's entries contiguous.
    pub(crate) fn refile_entries(&mut self) {
        let mut link = self.list.head_link();
        while let Some(node) = link {
            link = *node.next();
            let bucket = self.bucket_index(node.value().hash);
            match self.buckets[bucket] {
                None => self.buckets[bucket] = Some(node),
                Some(head) => {
                    // SAFETY: Both nodes belong to the list, and node is relinked straight away.
                    unsafe {
                        self.list.unlink(node);
                        self.list.link_after(node, Some(head));
                    }
                },
            }
        }
    }

    /// Links a detached entry into its bucket's run, starting a new run at the front of the list
    /// if the bucket is empty.
    ///
    /// # Safety
    /// `node` must be detached and allocated by the list's allocator.
    pub(crate) unsafe fn link_entry(&mut self, node: NodeRef<Entry<K, V>>) {
        let bucket = self.bucket_index(node.value().hash);
        match self.buckets[bucket] {
            // SAFETY: Upheld by the caller, and head is one of our nodes.
            Some(head) => unsafe { self.list.link_after(node, Some(head)) },
            None => {
                // SAFETY: Upheld by the caller.
                unsafe { self.list.link_after(node, None) };
                self.buckets[bucket] = Some(node);
            },
        }
    }

    /// Unlinks and releases an entry, moving its bucket's head on if necessary.
    ///
    /// # Safety
    /// `node` must be one of this map's entries.
    pub(crate) unsafe fn remove_node(&mut self, node: NodeRef<Entry<K, V>>) -> Entry<K, V> {
        let bucket = self.bucket_index(node.value().hash);
        if self.buckets[bucket] == Some(node) {
            self.buckets[bucket] = match node.next() {
                Some(next) if self.bucket_index(next.value().hash) == bucket => Some(*next),
                _ => None,
            };
        }
        // SAFETY: Upheld by the caller.
        unsafe { self.list.remove_node(node) }
    }

    /// Copies the map into `alloc` with the same bucket count. Entries within a bucket may come
    /// out in a different order.
    pub(crate) fn try_clone_in(&self, alloc: A) -> Result<Self, ReserveError>
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        let mut copy = UnorderedMap {
            buckets: Buckets::try_new_in(self.bucket_count(), alloc.clone())?,
            list: self.list.try_clone_in(alloc)?,
            hasher: self.hasher.clone(),
            max_load_factor: self.max_load_factor,
        };
        copy.refile_entries();
        Ok(copy)
    }

    #[cfg(test)]
    pub(crate) fn verify_buckets(&self) {
        self.list.verify_double_links();
        let mut seen = vec![false; self.bucket_count()];
        let mut previous = None;

        for entry in self.list.iter() {
            let bucket = self.bucket_index(entry.hash);
            if previous != Some(bucket) {
                assert!(!seen[bucket], "The run for bucket {bucket} should be contiguous.");
                seen[bucket] = true;
                let head = self.buckets[bucket].map(|node| node.value_ptr());
                assert_eq!(
                    head.map(|ptr| ptr.as_ptr().cast_const()),
                    Some(entry as *const _),
                    "Bucket {bucket} should point at the start of its run."
                );
            }
            previous = Some(bucket);
        }

        for (bucket, head) in self.buckets.iter().enumerate() {
            assert_eq!(head.is_some(), seen[bucket], "Bucket {bucket} has a stale head.");
        }
    }
}

/// The smallest bucket count which keeps `len` entries within `max_load_factor`, or
/// [`CapacityOverflow`] if that count doesn't fit in a `usize`.
pub(crate) fn required_buckets(
    len: usize,
    max_load_factor: f32,
) -> Result<usize, CapacityOverflow> {
    let estimate = (len as f64 / max_load_factor as f64).ceil();
    // usize::MAX rounds up as a float, so it is already out of range.
    if !(estimate < usize::MAX as f64) {
        return Err(CapacityOverflow);
    }

    let mut count = cmp::max(estimate as usize, 1);
    // Correct for rounding, so that load_factor agrees with the result. The step grows with the
    // count so that it always moves the f32 value.
    while len as f32 / count as f32 > max_load_factor {
        let step = cmp::max(count >> 20, 1);
        count = count.checked_add(step).ok_or(CapacityOverflow)?;
    }
    Ok(count)
}

impl<K, V, S, A, Q> Index<&Q> for UnorderedMap<K, V, S, A>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
    A: Allocator,
{
    type Output = V;

    fn index(&self, key: &Q) -> &Self::Output {
        self.at(key)
    }
}

impl<K, V, S, A> Extend<(K, V)> for UnorderedMap<K, V, S, A>
where
    K: Hash + Eq,
    S: BuildHasher,
    A: Allocator,
{
    /// Inserts every pair with [`emplace`](UnorderedMap::emplace), so the first pair for a key
    /// wins.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.emplace(key, value);
        }
    }
}

impl<K, V, S, A> FromIterator<(K, V)> for UnorderedMap<K, V, S, A>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
    A: Allocator + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = UnorderedMap::new_in(A::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S: Default, A: Allocator + Default> Default for UnorderedMap<K, V, S, A> {
    fn default() -> Self {
        UnorderedMap::new_in(A::default())
    }
}

impl<K: Clone, V: Clone, S: Clone, A: Allocator> Clone for UnorderedMap<K, V, S, A> {
    fn clone(&self) -> Self {
        self.try_clone_in(self.allocator().select_on_copy()).throw()
    }

    fn clone_from(&mut self, source: &Self) {
        let alloc = if A::PROPAGATE_ON_COPY_ASSIGNMENT {
            source.allocator().clone()
        } else {
            self.allocator().clone()
        };
        let mut copy = source.try_clone_in(alloc).throw();
        self.swap(&mut copy);
    }
}

impl<K, V, S, A> PartialEq for UnorderedMap<K, V, S, A>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
    A: Allocator,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K, V, S, A> Eq for UnorderedMap<K, V, S, A>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
    A: Allocator,
{
}

struct DebugEntries<'a, K, V>(Iter<'a, K, V>);

impl<'a, K: Debug, V: Debug> Debug for DebugEntries<'a, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.clone()).finish()
    }
}

impl<K: Debug, V: Debug, S: Debug, A: Allocator> Debug for UnorderedMap<K, V, S, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnorderedMap")
            .field("entries", &DebugEntries(self.iter()))
            .field("len", &self.len())
            .field("bucket_count", &self.bucket_count())
            .field("max_load_factor", &self.max_load_factor)
            .field("hasher", &self.hasher)
            .finish()
    }
}

impl<K: Debug, V: Debug, S, A: Allocator> Display for UnorderedMap<K, V, S, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#")?;
        f.debug_map().entries(self.iter()).finish()
    }
}
