use std::hash::{BuildHasher, Hash, Hasher};

/// A key whose hash is picked by the test rather than derived from the key. Equality still only
/// looks at `key`, so two values can collide completely while staying distinct.
#[derive(Debug, Clone, Copy)]
pub struct FixedHash<T> {
    pub hash: u64,
    pub key: T,
}

impl<T: Eq> PartialEq for FixedHash<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T: Eq> Eq for FixedHash<T> {}

impl<T> Hash for FixedHash<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// A Hasher that reports the last `u64` written to it unchanged. Paired with [`FixedHash`], this
/// decides exactly which bucket each key lands in.
#[derive(Debug, Default)]
pub struct PassThroughHasher(u64);

impl Hasher for PassThroughHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0 = bytes.iter().fold(self.0, |acc, byte| acc.rotate_left(8) ^ u64::from(*byte));
    }

    fn write_u64(&mut self, value: u64) {
        self.0 = value;
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl BuildHasher for PassThrough {
    type Hasher = PassThroughHasher;

    fn build_hasher(&self) -> Self::Hasher {
        PassThroughHasher::default()
    }
}
