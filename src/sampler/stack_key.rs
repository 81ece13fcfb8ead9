//! Aggregation key for read samples.
//!
//! A key is the captured call stack of a read plus the power-of-two bucket
//! of its size. Reads that share both are merged into one sample.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Maximum number of frames kept per stack
pub const MAX_STACK_DEPTH: usize = 128;

/// Largest bucket exponent; sizes above 2^62 all land here
pub const MAX_SIZE_BUCKET: u8 = 63;

/// Return the smallest exponent `b` with `2^b >= size`, capped at 63
///
/// **Public** - used by the profiler and exposed for testing
///
/// Sizes 0 and 1 both map to bucket 0. The bucket answers "how large,
/// to within 2x, was this read" rather than the exact size.
///
/// # Example
/// ```
/// use readprof::sampler::size_bucket;
/// assert_eq!(size_bucket(14), 4);
/// assert_eq!(size_bucket(31), 5);
/// ```
pub fn size_bucket(size: usize) -> u8 {
    let size = size.max(1) as u64;
    size.checked_next_power_of_two()
        .map_or(MAX_SIZE_BUCKET, |power| {
            power.trailing_zeros().min(u32::from(MAX_SIZE_BUCKET)) as u8
        })
}

/// Identity of a sample: call stack + size bucket
///
/// The whole fixed array takes part in equality and hashing, including
/// the zero-filled tail, so keys never allocate on the hot path.
#[derive(Clone, Copy)]
pub struct StackKey {
    locations: [usize; MAX_STACK_DEPTH],
    size_bucket: u8,
    num_locations: u8,
}

impl StackKey {
    /// Build a key from a captured stack (innermost frame first) and a read size
    ///
    /// Frames beyond [`MAX_STACK_DEPTH`] are dropped.
    pub fn new(stack: &[usize], size: usize) -> Self {
        let len = stack.len().min(MAX_STACK_DEPTH);
        let mut locations = [0usize; MAX_STACK_DEPTH];
        locations[..len].copy_from_slice(&stack[..len]);

        Self {
            locations,
            size_bucket: size_bucket(size),
            // MAX_STACK_DEPTH fits in a u8
            num_locations: len as u8,
        }
    }

    /// Valid frames of the stack, innermost first
    pub fn frames(&self) -> &[usize] {
        &self.locations[..usize::from(self.num_locations)]
    }

    pub fn size_bucket(&self) -> u8 {
        self.size_bucket
    }

    pub fn num_locations(&self) -> usize {
        usize::from(self.num_locations)
    }

    /// Representative byte value of the bucket (`2^bucket`)
    ///
    /// Saturates at `i64::MAX` for the top bucket so it fits a profile label.
    pub fn bucket_bytes(&self) -> i64 {
        i64::try_from(1u64 << self.size_bucket).unwrap_or(i64::MAX)
    }
}

impl PartialEq for StackKey {
    fn eq(&self, other: &Self) -> bool {
        self.size_bucket == other.size_bucket && self.locations == other.locations
    }
}

impl Eq for StackKey {}

impl Hash for StackKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.locations.hash(state);
        self.size_bucket.hash(state);
    }
}

impl fmt::Debug for StackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackKey")
            .field("frames", &format_args!("{:x?}", self.frames()))
            .field("size_bucket", &self.size_bucket)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_size_bucket_known_values() {
        assert_eq!(size_bucket(0), 0);
        assert_eq!(size_bucket(1), 0);
        assert_eq!(size_bucket(2), 1);
        assert_eq!(size_bucket(4), 2);
        assert_eq!(size_bucket(14), 4);
        assert_eq!(size_bucket(31), 5);
        assert_eq!(size_bucket(4096), 12);
        assert_eq!(size_bucket(4097), 13);
    }

    #[test]
    fn test_size_bucket_caps_at_63() {
        assert_eq!(size_bucket(usize::MAX), MAX_SIZE_BUCKET);
    }

    #[test]
    fn test_key_truncates_long_stacks() {
        let stack: Vec<usize> = (1..=200).collect();
        let key = StackKey::new(&stack, 10);

        assert_eq!(key.num_locations(), MAX_STACK_DEPTH);
        assert_eq!(key.frames(), &stack[..MAX_STACK_DEPTH]);
    }

    #[test]
    fn test_keys_merge_within_bucket() {
        let stack = [0x1000, 0x2000, 0x3000];
        let small = StackKey::new(&stack, 100);
        let large = StackKey::new(&stack, 200);
        let huge = StackKey::new(&stack, 5000);

        assert_eq!(small, large);
        assert_ne!(small, huge);

        let set: HashSet<StackKey> = [small, large, huge].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_keys_differ_by_stack() {
        let a = StackKey::new(&[0x10, 0x20], 8);
        let b = StackKey::new(&[0x10, 0x21], 8);
        let c = StackKey::new(&[0x10], 8);

        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_bucket_bytes() {
        assert_eq!(StackKey::new(&[], 1).bucket_bytes(), 1);
        assert_eq!(StackKey::new(&[], 300).bucket_bytes(), 512);
        assert_eq!(StackKey::new(&[], usize::MAX).bucket_bytes(), i64::MAX);
    }
}
