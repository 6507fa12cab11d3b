use num_integer::div_ceil;
use unwrap::unwrap;

/// Returns the index and mask necessary to access the bit at `index` in a ```&[u64]```.
///
/// # Example
///
/// ```
/// # use rothsim::data_structures::word_mask_64;
/// let (word, mask) = word_mask_64(66);
/// assert_eq!(word, 1);
/// assert_eq!(mask, 0b100);
/// ```
#[inline(always)]
pub fn word_mask_64(index: usize) -> (usize, u64) {
    let word = index / 64;
    let mask = 1 << (index % 64);
    (word, mask)
}

/// Fixed size (at runtime) set of bits recording which gates an evaluation pass has settled.
///
/// Lives outside the gates so a pass can be restarted by clearing a handful of words.
/// Bits are allocated in multiples of 64.
///
/// # Example
/// ```
/// # use rothsim::data_structures::Visited;
/// let mut v = Visited::new(3);
///
/// assert_eq!(v.len(), 64);
/// assert!(!v.get(2));
///
/// v.mark(2);
/// assert!(v.get(2));
/// assert_eq!(v.count(), 1);
///
/// v.clear();
/// assert!(!v.get(2));
/// ```
///
/// # Panics
///
/// Panics if you try to read or write to an index >= [Visited::len()]
///
/// ```should_panic
/// # use rothsim::data_structures::Visited;
/// let v = Visited::new(2);
///
/// v.get(64);
/// ```
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Visited {
    words: Vec<u64>,
}

impl Visited {
    /// Returns a new [Visited] with room for `n` bits, all unset.
    pub fn new(n: usize) -> Visited {
        Visited {
            words: vec![0; div_ceil(n, 64)],
        }
    }

    /// Returns true if the bit at `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index` >= [Visited::len()]
    #[inline(always)]
    pub fn get(&self, index: usize) -> bool {
        let (word_index, mask) = word_mask_64(index);
        let word = unwrap!(
            self.words.get(word_index),
            "Tried to access index out of bounds:{}, size:{}",
            index,
            self.len(),
        );

        word & mask != 0
    }

    /// Sets the bit at `index`, returns true if it was not set before.
    ///
    /// # Panics
    ///
    /// Panics if `index` >= [Visited::len()]
    #[inline(always)]
    pub fn mark(&mut self, index: usize) -> bool {
        let (word_index, mask) = word_mask_64(index);
        let len = self.len();
        let word = unwrap!(
            self.words.get_mut(word_index),
            "Tried to write to index out of bounds:{}, size:{}",
            index,
            len,
        );
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    /// Unsets every bit.
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0
        }
    }

    /// Grows the set so that it can hold at least `n` bits, never shrinks.
    pub fn resize(&mut self, n: usize) {
        let words = div_ceil(n, 64);
        if words > self.words.len() {
            self.words.resize(words, 0);
        }
    }

    /// Returns the number of set bits.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the number of bits in the [Visited].
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.words.len() * 64
    }
}
