use std::sync::atomic::{AtomicU64, Ordering};

const WORD_BITS: usize = u64::BITS as usize;

/// A fixed-length set of bits that can be flipped through a shared reference.
///
/// Every operation on a single bit is atomic, but bulk operations like [`AtomicBitset::fill`] are not atomic as a whole. A
/// writer racing with [`AtomicBitset::take`] on the same bit will either be observed by that `take` or survive it; it is never
/// lost by some third party.
#[derive(Debug)]
pub struct AtomicBitset {
    words: Box<[AtomicU64]>,
    len: usize,
}

impl AtomicBitset {
    pub fn new(len: usize) -> Self {
        let num_words = (len + WORD_BITS - 1) / WORD_BITS;
        Self {
            words: (0..num_words).map(|_| AtomicU64::new(0)).collect(),
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        let (word, mask) = Self::locate(i);
        self.words[word].load(Ordering::Acquire) & mask != 0
    }

    #[inline]
    pub fn set(&self, i: usize) {
        let (word, mask) = Self::locate(i);
        self.words[word].fetch_or(mask, Ordering::AcqRel);
    }

    #[inline]
    pub fn clear(&self, i: usize) {
        let (word, mask) = Self::locate(i);
        self.words[word].fetch_and(!mask, Ordering::AcqRel);
    }

    /// Clears bit `i` and returns its previous value.
    #[inline]
    pub fn take(&self, i: usize) -> bool {
        let (word, mask) = Self::locate(i);
        self.words[word].fetch_and(!mask, Ordering::AcqRel) & mask != 0
    }

    pub fn fill(&self, value: bool) {
        let num_words = self.words.len();
        for (i, word) in self.words.iter().enumerate() {
            let bits = if !value {
                0
            } else if i + 1 == num_words && self.len % WORD_BITS != 0 {
                // Keep the padding bits of the last word clear so `count_ones` stays honest.
                (1u64 << (self.len % WORD_BITS)) - 1
            } else {
                u64::MAX
            };
            word.store(bits, Ordering::Release);
        }
    }

    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Acquire).count_ones() as usize)
            .sum()
    }

    /// Visits the index of every set bit in ascending order, clearing each one as it goes.
    pub fn drain(&self, mut visitor: impl FnMut(usize)) {
        for (word_i, word) in self.words.iter().enumerate() {
            let mut bits = word.swap(0, Ordering::AcqRel);
            while bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                visitor(word_i * WORD_BITS + bit);
                bits &= bits - 1;
            }
        }
    }

    #[inline]
    const fn locate(i: usize) -> (usize, u64) {
        (i / WORD_BITS, 1 << (i % WORD_BITS))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
