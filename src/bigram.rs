//! Bigram multisets and the Sørensen–Dice coefficient.
//!
//! A string is represented by the histogram of its consecutive character
//! pairs. Similarity between two histograms is the Sørensen–Dice coefficient
//! `2·|X ∩ Y| / (|X| + |Y|)`, where the intersection takes the element-wise
//! minimum of multiplicities.
//!
//! Single-character strings are padded with one trailing space so that they
//! still contribute a bigram; the empty string yields the empty multiset.
//!
//! # Examples
//!
//! ```
//! use termscan::bigram::BigramMultiset;
//!
//! let world = BigramMultiset::from_text("world");
//! let query = BigramMultiset::from_text("worl");
//!
//! assert_eq!(world.len(), 4);
//! assert_eq!(world.intersection_len(&query), 3);
//! assert!((world.dice(&query) - 6.0 / 7.0).abs() < 1e-12);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign};

use ahash::AHashMap;

/// Character appended to single-character strings.
pub const PADDING: char = ' ';

/// An ordered pair of consecutive characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bigram(pub char, pub char);

impl fmt::Display for Bigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

/// A multiset of bigrams with a cached total size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BigramMultiset {
    counts: AHashMap<Bigram, usize>,
    len: usize,
}

impl BigramMultiset {
    /// Create an empty multiset.
    pub fn new() -> Self {
        BigramMultiset::default()
    }

    /// Build the bigram histogram of a string.
    pub fn from_text(text: &str) -> Self {
        let mut multiset = BigramMultiset::new();
        let mut chars = text.chars();

        let Some(mut previous) = chars.next() else {
            return multiset;
        };

        let mut paired = false;
        for current in chars {
            multiset.insert(Bigram(previous, current), 1);
            previous = current;
            paired = true;
        }
        if !paired {
            multiset.insert(Bigram(previous, PADDING), 1);
        }

        multiset
    }

    /// Add `count` occurrences of a bigram.
    pub fn insert(&mut self, bigram: Bigram, count: usize) {
        if count == 0 {
            return;
        }
        *self.counts.entry(bigram).or_insert(0) += count;
        self.len += count;
    }

    /// Multiplicity of a bigram (zero if absent).
    pub fn get(&self, bigram: &Bigram) -> usize {
        self.counts.get(bigram).copied().unwrap_or(0)
    }

    /// Total size (sum of multiplicities).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the multiset is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct bigrams.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Iterate distinct bigrams with their multiplicities (in no particular order).
    pub fn iter(&self) -> impl Iterator<Item = (Bigram, usize)> + '_ {
        self.counts.iter().map(|(&bigram, &count)| (bigram, count))
    }

    /// Size of the element-wise-min intersection with another multiset.
    pub fn intersection_len(&self, other: &BigramMultiset) -> usize {
        let (small, large) = if self.distinct() <= other.distinct() {
            (self, other)
        } else {
            (other, self)
        };

        small
            .counts
            .iter()
            .map(|(bigram, &count)| count.min(large.get(bigram)))
            .sum()
    }

    /// Sørensen–Dice coefficient with another multiset.
    ///
    /// Two empty multisets have a coefficient of `0.0`.
    pub fn dice(&self, other: &BigramMultiset) -> f64 {
        dice(self.intersection_len(other), self.len + other.len)
    }
}

/// Sørensen–Dice coefficient from an intersection size and the sum of both sizes.
pub fn dice(intersection: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    2.0 * intersection as f64 / total as f64
}

impl AddAssign<&BigramMultiset> for BigramMultiset {
    fn add_assign(&mut self, other: &BigramMultiset) {
        for (bigram, count) in other.iter() {
            self.insert(bigram, count);
        }
    }
}

impl AddAssign for BigramMultiset {
    fn add_assign(&mut self, other: BigramMultiset) {
        *self += &other;
    }
}

impl Add for BigramMultiset {
    type Output = BigramMultiset;

    fn add(mut self, other: BigramMultiset) -> BigramMultiset {
        self += &other;
        self
    }
}

impl<'a> Extend<&'a BigramMultiset> for BigramMultiset {
    fn extend<I: IntoIterator<Item = &'a BigramMultiset>>(&mut self, iter: I) {
        for multiset in iter {
            *self += multiset;
        }
    }
}

impl Extend<Bigram> for BigramMultiset {
    fn extend<I: IntoIterator<Item = Bigram>>(&mut self, iter: I) {
        for bigram in iter {
            self.insert(bigram, 1);
        }
    }
}

impl FromIterator<Bigram> for BigramMultiset {
    fn from_iter<I: IntoIterator<Item = Bigram>>(iter: I) -> Self {
        let mut multiset = BigramMultiset::new();
        multiset.extend(iter);
        multiset
    }
}

impl From<&str> for BigramMultiset {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}
