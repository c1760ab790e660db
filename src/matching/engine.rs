//! Sliding-window similarity search over token sequences.
//!
//! An engine is built incrementally: the bigram multiset of every token is
//! appended in token order together with a strip flag. A query then
//! enumerates the contiguous token windows whose Sørensen–Dice coefficient
//! against the query bigrams reaches a threshold.
//!
//! Windows are enumerated lazily by ascending begin index, then ascending end
//! index. A window never begins or ends on a token appended with
//! `strip = true`.
//!
//! # Examples
//!
//! ```
//! use termscan::bigram::BigramMultiset;
//! use termscan::matching::engine::{SequenceMatcher, SimilarityEngine};
//!
//! let mut engine = SequenceMatcher::new();
//! engine.append(BigramMultiset::from_text("Hello"), false);
//! engine.append(BigramMultiset::new(), true);
//! engine.append(BigramMultiset::from_text("world"), false);
//! engine.append(BigramMultiset::from_text("! "), true);
//!
//! let query = BigramMultiset::from_text("worl");
//! let windows: Vec<_> = engine.matches(&query, 0.85).collect();
//!
//! assert_eq!(windows.len(), 1);
//! assert_eq!((windows[0].begin, windows[0].end), (2, 3));
//! ```

use std::fmt::Debug;

use ahash::AHashMap;

use crate::bigram::{self, Bigram, BigramMultiset};

/// A candidate match window, in token indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateWindow {
    /// Index of the first token of the window
    pub begin: usize,

    /// Index past the last token of the window
    pub end: usize,

    /// Sørensen–Dice coefficient of the window against the query
    pub score: f64,
}

impl CandidateWindow {
    /// Create a new candidate window.
    pub fn new(begin: usize, end: usize, score: f64) -> Self {
        CandidateWindow { begin, end, score }
    }

    /// Check whether `other` starts inside this window.
    pub fn overlaps(&self, other: &CandidateWindow) -> bool {
        other.begin < self.end && self.begin < other.end
    }
}

/// A lazily produced sequence of candidate windows.
pub type Windows<'a> = Box<dyn Iterator<Item = CandidateWindow> + 'a>;

/// Trait for similarity search engines over token sequences.
///
/// Implementations must enumerate windows in non-decreasing begin order,
/// which the overlap resolution relies on.
pub trait SimilarityEngine: Debug {
    /// Append the bigrams of the next token.
    fn append(&mut self, bigrams: BigramMultiset, strip: bool);

    /// Number of appended tokens.
    fn len(&self) -> usize;

    /// Check if no token was appended.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate windows scoring at least `threshold` against `query`.
    fn matches<'a>(&'a self, query: &'a BigramMultiset, threshold: f64) -> Windows<'a>;
}

#[derive(Clone, Debug)]
struct Slot {
    bigrams: BigramMultiset,
    strip: bool,
}

/// The built-in similarity engine.
///
/// Window scores are maintained incrementally as a window grows: the window
/// histogram and its intersection with the query are updated per appended
/// token, so extending a window costs time proportional to the number of
/// distinct bigrams of the added token.
#[derive(Clone, Debug, Default)]
pub struct SequenceMatcher {
    slots: Vec<Slot>,
}

impl SequenceMatcher {
    /// Create an empty engine.
    pub fn new() -> Self {
        SequenceMatcher::default()
    }

    /// Enumerate matching windows (concrete iterator type).
    pub fn windows<'a>(&'a self, query: &'a BigramMultiset, threshold: f64) -> WindowScan<'a> {
        WindowScan {
            engine: self,
            query,
            cursor: ScanCursor::new(threshold),
        }
    }
}

impl SimilarityEngine for SequenceMatcher {
    fn append(&mut self, bigrams: BigramMultiset, strip: bool) {
        self.slots.push(Slot { bigrams, strip });
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn matches<'a>(&'a self, query: &'a BigramMultiset, threshold: f64) -> Windows<'a> {
        Box::new(self.windows(query, threshold))
    }
}

/// Position and window state of a scan over a [`SequenceMatcher`].
///
/// The cursor borrows neither the engine nor the query; both are passed to
/// [`ScanCursor::next_window`], so a scan can be suspended after any window
/// and resumed later.
#[derive(Clone, Debug)]
pub struct ScanCursor {
    threshold: f64,
    begin: usize,
    end: usize,
    window: AHashMap<Bigram, usize>,
    window_len: usize,
    intersection: usize,
}

impl ScanCursor {
    /// Start a scan at the first token.
    pub fn new(threshold: f64) -> Self {
        debug_assert!(
            threshold > 0.0 && threshold <= 1.0,
            "threshold {threshold} out of (0, 1]"
        );

        ScanCursor {
            threshold,
            begin: 0,
            end: 0,
            window: AHashMap::new(),
            window_len: 0,
            intersection: 0,
        }
    }

    /// Index of the token the windows under consideration begin at.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Continue the scan up to the next window scoring at least the threshold.
    pub fn next_window(
        &mut self,
        engine: &SequenceMatcher,
        query: &BigramMultiset,
    ) -> Option<CandidateWindow> {
        let slots = &engine.slots;
        while self.begin < slots.len() {
            if self.end == self.begin && slots[self.begin].strip {
                self.advance_begin();
                continue;
            }

            let exhausted = self.end >= slots.len()
                || (self.window_len > 0 && self.upper_bound(query) < self.threshold);
            if exhausted {
                self.advance_begin();
                continue;
            }

            self.extend_window(&slots[self.end], query);

            if slots[self.end - 1].strip || self.window_len == 0 {
                continue;
            }

            let score = bigram::dice(self.intersection, self.window_len + query.len());
            if score >= self.threshold {
                return Some(CandidateWindow::new(self.begin, self.end, score));
            }
        }

        None
    }

    /// Start the windows beginning at the next token.
    fn advance_begin(&mut self) {
        self.begin += 1;
        self.end = self.begin;
        self.window.clear();
        self.window_len = 0;
        self.intersection = 0;
    }

    /// Best score any extension of the current window could reach.
    fn upper_bound(&self, query: &BigramMultiset) -> f64 {
        bigram::dice(query.len(), self.window_len + query.len())
    }

    fn extend_window(&mut self, slot: &Slot, query: &BigramMultiset) {
        for (bigram, count) in slot.bigrams.iter() {
            let limit = query.get(&bigram);
            let present = self.window.entry(bigram).or_insert(0);
            let before = (*present).min(limit);
            *present += count;
            self.intersection += (*present).min(limit) - before;
        }
        self.window_len += slot.bigrams.len();
        self.end += 1;
    }
}

/// Lazy window enumeration of a [`SequenceMatcher`].
#[derive(Debug)]
pub struct WindowScan<'a> {
    engine: &'a SequenceMatcher,
    query: &'a BigramMultiset,
    cursor: ScanCursor,
}

impl Iterator for WindowScan<'_> {
    type Item = CandidateWindow;

    fn next(&mut self) -> Option<CandidateWindow> {
        self.cursor.next_window(self.engine, self.query)
    }
}

#[cfg(test)]
mod tests {
    use std::iter;

    use super::*;

    fn engine(tokens: &[(&str, bool)]) -> SequenceMatcher {
        let mut engine = SequenceMatcher::new();
        for &(text, strip) in tokens {
            engine.append(BigramMultiset::from_text(text), strip);
        }
        engine
    }

    #[test]
    fn test_exact_match() {
        let engine = engine(&[("red", false), ("  ", true), ("dwarf", false)]);
        let query = BigramMultiset::from_text("dwarf");

        let windows: Vec<_> = engine.matches(&query, 1.0).collect();
        assert_eq!(windows, vec![CandidateWindow::new(2, 3, 1.0)]);
    }

    #[test]
    fn test_windows_skip_strip_boundaries() {
        let engine = engine(&[(", ", true), ("ab", false), (", ", true), ("ab", false), (".", true)]);
        let query = BigramMultiset::from_text("ab");

        let windows: Vec<_> = engine.matches(&query, 0.1).collect();
        for window in &windows {
            assert!(window.begin % 2 == 1, "{window:?}");
            assert!(window.end % 2 == 0, "{window:?}");
        }
        assert_eq!(
            windows.iter().map(|w| (w.begin, w.end)).collect::<Vec<_>>(),
            vec![(1, 2), (1, 4), (3, 4)]
        );
    }

    #[test]
    fn test_order_and_scores() {
        let engine = engine(&[("ab", false), ("bc", false), ("cd", false)]);
        let query = BigramMultiset::from_text("abc");

        let windows: Vec<_> = engine.matches(&query, 0.5).collect();
        assert_eq!(
            windows,
            vec![
                CandidateWindow::new(0, 1, 2.0 / 3.0),
                CandidateWindow::new(0, 2, 1.0),
                CandidateWindow::new(0, 3, 0.8),
                CandidateWindow::new(1, 2, 2.0 / 3.0),
                CandidateWindow::new(1, 3, 0.5),
            ]
        );
        for pair in windows.windows(2) {
            assert!(pair[0].begin <= pair[1].begin);
        }
    }

    #[test]
    fn test_repeated_bigrams_use_minimum() {
        let engine = engine(&[("aa", false), ("aa", false)]);
        let query = BigramMultiset::from_text("aa");

        let windows: Vec<_> = engine.matches(&query, 0.5).collect();
        assert_eq!(
            windows,
            vec![
                CandidateWindow::new(0, 1, 1.0),
                CandidateWindow::new(0, 2, 2.0 / 3.0),
                CandidateWindow::new(1, 2, 1.0),
            ]
        );
    }

    #[test]
    fn test_empty_windows_are_not_reported() {
        let mut engine = SequenceMatcher::new();
        engine.append(BigramMultiset::new(), false);
        engine.append(BigramMultiset::from_text("xy"), false);

        let query = BigramMultiset::from_text("xy");
        let windows: Vec<_> = engine.matches(&query, 0.5).collect();
        assert_eq!(
            windows,
            vec![CandidateWindow::new(0, 2, 1.0), CandidateWindow::new(1, 2, 1.0)]
        );
    }

    #[test]
    fn test_empty_query_and_engine() {
        let engine = engine(&[("ab", false)]);
        assert_eq!(engine.matches(&BigramMultiset::new(), 0.5).count(), 0);

        let empty = SequenceMatcher::new();
        assert!(empty.is_empty());
        assert_eq!(empty.matches(&BigramMultiset::from_text("ab"), 0.5).count(), 0);
    }

    #[test]
    fn test_cursor_resumes_where_it_stopped() {
        let engine = engine(&[("ab", false), ("  ", true), ("ab", false), ("  ", true), ("ab", false)]);
        let query = BigramMultiset::from_text("ab");

        let mut cursor = ScanCursor::new(1.0);
        let first = cursor.next_window(&engine, &query);
        assert_eq!(first, Some(CandidateWindow::new(0, 1, 1.0)));
        assert_eq!(cursor.begin(), 0);

        let rest: Vec<_> = iter::from_fn(|| cursor.next_window(&engine, &query)).collect();
        assert_eq!(
            rest,
            vec![CandidateWindow::new(2, 3, 1.0), CandidateWindow::new(4, 5, 1.0)]
        );
        assert_eq!(cursor.next_window(&engine, &query), None);
    }

    #[test]
    fn test_overlaps() {
        let a = CandidateWindow::new(0, 3, 0.9);
        assert!(a.overlaps(&CandidateWindow::new(2, 4, 0.9)));
        assert!(!a.overlaps(&CandidateWindow::new(3, 4, 0.9)));
    }
}
