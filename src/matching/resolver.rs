//! Overlap resolution.
//!
//! A query over one sentence usually yields many overlapping candidate
//! windows around each actual occurrence. [`MatchResolver`] reduces such a
//! stream to non-overlapping windows in a single pass: within a run of
//! overlapping candidates, the one with the strictly highest score wins, and
//! ties keep the candidate seen first.
//!
//! The input must be ordered by non-decreasing begin index. Engines
//! implementing [`SimilarityEngine`](crate::matching::engine::SimilarityEngine)
//! guarantee this; arbitrary candidate lists can go through
//! [`resolve_unordered`].
//!
//! # Examples
//!
//! ```
//! use termscan::matching::engine::CandidateWindow;
//! use termscan::matching::resolver::MatchResolver;
//!
//! let candidates = vec![
//!     CandidateWindow::new(0, 2, 0.7),
//!     CandidateWindow::new(1, 3, 0.9),
//!     CandidateWindow::new(2, 4, 0.9),
//!     CandidateWindow::new(5, 6, 0.8),
//! ];
//!
//! let resolved: Vec<_> = MatchResolver::new(candidates).collect();
//! assert_eq!(
//!     resolved,
//!     vec![CandidateWindow::new(1, 3, 0.9), CandidateWindow::new(5, 6, 0.8)]
//! );
//! ```

use crate::matching::engine::CandidateWindow;

/// Lazy single-pass overlap resolution of a candidate stream.
#[derive(Debug)]
pub struct MatchResolver<I> {
    candidates: I,
    state: ResolveState,
}

impl<I> MatchResolver<I>
where
    I: Iterator<Item = CandidateWindow>,
{
    /// Resolve a candidate stream ordered by non-decreasing begin index.
    pub fn new<C>(candidates: C) -> Self
    where
        C: IntoIterator<IntoIter = I>,
    {
        MatchResolver {
            candidates: candidates.into_iter(),
            state: ResolveState::new(),
        }
    }
}

impl<I> Iterator for MatchResolver<I>
where
    I: Iterator<Item = CandidateWindow>,
{
    type Item = CandidateWindow;

    fn next(&mut self) -> Option<CandidateWindow> {
        self.state.next_from(&mut self.candidates)
    }
}

/// Overlap resolution state, kept apart from the candidate source.
#[derive(Clone, Debug, Default)]
pub struct ResolveState {
    best: Option<CandidateWindow>,
    last_begin: usize,
}

impl ResolveState {
    /// Start a resolution.
    pub fn new() -> Self {
        ResolveState::default()
    }

    /// Pull candidates until the next resolved window is known.
    ///
    /// Candidates are consumed only up to the first one that begins past the
    /// current best window.
    pub fn next_from<I>(&mut self, candidates: &mut I) -> Option<CandidateWindow>
    where
        I: Iterator<Item = CandidateWindow>,
    {
        for candidate in candidates.by_ref() {
            debug_assert!(
                candidate.begin >= self.last_begin,
                "candidate {candidate:?} begins before {}",
                self.last_begin
            );
            self.last_begin = candidate.begin;

            match self.best {
                Some(best) if candidate.begin >= best.end => {
                    self.best = Some(candidate);
                    return Some(best);
                }
                Some(best) if candidate.score <= best.score => {}
                _ => self.best = Some(candidate),
            }
        }

        self.best.take()
    }
}

/// Resolve candidates given in any order.
///
/// The candidates are stably sorted by begin index first, so among windows
/// starting at the same token the input order still decides ties.
pub fn resolve_unordered<C>(candidates: C) -> Vec<CandidateWindow>
where
    C: IntoIterator<Item = CandidateWindow>,
{
    let mut candidates: Vec<_> = candidates.into_iter().collect();
    candidates.sort_by_key(|candidate| candidate.begin);
    MatchResolver::new(candidates).collect()
}
