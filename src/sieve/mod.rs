//! The sieve pipeline: ordered passes that propose cluster merges.
//!
//! All sieve kinds share one contract: given a mention in document order and
//! the current partition, propose at most one antecedent cluster by scanning
//! backward within a sieve-specific window. Deterministic passes accept the
//! first candidate satisfying a rule conjunction; scored passes take the
//! highest-scoring candidate above a threshold. Rule-based and learned
//! sieves stay interchangeable behind the [`Sieve`] trait, so the
//! orchestrator never cares which kind it is running.
//!
//! Sieves run highest linguistic precision first, and each completes over the
//! whole document before the next begins: later, lower-precision passes
//! observe earlier merges and can never contradict them, which keeps the
//! final partition precision-monotone.

mod deterministic;
mod scored;

pub use deterministic::RuleSieve;
pub use scored::{LinearScorer, PairScorer, ScoredSieve};

use crate::cluster::{ClusterId, Partition};
use crate::document::Document;
use crate::error::Result;
use crate::mention::MentionId;
use serde::{Deserialize, Serialize};

// =============================================================================
// SearchWindow
// =============================================================================

/// Backward search window of one sieve.
///
/// Window sizes are pipeline policy, so they are configuration rather than
/// constants: high-precision sieves default to an unbounded window, pronoun
/// sieves to a tight one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    /// How many sentences back to look. `None` is unbounded.
    pub max_sentence_distance: Option<usize>,
}

impl SearchWindow {
    /// Search all earlier sentences.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_sentence_distance: None,
        }
    }

    /// Search at most `n` sentences back (0 = same sentence only).
    #[must_use]
    pub const fn sentences(n: usize) -> Self {
        Self {
            max_sentence_distance: Some(n),
        }
    }

    /// Is a candidate `distance` sentences back still inside the window?
    #[must_use]
    pub fn admits(&self, distance: usize) -> bool {
        self.max_sentence_distance.map_or(true, |max| distance <= max)
    }
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

// =============================================================================
// Sieve trait
// =============================================================================

/// One pass of the resolution pipeline.
///
/// Implementations must be deterministic and free of side effects on the
/// document; only the orchestrator mutates the partition.
pub trait Sieve: Send + Sync {
    /// Name of this pass, for logs.
    fn name(&self) -> &str;

    /// Propose at most one antecedent cluster for `mention`.
    ///
    /// Returning a cluster the mention already belongs to is allowed; the
    /// resulting merge is a no-op. Errors abort the current document.
    fn propose(
        &self,
        doc: &Document,
        partition: &Partition,
        mention: MentionId,
    ) -> Result<Option<ClusterId>>;
}

// =============================================================================
// Candidate enumeration
// =============================================================================

/// Antecedent candidates for `mention`, nearest first.
///
/// Earlier mentions of the same sentence come first in nearest-first order
/// (so the closest candidate wins a first-accept scan), followed by the
/// mentions of each earlier sentence in document order, out to the window
/// bound. Later mentions are never candidates: cataphora is not proposed.
#[must_use]
pub fn antecedent_candidates(
    doc: &Document,
    mention: MentionId,
    window: SearchWindow,
) -> Vec<MentionId> {
    let m = doc.mention(mention);
    let mut candidates: Vec<MentionId> = Vec::new();

    // Same sentence, nearest first. MentionId order is document order, so
    // everything below this mention's id and in its sentence is earlier.
    candidates.extend(
        doc.mentions_in_sentence(m.sentence)
            .filter(|&id| id < mention)
            .collect::<Vec<_>>()
            .into_iter()
            .rev(),
    );

    // Earlier sentences, closest sentence first.
    for distance in 1..=m.sentence {
        if !window.admits(distance) {
            break;
        }
        candidates.extend(doc.mentions_in_sentence(m.sentence - distance));
    }

    candidates
}

// =============================================================================
// Tests
// =============================================================================
