//! Learned sieves: pairwise scoring over the backward window.
//!
//! A [`ScoredSieve`] wraps any [`PairScorer`] and turns its pairwise scores
//! into merge proposals: every candidate in the window is scored, and the
//! strictly highest score above the sieve threshold wins. Ties keep the
//! earlier-scanned (nearer) candidate, so scored passes are as deterministic
//! as the rule passes. Statistical and neural passes differ only in the
//! scorer behind the `Arc` and their default thresholds.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::cluster::{ClusterId, Partition};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::mention::MentionId;
use crate::rules;
use crate::sieve::{antecedent_candidates, SearchWindow, Sieve};

// =============================================================================
// PairScorer
// =============================================================================

/// Scores one (mention, antecedent) pair.
///
/// Scores are probabilities in `[0, 1]`. A scoring failure is a document
/// error: the orchestrator aborts the document rather than emit chains
/// computed from partial scores.
pub trait PairScorer: Send + Sync {
    /// Name of the underlying model, for logs.
    fn name(&self) -> &str;

    /// Probability that `mention` and `antecedent` corefer.
    fn score(
        &self,
        doc: &Document,
        partition: &Partition,
        mention: MentionId,
        antecedent: MentionId,
    ) -> Result<f64>;
}

// =============================================================================
// ScoredSieve
// =============================================================================

/// A pipeline pass driven by a pairwise scoring model.
pub struct ScoredSieve {
    name: &'static str,
    window: SearchWindow,
    scorer: Arc<dyn PairScorer>,
    threshold: f64,
}

impl ScoredSieve {
    /// Feature-based statistical pass.
    #[must_use]
    pub fn statistical(scorer: Arc<dyn PairScorer>, threshold: f64, window: SearchWindow) -> Self {
        Self {
            name: "statistical",
            window,
            scorer,
            threshold,
        }
    }

    /// Neural pass; same contract, different scorer and threshold.
    #[must_use]
    pub fn neural(scorer: Arc<dyn PairScorer>, threshold: f64, window: SearchWindow) -> Self {
        Self {
            name: "neural",
            window,
            scorer,
            threshold,
        }
    }
}

impl Sieve for ScoredSieve {
    fn name(&self) -> &str {
        self.name
    }

    fn propose(
        &self,
        doc: &Document,
        partition: &Partition,
        mention: MentionId,
    ) -> Result<Option<ClusterId>> {
        let m = doc.mention(mention);
        let mut best: Option<(f64, MentionId)> = None;

        for candidate in antecedent_candidates(doc, mention, self.window) {
            if partition.same_cluster(candidate, mention) {
                continue;
            }
            let ant = doc.mention(candidate);
            // Hard constraints bind learned passes too.
            if rules::i_within_i(m, ant) || rules::list_constraint_violated(m, ant) {
                continue;
            }

            let score = self.scorer.score(doc, partition, mention, candidate)?;
            if score < self.threshold {
                continue;
            }
            // Strictly greater: on a tie the nearer candidate, scanned
            // first, is kept.
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, candidate));
            }
        }

        Ok(best.map(|(score, candidate)| {
            let cluster = partition.cluster_of(candidate);
            log::debug!(
                "{} ({}): {} -> {} @ {score:.3}",
                self.name,
                self.scorer.name(),
                mention,
                candidate
            );
            cluster
        }))
    }
}

// =============================================================================
// LinearScorer
// =============================================================================

/// Logistic model over hand-built pair features.
///
/// Feature weights come from a JSON file produced offline; unknown feature
/// names in the file are carried but never fire, and features absent from
/// the file weigh zero.
#[derive(Debug, Clone, Default)]
pub struct LinearScorer {
    weights: HashMap<String, f64>,
    bias: f64,
}

#[derive(Debug, Deserialize)]
struct WeightFile {
    #[serde(default)]
    bias: f64,
    #[serde(default)]
    weights: HashMap<String, f64>,
}

impl LinearScorer {
    /// Build directly from weights, mainly for tests.
    #[must_use]
    pub fn new(weights: HashMap<String, f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Load weights from a JSON file.
    ///
    /// # Errors
    ///
    /// [`Error::Resource`] when the file is missing or does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::resource(format!("weight file {}: {e}", path.display())))?;
        let file: WeightFile = serde_json::from_str(&raw)
            .map_err(|e| Error::resource(format!("weight file {}: {e}", path.display())))?;
        Ok(Self::new(file.weights, file.bias))
    }

    fn weight(&self, name: &str) -> f64 {
        self.weights.get(name).copied().unwrap_or(0.0)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl PairScorer for LinearScorer {
    fn name(&self) -> &str {
        "linear"
    }

    fn score(
        &self,
        doc: &Document,
        partition: &Partition,
        mention: MentionId,
        antecedent: MentionId,
    ) -> Result<f64> {
        let m = doc.mention(mention);
        let ant = doc.mention(antecedent);

        let mut z = self.bias;
        z += self.weight("sentence_distance") * m.sentence.abs_diff(ant.sentence) as f64;
        z += self.weight("mention_distance") * mention.0.abs_diff(antecedent.0) as f64;
        if m.surface_lower() == ant.surface_lower() {
            z += self.weight("exact_match");
        }
        if m.head_word.eq_ignore_ascii_case(&ant.head_word) {
            z += self.weight("head_match");
        }
        if rules::same_speaker(m, ant) {
            z += self.weight("same_speaker");
        }
        let m_cluster = partition.cluster(partition.cluster_of(mention));
        let a_cluster = partition.cluster(partition.cluster_of(antecedent));
        if rules::clusters_agree(m_cluster, a_cluster) {
            z += self.weight("attributes_agree");
        }
        z += self.weight(&format!("kind_{}_{}", m.kind.as_str(), ant.kind.as_str()));

        Ok(sigmoid(z))
    }
}

// =============================================================================
// Tests
// =============================================================================
