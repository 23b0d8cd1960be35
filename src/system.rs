//! The resolution orchestrator.
//!
//! [`CorefSystem`] is built once from a [`CorefConfig`], loading every model
//! resource up front so resource problems surface at startup, then resolves
//! documents one at a time. Resolution owns the pass/mention loop: each
//! sieve completes over the whole document in mention order before the next
//! sieve starts, and every accepted proposal merges the mention's cluster
//! into the antecedent's.

use std::sync::Arc;

use crate::chain::CorefChain;
use crate::cluster::Partition;
use crate::config::{CorefConfig, SieveSpec};
use crate::dictionaries::Dictionaries;
use crate::document::Document;
use crate::error::Result;
use crate::mention::MentionId;
use crate::sieve::{LinearScorer, RuleSieve, ScoredSieve, SearchWindow, Sieve};

/// A configured coreference resolver, reusable across documents and shareable
/// across threads.
pub struct CorefSystem {
    sieves: Vec<Box<dyn Sieve>>,
    include_singletons: bool,
}

impl CorefSystem {
    /// Build the default deterministic cascade.
    ///
    /// # Errors
    ///
    /// Never fails today; kept fallible for parity with [`Self::new`].
    pub fn deterministic() -> Result<Self> {
        Self::new(&CorefConfig::default())
    }

    /// Build a system from configuration, with built-in dictionaries.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Resource`] when a configured weight file cannot be
    /// loaded. Resource failures happen here, never during resolution.
    pub fn new(config: &CorefConfig) -> Result<Self> {
        Self::with_dictionaries(config, Dictionaries::builtin())
    }

    /// Build a system from configuration and custom dictionaries.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Resource`] when a configured weight file cannot be
    /// loaded.
    pub fn with_dictionaries(config: &CorefConfig, dict: Arc<Dictionaries>) -> Result<Self> {
        let window = |max: Option<usize>| match max {
            Some(n) => SearchWindow::sentences(n),
            None => SearchWindow::unbounded(),
        };
        let mut sieves: Vec<Box<dyn Sieve>> = Vec::with_capacity(config.sieves.len());
        for spec in &config.sieves {
            let sieve: Box<dyn Sieve> = match spec {
                SieveSpec::Speaker => Box::new(RuleSieve::speaker(Arc::clone(&dict))),
                SieveSpec::ExactMatch => Box::new(RuleSieve::exact_match()),
                SieveSpec::RelaxedMatch => Box::new(RuleSieve::relaxed_match()),
                SieveSpec::ProperHeadMatch => {
                    Box::new(RuleSieve::proper_head_match(Arc::clone(&dict)))
                }
                SieveSpec::Pronoun {
                    max_sentence_distance,
                } => Box::new(RuleSieve::pronoun(
                    Arc::clone(&dict),
                    Some(window(*max_sentence_distance)),
                )),
                SieveSpec::Statistical {
                    weights,
                    threshold,
                    max_sentence_distance,
                } => Box::new(ScoredSieve::statistical(
                    Arc::new(LinearScorer::from_path(weights)?),
                    *threshold,
                    window(*max_sentence_distance),
                )),
                SieveSpec::Neural {
                    weights,
                    threshold,
                    max_sentence_distance,
                } => Box::new(ScoredSieve::neural(
                    Arc::new(LinearScorer::from_path(weights)?),
                    *threshold,
                    window(*max_sentence_distance),
                )),
            };
            sieves.push(sieve);
        }
        Ok(Self {
            sieves,
            include_singletons: config.include_singletons,
        })
    }

    /// Assemble a system from already-built sieves, the injection point for
    /// custom scorers.
    #[must_use]
    pub fn from_parts(sieves: Vec<Box<dyn Sieve>>, include_singletons: bool) -> Self {
        Self {
            sieves,
            include_singletons,
        }
    }

    /// Resolve one document into coreference chains.
    ///
    /// Chains come back ordered by first mention; singleton chains are
    /// filtered out unless configured in.
    ///
    /// # Errors
    ///
    /// Any sieve error aborts the whole document: no partial chains are
    /// returned.
    pub fn resolve(&self, doc: &Document) -> Result<Vec<CorefChain>> {
        let mut partition = Partition::seed(doc);

        for sieve in &self.sieves {
            let before = partition.clusters().count();
            for idx in 0..doc.mentions().len() {
                let mention = MentionId(idx);
                if let Some(antecedent) = sieve.propose(doc, &partition, mention)? {
                    let own = partition.cluster_of(mention);
                    // The antecedent cluster survives and keeps its id.
                    partition.merge(doc, antecedent, own);
                }
            }
            log::debug!(
                "sieve {}: {} -> {} clusters",
                sieve.name(),
                before,
                partition.clusters().count()
            );
        }

        let mut chains: Vec<CorefChain> = partition
            .clusters()
            .filter(|c| self.include_singletons || !c.is_singleton())
            .map(CorefChain::from_cluster)
            .collect();
        chains.sort_by_key(|c| c.representative);
        if let Some(doc_id) = &doc.doc_id {
            log::info!("{doc_id}: {} chains from {} mentions", chains.len(), doc.mentions().len());
        }
        Ok(chains)
    }

    /// Names of the configured passes, in run order.
    pub fn sieve_names(&self) -> impl Iterator<Item = &str> {
        self.sieves.iter().map(|s| s.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Token;
    use crate::mention::{Mention, MentionKind};

    #[test]
    fn test_sieve_names_follow_config() {
        let system = CorefSystem::deterministic().unwrap();
        let names: Vec<&str> = system.sieve_names().collect();
        assert_eq!(
            names,
            [
                "speaker",
                "exact-match",
                "relaxed-match",
                "proper-head-match",
                "pronoun"
            ]
        );
    }

    #[test]
    fn test_missing_weight_file_fails_at_construction() {
        let config = CorefConfig {
            sieves: vec![SieveSpec::Statistical {
                weights: "/nonexistent/weights.json".into(),
                threshold: 0.5,
                max_sentence_distance: None,
            }],
            include_singletons: false,
        };
        assert!(matches!(
            CorefSystem::new(&config),
            Err(crate::Error::Resource(_))
        ));
    }

    #[test]
    fn test_singletons_filtered_by_default() {
        let sentences = vec![vec![Token::new("IBM"), Token::new("met"), Token::new("Apple")]];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["IBM"]),
            Mention::new(MentionId(1), MentionKind::Proper, 0, 2, 3, ["Apple"]),
        ];
        let doc = Document::new(sentences, mentions).unwrap();

        let system = CorefSystem::deterministic().unwrap();
        assert!(system.resolve(&doc).unwrap().is_empty());

        let config = CorefConfig {
            include_singletons: true,
            ..CorefConfig::default()
        };
        let chains = CorefSystem::new(&config).unwrap().resolve(&doc).unwrap();
        assert_eq!(chains.len(), 2);
        assert!(chains.iter().all(CorefChain::is_singleton));
    }
}
