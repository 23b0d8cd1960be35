//! Pipeline configuration.
//!
//! The cascade is data: an ordered list of [`SieveSpec`] values, serde-
//! deserializable so deployments can swap sieve order, windows, thresholds,
//! and model files without recompiling. The default configuration is the
//! deterministic cascade, highest precision first.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default sentence window of the pronoun pass.
const DEFAULT_PRONOUN_WINDOW: usize = 3;

/// Default acceptance threshold of scored passes.
const DEFAULT_THRESHOLD: f64 = 0.5;

fn default_pronoun_window() -> Option<usize> {
    Some(DEFAULT_PRONOUN_WINDOW)
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// One pass of the cascade, in the order it should run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SieveSpec {
    /// Speaker and first/second person resolution.
    Speaker,
    /// Identical surface strings.
    ExactMatch,
    /// Surface strings truncated after the head word.
    RelaxedMatch,
    /// Shared heads, acronyms, demonyms.
    ProperHeadMatch,
    /// Pronoun resolution by attribute agreement.
    Pronoun {
        /// Sentences to search back; `None` is unbounded.
        #[serde(default = "default_pronoun_window")]
        max_sentence_distance: Option<usize>,
    },
    /// Feature-based logistic pass over a trained weight file.
    Statistical {
        /// JSON weight file, loaded at system construction.
        weights: PathBuf,
        #[serde(default = "default_threshold")]
        threshold: f64,
        #[serde(default)]
        max_sentence_distance: Option<usize>,
    },
    /// Neural pairwise pass over a trained weight file.
    Neural {
        /// JSON weight file, loaded at system construction.
        weights: PathBuf,
        #[serde(default = "default_threshold")]
        threshold: f64,
        #[serde(default)]
        max_sentence_distance: Option<usize>,
    },
}

/// Whole-pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorefConfig {
    /// The cascade, run in list order.
    pub sieves: Vec<SieveSpec>,
    /// Emit single-mention chains as well.
    pub include_singletons: bool,
}

impl Default for CorefConfig {
    fn default() -> Self {
        Self {
            sieves: vec![
                SieveSpec::Speaker,
                SieveSpec::ExactMatch,
                SieveSpec::RelaxedMatch,
                SieveSpec::ProperHeadMatch,
                SieveSpec::Pronoun {
                    max_sentence_distance: Some(DEFAULT_PRONOUN_WINDOW),
                },
            ],
            include_singletons: false,
        }
    }
}

impl CorefConfig {
    /// The default deterministic cascade.
    #[must_use]
    pub fn deterministic() -> Self {
        Self::default()
    }
}
