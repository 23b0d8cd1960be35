//! Sieve-based coreference resolution.
//!
//! Resolves which mentions in a document denote the same entity by running
//! an ordered cascade of sieves over an initial one-cluster-per-mention
//! partition. Each sieve scans the document in mention order, proposes at
//! most one antecedent cluster per mention, and accepted proposals merge
//! clusters. Merges are never undone, so running high-precision passes
//! first keeps early decisions authoritative for everything after them.
//!
//! # Example
//!
//! ```
//! use corefer::{CorefSystem, Document, Mention, MentionId, MentionKind, Token};
//!
//! let sentences = vec![
//!     vec![Token::new("IBM"), Token::new("reported"), Token::new("gains")],
//!     vec![Token::new("It"), Token::new("thrived")],
//! ];
//! let mentions = vec![
//!     Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["IBM"]),
//!     Mention::new(MentionId(1), MentionKind::Pronominal, 1, 0, 1, ["It"]),
//! ];
//! let doc = Document::new(sentences, mentions)?;
//!
//! let system = CorefSystem::deterministic()?;
//! let chains = system.resolve(&doc)?;
//! assert_eq!(chains.len(), 1);
//! assert_eq!(chains[0].mentions, vec![MentionId(0), MentionId(1)]);
//! # Ok::<(), corefer::Error>(())
//! ```
//!
//! # Pipeline shape
//!
//! The default cascade is deterministic: speaker matching, exact string
//! match, relaxed string match, proper-head/acronym match, then pronoun
//! resolution in a bounded window. Learned passes ([`sieve::ScoredSieve`])
//! slot anywhere in the same cascade via [`CorefConfig`].

pub mod attributes;
pub mod chain;
pub mod cluster;
pub mod config;
pub mod dictionaries;
pub mod document;
pub mod error;
pub mod mention;
pub mod rules;
pub mod sieve;
pub mod speaker;
pub mod system;

pub use attributes::{Animacy, Attributes, Gender, Number};
pub use chain::CorefChain;
pub use cluster::{ClusterId, CorefCluster, Partition};
pub use config::{CorefConfig, SieveSpec};
pub use dictionaries::Dictionaries;
pub use document::{Document, Token};
pub use error::{Error, Result};
pub use mention::{Mention, MentionId, MentionKind};
pub use sieve::{PairScorer, Sieve};
pub use speaker::{SpeakerInfo, SpeakerRegistry};
pub use system::CorefSystem;

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::attributes::{Animacy, Attributes, Gender, Number};
    pub use crate::chain::CorefChain;
    pub use crate::cluster::{ClusterId, CorefCluster, Partition};
    pub use crate::config::{CorefConfig, SieveSpec};
    pub use crate::dictionaries::Dictionaries;
    pub use crate::document::{Document, Token};
    pub use crate::error::{Error, Result};
    pub use crate::mention::{Mention, MentionId, MentionKind};
    pub use crate::sieve::{PairScorer, Sieve};
    pub use crate::system::CorefSystem;
}
