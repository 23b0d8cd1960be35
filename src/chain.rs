//! The terminal coreference artifact.
//!
//! A [`CorefChain`] is the per-entity slice of the final partition: one
//! cluster identifier mapped to its ordered member mentions. Chains are
//! produced once per document after the last sieve pass and are immutable
//! afterwards; external writers and scorers consume them.

use crate::cluster::{ClusterId, CorefCluster};
use crate::document::Document;
use crate::mention::{Mention, MentionId};
use serde::{Deserialize, Serialize};

/// One resolved entity: a cluster identifier and its member mentions in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefChain {
    /// Identifier of the surviving cluster.
    pub cluster_id: ClusterId,
    /// Canonical mention of the chain.
    pub representative: MentionId,
    /// Member mentions, in document order.
    pub mentions: Vec<MentionId>,
}

impl CorefChain {
    /// Snapshot a live cluster into an immutable chain.
    #[must_use]
    pub fn from_cluster(cluster: &CorefCluster) -> Self {
        Self {
            cluster_id: cluster.id,
            representative: cluster.representative,
            mentions: cluster.members().collect(),
        }
    }

    /// Number of mentions in this chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    /// Chains are never empty; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// True when the entity was mentioned only once.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.mentions.len() == 1
    }

    /// Does the chain contain this mention?
    #[must_use]
    pub fn contains(&self, mention: MentionId) -> bool {
        self.mentions.binary_search(&mention).is_ok()
    }

    /// Member mentions resolved against their document.
    pub fn mentions_in<'d>(&'d self, doc: &'d Document) -> impl Iterator<Item = &'d Mention> + 'd {
        self.mentions.iter().map(move |id| doc.mention(*id))
    }

    /// Surface strings of the members, for logs and writers.
    #[must_use]
    pub fn surfaces(&self, doc: &Document) -> Vec<String> {
        self.mentions_in(doc).map(Mention::surface).collect()
    }
}

impl std::fmt::Display for CorefChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.cluster_id)?;
        let ids: Vec<String> = self.mentions.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", ids.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use std::collections::BTreeSet;

    fn cluster(id: usize, members: &[usize]) -> CorefCluster {
        CorefCluster {
            id: ClusterId(id),
            representative: MentionId(members[0]),
            mentions: members.iter().map(|&m| MentionId(m)).collect::<BTreeSet<_>>(),
            attributes: Attributes::default(),
        }
    }

    #[test]
    fn test_chain_snapshot_orders_members() {
        let chain = CorefChain::from_cluster(&cluster(3, &[5, 0, 2]));
        assert_eq!(chain.cluster_id, ClusterId(3));
        assert_eq!(chain.mentions, vec![MentionId(0), MentionId(2), MentionId(5)]);
        assert_eq!(chain.len(), 3);
        assert!(!chain.is_singleton());
    }

    #[test]
    fn test_chain_contains() {
        let chain = CorefChain::from_cluster(&cluster(0, &[1, 4]));
        assert!(chain.contains(MentionId(4)));
        assert!(!chain.contains(MentionId(2)));
    }

    #[test]
    fn test_mentions_resolve_against_document() {
        use crate::document::Token;
        use crate::mention::MentionKind;

        let sentences = vec![
            vec![Token::new("IBM"), Token::new("grew")],
            vec![Token::new("It"), Token::new("thrived")],
        ];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["IBM"]),
            Mention::new(MentionId(1), MentionKind::Pronominal, 1, 0, 1, ["It"]),
        ];
        let doc = Document::new(sentences, mentions).unwrap();

        let chain = CorefChain::from_cluster(&cluster(0, &[0, 1]));
        let heads: Vec<&str> = chain
            .mentions_in(&doc)
            .map(|m| m.head_word.as_str())
            .collect();
        assert_eq!(heads, ["IBM", "It"]);
        assert_eq!(chain.surfaces(&doc), ["IBM", "It"]);
    }

    #[test]
    fn test_singleton_chain() {
        let chain = CorefChain::from_cluster(&cluster(7, &[7]));
        assert!(chain.is_singleton());
        assert_eq!(format!("{chain}"), "c7: [m7]");
    }
}
