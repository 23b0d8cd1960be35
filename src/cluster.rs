//! Clusters and the merge-only partition they live in.
//!
//! The "once merged, never split" lifecycle is a disjoint-set structure:
//! clusters sit in an arena indexed by [`ClusterId`] handles, mentions carry
//! a handle rather than a live reference, and an absorbed cluster's slot
//! becomes a redirect to its survivor. Merging can therefore never dangle,
//! and a stale handle still resolves to the surviving cluster.

use crate::attributes::Attributes;
use crate::document::Document;
use crate::mention::{Mention, MentionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// ClusterId
// =============================================================================

/// Stable handle of a cluster within one document's partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub usize);

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

// =============================================================================
// CorefCluster
// =============================================================================

/// A set of mentions hypothesized to denote one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefCluster {
    /// Stable identifier; survives merges in which this cluster absorbs
    /// the other.
    pub id: ClusterId,
    /// Canonical member: earliest in document, non-pronominal preferred
    /// over pronominal at equal position.
    pub representative: MentionId,
    /// Members in document order ([`MentionId`] order is document order).
    pub mentions: BTreeSet<MentionId>,
    /// Attributes aggregated across members; `Unknown` is the combine
    /// identity, conflicts collapse to `Unknown`.
    pub attributes: Attributes,
}

impl CorefCluster {
    /// Singleton cluster around one mention.
    #[must_use]
    pub fn singleton(id: ClusterId, mention: &Mention) -> Self {
        Self {
            id,
            representative: mention.id,
            mentions: BTreeSet::from([mention.id]),
            attributes: mention.attributes(),
        }
    }

    /// Number of member mentions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    /// Clusters are never empty; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    /// True when this cluster still holds a single mention.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.mentions.len() == 1
    }

    /// Is `mention` a member?
    #[must_use]
    pub fn contains(&self, mention: MentionId) -> bool {
        self.mentions.contains(&mention)
    }

    /// Member ids in document order.
    pub fn members(&self) -> impl Iterator<Item = MentionId> + '_ {
        self.mentions.iter().copied()
    }
}

fn representative_key(doc: &Document, id: MentionId) -> ((usize, usize, usize), bool, usize) {
    let m = doc.mention(id);
    ((m.sentence, m.start, m.end), m.is_pronominal(), id.0)
}

// =============================================================================
// Partition
// =============================================================================

/// The cluster arena for one document.
///
/// Seeded with one singleton per mention; afterwards the only mutation is
/// [`merge`](Partition::merge), which is irreversible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partition {
    slots: Vec<Slot>,
    /// Current cluster of each mention, updated eagerly on merge.
    assignment: Vec<ClusterId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Slot {
    Live(CorefCluster),
    /// Absorbed; redirects to the surviving cluster.
    Merged(ClusterId),
}

impl Partition {
    /// One singleton cluster per mention, cluster id equal to mention id.
    #[must_use]
    pub fn seed(doc: &Document) -> Self {
        let slots = doc
            .mentions()
            .iter()
            .enumerate()
            .map(|(i, m)| Slot::Live(CorefCluster::singleton(ClusterId(i), m)))
            .collect();
        let assignment = (0..doc.mentions().len()).map(ClusterId).collect();
        Self { slots, assignment }
    }

    /// Surviving cluster id behind a possibly stale handle.
    #[must_use]
    pub fn resolve(&self, id: ClusterId) -> ClusterId {
        let mut current = id;
        while let Slot::Merged(next) = self.slots[current.0] {
            current = next;
        }
        current
    }

    /// The cluster behind a handle, following redirects.
    #[must_use]
    pub fn cluster(&self, id: ClusterId) -> &CorefCluster {
        match &self.slots[self.resolve(id).0] {
            Slot::Live(cluster) => cluster,
            // resolve() only stops on a live slot.
            Slot::Merged(_) => unreachable!("resolve returned a merged slot"),
        }
    }

    /// Current cluster of a mention.
    #[must_use]
    pub fn cluster_of(&self, mention: MentionId) -> ClusterId {
        self.assignment[mention.0]
    }

    /// Do two mentions already share a cluster?
    #[must_use]
    pub fn same_cluster(&self, a: MentionId, b: MentionId) -> bool {
        self.assignment[a.0] == self.assignment[b.0]
    }

    /// Merge the cluster behind `from` into the cluster behind `into`.
    ///
    /// The surviving cluster keeps its identifier; the absorbed cluster's
    /// members are reassigned and its attributes folded in. Merging a
    /// cluster with itself (or an already absorbed pair) is a no-op, not an
    /// error. Returns the surviving id.
    pub fn merge(&mut self, doc: &Document, into: ClusterId, from: ClusterId) -> ClusterId {
        let into = self.resolve(into);
        let from = self.resolve(from);
        if into == from {
            return into;
        }

        let absorbed = match std::mem::replace(&mut self.slots[from.0], Slot::Merged(into)) {
            Slot::Live(cluster) => cluster,
            Slot::Merged(_) => unreachable!("resolve returned a merged slot"),
        };
        let Slot::Live(survivor) = &mut self.slots[into.0] else {
            unreachable!("resolve returned a merged slot");
        };

        for m in &absorbed.mentions {
            self.assignment[m.0] = into;
        }
        survivor.mentions.extend(absorbed.mentions.iter().copied());
        survivor.attributes = survivor.attributes.combine(absorbed.attributes);
        if representative_key(doc, absorbed.representative)
            < representative_key(doc, survivor.representative)
        {
            survivor.representative = absorbed.representative;
        }

        log::debug!(
            "merged {from} into {into} ({} mentions)",
            survivor.mentions.len()
        );
        into
    }

    /// Live clusters, in id order.
    pub fn clusters(&self) -> impl Iterator<Item = &CorefCluster> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Live(cluster) => Some(cluster),
            Slot::Merged(_) => None,
        })
    }

    /// Number of mentions this partition was seeded with.
    #[must_use]
    pub fn mention_count(&self) -> usize {
        self.assignment.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Token;
    use crate::mention::MentionKind;

    fn doc() -> Document {
        // "IBM grew . It thrived ."
        let sentences = vec![
            vec![Token::new("IBM"), Token::new("grew"), Token::new(".")],
            vec![Token::new("It"), Token::new("thrived"), Token::new(".")],
        ];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["IBM"]),
            Mention::new(MentionId(1), MentionKind::Pronominal, 1, 0, 1, ["It"]),
        ];
        Document::new(sentences, mentions).unwrap()
    }

    #[test]
    fn test_seed_singletons() {
        let doc = doc();
        let p = Partition::seed(&doc);
        assert_eq!(p.clusters().count(), 2);
        assert!(p.cluster(ClusterId(0)).is_singleton());
        assert_eq!(p.cluster_of(MentionId(1)), ClusterId(1));
    }

    #[test]
    fn test_merge_absorbs_and_keeps_survivor_id() {
        let doc = doc();
        let mut p = Partition::seed(&doc);
        let survivor = p.merge(&doc, ClusterId(0), ClusterId(1));

        assert_eq!(survivor, ClusterId(0));
        assert_eq!(p.clusters().count(), 1);
        assert!(p.same_cluster(MentionId(0), MentionId(1)));
        assert_eq!(p.cluster_of(MentionId(1)), ClusterId(0));
        // Stale handle still resolves.
        assert_eq!(p.resolve(ClusterId(1)), ClusterId(0));
        assert_eq!(p.cluster(ClusterId(1)).id, ClusterId(0));
    }

    #[test]
    fn test_self_merge_is_noop() {
        let doc = doc();
        let mut p = Partition::seed(&doc);
        p.merge(&doc, ClusterId(0), ClusterId(0));
        assert_eq!(p.clusters().count(), 2);

        p.merge(&doc, ClusterId(0), ClusterId(1));
        let before = p.cluster(ClusterId(0)).clone();
        // Merging an already absorbed pair changes nothing.
        p.merge(&doc, ClusterId(1), ClusterId(0));
        assert_eq!(p.cluster(ClusterId(0)), &before);
    }

    #[test]
    fn test_representative_prefers_earliest() {
        let doc = doc();
        let mut p = Partition::seed(&doc);
        // Merge the pronoun's cluster as survivor; representative must
        // still be the earlier proper mention.
        p.merge(&doc, ClusterId(1), ClusterId(0));
        assert_eq!(p.cluster(ClusterId(1)).representative, MentionId(0));
    }

    #[test]
    fn test_representative_prefers_nonpronominal_at_equal_position() {
        // Mention detection can emit a pronominal and a nominal reading of
        // the same span; the nominal one must represent the merged cluster.
        let sentences = vec![vec![Token::new("one"), Token::new("left")]];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Pronominal, 0, 0, 1, ["one"]),
            Mention::new(MentionId(1), MentionKind::Nominal, 0, 0, 1, ["one"]),
        ];
        let doc = Document::new(sentences, mentions).unwrap();

        let mut p = Partition::seed(&doc);
        p.merge(&doc, ClusterId(0), ClusterId(1));
        assert_eq!(p.cluster(ClusterId(0)).representative, MentionId(1));

        let mut p = Partition::seed(&doc);
        p.merge(&doc, ClusterId(1), ClusterId(0));
        assert_eq!(p.cluster(ClusterId(1)).representative, MentionId(1));
    }

    #[test]
    fn test_attributes_fold_on_merge() {
        use crate::attributes::{Animacy, Gender, Number};
        let sentences = vec![vec![Token::new("she"), Token::new("met"), Token::new("him")]];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Pronominal, 0, 0, 1, ["she"]).with_attributes(
                Gender::Female,
                Number::Singular,
                Animacy::Animate,
            ),
            Mention::new(MentionId(1), MentionKind::Pronominal, 0, 2, 3, ["him"]).with_attributes(
                Gender::Male,
                Number::Singular,
                Animacy::Unknown,
            ),
        ];
        let doc = Document::new(sentences, mentions).unwrap();
        let mut p = Partition::seed(&doc);
        p.merge(&doc, ClusterId(0), ClusterId(1));

        let attrs = p.cluster(ClusterId(0)).attributes;
        assert_eq!(attrs.gender, Gender::Unknown); // conflict collapses
        assert_eq!(attrs.number, Number::Singular);
        assert_eq!(attrs.animacy, Animacy::Animate); // known side propagates
    }
}
