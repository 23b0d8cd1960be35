//! Deterministic rule-based sieves.
//!
//! Each pass is a [`RuleSieve`] carrying a match policy: the shared skeleton
//! walks the backward candidate window, applies the hard blocking
//! constraints, then accepts the first candidate whose cluster satisfies the
//! policy and whose aggregated attributes are compatible. First-accept over
//! a nearest-first window makes every pass deterministic.

use std::sync::Arc;

use crate::cluster::{ClusterId, CorefCluster, Partition};
use crate::dictionaries::Dictionaries;
use crate::document::Document;
use crate::error::Result;
use crate::mention::{Mention, MentionId};
use crate::rules;
use crate::sieve::{antecedent_candidates, SearchWindow, Sieve};

/// Default window of the pronoun pass, in sentences.
const PRONOUN_WINDOW: usize = 3;

/// Which rule conjunction a [`RuleSieve`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    Speaker,
    ExactMatch,
    RelaxedMatch,
    ProperHeadMatch,
    Pronoun,
}

/// One deterministic pass of the cascade.
pub struct RuleSieve {
    name: &'static str,
    policy: Policy,
    window: SearchWindow,
    dict: Arc<Dictionaries>,
}

impl RuleSieve {
    /// Links first and second person pronouns to their speaker, the
    /// highest-precision pass.
    #[must_use]
    pub fn speaker(dict: Arc<Dictionaries>) -> Self {
        Self {
            name: "speaker",
            policy: Policy::Speaker,
            window: SearchWindow::unbounded(),
            dict,
        }
    }

    /// Merges clusters containing identical non-pronominal surface strings.
    #[must_use]
    pub fn exact_match() -> Self {
        Self {
            name: "exact-match",
            policy: Policy::ExactMatch,
            window: SearchWindow::unbounded(),
            dict: Dictionaries::builtin(),
        }
    }

    /// Merges clusters whose spans match once truncated after the head word.
    #[must_use]
    pub fn relaxed_match() -> Self {
        Self {
            name: "relaxed-match",
            policy: Policy::RelaxedMatch,
            window: SearchWindow::unbounded(),
            dict: Dictionaries::builtin(),
        }
    }

    /// Merges clusters sharing a head word, an acronym expansion, or a
    /// demonym/place pairing.
    #[must_use]
    pub fn proper_head_match(dict: Arc<Dictionaries>) -> Self {
        Self {
            name: "proper-head-match",
            policy: Policy::ProperHeadMatch,
            window: SearchWindow::unbounded(),
            dict,
        }
    }

    /// Resolves pronouns by attribute agreement within a bounded window.
    #[must_use]
    pub fn pronoun(dict: Arc<Dictionaries>, window: Option<SearchWindow>) -> Self {
        Self {
            name: "pronoun",
            policy: Policy::Pronoun,
            window: window.unwrap_or(SearchWindow::sentences(PRONOUN_WINDOW)),
            dict,
        }
    }

    /// Does this pass try to resolve `mention` at all?
    fn applies_to(&self, mention: &Mention) -> bool {
        match self.policy {
            // String and head passes never fire for pronouns; the pronoun
            // pass fires only for them. Speaker matching needs both sides.
            Policy::ExactMatch | Policy::RelaxedMatch | Policy::ProperHeadMatch => {
                !mention.is_pronominal()
            }
            // A pronominal mention with no dictionary entry and no
            // annotated attributes would agree with everything; skip it.
            Policy::Pronoun => {
                mention.is_pronominal()
                    && (self.dict.is_pronoun(&mention.head_word)
                        || mention.attributes() != crate::attributes::Attributes::default())
            }
            Policy::Speaker => true,
        }
    }

    /// Agreement attributes of a pronoun, falling back to the pronoun
    /// dictionaries for components the annotation left unknown.
    fn pronoun_attributes(&self, mention: &Mention) -> crate::attributes::Attributes {
        use crate::attributes::{Animacy, Gender, Number};
        let annotated = mention.attributes();
        let lexical = self.dict.pronoun_attributes(&mention.head_word);
        crate::attributes::Attributes::new(
            if annotated.gender == Gender::Unknown {
                lexical.gender
            } else {
                annotated.gender
            },
            if annotated.number == Number::Unknown {
                lexical.number
            } else {
                annotated.number
            },
            if annotated.animacy == Animacy::Unknown {
                lexical.animacy
            } else {
                annotated.animacy
            },
        )
    }

    fn speaker_pair(&self, doc: &Document, m: &Mention, ant: &Mention) -> bool {
        let first = |x: &Mention| x.is_pronominal() && self.dict.is_first_person(&x.head_word);
        let second = |x: &Mention| x.is_pronominal() && self.dict.is_second_person(&x.head_word);

        // Two "I"s (or two "you"s) from the same speaker denote the same
        // entity; "I" also corefers with a mention of its speaker's name.
        (first(m) && first(ant) && rules::same_speaker(m, ant))
            || (second(m) && second(ant) && rules::same_speaker(m, ant))
            || (first(m) && rules::antecedent_matches_mention_speaker(doc, m, ant))
            || (first(ant) && rules::antecedent_matches_mention_speaker(doc, ant, m))
    }

    fn pronoun_pair(
        &self,
        m: &Mention,
        ant: &Mention,
        antecedent_cluster: &CorefCluster,
    ) -> bool {
        let head = &m.head_word;
        // Reflexives are bound locally; their antecedent must share the
        // sentence.
        if self.dict.is_reflexive(head) && !m.same_sentence(ant) {
            return false;
        }
        // Person constraints: distinct speech roles never merge here, and
        // deictic pronouns from different speakers point at different
        // entities.
        if ant.is_pronominal() {
            let m_first = self.dict.is_first_person(head);
            let m_second = self.dict.is_second_person(head);
            let a_first = self.dict.is_first_person(&ant.head_word);
            let a_second = self.dict.is_second_person(&ant.head_word);
            if (m_first && a_second) || (m_second && a_first) {
                return false;
            }
            if (m_first && a_first || m_second && a_second) && !rules::same_speaker(m, ant) {
                return false;
            }
        }
        self.pronoun_attributes(m)
            .agrees_with(antecedent_cluster.attributes)
    }

    fn head_or_alias_pair(&self, doc: &Document, a: &CorefCluster, b: &CorefCluster) -> bool {
        if rules::clusters_heads_match(doc, a, b) || rules::clusters_are_acronym(doc, a, b) {
            return true;
        }
        // Demonym pairing ("Germany" / "the German team") on head words.
        a.members().map(|id| doc.mention(id)).any(|m| {
            !m.is_pronominal()
                && b.members().map(|id| doc.mention(id)).any(|ant| {
                    !ant.is_pronominal() && self.dict.is_demonym_pair(&m.head_word, &ant.head_word)
                })
        })
    }
}

impl Sieve for RuleSieve {
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
        if !self.applies_to(m) {
            return Ok(None);
        }
        let mention_cluster = partition.cluster(partition.cluster_of(mention));

        for candidate in antecedent_candidates(doc, mention, self.window) {
            if partition.same_cluster(candidate, mention) {
                continue;
            }
            let ant = doc.mention(candidate);
            if rules::i_within_i(m, ant) || rules::list_constraint_violated(m, ant) {
                continue;
            }

            let antecedent_cluster = partition.cluster(partition.cluster_of(candidate));
            let matched = match self.policy {
                Policy::Speaker => self.speaker_pair(doc, m, ant),
                Policy::ExactMatch => {
                    rules::clusters_exact_string_match(doc, mention_cluster, antecedent_cluster)
                }
                Policy::RelaxedMatch => {
                    rules::clusters_relaxed_string_match(doc, mention_cluster, antecedent_cluster)
                }
                Policy::ProperHeadMatch => {
                    self.head_or_alias_pair(doc, mention_cluster, antecedent_cluster)
                }
                Policy::Pronoun => self.pronoun_pair(m, ant, antecedent_cluster),
            };
            if !matched {
                continue;
            }
            // The pronoun pass checks agreement itself with lexical
            // fallback; every other pass guards on cluster agreement.
            if self.policy != Policy::Pronoun
                && !rules::clusters_agree(mention_cluster, antecedent_cluster)
            {
                continue;
            }

            log::debug!(
                "{}: {} -> {} ({:?})",
                self.name,
                mention,
                candidate,
                antecedent_cluster.id
            );
            return Ok(Some(antecedent_cluster.id));
        }
        Ok(None)
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

    fn ibm_doc() -> Document {
        // s0: "IBM reported gains ."
        // s1: "International Business Machines grew ."
        // s2: "It thrived ."
        let sentences = vec![
            vec![
                Token::new("IBM"),
                Token::new("reported"),
                Token::new("gains"),
                Token::new("."),
            ],
            vec![
                Token::new("International"),
                Token::new("Business"),
                Token::new("Machines"),
                Token::new("grew"),
                Token::new("."),
            ],
            vec![Token::new("It"), Token::new("thrived"), Token::new(".")],
        ];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["IBM"]),
            Mention::new(
                MentionId(1),
                MentionKind::Proper,
                1,
                0,
                3,
                ["International", "Business", "Machines"],
            ),
            Mention::new(MentionId(2), MentionKind::Pronominal, 2, 0, 1, ["It"]),
        ];
        Document::new(sentences, mentions).unwrap()
    }

    #[test]
    fn test_exact_match_ignores_pronouns() {
        let doc = ibm_doc();
        let partition = Partition::seed(&doc);
        let sieve = RuleSieve::exact_match();
        // The pronoun "It" is not resolved by a string pass.
        assert_eq!(sieve.propose(&doc, &partition, MentionId(2)).unwrap(), None);
        // No other IBM surface repeats, so nothing matches either.
        assert_eq!(sieve.propose(&doc, &partition, MentionId(1)).unwrap(), None);
    }

    #[test]
    fn test_acronym_links_abbreviation() {
        let doc = ibm_doc();
        let partition = Partition::seed(&doc);
        let sieve = RuleSieve::proper_head_match(Dictionaries::builtin());
        let proposal = sieve.propose(&doc, &partition, MentionId(1)).unwrap();
        assert_eq!(proposal, Some(ClusterId(0)));
    }

    #[test]
    fn test_pronoun_resolves_to_nearest_agreeing_cluster() {
        use crate::attributes::{Animacy, Gender, Number};
        let doc = ibm_doc();
        let mut partition = Partition::seed(&doc);
        partition.merge(&doc, ClusterId(0), ClusterId(1));

        let sieve = RuleSieve::pronoun(Dictionaries::builtin(), None);
        let proposal = sieve.propose(&doc, &partition, MentionId(2)).unwrap();
        // "It" is neutral singular inanimate; the merged cluster carries
        // unknown attributes and therefore agrees.
        assert_eq!(proposal, Some(ClusterId(0)));

        // A cluster known to be animate plural does not agree.
        let sentences = vec![
            vec![Token::new("they"), Token::new("left")],
            vec![Token::new("It"), Token::new("thrived")],
        ];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Pronominal, 0, 0, 1, ["they"])
                .with_attributes(Gender::Unknown, Number::Plural, Animacy::Animate),
            Mention::new(MentionId(1), MentionKind::Pronominal, 1, 0, 1, ["It"]),
        ];
        let doc = Document::new(sentences, mentions).unwrap();
        let partition = Partition::seed(&doc);
        assert_eq!(sieve.propose(&doc, &partition, MentionId(1)).unwrap(), None);
    }

    #[test]
    fn test_pronoun_window_bounds_resolution() {
        let sentences = vec![
            vec![Token::new("IBM"), Token::new("grew")],
            vec![Token::new("Years"), Token::new("passed")],
            vec![Token::new("Years"), Token::new("passed")],
            vec![Token::new("Years"), Token::new("passed")],
            vec![Token::new("It"), Token::new("thrived")],
        ];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["IBM"]),
            Mention::new(MentionId(1), MentionKind::Pronominal, 4, 0, 1, ["It"]),
        ];
        let doc = Document::new(sentences, mentions).unwrap();
        let partition = Partition::seed(&doc);

        let bounded = RuleSieve::pronoun(Dictionaries::builtin(), None);
        assert_eq!(bounded.propose(&doc, &partition, MentionId(1)).unwrap(), None);

        let unbounded =
            RuleSieve::pronoun(Dictionaries::builtin(), Some(SearchWindow::unbounded()));
        assert_eq!(
            unbounded.propose(&doc, &partition, MentionId(1)).unwrap(),
            Some(ClusterId(0))
        );
    }

    #[test]
    fn test_reflexive_binds_within_sentence_only() {
        // "John admired himself . himself left ."
        let sentences = vec![
            vec![
                Token::new("John"),
                Token::new("admired"),
                Token::new("himself"),
                Token::new("."),
            ],
            vec![Token::new("himself"), Token::new("left"), Token::new(".")],
        ];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["John"]),
            Mention::new(MentionId(1), MentionKind::Pronominal, 0, 2, 3, ["himself"]),
            Mention::new(MentionId(2), MentionKind::Pronominal, 1, 0, 1, ["himself"]),
        ];
        let doc = Document::new(sentences, mentions).unwrap();
        let partition = Partition::seed(&doc);
        let sieve = RuleSieve::pronoun(Dictionaries::builtin(), None);

        // Same-sentence reflexive binds to "John".
        assert_eq!(
            sieve.propose(&doc, &partition, MentionId(1)).unwrap(),
            Some(ClusterId(0))
        );
        // A reflexive never reaches into an earlier sentence.
        assert_eq!(sieve.propose(&doc, &partition, MentionId(2)).unwrap(), None);
    }

    #[test]
    fn test_unknown_pronoun_without_attributes_is_skipped() {
        use crate::attributes::{Animacy, Gender, Number};
        let sentences = vec![
            vec![Token::new("Kim"), Token::new("spoke")],
            vec![Token::new("zir"), Token::new("nodded")],
        ];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["Kim"]),
            Mention::new(MentionId(1), MentionKind::Pronominal, 1, 0, 1, ["zir"]),
        ];
        let doc = Document::new(sentences.clone(), mentions.clone()).unwrap();
        let partition = Partition::seed(&doc);
        let sieve = RuleSieve::pronoun(Dictionaries::builtin(), None);

        // No dictionary entry, no annotation: the pass does not guess.
        assert_eq!(sieve.propose(&doc, &partition, MentionId(1)).unwrap(), None);

        // Annotated attributes make the mention resolvable again.
        let mut mentions = mentions;
        mentions[1] = mentions[1].clone().with_attributes(
            Gender::Unknown,
            Number::Singular,
            Animacy::Animate,
        );
        let doc = Document::new(sentences, mentions).unwrap();
        let partition = Partition::seed(&doc);
        assert_eq!(
            sieve.propose(&doc, &partition, MentionId(1)).unwrap(),
            Some(ClusterId(0))
        );
    }

    #[test]
    fn test_speaker_links_pronoun_to_speaker_name() {
        // s0: "john abraham bauer spoke"  s1: "I agree" (spoken by him)
        let sentences = vec![
            vec![
                Token::new("john"),
                Token::new("abraham"),
                Token::new("bauer"),
                Token::new("spoke"),
            ],
            vec![
                Token::new("I").with_speaker("john abraham bauer"),
                Token::new("agree").with_speaker("john abraham bauer"),
            ],
        ];
        let mentions = vec![
            Mention::new(
                MentionId(0),
                MentionKind::Proper,
                0,
                0,
                3,
                ["john", "abraham", "bauer"],
            ),
            Mention::new(MentionId(1), MentionKind::Pronominal, 1, 0, 1, ["I"]),
        ];
        let doc = Document::new(sentences, mentions).unwrap();
        let partition = Partition::seed(&doc);

        let sieve = RuleSieve::speaker(Dictionaries::builtin());
        assert_eq!(
            sieve.propose(&doc, &partition, MentionId(1)).unwrap(),
            Some(ClusterId(0))
        );
    }

    #[test]
    fn test_different_speakers_first_person_never_merge() {
        let sentences = vec![
            vec![Token::new("I").with_speaker("alice"), Token::new("agree")],
            vec![Token::new("I").with_speaker("bob"), Token::new("object")],
        ];
        let mentions = vec![
            Mention::new(MentionId(0), MentionKind::Pronominal, 0, 0, 1, ["I"]),
            Mention::new(MentionId(1), MentionKind::Pronominal, 1, 0, 1, ["I"]),
        ];
        let doc = Document::new(sentences, mentions).unwrap();
        let partition = Partition::seed(&doc);

        let speaker = RuleSieve::speaker(Dictionaries::builtin());
        assert_eq!(speaker.propose(&doc, &partition, MentionId(1)).unwrap(), None);
        let pronoun =
            RuleSieve::pronoun(Dictionaries::builtin(), Some(SearchWindow::unbounded()));
        assert_eq!(pronoun.propose(&doc, &partition, MentionId(1)).unwrap(), None);
    }

    #[test]
    fn test_list_constraint_blocks_member_merge() {
        // "John and Mary left . John smiled ."
        let sentences = vec![
            vec![
                Token::new("John"),
                Token::new("and"),
                Token::new("Mary"),
                Token::new("left"),
                Token::new("."),
            ],
            vec![Token::new("John"), Token::new("smiled"), Token::new(".")],
        ];
        let mut list = Mention::new(
            MentionId(1),
            MentionKind::Nominal,
            0,
            0,
            3,
            ["John", "and", "Mary"],
        );
        list.add_list_member(MentionId(0));
        list.add_list_member(MentionId(2));
        let mut john = Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["John"]);
        john.add_belongs_to_list(MentionId(1));
        let mut mary = Mention::new(MentionId(2), MentionKind::Proper, 0, 2, 3, ["Mary"]);
        mary.add_belongs_to_list(MentionId(1));
        let john2 = Mention::new(MentionId(3), MentionKind::Proper, 1, 0, 1, ["John"]);

        let doc = Document::new(sentences, vec![john, list, mary, john2]).unwrap();
        let partition = Partition::seed(&doc);
        let sieve = RuleSieve::exact_match();

        // The list itself never merges with its member, but a later "John"
        // still reaches the member's cluster.
        assert_eq!(
            sieve.propose(&doc, &partition, MentionId(3)).unwrap(),
            Some(ClusterId(0))
        );
    }
}
