//! Stateless predicate library over mentions and clusters.
//!
//! Every function here is total and pure: unresolved attributes and missing
//! annotations are treated as non-matching, never as errors, so the sieve
//! passes built on top stay referentially transparent.

use crate::cluster::CorefCluster;
use crate::document::Document;
use crate::mention::Mention;
use crate::speaker::SpeakerInfo;

// =============================================================================
// Acronym matching
// =============================================================================

/// Symmetric acronym test over two token sequences.
///
/// Holds iff either side is a single token whose letters are spelled, in
/// token order and case-insensitively, by the initials of the other side's
/// full token sequence. A multi-token side that already contains the
/// acronym as one of its tokens does not count ("IBM" vs "IBM Corp." is
/// name overlap, not an acronym).
///
/// # Example
///
/// ```rust
/// use corefer::rules::is_acronym;
///
/// let long = ["International", "Business", "Machines"];
/// assert!(is_acronym(&["IBM"], &long));
/// assert!(is_acronym(&long, &["IBM"]));
/// assert!(!is_acronym(&["IBM"], &["IBMM"]));
/// ```
#[must_use]
pub fn is_acronym<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> bool {
    fn spelled_by<S: AsRef<str>, T: AsRef<str>>(short: &[S], long: &[T]) -> bool {
        if short.len() != 1 || long.len() < 2 {
            return false;
        }
        let acronym = short[0].as_ref();
        if acronym.is_empty() || !acronym.chars().all(char::is_alphabetic) {
            return false;
        }
        let initials_match = acronym.chars().count() == long.len()
            && acronym.chars().zip(long.iter()).all(|(c, word)| {
                word.as_ref()
                    .chars()
                    .next()
                    .is_some_and(|w| w.eq_ignore_ascii_case(&c))
            });
        if !initials_match {
            return false;
        }
        // Reject expansions that already carry the acronym verbatim.
        !long
            .iter()
            .any(|word| word.as_ref().eq_ignore_ascii_case(acronym))
    }

    spelled_by(a, b) || spelled_by(b, a)
}

/// Cluster-level acronym test: some non-pronominal mention of one cluster
/// is an acronym of some mention of the other.
#[must_use]
pub fn clusters_are_acronym(doc: &Document, a: &CorefCluster, b: &CorefCluster) -> bool {
    a.members()
        .map(|id| doc.mention(id))
        .filter(|m| !m.is_pronominal())
        .any(|m| {
            b.members()
                .map(|id| doc.mention(id))
                .filter(|ant| !ant.is_pronominal())
                .any(|ant| is_acronym(&m.tokens, &ant.tokens))
        })
}

// =============================================================================
// Speaker matching
// =============================================================================

/// Does `candidate`'s head string name the given speaker?
///
/// True when the head equals the speaker's full name or any single
/// whitespace-delimited component of it, case-insensitively. Placeholder
/// speaker ids (`PER3`, bare numbers) are not names and never match by
/// string. Deliberately asymmetric: the candidate is tested against the
/// speaker identity, not the other way around.
#[must_use]
pub fn mention_matches_speaker(candidate: &Mention, speaker: &SpeakerInfo) -> bool {
    if speaker.contains_mention(candidate.id) {
        return true;
    }
    if !speaker.has_real_name() {
        return false;
    }
    let head = &candidate.head_word;
    if head.eq_ignore_ascii_case(speaker.name()) {
        return true;
    }
    speaker
        .name_parts()
        .iter()
        .any(|part| head.eq_ignore_ascii_case(part))
}

/// Does `antecedent` name the speaker who uttered `mention`?
///
/// Resolves `mention`'s speaker annotation through the document registry
/// when possible, and falls back to splitting the raw annotation string.
/// Total: a mention with no speaker annotation simply never matches.
#[must_use]
pub fn antecedent_matches_mention_speaker(
    doc: &Document,
    mention: &Mention,
    antecedent: &Mention,
) -> bool {
    let Some(speaker_name) = &mention.speaker else {
        return false;
    };
    if let Some(info) = doc.speakers().get(speaker_name) {
        return mention_matches_speaker(antecedent, info);
    }
    speaker_name
        .split_whitespace()
        .any(|part| antecedent.head_word.eq_ignore_ascii_case(part))
        || antecedent.head_word.eq_ignore_ascii_case(speaker_name)
}

/// Were the two mentions uttered by the same annotated speaker?
#[must_use]
pub fn same_speaker(a: &Mention, b: &Mention) -> bool {
    match (&a.speaker, &b.speaker) {
        (Some(sa), Some(sb)) => sa.eq_ignore_ascii_case(sb),
        _ => false,
    }
}

// =============================================================================
// String and head matching
// =============================================================================

/// Some non-pronominal mention pair across the two clusters has an
/// identical surface string (case-insensitive).
#[must_use]
pub fn clusters_exact_string_match(doc: &Document, a: &CorefCluster, b: &CorefCluster) -> bool {
    non_pronominal_pair(doc, a, b, |m, ant| m.surface_lower() == ant.surface_lower())
}

/// Some non-pronominal mention pair matches once both spans are truncated
/// after their head words ("the Bush administration of 2004" vs
/// "the Bush administration").
#[must_use]
pub fn clusters_relaxed_string_match(doc: &Document, a: &CorefCluster, b: &CorefCluster) -> bool {
    non_pronominal_pair(doc, a, b, |m, ant| {
        m.surface_to_head_lower() == ant.surface_to_head_lower()
    })
}

/// Some non-pronominal mention pair shares a head word or head lemma
/// (case-insensitive).
#[must_use]
pub fn clusters_heads_match(doc: &Document, a: &CorefCluster, b: &CorefCluster) -> bool {
    non_pronominal_pair(doc, a, b, |m, ant| {
        m.head_word.eq_ignore_ascii_case(&ant.head_word)
            || m.head_lemma.eq_ignore_ascii_case(&ant.head_lemma)
    })
}

fn non_pronominal_pair(
    doc: &Document,
    a: &CorefCluster,
    b: &CorefCluster,
    pred: impl Fn(&Mention, &Mention) -> bool,
) -> bool {
    a.members()
        .map(|id| doc.mention(id))
        .filter(|m| !m.is_pronominal())
        .any(|m| {
            b.members()
                .map(|id| doc.mention(id))
                .filter(|ant| !ant.is_pronominal())
                .any(|ant| pred(m, ant))
        })
}

// =============================================================================
// Structural blocks
// =============================================================================

/// I-within-i: one span nests inside the other within the same sentence.
/// Nested mentions ("the president of [France]") must not corefer.
#[must_use]
pub fn i_within_i(a: &Mention, b: &Mention) -> bool {
    a.contains_span_of(b) || b.contains_span_of(a)
}

/// Coordination constraint: a list and one of its members, or two members
/// of the same list, never denote the same entity ("John" vs "John and
/// Mary"; "John" vs "Mary").
#[must_use]
pub fn list_constraint_violated(a: &Mention, b: &Mention) -> bool {
    a.is_list_member_of(b) || b.is_list_member_of(a) || (a.id != b.id && a.is_member_of_same_list(b))
}

/// Aggregated cluster attributes are compatible (no component both known
/// and different).
#[must_use]
pub fn clusters_agree(a: &CorefCluster, b: &CorefCluster) -> bool {
    a.attributes.agrees_with(b.attributes)
}

// =============================================================================
// Tests
// =============================================================================
