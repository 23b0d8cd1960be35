//! Mentions: the atomic spans the resolver clusters.
//!
//! # Terminology
//!
//! - **Mention**: a token span hypothesized to refer to an entity
//!   (e.g., "John", "he", "the CEO")
//! - **Antecedent**: an earlier mention a later one is resolved against
//! - **List mention**: a coordination ("John and Mary") whose components are
//!   registered as list members
//!
//! # Example
//!
//! ```rust
//! use corefer::{Mention, MentionId, MentionKind};
//!
//! // "IBM announced ..." — a proper mention covering sentence 0, tokens 0..1
//! let m = Mention::new(MentionId(0), MentionKind::Proper, 0, 0, 1, ["IBM"])
//!     .with_head("IBM", "IBM", "NNP");
//! assert_eq!(m.surface(), "IBM");
//! assert!(!m.is_pronominal());
//! ```

use crate::attributes::{Animacy, Attributes, Gender, Number};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// MentionId
// =============================================================================

/// Stable handle of a mention within one document.
///
/// Mentions are stored in document order; the id is the index into
/// [`Document::mentions`](crate::Document::mentions), so ids also encode
/// document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MentionId(pub usize);

impl std::fmt::Display for MentionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{}", self.0)
    }
}

// =============================================================================
// MentionKind
// =============================================================================

/// Syntactic type of referring expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MentionKind {
    /// Pronoun ("he", "it", "they")
    Pronominal,
    /// Common noun phrase ("the company", "a dog")
    Nominal,
    /// Proper name ("John Smith", "IBM")
    Proper,
}

impl MentionKind {
    /// Human-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MentionKind::Pronominal => "pronominal",
            MentionKind::Nominal => "nominal",
            MentionKind::Proper => "proper",
        }
    }
}

// =============================================================================
// Mention
// =============================================================================

/// A single mention extracted by the upstream mention detector.
///
/// Spans are half-open token ranges within one sentence. The surface tokens
/// are copied in at construction so the predicate library can stay a set of
/// pure functions over mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Handle of this mention (index in document order).
    pub id: MentionId,
    /// Sentence index within the document.
    pub sentence: usize,
    /// First token of the span (inclusive).
    pub start: usize,
    /// One past the last token of the span (exclusive).
    pub end: usize,
    /// Syntactic type.
    pub kind: MentionKind,
    /// The tokens covered by the span.
    pub tokens: Vec<String>,
    /// Head word surface form.
    pub head_word: String,
    /// Head word lemma.
    pub head_lemma: String,
    /// Head word POS tag.
    pub head_tag: String,
    /// Position of the head token within the sentence.
    pub head_index: usize,
    /// Gender, `Unknown` when unannotated.
    pub gender: Gender,
    /// Number, `Unknown` when unannotated.
    pub number: Number,
    /// Animacy, `Unknown` when unannotated.
    pub animacy: Animacy,
    /// NER tag from the upstream annotator, if any.
    pub ner: Option<String>,
    /// Speaker of the utterance containing this mention, if any.
    pub speaker: Option<String>,
    /// Gold cluster id, carried for downstream scorers only. The engine
    /// never reads it.
    pub gold_cluster: Option<u64>,
    /// Mentions nested inside this mention when it denotes a coordination.
    pub list_members: HashSet<MentionId>,
    /// Lists this mention is a syntactic member of. A set: a mention may
    /// nest inside more than one enclosing list in degenerate parses.
    pub belongs_to_list: HashSet<MentionId>,
}

impl Mention {
    /// Create a new mention covering `start..end` of `sentence`.
    #[must_use]
    pub fn new<T: Into<String>>(
        id: MentionId,
        kind: MentionKind,
        sentence: usize,
        start: usize,
        end: usize,
        tokens: impl IntoIterator<Item = T>,
    ) -> Self {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let head_word = tokens.last().cloned().unwrap_or_default();
        Self {
            id,
            sentence,
            start,
            end,
            kind,
            head_lemma: head_word.clone(),
            head_tag: String::new(),
            // Default head: last token of the span, overridable via with_head.
            head_index: end.saturating_sub(1),
            head_word,
            tokens,
            gender: Gender::Unknown,
            number: Number::Unknown,
            animacy: Animacy::Unknown,
            ner: None,
            speaker: None,
            gold_cluster: None,
            list_members: HashSet::new(),
            belongs_to_list: HashSet::new(),
        }
    }

    /// Set head word, lemma, and tag.
    #[must_use]
    pub fn with_head(
        mut self,
        word: impl Into<String>,
        lemma: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        self.head_word = word.into();
        self.head_lemma = lemma.into();
        self.head_tag = tag.into();
        self
    }

    /// Set the head token's position within the sentence.
    #[must_use]
    pub fn with_head_index(mut self, index: usize) -> Self {
        self.head_index = index;
        self
    }

    /// Set agreement attributes.
    #[must_use]
    pub fn with_attributes(mut self, gender: Gender, number: Number, animacy: Animacy) -> Self {
        self.gender = gender;
        self.number = number;
        self.animacy = animacy;
        self
    }

    /// Set the NER tag.
    #[must_use]
    pub fn with_ner(mut self, ner: impl Into<String>) -> Self {
        self.ner = Some(ner.into());
        self
    }

    /// Set the speaker annotation.
    #[must_use]
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Attach the evaluation-only gold cluster id.
    #[must_use]
    pub fn with_gold_cluster(mut self, id: u64) -> Self {
        self.gold_cluster = Some(id);
        self
    }

    // -------------------------------------------------------------------------
    // List relations
    // -------------------------------------------------------------------------

    /// Register `other` as a member of this mention's coordination.
    ///
    /// The two sides of the list/member relation are maintained independently
    /// by callers; registering a member does not update the member's
    /// [`belongs_to_list`](Self::belongs_to_list) set.
    pub fn add_list_member(&mut self, other: MentionId) {
        self.list_members.insert(other);
    }

    /// Register `other` as a list this mention belongs to.
    pub fn add_belongs_to_list(&mut self, other: MentionId) {
        self.belongs_to_list.insert(other);
    }

    /// Is this mention a registered member of `other`'s coordination?
    ///
    /// Always false when `other` is this mention itself, regardless of any
    /// prior registration: a mention can never be a member of its own list.
    #[must_use]
    pub fn is_list_member_of(&self, other: &Mention) -> bool {
        self.id != other.id && other.list_members.contains(&self.id)
    }

    /// Do this mention and `other` belong to at least one common list?
    ///
    /// No self-exclusion: once a mention belongs to any list, it is
    /// trivially same-list with itself.
    #[must_use]
    pub fn is_member_of_same_list(&self, other: &Mention) -> bool {
        !self.belongs_to_list.is_disjoint(&other.belongs_to_list)
    }

    /// Are the two mentions in the same sentence? Reflexive and symmetric.
    #[must_use]
    pub fn same_sentence(&self, other: &Mention) -> bool {
        self.sentence == other.sentence
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Is this a pronoun mention?
    #[must_use]
    pub fn is_pronominal(&self) -> bool {
        self.kind == MentionKind::Pronominal
    }

    /// Surface string (tokens joined by single spaces).
    #[must_use]
    pub fn surface(&self) -> String {
        self.tokens.join(" ")
    }

    /// Lowercased surface string, for case-insensitive matching.
    #[must_use]
    pub fn surface_lower(&self) -> String {
        self.surface().to_lowercase()
    }

    /// Surface of the span truncated after the head token, lowercased.
    ///
    /// "the Bush administration of 2004" with head "administration" yields
    /// "the bush administration". Used by relaxed string matching.
    #[must_use]
    pub fn surface_to_head_lower(&self) -> String {
        let head_offset = self.head_index.saturating_sub(self.start);
        let upto = (head_offset + 1).min(self.tokens.len());
        self.tokens[..upto].join(" ").to_lowercase()
    }

    /// Number of tokens in the span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True for degenerate zero-width spans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Does this span strictly contain `other`'s span (same sentence)?
    #[must_use]
    pub fn contains_span_of(&self, other: &Mention) -> bool {
        self.sentence == other.sentence
            && self.start <= other.start
            && other.end <= self.end
            && (self.start, self.end) != (other.start, other.end)
    }

    /// Does this mention appear strictly before `other` in document order?
    #[must_use]
    pub fn appears_earlier_than(&self, other: &Mention) -> bool {
        (self.sentence, self.start, self.end) < (other.sentence, other.start, other.end)
    }

    /// Agreement attribute triple.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        Attributes::new(self.gender, self.number, self.animacy)
    }
}

impl std::fmt::Display for Mention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\"{}\" [s{} {}-{})",
            self.surface(),
            self.sentence,
            self.start,
            self.end
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
