//! Document input model: tokens, sentences, and the ordered mention list.
//!
//! Upstream collaborators (segmenter, parser, mention detector, NE tagger)
//! produce this structure; the resolver only reads it. Construction applies
//! the whole-document validation contract: an empty document or a mention
//! span outside document bounds rejects the document, nothing is partially
//! resolved.

use crate::error::{Error, Result};
use crate::mention::{Mention, MentionId};
use crate::speaker::SpeakerRegistry;
use serde::{Deserialize, Serialize};

// =============================================================================
// Token
// =============================================================================

/// One token of a sentence, with upstream annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form.
    pub word: String,
    /// Lemma; defaults to the surface form.
    pub lemma: String,
    /// POS tag, empty when unannotated.
    pub tag: String,
    /// NER tag, if any.
    pub ner: Option<String>,
    /// Speaker of the utterance containing this token, if any.
    pub speaker: Option<String>,
}

impl Token {
    /// Create a token from its surface form.
    #[must_use]
    pub fn new(word: impl Into<String>) -> Self {
        let word = word.into();
        Self {
            lemma: word.clone(),
            word,
            tag: String::new(),
            ner: None,
            speaker: None,
        }
    }

    /// Set the lemma.
    #[must_use]
    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = lemma.into();
        self
    }

    /// Set the POS tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
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
}

// =============================================================================
// Document
// =============================================================================

/// A fully annotated input document.
///
/// Mentions are kept in document order; [`MentionId`] is the index into the
/// mention list, so handle comparisons also compare document positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier, for logs and chain output.
    pub doc_id: Option<String>,
    sentences: Vec<Vec<Token>>,
    mentions: Vec<Mention>,
    speakers: SpeakerRegistry,
}

impl Document {
    /// Assemble and validate a document.
    ///
    /// `mentions` must already be in document order with `id` equal to the
    /// list position; list-relation registrations refer to those ids, so the
    /// constructor verifies rather than renumbers.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDocument`] when the document has no tokens, a mention
    /// span or sentence index is out of bounds, a span is empty, or the
    /// mention list is out of document order.
    pub fn new(sentences: Vec<Vec<Token>>, mentions: Vec<Mention>) -> Result<Self> {
        if sentences.iter().all(|s| s.is_empty()) {
            return Err(Error::invalid_document("document has no tokens"));
        }

        for (idx, m) in mentions.iter().enumerate() {
            if m.id != MentionId(idx) {
                return Err(Error::invalid_document(format!(
                    "mention at position {idx} carries id {}",
                    m.id
                )));
            }
            let sentence = sentences.get(m.sentence).ok_or_else(|| {
                Error::invalid_document(format!(
                    "{}: sentence index {} out of bounds ({} sentences)",
                    m.id,
                    m.sentence,
                    sentences.len()
                ))
            })?;
            if m.start >= m.end || m.end > sentence.len() {
                return Err(Error::invalid_document(format!(
                    "{}: span {}..{} out of bounds for sentence of {} tokens",
                    m.id,
                    m.start,
                    m.end,
                    sentence.len()
                )));
            }
            if m.head_index < m.start || m.head_index >= m.end {
                return Err(Error::invalid_document(format!(
                    "{}: head index {} outside span {}..{}",
                    m.id, m.head_index, m.start, m.end
                )));
            }
            if let Some(prev) = idx.checked_sub(1).map(|i| &mentions[i]) {
                if m.appears_earlier_than(prev) {
                    return Err(Error::invalid_document(format!(
                        "{}: mention list is out of document order",
                        m.id
                    )));
                }
            }
        }

        let mut doc = Self {
            doc_id: None,
            sentences,
            mentions,
            speakers: SpeakerRegistry::default(),
        };
        doc.attach_speakers();
        Ok(doc)
    }

    /// Set the document identifier.
    #[must_use]
    pub fn with_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Fill per-mention speaker annotations from token metadata and build
    /// the speaker registry.
    fn attach_speakers(&mut self) {
        for m in &mut self.mentions {
            if m.speaker.is_none() {
                m.speaker = self.sentences[m.sentence][m.head_index].speaker.clone();
            }
        }
        let mut registry = SpeakerRegistry::default();
        for sentence in &self.sentences {
            for token in sentence {
                if let Some(name) = &token.speaker {
                    registry.get_or_insert(name);
                }
            }
        }
        for m in &self.mentions {
            if let Some(name) = &m.speaker {
                registry.get_or_insert(name).add_mention(m.id);
            }
        }
        self.speakers = registry;
    }

    /// All sentences.
    #[must_use]
    pub fn sentences(&self) -> &[Vec<Token>] {
        &self.sentences
    }

    /// All mentions, in document order.
    #[must_use]
    pub fn mentions(&self) -> &[Mention] {
        &self.mentions
    }

    /// Look up one mention by handle.
    #[must_use]
    pub fn mention(&self, id: MentionId) -> &Mention {
        &self.mentions[id.0]
    }

    /// Mutable mention access, for list-relation registration after assembly.
    pub fn mention_mut(&mut self, id: MentionId) -> &mut Mention {
        &mut self.mentions[id.0]
    }

    /// The speaker registry built from token metadata.
    #[must_use]
    pub fn speakers(&self) -> &SpeakerRegistry {
        &self.speakers
    }

    /// Ids of mentions in `sentence`, in document order.
    pub fn mentions_in_sentence(&self, sentence: usize) -> impl Iterator<Item = MentionId> + '_ {
        self.mentions
            .iter()
            .filter(move |m| m.sentence == sentence)
            .map(|m| m.id)
    }

    /// Number of sentences.
    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mention::MentionKind;

    fn sentence(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| Token::new(*w)).collect()
    }

    fn mention(id: usize, sentence_idx: usize, start: usize, end: usize, words: &[&str]) -> Mention {
        Mention::new(
            MentionId(id),
            MentionKind::Proper,
            sentence_idx,
            start,
            end,
            words.iter().copied(),
        )
    }

    #[test]
    fn test_empty_document_rejected() {
        let err = Document::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));

        let err = Document::new(vec![vec![], vec![]], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn test_out_of_bounds_span_rejects_whole_document() {
        let sentences = vec![sentence(&["IBM", "grew"])];
        let mentions = vec![mention(0, 0, 0, 5, &["IBM"])];
        let err = Document::new(sentences, mentions).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn test_bad_sentence_index_rejected() {
        let sentences = vec![sentence(&["IBM", "grew"])];
        let mentions = vec![mention(0, 3, 0, 1, &["IBM"])];
        assert!(Document::new(sentences, mentions).is_err());
    }

    #[test]
    fn test_misnumbered_mentions_rejected() {
        let sentences = vec![sentence(&["IBM", "grew"])];
        let mentions = vec![mention(7, 0, 0, 1, &["IBM"])];
        assert!(Document::new(sentences, mentions).is_err());
    }

    #[test]
    fn test_out_of_order_mentions_rejected() {
        let sentences = vec![sentence(&["IBM", "beat", "Apple"])];
        let mentions = vec![
            mention(0, 0, 2, 3, &["Apple"]),
            mention(1, 0, 0, 1, &["IBM"]),
        ];
        assert!(Document::new(sentences, mentions).is_err());
    }

    #[test]
    fn test_speaker_propagates_from_head_token() {
        let sentences = vec![vec![
            Token::new("I").with_speaker("john abraham bauer"),
            Token::new("agree").with_speaker("john abraham bauer"),
        ]];
        let mentions = vec![Mention::new(
            MentionId(0),
            MentionKind::Pronominal,
            0,
            0,
            1,
            ["I"],
        )];
        let doc = Document::new(sentences, mentions).unwrap();

        assert_eq!(doc.mention(MentionId(0)).speaker.as_deref(), Some("john abraham bauer"));
        let info = doc.speakers().get("john abraham bauer").unwrap();
        assert!(info.contains_mention(MentionId(0)));
    }

    #[test]
    fn test_mentions_in_sentence() {
        let sentences = vec![sentence(&["IBM", "beat", "Apple"]), sentence(&["It", "won"])];
        let mentions = vec![
            mention(0, 0, 0, 1, &["IBM"]),
            mention(1, 0, 2, 3, &["Apple"]),
            mention(2, 1, 0, 1, &["It"]),
        ];
        let doc = Document::new(sentences, mentions).unwrap();
        let in_first: Vec<_> = doc.mentions_in_sentence(0).collect();
        assert_eq!(in_first, vec![MentionId(0), MentionId(1)]);
    }
}
