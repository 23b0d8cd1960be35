//! Speaker identities for quoted and conversational text.
//!
//! Speaker attribution links a mention (typically first or second person) to
//! the identity of the utterance's speaker. The registry is built once from
//! token metadata during document assembly and consulted read-only by the
//! speaker-aware rules; its lifecycle is independent of the cluster
//! partition.

use crate::mention::MentionId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// =============================================================================
// SpeakerInfo
// =============================================================================

/// One speaker identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerInfo {
    name: String,
    /// Whitespace-delimited components of the name, pre-split for the
    /// speaker-matching rule.
    name_parts: Vec<String>,
    real_name: bool,
    mentions: HashSet<MentionId>,
}

impl SpeakerInfo {
    /// Create a speaker from its annotated name.
    ///
    /// Autogenerated placeholder ids (`PER0`, `PER12`, bare mention numbers)
    /// are recorded but flagged as not being real identities.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name_parts = name.split_whitespace().map(str::to_string).collect();
        let real_name = !is_placeholder_name(&name);
        Self {
            name,
            name_parts,
            real_name,
            mentions: HashSet::new(),
        }
    }

    /// The full speaker name as annotated.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whitespace-delimited components of the name.
    #[must_use]
    pub fn name_parts(&self) -> &[String] {
        &self.name_parts
    }

    /// Whether the name is a real identity rather than a placeholder.
    #[must_use]
    pub fn has_real_name(&self) -> bool {
        self.real_name
    }

    /// Record that `mention` was uttered by this speaker.
    pub fn add_mention(&mut self, mention: MentionId) {
        self.mentions.insert(mention);
    }

    /// Was `mention` uttered by this speaker?
    #[must_use]
    pub fn contains_mention(&self, mention: MentionId) -> bool {
        self.mentions.contains(&mention)
    }

    /// Number of mentions attributed to this speaker.
    #[must_use]
    pub fn mention_count(&self) -> usize {
        self.mentions.len()
    }
}

fn is_placeholder_name(name: &str) -> bool {
    if name.is_empty() {
        return true;
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    name.strip_prefix("PER")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

// =============================================================================
// SpeakerRegistry
// =============================================================================

/// All speakers of one document, keyed by annotated name.
///
/// A `BTreeMap` keeps iteration deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerRegistry {
    by_name: BTreeMap<String, SpeakerInfo>,
}

impl SpeakerRegistry {
    /// Look up a speaker by annotated name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SpeakerInfo> {
        self.by_name.get(name)
    }

    /// Look up or create a speaker.
    pub fn get_or_insert(&mut self, name: &str) -> &mut SpeakerInfo {
        self.by_name
            .entry(name.to_string())
            .or_insert_with(|| SpeakerInfo::new(name))
    }

    /// Number of distinct speakers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True when no speaker metadata was present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterate speakers in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SpeakerInfo> {
        self.by_name.values()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_parts_presplit() {
        let info = SpeakerInfo::new("john abraham bauer");
        assert_eq!(info.name_parts(), ["john", "abraham", "bauer"]);
        assert!(info.has_real_name());
    }

    #[test]
    fn test_placeholder_names() {
        assert!(!SpeakerInfo::new("PER3").has_real_name());
        assert!(!SpeakerInfo::new("42").has_real_name());
        assert!(!SpeakerInfo::new("").has_real_name());
        assert!(SpeakerInfo::new("PERCY").has_real_name());
        assert!(SpeakerInfo::new("Queen Elizabeth II").has_real_name());
    }

    #[test]
    fn test_mention_attribution() {
        let mut info = SpeakerInfo::new("narrator");
        assert!(!info.contains_mention(MentionId(1)));
        info.add_mention(MentionId(1));
        assert!(info.contains_mention(MentionId(1)));
        assert_eq!(info.mention_count(), 1);
    }

    #[test]
    fn test_registry_get_or_insert() {
        let mut registry = SpeakerRegistry::default();
        registry.get_or_insert("alice").add_mention(MentionId(0));
        registry.get_or_insert("alice").add_mention(MentionId(2));
        registry.get_or_insert("bob");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("alice").unwrap().mention_count(), 2);
        assert!(registry.get("carol").is_none());
    }
}
