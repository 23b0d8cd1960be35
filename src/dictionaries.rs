//! Read-only lexical lookup tables.
//!
//! Pronoun classes, demonyms, and animacy word lists consulted by the rule
//! predicates. The tables are process-wide shared state: built-in English
//! defaults live behind a `once_cell` static and are handed out as an
//! `Arc`, so concurrent documents share one immutable copy. Callers with
//! their own lexica load a JSON overlay with [`Dictionaries::from_path`];
//! a missing or unreadable file is fatal at startup, never per document.

use crate::attributes::{Animacy, Attributes, Gender, Number};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

// =============================================================================
// Built-in tables
// =============================================================================

const MASCULINE: &[&str] = &["he", "him", "his", "himself"];
const FEMININE: &[&str] = &["she", "her", "hers", "herself"];
const NEUTRAL: &[&str] = &[
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "themself", "this",
    "that", "these", "those", "which", "what",
];
const SINGULAR: &[&str] = &[
    "i", "me", "my", "mine", "myself", "he", "him", "his", "himself", "she", "her", "hers",
    "herself", "it", "its", "itself", "this", "that", "one", "oneself",
];
const PLURAL: &[&str] = &[
    "we", "us", "our", "ours", "ourselves", "they", "them", "their", "theirs", "themselves",
    "these", "those",
];
const ANIMATE: &[&str] = &[
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers",
    "herself", "who", "whom", "whose",
];
const INANIMATE: &[&str] = &["it", "its", "itself", "this", "that", "which", "what", "where", "when"];
const FIRST_PERSON: &[&str] = &["i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves"];
const SECOND_PERSON: &[&str] = &["you", "your", "yours", "yourself", "yourselves"];
const REFLEXIVE: &[&str] = &[
    "myself", "yourself", "yourselves", "himself", "herself", "itself", "ourselves", "themselves",
    "themself", "oneself",
];
const DEMONYMS: &[(&str, &str)] = &[
    ("american", "united states"),
    ("british", "britain"),
    ("chinese", "china"),
    ("dutch", "netherlands"),
    ("french", "france"),
    ("german", "germany"),
    ("japanese", "japan"),
    ("russian", "russia"),
    ("spanish", "spain"),
    ("swiss", "switzerland"),
];

static BUILTIN: Lazy<Arc<Dictionaries>> = Lazy::new(|| Arc::new(Dictionaries::english()));

// =============================================================================
// Dictionaries
// =============================================================================

/// Immutable lexical tables shared across documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionaries {
    masculine: HashSet<String>,
    feminine: HashSet<String>,
    neutral: HashSet<String>,
    singular: HashSet<String>,
    plural: HashSet<String>,
    animate: HashSet<String>,
    inanimate: HashSet<String>,
    first_person: HashSet<String>,
    second_person: HashSet<String>,
    reflexive: HashSet<String>,
    /// Demonym → place name, both lowercased.
    demonyms: HashMap<String, String>,
}

/// On-disk overlay format: every field optional, absent fields keep the
/// built-in English defaults.
#[derive(Debug, Default, Deserialize)]
struct DictionaryFile {
    #[serde(default)]
    masculine: Vec<String>,
    #[serde(default)]
    feminine: Vec<String>,
    #[serde(default)]
    neutral: Vec<String>,
    #[serde(default)]
    singular: Vec<String>,
    #[serde(default)]
    plural: Vec<String>,
    #[serde(default)]
    animate: Vec<String>,
    #[serde(default)]
    inanimate: Vec<String>,
    #[serde(default)]
    first_person: Vec<String>,
    #[serde(default)]
    second_person: Vec<String>,
    #[serde(default)]
    reflexive: Vec<String>,
    #[serde(default)]
    demonyms: HashMap<String, String>,
}

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

impl Dictionaries {
    /// Built-in English tables, shared process-wide.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Construct the built-in English tables directly.
    #[must_use]
    pub fn english() -> Self {
        Self {
            masculine: word_set(MASCULINE),
            feminine: word_set(FEMININE),
            neutral: word_set(NEUTRAL),
            singular: word_set(SINGULAR),
            plural: word_set(PLURAL),
            animate: word_set(ANIMATE),
            inanimate: word_set(INANIMATE),
            first_person: word_set(FIRST_PERSON),
            second_person: word_set(SECOND_PERSON),
            reflexive: word_set(REFLEXIVE),
            demonyms: DEMONYMS
                .iter()
                .map(|(d, p)| ((*d).to_string(), (*p).to_string()))
                .collect(),
        }
    }

    /// Load a JSON overlay on top of the built-in tables.
    ///
    /// # Errors
    ///
    /// [`Error::Resource`] when the file is missing or does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::resource(format!("dictionary file {}: {e}", path.display()))
        })?;
        let file: DictionaryFile = serde_json::from_str(&raw).map_err(|e| {
            Error::resource(format!("dictionary file {}: {e}", path.display()))
        })?;

        let mut dict = Self::english();
        fn extend(set: &mut HashSet<String>, words: Vec<String>) {
            set.extend(words.into_iter().map(|w| w.to_lowercase()));
        }
        extend(&mut dict.masculine, file.masculine);
        extend(&mut dict.feminine, file.feminine);
        extend(&mut dict.neutral, file.neutral);
        extend(&mut dict.singular, file.singular);
        extend(&mut dict.plural, file.plural);
        extend(&mut dict.animate, file.animate);
        extend(&mut dict.inanimate, file.inanimate);
        extend(&mut dict.first_person, file.first_person);
        extend(&mut dict.second_person, file.second_person);
        extend(&mut dict.reflexive, file.reflexive);
        dict.demonyms.extend(
            file.demonyms
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_lowercase())),
        );
        Ok(dict)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Is `word` a pronoun in any class?
    #[must_use]
    pub fn is_pronoun(&self, word: &str) -> bool {
        let w = word.to_lowercase();
        self.masculine.contains(&w)
            || self.feminine.contains(&w)
            || self.neutral.contains(&w)
            || self.first_person.contains(&w)
            || self.second_person.contains(&w)
            || self.singular.contains(&w)
            || self.plural.contains(&w)
    }

    /// Gender signalled by a pronoun. Names get `Unknown`: gender is never
    /// inferred from name strings.
    #[must_use]
    pub fn pronoun_gender(&self, word: &str) -> Gender {
        let w = word.to_lowercase();
        if self.masculine.contains(&w) {
            Gender::Male
        } else if self.feminine.contains(&w) {
            Gender::Female
        } else if self.neutral.contains(&w) {
            Gender::Neutral
        } else {
            Gender::Unknown
        }
    }

    /// Number signalled by a pronoun.
    #[must_use]
    pub fn pronoun_number(&self, word: &str) -> Number {
        let w = word.to_lowercase();
        // "they" is deliberately ambiguous: singular they is common usage.
        if self.plural.contains(&w) && !self.singular.contains(&w) {
            if w == "they" || w == "them" || w == "their" || w == "theirs" {
                Number::Unknown
            } else {
                Number::Plural
            }
        } else if self.singular.contains(&w) {
            Number::Singular
        } else {
            Number::Unknown
        }
    }

    /// Animacy signalled by a pronoun.
    #[must_use]
    pub fn pronoun_animacy(&self, word: &str) -> Animacy {
        let w = word.to_lowercase();
        if self.animate.contains(&w) {
            Animacy::Animate
        } else if self.inanimate.contains(&w) {
            Animacy::Inanimate
        } else {
            Animacy::Unknown
        }
    }

    /// All three agreement attributes signalled by a pronoun.
    #[must_use]
    pub fn pronoun_attributes(&self, word: &str) -> Attributes {
        Attributes::new(
            self.pronoun_gender(word),
            self.pronoun_number(word),
            self.pronoun_animacy(word),
        )
    }

    /// Is `word` a first-person pronoun?
    #[must_use]
    pub fn is_first_person(&self, word: &str) -> bool {
        self.first_person.contains(&word.to_lowercase())
    }

    /// Is `word` a second-person pronoun?
    #[must_use]
    pub fn is_second_person(&self, word: &str) -> bool {
        self.second_person.contains(&word.to_lowercase())
    }

    /// Is `word` a reflexive pronoun?
    #[must_use]
    pub fn is_reflexive(&self, word: &str) -> bool {
        self.reflexive.contains(&word.to_lowercase())
    }

    /// Place named by a demonym, if known ("German" → "germany").
    #[must_use]
    pub fn demonym_place(&self, word: &str) -> Option<&str> {
        self.demonyms.get(&word.to_lowercase()).map(String::as_str)
    }

    /// Do the two strings form a demonym/place pair in either direction?
    #[must_use]
    pub fn is_demonym_pair(&self, a: &str, b: &str) -> bool {
        let (a, b) = (a.to_lowercase(), b.to_lowercase());
        self.demonym_place(&a).is_some_and(|p| p == b)
            || self.demonym_place(&b).is_some_and(|p| p == a)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pronoun_classes() {
        let d = Dictionaries::english();
        assert_eq!(d.pronoun_gender("He"), Gender::Male);
        assert_eq!(d.pronoun_gender("her"), Gender::Female);
        assert_eq!(d.pronoun_gender("it"), Gender::Neutral);
        assert_eq!(d.pronoun_gender("Kaplan"), Gender::Unknown);

        assert_eq!(d.pronoun_number("it"), Number::Singular);
        assert_eq!(d.pronoun_number("we"), Number::Plural);
        assert_eq!(d.pronoun_animacy("she"), Animacy::Animate);
        assert_eq!(d.pronoun_animacy("it"), Animacy::Inanimate);
    }

    #[test]
    fn test_singular_they_is_number_ambiguous() {
        let d = Dictionaries::english();
        assert_eq!(d.pronoun_number("they"), Number::Unknown);
        assert_eq!(d.pronoun_number("these"), Number::Plural);
    }

    #[test]
    fn test_person_and_reflexive() {
        let d = Dictionaries::english();
        assert!(d.is_first_person("I"));
        assert!(d.is_second_person("you"));
        assert!(!d.is_first_person("you"));
        assert!(d.is_reflexive("himself"));
        assert!(!d.is_reflexive("him"));
    }

    #[test]
    fn test_demonyms_bidirectional() {
        let d = Dictionaries::english();
        assert!(d.is_demonym_pair("German", "Germany"));
        assert!(d.is_demonym_pair("germany", "german"));
        assert!(!d.is_demonym_pair("German", "France"));
        assert_eq!(d.demonym_place("Japanese"), Some("japan"));
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = Dictionaries::builtin();
        let b = Dictionaries::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_from_path_missing_is_resource_error() {
        let err = Dictionaries::from_path("/nonexistent/dictionaries.json").unwrap_err();
        assert!(matches!(err, crate::Error::Resource(_)));
    }
}
