//! Linguistic agreement attributes (gender, number, animacy).
//!
//! Every attribute resolves to `Unknown` when upstream annotation gives no
//! evidence. `Unknown` is the identity of [`combine`](Gender::combine): a
//! known value propagates through it, and two conflicting known values
//! collapse back to `Unknown` (the intersection is empty). Agreement is the
//! weaker relation: two values disagree only when both are known and differ.

use serde::{Deserialize, Serialize};

macro_rules! agreement_attribute {
    ($(#[$doc:meta])* $name:ident { $($(#[$vdoc:meta])* $variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
        pub enum $name {
            $($(#[$vdoc])* $variant,)+
            /// No evidence either way.
            #[default]
            Unknown,
        }

        impl $name {
            /// Combine two resolved values. `Unknown` is the identity;
            /// conflicting known values intersect to `Unknown`.
            #[must_use]
            pub fn combine(self, other: Self) -> Self {
                match (self, other) {
                    ($name::Unknown, x) | (x, $name::Unknown) => x,
                    (a, b) if a == b => a,
                    _ => $name::Unknown,
                }
            }

            /// Two values agree unless both are known and different.
            #[must_use]
            pub fn agrees_with(self, other: Self) -> bool {
                matches!(
                    (self, other),
                    ($name::Unknown, _) | (_, $name::Unknown)
                ) || self == other
            }

            /// Human-readable label.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unknown => "unknown",
                }
            }
        }
    };
}

agreement_attribute! {
    /// Grammatical gender of a mention or cluster.
    Gender {
        /// Masculine ("he", "Mr. Kaplan")
        Male => "male",
        /// Feminine ("she")
        Female => "female",
        /// Neutral ("it", "the committee")
        Neutral => "neutral",
    }
}

agreement_attribute! {
    /// Grammatical number of a mention or cluster.
    Number {
        /// Singular ("the company")
        Singular => "singular",
        /// Plural ("the companies", "they")
        Plural => "plural",
    }
}

agreement_attribute! {
    /// Animacy of a mention or cluster.
    Animacy {
        /// Animate (people, animals)
        Animate => "animate",
        /// Inanimate (organizations-as-things, objects, places)
        Inanimate => "inanimate",
    }
}

/// The aggregated attribute triple carried by a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Attributes {
    /// Aggregated gender.
    pub gender: Gender,
    /// Aggregated number.
    pub number: Number,
    /// Aggregated animacy.
    pub animacy: Animacy,
}

impl Attributes {
    /// Build the triple from per-mention values.
    #[must_use]
    pub fn new(gender: Gender, number: Number, animacy: Animacy) -> Self {
        Self {
            gender,
            number,
            animacy,
        }
    }

    /// Componentwise [`combine`](Gender::combine).
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            gender: self.gender.combine(other.gender),
            number: self.number.combine(other.number),
            animacy: self.animacy.combine(other.animacy),
        }
    }

    /// Componentwise agreement; unresolved components never block a match.
    #[must_use]
    pub fn agrees_with(self, other: Self) -> bool {
        self.gender.agrees_with(other.gender)
            && self.number.agrees_with(other.number)
            && self.animacy.agrees_with(other.animacy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_is_combine_identity() {
        assert_eq!(Gender::Male.combine(Gender::Unknown), Gender::Male);
        assert_eq!(Gender::Unknown.combine(Gender::Female), Gender::Female);
        assert_eq!(Number::Unknown.combine(Number::Unknown), Number::Unknown);
    }

    #[test]
    fn test_conflict_collapses_to_unknown() {
        assert_eq!(Gender::Male.combine(Gender::Female), Gender::Unknown);
        assert_eq!(Number::Singular.combine(Number::Plural), Number::Unknown);
        assert_eq!(
            Animacy::Animate.combine(Animacy::Inanimate),
            Animacy::Unknown
        );
    }

    #[test]
    fn test_agreement_is_permissive_on_unknown() {
        assert!(Gender::Male.agrees_with(Gender::Unknown));
        assert!(Gender::Unknown.agrees_with(Gender::Female));
        assert!(!Gender::Male.agrees_with(Gender::Female));
    }

    #[test]
    fn test_triple_agreement() {
        let a = Attributes::new(Gender::Male, Number::Singular, Animacy::Animate);
        let b = Attributes::new(Gender::Unknown, Number::Singular, Animacy::Unknown);
        let c = Attributes::new(Gender::Female, Number::Singular, Animacy::Animate);

        assert!(a.agrees_with(b));
        assert!(b.agrees_with(c));
        assert!(!a.agrees_with(c));
    }

    #[test]
    fn test_combine_is_commutative() {
        for g in [Gender::Male, Gender::Female, Gender::Neutral, Gender::Unknown] {
            for h in [Gender::Male, Gender::Female, Gender::Neutral, Gender::Unknown] {
                assert_eq!(g.combine(h), h.combine(g));
            }
        }
    }
}
