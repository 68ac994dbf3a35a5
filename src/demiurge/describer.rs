//! 📜 Trait describer - qualitative statements from score thresholds
//!
//! Above `HIGH_THRESHOLD` yields the high descriptor, below
//! `LOW_THRESHOLD` the low one. Scores in between stay silent.

use serde::Serialize;
use std::fmt;

use super::traits::{Trait, TraitScores};

pub const HIGH_THRESHOLD: f32 = 70.0;
pub const LOW_THRESHOLD: f32 = 30.0;

pub const SUMMARY: &str = "These traits can help you identify areas for growth and improvement.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pole {
    High,
    Low,
}

/// One row of the descriptor table
struct Descriptor {
    trait_: Trait,
    high: (&'static str, &'static str),
    low: (&'static str, &'static str),
}

const DESCRIPTORS: [Descriptor; 5] = [
    Descriptor {
        trait_: Trait::Extraversion,
        high: (
            "Extraverted",
            "You enjoy socializing and feel energized by interacting with people.",
        ),
        low: (
            "Introverted",
            "You prefer solitary activities and value introspection.",
        ),
    },
    Descriptor {
        trait_: Trait::Agreeableness,
        high: (
            "Empathetic",
            "You are highly compassionate and enjoy helping others.",
        ),
        low: (
            "Critical Thinker",
            "You value rationality and may come across as straightforward.",
        ),
    },
    Descriptor {
        trait_: Trait::Conscientiousness,
        high: (
            "Highly Organized",
            "You are disciplined and reliable, often planning ahead.",
        ),
        low: (
            "Spontaneous",
            "You prefer flexibility over structure in your life.",
        ),
    },
    Descriptor {
        trait_: Trait::Neuroticism,
        high: (
            "Emotionally Sensitive",
            "You experience emotions intensely and may need mindfulness practices.",
        ),
        low: (
            "Emotionally Resilient",
            "You maintain calm and confidence even under pressure.",
        ),
    },
    Descriptor {
        trait_: Trait::Openness,
        high: (
            "Highly Creative",
            "You enjoy exploring new ideas and experiences.",
        ),
        low: (
            "Practical and Grounded",
            "You prefer tried-and-tested methods.",
        ),
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    #[serde(rename = "trait")]
    pub trait_: Trait,
    pub pole: Pole,
    pub label: &'static str,
    pub detail: &'static str,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.detail)
    }
}

/// Statements in trait display order; total over valid scores
pub fn describe(scores: &TraitScores) -> Vec<Statement> {
    DESCRIPTORS
        .iter()
        .filter_map(|row| {
            let score = scores.get(row.trait_);
            let (pole, (label, detail)) = if score > HIGH_THRESHOLD {
                (Pole::High, row.high)
            } else if score < LOW_THRESHOLD {
                (Pole::Low, row.low)
            } else {
                return None;
            };
            Some(Statement {
                trait_: row.trait_,
                pole,
                label,
                detail,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [f32; 5]) -> TraitScores {
        TraitScores::new(values).unwrap()
    }

    #[test]
    fn test_table_covers_traits_in_order() {
        let order: Vec<_> = DESCRIPTORS.iter().map(|d| d.trait_).collect();
        assert_eq!(order, Trait::ALL.to_vec());
    }

    #[test]
    fn test_mixed_profile() {
        let statements = describe(&scores([85.0, 20.0, 50.0, 15.0, 90.0]));
        let labels: Vec<_> = statements.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                "Extraverted",
                "Critical Thinker",
                "Emotionally Resilient",
                "Highly Creative"
            ]
        );
        assert!(statements.iter().all(|s| s.trait_ != Trait::Conscientiousness));
    }

    #[test]
    fn test_threshold_edges_are_silent() {
        assert!(describe(&scores([30.0, 70.0, 30.0, 70.0, 50.0])).is_empty());

        let statements = describe(&scores([70.01, 29.99, 100.0, 0.0, 71.0]));
        let poles: Vec<_> = statements.iter().map(|s| s.pole).collect();
        assert_eq!(
            poles,
            vec![Pole::High, Pole::Low, Pole::High, Pole::Low, Pole::High]
        );
    }

    #[test]
    fn test_each_trait_gets_exactly_its_descriptor() {
        for (i, t) in Trait::ALL.iter().enumerate() {
            let mut high = [50.0; 5];
            high[i] = 71.0;
            let out = describe(&scores(high));
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].trait_, *t);
            assert_eq!(out[0].pole, Pole::High);

            let mut low = [50.0; 5];
            low[i] = 29.0;
            let out = describe(&scores(low));
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].pole, Pole::Low);
        }
    }

    #[test]
    fn test_describe_is_idempotent() {
        let s = scores([12.5, 99.0, 64.0, 71.0, 3.0]);
        assert_eq!(describe(&s), describe(&s));
    }

    #[test]
    fn test_statement_display() {
        let out = describe(&scores([50.0, 50.0, 50.0, 50.0, 10.0]));
        assert_eq!(
            out[0].to_string(),
            "Practical and Grounded: You prefer tried-and-tested methods."
        );
    }
}
