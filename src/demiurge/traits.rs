//! Big Five traits and validated score sets

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const SCORE_MIN: f32 = 0.0;
pub const SCORE_MAX: f32 = 100.0;

/// The five traits, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Trait {
    Extraversion,
    Agreeableness,
    Conscientiousness,
    Neuroticism,
    Openness,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Conscientiousness,
        Trait::Neuroticism,
        Trait::Openness,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Trait::Extraversion => "Extraversion",
            Trait::Agreeableness => "Agreeableness",
            Trait::Conscientiousness => "Conscientiousness",
            Trait::Neuroticism => "Neuroticism",
            Trait::Openness => "Openness",
        }
    }

    /// Slider caption, high pole first
    pub fn poles(&self) -> &'static str {
        match self {
            Trait::Extraversion => "Outgoing vs. Reserved",
            Trait::Agreeableness => "Compassionate vs. Critical",
            Trait::Conscientiousness => "Organized vs. Careless",
            Trait::Neuroticism => "Sensitive vs. Confident",
            Trait::Openness => "Creative vs. Practical",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraitScoreError {
    #[error("score for {0} is {1}, expected a value in [0, 100]")]
    OutOfRange(Trait, f32),
    #[error("no score for {0}")]
    Missing(Trait),
}

/// One score per trait, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitScores {
    values: [f32; 5],
}

impl TraitScores {
    /// Scores in `Trait::ALL` order
    pub fn new(values: [f32; 5]) -> Result<Self, TraitScoreError> {
        for (t, v) in Trait::ALL.iter().zip(values) {
            if !v.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&v) {
                return Err(TraitScoreError::OutOfRange(*t, v));
            }
        }
        Ok(Self { values })
    }

    /// Every trait must be present exactly once
    pub fn from_pairs<I>(pairs: I) -> Result<Self, TraitScoreError>
    where
        I: IntoIterator<Item = (Trait, f32)>,
    {
        let mut values = [None; 5];
        for (t, v) in pairs {
            values[t.index()] = Some(v);
        }
        let mut out = [0.0; 5];
        for t in Trait::ALL {
            out[t.index()] = values[t.index()].ok_or(TraitScoreError::Missing(t))?;
        }
        Self::new(out)
    }

    pub fn get(&self, t: Trait) -> f32 {
        self.values[t.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Trait, f32)> + '_ {
        Trait::ALL.iter().map(move |t| (*t, self.get(*t)))
    }
}

impl Serialize for TraitScores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Trait::ALL.len()))?;
        for (t, v) in self.iter() {
            map.serialize_entry(t.name(), &v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_in_range() {
        let scores = TraitScores::new([85.0, 20.0, 50.0, 15.0, 90.0]).unwrap();
        assert_eq!(scores.get(Trait::Agreeableness), 20.0);
        assert_eq!(scores.get(Trait::Openness), 90.0);
        assert_eq!(scores.iter().map(|(_, v)| v).sum::<f32>(), 260.0);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(TraitScores::new([0.0, 100.0, 0.0, 100.0, 50.0]).is_ok());
        assert_eq!(
            TraitScores::new([50.0, 100.5, 50.0, 50.0, 50.0]),
            Err(TraitScoreError::OutOfRange(Trait::Agreeableness, 100.5))
        );
        assert!(TraitScores::new([f32::NAN, 1.0, 1.0, 1.0, 1.0]).is_err());
        assert!(TraitScores::new([-0.1, 1.0, 1.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn test_from_pairs_requires_all_traits() {
        let partial = [(Trait::Openness, 10.0), (Trait::Neuroticism, 20.0)];
        assert_eq!(
            TraitScores::from_pairs(partial),
            Err(TraitScoreError::Missing(Trait::Extraversion))
        );

        let shuffled = [
            (Trait::Openness, 1.0),
            (Trait::Conscientiousness, 2.0),
            (Trait::Extraversion, 3.0),
            (Trait::Agreeableness, 4.0),
            (Trait::Neuroticism, 5.0),
        ];
        let scores = TraitScores::from_pairs(shuffled).unwrap();
        let order: Vec<_> = scores.iter().map(|(t, _)| t).collect();
        assert_eq!(order, Trait::ALL.to_vec());
        assert_eq!(scores.get(Trait::Extraversion), 3.0);
    }

    #[test]
    fn test_poles_name_high_side_first() {
        assert_eq!(Trait::Extraversion.poles(), "Outgoing vs. Reserved");
        assert!(Trait::ALL.iter().all(|t| t.poles().contains(" vs. ")));
    }

    #[test]
    fn test_serializes_as_named_map() {
        let scores = TraitScores::new([50.0; 5]).unwrap();
        let json = serde_json::to_value(scores).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 5);
        assert!(keys.contains(&"Conscientiousness".to_string()));
    }
}
