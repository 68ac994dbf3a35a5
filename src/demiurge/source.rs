//! Trait sources: slider input or text inference, one interface

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::traits::{Trait, TraitScores};
use crate::priests::service::PersonalityService;

pub const SLIDER_DEFAULT: u8 = 50;
pub const SLIDER_MAX: u8 = 100;

/// Five integer sliders, 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualScores {
    pub extraversion: u8,
    pub agreeableness: u8,
    pub conscientiousness: u8,
    pub neuroticism: u8,
    pub openness: u8,
}

impl Default for ManualScores {
    fn default() -> Self {
        Self {
            extraversion: SLIDER_DEFAULT,
            agreeableness: SLIDER_DEFAULT,
            conscientiousness: SLIDER_DEFAULT,
            neuroticism: SLIDER_DEFAULT,
            openness: SLIDER_DEFAULT,
        }
    }
}

impl ManualScores {
    pub fn get(&self, t: Trait) -> u8 {
        match t {
            Trait::Extraversion => self.extraversion,
            Trait::Agreeableness => self.agreeableness,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Neuroticism => self.neuroticism,
            Trait::Openness => self.openness,
        }
    }

    pub fn to_scores(&self) -> Result<TraitScores> {
        Ok(TraitScores::from_pairs(
            Trait::ALL.iter().map(|t| (*t, self.get(*t) as f32)),
        )?)
    }
}

/// Where a set of trait scores comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TraitSource {
    Manual(ManualScores),
    /// Free-text self description
    Inferred(String),
}

impl TraitSource {
    pub fn label(&self) -> &'static str {
        match self {
            TraitSource::Manual(_) => "self-assessment",
            TraitSource::Inferred(_) => "NLP analysis",
        }
    }

    /// The service is only consulted by the inferred variant
    pub fn resolve(&self, service: &PersonalityService) -> Result<TraitScores> {
        match self {
            TraitSource::Manual(manual) => manual.to_scores(),
            TraitSource::Inferred(text) => service.analyze(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priests::dummy_classifier::FixedClassifier;
    use anyhow::anyhow;

    fn unloadable() -> PersonalityService {
        PersonalityService::new(|| Err(anyhow!("no model in tests")), 0)
    }

    #[test]
    fn test_manual_defaults_to_fifty() {
        let scores = TraitSource::Manual(ManualScores::default())
            .resolve(&unloadable())
            .unwrap();
        assert!(scores.iter().all(|(_, v)| v == 50.0));
    }

    #[test]
    fn test_manual_never_loads_model() {
        let service = unloadable();
        let manual = ManualScores {
            extraversion: 85,
            agreeableness: 20,
            conscientiousness: 50,
            neuroticism: 15,
            openness: 90,
        };
        let scores = TraitSource::Manual(manual).resolve(&service).unwrap();
        assert_eq!(scores.get(Trait::Neuroticism), 15.0);
        assert!(!service.is_loaded());
    }

    #[test]
    fn test_manual_over_hundred_rejected() {
        let manual = ManualScores {
            openness: 101,
            ..Default::default()
        };
        assert!(manual.to_scores().is_err());
    }

    #[test]
    fn test_inferred_uses_service() {
        let service = PersonalityService::with_classifier(
            Box::new(FixedClassifier([0.0, 0.0, 0.0, 0.0, 0.0])),
            0,
        );
        let scores = TraitSource::Inferred("I love hiking".into())
            .resolve(&service)
            .unwrap();
        assert_eq!(scores.get(Trait::Openness), 20.0);
    }

    #[test]
    fn test_inferred_failure_propagates() {
        let source = TraitSource::Inferred("anything".into());
        assert!(source.resolve(&unloadable()).is_err());
        assert_eq!(source.label(), "NLP analysis");
    }
}
