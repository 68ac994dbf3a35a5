//! 🌙 Dummy classifier - deterministic logits without a model
//!
//! Used by tests to drive the service and sources offline.

use super::classifier::{TraitClassifier, HEAD_ORDER};
use anyhow::Result;

/// Logits derived from a hash of the text
#[derive(Debug, Default)]
pub struct DummyClassifier;

impl DummyClassifier {
    fn hash_text(&self, text: &str) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }
}

impl TraitClassifier for DummyClassifier {
    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        let hash = self.hash_text(text);
        // one byte of the hash per logit, spread over [-2, 2]
        Ok((0..HEAD_ORDER.len())
            .map(|i| ((hash >> (i * 8)) & 0xFF) as f32 / 255.0 * 4.0 - 2.0)
            .collect())
    }
}

/// Returns fixed logits, for pinning exact outcomes in tests
#[derive(Debug)]
pub struct FixedClassifier(pub [f32; 5]);

impl TraitClassifier for FixedClassifier {
    fn logits(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.0.to_vec())
    }
}
