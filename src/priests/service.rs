//! 🔮 Сервис личности - владеет классификатором на всё время процесса
//!
//! Модель загружается при первом анализе и дальше переиспользуется.
//! Ошибка загрузки оставляет сервис пустым, следующий вызов пробует снова.

use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor, D};
use lru::LruCache;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

use super::classifier::{BertPersonalityClassifier, ModelFiles, TraitClassifier, HEAD_ORDER};
use super::device::select_device;
use crate::demiurge::traits::TraitScores;
use crate::initiation::config::ModelConfig;

type Loader = Box<dyn Fn() -> Result<Box<dyn TraitClassifier>> + Send + Sync>;

pub struct PersonalityService {
    loader: Loader,
    classifier: OnceCell<Box<dyn TraitClassifier>>,
    recent: Option<Mutex<LruCache<String, TraitScores>>>,
}

impl PersonalityService {
    /// `cache_size == 0` disables result caching
    pub fn new<F>(loader: F, cache_size: usize) -> Self
    where
        F: Fn() -> Result<Box<dyn TraitClassifier>> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            classifier: OnceCell::new(),
            recent: NonZeroUsize::new(cache_size).map(|n| Mutex::new(LruCache::new(n))),
        }
    }

    /// Сервис, загружающий настроенный чекпоинт при первом обращении
    pub fn from_config(config: &ModelConfig) -> Self {
        let settings = config.clone();
        Self::new(
            move || {
                let files = match &settings.model_dir {
                    Some(dir) => ModelFiles::from_dir(dir)?,
                    None => ModelFiles::from_hub(&settings.model_id, &settings.revision)?,
                };
                let device = select_device(settings.force_cpu)?;
                let classifier =
                    BertPersonalityClassifier::load(&files, device, settings.max_tokens)?;
                Ok(Box::new(classifier) as Box<dyn TraitClassifier>)
            },
            config.cache_size,
        )
    }

    /// Service around an already constructed classifier
    #[cfg(test)]
    pub fn with_classifier(classifier: Box<dyn TraitClassifier>, cache_size: usize) -> Self {
        let service = Self::new(
            || Err(anyhow!("classifier was provided at construction")),
            cache_size,
        );
        // a fresh cell always accepts its first value
        let _ = service.classifier.set(classifier);
        service
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.classifier.get().is_some()
    }

    /// Ленивая загрузка классификатора
    pub fn classifier(&self) -> Result<&dyn TraitClassifier> {
        let classifier = self.classifier.get_or_try_init(|| {
            tracing::info!("initializing personality classifier");
            (self.loader)()
        })?;
        Ok(classifier.as_ref())
    }

    /// Scores free text; identical text returns the cached scores
    pub fn analyze(&self, text: &str) -> Result<TraitScores> {
        let text = text.trim();
        if text.is_empty() {
            anyhow::bail!("cannot analyze an empty description");
        }

        if let Some(recent) = &self.recent {
            if let Some(scores) = recent.lock().get(text) {
                tracing::debug!("analysis cache hit");
                return Ok(*scores);
            }
        }

        let logits = self.classifier()?.logits(text)?;
        let scores = scores_from_logits(&logits)?;

        if let Some(recent) = &self.recent {
            recent.lock().put(text.to_string(), scores);
        }
        Ok(scores)
    }
}

/// Softmax over the head, as percentages rounded to two decimals
pub fn scores_from_logits(logits: &[f32]) -> Result<TraitScores> {
    if logits.len() != HEAD_ORDER.len() {
        anyhow::bail!(
            "classifier returned {} logits, expected {}",
            logits.len(),
            HEAD_ORDER.len()
        );
    }
    let logits = Tensor::new(logits, &Device::Cpu)?;
    let probs = candle_nn::ops::softmax(&logits, D::Minus1)?.to_vec1::<f32>()?;

    let pairs = HEAD_ORDER.iter().zip(probs).map(|(t, p)| {
        let percent = (p as f64 * 10_000.0).round() / 100.0;
        (*t, percent as f32)
    });
    Ok(TraitScores::from_pairs(pairs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demiurge::traits::Trait;
    use crate::priests::dummy_classifier::DummyClassifier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_uniform_logits_split_evenly() {
        let scores = scores_from_logits(&[0.0; 5]).unwrap();
        for (_, v) in scores.iter() {
            assert_eq!(v, 20.0);
        }
    }

    #[test]
    fn test_logits_map_to_head_order() {
        // only the third logit (Extraversion) is large
        let scores = scores_from_logits(&[0.0, 0.0, 10.0, 0.0, 0.0]).unwrap();
        assert!(scores.get(Trait::Extraversion) > 99.0);
        assert!(scores.get(Trait::Openness) < 0.01);
    }

    #[test]
    fn test_scores_sum_to_hundred() {
        let scores = scores_from_logits(&[1.3, -0.2, 0.7, 2.9, -1.1]).unwrap();
        let total: f32 = scores.iter().map(|(_, v)| v).sum();
        assert!((total - 100.0).abs() <= 0.05, "{total}");
        for (_, v) in scores.iter() {
            let cents = v as f64 * 100.0;
            assert!((cents - cents.round()).abs() < 1e-3, "{v}");
        }
    }

    #[test]
    fn test_wrong_logit_count_rejected() {
        assert!(scores_from_logits(&[0.1, 0.2]).is_err());
    }

    #[test]
    fn test_classifier_loaded_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let service = PersonalityService::new(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(DummyClassifier::default()) as Box<dyn TraitClassifier>)
            },
            0,
        );
        assert!(!service.is_loaded());

        service.analyze("I like long walks").unwrap();
        service.analyze("I enjoy parties").unwrap();
        assert!(service.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_propagates() {
        let service = PersonalityService::new(|| Err(anyhow!("hub unreachable")), 4);
        let err = service.analyze("hello").unwrap_err();
        assert!(err.to_string().contains("hub unreachable"));
        assert!(!service.is_loaded());
    }

    #[test]
    fn test_empty_text_rejected_before_loading() {
        let service = PersonalityService::new(|| Err(anyhow!("must not load")), 4);
        assert!(service.analyze("   ").unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_inferred_scores_are_bounded() {
        let service = PersonalityService::with_classifier(Box::new(DummyClassifier::default()), 8);
        for text in ["I am calm.", "Parties every night!", "x", "Je suis curieux."] {
            let scores = service.analyze(text).unwrap();
            assert!(scores.iter().all(|(_, v)| (0.0..=100.0).contains(&v)));
            assert!((scores.iter().map(|(_, v)| v).sum::<f32>() - 100.0).abs() <= 0.05);
            assert_eq!(scores.iter().count(), 5);
        }
    }

    #[test]
    fn test_cached_result_reused() {
        let service = PersonalityService::with_classifier(Box::new(DummyClassifier::default()), 8);
        let first = service.analyze("  I plan everything  ").unwrap();
        let second = service.analyze("I plan everything").unwrap();
        assert_eq!(first, second);
    }
}
