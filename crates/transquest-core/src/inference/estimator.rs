//! `predict_quality` wrappers over loaded models.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::alignment::{align, check_alignment, PredictedToken};
use crate::error::{Error, Result};
use crate::inference::backend::{ModelOutput, QualityModel, SentencePair};
use crate::model::ModelKind;

/// Word-level estimator: OK/BAD per source word and per target word or gap
#[derive(Clone)]
pub struct WordQualityEstimator {
    model: Arc<dyn QualityModel>,
}

impl WordQualityEstimator {
    pub fn new(model: Arc<dyn QualityModel>) -> Result<Self> {
        expect_kind(model.as_ref(), ModelKind::Word)?;
        Ok(Self { model })
    }

    pub fn predict_quality(
        &self,
        source: &str,
        target: &str,
    ) -> Result<(Vec<PredictedToken>, Vec<PredictedToken>)> {
        let output = self.model.predict(&[SentencePair::new(source, target)])?;
        let ModelOutput::Tags {
            source_tags,
            target_tags,
        } = output
        else {
            return Err(Error::InferenceError(
                "Word-level model returned scores instead of tags".to_string(),
            ));
        };

        let source_tags = source_tags.into_iter().next().unwrap_or_default();
        let target_tags = target_tags.into_iter().next().unwrap_or_default();
        debug!(?source_tags, ?target_tags, "word-level tags");

        if let Some(mismatch) =
            check_alignment(source, target, source_tags.len(), target_tags.len())
        {
            warn!("Tag count does not match word count, output truncated: {}", mismatch);
        }

        Ok(align(source, target, &source_tags, &target_tags))
    }
}

/// Sentence-level estimator: one scalar per pair (HTER or DA)
#[derive(Clone)]
pub struct SentenceQualityEstimator {
    model: Arc<dyn QualityModel>,
}

impl SentenceQualityEstimator {
    pub fn new(model: Arc<dyn QualityModel>) -> Result<Self> {
        expect_kind(model.as_ref(), ModelKind::Sentence)?;
        Ok(Self { model })
    }

    pub fn predict_quality(&self, source: &str, target: &str) -> Result<f64> {
        match self.model.predict(&[SentencePair::new(source, target)])? {
            ModelOutput::Scores { scores, .. } => scores.first().copied().ok_or_else(|| {
                Error::InferenceError("Sentence-level model returned no score".to_string())
            }),
            ModelOutput::Tags { .. } => Err(Error::InferenceError(
                "Sentence-level model returned tags instead of scores".to_string(),
            )),
        }
    }
}

fn expect_kind(model: &dyn QualityModel, expected: ModelKind) -> Result<()> {
    if model.kind() == expected {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "Expected a {} model, got a {} model",
            expected,
            model.kind()
        )))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeModel;
    use super::*;
    use crate::alignment::{QualityLabel, GAP_TOKEN};

    #[test]
    fn word_estimator_aligns_model_tags() {
        let model = Arc::new(FakeModel::word(&["OK", "OK", "BAD", "OK", "OK"]));
        let estimator = WordQualityEstimator::new(model).unwrap();

        let (source, target) = estimator
            .predict_quality("Welcome", "Herzlich willkommen")
            .unwrap();

        assert_eq!(source, vec![PredictedToken::new("Welcome", QualityLabel::Bad)]);
        let texts: Vec<_> = target.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![GAP_TOKEN, "Herzlich", GAP_TOKEN, "willkommen", GAP_TOKEN]
        );
        assert_eq!(target[2].quality, QualityLabel::Bad);
    }

    #[test]
    fn sentence_estimator_returns_first_score() {
        let estimator =
            SentenceQualityEstimator::new(Arc::new(FakeModel::sentence(0.3141))).unwrap();
        let score = estimator.predict_quality("Welcome", "Willkommen").unwrap();
        assert_eq!(score, 0.3141);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let result = WordQualityEstimator::new(Arc::new(FakeModel::sentence(0.0)));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let model = Arc::new(FakeModel::word(&["OK", "BAD", "OK"]));
        let estimator = WordQualityEstimator::new(model).unwrap();
        let first = estimator.predict_quality("Hi", "Hallo").unwrap();
        let second = estimator.predict_quality("Hi", "Hallo").unwrap();
        assert_eq!(first, second);
    }
}
