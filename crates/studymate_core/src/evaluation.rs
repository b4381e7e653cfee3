//! crates/studymate_core/src/evaluation.rs
//!
//! Display selection for evaluation payloads: batch vs. single presentation
//! and the shared score-to-tier bucketing.

use crate::domain::{EvaluationItem, EvaluationResult};

/// The display tier for a score. Used only for presentation (icon/color
/// selection); the raw score is always preserved alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Good,
    Partial,
    Poor,
}

impl ScoreTier {
    /// Buckets a score fraction into its display tier.
    ///
    /// The single function used by every rendering path, so the single- and
    /// batch-evaluation views can never disagree on the boundaries:
    /// `score >= 0.7` is good, `0.4 <= score < 0.7` partial, below poor.
    pub fn for_score(score: f64) -> Self {
        if score >= 0.7 {
            ScoreTier::Good
        } else if score >= 0.4 {
            ScoreTier::Partial
        } else {
            ScoreTier::Poor
        }
    }
}

impl EvaluationItem {
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::for_score(self.score)
    }
}

/// How an evaluation result should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// An overall score plus a list of per-question items.
    Batch,
    /// One item on its own.
    Single,
}

impl EvaluationResult {
    /// Selects batch vs. single presentation purely by the presence of a
    /// non-empty item list.
    pub fn presentation(&self) -> Presentation {
        match self {
            EvaluationResult::Batch(report) if !report.evaluations.is_empty() => {
                Presentation::Batch
            }
            EvaluationResult::Batch(_) => Presentation::Single,
            EvaluationResult::Single(_) => Presentation::Single,
        }
    }

    /// The per-question items, regardless of shape.
    pub fn items(&self) -> &[EvaluationItem] {
        match self {
            EvaluationResult::Batch(report) => &report.evaluations,
            EvaluationResult::Single(item) => std::slice::from_ref(item),
        }
    }

    /// The overall score fraction: the reported one for batches, the item's
    /// own score for a bare single item.
    pub fn overall_score(&self) -> f64 {
        match self {
            EvaluationResult::Batch(report) => report.overall_score,
            EvaluationResult::Single(item) => item.score,
        }
    }

    pub fn overall_tier(&self) -> ScoreTier {
        ScoreTier::for_score(self.overall_score())
    }
}
