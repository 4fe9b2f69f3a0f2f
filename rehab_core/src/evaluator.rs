//! Threshold evaluation for coaching feedback.
//!
//! Compares observed metric values against clinician thresholds and emits a
//! plain-language message for every threshold that is not met:
//! - `>=` is met when the actual value reaches the target
//! - `<=` is met when the actual value stays at or below the target
//! - `between` is met when the value lies in `[value, secondary_value]`
//! - Any other comparator is treated as met
//!
//! Only `>=` mismatches carry a "remaining distance to target" clause.

use crate::{CoachingFeedback, Comparator, MetricObservation, MovementThreshold};
use serde::{Deserialize, Serialize};

/// Language of generated coaching messages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLocale {
    #[default]
    Ko,
    En,
}

impl FeedbackLocale {
    fn current_clause(self, actual: f64, unit: &str) -> String {
        match self {
            FeedbackLocale::Ko => format!(" 현재 {:.1}{}.", actual, unit),
            FeedbackLocale::En => format!(" Currently {:.1}{}.", actual, unit),
        }
    }

    fn remaining_clause(self, gap: f64, unit: &str) -> String {
        match self {
            FeedbackLocale::Ko => format!(" 목표까지 {:.1}{} 남았습니다.", gap, unit),
            FeedbackLocale::En => format!(" {:.1}{} remaining to reach the target.", gap, unit),
        }
    }
}

/// Whether `actual` satisfies the threshold
pub fn is_met(threshold: &MovementThreshold, actual: f64) -> bool {
    match &threshold.comparator {
        Comparator::AtLeast => actual >= threshold.value,
        Comparator::AtMost => actual <= threshold.value,
        Comparator::Between => match threshold.secondary_value {
            Some(upper) => threshold.value <= actual && actual <= upper,
            None => {
                tracing::warn!(
                    "Threshold '{}' uses 'between' without secondary_value, treating as met",
                    threshold.metric
                );
                true
            }
        },
        Comparator::Other(raw) => {
            tracing::debug!(
                "Unknown comparator '{}' on '{}', treating as met",
                raw,
                threshold.metric
            );
            true
        }
    }
}

/// Distance still to cover before the target is reached.
///
/// Always 0 for comparators other than `>=`.
pub fn remaining_gap(threshold: &MovementThreshold, actual: f64) -> f64 {
    match threshold.comparator {
        Comparator::AtLeast => threshold.value - actual,
        _ => 0.0,
    }
}

fn compose_message(threshold: &MovementThreshold, actual: f64, locale: FeedbackLocale) -> String {
    let mut message = threshold.coaching_prompt.clone();
    message.push_str(&locale.current_clause(actual, &threshold.unit));

    let gap = remaining_gap(threshold, actual);
    if gap > 0.0 {
        message.push_str(&locale.remaining_clause(gap, &threshold.unit));
    }
    message
}

/// Evaluate (threshold, actual value) pairs, preserving input order
pub fn evaluate<'a, I>(pairs: I, locale: FeedbackLocale) -> Vec<CoachingFeedback>
where
    I: IntoIterator<Item = (&'a MovementThreshold, f64)>,
{
    pairs
        .into_iter()
        .filter(|(threshold, actual)| !is_met(threshold, *actual))
        .map(|(threshold, actual)| CoachingFeedback {
            metric: threshold.metric.clone(),
            message: compose_message(threshold, actual, locale),
        })
        .collect()
}

/// Evaluate the metric observations of a progress event
pub fn evaluate_observations(
    observations: &[MetricObservation],
    locale: FeedbackLocale,
) -> Vec<CoachingFeedback> {
    let feedback = evaluate(
        observations.iter().map(|o| (&o.threshold, o.actual_value)),
        locale,
    );
    tracing::debug!(
        "Evaluated {} observations, {} below threshold",
        observations.len(),
        feedback.len()
    );
    feedback
}
