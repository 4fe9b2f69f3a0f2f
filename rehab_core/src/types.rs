//! Core domain types for the Rehab Portal.
//!
//! This module defines the records kept by the service:
//! - Exercises, their steps and movement thresholds
//! - Patients and the prescriptions linking them to exercises
//! - Progress events carrying metric observations
//! - Coaching feedback produced by the evaluator

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timestamp;

// ============================================================================
// Thresholds
// ============================================================================

/// Comparison operator of a movement threshold.
///
/// Serialized as its wire string (`">="`, `"<="`, `"between"`). Unknown
/// strings are kept verbatim in `Other` and always evaluate as met.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Comparator {
    #[default]
    AtLeast,
    AtMost,
    Between,
    Other(String),
}

impl Comparator {
    pub fn as_str(&self) -> &str {
        match self {
            Comparator::AtLeast => ">=",
            Comparator::AtMost => "<=",
            Comparator::Between => "between",
            Comparator::Other(raw) => raw,
        }
    }
}

impl From<String> for Comparator {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            ">=" => Comparator::AtLeast,
            "<=" => Comparator::AtMost,
            "between" => Comparator::Between,
            _ => Comparator::Other(raw),
        }
    }
}

impl From<Comparator> for String {
    fn from(comparator: Comparator) -> Self {
        match comparator {
            Comparator::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinician-defined target for a body metric
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MovementThreshold {
    /// Metric name, e.g. `neck_rotation`
    pub metric: String,
    #[serde(default)]
    #[schemars(with = "String")]
    pub comparator: Comparator,
    /// Primary threshold value (lower bound for `between`)
    pub value: f64,
    /// Upper bound, only meaningful for `between`
    #[serde(default)]
    pub secondary_value: Option<f64>,
    /// Display unit, e.g. `deg` or `mm`
    pub unit: String,
    /// Plain-language explanation of how to meet the threshold
    pub coaching_prompt: String,
}

// ============================================================================
// Exercises
// ============================================================================

/// One step of an exercise, with the thresholds checked during it
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExerciseStep {
    pub index: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
    /// `real` for clinician footage or `avatar:<id>` for generated video
    #[serde(default = "default_avatar_style")]
    pub avatar_style: String,
    #[serde(default)]
    pub thresholds: Vec<MovementThreshold>,
}

/// An exercise definition, grouped by the symptom it treats
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub symptom: String,
    pub title: String,
    pub description: String,
    pub steps: Vec<ExerciseStep>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    #[schemars(with = "String")]
    pub created_at: DateTime<Utc>,
}

fn default_avatar_style() -> String {
    "real".into()
}

// ============================================================================
// Patients and Prescriptions
// ============================================================================

/// A patient keyed by national identifier
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Patient {
    pub national_id: String,
    pub name: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    #[schemars(with = "String")]
    pub birthdate: DateTime<Utc>,
    /// Exercise ids appended by each prescription (back-reference, may repeat)
    #[serde(default)]
    pub active_prescriptions: Vec<String>,
}

/// Assignment of an exercise, with dosage, to a patient
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Prescription {
    pub id: String,
    pub patient_id: String,
    pub exercise_id: String,
    pub repetitions: i64,
    pub frequency_per_day: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    #[schemars(with = "String")]
    pub issued_at: DateTime<Utc>,
}

// ============================================================================
// Progress
// ============================================================================

/// Measured result compared to a snapshot of its threshold
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MetricObservation {
    pub threshold: MovementThreshold,
    pub actual_value: f64,
}

/// One logged attempt at an exercise repetition
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProgressEvent {
    #[serde(deserialize_with = "timestamp::deserialize")]
    #[schemars(with = "String")]
    pub timestamp: DateTime<Utc>,
    pub exercise_id: String,
    pub repetition_index: i64,
    pub success: bool,
    pub metrics: Vec<MetricObservation>,
    #[serde(default)]
    pub deviation_report: Option<String>,
}

// ============================================================================
// Coaching
// ============================================================================

/// Feedback for a single metric whose threshold was not met
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoachingFeedback {
    pub metric: String,
    pub message: String,
}

/// Response envelope of the coaching endpoint
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CoachingReport {
    pub feedback: Vec<CoachingFeedback>,
}
