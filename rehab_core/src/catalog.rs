//! Default catalog of exercises.
//!
//! This module provides the built-in TMJ and neck exercises that can be
//! seeded into a fresh store.

use crate::{
    Comparator, Error, Exercise, ExerciseStep, MovementThreshold, Repository, Result,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// An ordered set of exercise definitions
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: Vec<Exercise>,
}

/// Cached default catalog - built once and reused
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn threshold(
    metric: &str,
    comparator: Comparator,
    value: f64,
    secondary_value: Option<f64>,
    unit: &str,
    coaching_prompt: &str,
) -> MovementThreshold {
    MovementThreshold {
        metric: metric.into(),
        comparator,
        value,
        secondary_value,
        unit: unit.into(),
        coaching_prompt: coaching_prompt.into(),
    }
}

fn step(index: i64, title: &str, description: &str, thresholds: Vec<MovementThreshold>) -> ExerciseStep {
    ExerciseStep {
        index,
        title: title.into(),
        description: description.into(),
        video_url: None,
        avatar_style: "real".into(),
        thresholds,
    }
}

/// Builds the default catalog of built-in exercises
///
/// **Note**: prefer `get_default_catalog()`, which returns a cached reference.
pub fn build_default_catalog() -> Catalog {
    let now = Utc::now();

    let exercises = vec![
        Exercise {
            id: "tmj_controlled_opening".into(),
            symptom: "tmj".into(),
            title: "Controlled Jaw Opening".into(),
            description: "Open the mouth slowly along the midline with the tongue resting on the palate."
                .into(),
            steps: vec![
                step(
                    0,
                    "Tongue position",
                    "Rest the tip of the tongue just behind the upper front teeth.",
                    vec![],
                ),
                step(
                    1,
                    "Open",
                    "Open slowly without letting the jaw drift to one side.",
                    vec![
                        threshold(
                            "mouth_opening",
                            Comparator::Between,
                            35.0,
                            Some(45.0),
                            "mm",
                            "Open within the comfortable range.",
                        ),
                        threshold(
                            "jaw_deviation",
                            Comparator::AtMost,
                            2.0,
                            None,
                            "mm",
                            "Keep the jaw centred while opening.",
                        ),
                    ],
                ),
            ],
            created_at: now,
        },
        Exercise {
            id: "tmj_resisted_opening".into(),
            symptom: "tmj".into(),
            title: "Resisted Opening".into(),
            description: "Open against light resistance from the thumb under the chin.".into(),
            steps: vec![step(
                0,
                "Resist",
                "Press gently upwards under the chin and open against it.",
                vec![threshold(
                    "hold_seconds",
                    Comparator::AtLeast,
                    5.0,
                    None,
                    "s",
                    "Hold the open position a little longer.",
                )],
            )],
            created_at: now,
        },
        Exercise {
            id: "neck_chin_tuck".into(),
            symptom: "neck".into(),
            title: "Chin Tuck".into(),
            description: "Draw the chin straight back to lengthen the back of the neck.".into(),
            steps: vec![step(
                0,
                "Tuck",
                "Slide the head back keeping the eyes level.",
                vec![threshold(
                    "head_tilt",
                    Comparator::AtMost,
                    10.0,
                    None,
                    "deg",
                    "Keep the eyes level, do not nod.",
                )],
            )],
            created_at: now,
        },
        Exercise {
            id: "neck_rotation".into(),
            symptom: "neck".into(),
            title: "Neck Rotation".into(),
            description: "Turn the head to each side as far as is comfortable.".into(),
            steps: vec![
                step(
                    0,
                    "Left",
                    "Turn the head to the left.",
                    vec![threshold(
                        "neck_rotation",
                        Comparator::AtLeast,
                        60.0,
                        None,
                        "deg",
                        "Rotate a little further.",
                    )],
                ),
                step(
                    1,
                    "Right",
                    "Turn the head to the right.",
                    vec![threshold(
                        "neck_rotation",
                        Comparator::AtLeast,
                        60.0,
                        None,
                        "deg",
                        "Rotate a little further.",
                    )],
                ),
            ],
            created_at: now,
        },
    ];

    Catalog { exercises }
}

impl Catalog {
    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors (empty if valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            let id = &exercise.id;
            if id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if !seen.insert(id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", id));
            }
            if exercise.title.is_empty() {
                errors.push(format!("Exercise '{}' has empty title", id));
            }
            if exercise.steps.is_empty() {
                errors.push(format!("Exercise '{}' has no steps", id));
            }

            for (position, step) in exercise.steps.iter().enumerate() {
                if step.index != position as i64 {
                    errors.push(format!(
                        "Exercise '{}': step '{}' has index {} at position {}",
                        id, step.title, step.index, position
                    ));
                }

                for t in &step.thresholds {
                    if t.comparator == Comparator::Between {
                        match t.secondary_value {
                            None => errors.push(format!(
                                "Exercise '{}': 'between' threshold '{}' has no secondary_value",
                                id, t.metric
                            )),
                            Some(upper) if upper < t.value => errors.push(format!(
                                "Exercise '{}': threshold '{}' range {} > {}",
                                id, t.metric, t.value, upper
                            )),
                            Some(_) => {}
                        }
                    }
                    if t.coaching_prompt.is_empty() {
                        errors.push(format!(
                            "Exercise '{}': threshold '{}' has empty coaching prompt",
                            id, t.metric
                        ));
                    }
                }
            }
        }

        errors
    }

    /// Insert every exercise into `repo`, skipping ids that already exist
    ///
    /// Returns the number of exercises inserted.
    pub fn seed(&self, repo: &dyn Repository) -> Result<usize> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(Error::Config(format!(
                "Invalid catalog: {}",
                errors.join("; ")
            )));
        }

        let mut inserted = 0;
        for exercise in &self.exercises {
            match repo.create_exercise(exercise.clone()) {
                Ok(_) => inserted += 1,
                Err(Error::AlreadyExists(_)) => {
                    tracing::debug!("Catalog exercise {} already present", exercise.id);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Seeded {} catalog exercises", inserted);
        Ok(inserted)
    }
}
