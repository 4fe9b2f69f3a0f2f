//! Schema validation for raw request bodies.
//!
//! Each entity's JSON Schema is generated from its type with
//! `schemars::schema_for!` and compiled once into a `jsonschema::Validator`.
//! `validate` reports every schema violation of a raw value as
//! `"<instance path>: <message>"`; `parse` runs it and only then
//! deserializes into the typed entity.
//!
//! No business rules are enforced here: negative counts, inverted `between`
//! ranges and unknown comparators all pass.

use crate::{
    Error, Exercise, MetricObservation, MovementThreshold, Patient, Prescription, ProgressEvent,
    Result,
};
use jsonschema::Validator;
use schemars::schema_for;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Compiled validator, or the reason it could not be built
type CompiledSchema = std::result::Result<Validator, String>;

/// An entity accepted from raw input, with its cached schema validator
pub trait Validate: DeserializeOwned {
    fn validator() -> &'static CompiledSchema;
}

fn compile(schema: schemars::Schema, name: &str) -> CompiledSchema {
    let schema = serde_json::to_value(schema)
        .map_err(|e| format!("Failed to serialize {} schema: {}", name, e))?;
    jsonschema::validator_for(&schema)
        .map_err(|e| format!("Failed to compile {} schema: {}", name, e))
}

/// Implement `Validate` with a validator built on first use
macro_rules! validated {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Validate for $ty {
                fn validator() -> &'static CompiledSchema {
                    static VALIDATOR: once_cell::sync::Lazy<CompiledSchema> =
                        once_cell::sync::Lazy::new(|| {
                            compile(schema_for!($ty), stringify!($ty))
                        });
                    &VALIDATOR
                }
            }
        )+
    };
}

validated!(
    MovementThreshold,
    Exercise,
    Patient,
    Prescription,
    MetricObservation,
    ProgressEvent,
);

/// List every schema violation of `raw` as an entity of type `T`
pub fn validate<T: Validate>(raw: &Value) -> Result<Vec<String>> {
    let validator = T::validator().as_ref().map_err(|e| Error::Config(e.clone()))?;

    let issues = validator
        .iter_errors(raw)
        .map(|e| {
            let path = e.instance_path.to_string();
            let location = if path.is_empty() { "/" } else { path.as_str() };
            format!("{}: {}", location, e)
        })
        .collect();
    Ok(issues)
}

/// Validate `raw` and convert it into `T`
///
/// Fails with `Error::Validation` carrying all issues found.
pub fn parse<T: Validate>(raw: Value) -> Result<T> {
    let issues = validate::<T>(&raw)?;
    if !issues.is_empty() {
        tracing::debug!("Rejected request body with {} issues", issues.len());
        return Err(Error::Validation(issues));
    }
    serde_json::from_value(raw).map_err(|e| Error::Validation(vec![format!("/: {}", e)]))
}
