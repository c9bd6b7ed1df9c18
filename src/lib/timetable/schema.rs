//! Runtime validation of decoded JSON against the schema derived from a model.
//!
//! The models are declared once: `serde` gives the typed value, `schemars`
//! derives the JSON Schema that `jsonschema` checks before decoding. Checking
//! the schema first reports every offending path instead of the first one.
//! Undeclared properties are accepted, formats (`date`) are enforced.
//!
//! Optional fields take the schema of their inner type, so they may be absent
//! but not `null`; fields that the upstream sends as `null` declare their own
//! schema. Integer schemas carry the bounds of their Rust type, so an id that
//! does not fit is reported at its own path.
use std::marker::PhantomData;

use jsonschema::Validator;
use log::debug;
use schemars::{generate::SchemaSettings, transform::RecursiveTransform, JsonSchema, Schema};
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};

use super::error::{FetchError, ValidationErrors, Violation};

pub struct SchemaValidator<T> {
    validator: Validator,
    target: PhantomData<fn() -> T>,
}

impl<T: JsonSchema + DeserializeOwned> SchemaValidator<T> {
    pub fn new() -> Result<Self, FetchError> {
        let root = SchemaSettings::draft2020_12()
            .with_transform(RecursiveTransform(add_integer_bounds))
            .into_generator()
            .into_root_schema_for::<T>();
        let schema = serde_json::to_value(root).map_err(|e| FetchError::Schema(e.to_string()))?;
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(&schema)
            .map_err(|e| FetchError::Schema(e.to_string()))?;
        Ok(SchemaValidator {
            validator,
            target: PhantomData,
        })
    }

    /// Check `instance` against the schema and decode it on success.
    pub fn validate(&self, mut instance: Value) -> Result<T, ValidationErrors> {
        let violations = self
            .validator
            .iter_errors(&instance)
            .map(|e| Violation {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect::<Vec<_>>();
        if !violations.is_empty() {
            debug!("Schema check found {} violation(s)", violations.len());
            return Err(ValidationErrors(violations));
        }

        integral_floats_to_ints(&mut instance);
        serde_json::from_value(instance).map_err(|e| {
            ValidationErrors(vec![Violation {
                path: String::new(),
                message: e.to_string(),
            }])
        })
    }
}

fn add_integer_bounds(schema: &mut Schema) {
    let bounds = match schema.get("format").and_then(Value::as_str) {
        Some("int64") => (Number::from(i64::MIN), Number::from(i64::MAX)),
        Some("uint16") => (Number::from(u16::MIN), Number::from(u16::MAX)),
        _ => return,
    };
    if let Some(object) = schema.as_object_mut() {
        object.insert("minimum".to_owned(), Value::Number(bounds.0));
        object.insert("maximum".to_owned(), Value::Number(bounds.1));
    }
}

/// JSON Schema counts `1.0` as an integer, serde does not.
fn integral_floats_to_ints(value: &mut Value) {
    match value {
        Value::Number(number) if number.is_f64() => {
            if let Some(float) = number.as_f64() {
                if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
                    *number = Number::from(float as i64);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats_to_ints),
        Value::Object(fields) => fields.values_mut().for_each(integral_floats_to_ints),
        _ => {}
    }
}

/// Validate `instance` against the schema of `T` in one go.
pub fn validate<T: JsonSchema + DeserializeOwned>(instance: Value) -> Result<T, FetchError> {
    Ok(SchemaValidator::<T>::new()?.validate(instance)?)
}
