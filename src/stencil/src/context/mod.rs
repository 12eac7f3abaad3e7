//! Rendering context.
//!
//! A [`Context`] is the set of name-to-value bindings a template is rendered
//! with. It is loaded from a JSON file, adjusted by user defaults and extra
//! values, and then resolved so every choice list collapses to one value.

mod resolve;

pub use resolve::{resolve_context, ContextSources};

use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Name-to-value bindings used when rendering a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: Map<String, Value>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing JSON object.
    #[must_use]
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Loads a context from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Io`] if the file can't be read and
    /// [`GenerateError::ContextDecoding`] if it isn't a JSON object.
    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        debug!(path = %path.display(), "Loading context file");

        let content = std::fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| GenerateError::ContextDecoding {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(GenerateError::ContextDecoding {
                path: path.display().to_string(),
                message: format!("expected a JSON object, found {}", json_type(&other)),
            }),
        }
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns true if the context has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns the context as a JSON value, suitable for rendering.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Applies `overwrites` on top of the current bindings.
    ///
    /// Only names already present are touched. A string chosen for a choice
    /// list moves to the front of that list, a string given for a boolean is
    /// parsed as a flag, nested objects merge recursively, and anything else
    /// replaces the old value.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidConfiguration`] if a choice isn't in
    /// its list or a boolean overwrite isn't a recognised flag value.
    pub fn apply_overwrites(
        &mut self,
        overwrites: &Map<String, Value>,
    ) -> Result<(), GenerateError> {
        apply_overwrites_to(&mut self.values, overwrites)
    }

    /// Returns a copy with every choice list collapsed to its first entry.
    #[must_use]
    pub fn resolved(&self) -> Self {
        let values = self
            .values
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::Array(choices) if !choices.is_empty() => choices[0].clone(),
                    other => other.clone(),
                };
                (name.clone(), value)
            })
            .collect();
        Self { values }
    }

    /// Interprets the binding for `name` as a template flag.
    ///
    /// Missing or `null` bindings are `false`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidConfiguration`] if the value isn't a
    /// recognised flag value.
    pub fn flag(&self, name: &str) -> Result<bool, GenerateError> {
        match self.values.get(name) {
            None | Some(Value::Null) => Ok(false),
            Some(value) => parse_flag(value).ok_or_else(|| not_a_flag(name, value)),
        }
    }
}

/// Parses `KEY=VALUE` pairs into extra context.
///
/// Values are kept as strings; later pairs win over earlier ones.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidConfiguration`] for a pair without `=` or
/// with an empty key.
pub fn parse_extra_context<S: AsRef<str>>(
    pairs: &[S],
) -> Result<Map<String, Value>, GenerateError> {
    let mut extra = Map::new();
    for pair in pairs {
        let pair = pair.as_ref();
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                extra.insert(key.trim().to_string(), Value::String(value.to_string()));
            }
            _ => {
                return Err(GenerateError::InvalidConfiguration {
                    path: "extra context".to_string(),
                    message: format!("'{pair}' should be of the form key=value"),
                });
            }
        }
    }
    Ok(extra)
}

/// Parses `y/n`, `yes/no`, `true/false`, `on/off`, `1/0` and JSON booleans.
pub(crate) fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" | "on" | "1" => Some(true),
            "n" | "no" | "false" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn not_a_flag(name: &str, value: &Value) -> GenerateError {
    GenerateError::InvalidConfiguration {
        path: "context".to_string(),
        message: format!("'{name}' is not a yes/no flag: {value}"),
    }
}

fn apply_overwrites_to(
    values: &mut Map<String, Value>,
    overwrites: &Map<String, Value>,
) -> Result<(), GenerateError> {
    for (name, overwrite) in overwrites {
        let Some(current) = values.get_mut(name) else {
            // Variables the template doesn't declare are ignored.
            continue;
        };

        match (current, overwrite) {
            (Value::Array(choices), Value::String(choice)) => {
                let position = choices
                    .iter()
                    .position(|c| c.as_str() == Some(choice.as_str()))
                    .ok_or_else(|| GenerateError::InvalidConfiguration {
                        path: "context".to_string(),
                        message: format!(
                            "'{choice}' provided for choice variable '{name}', but the choices are {}",
                            Value::Array(choices.clone())
                        ),
                    })?;
                let chosen = choices.remove(position);
                choices.insert(0, chosen);
            }
            (Value::Bool(current), overwrite) => {
                *current = parse_flag(overwrite).ok_or_else(|| not_a_flag(name, overwrite))?;
            }
            (Value::Object(nested), Value::Object(nested_overwrites)) => {
                apply_overwrites_to(nested, nested_overwrites)?;
            }
            (current, overwrite) => *current = overwrite.clone(),
        }
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
