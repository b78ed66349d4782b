//! Parameter declaration registry and binding.
//!
//! Profiles declare a fixed set of typed, user-overridable parameters up
//! front. Binding collects one concrete value per declared parameter
//! (falling back to defaults), coerces the value to the declared type, and
//! validates range and allowed-set constraints. All violations are collected
//! and returned together rather than stopping at the first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The type of a declared parameter.
///
/// `Image` and `NodeType` are string-valued on the wire but are declared
/// distinctly so the portal can render the appropriate picker. A `NodeType`
/// parameter may legitimately be bound to an empty string, which means "any
/// available hardware type".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    /// Disk image URN
    Image,
    /// Physical hardware type tag (empty means any)
    NodeType,
    Integer,
    String,
    Boolean,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterType::Image => "image",
            ParameterType::NodeType => "nodetype",
            ParameterType::Integer => "integer",
            ParameterType::String => "string",
            ParameterType::Boolean => "boolean",
        };
        write!(f, "{}", s)
    }
}

/// A concrete parameter value.
///
/// Untagged so that YAML override files can use plain scalars. Variant order
/// matters for deserialization: booleans and integers must be tried before
/// the catch-all string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Boolean(b) => write!(f, "{}", b),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Parameter validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("Duplicate parameter declaration: {0}")]
    DuplicateParameter(String),
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),
}

/// A single declared parameter: name, display label, type, default, and
/// optional constraints.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: String,
    pub label: String,
    pub param_type: ParameterType,
    pub default: ParamValue,
    /// Allowed-value set for enumerated string parameters
    pub allowed: Option<Vec<String>>,
    /// Inclusive integer bounds
    pub bounds: Option<(i64, i64)>,
    /// Required string parameters reject the empty string
    pub required: bool,
    pub long_description: Option<String>,
}

impl ParameterSpec {
    pub fn new(
        name: &str,
        label: &str,
        param_type: ParameterType,
        default: ParamValue,
    ) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            param_type,
            default,
            allowed: None,
            bounds: None,
            required: false,
            long_description: None,
        }
    }

    pub fn with_bounds(mut self, min: i64, max: i64) -> Self {
        self.bounds = Some((min, max));
        self
    }

    pub fn with_allowed(mut self, allowed: &[&str]) -> Self {
        self.allowed = Some(allowed.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.long_description = Some(description.to_string());
        self
    }

    /// Coerce a raw override value to this parameter's declared type.
    fn coerce(&self, value: &ParamValue) -> Result<ParamValue, ValidationError> {
        match self.param_type {
            ParameterType::Integer => match value {
                ParamValue::Integer(i) => Ok(ParamValue::Integer(*i)),
                ParamValue::String(s) => s.trim().parse::<i64>().map(ParamValue::Integer).map_err(
                    |_| {
                        ValidationError::InvalidParameter(format!(
                            "'{}' expects an integer, got '{}'",
                            self.name, s
                        ))
                    },
                ),
                ParamValue::Boolean(_) => Err(ValidationError::InvalidParameter(format!(
                    "'{}' expects an integer, got a boolean",
                    self.name
                ))),
            },
            ParameterType::Boolean => match value {
                ParamValue::Boolean(b) => Ok(ParamValue::Boolean(*b)),
                // Accept the usual truthy/falsy string spellings
                ParamValue::String(s) => match s.to_lowercase().as_str() {
                    "true" | "1" | "yes" | "on" => Ok(ParamValue::Boolean(true)),
                    "false" | "0" | "no" | "off" => Ok(ParamValue::Boolean(false)),
                    _ => Err(ValidationError::InvalidParameter(format!(
                        "'{}' expects a boolean, got '{}'",
                        self.name, s
                    ))),
                },
                ParamValue::Integer(i) => match i {
                    0 => Ok(ParamValue::Boolean(false)),
                    1 => Ok(ParamValue::Boolean(true)),
                    _ => Err(ValidationError::InvalidParameter(format!(
                        "'{}' expects a boolean, got {}",
                        self.name, i
                    ))),
                },
            },
            // Image, NodeType, and String are all string-valued; scalars are
            // stringified so `storage_size_gb: 100` style overrides of string
            // parameters still bind.
            ParameterType::Image | ParameterType::NodeType | ParameterType::String => {
                Ok(ParamValue::String(value.to_string()))
            }
        }
    }

    /// Check range, allowed-set, and required constraints on a coerced value.
    fn check(&self, value: &ParamValue) -> Result<(), ValidationError> {
        if let ParamValue::Integer(i) = value {
            if let Some((min, max)) = self.bounds {
                if *i < min || *i > max {
                    return Err(ValidationError::InvalidParameter(format!(
                        "'{}' must be between {} and {}, got {}",
                        self.name, min, max, i
                    )));
                }
            }
        }
        if let ParamValue::String(s) = value {
            if self.required && s.is_empty() {
                return Err(ValidationError::InvalidParameter(format!(
                    "'{}' is required and cannot be empty",
                    self.name
                )));
            }
            if let Some(allowed) = &self.allowed {
                if !allowed.iter().any(|a| a == s) {
                    return Err(ValidationError::InvalidParameter(format!(
                        "'{}' must be one of [{}], got '{}'",
                        self.name,
                        allowed.join(", "),
                        s
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Registry of declared parameters.
///
/// Declaration order is preserved because it determines presentation order
/// on the portal; it has no effect on binding semantics.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    specs: Vec<ParameterSpec>,
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter. Each name may be declared exactly once.
    pub fn declare(&mut self, spec: ParameterSpec) -> Result<(), ValidationError> {
        if self.specs.iter().any(|s| s.name == spec.name) {
            return Err(ValidationError::DuplicateParameter(spec.name));
        }
        self.specs.push(spec);
        Ok(())
    }

    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    /// Bind one concrete value per declared parameter, falling back to the
    /// declared default when no override is supplied.
    ///
    /// Returns the bound set together with every validation error found.
    /// Callers must treat a non-empty error list as a failed bind; the bound
    /// values are still returned so error reporting can show what was seen.
    pub fn bind(
        &self,
        overrides: &BTreeMap<String, ParamValue>,
    ) -> (BoundParameters, Vec<ValidationError>) {
        let mut errors = Vec::new();
        let mut values = BTreeMap::new();

        for spec in &self.specs {
            let raw = overrides.get(&spec.name).unwrap_or(&spec.default);
            match spec.coerce(raw) {
                Ok(value) => {
                    if let Err(e) = spec.check(&value) {
                        errors.push(e);
                    }
                    values.insert(spec.name.clone(), value);
                }
                Err(e) => errors.push(e),
            }
        }

        // Overrides that name no declared parameter are almost always typos;
        // reject them instead of silently ignoring them.
        for name in overrides.keys() {
            if !self.specs.iter().any(|s| &s.name == name) {
                errors.push(ValidationError::UnknownParameter(name.clone()));
            }
        }

        (BoundParameters { values }, errors)
    }
}

/// The immutable result of a successful bind.
#[derive(Debug, Clone)]
pub struct BoundParameters {
    values: BTreeMap<String, ParamValue>,
}

impl BoundParameters {
    pub fn integer(&self, name: &str) -> Result<i64, ValidationError> {
        match self.values.get(name) {
            Some(ParamValue::Integer(i)) => Ok(*i),
            Some(other) => Err(ValidationError::InvalidParameter(format!(
                "'{}' is not bound as an integer (got '{}')",
                name, other
            ))),
            None => Err(ValidationError::UnknownParameter(name.to_string())),
        }
    }

    pub fn string(&self, name: &str) -> Result<&str, ValidationError> {
        match self.values.get(name) {
            Some(ParamValue::String(s)) => Ok(s),
            Some(other) => Err(ValidationError::InvalidParameter(format!(
                "'{}' is not bound as a string (got '{}')",
                name, other
            ))),
            None => Err(ValidationError::UnknownParameter(name.to_string())),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool, ValidationError> {
        match self.values.get(name) {
            Some(ParamValue::Boolean(b)) => Ok(*b),
            Some(other) => Err(ValidationError::InvalidParameter(format!(
                "'{}' is not bound as a boolean (got '{}')",
                name, other
            ))),
            None => Err(ValidationError::UnknownParameter(name.to_string())),
        }
    }

    /// All bound values, keyed by parameter name.
    pub fn values(&self) -> &BTreeMap<String, ParamValue> {
        &self.values
    }
}
