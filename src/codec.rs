//! User value ⇄ wire value translation for a single parameter.
//!
//! Both directions are pure: no I/O happens here, the caller hands the
//! resulting [`WriteRecord`] to a transport.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::schema::{ParameterDescriptor, ParameterKind};
use crate::wire::WriteRecord;

/// Human-level parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(i64),
    Label(String),
}

impl ParamValue {
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Label(_) => "label",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Label(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Label(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Bool(b) => Value::Bool(b),
            ParamValue::Number(n) => Value::from(n),
            ParamValue::Label(label) => Value::String(label),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("parameter `{0}` is read-only")]
    NotWritable(String),
    #[error("`{value}` is not a valid value for `{parameter}`")]
    InvalidEnumValue { parameter: String, value: String },
    #[error("{value} is outside [{min}, {max}] for `{parameter}`")]
    OutOfRange {
        parameter: String,
        value: i64,
        min: u32,
        max: u32,
    },
    #[error("device returned {value} for `{parameter}`, which has no label")]
    UnknownWireValue { parameter: String, value: u32 },
    #[error("`{parameter}` expects a {expected}, got a {actual}")]
    TypeMismatch {
        parameter: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Encodes `value` into a single attribute write for `descriptor`.
pub fn encode(
    descriptor: &ParameterDescriptor,
    value: &ParamValue,
) -> Result<WriteRecord, CodecError> {
    if descriptor.is_read_only() {
        return Err(CodecError::NotWritable(descriptor.name().to_owned()));
    }

    let wire_value = match descriptor.kind() {
        ParameterKind::Enum(labels) => {
            let label = value.as_label().ok_or_else(|| mismatch(descriptor, "label", value))?;
            labels
                .code_of(label)
                .ok_or_else(|| invalid_label(descriptor, label))?
        }
        ParameterKind::Bounded { min, max, presets } => match value {
            ParamValue::Number(n) => check_range(descriptor, *n, *min, *max)?,
            ParamValue::Label(label) => presets
                .code_of(label)
                .ok_or_else(|| invalid_label(descriptor, label))?,
            ParamValue::Bool(_) => return Err(mismatch(descriptor, "number", value)),
        },
        ParameterKind::Boolean => match value {
            ParamValue::Bool(b) => u32::from(*b),
            ParamValue::Number(n) => check_range(descriptor, *n, 0, 1)?,
            ParamValue::Label(_) => return Err(mismatch(descriptor, "boolean", value)),
        },
    };

    trace!("encoded `{}` = {value} as {wire_value}", descriptor.name());

    Ok(WriteRecord {
        id: descriptor.id(),
        wire_type: descriptor.wire_type(),
        value: wire_value,
    })
}

/// Decodes a value read from the device.
///
/// Numeric parameters pass through verbatim: the device is the authority on
/// what it stores, so no range check happens on this path.
pub fn decode(descriptor: &ParameterDescriptor, wire_value: u32) -> Result<ParamValue, CodecError> {
    match descriptor.kind() {
        ParameterKind::Enum(labels) => labels
            .label_of(wire_value)
            .map(ParamValue::from)
            .ok_or_else(|| CodecError::UnknownWireValue {
                parameter: descriptor.name().to_owned(),
                value: wire_value,
            }),
        ParameterKind::Bounded { .. } => Ok(ParamValue::Number(wire_value.into())),
        ParameterKind::Boolean => Ok(ParamValue::Bool(wire_value != 0)),
    }
}

/// Value a client should reflect in its state after a successful write.
pub fn acknowledged(
    descriptor: &ParameterDescriptor,
    record: &WriteRecord,
    sent: &ParamValue,
) -> ParamValue {
    match descriptor.kind() {
        ParameterKind::Enum(_) => sent.clone(),
        ParameterKind::Bounded { .. } => ParamValue::Number(record.value.into()),
        ParameterKind::Boolean => ParamValue::Bool(record.value != 0),
    }
}

fn check_range(
    descriptor: &ParameterDescriptor,
    value: i64,
    min: u32,
    max: u32,
) -> Result<u32, CodecError> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(CodecError::OutOfRange {
            parameter: descriptor.name().to_owned(),
            value,
            min,
            max,
        });
    }
    // In range, so it fits.
    u32::try_from(value).map_err(|_| CodecError::OutOfRange {
        parameter: descriptor.name().to_owned(),
        value,
        min,
        max,
    })
}

fn invalid_label(descriptor: &ParameterDescriptor, label: &str) -> CodecError {
    CodecError::InvalidEnumValue {
        parameter: descriptor.name().to_owned(),
        value: label.to_owned(),
    }
}

fn mismatch(
    descriptor: &ParameterDescriptor,
    expected: &'static str,
    value: &ParamValue,
) -> CodecError {
    CodecError::TypeMismatch {
        parameter: descriptor.name().to_owned(),
        expected,
        actual: value.shape(),
    }
}
