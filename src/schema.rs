//! Declarative registry of configuration parameters.

use std::collections::{BTreeSet, HashMap};

use crate::wire::WireType;

/// Bijection between human-readable labels and wire codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: Vec<(String, u32)>,
}

impl LabelMap {
    pub fn new<L: Into<String>>(entries: impl IntoIterator<Item = (L, u32)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, code)| (label.into(), code))
                .collect(),
        }
    }

    pub fn code_of(&self, label: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, code)| *code)
    }

    pub fn label_of(&self, code: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(label, _)| label.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(label, code)| (label.as_str(), *code))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_bijective(&self, parameter: &str) -> Result<(), SchemaError> {
        for (i, (label, code)) in self.entries.iter().enumerate() {
            for (other_label, other_code) in &self.entries[i + 1..] {
                if label == other_label {
                    return Err(SchemaError::DuplicateLabel {
                        parameter: parameter.to_owned(),
                        label: label.clone(),
                    });
                }
                if code == other_code {
                    return Err(SchemaError::DuplicateCode {
                        parameter: parameter.to_owned(),
                        code: *code,
                    });
                }
            }
        }
        Ok(())
    }
}

/// How a parameter's user-level value is shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    /// Closed set of labels, each mapped to one wire code.
    Enum(LabelMap),
    /// Inclusive numeric range. Presets are named shortcuts inside the range.
    Bounded { min: u32, max: u32, presets: LabelMap },
    /// `true`/`false` carried as 1/0.
    Boolean,
}

/// One configuration parameter: wire identity, type and legal domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    name: String,
    id: u16,
    wire_type: WireType,
    kind: ParameterKind,
    unit: Option<&'static str>,
    read_only: bool,
    description: String,
}

impl ParameterDescriptor {
    pub fn bounded(
        name: impl Into<String>,
        id: u16,
        wire_type: WireType,
        min: u32,
        max: u32,
    ) -> Self {
        Self::with_kind(
            name,
            id,
            wire_type,
            ParameterKind::Bounded {
                min,
                max,
                presets: LabelMap::default(),
            },
        )
    }

    pub fn enumerated<L: Into<String>>(
        name: impl Into<String>,
        id: u16,
        wire_type: WireType,
        labels: impl IntoIterator<Item = (L, u32)>,
    ) -> Self {
        Self::with_kind(name, id, wire_type, ParameterKind::Enum(LabelMap::new(labels)))
    }

    pub fn boolean(name: impl Into<String>, id: u16) -> Self {
        Self::with_kind(name, id, WireType::Boolean, ParameterKind::Boolean)
    }

    fn with_kind(
        name: impl Into<String>,
        id: u16,
        wire_type: WireType,
        kind: ParameterKind,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            wire_type,
            kind,
            unit: None,
            read_only: false,
            description: String::new(),
        }
    }

    /// Adds named presets to a bounded parameter. Ignored for other kinds.
    pub fn with_presets<L: Into<String>>(
        mut self,
        presets: impl IntoIterator<Item = (L, u32)>,
    ) -> Self {
        if let ParameterKind::Bounded { presets: slot, .. } = &mut self.kind {
            *slot = LabelMap::new(presets);
        }
        self
    }

    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    pub fn unit(&self) -> Option<&'static str> {
        self.unit
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Inclusive numeric range, if the parameter has one.
    pub fn range(&self) -> Option<(u32, u32)> {
        match &self.kind {
            ParameterKind::Bounded { min, max, .. } => Some((*min, *max)),
            ParameterKind::Boolean => Some((0, 1)),
            ParameterKind::Enum(_) => None,
        }
    }

    fn validate(&self) -> Result<(), SchemaError> {
        let check_fits = |value: u32| {
            if self.wire_type.fits(value) {
                Ok(())
            } else {
                Err(SchemaError::ExceedsWireType {
                    parameter: self.name.clone(),
                    value,
                    wire_type: self.wire_type,
                })
            }
        };

        match &self.kind {
            ParameterKind::Enum(labels) => {
                if labels.is_empty() {
                    return Err(SchemaError::EmptyEnum(self.name.clone()));
                }
                labels.check_bijective(&self.name)?;
                labels.iter().try_for_each(|(_, code)| check_fits(code))
            }
            ParameterKind::Bounded { min, max, presets } => {
                if min > max {
                    return Err(SchemaError::InvalidRange {
                        parameter: self.name.clone(),
                        min: *min,
                        max: *max,
                    });
                }
                check_fits(*max)?;
                presets.check_bijective(&self.name)?;
                presets.iter().try_for_each(|(label, code)| {
                    if (*min..=*max).contains(&code) {
                        Ok(())
                    } else {
                        Err(SchemaError::PresetOutOfRange {
                            parameter: self.name.clone(),
                            label: label.to_owned(),
                            code,
                        })
                    }
                })
            }
            ParameterKind::Boolean => Ok(()),
        }
    }
}

/// Lookup of a parameter name that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parameter `{0}`")]
pub struct UnknownParameter(pub String);

/// Defect in a declarative parameter table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("attribute id {id} is used by both `{first}` and `{second}`")]
    DuplicateId { id: u16, first: String, second: String },
    #[error("parameter `{0}` is declared twice")]
    DuplicateName(String),
    #[error("parameter `{parameter}` maps label `{label}` twice")]
    DuplicateLabel { parameter: String, label: String },
    #[error("parameter `{parameter}` maps code {code} from more than one label")]
    DuplicateCode { parameter: String, code: u32 },
    #[error("parameter `{0}` has no enum labels")]
    EmptyEnum(String),
    #[error("parameter `{parameter}` has min {min} greater than max {max}")]
    InvalidRange { parameter: String, min: u32, max: u32 },
    #[error("parameter `{parameter}` uses value {value} which does not fit {wire_type}")]
    ExceedsWireType {
        parameter: String,
        value: u32,
        wire_type: WireType,
    },
    #[error("parameter `{parameter}` preset `{label}` ({code}) lies outside its range")]
    PresetOutOfRange {
        parameter: String,
        label: String,
        code: u32,
    },
}

/// Immutable name → descriptor registry, validated once at construction.
#[derive(Debug, Clone)]
pub struct ParameterSchema {
    descriptors: Vec<ParameterDescriptor>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<u16, usize>,
}

impl ParameterSchema {
    pub fn new(descriptors: Vec<ParameterDescriptor>) -> Result<Self, SchemaError> {
        let mut by_name = HashMap::with_capacity(descriptors.len());
        let mut by_id: HashMap<u16, usize> = HashMap::with_capacity(descriptors.len());

        for (index, descriptor) in descriptors.iter().enumerate() {
            descriptor.validate()?;

            if by_name.insert(descriptor.name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateName(descriptor.name.clone()));
            }
            if let Some(&first) = by_id.get(&descriptor.id) {
                return Err(SchemaError::DuplicateId {
                    id: descriptor.id,
                    first: descriptors[first].name.clone(),
                    second: descriptor.name.clone(),
                });
            }
            by_id.insert(descriptor.id, index);
        }

        Ok(Self {
            descriptors,
            by_name,
            by_id,
        })
    }

    pub fn lookup(&self, name: &str) -> Result<&ParameterDescriptor, UnknownParameter> {
        self.by_name
            .get(name)
            .map(|&index| &self.descriptors[index])
            .ok_or_else(|| UnknownParameter(name.to_owned()))
    }

    pub fn lookup_id(&self, id: u16) -> Option<&ParameterDescriptor> {
        self.by_id.get(&id).map(|&index| &self.descriptors[index])
    }

    pub fn writable_names(&self) -> BTreeSet<&str> {
        self.iter()
            .filter(|d| !d.read_only)
            .map(ParameterDescriptor::name)
            .collect()
    }

    pub fn read_only_names(&self) -> BTreeSet<&str> {
        self.iter()
            .filter(|d| d.read_only)
            .map(ParameterDescriptor::name)
            .collect()
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
