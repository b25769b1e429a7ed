use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::debug;
use uuid::Uuid;

use super::{
    credential_format::{ClaimFormatDesignation, ClaimFormatMap},
    descriptor_path::{DescriptorPath, PathValue},
};
use crate::utils::{to_human_readable_string, NonEmptyVec};

/// A JSONPath into a credential, e.g. `$.vc.credentialSubject.email`.
pub type JsonPath = String;

pub(crate) fn random_id() -> String {
    Uuid::new_v4().to_string()
}

/// One named requirement of a presentation definition.
///
/// A descriptor without an `id` on the wire gets a random one.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputDescriptor {
    #[serde(default = "random_id")]
    id: String,
    #[serde(default)]
    constraints: Constraints,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(default, skip_serializing_if = "ClaimFormatMap::is_empty")]
    format: ClaimFormatMap,
}

impl InputDescriptor {
    pub fn new(id: String, constraints: Constraints) -> Self {
        Self {
            id,
            constraints,
            ..Default::default()
        }
    }

    /// Create a descriptor with a fresh UUID as its id.
    pub fn with_random_id(constraints: Constraints) -> Self {
        Self::new(random_id(), constraints)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn set_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    pub fn set_purpose(mut self, purpose: String) -> Self {
        self.purpose = Some(purpose);
        self
    }

    pub fn purpose(&self) -> Option<&String> {
        self.purpose.as_ref()
    }

    /// Restrict the formats and algorithms accepted for this descriptor.
    pub fn set_format(mut self, format: ClaimFormatMap) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> &ClaimFormatMap {
        &self.format
    }

    pub fn format_designations(&self) -> HashSet<&ClaimFormatDesignation> {
        self.format.keys().collect()
    }

    /// The last segment of every field path, e.g. `email` for `$.vc.credentialSubject.email`.
    pub fn requested_fields(&self) -> Vec<String> {
        self.constraints
            .fields()
            .iter()
            .flat_map(ConstraintsField::requested_fields)
            .collect()
    }

    /// Check a decoded credential against the descriptor's field constraints.
    ///
    /// Returns the reason of the first failing field.
    pub fn evaluate(&self, credential: &Json) -> Result<(), String> {
        self.constraints.evaluate(credential)
    }
}

/// Field constraints a holder must satisfy for an [InputDescriptor].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<ConstraintsField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_disclosure: Option<ConstraintsLimitDisclosure>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_constraint(mut self, field: ConstraintsField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[ConstraintsField] {
        &self.fields
    }

    pub fn set_limit_disclosure(mut self, limit_disclosure: ConstraintsLimitDisclosure) -> Self {
        self.limit_disclosure = Some(limit_disclosure);
        self
    }

    pub fn limit_disclosure(&self) -> Option<&ConstraintsLimitDisclosure> {
        self.limit_disclosure.as_ref()
    }

    /// Whether any field must be satisfied.
    pub fn is_required(&self) -> bool {
        self.fields.iter().any(ConstraintsField::is_required)
    }

    /// Fields are only checked when disclosure is limited to what was requested.
    pub fn evaluate(&self, credential: &Json) -> Result<(), String> {
        if self.limit_disclosure != Some(ConstraintsLimitDisclosure::Required) {
            return Ok(());
        }

        let path = DescriptorPath::new(credential);

        for field in &self.fields {
            if field.is_optional() {
                debug!("skipping optional field {}", field.display_name());
                continue;
            }
            field.evaluate(&path)?;
        }

        Ok(())
    }
}

/// A single claim requirement: where to look for it and what it must look like.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstraintsField {
    path: NonEmptyVec<JsonPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<InputFieldFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    optional: Option<bool>,
}

impl From<NonEmptyVec<JsonPath>> for ConstraintsField {
    fn from(path: NonEmptyVec<JsonPath>) -> Self {
        Self {
            path,
            id: None,
            purpose: None,
            name: None,
            filter: None,
            optional: None,
        }
    }
}

impl ConstraintsField {
    pub fn new(path: JsonPath) -> Self {
        NonEmptyVec::new(path).into()
    }

    pub fn add_path(mut self, path: JsonPath) -> Self {
        self.path.push(path);
        self
    }

    /// Candidate paths, tried in order.
    pub fn path(&self) -> &NonEmptyVec<JsonPath> {
        &self.path
    }

    pub fn set_id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }

    pub fn set_purpose(mut self, purpose: String) -> Self {
        self.purpose = Some(purpose);
        self
    }

    pub fn purpose(&self) -> Option<&String> {
        self.purpose.as_ref()
    }

    pub fn set_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    pub fn set_filter(mut self, filter: InputFieldFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn filter(&self) -> Option<&InputFieldFilter> {
        self.filter.as_ref()
    }

    pub fn set_optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optional.unwrap_or(false)
    }

    pub fn is_required(&self) -> bool {
        !self.is_optional()
    }

    /// The last segment of each path, casing untouched.
    ///
    /// `$.vc.credentialSubject.dateOfBirth` yields `dateOfBirth`.
    pub fn requested_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();

        for path in self.path.iter() {
            let last = path
                .rsplit(&['.', '[', ']', '\'', '`'][..])
                .find(|segment| !segment.is_empty());

            // Alternative paths usually end in the same claim.
            if let Some(last) = last.filter(|last| !fields.iter().any(|f| f == last)) {
                fields.push(last.to_owned());
            }
        }

        fields
    }

    /// `dateOfBirth` becomes `Date Of Birth`.
    pub fn requested_fields_human_readable(&self) -> Vec<String> {
        self.requested_fields()
            .into_iter()
            .map(to_human_readable_string)
            .collect()
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path[0])
    }

    /// The first path holding a value decides the outcome.
    pub fn evaluate(&self, credential: &DescriptorPath) -> Result<(), String> {
        let mut reason = None;

        for path in self.path.iter() {
            let Some(value) = credential.get_value(path) else {
                reason = Some(format!("Field value for path {path} is null"));
                continue;
            };

            let Some(filter) = &self.filter else {
                return Err(format!(
                    "Input field filter for {} is null",
                    self.display_name()
                ));
            };

            return filter.evaluate(&value).inspect_err(|reason| {
                debug!("field {} failed its filter: {reason}", self.display_name());
            });
        }

        Err(reason.unwrap_or_else(|| format!("No path resolved for {}", self.display_name())))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintsLimitDisclosure {
    Required,
    Preferred,
}

/// The single check a field value must pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterKind {
    /// A regular expression the whole value must match, or a literal it may equal.
    Pattern(String),
    Enum(Vec<String>),
    Const(Vec<String>),
    Value(String),
}

/// A field filter carrying exactly one [FilterKind].
///
/// On the wire this is `{"type": .., "pattern" | "enum" | "const" | "value": ..}`. When more
/// than one kind is present, only the first of pattern, enum, const and value is kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInputFieldFilter", into = "RawInputFieldFilter")]
pub struct InputFieldFilter {
    type_: Option<String>,
    kind: FilterKind,
}

impl InputFieldFilter {
    pub fn new(kind: FilterKind) -> Self {
        Self { type_: None, kind }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::new(FilterKind::Pattern(pattern.into()))
    }

    pub fn one_of(values: Vec<String>) -> Self {
        Self::new(FilterKind::Enum(values))
    }

    pub fn constant(values: Vec<String>) -> Self {
        Self::new(FilterKind::Const(values))
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self::new(FilterKind::Value(value.into()))
    }

    pub fn set_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    pub fn type_(&self) -> Option<&str> {
        self.type_.as_deref()
    }

    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    pub fn evaluate(&self, value: &PathValue) -> Result<(), String> {
        let value = value.to_string();

        match &self.kind {
            FilterKind::Pattern(pattern) => {
                if value == *pattern || matches_whole(pattern, &value) {
                    Ok(())
                } else {
                    Err(format!("Field value {value} does not match pattern {pattern}"))
                }
            }
            FilterKind::Enum(allowed) => {
                if allowed.contains(&value) {
                    Ok(())
                } else {
                    Err(format!(
                        "Field value {value} is not one of the enum values {allowed:?}"
                    ))
                }
            }
            FilterKind::Const(allowed) => {
                if allowed.contains(&value) {
                    Ok(())
                } else {
                    Err(format!(
                        "Field value {value} is not one of the const values {allowed:?}"
                    ))
                }
            }
            FilterKind::Value(expected) => {
                if value == *expected {
                    Ok(())
                } else {
                    Err(format!("Field value {value} does not equal {expected}"))
                }
            }
        }
    }
}

fn matches_whole(pattern: &str, value: &str) -> bool {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => regex.is_match(value),
        Err(e) => {
            debug!("filter pattern {pattern} is not a valid regex: {e}");
            false
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawInputFieldFilter {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    enum_: Option<Vec<String>>,
    #[serde(
        rename = "const",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "one_or_many"
    )]
    const_: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|values| match values {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }),
    )
}

impl TryFrom<RawInputFieldFilter> for InputFieldFilter {
    type Error = String;

    fn try_from(raw: RawInputFieldFilter) -> Result<Self, Self::Error> {
        let kind = raw
            .pattern
            .map(FilterKind::Pattern)
            .or(raw.enum_.map(FilterKind::Enum))
            .or(raw.const_.map(FilterKind::Const))
            .or(raw.value.map(FilterKind::Value))
            .ok_or("filter must set one of pattern, enum, const or value")?;

        Ok(Self {
            type_: raw.type_,
            kind,
        })
    }
}

impl From<InputFieldFilter> for RawInputFieldFilter {
    fn from(filter: InputFieldFilter) -> Self {
        let mut raw = RawInputFieldFilter {
            type_: filter.type_,
            pattern: None,
            enum_: None,
            const_: None,
            value: None,
        };
        match filter.kind {
            FilterKind::Pattern(pattern) => raw.pattern = Some(pattern),
            FilterKind::Enum(values) => raw.enum_ = Some(values),
            FilterKind::Const(values) => raw.const_ = Some(values),
            FilterKind::Value(value) => raw.value = Some(value),
        }
        raw
    }
}
