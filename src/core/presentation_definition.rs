use serde::{Deserialize, Serialize};

use super::{
    credential_format::ClaimFormatMap,
    input_descriptor::{random_id, InputDescriptor},
};
use crate::utils::{to_human_readable_string, NonEmptyVec};

/// What a verifier requires of a holder: one or more input descriptors and the claim formats
/// it can process.
///
/// See: <https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-definition>
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationDefinition {
    #[serde(default = "random_id")]
    id: String,
    input_descriptors: NonEmptyVec<InputDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(default, skip_serializing_if = "ClaimFormatMap::is_empty")]
    format: ClaimFormatMap,
}

impl PresentationDefinition {
    pub fn new(id: String, input_descriptor: InputDescriptor) -> Self {
        Self {
            id,
            input_descriptors: NonEmptyVec::new(input_descriptor),
            name: None,
            purpose: None,
            format: ClaimFormatMap::new(),
        }
    }

    /// Create a definition with a fresh UUID as its id.
    pub fn with_random_id(input_descriptor: InputDescriptor) -> Self {
        Self::new(random_id(), input_descriptor)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_input_descriptor(mut self, input_descriptor: InputDescriptor) -> Self {
        self.input_descriptors.push(input_descriptor);
        self
    }

    pub fn input_descriptors(&self) -> &[InputDescriptor] {
        &self.input_descriptors
    }

    /// Find the input descriptor a descriptor map entry points back to.
    pub fn input_descriptor(&self, id: &str) -> Option<&InputDescriptor> {
        self.input_descriptors.iter().find(|d| d.id() == id)
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

    pub fn set_format(mut self, format: ClaimFormatMap) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> &ClaimFormatMap {
        &self.format
    }

    /// Claim names requested across all input descriptors, in descriptor order.
    ///
    /// `$.vc.credentialSubject.familyName` -> `familyName`
    pub fn requested_fields(&self) -> Vec<String> {
        self.input_descriptors
            .iter()
            .flat_map(InputDescriptor::requested_fields)
            .collect()
    }

    /// Requested claim names for display, e.g. `Family Name`.
    pub fn requested_fields_human_readable(&self) -> Vec<String> {
        self.requested_fields()
            .into_iter()
            .map(to_human_readable_string)
            .collect()
    }
}

/// Anti-replay parameters the holder binds into the signed presentation.
///
/// `domain` ends up in the presentation `aud`, `challenge` in its `nonce`. Blank values are
/// not checked.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationDefinitionOptions {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub challenge: String,
}

impl PresentationDefinitionOptions {
    pub fn new(domain: impl Into<String>, challenge: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            challenge: challenge.into(),
        }
    }
}

/// A presentation definition together with the options the holder must honour.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationDefinitionRequest {
    pub presentation_definition: PresentationDefinition,
    #[serde(default)]
    pub options: PresentationDefinitionOptions,
}

impl PresentationDefinitionRequest {
    pub fn new(
        presentation_definition: PresentationDefinition,
        options: PresentationDefinitionOptions,
    ) -> Self {
        Self {
            presentation_definition,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input_descriptor::{Constraints, ConstraintsField};
    use serde_json::json;

    #[test]
    fn request_wire_format() {
        let value = json!({
            "presentation_definition": {
                "id": "32f54163-7166-48f1-93d8-ff217bdb0653",
                "input_descriptors": [{
                    "id": "wa_driver_license",
                    "name": "Washington State Business License",
                    "constraints": {
                        "fields": [{
                            "path": ["$.vc.credentialSubject.givenName", "$.credentialSubject.givenName"],
                            "filter": { "type": "string", "pattern": "^Alice$" }
                        }],
                        "limit_disclosure": "required"
                    }
                }],
                "format": { "jwt": { "alg": ["ES256K"] } }
            },
            "options": { "domain": "verifier.example.com", "challenge": "n-0S6_WzA2Mj" }
        });

        let json = value.to_string();
        let de = &mut serde_json::Deserializer::from_str(&json);
        let request: PresentationDefinitionRequest =
            serde_path_to_error::deserialize(de).unwrap();

        let definition = &request.presentation_definition;
        assert_eq!(definition.id(), "32f54163-7166-48f1-93d8-ff217bdb0653");
        assert!(definition.input_descriptor("wa_driver_license").is_some());
        assert!(definition.input_descriptor("unknown").is_none());
        assert_eq!(definition.requested_fields(), vec!["givenName"]);
        assert_eq!(definition.requested_fields_human_readable(), vec!["Given Name"]);
        assert_eq!(request.options.challenge, "n-0S6_WzA2Mj");

        assert_eq!(serde_json::to_value(&request).unwrap(), value);
    }

    #[test]
    fn missing_options_default_to_blank() {
        let request: PresentationDefinitionRequest = serde_json::from_value(json!({
            "presentation_definition": {
                "input_descriptors": [{ "id": "a", "constraints": {} }]
            }
        }))
        .unwrap();

        assert_eq!(request.options, PresentationDefinitionOptions::default());
        assert!(!request.presentation_definition.id().is_empty());
    }

    #[test]
    fn empty_input_descriptors_are_rejected() {
        let result = serde_json::from_value::<PresentationDefinition>(json!({
            "id": "x",
            "input_descriptors": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn requested_fields_span_descriptors() {
        let descriptor = |path: &str| {
            InputDescriptor::with_random_id(
                Constraints::new().add_constraint(ConstraintsField::new(path.into())),
            )
        };
        let definition = PresentationDefinition::with_random_id(descriptor("$.credentialSubject.email"))
            .add_input_descriptor(descriptor("$.vc.credentialSubject.family_name"));

        assert_eq!(
            definition.requested_fields_human_readable(),
            vec!["Email", "Family Name"]
        );
    }
}
