use serde::{Deserialize, Serialize};

use super::{credential_format::ClaimFormatDesignation, input_descriptor::JsonPath};

/// A DescriptorMapId is the id of the input descriptor an entry satisfies.
pub type DescriptorMapId = String;

/// What a holder sends back: the submission descriptor and the signed presentations it
/// points into.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationSubmission {
    pub presentation_submission: SubmissionDescriptor,
    #[serde(rename = "verifiablePresentation", default)]
    pub verifiable_presentation: Vec<String>,
}

impl PresentationSubmission {
    pub fn new(presentation_submission: SubmissionDescriptor, verifiable_presentation: Vec<String>) -> Self {
        Self {
            presentation_submission,
            verifiable_presentation,
        }
    }

    pub fn definition_id(&self) -> &str {
        &self.presentation_submission.definition_id
    }

    pub fn descriptor_map(&self) -> &[DescriptorMap] {
        &self.presentation_submission.descriptor_map
    }
}

/// Links submitted presentations back to the definition they answer.
///
/// See: <https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-submission>
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub definition_id: String,
    pub descriptor_map: Vec<DescriptorMap>,
}

impl SubmissionDescriptor {
    pub fn new(definition_id: String, descriptor_map: Vec<DescriptorMap>) -> Self {
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            definition_id,
            descriptor_map,
        }
    }
}

/// Points at one submitted claim. `path_nested` continues the walk inside the decoded claim
/// found at `path`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DescriptorMap {
    pub id: DescriptorMapId,
    pub format: ClaimFormatDesignation,
    pub path: JsonPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_nested: Option<Box<DescriptorMap>>,
}

impl DescriptorMap {
    pub fn new(
        id: impl Into<DescriptorMapId>,
        format: ClaimFormatDesignation,
        path: impl Into<JsonPath>,
    ) -> Self {
        Self {
            id: id.into(),
            format,
            path: path.into(),
            path_nested: None,
        }
    }

    pub fn set_path_nested(mut self, path_nested: DescriptorMap) -> Self {
        self.path_nested = Some(Box::new(path_nested));
        self
    }
}
