//! Document codec
//!
//! A method is stored as one JSON document. Root metadata sits next to the
//! root block's components and actions rather than wrapping a root record:
//!
//! ```json
//! {
//!   "id": "…", "name": "Album", "creator_id": "u1",
//!   "created_at": "2024-01-01T00:00:00Z", "is_public": true,
//!   "components": [
//!     { "kind": "grade", "name": "Lyrics", "min": 1.0, "max": 10.0, "step": 0.5 },
//!     { "kind": "block", "name": "Production", "components": [ … ], "actions": ["ADD"] }
//!   ],
//!   "actions": ["ADD"]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::corrupt;
use crate::error::{RubricError, Result};
use crate::gradable::{Action, Gradable, Grade, GradingBlock, GradingMethod};

/// Document format version written into every document
pub const DOCUMENT_VERSION: u32 = 1;

/// Serialized form of a whole method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub id: Uuid,
    pub name: String,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
    pub components: Vec<NodeRecord>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// Serialized form of one node, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeRecord {
    Grade {
        name: String,
        min: f64,
        max: f64,
        step: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    Block {
        name: String,
        components: Vec<NodeRecord>,
        #[serde(default)]
        actions: Vec<Action>,
    },
}

/// Encode a method into its document form
pub fn encode(method: &GradingMethod) -> MethodDocument {
    MethodDocument {
        version: DOCUMENT_VERSION,
        id: method.id(),
        name: method.name().to_string(),
        creator_id: method.creator_id().to_string(),
        created_at: method.created_at(),
        is_public: method.is_public(),
        components: method.components().iter().map(encode_node).collect(),
        actions: method.actions().to_vec(),
    }
}

/// Encode a single node and everything below it
pub fn encode_node(node: &Gradable) -> NodeRecord {
    match node {
        Gradable::Grade(grade) => NodeRecord::Grade {
            name: grade.name().to_string(),
            min: grade.min(),
            max: grade.max(),
            step: grade.step(),
            description: grade.description().map(str::to_string),
            value: grade.current(),
        },
        Gradable::Block(block) => NodeRecord::Block {
            name: block.name().to_string(),
            components: block.components().iter().map(encode_node).collect(),
            actions: block.actions().to_vec(),
        },
    }
}

/// Rebuild a method from its document form
pub fn decode(document: &MethodDocument) -> Result<GradingMethod> {
    if document.version > DOCUMENT_VERSION {
        return Err(RubricError::integrity(format!(
            "document for method {} has unsupported version {}",
            document.id, document.version
        )));
    }

    let mut method = GradingMethod::restore(
        document.id,
        document.created_at,
        &document.name,
        &document.creator_id,
        document.is_public,
    );
    fill_block(method.root_mut(), &document.components, &document.actions)?;

    let context = format!("document for method {}", document.id);
    method.validate().map_err(|e| corrupt(&context, e))?;
    Ok(method)
}

/// Rebuild a single node and everything below it
pub fn decode_node(record: &NodeRecord) -> Result<Gradable> {
    match record {
        NodeRecord::Grade {
            name,
            min,
            max,
            step,
            description,
            value,
        } => {
            let mut grade = Grade::new(name, *min, *max, *step, description.clone())
                .map_err(|e| corrupt("grade record", e))?;
            if let Some(value) = value {
                grade
                    .update_grade(*value)
                    .map_err(|e| corrupt("grade record", e))?;
            }
            Ok(grade.into())
        }
        NodeRecord::Block {
            name,
            components,
            actions,
        } => {
            let mut block = GradingBlock::new(name);
            fill_block(&mut block, components, actions)?;
            Ok(block.into())
        }
    }
}

fn fill_block(block: &mut GradingBlock, components: &[NodeRecord], actions: &[Action]) -> Result<()> {
    for record in components {
        block.add_grade(decode_node(record)?);
    }
    for action in actions {
        block.add_action(*action);
    }
    Ok(())
}

/// Render a document as JSON text
pub fn to_json(document: &MethodDocument, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    Ok(json)
}

/// Parse JSON text into a document.
///
/// Unknown node kinds, unknown action tags and missing fields are all
/// reported as structural integrity errors.
pub fn from_json(content: &str) -> Result<MethodDocument> {
    serde_json::from_str(content)
        .map_err(|e| RubricError::integrity(format!("malformed method document: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_method, CreateMethodRequest};
    use crate::grader::{apply_grades, GradeInput};

    fn album() -> GradingMethod {
        let request = CreateMethodRequest::from_json(
            r#"{
                "name": "Album",
                "creatorId": "user-1",
                "isPublic": true,
                "components": [
                    { "type": "grade", "name": "Lyrics", "min": 1, "max": 10, "step": 0.5,
                      "description": "Words" },
                    { "type": "block", "name": "Production", "subComponents": [
                        { "type": "grade", "name": "Mixing", "min": 1, "max": 10, "step": 0.5 },
                        { "type": "grade", "name": "Mastering", "min": 0, "max": 4, "step": 1 },
                        { "type": "block", "name": "Extras", "subComponents": [
                            { "type": "grade", "name": "Artwork", "min": 0, "max": 5, "step": 1 }
                        ] }
                    ], "actions": ["MULTIPLY", "SUBTRACT"] }
                ],
                "actions": ["DIVIDE"]
            }"#,
        )
        .unwrap();
        build_method(&request).unwrap()
    }

    #[test]
    fn test_template_round_trip() {
        let method = album();
        let decoded = decode(&encode(&method)).unwrap();
        assert_eq!(decoded, method);
    }

    #[test]
    fn test_graded_round_trip_through_json() {
        let mut method = album();
        apply_grades(
            &mut method,
            &[
                GradeInput::new("Lyrics", 8.0),
                GradeInput::new("Production.Mixing", 6.5),
                GradeInput::new("Production.Extras.Artwork", 2.0),
            ],
        )
        .unwrap();

        for pretty in [true, false] {
            let json = to_json(&encode(&method), pretty).unwrap();
            let decoded = decode(&from_json(&json).unwrap()).unwrap();
            assert_eq!(decoded, method);
        }
    }

    #[test]
    fn test_layout_keeps_metadata_beside_root_components() {
        let method = album();
        let value = serde_json::to_value(encode(&method)).unwrap();

        assert_eq!(value["name"], "Album");
        assert_eq!(value["is_public"], true);
        assert_eq!(value["actions"], serde_json::json!(["DIVIDE"]));
        assert_eq!(value["components"][0]["kind"], "grade");
        assert_eq!(value["components"][0]["description"], "Words");
        assert!(value["components"][0].get("value").is_none());
        assert_eq!(value["components"][1]["kind"], "block");
        assert_eq!(
            value["components"][1]["actions"],
            serde_json::json!(["MULTIPLY", "SUBTRACT"])
        );
        assert_eq!(
            value["components"][1]["components"][2]["components"][0]["name"],
            "Artwork"
        );
    }

    #[test]
    fn test_unknown_kind_is_integrity_error() {
        let method = album();
        let mut value = serde_json::to_value(encode(&method)).unwrap();
        value["components"][0]["kind"] = serde_json::json!("slider");

        let err = from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, RubricError::StructuralIntegrity { .. }));
    }

    #[test]
    fn test_unknown_action_is_integrity_error() {
        let method = album();
        let mut value = serde_json::to_value(encode(&method)).unwrap();
        value["actions"] = serde_json::json!(["MODULO"]);

        assert!(matches!(
            from_json(&value.to_string()).unwrap_err(),
            RubricError::StructuralIntegrity { .. }
        ));
    }

    #[test]
    fn test_action_count_mismatch_is_integrity_error() {
        let mut document = encode(&album());
        document.actions.push(Action::Add);

        assert!(matches!(
            decode(&document).unwrap_err(),
            RubricError::StructuralIntegrity { .. }
        ));
    }

    #[test]
    fn test_persisted_value_out_of_range_is_integrity_error() {
        let mut document = encode(&album());
        if let NodeRecord::Grade { value, .. } = &mut document.components[0] {
            *value = Some(42.0);
        }
        assert!(matches!(
            decode(&document).unwrap_err(),
            RubricError::StructuralIntegrity { .. }
        ));
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut document = encode(&album());
        document.version = DOCUMENT_VERSION + 1;
        assert!(decode(&document).is_err());
    }
}
