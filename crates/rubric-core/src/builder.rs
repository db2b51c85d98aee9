//! Turning creation requests into grading trees
//!
//! A request is a flat, ordered description of one level of the tree:
//! component descriptors plus the actions combining them. Block descriptors
//! carry the same shape for their own level. Building is purely structural
//! and never sets a leaf value.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RubricError, Result};
use crate::gradable::{Action, Gradable, Grade, GradingBlock, GradingMethod};
use crate::grader::PATH_SEPARATOR;

/// Descriptor for a single leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeDescriptor {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Descriptor for a nested block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub name: String,
    #[serde(alias = "subComponents")]
    pub sub_components: Vec<ComponentDescriptor>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One component of a creation request, discriminated by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComponentDescriptor {
    Grade(GradeDescriptor),
    Block(BlockDescriptor),
    /// A descriptor whose `type` is not one the builder knows
    Unsupported { kind: String },
}

impl<'de> Deserialize<'de> for ComponentDescriptor {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        match kind.as_str() {
            "grade" => GradeDescriptor::deserialize(value)
                .map(ComponentDescriptor::Grade)
                .map_err(D::Error::custom),
            "block" => BlockDescriptor::deserialize(value)
                .map(ComponentDescriptor::Block)
                .map_err(D::Error::custom),
            _ => Ok(ComponentDescriptor::Unsupported { kind }),
        }
    }
}

/// Create/update request for a grading method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMethodRequest {
    pub name: String,
    #[serde(alias = "creatorId")]
    pub creator_id: String,
    #[serde(default, alias = "isPublic")]
    pub is_public: bool,
    pub components: Vec<ComponentDescriptor>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl CreateMethodRequest {
    /// Parse a request from JSON text. Malformed requests are validation
    /// errors, not I/O failures.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| RubricError::invalid_value("method request", e))
    }
}

/// Build a new grading method from a creation request
pub fn build_method(request: &CreateMethodRequest) -> Result<GradingMethod> {
    let mut method = GradingMethod::new(&request.name, &request.creator_id, request.is_public);
    build_into(method.root_mut(), &request.components, &request.actions)?;
    method.validate()?;

    tracing::debug!(
        method_id = %method.id(),
        leaves = method.root().leaf_count(),
        "build_method"
    );
    Ok(method)
}

/// Build a replacement tree for an existing method.
///
/// Identity, creation time and creator are kept; name, visibility and the
/// whole tree come from the request.
pub fn rebuild_method(
    existing: &GradingMethod,
    request: &CreateMethodRequest,
) -> Result<GradingMethod> {
    let mut method = GradingMethod::restore(
        existing.id(),
        existing.created_at(),
        &request.name,
        existing.creator_id(),
        request.is_public,
    );
    build_into(method.root_mut(), &request.components, &request.actions)?;
    method.validate()?;
    Ok(method)
}

/// Append components and actions of one level to `target`
pub fn build_into(
    target: &mut GradingBlock,
    components: &[ComponentDescriptor],
    actions: &[Action],
) -> Result<()> {
    if components.is_empty() {
        return Err(RubricError::EmptyBlock {
            name: target.name().to_string(),
        });
    }
    if actions.len() + 1 != components.len() {
        return Err(RubricError::ActionCountMismatch {
            name: target.name().to_string(),
            children: components.len(),
            actions: actions.len(),
        });
    }

    for (i, descriptor) in components.iter().enumerate() {
        target.add_grade(build_component(descriptor)?);
        if let Some(action) = actions.get(i) {
            target.add_action(*action);
        }
    }
    Ok(())
}

fn build_component(descriptor: &ComponentDescriptor) -> Result<Gradable> {
    match descriptor {
        ComponentDescriptor::Grade(grade) => Ok(Grade::new(
            check_name(&grade.name)?,
            grade.min,
            grade.max,
            grade.step,
            grade.description.clone(),
        )?
        .into()),
        ComponentDescriptor::Block(block) => {
            let mut nested = GradingBlock::new(check_name(&block.name)?);
            build_into(&mut nested, &block.sub_components, &block.actions)?;
            Ok(nested.into())
        }
        ComponentDescriptor::Unsupported { kind } => {
            Err(RubricError::UnsupportedComponentType(kind.clone()))
        }
    }
}

/// Component names are path segments and may not contain the separator
fn check_name(name: &str) -> Result<&str> {
    if name.contains(PATH_SEPARATOR) {
        return Err(RubricError::invalid_value("component name", name));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALBUM_REQUEST: &str = r#"{
        "name": "Album",
        "creatorId": "user-1",
        "isPublic": true,
        "components": [
            { "type": "grade", "name": "Lyrics", "min": 1, "max": 10, "step": 0.5 },
            {
                "type": "block",
                "name": "Production",
                "subComponents": [
                    { "type": "grade", "name": "Mixing", "min": 1, "max": 10, "step": 0.5 },
                    { "type": "grade", "name": "Mastering", "min": 1, "max": 10, "step": 0.5,
                      "description": "Loudness and balance" }
                ],
                "actions": ["ADD"]
            }
        ],
        "actions": ["ADD"]
    }"#;

    #[test]
    fn test_build_album_request() {
        let request = CreateMethodRequest::from_json(ALBUM_REQUEST).unwrap();
        let method = build_method(&request).unwrap();

        assert_eq!(method.name(), "Album");
        assert_eq!(method.creator_id(), "user-1");
        assert!(method.is_public());
        assert_eq!(method.actions(), &[Action::Add]);
        assert_eq!(method.components()[0].name(), "Lyrics");

        let production = method.components()[1].as_block().unwrap();
        assert_eq!(production.name(), "Production");
        assert_eq!(production.actions(), &[Action::Add]);
        let mastering = production.components()[1].as_grade().unwrap();
        assert_eq!(mastering.description(), Some("Loudness and balance"));

        assert_eq!(method.min().unwrap(), 3.0);
        assert_eq!(method.max().unwrap(), 30.0);
        assert!(!method.is_graded());
    }

    #[test]
    fn test_snake_case_fields_accepted() {
        let json = r#"{
            "name": "Single",
            "creator_id": "user-2",
            "components": [
                { "type": "block", "name": "Only", "sub_components": [
                    { "type": "grade", "name": "x", "min": 0, "max": 5, "step": 1 }
                ] }
            ]
        }"#;
        let request = CreateMethodRequest::from_json(json).unwrap();
        assert!(!request.is_public);
        let method = build_method(&request).unwrap();
        assert_eq!(method.root().leaf_count(), 1);
    }

    #[test]
    fn test_unsupported_component_type() {
        let json = r#"{
            "name": "Odd",
            "creatorId": "user-1",
            "components": [
                { "type": "grade", "name": "a", "min": 0, "max": 5, "step": 1 },
                { "type": "slider", "name": "b" }
            ],
            "actions": ["ADD"]
        }"#;
        let request = CreateMethodRequest::from_json(json).unwrap();
        match build_method(&request).unwrap_err() {
            RubricError::UnsupportedComponentType(kind) => assert_eq!(kind, "slider"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_action_count_checked_per_level() {
        let mut request = CreateMethodRequest::from_json(ALBUM_REQUEST).unwrap();
        request.actions.push(Action::Multiply);
        assert!(matches!(
            build_method(&request).unwrap_err(),
            RubricError::ActionCountMismatch { .. }
        ));

        let mut request = CreateMethodRequest::from_json(ALBUM_REQUEST).unwrap();
        if let ComponentDescriptor::Block(block) = &mut request.components[1] {
            block.actions.clear();
        }
        match build_method(&request).unwrap_err() {
            RubricError::ActionCountMismatch { name, .. } => assert_eq!(name, "Production"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_request_rejected() {
        let request = CreateMethodRequest {
            name: "Empty".to_string(),
            creator_id: "user-1".to_string(),
            is_public: false,
            components: Vec::new(),
            actions: Vec::new(),
        };
        assert!(matches!(
            build_method(&request).unwrap_err(),
            RubricError::EmptyBlock { .. }
        ));
    }

    #[test]
    fn test_invalid_bounds_surface() {
        let request = CreateMethodRequest {
            name: "Bad".to_string(),
            creator_id: "user-1".to_string(),
            is_public: false,
            components: vec![ComponentDescriptor::Grade(GradeDescriptor {
                name: "inverted".to_string(),
                min: 5.0,
                max: 1.0,
                step: 1.0,
                description: None,
            })],
            actions: Vec::new(),
        };
        assert!(matches!(
            build_method(&request).unwrap_err(),
            RubricError::InvalidBounds { .. }
        ));
    }

    #[test]
    fn test_dotted_component_names_rejected() {
        let mut request = CreateMethodRequest::from_json(ALBUM_REQUEST).unwrap();
        if let ComponentDescriptor::Grade(grade) = &mut request.components[0] {
            grade.name = "Production.Mixing".to_string();
        }
        match build_method(&request).unwrap_err() {
            RubricError::InvalidValue { context, value } => {
                assert_eq!(context, "component name");
                assert_eq!(value, "Production.Mixing");
            }
            other => panic!("unexpected error: {}", other),
        }

        let mut request = CreateMethodRequest::from_json(ALBUM_REQUEST).unwrap();
        if let ComponentDescriptor::Block(block) = &mut request.components[1] {
            block.name = "Post.Production".to_string();
        }
        assert!(matches!(
            build_method(&request).unwrap_err(),
            RubricError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_method_name_may_contain_dots() {
        let mut request = CreateMethodRequest::from_json(ALBUM_REQUEST).unwrap();
        request.name = "Album v1.2".to_string();
        assert_eq!(build_method(&request).unwrap().name(), "Album v1.2");
    }

    #[test]
    fn test_rebuild_keeps_identity() {
        let request = CreateMethodRequest::from_json(ALBUM_REQUEST).unwrap();
        let original = build_method(&request).unwrap();

        let mut changed = request.clone();
        changed.name = "Album v2".to_string();
        changed.is_public = false;
        changed.components.truncate(1);
        changed.actions.clear();

        let rebuilt = rebuild_method(&original, &changed).unwrap();
        assert_eq!(rebuilt.id(), original.id());
        assert_eq!(rebuilt.created_at(), original.created_at());
        assert_eq!(rebuilt.creator_id(), "user-1");
        assert_eq!(rebuilt.name(), "Album v2");
        assert!(!rebuilt.is_public());
        assert_eq!(rebuilt.components().len(), 1);
    }
}
