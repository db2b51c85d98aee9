
use crate::builder::{build_method, CreateMethodRequest};
use crate::gradable::GradingMethod;

/// Album rubric with a nested block two levels deep
pub(super) fn album() -> GradingMethod {
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
                    { "type": "block", "name": "Extras", "subComponents": [
                        { "type": "grade", "name": "Artwork", "min": 0, "max": 5, "step": 1 },
                        { "type": "grade", "name": "Liner notes", "min": 0, "max": 5, "step": 1 }
                    ], "actions": ["ADD"] }
                ], "actions": ["ADD"] }
            ],
            "actions": ["ADD"]
        }"#,
    )
    .unwrap();
    build_method(&request).unwrap()
}

pub(super) fn count(db: &super::Database, table: &str) -> i64 {
    db.conn
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}
