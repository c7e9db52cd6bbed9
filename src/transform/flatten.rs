use serde_json::{Map, Value};

use super::categories::{Category, EntityKind};
use crate::error::{EtlError, Result};
use crate::model::EntityStats;

/// Separator between nested object keys in a flattened field name
pub const PATH_SEPARATOR: char = '.';

/// One flattened row: field name -> cell text, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatRecord {
    pub fields: Vec<(String, String)>,
}

impl StatRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Set a field, returning the value it replaced
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, value)),
            None => {
                self.fields.push((field, value));
                None
            }
        }
    }
}

/// Flatten a nested JSON object into dotted-path fields
pub fn flatten_object(object: &Map<String, Value>) -> StatRecord {
    let mut record = StatRecord::default();
    flatten_into(&mut record, None, object);
    record
}

fn flatten_into(record: &mut StatRecord, prefix: Option<&str>, object: &Map<String, Value>) {
    for (key, value) in object {
        let path = match prefix {
            Some(prefix) => format!("{}{}{}", prefix, PATH_SEPARATOR, key),
            None => key.clone(),
        };

        match value {
            Value::Object(nested) => flatten_into(record, Some(&path), nested),
            scalar => {
                let value = cell_text(scalar);
                if let Some(previous) = record.set(path.clone(), value.clone()) {
                    // A literal dotted key and a nested path both flatten to `path`
                    tracing::debug!(
                        field = %path,
                        %previous,
                        %value,
                        "flattened field collision; last value kept"
                    );
                }
            }
        }
    }
}

/// Render a JSON value as a CSV cell; null is an empty cell
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Arrays (and objects reaching here) keep their JSON form
        other => other.to_string(),
    }
}

/// Flatten one entity's category and tag it with the entity's identity.
///
/// `team_name` is only used for players, whose documents do not name their team.
pub fn flatten_entity_category(
    entity: &EntityStats,
    kind: EntityKind,
    category: &Category,
    team_name: Option<&str>,
) -> Result<StatRecord> {
    let id = identity(entity, kind)?;

    let section = entity.stats.get(category.key).ok_or_else(|| {
        EtlError::missing_key(category.key, format!("stats of {} {}", kind, id))
    })?;

    let mut record = match section {
        Value::Object(object) => flatten_object(object),
        Value::Null => StatRecord::default(),
        Value::Array(items) if items.is_empty() => StatRecord::default(),
        other => {
            return Err(EtlError::missing_key(
                category.key,
                format!("stats of {} {} (expected an object, got {})", kind, id, other),
            ))
        }
    };

    match kind {
        EntityKind::Team => {
            record.set("team_id", id);
            record.set("team_name", entity.required_meta("team_name")?);
        }
        EntityKind::Player => {
            record.set("player_id", id);
            record.set("player_name", entity.required_meta("player_name")?);
            record.set(
                "team_name",
                team_name
                    .map(str::to_string)
                    .or_else(|| entity.meta("team_name"))
                    .unwrap_or_default(),
            );
            record.set(
                "player_country_code",
                entity.meta("player_country_code").unwrap_or_default(),
            );
            record.set("player_age", entity.meta("player_age").unwrap_or_default());
            record.set("section", category.section);
        }
    }

    Ok(record)
}

fn identity(entity: &EntityStats, kind: EntityKind) -> Result<String> {
    match kind {
        EntityKind::Team => entity.required_meta("team_id"),
        EntityKind::Player => entity.required_meta("player_id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::categories::{GENERAL, SHOOTING};
    use serde_json::json;

    fn entity(value: Value) -> EntityStats {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flatten_nested_paths() {
        let object = json!({
            "matches_played": 38,
            "standard": {"goals": 68, "xg": {"total": 70.1, "np": 62.3}},
            "notes": null,
            "ranks": [1, 2]
        });
        let record = flatten_object(object.as_object().unwrap());

        let names: Vec<_> = record.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["matches_played", "standard.goals", "standard.xg.total", "standard.xg.np", "notes", "ranks"]
        );
        assert_eq!(record.get("standard.xg.total"), Some("70.1"));
        assert_eq!(record.get("notes"), Some(""));
        assert_eq!(record.get("ranks"), Some("[1,2]"));
    }

    #[test]
    fn test_dotted_key_and_nested_path_collide() {
        let object = json!({"a.b": 1, "a": {"b": 2}, "c": 3});
        let record = flatten_object(object.as_object().unwrap());
        assert_eq!(
            record.fields,
            vec![
                ("a.b".to_string(), "2".to_string()),
                ("c".to_string(), "3".to_string()),
            ]
        );

        let mut record = StatRecord::default();
        assert_eq!(record.set("goals", "1"), None);
        assert_eq!(record.set("goals", "4"), Some("1".to_string()));
        assert_eq!(record.get("goals"), Some("4"));
    }

    #[test]
    fn test_team_identity_appended_last() {
        let team = entity(json!({
            "meta_data": {"team_id": "18bb7c10", "team_name": "Arsenal"},
            "stats": {"stats": {"goals": 3, "assists": 1.5}}
        }));
        let record = flatten_entity_category(&team, EntityKind::Team, &GENERAL, None).unwrap();
        assert_eq!(
            record.fields,
            vec![
                ("goals".to_string(), "3".to_string()),
                ("assists".to_string(), "1.5".to_string()),
                ("team_id".to_string(), "18bb7c10".to_string()),
                ("team_name".to_string(), "Arsenal".to_string()),
            ]
        );
    }

    #[test]
    fn test_player_identity_and_section() {
        let player = entity(json!({
            "meta_data": {"player_id": "p1", "player_name": "Bukayo Saka", "player_country_code": "ENG", "player_age": 23},
            "stats": {"shooting": {"shots": 80}}
        }));
        let record =
            flatten_entity_category(&player, EntityKind::Player, &SHOOTING, Some("Arsenal")).unwrap();
        assert_eq!(record.get("shots"), Some("80"));
        assert_eq!(record.get("team_name"), Some("Arsenal"));
        assert_eq!(record.get("player_age"), Some("23"));
        assert_eq!(record.get("section"), Some("shooting"));
    }

    #[test]
    fn test_empty_category_still_yields_row() {
        let team = entity(json!({
            "meta_data": {"team_id": "1", "team_name": "Fulham"},
            "stats": {"stats": {}}
        }));
        let record = flatten_entity_category(&team, EntityKind::Team, &GENERAL, None).unwrap();
        assert_eq!(record.fields.len(), 2);
    }

    #[test]
    fn test_missing_category_is_error() {
        let team = entity(json!({
            "meta_data": {"team_id": "1", "team_name": "Fulham"},
            "stats": {}
        }));
        let err = flatten_entity_category(&team, EntityKind::Team, &GENERAL, None).unwrap_err();
        assert!(matches!(err, EtlError::MissingKey { ref key, .. } if key == "stats"));
    }
}
