//! Field mapper
//!
//! Flat translation between a JSON object and a record's scalar attributes.

use serde_json::{Map, Value};

use crate::error::{WrapperError, WrapperResult};
use crate::record::Record;
use crate::schema::{EntityType, Wrapper};
use crate::value::Scalar;

/// Copy mapped JSON keys onto the record
///
/// Keys missing from `json` leave the record untouched. A mapped key whose
/// local attribute is not declared fails with `FieldMissing`.
pub fn apply_inbound(
    entity: &EntityType,
    wrapper: &Wrapper,
    record: &mut Record,
    json: &Value,
) -> WrapperResult<()> {
    let Some(object) = json.as_object() else {
        return Ok(());
    };

    for (remote, local) in wrapper.fields() {
        let Some(value) = object.get(remote) else {
            continue;
        };
        let kind = entity
            .attribute_kind(local)
            .ok_or_else(|| WrapperError::FieldMissing {
                attribute: local.to_string(),
                entity: entity.name().to_string(),
            })?;
        record.set(local, Scalar::coerce(kind, value));
    }

    Ok(())
}

/// Scalar part of an outbound payload, keyed by remote field names
pub fn build_outbound(entity: &EntityType, wrapper: &Wrapper, record: &Record) -> Map<String, Value> {
    let mut body = Map::new();
    for (attribute, _) in entity.attributes() {
        let Some(value) = record.value(attribute) else {
            continue;
        };
        if let Some(remote) = wrapper.remote_key_for(attribute) {
            body.insert(remote.to_string(), value.to_json());
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use serde_json::json;

    #[test]
    fn test_apply_inbound() {
        let schema = testing::schema();
        let user = schema.lookup("User").unwrap();
        let entity = schema.entity(user);
        let wrapper = schema.wrapper(user).unwrap();

        let mut record = Record::new(user);
        let json = json!({
            "id": 10,
            "name": "Peter",
            "email": "peter@pan.de",
            "age": 14,
            "admin": false,
            "unknown": "ignored"
        });
        apply_inbound(entity, wrapper, &mut record, &json).unwrap();

        assert_eq!(record.id(), Some(10));
        assert_eq!(record.value("name"), Some(Scalar::Text("Peter".into())));
        assert_eq!(record.value("age"), Some(Scalar::Int(14)));
        assert_eq!(record.value("admin"), Some(Scalar::Bool(false)));
        assert!(record.value("unknown").is_none());
    }

    #[test]
    fn test_apply_inbound_leaves_absent_keys() {
        let schema = testing::schema();
        let user = schema.lookup("User").unwrap();
        let entity = schema.entity(user);
        let wrapper = schema.wrapper(user).unwrap();

        let mut record = Record::new(user).with("name", "Peter").with("age", 14);
        apply_inbound(entity, wrapper, &mut record, &json!({ "age": 15 })).unwrap();

        assert_eq!(record.value("name"), Some(Scalar::Text("Peter".into())));
        assert_eq!(record.value("age"), Some(Scalar::Int(15)));
    }

    #[test]
    fn test_apply_inbound_parses_dates() {
        let schema = testing::schema();
        let task = schema.lookup("Task").unwrap();
        let entity = schema.entity(task);
        let wrapper = schema.wrapper(task).unwrap();

        let mut record = Record::new(task);
        let json = json!({ "due_date": "2014-05-29T10:59:39+02:00" });
        apply_inbound(entity, wrapper, &mut record, &json).unwrap();
        assert_eq!(
            record.value("due_date").map(|v| v.to_string()),
            Some("2014-05-29 08:59:39 +0000".to_string())
        );

        let json = json!({ "due_date": "2014-05-29 10:59:39" });
        apply_inbound(entity, wrapper, &mut record, &json).unwrap();
        assert_eq!(record.value("due_date"), Some(Scalar::Null));
    }

    #[test]
    fn test_apply_inbound_missing_attribute() {
        let schema = testing::schema();
        let broken = schema.lookup("BrokenTask").unwrap();
        let entity = schema.entity(broken);
        let wrapper = schema.wrapper(broken).unwrap();

        let mut record = Record::new(broken);
        // Not present in the payload: nothing to resolve
        assert!(apply_inbound(entity, wrapper, &mut record, &json!({ "name": "x" })).is_ok());

        let err = apply_inbound(entity, wrapper, &mut record, &json!({ "nick": "x" })).unwrap_err();
        assert_eq!(
            err,
            WrapperError::FieldMissing {
                attribute: "nickname".to_string(),
                entity: "BrokenTask".to_string()
            }
        );
    }

    #[test]
    fn test_build_outbound_uses_remote_keys() {
        let schema = testing::schema();
        let plan = schema.lookup("Plan").unwrap();
        let entity = schema.entity(plan);
        let wrapper = schema.wrapper(plan).unwrap();

        let record = Record::new(plan).with("id", 5).with("name", "Gold");
        let body = build_outbound(entity, wrapper, &record);

        assert_eq!(Value::Object(body), json!({ "id": 5, "name": "Gold" }));
    }

    #[test]
    fn test_build_outbound_skips_unset_and_unmapped() {
        let schema = testing::schema();
        let task = schema.lookup("Task").unwrap();
        let entity = schema.entity(task);
        let wrapper = schema.wrapper(task).unwrap();

        // updated_at is declared but not in the field map
        let record = Record::new(task)
            .with("name", "This is Sparta!")
            .with("updated_at", Scalar::Null);
        let body = build_outbound(entity, wrapper, &record);

        assert_eq!(Value::Object(body), json!({ "name": "This is Sparta!" }));
    }

    #[test]
    fn test_round_trip_scalar_fields() {
        let schema = testing::schema();
        let user = schema.lookup("User").unwrap();
        let entity = schema.entity(user);
        let wrapper = schema.wrapper(user).unwrap();

        let json = json!({
            "id": 10,
            "plan_id": 5,
            "name": "Manuel",
            "email": "manuel@dudda.de",
            "age": 28,
            "admin": true
        });
        let mut record = Record::new(user);
        apply_inbound(entity, wrapper, &mut record, &json).unwrap();
        let body = build_outbound(entity, wrapper, &record);

        for (key, value) in json.as_object().unwrap() {
            assert_eq!(body.get(key), Some(value), "field {}", key);
        }
    }

    #[test]
    fn test_round_trip_dates_in_utc() {
        let schema = testing::schema();
        let task = schema.lookup("Task").unwrap();
        let entity = schema.entity(task);
        let wrapper = schema.wrapper(task).unwrap();

        let json = json!({
            "id": 1,
            "name": "Drinking soda",
            "due_date": "2014-05-29T10:59:39+02:00"
        });
        let mut record = Record::new(task);
        apply_inbound(entity, wrapper, &mut record, &json).unwrap();
        let body = build_outbound(entity, wrapper, &record);

        assert_eq!(body.get("name"), json.get("name"));
        assert_eq!(body.get("due_date"), Some(&json!("2014-05-29T08:59:39+00:00")));

        let sent = chrono::DateTime::parse_from_rfc3339("2014-05-29T10:59:39+02:00").unwrap();
        let echoed = body["due_date"].as_str().unwrap();
        assert_eq!(chrono::DateTime::parse_from_rfc3339(echoed).unwrap(), sent);
    }
}
