//! Record ids are 64-bit integers allocated by the database, but
//! JavaScript numbers lose precision past 2^53, so the JSON layer
//! carries them as decimal strings. Deserialization accepts either a
//! string or a number.

/// Serde helpers for a required `i64` id field.
pub mod id_str {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Int(i) => Ok(i),
            Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Serde helpers for an optional `i64` id field. `None` serializes as null.
pub mod id_str_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(i) => serializer.serialize_str(&i.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Int(i)) => Ok(Some(i)),
            Some(Raw::Str(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Record {
        #[serde(with = "super::id_str")]
        id: i64,
        #[serde(default, with = "super::id_str_opt")]
        parent_id: Option<i64>,
    }

    #[test]
    fn serializes_ids_as_strings() {
        let rec = Record { id: 9007199254740993, parent_id: Some(7) };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["id"], serde_json::json!("9007199254740993"));
        assert_eq!(json["parent_id"], serde_json::json!("7"));

        let rec = Record { id: 1, parent_id: None };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["parent_id"], serde_json::Value::Null);
    }

    #[test]
    fn accepts_string_or_number_on_input() {
        let rec: Record = serde_json::from_str(r#"{"id": "42", "parent_id": 7}"#).unwrap();
        assert_eq!(rec.id, 42);
        assert_eq!(rec.parent_id, Some(7));

        let rec: Record = serde_json::from_str(r#"{"id": 42, "parent_id": "7"}"#).unwrap();
        assert_eq!(rec.id, 42);
        assert_eq!(rec.parent_id, Some(7));

        let rec: Record = serde_json::from_str(r#"{"id": 42, "parent_id": null}"#).unwrap();
        assert_eq!(rec.parent_id, None);
    }

    #[test]
    fn rejects_non_numeric_strings() {
        assert!(serde_json::from_str::<Record>(r#"{"id": "abc"}"#).is_err());
    }
}
