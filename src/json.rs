//! Deterministic JSON serialization for token segments.
//!
//! Objects are written compactly with keys in insertion order; nothing is
//! re-sorted. Two encodes of the same logical content are byte-identical
//! only when the caller inserts keys in the same order.

use crate::error::Error;
use serde::ser::{self, Error as _, Serialize, Serializer};
use serde_json::{Map, Value};

/// A JSON object with insertion-ordered keys.
pub type JsonObject = Map<String, Value>;

/// Convert a serializable value into a JSON object.
///
/// Fails with [`Error::UnserializableValue`] if serialization fails, the
/// value holds a NaN or infinite float anywhere, or it is not an object at
/// the top level.
pub fn to_object<T: Serialize + ?Sized>(value: &T) -> Result<JsonObject, Error> {
    // serde_json writes non-finite floats as null
    value
        .serialize(FiniteFloats)
        .map_err(|e| Error::UnserializableValue(e.to_string()))?;

    match serde_json::to_value(value).map_err(|e| Error::UnserializableValue(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(Error::UnserializableValue(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

/// Serialize a value as compact UTF-8 JSON bytes.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    let object = to_object(value)?;
    serde_json::to_vec(&object).map_err(|e| Error::UnserializableValue(e.to_string()))
}

/// Parse UTF-8 JSON bytes that must hold an object.
pub fn parse(bytes: &[u8]) -> Result<JsonObject, Error> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::MalformedPayload(format!("invalid UTF-8: {e}")))?;

    match serde_json::from_str::<Value>(text).map_err(|e| Error::MalformedPayload(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(Error::MalformedPayload(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Walks a value and fails on the first float JSON cannot represent.
struct FiniteFloats;

fn check_float(value: f64) -> Result<(), serde_json::Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(serde_json::Error::custom(format!(
            "{value} cannot be represented in JSON"
        )))
    }
}

impl Serializer for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_f32(self, v: f32) -> Result<(), Self::Error> {
        check_float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), Self::Error> {
        check_float(v)
    }

    fn serialize_bool(self, _: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_char(self, _: char) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, Self::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, Self::Error> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), Self::Error> {
        key.serialize(FiniteFloats)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_serialize_keeps_insertion_order() {
        let mut object = JsonObject::new();
        object.insert("sub".to_string(), json!("1234567890"));
        object.insert("name".to_string(), json!("John Doe"));
        object.insert("iat".to_string(), json!(1516239022));

        let bytes = serialize(&object).unwrap();
        assert_eq!(
            bytes,
            br#"{"sub":"1234567890","name":"John Doe","iat":1516239022}"#
        );
    }

    #[test]
    fn test_serialize_rejects_non_objects() {
        assert!(matches!(
            serialize(&json!([1, 2, 3])),
            Err(Error::UnserializableValue(_))
        ));
        assert!(matches!(
            serialize("just a string"),
            Err(Error::UnserializableValue(_))
        ));
    }

    #[test]
    fn test_serialize_rejects_non_string_keys() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple key");
        assert!(matches!(serialize(&map), Err(Error::UnserializableValue(_))));
    }

    #[test]
    fn test_serialize_rejects_non_finite_floats() {
        #[derive(serde::Serialize)]
        struct Reading {
            sensor: &'static str,
            samples: Vec<Option<f32>>,
        }

        let reading = Reading {
            sensor: "thermo-a",
            samples: vec![Some(1.5), None, Some(f32::INFINITY)],
        };
        assert!(matches!(serialize(&reading), Err(Error::UnserializableValue(_))));

        let mut nested = HashMap::new();
        nested.insert("inner", HashMap::from([("score", f64::NAN)]));
        assert!(matches!(to_object(&nested), Err(Error::UnserializableValue(_))));

        let finite = HashMap::from([("score", -0.25f64)]);
        assert_eq!(to_object(&finite).unwrap().get("score"), Some(&json!(-0.25)));
    }

    #[test]
    fn test_parse_keeps_float_precision() {
        let object = parse(br#"{"v":1.0715660391465826e-75}"#).unwrap();
        assert_eq!(object.get("v").and_then(Value::as_f64), Some(1.0715660391465826e-75));
    }

    #[test]
    fn test_parse_object() {
        let object = parse(br#"{"alg":"HS256","typ":"JWT"}"#).unwrap();
        assert_eq!(object.get("alg"), Some(&json!("HS256")));
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, ["alg", "typ"]);
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        assert!(matches!(parse(b"{\"a\":"), Err(Error::MalformedPayload(_))));
        assert!(matches!(parse(b"[1,2]"), Err(Error::MalformedPayload(_))));
        assert!(matches!(parse(b"42"), Err(Error::MalformedPayload(_))));
        assert!(matches!(
            parse(&[b'{', 0xff, 0xfe, b'}']),
            Err(Error::MalformedPayload(_))
        ));
    }
}
