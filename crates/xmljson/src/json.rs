//! JSON text boundary backed by serde_json

use tracing::debug;

use crate::error::{Error, ErrorKind, Pos, Result};
use crate::value::Value;

/// Parse JSON text into a [`Value`].
///
/// Zero-length input is not an error: it yields [`Value::Null`], the absent
/// document.
pub fn from_str(input: &str) -> Result<Value> {
    if input.is_empty() {
        debug!("empty json input, returning null");
        return Ok(Value::Null);
    }

    serde_json::from_str(input).map_err(|err| {
        let line = u32::try_from(err.line()).unwrap_or(u32::MAX);
        let col = u32::try_from(err.column()).unwrap_or(u32::MAX);
        Error::with_message(ErrorKind::JsonParse, err.to_string())
            .at(Pos::from_line_col(input.as_bytes(), line, col))
    })
}

/// Compact JSON text, no trailing newline
pub fn to_string(value: &Value) -> Result<String> {
    serde_json::to_string(value).map_err(serialize_error)
}

/// Pretty-printed JSON text, no trailing newline
pub fn to_string_pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(serialize_error)
}

fn serialize_error(err: serde_json::Error) -> Error {
    Error::with_message(ErrorKind::Serialize, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    #[test]
    fn test_empty_input_is_null() -> Result<()> {
        assert_eq!(from_str("")?, Value::Null);
        Ok(())
    }

    #[test]
    fn test_whitespace_only_is_an_error() {
        let err = from_str("   ").err();
        assert!(matches!(err.as_ref().map(Error::kind), Some(ErrorKind::JsonParse)));
    }

    #[test]
    fn test_parse_keeps_key_order() -> Result<()> {
        let value = from_str(r#"{"z":"1","a":"2","m":"3"}"#)?;
        let keys: Vec<_> = value
            .as_object()
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["z", "a", "m"]);
        Ok(())
    }

    #[test]
    fn test_duplicate_keys_last_wins() -> Result<()> {
        let value = from_str(r#"{"k":"first","other":"x","k":"second"}"#)?;
        let obj = value.as_object().cloned().unwrap_or_default();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("k"), Some(&Value::from("second")));
        Ok(())
    }

    #[test]
    fn test_parse_error_position() {
        let input = "{\n  \"a\": }";
        let err = from_str(input).err();
        let pos = err.and_then(|e| e.pos()).unwrap_or_default();
        assert_eq!(pos.line, 2);
        // offset points into the second line
        assert!(pos.offset > 2 && pos.offset <= input.len());
        assert_eq!(Pos::from_offset(input.as_bytes(), pos.offset).line, 2);
    }

    #[test]
    fn test_integral_numbers_round_trip() -> Result<()> {
        let value = from_str(r#"{"a":42,"b":1.5,"c":-7,"d":[true,null]}"#)?;
        assert_eq!(to_string(&value)?, r#"{"a":42,"b":1.5,"c":-7,"d":[true,null]}"#);
        Ok(())
    }

    #[test]
    fn test_pretty() -> Result<()> {
        let mut obj = Object::new();
        obj.insert("a", "1");
        let text = to_string_pretty(&Value::Object(obj))?;
        assert_eq!(text, "{\n  \"a\": \"1\"\n}");
        Ok(())
    }
}
