//! Flattening of the response shapes the service may return

use log::warn;
use serde_json::Value;

/// Fields probed for generated text, highest priority first
pub const TEXT_KEYS: [&str; 3] = ["generated_text", "text", "content"];

/// Turn a raw response into display text.
///
/// Strings pass through unchanged. Objects yield the first string found
/// under `TEXT_KEYS`. Anything else is serialized whole and flagged with
/// `format_warning`.
pub fn normalize_response(response: Value) -> crate::request::Generation
{   match response
    {   Value::String(text) => {
          crate::request::Generation { text, format_warning: false }
        }
      , Value::Object(ref map) => {
          let found = TEXT_KEYS.iter().find_map(|key| {
            map.get(*key).map(|v| (*key, v))
          });
          match found
          {   Some((_, Value::String(text))) => {
                crate::request::Generation
                {   text: text.clone()
                  , format_warning: false
                }
              }
            , Some((key, other)) => {
                // present but not a string: show it as-is
                warn!("Field '{}' is not a string", key);
                crate::request::Generation
                {   text: other.to_string()
                  , format_warning: false
                }
              }
            , None => degraded(&response)
          }
        }
      , other => degraded(&other)
    }
}

fn degraded(response: &Value) -> crate::request::Generation
{   warn!("Unexpected response format, showing raw response");
    crate::request::Generation
    {   text: response.to_string()
      , format_warning: true
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_is_unchanged()
    {   let g = normalize_response(json!("Hi there"));
        assert_eq!(g.text, "Hi there");
        assert!(!g.format_warning);
    }

    #[test]
    fn each_known_key_is_found()
    {   for key in TEXT_KEYS
        {   let mut map = serde_json::Map::new();
            map.insert(key.to_string(), json!("Hi there"));
            let g = normalize_response(Value::Object(map));
            assert_eq!(g.text, "Hi there", "key {}", key);
            assert!(!g.format_warning);
        }
    }

    #[test]
    fn generated_text_has_priority()
    {   let g = normalize_response(json!({
          "content": "third",
          "text": "second",
          "generated_text": "first"
        }));
        assert_eq!(g.text, "first");

        let g = normalize_response(json!({
          "content": "third",
          "text": "second"
        }));
        assert_eq!(g.text, "second");
    }

    #[test]
    fn unknown_mapping_is_degraded()
    {   let g = normalize_response(json!({"foo": "bar"}));
        assert_eq!(g.text, r#"{"foo":"bar"}"#);
        assert!(g.format_warning);
    }

    #[test]
    fn other_shapes_are_degraded()
    {   let g = normalize_response(json!(42));
        assert_eq!(g.text, "42");
        assert!(g.format_warning);

        let g = normalize_response(Value::Null);
        assert_eq!(g.text, "null");
        assert!(g.format_warning);
    }

    #[test]
    fn non_string_value_under_known_key()
    {   let g = normalize_response(json!({"text": ["a", "b"]}));
        assert_eq!(g.text, r#"["a","b"]"#);
        assert!(!g.format_warning);
    }
}
