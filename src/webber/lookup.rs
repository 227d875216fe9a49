// Lookup outcomes.
// Tags where a value came from, or why there is none, before callers collapse it to Option.

use serde_json::Value;

use crate::error::{Result, WebberError};

/// Outcome of a single retrieval.
#[derive(Debug)]
pub enum Lookup<T> {
    /// Fetched from the server just now.
    Fresh(T),
    /// Read from the offline store.
    Cached(T),
    /// Nothing stored, or the store was not consulted.
    CacheMiss,
    /// The fetch or decode failed.
    Failed(WebberError),
}

impl<T> Lookup<T> {
    /// Collapse to the value, dropping the reason for its absence.
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Fresh(value) | Lookup::Cached(value) => Some(value),
            Lookup::CacheMiss | Lookup::Failed(_) => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Lookup::Fresh(value) | Lookup::Cached(value) => Some(value),
            Lookup::CacheMiss | Lookup::Failed(_) => None,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Lookup::Fresh(_))
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Lookup::Cached(_))
    }

    pub fn error(&self) -> Option<&WebberError> {
        match self {
            Lookup::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Transform a present value with a fallible step, keeping its origin.
    pub fn try_map<U>(self, f: impl FnOnce(T) -> Result<U>) -> Lookup<U> {
        match self {
            Lookup::Fresh(value) => f(value).map_or_else(Lookup::Failed, Lookup::Fresh),
            Lookup::Cached(value) => f(value).map_or_else(Lookup::Failed, Lookup::Cached),
            Lookup::CacheMiss => Lookup::CacheMiss,
            Lookup::Failed(e) => Lookup::Failed(e),
        }
    }
}

/// Decode `text` as JSON and require an array at the top level.
pub fn decode_array(text: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Err(WebberError::NotAnArray("object")),
        Value::String(_) => Err(WebberError::NotAnArray("string")),
        Value::Number(_) => Err(WebberError::NotAnArray("number")),
        Value::Bool(_) => Err(WebberError::NotAnArray("boolean")),
        Value::Null => Err(WebberError::NotAnArray("null")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_array() {
        let items = decode_array("[1,2,3]").unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Value::from(1));
    }

    #[test]
    fn test_decode_rejects_non_arrays() {
        assert!(matches!(decode_array("{}"), Err(WebberError::NotAnArray("object"))));
        assert!(matches!(decode_array("42"), Err(WebberError::NotAnArray("number"))));
        assert!(matches!(decode_array("[1,"), Err(WebberError::Json(_))));
    }

    #[test]
    fn test_try_map_keeps_origin() {
        let cached = Lookup::Cached("[true]".to_string()).try_map(|t| decode_array(&t));
        assert!(cached.is_cached());
        assert_eq!(cached.value().map(Vec::len), Some(1));

        let failed = Lookup::Fresh("{}".to_string()).try_map(|t| decode_array(&t));
        assert!(failed.error().is_some_and(WebberError::is_decode));
        assert!(failed.into_option().is_none());
    }

    #[test]
    fn test_into_option() {
        assert_eq!(Lookup::Fresh(1).into_option(), Some(1));
        assert_eq!(Lookup::Cached(2).into_option(), Some(2));
        assert_eq!(Lookup::<i32>::CacheMiss.into_option(), None);
        assert_eq!(
            Lookup::<i32>::Failed(WebberError::Other("x".into())).into_option(),
            None
        );
    }
}
