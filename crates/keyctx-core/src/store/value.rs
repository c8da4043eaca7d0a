use serde::{Deserialize, Serialize};

/// `{ "value": ... }` wrapper for values that may grow extra fields later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageValue<T> {
    pub value: T,
}

impl<T> StorageValue<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Timestamp;

    #[test]
    fn wraps_value_in_object() {
        let json = serde_json::to_value(StorageValue::new(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "value": 3 }));
    }

    #[test]
    fn timestamp_wrapper_is_rfc3339() {
        let v = StorageValue::new(Timestamp::from_unix_secs(0));
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json, serde_json::json!({ "value": "1970-01-01T00:00:00Z" }));
        let back: StorageValue<Timestamp> = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);
    }
}
