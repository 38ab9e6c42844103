// src/health/payload.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by a successful health check.
///
/// The document is kept exactly as parsed. Only `version`, `environment`
/// and `city` are ever read, and each is reported as absent unless it is
/// a string on a top-level object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthPayload(Value);

impl HealthPayload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self)
    }

    pub fn version(&self) -> Option<&str> {
        self.field("version")
    }

    pub fn environment(&self) -> Option<&str> {
        self.field("environment")
    }

    pub fn city(&self) -> Option<&str> {
        self.field("city")
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for HealthPayload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_all_fields_present() {
        let payload = HealthPayload::from_slice(
            br#"{"version":"1.2.0","environment":"prod","city":"Seattle"}"#,
        )
        .unwrap();

        assert_eq!(payload.version(), Some("1.2.0"));
        assert_eq!(payload.environment(), Some("prod"));
        assert_eq!(payload.city(), Some("Seattle"));
    }

    #[test]
    fn test_empty_object_has_no_fields() {
        let payload = HealthPayload::from_slice(b"{}").unwrap();
        assert_eq!(payload.version(), None);
        assert_eq!(payload.environment(), None);
        assert_eq!(payload.city(), None);
    }

    #[test]
    fn test_mistyped_fields_are_absent() {
        let payload = HealthPayload::from(json!({
            "version": 2,
            "environment": null,
            "city": ["Seattle"],
            "status": "healthy"
        }));

        assert_eq!(payload.version(), None);
        assert_eq!(payload.environment(), None);
        assert_eq!(payload.city(), None);
        assert_eq!(payload.as_value()["status"], "healthy");
    }

    #[test]
    fn test_non_object_json_is_accepted() {
        let payload = HealthPayload::from_slice(b"[1, 2, 3]").unwrap();
        assert_eq!(payload.version(), None);
        assert_eq!(payload.as_value(), &json!([1, 2, 3]));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(HealthPayload::from_slice(b"not-json").is_err());
        assert!(HealthPayload::from_slice(b"").is_err());
        assert!(HealthPayload::from_slice(b"{\"version\":").is_err());
    }

    proptest! {
        #[test]
        fn prop_string_fields_are_read_back(
            version in ".*",
            environment in ".*",
            city in ".*",
        ) {
            let body = json!({
                "version": version,
                "environment": environment,
                "city": city,
            });
            let bytes = serde_json::to_vec(&body).unwrap();
            let payload = HealthPayload::from_slice(&bytes).unwrap();

            prop_assert_eq!(payload.version(), Some(version.as_str()));
            prop_assert_eq!(payload.environment(), Some(environment.as_str()));
            prop_assert_eq!(payload.city(), Some(city.as_str()));
            prop_assert_eq!(payload.as_value(), &body);
        }

        #[test]
        fn prop_decoding_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let _ = HealthPayload::from_slice(&bytes);
        }
    }
}
