use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile returned by the identity provider's user-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable subject identifier issued by the provider.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Remaining user-info claims, stored and sent back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        let present = |value: &&str| !value.is_empty();
        self.name
            .as_deref()
            .filter(present)
            .or(self.email.as_deref().filter(present))
            .unwrap_or(&self.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_userinfo_payload_and_keeps_extra_claims() {
        let raw = r#"{
            "sub": "1090",
            "name": "Ada Lovelace",
            "given_name": "Ada",
            "family_name": "Lovelace",
            "picture": "https://example.com/ada.png",
            "email": "ada@example.com",
            "email_verified": true
        }"#;

        let user: UserProfile = serde_json::from_str(raw).expect("userinfo should parse");

        assert_eq!(user.sub, "1090");
        assert_eq!(user.family_name.as_deref(), Some("Lovelace"));
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert_eq!(user.extra.get("given_name"), Some(&Value::from("Ada")));

        let stored = serde_json::to_value(&user).expect("encode");
        assert_eq!(stored["email_verified"], Value::Bool(true));
        assert_eq!(stored["given_name"], "Ada");
    }

    #[test]
    fn display_name_falls_back_to_email_then_sub() {
        let mut user: UserProfile =
            serde_json::from_str(r#"{"sub":"42","email":"x@example.com"}"#).expect("parse");
        assert_eq!(user.display_name(), "x@example.com");

        user.email = None;
        assert_eq!(user.display_name(), "42");
    }

    #[test]
    fn empty_name_falls_back_to_email() {
        let user: UserProfile =
            serde_json::from_str(r#"{"sub":"42","name":"","email":"x@e.com"}"#).expect("parse");

        assert_eq!(user.display_name(), "x@e.com");
    }
}
