use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps customer contact data so that `Debug`/`Display` never print it.
///
/// Serialization still yields the real value: staff responses need it,
/// log lines must not.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }

    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl fmt::Debug for Masked<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", mask_contact(&self.0))
    }
}

impl fmt::Display for Masked<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", mask_contact(&self.0))
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Keeps the first character of the local part and the full domain of an
/// email (`j***@flymex.aero`); anything else is fully masked.
pub fn mask_contact(value: &str) -> String {
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "********".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_partially_masked() {
        let email = Masked("jorge@flymex.aero".to_string());
        assert_eq!(format!("{}", email), "j***@flymex.aero");
        assert_eq!(format!("{:?}", email), "j***@flymex.aero");
    }

    #[test]
    fn test_non_email_is_fully_masked() {
        assert_eq!(mask_contact("+52 55 1234 5678"), "********");
        assert_eq!(mask_contact("@nobody"), "********");
    }

    #[test]
    fn test_serialization_keeps_real_value() {
        let email = Masked("a@b.co".to_string());
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"a@b.co\"");
    }
}
