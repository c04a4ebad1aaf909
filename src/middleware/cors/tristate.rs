use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Three-valued flag used for `allowCredentials` in route declarations
///
/// A plain `bool` cannot tell "explicitly false" apart from "not declared".
/// `Unset` means the value is inherited from the next-outer tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tristate {
    True,
    False,
    #[default]
    Unset,
}

impl Tristate {
    /// `true` unless the flag is `Unset`
    #[must_use]
    pub fn is_set(self) -> bool {
        !matches!(self, Tristate::Unset)
    }

    /// Collapse to a `bool`, `None` while still `Unset`
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Tristate::True => Some(true),
            Tristate::False => Some(false),
            Tristate::Unset => None,
        }
    }

    /// Return `self` unless it is `Unset`, in which case `outer` wins
    #[must_use]
    pub fn or(self, outer: Tristate) -> Tristate {
        if self.is_set() {
            self
        } else {
            outer
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Tristate::True => "true",
            Tristate::False => "false",
            Tristate::Unset => "unset",
        }
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value {
            Tristate::True
        } else {
            Tristate::False
        }
    }
}

impl From<Option<bool>> for Tristate {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Tristate::Unset, Tristate::from)
    }
}

impl fmt::Display for Tristate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tristate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_bool() {
            Some(b) => serializer.serialize_bool(b),
            None => serializer.serialize_none(),
        }
    }
}

struct TristateVisitor;

impl<'de> Visitor<'de> for TristateVisitor {
    type Value = Tristate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, null, or one of \"true\", \"false\", \"unset\"")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Tristate, E> {
        Ok(Tristate::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Tristate, E> {
        match v.to_ascii_lowercase().as_str() {
            "true" => Ok(Tristate::True),
            "false" => Ok(Tristate::False),
            "unset" => Ok(Tristate::Unset),
            _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Tristate, E> {
        Ok(Tristate::Unset)
    }

    fn visit_none<E: de::Error>(self) -> Result<Tristate, E> {
        Ok(Tristate::Unset)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Tristate, D::Error> {
        d.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for Tristate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TristateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_or_prefers_inner_value() {
        assert_eq!(Tristate::False.or(Tristate::True), Tristate::False);
        assert_eq!(Tristate::Unset.or(Tristate::True), Tristate::True);
        assert_eq!(Tristate::Unset.or(Tristate::Unset), Tristate::Unset);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Tristate::from(Some(true)), Tristate::True);
        assert_eq!(Tristate::from(Some(false)), Tristate::False);
        assert_eq!(Tristate::from(None), Tristate::Unset);
    }

    #[test]
    fn test_deserialize_accepted_forms() {
        let cases = [
            (json!(true), Tristate::True),
            (json!(false), Tristate::False),
            (json!(null), Tristate::Unset),
            (json!("TRUE"), Tristate::True),
            (json!("false"), Tristate::False),
            (json!("Unset"), Tristate::Unset),
        ];
        for (value, expected) in cases {
            let parsed: Tristate = serde_json::from_value(value.clone()).expect("valid tristate");
            assert_eq!(parsed, expected, "input {value}");
        }
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(serde_json::from_value::<Tristate>(json!("maybe")).is_err());
        assert!(serde_json::from_value::<Tristate>(json!(1)).is_err());
    }
}
