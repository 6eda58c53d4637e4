//! Declarative attribute validators

use crate::value::ConfigValue;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const DNS_SUBDOMAIN_MAX_LENGTH: usize = 253;
const DNS_LABEL_MAX_LENGTH: usize = 63;
const QUALIFIED_NAME_MAX_LENGTH: usize = 63;
const LABEL_VALUE_MAX_LENGTH: usize = 63;

static DNS_SUBDOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("valid DNS subdomain regex")
});

static DNS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid DNS label regex")
});

static QUALIFIED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").expect("valid qualified name regex")
});

/// A validator attached to an attribute. Validators only inspect values of
/// the kind they apply to and accept everything else.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Validator {
    LengthBetween { min: usize, max: usize },
    LengthAtLeast { min: usize },
    LengthAtMost { max: usize },
    IntBetween { min: i64, max: i64 },
    IntAtLeast { min: i64 },
    IntAtMost { max: i64 },
    FloatBetween { min: f64, max: f64 },
    FloatAtLeast { min: f64 },
    FloatAtMost { max: f64 },
    OneOf { values: Vec<String> },
    RegexMatches {
        pattern: String,
        #[serde(skip)]
        regex: Regex,
    },
    ListSizeBetween { min: usize, max: usize },
    ListSizeAtLeast { min: usize },
    ListSizeAtMost { max: usize },
    DnsSubdomain,
    DnsLabel,
    LabelKeys,
    LabelValues,
    AnnotationKeys,
}

impl Validator {
    pub fn string_length(min: Option<usize>, max: Option<usize>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Validator::LengthBetween { min, max }),
            (Some(min), None) => Some(Validator::LengthAtLeast { min }),
            (None, Some(max)) => Some(Validator::LengthAtMost { max }),
            (None, None) => None,
        }
    }

    pub fn int_range(min: Option<i64>, max: Option<i64>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Validator::IntBetween { min, max }),
            (Some(min), None) => Some(Validator::IntAtLeast { min }),
            (None, Some(max)) => Some(Validator::IntAtMost { max }),
            (None, None) => None,
        }
    }

    pub fn float_range(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Validator::FloatBetween { min, max }),
            (Some(min), None) => Some(Validator::FloatAtLeast { min }),
            (None, Some(max)) => Some(Validator::FloatAtMost { max }),
            (None, None) => None,
        }
    }

    pub fn list_size(min: Option<usize>, max: Option<usize>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Validator::ListSizeBetween { min, max }),
            (Some(min), None) => Some(Validator::ListSizeAtLeast { min }),
            (None, Some(max)) => Some(Validator::ListSizeAtMost { max }),
            (None, None) => None,
        }
    }

    pub fn one_of(values: &[String]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Validator::OneOf {
            values: values.to_vec(),
        })
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Validator::RegexMatches {
            pattern: pattern.to_string(),
            regex: Regex::new(pattern)?,
        })
    }

    /// Human-readable description of the constraint
    pub fn description(&self) -> String {
        match self {
            Validator::LengthBetween { min, max } => {
                format!("string length must be between {min} and {max}")
            }
            Validator::LengthAtLeast { min } => format!("string length must be at least {min}"),
            Validator::LengthAtMost { max } => format!("string length must be at most {max}"),
            Validator::IntBetween { min, max } => format!("value must be between {min} and {max}"),
            Validator::IntAtLeast { min } => format!("value must be at least {min}"),
            Validator::IntAtMost { max } => format!("value must be at most {max}"),
            Validator::FloatBetween { min, max } => {
                format!("value must be between {min} and {max}")
            }
            Validator::FloatAtLeast { min } => format!("value must be at least {min}"),
            Validator::FloatAtMost { max } => format!("value must be at most {max}"),
            Validator::OneOf { values } => {
                let quoted: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
                format!("value must be one of: [{}]", quoted.join(" "))
            }
            Validator::RegexMatches { pattern, .. } => {
                format!("value must match regular expression '{pattern}'")
            }
            Validator::ListSizeBetween { min, max } => {
                format!("list must contain at least {min} elements and at most {max} elements")
            }
            Validator::ListSizeAtLeast { min } => {
                format!("list must contain at least {min} elements")
            }
            Validator::ListSizeAtMost { max } => format!("list must contain at most {max} elements"),
            Validator::DnsSubdomain => format!(
                "value must be a lowercase RFC 1123 subdomain of at most {DNS_SUBDOMAIN_MAX_LENGTH} characters"
            ),
            Validator::DnsLabel => format!(
                "value must be a lowercase RFC 1123 label of at most {DNS_LABEL_MAX_LENGTH} characters"
            ),
            Validator::LabelKeys => "label keys must be qualified names".to_string(),
            Validator::LabelValues => format!(
                "label values must be empty or at most {LABEL_VALUE_MAX_LENGTH} alphanumeric characters, '-', '_' or '.'"
            ),
            Validator::AnnotationKeys => "annotation keys must be qualified names".to_string(),
        }
    }

    /// Check a present value. The error is the message shown to the caller.
    pub fn validate(&self, value: &ConfigValue) -> Result<(), String> {
        match (self, value) {
            (Validator::LengthBetween { min, max }, ConfigValue::String(s)) => {
                check(within(s.chars().count(), Some(*min), Some(*max)), self, s.chars().count())
            }
            (Validator::LengthAtLeast { min }, ConfigValue::String(s)) => {
                check(s.chars().count() >= *min, self, s.chars().count())
            }
            (Validator::LengthAtMost { max }, ConfigValue::String(s)) => {
                check(s.chars().count() <= *max, self, s.chars().count())
            }
            (Validator::IntBetween { min, max }, ConfigValue::Int(i)) => {
                check(min <= i && i <= max, self, i)
            }
            (Validator::IntAtLeast { min }, ConfigValue::Int(i)) => check(i >= min, self, i),
            (Validator::IntAtMost { max }, ConfigValue::Int(i)) => check(i <= max, self, i),
            (Validator::FloatBetween { .. }, ConfigValue::Int(i))
            | (Validator::FloatAtLeast { .. }, ConfigValue::Int(i))
            | (Validator::FloatAtMost { .. }, ConfigValue::Int(i)) => {
                self.validate(&ConfigValue::Float(*i as f64))
            }
            (Validator::FloatBetween { min, max }, ConfigValue::Float(f)) => {
                check(min <= f && f <= max, self, f)
            }
            (Validator::FloatAtLeast { min }, ConfigValue::Float(f)) => check(f >= min, self, f),
            (Validator::FloatAtMost { max }, ConfigValue::Float(f)) => check(f <= max, self, f),
            (Validator::OneOf { values }, ConfigValue::String(s)) => {
                check(values.iter().any(|v| v == s), self, format!("{s:?}"))
            }
            (Validator::RegexMatches { regex, .. }, ConfigValue::String(s)) => {
                check(regex.is_match(s), self, format!("{s:?}"))
            }
            (Validator::ListSizeBetween { min, max }, ConfigValue::List(items)) => {
                check(within(items.len(), Some(*min), Some(*max)), self, items.len())
            }
            (Validator::ListSizeAtLeast { min }, ConfigValue::List(items)) => {
                check(items.len() >= *min, self, items.len())
            }
            (Validator::ListSizeAtMost { max }, ConfigValue::List(items)) => {
                check(items.len() <= *max, self, items.len())
            }
            (Validator::DnsSubdomain, ConfigValue::String(s)) => check(
                s.len() <= DNS_SUBDOMAIN_MAX_LENGTH && DNS_SUBDOMAIN.is_match(s),
                self,
                format!("{s:?}"),
            ),
            (Validator::DnsLabel, ConfigValue::String(s)) => check(
                s.len() <= DNS_LABEL_MAX_LENGTH && DNS_LABEL.is_match(s),
                self,
                format!("{s:?}"),
            ),
            (Validator::LabelKeys, ConfigValue::Map(entries))
            | (Validator::AnnotationKeys, ConfigValue::Map(entries)) => {
                match entries.keys().find(|key| !is_qualified_name(key)) {
                    Some(key) => check(false, self, format!("{key:?}")),
                    None => Ok(()),
                }
            }
            (Validator::LabelValues, ConfigValue::Map(entries)) => {
                let invalid = entries.values().find_map(|value| match value {
                    ConfigValue::String(s) if !is_label_value(s) => Some(s),
                    _ => None,
                });
                match invalid {
                    Some(value) => check(false, self, format!("{value:?}")),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }
}

fn within(n: usize, min: Option<usize>, max: Option<usize>) -> bool {
    min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max)
}

fn check(ok: bool, validator: &Validator, got: impl std::fmt::Display) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("{}, got: {got}", validator.description()))
    }
}

/// `[prefix/]name` where prefix is a DNS subdomain and name a 63 character qualified name
fn is_qualified_name(key: &str) -> bool {
    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    if let Some(prefix) = prefix {
        if prefix.is_empty()
            || prefix.len() > DNS_SUBDOMAIN_MAX_LENGTH
            || !DNS_SUBDOMAIN.is_match(prefix)
        {
            return false;
        }
    }

    !name.is_empty() && name.len() <= QUALIFIED_NAME_MAX_LENGTH && QUALIFIED_NAME.is_match(name)
}

fn is_label_value(value: &str) -> bool {
    value.is_empty() || (value.len() <= LABEL_VALUE_MAX_LENGTH && QUALIFIED_NAME.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn string(s: &str) -> ConfigValue {
        ConfigValue::String(s.to_string())
    }

    fn string_map(entries: &[(&str, &str)]) -> ConfigValue {
        ConfigValue::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), string(v)))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[rstest]
    #[case(0, true)]
    #[case(255, true)]
    #[case(256, false)]
    #[case(-1, false)]
    fn test_int_between(#[case] value: i64, #[case] valid: bool) {
        let validator = Validator::int_range(Some(0), Some(255)).unwrap();
        assert_eq!(validator.validate(&ConfigValue::Int(value)).is_ok(), valid);
    }

    #[test]
    fn test_int_error_message() {
        let validator = Validator::int_range(Some(0), Some(255)).unwrap();
        let err = validator.validate(&ConfigValue::Int(256)).unwrap_err();
        assert_eq!(err, "value must be between 0 and 255, got: 256");
    }

    #[test]
    fn test_float_range_accepts_integers() {
        let validator = Validator::float_range(Some(0.5), None).unwrap();
        assert!(validator.validate(&ConfigValue::Int(1)).is_ok());
        assert!(validator.validate(&ConfigValue::Float(0.25)).is_err());
    }

    #[test]
    fn test_string_length_counts_characters() {
        let validator = Validator::string_length(Some(1), Some(3)).unwrap();
        assert!(validator.validate(&string("µµµ")).is_ok());
        assert!(validator.validate(&string("")).is_err());
        assert!(validator.validate(&string("abcd")).is_err());
        assert!(Validator::string_length(None, None).is_none());
    }

    #[test]
    fn test_one_of() {
        let values = vec!["auto".to_string(), "v4".to_string()];
        let validator = Validator::one_of(&values).unwrap();
        assert!(validator.validate(&string("v4")).is_ok());
        let err = validator.validate(&string("v5")).unwrap_err();
        assert!(err.contains("value must be one of: [\"auto\" \"v4\"]"));
        assert!(Validator::one_of(&[]).is_none());
    }

    #[test]
    fn test_regex() {
        let validator = Validator::regex(r"^\d+(ms|s)$").unwrap();
        assert!(validator.validate(&string("250ms")).is_ok());
        assert!(validator.validate(&string("soon")).is_err());
        assert!(Validator::regex("(unclosed").is_err());
    }

    #[test]
    fn test_list_size() {
        let validator = Validator::list_size(Some(1), None).unwrap();
        assert!(validator.validate(&ConfigValue::List(vec![string("a")])).is_ok());
        assert!(validator.validate(&ConfigValue::List(Vec::new())).is_err());
    }

    #[rstest]
    #[case("demo", true)]
    #[case("contour.projectcontour.io", true)]
    #[case("Demo", false)]
    #[case("-demo", false)]
    #[case("demo_config", false)]
    fn test_dns_subdomain(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(Validator::DnsSubdomain.validate(&string(value)).is_ok(), valid);
    }

    #[test]
    fn test_dns_label_rejects_dots_and_long_names() {
        assert!(Validator::DnsLabel.validate(&string("projectcontour")).is_ok());
        assert!(Validator::DnsLabel.validate(&string("project.contour")).is_err());
        assert!(Validator::DnsLabel.validate(&string(&"a".repeat(64))).is_err());
    }

    #[test]
    fn test_label_keys_and_values() {
        let valid = string_map(&[("app.kubernetes.io/name", "contour"), ("tier", "")]);
        assert!(Validator::LabelKeys.validate(&valid).is_ok());
        assert!(Validator::LabelValues.validate(&valid).is_ok());

        let bad_key = string_map(&[("Bad Prefix/name", "x")]);
        assert!(Validator::LabelKeys.validate(&bad_key).is_err());
        assert!(Validator::AnnotationKeys.validate(&bad_key).is_err());

        let bad_value = string_map(&[("app", "has spaces")]);
        assert!(Validator::LabelValues.validate(&bad_value).is_err());
    }

    #[test]
    fn test_validators_ignore_other_value_kinds() {
        let validator = Validator::int_range(Some(0), Some(1)).unwrap();
        assert!(validator.validate(&string("not a number")).is_ok());
        assert!(Validator::DnsLabel.validate(&ConfigValue::Int(5)).is_ok());
    }
}
