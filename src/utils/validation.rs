//! Input validation primitives.
//!
//! Validators return a [`Validation`] rather than an error: a rejected answer
//! is shown to the user and the question is asked again.
//!
//! - Strings: length bounds and regex matching
//! - URLs: any http(s), https only, https except localhost, port ranges
//! - Email addresses
//! - Selections: at least one item chosen

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use url::{Host, Url};

use crate::error::{Error, Result};

/// Verdict on a candidate answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(String),
}

impl Validation {
    pub fn invalid(message: impl Into<String>) -> Self {
        Validation::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }
}

impl From<std::result::Result<(), String>> for Validation {
    fn from(result: std::result::Result<(), String>) -> Self {
        match result {
            Ok(()) => Validation::Valid,
            Err(message) => Validation::Invalid(message),
        }
    }
}

/// Options for [`string_validator`].
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub regex: Option<Regex>,
    /// Replaces the default `must match regex /.../` message.
    pub error_message: Option<String>,
}

/// Build a string validator from length and pattern rules.
///
/// Length is counted in characters. `max_length < min_length` is a caller
/// error and is rejected here, not at answer time.
pub fn string_validator(rules: StringRules) -> Result<impl Fn(&str) -> Validation + Send + Sync> {
    if let (Some(min), Some(max)) = (rules.min_length, rules.max_length) {
        if max < min {
            return Err(Error::definition_invalid(
                "string validator",
                "max_length must be >= min_length",
            ));
        }
    }

    Ok(move |input: &str| {
        if let Some(regex) = &rules.regex {
            if !regex.is_match(input) {
                return Validation::Invalid(
                    rules
                        .error_message
                        .clone()
                        .unwrap_or_else(|| format!("must match regex /{}/", regex.as_str())),
                );
            }
        }

        let length = input.chars().count();
        if let Some(min) = rules.min_length {
            if length < min {
                return Validation::Invalid(format!("must be at least {} characters", min));
            }
        }
        if let Some(max) = rules.max_length {
            if length > max {
                return Validation::Invalid(format!("must be no more than {} characters", max));
            }
        }
        Validation::Valid
    })
}

/// Options for [`url_validator`].
#[derive(Debug, Clone, Default)]
pub struct UrlRules {
    pub https_required: bool,
    /// With `https_required`, still accept plain http for the local machine.
    pub localhost_http: bool,
    pub min_port: Option<u16>,
    pub max_port: Option<u16>,
}

/// Build a URL validator. An explicit port must fall within
/// `min_port..=max_port`; the scheme's default port is not checked.
pub fn url_validator(rules: UrlRules) -> Result<impl Fn(&str) -> Validation + Send + Sync> {
    if let (Some(min), Some(max)) = (rules.min_port, rules.max_port) {
        if max < min {
            return Err(Error::definition_invalid(
                "url validator",
                "max_port must be >= min_port",
            ));
        }
    }
    Ok(move |input: &str| check_url(input, &rules))
}

fn parse_url(input: &str) -> Option<Url> {
    let input = input.trim();
    // `http:/host` parses leniently; an authority is required.
    if !input.contains("://") {
        return None;
    }
    Url::parse(input).ok().filter(|url| url.has_host())
}

fn is_local(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

fn check_url(input: &str, rules: &UrlRules) -> Validation {
    let Some(url) = parse_url(input) else {
        return Validation::invalid(if rules.https_required && !rules.localhost_http {
            "must be a valid URL with https protocol"
        } else {
            "must be a valid URL"
        });
    };

    let scheme = url.scheme();
    if rules.https_required {
        let local_http = rules.localhost_http && scheme == "http" && is_local(&url);
        if scheme != "https" && !local_http {
            return Validation::invalid(if rules.localhost_http {
                "https is required except for localhost"
            } else {
                "https protocol is required"
            });
        }
    } else if scheme != "http" && scheme != "https" {
        return Validation::invalid("http(s) protocol is required");
    }

    if let Some(port) = url.port() {
        let min = rules.min_port.unwrap_or(1);
        let max = rules.max_port.unwrap_or(u16::MAX);
        if port < min || port > max {
            return Validation::Invalid(format!(
                "Port must be between {} and {} inclusive.",
                min, max
            ));
        }
    }
    Validation::Valid
}

/// Any URL using the http or https protocol.
pub fn url_validate(input: &str) -> Validation {
    check_url(input, &UrlRules::default())
}

/// A URL using the https protocol.
pub fn https_url_validate(input: &str) -> Validation {
    check_url(
        input,
        &UrlRules {
            https_required: true,
            ..Default::default()
        },
    )
}

/// https, or plain http when pointing at the local machine
/// (`localhost`, `127.0.0.1`, `[::1]`).
pub fn localhost_or_https_validate(input: &str) -> Validation {
    check_url(
        input,
        &UrlRules {
            https_required: true,
            localhost_http: true,
            ..Default::default()
        },
    )
}

pub fn email_validate(input: &str) -> Validation {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
    });
    if regex.is_match(input) {
        Validation::Valid
    } else {
        Validation::invalid("must be a valid email address")
    }
}

/// Checkbox validator: reject an empty selection.
pub fn at_least_one(noun: &str) -> impl Fn(&[Value]) -> Validation + Send + Sync {
    let message = format!("At least one {} is required.", noun);
    move |selected: &[Value]| {
        if selected.is_empty() {
            Validation::Invalid(message.clone())
        } else {
            Validation::Valid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_validator_checks_regex_with_default_message() {
        let validate = string_validator(StringRules {
            regex: Some(Regex::new("abc").unwrap()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(validate("xabcx"), Validation::Valid);
        assert_eq!(validate("xyz"), Validation::invalid("must match regex /abc/"));
    }

    #[test]
    fn string_validator_uses_custom_message() {
        let validate = string_validator(StringRules {
            regex: Some(Regex::new("abc").unwrap()),
            error_message: Some("custom message".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(validate("nope"), Validation::invalid("custom message"));
    }

    #[test]
    fn string_validator_checks_length_bounds() {
        let validate = string_validator(StringRules {
            min_length: Some(14),
            max_length: Some(20),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            validate("13 characters"),
            Validation::invalid("must be at least 14 characters")
        );

        let validate = string_validator(StringRules {
            max_length: Some(12),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            validate("13 characters"),
            Validation::invalid("must be no more than 12 characters")
        );
    }

    #[test]
    fn string_validator_rejects_inverted_bounds() {
        let result = string_validator(StringRules {
            min_length: Some(5),
            max_length: Some(4),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn url_validate_accepts_http_and_https() {
        assert!(url_validate("http://example.com").is_valid());
        assert!(url_validate("https://www.adafruit.com/category/168").is_valid());
        assert_eq!(url_validate("74"), Validation::invalid("must be a valid URL"));
        assert_eq!(
            url_validate("http:/missing.a.slash"),
            Validation::invalid("must be a valid URL")
        );
        assert_eq!(
            url_validate("ftp://example.com"),
            Validation::invalid("http(s) protocol is required")
        );
    }

    #[test]
    fn https_url_validate_requires_https() {
        assert!(https_url_validate("https://example.com").is_valid());
        assert_eq!(
            https_url_validate("http://adafruit.com"),
            Validation::invalid("https protocol is required")
        );
        assert_eq!(
            https_url_validate("I love NeoPixels. I hope you do too."),
            Validation::invalid("must be a valid URL with https protocol")
        );
    }

    #[test]
    fn localhost_may_use_http() {
        assert!(localhost_or_https_validate("http://localhost/path/to/fun").is_valid());
        assert!(localhost_or_https_validate("http://127.0.0.1").is_valid());
        assert!(localhost_or_https_validate("http://localhost:3000").is_valid());
        assert!(localhost_or_https_validate("http://127.0.0.1:3000/callback").is_valid());
        assert!(localhost_or_https_validate("http://[::1]:3000/callback").is_valid());
        assert!(localhost_or_https_validate("HTTP://LOCALHOST:3000").is_valid());
        assert_eq!(
            localhost_or_https_validate("http://adafruit.com"),
            Validation::invalid("https is required except for localhost")
        );
    }

    #[test]
    fn scheme_and_host_are_case_insensitive() {
        assert!(url_validate("HTTPS://Example.COM/Path").is_valid());
        assert!(https_url_validate("HTTPS://example.com").is_valid());
        assert_eq!(
            https_url_validate("Http://example.com"),
            Validation::invalid("https protocol is required")
        );
    }

    #[test]
    fn out_of_range_ports_are_not_urls() {
        assert_eq!(
            url_validate("http://example.com:99999"),
            Validation::invalid("must be a valid URL")
        );
        assert!(url_validate("http://[2001:db8::1]:8080/x").is_valid());
    }

    #[test]
    fn url_validator_enforces_min_port() {
        let validate = url_validator(UrlRules {
            min_port: Some(1024),
            ..Default::default()
        })
        .unwrap();
        for bad in ["http://example.com:1", "http://example.com:2", "http://example.com:1023"] {
            assert_eq!(
                validate(bad),
                Validation::invalid("Port must be between 1024 and 65535 inclusive.")
            );
        }
        assert!(validate("http://example.com:1024").is_valid());
        assert!(validate("http://example.com:65535").is_valid());
        assert!(validate("http://example.com").is_valid());
    }

    #[test]
    fn url_validator_enforces_max_port() {
        let validate = url_validator(UrlRules {
            max_port: Some(10000),
            ..Default::default()
        })
        .unwrap();
        for bad in [
            "http://example.com:10001",
            "http://example.com:10002",
            "http://example.com:65000",
        ] {
            assert_eq!(
                validate(bad),
                Validation::invalid("Port must be between 1 and 10000 inclusive.")
            );
        }
        assert!(validate("http://example.com:1").is_valid());
        assert!(validate("http://example.com:10000").is_valid());
    }

    #[test]
    fn url_validator_combines_https_and_port_range() {
        let validate = url_validator(UrlRules {
            https_required: true,
            min_port: Some(80),
            max_port: Some(8002),
            ..Default::default()
        })
        .unwrap();
        for bad in [
            "https://example.com:22",
            "https://example.com:79",
            "https://example.com:8003",
            "https://example.com:8004",
        ] {
            assert_eq!(
                validate(bad),
                Validation::invalid("Port must be between 80 and 8002 inclusive.")
            );
        }
        assert!(validate("https://example.com:8002").is_valid());
        assert_eq!(
            validate("http://example.com:8000"),
            Validation::invalid("https protocol is required")
        );
    }

    #[test]
    fn url_validator_rejects_inverted_port_bounds() {
        let result = url_validator(UrlRules {
            min_port: Some(9000),
            max_port: Some(80),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn email_validate_cases() {
        for bad in ["", "@", "a@", "@b", "@example.com"] {
            assert_eq!(
                email_validate(bad),
                Validation::invalid("must be a valid email address")
            );
        }
        assert!(email_validate("you@example.com").is_valid());
    }

    #[test]
    fn at_least_one_rejects_empty() {
        let validate = at_least_one("scope");
        assert_eq!(
            validate(&[]),
            Validation::invalid("At least one scope is required.")
        );
        assert!(validate(&[Value::from("r:devices:*")]).is_valid());
    }
}
