//! Primitive format validators.
//!
//! Fixed-width hex tokens (addresses, topics, method signatures), the
//! subscription secret, http(s) URIs and UUIDv4 identifiers.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use super::error::{ErrorKind, FieldPath};
use super::rules::{expect_str, fail, Rule, RuleResult};

lazy_static! {
    static ref ADDRESS_PATTERN: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
    static ref TOPIC_PATTERN: Regex = Regex::new(r"^0x[0-9a-fA-F]{64}$").unwrap();
    static ref METHOD_SIGNATURE_PATTERN: Regex = Regex::new(r"^0x[0-9a-fA-F]{8}$").unwrap();

    /// RFC 3986 absolute URI with an authority: `scheme://[userinfo@]host[:port]`
    /// followed by path, query and fragment built only from unreserved,
    /// sub-delim and percent-encoded characters.
    static ref RFC3986_URI_PATTERN: Regex = Regex::new(concat!(
        r"(?i)^[a-z][a-z0-9+.\-]*://",
        r"(?:(?:[a-z0-9\-._~!$&'()*+,;=:]|%[0-9a-f]{2})*@)?",
        r"(?:\[[0-9a-f:.]+\]|(?:[a-z0-9\-._~!$&'()*+,;=]|%[0-9a-f]{2})+)",
        r"(?::[0-9]*)?",
        r"(?:/(?:[a-z0-9\-._~!$&'()*+,;=:@]|%[0-9a-f]{2})*)*",
        r"(?:\?(?:[a-z0-9\-._~!$&'()*+,;=:@/?]|%[0-9a-f]{2})*)?",
        r"(?:#(?:[a-z0-9\-._~!$&'()*+,;=:@/?]|%[0-9a-f]{2})*)?$",
    ))
    .unwrap();

    /// Web URL shape: optional protocol, optional userinfo, a host that is
    /// localhost, an IPv4 literal or a dotted domain, optional port and path.
    static ref WEB_URL_PATTERN: Regex = Regex::new(concat!(
        r"(?i)^(?:(?:https?:)?//)?",
        r"(?:\S+(?::\S*)?@)?",
        r"(?:localhost",
        r"|(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]\d|\d)(?:\.(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]\d|\d)){3}",
        r"|(?:[a-z0-9\x{00a1}-\x{ffff}][a-z0-9\x{00a1}-\x{ffff}_-]*\.)+[a-z\x{00a1}-\x{ffff}]{2,}\.?)",
        r"(?::\d{2,5})?",
        r#"(?:[/?#][^\s"]*)?$"#,
    ))
    .unwrap();
}

/// Hyphenated UUID length.
const UUID_LEN: usize = 36;

/// Fixed-width `0x`-prefixed hex token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexFormat {
    /// 20-byte account or contract address.
    Address,
    /// 32-byte log topic.
    Topic,
    /// 4-byte method selector.
    MethodSignature,
}

impl HexFormat {
    pub fn byte_len(&self) -> usize {
        match self {
            HexFormat::Address => 20,
            HexFormat::Topic => 32,
            HexFormat::MethodSignature => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HexFormat::Address => "address",
            HexFormat::Topic => "topic",
            HexFormat::MethodSignature => "method signature",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            HexFormat::Address => &ADDRESS_PATTERN,
            HexFormat::Topic => &TOPIC_PATTERN,
            HexFormat::MethodSignature => &METHOD_SIGNATURE_PATTERN,
        }
    }

    /// Lowercased token if `candidate` is `0x` followed by exactly
    /// `2 * byte_len` hex digits.
    pub fn normalize(&self, candidate: &str) -> Option<String> {
        if self.pattern().is_match(candidate) {
            Some(candidate.to_ascii_lowercase())
        } else {
            None
        }
    }
}

/// Rule form of [`HexFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexToken(pub HexFormat);

impl HexToken {
    pub fn address() -> Self {
        Self(HexFormat::Address)
    }

    pub fn topic() -> Self {
        Self(HexFormat::Topic)
    }

    pub fn method_signature() -> Self {
        Self(HexFormat::MethodSignature)
    }
}

impl Rule for HexToken {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        let s = expect_str(value, path)?;
        match self.0.normalize(s) {
            Some(normalized) => Ok(Value::String(normalized)),
            None => fail(
                path,
                ErrorKind::Format,
                format!("must be a {}", self.expected()),
            ),
        }
    }

    fn expected(&self) -> String {
        format!(
            "0x-prefixed {}-byte hex {}",
            self.0.byte_len(),
            self.0.label()
        )
    }
}

/// Unprefixed hex string decoding to exactly `bytes` bytes.
#[derive(Debug, Clone, Copy)]
pub struct HexSecret {
    bytes: usize,
}

impl HexSecret {
    pub fn bytes(bytes: usize) -> Self {
        Self { bytes }
    }
}

impl Rule for HexSecret {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        let s = expect_str(value, path)?;
        match hex::decode(s) {
            Ok(decoded) if decoded.len() == self.bytes => Ok(Value::String(s.to_string())),
            Ok(_) => fail(
                path,
                ErrorKind::Range,
                format!("must be exactly {} hex characters", self.bytes * 2),
            ),
            Err(_) => fail(
                path,
                ErrorKind::Format,
                format!("must be a {}", self.expected()),
            ),
        }
    }

    fn expected(&self) -> String {
        format!("{}-character hex string", self.bytes * 2)
    }
}

/// Absolute http(s) URI, optionally gated by the web URL pattern as well.
#[derive(Debug, Clone, Copy)]
pub struct Uri {
    web_pattern: bool,
}

impl Uri {
    /// Any syntactically valid http or https URI.
    pub fn http() -> Self {
        Self { web_pattern: false }
    }

    /// An http(s) URI that must also look like a reachable web URL.
    pub fn webhook() -> Self {
        Self { web_pattern: true }
    }
}

/// Check `candidate` is an absolute URI with an http or https scheme.
pub fn check_http_uri(candidate: &str) -> Result<(), String> {
    if candidate.chars().any(char::is_whitespace) {
        return Err("must not contain whitespace".to_string());
    }
    if !RFC3986_URI_PATTERN.is_match(candidate) {
        return Err("must be an absolute uri with a host".to_string());
    }
    let parsed = url::Url::parse(candidate).map_err(|e| format!("must be a valid uri: {}", e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("must use the http or https scheme, got {:?}", other)),
    }
}

/// Check `candidate` matches the general web URL pattern.
pub fn is_web_url(candidate: &str) -> bool {
    WEB_URL_PATTERN.is_match(candidate)
}

impl Rule for Uri {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        let s = expect_str(value, path)?;
        if let Err(message) = check_http_uri(s) {
            return fail(path, ErrorKind::Format, message);
        }
        if self.web_pattern && !is_web_url(s) {
            return fail(path, ErrorKind::Format, "must match the URL pattern");
        }
        Ok(Value::String(s.to_string()))
    }

    fn expected(&self) -> String {
        "http or https uri".to_string()
    }
}

/// Check `candidate` is a hyphenated version-4 RFC 4122 UUID.
pub fn is_uuid_v4(candidate: &str) -> bool {
    if candidate.len() != UUID_LEN {
        return false;
    }
    match Uuid::parse_str(candidate) {
        Ok(id) => {
            id.get_version() == Some(uuid::Version::Random)
                && id.get_variant() == uuid::Variant::RFC4122
        }
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UuidV4;

impl Rule for UuidV4 {
    fn check(&self, value: &Value, path: &FieldPath) -> RuleResult {
        let s = expect_str(value, path)?;
        if is_uuid_v4(s) {
            Ok(Value::String(s.to_string()))
        } else {
            fail(path, ErrorKind::Format, "must be a valid uuid v4")
        }
    }

    fn expected(&self) -> String {
        "uuid v4".to_string()
    }
}
