use crate::response::CanonicalMap;
use serde_json::{Map, Value};
use std::fmt;

mod options;
#[cfg(test)]
mod tests;

pub use options::LoginOptions;

/// `login_to_simulator` call parameters sent by a viewer.
///
/// See http://opensimulator.org/wiki/SimulatorLoginProtocol
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginRequest {
    pub first: String,
    pub last: String,
    /// Password token, usually `$1$` followed by the password's MD5 hex digest
    pub passwd: String,
    /// `home`, `last`, or `uri:<region>&<x>&<y>&<z>`
    pub start: String,
    /// Viewer name
    pub channel: Option<String>,
    pub version: Option<String>,
    /// `lin`, `mac` or `win`
    pub platform: Option<String>,
    pub platform_string: Option<String>,
    pub platform_version: Option<String>,
    pub mac: Option<String>,
    /// Hardware hash
    pub id0: Option<String>,
    pub agree_to_tos: Option<bool>,
    pub read_critical: Option<bool>,
    pub viewer_digest: Option<String>,
    pub address_size: Option<String>,
    pub extended_errors: Option<String>,
    pub last_exec_event: Option<i64>,
    pub last_exec_duration: Option<String>,
    pub skipoptional: Option<bool>,
    pub options: LoginOptions,
}

/// Errors raised when a login request cannot be read
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    NotAMap,
    MissingField(&'static str),
    InvalidType {
        key: &'static str,
        expected: &'static str,
    },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NotAMap => write!(f, "login request must be a map"),
            RequestError::MissingField(key) => write!(f, "'{}' is required", key),
            RequestError::InvalidType { key, expected } => {
                write!(f, "'{}' must be {}", key, expected)
            }
        }
    }
}

impl std::error::Error for RequestError {}

const REQUIRED_FIELDS: [&str; 4] = ["first", "last", "passwd", "start"];

impl LoginRequest {
    pub fn new(
        first: impl Into<String>,
        last: impl Into<String>,
        passwd: impl Into<String>,
        start: impl Into<String>,
    ) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            passwd: passwd.into(),
            start: start.into(),
            ..Self::default()
        }
    }

    /// Request filled with this client's identity, asking for every block.
    pub fn with_defaults(
        first: impl Into<String>,
        last: impl Into<String>,
        passwd: impl Into<String>,
        start: impl Into<String>,
        agree_to_tos: bool,
        read_critical: bool,
    ) -> Self {
        Self {
            channel: Some(env!("CARGO_PKG_NAME").to_string()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            platform: Some(platform_tag().to_string()),
            platform_string: Some(format!(
                "{} {}",
                std::env::consts::OS,
                std::env::consts::ARCH
            )),
            agree_to_tos: Some(agree_to_tos),
            read_critical: Some(read_critical),
            options: LoginOptions::all(),
            ..Self::new(first, last, passwd, start)
        }
    }

    /// Encode as the call's parameter map. Unset optional fields are left out.
    pub fn to_canonical(&self) -> CanonicalMap {
        let mut map = CanonicalMap::new();
        map.insert("first".to_string(), Value::String(self.first.clone()));
        map.insert("last".to_string(), Value::String(self.last.clone()));
        map.insert("passwd".to_string(), Value::String(self.passwd.clone()));
        map.insert("start".to_string(), Value::String(self.start.clone()));

        let texts = [
            ("channel", &self.channel),
            ("version", &self.version),
            ("platform", &self.platform),
            ("platform_string", &self.platform_string),
            ("platform_version", &self.platform_version),
            ("mac", &self.mac),
            ("id0", &self.id0),
            ("viewer_digest", &self.viewer_digest),
            ("address_size", &self.address_size),
            ("extended_errors", &self.extended_errors),
            ("last_exec_duration", &self.last_exec_duration),
        ];
        for (key, value) in texts {
            if let Some(v) = value {
                map.insert(key.to_string(), Value::String(v.clone()));
            }
        }

        let flags = [
            ("agree_to_tos", self.agree_to_tos),
            ("read_critical", self.read_critical),
            ("skipoptional", self.skipoptional),
        ];
        for (key, value) in flags {
            if let Some(v) = value {
                map.insert(key.to_string(), Value::Bool(v));
            }
        }

        if let Some(event) = self.last_exec_event {
            map.insert("last_exec_event".to_string(), Value::from(event));
        }
        map.insert("options".to_string(), self.options.to_canonical());

        map
    }

    /// Reads a request map. Fails when a required field is missing or blank.
    pub fn from_canonical(map: &CanonicalMap) -> Result<Self, RequestError> {
        for key in REQUIRED_FIELDS {
            match map.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                Some(Value::String(_)) | None => return Err(RequestError::MissingField(key)),
                Some(_) => {
                    return Err(RequestError::InvalidType {
                        key,
                        expected: "a string",
                    })
                }
            }
        }

        Ok(Self {
            first: text(map, "first")?.unwrap_or_default(),
            last: text(map, "last")?.unwrap_or_default(),
            passwd: text(map, "passwd")?.unwrap_or_default(),
            start: text(map, "start")?.unwrap_or_default(),
            channel: text(map, "channel")?,
            version: text(map, "version")?,
            platform: text(map, "platform")?,
            platform_string: text(map, "platform_string")?,
            platform_version: text(map, "platform_version")?,
            mac: text(map, "mac")?,
            id0: text(map, "id0")?,
            agree_to_tos: flag(map, "agree_to_tos")?,
            read_critical: flag(map, "read_critical")?,
            viewer_digest: text(map, "viewer_digest")?,
            address_size: text(map, "address_size")?,
            extended_errors: text(map, "extended_errors")?,
            last_exec_event: match map.get("last_exec_event") {
                None => None,
                Some(v) => Some(v.as_i64().ok_or(RequestError::InvalidType {
                    key: "last_exec_event",
                    expected: "an integer",
                })?),
            },
            last_exec_duration: text(map, "last_exec_duration")?,
            skipoptional: flag(map, "skipoptional")?,
            options: match map.get("options") {
                None => LoginOptions::none(),
                Some(Value::Array(items)) => {
                    let names = items
                        .iter()
                        .map(Value::as_str)
                        .collect::<Option<Vec<_>>>()
                        .ok_or(RequestError::InvalidType {
                            key: "options",
                            expected: "a list of option names",
                        })?;
                    LoginOptions::from_wire_keys(names)
                }
                Some(_) => {
                    return Err(RequestError::InvalidType {
                        key: "options",
                        expected: "a list of option names",
                    })
                }
            },
        })
    }
}

impl TryFrom<&Value> for LoginRequest {
    type Error = RequestError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value.as_object().ok_or(RequestError::NotAMap)?;
        LoginRequest::from_canonical(map)
    }
}

/// Platform tag for the host OS.
pub fn platform_tag() -> &'static str {
    match std::env::consts::OS {
        "macos" => "mac",
        "windows" => "win",
        _ => "lin",
    }
}

fn text(map: &Map<String, Value>, key: &'static str) -> Result<Option<String>, RequestError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        // Some viewers send numeric fields such as address_size as integers
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(RequestError::InvalidType {
            key,
            expected: "a string",
        }),
    }
}

fn flag(map: &Map<String, Value>, key: &'static str) -> Result<Option<bool>, RequestError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) if s == "true" => Ok(Some(true)),
        Some(Value::String(s)) if s == "false" => Ok(Some(false)),
        Some(_) => Err(RequestError::InvalidType {
            key,
            expected: "a boolean",
        }),
    }
}
