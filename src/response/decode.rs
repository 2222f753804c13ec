use super::records::{
    BuddyEntry, ClassifiedCategory, GestureEntry, GlobalTextures, HomePosition, InitialOutfit,
    InventoryFolder, LoginFlags, LookAt, UiConfig, NO_DEFAULT_TYPE,
};
use super::rights::FriendRights;
use super::wire::{is_placeholder, untag};
use super::{AgentAccess, CanonicalMap, LoginResponse};
use serde_json::{Map, Value};
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

/// Errors raised while rebuilding a response from a grid's canonical map
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    NotAMap,
    MissingField(String),
    InvalidType { key: String, expected: &'static str },
    InvalidValue { key: String, value: String },
    InvalidLength { key: String, expected: usize },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::NotAMap => write!(f, "login response must be a map"),
            ConversionError::MissingField(key) => write!(f, "missing field '{}'", key),
            ConversionError::InvalidType { key, expected } => {
                write!(f, "field '{}' must be {}", key, expected)
            }
            ConversionError::InvalidValue { key, value } => {
                write!(f, "field '{}' has invalid value '{}'", key, value)
            }
            ConversionError::InvalidLength { key, expected } => {
                write!(f, "field '{}' must have {} elements", key, expected)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

type Result<T> = std::result::Result<T, ConversionError>;

impl LoginResponse {
    /// Rebuilds a response from a canonical map.
    ///
    /// Missing keys and `"None"` placeholders decode to unset. Grids differ in
    /// how they send `home`, `look_at` and integers, so the string forms are
    /// accepted too.
    pub fn from_canonical(map: &CanonicalMap) -> Result<Self> {
        Ok(Self {
            home: home(map.get("home"))?,
            look_at: look_at(map.get("look_at"))?,
            agent_access: access(map, "agent_access")?,
            agent_access_max: access(map, "agent_access_max")?,
            seed_capability: opt_text(map, "seed_capability")?,
            first_name: opt_text(map, "first_name")?,
            last_name: opt_text(map, "last_name")?,
            agent_id: opt_uuid(map, "agent_id")?,
            sim_ip: opt_ip(map, "sim_ip")?,
            sim_port: opt_number(map, "sim_port")?,
            http_port: opt_number(map, "http_port")?,
            start_location: opt_text(map, "start_location")?,
            region_x: opt_number(map, "region_x")?,
            region_y: opt_number(map, "region_y")?,
            region_size_x: opt_number(map, "region_size_x")?,
            region_size_y: opt_number(map, "region_size_y")?,
            circuit_code: opt_number(map, "circuit_code")?,
            session_id: opt_uuid(map, "session_id")?,
            secure_session_id: opt_uuid(map, "secure_session_id")?,
            inventory_root: first_record(map, "inventory-root", folder)?,
            inventory_skeleton: records(map, "inventory-skeleton", folder)?,
            inventory_lib_root: first_record(map, "inventory-lib-root", folder)?,
            inventory_skel_lib: records(map, "inventory-skel-lib", folder)?,
            inventory_lib_owner: first_record(map, "inventory-lib-owner", |m| {
                opt_uuid(m, "agent_id")
            })?
            .flatten(),
            map_server_url: opt_text(map, "map-server-url")?,
            buddy_list: records(map, "buddy-list", buddy)?,
            gestures: records(map, "gestures", gesture)?,
            initial_outfit: first_record(map, "initial-outfit", initial_outfit)?
                .unwrap_or_default(),
            global_textures: first_record(map, "global-textures", global_textures)?
                .unwrap_or_default(),
            login: opt_bool_text(map, "login")?,
            login_flags: first_record(map, "login-flags", login_flags)?.unwrap_or_default(),
            message: opt_text(map, "message")?,
            ui_config: first_record(map, "ui-config", ui_config)?.unwrap_or_default(),
            event_categories: match map.get("event_categories") {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            },
            classified_categories: records(map, "classified_categories", classified_category)?,
            max_agent_groups: opt_number(map, "max-agent-groups")?,
        })
    }
}

impl TryFrom<&Value> for LoginResponse {
    type Error = ConversionError;

    fn try_from(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or(ConversionError::NotAMap)?;
        LoginResponse::from_canonical(map)
    }
}

fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !is_placeholder(v))
}

fn invalid_type(key: &str, expected: &'static str) -> ConversionError {
    ConversionError::InvalidType {
        key: key.to_string(),
        expected,
    }
}

fn opt_text(map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid_type(key, "a string")),
    }
}

fn required_text(map: &Map<String, Value>, key: &str) -> Result<String> {
    opt_text(map, key)?.ok_or_else(|| ConversionError::MissingField(key.to_string()))
}

fn parse_uuid(key: &str, raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ConversionError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn opt_uuid(map: &Map<String, Value>, key: &str) -> Result<Option<Uuid>> {
    opt_text(map, key)?
        .map(|raw| parse_uuid(key, &raw))
        .transpose()
}

fn required_uuid(map: &Map<String, Value>, key: &str) -> Result<Uuid> {
    parse_uuid(key, &required_text(map, key)?)
}

fn opt_ip(map: &Map<String, Value>, key: &str) -> Result<Option<IpAddr>> {
    opt_text(map, key)?
        .map(|raw| {
            raw.parse::<IpAddr>().map_err(|_| ConversionError::InvalidValue {
                key: key.to_string(),
                value: raw,
            })
        })
        .transpose()
}

/// Integers arrive either as numbers or as numeric strings.
fn opt_number<T: TryFrom<i128>>(map: &Map<String, Value>, key: &str) -> Result<Option<T>> {
    let raw = match present(map, key) {
        None => return Ok(None),
        // u64 values above i64::MAX only fit as_u64
        Some(Value::Number(n)) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        Some(Value::String(s)) => s.trim().parse::<i128>().ok(),
        Some(_) => None,
    };
    let value = raw.ok_or_else(|| invalid_type(key, "an integer"))?;
    T::try_from(value)
        .map(Some)
        .map_err(|_| ConversionError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn required_number<T: TryFrom<i128>>(map: &Map<String, Value>, key: &str) -> Result<T> {
    opt_number(map, key)?.ok_or_else(|| ConversionError::MissingField(key.to_string()))
}

fn opt_bool_text(map: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) => match s.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(ConversionError::InvalidValue {
                key: key.to_string(),
                value: other.to_string(),
            }),
        },
        Some(_) => Err(invalid_type(key, "\"true\" or \"false\"")),
    }
}

fn opt_flag(map: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    match opt_text(map, key)?.as_deref() {
        None => Ok(None),
        Some("Y") => Ok(Some(true)),
        Some("N") => Ok(Some(false)),
        Some(other) => Err(ConversionError::InvalidValue {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}

fn access(map: &Map<String, Value>, key: &str) -> Result<Option<AgentAccess>> {
    opt_text(map, key)?
        .map(|tag| {
            AgentAccess::from_tag(&tag).ok_or(ConversionError::InvalidValue {
                key: key.to_string(),
                value: tag,
            })
        })
        .transpose()
}

/// Decodes a list of maps; unset decodes to an empty list.
fn records<T>(
    map: &Map<String, Value>,
    key: &str,
    decode: impl Fn(&Map<String, Value>) -> Result<T>,
) -> Result<Vec<T>> {
    match present(map, key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_object()
                    .ok_or_else(|| invalid_type(key, "a list of maps"))
                    .and_then(&decode)
            })
            .collect(),
        Some(_) => Err(invalid_type(key, "a list")),
    }
}

/// Decodes a block sent as a one-element list (or, from some grids, a bare map).
fn first_record<T>(
    map: &Map<String, Value>,
    key: &str,
    decode: impl Fn(&Map<String, Value>) -> Result<T>,
) -> Result<Option<T>> {
    match present(map, key) {
        Some(Value::Object(inner)) => decode(inner).map(Some),
        _ => Ok(records(map, key, decode)?.into_iter().next()),
    }
}

fn folder(map: &Map<String, Value>) -> Result<InventoryFolder> {
    Ok(InventoryFolder {
        folder_id: opt_uuid(map, "folder_id")?,
        parent_id: opt_uuid(map, "parent_id")?,
        name: opt_text(map, "name")?,
        type_default: opt_number(map, "type_default")?.unwrap_or(NO_DEFAULT_TYPE),
        version: opt_number(map, "version")?,
    })
}

fn buddy(map: &Map<String, Value>) -> Result<BuddyEntry> {
    Ok(BuddyEntry {
        buddy_id: required_uuid(map, "buddy_id")?,
        buddy_rights_given: FriendRights::from_wire(
            opt_number::<i64>(map, "buddy_rights_given")?.unwrap_or(0),
        ),
        buddy_rights_has: FriendRights::from_wire(
            opt_number::<i64>(map, "buddy_rights_has")?.unwrap_or(0),
        ),
    })
}

fn gesture(map: &Map<String, Value>) -> Result<GestureEntry> {
    Ok(GestureEntry {
        item_id: required_uuid(map, "item_id")?,
        asset_id: required_uuid(map, "asset_id")?,
    })
}

fn classified_category(map: &Map<String, Value>) -> Result<ClassifiedCategory> {
    Ok(ClassifiedCategory {
        category_id: required_number(map, "category_id")?,
        category_name: required_text(map, "category_name")?,
    })
}

fn initial_outfit(map: &Map<String, Value>) -> Result<InitialOutfit> {
    Ok(InitialOutfit {
        folder_name: opt_text(map, "folder_name")?,
        gender: opt_text(map, "gender")?,
    })
}

fn global_textures(map: &Map<String, Value>) -> Result<GlobalTextures> {
    Ok(GlobalTextures {
        cloud_texture_id: opt_uuid(map, "cloud_texture_id")?,
        sun_texture_id: opt_uuid(map, "sun_texture_id")?,
        moon_texture_id: opt_uuid(map, "moon_texture_id")?,
    })
}

fn login_flags(map: &Map<String, Value>) -> Result<LoginFlags> {
    Ok(LoginFlags {
        stipend_since_login: opt_flag(map, "stipend_since_login")?,
        ever_logged_in: opt_flag(map, "ever_logged_in")?,
        daylight_savings: opt_flag(map, "daylight_savings")?,
        gendered: opt_flag(map, "gendered")?,
        seconds_since_epoch: opt_number(map, "seconds_since_epoch")?,
    })
}

fn ui_config(map: &Map<String, Value>) -> Result<UiConfig> {
    Ok(UiConfig {
        allow_first_life: opt_flag(map, "allow_first_life")?,
    })
}

/// Tagged coordinates, from either a JSON list or a `[r1,r2,r3]` string.
fn coordinates<const N: usize>(value: Option<&Value>, key: &str) -> Result<[Option<String>; N]> {
    let values: Vec<Option<String>> = match value {
        None => return Ok(std::array::from_fn(|_| None)),
        Some(v) if is_placeholder(v) => return Ok(std::array::from_fn(|_| None)),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(untag(s)),
                Value::Number(n) => Ok(Some(n.to_string())),
                _ => Err(invalid_type(key, "a list of coordinates")),
            })
            .collect::<Result<_>>()?,
        Some(Value::String(s)) => split_coordinates(s),
        Some(_) => return Err(invalid_type(key, "a list of coordinates")),
    };
    fixed(values, key)
}

fn split_coordinates(raw: &str) -> Vec<Option<String>> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(untag)
        .collect()
}

fn fixed<const N: usize>(values: Vec<Option<String>>, key: &str) -> Result<[Option<String>; N]> {
    values
        .try_into()
        .map_err(|_| ConversionError::InvalidLength {
            key: key.to_string(),
            expected: N,
        })
}

fn look_at(value: Option<&Value>) -> Result<LookAt> {
    let [x, y, z] = coordinates::<3>(value, "look_at")?;
    Ok(LookAt { x, y, z })
}

fn home(value: Option<&Value>) -> Result<HomePosition> {
    match value {
        None => Ok(HomePosition::default()),
        Some(v) if is_placeholder(v) => Ok(HomePosition::default()),
        Some(Value::Object(map)) => Ok(HomePosition {
            region_handle: coordinates(map.get("region_handle"), "home.region_handle")?,
            position: coordinates(map.get("position"), "home.position")?,
            look_at: coordinates(map.get("look_at"), "home.look_at")?,
        }),
        Some(Value::String(s)) => legacy_home(s),
        Some(_) => Err(invalid_type("home", "a map or a home string")),
    }
}

/// Parses `{'region_handle':[r256000,r256000], 'position':[...], 'look_at':[...]}`.
fn legacy_home(raw: &str) -> Result<HomePosition> {
    let mut home = HomePosition::default();
    let body = raw.trim().trim_start_matches('{').trim_end_matches('}');

    for section in body.split("],") {
        let Some((label, values)) = section.split_once(":[") else {
            continue;
        };
        let label = label.trim().trim_matches(|c: char| c == '\'' || c == '"');
        let values = split_coordinates(values);
        match label {
            "region_handle" => home.region_handle = fixed(values, "home.region_handle")?,
            "position" => home.position = fixed(values, "home.position")?,
            "look_at" => home.look_at = fixed(values, "home.look_at")?,
            _ => {}
        }
    }

    Ok(home)
}
