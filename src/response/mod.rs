use serde_json::{json, Map, Value};
use std::net::IpAddr;
use uuid::Uuid;

mod access;
mod blocks;
mod decode;
mod records;
mod rights;
mod wire;

pub use access::AgentAccess;
pub use blocks::ResponseBlock;
pub use decode::ConversionError;
pub use records::{
    BuddyEntry, ClassifiedCategory, GestureEntry, GlobalTextures, HomePosition, InitialOutfit,
    InventoryFolder, LoginFlags, LookAt, UiConfig, NO_DEFAULT_TYPE,
};
pub use rights::FriendRights;
pub use wire::{PLACEHOLDER, REAL_TAG};

/// Wire key -> value mapping handed to the transport.
pub type CanonicalMap = Map<String, Value>;

/// Keys present in every encoded response, whatever blocks were requested.
pub const CORE_KEYS: [&str; 21] = [
    "home",
    "look_at",
    "agent_access",
    "agent_access_max",
    "seed_capability",
    "first_name",
    "last_name",
    "agent_id",
    "sim_ip",
    "sim_port",
    "http_port",
    "start_location",
    "region_x",
    "region_y",
    "region_size_x",
    "region_size_y",
    "circuit_code",
    "session_id",
    "secure_session_id",
    "login",
    "message",
];

/// Everything a viewer needs after authenticating against a grid login service.
///
/// Unset fields are `None` (or empty) and are written as the `"None"`
/// placeholder when encoded, so even a bare error response carries every key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginResponse {
    pub home: HomePosition,
    pub look_at: LookAt,
    /// Current maturity tier of the agent
    pub agent_access: Option<AgentAccess>,
    /// Highest tier the agent may enter
    pub agent_access_max: Option<AgentAccess>,
    /// URL the viewer uses to request further capabilities
    pub seed_capability: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub agent_id: Option<Uuid>,
    /// Simulator the viewer opens its UDP circuit to
    pub sim_ip: Option<IpAddr>,
    pub sim_port: Option<u16>,
    pub http_port: Option<u16>,
    /// `home`, `last` or `url`
    pub start_location: Option<String>,
    /// Grid x of the start region in meters
    pub region_x: Option<u32>,
    pub region_y: Option<u32>,
    pub region_size_x: Option<u32>,
    pub region_size_y: Option<u32>,
    /// Code identifying the UDP circuit
    pub circuit_code: Option<u32>,
    pub session_id: Option<Uuid>,
    pub secure_session_id: Option<Uuid>,
    pub inventory_root: Option<InventoryFolder>,
    pub inventory_skeleton: Vec<InventoryFolder>,
    pub inventory_lib_root: Option<InventoryFolder>,
    pub inventory_skel_lib: Vec<InventoryFolder>,
    pub inventory_lib_owner: Option<Uuid>,
    pub map_server_url: Option<String>,
    pub buddy_list: Vec<BuddyEntry>,
    pub gestures: Vec<GestureEntry>,
    pub initial_outfit: InitialOutfit,
    pub global_textures: GlobalTextures,
    /// Whether the login succeeded
    pub login: Option<bool>,
    pub login_flags: LoginFlags,
    pub message: Option<String>,
    pub ui_config: UiConfig,
    /// Passed through untouched
    pub event_categories: Vec<Value>,
    pub classified_categories: Vec<ClassifiedCategory>,
    pub max_agent_groups: Option<u32>,
}

impl LoginResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error variant: `login = "false"`, the given message, everything else unset.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            login: Some(false),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.login == Some(true)
    }

    /// Encode every key, core and optional.
    pub fn to_canonical(&self) -> CanonicalMap {
        self.to_canonical_with(ResponseBlock::ALL)
    }

    /// Encode the core keys plus the requested optional blocks.
    pub fn to_canonical_with<I>(&self, blocks: I) -> CanonicalMap
    where
        I: IntoIterator<Item = ResponseBlock>,
    {
        let mut map = self.core_canonical();
        for block in blocks {
            map.insert(block.wire_key().to_string(), self.block_canonical(block));
        }
        map
    }

    fn core_canonical(&self) -> CanonicalMap {
        let mut map = CanonicalMap::new();
        let mut put = |key: &str, value: Value| {
            map.insert(key.to_string(), value);
        };

        put("home", self.home.to_canonical());
        put("look_at", self.look_at.to_canonical());
        put("agent_access", access_value(self.agent_access));
        put("agent_access_max", access_value(self.agent_access_max));
        put("seed_capability", wire::text(&self.seed_capability));
        put("first_name", wire::text(&self.first_name));
        put("last_name", wire::text(&self.last_name));
        put("agent_id", wire::uuid(&self.agent_id));
        put(
            "sim_ip",
            self.sim_ip
                .map_or_else(wire::placeholder, |ip| Value::String(ip.to_string())),
        );
        put("sim_port", wire::number(self.sim_port));
        put("http_port", wire::number(self.http_port));
        put("start_location", wire::text(&self.start_location));
        put("region_x", wire::number(self.region_x));
        put("region_y", wire::number(self.region_y));
        put("region_size_x", wire::number(self.region_size_x));
        put("region_size_y", wire::number(self.region_size_y));
        put("circuit_code", wire::number(self.circuit_code));
        put("session_id", wire::uuid(&self.session_id));
        put("secure_session_id", wire::uuid(&self.secure_session_id));
        put("login", wire::bool_text(self.login));
        put("message", wire::text(&self.message));

        map
    }

    fn block_canonical(&self, block: ResponseBlock) -> Value {
        match block {
            ResponseBlock::InventoryRoot => folder_reference(&self.inventory_root),
            ResponseBlock::InventorySkeleton => folder_list(&self.inventory_skeleton),
            ResponseBlock::InventoryLibRoot => folder_reference(&self.inventory_lib_root),
            ResponseBlock::InventorySkelLib => folder_list(&self.inventory_skel_lib),
            ResponseBlock::InventoryLibOwner => self
                .inventory_lib_owner
                .map_or_else(wire::placeholder, |id| {
                    json!([{ "agent_id": id.to_string() }])
                }),
            ResponseBlock::MapServerUrl => wire::text(&self.map_server_url),
            ResponseBlock::BuddyList => {
                Value::Array(self.buddy_list.iter().map(BuddyEntry::to_canonical).collect())
            }
            ResponseBlock::Gestures => {
                Value::Array(self.gestures.iter().map(GestureEntry::to_canonical).collect())
            }
            ResponseBlock::InitialOutfit => json!([self.initial_outfit.to_canonical()]),
            ResponseBlock::GlobalTextures => json!([self.global_textures.to_canonical()]),
            ResponseBlock::LoginFlags => json!([self.login_flags.to_canonical()]),
            ResponseBlock::UiConfig => json!([self.ui_config.to_canonical()]),
            ResponseBlock::EventCategories => Value::Array(self.event_categories.clone()),
            ResponseBlock::ClassifiedCategories => Value::Array(
                self.classified_categories
                    .iter()
                    .map(ClassifiedCategory::to_canonical)
                    .collect(),
            ),
            ResponseBlock::MaxAgentGroups => wire::number(self.max_agent_groups),
        }
    }
}

fn access_value(access: Option<AgentAccess>) -> Value {
    access.map_or_else(wire::placeholder, |a| Value::String(a.as_tag().to_string()))
}

// Root folders travel as a one-element list.
fn folder_reference(folder: &Option<InventoryFolder>) -> Value {
    folder
        .as_ref()
        .map_or_else(wire::placeholder, |f| json!([f.to_canonical()]))
}

fn folder_list(folders: &[InventoryFolder]) -> Value {
    Value::Array(folders.iter().map(InventoryFolder::to_canonical).collect())
}
