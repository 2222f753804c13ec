use super::rights::FriendRights;
use super::wire;
use serde_json::{json, Value};
use uuid::Uuid;

/// `type_default` value meaning "no preferred asset type".
pub const NO_DEFAULT_TYPE: i32 = -1;

/// Home location of the agent.
///
/// Coordinates are kept as the caller gave them (numeric text or unset) and
/// only receive their `r` type tag when encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomePosition {
    /// Grid coordinates of the home region in meters (x, y)
    pub region_handle: [Option<String>; 2],
    /// Position inside the region (x, y, z)
    pub position: [Option<String>; 3],
    /// Facing direction on arrival (x, y, z)
    pub look_at: [Option<String>; 3],
}

impl HomePosition {
    pub fn new<S: Into<String>>(region_handle: [S; 2], position: [S; 3], look_at: [S; 3]) -> Self {
        Self {
            region_handle: region_handle.map(|v| Some(v.into())),
            position: position.map(|v| Some(v.into())),
            look_at: look_at.map(|v| Some(v.into())),
        }
    }

    pub fn to_canonical(&self) -> Value {
        json!({
            "region_handle": wire::tagged_list(&self.region_handle),
            "position": wire::tagged_list(&self.position),
            "look_at": wire::tagged_list(&self.look_at),
        })
    }

    /// The single-string form production grids put in the `home` field,
    /// e.g. `{'region_handle':[r256000,r256000], 'position':[r128,r128,r25], 'look_at':[r1,r0,r0]}`.
    pub fn to_legacy_string(&self) -> String {
        fn join(values: &[Option<String>]) -> String {
            values.iter().map(wire::tag).collect::<Vec<_>>().join(",")
        }
        format!(
            "{{'region_handle':[{}], 'position':[{}], 'look_at':[{}]}}",
            join(&self.region_handle),
            join(&self.position),
            join(&self.look_at)
        )
    }
}

/// Direction the avatar faces after login. Encoded as a 3-element list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookAt {
    pub x: Option<String>,
    pub y: Option<String>,
    pub z: Option<String>,
}

impl LookAt {
    pub fn new<S: Into<String>>(x: S, y: S, z: S) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
            z: Some(z.into()),
        }
    }

    pub fn to_canonical(&self) -> Value {
        wire::tagged_list(&[self.x.clone(), self.y.clone(), self.z.clone()])
    }
}

/// One inventory folder, as used by the root, library root and both skeletons.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryFolder {
    pub folder_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub name: Option<String>,
    pub type_default: i32,
    pub version: Option<u32>,
}

impl Default for InventoryFolder {
    fn default() -> Self {
        Self {
            folder_id: None,
            parent_id: None,
            name: None,
            type_default: NO_DEFAULT_TYPE,
            version: None,
        }
    }
}

impl InventoryFolder {
    pub fn new(
        folder_id: Uuid,
        parent_id: Uuid,
        name: impl Into<String>,
        type_default: i32,
        version: u32,
    ) -> Self {
        Self {
            folder_id: Some(folder_id),
            parent_id: Some(parent_id),
            name: Some(name.into()),
            type_default,
            version: Some(version),
        }
    }

    pub fn to_canonical(&self) -> Value {
        json!({
            "folder_id": wire::uuid(&self.folder_id),
            "parent_id": wire::uuid(&self.parent_id),
            "name": wire::text(&self.name),
            "type_default": self.type_default,
            "version": wire::number(self.version),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuddyEntry {
    pub buddy_id: Uuid,
    /// Rights this agent has given the buddy
    pub buddy_rights_given: FriendRights,
    /// Rights the buddy has given this agent
    pub buddy_rights_has: FriendRights,
}

impl BuddyEntry {
    pub fn new(buddy_id: Uuid, buddy_rights_given: FriendRights, buddy_rights_has: FriendRights) -> Self {
        Self {
            buddy_id,
            buddy_rights_given,
            buddy_rights_has,
        }
    }

    pub fn to_canonical(&self) -> Value {
        json!({
            "buddy_id": self.buddy_id.to_string(),
            "buddy_rights_given": self.buddy_rights_given.bits(),
            "buddy_rights_has": self.buddy_rights_has.bits(),
        })
    }
}

/// An active gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEntry {
    /// Item id in the agent's inventory
    pub item_id: Uuid,
    pub asset_id: Uuid,
}

impl GestureEntry {
    pub fn new(item_id: Uuid, asset_id: Uuid) -> Self {
        Self { item_id, asset_id }
    }

    pub fn to_canonical(&self) -> Value {
        json!({
            "item_id": self.item_id.to_string(),
            "asset_id": self.asset_id.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalTextures {
    pub cloud_texture_id: Option<Uuid>,
    pub sun_texture_id: Option<Uuid>,
    pub moon_texture_id: Option<Uuid>,
}

impl GlobalTextures {
    pub fn new(cloud_texture_id: Uuid, sun_texture_id: Uuid, moon_texture_id: Uuid) -> Self {
        Self {
            cloud_texture_id: Some(cloud_texture_id),
            sun_texture_id: Some(sun_texture_id),
            moon_texture_id: Some(moon_texture_id),
        }
    }

    pub fn to_canonical(&self) -> Value {
        json!({
            "cloud_texture_id": wire::uuid(&self.cloud_texture_id),
            "sun_texture_id": wire::uuid(&self.sun_texture_id),
            "moon_texture_id": wire::uuid(&self.moon_texture_id),
        })
    }
}

/// Account and clock flags. The booleans travel as `"Y"`/`"N"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginFlags {
    /// Stipend paid out since the last login
    pub stipend_since_login: Option<bool>,
    pub ever_logged_in: Option<bool>,
    pub daylight_savings: Option<bool>,
    pub gendered: Option<bool>,
    /// Server time in Unix seconds
    pub seconds_since_epoch: Option<u64>,
}

impl LoginFlags {
    pub fn new(
        stipend_since_login: bool,
        ever_logged_in: bool,
        daylight_savings: bool,
        gendered: bool,
        seconds_since_epoch: u64,
    ) -> Self {
        Self {
            stipend_since_login: Some(stipend_since_login),
            ever_logged_in: Some(ever_logged_in),
            daylight_savings: Some(daylight_savings),
            gendered: Some(gendered),
            seconds_since_epoch: Some(seconds_since_epoch),
        }
    }

    pub fn to_canonical(&self) -> Value {
        json!({
            "stipend_since_login": wire::flag(self.stipend_since_login),
            "ever_logged_in": wire::flag(self.ever_logged_in),
            "seconds_since_epoch": wire::number(self.seconds_since_epoch),
            "daylight_savings": wire::flag(self.daylight_savings),
            "gendered": wire::flag(self.gendered),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiConfig {
    pub allow_first_life: Option<bool>,
}

impl UiConfig {
    pub fn new(allow_first_life: bool) -> Self {
        Self {
            allow_first_life: Some(allow_first_life),
        }
    }

    pub fn to_canonical(&self) -> Value {
        json!({ "allow_first_life": wire::flag(self.allow_first_life) })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedCategory {
    pub category_id: i32,
    pub category_name: String,
}

impl ClassifiedCategory {
    pub fn new(category_id: i32, category_name: impl Into<String>) -> Self {
        Self {
            category_id,
            category_name: category_name.into(),
        }
    }

    pub fn to_canonical(&self) -> Value {
        json!({
            "category_id": self.category_id,
            "category_name": self.category_name,
        })
    }
}

/// Starter outfit offered to new accounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialOutfit {
    pub folder_name: Option<String>,
    pub gender: Option<String>,
}

impl InitialOutfit {
    pub fn new(folder_name: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            folder_name: Some(folder_name.into()),
            gender: Some(gender.into()),
        }
    }

    pub fn to_canonical(&self) -> Value {
        json!({
            "folder_name": wire::text(&self.folder_name),
            "gender": wire::text(&self.gender),
        })
    }
}
