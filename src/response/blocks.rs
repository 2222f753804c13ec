/// Optional top-level blocks of a login response.
///
/// A login request lists the blocks it wants in its `options` field; the
/// response carries the core keys plus exactly those blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResponseBlock {
    InventoryRoot,
    InventorySkeleton,
    InventoryLibRoot,
    InventorySkelLib,
    InventoryLibOwner,
    MapServerUrl,
    BuddyList,
    Gestures,
    InitialOutfit,
    GlobalTextures,
    LoginFlags,
    UiConfig,
    EventCategories,
    ClassifiedCategories,
    MaxAgentGroups,
}

impl ResponseBlock {
    pub const ALL: [ResponseBlock; 15] = [
        ResponseBlock::InventoryRoot,
        ResponseBlock::InventorySkeleton,
        ResponseBlock::InventoryLibRoot,
        ResponseBlock::InventorySkelLib,
        ResponseBlock::InventoryLibOwner,
        ResponseBlock::MapServerUrl,
        ResponseBlock::BuddyList,
        ResponseBlock::Gestures,
        ResponseBlock::InitialOutfit,
        ResponseBlock::GlobalTextures,
        ResponseBlock::LoginFlags,
        ResponseBlock::UiConfig,
        ResponseBlock::EventCategories,
        ResponseBlock::ClassifiedCategories,
        ResponseBlock::MaxAgentGroups,
    ];

    /// Key used both in the response map and in the request's option list.
    /// The hyphen/underscore mix is what deployed grids expect.
    pub fn wire_key(self) -> &'static str {
        match self {
            ResponseBlock::InventoryRoot => "inventory-root",
            ResponseBlock::InventorySkeleton => "inventory-skeleton",
            ResponseBlock::InventoryLibRoot => "inventory-lib-root",
            ResponseBlock::InventorySkelLib => "inventory-skel-lib",
            ResponseBlock::InventoryLibOwner => "inventory-lib-owner",
            ResponseBlock::MapServerUrl => "map-server-url",
            ResponseBlock::BuddyList => "buddy-list",
            ResponseBlock::Gestures => "gestures",
            ResponseBlock::InitialOutfit => "initial-outfit",
            ResponseBlock::GlobalTextures => "global-textures",
            ResponseBlock::LoginFlags => "login-flags",
            ResponseBlock::UiConfig => "ui-config",
            ResponseBlock::EventCategories => "event_categories",
            ResponseBlock::ClassifiedCategories => "classified_categories",
            ResponseBlock::MaxAgentGroups => "max-agent-groups",
        }
    }

    pub fn from_wire_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|block| block.wire_key() == key)
    }
}
