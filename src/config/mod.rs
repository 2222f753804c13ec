pub mod runtime;
pub use runtime::{new_runtime_config, RuntimeConfig, SharedRuntimeConfig};

use crate::response::{AgentAccess, ClassifiedCategory, GlobalTextures};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use uuid::Uuid;

/// Complete gridlogin configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridLoginConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub grid: GridConfig,
    /// Accounts seeded into the directory at startup
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// Listener addresses
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_rpc_bind")]
    pub rpc_bind: String,
    #[serde(default = "default_udp_bind")]
    pub udp_bind: String,
}

fn default_rpc_bind() -> String {
    "127.0.0.1:9000".to_string()
}

fn default_udp_bind() -> String {
    "127.0.0.1:9001".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rpc_bind: default_rpc_bind(),
            udp_bind: default_udp_bind(),
        }
    }
}

/// What the grid tells a viewer after a successful login
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub sim_ip: IpAddr,
    pub sim_port: u16,
    /// Always 0 on OpenSimulator
    pub http_port: u16,
    /// Grid x of the start region in meters
    pub region_x: u32,
    pub region_y: u32,
    pub region_size: u32,
    /// Seed capabilities are handed out below this URL
    pub seed_capability_base: String,
    pub map_server_url: String,
    pub welcome_message: String,
    pub agent_access: AgentAccess,
    pub agent_access_max: AgentAccess,
    pub library_owner: Uuid,
    pub library_root: Uuid,
    pub max_agent_groups: u32,
    pub cloud_texture_id: Uuid,
    pub sun_texture_id: Uuid,
    pub moon_texture_id: Uuid,
    pub classified_categories: Vec<CategoryConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub id: i32,
    pub name: String,
}

impl GridConfig {
    pub fn global_textures(&self) -> GlobalTextures {
        GlobalTextures::new(self.cloud_texture_id, self.sun_texture_id, self.moon_texture_id)
    }

    pub fn categories(&self) -> Vec<ClassifiedCategory> {
        self.classified_categories
            .iter()
            .map(|c| ClassifiedCategory::new(c.id, c.name.clone()))
            .collect()
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            sim_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            sim_port: 9001,
            http_port: 0,
            region_x: 256_000,
            region_y: 256_000,
            region_size: 256,
            seed_capability_base: "http://127.0.0.1:9000/CAPS".to_string(),
            map_server_url: "http://127.0.0.1:9000/map/".to_string(),
            welcome_message: "Welcome to the grid".to_string(),
            agent_access: AgentAccess::Mature,
            agent_access_max: AgentAccess::Adult,
            // OpenSimulator's library owner and library root folder
            library_owner: Uuid::from_u128(0x11111111_1111_0000_0000_000100bba000),
            library_root: Uuid::from_u128(0x00000112_000f_0000_0000_000100bba000),
            max_agent_groups: 42,
            cloud_texture_id: Uuid::from_u128(0xdc4b9f0b_d008_45c6_96a4_01dd947ac621),
            sun_texture_id: Uuid::from_u128(0xcce0f112_878f_4586_a2e2_a8f104bba271),
            moon_texture_id: Uuid::from_u128(0xec4b9f0b_d008_45c6_96a4_01dd947ac621),
            classified_categories: default_categories(),
        }
    }
}

fn default_categories() -> Vec<CategoryConfig> {
    [
        (1, "Shopping"),
        (2, "Land Rental"),
        (3, "Property Rental"),
        (4, "Special Attraction"),
        (5, "New Products"),
        (6, "Employment"),
        (7, "Wanted"),
        (8, "Service"),
        (9, "Personal"),
    ]
    .into_iter()
    .map(|(id, name)| CategoryConfig {
        id,
        name: name.to_string(),
    })
    .collect()
}

/// Account entry in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    pub first: String,
    pub last: String,
    pub passwd: String,
    #[serde(default)]
    pub disabled: bool,
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<GridLoginConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: GridLoginConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridLoginConfig::default();
        assert_eq!(config.server.rpc_bind, "127.0.0.1:9000");
        assert_eq!(config.server.udp_bind, "127.0.0.1:9001");
        assert_eq!(config.grid.sim_port, 9001);
        assert_eq!(config.grid.http_port, 0);
        assert_eq!(config.grid.region_size, 256);
        assert_eq!(config.grid.agent_access, AgentAccess::Mature);
        assert_eq!(
            config.grid.library_owner.to_string(),
            "11111111-1111-0000-0000-000100bba000"
        );
        assert_eq!(config.grid.classified_categories.len(), 9);
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [server]
            rpc_bind = "0.0.0.0:8002"
            udp_bind = "0.0.0.0:9100"

            [grid]
            sim_ip = "10.0.0.5"
            sim_port = 9100
            region_x = 512000
            region_y = 256000
            agent_access = "PG"
            agent_access_max = "M"
            welcome_message = "Hello"
            classified_categories = [{ id = 1, name = "Shopping" }]

            [[accounts]]
            first = "Test"
            last = "User"
            passwd = "$1$secret"

            [[accounts]]
            first = "Banned"
            last = "User"
            passwd = "x"
            disabled = true
        "#;

        let config: GridLoginConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.rpc_bind, "0.0.0.0:8002");
        assert_eq!(config.grid.sim_ip.to_string(), "10.0.0.5");
        assert_eq!(config.grid.region_x, 512000);
        assert_eq!(config.grid.agent_access, AgentAccess::PG);
        assert_eq!(config.grid.agent_access_max, AgentAccess::Mature);
        assert_eq!(config.grid.categories(), vec![ClassifiedCategory::new(1, "Shopping")]);
        assert_eq!(config.accounts.len(), 2);
        assert!(!config.accounts[0].disabled);
        assert!(config.accounts[1].disabled);
    }

    #[test]
    fn test_partial_config() {
        // Missing sections and fields use defaults
        let toml = r#"
            [grid]
            welcome_message = "Hi"
        "#;

        let config: GridLoginConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.grid.welcome_message, "Hi");
        assert_eq!(config.grid.sim_port, 9001);
        assert_eq!(config.server.rpc_bind, "127.0.0.1:9000");
    }

    #[test]
    fn test_global_textures_from_config() {
        let grid = GridConfig::default();
        let textures = grid.global_textures();
        assert_eq!(textures.sun_texture_id, Some(grid.sun_texture_id));
        assert_eq!(
            textures.cloud_texture_id.map(|id| id.to_string()).as_deref(),
            Some("dc4b9f0b-d008-45c6-96a4-01dd947ac621")
        );
    }
}
