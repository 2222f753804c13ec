// Loading configuration files from disk.

use gridlogin::config::load_config;
use gridlogin::response::AgentAccess;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
rpc_bind = "127.0.0.1:8002"

[grid]
sim_port = 9050
agent_access_max = "PG"
seed_capability_base = "http://grid.example:8002/CAPS/"

[[accounts]]
first = "Test"
last = "User"
passwd = "$1$secret"
"#
    )
    .unwrap();

    let config = load_config(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.server.rpc_bind, "127.0.0.1:8002");
    assert_eq!(config.server.udp_bind, "127.0.0.1:9001");
    assert_eq!(config.grid.sim_port, 9050);
    assert_eq!(config.grid.agent_access_max, AgentAccess::PG);
    assert_eq!(config.grid.agent_access, AgentAccess::Mature);
    assert_eq!(config.accounts.len(), 1);
    assert_eq!(config.accounts[0].first, "Test");
}

#[test]
fn test_load_config_missing_file() {
    assert!(load_config("/nonexistent/gridlogin.toml").is_err());
}

#[test]
fn test_load_config_invalid_toml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[grid\nsim_port = ").unwrap();
    assert!(load_config(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_load_config_rejects_bad_access_tag() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[grid]\nagent_access = \"X\"").unwrap();
    assert!(load_config(file.path().to_str().unwrap()).is_err());
}
