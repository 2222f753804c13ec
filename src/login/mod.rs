// Login handler: authenticates a request and fills in the response a viewer
// needs to connect to its start region.

mod accounts;
mod error;

pub use accounts::{Account, AccountDirectory, RegistrationError};
pub use error::LoginError;

use crate::config::{GridConfig, SharedRuntimeConfig};
use crate::request::LoginRequest;
use crate::response::{
    HomePosition, InitialOutfit, InventoryFolder, LoginFlags, LoginResponse, LookAt, UiConfig,
};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const LIBRARY_NAME: &str = "OpenSim Library";
const LIBRARY_FOLDER_TYPE: i32 = 8;

pub struct LoginService {
    accounts: Arc<AccountDirectory>,
    grid: GridConfig,
    runtime_config: SharedRuntimeConfig,
}

impl LoginService {
    pub fn new(
        accounts: Arc<AccountDirectory>,
        grid: GridConfig,
        runtime_config: SharedRuntimeConfig,
    ) -> Self {
        Self {
            accounts,
            grid,
            runtime_config,
        }
    }

    pub fn accounts(&self) -> &AccountDirectory {
        &self.accounts
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Check the request against the account directory and build the
    /// populated response on success.
    pub fn authenticate(&self, request: &LoginRequest) -> Result<LoginResponse, LoginError> {
        let logins_enabled = self
            .runtime_config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .logins_enabled;
        if !logins_enabled {
            return Err(LoginError::GridUnavailable);
        }

        for (field, value) in [
            ("first", &request.first),
            ("last", &request.last),
            ("passwd", &request.passwd),
            ("start", &request.start),
        ] {
            if value.trim().is_empty() {
                return Err(LoginError::MalformedRequest(format!("'{}' is required", field)));
            }
        }

        let account = self
            .accounts
            .find(&request.first, &request.last)
            .ok_or(LoginError::AuthenticationFailed)?;
        if account.passwd != request.passwd {
            return Err(LoginError::AuthenticationFailed);
        }
        // Checked after the password so a wrong guess does not learn the account state
        if account.disabled {
            return Err(LoginError::AccountDisabled);
        }

        let ever_logged_in = self
            .accounts
            .record_login(&account.first, &account.last)
            .unwrap_or(false);

        Ok(self.populate(&account, request, ever_logged_in))
    }

    /// Like `authenticate`, but a refusal becomes a failure response.
    /// A malformed request is not a refusal and is returned as the error,
    /// so no response is ever built for it.
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, LoginError> {
        match self.authenticate(request) {
            Ok(response) => {
                info!(
                    first = %request.first,
                    last = %request.last,
                    agent_id = ?response.agent_id,
                    circuit_code = ?response.circuit_code,
                    "Login accepted"
                );
                Ok(response)
            }
            Err(e @ LoginError::MalformedRequest(_)) => {
                warn!(error = %e, "Rejecting malformed login request");
                Err(e)
            }
            Err(e) => {
                warn!(
                    first = %request.first,
                    last = %request.last,
                    reason = e.reason(),
                    "Login refused"
                );
                Ok(LoginResponse::failure(e.to_string()))
            }
        }
    }

    fn populate(
        &self,
        account: &Account,
        request: &LoginRequest,
        ever_logged_in: bool,
    ) -> LoginResponse {
        let grid = &self.grid;
        let session_id = Uuid::new_v4();
        let circuit_code: u32 = rand::thread_rng().gen_range(1..=u32::MAX);
        let seconds_since_epoch = u64::try_from(Utc::now().timestamp()).unwrap_or(0);

        let library_root =
            InventoryFolder::new(grid.library_root, Uuid::nil(), LIBRARY_NAME, LIBRARY_FOLDER_TYPE, 1);

        LoginResponse {
            home: account
                .home
                .clone()
                .unwrap_or_else(|| self.default_home()),
            look_at: LookAt::new("1", "0", "0"),
            agent_access: Some(grid.agent_access),
            agent_access_max: Some(grid.agent_access_max),
            seed_capability: Some(format!(
                "{}/{}/",
                grid.seed_capability_base.trim_end_matches('/'),
                Uuid::new_v4()
            )),
            first_name: Some(account.first.clone()),
            last_name: Some(account.last.clone()),
            agent_id: Some(account.agent_id),
            sim_ip: Some(grid.sim_ip),
            sim_port: Some(grid.sim_port),
            http_port: Some(grid.http_port),
            start_location: Some(start_location(&request.start).to_string()),
            region_x: Some(grid.region_x),
            region_y: Some(grid.region_y),
            region_size_x: Some(grid.region_size),
            region_size_y: Some(grid.region_size),
            circuit_code: Some(circuit_code),
            session_id: Some(session_id),
            secure_session_id: Some(Uuid::new_v4()),
            inventory_root: Some(account.inventory_root.clone()),
            inventory_skeleton: account.inventory_skeleton.clone(),
            inventory_lib_root: Some(library_root.clone()),
            inventory_skel_lib: vec![library_root],
            inventory_lib_owner: Some(grid.library_owner),
            map_server_url: Some(grid.map_server_url.clone()),
            buddy_list: account.buddies.clone(),
            gestures: account.gestures.clone(),
            initial_outfit: InitialOutfit::new("Nightclub Female", "female"),
            global_textures: grid.global_textures(),
            login: Some(true),
            login_flags: LoginFlags::new(false, ever_logged_in, false, true, seconds_since_epoch),
            message: Some(grid.welcome_message.clone()),
            ui_config: UiConfig::new(false),
            event_categories: Vec::new(),
            classified_categories: grid.categories(),
            max_agent_groups: Some(grid.max_agent_groups),
        }
    }

    /// Center of the start region, 25m up
    fn default_home(&self) -> HomePosition {
        let center = (self.grid.region_size / 2).to_string();
        HomePosition::new(
            [self.grid.region_x.to_string(), self.grid.region_y.to_string()],
            [center.clone(), center, "25".to_string()],
            ["1".to_string(), "0".to_string(), "0".to_string()],
        )
    }
}

/// `start_location` reported back for a request's `start` value
pub fn start_location(start: &str) -> &'static str {
    if start.starts_with("uri:") {
        "url"
    } else if start.eq_ignore_ascii_case("home") {
        "home"
    } else {
        "last"
    }
}
