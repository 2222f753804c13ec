use crate::response::{BuddyEntry, GestureEntry, HomePosition, InventoryFolder};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Asset types of the standard folders every new account gets
const ROOT_FOLDER_TYPE: i32 = 8;
const STANDARD_FOLDERS: [(&str, i32); 8] = [
    ("Textures", 0),
    ("Clothing", 5),
    ("Objects", 6),
    ("Notecards", 7),
    ("Body Parts", 13),
    ("Trash", 14),
    ("Landmarks", 3),
    ("Gestures", 21),
];

/// A grid account the login service can authenticate
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub first: String,
    pub last: String,
    /// Compared verbatim against the request's `passwd`
    pub passwd: String,
    pub agent_id: Uuid,
    pub disabled: bool,
    /// None = use the grid's default home
    pub home: Option<HomePosition>,
    pub inventory_root: InventoryFolder,
    pub inventory_skeleton: Vec<InventoryFolder>,
    pub buddies: Vec<BuddyEntry>,
    pub gestures: Vec<GestureEntry>,
    pub ever_logged_in: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// New account with a fresh agent id and the standard inventory folders.
    pub fn new(first: impl Into<String>, last: impl Into<String>, passwd: impl Into<String>) -> Self {
        let root_id = Uuid::new_v4();
        let inventory_root =
            InventoryFolder::new(root_id, Uuid::nil(), "My Inventory", ROOT_FOLDER_TYPE, 1);

        let mut inventory_skeleton = vec![inventory_root.clone()];
        inventory_skeleton.extend(
            STANDARD_FOLDERS
                .iter()
                .map(|(name, kind)| InventoryFolder::new(Uuid::new_v4(), root_id, *name, *kind, 1)),
        );

        Self {
            first: first.into(),
            last: last.into(),
            passwd: passwd.into(),
            agent_id: Uuid::new_v4(),
            disabled: false,
            home: None,
            inventory_root,
            inventory_skeleton,
            buddies: Vec::new(),
            gestures: Vec::new(),
            ever_logged_in: false,
            created_at: Utc::now(),
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_home(mut self, home: HomePosition) -> Self {
        self.home = Some(home);
        self
    }

    pub fn with_buddy(mut self, buddy: BuddyEntry) -> Self {
        self.buddies.push(buddy);
        self
    }

    pub fn with_gesture(mut self, gesture: GestureEntry) -> Self {
        self.gestures.push(gesture);
        self
    }
}

/// Concurrent account registry keyed by case-folded "first last"
pub struct AccountDirectory {
    accounts: Arc<DashMap<String, Account>>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(DashMap::new()),
        }
    }

    /// Add an account. Names must be non-empty single words and unique.
    pub fn register(&self, account: Account) -> Result<Account, RegistrationError> {
        for name in [&account.first, &account.last] {
            if name.trim().is_empty() {
                return Err(RegistrationError::EmptyName);
            }
            if name.trim().contains(char::is_whitespace) {
                return Err(RegistrationError::InvalidName(name.clone()));
            }
        }

        let key = account_key(&account.first, &account.last);
        match self.accounts.entry(key) {
            Entry::Occupied(_) => Err(RegistrationError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(account.clone());
                Ok(account)
            }
        }
    }

    pub fn find(&self, first: &str, last: &str) -> Option<Account> {
        self.accounts
            .get(&account_key(first, last))
            .map(|a| a.clone())
    }

    /// Mark the account as logged in. Returns whether it had logged in before.
    pub fn record_login(&self, first: &str, last: &str) -> Option<bool> {
        let mut account = self.accounts.get_mut(&account_key(first, last))?;
        let before = account.ever_logged_in;
        account.ever_logged_in = true;
        Some(before)
    }

    pub fn count(&self) -> usize {
        self.accounts.len()
    }
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn account_key(first: &str, last: &str) -> String {
    format!(
        "{} {}",
        first.trim().to_lowercase(),
        last.trim().to_lowercase()
    )
}

#[derive(Debug, PartialEq)]
pub enum RegistrationError {
    EmptyName,
    InvalidName(String),
    AlreadyExists,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::EmptyName => write!(f, "first and last name are required"),
            RegistrationError::InvalidName(name) => {
                write!(f, "name '{}' must be a single word", name)
            }
            RegistrationError::AlreadyExists => write!(f, "account already exists"),
        }
    }
}

impl std::error::Error for RegistrationError {}
