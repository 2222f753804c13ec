use crate::response::ResponseBlock;
use serde_json::Value;
use std::collections::BTreeSet;

/// The `options` selector of a login request: which optional response
/// blocks the viewer wants.
///
/// Names the grid does not produce are kept as-is so a client can still ask
/// real grids for them (`adult_compliant`, `voice-config`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginOptions {
    blocks: BTreeSet<ResponseBlock>,
    extra: Vec<String>,
}

impl LoginOptions {
    /// Selector with no optional blocks
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            blocks: ResponseBlock::ALL.into_iter().collect(),
            extra: Vec::new(),
        }
    }

    pub fn with(mut self, block: ResponseBlock) -> Self {
        self.blocks.insert(block);
        self
    }

    pub fn without(mut self, block: ResponseBlock) -> Self {
        self.blocks.remove(&block);
        self
    }

    pub fn includes(&self, block: ResponseBlock) -> bool {
        self.blocks.contains(&block)
    }

    pub fn blocks(&self) -> impl Iterator<Item = ResponseBlock> + '_ {
        self.blocks.iter().copied()
    }

    /// Requested names that do not map to a block this crate produces.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    pub fn from_wire_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for key in keys {
            let key = key.as_ref();
            match ResponseBlock::from_wire_key(key) {
                Some(block) => {
                    options.blocks.insert(block);
                }
                None if !options.extra.iter().any(|e| e == key) => {
                    options.extra.push(key.to_string());
                }
                None => {}
            }
        }
        options
    }

    /// Wire form: a list of option names.
    pub fn to_canonical(&self) -> Value {
        Value::Array(
            self.blocks
                .iter()
                .map(|b| b.wire_key().to_string())
                .chain(self.extra.iter().cloned())
                .map(Value::String)
                .collect(),
        )
    }
}
