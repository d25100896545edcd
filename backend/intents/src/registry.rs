/// Intent registry — the build-time intent table.
use crate::types::{Intent, IntentDef};

/// All intents known to this build, in declaration order.
pub fn builtin_intents() -> Vec<IntentDef> {
    Intent::ALL.into_iter().map(IntentDef::from).collect()
}

pub struct IntentRegistry {
    defs: Vec<IntentDef>,
}

impl IntentRegistry {
    pub fn new() -> Self {
        Self {
            defs: builtin_intents(),
        }
    }

    pub fn all(&self) -> &[IntentDef] {
        &self.defs
    }

    pub fn find(&self, intent: Intent) -> Option<&IntentDef> {
        self.defs.iter().find(|d| d.intent == intent)
    }

    pub fn find_by_identifier(&self, identifier: &str) -> Option<&IntentDef> {
        self.defs.iter().find(|d| d.identifier == identifier)
    }

    pub fn find_by_command(&self, command_name: &str) -> Option<&IntentDef> {
        self.defs.iter().find(|d| d.command_name == command_name)
    }
}

impl Default for IntentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
