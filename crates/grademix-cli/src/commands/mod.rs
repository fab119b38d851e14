pub mod analytics;
pub mod constraints;
pub mod group;
pub mod history;
pub mod session;

use std::path::Path;

use anyhow::Context as _;
use grademix_core::{CategoryDomains, GrademixConfig};
use grademix_state::{SessionState, SessionStore, StateStore};

/// Everything a command needs: the open store, the active category
/// domains, and the session loaded from the store.
pub struct Context {
    pub store: StateStore,
    pub domains: CategoryDomains,
    pub session: SessionState,
}

impl Context {
    /// Open the state database and load the session. Settings declared in
    /// `config` replace the stored ones.
    pub fn open(state: &Path, config: Option<&Path>) -> anyhow::Result<Self> {
        let store = StateStore::open(state)
            .with_context(|| format!("opening state database {}", state.display()))?;
        let config = match config {
            Some(path) => GrademixConfig::from_file(path)?,
            None => GrademixConfig::default(),
        };
        Self::with_store(store, &config)
    }

    pub fn with_store(store: StateStore, config: &GrademixConfig) -> anyhow::Result<Self> {
        let mut session = store.load()?;
        if let Some(settings) = config.settings() {
            tracing::debug!(num_groups = settings.num_groups, "settings taken from config");
            session.settings = settings;
        }
        Ok(Self {
            store,
            domains: config.domains(),
            session,
        })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.store.save(&self.session)?;
        Ok(())
    }
}

/// Convert a 1-based group number from the command line to a slot index.
pub fn group_index(number: usize) -> anyhow::Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("group numbers start at 1"))
}

#[cfg(test)]
pub(crate) fn test_context() -> Context {
    let store = StateStore::open_in_memory().expect("in-memory store");
    Context::with_store(store, &GrademixConfig::default()).expect("context")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_numbers_are_one_based() {
        assert_eq!(group_index(1).unwrap(), 0);
        assert_eq!(group_index(4).unwrap(), 3);
        assert!(group_index(0).is_err());
    }

    #[test]
    fn config_settings_replace_stored_settings() {
        let store = StateStore::open_in_memory().unwrap();
        let config: GrademixConfig = toml::from_str(
            r#"
[grouping]
num_groups = 2
group_names = ["Red", "Blue"]
"#,
        )
        .unwrap();
        let ctx = Context::with_store(store, &config).unwrap();
        assert_eq!(ctx.session.settings.num_groups, 2);
        assert_eq!(ctx.session.settings.group_names, vec!["Red", "Blue"]);
    }
}
