/// Platform settings - sectioned preference records
///
/// Settings are a single sectioned record (profile, notifications,
/// appearance, system, security) persisted per section in the record store.
/// Defaults mirror what a fresh dashboard installation shows.

pub mod storage;
pub mod types;

pub use storage::SettingsStore;
pub use types::Settings;
