//! Runtime configuration.

use std::time::Duration;

use loot_core::Grid;

/// Configuration shared by the session facade and the relay.
///
/// Mirrors the deployment settings surface: default container artwork,
/// whether currency is lootable, and the bound on relayed token creation.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub grid: Grid,
    /// Default image for opened containers.
    pub default_open_image: String,
    /// Default image for closed containers.
    pub default_closed_image: String,
    /// When false, container currency is never transferred.
    pub currency_enabled: bool,
    /// Currency codes a fresh container starts with.
    pub currency_codes: Vec<String>,
    /// How long a relayed token creation waits for its confirmation.
    pub creation_timeout: Duration,
    /// Capacity of each event-bus topic channel.
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            default_open_image: "assets/chest-opened.png".to_owned(),
            default_closed_image: "assets/chest-closed.png".to_owned(),
            currency_enabled: true,
            currency_codes: ["pp", "gp", "ep", "sp", "cp"]
                .iter()
                .map(|code| (*code).to_owned())
                .collect(),
            creation_timeout: Duration::from_millis(2000),
            event_buffer_size: 100,
        }
    }
}
