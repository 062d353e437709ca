use serde::{Deserialize, Serialize};

use super::presentation::EffectsMode;
use super::state::SimonError;

const DEFAULT_ROUND_DELAY_MS: u32 = 1000;

/// 节奏与表现相关的配置，不影响判定规则。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub round_delay_ms: u32,
    pub effects_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, SimonError> {
        serde_json::from_str(json).map_err(|error| SimonError::InvalidConfig {
            message: error.to_string(),
        })
    }

    pub fn with_round_delay(mut self, delay_ms: u32) -> Self {
        self.round_delay_ms = delay_ms;
        self
    }

    pub fn with_effects(mut self, enabled: bool) -> Self {
        self.effects_enabled = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn effects_mode(&self) -> EffectsMode {
        EffectsMode::from_enabled(self.effects_enabled)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_delay_ms: DEFAULT_ROUND_DELAY_MS,
            effects_enabled: true,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = GameConfig::from_json(r#"{"round_delay_ms": 250}"#)
            .expect("partial config should parse");
        assert_eq!(config.round_delay_ms, 250);
        assert!(config.effects_enabled);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        let error = GameConfig::from_json("{round_delay_ms").unwrap_err();
        assert!(matches!(error, SimonError::InvalidConfig { .. }));
    }

    #[test]
    fn builders_override_defaults() {
        let config = GameConfig::default()
            .with_round_delay(0)
            .with_effects(false)
            .with_seed(9);
        assert_eq!(config.round_delay_ms, 0);
        assert_eq!(config.effects_mode(), EffectsMode::Reduced);
        assert_eq!(config.seed, Some(9));
    }
}
