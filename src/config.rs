use std::time::Duration;

/// API base used when nothing else is configured (the backend's dev server)
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Options for the continuous position watch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// How long the device may take to produce a fix
    pub timeout: Duration,
    /// Oldest cached fix the device may hand back
    pub maximum_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(5),
            maximum_age: Duration::from_secs(30),
        }
    }
}

/// Pixel geometry of the card stack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackGeometry {
    pub card_height: u32,
    pub peek_height: u32,
    pub max_extra_layers: usize,
    pub padding: u32,
}

impl Default for StackGeometry {
    fn default() -> Self {
        Self {
            card_height: 200,
            peek_height: 50,
            max_extra_layers: 5,
            padding: 12,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Origin the `/api/...` paths are joined onto
    pub api_base: String,
    /// Minimum gap between two shown recommendations
    pub recommendation_cooldown: Duration,
    /// How long a recommendation popup stays up
    pub popup_duration: Duration,
    /// Delay before the location prompt appears after a load
    pub location_prompt_delay: Duration,
    pub watch: WatchOptions,
    pub stack: StackGeometry,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            recommendation_cooldown: Duration::from_secs(60),
            popup_duration: Duration::from_secs(10),
            location_prompt_delay: Duration::from_millis(500),
            watch: WatchOptions::default(),
            stack: StackGeometry::default(),
        }
    }
}

impl AppConfig {
    /// Build the configuration for the running page
    ///
    /// `CASHBACK_API_BASE` at build time wins; in the browser the page origin
    /// is used next, so the client talks to whoever served it.
    pub fn from_env() -> Self {
        Self {
            api_base: resolve_api_base(),
            ..Self::default()
        }
    }
}

fn resolve_api_base() -> String {
    if let Some(base) = option_env!("CASHBACK_API_BASE") {
        return base.to_string();
    }

    #[cfg(target_family = "wasm")]
    {
        if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
            return origin;
        }
    }

    DEFAULT_API_BASE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tracking_policy() {
        let config = AppConfig::default();
        assert_eq!(config.recommendation_cooldown, Duration::from_secs(60));
        assert_eq!(config.popup_duration, Duration::from_secs(10));
        assert_eq!(config.location_prompt_delay, Duration::from_millis(500));
        assert!(config.watch.high_accuracy);
        assert_eq!(config.watch.timeout, Duration::from_secs(5));
        assert_eq!(config.watch.maximum_age, Duration::from_secs(30));
    }
}
