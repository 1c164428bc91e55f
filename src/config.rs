use rand::Rng;
use tracing::warn;

use crate::constants::bar;
use crate::settings::Settings;

/// Animation mode for the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Instant,
    Smooth,
    Wave,
}

/// Typed configuration for one bar, parsed once per block.
/// Directives the block does not set come from the global settings or
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct BarConfig {
    pub initial_progress: i64,
    pub total: i64,
    pub increment: i64,
    pub color: String,
    pub background_color: String,
    pub width: String,
    pub height: String,
    /// Legend template; empty string means no legend
    pub legend: String,
    /// Raw animation directive, resolved by `animation_mode`
    pub animation: String,
    pub transition_duration: String,
    pub legend_font_size: String,
    /// Alphabetic-only bar name, synthesized when missing or fully stripped
    pub name: String,
}

impl BarConfig {
    /// Resolve the animation directive to a mode.
    /// Unrecognized values fall back to `Smooth` here, not in the parser.
    pub fn animation_mode(&self) -> Animation {
        match self.animation.as_str() {
            "instant" => Animation::Instant,
            "wave" => Animation::Wave,
            _ => Animation::Smooth,
        }
    }
}

/// Parse block source into a `BarConfig`.
///
/// Directives are `key: value` pairs separated by newlines or commas, with
/// whitespace trimmed around both. Unrecognized keys are ignored so older
/// documents keep rendering when new directives are added. Nothing in here
/// aborts: malformed values are substituted with a default and logged.
pub fn parse(source: &str, settings: &Settings) -> BarConfig {
    let mut config = BarConfig {
        initial_progress: 0,
        total: settings.total,
        increment: bar::DEFAULT_INCREMENT,
        color: settings.bar_color.clone(),
        background_color: settings.background_color.clone(),
        width: bar::DEFAULT_WIDTH.to_string(),
        height: bar::DEFAULT_HEIGHT.to_string(),
        legend: String::new(),
        animation: settings.animation.clone(),
        transition_duration: settings.transition_duration.clone(),
        legend_font_size: settings.legend_font_size.clone(),
        name: String::new(),
    };

    for directive in source.split(['\n', ',']) {
        let Some((key, value)) = directive.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "initialProgress" => config.initial_progress = parse_int(key, value, 0),
            "total" => config.total = parse_int(key, value, settings.total),
            "increment" => config.increment = parse_int(key, value, bar::DEFAULT_INCREMENT),
            "color" => config.color = value.to_string(),
            "backgroundColor" => config.background_color = value.to_string(),
            "width" => config.width = value.to_string(),
            "height" => config.height = value.to_string(),
            "legend" => config.legend = value.to_string(),
            "animation" => config.animation = value.to_string(),
            "transitionDuration" => config.transition_duration = value.to_string(),
            "legendFontSize" => config.legend_font_size = value.to_string(),
            "name" => config.name = value.chars().filter(char::is_ascii_alphabetic).collect(),
            _ => {}
        }
    }

    // A non-positive total would make the fill fraction meaningless
    if config.total <= 0 {
        warn!(total = config.total, "total must be positive, using 1");
        config.total = 1;
    }

    if config.name.is_empty() {
        let synthesized = synthesize_name();
        warn!(
            name = %synthesized,
            "name directive missing or not alphabetic, using generated name"
        );
        config.name = synthesized;
    }

    config
}

/// Integer directive coercion. Malformed values get a canonical default
/// instead of propagating an invalid number.
fn parse_int(key: &str, value: &str, fallback: i64) -> i64 {
    match value.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            warn!(key = %key, value = %value, fallback = fallback, "directive is not an integer, using fallback");
            fallback
        }
    }
}

/// Short random alphabetic name for bars without a usable one
fn synthesize_name() -> String {
    let mut rng = rand::rng();
    let token: String = (0..bar::SYNTHETIC_NAME_LEN)
        .map(|_| rng.random_range(b'a'..=b'z') as char)
        .collect();
    format!("{}{}", bar::SYNTHETIC_NAME_PREFIX, token)
}
