use crate::game::constants::{
    ADVISORY_NOTICE_MS, BODY_SKIP, BOT_COUNT, BOT_SPEED, BOT_STEP_CHANCE, COLLISION_EPSILON,
    DEAD_ZONE, DEFAULT_VIEW_SPAN_LAT, DEFAULT_VIEW_SPAN_LNG, DESPAWN_PADDING, DROP_FRACTION,
    FALLBACK_LAT, FALLBACK_LNG, FOOD_COUNT, FOOD_EPSILON, GPS_SMOOTHING_WINDOW, HEADING_BLEND,
    INITIAL_SNAKE_LENGTH, KILL_NOTICE_MS, LENGTH_MULTIPLIER, NOTICE_FADE_MS, PLAYER_KILL_BONUS,
    PLAYER_SPEED, RETARGET_CHANCE, SEGMENT_SPACING, SELF_COLLISION_MIN_LENGTH, SPAWN_SPREAD,
    TICK_MS, WANDER_CHANCE, WANDER_EXIT_CHANCE, WANDER_RADIUS,
};
use crate::game::types::Point;
use anyhow::{ensure, Context};
use serde::Deserialize;
use std::env;

/// How the player's head chases the smoothed GPS position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MovementMode {
    /// Fixed step along the unit direction to the target.
    #[default]
    FixedSpeed,
    /// Fixed fraction of the remaining distance per tick.
    Fractional { fraction: f64 },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub initial_length: usize,
    pub base_length: usize,
    pub length_multiplier: usize,
    pub player_speed: f64,
    pub bot_speed: f64,
    pub segment_spacing: f64,
    pub dead_zone: f64,
    pub movement_mode: MovementMode,

    pub food_count: usize,
    pub spawn_spread: f64,
    pub food_epsilon: f64,

    pub collision_epsilon: f64,
    pub body_skip: usize,
    pub self_collision_min_length: usize,
    pub self_collision_fatal: bool,
    pub bot_vs_bot_fatal: bool,

    pub bot_count: usize,
    pub drop_fraction: f64,
    pub wander_chance: f64,
    pub wander_exit_chance: f64,
    pub retarget_chance: f64,
    pub heading_blend: f64,
    pub wander_radius: f64,
    pub bot_step_chance: f64,
    pub despawn_padding: f64,
    pub player_kill_bonus: u32,

    pub smoothing_window: usize,
    pub fallback_position: Point,
    pub default_view_span_lat: f64,
    pub default_view_span_lng: f64,

    pub kill_notice_ms: i64,
    pub advisory_notice_ms: i64,
    pub notice_fade_ms: i64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_length: INITIAL_SNAKE_LENGTH,
            base_length: INITIAL_SNAKE_LENGTH,
            length_multiplier: LENGTH_MULTIPLIER,
            player_speed: PLAYER_SPEED,
            bot_speed: BOT_SPEED,
            segment_spacing: SEGMENT_SPACING,
            dead_zone: DEAD_ZONE,
            movement_mode: MovementMode::FixedSpeed,
            food_count: FOOD_COUNT,
            spawn_spread: SPAWN_SPREAD,
            food_epsilon: FOOD_EPSILON,
            collision_epsilon: COLLISION_EPSILON,
            body_skip: BODY_SKIP,
            self_collision_min_length: SELF_COLLISION_MIN_LENGTH,
            self_collision_fatal: false,
            bot_vs_bot_fatal: true,
            bot_count: BOT_COUNT,
            drop_fraction: DROP_FRACTION,
            wander_chance: WANDER_CHANCE,
            wander_exit_chance: WANDER_EXIT_CHANCE,
            retarget_chance: RETARGET_CHANCE,
            heading_blend: HEADING_BLEND,
            wander_radius: WANDER_RADIUS,
            bot_step_chance: BOT_STEP_CHANCE,
            despawn_padding: DESPAWN_PADDING,
            player_kill_bonus: PLAYER_KILL_BONUS,
            smoothing_window: GPS_SMOOTHING_WINDOW,
            fallback_position: Point::new(FALLBACK_LAT, FALLBACK_LNG),
            default_view_span_lat: DEFAULT_VIEW_SPAN_LAT,
            default_view_span_lng: DEFAULT_VIEW_SPAN_LNG,
            kill_notice_ms: KILL_NOTICE_MS,
            advisory_notice_ms: ADVISORY_NOTICE_MS,
            notice_fade_ms: NOTICE_FADE_MS,
        }
    }
}

impl GameConfig {
    /// Defaults, then the JSON file named by `GEOSNAKE_CONFIG`, then
    /// individual env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match env::var("GEOSNAKE_CONFIG") {
            Ok(path) if !path.trim().is_empty() => {
                let raw = std::fs::read_to_string(path.trim())
                    .with_context(|| format!("failed to read config file {path}"))?;
                serde_json::from_str::<GameConfig>(&raw)
                    .with_context(|| format!("failed to parse config file {path}"))?
            }
            _ => GameConfig::default(),
        };

        if let Some(value) = env_parse::<usize>("GEOSNAKE_BOT_COUNT") {
            config.bot_count = value;
        }
        if let Some(value) = env_parse::<usize>("GEOSNAKE_FOOD_COUNT") {
            config.food_count = value;
        }
        if let Some(value) = env_flag("GEOSNAKE_SELF_COLLISION") {
            config.self_collision_fatal = value;
        }
        if let Some(value) = env_flag("GEOSNAKE_BOT_VS_BOT") {
            config.bot_vs_bot_fatal = value;
        }

        config.validate()
    }

    pub fn validate(mut self) -> anyhow::Result<Self> {
        ensure!(self.initial_length >= 1, "initial_length must be at least 1");
        ensure!(self.length_multiplier >= 1, "length_multiplier must be at least 1");
        for (name, value) in [
            ("player_speed", self.player_speed),
            ("bot_speed", self.bot_speed),
            ("segment_spacing", self.segment_spacing),
            ("dead_zone", self.dead_zone),
            ("food_epsilon", self.food_epsilon),
            ("collision_epsilon", self.collision_epsilon),
            ("wander_radius", self.wander_radius),
            ("default_view_span_lat", self.default_view_span_lat),
            ("default_view_span_lng", self.default_view_span_lng),
        ] {
            ensure!(
                value.is_finite() && value > 0.0,
                "{name} must be a positive number"
            );
        }
        ensure!(
            self.fallback_position.is_finite(),
            "fallback_position must be finite"
        );
        if let MovementMode::Fractional { fraction } = self.movement_mode {
            ensure!(
                fraction.is_finite() && fraction > 0.0 && fraction <= 1.0,
                "movement fraction must be in (0, 1]"
            );
        }

        self.spawn_spread = unit_interval(self.spawn_spread);
        self.drop_fraction = unit_interval(self.drop_fraction);
        self.wander_chance = unit_interval(self.wander_chance);
        self.wander_exit_chance = unit_interval(self.wander_exit_chance);
        self.retarget_chance = unit_interval(self.retarget_chance);
        self.heading_blend = unit_interval(self.heading_blend);
        self.bot_step_chance = unit_interval(self.bot_step_chance);
        self.despawn_padding = self.despawn_padding.max(0.0);
        self.smoothing_window = self.smoothing_window.max(1);
        Ok(self)
    }

    /// Segment cap for a given score.
    pub fn max_length(&self, score: u32) -> usize {
        (self.base_length + score as usize) * self.length_multiplier
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub tick_ms: u64,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT").unwrap_or(8787),
            tick_ms: env_parse::<u64>("TICK_MS")
                .filter(|value| *value > 0)
                .unwrap_or(TICK_MS),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key).ok().map(|value| matches!(value.trim(), "1" | "true" | "TRUE"))
}

fn unit_interval(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = GameConfig::default().validate().expect("defaults are valid");
        assert_eq!(config.max_length(0), 50);
        assert_eq!(config.max_length(4), 90);
    }

    #[test]
    fn validate_clamps_probabilities() {
        let config = GameConfig {
            wander_chance: 3.0,
            retarget_chance: -1.0,
            heading_blend: f64::NAN,
            ..GameConfig::default()
        }
        .validate()
        .expect("valid");
        assert_eq!(config.wander_chance, 1.0);
        assert_eq!(config.retarget_chance, 0.0);
        assert_eq!(config.heading_blend, 0.0);
    }

    #[test]
    fn validate_rejects_zero_spacing() {
        let result = GameConfig {
            segment_spacing: 0.0,
            ..GameConfig::default()
        }
        .validate();
        assert!(result.is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GameConfig = serde_json::from_str(
            r#"{"bot_count": 12, "movement_mode": {"kind": "fractional", "fraction": 0.1}}"#,
        )
        .expect("config parses");
        assert_eq!(config.bot_count, 12);
        assert_eq!(config.food_count, FOOD_COUNT);
        assert_eq!(
            config.movement_mode,
            MovementMode::Fractional { fraction: 0.1 }
        );
    }
}
