pub const INITIAL_SNAKE_LENGTH: usize = 5;
pub const LENGTH_MULTIPLIER: usize = 10;
pub const PLAYER_SPEED: f64 = 0.000008;
pub const BOT_SPEED: f64 = 0.000004;
pub const SEGMENT_SPACING: f64 = 0.000005;
pub const DEAD_ZONE: f64 = 0.00001;

pub const FOOD_COUNT: usize = 200;
pub const SPAWN_SPREAD: f64 = 0.8;
pub const FOOD_EPSILON: f64 = 0.00015;

pub const COLLISION_EPSILON: f64 = 0.000008;
pub const BODY_SKIP: usize = 5;
pub const SELF_COLLISION_MIN_LENGTH: usize = 10;

pub const BOT_COUNT: usize = 5;
pub const DROP_FRACTION: f64 = 0.5;
pub const WANDER_CHANCE: f64 = 0.005;
pub const WANDER_EXIT_CHANCE: f64 = 0.0;
pub const RETARGET_CHANCE: f64 = 0.01;
// Turning radius is BOT_SPEED / HEADING_BLEND. It must stay under
// FOOD_EPSILON or bots orbit their food; 1% would give about 4e-4.
pub const HEADING_BLEND: f64 = 0.05;
pub const WANDER_RADIUS: f64 = 0.05;
pub const BOT_STEP_CHANCE: f64 = 1.0;
pub const DESPAWN_PADDING: f64 = 0.01;
pub const PLAYER_KILL_BONUS: u32 = 10;

pub const GPS_SMOOTHING_WINDOW: usize = 5;
pub const FALLBACK_LAT: f64 = 37.7749;
pub const FALLBACK_LNG: f64 = -122.4194;
// Roughly the visible span of a zoom-17 map on a phone screen.
pub const DEFAULT_VIEW_SPAN_LAT: f64 = 0.004;
pub const DEFAULT_VIEW_SPAN_LNG: f64 = 0.0025;

pub const KILL_NOTICE_MS: i64 = 2000;
pub const NOTICE_FADE_MS: i64 = 500;
pub const ADVISORY_NOTICE_MS: i64 = 3000;

pub const TICK_MS: u64 = 16;

pub const PLAYER_COLOR: &str = "#ff0000";

pub const COLOR_POOL: [&str; 8] = [
    "#667eea",
    "#764ba2",
    "#f093fb",
    "#4facfe",
    "#00f2fe",
    "#43e97b",
    "#fa709a",
    "#fee140",
];
