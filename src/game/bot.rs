use super::constants::COLOR_POOL;
use super::food::FoodField;
use super::math::{
    angle_between, direction, distance, length, normalize, offset, perpendicular, random_unit,
};
use super::snake::{advance_along, create_snake, trim_to_cap};
use super::types::{Bot, BotId, BotMode, Point, Target};
use crate::config::GameConfig;
use crate::shared::names::bot_name;
use rand::Rng;

pub fn new_bot<R: Rng + ?Sized>(
    id: BotId,
    index: u64,
    head: Point,
    config: &GameConfig,
    rng: &mut R,
) -> Bot {
    Bot {
        id,
        name: bot_name(index),
        color: COLOR_POOL[(index as usize) % COLOR_POOL.len()],
        snake: create_snake(head, config.initial_length, config.segment_spacing),
        mode: BotMode::SeekingFood,
        target: None,
        heading: random_unit(rng),
        score: 0,
    }
}

/// Live position of the bot's target. A food target whose item is gone
/// resolves to `None`.
pub fn target_position(target: Option<Target>, food: &FoodField) -> Option<Point> {
    match target? {
        Target::Food(id) => food.position_of(id),
        Target::Waypoint(point) => Some(point),
    }
}

/// Drops a food target that no longer resolves.
pub fn prune_stale_target(bot: &mut Bot, food: &FoodField) {
    if let Some(Target::Food(id)) = bot.target {
        if !food.contains(id) {
            bot.target = None;
        }
    }
}

pub fn enter_wandering<R: Rng + ?Sized>(bot: &mut Bot, config: &GameConfig, rng: &mut R) {
    let Some(head) = bot.head() else { return };
    let waypoint = offset(head, random_unit(rng), config.wander_radius);
    bot.mode = BotMode::Wandering;
    bot.target = Some(Target::Waypoint(waypoint));
}

pub fn enter_seeking(bot: &mut Bot) {
    bot.mode = BotMode::SeekingFood;
    bot.target = None;
}

/// Applies at most one mode transition for this tick.
pub fn update_mode<R: Rng + ?Sized>(bot: &mut Bot, config: &GameConfig, rng: &mut R) {
    let Some(head) = bot.head() else { return };
    match bot.mode {
        BotMode::SeekingFood => {
            if rng.gen::<f64>() < config.wander_chance {
                enter_wandering(bot, config, rng);
            }
        }
        BotMode::Wandering => match bot.target {
            Some(Target::Waypoint(waypoint)) => {
                let arrived = distance(head, waypoint) < config.food_epsilon;
                if arrived || rng.gen::<f64>() < config.wander_exit_chance {
                    enter_seeking(bot);
                }
            }
            _ => enter_seeking(bot),
        },
    }
}

/// Picks the nearest food when the bot has no target, or on a random re-roll.
pub fn acquire_target<R: Rng + ?Sized>(
    bot: &mut Bot,
    food: &FoodField,
    config: &GameConfig,
    rng: &mut R,
) {
    if bot.mode != BotMode::SeekingFood {
        return;
    }
    let Some(head) = bot.head() else { return };
    let reroll = rng.gen::<f64>() < config.retarget_chance;
    if bot.target.is_some() && !reroll {
        return;
    }
    if let Some((id, _)) = food.nearest(head) {
        bot.target = Some(Target::Food(id));
    }
}

/// Blends `current` toward `desired` by `blend` and re-normalizes. An exactly
/// opposite goal is approached through the perpendicular so the turn starts.
pub fn smooth_heading(current: Point, desired: Point, blend: f64) -> Point {
    let current = normalize(current);
    let desired = normalize(desired);
    if length(current) == 0.0 {
        return desired;
    }
    if length(desired) == 0.0 {
        return current;
    }
    let goal = if angle_between(current, desired) >= std::f64::consts::PI - 1e-9 {
        perpendicular(current)
    } else {
        desired
    };
    let blended = Point {
        lat: current.lat + (goal.lat - current.lat) * blend,
        lng: current.lng + (goal.lng - current.lng) * blend,
    };
    let next = normalize(blended);
    if length(next) == 0.0 {
        current
    } else {
        next
    }
}

/// One AI pass for a single bot: mode, target, heading, movement.
pub fn advance_bot<R: Rng + ?Sized>(
    bot: &mut Bot,
    food: &FoodField,
    config: &GameConfig,
    rng: &mut R,
) -> bool {
    if bot.snake.is_empty() {
        return false;
    }
    prune_stale_target(bot, food);
    update_mode(bot, config, rng);
    acquire_target(bot, food, config, rng);

    if rng.gen::<f64>() >= config.bot_step_chance {
        return false;
    }
    let Some(head) = bot.head() else { return false };
    let Some(goal) = target_position(bot.target, food) else { return false };
    if distance(head, goal) <= config.dead_zone {
        return false;
    }
    let Some(desired) = direction(head, goal) else { return false };
    bot.heading = smooth_heading(bot.heading, desired, config.heading_blend);

    let moved = advance_along(
        &mut bot.snake,
        bot.heading,
        config.bot_speed,
        config.segment_spacing,
    );
    if moved {
        trim_to_cap(&mut bot.snake, config.max_length(bot.score));
    }
    moved
}
