use super::food::FoodField;
use super::math::within;
use super::types::{Bot, BotId, FoodId, PlayerState, Point, Target, Viewport};
use crate::config::GameConfig;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub enum Killer {
    Player,
    Bot { id: BotId, name: String },
    Itself,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kill {
    pub victim: BotId,
    pub killer: Killer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerDeath {
    SelfCollision,
    Bot { id: BotId, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumer {
    Player,
    Bot(BotId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodBite {
    pub consumer: Consumer,
    pub food: FoodId,
}

/// Deaths found in one pass. Nothing here has been applied yet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollisionReport {
    pub player_death: Option<PlayerDeath>,
    pub kills: Vec<Kill>,
}

/// Whether `head` touches any of `body` past the first `skip` segments.
pub fn hits_body(head: Point, body: &[Point], skip: usize, epsilon: f64) -> bool {
    body.iter()
        .skip(skip)
        .any(|segment| within(head, *segment, epsilon))
}

pub fn hits_own_body(snake: &[Point], config: &GameConfig) -> bool {
    if snake.len() < config.self_collision_min_length {
        return false;
    }
    let Some(head) = snake.first() else { return false };
    hits_body(*head, snake, config.body_skip, config.collision_epsilon)
}

/// Clears every bot target that points at `id`.
pub fn release_food_target(bots: &mut [Bot], id: FoodId) {
    for bot in bots.iter_mut() {
        if bot.target == Some(Target::Food(id)) {
            bot.target = None;
        }
    }
}

/// Eats at most one item per consumer, player first, then bots in order.
/// Each removal is visible to every later consumer in the same pass.
pub fn resolve_food_collisions<R: Rng + ?Sized>(
    player: &mut PlayerState,
    bots: &mut [Bot],
    food: &mut FoodField,
    view: &Viewport,
    config: &GameConfig,
    rng: &mut R,
) -> Vec<FoodBite> {
    let mut bites = Vec::new();

    if player.alive {
        if let Some(head) = player.head() {
            if let Some(id) = food.nearest_within(head, config.food_epsilon) {
                if food.consume(id) {
                    player.score += 1;
                    release_food_target(bots, id);
                    food.respawn_one(head, view, config.spawn_spread, rng);
                    bites.push(FoodBite {
                        consumer: Consumer::Player,
                        food: id,
                    });
                }
            }
        }
    }

    for index in 0..bots.len() {
        let Some(head) = bots[index].head() else { continue };
        let Some(id) = food.nearest_within(head, config.food_epsilon) else { continue };
        if !food.consume(id) {
            continue;
        }
        bots[index].score += 1;
        let eater = bots[index].id;
        release_food_target(bots, id);
        food.respawn_one(head, view, config.spawn_spread, rng);
        bites.push(FoodBite {
            consumer: Consumer::Bot(eater),
            food: id,
        });
    }

    bites
}

/// Head-vs-body scan over the player and every bot.
///
/// Player death stops the scan. Bot deaths are only collected; a bot that
/// has been marked no longer counts as a body for the rest of the scan, and
/// cannot be marked twice.
pub fn detect_snake_collisions(
    player: &PlayerState,
    bots: &[Bot],
    config: &GameConfig,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let mut doomed = vec![false; bots.len()];
    let skip = config.body_skip;
    let epsilon = config.collision_epsilon;

    let player_head = if player.alive { player.head() } else { None };

    if config.self_collision_fatal {
        if player_head.is_some() && hits_own_body(&player.snake, config) {
            report.player_death = Some(PlayerDeath::SelfCollision);
            return report;
        }
        for (index, bot) in bots.iter().enumerate() {
            if hits_own_body(&bot.snake, config) {
                doomed[index] = true;
                report.kills.push(Kill {
                    victim: bot.id,
                    killer: Killer::Itself,
                });
            }
        }
    }

    if let Some(player_head) = player_head {
        for (index, bot) in bots.iter().enumerate() {
            if doomed[index] {
                continue;
            }
            let Some(bot_head) = bot.head() else { continue };
            if hits_body(player_head, &bot.snake, skip, epsilon) {
                report.player_death = Some(PlayerDeath::Bot {
                    id: bot.id,
                    name: bot.name.clone(),
                });
                return report;
            }
            if hits_body(bot_head, &player.snake, skip, epsilon) {
                doomed[index] = true;
                report.kills.push(Kill {
                    victim: bot.id,
                    killer: Killer::Player,
                });
            }
        }
    }

    if !config.bot_vs_bot_fatal {
        return report;
    }

    for (index, bot) in bots.iter().enumerate() {
        if doomed[index] {
            continue;
        }
        let Some(head) = bot.head() else { continue };
        for (other_index, other) in bots.iter().enumerate() {
            if other_index == index || doomed[other_index] {
                continue;
            }
            if hits_body(head, &other.snake, skip, epsilon) {
                doomed[index] = true;
                report.kills.push(Kill {
                    victim: bot.id,
                    killer: Killer::Bot {
                        id: other.id,
                        name: other.name.clone(),
                    },
                });
                break;
            }
        }
    }

    report
}
