use super::bot::new_bot;
use super::collision::{Kill, Killer};
use super::food::FoodField;
use super::types::{Bot, BotId, Point, Viewport};
use crate::config::GameConfig;
use rand::Rng;
use std::collections::HashMap;

/// Body points that turn into food when a snake with `score` dies:
/// `ceil(score * fraction)` of them, spread evenly from the head. A body
/// shorter than the drop count repeats segments along its whole length.
pub fn drop_positions(body: &[Point], score: u32, fraction: f64) -> Vec<Point> {
    let count = (score as f64 * fraction).ceil().max(0.0) as usize;
    if count == 0 || body.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|index| body[index * body.len() / count])
        .collect()
}

#[derive(Debug, Clone)]
pub struct RemovedBot {
    pub bot: Bot,
    pub killer: Killer,
    pub dropped: usize,
}

/// Removes every victim in one pass and drops its food.
pub fn apply_kills<R: Rng + ?Sized>(
    bots: &mut Vec<Bot>,
    kills: &[Kill],
    food: &mut FoodField,
    config: &GameConfig,
    rng: &mut R,
) -> Vec<RemovedBot> {
    if kills.is_empty() {
        return Vec::new();
    }
    let mut killers: HashMap<BotId, Killer> = kills
        .iter()
        .map(|kill| (kill.victim, kill.killer.clone()))
        .collect();

    let mut victims = Vec::with_capacity(killers.len());
    let mut survivors = Vec::with_capacity(bots.len());
    for bot in bots.drain(..) {
        match killers.remove(&bot.id) {
            Some(killer) => victims.push((bot, killer)),
            None => survivors.push(bot),
        }
    }
    *bots = survivors;

    victims
        .into_iter()
        .map(|(bot, killer)| {
            let drops = drop_positions(&bot.snake, bot.score, config.drop_fraction);
            for point in &drops {
                food.insert_at(*point, rng);
            }
            tracing::debug!(
                bot = %bot.name,
                killer = ?killer,
                dropped = drops.len(),
                "bot killed"
            );
            RemovedBot {
                bot,
                killer,
                dropped: drops.len(),
            }
        })
        .collect()
}

/// Silently removes bots that left the padded view, and any with no body.
pub fn despawn_out_of_bounds(bots: &mut Vec<Bot>, view: &Viewport, padding: f64) -> Vec<BotId> {
    let mut despawned = Vec::new();
    bots.retain(|bot| {
        let keep = bot
            .head()
            .map(|head| view.contains_padded(head, padding))
            .unwrap_or(false);
        if !keep {
            tracing::debug!(bot = %bot.name, "bot left the play area");
            despawned.push(bot.id);
        }
        keep
    });
    despawned
}

pub fn random_spawn_point<R: Rng + ?Sized>(view: &Viewport, spread: f64, rng: &mut R) -> Point {
    let center = view.center();
    Point {
        lat: center.lat + (rng.gen::<f64>() - 0.5) * view.lat_span() * spread,
        lng: center.lng + (rng.gen::<f64>() - 0.5) * view.lng_span() * spread,
    }
}

/// Spawns bots until the live count reaches `config.bot_count`.
pub fn top_up<R: Rng + ?Sized>(
    bots: &mut Vec<Bot>,
    view: &Viewport,
    config: &GameConfig,
    next_index: &mut u64,
    rng: &mut R,
) -> Vec<BotId> {
    let mut spawned = Vec::new();
    while bots.len() < config.bot_count {
        let index = *next_index;
        *next_index += 1;
        let head = random_spawn_point(view, config.spawn_spread, rng);
        let bot = new_bot(BotId(index), index, head, config, rng);
        spawned.push(bot.id);
        bots.push(bot);
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::snake::create_snake;
    use crate::game::types::BotMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_bot(id: u64, head: Point, len: usize, score: u32) -> Bot {
        Bot {
            id: BotId(id),
            name: format!("Bot-{id}"),
            color: "#00ff00",
            snake: create_snake(head, len, 0.000005),
            mode: BotMode::SeekingFood,
            target: None,
            heading: Point::new(1.0, 0.0),
            score,
        }
    }

    fn view() -> Viewport {
        Viewport::around(Point::new(0.0, 0.0), 0.004, 0.004)
    }

    #[test]
    fn drop_count_is_ceil_of_half_score() {
        let body = create_snake(Point::new(0.0, 0.0), 90, 0.000005);
        let drops = drop_positions(&body, 4, 0.5);
        assert_eq!(drops, vec![body[0], body[45]]);
        assert_eq!(drop_positions(&body, 3, 0.5).len(), 2);
        assert!(drop_positions(&body, 0, 0.5).is_empty());
    }

    #[test]
    fn drops_on_short_body_spread_along_it() {
        let body = create_snake(Point::new(0.0, 0.0), 4, 0.000005);
        let drops = drop_positions(&body, 16, 0.5);
        assert_eq!(drops.len(), 8);
        for segment in &body {
            let hits = drops.iter().filter(|point| *point == segment).count();
            assert_eq!(hits, 2);
        }
        assert_eq!(drops[7], body[3]);
    }

    #[test]
    fn apply_kills_removes_victims_and_drops_food() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = GameConfig::default();
        let mut food = FoodField::new();
        let mut bots = vec![
            make_bot(1, Point::new(0.0, 0.0), 90, 4),
            make_bot(2, Point::new(0.001, 0.0), 10, 0),
            make_bot(3, Point::new(0.002, 0.0), 10, 1),
        ];
        let kills = vec![
            Kill {
                victim: BotId(1),
                killer: Killer::Bot {
                    id: BotId(2),
                    name: "Bot-2".to_string(),
                },
            },
            Kill {
                victim: BotId(3),
                killer: Killer::Player,
            },
        ];

        let removed = apply_kills(&mut bots, &kills, &mut food, &config, &mut rng);

        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].dropped, 2);
        assert_eq!(removed[1].dropped, 1);
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].id, BotId(2));
        assert_eq!(food.len(), 2 + 1);
    }

    #[test]
    fn despawn_removes_only_bots_outside_padding() {
        let mut bots = vec![
            make_bot(1, Point::new(0.0, 0.0), 5, 0),
            make_bot(2, Point::new(0.0, 0.0115), 5, 0),
            make_bot(3, Point::new(-0.0125, 0.0), 5, 0),
        ];
        let gone = despawn_out_of_bounds(&mut bots, &view(), 0.01);
        assert_eq!(gone, vec![BotId(3)]);
        assert_eq!(bots.len(), 2);
    }

    #[test]
    fn despawn_clears_bodyless_bots() {
        let mut bot = make_bot(1, Point::new(0.0, 0.0), 5, 0);
        bot.snake.clear();
        let mut bots = vec![bot];
        let gone = despawn_out_of_bounds(&mut bots, &view(), 0.01);
        assert_eq!(gone, vec![BotId(1)]);
    }

    #[test]
    fn top_up_fills_to_population_inside_view() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = GameConfig {
            bot_count: 4,
            ..GameConfig::default()
        };
        let mut bots = vec![make_bot(1, Point::new(0.0, 0.0), 5, 0)];
        let mut next_index = 2;
        let spawned = top_up(&mut bots, &view(), &config, &mut next_index, &mut rng);
        assert_eq!(spawned, vec![BotId(2), BotId(3), BotId(4)]);
        assert_eq!(bots.len(), 4);
        assert_eq!(next_index, 5);
        for bot in &bots {
            let head = bot.head().expect("spawned with body");
            assert!(view().contains_padded(head, 0.0));
        }
    }
}
