use super::bot::advance_bot;
use super::collision::{
    detect_snake_collisions, resolve_food_collisions, FoodBite, Kill, Killer, PlayerDeath,
};
use super::constants::PLAYER_COLOR;
use super::food::FoodField;
use super::notices::NoticeFeed;
use super::population::{apply_kills, despawn_out_of_bounds, top_up, RemovedBot};
use super::snake::{advance_toward, approach_fraction, create_snake, trim_to_cap};
use super::types::{Bot, BotId, PlayerState, Point, Viewport};
use crate::config::{GameConfig, MovementMode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    /// No position yet; nothing has been spawned.
    Waiting,
    Active,
    Over,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KilledBot {
    pub id: BotId,
    pub name: String,
    pub killer: Killer,
    pub dropped: usize,
}

/// Everything that happened during one tick.
#[derive(Debug, Default, Clone)]
pub struct TickReport {
    pub tick: u64,
    pub player_moved: bool,
    pub bites: Vec<FoodBite>,
    pub killed: Vec<KilledBot>,
    pub despawned: Vec<BotId>,
    pub spawned: Vec<BotId>,
    pub player_death: Option<PlayerDeath>,
}

#[derive(Debug)]
pub struct WorldState {
    pub config: GameConfig,
    pub player: PlayerState,
    pub bots: Vec<Bot>,
    pub food: FoodField,
    pub notices: NoticeFeed,
    pub status: RoundStatus,
    pub tick: u64,
    client_view: Option<Viewport>,
    default_view: Viewport,
    next_bot_index: u64,
    rng: StdRng,
}

impl WorldState {
    pub fn new(config: GameConfig, player_name: String) -> Self {
        Self::with_rng(config, player_name, StdRng::from_entropy())
    }

    pub fn with_rng(config: GameConfig, player_name: String, rng: StdRng) -> Self {
        let center = config.fallback_position;
        let default_view = Viewport::around(
            center,
            config.default_view_span_lat,
            config.default_view_span_lng,
        );
        Self {
            player: PlayerState {
                name: player_name,
                color: PLAYER_COLOR,
                snake: Vec::new(),
                target: None,
                alive: false,
                score: 0,
            },
            bots: Vec::new(),
            food: FoodField::new(),
            notices: NoticeFeed::new(),
            status: RoundStatus::Waiting,
            tick: 0,
            client_view: None,
            default_view,
            next_bot_index: 1,
            rng,
            config,
        }
    }

    /// Visible region: the client's bounds when known, otherwise a default
    /// span around the round's starting point.
    pub fn view(&self) -> Viewport {
        self.client_view.unwrap_or(self.default_view)
    }

    pub fn set_viewport(&mut self, view: Viewport) {
        self.client_view = Some(view);
    }

    pub fn set_player_target(&mut self, target: Point) {
        if target.is_finite() {
            self.player.target = Some(target);
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RoundStatus::Active
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    pub fn player_length(&self) -> usize {
        self.player.snake.len()
    }

    /// Resets every entity and starts a round centred on `center`.
    pub fn init_round(&mut self, center: Point) {
        self.bots.clear();
        self.food.clear();
        self.notices.clear();
        self.default_view = Viewport::around(
            center,
            self.config.default_view_span_lat,
            self.config.default_view_span_lng,
        );

        self.player.snake = create_snake(
            center,
            self.config.initial_length,
            self.config.segment_spacing,
        );
        self.player.target = Some(center);
        self.player.score = 0;
        self.player.alive = true;

        let view = self.view();
        self.food.spawn_bulk(
            center,
            &view,
            self.config.spawn_spread,
            self.config.food_count,
            &mut self.rng,
        );
        top_up(
            &mut self.bots,
            &view,
            &self.config,
            &mut self.next_bot_index,
            &mut self.rng,
        );

        self.tick = 0;
        self.status = RoundStatus::Active;
        tracing::info!(
            lat = center.lat,
            lng = center.lng,
            food = self.food.len(),
            bots = self.bots.len(),
            "round started"
        );
    }

    /// Starts over around the centre of the current view.
    pub fn restart_round(&mut self) {
        let center = self.view().center();
        tracing::info!(previous_score = self.player.score, "round restarted");
        self.init_round(center);
    }

    pub fn announce_kill(&mut self, text: impl Into<String>, now: i64) {
        self.notices.push(
            text,
            now,
            self.config.kill_notice_ms,
            self.config.notice_fade_ms,
        );
    }

    /// One simulation step: player, bots, collisions, population.
    pub fn tick(&mut self, now: i64) -> TickReport {
        let mut report = TickReport::default();
        self.notices.prune(now);
        if self.status != RoundStatus::Active {
            return report;
        }
        self.tick += 1;
        report.tick = self.tick;

        report.player_moved = self.advance_player();
        self.advance_bots();

        let Some(kills) = self.resolve_collisions(&mut report) else {
            return report;
        };
        self.manage_population(kills, now, &mut report);
        report
    }

    fn advance_player(&mut self) -> bool {
        if !self.player.alive {
            return false;
        }
        let config = &self.config;
        let player = &mut self.player;
        let moved = match config.movement_mode {
            MovementMode::FixedSpeed => advance_toward(
                &mut player.snake,
                player.target,
                config.player_speed,
                config.dead_zone,
                config.segment_spacing,
            ),
            MovementMode::Fractional { fraction } => approach_fraction(
                &mut player.snake,
                player.target,
                fraction,
                config.dead_zone,
                config.segment_spacing,
            ),
        };
        if moved {
            trim_to_cap(&mut player.snake, config.max_length(player.score));
        }
        moved
    }

    fn advance_bots(&mut self) {
        for bot in self.bots.iter_mut() {
            advance_bot(bot, &self.food, &self.config, &mut self.rng);
        }
    }

    /// Food first, then snake-vs-snake. Returns the pending kill batch, or
    /// `None` when the player died and the round is over.
    fn resolve_collisions(
        &mut self,
        report: &mut TickReport,
    ) -> Option<Vec<Kill>> {
        let view = self.view();
        report.bites = resolve_food_collisions(
            &mut self.player,
            &mut self.bots,
            &mut self.food,
            &view,
            &self.config,
            &mut self.rng,
        );

        let collisions = detect_snake_collisions(&self.player, &self.bots, &self.config);
        if let Some(death) = collisions.player_death {
            self.game_over(&death);
            report.player_death = Some(death);
            return None;
        }
        Some(collisions.kills)
    }

    fn manage_population(
        &mut self,
        kills: Vec<Kill>,
        now: i64,
        report: &mut TickReport,
    ) {
        let removed = apply_kills(
            &mut self.bots,
            &kills,
            &mut self.food,
            &self.config,
            &mut self.rng,
        );
        for RemovedBot {
            bot,
            killer,
            dropped,
        } in removed
        {
            match &killer {
                Killer::Player => {
                    let bonus = self.config.player_kill_bonus;
                    self.player.score += bonus;
                    self.announce_kill(format!("Bot Killed! +{bonus} Score"), now);
                }
                Killer::Bot { name, .. } => {
                    self.announce_kill(format!("{} was slain by {}", bot.name, name), now);
                }
                Killer::Itself => {
                    self.announce_kill(format!("{} ran into itself", bot.name), now);
                }
            }
            report.killed.push(KilledBot {
                id: bot.id,
                name: bot.name,
                killer,
                dropped,
            });
        }

        let view = self.view();
        report.despawned =
            despawn_out_of_bounds(&mut self.bots, &view, self.config.despawn_padding);
        report.spawned = top_up(
            &mut self.bots,
            &view,
            &self.config,
            &mut self.next_bot_index,
            &mut self.rng,
        );
    }

    fn game_over(&mut self, death: &PlayerDeath) {
        self.player.alive = false;
        self.status = RoundStatus::Over;
        tracing::info!(
            score = self.player.score,
            length = self.player.snake.len(),
            cause = ?death,
            "round over"
        );
    }
}
