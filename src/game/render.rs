use super::food::FoodField;
use super::notices::NoticeFeed;
use super::types::{Bot, BotId, FoodId, PlayerState, Point, Viewport};
use super::world::{TickReport, WorldState};
use serde::Serialize;

pub const PLAYER_KEY: &str = "player";

pub fn bot_key(id: BotId) -> String {
    format!("bot-{}", id.0)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeShape {
    pub key: String,
    pub label: String,
    pub color: &'static str,
    pub head: Point,
    pub path: Vec<Point>,
    pub is_player: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodMarker {
    pub id: FoodId,
    pub lat: f64,
    pub lng: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub length: usize,
    pub bots: usize,
}

/// `remaining_ms` lets the client retire a notice after frames stop.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeView {
    pub id: u64,
    pub text: String,
    pub opacity: f64,
    pub remaining_ms: i64,
}

/// Incremental per-tick update. Food is sent as membership deltas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub tick: u64,
    pub snakes: Vec<SnakeShape>,
    pub removed_snakes: Vec<String>,
    pub food_added: Vec<FoodMarker>,
    pub food_removed: Vec<FoodId>,
    pub hud: Hud,
    pub notices: Vec<NoticeView>,
}

/// Full picture sent when a round starts or restarts.
#[derive(Debug, Clone, Serialize)]
pub struct Keyframe {
    pub viewport: Viewport,
    pub snakes: Vec<SnakeShape>,
    pub food: Vec<FoodMarker>,
    pub hud: Hud,
    pub notices: Vec<NoticeView>,
}

fn player_shape(player: &PlayerState) -> Option<SnakeShape> {
    let head = player.head()?;
    Some(SnakeShape {
        key: PLAYER_KEY.to_string(),
        label: player.name.clone(),
        color: player.color,
        head,
        path: player.snake.clone(),
        is_player: true,
    })
}

fn bot_shape(bot: &Bot) -> Option<SnakeShape> {
    let head = bot.head()?;
    Some(SnakeShape {
        key: bot_key(bot.id),
        label: bot.name.clone(),
        color: bot.color,
        head,
        path: bot.snake.clone(),
        is_player: false,
    })
}

fn snake_shapes(world: &WorldState) -> Vec<SnakeShape> {
    player_shape(&world.player)
        .into_iter()
        .chain(world.bots.iter().filter_map(bot_shape))
        .collect()
}

fn food_marker(food: &FoodField, id: FoodId) -> Option<FoodMarker> {
    let item = food.get(id)?;
    Some(FoodMarker {
        id: item.id,
        lat: item.position.lat,
        lng: item.position.lng,
        color: item.color,
    })
}

fn notice_views(notices: &NoticeFeed, now: i64) -> Vec<NoticeView> {
    notices
        .active(now)
        .map(|notice| NoticeView {
            id: notice.id,
            text: notice.text.clone(),
            opacity: notice.opacity(now),
            remaining_ms: notice.remaining_ms(now),
        })
        .collect()
}

pub fn hud(world: &WorldState) -> Hud {
    Hud {
        score: world.score(),
        length: world.player_length(),
        bots: world.bots.len(),
    }
}

/// Drains pending food changes, so each frame carries only its own tick.
pub fn build_frame(world: &mut WorldState, report: &TickReport, now: i64) -> RenderFrame {
    let changes = world.food.take_changes();
    let food_added = changes
        .added
        .iter()
        .filter_map(|id| food_marker(&world.food, *id))
        .collect();
    let removed_snakes = report
        .killed
        .iter()
        .map(|killed| killed.id)
        .chain(report.despawned.iter().copied())
        .map(bot_key)
        .collect();

    RenderFrame {
        tick: report.tick,
        snakes: snake_shapes(world),
        removed_snakes,
        food_added,
        food_removed: changes.removed,
        hud: hud(world),
        notices: notice_views(&world.notices, now),
    }
}

/// Also discards pending food changes; the keyframe already lists every item.
pub fn build_keyframe(world: &mut WorldState, now: i64) -> Keyframe {
    world.food.take_changes();
    let food = world
        .food
        .iter()
        .map(|item| FoodMarker {
            id: item.id,
            lat: item.position.lat,
            lng: item.position.lng,
            color: item.color,
        })
        .collect();

    Keyframe {
        viewport: world.view(),
        snakes: snake_shapes(world),
        food,
        hud: hud(world),
        notices: notice_views(&world.notices, now),
    }
}
