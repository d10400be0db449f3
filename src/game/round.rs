mod session;

pub use session::{LatestFrame, RoundIo};

use self::session::PositionInbox;
use super::position::{parse_reading, PositionError};
use super::render::{build_frame, build_keyframe};
use super::types::Viewport;
use super::world::{RoundStatus, WorldState};
use crate::app::time::now_millis;
use crate::config::GameConfig;
use crate::protocol::{self, ClientMessage, ServerMessage};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Mutex;
use uuid::Uuid;

/// One player's game: a world, its tick loop and the socket-facing queues.
#[derive(Debug)]
pub struct Round {
  id: String,
  created_at: i64,
  tick_ms: u64,
  state: Mutex<WorldState>,
  inbox: PositionInbox,
  running: AtomicBool,
  closed: AtomicBool,
  outbound_state: Arc<LatestFrame>,
  events: UnboundedSender<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStats {
  pub id: String,
  pub player: String,
  pub status: RoundStatus,
  pub score: u32,
  pub length: usize,
  pub bots: usize,
  pub food: usize,
  pub tick: u64,
  pub created_at: i64,
  pub last_fix_at: Option<i64>,
}

impl Round {
  pub fn new(config: GameConfig, tick_ms: u64, player_name: String) -> (Arc<Self>, RoundIo) {
    let (events, events_rx) = mpsc::unbounded_channel();
    let outbound_state = Arc::new(LatestFrame::new());
    let inbox = PositionInbox::new(config.smoothing_window);
    let round = Arc::new(Self {
      id: Uuid::new_v4().to_string(),
      created_at: now_millis(),
      tick_ms: tick_ms.max(1),
      state: Mutex::new(WorldState::new(config, player_name)),
      inbox,
      running: AtomicBool::new(false),
      closed: AtomicBool::new(false),
      outbound_state: Arc::clone(&outbound_state),
      events,
    });
    let io = RoundIo {
      outbound_state,
      events_rx,
    };
    (round, io)
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub async fn stats(&self) -> RoundStats {
    let world = self.state.lock().await;
    RoundStats {
      id: self.id.clone(),
      player: world.player.name.clone(),
      status: world.status,
      score: world.score(),
      length: world.player_length(),
      bots: world.bots.len(),
      food: world.food.len(),
      tick: world.tick,
      created_at: self.created_at,
      last_fix_at: self.inbox.snapshot().last_fix_at,
    }
  }

  /// Stops the tick loop at its next wake-up.
  pub fn close(&self) {
    self.closed.store(true, Ordering::SeqCst);
  }

  pub async fn handle_text_message(self: &Arc<Self>, text: &str) {
    let Some(message) = protocol::decode_client_message(text) else {
      tracing::debug!(round = %self.id, "ignoring malformed client message");
      return;
    };
    self.handle_client_message(message).await;
  }

  async fn handle_client_message(self: &Arc<Self>, message: ClientMessage) {
    match message {
      ClientMessage::Position {
        lat,
        lng,
        accuracy,
      } => self.handle_position(lat, lng, accuracy).await,
      ClientMessage::PositionError { code } => {
        self.handle_position_error(PositionError::from_code(code)).await
      }
      ClientMessage::Viewport {
        north,
        south,
        east,
        west,
      } => {
        if let Some(viewport) = Viewport::parse(north, south, east, west) {
          self.inbox.update_view(viewport);
        }
      }
      ClientMessage::Restart => self.handle_restart().await,
    }
  }

  async fn handle_position(self: &Arc<Self>, lat: f64, lng: f64, accuracy: Option<f64>) {
    let Some((reading, accuracy)) = parse_reading(lat, lng, accuracy) else {
      tracing::debug!(round = %self.id, lat, lng, "ignoring out-of-range position");
      return;
    };
    let smoothed = self.inbox.push_fix(reading);

    let mut world = self.state.lock().await;
    if world.status == RoundStatus::Waiting {
      self.apply_inbound(&mut world);
      world.init_round(smoothed);
      self.send_init(&mut world);
      drop(world);
      self.ensure_loop();
    } else {
      drop(world);
    }

    self.send(&ServerMessage::Location {
      lat: smoothed.lat,
      lng: smoothed.lng,
      accuracy,
    });
  }

  async fn handle_position_error(self: &Arc<Self>, error: PositionError) {
    tracing::warn!(round = %self.id, %error, "position source failed");
    let mut world = self.state.lock().await;
    let duration_ms = world.config.advisory_notice_ms;
    if world.status == RoundStatus::Waiting {
      let fallback = world.config.fallback_position;
      self.apply_inbound(&mut world);
      world.init_round(fallback);
      self.send_init(&mut world);
      drop(world);
      self.ensure_loop();
    } else {
      drop(world);
    }

    self.send(&ServerMessage::Advisory {
      text: error.to_string(),
      duration_ms,
    });
  }

  async fn handle_restart(self: &Arc<Self>) {
    let mut world = self.state.lock().await;
    if world.status == RoundStatus::Waiting {
      return;
    }
    self.apply_inbound(&mut world);
    world.restart_round();
    self.send_init(&mut world);
    drop(world);
    self.ensure_loop();
  }

  fn apply_inbound(&self, world: &mut WorldState) {
    let inbound = self.inbox.snapshot();
    if let Some(viewport) = inbound.viewport {
      world.set_viewport(viewport);
    }
    if let Some(target) = inbound.target {
      world.set_player_target(target);
    }
  }

  fn send(&self, message: &ServerMessage) {
    if let Some(payload) = protocol::encode_server_message(message) {
      let _ = self.events.send(payload);
    }
  }

  fn send_init(&self, world: &mut WorldState) {
    let keyframe = build_keyframe(world, now_millis());
    self.send(&ServerMessage::Init {
      round_id: self.id.clone(),
      keyframe,
    });
  }

  fn ensure_loop(self: &Arc<Self>) {
    if self
      .running
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      return;
    }

    let round = Arc::clone(self);
    tokio::spawn(async move {
      let mut interval = tokio::time::interval(Duration::from_millis(round.tick_ms));
      loop {
        interval.tick().await;
        if round.closed.load(Ordering::SeqCst) {
          round.running.store(false, Ordering::SeqCst);
          break;
        }
        let mut world = round.state.lock().await;
        round.apply_inbound(&mut world);

        let now = now_millis();
        let report = world.tick(now);
        let frame = build_frame(&mut world, &report, now);
        if let Some(payload) = protocol::encode_server_message(&ServerMessage::Frame(frame)) {
          round.outbound_state.store(payload);
        }

        if !world.is_active() {
          if report.player_death.is_some() {
            round.send(&ServerMessage::GameOver {
              score: world.score(),
              length: world.player_length(),
            });
          }
          round.running.store(false, Ordering::SeqCst);
          break;
        }
      }
    });
  }
}

#[cfg(test)]
mod tests;
