use axum::{
  extract::{Query, State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod game;
mod protocol;
mod shared;
mod transport;

use config::{GameConfig, ServerConfig};
use game::round::{Round, RoundStats};
use shared::names::sanitize_player_name;
use transport::ws_session::handle_socket;

struct AppState {
  rounds: DashMap<String, Arc<Round>>,
  config: GameConfig,
  server: ServerConfig,
}

#[derive(Debug, Serialize)]
struct OkResponse {
  ok: bool,
}

#[derive(Debug, Serialize)]
struct RoundsResponse {
  count: usize,
  rounds: Vec<RoundStats>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = GameConfig::load()?;
  let server = ServerConfig::from_env();
  tracing::info!(
    bots = config.bot_count,
    food = config.food_count,
    self_collision = config.self_collision_fatal,
    bot_vs_bot = config.bot_vs_bot_fatal,
    tick_ms = server.tick_ms,
    "game config loaded"
  );

  let address = format!("0.0.0.0:{}", server.port);
  let state = Arc::new(AppState {
    rounds: DashMap::new(),
    config,
    server,
  });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/api/rounds", get(rounds_get))
    .route("/api/round", get(ws_handler))
    .layer(cors)
    .with_state(state);

  tracing::info!("listening on {address}");
  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

async fn health() -> impl IntoResponse {
  Json(OkResponse { ok: true })
}

async fn rounds_get(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let live: Vec<Arc<Round>> = state
    .rounds
    .iter()
    .map(|entry| Arc::clone(entry.value()))
    .collect();
  let mut rounds = Vec::with_capacity(live.len());
  for round in live {
    rounds.push(round.stats().await);
  }
  rounds.sort_by_key(|stats| stats.created_at);
  Json(RoundsResponse {
    count: rounds.len(),
    rounds,
  })
}

async fn ws_handler(
  ws: WebSocketUpgrade,
  Query(params): Query<HashMap<String, String>>,
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  let raw_name = params.get("name").map(String::as_str).unwrap_or("Player");
  let name = sanitize_player_name(raw_name, "Player");
  ws.on_upgrade(move |socket| async move {
    let (round, io) = Round::new(state.config.clone(), state.server.tick_ms, name);
    let round_id = round.id().to_string();
    state.rounds.insert(round_id.clone(), Arc::clone(&round));
    tracing::info!(round = %round_id, "round opened");

    handle_socket(socket, round, io).await;

    state.rounds.remove(&round_id);
    tracing::info!(round = %round_id, "round closed");
  })
}
