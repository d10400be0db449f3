use super::*;
use crate::game::types::Point;
use serde_json::Value;

fn quiet_config() -> GameConfig {
  GameConfig {
    bot_count: 0,
    food_count: 4,
    ..GameConfig::default()
  }
}

fn drain_events(io: &mut RoundIo) -> Vec<Value> {
  let mut events = Vec::new();
  while let Ok(payload) = io.events_rx.try_recv() {
    events.push(serde_json::from_str(&payload).expect("event is json"));
  }
  events
}

#[tokio::test]
async fn first_fix_starts_the_round() {
  let (round, mut io) = Round::new(quiet_config(), 16, "Tester".to_string());
  round
    .handle_text_message(r#"{"type":"position","lat":48.85,"lng":2.35,"accuracy":12.0}"#)
    .await;

  let events = drain_events(&mut io);
  assert_eq!(events[0]["type"], "init");
  assert_eq!(events[0]["roundId"], round.id());
  assert_eq!(events[0]["keyframe"]["food"].as_array().map(Vec::len), Some(4));
  assert_eq!(events[1]["type"], "location");
  assert_eq!(events[1]["accuracy"], 12.0);

  let stats = round.stats().await;
  assert_eq!(stats.status, RoundStatus::Active);
  assert!(stats.last_fix_at.is_some());
  {
    let world = round.state.lock().await;
    assert_eq!(world.player.head(), Some(Point::new(48.85, 2.35)));
  }
  round.close();
}

#[tokio::test]
async fn later_fixes_only_move_the_target() {
  let (round, mut io) = Round::new(quiet_config(), 16, "Tester".to_string());
  round
    .handle_text_message(r#"{"type":"position","lat":10.0,"lng":20.0}"#)
    .await;
  round
    .handle_text_message(r#"{"type":"position","lat":10.0002,"lng":20.0}"#)
    .await;

  let events = drain_events(&mut io);
  let inits = events.iter().filter(|event| event["type"] == "init").count();
  assert_eq!(inits, 1);
  let smoothed = round.inbox.snapshot().target.expect("target recorded");
  assert!((smoothed.lat - 10.0001).abs() < 1e-9);
  round.close();
}

#[tokio::test]
async fn position_error_starts_at_fallback_with_advisory() {
  let config = quiet_config();
  let fallback = config.fallback_position;
  let (round, mut io) = Round::new(config, 16, "Tester".to_string());
  round
    .handle_text_message(r#"{"type":"positionError","code":1}"#)
    .await;

  let events = drain_events(&mut io);
  assert_eq!(events[0]["type"], "init");
  assert_eq!(events[1]["type"], "advisory");
  assert_eq!(
    events[1]["text"],
    "Unable to get location: Permission denied. Please allow location access."
  );
  assert_eq!(events[1]["durationMs"], 3000);
  {
    let world = round.state.lock().await;
    assert_eq!(world.player.head(), Some(fallback));
  }
  round.close();
}

#[tokio::test]
async fn restart_is_ignored_before_the_round_starts() {
  let (round, mut io) = Round::new(quiet_config(), 16, "Tester".to_string());
  round.handle_text_message(r#"{"type":"restart"}"#).await;
  assert!(drain_events(&mut io).is_empty());
  assert_eq!(round.stats().await.status, RoundStatus::Waiting);
}

#[tokio::test]
async fn restart_after_game_over_sends_a_new_keyframe() {
  let (round, mut io) = Round::new(quiet_config(), 16, "Tester".to_string());
  round
    .handle_text_message(r#"{"type":"position","lat":0.0,"lng":0.0}"#)
    .await;
  round.close();
  {
    let mut world = round.state.lock().await;
    world.player.score = 9;
    world.status = RoundStatus::Over;
  }
  drain_events(&mut io);

  round.handle_text_message(r#"{"type":"restart"}"#).await;

  let events = drain_events(&mut io);
  assert_eq!(events.len(), 1);
  assert_eq!(events[0]["type"], "init");
  assert_eq!(events[0]["keyframe"]["hud"]["score"], 0);
  assert_eq!(round.stats().await.status, RoundStatus::Active);
}

#[tokio::test]
async fn viewport_is_applied_to_the_world() {
  let (round, _io) = Round::new(quiet_config(), 16, "Tester".to_string());
  round
    .handle_text_message(r#"{"type":"viewport","north":1.0,"south":-1.0,"east":2.0,"west":-2.0}"#)
    .await;
  round
    .handle_text_message(r#"{"type":"viewport","north":-1.0,"south":1.0,"east":2.0,"west":-2.0}"#)
    .await;
  round
    .handle_text_message(r#"{"type":"position","lat":0.0,"lng":0.0}"#)
    .await;

  {
    let world = round.state.lock().await;
    assert_eq!(world.view(), Viewport::parse(1.0, -1.0, 2.0, -2.0).expect("valid"));
  }
  round.close();
}

#[tokio::test]
async fn tick_loop_publishes_frames() {
  let (round, io) = Round::new(quiet_config(), 5, "Tester".to_string());
  round
    .handle_text_message(r#"{"type":"position","lat":0.0,"lng":0.0}"#)
    .await;

  tokio::time::timeout(Duration::from_secs(2), io.outbound_state.wait_for_update())
    .await
    .expect("a frame arrives");
  let payload = io.outbound_state.take_latest().expect("frame stored");
  let frame: Value = serde_json::from_str(&payload).expect("frame is json");
  assert_eq!(frame["type"], "frame");
  assert!(frame["tick"].as_u64().unwrap_or(0) >= 1);
  round.close();
}

#[tokio::test]
async fn malformed_messages_are_ignored() {
  let (round, mut io) = Round::new(quiet_config(), 16, "Tester".to_string());
  round.handle_text_message("{").await;
  round
    .handle_text_message(r#"{"type":"position","lat":123.0,"lng":0.0}"#)
    .await;
  assert!(drain_events(&mut io).is_empty());
  assert_eq!(round.stats().await.status, RoundStatus::Waiting);
}
