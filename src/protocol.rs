use crate::game::render::{Keyframe, RenderFrame};
use serde::{Deserialize, Serialize};

/// Text frames sent by the browser client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
  #[serde(rename = "position")]
  Position {
    lat: f64,
    lng: f64,
    accuracy: Option<f64>,
  },
  #[serde(rename = "positionError")]
  PositionError { code: Option<u16> },
  #[serde(rename = "viewport")]
  Viewport {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
  },
  #[serde(rename = "restart")]
  Restart,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
  #[serde(rename = "init")]
  Init {
    #[serde(rename = "roundId")]
    round_id: String,
    keyframe: Keyframe,
  },
  #[serde(rename = "frame")]
  Frame(RenderFrame),
  /// Smoothed position marker with its accuracy radius in metres.
  #[serde(rename = "location")]
  Location { lat: f64, lng: f64, accuracy: f64 },
  #[serde(rename = "advisory")]
  Advisory {
    text: String,
    #[serde(rename = "durationMs")]
    duration_ms: i64,
  },
  #[serde(rename = "gameOver")]
  GameOver { score: u32, length: usize },
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  serde_json::from_str(text).ok()
}

pub fn encode_server_message(message: &ServerMessage) -> Option<String> {
  match serde_json::to_string(message) {
    Ok(payload) => Some(payload),
    Err(error) => {
      tracing::warn!(%error, "failed to encode server message");
      None
    }
  }
}
