use crate::game::round::{Round, RoundIo};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;

pub async fn handle_socket(socket: WebSocket, round: Arc<Round>, io: RoundIo) {
    let (mut sender, mut receiver) = socket.split();
    let RoundIo {
        outbound_state,
        mut events_rx,
    } = io;

    let send_task = tokio::spawn(async move {
        let mut pending_events: VecDeque<String> = VecDeque::new();
        let mut pending_state: Option<String> = None;

        loop {
            tokio::select! {
                event = events_rx.recv() => match event {
                    Some(payload) => pending_events.push_back(payload),
                    None => return,
                },
                _ = outbound_state.wait_for_update() => {}
            }

            while let Ok(payload) = events_rx.try_recv() {
                pending_events.push_back(payload);
            }
            if let Some(payload) = outbound_state.take_latest() {
                pending_state = Some(payload);
            }

            // Events first so an init always precedes the frames built on it.
            while let Some(payload) = pending_events.pop_front() {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }

            if let Some(payload) = pending_state.take() {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => round.handle_text_message(&text).await,
            Message::Close(_) => break,
            _ => {}
        }
    }

    tracing::debug!(round = %round.id(), "socket closed");
    round.close();
    send_task.abort();
}
