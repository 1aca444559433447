//! WebSocket endpoint for kitchen displays
//!
//! Each connection subscribes to the notifier before the upgrade response
//! is sent: once the handshake completes, every order created afterwards
//! reaches the client. Events are forwarded as JSON text frames. Anything
//! the kitchen sends is ignored apart from protocol control frames.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    metrics::get_metrics,
    notifier::{KitchenEvent, Notifier},
};

/// WebSocket handler for kitchen displays
#[derive(Clone, Debug)]
pub struct KitchenSocket {
    notifier: Notifier,
}

impl KitchenSocket {
    pub const fn new(notifier: Notifier) -> Self {
        Self { notifier }
    }

    /// Handle WebSocket upgrade request
    pub async fn handle_websocket(ws: WebSocketUpgrade, State(handler): State<Self>) -> Response {
        debug!("Kitchen WebSocket connection request");
        let events = handler.notifier.subscribe();
        ws.on_upgrade(move |socket| handler.handle_socket(socket, events))
    }

    /// Handle individual kitchen connection
    async fn handle_socket(self, socket: WebSocket, mut events: broadcast::Receiver<KitchenEvent>) {
        let connection_id = Uuid::new_v4();
        get_metrics().set_kitchen_connections(self.notifier.subscriber_count());
        info!(%connection_id, "Kitchen display connected");

        let (mut sender, mut receiver) = socket.split();

        // Forward kitchen events to the client
        let mut send_task = tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%connection_id, skipped, "Kitchen display lagging, events skipped");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        error!(%connection_id, "Failed to encode kitchen event: {}", e);
                        continue;
                    }
                };

                if sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
                get_metrics().record_kitchen_event_sent();
            }
        });

        // Drain client frames; axum answers pings on its own
        let mut receive_task = tokio::spawn(async move {
            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Close(_)) => {
                        debug!(%connection_id, "Kitchen display closed the connection");
                        break;
                    }
                    Ok(Message::Text(text)) => {
                        debug!(%connection_id, "Ignoring kitchen message: {}", text);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(%connection_id, "Kitchen WebSocket error: {}", e);
                        break;
                    }
                }
            }
        });

        // Wait for either task to complete
        tokio::select! {
            _ = &mut send_task => receive_task.abort(),
            _ = &mut receive_task => {
                send_task.abort();
                // The subscription lives in the send task
                let _ = send_task.await;
            }
        }

        get_metrics().set_kitchen_connections(self.notifier.subscriber_count());
        info!(%connection_id, "Kitchen display disconnected");
    }
}
