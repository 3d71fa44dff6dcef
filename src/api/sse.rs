//! Server-Sent Events support

use super::types::{ConversationResponse, MessageView};
use crate::conversation::ConversationEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Stream the init snapshot followed by every store change
pub fn sse_stream(
    init: ConversationResponse,
    events_rx: broadcast::Receiver<ConversationEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(init_event(&init)) });

    Sse::new(init.chain(store_updates(events_rx))).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// Store changes as SSE events. A client that falls behind is cut off so
/// `EventSource` reconnects and starts again from a fresh `init`.
fn store_updates(
    events_rx: broadcast::Receiver<ConversationEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(events_rx).map_while(|result| match result {
        Ok(event) => Some(Ok(store_event_to_axum(event))),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE client lagged, closing stream");
            None
        }
    })
}

fn init_event(snapshot: &ConversationResponse) -> Event {
    let data = json!({
        "type": "init",
        "conversation": snapshot,
    });
    Event::default().event("init").data(data.to_string())
}

fn store_event_to_axum(event: ConversationEvent) -> Event {
    let (event_type, data) = match event {
        ConversationEvent::MessageAppended { message } => (
            "message",
            json!({
                "type": "message",
                "message": MessageView::from(message),
            }),
        ),
        ConversationEvent::LoadingChanged { loading } => (
            "loading",
            json!({
                "type": "loading",
                "loading": loading,
            }),
        ),
        ConversationEvent::InsightChanged { insight } => (
            "insight",
            json!({
                "type": "insight",
                "insight": insight,
            }),
        ),
        ConversationEvent::SidebarChanged { open } => (
            "sidebar",
            json!({
                "type": "sidebar",
                "open": open,
            }),
        ),
        ConversationEvent::ErrorChanged { error } => (
            "error",
            json!({
                "type": "error",
                "error": error,
            }),
        ),
    };

    Event::default().event(event_type).data(data.to_string())
}
