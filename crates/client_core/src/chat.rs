//! Live group chat over the backend websocket (`/api/ws/{group_id}`).

use futures::StreamExt;
use shared::{domain::GroupId, protocol::ChatMessage};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

const CHAT_FEED_CAPACITY: usize = 256;

/// Messages pushed for one group. Dropping the feed stops the reader task.
pub struct GroupChatFeed {
    group_id: GroupId,
    receiver: mpsc::Receiver<ChatMessage>,
    task: JoinHandle<()>,
}

impl GroupChatFeed {
    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    /// `None` once the socket has closed.
    pub async fn next_message(&mut self) -> Option<ChatMessage> {
        self.receiver.recv().await
    }
}

impl Drop for GroupChatFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn websocket_url(api_base: &str, group_id: &GroupId) -> Result<String> {
    let ws_base = if api_base.starts_with("https://") {
        api_base.replacen("https://", "wss://", 1)
    } else if api_base.starts_with("http://") {
        api_base.replacen("http://", "ws://", 1)
    } else {
        return Err(ClientError::InvalidUrl {
            url: api_base.to_string(),
            reason: "api base must start with http:// or https://".to_string(),
        });
    };
    Ok(format!("{ws_base}/ws/{}", group_id.as_str()))
}

pub(crate) async fn connect_group_chat(api_base: &str, group_id: GroupId) -> Result<GroupChatFeed> {
    let ws_url = websocket_url(api_base, &group_id)?;
    let (ws_stream, _) = connect_async(&ws_url)
        .await
        .map_err(|err| ClientError::WebSocket(format!("failed to connect {ws_url}: {err}")))?;
    let (_, mut ws_reader) = ws_stream.split();

    let (tx, receiver) = mpsc::channel(CHAT_FEED_CAPACITY);
    let feed_group = group_id.clone();
    let task = tokio::spawn(async move {
        while let Some(frame) = ws_reader.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<ChatMessage>(&text) {
                    Ok(message) if message.group_id == feed_group => {
                        if tx.send(message).await.is_err() {
                            break;
                        }
                    }
                    Ok(message) => {
                        debug!(
                            expected = %feed_group,
                            got = %message.group_id,
                            "chat: dropping message for another group"
                        );
                    }
                    Err(err) => warn!(group_id = %feed_group, "chat: skipping malformed frame: {err}"),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(group_id = %feed_group, "chat: websocket receive failed: {err}");
                    break;
                }
            }
        }
        debug!(group_id = %feed_group, "chat: websocket reader finished");
    });

    Ok(GroupChatFeed {
        group_id,
        receiver,
        task,
    })
}
