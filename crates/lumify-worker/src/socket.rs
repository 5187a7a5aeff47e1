//! Messages pushed to the server socket

use crate::error::WorkerError;
use lumify_store::{UserId, WorkspaceId};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Worker → server socket message, `{ "type": ..., "data": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum SocketMessage {
    /// Tell the server which workspace this client is viewing
    #[serde(rename_all = "camelCase")]
    SetActiveWorkspace {
        /// Workspace now displayed
        workspace_id: WorkspaceId,
        /// Signed-in user
        user_id: UserId,
    },
}

/// Sink for socket messages
pub trait SocketSink: Send + Sync {
    /// Queue a message for the socket
    ///
    /// # Errors
    /// `WorkerError::ChannelClosed` if the socket side is gone.
    fn push_socket_message(&self, message: SocketMessage) -> Result<(), WorkerError>;
}

/// Socket sink backed by an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSocket {
    sender: mpsc::UnboundedSender<SocketMessage>,
}

impl ChannelSocket {
    /// Create sink and the receiving end for the socket writer
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SocketMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl SocketSink for ChannelSocket {
    fn push_socket_message(&self, message: SocketMessage) -> Result<(), WorkerError> {
        tracing::debug!(?message, "socket push");
        self.sender
            .send(message)
            .map_err(|_| WorkerError::ChannelClosed("socket"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set_active() -> SocketMessage {
        SocketMessage::SetActiveWorkspace {
            workspace_id: WorkspaceId::new("w1"),
            user_id: UserId::new("u1"),
        }
    }

    #[test]
    fn wire_shape() {
        assert_eq!(
            serde_json::to_value(set_active()).unwrap(),
            json!({"type": "setActiveWorkspace", "data": {"workspaceId": "w1", "userId": "u1"}})
        );
    }

    #[test]
    fn channel_delivers_and_reports_closure() {
        let (socket, mut receiver) = ChannelSocket::channel();
        socket.push_socket_message(set_active()).unwrap();
        assert_eq!(receiver.try_recv().unwrap(), set_active());

        drop(receiver);
        assert!(matches!(
            socket.push_socket_message(set_active()),
            Err(WorkerError::ChannelClosed("socket"))
        ));
    }
}
