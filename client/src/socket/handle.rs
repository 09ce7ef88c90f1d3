use tokio::sync::mpsc;
use tracing::debug;

use super::events::ClientEvent;

/// Client-side emit half of the socket.
///
/// The transport layer owns the receiver and forwards emitted events
/// over the wire; this crate never touches the wire itself.
#[derive(Debug, Clone)]
pub struct SocketHandle {
    outbound: mpsc::UnboundedSender<ClientEvent>,
}

impl SocketHandle {
    /// Create a handle plus the transport-side receiver.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { outbound: tx }, rx)
    }

    /// Emit an event toward the server. Returns false if the transport
    /// side is gone; the event is dropped rather than buffered.
    pub fn emit(&self, event: ClientEvent) -> bool {
        let sent = self.outbound.send(event).is_ok();
        if !sent {
            debug!("dropping event, socket transport closed");
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_transport() {
        let (handle, mut rx) = SocketHandle::new();
        assert!(handle.emit(ClientEvent::join(1, "general")));

        let event = rx.try_recv().unwrap();
        assert_eq!(event, ClientEvent::join(1, "general"));
    }

    #[test]
    fn test_emit_after_transport_closed() {
        let (handle, rx) = SocketHandle::new();
        drop(rx);
        assert!(!handle.emit(ClientEvent::join(1, "general")));
    }

    #[test]
    fn test_clones_share_transport() {
        let (handle, mut rx) = SocketHandle::new();
        let other = handle.clone();

        handle.emit(ClientEvent::join(1, "general"));
        other.emit(ClientEvent::part(1, "#random"));

        assert_eq!(rx.try_recv().unwrap(), ClientEvent::join(1, "general"));
        assert_eq!(rx.try_recv().unwrap(), ClientEvent::part(1, "#random"));
    }
}
