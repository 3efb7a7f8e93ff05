//! WebSocket listener built on `tokio-tungstenite`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request, Response,
};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::{Connection, ConnectionId, OriginPolicy, Transport, TransportError};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;

/// A [`Transport`] that upgrades TCP connections to WebSocket, checking
/// the handshake `Origin` against an [`OriginPolicy`].
///
/// The server loop uses [`accept_pending`](Self::accept_pending) and runs
/// the upgrade in the connection's own task, so a peer that never finishes
/// its handshake only holds up itself. [`Transport::accept`] does both
/// steps inline.
pub struct WebSocketTransport {
    listener: TcpListener,
    origin: OriginPolicy,
    handshake_timeout: Duration,
}

impl WebSocketTransport {
    /// Default limit on how long a peer may take to send its upgrade request.
    pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

    /// Binds a listener that accepts any origin.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        Self::bind_with_origin(addr, OriginPolicy::Any).await
    }

    /// Binds a listener that enforces `origin` on every handshake.
    pub async fn bind_with_origin(
        addr: &str,
        origin: OriginPolicy,
    ) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, ?origin, "WebSocket transport listening");
        Ok(Self {
            listener,
            origin,
            handshake_timeout: Self::DEFAULT_HANDSHAKE_TIMEOUT,
        })
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Accepts the next TCP connection without reading anything from it.
    pub async fn accept_pending(&mut self) -> Result<PendingConnection, TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::trace!(%addr, "tcp connection accepted");

        Ok(PendingConnection {
            stream,
            addr,
            origin: self.origin.clone(),
            timeout: self.handshake_timeout,
        })
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        self.accept_pending().await?.upgrade().await
    }

    fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// A TCP connection whose WebSocket handshake has not run yet.
pub struct PendingConnection {
    stream: TcpStream,
    addr: SocketAddr,
    origin: OriginPolicy,
    timeout: Duration,
}

impl PendingConnection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs the handshake, refusing foreign origins with HTTP 403.
    ///
    /// # Errors
    /// - [`TransportError::HandshakeTimeout`] if the peer is too slow
    /// - [`TransportError::OriginRejected`] if the origin is not allowed
    /// - [`TransportError::AcceptFailed`] for any other handshake failure
    pub async fn upgrade(self) -> Result<WebSocketConnection, TransportError> {
        let Self {
            stream,
            addr,
            origin: policy,
            timeout,
        } = self;

        let mut rejected: Option<String> = None;
        let handshake = tokio::time::timeout(
            timeout,
            tokio_tungstenite::accept_hdr_async(stream, |req: &Request, resp: Response| {
                let origin = req
                    .headers()
                    .get("origin")
                    .and_then(|value| value.to_str().ok());
                if policy.permits(origin) {
                    return Ok(resp);
                }
                rejected = origin.map(str::to_string);
                let mut forbidden: ErrorResponse =
                    ErrorResponse::new(Some("origin not allowed".to_string()));
                *forbidden.status_mut() = StatusCode::FORBIDDEN;
                Err(forbidden)
            }),
        )
        .await;

        let ws = match handshake {
            Ok(Ok(ws)) => ws,
            Ok(Err(e)) => {
                if let Some(origin) = rejected {
                    tracing::warn!(%addr, %origin, "handshake refused: origin not allowed");
                    return Err(TransportError::OriginRejected(origin));
                }
                return Err(TransportError::AcceptFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                )));
            }
            Err(_) => {
                tracing::debug!(%addr, "handshake timed out");
                return Err(TransportError::HandshakeTimeout(addr));
            }
        };

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted WebSocket connection");

        Ok(WebSocketConnection {
            id,
            ws: Arc::new(Mutex::new(ws)),
        })
    }
}

/// A single upgraded WebSocket connection.
///
/// Outgoing frames are sent as text when they are valid UTF-8, which is
/// always the case for JSON, so browser clients can read them directly.
pub struct WebSocketConnection {
    id: ConnectionId,
    ws: Arc<Mutex<WsStream>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        use futures_util::SinkExt;
        let msg = match std::str::from_utf8(data) {
            Ok(text) => Message::Text(text.into()),
            Err(_) => Message::Binary(data.to_vec().into()),
        };
        self.ws.lock().await.send(msg).await.map_err(|e| match e {
            WsError::ConnectionClosed | WsError::AlreadyClosed => {
                TransportError::ConnectionClosed(format!("{} closed before send", self.id))
            }
            other => TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                other,
            )),
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        use futures_util::StreamExt;
        loop {
            let msg = self.ws.lock().await.next().await;
            match msg {
                Some(Ok(Message::Binary(data))) => return Ok(Some(data.into())),
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                // ping/pong are answered by tungstenite itself
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.ws.lock().await.close(None).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
