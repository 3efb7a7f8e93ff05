//! `WordforgeServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → game service → session
//! store, plus the background sweep that evicts idle games.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use wordforge_game::{GameConfig, GameService, IdProvider, WordSource};
use wordforge_protocol::{Codec, JsonCodec};
use wordforge_session::{SessionConfig, SessionStore};
use wordforge_sweep::SweepConfig;
use wordforge_transport::{OriginPolicy, Transport, TransportError, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{ServerConfig, WordforgeError};

/// Shared state handed to every connection task.
pub(crate) struct ServerState<W: WordSource, I: IdProvider, C: Codec> {
    pub(crate) service: GameService<W, I>,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Duration,
}

/// Builder for configuring and starting a Wordforge server.
///
/// # Example
///
/// ```rust,ignore
/// use wordforge::prelude::*;
///
/// let words = WordList::from_path("words.txt")?;
/// let server = WordforgeServer::builder()
///     .bind("0.0.0.0:1337")
///     .allowed_origin("https://play.example.com")
///     .build(words, RandomIdProvider)
///     .await?;
/// server.run().await
/// ```
pub struct WordforgeServerBuilder {
    bind_addr: String,
    origin: OriginPolicy,
    session_config: SessionConfig,
    sweep_config: SweepConfig,
    game_config: GameConfig,
    idle_timeout: Duration,
    handshake_timeout: Duration,
}

impl WordforgeServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:1337".to_string(),
            origin: OriginPolicy::Any,
            session_config: SessionConfig::default(),
            sweep_config: SweepConfig::default(),
            game_config: GameConfig::default(),
            idle_timeout: Duration::from_secs(60),
            handshake_timeout: WebSocketTransport::DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// A builder preloaded from a [`ServerConfig`].
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            bind_addr: config.bind_addr.clone(),
            origin: OriginPolicy::from_setting(config.allowed_origin.as_deref()),
            session_config: SessionConfig {
                ttl: config.session_ttl,
            },
            sweep_config: SweepConfig::with_interval(config.sweep_interval),
            game_config: GameConfig::default(),
            idle_timeout: config.idle_timeout,
            handshake_timeout: WebSocketTransport::DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Only browsers on this origin may connect.
    pub fn allowed_origin(mut self, origin: &str) -> Self {
        self.origin = OriginPolicy::from_setting(Some(origin));
        self
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    pub fn sweep_config(mut self, config: SweepConfig) -> Self {
        self.sweep_config = config;
        self
    }

    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.game_config = config;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// How long a client may take to complete the WebSocket upgrade.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and wires up the game service.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build<W: WordSource, I: IdProvider>(
        self,
        words: W,
        ids: I,
    ) -> Result<WordforgeServer<W, I, JsonCodec>, WordforgeError> {
        let transport = WebSocketTransport::bind_with_origin(&self.bind_addr, self.origin)
            .await?
            .with_handshake_timeout(self.handshake_timeout);

        let store = Arc::new(SessionStore::new(self.session_config));
        let service = GameService::new(store, words, ids).with_config(self.game_config);

        let state = Arc::new(ServerState {
            service,
            codec: JsonCodec,
            idle_timeout: self.idle_timeout,
        });

        Ok(WordforgeServer {
            transport,
            state,
            sweep_config: self.sweep_config,
        })
    }
}

impl Default for WordforgeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Wordforge server. Call [`run`](Self::run) or
/// [`run_until`](Self::run_until) to start serving.
pub struct WordforgeServer<W: WordSource, I: IdProvider, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<W, I, C>>,
    sweep_config: SweepConfig,
}

impl<W, I, C> WordforgeServer<W, I, C>
where
    W: WordSource,
    I: IdProvider,
    C: Codec,
{
    pub fn builder() -> WordforgeServerBuilder {
        WordforgeServerBuilder::new()
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The live session store, shared with the sweep task.
    pub fn store(&self) -> Arc<SessionStore> {
        Arc::clone(self.state.service.store())
    }

    /// Serves until the process is terminated.
    pub async fn run(self) -> Result<(), WordforgeError> {
        self.run_until(std::future::pending()).await
    }

    /// Serves until `shutdown` resolves.
    ///
    /// Starts the eviction sweep, then accepts connections and spawns a
    /// task for each that runs the WebSocket handshake and then the handler,
    /// so a slow handshake never holds up the listener. On shutdown the
    /// listener stops accepting and the sweep task is stopped before this
    /// returns; connections already open finish on their own.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), WordforgeError> {
        let sweeper = wordforge_sweep::spawn(self.store(), self.sweep_config.clone());
        tracing::info!(addr = ?self.transport.local_addr().ok(), "Wordforge server running");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested, no longer accepting");
                    break;
                }
                accepted = self.transport.accept_pending() => match accepted {
                    Ok(pending) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            let conn = match pending.upgrade().await {
                                Ok(conn) => conn,
                                Err(TransportError::OriginRejected(origin)) => {
                                    tracing::debug!(%origin, "connection refused");
                                    return;
                                }
                                Err(e) => {
                                    tracing::debug!(error = %e, "handshake failed");
                                    return;
                                }
                            };
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }

        match sweeper.stop().await {
            Ok(metrics) => tracing::info!(
                sweeps = metrics.total_sweeps,
                evicted = metrics.total_removed,
                "server stopped"
            ),
            Err(e) => tracing::error!(error = %e, "sweeper task failed"),
        }
        Ok(())
    }
}
