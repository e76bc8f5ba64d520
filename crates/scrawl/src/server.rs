//! `ScrawlServer` builder and accept loop.
//!
//! Ties the layers together: transport → handler → hub → orchestrator.

use std::net::SocketAddr;

use scrawl_game::OrchestratorConfig;
use scrawl_protocol::JsonCodec;
use scrawl_transport::{DEFAULT_MAX_MESSAGE_SIZE, Transport, TransportError, WebSocketTransport};
use tokio::sync::mpsc;

use crate::handler::handle_connection;
use crate::hub::{Hub, Inbound};
use crate::{ScrawlError, ServerConfig};

/// Builder for configuring and starting a scrawl server.
///
/// # Example
///
/// ```rust,no_run
/// use scrawl::prelude::*;
///
/// # async fn start() -> Result<(), ScrawlError> {
/// let server = ScrawlServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScrawlServerBuilder {
    bind_addr: String,
    max_message_size: usize,
    orchestrator: OrchestratorConfig,
    seed: Option<u64>,
}

impl ScrawlServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            orchestrator: OrchestratorConfig::default(),
            seed: None,
        }
    }

    /// Starts from a loaded [`ServerConfig`].
    pub fn from_config(config: ServerConfig) -> Self {
        Self {
            bind_addr: config.bind_addr,
            max_message_size: config.max_message_size,
            orchestrator: config.orchestrator,
            seed: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the largest inbound message, in bytes.
    pub fn max_message_size(mut self, bytes: usize) -> Self {
        self.max_message_size = bytes;
        self
    }

    pub fn orchestrator_config(mut self, config: OrchestratorConfig) -> Self {
        self.orchestrator = config;
        self
    }

    /// Seeds room codes, avatars, and modifier plans.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Binds the listener and prepares the hub.
    ///
    /// Nothing is processed until [`ScrawlServer::run`] is called.
    pub async fn build(self) -> Result<ScrawlServer, ScrawlError> {
        let transport =
            WebSocketTransport::bind(self.bind_addr.as_str(), self.max_message_size).await?;
        let (hub, hub_tx) = Hub::new(self.orchestrator, self.seed, JsonCodec);
        Ok(ScrawlServer {
            transport,
            hub,
            hub_tx,
        })
    }
}

impl Default for ScrawlServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound scrawl server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ScrawlServer {
    transport: WebSocketTransport,
    hub: Hub<JsonCodec>,
    hub_tx: mpsc::UnboundedSender<Inbound>,
}

impl ScrawlServer {
    /// Creates a new builder.
    pub fn builder() -> ScrawlServerBuilder {
        ScrawlServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ScrawlError> {
        Ok(self.transport.local_addr()?)
    }

    /// Starts the hub and runs the accept loop.
    ///
    /// Spawns a handler task per connection. Runs until the process is
    /// terminated or the future is dropped.
    pub async fn run(self) -> Result<(), ScrawlError> {
        let Self {
            mut transport,
            hub,
            hub_tx,
        } = self;

        let hub_task = tokio::spawn(hub.run());
        tracing::info!(addr = ?transport.local_addr().ok(), "scrawl server running");

        let result = loop {
            if hub_task.is_finished() {
                break Err(ScrawlError::Shutdown);
            }
            match transport.accept().await {
                Ok(conn) => {
                    let hub_tx = hub_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, hub_tx, JsonCodec).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e @ TransportError::Handshake(_)) => {
                    tracing::debug!(error = %e, "rejected non-WebSocket client");
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        };

        hub_task.abort();
        result
    }
}
