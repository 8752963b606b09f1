use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::client::handle_client;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::protocol::responses::{TOO_MANY_CLIENTS, format_response};
use crate::server::GatewayContext;
use crate::server::listener::Listener;

pub struct Server {
    listener: Listener,
    context: Arc<GatewayContext>,
    connection_slots: Arc<Semaphore>,
    max_clients: usize,
}

impl Server {
    /// Binds the listener and builds the shared context from `config`.
    pub async fn bind(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::with_context(config, GatewayContext::from_config(config)).await
    }

    /// Like [`Server::bind`], with a caller-supplied context (e.g. another user store).
    pub async fn with_context(
        config: &GatewayConfig,
        context: GatewayContext,
    ) -> Result<Self, GatewayError> {
        let listener = match Listener::bind(&config.server).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", config.server.listen, e);
                return Err(GatewayError::from(e));
            }
        };

        let max_clients = config.server.max_clients;
        Ok(Self {
            listener,
            context: Arc::new(context),
            connection_slots: Arc::new(Semaphore::new(max_clients)),
            max_clients,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting RAX login gateway (max {} clients)",
            self.max_clients
        );

        loop {
            match &self.listener {
                Listener::Tcp(listener) => match listener.accept().await {
                    Ok((stream, addr)) => self.spawn_client(stream, addr.to_string()),
                    Err(e) => error!("Error accepting connection: {}", e),
                },
                #[cfg(unix)]
                Listener::Unix(listener) => match listener.accept().await {
                    Ok((stream, _)) => self.spawn_client(stream, "unix".to_string()),
                    Err(e) => error!("Error accepting connection: {}", e),
                },
            }
        }
    }

    /// Spawn a task for each client so the accept loop doesn't block
    fn spawn_client<S>(&self, stream: S, peer: String)
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let context = Arc::clone(&self.context);
        let permit = Arc::clone(&self.connection_slots).try_acquire_owned();

        tokio::spawn(async move {
            match permit {
                Ok(permit) => serve(stream, peer, context, permit).await,
                Err(_) => refuse(stream, peer).await,
            }
        });
    }
}

async fn serve<S>(stream: S, peer: String, context: Arc<GatewayContext>, _permit: OwnedSemaphorePermit)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    info!("Client connected: {}", peer);
    handle_client(stream, peer, context).await;
}

async fn refuse<S>(mut stream: S, peer: String)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    warn!("Refusing {}: too many connections", peer);
    let reply = format_response(TOO_MANY_CLIENTS, "Too many connections. Try again later.");
    if let Err(e) = stream.write_all(reply.as_bytes()).await {
        warn!("Failed to notify {}: {}", peer, e);
    }
    let _ = stream.shutdown().await;
}
