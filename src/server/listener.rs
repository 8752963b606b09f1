//! Listening socket setup
//!
//! `server.listen` is either `host:port` (TCP) or an absolute path (Unix socket).

use log::info;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::net::UnixListener;

use crate::config::ServerConfig;

pub enum Listener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl Listener {
    pub async fn bind(config: &ServerConfig) -> io::Result<Listener> {
        if config.is_unix_socket() {
            return Self::bind_unix(config);
        }

        let listener = TcpListener::bind(config.listen.as_str()).await?;
        info!("Listening on {}", listener.local_addr()?);
        Ok(Listener::Tcp(listener))
    }

    #[cfg(unix)]
    fn bind_unix(config: &ServerConfig) -> io::Result<Listener> {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let path = &config.listen;

        // A previous run may have left its socket file behind
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != io::ErrorKind::NotFound {
                return Err(e);
            }
        }

        let listener = UnixListener::bind(path)?;

        if let Some(mode) = config.socket_mode() {
            fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
        }

        info!("Listening on Unix socket {}", path);
        Ok(Listener::Unix(listener))
    }

    #[cfg(not(unix))]
    fn bind_unix(config: &ServerConfig) -> io::Result<Listener> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("Unix sockets are not supported here: {}", config.listen),
        ))
    }

    /// TCP address actually bound; `None` for Unix sockets.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match self {
            Listener::Tcp(listener) => listener.local_addr().ok(),
            #[cfg(unix)]
            Listener::Unix(_) => None,
        }
    }
}
