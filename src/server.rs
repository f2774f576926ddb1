use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::Notify;

use crate::config::ServerConfig;
use crate::logger::Logger;
use crate::request::Request;
use crate::responder;

const MAX_REQUEST_BYTES: usize = 32 * 1024;

/// Shared run state: whether the listener is still accepting, plus the
/// wakeup used to unblock the accept loop on shutdown.
struct RunState {
    accepting: AtomicBool,
    notify: Notify,
}

/// Handle for triggering graceful shutdown. Cloneable; `shutdown` is
/// idempotent, so delivering the signal twice is harmless.
#[derive(Clone)]
pub struct ShutdownHandle {
    state: Arc<RunState>,
    logger: Arc<Logger>,
}

impl ShutdownHandle {
    /// Stop accepting new connections and close the listening socket.
    /// Handlers already running are left to finish on their own.
    pub fn shutdown(&self) {
        if self.state.accepting.swap(false, Ordering::SeqCst) {
            self.logger.log("Server aborted.");
            // notify_one stores a permit, so the accept loop sees the
            // shutdown even if it is not parked in select! right now.
            self.state.notify.notify_one();
        }
    }
}

/// The listener and dispatcher: accepts connections in a loop and spawns
/// one detached handler per connection.
pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    logger: Arc<Logger>,
    state: Arc<RunState>,
}

impl Server {
    /// Bind the listening socket. A bind failure means the server cannot
    /// run at all and is propagated to the caller.
    pub async fn bind(config: ServerConfig, logger: Logger) -> io::Result<Server> {
        let addr = format!("{}:{}", config.bind_address, config.port);
        let listener = TcpListener::bind(&addr).await?;
        Ok(Server {
            listener,
            config: Arc::new(config),
            logger: Arc::new(logger),
            state: Arc::new(RunState {
                accepting: AtomicBool::new(true),
                notify: Notify::new(),
            }),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            state: Arc::clone(&self.state),
            logger: Arc::clone(&self.logger),
        }
    }

    /// Accept until shut down. Each accepted connection is handled by
    /// its own task; nothing bounds how many run at once. Returning
    /// drops the listener, which closes the listening socket.
    pub async fn run(self) -> io::Result<()> {
        self.logger
            .log(&format!("Listening on {}.", self.listener.local_addr()?));

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let _ = stream.set_nodelay(true);
                            let config = Arc::clone(&self.config);
                            let logger = Arc::clone(&self.logger);
                            tokio::spawn(handle_connection(stream, peer, config, logger));
                        }
                        Err(e) => {
                            if self.state.accepting.load(Ordering::SeqCst) {
                                self.logger.log(&format!("Accept failed: {}.", e));
                                return Err(e);
                            }
                            break;
                        }
                    }
                }
                _ = self.state.notify.notified() => break,
            }

            if !self.state.accepting.load(Ordering::SeqCst) {
                break;
            }
        }

        Ok(())
    }
}

/// Wait for an interrupt: Ctrl-C everywhere, SIGTERM additionally on
/// unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Own one connection end-to-end: read, parse, respond, close, log.
/// Every failure in here stays in here; siblings and the accept loop
/// never see it.
async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    config: Arc<ServerConfig>,
    logger: Arc<Logger>,
) {
    logger.log(&format!("Connection from {}.", peer));

    // One bounded read; requests split across reads are not supported.
    let mut buf = vec![0u8; MAX_REQUEST_BYTES];
    let read = match stream.read(&mut buf).await {
        Ok(0) => {
            logger.log(&format!("{} closed before sending a request.", peer));
            return;
        }
        Ok(n) => n,
        Err(e) => {
            logger.log(&format!("Error reading from {}: {}.", peer, e));
            return;
        }
    };

    let request = match Request::parse(&buf[..read], peer) {
        Ok(request) => request,
        Err(e) => {
            // Dropped without a reply, matching the original behavior
            // for unparsable requests.
            logger.log(&format!("{} sent an invalid request: {}.", peer, e));
            return;
        }
    };

    logger.log(&format!(
        "{} \"{} {} {}\"",
        peer, request.method, request.uri, request.version
    ));
    log_request_details(&logger, &request);

    let response = responder::respond(&request, &config).await;
    let status = response.status;

    if let Err(e) = stream.write_all(&response.into_bytes()).await {
        logger.log(&format!("Error writing to {}: {}.", peer, e));
        return;
    }
    if let Err(e) = stream.flush().await {
        logger.log(&format!("Error flushing {}: {}.", peer, e));
        return;
    }

    if let Err(e) = stream.shutdown().await {
        logger.log(&format!("Problem stopping client socket {}: {}.", peer, e));
    }

    logger.log(&format!(
        "{} \"{} {}\" -> {}",
        peer, request.method, request.uri, status
    ));
}

fn log_request_details(logger: &Logger, request: &Request) {
    logger.debug(&format!("  host: {:?}", request.host));
    logger.debug(&format!("  accept: {:?}", request.accept));
    logger.debug(&format!("  accept-language: {:?}", request.accept_language));
    logger.debug(&format!("  accept-encoding: {:?}", request.accept_encoding));
    logger.debug(&format!("  connection: {:?}", request.connection));
    logger.debug(&format!("  content-type: {:?}", request.content_type));
    logger.debug(&format!("  content-length: {}", request.content_length));
    logger.debug(&format!(
        "  body: {} bytes",
        request.body.as_ref().map_or(0, Vec::len)
    ));
}
