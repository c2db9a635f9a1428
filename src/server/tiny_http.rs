//! `tiny_http` liveness listener
//!
//! Keeps a port open for health probes. It carries no application routes.

use std::fmt;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, info};
use tiny_http::{Header, Method, Request, Response, Server};

use crate::error::AgentError;

/// Liveness listener bound to an address, not yet serving
pub struct LivenessServer {
    server: Arc<Server>,
}

impl LivenessServer {
    /// Bind to `addr`; failure is fatal to startup
    pub fn bind(addr: &str) -> Result<Self, AgentError> {
        let server = Server::http(addr)
            .map_err(|e| AgentError::Liveness(format!("failed to bind {addr}: {e}")))?;
        Ok(Self {
            server: Arc::new(server),
        })
    }

    /// Address actually bound (resolves port 0)
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve requests on a background thread
    #[must_use]
    pub fn spawn(self) -> LivenessHandle {
        if let Some(addr) = self.local_addr() {
            info!("Liveness listener on http://{addr}/healthz");
        }
        let server = Arc::clone(&self.server);
        let thread = thread::spawn(move || serve(&server));
        LivenessHandle {
            server: self.server,
            thread: Some(thread),
        }
    }
}

impl fmt::Debug for LivenessServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivenessServer").field("addr", &self.local_addr()).finish()
    }
}

/// Running liveness listener
pub struct LivenessHandle {
    server: Arc<Server>,
    thread: Option<JoinHandle<()>>,
}

impl LivenessHandle {
    /// Stop accepting requests and join the serving thread
    pub fn stop(mut self) {
        self.server.unblock();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                debug!("Liveness thread panicked");
            }
        }
    }
}

impl fmt::Debug for LivenessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivenessHandle")
            .field("addr", &self.server.server_addr().to_ip())
            .finish_non_exhaustive()
    }
}

fn serve(server: &Server) {
    for request in server.incoming_requests() {
        let response = handle_request(&request);
        if let Err(e) = request.respond(response) {
            debug!("Failed to answer liveness probe: {e}");
        }
    }
}

/// Status and body for a request line
#[must_use]
pub fn route(method: &Method, url: &str) -> (u16, &'static str) {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (&Method::Get | &Method::Head, "/" | "/healthz") => (200, "ok"),
        _ => (404, "Not Found"),
    }
}

fn handle_request(request: &Request) -> Response<Cursor<Vec<u8>>> {
    let (status, body) = route(request.method(), request.url());
    let response = Response::from_data(body.as_bytes().to_vec()).with_status_code(status);
    match Header::from_bytes("Content-Type", "text/plain; charset=utf-8") {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}
