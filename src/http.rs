//! HTTP transport on `tiny_http`.
//!
//! `tiny_http` parses request lines and headers on its own connection threads
//! and answers unparseable requests itself. Requests that parse are handed to
//! [`Service::handle`] one at a time, in arrival order.

use std::io::{self, Read};
use std::net::{SocketAddr, ToSocketAddrs};

use tiny_http::{Header, Request};

use crate::service::{Response, Service};

pub const DEFAULT_MAX_BODY: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("request body exceeds limit of {limit} bytes")]
    BodyTooLarge { limit: usize },
}

pub struct Server {
    inner: tiny_http::Server,
    service: Service,
    max_body: usize,
}

impl Server {
    pub fn bind<A: ToSocketAddrs>(addr: A, service: Service) -> io::Result<Self> {
        let inner = tiny_http::Server::http(addr).map_err(io::Error::other)?;
        Ok(Server {
            inner,
            service,
            max_body: DEFAULT_MAX_BODY,
        })
    }

    pub fn with_max_body(mut self, max_body: usize) -> Self {
        self.max_body = max_body;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner
            .server_addr()
            .to_ip()
            .ok_or_else(|| io::Error::other("server is not listening on an IP socket"))
    }

    /// Serve requests one at a time, forever.
    pub fn run(&self) {
        for request in self.inner.incoming_requests() {
            self.handle_request(request);
        }
    }

    fn handle_request(&self, mut request: Request) {
        let method = request.method().to_string();
        let path = request.url().to_owned();

        let response = match read_body(&mut request, self.max_body) {
            Ok(body) => self.service.handle(&method, &path, &body),
            Err(err) => {
                log::info!("rejecting {method} {path}: {err}");
                Response::bad_request()
            }
        };
        log::info!("{method} {path} -> {}", response.status);

        if let Err(err) = request.respond(into_reply(response)) {
            log::warn!("failed to answer {method} {path}: {err}");
        }
    }
}

/// Read the whole body, refusing anything over `limit` bytes whether or not
/// the client declared a length.
fn read_body(request: &mut Request, limit: usize) -> Result<String, HttpError> {
    if request.body_length().is_some_and(|length| length > limit) {
        return Err(HttpError::BodyTooLarge { limit });
    }
    let mut body = Vec::new();
    request
        .as_reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut body)?;
    if body.len() > limit {
        return Err(HttpError::BodyTooLarge { limit });
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn into_reply(response: Response) -> tiny_http::Response<io::Cursor<Vec<u8>>> {
    let mut reply =
        tiny_http::Response::from_data(response.body.into_bytes()).with_status_code(response.status);
    if let Ok(content_type) = Header::from_bytes("Content-Type", "application/json") {
        reply.add_header(content_type);
    }
    reply
}
