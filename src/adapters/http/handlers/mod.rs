pub mod admin;
pub mod audit;
pub mod auth;
pub mod loans;

use actix_web::HttpRequest;
use std::net::{IpAddr, SocketAddr};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::domain::auth::value_objects::DeviceFingerprint;

/// Client address as reported by the proxy headers or the peer, without port
fn client_ip(req: &HttpRequest) -> String {
  let info = req.connection_info();
  let Some(addr) = info.realip_remote_addr() else {
    return String::new();
  };

  if let Ok(socket) = addr.parse::<SocketAddr>() {
    return socket.ip().to_string();
  }
  if let Ok(ip) = addr.parse::<IpAddr>() {
    return ip.to_string();
  }
  addr.to_string()
}

/// Device fingerprint derived from client IP and user agent
pub fn device_fingerprint(req: &HttpRequest) -> DeviceFingerprint {
  let user_agent = req
    .headers()
    .get("User-Agent")
    .and_then(|h| h.to_str().ok())
    .unwrap_or_default();

  DeviceFingerprint::derive(&client_ip(req), user_agent)
}

/// Cancellation scope of one request
///
/// The token is cancelled when the guard drops, i.e. when the handler
/// future finishes or is dropped because the client went away.
pub fn request_cancellation() -> (CancellationToken, DropGuard) {
  let token = CancellationToken::new();
  let guard = token.clone().drop_guard();
  (token, guard)
}
