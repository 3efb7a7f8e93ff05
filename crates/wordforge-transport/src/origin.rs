//! Which browser origins may open a connection.
//!
//! Browsers attach an `Origin` header to every WebSocket handshake but do
//! not apply CORS to it, so the server has to check the header itself.
//! Clients that send no `Origin` at all are not browsers and are let
//! through; the check only keeps other web pages from driving the game on
//! a visitor's behalf.

/// Origin filter applied during the WebSocket handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Accept every origin.
    #[default]
    Any,
    /// Accept only this origin, e.g. `https://play.example.com`.
    Exact(String),
}

impl OriginPolicy {
    /// Builds a policy from an optional configured origin.
    ///
    /// `None`, an empty string and `*` all mean [`OriginPolicy::Any`].
    pub fn from_setting(origin: Option<&str>) -> Self {
        match origin.map(str::trim) {
            None | Some("") | Some("*") => Self::Any,
            Some(origin) => Self::Exact(origin.trim_end_matches('/').to_string()),
        }
    }

    /// Whether a handshake carrying `origin` should be accepted.
    pub fn permits(&self, origin: Option<&str>) -> bool {
        match (self, origin) {
            (Self::Any, _) | (_, None) => true,
            (Self::Exact(allowed), Some(origin)) => {
                allowed.eq_ignore_ascii_case(origin.trim_end_matches('/'))
            }
        }
    }
}
