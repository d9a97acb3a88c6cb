//! Server configuration read from environment variables.

use std::net::SocketAddr;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Gets the address the HTTP server listens on.
///
/// Reads `BIND_ADDRESS`; unset or unparsable values fall back to `0.0.0.0:8000`.
#[must_use]
pub fn get_bind_address() -> SocketAddr {
    std::env::var("BIND_ADDRESS")
        .ok()
        .and_then(|value| parse_bind_address(&value))
        .unwrap_or_else(default_bind_address)
}

fn parse_bind_address(value: &str) -> Option<SocketAddr> {
    value.trim().parse().ok()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(
            parse_bind_address(" 127.0.0.1:3000 "),
            Some(SocketAddr::from(([127, 0, 0, 1], 3000)))
        );
        assert_eq!(parse_bind_address("not an address"), None);
    }

    #[test]
    fn test_default_matches_documented_value() {
        assert_eq!(default_bind_address().to_string(), DEFAULT_BIND_ADDRESS);
    }
}
