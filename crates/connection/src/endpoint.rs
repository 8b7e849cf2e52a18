//! Connection target for the notice service.

use traybell_protocol::constants::{MACHINE_ID_PARAM, MACHINE_ID_VALUE_PREFIX, ORIGIN_PREFIX};

/// Immutable connection target: service URL plus machine identity.
///
/// Built once per manager; redials reuse the same endpoint.
#[derive(Debug, Clone)]
pub struct Endpoint {
    url: url::Url,
    machine_id: String,
}

impl Endpoint {
    /// Builds an endpoint from the configured base URL and machine id.
    ///
    /// The machine id is appended as the `uuid` query parameter,
    /// prefixed with the client scheme.
    pub fn new(base_url: &str, machine_id: &str) -> Result<Self, url::ParseError> {
        let mut url = url::Url::parse(base_url)?;
        url.query_pairs_mut().append_pair(
            MACHINE_ID_PARAM,
            &format!("{MACHINE_ID_VALUE_PREFIX}{machine_id}"),
        );
        Ok(Self {
            url,
            machine_id: machine_id.to_string(),
        })
    }

    /// Full connection URL including the identity parameter.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Origin header value sent with the WebSocket handshake.
    pub fn origin(&self) -> String {
        format!("{ORIGIN_PREFIX}{}", self.machine_id)
    }

    /// The machine id this endpoint was built with.
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_machine_id_parameter() {
        let ep = Endpoint::new("ws://notices.example.com/feed", "aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(
            ep.url(),
            "ws://notices.example.com/feed?uuid=traybell%3Aaa%3Abb%3Acc%3Add%3Aee%3Aff"
        );
    }

    #[test]
    fn preserves_existing_query() {
        let ep = Endpoint::new("wss://notices.example.com/feed?channel=ops", "0a0b0c0d0e0f").unwrap();
        assert_eq!(
            ep.url(),
            "wss://notices.example.com/feed?channel=ops&uuid=traybell%3A0a0b0c0d0e0f"
        );
    }

    #[test]
    fn origin_carries_machine_id() {
        let ep = Endpoint::new("ws://notices.example.com/feed", "0a0b0c0d0e0f").unwrap();
        assert_eq!(ep.origin(), "traybellApp:0a0b0c0d0e0f");
        assert_eq!(ep.machine_id(), "0a0b0c0d0e0f");
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(Endpoint::new("not a url", "0a0b0c0d0e0f").is_err());
    }
}
