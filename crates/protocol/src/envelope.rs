use serde::Deserialize;
use tracing::debug;

/// A decoded notice pushed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// User-visible message text.
    pub message: String,
}

/// Inbound envelope. Only documents carrying `noticeData` are acted on.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "noticeData")]
    notice_data: Option<NoticeData>,
}

/// Payload of a notice envelope. Unknown fields are tolerated.
#[derive(Debug, Deserialize)]
struct NoticeData {
    /// An absent `message` decodes as an empty string.
    #[serde(default)]
    message: String,
}

/// Decodes a raw text frame into a notice.
///
/// Returns `None` for malformed JSON and for well-formed documents that
/// carry no notice envelope. Neither case is an error upstream; the
/// stream carries traffic this client does not recognize.
pub fn decode_notice(raw: &str) -> Option<Notice> {
    let envelope: Envelope = match serde_json::from_str(raw) {
        Ok(e) => e,
        Err(e) => {
            debug!("dropping unparseable frame: {e}");
            return None;
        }
    };

    let data = envelope.notice_data?;
    Some(Notice {
        message: data.message,
    })
}
