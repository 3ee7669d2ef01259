// src/protocol.rs
//
// Wire model for the discussion stream: `data: `-prefixed lines carrying
// either a JSON frame or the `[DONE]` sentinel.

use serde_json::Value;

/// Prefix of every meaningful stream line.
pub const DATA_PREFIX: &str = "data: ";

/// Sentinel payload that ends the current turn.
pub const DONE_MARKER: &str = "[DONE]";

/// One decoded frame of the inbound protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Incremental piece of one agent's utterance.
    /// Wire shape: `{"type":"chunk","agent":A,"chunk":T}`.
    Chunk { agent: String, text: String },
    /// Complete utterance, from the older protocol variant without a `type`
    /// discriminator. Wire shape: `{"agent":A,"message":T}`.
    Full { agent: String, text: String },
}

impl Frame {
    /// Parses a stripped line payload. A JSON decode failure is the error;
    /// valid JSON matching neither known shape is `Ok(None)` and should be
    /// skipped silently.
    pub fn parse(payload: &str) -> Result<Option<Frame>, serde_json::Error> {
        let value: Value = serde_json::from_str(payload)?;

        if value["type"] == "chunk" {
            if let (Some(agent), Some(text)) = (value["agent"].as_str(), value["chunk"].as_str()) {
                return Ok(Some(Frame::Chunk {
                    agent: agent.to_string(),
                    text: text.to_string(),
                }));
            }
            return Ok(None);
        }

        if let (Some(agent), Some(text)) = (value["agent"].as_str(), value["message"].as_str()) {
            return Ok(Some(Frame::Full {
                agent: agent.to_string(),
                text: text.to_string(),
            }));
        }

        Ok(None)
    }
}

/// Strips the `data: ` prefix and trims the payload. Lines without the
/// prefix (comments, keepalives) map to `None`.
pub fn strip_data_prefix(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX).map(str::trim)
}
