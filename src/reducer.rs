// src/reducer.rs
//
// Turns the raw response byte stream into transcript updates. Tolerant of
// arbitrary chunk boundaries from the transport: bytes accumulate in a
// carry-over buffer and only complete lines are processed, so a multi-byte
// character split across delivered chunks stays intact.

use crate::protocol::{strip_data_prefix, Frame, DONE_MARKER};
use crate::store::MessageStore;
use bytes::Bytes;
use futures::{Stream, StreamExt};

/// One transcript mutation produced by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreUpdate {
    Chunk { agent: String, text: String },
    Full { agent: String, text: String },
    Done,
}

/// How a turn's reduction ended. Every variant ends the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The `[DONE]` marker was seen.
    Done,
    /// The stream closed without a marker.
    StreamClosed,
    /// The transport failed mid-stream.
    TransportError,
}

/// Incremental frame decoder over delivered byte chunks.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    carry: Vec<u8>,
    done: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the termination marker has been seen; all further input is
    /// ignored.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feeds one delivered byte chunk and returns the updates decoded from
    /// the complete lines it closed. An update sequence ending in
    /// [`StoreUpdate::Done`] means the turn is over and the remainder of the
    /// buffer was discarded.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StoreUpdate> {
        let mut updates = Vec::new();
        if self.done {
            return updates;
        }

        self.carry.extend_from_slice(bytes);

        while let Some(pos) = self.carry.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.carry.drain(..=pos).collect();
            let line = &line[..line.len() - 1];

            match std::str::from_utf8(line) {
                Ok(text) => {
                    self.decode_line(text, &mut updates);
                    if self.done {
                        self.carry.clear();
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("Skipping undecodable stream line: {}", e);
                }
            }
        }

        updates
    }

    fn decode_line(&mut self, line: &str, updates: &mut Vec<StoreUpdate>) {
        let payload = match strip_data_prefix(line) {
            Some(payload) => payload,
            None => return,
        };

        if payload == DONE_MARKER {
            self.done = true;
            updates.push(StoreUpdate::Done);
            return;
        }

        if payload.is_empty() {
            return;
        }

        match Frame::parse(payload) {
            Ok(Some(Frame::Chunk { agent, text })) => {
                updates.push(StoreUpdate::Chunk { agent, text });
            }
            Ok(Some(Frame::Full { agent, text })) => {
                updates.push(StoreUpdate::Full { agent, text });
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Malformed frame payload ({}): {:?}", e, payload);
            }
        }
    }
}

/// Applies one update to a store snapshot. `Done` carries no payload and
/// leaves the transcript as-is.
pub fn apply_update(store: &MessageStore, update: &StoreUpdate) -> MessageStore {
    match update {
        StoreUpdate::Chunk { agent, text } => store.with_chunk(agent, text),
        StoreUpdate::Full { agent, text } => store.with_full(agent, text),
        StoreUpdate::Done => store.clone(),
    }
}

/// Folds an entire byte stream into a store snapshot. Reading stops at the
/// termination marker even if the transport has more to deliver; the stream
/// is dropped on return, releasing the connection on every exit path.
pub async fn reduce_stream<S, E>(stream: S, store: MessageStore) -> (MessageStore, TurnOutcome)
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    futures::pin_mut!(stream);
    let mut decoder = FrameDecoder::new();
    let mut store = store;

    while let Some(delivered) = stream.next().await {
        match delivered {
            Ok(bytes) => {
                for update in decoder.feed(&bytes) {
                    if update == StoreUpdate::Done {
                        return (store, TurnOutcome::Done);
                    }
                    store = apply_update(&store, &update);
                }
            }
            Err(e) => {
                log::error!("Transport failure mid-stream: {}", e);
                return (store, TurnOutcome::TransportError);
            }
        }
    }

    (store, TurnOutcome::StreamClosed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::convert::Infallible;

    fn ok_chunks(parts: &[&[u8]]) -> Vec<Result<Bytes, Infallible>> {
        parts
            .iter()
            .map(|p| Ok(Bytes::copy_from_slice(p)))
            .collect()
    }

    async fn reduce(parts: &[&[u8]]) -> (MessageStore, TurnOutcome) {
        reduce_stream(stream::iter(ok_chunks(parts)), MessageStore::new()).await
    }

    #[tokio::test]
    async fn test_single_agent_chunks_concatenate() {
        let (store, outcome) = reduce(&[
            b"data: {\"type\":\"chunk\",\"agent\":\"A\",\"chunk\":\"Hel\"}\n",
            b"data: {\"type\":\"chunk\",\"agent\":\"A\",\"chunk\":\"lo\"}\n",
            b"data: [DONE]\n",
        ])
        .await;
        assert_eq!(outcome, TurnOutcome::Done);
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].agent, "A");
        assert_eq!(store.messages()[0].text, "Hello");
    }

    #[tokio::test]
    async fn test_agent_switch_starts_new_message() {
        let (store, _) = reduce(&[
            b"data: {\"type\":\"chunk\",\"agent\":\"S1\",\"chunk\":\"one\"}\n",
            b"data: {\"type\":\"chunk\",\"agent\":\"S2\",\"chunk\":\"two\"}\n",
            b"data: [DONE]\n",
        ])
        .await;
        assert_eq!(store.messages().len(), 2);
        assert_eq!(store.messages()[0].agent, "S1");
        assert_eq!(store.messages()[0].text, "one");
        assert_eq!(store.messages()[1].agent, "S2");
    }

    #[tokio::test]
    async fn test_legacy_frames_never_merge() {
        let (store, outcome) = reduce(&[
            b"data: {\"agent\":\"A\",\"message\":\"Hi\"}\n",
            b"data: {\"agent\":\"A\",\"message\":\"There\"}\n",
        ])
        .await;
        assert_eq!(outcome, TurnOutcome::StreamClosed);
        assert_eq!(store.messages().len(), 2);
        assert_eq!(store.messages()[0].text, "Hi");
        assert_eq!(store.messages()[1].text, "There");
    }

    #[tokio::test]
    async fn test_done_stops_processing_within_one_buffer() {
        let (store, outcome) = reduce(&[
            b"data: [DONE]\ndata: {\"type\":\"chunk\",\"agent\":\"A\",\"chunk\":\"late\"}\n",
        ])
        .await;
        assert_eq!(outcome, TurnOutcome::Done);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_skipped_without_aborting() {
        let (store, _) = reduce(&[
            b"data: not-json\n",
            b"data: {\"type\":\"chunk\",\"agent\":\"A\",\"chunk\":\"ok\"}\n",
            b"data: [DONE]\n",
        ])
        .await;
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].text, "ok");
    }

    #[tokio::test]
    async fn test_multibyte_character_split_across_chunks() {
        let line = "data: {\"type\":\"chunk\",\"agent\":\"A\",\"chunk\":\"こんにちは\"}\n";
        let bytes = line.as_bytes();
        // Cut inside the first multi-byte character of the chunk text.
        let cut = line.find("こんにちは").unwrap() + 1;
        let (store, _) = reduce(&[&bytes[..cut], &bytes[cut..], b"data: [DONE]\n"]).await;
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].text, "こんにちは");
    }

    #[tokio::test]
    async fn test_line_split_across_chunks_carries_over() {
        let (store, _) = reduce(&[
            b"data: {\"type\":\"chunk\",\"agent\":",
            b"\"A\",\"chunk\":\"joined\"}\ndata: [DONE]\n",
        ])
        .await;
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].text, "joined");
    }

    #[tokio::test]
    async fn test_non_data_lines_and_empty_payloads_ignored() {
        let (store, outcome) = reduce(&[
            b": keepalive\n\ndata: \nevent: ping\n",
            b"data: {\"agent\":\"A\",\"message\":\"Hi\"}\n",
        ])
        .await;
        assert_eq!(outcome, TurnOutcome::StreamClosed);
        assert_eq!(store.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_shape_silently_skipped() {
        let (store, _) = reduce(&[
            b"data: {\"unrelated\":true}\n",
            b"data: {\"agent\":\"A\",\"message\":\"Hi\"}\n",
            b"data: [DONE]\n",
        ])
        .await;
        assert_eq!(store.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_ends_turn_with_partial_store() {
        let items: Vec<Result<Bytes, String>> = vec![
            Ok(Bytes::from_static(
                b"data: {\"type\":\"chunk\",\"agent\":\"A\",\"chunk\":\"partial\"}\n",
            )),
            Err("connection reset".to_string()),
        ];
        let (store, outcome) = reduce_stream(stream::iter(items), MessageStore::new()).await;
        assert_eq!(outcome, TurnOutcome::TransportError);
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].text, "partial");
    }

    #[test]
    fn test_decoder_ignores_input_after_done() {
        let mut decoder = FrameDecoder::new();
        let updates = decoder.feed(b"data: [DONE]\n");
        assert_eq!(updates, vec![StoreUpdate::Done]);
        assert!(decoder.is_done());
        let later = decoder.feed(b"data: {\"agent\":\"A\",\"message\":\"Hi\"}\n");
        assert!(later.is_empty());
    }

    #[test]
    fn test_incomplete_line_not_processed_until_newline() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder
            .feed(b"data: {\"agent\":\"A\",\"message\":\"Hi\"}")
            .is_empty());
        let updates = decoder.feed(b"\n");
        assert_eq!(
            updates,
            vec![StoreUpdate::Full {
                agent: "A".to_string(),
                text: "Hi".to_string(),
            }]
        );
    }
}
