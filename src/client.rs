// src/client.rs
//
// One streaming request per turn against the discussion endpoint.

use crate::app::App;
use crate::errors::{ColloquyError, ColloquyResult};
use crate::reducer::{apply_update, FrameDecoder, StoreUpdate, TurnOutcome};
use futures::StreamExt;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Opens the streaming discussion request. The payload is the submitted
/// question; the response body is the `data: `-line protocol consumed by the
/// reducer.
pub async fn open_discussion_stream(
    client: &Client,
    endpoint: &str,
    question: &str,
) -> ColloquyResult<reqwest::Response> {
    let response = client
        .post(endpoint)
        .json(&json!({ "message": question }))
        .send()
        .await
        .map_err(|e| ColloquyError::transport_error(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ColloquyError::transport_error(format!(
            "Endpoint returned error status: {}",
            status
        )));
    }

    Ok(response)
}

/// Runs one discussion turn against the shared app state: opens the stream,
/// folds decoded frames into the transcript (one lock per update so the UI
/// can redraw between them), and clears the in-progress flag on every exit
/// path. Errors are logged and shown in the log panel, never rendered as
/// chat messages.
pub async fn run_discussion_turn(app: Arc<Mutex<App>>, endpoint: String, question: String) {
    let client = Client::new();

    let response = match open_discussion_stream(&client, &endpoint, &question).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Failed to open discussion stream: {}", e);
            let mut guard = app.lock().await;
            guard.logs.add(format!("リクエスト失敗: {}", e));
            guard.end_turn();
            return;
        }
    };

    {
        let mut guard = app.lock().await;
        guard.logs.add("ストリーム受信を開始");
    }

    let mut stream = response.bytes_stream();
    let mut decoder = FrameDecoder::new();

    let outcome = 'turn: loop {
        match stream.next().await {
            Some(Ok(bytes)) => {
                for update in decoder.feed(&bytes) {
                    if update == StoreUpdate::Done {
                        break 'turn TurnOutcome::Done;
                    }
                    let mut guard = app.lock().await;
                    let next = apply_update(&guard.store, &update);
                    guard.store = next;
                }
            }
            Some(Err(e)) => {
                log::error!("Transport failure mid-stream: {}", e);
                break 'turn TurnOutcome::TransportError;
            }
            None => break 'turn TurnOutcome::StreamClosed,
        }
    };

    // Dropping the stream releases the connection, including when the
    // termination marker arrived before the body was fully read.
    drop(stream);

    let mut guard = app.lock().await;
    match outcome {
        TurnOutcome::Done => guard.logs.add("ディスカッション終了"),
        TurnOutcome::StreamClosed => guard.logs.add("ストリームが終了マーカーなしで閉じました"),
        TurnOutcome::TransportError => guard.logs.add("通信エラーでターンを終了"),
    }
    guard.end_turn();
}
