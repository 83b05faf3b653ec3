//! JSON-lines tool server.
//!
//! Reads one request per line, runs each on its own task so a blocked
//! approval never stalls other calls, and funnels responses through a
//! single writer task.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use shellgate_core::CommandService;

use crate::dispatch::{dispatch, ToolOutput};

/// Incoming request line.
#[derive(Debug, Deserialize)]
pub struct ToolRequest {
    #[serde(default)]
    pub id: Value,
    pub tool: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Outgoing response line.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub id: Value,
    pub content: String,
    pub is_error: bool,
}

impl ToolResponse {
    fn new(id: Value, output: ToolOutput) -> Self {
        Self {
            id,
            content: output.content,
            is_error: output.is_error,
        }
    }
}

/// Serve requests from `reader` until EOF, writing responses to `writer`.
///
/// Returns once input is exhausted and every in-flight request has answered.
pub async fn serve<R, W>(service: Arc<CommandService>, reader: R, writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<ToolResponse>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(response) = rx.recv().await {
            let mut line = match serde_json::to_vec(&response) {
                Ok(line) => line,
                Err(e) => {
                    log::error!("Failed to encode response: {}", e);
                    continue;
                }
            };
            line.push(b'\n');
            writer.write_all(&line).await?;
            writer.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let request: ToolRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Malformed request: {}", e);
                let _ = tx.send(ToolResponse::new(
                    Value::Null,
                    ToolOutput::error(format!("Invalid request: {e}")),
                ));
                continue;
            }
        };

        let service = service.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let output = dispatch(&service, &request.tool, &request.arguments).await;
            let _ = tx.send(ToolResponse::new(request.id, output));
        });
    }

    // Writer finishes when the last in-flight request drops its sender.
    drop(tx);
    match writer_task.await {
        Ok(result) => result,
        Err(e) => Err(std::io::Error::other(e)),
    }
}
