//! Strictly sequential JSON-RPC connection to the language server.
//!
//! The checker validates one document at a time, so no background reader
//! task exists: each request reads inbound messages until its response
//! arrives, answering server-initiated requests along the way so the server
//! never blocks waiting for an interactive client.

use std::process::Stdio;

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::ServiceError;
use crate::transport::{read_message, write_message};

type BoxReader = Box<dyn AsyncBufRead + Unpin + Send>;
type BoxWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// A JSON-RPC connection driven request-by-request.
pub struct LspConnection {
    reader: BoxReader,
    writer: BoxWriter,
    next_id: u64,
    workspace_folders: Vec<Value>,
    // Held so the server is killed if the connection is dropped before a
    // clean shutdown.
    _child: Option<Child>,
}

impl LspConnection {
    /// Spawns a language-server process and connects to its stdio.
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, ServiceError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ServiceError::config(format!("Failed to start language server '{program}': {e}"))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ServiceError::protocol("failed to open language server stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ServiceError::protocol("failed to open language server stdout"))?;

        debug!("Spawned language server: {program}");
        Ok(Self {
            reader: Box::new(BufReader::new(stdout)),
            writer: Box::new(stdin),
            next_id: 1,
            workspace_folders: Vec::new(),
            _child: Some(child),
        })
    }

    /// Connects over arbitrary async I/O. Tests use an in-memory duplex.
    pub fn from_io<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
            next_id: 1,
            workspace_folders: Vec::new(),
            _child: None,
        }
    }

    /// Folders reported back on `workspace/workspaceFolders` requests.
    pub fn set_workspace_folders(&mut self, folders: Vec<Value>) {
        self.workspace_folders = folders;
    }

    /// Sends a notification.
    pub async fn notify(&mut self, method: &str, params: Value) -> Result<(), ServiceError> {
        let message = json!({ "jsonrpc": "2.0", "method": method, "params": params });
        write_message(&mut self.writer, &message).await
    }

    /// Sends a request and waits for the matching response.
    pub async fn request(&mut self, method: &str, params: Value) -> Result<Value, ServiceError> {
        let id = self.next_id;
        self.next_id += 1;

        let message =
            json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        write_message(&mut self.writer, &message).await?;
        self.wait_for_response(id).await
    }

    async fn wait_for_response(&mut self, request_id: u64) -> Result<Value, ServiceError> {
        loop {
            let Some(message) = read_message(&mut self.reader).await? else {
                return Err(ServiceError::Disconnected);
            };

            let is_response = message.get("method").is_none();
            if is_response && message.get("id").and_then(Value::as_u64) == Some(request_id) {
                if let Some(error) = message.get("error") {
                    let text = error
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error");
                    return Err(ServiceError::protocol(format!("server error: {text}")));
                }
                return Ok(message.get("result").cloned().unwrap_or(Value::Null));
            }

            if message.get("method").is_some() && message.get("id").is_some() {
                self.answer_server_request(&message).await?;
            } else if let Some(method) = message.get("method").and_then(Value::as_str) {
                debug!("Ignoring server notification {method}");
            } else {
                warn!("Dropping unexpected server message");
            }
        }
    }

    /// Answers common server->client requests with safe defaults.
    async fn answer_server_request(&mut self, message: &Value) -> Result<(), ServiceError> {
        let Some(id) = message.get("id").cloned() else {
            return Ok(());
        };
        let method = message.get("method").and_then(Value::as_str).unwrap_or("");

        let result = match method {
            "workspace/configuration" => {
                let items = message
                    .pointer("/params/items")
                    .and_then(Value::as_array)
                    .map(|items| items.len())
                    .unwrap_or(0);
                Value::Array(vec![Value::Null; items])
            }
            "workspace/workspaceFolders" => Value::Array(self.workspace_folders.clone()),
            _ => Value::Null,
        };

        debug!("Answering server request {method}");
        let response = json!({ "jsonrpc": "2.0", "id": id, "result": result });
        write_message(&mut self.writer, &response).await
    }
}
