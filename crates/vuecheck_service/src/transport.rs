//! JSON-RPC stdio framing.
//!
//! Messages are JSON values framed by HTTP-like headers:
//!
//! ```text
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes of UTF-8 JSON>
//! ```

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::ServiceError;

/// Writes a single framed JSON-RPC message.
pub async fn write_message<W>(writer: &mut W, value: &Value) -> Result<(), ServiceError>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(value)?;
    let header = format!("Content-Length: {}\r\n\r\n", body.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads a single framed JSON-RPC message.
///
/// Returns `Ok(None)` on clean EOF before any header byte.
pub async fn read_message<R>(reader: &mut R) -> Result<Option<Value>, ServiceError>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length: Option<usize> = None;
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }

        // Header names are case-insensitive in practice.
        if let Some((name, rest)) = trimmed.split_once(':')
            && name.trim().eq_ignore_ascii_case("Content-Length")
        {
            content_length = rest.trim().parse::<usize>().ok();
        }
    }

    let len =
        content_length.ok_or_else(|| ServiceError::protocol("missing Content-Length header"))?;

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;

    Ok(Some(serde_json::from_slice(&body)?))
}
