//! Native-messaging framing: a 4-byte length in native byte order, then that many
//! bytes of UTF-8 JSON.

use std::io::ErrorKind;

use anyhow::{bail, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Browsers refuse host messages larger than 1 MiB.
pub const MAX_OUTBOUND_LEN: usize = 1024 * 1024;
pub const MAX_INBOUND_LEN: usize = 64 * 1024 * 1024;

/// Next frame payload, or `None` once the browser closed the stream.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err).context("failed to read frame length"),
    }

    let len = u32::from_ne_bytes(header) as usize;
    if len > MAX_INBOUND_LEN {
        bail!("inbound frame of {len} bytes exceeds {MAX_INBOUND_LEN}");
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .with_context(|| format!("failed to read {len}-byte frame"))?;
    Ok(Some(payload))
}

pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_OUTBOUND_LEN {
        bail!(
            "outbound frame of {} bytes exceeds {MAX_OUTBOUND_LEN}",
            payload.len()
        );
    }
    let len = u32::try_from(payload.len()).context("frame length overflows u32")?;
    writer.write_all(&len.to_ne_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await.context("failed to flush frame")
}

/// Serialize `message`, refusing payloads the browser would not accept.
pub fn encode_message<T: Serialize>(message: &T) -> Result<Vec<u8>> {
    let payload = serde_json::to_vec(message).context("failed to encode frame")?;
    if payload.len() > MAX_OUTBOUND_LEN {
        bail!(
            "outbound frame of {} bytes exceeds {MAX_OUTBOUND_LEN}",
            payload.len()
        );
    }
    Ok(payload)
}

pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = encode_message(message)?;
    write_frame(writer, &payload).await
}

pub fn decode_message<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).context("malformed frame JSON")
}
