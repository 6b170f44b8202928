//! Length-prefixed framing: a 2-byte big-endian length header followed by
//! exactly that many bytes of ISO 8583 message.

use crate::error::{Iso8583Error, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Default ceiling on a single frame's body length, in bytes.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024;

/// Read one length-prefixed frame from `reader`.
///
/// Terminates the connection (returns [`Iso8583Error::TransportClosed`]) on
/// EOF, a short read, or a length exceeding `max_frame_bytes`.
pub async fn read_frame<R>(reader: &mut R, max_frame_bytes: usize) -> Result<Vec<u8>>
where
    R: AsyncReadExt + Unpin,
{
    let mut header = [0u8; 2];
    reader
        .read_exact(&mut header)
        .await
        .map_err(|e| Iso8583Error::TransportClosed(e.to_string()))?;

    let len = u16::from_be_bytes(header) as usize;
    if len > max_frame_bytes {
        return Err(Iso8583Error::TransportClosed(format!(
            "frame length {len} exceeds ceiling {max_frame_bytes}"
        )));
    }

    let mut body = vec![0u8; len];
    reader
        .read_exact(&mut body)
        .await
        .map_err(|e| Iso8583Error::TransportClosed(e.to_string()))?;

    Ok(body)
}

/// Write one length-prefixed frame to `writer`.
pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    let len: u16 = body
        .len()
        .try_into()
        .map_err(|_| Iso8583Error::TransportClosed("message exceeds u16 frame length".to_string()))?;

    let mut out = Vec::with_capacity(2 + body.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(body);

    writer
        .write_all(&out)
        .await
        .map_err(|e| Iso8583Error::TransportClosed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let mut buf = Vec::new();
        write_frame(&mut buf, b"hello").await.unwrap();

        let mut cursor = Cursor::new(buf);
        let body = read_frame(&mut cursor, DEFAULT_MAX_FRAME_BYTES).await.unwrap();
        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn test_read_rejects_oversized_frame() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &vec![0u8; 100]).await.unwrap();

        let mut cursor = Cursor::new(buf);
        let err = read_frame(&mut cursor, 10).await.unwrap_err();
        assert!(matches!(err, Iso8583Error::TransportClosed(_)));
    }

    #[tokio::test]
    async fn test_read_on_empty_stream_is_transport_closed() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let err = read_frame(&mut cursor, DEFAULT_MAX_FRAME_BYTES).await.unwrap_err();
        assert!(matches!(err, Iso8583Error::TransportClosed(_)));
    }
}
