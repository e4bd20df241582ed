//! Module `file_ops`
//!
//! Streams file contents and listings over an open data connection.
//! Any I/O failure, on the file or on the socket, surfaces as
//! `TransferError::Io`.

use log::info;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::TransferError;
use crate::transfer::modes::TransferType;

const BUFFER_SIZE: usize = 8192; // 8KB read chunks

/// Converts text to network line endings: every line ends in CRLF.
/// Existing CRLF pairs are kept as they are.
pub fn to_network_ascii(bytes: &[u8]) -> Vec<u8> {
    let mut converted = Vec::with_capacity(bytes.len() + bytes.len() / 32);
    convert_chunk(bytes, &mut None, &mut converted);
    converted
}

/// Appends `chunk` to `out` with bare LF turned into CRLF. `previous` holds
/// the last byte of the preceding chunk and is updated.
fn convert_chunk(chunk: &[u8], previous: &mut Option<u8>, out: &mut Vec<u8>) {
    for &byte in chunk {
        if byte == b'\n' && *previous != Some(b'\r') {
            out.push(b'\r');
        }
        out.push(byte);
        *previous = Some(byte);
    }
}

/// Streams `reader` to `writer` in chunks, converting line endings.
async fn copy_as_text<R, W>(reader: &mut R, writer: &mut W) -> io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut converted = Vec::with_capacity(BUFFER_SIZE * 2);
    let mut previous = None;
    let mut total_bytes_sent = 0u64;

    loop {
        let n = reader.read(&mut buffer).await?;
        if n == 0 {
            break;
        }

        converted.clear();
        convert_chunk(&buffer[..n], &mut previous, &mut converted);
        writer.write_all(&converted).await?;
        total_bytes_sent += converted.len() as u64;
    }

    Ok(total_bytes_sent)
}

/// Streams the file at `path` using `transfer_type`, then flushes.
///
/// Returns the number of bytes written to the data connection.
pub async fn send_file<W>(
    writer: &mut W,
    path: &Path,
    transfer_type: TransferType,
) -> Result<u64, TransferError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    info!("Starting file download: {} ({:?})", path.display(), transfer_type);

    let mut file = File::open(path).await?;
    let total_bytes_sent = match transfer_type {
        TransferType::Binary => tokio::io::copy(&mut file, writer).await?,
        TransferType::Text => copy_as_text(&mut file, writer).await?,
    };
    writer.flush().await?;

    info!(
        "File download completed successfully: {} ({} bytes)",
        path.display(),
        total_bytes_sent
    );

    Ok(total_bytes_sent)
}

/// Sends a rendered directory listing, then flushes.
pub async fn send_listing<W>(writer: &mut W, listing: &str) -> Result<u64, TransferError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(listing.as_bytes()).await?;
    writer.flush().await?;
    Ok(listing.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn bare_line_feeds_become_crlf() {
        assert_eq!(to_network_ascii(b"one\ntwo\n"), b"one\r\ntwo\r\n");
    }

    #[test]
    fn existing_crlf_is_untouched() {
        assert_eq!(to_network_ascii(b"one\r\ntwo"), b"one\r\ntwo");
        assert_eq!(to_network_ascii(b"mixed\r\nlines\n"), b"mixed\r\nlines\r\n");
    }

    #[test]
    fn text_without_newlines_is_unchanged() {
        assert_eq!(to_network_ascii(b"hello"), b"hello");
        assert_eq!(to_network_ascii(b""), b"");
    }

    #[test]
    fn crlf_split_across_chunks_is_kept() {
        let mut previous = None;
        let mut out = Vec::new();
        convert_chunk(b"one\r", &mut previous, &mut out);
        convert_chunk(b"\ntwo\n", &mut previous, &mut out);
        assert_eq!(out, b"one\r\ntwo\r\n");
    }

    #[tokio::test]
    async fn text_copy_converts_across_small_reads() {
        // Two reads: the CR ends the first, the LF starts the second.
        let mut reader = (&b"a\r"[..]).chain(&b"\nb\n"[..]);
        let mut out: Vec<u8> = Vec::new();
        let sent = copy_as_text(&mut reader, &mut out).await.unwrap();
        assert_eq!(out, b"a\r\nb\r\n");
        assert_eq!(sent, 6);
    }

    #[tokio::test]
    async fn large_files_are_streamed_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.bin");
        let bytes: Vec<u8> = (0..5 * BUFFER_SIZE + 123).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &bytes).unwrap();

        let mut out: Vec<u8> = Vec::new();
        let sent = send_file(&mut out, &path, TransferType::Binary).await.unwrap();
        assert_eq!(sent, bytes.len() as u64);
        assert_eq!(out, bytes);
    }

    #[tokio::test]
    async fn text_mode_handles_crlf_on_a_chunk_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boundary.txt");
        let mut contents = vec![b'a'; BUFFER_SIZE - 1];
        contents.extend_from_slice(b"\r\nnext\n");
        fs::write(&path, &contents).unwrap();

        let mut out: Vec<u8> = Vec::new();
        send_file(&mut out, &path, TransferType::Text).await.unwrap();

        let mut expected = vec![b'a'; BUFFER_SIZE - 1];
        expected.extend_from_slice(b"\r\nnext\r\n");
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn binary_mode_sends_bytes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        let bytes: Vec<u8> = vec![0, 10, 13, 10, 255, b'\n'];
        fs::write(&path, &bytes).unwrap();

        let mut out: Vec<u8> = Vec::new();
        let sent = send_file(&mut out, &path, TransferType::Binary).await.unwrap();
        assert_eq!(out, bytes);
        assert_eq!(sent, bytes.len() as u64);
    }

    #[tokio::test]
    async fn text_mode_converts_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"a\nb\n").unwrap();

        let mut out: Vec<u8> = Vec::new();
        let sent = send_file(&mut out, &path, TransferType::Text).await.unwrap();
        assert_eq!(out, b"a\r\nb\r\n");
        assert_eq!(sent, 6);
    }

    #[tokio::test]
    async fn unreadable_source_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out: Vec<u8> = Vec::new();
        let err = send_file(&mut out, &dir.path().join("gone"), TransferType::Binary)
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::Io(_)));
        assert!(out.is_empty());
    }
}
