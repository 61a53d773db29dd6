//! Photo capture
//!
//! Turns a picked or dropped image into a self-contained `data:` URL that
//! can be stored inline with a complaint. The size limit is checked before
//! any bytes are read or encoded.

use crate::config::MAX_PHOTO_BYTES;
use crate::error::{AppError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tokio::fs;

/// Read and encode a photo file from disk
pub async fn encode_photo_file(path: &Path) -> Result<String> {
    let size = fs::metadata(path).await?.len();
    check_size(size)?;

    let bytes = fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    tracing::debug!("Encoding photo {:?} ({} bytes)", path, size);
    Ok(to_data_url(&name, &bytes))
}

/// Encode a photo already held in memory (e.g. a drag-and-drop payload)
pub fn encode_photo_bytes(name: &str, bytes: &[u8]) -> Result<String> {
    check_size(bytes.len() as u64)?;
    Ok(to_data_url(name, bytes))
}

fn check_size(size: u64) -> Result<()> {
    if size > MAX_PHOTO_BYTES {
        tracing::info!("Rejected photo of {} bytes", size);
        return Err(AppError::PhotoTooLarge { size });
    }
    Ok(())
}

fn to_data_url(name: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_for(name), STANDARD.encode(bytes))
}

/// Mime type guessed from the file extension
pub fn mime_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// File extension matching a mime type from [`mime_for`]
pub fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        _ => "bin",
    }
}

/// Raw size in bytes of the payload inside a base64 `data:` URL, computed
/// from the encoded length without decoding
pub fn decoded_len(data_url: &str) -> Option<usize> {
    let (_, payload) = data_url.split_once(";base64,")?;
    if payload.len() % 4 != 0 {
        return None;
    }
    let padding = payload.bytes().rev().take_while(|&b| b == b'=').count();
    (payload.len() / 4 * 3).checked_sub(padding)
}

/// Split a base64 `data:` URL back into its mime type and raw bytes
pub fn decode_data_url(data_url: &str) -> Option<(&str, Vec<u8>)> {
    let rest = data_url.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    match STANDARD.decode(payload) {
        Ok(bytes) => Some((mime, bytes)),
        Err(e) => {
            tracing::warn!("Undecodable photo payload: {}", e);
            None
        }
    }
}
