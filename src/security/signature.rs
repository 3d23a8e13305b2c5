use crate::error::{BotError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verify a LINE webhook signature
///
/// The header carries base64(HMAC-SHA256(channel secret, raw body)).
/// A missing header, malformed base64, or mismatch are all rejected.
pub fn verify_signature(secret: &str, body: &[u8], header: Option<&str>) -> Result<()> {
    let header = header.map(str::trim).filter(|h| !h.is_empty()).ok_or_else(|| {
        warn!("Webhook request missing {} header", SIGNATURE_HEADER);
        BotError::InvalidSignature
    })?;

    let expected = STANDARD.decode(header).map_err(|e| {
        warn!("Webhook signature is not valid base64: {}", e);
        BotError::InvalidSignature
    })?;

    let mut mac = new_mac(secret)?;
    mac.update(body);

    // verify_slice compares in constant time
    mac.verify_slice(&expected).map_err(|_| {
        warn!("Webhook signature mismatch. Check LINE_CHANNEL_SECRET.");
        BotError::InvalidSignature
    })
}

/// Compute the signature LINE would send for `body`.
pub fn sign(secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = new_mac(secret)?;
    mac.update(body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

fn new_mac(secret: &str) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| BotError::Internal(format!("HMAC key error: {}", e)))
}
