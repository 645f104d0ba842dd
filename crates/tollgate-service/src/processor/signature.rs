//! Webhook signature verification.
//!
//! The processor signs each delivery with HMAC-SHA256 over
//! `"{timestamp}.{payload}"` using a shared secret, and sends the result in
//! a header of the form `t=<timestamp>,v1=<hex>[,v1=<hex>...]`.

/// Errors that can occur verifying a webhook signature.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The signature header could not be parsed.
    #[error("malformed signature header")]
    Malformed,

    /// No candidate signature matched the payload.
    #[error("signature mismatch")]
    Mismatch,
}

/// Verify a webhook payload against its signature header.
///
/// # Errors
///
/// Returns [`SignatureError::Malformed`] when the header lacks a timestamp
/// or any `v1` signature, and [`SignatureError::Mismatch`] when none of the
/// candidate signatures match.
pub fn verify(secret: &str, payload: &str, signature_header: &str) -> Result<(), SignatureError> {
    // Header format: t=timestamp,v1=signature,v1=signature2,...
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        let mut kv = part.splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(ts)) => timestamp = Some(ts),
            (Some("v1"), Some(sig)) => signatures.push(sig),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;

    if signatures.is_empty() {
        return Err(SignatureError::Malformed);
    }

    let signed_payload = format!("{timestamp}.{payload}");
    let expected = compute_hmac_sha256(secret, &signed_payload);

    // Check if any signature matches (constant-time comparison)
    let valid = signatures.iter().any(|sig| constant_time_eq(&expected, sig));

    if valid {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Build a signature header for a payload.
///
/// Counterpart of [`verify`]; used when replaying deliveries against a
/// local service.
#[must_use]
pub fn signature_header(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed_payload = format!("{timestamp}.{payload}");
    let signature = compute_hmac_sha256(secret, &signed_payload);
    format!("t={timestamp},v1={signature}")
}

/// HMAC block size for SHA256 is 64 bytes.
const HMAC_BLOCK_SIZE: usize = 64;

/// Compute HMAC-SHA256 and return hex-encoded result.
fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use sha2::{Digest, Sha256};

    let key = secret.as_bytes();
    let message = message.as_bytes();

    // If key is longer than block size, hash it first
    let key = if key.len() > HMAC_BLOCK_SIZE {
        let mut hasher = Sha256::new();
        hasher.update(key);
        hasher.finalize().to_vec()
    } else {
        key.to_vec()
    };

    // Pad key to block size
    let mut key_padded = [0u8; HMAC_BLOCK_SIZE];
    key_padded[..key.len()].copy_from_slice(&key);

    // Create inner and outer padded keys
    let mut i_key_pad = [0x36u8; HMAC_BLOCK_SIZE];
    let mut o_key_pad = [0x5cu8; HMAC_BLOCK_SIZE];

    for i in 0..HMAC_BLOCK_SIZE {
        i_key_pad[i] ^= key_padded[i];
        o_key_pad[i] ^= key_padded[i];
    }

    // Inner hash: H(i_key_pad || message)
    let mut inner_hasher = Sha256::new();
    inner_hasher.update(i_key_pad);
    inner_hasher.update(message);
    let inner_hash = inner_hasher.finalize();

    // Outer hash: H(o_key_pad || inner_hash)
    let mut outer_hasher = Sha256::new();
    outer_hasher.update(o_key_pad);
    outer_hasher.update(inner_hash);
    let hmac = outer_hasher.finalize();

    hex::encode(hmac)
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
