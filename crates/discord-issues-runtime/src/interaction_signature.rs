//! Ed25519 verification of Discord interaction requests.

use anyhow::{anyhow, Context, Result};
use ed25519_dalek::{Signature, VerifyingKey};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    verifying_key: VerifyingKey,
}

impl InteractionVerifier {
    /// Build a verifier from the application's hex-encoded public key.
    pub fn from_hex(public_key_hex: &str) -> Result<Self> {
        let public_key_bytes = decode_hex_fixed::<32>("public key", public_key_hex)?;
        let verifying_key = VerifyingKey::from_bytes(&public_key_bytes)
            .context("failed to decode ed25519 public key bytes")?;
        Ok(Self { verifying_key })
    }

    pub fn from_key(verifying_key: VerifyingKey) -> Self {
        Self { verifying_key }
    }

    /// Verify `signature` over `timestamp || body`.
    pub fn verify(&self, signature_hex: &str, timestamp: &str, body: &[u8]) -> Result<()> {
        let signature_bytes = decode_hex_fixed::<64>("signature", signature_hex)?;
        let signature = Signature::from_bytes(&signature_bytes);
        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);
        self.verifying_key
            .verify_strict(&message, &signature)
            .map_err(|error| anyhow!("invalid interaction signature: {error}"))
    }
}

fn decode_hex_fixed<const N: usize>(label: &str, raw: &str) -> Result<[u8; N]> {
    let decoded =
        hex::decode(raw.trim()).with_context(|| format!("failed to decode hex {label}"))?;
    let decoded_len = decoded.len();
    decoded
        .try_into()
        .map_err(|_| anyhow!("{label} decoded to {decoded_len} bytes (expected {N})"))
}
