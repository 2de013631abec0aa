//! HMAC-SHA256 webhook signatures.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{Error, Result};

pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";
pub const EVENT_TYPE_HEADER: &str = "X-Event-Type";

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str, payload: &[u8]) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::Config(format!("invalid webhook secret: {e}")))?;
    mac.update(payload);
    Ok(mac)
}

/// Lowercase hex HMAC-SHA256 of `payload` keyed with `secret`.
pub fn sign(secret: &str, payload: &[u8]) -> Result<String> {
    Ok(hex::encode(mac(secret, payload)?.finalize().into_bytes()))
}

/// Constant-time check of a hex signature over the raw request body.
pub fn verify(secret: &str, payload: &[u8], signature: &str) -> Result<()> {
    let expected = hex::decode(signature.trim()).map_err(|_| Error::InvalidSignature)?;
    mac(secret, payload)?
        .verify_slice(&expected)
        .map_err(|_| Error::InvalidSignature)
}

/// Verifies a delivery given a header lookup, returning the event name.
pub fn verify_request<'a>(
    secret: &str,
    payload: &[u8],
    header: impl Fn(&str) -> Option<&'a str>,
) -> Result<&'a str> {
    let signature = header(SIGNATURE_HEADER).ok_or(Error::InvalidSignature)?;
    verify(secret, payload, signature)?;
    header(EVENT_TYPE_HEADER)
        .ok_or_else(|| Error::invalid_request(format!("missing {EVENT_TYPE_HEADER} header")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_9hZ3kq";
    const BODY: &[u8] = br#"{"job_id": "j1", "status": "completed"}"#;

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        let sig = sign("Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_sign_then_verify() {
        let sig = sign(SECRET, BODY).unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verify(SECRET, BODY, &sig).is_ok());
        assert!(verify(SECRET, BODY, &sig.to_uppercase()).is_ok());
    }

    #[test]
    fn test_tampered_payload() {
        let sig = sign(SECRET, BODY).unwrap();
        let tampered = br#"{"job_id": "j2", "status": "completed"}"#;
        assert!(matches!(
            verify(SECRET, tampered, &sig),
            Err(Error::InvalidSignature)
        ));
        assert!(verify("other", BODY, &sig).is_err());
        assert!(verify(SECRET, BODY, "not-hex").is_err());
        assert!(verify(SECRET, BODY, "").is_err());
    }

    #[test]
    fn test_verify_request_headers() {
        let sig = sign(SECRET, BODY).unwrap();
        let headers = [
            (SIGNATURE_HEADER, sig.as_str()),
            (EVENT_TYPE_HEADER, "tryon.completed"),
        ];
        let lookup = |name: &str| {
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| *v)
        };
        assert_eq!(verify_request(SECRET, BODY, lookup).unwrap(), "tryon.completed");

        let unsigned = |_: &str| None;
        assert!(matches!(
            verify_request(SECRET, BODY, unsigned),
            Err(Error::InvalidSignature)
        ));
    }
}
