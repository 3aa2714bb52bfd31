use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

struct RingKey {
    kid: String,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Signed token codec (HS256) with an ordered verification key ring.
///
/// Tokens are always signed with the newest key; the header carries a key
/// id so verification can go straight to the right key. Older keys stay in
/// the ring so in-flight tokens survive a key rotation. Mismatched
/// signatures fall through to the remaining keys, newest first.
pub struct TokenCodec {
    keys: Vec<RingKey>,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec from signing secrets ordered newest first.
    ///
    /// # Panics
    /// Panics if `secrets` is empty; a process without a signing key
    /// cannot start.
    ///
    /// # Security Notes
    /// - Secrets should be at least 256 bits (32 bytes) for HS256
    /// - Load them from configuration at startup, never hardcode
    pub fn new<S: AsRef<[u8]>>(secrets: &[S]) -> Self {
        assert!(!secrets.is_empty(), "token codec needs at least one key");

        let keys = secrets
            .iter()
            .enumerate()
            .map(|(i, secret)| RingKey {
                kid: format!("k{i}"),
                encoding: EncodingKey::from_secret(secret.as_ref()),
                decoding: DecodingKey::from_secret(secret.as_ref()),
            })
            .collect();

        Self {
            keys,
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign claims into a compact token string.
    ///
    /// The signature covers the full payload, purpose and expiry included.
    ///
    /// # Errors
    /// * `SigningFailed` - Serialization or signing failed
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        let newest = &self.keys[0];
        let mut header = Header::new(self.algorithm);
        header.kid = Some(newest.kid.clone());

        encode(&header, claims, &newest.encoding)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify and decode a token string.
    ///
    /// Expiry is enforced here with zero leeway. Purpose is returned to the
    /// caller, not enforced: each consumption site checks it against the
    /// operation being performed.
    ///
    /// # Errors
    /// * `Malformed` - Cannot parse, or no ring key verifies the signature
    /// * `Expired` - Signature is valid but the token is past its expiry
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|e| TokenError::Malformed(e.to_string()))?;

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        // Try the key named in the header first, then the rest of the ring
        let named = header.kid.as_deref();
        let ordered = self
            .keys
            .iter()
            .filter(|k| Some(k.kid.as_str()) == named)
            .chain(self.keys.iter().filter(|k| Some(k.kid.as_str()) != named));

        for key in ordered {
            match decode::<Claims>(token, &key.decoding, &validation) {
                Ok(data) => return Ok(data.claims),
                Err(e) => match e.kind() {
                    // Signature checked out; the token is simply old
                    ErrorKind::ExpiredSignature => return Err(TokenError::Expired),
                    ErrorKind::InvalidSignature => continue,
                    _ => return Err(TokenError::Malformed(e.to_string())),
                },
            }
        }

        Err(TokenError::Malformed(
            "signature does not match any known key".to_string(),
        ))
    }
}
