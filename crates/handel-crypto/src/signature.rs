//! secp256k1 public key recovery

use crate::{keccak256, CryptoError};
use handel_primitives::{Address, H256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};

/// Recoverable ECDSA signature as carried in call data
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// r component (32 bytes)
    pub r: [u8; 32],
    /// s component (32 bytes)
    pub s: [u8; 32],
    /// recovery id, either 0/1 or the 27/28 form
    pub v: u8,
}

/// Public key
pub type PublicKey = VerifyingKey;

impl Signature {
    /// Create signature from r, s, v components
    pub fn new(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        Signature { r, s, v }
    }

    /// Get recovery ID (0 or 1)
    pub fn recovery_id(&self) -> u8 {
        if self.v >= 27 {
            self.v - 27
        } else {
            self.v
        }
    }
}

/// Recover the signing public key from a signature over `message_hash`.
///
/// High-s signatures are accepted: they are normalised and the recovery id
/// flipped before recovery.
pub fn recover_public_key(
    message_hash: &H256,
    signature: &Signature,
) -> Result<PublicKey, CryptoError> {
    let recovery_byte = signature.recovery_id();
    if recovery_byte > 1 {
        return Err(CryptoError::InvalidRecoveryId(signature.v));
    }

    let r: k256::FieldBytes = signature.r.into();
    let s: k256::FieldBytes = signature.s.into();
    let mut k256_sig = K256Signature::from_scalars(r, s)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

    let mut recovery_byte = recovery_byte;
    if let Some(normalized) = k256_sig.normalize_s() {
        k256_sig = normalized;
        recovery_byte ^= 1;
    }

    let recovery_id = RecoveryId::try_from(recovery_byte)
        .map_err(|_| CryptoError::InvalidRecoveryId(signature.v))?;

    VerifyingKey::recover_from_prehash(message_hash.as_bytes(), &k256_sig, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))
}

/// Derive the account address of a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    // Uncompressed point: 0x04 || x || y
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);
    Address::from_word(hash.as_bytes())
}

/// Recover the signer's address
pub fn recover_address(message_hash: &H256, signature: &Signature) -> Result<Address, CryptoError> {
    recover_public_key(message_hash, signature).map(|key| public_key_to_address(&key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    fn sign(message_hash: &H256, key: &SigningKey) -> Signature {
        let (sig, recovery_id) = key.sign_prehash_recoverable(message_hash.as_bytes()).unwrap();
        Signature::new(
            sig.r().to_bytes().into(),
            sig.s().to_bytes().into(),
            recovery_id.to_byte() + 27,
        )
    }

    #[test]
    fn test_recover_roundtrip() {
        let key = SigningKey::random(&mut OsRng);
        let expected = public_key_to_address(key.verifying_key());
        let hash = keccak256(b"test message");

        let signature = sign(&hash, &key);
        assert_eq!(recover_address(&hash, &signature).unwrap(), expected);
    }

    #[test]
    fn test_recover_known_vector() {
        let hash = H256::from_hex(
            "47173285a8d7341e5e972fc677286384f802f8ef42a5ec5f03bbfa254cb01fad",
        )
        .unwrap();
        let r = H256::from_hex("650acf9d3f5f0a2c799776a1254355d5f4061762a237396a99a0e0e3fc2bcd67")
            .unwrap();
        let s = H256::from_hex("29514a0dacb2e623ac4abd157cb18163ff942280db4d5caad66ddf941ba12e03")
            .unwrap();
        let signature = Signature::new(*r.as_bytes(), *s.as_bytes(), 27);

        let address = recover_address(&hash, &signature).unwrap();
        assert_eq!(address.to_hex(), "0xc08b5542d177ac6686946920409741463a15dddb");
    }

    #[test]
    fn test_recover_rejects_bad_recovery_id() {
        let signature = Signature::new([1u8; 32], [1u8; 32], 29);
        assert!(matches!(
            recover_address(&H256::ZERO, &signature),
            Err(CryptoError::InvalidRecoveryId(29))
        ));
    }

    #[test]
    fn test_recover_rejects_zero_scalars() {
        let signature = Signature::new([0u8; 32], [0u8; 32], 27);
        assert!(matches!(
            recover_address(&H256::ZERO, &signature),
            Err(CryptoError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_recovery_id_forms() {
        assert_eq!(Signature::new([0; 32], [0; 32], 28).recovery_id(), 1);
        assert_eq!(Signature::new([0; 32], [0; 32], 0).recovery_id(), 0);
    }
}
