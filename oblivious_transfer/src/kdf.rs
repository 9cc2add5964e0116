//! Key derivation used to turn a shared group element into a one-time pad of the length of the
//! message being masked.

use crate::error::ProtocolError;
use ark_serialize::CanonicalSerialize;
use ark_std::{vec, vec::Vec};
use digest::{ExtendableOutput, Update};
use hkdf::Hkdf;
use sha2::Sha256;
use sha3::Shake256;

const KDF_INFO: &[u8] = b"oblivious-transfer-ddh : KDF";

/// Stretches a seed into `output_len` pseudorandom bytes
pub trait KeyDerivation {
    fn derive_key(seed: &[u8], output_len: usize) -> Result<Vec<u8>, ProtocolError>;

    /// Derive a key from the canonical (compressed) encoding of a group element
    fn derive_key_from<T: CanonicalSerialize>(
        input: &T,
        output_len: usize,
    ) -> Result<Vec<u8>, ProtocolError> {
        let mut seed = Vec::with_capacity(input.compressed_size());
        // Writing into a vector cannot fail
        let _ = input.serialize_compressed(&mut seed);
        Self::derive_key(&seed, output_len)
    }
}

/// SHAKE-256 used as an XOF. Produces outputs of any length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shake256Kdf;

/// HKDF with SHA-256. Output is limited to `255 * 32` bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HkdfSha256;

impl KeyDerivation for Shake256Kdf {
    fn derive_key(seed: &[u8], output_len: usize) -> Result<Vec<u8>, ProtocolError> {
        let mut key = vec![0; output_len];
        let mut hasher = Shake256::default();
        hasher.update(KDF_INFO);
        hasher.update(seed);
        hasher.finalize_xof_into(&mut key);
        Ok(key)
    }
}

impl KeyDerivation for HkdfSha256 {
    fn derive_key(seed: &[u8], output_len: usize) -> Result<Vec<u8>, ProtocolError> {
        let mut key = vec![0; output_len];
        Hkdf::<Sha256>::new(None, seed)
            .expand(KDF_INFO, &mut key)
            .map_err(|_| ProtocolError::KeyDerivationOutputTooLong(output_len))?;
        Ok(key)
    }
}
