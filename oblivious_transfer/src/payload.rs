//! How a message is hidden under a group element shared by both parties. OT and ElGamal commitments
//! both "mask" a plaintext with a key element (`v_b` for the OT sender, `h^r` for the committer) and
//! "unmask" it with the same element computed differently by the other party.
//!
//! - [`BytePayload`] masks byte strings by XOR with a pad derived from the key element with a
//!   [`KeyDerivation`].
//! - [`GroupElementPayload`] masks group elements by adding the key element.

use crate::{
    error::{CheatAttempt, ProtocolError},
    kdf::{KeyDerivation, Shake256Kdf},
    util::{check_received_element, cheat, is_group_member, xor, xor_in_place},
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{fmt::Debug, marker::PhantomData, vec::Vec};

/// Strategy for the type of messages a protocol transfers or commits to
pub trait Payload<G: AffineRepr>: Send + Sync + 'static {
    /// The message before masking
    type Plaintext: Clone
        + Debug
        + PartialEq
        + Eq
        + CanonicalSerialize
        + CanonicalDeserialize
        + Send
        + Sync;
    /// The message after masking, as sent over the wire
    type Masked: Clone
        + Debug
        + PartialEq
        + Eq
        + CanonicalSerialize
        + CanonicalDeserialize
        + Send
        + Sync;

    /// Check a plaintext supplied by the caller. `name` identifies it in the error.
    fn check_input(x: &Self::Plaintext, name: &'static str) -> Result<(), ProtocolError>;

    /// Check that the 2 inputs of an OT sender are of the same shape
    fn check_input_pair(x0: &Self::Plaintext, x1: &Self::Plaintext) -> Result<(), ProtocolError>;

    /// Check a masked value received from the other party
    fn check_masked(c: &Self::Masked, name: &'static str) -> Result<(), ProtocolError>;

    /// Check the 2 masked values an OT receiver gets
    fn check_masked_pair(c0: &Self::Masked, c1: &Self::Masked) -> Result<(), ProtocolError>;

    fn mask(x: &Self::Plaintext, key: &G) -> Result<Self::Masked, ProtocolError>;

    fn unmask(c: &Self::Masked, key: &G) -> Result<Self::Plaintext, ProtocolError>;

    /// Whether `c` is the masking of `x` under `key`. Never errors, a mismatch of shapes is simply
    /// a mismatch.
    fn is_masking_of(c: &Self::Masked, x: &Self::Plaintext, key: &G) -> bool;
}

/// Messages are byte strings, masked with a pad derived using `K`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BytePayload<K: KeyDerivation = Shake256Kdf>(PhantomData<K>);

/// Messages are group elements, masked by adding the key element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupElementPayload;

impl<G: AffineRepr, K: KeyDerivation + Send + Sync + 'static> Payload<G> for BytePayload<K> {
    type Plaintext = Vec<u8>;
    type Masked = Vec<u8>;

    fn check_input(_x: &Vec<u8>, _name: &'static str) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn check_input_pair(x0: &Vec<u8>, x1: &Vec<u8>) -> Result<(), ProtocolError> {
        if x0.len() != x1.len() {
            return Err(ProtocolError::UnequalMessageLengths(x0.len(), x1.len()));
        }
        Ok(())
    }

    fn check_masked(_c: &Vec<u8>, _name: &'static str) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn check_masked_pair(c0: &Vec<u8>, c1: &Vec<u8>) -> Result<(), ProtocolError> {
        if c0.len() != c1.len() {
            return Err(cheat(CheatAttempt::UnequalMaskedLengths(
                c0.len(),
                c1.len(),
            )));
        }
        Ok(())
    }

    fn mask(x: &Vec<u8>, key: &G) -> Result<Vec<u8>, ProtocolError> {
        let mut c = K::derive_key_from(key, x.len())?;
        xor_in_place(&mut c, x);
        Ok(c)
    }

    fn unmask(c: &Vec<u8>, key: &G) -> Result<Vec<u8>, ProtocolError> {
        let pad = K::derive_key_from(key, c.len())?;
        Ok(xor(c, &pad))
    }

    fn is_masking_of(c: &Vec<u8>, x: &Vec<u8>, key: &G) -> bool {
        if c.len() != x.len() {
            return false;
        }
        match Self::mask(x, key) {
            Ok(expected) => expected == *c,
            Err(_) => false,
        }
    }
}

impl<G: AffineRepr> Payload<G> for GroupElementPayload {
    type Plaintext = G;
    type Masked = G;

    fn check_input(x: &G, name: &'static str) -> Result<(), ProtocolError> {
        if !is_group_member(x) {
            return Err(ProtocolError::InputNotInGroup(name));
        }
        Ok(())
    }

    fn check_input_pair(x0: &G, x1: &G) -> Result<(), ProtocolError> {
        Self::check_input(x0, "x0")?;
        Self::check_input(x1, "x1")
    }

    fn check_masked(c: &G, name: &'static str) -> Result<(), ProtocolError> {
        check_received_element(c, name)
    }

    fn check_masked_pair(c0: &G, c1: &G) -> Result<(), ProtocolError> {
        check_received_element(c0, "c0")?;
        check_received_element(c1, "c1")
    }

    fn mask(x: &G, key: &G) -> Result<G, ProtocolError> {
        Ok((*x + *key).into_affine())
    }

    fn unmask(c: &G, key: &G) -> Result<G, ProtocolError> {
        Ok((c.into_group() - *key).into_affine())
    }

    fn is_masking_of(c: &G, x: &G, key: &G) -> bool {
        (*x + *key).into_affine() == *c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, kdf::HkdfSha256, util::tests::non_member};
    use ark_bls12_381::G1Affine;
    use ark_std::{
        rand::{rngs::StdRng, RngCore, SeedableRng},
        UniformRand,
    };

    #[test]
    fn byte_masking() {
        let mut rng = StdRng::seed_from_u64(0u64);

        fn check<K: KeyDerivation + Send + Sync + 'static>(rng: &mut StdRng) {
            let key = G1Affine::rand(rng);
            let other_key = G1Affine::rand(rng);
            for len in [0, 1, 20, 64, 257] {
                let mut x = vec![0u8; len];
                rng.fill_bytes(&mut x);
                let c = <BytePayload<K> as Payload<G1Affine>>::mask(&x, &key).unwrap();
                assert_eq!(c.len(), len);
                assert_eq!(
                    <BytePayload<K> as Payload<G1Affine>>::unmask(&c, &key).unwrap(),
                    x
                );
                assert!(<BytePayload<K> as Payload<G1Affine>>::is_masking_of(
                    &c, &x, &key
                ));
                if len >= 16 {
                    assert_ne!(
                        <BytePayload<K> as Payload<G1Affine>>::unmask(&c, &other_key).unwrap(),
                        x
                    );
                    assert!(!<BytePayload<K> as Payload<G1Affine>>::is_masking_of(
                        &c, &x, &other_key
                    ));
                    // Shorter plaintext never matches
                    assert!(!<BytePayload<K> as Payload<G1Affine>>::is_masking_of(
                        &c,
                        &x[..len - 1].to_vec(),
                        &key
                    ));
                }
            }
        }

        check::<Shake256Kdf>(&mut rng);
        check::<HkdfSha256>(&mut rng);
    }

    #[test]
    fn byte_checks() {
        type P = BytePayload;
        let err = <P as Payload<G1Affine>>::check_input_pair(&vec![1; 3], &vec![1; 4]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalUsage);
        let err =
            <P as Payload<G1Affine>>::check_masked_pair(&vec![1; 3], &vec![1; 4]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::CheatAttempt(CheatAttempt::UnequalMaskedLengths(3, 4))
        ));
        <P as Payload<G1Affine>>::check_input_pair(&vec![1; 3], &vec![2; 3]).unwrap();
        <P as Payload<G1Affine>>::check_masked_pair(&vec![1; 3], &vec![2; 3]).unwrap();
    }

    #[test]
    fn group_element_masking() {
        type P = GroupElementPayload;
        let mut rng = StdRng::seed_from_u64(0u64);
        let key = G1Affine::rand(&mut rng);
        let x = G1Affine::rand(&mut rng);
        let c = <P as Payload<G1Affine>>::mask(&x, &key).unwrap();
        assert_eq!(<P as Payload<G1Affine>>::unmask(&c, &key).unwrap(), x);
        assert!(<P as Payload<G1Affine>>::is_masking_of(&c, &x, &key));
        assert!(!<P as Payload<G1Affine>>::is_masking_of(&c, &key, &x));

        let bad = non_member(&mut rng);
        let err = <P as Payload<G1Affine>>::check_input_pair(&x, &bad).unwrap_err();
        assert!(matches!(err, ProtocolError::InputNotInGroup("x1")));
        let err = <P as Payload<G1Affine>>::check_masked_pair(&bad, &x).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::CheatAttempt(CheatAttempt::ElementNotInGroup("c0"))
        ));
        <P as Payload<G1Affine>>::check_masked_pair(&x, &c).unwrap();
    }
}
