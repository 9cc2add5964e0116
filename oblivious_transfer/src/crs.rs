//! Common reference string `(g0, g1, h0, h1)` of the DDH based OT.
//!
//! The security of the OT relies on `(g0, g1, h0, h1)` not being a Diffie-Hellman tuple, i.e. at
//! most one of the pairs `(g0, h0)` and `(g1, h1)` has the discrete log relation the receiver uses.
//! This is an assumption on how the CRS was generated, hashing a public label to the curve as
//! [`Crs::new`] does satisfies it as nobody knows the discrete logs. It cannot be checked here
//! beyond checking that each element is a non-identity group element.

use crate::{
    configs::check_group_order,
    error::{CheatAttempt, ProtocolError},
    util::{check_received_element, cheat, is_group_member},
    Bit,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, UniformRand};
use digest::Digest;
use dock_crypto_utils::{
    concat_slices, hashing_utils::affine_group_elem_from_try_and_incr,
    serde_utils::ArkObjectBytes,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Crs<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g0: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub g1: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub h0: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub h1: G,
}

impl<G: AffineRepr> Crs<G> {
    /// Generate the CRS by hashing `label` to the curve. Both parties can do this independently.
    pub fn new<D: Digest>(label: &[u8]) -> Result<Self, ProtocolError> {
        let g0 = affine_group_elem_from_try_and_incr::<G, D>(&concat_slices![label, b" : g0"]);
        let g1 = affine_group_elem_from_try_and_incr::<G, D>(&concat_slices![label, b" : g1"]);
        let h0 = affine_group_elem_from_try_and_incr::<G, D>(&concat_slices![label, b" : h0"]);
        let h1 = affine_group_elem_from_try_and_incr::<G, D>(&concat_slices![label, b" : h1"]);
        Self::from_elements(g0, g1, h0, h1)
    }

    /// Sample a random CRS. The caller must make sure the other party gets the same one.
    pub fn random<R: RngCore>(rng: &mut R) -> Result<Self, ProtocolError> {
        Self::from_elements(
            G::Group::rand(rng).into_affine(),
            G::Group::rand(rng).into_affine(),
            G::Group::rand(rng).into_affine(),
            G::Group::rand(rng).into_affine(),
        )
    }

    /// Use an externally supplied CRS after validating it
    pub fn from_elements(g0: G, g1: G, h0: G, h1: G) -> Result<Self, ProtocolError> {
        let crs = Self { g0, g1, h0, h1 };
        crs.validate()?;
        Ok(crs)
    }

    /// Checks that the group is large enough and that each element is a non-identity group element
    pub fn validate(&self) -> Result<(), ProtocolError> {
        check_group_order::<G>()?;
        for (name, element) in self.named_elements() {
            if !is_group_member(element) {
                return Err(ProtocolError::CrsElementNotInGroup(name));
            }
            if element.is_zero() {
                return Err(ProtocolError::IdentityElementInCrs(name));
            }
        }
        Ok(())
    }

    /// Same checks as [`Self::validate`] but for a tuple that came from the other party, so a
    /// failure is a cheat attempt
    pub(crate) fn validate_received(&self) -> Result<(), ProtocolError> {
        check_group_order::<G>()?;
        for (name, element) in self.named_elements() {
            check_received_element(element, name)?;
            if element.is_zero() {
                return Err(cheat(CheatAttempt::IdentityElement(name)));
            }
        }
        Ok(())
    }

    /// The pair `(g_b, h_b)` for choice `b`
    pub fn branch(&self, choice: Bit) -> (&G, &G) {
        if choice {
            (&self.g1, &self.h1)
        } else {
            (&self.g0, &self.h0)
        }
    }

    fn named_elements(&self) -> [(&'static str, &G); 4] {
        [
            ("g0", &self.g0),
            ("g1", &self.g1),
            ("h0", &self.h0),
            ("h1", &self.h1),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, util::tests::non_member};
    use ark_bls12_381::G1Affine;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use blake2::Blake2b512;

    #[test]
    fn crs_from_label() {
        let crs = Crs::<G1Affine>::new::<Blake2b512>(b"test").unwrap();
        assert_eq!(crs, Crs::<G1Affine>::new::<Blake2b512>(b"test").unwrap());
        assert_ne!(crs, Crs::<G1Affine>::new::<Blake2b512>(b"test2").unwrap());
        let elements = [crs.g0, crs.g1, crs.h0, crs.h1];
        for i in 0..4 {
            for j in i + 1..4 {
                assert_ne!(elements[i], elements[j]);
            }
        }
        assert_eq!(crs.branch(false), (&crs.g0, &crs.h0));
        assert_eq!(crs.branch(true), (&crs.g1, &crs.h1));

        let crs = Crs::<ark_secp256r1::Affine>::new::<Blake2b512>(b"test").unwrap();
        crs.validate().unwrap();
    }

    #[test]
    fn invalid_crs() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let crs = Crs::<G1Affine>::random(&mut rng).unwrap();

        let err = Crs::from_elements(crs.g0, crs.g1, G1Affine::zero(), crs.h1).unwrap_err();
        assert!(matches!(err, ProtocolError::IdentityElementInCrs("h0")));
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = Crs::from_elements(crs.g0, non_member(&mut rng), crs.h0, crs.h1).unwrap_err();
        assert!(matches!(err, ProtocolError::CrsElementNotInGroup("g1")));
        assert_eq!(err.kind(), ErrorKind::Config);

        let received = Crs {
            h1: non_member(&mut rng),
            ..crs.clone()
        };
        assert!(received.validate_received().unwrap_err().is_cheat_attempt());
        let received = Crs {
            g0: G1Affine::zero(),
            ..crs.clone()
        };
        assert!(matches!(
            received.validate_received().unwrap_err(),
            ProtocolError::CheatAttempt(CheatAttempt::IdentityElement("g0"))
        ));
        crs.validate_received().unwrap();
        Crs::from_elements(
            G1Affine::rand(&mut rng),
            crs.g1,
            crs.h0,
            crs.h1,
        )
        .unwrap();
    }

    #[test]
    fn serialization() {
        let crs = Crs::<G1Affine>::new::<Blake2b512>(b"serialization").unwrap();
        let mut bytes = vec![];
        crs.serialize_compressed(&mut bytes).unwrap();
        assert_eq!(
            Crs::<G1Affine>::deserialize_compressed(bytes.as_slice()).unwrap(),
            crs
        );
        let json = serde_json::to_string(&crs).unwrap();
        assert_eq!(serde_json::from_str::<Crs<G1Affine>>(&json).unwrap(), crs);
    }
}
