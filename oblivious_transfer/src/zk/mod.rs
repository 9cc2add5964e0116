//! Zero-knowledge proof of knowledge from a sigma protocol, following the construction of Hazay and
//! Lindell (Efficient Secure Two-Party Protocols, section 6.5.1). A sigma protocol is only honest
//! verifier zero-knowledge, so the verifier first commits to its challenge with a Pedersen
//! commitment whose key `k = g * τ` is chosen by the prover. The prover reveals the trapdoor `τ`
//! at the end which makes the transcript simulatable.
//!
//! 1. Prover samples `τ` and sends `k = g * τ`.
//! 2. Verifier samples challenge `e` and randomness `ρ` and sends `C = g * e + k * ρ`.
//! 3. Prover sends the first message `a` of the sigma protocol.
//! 4. Verifier sends `(e, ρ)`. Prover aborts if `C` does not open to it.
//! 5. Prover sends response `z` and `τ`. Verifier accepts if `g * τ = k` and `(a, e, z)` is an
//!    accepting transcript.

pub mod sigma;

use crate::{
    channel::Channel,
    error::{CheatAttempt, ProtocolError},
    util::{check_received_element, cheat},
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{marker::PhantomData, rand::RngCore, UniformRand};
use dock_crypto_utils::{commitment::PedersenCommitmentKey, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sigma::SigmaProtocol;
use tracing::debug;

/// Prover's Pedersen commitment key `k`
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ChallengeCommitmentKey<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub key: G,
}

/// Verifier's commitment to the challenge
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ChallengeCommitment<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub commitment: G,
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ChallengeOpening<F: PrimeField> {
    /// The challenge
    #[serde_as(as = "ArkObjectBytes")]
    pub e: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub rho: F,
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ProverResponse<F: PrimeField, Z: CanonicalSerialize + CanonicalDeserialize> {
    #[serde_as(as = "ArkObjectBytes")]
    pub response: Z,
    #[serde_as(as = "ArkObjectBytes")]
    pub trapdoor: F,
}

/// Proves knowledge of a witness for a statement of the sigma protocol `S`. `base` generates the
/// Pedersen commitment key and must be the same for both parties.
#[derive(Clone, Debug)]
pub struct ZkPokProver<G: AffineRepr, S> {
    base: G,
    _sigma: PhantomData<S>,
}

#[derive(Clone, Debug)]
pub struct ZkPokVerifier<G: AffineRepr, S> {
    base: G,
    _sigma: PhantomData<S>,
}

impl<G: AffineRepr, S: SigmaProtocol<G>> ZkPokProver<G, S> {
    pub fn new(base: G) -> Self {
        Self {
            base,
            _sigma: PhantomData,
        }
    }

    /// Run the proof. Fails with a cheat attempt if the verifier's opening of the challenge is
    /// wrong, in which case no response is sent.
    pub fn prove<R: RngCore, C: Channel>(
        &self,
        rng: &mut R,
        channel: &mut C,
        statement: &S::Statement,
        witness: &S::Witness,
    ) -> Result<(), ProtocolError> {
        let trapdoor = G::ScalarField::rand(rng);
        let key = self.base.mul_bigint(trapdoor.into_bigint()).into_affine();
        channel
            .send(&ChallengeCommitmentKey { key })
            .map_err(ProtocolError::communication("sending the challenge commitment key"))?;

        let challenge_commitment: ChallengeCommitment<G> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the challenge commitment"))?;
        check_received_element(&challenge_commitment.commitment, "C")?;

        let (state, commitment) = S::commit(rng, statement, witness);
        channel
            .send(&commitment)
            .map_err(ProtocolError::communication("sending the sigma commitment"))?;

        let opening: ChallengeOpening<G::ScalarField> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the challenge opening"))?;
        let comm_key = PedersenCommitmentKey {
            g: self.base,
            h: key,
        };
        if comm_key.commit(&opening.e, &opening.rho) != challenge_commitment.commitment {
            return Err(cheat(CheatAttempt::InvalidChallengeOpening));
        }

        let response = S::respond(state, &opening.e);
        channel
            .send(&ProverResponse { response, trapdoor })
            .map_err(ProtocolError::communication("sending the sigma response"))?;
        debug!("sent proof of knowledge");
        Ok(())
    }
}

impl<G: AffineRepr, S: SigmaProtocol<G>> ZkPokVerifier<G, S> {
    pub fn new(base: G) -> Self {
        Self {
            base,
            _sigma: PhantomData,
        }
    }

    /// Run the verification. Returns `Ok(false)` when the proof is rejected. Malformed messages are
    /// errors.
    pub fn verify<R: RngCore, C: Channel>(
        &self,
        rng: &mut R,
        channel: &mut C,
        statement: &S::Statement,
    ) -> Result<bool, ProtocolError> {
        let key: ChallengeCommitmentKey<G> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the challenge commitment key"))?;
        check_received_element(&key.key, "k")?;
        if key.key.is_zero() {
            return Err(cheat(CheatAttempt::IdentityElement("k")));
        }

        let e = G::ScalarField::rand(rng);
        let rho = G::ScalarField::rand(rng);
        let comm_key = PedersenCommitmentKey {
            g: self.base,
            h: key.key,
        };
        channel
            .send(&ChallengeCommitment {
                commitment: comm_key.commit(&e, &rho),
            })
            .map_err(ProtocolError::communication("sending the challenge commitment"))?;

        let commitment: S::Commitment = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the sigma commitment"))?;
        S::check_commitment(&commitment)?;

        channel
            .send(&ChallengeOpening { e, rho })
            .map_err(ProtocolError::communication("sending the challenge opening"))?;

        let response: ProverResponse<G::ScalarField, S::Response> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the sigma response"))?;
        let trapdoor_valid = self
            .base
            .mul_bigint(response.trapdoor.into_bigint())
            .into_affine()
            == key.key;
        let accepted =
            trapdoor_valid && S::verify(statement, &commitment, &e, &response.response);
        debug!(accepted, "verified proof of knowledge");
        Ok(accepted)
    }
}
