//! Sigma protocols used by the zero-knowledge proofs of knowledge in [`crate::zk`]. Both are
//! built from the Schnorr proof of knowledge of discrete log in `schnorr_pok`.

use crate::{error::ProtocolError, util::check_received_element};
use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{fmt::Debug, rand::RngCore, UniformRand};
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use schnorr_pok::discrete_log::{PokDiscreteLog, PokDiscreteLogProtocol};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// A 3-move public coin protocol `(a, e, z)` between a prover knowing a witness for a statement and
/// a verifier. The challenge `e` is a scalar of the group.
pub trait SigmaProtocol<G: AffineRepr> {
    type Statement;
    type Witness;
    /// First message of the prover
    type Commitment: Clone + Debug + CanonicalSerialize + CanonicalDeserialize;
    type Response: Clone + Debug + CanonicalSerialize + CanonicalDeserialize;
    /// What the prover keeps between sending the commitment and computing the response
    type ProverState;

    fn commit<R: RngCore>(
        rng: &mut R,
        statement: &Self::Statement,
        witness: &Self::Witness,
    ) -> (Self::ProverState, Self::Commitment);

    fn respond(state: Self::ProverState, challenge: &G::ScalarField) -> Self::Response;

    /// Validate a commitment received from the prover before it is used
    fn check_commitment(commitment: &Self::Commitment) -> Result<(), ProtocolError>;

    fn verify(
        statement: &Self::Statement,
        commitment: &Self::Commitment,
        challenge: &G::ScalarField,
        response: &Self::Response,
    ) -> bool;
}

/// Knowledge of `x` such that `y = base * x`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DlogSigma;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DlogStatement<G: AffineRepr> {
    pub base: G,
    pub y: G,
}

/// Knowledge of `w` such that `u = g * w` and `v = h * w`, i.e. `(g, h, u, v)` is a Diffie-Hellman
/// tuple. Runs the Schnorr protocol for both relations with the same blinding so that a single
/// response satisfies both verification equations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DhTupleSigma;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DhTupleStatement<G: AffineRepr> {
    pub g: G,
    pub h: G,
    pub u: G,
    pub v: G,
}

/// `(g * b, h * b)` for the shared blinding `b`
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct DhTupleCommitment<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub t_g: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub t_h: G,
}

impl<G: AffineRepr> SigmaProtocol<G> for DlogSigma {
    type Statement = DlogStatement<G>;
    type Witness = G::ScalarField;
    type Commitment = G;
    type Response = G::ScalarField;
    type ProverState = PokDiscreteLogProtocol<G>;

    fn commit<R: RngCore>(
        rng: &mut R,
        statement: &DlogStatement<G>,
        witness: &G::ScalarField,
    ) -> (Self::ProverState, G) {
        let blinding = G::ScalarField::rand(rng);
        let protocol = PokDiscreteLogProtocol::init(*witness, blinding, &statement.base);
        let t = protocol.t;
        (protocol, t)
    }

    fn respond(state: Self::ProverState, challenge: &G::ScalarField) -> G::ScalarField {
        state.gen_proof(challenge).response
    }

    fn check_commitment(commitment: &G) -> Result<(), ProtocolError> {
        check_received_element(commitment, "t")
    }

    fn verify(
        statement: &DlogStatement<G>,
        commitment: &G,
        challenge: &G::ScalarField,
        response: &G::ScalarField,
    ) -> bool {
        PokDiscreteLog {
            t: *commitment,
            response: *response,
        }
        .verify(&statement.y, &statement.base, challenge)
    }
}

impl<G: AffineRepr> SigmaProtocol<G> for DhTupleSigma {
    type Statement = DhTupleStatement<G>;
    type Witness = G::ScalarField;
    type Commitment = DhTupleCommitment<G>;
    type Response = G::ScalarField;
    type ProverState = (PokDiscreteLogProtocol<G>, PokDiscreteLogProtocol<G>);

    fn commit<R: RngCore>(
        rng: &mut R,
        statement: &DhTupleStatement<G>,
        witness: &G::ScalarField,
    ) -> (Self::ProverState, DhTupleCommitment<G>) {
        let blinding = G::ScalarField::rand(rng);
        let p_g = PokDiscreteLogProtocol::init(*witness, blinding, &statement.g);
        let p_h = PokDiscreteLogProtocol::init(*witness, blinding, &statement.h);
        let commitment = DhTupleCommitment {
            t_g: p_g.t,
            t_h: p_h.t,
        };
        ((p_g, p_h), commitment)
    }

    fn respond(state: Self::ProverState, challenge: &G::ScalarField) -> G::ScalarField {
        let (p_g, p_h) = state;
        // Same blinding and witness so both responses are equal
        let response = p_g.gen_proof(challenge).response;
        debug_assert_eq!(response, p_h.gen_proof(challenge).response);
        response
    }

    fn check_commitment(commitment: &DhTupleCommitment<G>) -> Result<(), ProtocolError> {
        check_received_element(&commitment.t_g, "t_g")?;
        check_received_element(&commitment.t_h, "t_h")
    }

    fn verify(
        statement: &DhTupleStatement<G>,
        commitment: &DhTupleCommitment<G>,
        challenge: &G::ScalarField,
        response: &G::ScalarField,
    ) -> bool {
        let proof_g = PokDiscreteLog {
            t: commitment.t_g,
            response: *response,
        };
        let proof_h = PokDiscreteLog {
            t: commitment.t_h,
            response: *response,
        };
        proof_g.verify(&statement.u, &statement.g, challenge)
            && proof_h.verify(&statement.v, &statement.h, challenge)
    }
}
