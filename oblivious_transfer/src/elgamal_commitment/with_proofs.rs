//! Zero-knowledge proofs about ElGamal commitments to group elements, using the proofs of
//! knowledge of [`crate::zk`]:
//!
//! - knowledge of the committer's secret key `a` where `h = g * a`
//! - that a revealed `x` is the value committed in `(u, v)` without opening the commitment, i.e.
//!   knowledge of `r` such that `(g, h, u, v - x)` is a Diffie-Hellman tuple.

use crate::{
    channel::Channel,
    elgamal_commitment::{
        committer::ElGamalCommitter, messages::CommittedValue,
        receiver::ElGamalCommitmentReceiver,
    },
    error::{CheatAttempt, ProtocolError},
    payload::GroupElementPayload,
    util::{check_received_element, cheat},
    zk::{
        sigma::{DhTupleSigma, DhTupleStatement, DlogSigma, DlogStatement},
        ZkPokProver, ZkPokVerifier,
    },
    CommitmentId,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_std::rand::RngCore;
use tracing::debug;

fn committed_value_statement<G: AffineRepr>(
    base: &G,
    public_key: &G,
    u: &G,
    v: &G,
    x: &G,
) -> DhTupleStatement<G> {
    DhTupleStatement {
        g: *base,
        h: *public_key,
        u: *u,
        v: (v.into_group() - *x).into_affine(),
    }
}

impl<G: AffineRepr> ElGamalCommitter<G, GroupElementPayload> {
    /// Prove knowledge of the secret key
    pub fn prove_knowledge<R: RngCore, C: Channel>(
        &self,
        rng: &mut R,
        channel: &mut C,
    ) -> Result<(), ProtocolError> {
        let statement = DlogStatement {
            base: self.base,
            y: self.public_key.0,
        };
        ZkPokProver::<G, DlogSigma>::new(self.base).prove(
            rng,
            channel,
            &statement,
            &self.secret_key.0,
        )
    }

    /// Reveal the value of commitment `id` and prove that it is the committed one
    pub fn prove_committed_value<R: RngCore, C: Channel>(
        &self,
        rng: &mut R,
        channel: &mut C,
        id: CommitmentId,
    ) -> Result<(), ProtocolError> {
        let record = self.record(id)?;
        channel
            .send(&CommittedValue { id, x: record.x })
            .map_err(ProtocolError::communication("sending the committed value"))?;
        let statement = committed_value_statement(
            &self.base,
            &self.public_key.0,
            &record.commitment.u,
            &record.commitment.v,
            &record.x,
        );
        ZkPokProver::<G, DhTupleSigma>::new(self.base).prove(rng, channel, &statement, &record.r)?;
        debug!(id, "committer proved committed value");
        Ok(())
    }
}

impl<G: AffineRepr> ElGamalCommitmentReceiver<G, GroupElementPayload> {
    /// Verify the committer's proof of knowledge of its secret key
    pub fn verify_knowledge<R: RngCore, C: Channel>(
        &self,
        rng: &mut R,
        channel: &mut C,
    ) -> Result<bool, ProtocolError> {
        let statement = DlogStatement {
            base: self.base,
            y: self.public_key,
        };
        ZkPokVerifier::<G, DlogSigma>::new(self.base).verify(rng, channel, &statement)
    }

    /// Receive the value of the stored commitment `id` and verify the proof that it is the
    /// committed one. Returns `None` if the proof is rejected.
    pub fn verify_committed_value<R: RngCore, C: Channel>(
        &self,
        rng: &mut R,
        channel: &mut C,
        id: CommitmentId,
    ) -> Result<Option<G>, ProtocolError> {
        let commitment = self.known_commitment(id)?;
        let value: CommittedValue<G> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the committed value"))?;
        if value.id != id {
            return Err(cheat(CheatAttempt::MismatchedCommitmentId(id, value.id)));
        }
        check_received_element(&value.x, "x")?;
        let statement = committed_value_statement(
            &self.base,
            &self.public_key,
            &commitment.u,
            &commitment.v,
            &value.x,
        );
        let accepted =
            ZkPokVerifier::<G, DhTupleSigma>::new(self.base).verify(rng, channel, &statement)?;
        debug!(id, accepted, "commitment receiver checked committed value");
        Ok(accepted.then_some(value.x))
    }
}
