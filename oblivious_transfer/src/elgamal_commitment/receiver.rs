use crate::{
    channel::Channel,
    elgamal_commitment::{
        committer::check_base,
        messages::{Commitment, Decommitment, PublicKeyMessage},
    },
    error::{CheatAttempt, ProtocolError},
    payload::Payload,
    util::{check_received_element, cheat},
    CommitmentId,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_std::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};
use tracing::debug;

/// Receives commitments from a single committer and checks their openings
#[derive(Clone, Debug)]
pub struct ElGamalCommitmentReceiver<G: AffineRepr, P: Payload<G>> {
    pub(crate) base: G,
    pub(crate) public_key: G,
    pub(crate) commitments: BTreeMap<CommitmentId, Commitment<G, P::Masked>>,
}

impl<G: AffineRepr, P: Payload<G>> ElGamalCommitmentReceiver<G, P> {
    /// Receive the committer's public key
    pub fn preprocess<C: Channel>(channel: &mut C, base: &G) -> Result<Self, ProtocolError> {
        check_base(base)?;
        let pk: PublicKeyMessage<G> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the public key"))?;
        check_received_element(&pk.h, "h")?;
        debug!("commitment receiver got the public key");
        Ok(Self {
            base: *base,
            public_key: pk.h,
            commitments: BTreeMap::new(),
        })
    }

    pub fn public_key(&self) -> &G {
        &self.public_key
    }

    /// Receive a commitment and store it. Returns its id.
    pub fn receive_commitment<C: Channel>(
        &mut self,
        channel: &mut C,
    ) -> Result<CommitmentId, ProtocolError> {
        let commitment: Commitment<G, P::Masked> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the commitment"))?;
        self.check_commitment(&commitment)?;
        let id = commitment.id;
        self.commitments.insert(id, commitment);
        debug!(id, "commitment receiver stored commitment");
        Ok(id)
    }

    /// Receive many commitments sent in one message. Nothing is stored if any of them is invalid.
    pub fn receive_commitment_batch<C: Channel>(
        &mut self,
        channel: &mut C,
    ) -> Result<Vec<CommitmentId>, ProtocolError> {
        let commitments: Vec<Commitment<G, P::Masked>> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the commitments"))?;
        let mut ids = BTreeSet::new();
        for commitment in &commitments {
            self.check_commitment(commitment)?;
            if !ids.insert(commitment.id) {
                return Err(cheat(CheatAttempt::CommitmentIdReused(commitment.id)));
            }
        }
        let ids = commitments.iter().map(|c| c.id).collect::<Vec<_>>();
        for commitment in commitments {
            self.commitments.insert(commitment.id, commitment);
        }
        debug!(count = ids.len(), "commitment receiver stored commitments");
        Ok(ids)
    }

    pub fn commitment(&self, id: CommitmentId) -> Option<&Commitment<G, P::Masked>> {
        self.commitments.get(&id)
    }

    /// Returns the committed value if `decommitment` opens `commitment`, `None` otherwise
    pub fn verify_decommitment(
        &self,
        commitment: &Commitment<G, P::Masked>,
        decommitment: &Decommitment<G::ScalarField, P::Plaintext>,
    ) -> Option<P::Plaintext> {
        P::check_input(&decommitment.x, "x").ok()?;
        let r_repr = decommitment.r.into_bigint();
        if self.base.mul_bigint(r_repr).into_affine() != commitment.u {
            return None;
        }
        let key = self.public_key.mul_bigint(r_repr).into_affine();
        if !P::is_masking_of(&commitment.v, &decommitment.x, &key) {
            return None;
        }
        Some(decommitment.x.clone())
    }

    /// Receive the opening of the stored commitment `id` and verify it
    pub fn receive_decommitment<C: Channel>(
        &self,
        channel: &mut C,
        id: CommitmentId,
    ) -> Result<Option<P::Plaintext>, ProtocolError> {
        let commitment = self.known_commitment(id)?;
        let decommitment: Decommitment<G::ScalarField, P::Plaintext> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the decommitment"))?;
        if decommitment.id != id {
            return Err(cheat(CheatAttempt::MismatchedCommitmentId(
                id,
                decommitment.id,
            )));
        }
        let x = self.verify_decommitment(commitment, &decommitment);
        debug!(id, accepted = x.is_some(), "commitment receiver checked decommitment");
        Ok(x)
    }

    /// Receive the openings of stored commitments `ids`, sent in one message and in the same order
    pub fn receive_decommitment_batch<C: Channel>(
        &self,
        channel: &mut C,
        ids: &[CommitmentId],
    ) -> Result<Vec<Option<P::Plaintext>>, ProtocolError> {
        let commitments = ids
            .iter()
            .map(|id| self.known_commitment(*id))
            .collect::<Result<Vec<_>, _>>()?;
        let decommitments: Vec<Decommitment<G::ScalarField, P::Plaintext>> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the decommitments"))?;
        if decommitments.len() != ids.len() {
            return Err(cheat(CheatAttempt::IncorrectBatchSize(
                ids.len(),
                decommitments.len(),
            )));
        }
        let mut opened = Vec::with_capacity(ids.len());
        for (commitment, decommitment) in commitments.into_iter().zip(decommitments.iter()) {
            if decommitment.id != commitment.id {
                return Err(cheat(CheatAttempt::MismatchedCommitmentId(
                    commitment.id,
                    decommitment.id,
                )));
            }
            opened.push(self.verify_decommitment(commitment, decommitment));
        }
        Ok(opened)
    }

    pub(crate) fn known_commitment(
        &self,
        id: CommitmentId,
    ) -> Result<&Commitment<G, P::Masked>, ProtocolError> {
        self.commitments
            .get(&id)
            .ok_or(ProtocolError::UnknownCommitmentId(id))
    }

    fn check_commitment(&self, commitment: &Commitment<G, P::Masked>) -> Result<(), ProtocolError> {
        check_received_element(&commitment.u, "u")?;
        P::check_masked(&commitment.v, "v")?;
        if self.commitments.contains_key(&commitment.id) {
            return Err(cheat(CheatAttempt::CommitmentIdReused(commitment.id)));
        }
        Ok(())
    }
}
