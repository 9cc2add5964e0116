use crate::{
    channel::Channel,
    configs::check_group_order,
    elgamal_commitment::messages::{Commitment, Decommitment, PublicKeyMessage},
    error::ProtocolError,
    payload::Payload,
    util::is_group_member,
    CommitmentId,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_std::{
    collections::{BTreeMap, BTreeSet},
    rand::RngCore,
    vec::Vec,
    UniformRand,
};
use dock_crypto_utils::elgamal::{keygen, PublicKey, SecretKey};
use tracing::debug;
use zeroize::Zeroize;

/// What the committer remembers about an open commitment
pub(crate) struct CommitmentRecord<G: AffineRepr, P: Payload<G>> {
    pub(crate) r: G::ScalarField,
    pub(crate) x: P::Plaintext,
    pub(crate) commitment: Commitment<G, P::Masked>,
}

impl<G: AffineRepr, P: Payload<G>> Drop for CommitmentRecord<G, P> {
    fn drop(&mut self) {
        self.r.zeroize();
    }
}

/// Commits to values of type `P::Plaintext` under its own ElGamal key pair. Keeps every
/// commitment it made so it can later open it or prove statements about it.
pub struct ElGamalCommitter<G: AffineRepr, P: Payload<G>> {
    pub(crate) base: G,
    pub(crate) secret_key: SecretKey<G::ScalarField>,
    pub(crate) public_key: PublicKey<G>,
    pub(crate) records: BTreeMap<CommitmentId, CommitmentRecord<G, P>>,
}

pub(crate) fn check_base<G: AffineRepr>(base: &G) -> Result<(), ProtocolError> {
    check_group_order::<G>()?;
    if !is_group_member(base) || base.is_zero() {
        return Err(ProtocolError::InputNotInGroup("base"));
    }
    Ok(())
}

impl<G: AffineRepr, P: Payload<G>> ElGamalCommitter<G, P> {
    /// Generate the key pair. `base` must be the same as the receiver's.
    pub fn new<R: RngCore>(rng: &mut R, base: &G) -> Result<Self, ProtocolError> {
        check_base(base)?;
        let (secret_key, public_key) = keygen(rng, base);
        Ok(Self {
            base: *base,
            secret_key,
            public_key,
            records: BTreeMap::new(),
        })
    }

    pub fn public_key(&self) -> &G {
        &self.public_key.0
    }

    /// Send the public key to the receiver
    pub fn preprocess<C: Channel>(&self, channel: &mut C) -> Result<(), ProtocolError> {
        channel
            .send(&PublicKeyMessage {
                h: self.public_key.0,
            })
            .map_err(ProtocolError::communication("sending the public key"))?;
        debug!("committer sent its public key");
        Ok(())
    }

    /// Commit to `x` as commitment `id`. The id must not have been used by this committer before.
    /// If sending fails the commitment is forgotten and the id can be used again.
    pub fn commit<R: RngCore, C: Channel>(
        &mut self,
        rng: &mut R,
        channel: &mut C,
        x: &P::Plaintext,
        id: CommitmentId,
    ) -> Result<(), ProtocolError> {
        if self.records.contains_key(&id) {
            return Err(ProtocolError::CommitmentIdInUse(id));
        }
        let record = self.new_record(rng, x, id)?;
        let commitment = record.commitment.clone();
        self.records.insert(id, record);
        if let Err(e) = channel.send(&commitment) {
            self.records.remove(&id);
            return Err(ProtocolError::communication("sending the commitment")(e));
        }
        debug!(id, "committer sent commitment");
        Ok(())
    }

    /// Commit to many values in one message. Either all commitments are made or none.
    pub fn commit_batch<R: RngCore, C: Channel>(
        &mut self,
        rng: &mut R,
        channel: &mut C,
        values: &[(CommitmentId, P::Plaintext)],
    ) -> Result<(), ProtocolError> {
        let mut ids = BTreeSet::new();
        for (id, _) in values {
            if self.records.contains_key(id) || !ids.insert(*id) {
                return Err(ProtocolError::CommitmentIdInUse(*id));
            }
        }
        let records = values
            .iter()
            .map(|(id, x)| self.new_record(rng, x, *id))
            .collect::<Result<Vec<_>, _>>()?;
        let commitments = records
            .iter()
            .map(|r| r.commitment.clone())
            .collect::<Vec<_>>();
        for record in records {
            self.records.insert(record.commitment.id, record);
        }
        if let Err(e) = channel.send(&commitments) {
            for id in ids {
                self.records.remove(&id);
            }
            return Err(ProtocolError::communication("sending the commitments")(e));
        }
        debug!(count = commitments.len(), "committer sent commitments");
        Ok(())
    }

    /// Open commitment `id` by sending `(x, r)`
    pub fn decommit<C: Channel>(
        &self,
        channel: &mut C,
        id: CommitmentId,
    ) -> Result<(), ProtocolError> {
        let decommitment = self.decommitment(id)?;
        channel
            .send(&decommitment)
            .map_err(ProtocolError::communication("sending the decommitment"))?;
        debug!(id, "committer sent decommitment");
        Ok(())
    }

    pub fn decommit_batch<C: Channel>(
        &self,
        channel: &mut C,
        ids: &[CommitmentId],
    ) -> Result<(), ProtocolError> {
        let decommitments = ids
            .iter()
            .map(|id| self.decommitment(*id))
            .collect::<Result<Vec<_>, _>>()?;
        channel
            .send(&decommitments)
            .map_err(ProtocolError::communication("sending the decommitments"))?;
        debug!(count = ids.len(), "committer sent decommitments");
        Ok(())
    }

    /// Ids of all commitments made so far
    pub fn commitment_ids(&self) -> impl Iterator<Item = &CommitmentId> {
        self.records.keys()
    }

    pub(crate) fn record(
        &self,
        id: CommitmentId,
    ) -> Result<&CommitmentRecord<G, P>, ProtocolError> {
        self.records
            .get(&id)
            .ok_or(ProtocolError::UnknownCommitmentId(id))
    }

    fn decommitment(
        &self,
        id: CommitmentId,
    ) -> Result<Decommitment<G::ScalarField, P::Plaintext>, ProtocolError> {
        let record = self.record(id)?;
        Ok(Decommitment {
            id,
            x: record.x.clone(),
            r: record.r,
        })
    }

    fn new_record<R: RngCore>(
        &self,
        rng: &mut R,
        x: &P::Plaintext,
        id: CommitmentId,
    ) -> Result<CommitmentRecord<G, P>, ProtocolError> {
        P::check_input(x, "x")?;
        let r = G::ScalarField::rand(rng);
        let r_repr = r.into_bigint();
        let u = self.base.mul_bigint(r_repr).into_affine();
        let key = self.public_key.0.mul_bigint(r_repr).into_affine();
        let v = P::mask(x, &key)?;
        Ok(CommitmentRecord {
            r,
            x: x.clone(),
            commitment: Commitment { id, u, v },
        })
    }
}
