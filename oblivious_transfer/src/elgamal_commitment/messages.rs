use crate::CommitmentId;
use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Committer's ElGamal public key `h = g * a`
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicKeyMessage<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub h: G,
}

/// `(u, v) = (g * r, mask(x, h * r))`
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Commitment<G: AffineRepr, M: CanonicalSerialize + CanonicalDeserialize> {
    pub id: CommitmentId,
    #[serde_as(as = "ArkObjectBytes")]
    pub u: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub v: M,
}

/// Opening `(x, r)` of the commitment `id`
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Decommitment<F: PrimeField, M: CanonicalSerialize + CanonicalDeserialize> {
    pub id: CommitmentId,
    #[serde_as(as = "ArkObjectBytes")]
    pub x: M,
    #[serde_as(as = "ArkObjectBytes")]
    pub r: F,
}

/// The committed value, revealed before proving it is the one committed to. Unlike a
/// [`Decommitment`] this does not reveal `r`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct CommittedValue<M: CanonicalSerialize + CanonicalDeserialize> {
    pub id: CommitmentId,
    #[serde_as(as = "ArkObjectBytes")]
    pub x: M,
}
