use ark_ec::AffineRepr;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Sent by the receiver, `(g, h) = (g_σ * r, h_σ * r)`
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ReceiverMessage<G: AffineRepr> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub h: G,
}

/// Sent by the sender, the 2 branches `(u0, c0)` and `(u1, c1)`. The masked messages `c0, c1` are
/// byte strings or group elements depending on the payload.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SenderMessage<G: AffineRepr, M: CanonicalSerialize + CanonicalDeserialize> {
    #[serde_as(as = "ArkObjectBytes")]
    pub u0: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub c0: M,
    #[serde_as(as = "ArkObjectBytes")]
    pub u1: G,
    #[serde_as(as = "ArkObjectBytes")]
    pub c1: M,
}

pub type ByteSenderMessage<G> = SenderMessage<G, Vec<u8>>;
pub type GroupElementSenderMessage<G> = SenderMessage<G, G>;

impl<G: AffineRepr, M: CanonicalSerialize + CanonicalDeserialize> SenderMessage<G, M> {
    /// The branch `(u_b, c_b)` for choice `b`
    pub fn branch(&self, choice: bool) -> (&G, &M) {
        if choice {
            (&self.u1, &self.c1)
        } else {
            (&self.u0, &self.c0)
        }
    }
}
