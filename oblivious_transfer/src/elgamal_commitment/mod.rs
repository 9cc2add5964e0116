//! ElGamal commitments. The committer has an ElGamal key pair `(a, h = g * a)` and commits to `x`
//! as `(u, v) = (g * r, mask(x, h * r))` for a fresh `r`:
//!
//! - for group elements the mask is `x + h * r`, i.e. an ElGamal encryption of `x`
//! - for byte strings the mask is `x XOR KDF(h * r)`
//!
//! The commitment is opened by revealing `(x, r)`. It is perfectly binding as `u` fixes `r` and
//! `r` fixes `x`, and hiding under DDH. Commitments to group elements also support proofs about
//! them without opening, see [`with_proofs`].

pub mod committer;
pub mod messages;
pub mod receiver;
pub mod with_proofs;

pub use committer::ElGamalCommitter;
pub use messages::{Commitment, CommittedValue, Decommitment, PublicKeyMessage};
pub use receiver::ElGamalCommitmentReceiver;
