//! # Oblivious Transfer (OT) from DDH and ElGamal commitments
//!
//! Interactive two-party building blocks over any prime order group `G: AffineRepr` in which the
//! Decisional Diffie-Hellman assumption holds.
//!
//! ## Oblivious Transfer protocols
//!
//! 1. [1-of-2 OT in the common reference string model](./src/ddh_ot/mod.rs), 2 messages, secure
//!    against a receiver or sender that sends malformed group elements.
//! 2. [Fully simulatable OT](./src/ddh_ot/full_simulation.rs) where the receiver generates the
//!    tuple and proves its well-formedness in zero knowledge.
//!
//! Both work with messages that are byte strings ([`payload::BytePayload`]) or group elements
//! ([`payload::GroupElementPayload`]). Many OTs can share one CRS, see [`ddh_ot::batch`].
//!
//! ## Commitments
//!
//! 1. [ElGamal commitment](./src/elgamal_commitment/mod.rs) to byte strings or group elements.
//! 2. [ElGamal commitment with proofs](./src/elgamal_commitment/with_proofs.rs) of knowledge of
//!    the committer's secret key and of the committed value.
//!
//! All protocols are blocking and drive the network through a caller supplied [`channel::Channel`].

#![allow(non_snake_case)]

pub mod error;

pub mod channel;
pub mod configs;
pub mod crs;
pub mod ddh_ot;
pub mod elgamal_commitment;
pub mod kdf;
pub mod payload;
pub mod util;
pub mod zk;

pub type Bit = bool;
pub type Message = Vec<u8>;

/// Identifies one commitment among the many a committer may have open at once
pub type CommitmentId = u64;
