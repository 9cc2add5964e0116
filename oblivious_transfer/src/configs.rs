use crate::error::ProtocolError;
use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

/// Groups with a smaller prime order than this are refused when creating a CRS or a committer
pub const MIN_GROUP_ORDER_BITS: u32 = 160;

/// Config of the OTs run over a single CRS
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    CanonicalDeserialize,
    CanonicalSerialize,
    Serialize,
    Deserialize,
)]
pub struct OTConfig {
    /// Number of OTs expected to be run with the same CRS. Only used to size the fixed-base
    /// precomputation so it affects performance and not correctness.
    pub num_ot: u16,
}

impl OTConfig {
    pub fn new(num_ot: u16) -> Result<Self, ProtocolError> {
        if num_ot == 0 {
            return Err(ProtocolError::NeedNonZeroNumberOfOTs);
        }
        Ok(Self { num_ot })
    }

    /// For running a single OT
    pub fn single() -> Self {
        Self { num_ot: 1 }
    }
}

impl Default for OTConfig {
    fn default() -> Self {
        Self::single()
    }
}

/// Refuse groups whose order is too small to give the required security level
pub fn check_group_order<G: AffineRepr>() -> Result<(), ProtocolError> {
    let bits = G::ScalarField::MODULUS_BIT_SIZE;
    if bits < MIN_GROUP_ORDER_BITS {
        return Err(ProtocolError::GroupOrderTooSmall(
            bits,
            MIN_GROUP_ORDER_BITS,
        ));
    }
    Ok(())
}
