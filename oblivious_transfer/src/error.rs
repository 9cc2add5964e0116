use crate::{channel::ChannelError, CommitmentId};
use thiserror::Error;

/// Broad class of a [`ProtocolError`]. Lets a caller tell a misbehaving counterparty apart from a
/// broken network or its own misuse of the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad parameters given at construction time. Never recoverable.
    Config,
    /// The other party sent something that fails a validity check. The session must be aborted.
    CheatAttempt,
    /// Sending or receiving failed.
    Communication,
    /// The API was called with inputs it does not accept.
    IllegalUsage,
}

/// The check a received value failed
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CheatAttempt {
    #[error("received `{0}` is not an element of the group")]
    ElementNotInGroup(&'static str),
    #[error("received `{0}` is the identity element")]
    IdentityElement(&'static str),
    #[error("masked messages have different lengths {0} and {1}")]
    UnequalMaskedLengths(usize, usize),
    #[error("commitment id {0} was already used")]
    CommitmentIdReused(CommitmentId),
    #[error("decommitment of id {0} has a different id")]
    MismatchedCommitmentId(CommitmentId, CommitmentId),
    #[error("opening of the challenge commitment is invalid")]
    InvalidChallengeOpening,
    #[error("proof of well-formedness of the OT tuple did not verify")]
    InvalidTupleProof,
    #[error("tuple uses an unexpected base")]
    UnexpectedBase,
    #[error("expected {0} items but got {1}")]
    IncorrectBatchSize(usize, usize),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("CRS element `{0}` is not an element of the group")]
    CrsElementNotInGroup(&'static str),
    #[error("CRS element `{0}` is the identity element")]
    IdentityElementInCrs(&'static str),
    #[error("group order has {0} bits but at least {1} bits are needed")]
    GroupOrderTooSmall(u32, u32),
    #[error("need non-zero number of OTs")]
    NeedNonZeroNumberOfOTs,
    #[error("key derivation cannot output {0} bytes")]
    KeyDerivationOutputTooLong(usize),
    #[error("cheat attempt detected: {0}")]
    CheatAttempt(#[from] CheatAttempt),
    #[error("communication failed while {context}: {source}")]
    Communication {
        context: &'static str,
        #[source]
        source: ChannelError,
    },
    #[error("OT messages must have equal lengths but have {0} and {1}")]
    UnequalMessageLengths(usize, usize),
    #[error("input `{0}` is not an element of the group")]
    InputNotInGroup(&'static str),
    #[error("no commitment with id {0}")]
    UnknownCommitmentId(CommitmentId),
    #[error("commitment id {0} is already in use")]
    CommitmentIdInUse(CommitmentId),
    #[error("expected {0} choices but got {1}")]
    IncorrectNumberOfChoices(usize, usize),
    #[error("expected {0} message pairs but got {1}")]
    IncorrectNumberOfMessagePairs(usize, usize),
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CrsElementNotInGroup(_)
            | Self::IdentityElementInCrs(_)
            | Self::GroupOrderTooSmall(..)
            | Self::NeedNonZeroNumberOfOTs
            | Self::KeyDerivationOutputTooLong(_) => ErrorKind::Config,
            Self::CheatAttempt(_) => ErrorKind::CheatAttempt,
            Self::Communication { .. } => ErrorKind::Communication,
            Self::UnequalMessageLengths(..)
            | Self::InputNotInGroup(_)
            | Self::UnknownCommitmentId(_)
            | Self::CommitmentIdInUse(_)
            | Self::IncorrectNumberOfChoices(..)
            | Self::IncorrectNumberOfMessagePairs(..) => ErrorKind::IllegalUsage,
        }
    }

    pub fn is_cheat_attempt(&self) -> bool {
        self.kind() == ErrorKind::CheatAttempt
    }

    /// Returns a closure that wraps a [`ChannelError`] with what the protocol was doing
    pub(crate) fn communication(context: &'static str) -> impl FnOnce(ChannelError) -> Self {
        move |source| Self::Communication { context, source }
    }
}
