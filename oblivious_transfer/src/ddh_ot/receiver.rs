use crate::{
    channel::Channel,
    configs::OTConfig,
    crs::Crs,
    ddh_ot::messages::{ReceiverMessage, SenderMessage},
    error::ProtocolError,
    payload::Payload,
    util::check_received_element,
    Bit,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_std::{marker::PhantomData, rand::RngCore, UniformRand};
use dock_crypto_utils::msm::WindowTable;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Receiver of 1-of-2 OTs over a fixed CRS. Can run any number of OTs, each with its own
/// [`ReceiverSession`].
#[derive(Clone, Debug)]
pub struct OTReceiver<G: AffineRepr, P> {
    crs: Crs<G>,
    /// Tables for `(g_b, h_b)` indexed by choice `b`
    tables: [(WindowTable<G::Group>, WindowTable<G::Group>); 2],
    _payload: PhantomData<P>,
}

/// State of a single OT between preprocessing and transfer. Consumed by the transfer so the
/// exponent `r` is never used twice.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ReceiverSession<'a, G: AffineRepr, P> {
    #[zeroize(skip)]
    receiver: &'a OTReceiver<G, P>,
    r: G::ScalarField,
}

impl<G: AffineRepr, P: Payload<G>> OTReceiver<G, P> {
    pub fn new(crs: Crs<G>, ot_config: OTConfig) -> Result<Self, ProtocolError> {
        crs.validate()?;
        let n = ot_config.num_ot as usize;
        let tables = [
            (
                WindowTable::new(n, crs.g0.into_group()),
                WindowTable::new(n, crs.h0.into_group()),
            ),
            (
                WindowTable::new(n, crs.g1.into_group()),
                WindowTable::new(n, crs.h1.into_group()),
            ),
        ];
        Ok(Self {
            crs,
            tables,
            _payload: PhantomData,
        })
    }

    pub fn crs(&self) -> &Crs<G> {
        &self.crs
    }

    /// Sample the exponent `r` of a new OT. Does no communication.
    pub fn preprocess<R: RngCore>(&self, rng: &mut R) -> ReceiverSession<'_, G, P> {
        ReceiverSession {
            receiver: self,
            r: G::ScalarField::rand(rng),
        }
    }
}

impl<'a, G: AffineRepr, P: Payload<G>> ReceiverSession<'a, G, P> {
    /// Get message `x_choice` of the sender without the sender learning `choice`. Sends
    /// `(g_choice * r, h_choice * r)` and waits for the sender's masked messages.
    pub fn transfer<C: Channel>(
        self,
        channel: &mut C,
        choice: Bit,
    ) -> Result<P::Plaintext, ProtocolError> {
        let message = self.receiver_message(choice);
        channel
            .send(&message)
            .map_err(ProtocolError::communication("sending the receiver's message"))?;
        debug!("OT receiver sent its message");
        let reply: SenderMessage<G, P::Masked> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the sender's message"))?;
        self.decrypt(choice, &reply)
    }

    fn receiver_message(&self, choice: Bit) -> ReceiverMessage<G> {
        let (g_table, h_table) = &self.receiver.tables[choice as usize];
        let gh = G::Group::normalize_batch(&[g_table.multiply(&self.r), h_table.multiply(&self.r)]);
        ReceiverMessage { g: gh[0], h: gh[1] }
    }

    /// Validates the complete reply before unmasking, so a malformed branch that is not chosen is
    /// detected as well.
    fn decrypt(
        self,
        choice: Bit,
        reply: &SenderMessage<G, P::Masked>,
    ) -> Result<P::Plaintext, ProtocolError> {
        check_received_element(&reply.u0, "u0")?;
        check_received_element(&reply.u1, "u1")?;
        P::check_masked_pair(&reply.c0, &reply.c1)?;
        let (u, c) = reply.branch(choice);
        let key = (*u * self.r).into_affine();
        let x = P::unmask(c, &key)?;
        debug!("OT receiver unmasked the chosen message");
        Ok(x)
    }
}
