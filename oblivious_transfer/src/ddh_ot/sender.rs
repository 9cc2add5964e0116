use crate::{
    channel::Channel,
    configs::OTConfig,
    crs::Crs,
    ddh_ot::messages::{ReceiverMessage, SenderMessage},
    error::{CheatAttempt, ProtocolError},
    payload::Payload,
    util::{check_received_element, cheat},
    Bit,
};
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::PrimeField;
use ark_std::{marker::PhantomData, rand::RngCore};
use dock_crypto_utils::msm::WindowTable;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Sender of 1-of-2 OTs over a fixed CRS. Can run any number of OTs, each with its own
/// [`SenderSession`].
#[derive(Clone, Debug)]
pub struct OTSender<G: AffineRepr, P> {
    crs: Crs<G>,
    /// Tables for `(g_b, h_b)` indexed by branch `b`
    tables: [(WindowTable<G::Group>, WindowTable<G::Group>); 2],
    _payload: PhantomData<P>,
}

/// The 2 rerandomizations `(u_b, v_b)` of the receiver's message. `v_b` is the key masking `x_b`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SenderSession<G: AffineRepr, P> {
    u0: G,
    v0: G,
    u1: G,
    v1: G,
    #[zeroize(skip)]
    _payload: PhantomData<P>,
}

/// Fresh exponents `(s_b, t_b)` for both branches
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct RandExponents<F: PrimeField> {
    s0: F,
    t0: F,
    s1: F,
    t1: F,
}

impl<F: PrimeField> RandExponents<F> {
    pub(crate) fn new<R: RngCore>(rng: &mut R) -> Self {
        Self {
            s0: F::rand(rng),
            t0: F::rand(rng),
            s1: F::rand(rng),
            t1: F::rand(rng),
        }
    }
}

impl<G: AffineRepr, P: Payload<G>> OTSender<G, P> {
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

    /// Receive the receiver's message `(g, h)` and rerandomize it for both branches
    pub fn preprocess<R: RngCore, C: Channel>(
        &self,
        rng: &mut R,
        channel: &mut C,
    ) -> Result<SenderSession<G, P>, ProtocolError> {
        let exponents = RandExponents::new(rng);
        let message: ReceiverMessage<G> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the receiver's message"))?;
        self.start_session(&exponents, &message)
    }

    fn start_session(
        &self,
        exponents: &RandExponents<G::ScalarField>,
        message: &ReceiverMessage<G>,
    ) -> Result<SenderSession<G, P>, ProtocolError> {
        check_received_element(&message.g, "g")?;
        check_received_element(&message.h, "h")?;
        // With `g = h = 1` both branches would be DH tuples and both messages would leak
        if message.g.is_zero() {
            return Err(cheat(CheatAttempt::IdentityElement("g")));
        }
        if message.h.is_zero() {
            return Err(cheat(CheatAttempt::IdentityElement("h")));
        }
        let (u0, v0) = self.rand(false, message, &exponents.s0, &exponents.t0);
        let (u1, v1) = self.rand(true, message, &exponents.s1, &exponents.t1);
        let uv = G::Group::normalize_batch(&[u0, v0, u1, v1]);
        debug!("OT sender rerandomized the receiver's message");
        Ok(SenderSession {
            u0: uv[0],
            v0: uv[1],
            u1: uv[2],
            v1: uv[3],
            _payload: PhantomData,
        })
    }

    /// `RAND(g_b, g, h_b, h) = (g_b * s + h_b * t, g * s + h * t)`. When `(g, h) = (g_b * r, h_b * r)`
    /// then `v = u * r`, otherwise `v` is uniform and independent of `u`.
    fn rand(
        &self,
        branch: Bit,
        message: &ReceiverMessage<G>,
        s: &G::ScalarField,
        t: &G::ScalarField,
    ) -> (G::Group, G::Group) {
        let (g_table, h_table) = &self.tables[branch as usize];
        let u = g_table.multiply(s) + h_table.multiply(t);
        let v = G::Group::msm_unchecked(&[message.g, message.h], &[*s, *t]);
        (u, v)
    }
}

impl<G: AffineRepr, P: Payload<G>> SenderSession<G, P> {
    /// Send `x0` and `x1` masked such that the receiver can unmask only the one it chose
    pub fn transfer<C: Channel>(
        self,
        channel: &mut C,
        x0: &P::Plaintext,
        x1: &P::Plaintext,
    ) -> Result<(), ProtocolError> {
        let message = self.encrypt(x0, x1)?;
        channel
            .send(&message)
            .map_err(ProtocolError::communication("sending the masked messages"))?;
        debug!("OT sender sent the masked messages");
        Ok(())
    }

    fn encrypt(
        &self,
        x0: &P::Plaintext,
        x1: &P::Plaintext,
    ) -> Result<SenderMessage<G, P::Masked>, ProtocolError> {
        P::check_input_pair(x0, x1)?;
        Ok(SenderMessage {
            u0: self.u0,
            c0: P::mask(x0, &self.v0)?,
            u1: self.u1,
            c1: P::mask(x1, &self.v1)?,
        })
    }
}
