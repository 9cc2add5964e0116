//! OT that is fully simulatable against a malicious receiver or sender. Rather than trusting a CRS,
//! the receiver generates the tuple itself as
//!
//! `g0 = base, g1 = g0 * y, h0 = g0 * α, h1 = g1 * (α + 1)`
//!
//! and proves in zero-knowledge that `(g0, g1, h0, h1 - g1)` is a Diffie-Hellman tuple (witness
//! `α`). This implies `(g0, g1, h0, h1)` is not one, which is what the sender's privacy relies on.
//! The OTs are then run over the verified tuple as in the CRS model.

use crate::{
    channel::Channel,
    configs::{check_group_order, OTConfig},
    crs::Crs,
    ddh_ot::{
        receiver::{OTReceiver, ReceiverSession},
        sender::{OTSender, SenderSession},
    },
    error::{CheatAttempt, ProtocolError},
    payload::Payload,
    util::{cheat, is_group_member},
    zk::{
        sigma::{DhTupleSigma, DhTupleStatement},
        ZkPokProver, ZkPokVerifier,
    },
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::One;
use ark_std::{rand::RngCore, UniformRand};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct FullSimOTReceiver<G: AffineRepr, P> {
    receiver: OTReceiver<G, P>,
}

#[derive(Clone, Debug)]
pub struct FullSimOTSender<G: AffineRepr, P> {
    sender: OTSender<G, P>,
}

fn check_base<G: AffineRepr>(base: &G) -> Result<(), ProtocolError> {
    check_group_order::<G>()?;
    if !is_group_member(base) || base.is_zero() {
        return Err(ProtocolError::InputNotInGroup("base"));
    }
    Ok(())
}

/// The tuple is well-formed iff this is a DH tuple
fn tuple_statement<G: AffineRepr>(crs: &Crs<G>) -> DhTupleStatement<G> {
    DhTupleStatement {
        g: crs.g0,
        h: crs.g1,
        u: crs.h0,
        v: (crs.h1.into_group() - crs.g1).into_affine(),
    }
}

impl<G: AffineRepr, P: Payload<G>> FullSimOTReceiver<G, P> {
    /// Generate the tuple, send it and prove it well-formed
    pub fn setup<R: RngCore, C: Channel>(
        rng: &mut R,
        channel: &mut C,
        base: &G,
        ot_config: OTConfig,
    ) -> Result<Self, ProtocolError> {
        check_base(base)?;
        let y = G::ScalarField::rand(rng);
        let alpha = G::ScalarField::rand(rng);
        let g0 = *base;
        let g1 = (*base * y).into_affine();
        let h0 = (*base * alpha).into_affine();
        let h1 = (g1 * (alpha + G::ScalarField::one())).into_affine();
        let crs = Crs::from_elements(g0, g1, h0, h1)?;

        channel
            .send(&crs)
            .map_err(ProtocolError::communication("sending the OT tuple"))?;
        ZkPokProver::<G, DhTupleSigma>::new(*base).prove(
            rng,
            channel,
            &tuple_statement(&crs),
            &alpha,
        )?;
        debug!("full simulation OT receiver proved its tuple");
        Ok(Self {
            receiver: OTReceiver::new(crs, ot_config)?,
        })
    }

    pub fn preprocess<R: RngCore>(&self, rng: &mut R) -> ReceiverSession<'_, G, P> {
        self.receiver.preprocess(rng)
    }

    pub fn ot_receiver(&self) -> &OTReceiver<G, P> {
        &self.receiver
    }
}

impl<G: AffineRepr, P: Payload<G>> FullSimOTSender<G, P> {
    /// Receive the tuple and verify the receiver's proof. Fails with a cheat attempt if the tuple
    /// is malformed or the proof is rejected.
    pub fn setup<R: RngCore, C: Channel>(
        rng: &mut R,
        channel: &mut C,
        base: &G,
        ot_config: OTConfig,
    ) -> Result<Self, ProtocolError> {
        check_base(base)?;
        let crs: Crs<G> = channel
            .receive()
            .map_err(ProtocolError::communication("receiving the OT tuple"))?;
        crs.validate_received()?;
        if crs.g0 != *base {
            return Err(cheat(CheatAttempt::UnexpectedBase));
        }
        let accepted = ZkPokVerifier::<G, DhTupleSigma>::new(*base).verify(
            rng,
            channel,
            &tuple_statement(&crs),
        )?;
        if !accepted {
            return Err(cheat(CheatAttempt::InvalidTupleProof));
        }
        debug!("full simulation OT sender verified the tuple");
        Ok(Self {
            sender: OTSender::new(crs, ot_config)?,
        })
    }

    pub fn preprocess<R: RngCore, C: Channel>(
        &self,
        rng: &mut R,
        channel: &mut C,
    ) -> Result<SenderSession<G, P>, ProtocolError> {
        self.sender.preprocess(rng, channel)
    }

    pub fn ot_sender(&self) -> &OTSender<G, P> {
        &self.sender
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        payload::{BytePayload, GroupElementPayload},
        util::tests::run_two_party,
    };
    use ark_bls12_381::{Fr, G1Affine};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn full_simulation_ot() {
        let base = G1Affine::generator();
        let config = OTConfig::new(2).unwrap();
        let x0 = vec![7u8; 40];
        let x1 = vec![9u8; 40];

        let (sent, received) = run_two_party(
            |channel| {
                let mut rng = StdRng::seed_from_u64(1u64);
                let sender =
                    FullSimOTSender::<_, BytePayload>::setup(&mut rng, channel, &base, config)?;
                sender.preprocess(&mut rng, channel)?.transfer(channel, &x0, &x1)?;
                sender.preprocess(&mut rng, channel)?.transfer(channel, &x0, &x1)
            },
            |channel| {
                let mut rng = StdRng::seed_from_u64(2u64);
                let receiver =
                    FullSimOTReceiver::<_, BytePayload>::setup(&mut rng, channel, &base, config)?;
                let m1 = receiver.preprocess(&mut rng).transfer(channel, true)?;
                let m0 = receiver.preprocess(&mut rng).transfer(channel, false)?;
                Ok::<_, ProtocolError>((m0, m1, receiver))
            },
        );
        sent.unwrap();
        let (m0, m1, receiver) = received.unwrap();
        assert_eq!(m0, x0);
        assert_eq!(m1, x1);
        assert_eq!(receiver.ot_receiver().crs().g0, base);

        let mut rng = StdRng::seed_from_u64(0u64);
        let base = G1Affine::rand(&mut rng);
        let y0 = G1Affine::rand(&mut rng);
        let y1 = G1Affine::rand(&mut rng);
        let (sent, received) = run_two_party(
            |channel| {
                let mut rng = StdRng::seed_from_u64(1u64);
                let sender = FullSimOTSender::<_, GroupElementPayload>::setup(
                    &mut rng,
                    channel,
                    &base,
                    OTConfig::single(),
                )?;
                sender.preprocess(&mut rng, channel)?.transfer(channel, &y0, &y1)
            },
            |channel| {
                let mut rng = StdRng::seed_from_u64(2u64);
                let receiver = FullSimOTReceiver::<_, GroupElementPayload>::setup(
                    &mut rng,
                    channel,
                    &base,
                    OTConfig::single(),
                )?;
                receiver.preprocess(&mut rng).transfer(channel, true)
            },
        );
        sent.unwrap();
        assert_eq!(received.unwrap(), y1);
    }

    /// A receiver that sends a DH tuple, which would let it learn both messages, cannot prove it
    /// well-formed
    #[test]
    fn dh_tuple_is_rejected() {
        let base = G1Affine::generator();
        let (sent, _) = run_two_party(
            |channel| {
                let mut rng = StdRng::seed_from_u64(1u64);
                FullSimOTSender::<_, BytePayload>::setup(
                    &mut rng,
                    channel,
                    &base,
                    OTConfig::single(),
                )
                .map(|_| ())
            },
            |channel| {
                let mut rng = StdRng::seed_from_u64(2u64);
                let y = Fr::rand(&mut rng);
                let alpha = Fr::rand(&mut rng);
                let g1 = (base * y).into_affine();
                let crs = Crs {
                    g0: base,
                    g1,
                    h0: (base * alpha).into_affine(),
                    h1: (g1 * alpha).into_affine(),
                };
                channel.send(&crs).unwrap();
                // The proof is not an error for the prover, the verifier just rejects it
                ZkPokProver::<_, DhTupleSigma>::new(base)
                    .prove(&mut rng, channel, &tuple_statement(&crs), &alpha)
                    .unwrap();
            },
        );
        assert!(matches!(
            sent.unwrap_err(),
            ProtocolError::CheatAttempt(CheatAttempt::InvalidTupleProof)
        ));
    }

    #[test]
    fn unexpected_tuple() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let base = G1Affine::generator();
        let other_base = G1Affine::rand(&mut rng);

        let (sent, received) = run_two_party(
            |channel| {
                let mut rng = StdRng::seed_from_u64(1u64);
                FullSimOTSender::<_, BytePayload>::setup(
                    &mut rng,
                    channel,
                    &base,
                    OTConfig::single(),
                )
                .map(|_| ())
            },
            |channel| {
                let mut rng = StdRng::seed_from_u64(2u64);
                FullSimOTReceiver::<_, BytePayload>::setup(
                    &mut rng,
                    channel,
                    &other_base,
                    OTConfig::single(),
                )
                .map(|_| ())
            },
        );
        assert!(matches!(
            sent.unwrap_err(),
            ProtocolError::CheatAttempt(CheatAttempt::UnexpectedBase)
        ));
        // The sender aborted so the receiver's proof could not complete
        assert!(received.is_err());

        let (sent, _) = run_two_party(
            |channel| {
                let mut rng = StdRng::seed_from_u64(1u64);
                FullSimOTSender::<_, BytePayload>::setup(
                    &mut rng,
                    channel,
                    &base,
                    OTConfig::single(),
                )
                .map(|_| ())
            },
            |channel| {
                let crs = Crs {
                    g0: base,
                    g1: base,
                    h0: base,
                    h1: G1Affine::zero(),
                };
                channel.send(&crs).unwrap();
            },
        );
        assert!(matches!(
            sent.unwrap_err(),
            ProtocolError::CheatAttempt(CheatAttempt::IdentityElement("h1"))
        ));

        let mut rng = StdRng::seed_from_u64(0u64);
        let (mut chan, _other) = crate::channel::in_memory_channel_pair();
        let err = FullSimOTReceiver::<_, BytePayload>::setup(
            &mut rng,
            &mut chan,
            &G1Affine::zero(),
            OTConfig::single(),
        )
        .unwrap_err();
        assert!(matches!(err, ProtocolError::InputNotInGroup("base")));
    }
}
