//! Many OTs over one CRS, each on its own channel. With the `parallel` feature every session runs
//! on its own scoped thread, otherwise the sessions run one after another in channel order. Each
//! session gets its own RNG seeded from the caller's.
//!
//! Sessions block on their channel, so they are not run on the rayon pool: with fewer workers than
//! sessions the waiting sessions would occupy every worker while their counterparts never start.

use crate::{
    channel::Channel,
    ddh_ot::{receiver::OTReceiver, sender::OTSender},
    error::ProtocolError,
    payload::Payload,
    Bit,
};
use ark_ec::AffineRepr;
use ark_std::{
    rand::{rngs::StdRng, RngCore, SeedableRng},
    vec::Vec,
};
use tracing::debug;

fn session_seeds<R: RngCore>(rng: &mut R, n: usize) -> Vec<[u8; 32]> {
    (0..n)
        .map(|_| {
            let mut seed = [0u8; 32];
            rng.fill_bytes(&mut seed);
            seed
        })
        .collect()
}

/// Run `session` once per channel with the matching seed and input
fn run_sessions<C, I, T, F>(
    channels: &mut [C],
    seeds: Vec<[u8; 32]>,
    inputs: &[I],
    session: F,
) -> Result<Vec<T>, ProtocolError>
where
    C: Channel + Send,
    I: Sync,
    T: Send,
    F: Fn(&mut C, &mut StdRng, &I) -> Result<T, ProtocolError> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        std::thread::scope(|s| {
            let session = &session;
            let handles = channels
                .iter_mut()
                .zip(seeds)
                .zip(inputs)
                .map(|((channel, seed), input)| {
                    s.spawn(move || {
                        let mut rng = StdRng::from_seed(seed);
                        session(channel, &mut rng, input)
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    #[cfg(not(feature = "parallel"))]
    {
        channels
            .iter_mut()
            .zip(seeds)
            .zip(inputs)
            .map(|((channel, seed), input)| {
                let mut rng = StdRng::from_seed(seed);
                session(channel, &mut rng, input)
            })
            .collect()
    }
}

/// Run `choices.len()` OTs as the receiver, the i-th over `channels[i]` with choice `choices[i]`.
/// Fails with the first error of any session.
pub fn receive_batch<G, P, C, R>(
    receiver: &OTReceiver<G, P>,
    rng: &mut R,
    channels: &mut [C],
    choices: &[Bit],
) -> Result<Vec<P::Plaintext>, ProtocolError>
where
    G: AffineRepr,
    P: Payload<G>,
    C: Channel + Send,
    R: RngCore,
{
    if channels.len() != choices.len() {
        return Err(ProtocolError::IncorrectNumberOfChoices(
            channels.len(),
            choices.len(),
        ));
    }
    let seeds = session_seeds(rng, channels.len());
    let outputs = run_sessions(channels, seeds, choices, |channel, rng, choice| {
        receiver.preprocess(rng).transfer(channel, *choice)
    })?;
    debug!(count = outputs.len(), "OT receiver finished batch");
    Ok(outputs)
}

/// Run `messages.len()` OTs as the sender, the i-th over `channels[i]` with messages `messages[i]`
pub fn send_batch<G, P, C, R>(
    sender: &OTSender<G, P>,
    rng: &mut R,
    channels: &mut [C],
    messages: &[(P::Plaintext, P::Plaintext)],
) -> Result<(), ProtocolError>
where
    G: AffineRepr,
    P: Payload<G>,
    C: Channel + Send,
    R: RngCore,
{
    if channels.len() != messages.len() {
        return Err(ProtocolError::IncorrectNumberOfMessagePairs(
            channels.len(),
            messages.len(),
        ));
    }
    // Fail before any communication rather than part way through the batch
    for (x0, x1) in messages {
        P::check_input_pair(x0, x1)?;
    }
    let seeds = session_seeds(rng, channels.len());
    run_sessions(channels, seeds, messages, |channel, rng, (x0, x1)| {
        sender.preprocess(rng, channel)?.transfer(channel, x0, x1)
    })?;
    debug!(count = messages.len(), "OT sender finished batch");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        channel::{in_memory_channel_pair, InMemoryChannel},
        configs::OTConfig,
        crs::Crs,
        payload::BytePayload,
    };
    use ark_bls12_381::G1Affine;
    use std::time::Duration;

    fn channels(n: usize) -> (Vec<InMemoryChannel>, Vec<InMemoryChannel>) {
        (0..n)
            .map(|_| {
                let (a, b) = in_memory_channel_pair();
                // A stuck batch fails with a timeout instead of hanging the test run
                (
                    a.with_timeout(Duration::from_secs(60)),
                    b.with_timeout(Duration::from_secs(60)),
                )
            })
            .unzip()
    }

    #[test]
    fn more_sessions_than_pool_threads() {
        let mut rng = StdRng::seed_from_u64(0u64);
        #[cfg(feature = "parallel")]
        let n = rayon::current_num_threads() + 3;
        #[cfg(not(feature = "parallel"))]
        let n = 5;

        let crs = Crs::<G1Affine>::random(&mut rng).unwrap();
        let config = OTConfig::new(n as u16).unwrap();
        let receiver = OTReceiver::<_, BytePayload>::new(crs.clone(), config).unwrap();
        let sender = OTSender::<_, BytePayload>::new(crs, config).unwrap();
        let messages = (0..n)
            .map(|i| (vec![i as u8; 24], vec![i as u8 + 100; 24]))
            .collect::<Vec<_>>();
        let choices = (0..n).map(|i| i % 2 == 1).collect::<Vec<_>>();
        let (mut sender_chans, mut receiver_chans) = channels(n);

        let (sent, received) = std::thread::scope(|s| {
            let handle = s.spawn(|| {
                let mut rng = StdRng::seed_from_u64(1u64);
                send_batch(&sender, &mut rng, &mut sender_chans, &messages)
            });
            let mut rng = StdRng::seed_from_u64(2u64);
            let received = receive_batch(&receiver, &mut rng, &mut receiver_chans, &choices);
            (handle.join().unwrap(), received)
        });
        sent.unwrap();
        let received = received.unwrap();
        assert_eq!(received.len(), n);
        for (i, m) in received.iter().enumerate() {
            let expected = if choices[i] {
                &messages[i].1
            } else {
                &messages[i].0
            };
            assert_eq!(m, expected);
        }
    }

    #[test]
    fn empty_batch() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let crs = Crs::<G1Affine>::random(&mut rng).unwrap();
        let receiver = OTReceiver::<_, BytePayload>::new(crs.clone(), OTConfig::single()).unwrap();
        let sender = OTSender::<_, BytePayload>::new(crs, OTConfig::single()).unwrap();
        let mut chans: Vec<InMemoryChannel> = vec![];
        assert!(receive_batch(&receiver, &mut rng, &mut chans, &[])
            .unwrap()
            .is_empty());
        send_batch(&sender, &mut rng, &mut chans, &[]).unwrap();
    }
}
