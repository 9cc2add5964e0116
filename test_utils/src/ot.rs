use crate::G1;
use ark_std::rand::{prelude::StdRng, RngCore};
use blake2::Blake2b512;
use oblivious_transfer_ddh::{
    channel::{in_memory_channel_pair, InMemoryChannel},
    crs::Crs,
    Bit, Message,
};

/// Run the 2 parties on separate threads connected by an in-memory channel. A party's end of the
/// channel is closed as soon as it returns so the other party does not block forever when one
/// aborts.
pub fn run_two_party<A, B, RA, RB>(party_a: A, party_b: B) -> (RA, RB)
where
    A: FnOnce(&mut InMemoryChannel) -> RA + Send,
    B: FnOnce(&mut InMemoryChannel) -> RB,
    RA: Send,
{
    let (mut chan_a, chan_b) = in_memory_channel_pair();
    std::thread::scope(|s| {
        let handle = s.spawn(move || party_a(&mut chan_a));
        let rb = {
            let mut chan_b = chan_b;
            party_b(&mut chan_b)
        };
        (handle.join().unwrap(), rb)
    })
}

/// `n` channel pairs, the first of each pair in the first vector
pub fn channel_pairs(n: usize) -> (Vec<InMemoryChannel>, Vec<InMemoryChannel>) {
    (0..n).map(|_| in_memory_channel_pair()).unzip()
}

pub fn crs_for_tests(label: &[u8]) -> Crs<G1> {
    Crs::new::<Blake2b512>(label).unwrap()
}

pub fn random_message(rng: &mut StdRng, size: usize) -> Message {
    let mut bytes = vec![0u8; size];
    rng.fill_bytes(&mut bytes);
    bytes
}

pub fn random_message_pairs(rng: &mut StdRng, count: usize, size: usize) -> Vec<(Message, Message)> {
    (0..count)
        .map(|_| (random_message(rng, size), random_message(rng, size)))
        .collect()
}

pub fn random_choices(rng: &mut StdRng, count: usize) -> Vec<Bit> {
    (0..count).map(|_| rng.next_u32() % 2 == 1).collect()
}

/// Check that the receiver got exactly the chosen messages
pub fn check_ot_outputs<T: PartialEq + std::fmt::Debug>(
    choices: &[Bit],
    messages: &[(T, T)],
    outputs: &[T],
) {
    assert_eq!(choices.len(), outputs.len());
    for i in 0..choices.len() {
        if choices[i] {
            assert_eq!(messages[i].1, outputs[i]);
            assert_ne!(messages[i].0, outputs[i]);
        } else {
            assert_eq!(messages[i].0, outputs[i]);
            assert_ne!(messages[i].1, outputs[i]);
        }
    }
}
