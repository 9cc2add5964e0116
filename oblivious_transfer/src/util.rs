use crate::error::{CheatAttempt, ProtocolError};
use ark_ec::AffineRepr;
use ark_std::{cfg_into_iter, vec::Vec};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[inline]
pub fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    cfg_into_iter!(a)
        .zip(cfg_into_iter!(b))
        .map(|(a, b)| a ^ b)
        .collect()
}

#[inline]
pub fn xor_in_place(a: &mut [u8], b: &[u8]) {
    cfg_into_iter!(a)
        .zip(cfg_into_iter!(b))
        .for_each(|(a, b)| *a ^= *b)
}

/// Returns true if `element` is on the curve and in the prime order subgroup
#[inline]
pub fn is_group_member<G: AffineRepr>(element: &G) -> bool {
    element.check().is_ok()
}

/// Membership check of a value received from the other party
pub fn check_received_element<G: AffineRepr>(
    element: &G,
    name: &'static str,
) -> Result<(), ProtocolError> {
    if is_group_member(element) {
        Ok(())
    } else {
        Err(cheat(CheatAttempt::ElementNotInGroup(name)))
    }
}

/// Log a detected cheat attempt and convert it into an error
pub fn cheat(reason: CheatAttempt) -> ProtocolError {
    tracing::warn!(%reason, "cheat attempt detected");
    ProtocolError::CheatAttempt(reason)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::channel::{in_memory_channel_pair, InMemoryChannel};
    use ark_bls12_381::{Fq, G1Affine};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };

    /// A point with random coordinates, almost certainly not on the curve
    pub fn non_member(rng: &mut StdRng) -> G1Affine {
        loop {
            let p = G1Affine::new_unchecked(Fq::rand(rng), Fq::rand(rng));
            if !is_group_member(&p) {
                return p;
            }
        }
    }

    /// Run the 2 parties on separate threads connected by an in-memory channel. Each party's end of
    /// the channel is dropped as soon as it returns so the other party never blocks forever.
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

    #[test]
    fn test_xor() {
        let a = [0, 1, 2, 3, 4];
        let b = [5, 6, 7, 8, 9];
        let c = xor(&a, &b);
        let mut d = a;
        xor_in_place(&mut d, &b);
        assert_eq!(c, d);
        assert_eq!(xor(&c, &b), a.to_vec());
    }

    #[test]
    fn membership() {
        let mut rng = StdRng::seed_from_u64(0u64);
        assert!(is_group_member(&G1Affine::generator()));
        assert!(is_group_member(&G1Affine::zero()));
        assert!(is_group_member(&G1Affine::rand(&mut rng)));

        let p = non_member(&mut rng);
        assert!(check_received_element(&G1Affine::rand(&mut rng), "u0").is_ok());
        let err = check_received_element(&p, "u0").unwrap_err();
        assert!(err.is_cheat_attempt());
        assert!(matches!(
            err,
            ProtocolError::CheatAttempt(CheatAttempt::ElementNotInGroup("u0"))
        ));
    }
}
