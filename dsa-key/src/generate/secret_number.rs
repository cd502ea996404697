//!
//! Generate a per-message secret number
//!

use alloc::{vec, vec::Vec};
use num_bigint::{BigUint, ModInverse, ToBigUint};
use num_traits::Zero;
use rfc6979::HmacDrbg;
use sha2::Sha256;
use signature::rand_core::CryptoRngCore;
use zeroize::{Zeroize, Zeroizing};

/// Amount of fresh entropy mixed into the generator
const ENTROPY_LEN: usize = 32;

/// Give up after this many candidates
const MAX_ATTEMPTS: usize = 4096;

/// Stream of per-message secret numbers `k` together with their inverse mod q
///
/// The HMAC-DRBG of RFC 6979 is seeded with the private component, the
/// reduced digest and fresh entropy from the caller's RNG ("hedged" nonces),
/// so a weak RNG alone doesn't leak the private key.
pub(crate) struct SecretNumbers<'q> {
    drbg: HmacDrbg<Sha256>,
    q: &'q BigUint,
    buffer: Vec<u8>,
}

impl<'q> SecretNumbers<'q> {
    pub(crate) fn new<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        q: &'q BigUint,
        x: &BigUint,
        hash: &[u8],
    ) -> Self {
        let k_size = q.bits().div_ceil(8);
        let hash = reduce_hash(q, hash);

        let mut entropy = Zeroizing::new(x.to_bytes_be());
        let mut extra = [0u8; ENTROPY_LEN];
        rng.fill_bytes(&mut extra);
        entropy.extend_from_slice(&extra);
        extra.zeroize();

        Self {
            drbg: HmacDrbg::<Sha256>::new(&entropy, &hash, &[]),
            q,
            buffer: vec![0; k_size],
        }
    }

    /// Draw the next secret number k in `[1, q)` and its modular inverse
    pub(crate) fn next(&mut self) -> Option<(Zeroizing<BigUint>, Zeroizing<BigUint>)> {
        let excess = self.buffer.len() * 8 - self.q.bits();

        for _ in 0..MAX_ATTEMPTS {
            self.drbg.fill_bytes(&mut self.buffer);

            let k = Zeroizing::new(BigUint::from_bytes_be(&self.buffer) >> excess);
            if k.is_zero() || *k >= *self.q {
                continue;
            }

            let inv_k = (*k).clone().mod_inverse(self.q).and_then(|inv| inv.to_biguint());
            if let Some(inv_k) = inv_k {
                self.buffer.as_mut_slice().zeroize();
                return Some((k, Zeroizing::new(inv_k)));
            }
        }

        None
    }
}

impl Drop for SecretNumbers<'_> {
    fn drop(&mut self) {
        self.buffer.as_mut_slice().zeroize();
    }
}

/// Reduce the hash into an RFC-6979 appropriate form
fn reduce_hash(q: &BigUint, hash: &[u8]) -> Vec<u8> {
    let q_byte_len = q.bits().div_ceil(8);

    let hash_len = hash.len().min(q_byte_len);
    let hash = BigUint::from_bytes_be(&hash[..hash_len]);
    let mut reduced = (hash % q).to_bytes_be();

    while reduced.len() < q_byte_len {
        reduced.insert(0, 0);
    }

    reduced
}

#[cfg(test)]
mod tests {
    use super::{SecretNumbers, reduce_hash};
    use num_bigint::BigUint;
    use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

    #[test]
    fn reduced_hash_is_padded() {
        let q = BigUint::from(0xff01u32);
        assert_eq!(reduce_hash(&q, &[0x00, 0x05, 0x99]), [0x00u8, 0x05]);
        assert_eq!(reduce_hash(&q, &[0xff, 0x02]), [0x00u8, 0x01]);
    }

    #[test]
    fn secret_numbers_are_in_range() {
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        let q = BigUint::from(1_000_003u32);
        let x = BigUint::from(12_345u32);

        let mut numbers = SecretNumbers::new(&mut rng, &q, &x, b"digest");
        for _ in 0..16 {
            let (k, inv_k) = numbers.next().unwrap();
            assert!(*k < q);
            assert_eq!((&*k * &*inv_k) % &q, BigUint::from(1u8));
        }
    }

    #[test]
    fn buffer_keeps_its_length() {
        let mut rng = ChaCha8Rng::from_seed([9; 32]);
        let q = BigUint::from(11u8);
        let x = BigUint::from(7u8);

        let mut numbers = SecretNumbers::new(&mut rng, &q, &x, &[3]);
        for _ in 0..64 {
            assert!(numbers.next().is_some());
            assert_eq!(numbers.buffer.len(), 1);
        }
    }
}
