//!
//! Raw DSA signing over a pre-computed digest
//!

use crate::{Components, Error, Result, Signature, generate::SecretNumbers};
use num_bigint::BigUint;
use num_traits::Zero;
use signature::rand_core::CryptoRngCore;

/// Give up after this many degenerate (zero r or s) signatures
const MAX_RETRIES: usize = 64;

/// Sign the digest `hash` with the private component `x`
///
/// The digest is truncated to the byte length of q, no hashing is done here.
pub(crate) fn sign_prehashed<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    components: &Components,
    x: &BigUint,
    hash: &[u8],
) -> Result<Signature> {
    if !components.is_valid() || x.is_zero() {
        return Err(Error::Crypto);
    }

    let (p, q, g) = (components.p(), components.q(), components.g());
    let z = truncated_digest(q, hash);
    let mut secret_numbers = SecretNumbers::new(rng, q, x, hash);

    for _ in 0..MAX_RETRIES {
        let (k, inv_k) = secret_numbers.next().ok_or(Error::Crypto)?;

        let r = g.modpow(&k, p) % q;
        let s = (&*inv_k * (&z + x * &r)) % q;

        // r or s might be 0 (very unlikely but possible)
        if let Some(signature) = Signature::from_components(r, s) {
            return Ok(signature);
        }
    }

    Err(Error::Crypto)
}

/// Leftmost bytes of the digest, as many as q has
pub(crate) fn truncated_digest(q: &BigUint, hash: &[u8]) -> BigUint {
    let n = q.bits().div_ceil(8);
    BigUint::from_bytes_be(&hash[..n.min(hash.len())])
}

#[cfg(test)]
mod tests {
    use super::{sign_prehashed, truncated_digest};
    use crate::{Components, Error};
    use num_bigint::BigUint;
    use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

    #[test]
    fn digest_is_truncated_to_q() {
        let q = BigUint::from(0xffffu32);
        assert_eq!(truncated_digest(&q, &[1, 2, 3, 4]), BigUint::from(0x0102u32));
        assert_eq!(truncated_digest(&q, &[7]), BigUint::from(7u8));
        assert_eq!(truncated_digest(&q, &[]), BigUint::from(0u8));
    }

    #[test]
    fn degenerate_components_fail() {
        let mut rng = ChaCha8Rng::from_seed([1; 32]);
        let components = Components::from_components(
            BigUint::from(0u8),
            BigUint::from(11u8),
            BigUint::from(4u8),
        );

        assert_eq!(
            sign_prehashed(&mut rng, &components, &BigUint::from(3u8), b"digest"),
            Err(Error::Crypto)
        );
    }
}
