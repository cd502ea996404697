//!
//! Raw DSA verification over a pre-computed digest
//!

use crate::{Components, Error, Result, Signature, sign::truncated_digest};
use num_bigint::{BigUint, ModInverse, ToBigUint};
use num_traits::Zero;

/// Verify `signature` over the digest `hash` with the public component `y`
///
/// Returns `Ok(false)` for a well-formed signature which doesn't match, and
/// `Err(Error::Crypto)` when the key can't be used for verification.
pub(crate) fn verify_prehashed(
    components: &Components,
    y: &BigUint,
    hash: &[u8],
    signature: &Signature,
) -> Result<bool> {
    if !components.is_valid() {
        return Err(Error::Crypto);
    }

    let (p, q, g) = (components.p(), components.q(), components.g());
    let (r, s) = (signature.r(), signature.s());

    if r.is_zero() || s.is_zero() || r >= q || s >= q {
        return Ok(false);
    }

    let w = s
        .clone()
        .mod_inverse(q)
        .and_then(|w| w.to_biguint())
        .ok_or(Error::Crypto)?;

    let z = truncated_digest(q, hash);
    let u1 = (z * &w) % q;
    let u2 = (r * &w) % q;

    let v = ((g.modpow(&u1, p) * y.modpow(&u2, p)) % p) % q;

    Ok(v == *r)
}
