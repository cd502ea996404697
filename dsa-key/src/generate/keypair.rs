//!
//! Generate a DSA keypair
//!

use crate::{Components, generate::components};
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use signature::rand_core::CryptoRngCore;
use zeroize::Zeroizing;

/// Generate a new keypair
///
/// # Returns
///
/// Tuple of the public component y and the private component x
#[inline]
pub(crate) fn keypair<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    components: &Components,
) -> (BigUint, Zeroizing<BigUint>) {
    let x = Zeroizing::new(rng.gen_biguint_range(&BigUint::one(), components.q()));
    let y = components::public(components, &x);

    (y, x)
}
