use num_bigint::{BigUint, RandPrime};
use num_traits::One;
use signature::rand_core::CryptoRngCore;

mod components;
mod keypair;
mod secret_number;

pub(crate) use self::components::common as common_components;
pub(crate) use self::components::public as public_component;
pub(crate) use self::keypair::keypair;
pub(crate) use self::secret_number::SecretNumbers;

/// Number of Miller-Rabin rounds used when testing candidates for p
const MR_ROUNDS: usize = 64;

/// Calculate the upper and lower bounds for generating values like p or q
#[inline]
fn calculate_bounds(size: u32) -> (BigUint, BigUint) {
    let lower = BigUint::one() << (size as usize - 1);
    let upper = BigUint::one() << size as usize;

    (lower, upper)
}

/// Generate a prime number using a cryptographically secure pseudo-random number generator
#[inline]
fn generate_prime<R: CryptoRngCore + ?Sized>(bit_length: u32, rng: &mut R) -> BigUint {
    rng.gen_prime(bit_length as usize)
}
