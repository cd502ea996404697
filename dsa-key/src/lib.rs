#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]
#![doc = include_str!("../README.md")]

//!
//! # Examples
//!
//! Generate a key, sign a digest and verify it with the public half
//!
#![cfg_attr(feature = "getrandom", doc = "```")]
#![cfg_attr(not(feature = "getrandom"), doc = "```ignore")]
//! # #![allow(deprecated)]
//! # use dsa_key::{DsaKey, KeySize};
//! # use sha2::{Digest, Sha256};
//! # fn main() -> dsa_key::Result<()> {
//! let mut rng = rand_core::OsRng;
//! let key = DsaKey::generate(&mut rng, KeySize::DSA_1024_160);
//!
//! let digest = Sha256::digest(b"hello world");
//! let signature = key.sign(&digest)?;
//!
//! let public = key.public_key()?;
//! assert!(public.verify(&digest, &signature)?);
//! # Ok(())
//! # }
//! ```
//!
//! Export a private key as encrypted PEM and read it back
//!
#![cfg_attr(feature = "getrandom", doc = "```")]
#![cfg_attr(not(feature = "getrandom"), doc = "```ignore")]
//! # use dsa_key::{BigUint, DsaKey, PemCipher};
//! # fn main() -> dsa_key::Result<()> {
//! let mut key = DsaKey::new();
//! key.set_pqg(BigUint::from(23u8), BigUint::from(11u8), BigUint::from(4u8))
//!     .set_key(BigUint::from(8u8), Some(BigUint::from(7u8)));
//!
//! let pem = key.export(Some(PemCipher::Aes256Cbc), Some(b"secret".as_slice()))?;
//! let decoded = DsaKey::from_bytes(pem.as_bytes(), Some(b"secret".as_slice()))?;
//! assert_eq!(decoded, key);
//! # Ok(())
//! # }
//! ```
//!

extern crate alloc;

pub use crate::{
    algorithm::{Algorithm, DSA_OID},
    cipher::PemCipher,
    components::Components,
    error::{Error, Result},
    key::{DsaKey, KeySource},
    params::{Component, Params},
    sig::Signature,
    size::KeySize,
};

pub use num_bigint::BigUint;
pub use pkcs8;
pub use signature;

mod algorithm;
mod asn1;
mod cipher;
mod components;
mod decode;
mod encode;
mod error;
mod generate;
mod key;
mod params;
mod pem;
mod sig;
mod sign;
mod size;
mod verify;

/// Longest passphrase accepted for encrypted private keys, in bytes.
pub const MAX_PASSPHRASE_LEN: usize = 1024;

/// Largest modulus size accepted for generation, in bits.
pub const MAX_MODULUS_BITS: u32 = 16384;

/// Returns a `BigUint` with the value 2
#[inline]
fn two() -> BigUint {
    BigUint::from(2_u8)
}
