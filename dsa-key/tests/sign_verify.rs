// We abused the deprecated attribute for unsecure key sizes
// But we want to use those small key sizes for fast tests
#![allow(deprecated)]

use digest::Digest;
use dsa_key::{BigUint, Component, DsaKey, Error, KeySize, Signature};
use hex_literal::hex;
use num_traits::{One, Zero};
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use sha1::Sha1;
use sha2::Sha256;
use signature::{
    DigestVerifier, RandomizedDigestSigner, SignatureEncoding,
    hazmat::{PrehashVerifier, RandomizedPrehashSigner},
};

const PRIVATE_PEM: &str = include_str!("pems/private.pem");
const PUBLIC_PEM: &str = include_str!("pems/public.pem");
const OPENSSL_SIGNATURE: &[u8] = include_bytes!("pems/openssl_sig.der");

/// SHA-1 of "abc"
const ABC_SHA1: [u8; 20] = hex!("a9993e364706816aba3e25717850c26c9cd0d89d");

fn private_key() -> DsaKey {
    DsaKey::from_bytes(PRIVATE_PEM.as_bytes(), None).unwrap()
}

fn public_key() -> DsaKey {
    DsaKey::from_bytes(PUBLIC_PEM.as_bytes(), None).unwrap()
}

fn signature_der(r: BigUint, s: BigUint) -> Vec<u8> {
    let r = r.to_bytes_be();
    let s = s.to_bytes_be();
    let mut body = Vec::new();

    for value in [r, s] {
        let pad = value[0] & 0x80 != 0;
        body.push(0x02);
        body.push((value.len() + usize::from(pad)) as u8);
        if pad {
            body.push(0);
        }
        body.extend_from_slice(&value);
    }

    let mut der = vec![0x30, body.len() as u8];
    der.extend(body);
    der
}

#[test]
fn verify_openssl_signature() {
    assert_eq!(public_key().verify(&ABC_SHA1, OPENSSL_SIGNATURE), Ok(true));
    assert_eq!(private_key().verify(&ABC_SHA1, OPENSSL_SIGNATURE), Ok(true));

    let mut other_digest = ABC_SHA1;
    other_digest[0] ^= 1;
    assert_eq!(public_key().verify(&other_digest, OPENSSL_SIGNATURE), Ok(false));
}

#[test]
fn sign_abc_verify_abd() {
    let mut rng = ChaCha8Rng::from_seed([1; 32]);
    let key = private_key();

    let signature = key.sign_with_rng(&mut rng, b"abc").unwrap();
    assert_eq!(key.verify(b"abc", &signature), Ok(true));
    assert_eq!(key.verify(b"abd", &signature), Ok(false));
}

#[test]
fn long_digests_are_truncated() {
    let mut rng = ChaCha8Rng::from_seed([2; 32]);
    let key = private_key();

    // q has 224 bits, so only the first 28 bytes of a SHA-256 digest count
    let digest = Sha256::digest(b"truncated");
    let signature = key.sign_with_rng(&mut rng, &digest).unwrap();

    let mut tail_changed = digest;
    tail_changed[31] ^= 0xff;
    assert_eq!(public_key().verify(&tail_changed, &signature), Ok(true));

    let mut head_changed = digest;
    head_changed[0] ^= 0xff;
    assert_eq!(public_key().verify(&head_changed, &signature), Ok(false));
}

#[test]
fn sign_requires_q_and_private_key() {
    let mut rng = ChaCha8Rng::from_seed([3; 32]);

    let mut key = DsaKey::new();
    key.set_key(BigUint::from(8u8), Some(BigUint::from(7u8)));
    assert_eq!(
        key.sign_with_rng(&mut rng, &ABC_SHA1),
        Err(Error::IncompleteKey {
            component: Component::Q
        })
    );

    assert_eq!(
        public_key().sign_with_rng(&mut rng, &ABC_SHA1),
        Err(Error::PrivateKeyRequired)
    );
}

#[test]
fn malformed_signatures_are_errors() {
    let key = public_key();

    assert_eq!(key.verify(&ABC_SHA1, b""), Err(Error::Crypto));
    assert_eq!(key.verify(&ABC_SHA1, &OPENSSL_SIGNATURE[..40]), Err(Error::Crypto));

    let mut trailing = OPENSSL_SIGNATURE.to_vec();
    trailing.push(0);
    assert_eq!(key.verify(&ABC_SHA1, &trailing), Err(Error::Crypto));
}

#[test]
fn out_of_range_signatures_are_invalid() {
    let key = public_key();
    let q = key.q().unwrap().clone();
    let one = BigUint::one();

    for (r, s) in [
        (BigUint::zero(), one.clone()),
        (one.clone(), BigUint::zero()),
        (q.clone(), one.clone()),
        (one.clone(), &q + &one),
    ] {
        assert_eq!(key.verify(&ABC_SHA1, &signature_der(r, s)), Ok(false));
    }
}

#[test]
fn verify_requires_public_material() {
    let params = DsaKey::from_bytes(include_bytes!("pems/params.pem"), None).unwrap();
    assert_eq!(params.verify(&ABC_SHA1, OPENSSL_SIGNATURE), Err(Error::Crypto));
}

#[test]
fn signature_traits() {
    let mut rng = ChaCha8Rng::from_seed([4; 32]);
    let key = private_key();
    let public = public_key();

    let signature: Signature = key
        .try_sign_digest_with_rng(&mut rng, Sha1::new_with_prefix(b"abc"))
        .unwrap();
    assert!(public.verify_digest(Sha1::new_with_prefix(b"abc"), &signature).is_ok());
    assert!(public.verify_digest(Sha1::new_with_prefix(b"abd"), &signature).is_err());

    assert_eq!(public.verify(&ABC_SHA1, &signature.to_vec()), Ok(true));

    let signature = key.sign_prehash_with_rng(&mut rng, &ABC_SHA1).unwrap();
    assert!(public.verify_prehash(&ABC_SHA1, &signature).is_ok());
}

#[test]
fn signatures_are_randomized() {
    let mut rng = ChaCha8Rng::from_seed([5; 32]);
    let key = private_key();

    let first = key.sign_with_rng(&mut rng, &ABC_SHA1).unwrap();
    let second = key.sign_with_rng(&mut rng, &ABC_SHA1).unwrap();
    assert_ne!(first, second);
}

#[test]
fn generated_key_signs_and_verifies() {
    let mut rng = ChaCha8Rng::from_seed([6; 32]);
    let key = DsaKey::generate(&mut rng, KeySize::DSA_1024_160);

    let (p, q, g) = (key.p().unwrap(), key.q().unwrap(), key.g().unwrap());
    let x = key.priv_key().unwrap();

    assert_eq!(p.bits(), 1024);
    assert_eq!(q.bits(), 160);
    assert!(BigUint::zero() < *x && x < q, "Requirement 0<x<q not met");
    assert_eq!(*key.pub_key().unwrap(), g.modpow(x, p), "Requirement y=(g^x)%p not met");
    assert_eq!(g.modpow(q, p), BigUint::one());

    let digest = Sha1::digest(b"SIGN AND VERIFY THOSE BYTES");
    let signature = key.sign_with_rng(&mut rng, &digest).unwrap();
    assert_eq!(key.public_key().unwrap().verify(&digest, &signature), Ok(true));
}

#[test]
fn copies_sign_like_their_source() {
    let mut rng = ChaCha8Rng::from_seed([7; 32]);
    let key = private_key();
    let copy = key.try_clone().unwrap();

    assert_eq!(copy.params(), key.params());

    let signature = copy.sign_with_rng(&mut rng, &ABC_SHA1).unwrap();
    assert_eq!(key.verify(&ABC_SHA1, &signature), Ok(true));

    let mut populated = public_key();
    assert!(matches!(populated.copy_from(&key), Err(Error::State { .. })));
    assert!(matches!(public_key().try_clone(), Err(Error::State { .. })));
}

#[cfg(feature = "getrandom")]
#[test]
fn sign_with_os_rng() {
    use signature::hazmat::PrehashSigner;

    let key = private_key();
    let signature = key.sign(&ABC_SHA1).unwrap();
    assert_eq!(public_key().verify(&ABC_SHA1, &signature), Ok(true));

    let signature = key.sign_prehash(&ABC_SHA1).unwrap();
    assert!(public_key().verify_prehash(&ABC_SHA1, &signature).is_ok());

    assert_eq!(DsaKey::from_size(256).map(|_| ()), Err(Error::KeySize));
}
