//!
//! Module containing the definition of the DSA key object
//!

use crate::{
    Component, Components, Error, KeySize, Params, PemCipher, Result, Signature, decode, encode,
    generate, sign, verify,
};
use alloc::{string::String, vec::Vec};
use core::fmt;
use digest::Digest;
use num_bigint::BigUint;
use num_traits::Zero;
use pkcs8::der::Decode;
use signature::{
    DigestVerifier, RandomizedDigestSigner, SignatureEncoding,
    hazmat::{PrehashVerifier, RandomizedPrehashSigner},
    rand_core::CryptoRngCore,
};
use zeroize::Zeroizing;

#[cfg(feature = "getrandom")]
use {rand_core::OsRng, signature::hazmat::PrehashSigner};

/// Source a [`DsaKey`] is constructed from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeySource<'a> {
    /// An empty key, to be populated with [`DsaKey::set_pqg`] and
    /// [`DsaKey::set_key`].
    Empty,

    /// A freshly generated key with a modulus of this many bits.
    Size(u32),

    /// A PEM or DER encoded key, parameter set or public key.
    Encoded {
        /// The encoded input
        data: &'a [u8],

        /// Passphrase for encrypted private keys
        passphrase: Option<&'a [u8]>,
    },
}

/// DSA key.
///
/// Each of the components p, q, g (always together), the public component
/// and the private component may be present or absent. An empty key is
/// valid; operations check for the components they need.
///
/// `DsaKey` deliberately doesn't implement `Clone`, use [`DsaKey::try_clone`].
/// The private component is zeroized on drop and never printed by `Debug`.
#[derive(Default)]
pub struct DsaKey {
    /// Common components p, q and g
    components: Option<Components>,

    /// Public component y
    pub_key: Option<BigUint>,

    /// Private component x
    priv_key: Option<Zeroizing<BigUint>>,

    /// Treat the key as private even without a private component
    assume_private: bool,
}

impl DsaKey {
    /// Create an empty key.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        components: Option<Components>,
        pub_key: Option<BigUint>,
        priv_key: Option<Zeroizing<BigUint>>,
    ) -> Self {
        Self {
            components,
            pub_key,
            priv_key,
            assume_private: false,
        }
    }

    /// Construct a key from `source`, generating keys with the OS RNG.
    #[cfg(feature = "getrandom")]
    pub fn from_source(source: KeySource<'_>) -> Result<Self> {
        Self::from_source_with_rng(&mut OsRng, source)
    }

    /// Construct a key from `source`, generating keys with `rng`.
    pub fn from_source_with_rng<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        source: KeySource<'_>,
    ) -> Result<Self> {
        match source {
            KeySource::Empty => Ok(Self::new()),
            KeySource::Size(bits) => Ok(Self::generate(rng, KeySize::from_modulus_bits(bits)?)),
            KeySource::Encoded { data, passphrase } => Self::from_bytes(data, passphrase),
        }
    }

    /// Generate a key with a modulus of `bits` bits using the OS RNG.
    ///
    /// The bit size of q is 160 below a 2048-bit modulus and 256 from there on.
    #[cfg(feature = "getrandom")]
    pub fn from_size(bits: u32) -> Result<Self> {
        Ok(Self::generate(&mut OsRng, KeySize::from_modulus_bits(bits)?))
    }

    /// Generate new common components and a key pair.
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R, key_size: KeySize) -> Self {
        let components = Components::generate(rng, key_size);
        let (y, x) = generate::keypair(rng, &components);

        tracing::debug!(
            l = key_size.modulus_bits(),
            n = key_size.divisor_bits(),
            "generated DSA key"
        );

        Self::from_parts(Some(components), Some(y), Some(x))
    }

    /// Decode a PEM or DER encoded key.
    ///
    /// Accepted are PKCS#8 (optionally encrypted), traditional OpenSSL private
    /// keys (optionally with legacy PEM encryption), `SubjectPublicKeyInfo`,
    /// `Dss-Parms` and the legacy `DSAPublicKey` structure. The passphrase is
    /// only used for encrypted private keys.
    ///
    /// Keys of other algorithms are rejected with [`Error::TypeMismatch`],
    /// anything else that isn't recognized with [`Error::Format`].
    pub fn from_bytes(data: &[u8], passphrase: Option<&[u8]>) -> Result<Self> {
        decode::decode(data, passphrase)
    }

    /// Deep copy of a key holding all five components.
    pub fn try_clone(&self) -> Result<Self> {
        let mut key = Self::new();
        key.copy_from(self)?;
        Ok(key)
    }

    /// Copy all components of `source` into this empty key.
    ///
    /// The `assume_private` flag is not copied.
    pub fn copy_from(&mut self, source: &DsaKey) -> Result<()> {
        if !self.is_empty() {
            return Err(Error::State {
                reason: "already initialized",
            });
        }

        let (Some(components), Some(pub_key), Some(priv_key)) =
            (&source.components, &source.pub_key, &source.priv_key)
        else {
            return Err(Error::State {
                reason: "source has no private key",
            });
        };

        self.components = Some(components.clone());
        self.pub_key = Some(pub_key.clone());
        self.priv_key = Some(priv_key.clone());
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.components.is_none() && self.pub_key.is_none() && self.priv_key.is_none()
    }

    /// Does the key have a public component?
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.pub_key.is_some()
    }

    /// Is the key usable for signing?
    ///
    /// True if it has a private component or was marked with
    /// [`DsaKey::assume_private`].
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.has_private() || self.assume_private
    }

    /// Does the key have a private component?
    #[must_use]
    pub fn has_private(&self) -> bool {
        self.priv_key.is_some()
    }

    /// Treat the key as private even without a private component, e.g. when
    /// the private component lives in external hardware.
    pub fn assume_private(&mut self, assume_private: bool) {
        self.assume_private = assume_private;
    }

    /// Common components
    #[must_use]
    pub fn components(&self) -> Option<&Components> {
        self.components.as_ref()
    }

    /// Prime p
    #[must_use]
    pub fn p(&self) -> Option<&BigUint> {
        self.components.as_ref().map(Components::p)
    }

    /// Quotient q
    #[must_use]
    pub fn q(&self) -> Option<&BigUint> {
        self.components.as_ref().map(Components::q)
    }

    /// Generator g
    #[must_use]
    pub fn g(&self) -> Option<&BigUint> {
        self.components.as_ref().map(Components::g)
    }

    /// Public component y
    #[must_use]
    pub fn pub_key(&self) -> Option<&BigUint> {
        self.pub_key.as_ref()
    }

    /// Private component x
    #[must_use]
    pub fn priv_key(&self) -> Option<&BigUint> {
        self.priv_key.as_deref()
    }

    /// Snapshot of all five components, absent ones as zero.
    ///
    /// **The snapshot includes the private component.**
    pub fn params(&self) -> Params {
        let value = |value: Option<&BigUint>| value.cloned().unwrap_or_else(BigUint::zero);

        Params {
            p: value(self.p()),
            q: value(self.q()),
            g: value(self.g()),
            pub_key: value(self.pub_key()),
            priv_key: Zeroizing::new(value(self.priv_key())),
        }
    }

    /// Replace p, q and g.
    pub fn set_pqg(&mut self, p: BigUint, q: BigUint, g: BigUint) -> &mut Self {
        self.components = Some(Components::from_components(p, q, g));
        self
    }

    /// Replace the public and private components.
    ///
    /// Passing `None` for the private component removes it.
    pub fn set_key(&mut self, pub_key: BigUint, priv_key: Option<BigUint>) -> &mut Self {
        self.pub_key = Some(pub_key);
        self.priv_key = priv_key.map(Zeroizing::new);
        self
    }

    /// Key with only the common components and the public component.
    pub fn public_key(&self) -> Result<Self> {
        let pub_key = self.pub_key.clone().ok_or(Error::IncompleteKey {
            component: Component::PublicKey,
        })?;

        Ok(Self::from_parts(self.components.clone(), Some(pub_key), None))
    }

    /// PEM encoding, encrypting a private key if a cipher is given.
    ///
    /// Private keys are written in the traditional `DSA PRIVATE KEY` format,
    /// public keys as `PUBLIC KEY`. The IV is drawn from the OS RNG.
    #[cfg(feature = "getrandom")]
    pub fn export(
        &self,
        cipher: Option<PemCipher>,
        passphrase: Option<&[u8]>,
    ) -> Result<Zeroizing<String>> {
        self.export_with_rng(&mut OsRng, cipher, passphrase)
    }

    /// [`DsaKey::export`] with an explicit RNG for the IV.
    pub fn export_with_rng<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        cipher: Option<PemCipher>,
        passphrase: Option<&[u8]>,
    ) -> Result<Zeroizing<String>> {
        encode::to_encrypted_pem(self, rng, cipher, passphrase).map(Zeroizing::new)
    }

    /// Unencrypted PEM encoding.
    pub fn to_pem(&self) -> Result<Zeroizing<String>> {
        encode::to_pem(self).map(Zeroizing::new)
    }

    /// DER encoding, traditional for private keys and
    /// `SubjectPublicKeyInfo` for public keys.
    pub fn to_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        encode::to_der(self)
    }

    /// Sign a pre-computed digest with the OS RNG, returning the DER signature.
    #[cfg(feature = "getrandom")]
    pub fn sign(&self, digest: &[u8]) -> Result<Vec<u8>> {
        self.sign_with_rng(&mut OsRng, digest)
    }

    /// Sign a pre-computed digest, returning the DER signature.
    ///
    /// No hashing is done, the digest is truncated to the byte length of q.
    pub fn sign_with_rng<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        digest: &[u8],
    ) -> Result<Vec<u8>> {
        self.sign_digest_bytes(rng, digest).map(|signature| signature.to_vec())
    }

    /// Verify a DER signature over a pre-computed digest.
    ///
    /// Returns `Ok(false)` for a well-formed signature that doesn't match and
    /// [`Error::Crypto`] for a malformed signature or a key which can't verify.
    pub fn verify(&self, digest: &[u8], signature: &[u8]) -> Result<bool> {
        let signature = Signature::from_der(signature).map_err(|_| Error::Crypto)?;
        self.verify_digest_bytes(digest, &signature)
    }

    fn sign_digest_bytes<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
        digest: &[u8],
    ) -> Result<Signature> {
        let components = self.components.as_ref().ok_or(Error::IncompleteKey {
            component: Component::Q,
        })?;

        if !self.is_private() {
            return Err(Error::PrivateKeyRequired);
        }

        let x = self.priv_key().ok_or(Error::Crypto)?;
        sign::sign_prehashed(rng, components, x, digest)
    }

    fn verify_digest_bytes(&self, digest: &[u8], signature: &Signature) -> Result<bool> {
        let components = self.components.as_ref().ok_or(Error::Crypto)?;
        let pub_key = self.pub_key.as_ref().ok_or(Error::Crypto)?;

        verify::verify_prehashed(components, pub_key, digest, signature)
    }
}

impl fmt::Debug for DsaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsaKey")
            .field("components", &self.components)
            .field("pub_key", &self.pub_key)
            .field("has_private", &self.has_private())
            .field("assume_private", &self.assume_private)
            .finish_non_exhaustive()
    }
}

impl PartialEq for DsaKey {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
            && self.pub_key == other.pub_key
            && self.priv_key() == other.priv_key()
    }
}

impl Eq for DsaKey {}

#[cfg(feature = "getrandom")]
impl PrehashSigner<Signature> for DsaKey {
    fn sign_prehash(&self, prehash: &[u8]) -> signature::Result<Signature> {
        Ok(self.sign_digest_bytes(&mut OsRng, prehash)?)
    }
}

impl RandomizedPrehashSigner<Signature> for DsaKey {
    fn sign_prehash_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        prehash: &[u8],
    ) -> signature::Result<Signature> {
        Ok(self.sign_digest_bytes(rng, prehash)?)
    }
}

impl PrehashVerifier<Signature> for DsaKey {
    fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> signature::Result<()> {
        if let Ok(true) = self.verify_digest_bytes(prehash, signature) {
            Ok(())
        } else {
            Err(signature::Error::new())
        }
    }
}

impl<D> RandomizedDigestSigner<D, Signature> for DsaKey
where
    D: Digest,
{
    fn try_sign_digest_with_rng(
        &self,
        rng: &mut impl CryptoRngCore,
        digest: D,
    ) -> signature::Result<Signature> {
        self.sign_prehash_with_rng(rng, &digest.finalize())
    }
}

impl<D> DigestVerifier<D, Signature> for DsaKey
where
    D: Digest,
{
    fn verify_digest(&self, digest: D, signature: &Signature) -> signature::Result<()> {
        self.verify_prehash(&digest.finalize(), signature)
    }
}

#[cfg(test)]
mod tests {
    use super::{DsaKey, KeySource};
    use crate::{Component, Error};
    use alloc::format;
    use num_bigint::BigUint;
    use num_traits::Zero;
    use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

    // p = 23, q = 11, g = 4 generates the subgroup of order 11
    fn key(x: Option<u8>) -> DsaKey {
        let mut key = DsaKey::new();
        key.set_pqg(BigUint::from(23u8), BigUint::from(11u8), BigUint::from(4u8))
            .set_key(BigUint::from(8u8), x.map(BigUint::from));
        key
    }

    #[test]
    fn predicates() {
        let mut key = DsaKey::new();
        assert!(!key.is_public() && !key.is_private());

        key.set_key(BigUint::from(8u8), None);
        assert!(key.is_public() && !key.is_private());

        key.assume_private(true);
        assert!(key.is_private() && !key.has_private());
    }

    #[test]
    fn params_of_empty_key_are_zero() {
        let params = DsaKey::new().params();
        assert!(params.iter().all(|(_, value)| value.is_zero()));
    }

    #[test]
    fn params_after_set_pqg() {
        let mut key = DsaKey::new();
        key.set_pqg(BigUint::from(23u8), BigUint::from(11u8), BigUint::from(4u8));

        let params = key.params();
        assert_eq!(params.p, BigUint::from(23u8));
        assert_eq!(params.q, BigUint::from(11u8));
        assert_eq!(params.g, BigUint::from(4u8));
        assert!(params.pub_key.is_zero());
        assert!(params.priv_key.is_zero());
        assert!(!key.is_public() && !key.is_private());
    }

    #[test]
    fn copy_semantics() {
        assert_eq!(
            key(None).try_clone(),
            Err(Error::State {
                reason: "source has no private key"
            })
        );

        let source = key(Some(7));
        assert_eq!(source.try_clone().unwrap().params(), source.params());

        let mut target = key(None);
        assert!(matches!(target.copy_from(&source), Err(Error::State { .. })));
    }

    #[test]
    fn sign_preconditions() {
        let mut rng = ChaCha8Rng::from_seed([9; 32]);

        assert_eq!(
            DsaKey::new().sign_with_rng(&mut rng, b"abc"),
            Err(Error::IncompleteKey {
                component: Component::Q
            })
        );
        assert_eq!(key(None).sign_with_rng(&mut rng, b"abc"), Err(Error::PrivateKeyRequired));

        let mut assumed = key(None);
        assumed.assume_private(true);
        assert_eq!(assumed.sign_with_rng(&mut rng, b"abc"), Err(Error::Crypto));
    }

    #[test]
    fn sign_and_verify_small_group() {
        let mut rng = ChaCha8Rng::from_seed([9; 32]);
        let key = key(Some(7));

        for digest in [[1u8], [5], [10]] {
            let signature = key.sign_with_rng(&mut rng, &digest).unwrap();
            assert_eq!(key.public_key().unwrap().verify(&digest, &signature), Ok(true));
        }
    }

    // q = 11 makes r or s zero often enough to exercise the nonce retry
    #[test]
    fn small_group_retries_nonces() {
        let key = key(Some(7));

        for seed in 0..200u8 {
            let mut rng = ChaCha8Rng::from_seed([seed; 32]);
            let signature = key.sign_with_rng(&mut rng, &[3]).unwrap();
            assert_eq!(key.verify(&[3], &signature), Ok(true), "seed {seed}");
        }
    }

    #[test]
    fn verify_malformed_signature() {
        assert_eq!(key(None).verify(b"abc", b"not DER"), Err(Error::Crypto));
        assert_eq!(DsaKey::new().verify(b"abc", &[0x30, 0x06, 2, 1, 1, 2, 1, 1]), Err(Error::Crypto));
    }

    #[test]
    fn debug_redacts_private_component() {
        let debug = format!("{:?}", key(Some(7)));
        assert!(debug.contains("has_private: true"));
        assert!(!debug.contains("priv_key"));
    }

    #[test]
    fn empty_source() {
        let mut rng = ChaCha8Rng::from_seed([9; 32]);
        assert_eq!(
            DsaKey::from_source_with_rng(&mut rng, KeySource::Empty).unwrap(),
            DsaKey::new()
        );
        assert_eq!(
            DsaKey::from_source_with_rng(&mut rng, KeySource::Size(256)),
            Err(Error::KeySize)
        );
        assert_eq!(
            DsaKey::from_source_with_rng(&mut rng, KeySource::Size(u32::MAX)),
            Err(Error::KeySize)
        );
        assert_eq!(
            DsaKey::from_source_with_rng(&mut rng, KeySource::Size(crate::MAX_MODULUS_BITS + 1)),
            Err(Error::KeySize)
        );
    }
}
