//! Serialization of DSA keys.
//!
//! Keys with a private component are written in the traditional
//! `DSAPrivateKey` format, all others as `SubjectPublicKeyInfo`.

use crate::{
    Component, DSA_OID, DsaKey, Error, MAX_PASSPHRASE_LEN, PemCipher, Result, asn1::DsaPrivateKey,
    pem,
};
use alloc::{format, string::String, vec, vec::Vec};
use pkcs8::{
    der::{
        AnyRef, Decode, Encode,
        asn1::{BitStringRef, UintRef},
    },
    spki::{AlgorithmIdentifierRef, SubjectPublicKeyInfoRef},
};
use signature::rand_core::CryptoRngCore;
use zeroize::Zeroizing;

/// `Proc-Type` header value of an encrypted PEM block
const PROC_TYPE_ENCRYPTED: &str = "4,ENCRYPTED";

/// DER encoding in the format selected by the key's contents.
pub(crate) fn to_der(key: &DsaKey) -> Result<Zeroizing<Vec<u8>>> {
    if key.has_private() {
        private_key_der(key)
    } else {
        public_key_der(key).map(Zeroizing::new)
    }
}

/// Unencrypted PEM encoding in the format selected by the key's contents.
pub(crate) fn to_pem(key: &DsaKey) -> Result<String> {
    if key.has_private() {
        let der = private_key_der(key)?;
        tracing::debug!(label = pem::DSA_PRIVATE_KEY, "exporting DSA key");
        pem::encode(pem::DSA_PRIVATE_KEY, &[], &der)
    } else {
        let der = public_key_der(key)?;
        tracing::debug!(label = pem::PUBLIC_KEY, "exporting DSA key");
        pem::encode(pem::PUBLIC_KEY, &[], &der)
    }
}

/// PEM encoding, encrypting a private key with `cipher` if one is given.
///
/// Public keys are never encrypted, the cipher and passphrase are ignored for
/// them. So is a passphrase without a cipher.
pub(crate) fn to_encrypted_pem<R: CryptoRngCore + ?Sized>(
    key: &DsaKey,
    rng: &mut R,
    cipher: Option<PemCipher>,
    passphrase: Option<&[u8]>,
) -> Result<String> {
    let Some(cipher) = cipher.filter(|_| key.has_private()) else {
        return to_pem(key);
    };

    let passphrase = passphrase
        .filter(|passphrase| passphrase.len() <= MAX_PASSPHRASE_LEN)
        .ok_or(Error::Passphrase)?;

    let der = private_key_der(key)?;

    let mut iv = vec![0u8; cipher.iv_size()];
    rng.fill_bytes(&mut iv);
    let ciphertext = cipher.encrypt(passphrase, &iv, &der)?;

    let dek_info = format!("{},{}", cipher, hex::encode_upper(&iv));
    tracing::debug!(label = pem::DSA_PRIVATE_KEY, %cipher, "exporting encrypted DSA key");

    pem::encode(
        pem::DSA_PRIVATE_KEY,
        &[("Proc-Type", PROC_TYPE_ENCRYPTED), ("DEK-Info", dek_info.as_str())],
        &ciphertext,
    )
}

fn private_key_der(key: &DsaKey) -> Result<Zeroizing<Vec<u8>>> {
    let components = key.components().ok_or(Error::IncompleteKey {
        component: Component::P,
    })?;
    let y = key.pub_key().ok_or(Error::IncompleteKey {
        component: Component::PublicKey,
    })?;
    let x = key.priv_key().ok_or(Error::IncompleteKey {
        component: Component::PrivateKey,
    })?;

    let private_key = DsaPrivateKey {
        components: components.clone(),
        y: y.clone(),
        x: Zeroizing::new(x.clone()),
    };

    Ok(Zeroizing::new(private_key.to_der()?))
}

/// `SubjectPublicKeyInfo`, with the parameters left out when the key has none.
fn public_key_der(key: &DsaKey) -> Result<Vec<u8>> {
    let y = key.pub_key().ok_or(Error::IncompleteKey {
        component: Component::PublicKey,
    })?;

    let parameters = key.components().map(Encode::to_der).transpose()?;
    let algorithm = AlgorithmIdentifierRef {
        oid: DSA_OID,
        parameters: parameters.as_deref().map(AnyRef::from_der).transpose()?,
    };

    let y_bytes = y.to_bytes_be();
    let public_key = UintRef::new(&y_bytes)?.to_der()?;

    let spki = SubjectPublicKeyInfoRef {
        algorithm,
        subject_public_key: BitStringRef::new(0, &public_key)?,
    };

    Ok(spki.to_der()?)
}
