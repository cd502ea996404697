//! Decoding of serialized DSA keys.
//!
//! Every supported encoding is tried in a fixed order and the first one that
//! decodes wins. Failed attempts are discarded, so callers only ever see the
//! aggregate [`Error::Format`], except for keys of another algorithm which are
//! reported as [`Error::TypeMismatch`] right away.

use crate::{
    Algorithm, Components, DSA_OID, DsaKey, Error, MAX_PASSPHRASE_LEN, PemCipher, Result,
    asn1::{DsaPrivateKey, DsaPublicKey},
    pem::{self, Block},
};
use alloc::vec::Vec;
use num_bigint::BigUint;
use pkcs8::{
    EncryptedPrivateKeyInfo, ObjectIdentifier, PrivateKeyInfo,
    der::{AnyRef, Decode, Reader, SliceReader, Tag, Tagged, asn1::UintRef},
    spki::SubjectPublicKeyInfoRef,
};
use zeroize::Zeroizing;

/// Label of a PKCS#1 RSA private key document
const RSA_PRIVATE_KEY: &str = "RSA PRIVATE KEY";

/// Label of a PKCS#1 RSA public key document
const RSA_PUBLIC_KEY: &str = "RSA PUBLIC KEY";

/// Label of a SEC1 EC private key document
const EC_PRIVATE_KEY: &str = "EC PRIVATE KEY";

/// Number of integers in a two-prime PKCS#1 `RSAPrivateKey`
const RSA_PRIVATE_INTEGERS: usize = 9;

/// Number of integers in a PKCS#1 `RSAPublicKey`
const RSA_PUBLIC_INTEGERS: usize = 2;

/// Encodings understood by the generic decoder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Encoding {
    /// PKCS#8 `PrivateKeyInfo`
    Pkcs8,

    /// PKCS#8 `EncryptedPrivateKeyInfo`
    EncryptedPkcs8,

    /// Traditional `DSAPrivateKey`
    Traditional,

    /// `SubjectPublicKeyInfo`
    Spki,

    /// `Dss-Parms`
    Parameters,

    /// Type-specific structures of other algorithms
    Foreign,
}

impl Encoding {
    /// Order in which DER input is tried.
    const DER_ORDER: [Self; 6] = [
        Self::Pkcs8,
        Self::EncryptedPkcs8,
        Self::Traditional,
        Self::Spki,
        Self::Parameters,
        Self::Foreign,
    ];

    fn from_label(label: &str) -> Option<Self> {
        match label {
            pem::PRIVATE_KEY => Some(Self::Pkcs8),
            pem::ENCRYPTED_PRIVATE_KEY => Some(Self::EncryptedPkcs8),
            pem::DSA_PRIVATE_KEY => Some(Self::Traditional),
            pem::PUBLIC_KEY => Some(Self::Spki),
            pem::DSA_PARAMETERS => Some(Self::Parameters),
            RSA_PRIVATE_KEY | RSA_PUBLIC_KEY | EC_PRIVATE_KEY => Some(Self::Foreign),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Pkcs8 => "PKCS#8",
            Self::EncryptedPkcs8 => "encrypted PKCS#8",
            Self::Traditional => "traditional",
            Self::Spki => "SubjectPublicKeyInfo",
            Self::Parameters => "Dss-Parms",
            Self::Foreign => "foreign",
        }
    }

    fn decode(self, der: &[u8], passphrase: Option<&[u8]>) -> Result<DsaKey> {
        match self {
            Self::Pkcs8 => decode_pkcs8(der),
            Self::EncryptedPkcs8 => decode_encrypted_pkcs8(der, passphrase),
            Self::Traditional => decode_traditional(der),
            Self::Spki => decode_spki(der),
            Self::Parameters => decode_parameters(der),
            Self::Foreign => decode_foreign(der),
        }
    }

    /// Do PEM blocks of this encoding use the legacy encryption headers?
    fn is_traditional(self) -> bool {
        matches!(self, Self::Traditional | Self::Foreign)
    }
}

/// Decode `data` with the whole fallback chain.
pub(crate) fn decode(data: &[u8], passphrase: Option<&[u8]>) -> Result<DsaKey> {
    if passphrase.is_some_and(|passphrase| passphrase.len() > MAX_PASSPHRASE_LEN) {
        return Err(Error::Passphrase);
    }

    match decode_any(data, passphrase) {
        Ok(key) => return Ok(key),
        Err(err @ Error::TypeMismatch { .. }) => return Err(err),
        Err(err) => tracing::trace!(?err, "generic decoding failed"),
    }

    decode_legacy_public(data).map_err(|err| {
        tracing::trace!(?err, "legacy public key decoding failed");
        Error::Format
    })
}

/// Generic decoding of every PKCS#8, SPKI, parameter and traditional form.
fn decode_any(data: &[u8], passphrase: Option<&[u8]>) -> Result<DsaKey> {
    match pem::is_pem(data) {
        Some(text) => decode_pem(text, passphrase),
        None => decode_der(data, passphrase),
    }
}

fn decode_der(der: &[u8], passphrase: Option<&[u8]>) -> Result<DsaKey> {
    for encoding in Encoding::DER_ORDER {
        match encoding.decode(der, passphrase) {
            Ok(key) => {
                tracing::debug!(encoding = encoding.name(), "decoded DER DSA key");
                return Ok(key);
            }
            Err(err @ Error::TypeMismatch { .. }) => return Err(err),
            Err(err) => tracing::trace!(encoding = encoding.name(), ?err, "not a DER key"),
        }
    }

    Err(Error::Format)
}

fn decode_pem(text: &str, passphrase: Option<&[u8]>) -> Result<DsaKey> {
    for block in pem::parse_all(text) {
        let Some(encoding) = Encoding::from_label(block.label) else {
            tracing::trace!(label = block.label, "skipping PEM block");
            continue;
        };

        let result = if encoding.is_traditional() {
            decrypt_traditional(&block, passphrase).and_then(|der| encoding.decode(&der, passphrase))
        } else {
            encoding.decode(&block.body, passphrase)
        };

        match result {
            Ok(key) => {
                tracing::debug!(label = block.label, "decoded PEM DSA key");
                return Ok(key);
            }
            Err(err @ Error::TypeMismatch { .. }) => return Err(err),
            Err(err) => tracing::trace!(label = block.label, ?err, "not a PEM key"),
        }
    }

    Err(Error::Format)
}

/// Legacy `DSAPublicKey` as a `DSA PUBLIC KEY` PEM block or bare DER.
fn decode_legacy_public(data: &[u8]) -> Result<DsaKey> {
    let key = match pem::is_pem(data) {
        Some(text) => pem::parse_all(text)
            .into_iter()
            .filter(|block| block.label == pem::DSA_PUBLIC_KEY)
            .find_map(|block| decode_dsa_public_key(&block.body).ok())
            .ok_or(Error::Format)?,
        None => decode_dsa_public_key(data)?,
    };

    tracing::debug!("decoded legacy DSA public key");
    Ok(key)
}

fn decode_dsa_public_key(der: &[u8]) -> Result<DsaKey> {
    let DsaPublicKey { components, y } = DsaPublicKey::from_der(der)?;
    Ok(DsaKey::from_parts(Some(components), Some(y), None))
}

/// Body of a traditional PEM block, decrypted if it carries `Proc-Type` and
/// `DEK-Info` headers.
fn decrypt_traditional(
    block: &Block<'_>,
    passphrase: Option<&[u8]>,
) -> Result<Zeroizing<Vec<u8>>> {
    let encrypted = block
        .header("Proc-Type")
        .is_some_and(|value| value.ends_with("ENCRYPTED"));

    if !encrypted {
        return Ok(block.body.clone());
    }

    let (cipher, iv) = block
        .header("DEK-Info")
        .and_then(|value| value.split_once(','))
        .ok_or(Error::Format)?;

    let cipher: PemCipher = cipher.trim().parse()?;
    let iv = hex::decode(iv.trim()).map_err(|_| Error::Format)?;
    let passphrase = passphrase.ok_or(Error::Passphrase)?;

    cipher.decrypt(passphrase, &iv, &block.body)
}

/// Fail with [`Error::TypeMismatch`] unless `oid` identifies DSA.
fn assert_dsa(oid: ObjectIdentifier) -> Result<()> {
    if oid == DSA_OID {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            algorithm: Algorithm::from_oid(oid),
        })
    }
}

fn decode_pkcs8(der: &[u8]) -> Result<DsaKey> {
    let info = PrivateKeyInfo::from_der(der)?;
    assert_dsa(info.algorithm.oid)?;

    let components: Components = info.algorithm.parameters_any()?.decode_as()?;
    let x = UintRef::from_der(info.private_key)?;
    let x = Zeroizing::new(BigUint::from_bytes_be(x.as_bytes()));

    let y = match info.public_key {
        Some(y_bytes) => BigUint::from_bytes_be(UintRef::from_der(y_bytes)?.as_bytes()),
        None if components.is_valid() => crate::generate::public_component(&components, &x),
        None => return Err(Error::Format),
    };

    Ok(DsaKey::from_parts(Some(components), Some(y), Some(x)))
}

fn decode_encrypted_pkcs8(der: &[u8], passphrase: Option<&[u8]>) -> Result<DsaKey> {
    let info = EncryptedPrivateKeyInfo::from_der(der)?;
    let passphrase = passphrase.ok_or(Error::Passphrase)?;
    let document = info.decrypt(passphrase)?;

    decode_pkcs8(document.as_bytes())
}

fn decode_traditional(der: &[u8]) -> Result<DsaKey> {
    let DsaPrivateKey { components, y, x } = DsaPrivateKey::from_der(der)?;
    Ok(DsaKey::from_parts(Some(components), Some(y), Some(x)))
}

fn decode_spki(der: &[u8]) -> Result<DsaKey> {
    let spki = SubjectPublicKeyInfoRef::from_der(der)?;
    assert_dsa(spki.algorithm.oid)?;

    let components = match spki.algorithm.parameters {
        Some(parameters) if parameters.tag() != Tag::Null => {
            Some(parameters.decode_as::<Components>()?)
        }
        _ => None,
    };

    let y = UintRef::from_der(spki.subject_public_key.as_bytes().ok_or(Error::Format)?)?;
    let y = BigUint::from_bytes_be(y.as_bytes());

    Ok(DsaKey::from_parts(components, Some(y), None))
}

fn decode_parameters(der: &[u8]) -> Result<DsaKey> {
    let components = Components::from_der(der)?;
    Ok(DsaKey::from_parts(Some(components), None, None))
}

/// Recognize PKCS#1 RSA and SEC1 EC structures by their shape.
///
/// Never returns a key: either the algorithm is identified or the input is
/// not one of these structures.
fn decode_foreign(der: &[u8]) -> Result<DsaKey> {
    let mut reader = SliceReader::new(der)?;
    let tags = reader.sequence(|seq| {
        let mut tags = Vec::new();
        while !seq.is_finished() {
            tags.push(seq.decode::<AnyRef<'_>>()?.tag());
        }
        Ok(tags)
    })?;
    let tags = reader.finish(tags)?;

    let integers = tags.iter().all(|tag| *tag == Tag::Integer);
    let algorithm = match tags.as_slice() {
        _ if integers && tags.len() == RSA_PRIVATE_INTEGERS => Algorithm::Rsa,
        _ if integers && tags.len() == RSA_PUBLIC_INTEGERS => Algorithm::Rsa,
        [Tag::Integer, Tag::OctetString, ..] => Algorithm::Ec,
        _ => return Err(Error::Format),
    };

    Err(Error::TypeMismatch { algorithm })
}
