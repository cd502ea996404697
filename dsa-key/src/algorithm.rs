//! Key algorithms recognized while decoding.

use core::fmt;
use pkcs8::ObjectIdentifier;

/// DSA object identifier as defined by [RFC3279 § 2.3.2].
///
/// [RFC3279 § 2.3.2]: https://www.rfc-editor.org/rfc/rfc3279#section-2.3.2
pub const DSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10040.4.1");

const RSA_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const RSA_PSS_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");
const EC_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const DH_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.3.1");
const X25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.110");
const X448_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.111");
const ED25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
const ED448_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.113");

/// Algorithms with a dedicated [`Algorithm`] variant.
const KNOWN: [Algorithm; 9] = [
    Algorithm::Dsa,
    Algorithm::Rsa,
    Algorithm::RsaPss,
    Algorithm::Ec,
    Algorithm::Dh,
    Algorithm::X25519,
    Algorithm::X448,
    Algorithm::Ed25519,
    Algorithm::Ed448,
];

/// Algorithm of a decoded key.
///
/// Displayed with the short names OpenSSL uses, falling back to the dotted
/// object identifier for algorithms without one here.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Algorithm {
    /// Digital Signature Algorithm
    Dsa,

    /// RSA (`rsaEncryption`)
    Rsa,

    /// RSASSA-PSS
    RsaPss,

    /// Elliptic curve keys (`id-ecPublicKey`)
    Ec,

    /// Finite field Diffie-Hellman (`dhKeyAgreement`)
    Dh,

    /// X25519
    X25519,

    /// X448
    X448,

    /// Ed25519
    Ed25519,

    /// Ed448
    Ed448,

    /// Any other algorithm, by object identifier
    Other(ObjectIdentifier),
}

impl Algorithm {
    /// Look up the algorithm for an `AlgorithmIdentifier` OID.
    pub fn from_oid(oid: ObjectIdentifier) -> Self {
        KNOWN
            .iter()
            .find(|algorithm| algorithm.oid() == oid)
            .copied()
            .unwrap_or(Self::Other(oid))
    }

    /// Object identifier of this algorithm.
    pub fn oid(self) -> ObjectIdentifier {
        match self {
            Self::Dsa => DSA_OID,
            Self::Rsa => RSA_OID,
            Self::RsaPss => RSA_PSS_OID,
            Self::Ec => EC_OID,
            Self::Dh => DH_OID,
            Self::X25519 => X25519_OID,
            Self::X448 => X448_OID,
            Self::Ed25519 => ED25519_OID,
            Self::Ed448 => ED448_OID,
            Self::Other(oid) => oid,
        }
    }

    /// Short name, if this algorithm has one.
    pub fn short_name(self) -> Option<&'static str> {
        match self {
            Self::Dsa => Some("DSA"),
            Self::Rsa => Some("rsaEncryption"),
            Self::RsaPss => Some("RSASSA-PSS"),
            Self::Ec => Some("id-ecPublicKey"),
            Self::Dh => Some("dhKeyAgreement"),
            Self::X25519 => Some("X25519"),
            Self::X448 => Some("X448"),
            Self::Ed25519 => Some("ED25519"),
            Self::Ed448 => Some("ED448"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.short_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.oid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn oid_lookup() {
        assert_eq!(Algorithm::from_oid(DSA_OID), Algorithm::Dsa);
        assert_eq!(Algorithm::from_oid(RSA_OID), Algorithm::Rsa);
        assert_eq!(Algorithm::Ed25519.oid(), ED25519_OID);
    }

    #[test]
    fn display_names() {
        assert_eq!(Algorithm::Rsa.to_string(), "rsaEncryption");
        assert_eq!(Algorithm::Ec.to_string(), "id-ecPublicKey");

        let oid = ObjectIdentifier::new_unwrap("1.2.3.4");
        assert_eq!(Algorithm::from_oid(oid).to_string(), "1.2.3.4");
    }
}
