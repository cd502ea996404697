//! Algorithm-specific ASN.1 DER structures for DSA keys.
//!
//! These are the "traditional" OpenSSL encodings which predate PKCS#8 and
//! SubjectPublicKeyInfo:
//!
//! ```text
//! DSAPrivateKey ::= SEQUENCE {
//!   version  INTEGER,  -- 0
//!   p        INTEGER,
//!   q        INTEGER,
//!   g        INTEGER,
//!   pub_key  INTEGER,
//!   priv_key INTEGER
//! }
//!
//! DSAPublicKey ::= SEQUENCE {
//!   pub_key  INTEGER,
//!   p        INTEGER,
//!   q        INTEGER,
//!   g        INTEGER
//! }
//! ```

use crate::Components;
use num_bigint::BigUint;
use pkcs8::der::{
    self, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Writer,
    asn1::UintRef,
};
use zeroize::{Zeroize, Zeroizing};

/// Version of the traditional private key structure.
const VERSION: u8 = 0;

/// Traditional `DSAPrivateKey` structure.
pub(crate) struct DsaPrivateKey {
    pub(crate) components: Components,
    pub(crate) y: BigUint,
    pub(crate) x: Zeroizing<BigUint>,
}

impl<'a> DecodeValue<'a> for DsaPrivateKey {
    fn decode_value<R: Reader<'a>>(reader: &mut R, _header: Header) -> der::Result<Self> {
        // OpenSSL doesn't check the version either
        let _version = reader.decode::<UintRef<'_>>()?;
        let p = reader.decode::<UintRef<'_>>()?;
        let q = reader.decode::<UintRef<'_>>()?;
        let g = reader.decode::<UintRef<'_>>()?;
        let y = reader.decode::<UintRef<'_>>()?;
        let x = reader.decode::<UintRef<'_>>()?;

        Ok(Self {
            components: Components::from_components(
                BigUint::from_bytes_be(p.as_bytes()),
                BigUint::from_bytes_be(q.as_bytes()),
                BigUint::from_bytes_be(g.as_bytes()),
            ),
            y: BigUint::from_bytes_be(y.as_bytes()),
            x: Zeroizing::new(BigUint::from_bytes_be(x.as_bytes())),
        })
    }
}

impl EncodeValue for DsaPrivateKey {
    fn value_len(&self) -> der::Result<Length> {
        let mut x_bytes = self.x.to_bytes_be();
        let len = UintRef::new(&[VERSION])?.encoded_len()?
            + self.components.value_len()?
            + UintRef::new(&self.y.to_bytes_be())?.encoded_len()?
            + UintRef::new(&x_bytes)?.encoded_len()?;
        x_bytes.zeroize();
        len
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        UintRef::new(&[VERSION])?.encode(writer)?;
        self.components.encode_value(writer)?;
        UintRef::new(&self.y.to_bytes_be())?.encode(writer)?;

        let mut x_bytes = self.x.to_bytes_be();
        let result = UintRef::new(&x_bytes).and_then(|x| x.encode(writer));
        x_bytes.zeroize();
        result
    }
}

impl<'a> Sequence<'a> for DsaPrivateKey {}

/// Legacy `DSAPublicKey` structure.
pub(crate) struct DsaPublicKey {
    pub(crate) components: Components,
    pub(crate) y: BigUint,
}

impl<'a> DecodeValue<'a> for DsaPublicKey {
    fn decode_value<R: Reader<'a>>(reader: &mut R, _header: Header) -> der::Result<Self> {
        let y = reader.decode::<UintRef<'_>>()?;
        let p = reader.decode::<UintRef<'_>>()?;
        let q = reader.decode::<UintRef<'_>>()?;
        let g = reader.decode::<UintRef<'_>>()?;

        Ok(Self {
            components: Components::from_components(
                BigUint::from_bytes_be(p.as_bytes()),
                BigUint::from_bytes_be(q.as_bytes()),
                BigUint::from_bytes_be(g.as_bytes()),
            ),
            y: BigUint::from_bytes_be(y.as_bytes()),
        })
    }
}

impl EncodeValue for DsaPublicKey {
    fn value_len(&self) -> der::Result<Length> {
        UintRef::new(&self.y.to_bytes_be())?.encoded_len()? + self.components.value_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        UintRef::new(&self.y.to_bytes_be())?.encode(writer)?;
        self.components.encode_value(writer)
    }
}

impl<'a> Sequence<'a> for DsaPublicKey {}

#[cfg(test)]
mod tests {
    use super::{DsaPrivateKey, DsaPublicKey};
    use crate::Components;
    use num_bigint::BigUint;
    use pkcs8::der::{Decode, Encode};
    use zeroize::Zeroizing;

    fn components() -> Components {
        Components::from_components(
            BigUint::from(23u8),
            BigUint::from(11u8),
            BigUint::from(4u8),
        )
    }

    #[test]
    fn private_key_round_trip() {
        let key = DsaPrivateKey {
            components: components(),
            y: BigUint::from(8u8),
            x: Zeroizing::new(BigUint::from(7u8)),
        };

        let der = key.to_der().unwrap();
        assert_eq!(der, [0x30u8, 0x12, 2, 1, 0, 2, 1, 23, 2, 1, 11, 2, 1, 4, 2, 1, 8, 2, 1, 7]);

        let decoded = DsaPrivateKey::from_der(&der).unwrap();
        assert_eq!(decoded.components, components());
        assert_eq!(decoded.y, BigUint::from(8u8));
        assert_eq!(*decoded.x, BigUint::from(7u8));
    }

    #[test]
    fn public_key_field_order() {
        let key = DsaPublicKey {
            components: components(),
            y: BigUint::from(8u8),
        };

        let der = key.to_der().unwrap();
        assert_eq!(der, [0x30u8, 0x0c, 2, 1, 8, 2, 1, 23, 2, 1, 11, 2, 1, 4]);
        assert!(DsaPrivateKey::from_der(&der).is_err());
    }
}
