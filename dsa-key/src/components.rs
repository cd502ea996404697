//!
//! Module containing the definition of the common components container
//!

use crate::{size::KeySize, two};
use num_bigint::BigUint;
use num_traits::One;
use pkcs8::der::{
    self, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Writer,
    asn1::UintRef,
};
use signature::rand_core::CryptoRngCore;

/// The common components of a DSA key
///
/// (the prime p, quotient q and generator g)
///
/// Encoded as the ASN.1 `Dss-Parms` structure of [RFC3279 § 2.3.2].
///
/// [RFC3279 § 2.3.2]: https://www.rfc-editor.org/rfc/rfc3279#section-2.3.2
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use]
pub struct Components {
    /// Prime p
    p: BigUint,

    /// Quotient q
    q: BigUint,

    /// Generator g
    g: BigUint,
}

impl Components {
    /// Construct the common components container from its inner values (p, q and g)
    ///
    /// These values are not getting verified for validity
    pub fn from_components(p: BigUint, q: BigUint, g: BigUint) -> Self {
        Self { p, q, g }
    }

    /// Generate a new set of common components
    ///
    /// Please only use the parameter sizes defined by NIST.
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R, key_size: KeySize) -> Self {
        let (p, q, g) = crate::generate::common_components(rng, key_size);
        Self::from_components(p, q, g)
    }

    /// DSA prime p
    #[must_use]
    pub const fn p(&self) -> &BigUint {
        &self.p
    }

    /// DSA quotient q
    #[must_use]
    pub const fn q(&self) -> &BigUint {
        &self.q
    }

    /// DSA generator g
    #[must_use]
    pub const fn g(&self) -> &BigUint {
        &self.g
    }

    /// Check whether the components can be used for modular arithmetic
    ///
    /// This is a structural check (`p, q >= 2` and `1 <= g < p`), not a
    /// primality test.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.p >= two() && self.q >= two() && self.g >= BigUint::one() && self.g < self.p
    }
}

impl<'a> DecodeValue<'a> for Components {
    fn decode_value<R: Reader<'a>>(reader: &mut R, _header: Header) -> der::Result<Self> {
        let p = reader.decode::<UintRef<'_>>()?;
        let q = reader.decode::<UintRef<'_>>()?;
        let g = reader.decode::<UintRef<'_>>()?;

        let p = BigUint::from_bytes_be(p.as_bytes());
        let q = BigUint::from_bytes_be(q.as_bytes());
        let g = BigUint::from_bytes_be(g.as_bytes());

        Ok(Self::from_components(p, q, g))
    }
}

impl EncodeValue for Components {
    fn value_len(&self) -> der::Result<Length> {
        UintRef::new(&self.p.to_bytes_be())?.encoded_len()?
            + UintRef::new(&self.q.to_bytes_be())?.encoded_len()?
            + UintRef::new(&self.g.to_bytes_be())?.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        UintRef::new(&self.p.to_bytes_be())?.encode(writer)?;
        UintRef::new(&self.q.to_bytes_be())?.encode(writer)?;
        UintRef::new(&self.g.to_bytes_be())?.encode(writer)?;
        Ok(())
    }
}

impl<'a> Sequence<'a> for Components {}

#[cfg(test)]
mod tests {
    use super::Components;
    use num_bigint::BigUint;
    use pkcs8::der::{Decode, Encode};

    #[test]
    fn validity() {
        let components = Components::from_components(
            BigUint::from(23u8),
            BigUint::from(11u8),
            BigUint::from(4u8),
        );
        assert!(components.is_valid());

        let components = Components::from_components(
            BigUint::from(23u8),
            BigUint::from(11u8),
            BigUint::from(23u8),
        );
        assert!(!components.is_valid());
    }

    #[test]
    fn der_round_trip() {
        let components = Components::from_components(
            BigUint::from(0x8000_0000_0000_0001u64),
            BigUint::from(0xffu8),
            BigUint::from(2u8),
        );

        let der = components.to_der().unwrap();
        assert_eq!(Components::from_der(&der).unwrap(), components);
    }
}
