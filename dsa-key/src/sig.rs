//!
//! Module containing the definition of the signature container
//!

use alloc::{boxed::Box, vec::Vec};
use num_bigint::BigUint;
use num_traits::Zero;
use pkcs8::der::{
    self, Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Sequence, Writer,
    asn1::UintRef,
};
use signature::SignatureEncoding;

/// Container of the DSA signature
///
/// Encoded as the ASN.1 `Dss-Sig-Value` structure:
///
/// ```text
/// Dss-Sig-Value ::= SEQUENCE {
///   r  INTEGER,
///   s  INTEGER
/// }
/// ```
///
/// Decoding accepts zero values so that verification can reject them as an
/// invalid (rather than malformed) signature.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd)]
#[must_use]
pub struct Signature {
    /// Signature part r
    r: BigUint,

    /// Signature part s
    s: BigUint,
}

impl Signature {
    /// Create a new Signature container from its components
    ///
    /// Returns `None` if either component is zero.
    pub fn from_components(r: BigUint, s: BigUint) -> Option<Self> {
        if r.is_zero() || s.is_zero() {
            return None;
        }

        Some(Self { r, s })
    }

    /// Signature part r
    #[must_use]
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// Signature part s
    #[must_use]
    pub fn s(&self) -> &BigUint {
        &self.s
    }
}

impl<'a> DecodeValue<'a> for Signature {
    fn decode_value<R: Reader<'a>>(reader: &mut R, _header: Header) -> der::Result<Self> {
        let r = reader.decode::<UintRef<'_>>()?;
        let s = reader.decode::<UintRef<'_>>()?;

        Ok(Self {
            r: BigUint::from_bytes_be(r.as_bytes()),
            s: BigUint::from_bytes_be(s.as_bytes()),
        })
    }
}

impl EncodeValue for Signature {
    fn value_len(&self) -> der::Result<Length> {
        UintRef::new(&self.r.to_bytes_be())?.encoded_len()?
            + UintRef::new(&self.s.to_bytes_be())?.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        UintRef::new(&self.r.to_bytes_be())?.encode(writer)?;
        UintRef::new(&self.s.to_bytes_be())?.encode(writer)?;
        Ok(())
    }
}

impl<'a> Sequence<'a> for Signature {}

impl From<Signature> for Box<[u8]> {
    fn from(sig: Signature) -> Box<[u8]> {
        sig.to_bytes()
    }
}

impl SignatureEncoding for Signature {
    type Repr = Box<[u8]>;

    fn to_bytes(&self) -> Box<[u8]> {
        SignatureEncoding::to_vec(self).into_boxed_slice()
    }

    fn to_vec(&self) -> Vec<u8> {
        Encode::to_der(self).expect("DER encoding error")
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = signature::Error;

    fn try_from(bytes: &[u8]) -> signature::Result<Self> {
        Self::from_der(bytes).map_err(|_| signature::Error::new())
    }
}
