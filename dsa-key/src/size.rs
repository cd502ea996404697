use crate::{Error, MAX_MODULUS_BITS, Result};

/// Smallest modulus size accepted for generation.
const MIN_MODULUS_BITS: u32 = 512;

/// DSA key size
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeySize {
    /// Bit size of p
    pub(crate) l: u32,

    /// Bit size of q
    pub(crate) n: u32,
}

impl KeySize {
    /// DSA parameter size constant: L = 1024, N = 160
    #[deprecated(
        note = "This size constant has a security strength of under 112 bits per SP 800-57 Part 1 Rev. 5"
    )]
    pub const DSA_1024_160: Self = Self { l: 1024, n: 160 };

    /// DSA parameter size constant: L = 2048, N = 224
    pub const DSA_2048_224: Self = Self { l: 2048, n: 224 };

    /// DSA parameter size constant: L = 2048, N = 256
    pub const DSA_2048_256: Self = Self { l: 2048, n: 256 };

    /// DSA parameter size constant: L = 3072, N = 256
    pub const DSA_3072_256: Self = Self { l: 3072, n: 256 };

    /// Key size for a modulus of `bits` bits.
    ///
    /// The bit size of q is 160 below a 2048-bit modulus and 256 from there on.
    /// Sizes outside `512..=MAX_MODULUS_BITS` are rejected.
    pub fn from_modulus_bits(bits: u32) -> Result<Self> {
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&bits) {
            return Err(Error::KeySize);
        }

        let n = if bits >= 2048 { 256 } else { 160 };
        Ok(Self { l: bits, n })
    }

    /// Bit size of p
    #[must_use]
    pub const fn modulus_bits(&self) -> u32 {
        self.l
    }

    /// Bit size of q
    #[must_use]
    pub const fn divisor_bits(&self) -> u32 {
        self.n
    }
}
