//! Legacy OpenSSL PEM encryption.
//!
//! Encrypted traditional PEM files carry a `DEK-Info: <cipher>,<hex IV>`
//! header. The key is derived with OpenSSL's `EVP_BytesToKey` using MD5, a
//! single iteration and the first 8 bytes of the IV as salt. The body is
//! PKCS#7-padded and encrypted in CBC mode.

use crate::{Error, Result};
use aes::{Aes128, Aes192, Aes256};
use alloc::vec::Vec;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use core::{fmt, str::FromStr};
use des::TdesEde3;
use md5::{Digest, Md5};
use zeroize::Zeroizing;

/// Length of the salt taken from the IV
const SALT_LEN: usize = 8;

/// Cipher used to encrypt a traditional PEM private key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum PemCipher {
    /// AES-128 in CBC mode
    Aes128Cbc,

    /// AES-192 in CBC mode
    Aes192Cbc,

    /// AES-256 in CBC mode
    Aes256Cbc,

    /// Three-key triple DES (EDE) in CBC mode
    DesEde3Cbc,
}

impl PemCipher {
    /// Name used in the `DEK-Info` header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aes128Cbc => "AES-128-CBC",
            Self::Aes192Cbc => "AES-192-CBC",
            Self::Aes256Cbc => "AES-256-CBC",
            Self::DesEde3Cbc => "DES-EDE3-CBC",
        }
    }

    /// Key size in bytes.
    pub fn key_size(self) -> usize {
        match self {
            Self::Aes128Cbc => 16,
            Self::Aes192Cbc => 24,
            Self::Aes256Cbc => 32,
            Self::DesEde3Cbc => 24,
        }
    }

    /// IV size in bytes.
    pub fn iv_size(self) -> usize {
        match self {
            Self::Aes128Cbc | Self::Aes192Cbc | Self::Aes256Cbc => 16,
            Self::DesEde3Cbc => 8,
        }
    }

    /// Encrypt `plaintext` with a key derived from `passphrase` and `iv`.
    pub(crate) fn encrypt(self, passphrase: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let key = self.derive_key(passphrase, iv)?;

        match self {
            Self::Aes128Cbc => cbc::Encryptor::<Aes128>::new_from_slices(&key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
            Self::Aes192Cbc => cbc::Encryptor::<Aes192>::new_from_slices(&key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
            Self::Aes256Cbc => cbc::Encryptor::<Aes256>::new_from_slices(&key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
            Self::DesEde3Cbc => cbc::Encryptor::<TdesEde3>::new_from_slices(&key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        }
        .map_err(|_| Error::Crypto)
    }

    /// Decrypt `ciphertext` with a key derived from `passphrase` and `iv`.
    ///
    /// A wrong passphrase usually shows up as a padding error here, but may
    /// also produce garbage which only fails to parse later on.
    pub(crate) fn decrypt(
        self,
        passphrase: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        let key = self.derive_key(passphrase, iv)?;

        let plaintext = match self {
            Self::Aes128Cbc => cbc::Decryptor::<Aes128>::new_from_slices(&key, iv)
                .map_err(|_| Error::Crypto)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            Self::Aes192Cbc => cbc::Decryptor::<Aes192>::new_from_slices(&key, iv)
                .map_err(|_| Error::Crypto)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            Self::Aes256Cbc => cbc::Decryptor::<Aes256>::new_from_slices(&key, iv)
                .map_err(|_| Error::Crypto)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            Self::DesEde3Cbc => cbc::Decryptor::<TdesEde3>::new_from_slices(&key, iv)
                .map_err(|_| Error::Crypto)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        };

        plaintext.map(Zeroizing::new).map_err(|_| Error::Crypto)
    }

    /// `EVP_BytesToKey` with MD5 and one iteration
    fn derive_key(self, passphrase: &[u8], iv: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if iv.len() != self.iv_size() {
            return Err(Error::Crypto);
        }

        let salt = &iv[..SALT_LEN];
        let mut key = Zeroizing::new(Vec::with_capacity(self.key_size() + 16));
        let mut block = Md5::new().chain_update(passphrase).chain_update(salt).finalize();

        loop {
            key.extend_from_slice(&block);
            if key.len() >= self.key_size() {
                break;
            }

            block = Md5::new()
                .chain_update(block)
                .chain_update(passphrase)
                .chain_update(salt)
                .finalize();
        }

        key.truncate(self.key_size());
        Ok(key)
    }
}

impl fmt::Display for PemCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PemCipher {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        [
            Self::Aes128Cbc,
            Self::Aes192Cbc,
            Self::Aes256Cbc,
            Self::DesEde3Cbc,
        ]
        .into_iter()
        .find(|cipher| cipher.as_str().eq_ignore_ascii_case(name))
        .ok_or(Error::CipherUnsupported)
    }
}
