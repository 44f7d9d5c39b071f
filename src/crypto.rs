//! AES-128 key material and the crypto primitives behind the codec.
//!
//! The codec needs exactly three operations: one AES block encryption, one
//! AES block decryption and an AES-CMAC. [`SoftwareCrypto`] provides them on
//! the pure-Rust `aes` and `cmac` crates; a hardware AES peripheral can slot
//! in behind the [`Crypto`] trait instead.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

use crate::Error;

/// AES128 represents a 128-bit AES key.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AES128(pub [u8; 16]);

impl AES128 {
    /// Creates a key from a byte slice, which must be exactly 16 bytes.
    pub fn new(bytes: &[u8]) -> Result<AES128, Error> {
        if bytes.len() != 16 {
            return Err(Error::Crypto);
        }
        let mut key = [0u8; 16];
        key.copy_from_slice(bytes);
        Ok(AES128(key))
    }
}

impl From<[u8; 16]> for AES128 {
    fn from(v: [u8; 16]) -> Self {
        AES128(v)
    }
}

/// MIC represents the 4-byte LoRaWAN message integrity code.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MIC(pub [u8; 4]);

impl MIC {
    /// Compares two MICs without short-circuiting on the first differing
    /// byte.
    pub(crate) fn matches(&self, other: &MIC) -> bool {
        let diff = self
            .0
            .iter()
            .zip(other.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        diff == 0
    }
}

impl From<[u8; 4]> for MIC {
    fn from(v: [u8; 4]) -> Self {
        MIC(v)
    }
}

/// The AES-128 operations the codec runs. Every call constructs its cipher
/// from the key and releases it on return.
pub trait Crypto {
    /// Encrypts one AES block in place.
    fn encrypt_block(&self, key: &AES128, block: &mut [u8; 16]);

    /// Decrypts one AES block in place.
    fn decrypt_block(&self, key: &AES128, block: &mut [u8; 16]);

    /// AES-CMAC over `header` followed by `data`, truncated to the MIC
    /// width.
    fn cmac(&self, key: &AES128, header: &[u8], data: &[u8]) -> MIC;
}

/// [`Crypto`] on the pure-Rust `aes` and `cmac` crates.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct SoftwareCrypto;

impl Crypto for SoftwareCrypto {
    fn encrypt_block(&self, key: &AES128, block: &mut [u8; 16]) {
        let cipher = Aes128::new(GenericArray::from_slice(&key.0));
        cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }

    fn decrypt_block(&self, key: &AES128, block: &mut [u8; 16]) {
        let cipher = Aes128::new(GenericArray::from_slice(&key.0));
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }

    fn cmac(&self, key: &AES128, header: &[u8], data: &[u8]) -> MIC {
        let mut mac = cmac::Cmac::<Aes128>::new(GenericArray::from_slice(&key.0));
        cmac::Mac::update(&mut mac, header);
        cmac::Mac::update(&mut mac, data);
        let tag = cmac::Mac::finalize(mac).into_bytes();

        let mut mic = [0u8; 4];
        mic.copy_from_slice(&tag[0..4]);
        MIC(mic)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_from_slice_checks_length() {
        assert!(AES128::new(&[1; 16]).is_ok());
        assert_eq!(AES128::new(&[1; 15]), Err(Error::Crypto));
    }

    #[test]
    fn mic_compare() {
        assert!(MIC([1, 2, 3, 4]).matches(&MIC([1, 2, 3, 4])));
        assert!(!MIC([1, 2, 3, 4]).matches(&MIC([1, 2, 3, 5])));
    }
}
