use crate::crypto::{Crypto, AES128, MIC};
use crate::types::DevAddr;

/// Builds the 16-byte block shared by the MIC pseudo-header (B0, first byte
/// 0x49) and the CTR counter blocks (Ai, first byte 0x01). The last byte is
/// left for the caller.
fn fill_block(first: u8, uplink: bool, dev_addr: &DevAddr, fcnt: u32) -> [u8; 16] {
    let mut block = [0u8; 16];
    block[0] = first;
    // block[1..5] are 0
    block[5] = !uplink as u8;
    block[6..10].copy_from_slice(&dev_addr.to_le_bytes());
    block[10..14].copy_from_slice(&fcnt.to_le_bytes());
    // block[14] is 0
    // block[15] is set by the caller
    block
}

/// Computes the MIC of a data frame: CMAC over B0 followed by the frame
/// bytes without the MIC.
pub(crate) fn calculate_data_mic<C: Crypto>(
    crypto: &C,
    key: &AES128,
    data: &[u8],
    uplink: bool,
    dev_addr: &DevAddr,
    fcnt: u32,
) -> MIC {
    let mut b0 = fill_block(0x49, uplink, dev_addr, fcnt);
    b0[15] = data.len() as u8;

    crypto.cmac(key, &b0, data)
}

/// Computes the MIC of a join frame: plain CMAC over the frame bytes
/// without the MIC.
pub(crate) fn calculate_join_mic<C: Crypto>(crypto: &C, key: &AES128, data: &[u8]) -> MIC {
    crypto.cmac(key, &[], data)
}

/// XORs `data` with the AES-CTR keystream derived from the Ai blocks.
/// Encryption and decryption are the same operation.
pub(crate) fn encrypt_frm_payload<C: Crypto>(
    crypto: &C,
    key: &AES128,
    data: &mut [u8],
    uplink: bool,
    dev_addr: &DevAddr,
    fcnt: u32,
) {
    let a = fill_block(0x01, uplink, dev_addr, fcnt);

    let mut s = [0u8; 16];
    for (i, byte) in data.iter_mut().enumerate() {
        let j = i & 0x0f;
        if j == 0 {
            s.copy_from_slice(&a);
            s[15] = (i / 16 + 1) as u8;
            crypto.encrypt_block(key, &mut s);
        }
        *byte ^= s[j];
    }
}
