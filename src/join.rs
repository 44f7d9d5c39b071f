//! JoinRequest and JoinAccept payload codecs.

use heapless::Vec;

use crate::types::{AppNonce, DLSettings, DevAddr, DevNonce, Frequency, NetId, EUI64};
use crate::Error;

/// CFList carries up to five additional channel frequencies in Hz, granted
/// to the device by a JoinAccept. Unused entries are zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CFList(pub [u32; 5]);

impl CFList {
    /// Serializes the CFList: five 24-bit frequencies and one RFU byte.
    pub fn to_bytes(&self) -> Result<[u8; 16], Error> {
        let mut bytes = [0u8; 16];
        for (i, &hz) in self.0.iter().enumerate() {
            let freq = Frequency::new(hz)?;
            bytes[i * 3..i * 3 + 3].copy_from_slice(&freq.to_wire());
        }
        Ok(bytes)
    }

    /// Reads a CFList from its 16-byte wire form.
    ///
    /// The slice length must be exactly 16.
    pub(crate) fn from_bytes(data: &[u8]) -> CFList {
        let mut freqs = [0u32; 5];
        for (i, freq) in freqs.iter_mut().enumerate() {
            *freq = Frequency::from_wire(&data[i * 3..i * 3 + 3]).value();
        }
        CFList(freqs)
    }
}

/// JoinRequestPayload represents the payload of a JoinRequest, a fixed 18
/// bytes on the wire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoinRequestPayload {
    pub app_eui: EUI64,
    pub dev_eui: EUI64,
    pub dev_nonce: DevNonce,
}

impl JoinRequestPayload {
    pub fn to_bytes(&self) -> [u8; 18] {
        let mut bytes = [0u8; 18];
        bytes[0..8].copy_from_slice(&self.app_eui.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.dev_eui.to_le_bytes());
        bytes[16..18].copy_from_slice(&self.dev_nonce.to_le_bytes());
        bytes
    }

    pub fn from_bytes(data: &[u8]) -> Result<JoinRequestPayload, Error> {
        if data.len() != 18 {
            return Err(Error::SizeMismatch);
        }
        Ok(JoinRequestPayload {
            app_eui: EUI64::from_le_slice(&data[0..8]),
            dev_eui: EUI64::from_le_slice(&data[8..16]),
            dev_nonce: DevNonce::from_le_slice(&data[16..18]),
        })
    }
}

/// JoinAcceptPayload represents the plaintext payload of a JoinAccept: 12
/// bytes, or 28 with the optional CFList.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoinAcceptPayload {
    pub app_nonce: AppNonce,
    pub net_id: NetId,
    pub dev_addr: DevAddr,
    pub dl_settings: DLSettings,
    pub rx_delay: u8,
    pub cf_list: Option<CFList>,
}

impl JoinAcceptPayload {
    pub fn to_bytes(&self) -> Result<Vec<u8, 28>, Error> {
        let mut bytes: Vec<u8, 28> = Vec::new();
        // the fixed part is 12 bytes, the CFList 16 more; both fit
        let _ = bytes.extend_from_slice(&self.app_nonce.to_le_bytes());
        let _ = bytes.extend_from_slice(&self.net_id.to_le_bytes());
        let _ = bytes.extend_from_slice(&self.dev_addr.to_le_bytes());
        let _ = bytes.push(self.dl_settings.raw_value());
        let _ = bytes.push(self.rx_delay);
        if let Some(cf_list) = &self.cf_list {
            let _ = bytes.extend_from_slice(&cf_list.to_bytes()?);
        }
        Ok(bytes)
    }

    pub fn from_bytes(data: &[u8]) -> Result<JoinAcceptPayload, Error> {
        if data.len() != 12 && data.len() != 28 {
            return Err(Error::SizeMismatch);
        }
        let cf_list = if data.len() == 28 {
            Some(CFList::from_bytes(&data[12..28]))
        } else {
            None
        };
        Ok(JoinAcceptPayload {
            app_nonce: AppNonce::from_le_slice(&data[0..3]),
            net_id: NetId::from_le_slice(&data[3..6]),
            dev_addr: DevAddr::from_le_slice(&data[6..10]),
            dl_settings: DLSettings::from(data[10]),
            rx_delay: data[11],
            cf_list,
        })
    }
}
