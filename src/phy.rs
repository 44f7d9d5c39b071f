//! Top-level PHY payload framing: MHDR, the MACPayload variants and the MIC
//! and join-accept crypto operations.

use heapless::Vec;

use crate::crypto::{Crypto, SoftwareCrypto, AES128, MIC};
use crate::join::{JoinAcceptPayload, JoinRequestPayload};
use crate::macpayload::MacPayload;
use crate::securityhelpers;
use crate::{Error, MAX_PHY_PAYLOAD_LEN};

/// MType gives the message type a PHY payload is carrying.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MType {
    #[default]
    JoinRequest,
    JoinAccept,
    UnconfirmedDataUp,
    UnconfirmedDataDown,
    ConfirmedDataUp,
    ConfirmedDataDown,
    RFU,
    Proprietary,
}

impl MType {
    fn from_bits(bits: u8) -> MType {
        match bits {
            0 => MType::JoinRequest,
            1 => MType::JoinAccept,
            2 => MType::UnconfirmedDataUp,
            3 => MType::UnconfirmedDataDown,
            4 => MType::ConfirmedDataUp,
            5 => MType::ConfirmedDataDown,
            6 => MType::RFU,
            _ => MType::Proprietary,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            MType::JoinRequest => 0,
            MType::JoinAccept => 1,
            MType::UnconfirmedDataUp => 2,
            MType::UnconfirmedDataDown => 3,
            MType::ConfirmedDataUp => 4,
            MType::ConfirmedDataDown => 5,
            MType::RFU => 6,
            MType::Proprietary => 7,
        }
    }

    /// The direction the message type travels, when it has one.
    pub fn uplink(&self) -> Option<bool> {
        match self {
            MType::JoinRequest | MType::UnconfirmedDataUp | MType::ConfirmedDataUp => Some(true),
            MType::JoinAccept | MType::UnconfirmedDataDown | MType::ConfirmedDataDown => {
                Some(false)
            }
            MType::RFU | MType::Proprietary => None,
        }
    }

    fn is_data(&self) -> bool {
        matches!(
            self,
            MType::UnconfirmedDataUp
                | MType::UnconfirmedDataDown
                | MType::ConfirmedDataUp
                | MType::ConfirmedDataDown
        )
    }
}

/// Major gives the supported LoRaWAN payload formats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Major {
    #[default]
    LoRaWANR1,
    RFU,
}

/// MHDR represents the MAC header octet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MHDR {
    pub mtype: MType,
    pub major: Major,
}

impl MHDR {
    pub fn new(mtype: MType, major: Major) -> MHDR {
        MHDR { mtype, major }
    }

    /// The wire octet: MType in the three high bits, Major in the two low
    /// bits.
    pub fn to_byte(self) -> u8 {
        let major = match self.major {
            Major::LoRaWANR1 => 0,
            Major::RFU => 1,
        };
        self.mtype.to_bits() << 5 | major
    }

    pub fn from_byte(byte: u8) -> MHDR {
        MHDR {
            mtype: MType::from_bits(byte >> 5),
            major: if byte & 0x03 == 0 {
                Major::LoRaWANR1
            } else {
                Major::RFU
            },
        }
    }
}

/// The MACPayload variant carried by a PHY payload.
///
/// `Encrypted` is the opaque join-accept blob as it travels on the wire;
/// [`PhyPayload::decrypt_mac_payload`] and
/// [`PhyPayload::encrypt_mac_payload`] transition between it and the typed
/// [`JoinAcceptPayload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    MacPayload(MacPayload),
    JoinRequest(JoinRequestPayload),
    JoinAccept(JoinAcceptPayload),
    Encrypted(Vec<u8, 32>),
}

/// PhyPayload represents a complete PHY payload: MHDR, a MACPayload variant
/// and the MIC.
///
/// The direction is fixed at construction. It is not on the wire, but it
/// governs the codec branches and the crypto direction byte, and it must
/// agree with the MType.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhyPayload {
    pub mhdr: MHDR,
    pub mac_payload: Payload,
    pub mic: MIC,
    uplink: bool,
}

impl PhyPayload {
    /// Creates a PhyPayload travelling in the given direction.
    pub fn new(mhdr: MHDR, mac_payload: Payload, uplink: bool) -> PhyPayload {
        PhyPayload {
            mhdr,
            mac_payload,
            mic: MIC::default(),
            uplink,
        }
    }

    /// Whether the payload travels uplink.
    pub fn uplink(&self) -> bool {
        self.uplink
    }

    fn check_direction(&self) -> Result<(), Error> {
        match self.mhdr.mtype.uplink() {
            Some(dir) if dir != self.uplink => Err(Error::InvalidArgument("direction")),
            None => Err(Error::InvalidArgument("mtype")),
            _ => Ok(()),
        }
    }

    /// The serialized MACPayload part, without MHDR and MIC.
    fn mac_payload_bytes(&self) -> Result<Vec<u8, MAX_PHY_PAYLOAD_LEN>, Error> {
        let mut buf = Vec::new();
        let res = match (&self.mhdr.mtype, &self.mac_payload) {
            (MType::JoinRequest, Payload::JoinRequest(jr)) => {
                buf.extend_from_slice(&jr.to_bytes())
            }
            (MType::JoinAccept, Payload::JoinAccept(ja)) => {
                buf.extend_from_slice(&ja.to_bytes()?)
            }
            (MType::JoinAccept, Payload::Encrypted(bytes)) => buf.extend_from_slice(bytes),
            (mtype, Payload::MacPayload(mac)) if mtype.is_data() => {
                if mac.uplink() != self.uplink {
                    return Err(Error::InvalidArgument("direction"));
                }
                buf.extend_from_slice(&mac.to_bytes()?)
            }
            _ => return Err(Error::WrongPayloadType),
        };
        res.map_err(|_| Error::BufferTooShort)?;
        Ok(buf)
    }

    /// Serializes the PHY payload: MHDR, MACPayload, MIC.
    pub fn to_bytes(&self) -> Result<Vec<u8, MAX_PHY_PAYLOAD_LEN>, Error> {
        self.check_direction()?;
        let mut buf: Vec<u8, MAX_PHY_PAYLOAD_LEN> = Vec::new();
        buf.push(self.mhdr.to_byte()).map_err(|_| Error::BufferTooShort)?;
        buf.extend_from_slice(&self.mac_payload_bytes()?)
            .map_err(|_| Error::BufferTooShort)?;
        buf.extend_from_slice(&self.mic.0)
            .map_err(|_| Error::BufferTooShort)?;
        Ok(buf)
    }

    /// Parses a PHY payload received in the given direction.
    ///
    /// The FRMPayload of a data frame stays in its encrypted representation;
    /// a join-accept body stays the opaque encrypted blob.
    pub fn from_bytes(data: &[u8], uplink: bool) -> Result<PhyPayload, Error> {
        if data.len() < 5 {
            return Err(Error::TruncatedPhy);
        }
        let mhdr = MHDR::from_byte(data[0]);
        if mhdr.major != Major::LoRaWANR1 {
            return Err(Error::InvalidArgument("major"));
        }
        match mhdr.mtype.uplink() {
            Some(dir) if dir != uplink => return Err(Error::InvalidArgument("direction")),
            None => return Err(Error::InvalidArgument("mtype")),
            _ => {}
        }
        let body = &data[1..data.len() - 4];
        let mut mic = [0u8; 4];
        mic.copy_from_slice(&data[data.len() - 4..]);

        let mac_payload = match mhdr.mtype {
            MType::JoinRequest => Payload::JoinRequest(JoinRequestPayload::from_bytes(body)?),
            MType::JoinAccept => {
                if body.len() != 16 && body.len() != 32 {
                    return Err(Error::SizeMismatch);
                }
                let mut bytes = Vec::new();
                bytes
                    .extend_from_slice(body)
                    .map_err(|_| Error::BufferTooShort)?;
                Payload::Encrypted(bytes)
            }
            // direction and RFU/proprietary types were rejected above
            _ => Payload::MacPayload(MacPayload::from_wire(body, uplink)?),
        };

        Ok(PhyPayload {
            mhdr,
            mac_payload,
            mic: MIC(mic),
            uplink,
        })
    }

    fn calculate_mic(&self, key: &AES128) -> Result<MIC, Error> {
        let mut msg: Vec<u8, MAX_PHY_PAYLOAD_LEN> = Vec::new();
        msg.push(self.mhdr.to_byte()).map_err(|_| Error::BufferTooShort)?;
        msg.extend_from_slice(&self.mac_payload_bytes()?)
            .map_err(|_| Error::BufferTooShort)?;

        let mic = match &self.mac_payload {
            Payload::MacPayload(pl) => securityhelpers::calculate_data_mic(
                &SoftwareCrypto,
                key,
                &msg,
                self.uplink,
                &pl.fhdr.dev_addr,
                pl.fhdr.fcnt,
            ),
            _ => securityhelpers::calculate_join_mic(&SoftwareCrypto, key, &msg),
        };
        Ok(mic)
    }

    /// Computes and stores the MIC.
    ///
    /// For a join-accept this must happen before
    /// [`Self::encrypt_mac_payload`]; for data frames after
    /// [`MacPayload::encrypt_frm_payload`].
    pub fn set_mic(&mut self, key: &AES128) -> Result<(), Error> {
        self.mic = self.calculate_mic(key)?;
        Ok(())
    }

    /// Recomputes the MIC and compares it against the stored one in constant
    /// time.
    ///
    /// On a still-encrypted join-accept the comparison runs against the
    /// opaque blob and comes out false.
    pub fn validate_mic(&self, key: &AES128) -> Result<bool, Error> {
        let mic = self.calculate_mic(key)?;
        Ok(mic.matches(&self.mic))
    }

    /// Encrypts the FRMPayload of a data frame in place; see
    /// [`MacPayload::encrypt_frm_payload`].
    pub fn encrypt_frm_payload(&mut self, key: &AES128) -> Result<(), Error> {
        match &mut self.mac_payload {
            Payload::MacPayload(mac) => mac.encrypt_frm_payload(key),
            _ => Err(Error::WrongPayloadType),
        }
    }

    /// Decrypts the FRMPayload of a data frame in place; see
    /// [`MacPayload::decrypt_frm_payload`].
    pub fn decrypt_frm_payload(&mut self, key: &AES128) -> Result<(), Error> {
        match &mut self.mac_payload {
            Payload::MacPayload(mac) => mac.decrypt_frm_payload(key),
            _ => Err(Error::WrongPayloadType),
        }
    }

    /// Encrypts a typed join-accept payload together with the MIC, leaving
    /// the opaque wire blob.
    ///
    /// The server runs a single AES *decrypt* here so that the device only
    /// needs the encrypt direction to reverse it. The MIC must already be
    /// set.
    pub fn encrypt_mac_payload(&mut self, key: &AES128) -> Result<(), Error> {
        let ja = match &self.mac_payload {
            Payload::JoinAccept(ja) => ja,
            _ => return Err(Error::WrongPayloadType),
        };
        let mut buf: Vec<u8, 32> = Vec::new();
        buf.extend_from_slice(&ja.to_bytes()?)
            .map_err(|_| Error::BufferTooShort)?;
        buf.extend_from_slice(&self.mic.0)
            .map_err(|_| Error::BufferTooShort)?;

        for chunk in buf.chunks_exact_mut(16) {
            let mut block = [0u8; 16];
            block.copy_from_slice(chunk);
            SoftwareCrypto.decrypt_block(key, &mut block);
            chunk.copy_from_slice(&block);
        }
        self.mac_payload = Payload::Encrypted(buf);
        Ok(())
    }

    /// Decrypts an opaque join-accept blob back into the typed payload.
    ///
    /// Validate the MIC after this, not before.
    pub fn decrypt_mac_payload(&mut self, key: &AES128) -> Result<(), Error> {
        let mut buf = match &self.mac_payload {
            Payload::Encrypted(bytes) => bytes.clone(),
            _ => return Err(Error::WrongPayloadType),
        };
        if buf.len() != 16 && buf.len() != 32 {
            return Err(Error::SizeMismatch);
        }

        for chunk in buf.chunks_exact_mut(16) {
            let mut block = [0u8; 16];
            block.copy_from_slice(chunk);
            SoftwareCrypto.encrypt_block(key, &mut block);
            chunk.copy_from_slice(&block);
        }
        // the last four decrypted bytes repeat the MIC; the wire MIC is kept
        let ja = JoinAcceptPayload::from_bytes(&buf[..buf.len() - 4])?;
        self.mac_payload = Payload::JoinAccept(ja);
        Ok(())
    }
}
