//! Frame header and MACPayload codec for data frames, including the
//! FRMPayload encryption operations.

use heapless::Vec;

use crate::crypto::{SoftwareCrypto, AES128};
use crate::maccommands::{parse_mac_commands, MacCommandSet};
use crate::securityhelpers;
use crate::types::DevAddr;
use crate::{Error, MAX_FOPTS_LEN, MAX_FRM_PAYLOAD_LEN, MAX_MAC_PAYLOAD_LEN};

/// FCtrl represents the frame control octet of the FHDR.
///
/// Bit 4 is FPending on downlink frames; on uplink frames it is reserved in
/// R1.0 and reads back as false. Bit 6 (ADRACKReq) is only meaningful on
/// uplink frames.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FCtrl {
    pub adr: bool,
    pub adr_ack_req: bool,
    pub ack: bool,
    pub f_pending: bool,
}

impl FCtrl {
    fn from_byte(byte: u8, uplink: bool) -> (FCtrl, usize) {
        let fctrl = FCtrl {
            adr: byte & (1 << 7) != 0,
            adr_ack_req: uplink && byte & (1 << 6) != 0,
            ack: byte & (1 << 5) != 0,
            f_pending: !uplink && byte & (1 << 4) != 0,
        };
        (fctrl, (byte & 0x0f) as usize)
    }

    fn to_byte(self, uplink: bool, fopts_len: usize) -> u8 {
        let mut byte = fopts_len as u8;
        byte |= (self.adr as u8) << 7;
        if uplink {
            byte |= (self.adr_ack_req as u8) << 6;
        }
        byte |= (self.ack as u8) << 5;
        if !uplink {
            byte |= (self.f_pending as u8) << 4;
        }
        byte
    }
}

/// FHDR represents the frame header of a data MACPayload.
///
/// `fcnt` holds the full 32-bit frame counter. Only its low 16 bits travel
/// on the wire; decoding zero-extends them, and the session owning the upper
/// half is expected to restore it before MIC validation or decryption.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FHDR {
    pub dev_addr: DevAddr,
    pub fctrl: FCtrl,
    pub fcnt: u32,
    pub fopts: MacCommandSet,
}

/// FRMPayload is the frame payload in one of its representations: absent,
/// opaque bytes (application data or ciphertext), or the typed MAC-command
/// stream carried at FPort 0.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum FrmPayload {
    #[default]
    None,
    Data(Vec<u8, MAX_FRM_PAYLOAD_LEN>),
    MacCommands(MacCommandSet),
}

fn append<const N: usize>(buf: &mut Vec<u8, N>, data: &[u8]) -> Result<(), Error> {
    buf.extend_from_slice(data).map_err(|_| Error::BufferTooShort)
}

impl FrmPayload {
    pub fn is_empty(&self) -> bool {
        match self {
            FrmPayload::None => true,
            FrmPayload::Data(bytes) => bytes.is_empty(),
            FrmPayload::MacCommands(cmds) => cmds.is_empty(),
        }
    }
}

/// MacPayload represents the MACPayload of a data frame.
///
/// The direction is fixed at construction; it selects the FCtrl bit layout,
/// the MAC-command shapes and the direction byte of the crypto operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacPayload {
    pub fhdr: FHDR,
    pub f_port: Option<u8>,
    pub frm_payload: FrmPayload,
    uplink: bool,
}

impl MacPayload {
    /// Creates an empty MacPayload travelling in the given direction.
    pub fn new(uplink: bool) -> MacPayload {
        MacPayload {
            fhdr: FHDR::default(),
            f_port: None,
            frm_payload: FrmPayload::None,
            uplink,
        }
    }

    /// Whether the payload travels uplink.
    pub fn uplink(&self) -> bool {
        self.uplink
    }

    /// Serializes the MACPayload: FHDR, then FPort and FRMPayload when
    /// present.
    pub fn to_bytes(&self) -> Result<Vec<u8, MAX_MAC_PAYLOAD_LEN>, Error> {
        if self.f_port.is_some() && self.frm_payload.is_empty() {
            return Err(Error::FPortWithoutPayload);
        }
        if self.f_port.is_none() && !self.frm_payload.is_empty() {
            return Err(Error::InvalidArgument("f_port"));
        }
        if matches!(self.frm_payload, FrmPayload::MacCommands(_)) && self.f_port != Some(0) {
            return Err(Error::MacCommandInWrongPort);
        }

        let mut fopts: Vec<u8, MAX_FOPTS_LEN> = Vec::new();
        for cmd in &self.fhdr.fopts {
            cmd.append_to(&mut fopts)
                .map_err(|_| Error::InvalidArgument("fopts"))?;
        }

        let mut buf: Vec<u8, MAX_MAC_PAYLOAD_LEN> = Vec::new();
        append(&mut buf, &self.fhdr.dev_addr.to_le_bytes())?;
        append(&mut buf, &[self.fhdr.fctrl.to_byte(self.uplink, fopts.len())])?;
        append(&mut buf, &(self.fhdr.fcnt as u16).to_le_bytes())?;
        append(&mut buf, &fopts)?;

        if let Some(port) = self.f_port {
            append(&mut buf, &[port])?;
            match &self.frm_payload {
                FrmPayload::None => {}
                FrmPayload::Data(bytes) => append(&mut buf, bytes)?,
                FrmPayload::MacCommands(cmds) => {
                    for cmd in cmds {
                        cmd.append_to(&mut buf)?;
                    }
                }
            }
        }
        Ok(buf)
    }

    /// Parses a plaintext MACPayload slice.
    ///
    /// With FPort 0 the FRMPayload is decoded as a MAC-command stream, so
    /// this expects the payload to be decrypted already; [`Self::from_wire`]
    /// is the entry point for payloads straight off the air.
    pub fn from_bytes(data: &[u8], uplink: bool) -> Result<MacPayload, Error> {
        Self::parse(data, uplink, true)
    }

    /// Parses a MACPayload slice whose FRMPayload is still encrypted. The
    /// typed representation appears on [`Self::decrypt_frm_payload`].
    pub fn from_wire(data: &[u8], uplink: bool) -> Result<MacPayload, Error> {
        Self::parse(data, uplink, false)
    }

    fn parse(data: &[u8], uplink: bool, decode_commands: bool) -> Result<MacPayload, Error> {
        if data.len() < 7 {
            return Err(Error::TruncatedFhdr);
        }
        let dev_addr = DevAddr::from_le_slice(&data[0..4]);
        let (fctrl, fopts_len) = FCtrl::from_byte(data[4], uplink);
        let fcnt = u32::from(u16::from_le_bytes([data[5], data[6]]));
        if data.len() - 7 < fopts_len {
            return Err(Error::TruncatedFhdr);
        }
        let fopts = parse_mac_commands(&data[7..7 + fopts_len], uplink)?;

        let rest = &data[7 + fopts_len..];
        let (f_port, frm_payload) = match rest.len() {
            0 => (None, FrmPayload::None),
            1 => return Err(Error::FPortWithoutPayload),
            _ => {
                let port = rest[0];
                let frm = &rest[1..];
                let frm_payload = if port == 0 && decode_commands {
                    FrmPayload::MacCommands(parse_mac_commands(frm, uplink)?)
                } else {
                    let mut bytes = Vec::new();
                    bytes
                        .extend_from_slice(frm)
                        .map_err(|_| Error::BufferTooShort)?;
                    FrmPayload::Data(bytes)
                };
                (Some(port), frm_payload)
            }
        };

        Ok(MacPayload {
            fhdr: FHDR {
                dev_addr,
                fctrl,
                fcnt,
                fopts,
            },
            f_port,
            frm_payload,
            uplink,
        })
    }

    /// Encrypts the FRMPayload in place with AES-128-CTR.
    ///
    /// The caller picks the key: AppSKey for FPort 1 and above, NwkSKey for
    /// FPort 0. A typed MAC-command stream is serialized first; the
    /// encrypted representation is always opaque bytes.
    pub fn encrypt_frm_payload(&mut self, key: &AES128) -> Result<(), Error> {
        if let FrmPayload::MacCommands(cmds) = &self.frm_payload {
            if self.f_port != Some(0) {
                return Err(Error::MacCommandInWrongPort);
            }
            let mut bytes: Vec<u8, MAX_FRM_PAYLOAD_LEN> = Vec::new();
            for cmd in cmds {
                cmd.append_to(&mut bytes)?;
            }
            self.frm_payload = FrmPayload::Data(bytes);
        }
        if let FrmPayload::Data(bytes) = &mut self.frm_payload {
            securityhelpers::encrypt_frm_payload(
                &SoftwareCrypto,
                key,
                bytes,
                self.uplink,
                &self.fhdr.dev_addr,
                self.fhdr.fcnt,
            );
        }
        Ok(())
    }

    /// Decrypts the FRMPayload in place, restoring the typed MAC-command
    /// representation when FPort is 0.
    ///
    /// Decrypting a payload that is already in its typed representation is a
    /// sequencing mistake and fails with [`Error::WrongPayloadType`].
    pub fn decrypt_frm_payload(&mut self, key: &AES128) -> Result<(), Error> {
        let bytes = match &mut self.frm_payload {
            FrmPayload::None => return Ok(()),
            FrmPayload::MacCommands(_) => return Err(Error::WrongPayloadType),
            FrmPayload::Data(bytes) => bytes,
        };
        securityhelpers::encrypt_frm_payload(
            &SoftwareCrypto,
            key,
            bytes,
            self.uplink,
            &self.fhdr.dev_addr,
            self.fhdr.fcnt,
        );
        if self.f_port == Some(0) {
            let cmds = parse_mac_commands(bytes, self.uplink)?;
            self.frm_payload = FrmPayload::MacCommands(cmds);
        }
        Ok(())
    }
}
