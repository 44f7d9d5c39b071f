//! Library for encoding, decoding and handling LoRaWAN R1.0 packets.
#![no_std]
#![deny(rust_2018_idioms)]
#![doc = include_str!("../README.md")]

pub mod crypto;
pub mod join;
pub mod maccommands;
pub mod macpayload;
pub mod phy;
pub mod region;
pub mod types;

mod securityhelpers;

/// Maximum length in bytes of a PHY payload (MHDR + MACPayload + MIC).
pub const MAX_PHY_PAYLOAD_LEN: usize = 255;

/// Maximum length in bytes of a MACPayload.
pub const MAX_MAC_PAYLOAD_LEN: usize = MAX_PHY_PAYLOAD_LEN - 5;

/// Maximum length in bytes of a FRMPayload.
pub const MAX_FRM_PAYLOAD_LEN: usize = MAX_MAC_PAYLOAD_LEN - 8;

/// Maximum length in bytes of the FOpts field.
pub const MAX_FOPTS_LEN: usize = 15;

/// Errors produced by the codec, crypto and band operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A constructor argument overflows the width of its wire field.
    InvalidArgument(&'static str),
    /// A fixed-size payload was given data of the wrong length.
    SizeMismatch,
    /// Not enough bytes to decode the frame header.
    TruncatedFhdr,
    /// Not enough bytes to decode a PHY payload.
    TruncatedPhy,
    /// FPort is present without any FRMPayload bytes behind it.
    FPortWithoutPayload,
    /// FRMPayload carries MAC commands while FPort is not zero.
    MacCommandInWrongPort,
    /// A CID below 0x80 that is not part of the R1.0 command set.
    UnknownMacCommand,
    /// A MAC command payload or an output buffer ran out of bytes.
    BufferTooShort,
    /// The operation does not apply to the current payload variant.
    WrongPayloadType,
    /// No channel uses the given frequency and data rate.
    UnknownChannel,
    /// The data rate is not implemented by the selected band.
    InvalidDataRate,
    /// The RX1 data rate offset exceeds the maximum of the selected band.
    InvalidDataRateOffset,
    /// The AES primitive failed.
    Crypto,
}
