//! Wire primitives shared by the payload codecs: device identifiers,
//! nonces, frequencies and the packed single-byte fields.
//!
//! Identifiers and nonces are stored in natural order (most significant byte
//! first) and emitted on the wire least significant byte first, as LoRaWAN
//! requires.

use heapless::Vec;

use crate::Error;

macro_rules! fixed_len_struct {
    (
        $(#[$outer:meta])*
        pub struct $type:ident[$size:expr];
    ) => {
        $(#[$outer])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $type([u8; $size]);

        impl $type {
            /// Creates a value from bytes in natural order.
            pub fn new(bytes: [u8; $size]) -> $type {
                $type(bytes)
            }

            /// The bytes in natural order.
            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            /// The bytes in LoRaWAN wire order.
            pub fn to_le_bytes(&self) -> [u8; $size] {
                let mut bytes = self.0;
                bytes.reverse();
                bytes
            }

            /// Reads a value from wire-order bytes. The slice length must
            /// match the width of the type.
            pub(crate) fn from_le_slice(data: &[u8]) -> $type {
                let mut bytes = [0u8; $size];
                bytes.copy_from_slice(data);
                bytes.reverse();
                $type(bytes)
            }
        }

        impl From<[u8; $size]> for $type {
            fn from(v: [u8; $size]) -> Self {
                $type(v)
            }
        }

        impl AsRef<[u8]> for $type {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

fixed_len_struct! {
    /// DevAddr represents a 32-bit device address.
    pub struct DevAddr[4];
}

impl DevAddr {
    /// The 7 most significant bits identifying the network.
    pub fn nwk_id(&self) -> u8 {
        self.0[0] >> 1
    }
}

impl From<u32> for DevAddr {
    fn from(v: u32) -> Self {
        DevAddr(v.to_be_bytes())
    }
}

impl From<DevAddr> for u32 {
    fn from(v: DevAddr) -> Self {
        u32::from_be_bytes(v.0)
    }
}

fixed_len_struct! {
    /// EUI64 represents a 64-bit extended unique identifier.
    pub struct EUI64[8];
}

impl From<u64> for EUI64 {
    fn from(v: u64) -> Self {
        EUI64(v.to_be_bytes())
    }
}

impl From<EUI64> for u64 {
    fn from(v: EUI64) -> Self {
        u64::from_be_bytes(v.0)
    }
}

fixed_len_struct! {
    /// DevNonce represents a 16-bit device nonce.
    pub struct DevNonce[2];
}

impl From<u16> for DevNonce {
    fn from(v: u16) -> Self {
        DevNonce(v.to_be_bytes())
    }
}

fixed_len_struct! {
    /// AppNonce represents a 24-bit network server nonce.
    pub struct AppNonce[3];
}

impl From<u32> for AppNonce {
    /// Takes the low 24 bits of the value.
    fn from(v: u32) -> Self {
        AppNonce([(v >> 16) as u8, (v >> 8) as u8, v as u8])
    }
}

fixed_len_struct! {
    /// NetId represents a 24-bit network identifier.
    pub struct NetId[3];
}

impl From<u32> for NetId {
    /// Takes the low 24 bits of the value.
    fn from(v: u32) -> Self {
        NetId([(v >> 16) as u8, (v >> 8) as u8, v as u8])
    }
}

/// Frequency represents a channel frequency in Hz.
///
/// On the wire a frequency is a 24-bit little-endian integer in units of
/// 100 Hz; the conversion happens at this boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frequency(u32);

impl Frequency {
    /// Creates a new Frequency from a value in Hz. The value divided by 100
    /// must fit in 24 bits.
    pub fn new(hz: u32) -> Result<Frequency, Error> {
        if hz / 100 >= (1 << 24) {
            return Err(Error::InvalidArgument("frequency"));
        }
        Ok(Frequency(hz))
    }

    /// The frequency in Hz.
    pub fn value(&self) -> u32 {
        self.0
    }

    pub(crate) fn to_wire(self) -> [u8; 3] {
        let v = self.0 / 100;
        [v as u8, (v >> 8) as u8, (v >> 16) as u8]
    }

    /// Reads a frequency from its 3-byte wire form.
    ///
    /// The slice length must be exactly 3.
    pub(crate) fn from_wire(data: &[u8]) -> Frequency {
        let v = u32::from(data[0]) | u32::from(data[1]) << 8 | u32::from(data[2]) << 16;
        Frequency(v * 100)
    }
}

/// ChMask represents the 16-channel mask of LinkADRReq.
///
/// Channel numbers are 1-based, as in the MAC command definition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChMask([u8; 2]);

impl ChMask {
    /// Creates a new ChMask with the given channel numbers enabled.
    /// Valid channel numbers are 1 to 16.
    pub fn new(channels: &[u8]) -> Result<ChMask, Error> {
        let mut mask = [0u8; 2];
        for &c in channels {
            if c < 1 || c > 16 {
                return Err(Error::InvalidArgument("channel"));
            }
            let c = c - 1;
            mask[(c / 8) as usize] |= 1 << (c % 8);
        }
        Ok(ChMask(mask))
    }

    /// Creates a ChMask from its 2-byte wire form.
    pub fn new_from_raw(bytes: [u8; 2]) -> ChMask {
        ChMask(bytes)
    }

    /// The channels enabled in the mask, in increasing order.
    pub fn channels(&self) -> Vec<u8, 16> {
        let mut chans = Vec::new();
        for c in 0u8..16 {
            if self.0[(c / 8) as usize] & (1 << (c % 8)) != 0 {
                // the vector holds at most 16 entries
                let _ = chans.push(c + 1);
            }
        }
        chans
    }

    /// The 2-byte wire form.
    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

/// DLSettings packs the RX1 data rate offset and the RX2 data rate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DLSettings(u8);

impl DLSettings {
    /// Creates a new DLSettings. The maximum value for `rx1_dr_offset` is 7,
    /// the maximum value for `rx2_data_rate` is 15.
    pub fn new(rx1_dr_offset: u8, rx2_data_rate: u8) -> Result<DLSettings, Error> {
        if rx1_dr_offset > 7 {
            return Err(Error::InvalidArgument("rx1_dr_offset"));
        }
        if rx2_data_rate > 15 {
            return Err(Error::InvalidArgument("rx2_data_rate"));
        }
        Ok(DLSettings(rx1_dr_offset << 4 | rx2_data_rate))
    }

    /// The offset between the uplink data rate and the RX1 downlink data
    /// rate.
    pub fn rx1_dr_offset(&self) -> u8 {
        (self.0 >> 4) & 0x07
    }

    /// The data rate of a downlink using the second receive window.
    pub fn rx2_data_rate(&self) -> u8 {
        self.0 & 0x0f
    }

    /// The integer value of the DLSettings.
    pub fn raw_value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for DLSettings {
    fn from(v: u8) -> Self {
        DLSettings(v)
    }
}

/// Redundancy represents the LinkADRReq redundancy field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Redundancy(u8);

impl Redundancy {
    /// Creates a new Redundancy. The maximum value for `ch_mask_cntl` is 7,
    /// the maximum value for `nb_rep` is 15.
    pub fn new(ch_mask_cntl: u8, nb_rep: u8) -> Result<Redundancy, Error> {
        if ch_mask_cntl > 7 {
            return Err(Error::InvalidArgument("ch_mask_cntl"));
        }
        if nb_rep > 15 {
            return Err(Error::InvalidArgument("nb_rep"));
        }
        Ok(Redundancy(ch_mask_cntl << 4 | nb_rep))
    }

    /// Controls the interpretation of the ChMask bit mask.
    pub fn ch_mask_cntl(&self) -> u8 {
        (self.0 >> 4) & 0x07
    }

    /// The number of transmissions for each uplink message.
    pub fn nb_rep(&self) -> u8 {
        self.0 & 0x0f
    }

    /// The integer value of the Redundancy.
    pub fn raw_value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Redundancy {
    fn from(v: u8) -> Self {
        Redundancy(v)
    }
}

/// DataRateTXPower packs the requested data rate and TX output power of
/// LinkADRReq.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataRateTXPower(u8);

impl DataRateTXPower {
    /// Creates a new DataRateTXPower. The maximum value for both `data_rate`
    /// and `tx_power` is 15.
    pub fn new(data_rate: u8, tx_power: u8) -> Result<DataRateTXPower, Error> {
        if data_rate > 15 {
            return Err(Error::InvalidArgument("data_rate"));
        }
        if tx_power > 15 {
            return Err(Error::InvalidArgument("tx_power"));
        }
        Ok(DataRateTXPower(data_rate << 4 | tx_power))
    }

    /// The requested data rate.
    pub fn data_rate(&self) -> u8 {
        self.0 >> 4
    }

    /// The requested TX output power.
    pub fn tx_power(&self) -> u8 {
        self.0 & 0x0f
    }

    /// The integer value of the DataRateTXPower.
    pub fn raw_value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for DataRateTXPower {
    fn from(v: u8) -> Self {
        DataRateTXPower(v)
    }
}

/// DataRateRange represents the allowed data rate range of a channel as
/// carried by NewChannelReq.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataRateRange(u8);

impl DataRateRange {
    /// Creates a new DataRateRange. Both values must fit in 4 bits and the
    /// maximum must not be below the minimum.
    pub fn new(min_data_rate: u8, max_data_rate: u8) -> Result<DataRateRange, Error> {
        if min_data_rate > 15 || max_data_rate > 15 {
            return Err(Error::InvalidArgument("data rate"));
        }
        if max_data_rate < min_data_rate {
            return Err(Error::InvalidArgument("data rate range"));
        }
        Ok(DataRateRange(max_data_rate << 4 | min_data_rate))
    }

    /// Creates a DataRateRange from its wire byte, without checking it.
    pub fn new_from_raw(byte: u8) -> DataRateRange {
        DataRateRange(byte)
    }

    /// The highest data rate allowed on the channel.
    pub fn max_data_rate(&self) -> u8 {
        self.0 >> 4
    }

    /// The lowest data rate allowed on the channel.
    pub fn min_data_rate(&self) -> u8 {
        self.0 & 0x0f
    }

    /// The integer value of the DataRateRange.
    pub fn raw_value(&self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frequency_wire_round_trip() {
        let freq = Frequency::new(868_100_000).unwrap();
        assert_eq!(freq.to_wire(), [0xa8, 0x75, 0x84]);
        assert_eq!(Frequency::from_wire(&[0xa8, 0x75, 0x84]), freq);
    }

    #[test]
    fn dev_addr_wire_order() {
        let addr = DevAddr::from(0x01020304);
        assert_eq!(addr.as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(addr.to_le_bytes(), [4, 3, 2, 1]);
        assert_eq!(DevAddr::from_le_slice(&[4, 3, 2, 1]), addr);
        assert_eq!(addr.nwk_id(), 0);
    }

    #[test]
    fn nonce_wire_order() {
        let nonce = AppNonce::from(5);
        assert_eq!(nonce.as_bytes(), &[0, 0, 5]);
        assert_eq!(nonce.to_le_bytes(), [5, 0, 0]);
    }
}
