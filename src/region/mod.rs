//! Regional band parameters: channel plans, data-rate tables and RX1
//! downlink derivation.
//!
//! Every region is a static, immutable [`Band`] selected through
//! [`Region::config`]; the values are safe to share across threads.

use crate::join::CFList;
use crate::Error;

mod as923;
mod au915;
mod cn470;
mod cn779;
mod eu433;
mod eu868;
mod in865;
mod kr920;
mod ru864;
mod us915;

/// The modulation of a data rate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Modulation {
    #[default]
    LoRa,
    Fsk,
}

/// DataRate describes one entry of a region's data-rate table. The default
/// (all-zero) value marks a slot that is not implemented by the region.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataRate {
    pub modulation: Modulation,
    pub spread_factor: u8,
    /// Bandwidth in kHz. Unused for FSK.
    pub bandwidth: u32,
    /// Bit rate in bit/s. Used for FSK only.
    pub bit_rate: u32,
}

/// Maximum payload sizes for a data rate: `m` for the MACPayload, `n` for
/// the FRMPayload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MaxPayloadSize {
    pub m: u8,
    pub n: u8,
}

/// Channel describes one channel of a plan: its center frequency in Hz and
/// the data-rate indices usable on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub frequency: u32,
    pub data_rates: &'static [usize],
}

/// Region identifies an ISM band implemented by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    EU868,
    US915,
    AU915,
    CN779,
    CN470,
    EU433,
    AS923,
    KR920,
    IN865,
    RU864,
}

impl Region {
    /// The band parameters of the region.
    pub fn config(self) -> &'static Band {
        match self {
            Region::EU868 => &eu868::BAND,
            Region::US915 => &us915::BAND,
            Region::AU915 => &au915::BAND,
            Region::CN779 => &cn779::BAND,
            Region::CN470 => &cn470::BAND,
            Region::EU433 => &eu433::BAND,
            Region::AS923 => &as923::BAND,
            Region::KR920 => &kr920::BAND,
            Region::IN865 => &in865::BAND,
            Region::RU864 => &ru864::BAND,
        }
    }
}

/// Band holds the immutable radio parameters of one region.
#[derive(Debug)]
pub struct Band {
    /// Default TX power in dBm.
    pub default_tx_power: u8,
    /// Whether the region hands out extra channels through the CFList.
    pub cf_list_enabled: bool,
    pub uplink_channels: &'static [Channel],
    pub downlink_channels: &'static [Channel],
    /// Frequency in Hz of the second receive window.
    pub rx2_frequency: u32,
    /// Data rate of the second receive window.
    pub rx2_data_rate: usize,
    /// The data-rate table; unassigned slots hold the zero [`DataRate`].
    pub data_rates: [DataRate; 16],
    /// Maximum payload sizes per data rate.
    pub max_payload_size: [MaxPayloadSize; 16],
    /// RX1 data rate by [uplink data rate][RX1DRoffset]. An empty row marks
    /// an unimplemented data rate.
    rx1_data_rate: &'static [&'static [usize]],
    get_rx1_channel_func: fn(usize) -> usize,
}

impl Band {
    /// The index of the given data rate in the region's table.
    ///
    /// Unassigned slots never match; when a data rate appears twice (the
    /// US/AU 500 kHz uplink slot reappears in the downlink set) the lowest
    /// index wins.
    pub fn get_data_rate(&self, data_rate: &DataRate) -> Result<usize, Error> {
        let not_implemented = DataRate::default();
        for (i, dr) in self.data_rates.iter().enumerate() {
            if *dr != not_implemented && dr == data_rate {
                return Ok(i);
            }
        }
        Err(Error::InvalidDataRate)
    }

    /// The downlink channel used by the RX1 window for the given uplink
    /// channel.
    pub fn get_rx1_channel(&self, tx_channel: usize) -> usize {
        (self.get_rx1_channel_func)(tx_channel)
    }

    /// The RX1 downlink data rate for an uplink data rate and RX1DRoffset.
    pub fn get_rx1_data_rate_for_offset(
        &self,
        data_rate: usize,
        dr_offset: usize,
    ) -> Result<usize, Error> {
        let row = self
            .rx1_data_rate
            .get(data_rate)
            .filter(|row| !row.is_empty())
            .ok_or(Error::InvalidDataRate)?;
        row.get(dr_offset).copied().ok_or(Error::InvalidDataRateOffset)
    }

    /// The index of the uplink channel with the given frequency that allows
    /// the given data rate.
    pub fn get_channel(&self, frequency: u32, data_rate: usize) -> Result<usize, Error> {
        for (i, channel) in self.uplink_channels.iter().enumerate() {
            if channel.frequency == frequency && channel.data_rates.contains(&data_rate) {
                return Ok(i);
            }
        }
        Err(Error::UnknownChannel)
    }

    /// The index of the channel with the given frequency, taking the extra
    /// channels of a CFList into account for regions that use one.
    pub fn get_channel_for_frequency(
        &self,
        frequency: u32,
        cf_list: Option<&CFList>,
    ) -> Result<usize, Error> {
        for (i, channel) in self.uplink_channels.iter().enumerate() {
            if channel.frequency == frequency {
                return Ok(i);
            }
        }
        if self.cf_list_enabled {
            if let Some(cf_list) = cf_list {
                for (i, &freq) in cf_list.0.iter().enumerate() {
                    if freq != 0 && freq == frequency {
                        return Ok(self.uplink_channels.len() + i);
                    }
                }
            }
        }
        Err(Error::UnknownChannel)
    }

    /// The downlink frequency in Hz for the given channel. CFList entries
    /// overlay the channel indices following the default plan for regions
    /// that use one.
    pub fn get_downlink_frequency(
        &self,
        channel: usize,
        cf_list: Option<&CFList>,
    ) -> Result<u32, Error> {
        if let Some(ch) = self.downlink_channels.get(channel) {
            return Ok(ch.frequency);
        }
        if self.cf_list_enabled {
            if let Some(cf_list) = cf_list {
                let i = channel - self.downlink_channels.len();
                if i < cf_list.0.len() && cf_list.0[i] != 0 {
                    return Ok(cf_list.0[i]);
                }
            }
        }
        Err(Error::UnknownChannel)
    }
}

const NOT_IMPLEMENTED: DataRate = DataRate {
    modulation: Modulation::LoRa,
    spread_factor: 0,
    bandwidth: 0,
    bit_rate: 0,
};

const fn lora(spread_factor: u8, bandwidth: u32) -> DataRate {
    DataRate {
        modulation: Modulation::LoRa,
        spread_factor,
        bandwidth,
        bit_rate: 0,
    }
}

const fn fsk(bit_rate: u32) -> DataRate {
    DataRate {
        modulation: Modulation::Fsk,
        spread_factor: 0,
        bandwidth: 0,
        bit_rate,
    }
}

const fn size(m: u8, n: u8) -> MaxPayloadSize {
    MaxPayloadSize { m, n }
}

const NO_PAYLOAD: MaxPayloadSize = MaxPayloadSize { m: 0, n: 0 };

fn rx1_channel_identity(tx_channel: usize) -> usize {
    tx_channel
}

fn rx1_channel_mod_8(tx_channel: usize) -> usize {
    tx_channel % 8
}

const FIXED_125K_DRS: &[usize] = &[0, 1, 2, 3];
const FIXED_500K_UPLINK_DRS: &[usize] = &[4];
const FIXED_500K_DOWNLINK_DRS: &[usize] = &[8, 9, 10, 11, 12, 13];

/// The 64 + 8 uplink channels of a US/AU-style fixed plan: 64 125 kHz
/// channels 200 kHz apart, then 8 500 kHz channels 1.6 MHz apart.
const fn fixed_uplink_channels(base_125k: u32, base_500k: u32) -> [Channel; 72] {
    let mut channels = [Channel { frequency: 0, data_rates: FIXED_125K_DRS }; 72];
    let mut i = 0;
    while i < 64 {
        channels[i] = Channel {
            frequency: base_125k + 200_000 * i as u32,
            data_rates: FIXED_125K_DRS,
        };
        i += 1;
    }
    while i < 72 {
        channels[i] = Channel {
            frequency: base_500k + 1_600_000 * (i as u32 - 64),
            data_rates: FIXED_500K_UPLINK_DRS,
        };
        i += 1;
    }
    channels
}

/// The 8 500 kHz downlink channels of a US/AU-style fixed plan, 600 kHz
/// apart.
const fn fixed_downlink_channels(base: u32) -> [Channel; 8] {
    let mut channels = [Channel { frequency: 0, data_rates: FIXED_500K_DOWNLINK_DRS }; 8];
    let mut i = 0;
    while i < 8 {
        channels[i] = Channel {
            frequency: base + 600_000 * i as u32,
            data_rates: FIXED_500K_DOWNLINK_DRS,
        };
        i += 1;
    }
    channels
}
