//! CN 470-510 MHz band.

use super::{lora, size, Band, Channel, MaxPayloadSize, NOT_IMPLEMENTED, NO_PAYLOAD};

const UPLINK_DRS: &[usize] = &[0, 1, 2, 3, 4, 5];

/// 96 uplink channels from 470.3 MHz, 200 kHz apart.
const fn uplink_channels() -> [Channel; 96] {
    let mut channels = [Channel { frequency: 0, data_rates: UPLINK_DRS }; 96];
    let mut i = 0;
    while i < 96 {
        channels[i] = Channel {
            frequency: 470_300_000 + 200_000 * i as u32,
            data_rates: UPLINK_DRS,
        };
        i += 1;
    }
    channels
}

/// 48 downlink channels from 500.3 MHz, 200 kHz apart.
const fn downlink_channels() -> [Channel; 48] {
    let mut channels = [Channel { frequency: 0, data_rates: UPLINK_DRS }; 48];
    let mut i = 0;
    while i < 48 {
        channels[i] = Channel {
            frequency: 500_300_000 + 200_000 * i as u32,
            data_rates: UPLINK_DRS,
        };
        i += 1;
    }
    channels
}

static UPLINK_CHANNELS: [Channel; 96] = uplink_channels();
static DOWNLINK_CHANNELS: [Channel; 48] = downlink_channels();

fn rx1_channel_mod_48(tx_channel: usize) -> usize {
    tx_channel % 48
}

static RX1_DATA_RATE: &[&[usize]] = &[
    &[0, 0, 0, 0, 0, 0],
    &[1, 0, 0, 0, 0, 0],
    &[2, 1, 0, 0, 0, 0],
    &[3, 2, 1, 0, 0, 0],
    &[4, 3, 2, 1, 0, 0],
    &[5, 4, 3, 2, 1, 0],
];

const MAX_PAYLOAD_SIZE: [MaxPayloadSize; 16] = [
    size(59, 51),
    size(59, 51),
    size(59, 51),
    size(123, 115),
    size(230, 222),
    size(230, 222),
    NO_PAYLOAD,
    NO_PAYLOAD,
    NO_PAYLOAD,
    NO_PAYLOAD,
    NO_PAYLOAD,
    NO_PAYLOAD,
    NO_PAYLOAD,
    NO_PAYLOAD,
    NO_PAYLOAD,
    NO_PAYLOAD,
];

pub(crate) static BAND: Band = Band {
    default_tx_power: 14,
    cf_list_enabled: false,
    uplink_channels: &UPLINK_CHANNELS,
    downlink_channels: &DOWNLINK_CHANNELS,
    rx2_frequency: 505_300_000,
    rx2_data_rate: 0,
    data_rates: [
        lora(12, 125),
        lora(11, 125),
        lora(10, 125),
        lora(9, 125),
        lora(8, 125),
        lora(7, 125),
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
    ],
    max_payload_size: MAX_PAYLOAD_SIZE,
    rx1_data_rate: RX1_DATA_RATE,
    get_rx1_channel_func: rx1_channel_mod_48,
};
