//! US 902-928 MHz band.

use super::{
    fixed_downlink_channels, fixed_uplink_channels, lora, rx1_channel_mod_8, size, Band, Channel,
    MaxPayloadSize, NOT_IMPLEMENTED, NO_PAYLOAD,
};

static UPLINK_CHANNELS: [Channel; 72] = fixed_uplink_channels(902_300_000, 903_000_000);
static DOWNLINK_CHANNELS: [Channel; 8] = fixed_downlink_channels(923_300_000);

static RX1_DATA_RATE: &[&[usize]] = &[
    &[10, 9, 8, 8],
    &[11, 10, 9, 8],
    &[12, 11, 10, 9],
    &[13, 12, 11, 10],
    &[13, 13, 12, 11],
];

const MAX_PAYLOAD_SIZE: [MaxPayloadSize; 16] = [
    size(19, 11),
    size(61, 53),
    size(133, 125),
    size(250, 242),
    size(250, 242),
    NO_PAYLOAD,
    NO_PAYLOAD,
    NO_PAYLOAD,
    size(41, 33),
    size(117, 109),
    size(230, 222),
    size(230, 222),
    size(230, 222),
    size(230, 222),
    NO_PAYLOAD,
    NO_PAYLOAD,
];

pub(crate) static BAND: Band = Band {
    default_tx_power: 20,
    cf_list_enabled: false,
    uplink_channels: &UPLINK_CHANNELS,
    downlink_channels: &DOWNLINK_CHANNELS,
    rx2_frequency: 923_300_000,
    rx2_data_rate: 8,
    data_rates: [
        lora(10, 125),
        lora(9, 125),
        lora(8, 125),
        lora(7, 125),
        lora(8, 500),
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
        lora(12, 500),
        lora(11, 500),
        lora(10, 500),
        lora(9, 500),
        lora(8, 500),
        lora(7, 500),
        NOT_IMPLEMENTED,
        NOT_IMPLEMENTED,
    ],
    max_payload_size: MAX_PAYLOAD_SIZE,
    rx1_data_rate: RX1_DATA_RATE,
    get_rx1_channel_func: rx1_channel_mod_8,
};
