//! EU 433 MHz band.

use super::{
    fsk, lora, rx1_channel_identity, size, Band, Channel, MaxPayloadSize, NOT_IMPLEMENTED,
    NO_PAYLOAD,
};

const UPLINK_DRS: &[usize] = &[0, 1, 2, 3, 4, 5];

static CHANNELS: [Channel; 3] = [
    Channel { frequency: 433_175_000, data_rates: UPLINK_DRS },
    Channel { frequency: 433_375_000, data_rates: UPLINK_DRS },
    Channel { frequency: 433_575_000, data_rates: UPLINK_DRS },
];

static RX1_DATA_RATE: &[&[usize]] = &[
    &[0, 0, 0, 0, 0, 0],
    &[1, 0, 0, 0, 0, 0],
    &[2, 1, 0, 0, 0, 0],
    &[3, 2, 1, 0, 0, 0],
    &[4, 3, 2, 1, 0, 0],
    &[5, 4, 3, 2, 1, 0],
    &[6, 5, 4, 3, 2, 1],
    &[7, 6, 5, 4, 3, 2],
];

const MAX_PAYLOAD_SIZE: [MaxPayloadSize; 16] = [
    size(59, 51),
    size(59, 51),
    size(59, 51),
    size(123, 115),
    size(230, 222),
    size(230, 222),
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
];

pub(crate) static BAND: Band = Band {
    default_tx_power: 10,
    cf_list_enabled: true,
    uplink_channels: &CHANNELS,
    downlink_channels: &CHANNELS,
    rx2_frequency: 434_665_000,
    rx2_data_rate: 0,
    data_rates: [
        lora(12, 125),
        lora(11, 125),
        lora(10, 125),
        lora(9, 125),
        lora(8, 125),
        lora(7, 125),
        lora(7, 250),
        fsk(50_000),
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
    get_rx1_channel_func: rx1_channel_identity,
};
