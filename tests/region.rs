use lorawan_codec::join::CFList;
use lorawan_codec::region::{DataRate, Region};
use lorawan_codec::Error;

const ALL_REGIONS: [Region; 10] = [
    Region::EU868,
    Region::US915,
    Region::AU915,
    Region::CN779,
    Region::CN470,
    Region::EU433,
    Region::AS923,
    Region::KR920,
    Region::IN865,
    Region::RU864,
];

#[test]
fn test_au915_uplink_channels() {
    let band = Region::AU915.config();
    let table = [
        (0usize, 915_200_000u32, &[0usize, 1, 2, 3][..]),
        (63, 927_800_000, &[0, 1, 2, 3][..]),
        (64, 915_900_000, &[4][..]),
        (71, 927_100_000, &[4][..]),
    ];
    for (channel, frequency, data_rates) in table {
        assert_eq!(band.uplink_channels[channel].frequency, frequency);
        assert_eq!(band.uplink_channels[channel].data_rates, data_rates);
    }
}

#[test]
fn test_au915_downlink_channels() {
    let band = Region::AU915.config();

    let tx_chan = band.get_channel(915_900_000, 4).unwrap();
    assert_eq!(tx_chan, 64);
    let rx1_chan = band.get_rx1_channel(tx_chan);
    assert_eq!(band.downlink_channels[rx1_chan].frequency, 923_300_000);

    assert_eq!(
        band.get_channel(915_900_000, 3),
        Err(Error::UnknownChannel)
    );

    let tx_chan = band.get_channel(915_200_000, 3).unwrap();
    assert_eq!(tx_chan, 0);
    let rx1_chan = band.get_rx1_channel(tx_chan);
    assert_eq!(band.downlink_channels[rx1_chan].frequency, 923_300_000);
}

#[test]
fn test_au915_data_rate_indices() {
    let band = Region::AU915.config();
    let not_implemented = DataRate::default();
    for (i, dr) in band.data_rates.iter().enumerate() {
        if *dr == not_implemented {
            continue;
        }
        // the 500 kHz SF8 slot appears as both DR4 and DR12; the uplink
        // index wins
        let expected = if i == 12 { 4 } else { i };
        assert_eq!(band.get_data_rate(dr).unwrap(), expected, "DR{i}");
    }
    assert_eq!(
        band.get_data_rate(&not_implemented),
        Err(Error::InvalidDataRate)
    );
}

#[test]
fn test_au915_rx1_data_rate_for_offset() {
    let band = Region::AU915.config();
    assert_eq!(band.get_rx1_data_rate_for_offset(0, 0).unwrap(), 10);
    assert_eq!(band.get_rx1_data_rate_for_offset(0, 1).unwrap(), 9);
    assert_eq!(
        band.get_rx1_data_rate_for_offset(0, 4),
        Err(Error::InvalidDataRateOffset)
    );
    assert_eq!(band.get_rx1_data_rate_for_offset(4, 0).unwrap(), 13);
    assert_eq!(
        band.get_rx1_data_rate_for_offset(5, 0),
        Err(Error::InvalidDataRate)
    );
}

#[test]
fn test_us915_uplink_channels() {
    let band = Region::US915.config();
    let table = [
        (0usize, 902_300_000u32, &[0usize, 1, 2, 3][..]),
        (63, 914_900_000, &[0, 1, 2, 3][..]),
        (64, 903_000_000, &[4][..]),
        (71, 914_200_000, &[4][..]),
    ];
    for (channel, frequency, data_rates) in table {
        assert_eq!(band.uplink_channels[channel].frequency, frequency);
        assert_eq!(band.uplink_channels[channel].data_rates, data_rates);
    }
}

#[test]
fn test_us915_rx1_frequency() {
    let band = Region::US915.config();

    let tx_chan = band.get_channel(914_900_000, 3).unwrap();
    assert_eq!(tx_chan, 63);
    let rx1_chan = band.get_rx1_channel(tx_chan);
    assert_eq!(band.downlink_channels[rx1_chan].frequency, 927_500_000);

    assert_eq!(
        band.get_channel(914_900_000, 4),
        Err(Error::UnknownChannel)
    );

    let tx_chan = band.get_channel(903_000_000, 4).unwrap();
    assert_eq!(tx_chan, 64);
    let rx1_chan = band.get_rx1_channel(tx_chan);
    assert_eq!(band.downlink_channels[rx1_chan].frequency, 923_300_000);
}

#[test]
fn test_eu868_rx1_channel_is_uplink_channel() {
    let band = Region::EU868.config();
    for i in 0..3 {
        assert_eq!(band.get_rx1_channel(i), i);
    }
}

#[test]
fn test_eu868_cf_list_downlink_frequencies() {
    let band = Region::EU868.config();
    let cf_list = CFList([
        867_100_000,
        867_300_000,
        867_500_000,
        867_700_000,
        867_900_000,
    ]);

    let expected = [
        868_100_000u32,
        868_300_000,
        868_500_000,
        867_100_000,
        867_300_000,
        867_500_000,
        867_700_000,
        867_900_000,
    ];
    for (channel, frequency) in expected.into_iter().enumerate() {
        assert_eq!(
            band.get_downlink_frequency(channel, Some(&cf_list)).unwrap(),
            frequency
        );
        assert_eq!(
            band.get_channel_for_frequency(frequency, Some(&cf_list))
                .unwrap(),
            channel
        );
    }

    // beyond the default plan only the CFList provides channels
    assert_eq!(
        band.get_downlink_frequency(3, None),
        Err(Error::UnknownChannel)
    );
    assert_eq!(
        band.get_downlink_frequency(8, Some(&cf_list)),
        Err(Error::UnknownChannel)
    );
    assert_eq!(
        band.get_channel_for_frequency(867_100_000, None),
        Err(Error::UnknownChannel)
    );
}

#[test]
fn test_cn470_rx1_channel() {
    let band = Region::CN470.config();
    assert_eq!(band.uplink_channels.len(), 96);
    assert_eq!(band.downlink_channels.len(), 48);
    assert_eq!(band.get_rx1_channel(50), 2);
    assert_eq!(band.uplink_channels[0].frequency, 470_300_000);
    assert_eq!(band.downlink_channels[0].frequency, 500_300_000);
}

#[test]
fn test_in865_unimplemented_dr6() {
    let band = Region::IN865.config();
    assert_eq!(
        band.get_rx1_data_rate_for_offset(6, 0),
        Err(Error::InvalidDataRate)
    );
    assert_eq!(band.get_rx1_data_rate_for_offset(7, 0).unwrap(), 7);
}

#[test]
fn test_every_uplink_channel_resolves_to_itself() {
    for region in ALL_REGIONS {
        let band = region.config();
        for (i, channel) in band.uplink_channels.iter().enumerate() {
            for &dr in channel.data_rates {
                assert_eq!(
                    band.get_channel(channel.frequency, dr).unwrap(),
                    i,
                    "{region:?} channel {i} DR{dr}"
                );
            }
        }
    }
}

#[test]
fn test_rx2_data_rate_is_implemented() {
    let not_implemented = DataRate::default();
    for region in ALL_REGIONS {
        let band = region.config();
        assert_ne!(
            band.data_rates[band.rx2_data_rate], not_implemented,
            "{region:?}"
        );
        assert!(band.default_tx_power > 0, "{region:?}");
    }
}

#[test]
fn test_rx1_offset_zero_is_identity_for_eu_style_plans() {
    for region in [Region::EU868, Region::CN779, Region::EU433, Region::RU864] {
        let band = region.config();
        for dr in 0..8 {
            assert_eq!(band.get_rx1_data_rate_for_offset(dr, 0).unwrap(), dr);
        }
        assert_eq!(
            band.get_rx1_data_rate_for_offset(8, 0),
            Err(Error::InvalidDataRate)
        );
        assert_eq!(
            band.get_rx1_data_rate_for_offset(0, 6),
            Err(Error::InvalidDataRateOffset)
        );
    }
}
