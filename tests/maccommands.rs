use lorawan_codec::maccommands::{
    mac_commands_len, parse_mac_commands, DevStatusAnsPayload, DutyCycleReqPayload,
    LinkADRAnsPayload, LinkCheckAnsPayload, MacCommand, RX2SetupAnsPayload,
    RXTimingSetupReqPayload,
};
use lorawan_codec::types::{
    ChMask, DLSettings, DataRateRange, DataRateTXPower, Frequency, Redundancy,
};
use lorawan_codec::Error;

#[test]
fn test_ch_mask() {
    assert!(ChMask::default().channels().is_empty());

    assert_eq!(
        ChMask::new(&[1, 2, 17]),
        Err(Error::InvalidArgument("channel"))
    );

    let mask = ChMask::new(&[1, 5, 7, 11]).unwrap();
    assert_eq!(mask.as_bytes(), &[0x51, 0x04]);
    assert_eq!(mask.channels().as_slice(), [1, 5, 7, 11]);
}

#[test]
fn test_redundancy() {
    let r = Redundancy::default();
    assert_eq!(r.ch_mask_cntl(), 0);
    assert_eq!(r.nb_rep(), 0);

    assert!(Redundancy::new(8, 0).is_err());
    assert!(Redundancy::new(0, 16).is_err());

    let r = Redundancy::new(5, 11).unwrap();
    assert_eq!(r.ch_mask_cntl(), 5);
    assert_eq!(r.nb_rep(), 11);
}

#[test]
fn test_data_rate_tx_power() {
    let dr = DataRateTXPower::default();
    assert_eq!(dr.data_rate(), 0);
    assert_eq!(dr.tx_power(), 0);

    assert!(DataRateTXPower::new(16, 0).is_err());
    assert!(DataRateTXPower::new(0, 16).is_err());

    let dr = DataRateTXPower::new(11, 14).unwrap();
    assert_eq!(dr.data_rate(), 11);
    assert_eq!(dr.tx_power(), 14);
}

#[test]
fn test_dl_settings() {
    assert!(DLSettings::new(8, 0).is_err());
    assert!(DLSettings::new(0, 16).is_err());

    let dl = DLSettings::new(6, 7).unwrap();
    assert_eq!(dl.raw_value(), 103);
    assert_eq!(dl.rx1_dr_offset(), 6);
    assert_eq!(dl.rx2_data_rate(), 7);
}

#[test]
fn test_link_adr_ans_payload() {
    let p = LinkADRAnsPayload::default();
    assert!(!p.ch_mask_ack());
    assert!(!p.data_rate_ack());
    assert!(!p.power_ack());

    let p = LinkADRAnsPayload::new(true, false, false);
    assert!(p.ch_mask_ack());
    assert!(!p.data_rate_ack());
    assert!(!p.power_ack());

    let p = LinkADRAnsPayload::new(true, true, true);
    assert!(p.ch_mask_ack());
    assert!(p.data_rate_ack());
    assert!(p.power_ack());
}

#[test]
fn test_rx2_setup_ans_payload() {
    let p = RX2SetupAnsPayload::new(true, false, true);
    assert!(p.channel_ack());
    assert!(!p.rx2_data_rate_ack());
    assert!(p.rx1_dr_offset_ack());
}

#[test]
fn test_duty_cycle_req_payload() {
    assert!(DutyCycleReqPayload::new(16).is_err());
    assert!(DutyCycleReqPayload::new(254).is_err());
    assert_eq!(DutyCycleReqPayload::new(255).unwrap().max_d_cycle(), 255);
    assert_eq!(DutyCycleReqPayload::new(14).unwrap().max_d_cycle(), 14);
}

#[test]
fn test_frequency() {
    let freq = Frequency::new(868_100_000).unwrap();
    assert_eq!(freq.value(), 868_100_000);

    // 2^24 * 100 Hz no longer fits the 24-bit wire field
    assert!(Frequency::new(1_677_721_600).is_err());
    assert!(Frequency::new(1_677_721_500).is_ok());
}

#[test]
fn test_data_rate_range() {
    assert!(DataRateRange::new(5, 2).is_err());
    assert!(DataRateRange::new(0, 16).is_err());

    let range = DataRateRange::new(2, 5).unwrap();
    assert_eq!(range.min_data_rate(), 2);
    assert_eq!(range.max_data_rate(), 5);
    assert_eq!(range.raw_value(), 0x52);
}

#[test]
fn test_parse_uplink_commands() {
    let cmds = parse_mac_commands(&[0x02, 0x06, 10, 20, 0x08], true).unwrap();
    assert_eq!(
        cmds.as_slice(),
        [
            MacCommand::LinkCheckReq,
            MacCommand::DevStatusAns(DevStatusAnsPayload {
                battery: 10,
                margin: 20,
            }),
            MacCommand::RXTimingSetupAns,
        ]
    );
    assert_eq!(mac_commands_len(&cmds), 5);
}

#[test]
fn test_parse_downlink_commands() {
    let cmds = parse_mac_commands(
        &[0x02, 10, 20, 0x03, 0xbe, 0x51, 0x04, 0x5b, 0x08, 0x02],
        false,
    )
    .unwrap();
    assert_eq!(cmds.len(), 3);
    assert_eq!(
        cmds[0],
        MacCommand::LinkCheckAns(LinkCheckAnsPayload {
            margin: 10,
            gw_cnt: 20,
        })
    );
    let MacCommand::LinkADRReq(req) = &cmds[1] else {
        panic!("expected LinkADRReq");
    };
    assert_eq!(req.data_rate_tx_power.data_rate(), 11);
    assert_eq!(req.data_rate_tx_power.tx_power(), 14);
    assert_eq!(req.ch_mask.channels().as_slice(), [1, 5, 7, 11]);
    assert_eq!(req.redundancy.ch_mask_cntl(), 5);
    assert_eq!(req.redundancy.nb_rep(), 11);
    assert_eq!(
        cmds[2],
        MacCommand::RXTimingSetupReq(RXTimingSetupReqPayload::from(0x02))
    );
}

#[test]
fn test_parse_rx_param_setup_req() {
    // DLSettings 0x21, frequency 868.1 MHz (8681000 * 100 Hz)
    let cmds = parse_mac_commands(&[0x05, 0x21, 0xa8, 0x75, 0x84], false).unwrap();
    let MacCommand::RXParamSetupReq(req) = &cmds[0] else {
        panic!("expected RXParamSetupReq");
    };
    assert_eq!(req.dl_settings.rx1_dr_offset(), 2);
    assert_eq!(req.dl_settings.rx2_data_rate(), 1);
    assert_eq!(req.frequency, Frequency::new(868_100_000).unwrap());
}

#[test]
fn test_parse_new_channel_req() {
    let cmds = parse_mac_commands(&[0x07, 3, 0xa8, 0x75, 0x84, 0x50], false).unwrap();
    let MacCommand::NewChannelReq(req) = &cmds[0] else {
        panic!("expected NewChannelReq");
    };
    assert_eq!(req.ch_index, 3);
    assert_eq!(req.frequency.value(), 868_100_000);
    assert_eq!(req.data_rate_range.min_data_rate(), 0);
    assert_eq!(req.data_rate_range.max_data_rate(), 5);
}

#[test]
fn test_unknown_cid_below_0x80_is_err() {
    assert_eq!(
        parse_mac_commands(&[0x10, 1, 2], true),
        Err(Error::UnknownMacCommand)
    );
}

#[test]
fn test_proprietary_cid_absorbs_remainder() {
    let cmds = parse_mac_commands(&[0x02, 0x80, 1, 2, 3], true).unwrap();
    assert_eq!(cmds.len(), 2);
    assert_eq!(cmds[0], MacCommand::LinkCheckReq);
    let MacCommand::Proprietary(p) = &cmds[1] else {
        panic!("expected a proprietary command");
    };
    assert_eq!(p.cid, 0x80);
    assert_eq!(p.bytes.as_slice(), [1, 2, 3]);
    assert_eq!(mac_commands_len(&cmds), 5);
}

#[test]
fn test_truncated_command_is_err() {
    assert_eq!(
        parse_mac_commands(&[0x06, 10], true),
        Err(Error::BufferTooShort)
    );
    assert_eq!(
        parse_mac_commands(&[0x03, 1, 2], false),
        Err(Error::BufferTooShort)
    );
}

#[test]
fn test_empty_stream_is_empty() {
    assert!(parse_mac_commands(&[], true).unwrap().is_empty());
}
