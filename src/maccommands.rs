//! The R1.0 MAC command set and the codec for MAC command streams.
//!
//! Each command is identified by a CID; requests and answers share the CID
//! and are told apart by the direction the frame travels. CIDs 0x80 and
//! above are proprietary extensions and pass through as opaque bytes.

use heapless::Vec;

use crate::types::{ChMask, DLSettings, DataRateRange, DataRateTXPower, Frequency, Redundancy};
use crate::Error;

/// Maximum number of commands in a single stream.
pub const MAX_MAC_COMMANDS: usize = 15;

/// Maximum number of payload bytes of a proprietary command.
pub const MAX_PROPRIETARY_LEN: usize = 64;

/// An ordered set of MAC commands, as carried in FOpts or in FRMPayload at
/// FPort 0.
pub type MacCommandSet = Vec<MacCommand, MAX_MAC_COMMANDS>;

/// LinkCheckAnsPayload represents the LinkCheckAns payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCheckAnsPayload {
    /// The link margin in dB of the last successfully received LinkCheckReq.
    pub margin: u8,
    /// The number of gateways that received the last LinkCheckReq.
    pub gw_cnt: u8,
}

/// LinkADRReqPayload represents the LinkADRReq payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkADRReqPayload {
    pub data_rate_tx_power: DataRateTXPower,
    pub ch_mask: ChMask,
    pub redundancy: Redundancy,
}

/// LinkADRAnsPayload represents the LinkADRAns payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkADRAnsPayload(u8);

impl LinkADRAnsPayload {
    /// Creates a new LinkADRAnsPayload with the given acknowledgements.
    pub fn new(ch_mask_ack: bool, data_rate_ack: bool, power_ack: bool) -> LinkADRAnsPayload {
        LinkADRAnsPayload(
            ch_mask_ack as u8 | (data_rate_ack as u8) << 1 | (power_ack as u8) << 2,
        )
    }

    /// Whether the channel mask was successfully interpreted.
    pub fn ch_mask_ack(&self) -> bool {
        self.0 & (1 << 0) != 0
    }

    /// Whether the data rate was successfully set.
    pub fn data_rate_ack(&self) -> bool {
        self.0 & (1 << 1) != 0
    }

    /// Whether the power level was successfully set.
    pub fn power_ack(&self) -> bool {
        self.0 & (1 << 2) != 0
    }
}

impl From<u8> for LinkADRAnsPayload {
    fn from(v: u8) -> Self {
        LinkADRAnsPayload(v)
    }
}

/// DutyCycleReqPayload carries the MaxDCycle value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DutyCycleReqPayload(u8);

impl DutyCycleReqPayload {
    /// Creates a new DutyCycleReqPayload. Valid MaxDCycle values are 0 to 15
    /// and 255.
    pub fn new(max_d_cycle: u8) -> Result<DutyCycleReqPayload, Error> {
        if max_d_cycle > 15 && max_d_cycle != 255 {
            return Err(Error::InvalidArgument("max_d_cycle"));
        }
        Ok(DutyCycleReqPayload(max_d_cycle))
    }

    /// The MaxDCycle value.
    pub fn max_d_cycle(&self) -> u8 {
        self.0
    }
}

impl From<u8> for DutyCycleReqPayload {
    fn from(v: u8) -> Self {
        DutyCycleReqPayload(v)
    }
}

/// RX2SetupReqPayload represents the RXParamSetupReq payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RX2SetupReqPayload {
    pub dl_settings: DLSettings,
    pub frequency: Frequency,
}

/// RX2SetupAnsPayload represents the RXParamSetupAns payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RX2SetupAnsPayload(u8);

impl RX2SetupAnsPayload {
    /// Creates a new RX2SetupAnsPayload with the given acknowledgements.
    pub fn new(
        channel_ack: bool,
        rx2_data_rate_ack: bool,
        rx1_dr_offset_ack: bool,
    ) -> RX2SetupAnsPayload {
        RX2SetupAnsPayload(
            channel_ack as u8 | (rx2_data_rate_ack as u8) << 1 | (rx1_dr_offset_ack as u8) << 2,
        )
    }

    /// Whether the RX2 channel was successfully set.
    pub fn channel_ack(&self) -> bool {
        self.0 & (1 << 0) != 0
    }

    /// Whether the RX2 data rate was successfully set.
    pub fn rx2_data_rate_ack(&self) -> bool {
        self.0 & (1 << 1) != 0
    }

    /// Whether the RX1 data rate offset was successfully set.
    pub fn rx1_dr_offset_ack(&self) -> bool {
        self.0 & (1 << 2) != 0
    }
}

impl From<u8> for RX2SetupAnsPayload {
    fn from(v: u8) -> Self {
        RX2SetupAnsPayload(v)
    }
}

/// DevStatusAnsPayload represents the DevStatusAns payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevStatusAnsPayload {
    /// The battery level: 0 for external power, 255 when it could not be
    /// measured.
    pub battery: u8,
    /// The demodulation margin of the last received DevStatusReq.
    pub margin: u8,
}

/// NewChannelReqPayload represents the NewChannelReq payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewChannelReqPayload {
    /// The index of the channel being created or modified.
    pub ch_index: u8,
    pub frequency: Frequency,
    pub data_rate_range: DataRateRange,
}

/// NewChannelAnsPayload represents the NewChannelAns payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NewChannelAnsPayload(u8);

impl NewChannelAnsPayload {
    /// Creates a new NewChannelAnsPayload with the given acknowledgements.
    pub fn new(channel_freq_ack: bool, data_rate_range_ack: bool) -> NewChannelAnsPayload {
        NewChannelAnsPayload(channel_freq_ack as u8 | (data_rate_range_ack as u8) << 1)
    }

    /// Whether the channel frequency was accepted.
    pub fn channel_freq_ack(&self) -> bool {
        self.0 & (1 << 0) != 0
    }

    /// Whether the data rate range was accepted.
    pub fn data_rate_range_ack(&self) -> bool {
        self.0 & (1 << 1) != 0
    }
}

impl From<u8> for NewChannelAnsPayload {
    fn from(v: u8) -> Self {
        NewChannelAnsPayload(v)
    }
}

/// RXTimingSetupReqPayload carries the delay before the first RX window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RXTimingSetupReqPayload(u8);

impl RXTimingSetupReqPayload {
    /// Creates a new RXTimingSetupReqPayload. The maximum delay is 15.
    pub fn new(delay: u8) -> Result<RXTimingSetupReqPayload, Error> {
        if delay > 15 {
            return Err(Error::InvalidArgument("delay"));
        }
        Ok(RXTimingSetupReqPayload(delay))
    }

    /// Delay in seconds before the first RX window.
    pub fn delay(&self) -> u8 {
        self.0 & 0x0f
    }
}

impl From<u8> for RXTimingSetupReqPayload {
    fn from(v: u8) -> Self {
        RXTimingSetupReqPayload(v)
    }
}

/// ProprietaryPayload carries a proprietary command (CID 0x80 and above) as
/// opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProprietaryPayload {
    pub cid: u8,
    pub bytes: Vec<u8, MAX_PROPRIETARY_LEN>,
}

/// A single typed MAC command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacCommand {
    LinkCheckReq,
    LinkCheckAns(LinkCheckAnsPayload),
    LinkADRReq(LinkADRReqPayload),
    LinkADRAns(LinkADRAnsPayload),
    DutyCycleReq(DutyCycleReqPayload),
    DutyCycleAns,
    RXParamSetupReq(RX2SetupReqPayload),
    RXParamSetupAns(RX2SetupAnsPayload),
    DevStatusReq,
    DevStatusAns(DevStatusAnsPayload),
    NewChannelReq(NewChannelReqPayload),
    NewChannelAns(NewChannelAnsPayload),
    RXTimingSetupReq(RXTimingSetupReqPayload),
    RXTimingSetupAns,
    Proprietary(ProprietaryPayload),
}

impl MacCommand {
    /// The command identifier.
    pub fn cid(&self) -> u8 {
        match self {
            MacCommand::LinkCheckReq | MacCommand::LinkCheckAns(_) => 0x02,
            MacCommand::LinkADRReq(_) | MacCommand::LinkADRAns(_) => 0x03,
            MacCommand::DutyCycleReq(_) | MacCommand::DutyCycleAns => 0x04,
            MacCommand::RXParamSetupReq(_) | MacCommand::RXParamSetupAns(_) => 0x05,
            MacCommand::DevStatusReq | MacCommand::DevStatusAns(_) => 0x06,
            MacCommand::NewChannelReq(_) | MacCommand::NewChannelAns(_) => 0x07,
            MacCommand::RXTimingSetupReq(_) | MacCommand::RXTimingSetupAns => 0x08,
            MacCommand::Proprietary(p) => p.cid,
        }
    }

    /// The length of the command payload, without the CID.
    pub fn payload_len(&self) -> usize {
        match self {
            MacCommand::LinkCheckReq
            | MacCommand::DutyCycleAns
            | MacCommand::DevStatusReq
            | MacCommand::RXTimingSetupAns => 0,
            MacCommand::LinkADRAns(_)
            | MacCommand::DutyCycleReq(_)
            | MacCommand::RXParamSetupAns(_)
            | MacCommand::NewChannelAns(_)
            | MacCommand::RXTimingSetupReq(_) => 1,
            MacCommand::LinkCheckAns(_) | MacCommand::DevStatusAns(_) => 2,
            MacCommand::LinkADRReq(_) | MacCommand::RXParamSetupReq(_) => 4,
            MacCommand::NewChannelReq(_) => 5,
            MacCommand::Proprietary(p) => p.bytes.len(),
        }
    }

    /// Appends the CID and payload bytes to `buf`.
    pub(crate) fn append_to<const N: usize>(&self, buf: &mut Vec<u8, N>) -> Result<(), Error> {
        buf.push(self.cid()).map_err(|_| Error::BufferTooShort)?;
        let res = match self {
            MacCommand::LinkCheckReq
            | MacCommand::DutyCycleAns
            | MacCommand::DevStatusReq
            | MacCommand::RXTimingSetupAns => Ok(()),
            MacCommand::LinkCheckAns(p) => buf.extend_from_slice(&[p.margin, p.gw_cnt]),
            MacCommand::LinkADRReq(p) => {
                let mask = p.ch_mask.as_bytes();
                buf.extend_from_slice(&[
                    p.data_rate_tx_power.raw_value(),
                    mask[0],
                    mask[1],
                    p.redundancy.raw_value(),
                ])
            }
            MacCommand::LinkADRAns(p) => buf.extend_from_slice(&[p.0]),
            MacCommand::DutyCycleReq(p) => buf.extend_from_slice(&[p.0]),
            MacCommand::RXParamSetupReq(p) => {
                let freq = p.frequency.to_wire();
                buf.extend_from_slice(&[p.dl_settings.raw_value(), freq[0], freq[1], freq[2]])
            }
            MacCommand::RXParamSetupAns(p) => buf.extend_from_slice(&[p.0]),
            MacCommand::DevStatusAns(p) => buf.extend_from_slice(&[p.battery, p.margin]),
            MacCommand::NewChannelReq(p) => {
                let freq = p.frequency.to_wire();
                buf.extend_from_slice(&[
                    p.ch_index,
                    freq[0],
                    freq[1],
                    freq[2],
                    p.data_rate_range.raw_value(),
                ])
            }
            MacCommand::NewChannelAns(p) => buf.extend_from_slice(&[p.0]),
            MacCommand::RXTimingSetupReq(p) => buf.extend_from_slice(&[p.0]),
            MacCommand::Proprietary(p) => buf.extend_from_slice(&p.bytes),
        };
        res.map_err(|_| Error::BufferTooShort)
    }
}

/// The fixed payload length for a known `(CID, direction)` pair.
pub fn registered_payload_len(cid: u8, uplink: bool) -> Result<usize, Error> {
    match (cid, uplink) {
        (0x02, true) => Ok(0),
        (0x02, false) => Ok(2),
        (0x03, true) => Ok(1),
        (0x03, false) => Ok(4),
        (0x04, true) => Ok(0),
        (0x04, false) => Ok(1),
        (0x05, true) => Ok(1),
        (0x05, false) => Ok(4),
        (0x06, true) => Ok(2),
        (0x06, false) => Ok(0),
        (0x07, true) => Ok(1),
        (0x07, false) => Ok(5),
        (0x08, true) => Ok(0),
        (0x08, false) => Ok(1),
        _ => Err(Error::UnknownMacCommand),
    }
}

/// Length in bytes of a sequence of MAC commands, including CIDs.
pub fn mac_commands_len(cmds: &[MacCommand]) -> usize {
    cmds.iter().map(|mc| mc.payload_len() + 1).sum()
}

fn parse_one(cid: u8, payload: &[u8], uplink: bool) -> MacCommand {
    match (cid, uplink) {
        (0x02, true) => MacCommand::LinkCheckReq,
        (0x02, false) => MacCommand::LinkCheckAns(LinkCheckAnsPayload {
            margin: payload[0],
            gw_cnt: payload[1],
        }),
        (0x03, true) => MacCommand::LinkADRAns(LinkADRAnsPayload(payload[0])),
        (0x03, false) => MacCommand::LinkADRReq(LinkADRReqPayload {
            data_rate_tx_power: DataRateTXPower::from(payload[0]),
            ch_mask: ChMask::new_from_raw([payload[1], payload[2]]),
            redundancy: Redundancy::from(payload[3]),
        }),
        (0x04, true) => MacCommand::DutyCycleAns,
        (0x04, false) => MacCommand::DutyCycleReq(DutyCycleReqPayload(payload[0])),
        (0x05, true) => MacCommand::RXParamSetupAns(RX2SetupAnsPayload(payload[0])),
        (0x05, false) => MacCommand::RXParamSetupReq(RX2SetupReqPayload {
            dl_settings: DLSettings::from(payload[0]),
            frequency: Frequency::from_wire(&payload[1..4]),
        }),
        (0x06, true) => MacCommand::DevStatusAns(DevStatusAnsPayload {
            battery: payload[0],
            margin: payload[1],
        }),
        (0x06, false) => MacCommand::DevStatusReq,
        (0x07, true) => MacCommand::NewChannelAns(NewChannelAnsPayload(payload[0])),
        (0x07, false) => MacCommand::NewChannelReq(NewChannelReqPayload {
            ch_index: payload[0],
            frequency: Frequency::from_wire(&payload[1..4]),
            data_rate_range: DataRateRange::new_from_raw(payload[4]),
        }),
        (0x08, true) => MacCommand::RXTimingSetupAns,
        (0x08, false) => MacCommand::RXTimingSetupReq(RXTimingSetupReqPayload(payload[0])),
        // the caller only dispatches registered pairs here
        _ => unreachable!(),
    }
}

/// Parses a stream of MAC commands with the direction the frame travels.
///
/// An unknown CID of 0x80 or above absorbs the remainder of the stream as a
/// proprietary command; an unknown CID below 0x80 is an error.
pub fn parse_mac_commands(data: &[u8], uplink: bool) -> Result<MacCommandSet, Error> {
    let mut cmds = MacCommandSet::new();
    let mut index = 0;
    while index < data.len() {
        let cid = data[index];
        index += 1;
        let cmd = if cid >= 0x80 {
            let mut bytes = Vec::new();
            bytes
                .extend_from_slice(&data[index..])
                .map_err(|_| Error::BufferTooShort)?;
            index = data.len();
            MacCommand::Proprietary(ProprietaryPayload { cid, bytes })
        } else {
            let len = registered_payload_len(cid, uplink)?;
            if data.len() - index < len {
                return Err(Error::BufferTooShort);
            }
            let cmd = parse_one(cid, &data[index..index + len], uplink);
            index += len;
            cmd
        };
        cmds.push(cmd).map_err(|_| Error::BufferTooShort)?;
    }
    Ok(cmds)
}
