use heapless::Vec;

use lorawan_codec::crypto::AES128;
use lorawan_codec::maccommands::{DevStatusAnsPayload, MacCommand};
use lorawan_codec::macpayload::{FrmPayload, MacPayload};
use lorawan_codec::types::DevAddr;
use lorawan_codec::Error;

fn mac_commands(cmds: &[MacCommand]) -> FrmPayload {
    let mut set = Vec::new();
    for cmd in cmds {
        set.push(cmd.clone()).unwrap();
    }
    FrmPayload::MacCommands(set)
}

#[test]
fn test_empty_macpayload_encode() {
    let mac = MacPayload::new(true);
    assert_eq!(mac.to_bytes().unwrap().as_slice(), [0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_fport_without_frm_payload_is_err() {
    let mut mac = MacPayload::new(true);
    mac.f_port = Some(1);
    assert_eq!(mac.to_bytes(), Err(Error::FPortWithoutPayload));
}

#[test]
fn test_mac_commands_with_nonzero_fport_is_err() {
    let mut mac = MacPayload::new(true);
    mac.f_port = Some(1);
    mac.frm_payload = mac_commands(&[MacCommand::LinkCheckReq]);
    assert_eq!(mac.to_bytes(), Err(Error::MacCommandInWrongPort));
}

#[test]
fn test_data_payload_encode() {
    let mut mac = MacPayload::new(true);
    mac.fhdr.dev_addr = DevAddr::from(67305985);
    mac.f_port = Some(1);
    mac.frm_payload = FrmPayload::Data(Vec::from_slice(&[5, 6, 7]).unwrap());
    assert_eq!(
        mac.to_bytes().unwrap().as_slice(),
        [1, 2, 3, 4, 0, 0, 0, 1, 5, 6, 7]
    );
}

#[test]
fn test_encrypt_then_decrypt_restores_payload() {
    let key = AES128([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);

    let mut mac = MacPayload::new(true);
    mac.fhdr.dev_addr = DevAddr::from(67305985);
    mac.f_port = Some(1);
    mac.frm_payload = FrmPayload::Data(Vec::from_slice(&[5, 6, 7]).unwrap());

    mac.encrypt_frm_payload(&key).unwrap();
    match &mac.frm_payload {
        FrmPayload::Data(bytes) => assert_ne!(bytes.as_slice(), [5, 6, 7]),
        other => panic!("expected data bytes, got {other:?}"),
    }

    mac.decrypt_frm_payload(&key).unwrap();
    assert_eq!(
        mac.frm_payload,
        FrmPayload::Data(Vec::from_slice(&[5, 6, 7]).unwrap())
    );
}

#[test]
fn test_mac_command_payload_encode() {
    let mut mac = MacPayload::new(true);
    mac.fhdr.dev_addr = DevAddr::from(67305985);
    mac.f_port = Some(0);
    mac.frm_payload = mac_commands(&[MacCommand::DevStatusAns(DevStatusAnsPayload {
        battery: 10,
        margin: 20,
    })]);
    assert_eq!(
        mac.to_bytes().unwrap().as_slice(),
        [1, 2, 3, 4, 0, 0, 0, 0, 6, 10, 20]
    );
}

#[test]
fn test_too_few_fhdr_bytes_is_err() {
    assert_eq!(
        MacPayload::from_bytes(&[1, 2, 3, 4, 0, 0], true),
        Err(Error::TruncatedFhdr)
    );
}

#[test]
fn test_fopts_longer_than_remaining_is_err() {
    assert_eq!(
        MacPayload::from_bytes(&[1, 2, 3, 4, 3, 0, 0, 0, 0], true),
        Err(Error::TruncatedFhdr)
    );
}

#[test]
fn test_fport_without_remaining_bytes_is_err() {
    assert_eq!(
        MacPayload::from_bytes(&[1, 2, 3, 4, 0, 0, 0, 1], true),
        Err(Error::FPortWithoutPayload)
    );
}

#[test]
fn test_truncated_mac_command_is_err() {
    assert_eq!(
        MacPayload::from_bytes(&[1, 2, 3, 4, 0, 0, 0, 0, 6, 10], true),
        Err(Error::BufferTooShort)
    );
}

#[test]
fn test_mac_command_payload_decode() {
    let mac = MacPayload::from_bytes(&[1, 2, 3, 4, 0, 0, 0, 0, 6, 10, 20], true).unwrap();
    assert_eq!(mac.fhdr.dev_addr, DevAddr::from(67305985));
    assert_eq!(mac.f_port, Some(0));
    assert_eq!(
        mac.frm_payload,
        mac_commands(&[MacCommand::DevStatusAns(DevStatusAnsPayload {
            battery: 10,
            margin: 20,
        })])
    );

    // the same value marshals back to the same bytes
    assert_eq!(
        mac.to_bytes().unwrap().as_slice(),
        [1, 2, 3, 4, 0, 0, 0, 0, 6, 10, 20]
    );
}

#[test]
fn test_data_payload_decode() {
    let mac = MacPayload::from_bytes(&[1, 2, 3, 4, 0, 0, 0, 1, 6, 10, 20], true).unwrap();
    assert_eq!(mac.fhdr.dev_addr, DevAddr::from(67305985));
    assert_eq!(mac.f_port, Some(1));
    assert_eq!(
        mac.frm_payload,
        FrmPayload::Data(Vec::from_slice(&[6, 10, 20]).unwrap())
    );
}

#[test]
fn test_fopts_round_trip() {
    let mut mac = MacPayload::new(true);
    mac.fhdr.dev_addr = DevAddr::from(0x01020304);
    mac.fhdr.fcnt = 3;
    mac.fhdr
        .fopts
        .push(MacCommand::LinkCheckReq)
        .unwrap();
    mac.fhdr
        .fopts
        .push(MacCommand::DevStatusAns(DevStatusAnsPayload {
            battery: 255,
            margin: 6,
        }))
        .unwrap();

    let bytes = mac.to_bytes().unwrap();
    // FOptsLen covers both commands
    assert_eq!(bytes[4] & 0x0f, 4);

    let parsed = MacPayload::from_bytes(&bytes, true).unwrap();
    assert_eq!(parsed, mac);
}

#[test]
fn test_decrypt_typed_commands_is_err() {
    let key = AES128([9; 16]);
    let mut mac = MacPayload::new(true);
    mac.f_port = Some(0);
    mac.frm_payload = mac_commands(&[MacCommand::LinkCheckReq]);
    assert_eq!(mac.decrypt_frm_payload(&key), Err(Error::WrongPayloadType));
}
