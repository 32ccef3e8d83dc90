use chrono::{TimeZone, Utc};
use rplib_assert::openpgp::{TAG_PUBLIC_KEY, TAG_USER_ID};
use rplib_assert::{encode_keyring_key, ModelAssertion, Packet, SerialAssertion};

const MODEL: &str = "type: model
authority-id: my-brand
series: 16
brand-id: my-brand
model: my-gateway
architecture: armhf
gadget: pi3
kernel: pi2-kernel
timestamp: 2016-12-18T10:00:00Z
sign-key-sha3-384: Jv8_JiHiIzJVcO9M55pPdqSDWUvuhfDIBJUS-3VW7F_idjix7Ffn5qMxB21ZQuij

AcLBXAQAAQoABgUCWFZGNAAKCRAHKljtl9kuLm9CD/9tZyNA

";

fn exported_keyring() -> Vec<u8> {
    let mut exported = Packet::new(TAG_PUBLIC_KEY, vec![4, 0x58, 0x56, 0x46, 0x34, 1, 0, 1, 0x80])
        .to_bytes();
    exported.extend(Packet::new(TAG_USER_ID, b"SERIAL".to_vec()).to_bytes());
    exported
}

#[test]
fn serial_assertion_matches_golden_text() {
    let model = ModelAssertion::parse(MODEL).unwrap();
    let key = encode_keyring_key(&exported_keyring(), "SERIAL").unwrap();
    assert_eq!(key, "openpgp xgkEWFZGNAEAAYA=");

    let assertion = SerialAssertion {
        authority_id: model.authority_id().unwrap().to_string(),
        device_key: key,
        brand_id: model.brand_id().unwrap().to_string(),
        model: model.model().unwrap().to_string(),
        revision: model.revision().to_string(),
        serial: "0000000012345678-9e6a3f0c-1d2b-4c5e-8f7a-0b1c2d3e4f50".to_string(),
        timestamp: Utc.with_ymd_and_hms(2017, 3, 1, 8, 30, 0).unwrap(),
    };
    assertion.validate().unwrap();

    let expected = "type: serial
authority-id: my-brand
device-key: openpgp xgkEWFZGNAEAAYA=
brand-id: my-brand
model: my-gateway
revision: 0
serial: 0000000012345678-9e6a3f0c-1d2b-4c5e-8f7a-0b1c2d3e4f50
timestamp: 2017-03-01T08:30:00Z

openpgp xgkEWFZGNAEAAYA=
";
    assert_eq!(assertion.render(), expected);
}

#[test]
fn rendering_differs_only_in_timestamp() {
    let mut assertion = SerialAssertion {
        authority_id: "a".into(),
        device_key: "openpgp k".into(),
        brand_id: "b".into(),
        model: "m".into(),
        revision: "1".into(),
        serial: "s".into(),
        timestamp: Utc.with_ymd_and_hms(2017, 3, 1, 8, 30, 0).unwrap(),
    };
    let first = assertion.render();
    assertion.timestamp = Utc.with_ymd_and_hms(2018, 4, 2, 9, 31, 1).unwrap();
    let second = assertion.render();

    let differing: Vec<(&str, &str)> = first
        .lines()
        .zip(second.lines())
        .filter(|(a, b)| a != b)
        .collect();
    assert_eq!(
        differing,
        vec![("timestamp: 2017-03-01T08:30:00Z", "timestamp: 2018-04-02T09:31:01Z")]
    );
}
