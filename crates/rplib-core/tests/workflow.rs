//! End-to-end serial assertion workflow with fake key generation and vault.

mod common;

use common::{serve_once, FakeGpg, FixedSerial, FAKE_DEVICE_KEY, MODEL};
use rplib_assert::ModelAssertion;
use rplib_core::keygen::KEY_DIR;
use rplib_core::{
    generate_unsigned, sign_serial, HardwareSerial, ProvisionError, VaultClient, SERIAL_SIGNED,
    SERIAL_UNSIGNED,
};
use tempfile::TempDir;

fn model() -> ModelAssertion {
    ModelAssertion::parse(MODEL).unwrap()
}

#[test]
fn unsigned_assertion_is_written_to_target() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("target");

    let text = generate_unsigned(&model(), &target, &FakeGpg, &FixedSerial("ABC123")).unwrap();

    assert_eq!(std::fs::read_to_string(target.join(SERIAL_UNSIGNED)).unwrap(), text);
    assert!(target.join(KEY_DIR).join("pubring.kbx").exists());

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "type: serial");
    assert_eq!(lines[1], "authority-id: my-brand");
    assert_eq!(lines[2], format!("device-key: {FAKE_DEVICE_KEY}"));
    assert_eq!(lines[3], "brand-id: my-brand");
    assert_eq!(lines[4], "model: my-gateway");
    assert_eq!(lines[5], "revision: 4");
    assert!(lines[6].starts_with("serial: ABC123-"));
    assert!(lines[7].starts_with("timestamp: ") && lines[7].ends_with('Z'));
    assert_eq!(lines[8], "");
    assert_eq!(lines[9], FAKE_DEVICE_KEY);

    let uuid = lines[6].strip_prefix("serial: ABC123-").unwrap();
    assert!(uuid::Uuid::parse_str(uuid).is_ok());
}

#[test]
fn reads_serial_from_hardware_files() {
    let temp_dir = TempDir::new().unwrap();
    let serials = HardwareSerial {
        smbios_path: temp_dir.path().join("missing"),
        cpuinfo_path: temp_dir.path().join("cpuinfo"),
    };
    std::fs::write(&serials.cpuinfo_path, "Hardware\t: BCM2709\nSerial\t\t: 00000000c2d8f3e1\n")
        .unwrap();

    let text = generate_unsigned(&model(), &temp_dir.path().join("t"), &FakeGpg, &serials).unwrap();
    assert!(text.contains("\nserial: 00000000c2d8f3e1-"));
}

#[test]
fn signed_assertion_is_saved() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("target");
    let signed = b"type: serial\nauthority-id: my-brand\n\nAcLBXAQAAQoABgUC\n".to_vec();
    let (server, handle) = serve_once(signed.clone());

    let vault = VaultClient::new(&server, Some("apikey".to_string())).unwrap();
    let path = sign_serial(&model(), &target, &vault, &FakeGpg, &FixedSerial("ABC123")).unwrap();

    assert_eq!(path, target.join(SERIAL_SIGNED));
    assert_eq!(std::fs::read(&path).unwrap(), signed);

    let request = handle.join().unwrap();
    let unsigned = std::fs::read(target.join(SERIAL_UNSIGNED)).unwrap();
    assert_eq!(request.body, unsigned);
    assert_eq!(request.header("api-key"), Some("apikey"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }
}

#[test]
fn rejection_writes_no_signed_file() {
    let temp_dir = TempDir::new().unwrap();
    let (server, handle) = serve_once(br#"{"error":"invalid key"}"#.to_vec());

    let vault = VaultClient::new(&server, None).unwrap();
    let err = sign_serial(&model(), temp_dir.path(), &vault, &FakeGpg, &FixedSerial("ABC123"))
        .unwrap_err();
    handle.join().unwrap();

    assert!(matches!(err, ProvisionError::Vault(_)));
    assert_eq!(err.to_string(), r#"{"error":"invalid key"}"#);
    assert!(!temp_dir.path().join(SERIAL_SIGNED).exists());
    assert!(temp_dir.path().join(SERIAL_UNSIGNED).exists());
}

#[test]
fn rerun_against_provisioned_target_fails() {
    let temp_dir = TempDir::new().unwrap();
    generate_unsigned(&model(), temp_dir.path(), &FakeGpg, &FixedSerial("ABC123")).unwrap();
    let first = std::fs::read(temp_dir.path().join(SERIAL_UNSIGNED)).unwrap();

    let err = generate_unsigned(&model(), temp_dir.path(), &FakeGpg, &FixedSerial("ABC123"))
        .unwrap_err();
    assert!(matches!(err, ProvisionError::Keygen(_)));
    assert!(err.to_string().contains("already exists"));
    assert_eq!(std::fs::read(temp_dir.path().join(SERIAL_UNSIGNED)).unwrap(), first);
}

#[test]
fn missing_model_header_fails_before_key_generation() {
    let temp_dir = TempDir::new().unwrap();
    let model = ModelAssertion::parse("type: model\nauthority-id: a\nmodel: m\n").unwrap();

    let err = generate_unsigned(&model, temp_dir.path(), &FakeGpg, &FixedSerial("ABC123"))
        .unwrap_err();
    assert!(matches!(err, ProvisionError::Assert(_)));
    assert!(err.to_string().contains("brand-id"));
    assert!(!temp_dir.path().join(KEY_DIR).exists());
}

#[test]
fn consecutive_runs_get_distinct_serials() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let serial_line = |text: String| {
        text.lines()
            .find(|line| line.starts_with("serial: "))
            .unwrap()
            .to_string()
    };

    let a = generate_unsigned(&model(), first.path(), &FakeGpg, &FixedSerial("SAME")).unwrap();
    let b = generate_unsigned(&model(), second.path(), &FakeGpg, &FixedSerial("SAME")).unwrap();
    assert_ne!(serial_line(a), serial_line(b));
}
