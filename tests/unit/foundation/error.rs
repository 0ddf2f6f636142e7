use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GbufError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GbufError::pdf("x").to_string().contains("pdf error:"));
    assert!(
        GbufError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    let t = GbufError::Truncated {
        offset: 7,
        needed: 8,
        available: 3,
    };
    assert_eq!(
        t.to_string(),
        "truncated record at byte 7: needed 8 bytes, 3 available"
    );
}

#[test]
fn only_missing_image_is_non_fatal() {
    assert!(!GbufError::MissingImage(ImageId(3)).is_fatal());
    assert!(
        GbufError::UnknownOpcode {
            offset: 0,
            opcode: 99
        }
        .is_fatal()
    );
    assert!(GbufError::UnsupportedVersion { offset: 0, bits: 1 }.is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GbufError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
