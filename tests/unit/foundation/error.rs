use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MuxError::truncated("x")
            .to_string()
            .contains("truncated input:")
    );
    assert!(
        MuxError::malformed("x")
            .to_string()
            .contains("malformed input:")
    );
    assert!(
        MuxError::capacity("x")
            .to_string()
            .contains("capacity error:")
    );
    assert!(
        MuxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(MuxError::encode("x").to_string().contains("encode error:"));
    assert!(MuxError::search("x").to_string().contains("search error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MuxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
