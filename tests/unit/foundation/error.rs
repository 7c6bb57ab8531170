use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        EngraveError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        EngraveError::invalid_dimension("x")
            .to_string()
            .contains("invalid dimension:")
    );
    assert!(
        EngraveError::out_of_range("x")
            .to_string()
            .contains("parameter out of range:")
    );
    assert!(
        EngraveError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        EngraveError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = EngraveError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
