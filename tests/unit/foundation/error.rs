use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CorruptError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        CorruptError::invalid_argument("x")
            .to_string()
            .contains("invalid argument:")
    );
    assert!(CorruptError::not_found("x").to_string().contains("not found:"));
    assert!(
        CorruptError::asset_load("x")
            .to_string()
            .contains("asset load error:")
    );
    assert!(
        CorruptError::numeric_range("x")
            .to_string()
            .contains("numeric range violation:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CorruptError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
