use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScrollscapeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ScrollscapeError::asset("x")
            .to_string()
            .contains("asset error:")
    );
    assert!(
        ScrollscapeError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        ScrollscapeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScrollscapeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
