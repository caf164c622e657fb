use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BoothError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BoothError::source_unavailable("x")
            .to_string()
            .contains("source unavailable:")
    );
    assert!(
        BoothError::load_failure("x")
            .to_string()
            .contains("image load failure:")
    );
    assert!(
        BoothError::unsupported_platform("x")
            .to_string()
            .contains("unsupported platform:")
    );
    assert!(
        BoothError::policy_rejected("x")
            .to_string()
            .contains("policy rejected:")
    );
    assert!(BoothError::encode("x").to_string().contains("encode error:"));
    assert!(BoothError::share("x").to_string().contains("share error:"));
    assert!(BoothError::NoPhotos.to_string().contains("no photos"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BoothError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
