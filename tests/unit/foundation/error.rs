use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TacticError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(TacticError::decode("x").to_string().contains("decode error:"));
    assert!(TacticError::export("x").to_string().contains("export error:"));
    assert!(
        TacticError::storage("x")
            .to_string()
            .contains("storage error:")
    );
    assert!(
        TacticError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TacticError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_decode_errors_report_is_decode() {
    assert!(TacticError::decode("bad payload").is_decode());
    assert!(!TacticError::export("ffmpeg missing").is_decode());
}
