use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TurntableError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TurntableError::backend_unavailable("x")
            .to_string()
            .contains("render backend unavailable:")
    );
    assert!(
        TurntableError::session("x")
            .to_string()
            .contains("session error:")
    );
    assert!(
        TurntableError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        TurntableError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        TurntableError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn only_backend_unavailable_is_fatal() {
    assert!(TurntableError::backend_unavailable("no renderer").is_fatal());
    assert!(!TurntableError::session("x").is_fatal());
    assert!(!TurntableError::render("x").is_fatal());
    assert!(!TurntableError::encode("x").is_fatal());
    assert!(!TurntableError::validation("x").is_fatal());
}

#[test]
fn session_errors_end_the_sequence() {
    assert!(TurntableError::session("renderer exited").ends_sequence());
    assert!(TurntableError::backend_unavailable("x").ends_sequence());
    assert!(!TurntableError::render("x").ends_sequence());
    assert!(!TurntableError::encode("x").ends_sequence());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TurntableError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_fatal());
}
