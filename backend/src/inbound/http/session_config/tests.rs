//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp key file");
    file.write_all(&vec![b'a'; len]).expect("write key bytes");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_vars(key_path: String) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn expect_error(result: Result<SessionSettings, SessionConfigError>) -> SessionConfigError {
    match result {
        Ok(_) => panic!("expected session configuration to be rejected"),
        Err(error) => error,
    }
}

#[test]
fn release_accepts_complete_configuration() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let env = mock_env(release_vars(path_of(&key)));

    let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.ttl, Duration::hours(2));
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(#[case] missing: &'static str) {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(path_of(&key));
    vars.remove(missing);

    let error = expect_error(session_settings_from_env(&mock_env(vars), BuildMode::Release));

    assert!(matches!(error, SessionConfigError::MissingEnv { name } if name == missing));
}

#[test]
fn debug_falls_back_to_defaults() {
    let env = mock_env(HashMap::from([(
        KEY_FILE_ENV,
        "/nonexistent/ordens-session-key".to_owned(),
    )]));

    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("yes", true)]
#[case("Y", true)]
#[case(" true ", true)]
#[case("0", false)]
#[case("No", false)]
fn cookie_secure_accepts_common_spellings(#[case] raw: &str, #[case] expected: bool) {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(path_of(&key));
    vars.insert(COOKIE_SECURE_ENV, raw.to_owned());

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Release).expect("valid settings");

    assert_eq!(settings.cookie_secure, expected);
}

#[test]
fn release_rejects_unparseable_bool() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(path_of(&key));
    vars.insert(COOKIE_SECURE_ENV, "maybe".to_owned());

    let error = expect_error(session_settings_from_env(&mock_env(vars), BuildMode::Release));

    assert!(matches!(
        error,
        SessionConfigError::InvalidEnv { name: COOKIE_SECURE_ENV, ref value, .. } if value == "maybe"
    ));
}

#[test]
fn same_site_none_requires_secure_cookies_in_release() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(path_of(&key));
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    let error = expect_error(session_settings_from_env(&mock_env(vars), BuildMode::Release));

    assert!(matches!(error, SessionConfigError::InsecureSameSiteNone));
}

#[test]
fn same_site_none_is_tolerated_in_debug() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(path_of(&key));
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "none".to_owned());

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug settings");

    assert_eq!(settings.same_site, SameSite::None);
}

#[test]
fn release_refuses_ephemeral_keys() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(path_of(&key));
    vars.insert(ALLOW_EPHEMERAL_ENV, "1".to_owned());

    let error = expect_error(session_settings_from_env(&mock_env(vars), BuildMode::Release));

    assert!(matches!(error, SessionConfigError::EphemeralNotAllowed));
}

#[test]
fn release_requires_a_readable_key() {
    let vars = release_vars("/nonexistent/ordens-session-key".to_owned());

    let error = expect_error(session_settings_from_env(&mock_env(vars), BuildMode::Release));

    assert!(matches!(error, SessionConfigError::KeyRead { .. }));
}

#[rstest]
#[case(BuildMode::Release, SESSION_KEY_MIN_LEN - 1)]
#[case(BuildMode::Debug, 16)]
fn short_keys_are_rejected(#[case] mode: BuildMode, #[case] len: usize) {
    let key = key_file(len);
    let vars = release_vars(path_of(&key));

    let error = expect_error(session_settings_from_env(&mock_env(vars), mode));

    assert!(matches!(error, SessionConfigError::KeyTooShort { length, .. } if length == len));
}

#[rstest]
#[case("8", Some(8))]
#[case("720", Some(720))]
#[case("0", None)]
#[case("721", None)]
#[case("two", None)]
fn ttl_hours_are_bounded(#[case] raw: &str, #[case] expected: Option<i64>) {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(path_of(&key));
    vars.insert(TTL_HOURS_ENV, raw.to_owned());

    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);

    match expected {
        Some(hours) => assert_eq!(result.expect("valid ttl").ttl.whole_hours(), hours),
        None => assert!(matches!(
            expect_error(result),
            SessionConfigError::InvalidEnv { name: TTL_HOURS_ENV, .. }
        )),
    }
}

#[test]
fn fingerprint_is_stable_and_short() {
    let key = Key::derive_from(&[7_u8; SESSION_KEY_MIN_LEN]);

    let first = key_fingerprint(&key);

    assert_eq!(first, key_fingerprint(&key));
    assert_eq!(first.len(), FINGERPRINT_BYTES * 2);
    assert_ne!(first, key_fingerprint(&Key::generate()));
}
