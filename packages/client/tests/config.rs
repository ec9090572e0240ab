use std::time::Duration;

use xfer_client::config::{ConfigurationError, SessionConfig};
use xfer_client::{Opt, OptValue, ScriptedEngine, ScriptedResponse, Session};

#[test]
fn test_default_config_is_valid() {
    let config = SessionConfig::default();
    assert!(config.validate().is_ok());
    assert!(config.verbose);
    assert!(config.no_signal);
    assert_eq!(config.expect_100_timeout, Duration::ZERO);
}

#[test]
fn test_presets_are_valid() {
    for config in [
        SessionConfig::quiet(),
        SessionConfig::api_client(),
        SessionConfig::bulk_transfer(),
    ] {
        assert!(config.validate().is_ok(), "{config:?}");
    }
}

#[test]
fn test_zero_timeout_is_rejected() {
    let config = SessionConfig {
        timeout: Some(Duration::ZERO),
        ..SessionConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigurationError::InvalidTimeout(_))
    ));
}

#[test]
fn test_timeout_limits() {
    let too_long = SessionConfig {
        timeout: Some(Duration::from_secs(3601)),
        ..SessionConfig::default()
    };
    assert!(too_long.validate().is_err());

    let slow_connect = SessionConfig {
        connect_timeout: Some(Duration::from_secs(301)),
        ..SessionConfig::default()
    };
    assert!(slow_connect.validate().is_err());

    let inverted = SessionConfig {
        timeout: Some(Duration::from_secs(5)),
        connect_timeout: Some(Duration::from_secs(10)),
        ..SessionConfig::default()
    };
    assert!(matches!(
        inverted.validate(),
        Err(ConfigurationError::Conflict(_))
    ));
}

#[test]
fn test_user_agent_limits() {
    let empty = SessionConfig {
        user_agent: Some(String::new()),
        ..SessionConfig::default()
    };
    assert!(matches!(
        empty.validate(),
        Err(ConfigurationError::InvalidParameter(_))
    ));

    let huge = SessionConfig {
        user_agent: Some("a".repeat(1001)),
        ..SessionConfig::default()
    };
    assert!(huge.validate().is_err());

    let injected = SessionConfig {
        user_agent: Some("agent\r\nX-Evil: 1".to_string()),
        ..SessionConfig::default()
    };
    assert!(injected.validate().is_err());
}

#[test]
fn test_redirect_limit_needs_follow_location() {
    let config = SessionConfig {
        max_redirects: Some(5),
        ..SessionConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigurationError::Conflict(_))
    ));

    let too_many = SessionConfig::builder().follow_redirects(51).build();
    assert!(too_many.is_err());
}

#[test]
fn test_builder_validates() {
    let config = SessionConfig::builder()
        .verbose(false)
        .timeout(Duration::from_secs(20))
        .connect_timeout(Duration::from_secs(2))
        .user_agent("xfer-tests/1.0")
        .follow_redirects(4)
        .build()
        .expect("valid");

    assert!(!config.verbose);
    assert_eq!(config.timeout, Some(Duration::from_secs(20)));
    assert!(config.follow_location);
    assert_eq!(config.max_redirects, Some(4));
}

#[test]
fn test_invalid_config_is_a_builder_error() {
    let config = SessionConfig {
        timeout: Some(Duration::ZERO),
        ..SessionConfig::default()
    };
    let err = Session::from_engine_with_config(ScriptedEngine::new(), config)
        .expect_err("invalid config");
    assert!(err.is_builder());
}

#[test]
fn test_config_options_reach_the_engine() {
    let config = SessionConfig::builder()
        .verbose(false)
        .timeout(Duration::from_millis(1500))
        .connect_timeout(Duration::from_millis(250))
        .user_agent("xfer-tests/1.0")
        .follow_redirects(3)
        .verify_tls(false)
        .build()
        .expect("valid");

    let engine = ScriptedEngine::with_script([ScriptedResponse::ok()]);
    let mut session = Session::from_engine_with_config(engine, config).expect("session");
    session.perform_fully().expect("perform");

    let record = session
        .engine()
        .and_then(ScriptedEngine::last_record)
        .cloned()
        .expect("record");
    assert_eq!(record.long(Opt::Verbose), Some(0));
    assert_eq!(record.long(Opt::TimeoutMs), Some(1500));
    assert_eq!(record.long(Opt::ConnectTimeoutMs), Some(250));
    assert_eq!(record.string(Opt::UserAgent), Some("xfer-tests/1.0"));
    assert_eq!(record.long(Opt::FollowLocation), Some(1));
    assert_eq!(record.long(Opt::MaxRedirs), Some(3));
    assert_eq!(record.option(Opt::SslVerifyPeer), Some(&OptValue::Long(0)));
}

#[test]
fn test_duplicates_share_config_and_stats() {
    let engine = ScriptedEngine::with_script([ScriptedResponse::ok()]);
    let mut original =
        Session::from_engine_with_config(engine, SessionConfig::quiet()).expect("session");
    original.perform_fully().expect("perform");

    let duplicate = Session::duplicate_of(&original);
    assert!(!duplicate.config().verbose);
    assert_eq!(duplicate.stats().snapshot().transfers, 1);
}
