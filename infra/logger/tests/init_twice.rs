use wirekit_logger::{Logger, LoggerError, LoggerSettings};

#[test]
fn second_install_reports_a_subscriber_error() {
    let _logger = Logger::from_settings(&LoggerSettings::default()).expect("first init should succeed");

    let err = Logger::builder().name("integration-init-twice").init().expect_err("second init should fail");
    assert!(matches!(err, LoggerError::Subscriber { .. }), "expected a subscriber error, got {err}");
}
