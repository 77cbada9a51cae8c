use email_network::*;

#[test]
fn test_defaults() {
    let config = AnalysisConfig::default();
    assert_eq!(config.mail_extension, ".eml");
    assert_eq!(config.top_n, 5);
    assert!(config.parallel);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = AnalysisConfig::from_toml_str("top_n = 3\nparallel = false\n").unwrap();
    assert_eq!(config.top_n, 3);
    assert!(!config.parallel);
    assert_eq!(config.mail_extension, ".eml");
    assert_eq!(config.max_domains, 10);
}

#[test]
fn test_empty_toml_is_default() {
    assert_eq!(
        AnalysisConfig::from_toml_str("").unwrap(),
        AnalysisConfig::default()
    );
}

#[test]
fn test_zero_top_n_rejected() {
    let err = AnalysisConfig::from_toml_str("top_n = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_empty_extension_rejected() {
    let err = AnalysisConfig::from_toml_str("mail_extension = \"\"").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_malformed_toml() {
    let err = AnalysisConfig::from_toml_str("top_n = [").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("analysis.toml");
    std::fs::write(&path, "mail_extension = \".msg.txt\"\n").unwrap();

    let config = AnalysisConfig::load(&path).unwrap();
    assert_eq!(config.mail_extension, ".msg.txt");

    let missing = AnalysisConfig::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Read { .. }));
}
