// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `settings.rs`

#[cfg(test)]
mod tests {
    use crate::errors::SettingsError;
    use crate::settings::Settings;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = Settings::from_yaml_str("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.zone_group_name, "private-endpoint-manager");
        assert_eq!(settings.arm_endpoint, "https://management.azure.com");
        assert_eq!(settings.retry_policy().unwrap().max_retries(), 10);
    }

    #[test]
    fn test_partial_retry_block_keeps_other_defaults() {
        let settings = Settings::from_yaml_str("retry:\n  maxRetries: 4\n").unwrap();
        let policy = settings.retry_policy().unwrap();

        assert_eq!(policy.max_retries(), 4);
        assert_eq!(policy.initial_wait(), Duration::from_secs(2));
        assert_eq!(policy.max_wait(), Duration::from_secs(15));
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
retry:
  maxRetries: 5
  initialWaitSeconds: 1
  maxWaitSeconds: 8
  retryableErrorPattern: "RetryableError|TooManyRequests"
zoneGroupName: corp-dns
armEndpoint: https://management.usgovcloudapi.net
"#;
        let settings = Settings::from_yaml_str(yaml).unwrap();
        let policy = settings.retry_policy().unwrap();

        assert_eq!(settings.zone_group_name, "corp-dns");
        assert_eq!(settings.arm_endpoint, "https://management.usgovcloudapi.net");
        assert_eq!(policy.retryable_pattern(), "RetryableError|TooManyRequests");
        assert_eq!(policy.max_wait(), Duration::from_secs(8));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Settings::from_yaml_str("retries: 3\n").unwrap_err();

        assert!(matches!(err, SettingsError::Yaml(_)));
    }

    #[test]
    fn test_invalid_policy_is_reported() {
        let settings = Settings::from_yaml_str(
            "retry:\n  initialWaitSeconds: 20\n  maxWaitSeconds: 10\n",
        )
        .unwrap();

        assert!(matches!(
            settings.retry_policy().unwrap_err(),
            SettingsError::Policy(_)
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"zoneGroupName: from-file\n").unwrap();

        let settings = Settings::from_path(file.path()).unwrap();

        assert_eq!(settings.zone_group_name, "from-file");
    }
}
