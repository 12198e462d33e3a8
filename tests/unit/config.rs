use anyhow::Result;
use rfhub::config::{ConfigBuilder, ConfigInput, DatabaseInput, load_config};
use std::fs;
use tempfile::TempDir;

/// Config file, CLI args and defaults resolved together
mod config_integration_tests {
    use super::*;

    #[test]
    fn test_file_config_is_resolved() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("rfhub.yaml");
        fs::write(
            &config_path,
            r#"database:
  url: sqlite://keywords.db
sources:
  paths:
    - resources
    - BuiltIn
  ignore_file: .kwignore
libdoc:
  command: ["python3", "-m", "robot.libdoc"]
watch:
  poll: true
  poll_interval_ms: 250
"#,
        )?;

        let (file_config, root_dir) = load_config(&config_path.to_string_lossy())?;
        assert_eq!(root_dir, temp_dir.path());

        let config = ConfigBuilder::new().with_file(file_config).resolve()?;
        assert_eq!(config.database.url, "sqlite://keywords.db");
        assert_eq!(config.sources.paths, vec!["resources", "BuiltIn"]);
        assert_eq!(config.sources.ignore_file, ".kwignore");
        assert!(config.libdoc.enabled);
        assert_eq!(config.libdoc.command[0], "python3");
        assert!(config.watch.poll);
        assert_eq!(config.watch.poll_interval_ms, 250);
        assert_eq!(config.watch.debounce_ms, 500);
        Ok(())
    }

    #[test]
    fn test_cli_database_overrides_file() -> Result<()> {
        let file_config = ConfigInput {
            database: Some(DatabaseInput {
                url: Some("sqlite://file.db".to_string()),
            }),
            ..Default::default()
        };
        let cli_config = ConfigInput {
            database: Some(DatabaseInput {
                url: Some("sqlite://cli.db".to_string()),
            }),
            ..Default::default()
        };

        let config = ConfigBuilder::new()
            .with_file(file_config)
            .with_cli_args(cli_config)
            .resolve()?;
        assert_eq!(config.database.url, "sqlite://cli.db");
        Ok(())
    }

    #[test]
    fn test_zero_poll_interval_in_file_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("rfhub.yaml");
        fs::write(&config_path, "watch:\n  poll_interval_ms: 0\n")?;

        let (file_config, _) = load_config(&config_path.to_string_lossy())?;
        let err = ConfigBuilder::new()
            .with_file(file_config)
            .resolve()
            .unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
        Ok(())
    }
}
