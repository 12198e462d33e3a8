use crate::config::{merge::Merge, types::*};
use crate::constants::DATABASE_URL_ENV;
use anyhow::{Result, anyhow};

pub struct ConfigBuilder {
    config_input: ConfigInput,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(cli_input);
        self
    }

    pub fn resolve(self) -> Result<Config> {
        let defaults = Config::default();

        Ok(Config {
            database: self.resolve_database(&defaults.database),
            sources: self.resolve_sources(&defaults.sources),
            libdoc: self.resolve_libdoc(&defaults.libdoc)?,
            watch: self.resolve_watch(&defaults.watch)?,
        })
    }

    fn resolve_database(&self, defaults: &Database) -> Database {
        let db_input = self.config_input.database.as_ref();

        let url = db_input
            .and_then(|d| d.url.as_ref())
            .cloned()
            .or_else(|| std::env::var(DATABASE_URL_ENV).ok())
            .unwrap_or_else(|| defaults.url.clone());

        Database { url }
    }

    fn resolve_sources(&self, defaults: &Sources) -> Sources {
        let src_input = self.config_input.sources.as_ref();

        Sources {
            paths: src_input
                .and_then(|s| s.paths.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.paths.clone()),
            installed_libraries: src_input
                .and_then(|s| s.installed_libraries)
                .unwrap_or(defaults.installed_libraries),
            ignore_file: src_input
                .and_then(|s| s.ignore_file.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.ignore_file.clone()),
        }
    }

    fn resolve_libdoc(&self, defaults: &Libdoc) -> Result<Libdoc> {
        let libdoc_input = self.config_input.libdoc.as_ref();

        let enabled = libdoc_input
            .and_then(|l| l.enabled)
            .unwrap_or(defaults.enabled);
        let command = libdoc_input
            .and_then(|l| l.command.as_ref())
            .cloned()
            .unwrap_or_else(|| defaults.command.clone());

        if enabled && command.is_empty() {
            return Err(anyhow!(
                "libdoc is enabled but libdoc.command is empty. Set a command or disable libdoc"
            ));
        }

        Ok(Libdoc { enabled, command })
    }

    fn resolve_watch(&self, defaults: &Watch) -> Result<Watch> {
        let watch_input = self.config_input.watch.as_ref();

        let poll_interval_ms = watch_input
            .and_then(|w| w.poll_interval_ms)
            .unwrap_or(defaults.poll_interval_ms);
        if poll_interval_ms == 0 {
            return Err(anyhow!("watch.poll_interval_ms must be greater than zero"));
        }

        Ok(Watch {
            poll: watch_input.and_then(|w| w.poll).unwrap_or(defaults.poll),
            poll_interval_ms,
            debounce_ms: watch_input
                .and_then(|w| w.debounce_ms)
                .unwrap_or(defaults.debounce_ms),
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
