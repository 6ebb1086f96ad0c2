use ron::{Options, extensions::Extensions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "PE";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// ```ron
/// (
///     server: "https://adaptive.example.com",
///     token: "...",
///     timeout_secs: 10,
/// )
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub server: String,
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config source error `{0}`")]
    Source(::config::ConfigError),
    #[error("ron parse error `{0}`")]
    Ron(ron::error::SpannedError),
}

impl From<::config::ConfigError> for ConfigError {
    fn from(value: ::config::ConfigError) -> Self {
        Self::Source(value)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(value: ron::error::SpannedError) -> Self {
        Self::Ron(value)
    }
}

impl ClientConfig {
    /// Reads `file_path` (RON, optional) then applies `PE_SERVER`,
    /// `PE_TOKEN`, `PE_TIMEOUT_SECS` on top
    pub fn load(file_path: &str) -> Result<Self, ConfigError> {
        let cfg = ::config::Config::builder()
            .add_source(
                ::config::File::new(file_path, ::config::FileFormat::Ron).required(false),
            )
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let options = Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .with_default_extension(Extensions::UNWRAP_NEWTYPES);
        Ok(options.from_str(s)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let cfg = ClientConfig::parse(
            r#"(
                server: "https://adaptive.example.com/",
                token: "abc",
            )"#,
        )
        .unwrap();
        assert_eq!(
            cfg,
            ClientConfig {
                server: "https://adaptive.example.com/".to_string(),
                token: "abc".to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            }
        );
    }

    #[test]
    fn test_parse_missing_token() {
        let err = ClientConfig::parse(r#"(server: "https://adaptive.example.com")"#).unwrap_err();
        assert!(matches!(err, ConfigError::Ron(_)));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("pe-history-{}.ron", std::process::id()));
        std::fs::write(
            &path,
            r#"(server: "https://adaptive.example.com", token: "abc", timeout_secs: 3)"#,
        )
        .unwrap();
        let cfg = ClientConfig::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.server, "https://adaptive.example.com");
        assert_eq!(cfg.timeout_secs, 3);
    }

    #[test]
    fn test_env_overrides_file() {
        let path = std::env::temp_dir().join(format!("pe-history-env-{}.ron", std::process::id()));
        std::fs::write(
            &path,
            r#"(server: "https://adaptive.example.com", token: "from-file")"#,
        )
        .unwrap();
        // SAFETY: no other test writes PE_TOKEN
        unsafe { std::env::set_var("PE_TOKEN", "from-env") };
        let cfg = ClientConfig::load(path.to_str().unwrap());
        unsafe { std::env::remove_var("PE_TOKEN") };
        std::fs::remove_file(&path).unwrap();

        let cfg = cfg.unwrap();
        assert_eq!(cfg.server, "https://adaptive.example.com");
        assert_eq!(cfg.token, "from-env");
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
