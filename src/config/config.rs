use std::collections::BTreeMap;

use figment::providers::{Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Deserializer, Serialize};

use super::logging::LoggingConfig;
use super::secret::Secret;
use super::upstream::UpstreamConfig;

/// Environment variables read on top of the YAML file.
const ENV_KEYS: [&str; 6] = [
    "ENVIRONMENT",
    "TURNSTILE_ALLOWED_HOSTNAMES",
    "TURNSTILE_SECRET",
    "ONEPASS_ID",
    "ONEPASS_SECRET",
    "BIND_ADDRESS",
];

/// Process-wide configuration, loaded once at startup and never mutated.
///
/// The three credentials and the allow-list are optional on purpose: a
/// process without them still starts, and every lookup is then rejected.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct Config {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// `production` selects the production Onepass endpoint, anything else staging.
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default, deserialize_with = "deserialize_hostnames")]
    #[schemars(with = "Vec<String>")]
    pub turnstile_allowed_hostnames: Vec<String>,
    #[serde(default)]
    pub turnstile_secret: Option<Secret>,
    #[serde(default)]
    pub onepass_id: Option<Secret>,
    #[serde(default)]
    pub onepass_secret: Option<Secret>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// The credentials a lookup needs, available only when all of them are set.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub turnstile_secret: &'a Secret,
    pub onepass_id: &'a Secret,
    pub onepass_secret: &'a Secret,
}

impl Config {
    pub fn credentials(&self) -> Option<Credentials<'_>> {
        Some(Credentials {
            turnstile_secret: self.turnstile_secret.as_ref()?,
            onepass_id: self.onepass_id.as_ref()?,
            onepass_secret: self.onepass_secret.as_ref()?,
        })
    }

    /// Allow-list membership shared by the origin gate and the challenge
    /// check. An empty hostname never matches.
    pub fn is_allowed_hostname(&self, hostname: &str) -> bool {
        !hostname.is_empty()
            && self
                .turnstile_allowed_hostnames
                .iter()
                .any(|allowed| allowed == hostname)
    }

    pub fn is_production(&self) -> bool {
        self.environment.as_deref() == Some("production")
    }

    /// Base URL of the identity service for the configured environment.
    pub fn onepass_base_url(&self) -> &str {
        if self.is_production() {
            &self.upstream.onepass_production_url
        } else {
            &self.upstream.onepass_staging_url
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8787".to_string()
}

/// Accepts either a list or a comma-separated string, since environment
/// variables can only carry the latter conveniently.
fn deserialize_hostnames<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hostnames {
        List(Vec<String>),
        Joined(String),
    }

    let hostnames = match Hostnames::deserialize(deserializer)? {
        Hostnames::List(list) => list,
        Hostnames::Joined(joined) => joined
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|h| h.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
            .collect(),
    };

    Ok(hostnames
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect())
}

/// Environment values kept verbatim. Credentials are opaque strings, so
/// nothing here is parsed as a number or boolean.
fn env_overrides() -> Serialized<BTreeMap<String, String>> {
    let values = ENV_KEYS
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_lowercase(), v)))
        .collect();
    Serialized::defaults(values)
}

/// Builds the figment used by `load_config`: the YAML file (if any), then
/// the environment on top.
pub fn config_sources(path: &str) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(env_overrides())
}

/// Load config from `./config.yaml` (or `$TURNPASS_CONFIG`) and the environment.
pub fn load_config() -> Config {
    let path = std::env::var("TURNPASS_CONFIG").unwrap_or_else(|_| "./config.yaml".to_string());
    match config_sources(&path).extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    match serde_json::to_string_pretty(&schema) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error rendering configuration schema: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Config {
        Figment::new()
            .merge(Yaml::string(yaml))
            .extract()
            .expect("config should parse")
    }

    #[test]
    fn empty_config_uses_defaults_and_has_no_credentials() {
        let config = parse("{}");
        assert_eq!(config.bind_address, "0.0.0.0:8787");
        assert!(config.turnstile_allowed_hostnames.is_empty());
        assert!(config.credentials().is_none());
        assert_eq!(config.onepass_base_url(), "https://api-stg.uhg.com");
        assert_eq!(config.upstream.upstream_env, "integration");
    }

    #[test]
    fn hostnames_accept_list_or_comma_separated_string() {
        let listed = parse("turnstile_allowed_hostnames: [a.com, b.com]");
        let joined = parse("turnstile_allowed_hostnames: \"a.com, b.com,\"");
        assert_eq!(listed.turnstile_allowed_hostnames, vec!["a.com", "b.com"]);
        assert_eq!(joined.turnstile_allowed_hostnames, vec!["a.com", "b.com"]);
        assert!(joined.is_allowed_hostname("b.com"));
        assert!(!joined.is_allowed_hostname(""));
    }

    #[test]
    fn credentials_require_every_secret() {
        let partial = parse(
            r#"
turnstile_secret: ts
onepass_id: id
"#,
        );
        assert!(partial.credentials().is_none());

        let full = parse(
            r#"
turnstile_secret: ts
onepass_id: id
onepass_secret: secret
"#,
        );
        let credentials = full.credentials().expect("all secrets present");
        assert_eq!(credentials.onepass_id.expose(), "id");
    }

    #[test]
    fn production_environment_selects_production_base_url() {
        let config = parse("environment: production");
        assert_eq!(config.onepass_base_url(), "https://api.uhg.com");

        let config = parse("environment: Production");
        assert_eq!(config.onepass_base_url(), "https://api-stg.uhg.com");
    }

    #[test]
    fn numeric_looking_env_credentials_stay_verbatim() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ONEPASS_ID", "0123");
            jail.set_env("ONEPASS_SECRET", "true");
            jail.set_env("TURNSTILE_SECRET", "1.5");

            let config: Config = config_sources("config.yaml").extract()?;
            let credentials = config.credentials().expect("all secrets present");
            assert_eq!(credentials.onepass_id.expose(), "0123");
            assert_eq!(credentials.onepass_secret.expose(), "true");
            assert_eq!(credentials.turnstile_secret.expose(), "1.5");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_yaml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
environment: staging
onepass_id: "from-file"
turnstile_allowed_hostnames: [file.com]
"#,
            )?;
            jail.set_env("ENVIRONMENT", "production");
            jail.set_env("ONEPASS_ID", "007");
            jail.set_env("TURNSTILE_ALLOWED_HOSTNAMES", "[a.com, b.com]");

            let config: Config = config_sources("config.yaml").extract()?;
            assert!(config.is_production());
            assert_eq!(config.onepass_id.as_ref().map(Secret::expose), Some("007"));
            assert_eq!(config.turnstile_allowed_hostnames, vec!["a.com", "b.com"]);
            Ok(())
        });
    }
}
