use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("environment variable `{0}` is required")]
	Missing(&'static str),
	#[error("environment variable `{key}` is invalid: {reason}")]
	Invalid { key: &'static str, reason: String },
}

/// Runtime configuration, read from the environment (and `.env`, if present).
#[derive(Debug)]
pub struct Config {
	/// When unset, the in-memory store is used.
	pub database_url: Option<String>,
	pub jwt_secret: String,
	pub port: u16,
	/// Upper bound on every store call.
	pub store_timeout: Duration,
	/// When set, traces and metrics are exported over OTLP.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

		let port = match var("PORT") {
			Some(port) => port.parse().map_err(|_| Error::Invalid {
				key: "PORT",
				reason: format!("`{port}` is not a port number"),
			})?,
			None => DEFAULT_PORT,
		};

		let store_timeout = match var("STORE_TIMEOUT_MS") {
			Some(ms) => match ms.parse::<u64>() {
				Ok(ms) if ms > 0 => Duration::from_millis(ms),
				_ => {
					return Err(Error::Invalid {
						key: "STORE_TIMEOUT_MS",
						reason: format!("`{ms}` is not a positive number of milliseconds"),
					})
				}
			},
			None => DEFAULT_STORE_TIMEOUT,
		};

		Ok(Self {
			database_url: var("DATABASE_URL"),
			jwt_secret: var("JWT_SECRET").ok_or(Error::Missing("JWT_SECRET"))?,
			port,
			store_timeout,
			otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
		})
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|key| vars.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[("JWT_SECRET", "secret")]).unwrap();

		assert_eq!(config.port, DEFAULT_PORT);
		assert_eq!(config.store_timeout, DEFAULT_STORE_TIMEOUT);
		assert!(config.database_url.is_none());
		assert!(config.otlp_endpoint.is_none());
	}

	#[test]
	fn test_secret_is_required() {
		assert!(matches!(config(&[]), Err(Error::Missing("JWT_SECRET"))));
		assert!(matches!(
			config(&[("JWT_SECRET", "")]),
			Err(Error::Missing("JWT_SECRET"))
		));
	}

	#[test]
	fn test_invalid_values() {
		assert!(matches!(
			config(&[("JWT_SECRET", "s"), ("PORT", "http")]),
			Err(Error::Invalid { key: "PORT", .. })
		));
		assert!(matches!(
			config(&[("JWT_SECRET", "s"), ("STORE_TIMEOUT_MS", "0")]),
			Err(Error::Invalid {
				key: "STORE_TIMEOUT_MS",
				..
			})
		));

		let config = config(&[("JWT_SECRET", "s"), ("STORE_TIMEOUT_MS", "250")]).unwrap();

		assert_eq!(config.store_timeout, Duration::from_millis(250));
	}
}
