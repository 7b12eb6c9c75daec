use std::{collections::HashMap, fmt, str::FromStr};

use serde::{de, Deserialize};
use tracing::{metadata::LevelFilter, Subscriber};
use tracing_subscriber::{
	filter, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, Layer,
};

#[derive(Debug, Deserialize)]
pub struct Config {
	stdout: StdoutConfig,
}

#[derive(Debug, Deserialize)]
struct StdoutConfig {
	enabled: bool,

	/// Emit newline-delimited JSON instead of human readable lines.
	#[serde(default)]
	json: bool,

	filters: TracingFilters,
}

#[derive(Debug, Deserialize)]
struct TracingFilters {
	default: ConfigLevelFilter,

	#[serde(flatten)]
	targets: HashMap<String, ConfigLevelFilter>,
}

#[repr(transparent)]
struct ConfigLevelFilter(LevelFilter);

impl From<ConfigLevelFilter> for LevelFilter {
	fn from(filter: ConfigLevelFilter) -> Self {
		filter.0
	}
}

impl fmt::Debug for ConfigLevelFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl<'de> Deserialize<'de> for ConfigLevelFilter {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let string = String::deserialize(deserializer)?;
		let level_filter = LevelFilter::from_str(&string).map_err(de::Error::custom)?;
		Ok(Self(level_filter))
	}
}

pub fn init(config: Config) {
	tracing_subscriber::registry()
		.with(stdout(config.stdout))
		.init();
}

fn stdout<S>(config: StdoutConfig) -> Option<Box<dyn Layer<S> + Send + Sync>>
where
	S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
	if !config.enabled {
		return None;
	}

	let filter = filter::Targets::new()
		.with_default(config.filters.default)
		.with_targets(config.filters.targets);

	let layer = match config.json {
		true => tracing_subscriber::fmt::layer()
			.json()
			.with_filter(filter)
			.boxed(),
		false => tracing_subscriber::fmt::layer().with_filter(filter).boxed(),
	};

	Some(layer)
}

#[cfg(test)]
mod test {
	use figment::{
		providers::{Format, Toml},
		Figment,
	};
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn config_filters() {
		let config = Figment::new()
			.merge(Toml::string(
				r#"
				[stdout]
				enabled = true

				[stdout.filters]
				default = "warn"
				gear_selector = "trace"
				"#,
			))
			.extract::<Config>()
			.expect("config should extract");

		assert!(config.stdout.enabled);
		assert!(!config.stdout.json);
		assert_eq!(LevelFilter::from(config.stdout.filters.default), LevelFilter::WARN);

		let targets = config
			.stdout
			.filters
			.targets
			.into_iter()
			.map(|(target, level)| (target, LevelFilter::from(level)))
			.collect::<Vec<_>>();
		assert_eq!(targets, vec![("gear_selector".to_string(), LevelFilter::TRACE)]);
	}

	#[test]
	fn invalid_level() {
		let result = Figment::new()
			.merge(Toml::string(
				r#"
				[stdout]
				enabled = false
				filters = { default = "loud" }
				"#,
			))
			.extract::<Config>();

		assert!(result.is_err());
	}
}
