use std::fmt;

use anyhow::Context;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::Result;

/// A single entry of the equipment catalog.
///
/// Records are decoded leniently. A field that is missing, or present with a
/// shape that doesn't make sense, takes its empty value rather than failing
/// the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EquipmentRecord {
	#[serde(rename = "裝備名稱", default, deserialize_with = "lenient_string")]
	pub name: String,

	#[serde(rename = "裝備星級", default, deserialize_with = "lenient_rarity")]
	pub rarity: u8,

	#[serde(rename = "裝備種類", default, deserialize_with = "lenient_string")]
	pub slot_type: String,

	#[serde(rename = "基本效果", default, deserialize_with = "lenient")]
	pub basic_effects: Effects,

	#[serde(rename = "高級效果", default, deserialize_with = "lenient")]
	pub advanced_effects: Option<AdvancedEffects>,

	#[serde(rename = "Skill+", default, deserialize_with = "lenient")]
	pub skill_plus: Option<SkillPlus>,
}

impl EquipmentRecord {
	/// Free-text trigger condition of the advanced effect, if any.
	pub fn trigger_condition(&self) -> Option<&str> {
		self.advanced_effects
			.as_ref()
			.and_then(|advanced| advanced.trigger_condition.as_deref())
	}
}

/// Conditional bonuses attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdvancedEffects {
	#[serde(rename = "觸發條件", default, deserialize_with = "lenient")]
	pub trigger_condition: Option<String>,

	#[serde(rename = "可切換的效果", default, deserialize_with = "lenient")]
	pub toggleable_effects: Option<Effects>,
}

impl AdvancedEffects {
	pub fn is_empty(&self) -> bool {
		self.trigger_condition.is_none() && self.toggleable_effects.is_none()
	}
}

/// Ordered mapping of effect name to value. Source order is kept for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects(Vec<(String, EffectValue)>);

impl Effects {
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.0.iter().any(|(name, _)| name == key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(name, _)| name.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &EffectValue)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value))
	}
}

impl<K, V> FromIterator<(K, V)> for Effects
where
	K: Into<String>,
	V: Into<EffectValue>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		)
	}
}

impl<'de> Deserialize<'de> for Effects {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let map = Map::<String, Value>::deserialize(deserializer)?;
		Ok(map.into_iter().map(|(key, value)| (key, EffectValue::from(value))).collect())
	}
}

/// Value of a single effect - either a bare number, or text that may embed numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectValue {
	Number(f64),
	Text(String),
}

impl From<Value> for EffectValue {
	fn from(value: Value) -> Self {
		match value {
			Value::Number(number) => match number.as_f64() {
				Some(float) => Self::Number(float),
				None => Self::Text(number.to_string()),
			},
			Value::String(string) => Self::Text(string),
			other => Self::Text(other.to_string()),
		}
	}
}

impl From<f64> for EffectValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<&str> for EffectValue {
	fn from(value: &str) -> Self {
		Self::Text(value.into())
	}
}

impl fmt::Display for EffectValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(number) => number.fmt(f),
			Self::Text(text) => text.fmt(f),
		}
	}
}

/// Secondary enhancement descriptor. The dataset carries this either as free
/// text, or as a structure with a condition and a magnitude.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillPlus {
	Text(String),
	Structured {
		condition: Option<String>,
		magnitude: Option<String>,
	},
}

const CONDITION_KEYS: &[&str] = &["觸發條件", "條件", "目標"];
const MAGNITUDE_KEYS: &[&str] = &["強化幅度", "幅度", "加成", "效果"];

impl<'de> Deserialize<'de> for SkillPlus {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		use serde::de::Error;

		match Value::deserialize(deserializer)? {
			Value::String(text) => Ok(Self::Text(text)),
			Value::Object(map) => Ok(Self::Structured {
				condition: first_truthy_string(&map, CONDITION_KEYS),
				magnitude: first_truthy_string(&map, MAGNITUDE_KEYS),
			}),
			other => Err(D::Error::custom(format!(
				"expected text or structure for skill plus, got {other}"
			))),
		}
	}
}

// The first alias holding a "truthy" value wins, even if that value then turns
// out not to be text.
fn first_truthy_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
	keys.iter()
		.filter_map(|key| map.get(*key))
		.find(|value| truthy(value))
		.and_then(Value::as_str)
		.map(str::to_owned)
}

fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(boolean) => *boolean,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
		Value::String(string) => !string.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned + Default,
{
	let value = Value::deserialize(deserializer)?;
	Ok(T::deserialize(value).unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	let string = match Value::deserialize(deserializer)? {
		Value::String(string) => string,
		Value::Number(number) => number.to_string(),
		_ => String::new(),
	};
	Ok(string)
}

fn lenient_rarity<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
	D: Deserializer<'de>,
{
	let float = match Value::deserialize(deserializer)? {
		Value::Number(number) => number.as_f64(),
		Value::String(string) => string.trim().parse::<f64>().ok(),
		_ => None,
	};

	let rarity = float
		.filter(|float| float.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(float))
		.map_or(0, |float| float as u8);

	Ok(rarity)
}

/// Decode the equipment document. The document must be a JSON array; entries
/// that are not objects are skipped.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<EquipmentRecord>> {
	let entries = serde_json::from_slice::<Vec<Value>>(bytes)
		.context("equipment document is not a JSON array")?;

	let records = entries
		.into_iter()
		.enumerate()
		.filter_map(|(index, entry)| {
			if !entry.is_object() {
				tracing::warn!(index, "skipping equipment entry that is not an object");
				return None;
			}
			// Every field is lenient, so an object always decodes.
			Some(EquipmentRecord::deserialize(entry).unwrap_or_default())
		})
		.collect();

	Ok(records)
}
