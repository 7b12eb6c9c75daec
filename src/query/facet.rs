use std::{collections::BTreeSet, ops::RangeInclusive, sync::OnceLock};

use aho_corasick::AhoCorasick;
use itertools::Itertools;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::catalog::EquipmentRecord;

/// Rarity tiers that can be selected.
pub const RARITIES: RangeInclusive<u8> = 1..=8;

/// Suffix marking an attribute term inside trigger condition text.
const ATTRIBUTE_SUFFIX: &str = "屬性";

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum SlotType {
	#[strum(serialize = "武器")]
	Weapon,
	#[strum(serialize = "防具")]
	Armor,
	#[strum(serialize = "飾品")]
	Accessory,
}

/// Elemental attribute categories that can appear in a trigger condition.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum Attribute {
	#[strum(serialize = "火")]
	Fire,
	#[strum(serialize = "水")]
	Water,
	#[strum(serialize = "木")]
	Wood,
	#[strum(serialize = "光")]
	Light,
	#[strum(serialize = "暗")]
	Dark,
}

/// Role categories that can appear in a trigger condition.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum Class {
	#[strum(serialize = "智慧型")]
	Intelligence,
	#[strum(serialize = "敏捷型")]
	Agility,
	#[strum(serialize = "力量型")]
	Strength,
}

/// Either kind of trigger tag, so both vocabularies can share one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TriggerTag {
	Attribute(Attribute),
	Class(Class),
}

impl TriggerTag {
	fn all() -> impl Iterator<Item = Self> {
		Attribute::iter()
			.map(Self::Attribute)
			.chain(Class::iter().map(Self::Class))
	}

	fn pattern(&self) -> String {
		match self {
			Self::Attribute(attribute) => format!("{attribute}{ATTRIBUTE_SUFFIX}"),
			Self::Class(class) => class.to_string(),
		}
	}
}

/// Tags detected in a trigger condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerTags {
	pub attributes: BTreeSet<Attribute>,
	pub classes: BTreeSet<Class>,
}

impl TriggerTags {
	/// Both tag sets merged into one.
	pub fn union(&self) -> BTreeSet<TriggerTag> {
		self.attributes
			.iter()
			.copied()
			.map(TriggerTag::Attribute)
			.chain(self.classes.iter().copied().map(TriggerTag::Class))
			.collect()
	}
}

/// Every distinct basic effect key across the records, sorted.
pub fn basic_effect_key_universe(records: &[EquipmentRecord]) -> Vec<String> {
	records
		.iter()
		.flat_map(|record| record.basic_effects.keys())
		.sorted()
		.dedup()
		.map(str::to_owned)
		.collect()
}

/// Detect attribute and class tags in free-text trigger condition.
///
/// This is a plain substring search: an attribute is present if the text
/// contains the attribute term followed by `屬性`, a class if the text
/// contains the class name anywhere.
pub fn trigger_tags(text: &str) -> TriggerTags {
	static MATCHER: OnceLock<(AhoCorasick, Vec<TriggerTag>)> = OnceLock::new();
	let (matcher, tags) = MATCHER.get_or_init(|| {
		let tags = TriggerTag::all().collect::<Vec<_>>();
		let matcher = AhoCorasick::new(tags.iter().map(TriggerTag::pattern))
			.expect("pattern construction should not fail");
		(matcher, tags)
	});

	let mut output = TriggerTags::default();
	for found in matcher.find_overlapping_iter(text) {
		match tags[found.pattern().as_usize()] {
			TriggerTag::Attribute(attribute) => output.attributes.insert(attribute),
			TriggerTag::Class(class) => output.classes.insert(class),
		};
	}

	output
}

#[cfg(test)]
mod test {
	use pretty_assertions::assert_eq;

	use crate::catalog::Effects;

	use super::*;

	fn record(keys: &[&str]) -> EquipmentRecord {
		EquipmentRecord {
			basic_effects: keys.iter().map(|key| (*key, 1.0)).collect::<Effects>(),
			..Default::default()
		}
	}

	#[test]
	fn key_universe_sorted_and_distinct() {
		let records = [
			record(&["防禦力", "攻擊力"]),
			record(&[]),
			record(&["攻擊力", "生命值"]),
		];

		assert_eq!(
			basic_effect_key_universe(&records),
			vec!["攻擊力", "生命值", "防禦力"]
		);
	}

	#[test]
	fn key_universe_empty() {
		assert_eq!(basic_effect_key_universe(&[]), Vec::<String>::new());
	}

	#[test]
	fn tags_attribute_and_class() {
		let got = trigger_tags("隊伍中有火屬性的智慧型角色時");
		assert_eq!(got.attributes, BTreeSet::from([Attribute::Fire]));
		assert_eq!(got.classes, BTreeSet::from([Class::Intelligence]));
	}

	#[test]
	fn tags_none() {
		let got = trigger_tags("裝備者生命值低於50%時");
		assert_eq!(got, TriggerTags::default());
	}

	#[test]
	fn tags_attribute_needs_suffix() {
		let got = trigger_tags("火焰攻擊命中時");
		assert!(got.attributes.is_empty());
	}

	#[test]
	fn tags_multiple() {
		let got = trigger_tags("水屬性或暗屬性的力量型、敏捷型角色");
		assert_eq!(
			got.attributes,
			BTreeSet::from([Attribute::Water, Attribute::Dark])
		);
		assert_eq!(
			got.classes,
			BTreeSet::from([Class::Agility, Class::Strength])
		);
		assert_eq!(got.union().len(), 4);
	}

	#[test]
	fn vocabulary_round_trips_through_strings() {
		assert_eq!("木".parse::<Attribute>().ok(), Some(Attribute::Wood));
		assert_eq!(SlotType::Accessory.as_ref(), "飾品");
		assert_eq!(Class::Strength.to_string(), "力量型");
		assert!("土".parse::<Attribute>().is_err());
	}
}
