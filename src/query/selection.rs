use std::collections::BTreeSet;

use strum::{Display, EnumIter, EnumString};

use super::facet::{Attribute, Class, SlotType, TriggerTag};

/// How multiple selected values within a facet combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Mode {
	#[default]
	Or,
	And,
}

/// The user's current choice for every facet.
///
/// An empty set never filters anything out. Only the basic effects facet has
/// a configurable mode - every other facet is always OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
	pub rarities: BTreeSet<u8>,
	pub slot_types: BTreeSet<SlotType>,
	pub basic_effects: BTreeSet<String>,
	pub basic_mode: Mode,
	pub attributes: BTreeSet<Attribute>,
	pub classes: BTreeSet<Class>,
}

impl FacetSelection {
	/// Empty every facet. The basic effects mode is a preference, not a
	/// selection, and is kept.
	pub fn clear(&mut self) {
		self.rarities.clear();
		self.slot_types.clear();
		self.basic_effects.clear();
		self.attributes.clear();
		self.classes.clear();
	}

	pub fn is_empty(&self) -> bool {
		self.rarities.is_empty()
			&& self.slot_types.is_empty()
			&& self.basic_effects.is_empty()
			&& self.attributes.is_empty()
			&& self.classes.is_empty()
	}

	/// Selected attribute and class tags as a single set.
	pub fn trigger_tags(&self) -> BTreeSet<TriggerTag> {
		self.attributes
			.iter()
			.copied()
			.map(TriggerTag::Attribute)
			.chain(self.classes.iter().copied().map(TriggerTag::Class))
			.collect()
	}
}
