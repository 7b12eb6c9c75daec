use std::{cmp::Ordering, collections::BTreeSet};

use crate::catalog::EquipmentRecord;

use super::{
	facet::trigger_tags,
	selection::{FacetSelection, Mode},
};

/// A record that passed a search, along with its position in the source records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
	pub index: usize,
	pub record: &'a EquipmentRecord,
}

/// Match a single-valued field against a facet selection.
///
/// In AND mode a single-valued field can only ever satisfy a selection of
/// exactly one value.
pub fn match_category<T>(selected: &BTreeSet<T>, mode: Mode, matches: impl Fn(&T) -> bool) -> bool {
	if selected.is_empty() {
		return true;
	}

	match mode {
		Mode::Or => selected.iter().any(matches),
		Mode::And => selected.len() == 1 && selected.iter().all(matches),
	}
}

/// Match a multi-valued field (a set of keys) against a facet selection.
pub fn match_keys<T>(selected: &BTreeSet<T>, mode: Mode, contains: impl Fn(&T) -> bool) -> bool {
	if selected.is_empty() {
		return true;
	}

	match mode {
		Mode::Or => selected.iter().any(contains),
		Mode::And => selected.iter().all(contains),
	}
}

/// Check a record against every facet of the selection.
pub fn matches(record: &EquipmentRecord, selection: &FacetSelection) -> bool {
	let rarity = match_category(&selection.rarities, Mode::Or, |rarity| {
		*rarity == record.rarity
	});

	let slot_type = match_category(&selection.slot_types, Mode::Or, |slot_type| {
		slot_type.as_ref() == record.slot_type
	});

	let basic_effects = match_keys(&selection.basic_effects, selection.basic_mode, |key| {
		record.basic_effects.contains_key(key)
	});

	// Trigger tags are extracted lazily - most searches never touch this facet.
	let trigger = {
		let selected = selection.trigger_tags();
		selected.is_empty() || {
			let record_tags = trigger_tags(record.trigger_condition().unwrap_or_default()).union();
			match_keys(&selected, Mode::Or, |tag| record_tags.contains(tag))
		}
	};

	rarity && slot_type && basic_effects && trigger
}

/// Result ordering: rarity descending, then slot type, then name.
pub fn compare(a: &EquipmentRecord, b: &EquipmentRecord) -> Ordering {
	b.rarity
		.cmp(&a.rarity)
		.then_with(|| collate(&a.slot_type, &b.slot_type))
		.then_with(|| collate(&a.name, &b.name))
}

/// Case-insensitive string ordering. Strings that differ only in case put
/// lowercase first.
fn collate(a: &str, b: &str) -> Ordering {
	folded(a).cmp(folded(b)).then_with(|| b.cmp(a))
}

fn folded(value: &str) -> impl Iterator<Item = char> + '_ {
	value.chars().flat_map(char::to_lowercase)
}

/// Filter records by the selection, sorted for display.
pub fn search<'a>(records: &'a [EquipmentRecord], selection: &FacetSelection) -> Vec<Hit<'a>> {
	let mut hits = records
		.iter()
		.enumerate()
		.filter(|(_, record)| matches(record, selection))
		.map(|(index, record)| Hit { index, record })
		.collect::<Vec<_>>();

	// Stable, so records equal on every key keep their source order.
	hits.sort_by(|a, b| compare(a.record, b.record));

	hits
}
