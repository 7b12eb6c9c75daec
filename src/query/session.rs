use std::{collections::BTreeSet, sync::Arc};

use crate::catalog::Dataset;

use super::{
	facet::{Attribute, Class, SlotType},
	filter::{search, Hit},
	selection::{FacetSelection, Mode},
};

/// Results of the most recent search. Replaced wholesale by each search.
#[derive(Debug, Clone)]
pub struct ResultSet {
	dataset: Arc<Dataset>,
	indices: Vec<usize>,
}

impl ResultSet {
	pub fn len(&self) -> usize {
		self.indices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	pub fn dataset(&self) -> &Dataset {
		&self.dataset
	}

	pub fn iter(&self) -> impl Iterator<Item = Hit<'_>> {
		self.indices.iter().filter_map(|&index| {
			self.dataset
				.record(index)
				.map(|record| Hit { index, record })
		})
	}
}

/// One user's lookup state: facet choices, display preference, and results.
///
/// Selections change only through the toggle methods; nothing is recomputed
/// until `search` is called.
#[derive(Debug, Clone, Default)]
pub struct Session {
	selection: FacetSelection,
	show_max: bool,
	results: Option<ResultSet>,
}

impl Session {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn selection(&self) -> &FacetSelection {
		&self.selection
	}

	pub fn show_max(&self) -> bool {
		self.show_max
	}

	pub fn set_show_max(&mut self, show_max: bool) {
		self.show_max = show_max;
	}

	pub fn set_basic_mode(&mut self, mode: Mode) {
		self.selection.basic_mode = mode;
	}

	pub fn toggle_rarity(&mut self, rarity: u8, checked: bool) {
		toggle(&mut self.selection.rarities, rarity, checked);
	}

	pub fn toggle_slot_type(&mut self, slot_type: SlotType, checked: bool) {
		toggle(&mut self.selection.slot_types, slot_type, checked);
	}

	pub fn toggle_basic_effect(&mut self, key: impl Into<String>, checked: bool) {
		toggle(&mut self.selection.basic_effects, key.into(), checked);
	}

	pub fn toggle_attribute(&mut self, attribute: Attribute, checked: bool) {
		toggle(&mut self.selection.attributes, attribute, checked);
	}

	pub fn toggle_class(&mut self, class: Class, checked: bool) {
		toggle(&mut self.selection.classes, class, checked);
	}

	/// Empty every selection and drop any results.
	pub fn clear_all(&mut self) {
		self.selection.clear();
		self.results = None;
	}

	/// Run the current selection against the dataset, replacing prior results.
	pub fn search(&mut self, dataset: Arc<Dataset>) -> &ResultSet {
		let indices = search(dataset.records(), &self.selection)
			.into_iter()
			.map(|hit| hit.index)
			.collect();

		tracing::debug!(selection = ?self.selection, "search executed");

		self.results.insert(ResultSet { dataset, indices })
	}

	/// Results of the last search, if one has run since the last clear.
	pub fn results(&self) -> Option<&ResultSet> {
		self.results.as_ref()
	}
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T, checked: bool) {
	match checked {
		true => set.insert(value),
		false => set.remove(&value),
	};
}

#[cfg(test)]
mod test {
	use pretty_assertions::assert_eq;

	use crate::catalog::{Effects, EquipmentRecord, IconIndex};

	use super::*;

	fn dataset() -> Arc<Dataset> {
		let records = vec![
			EquipmentRecord {
				name: "炎之劍".into(),
				rarity: 5,
				slot_type: "武器".into(),
				basic_effects: Effects::from_iter([("攻擊力", "+10")]),
				..Default::default()
			},
			EquipmentRecord {
				name: "冰之盾".into(),
				rarity: 3,
				slot_type: "防具".into(),
				..Default::default()
			},
		];
		Arc::new(Dataset::new(records, IconIndex::default()))
	}

	fn names(results: &ResultSet) -> Vec<&str> {
		results.iter().map(|hit| hit.record.name.as_str()).collect()
	}

	#[test]
	fn toggles_update_selection() {
		let mut session = Session::new();
		session.toggle_rarity(5, true);
		session.toggle_rarity(3, true);
		session.toggle_rarity(3, false);
		session.toggle_slot_type(SlotType::Weapon, true);
		session.toggle_basic_effect("攻擊力", true);
		session.toggle_attribute(Attribute::Fire, true);
		session.toggle_class(Class::Agility, true);
		session.set_basic_mode(Mode::And);

		let selection = session.selection();
		assert_eq!(selection.rarities, BTreeSet::from([5]));
		assert_eq!(selection.slot_types, BTreeSet::from([SlotType::Weapon]));
		assert_eq!(selection.basic_effects, BTreeSet::from(["攻擊力".to_string()]));
		assert_eq!(selection.attributes, BTreeSet::from([Attribute::Fire]));
		assert_eq!(selection.classes, BTreeSet::from([Class::Agility]));
		assert_eq!(selection.basic_mode, Mode::And);
	}

	#[test]
	fn search_is_explicit() {
		let mut session = Session::new();
		session.toggle_rarity(3, true);
		assert!(session.results().is_none());

		let results = session.search(dataset());
		assert_eq!(names(results), vec!["冰之盾"]);

		// Changing the selection leaves the old results in place until the next search.
		session.toggle_rarity(3, false);
		session.toggle_rarity(5, true);
		assert_eq!(session.results().map(names), Some(vec!["冰之盾"]));

		let results = session.search(dataset());
		assert_eq!(names(results), vec!["炎之劍"]);
	}

	#[test]
	fn clear_all_resets_selection_and_results() {
		let mut session = Session::new();
		session.toggle_rarity(5, true);
		session.set_basic_mode(Mode::And);
		session.set_show_max(true);
		session.search(dataset());

		session.clear_all();

		assert!(session.selection().is_empty());
		assert!(session.results().is_none());
		assert_eq!(session.selection().basic_mode, Mode::And);
		assert!(session.show_max());
	}

	#[test]
	fn empty_results() {
		let mut session = Session::new();
		session.toggle_rarity(8, true);
		let results = session.search(dataset());
		assert!(results.is_empty());
		assert_eq!(results.len(), 0);
	}
}
