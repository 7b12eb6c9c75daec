mod facet;
mod filter;
mod scale;
mod selection;
mod session;
mod summary;

pub use {
	facet::{
		basic_effect_key_universe, trigger_tags, Attribute, Class, SlotType, TriggerTag, TriggerTags,
		RARITIES,
	},
	filter::{compare, match_category, match_keys, matches, search, Hit},
	scale::{display_value, scale_numbers, scale_text, MAX_LEVEL_FACTOR},
	selection::{FacetSelection, Mode},
	session::{ResultSet, Session},
	summary::{display_name, skill_plus_summary, star_label, trigger_summary, NONE_MARKER, UNNAMED},
};
