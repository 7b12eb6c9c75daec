mod catalog;
mod error;
mod icon;
mod record;
mod source;

pub use {
	catalog::{Catalog, Config, Dataset, Documents, Status},
	error::Error,
	icon::IconIndex,
	record::{parse_records, AdvancedEffects, EffectValue, Effects, EquipmentRecord, SkillPlus},
	source::{DirectorySource, HttpSource, Source},
};
