use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::{EquipmentRecord, SkillPlus};

/// Shown in place of a summary when there is nothing to summarise.
pub const NONE_MARKER: &str = "無";

/// Shown in place of a name for records that lack one.
pub const UNNAMED: &str = "（未命名）";

/// Display label for a rarity tier, i.e. `5★`.
pub fn star_label(rarity: u8) -> String {
	format!("{rarity}★")
}

pub fn display_name(record: &EquipmentRecord) -> &str {
	match record.name.is_empty() {
		true => UNNAMED,
		false => &record.name,
	}
}

/// One-line summary of the advanced effect trigger condition.
pub fn trigger_summary(record: &EquipmentRecord) -> String {
	non_blank(record.trigger_condition().unwrap_or_default())
}

/// One-line summary of the Skill+ enhancement.
pub fn skill_plus_summary(record: &EquipmentRecord) -> String {
	match &record.skill_plus {
		None => NONE_MARKER.into(),
		Some(SkillPlus::Text(text)) => non_blank(text),
		Some(SkillPlus::Structured {
			condition,
			magnitude,
		}) => {
			let skill = extract_skill_phrase(condition.as_deref().unwrap_or_default());
			let magnitude = normalize_range(magnitude.as_deref().unwrap_or_default());

			let mut parts = vec![];
			if !skill.is_empty() {
				parts.push(skill);
			}
			if !magnitude.is_empty() {
				parts.push(format!("+{magnitude}"));
			}

			match parts.is_empty() {
				true => NONE_MARKER.into(),
				false => parts.join(" "),
			}
		}
	}
}

fn non_blank(text: &str) -> String {
	match text.trim() {
		"" => NONE_MARKER.into(),
		trimmed => trimmed.into(),
	}
}

/// Pull the skill name out of a Skill+ condition. A name in 「」 quotes wins;
/// otherwise the known boilerplate is stripped from the whole condition.
fn extract_skill_phrase(condition: &str) -> String {
	static QUOTED: OnceLock<Regex> = OnceLock::new();
	static BOILERPLATE: OnceLock<Regex> = OnceLock::new();

	let quoted = QUOTED.get_or_init(|| Regex::new(r"「([^」]+)」").expect("static regex"));
	if let Some(captures) = quoted.captures(condition) {
		return captures[1].to_string();
	}

	let boilerplate =
		BOILERPLATE.get_or_init(|| Regex::new(r"持有技能|的Ranger|Ranger|：").expect("static regex"));
	boilerplate.replace_all(condition, "").trim().to_string()
}

/// Collapse range notation to a canonical form: full-width tildes become `~`
/// and all whitespace is dropped.
fn normalize_range(magnitude: &str) -> String {
	magnitude
		.chars()
		.filter(|character| !character.is_whitespace())
		.map(|character| match character {
			'～' => '~',
			other => other,
		})
		.collect()
}
