use aide::{
	axum::{routing::get_with, ApiRouter},
	transform::TransformOperation,
};
use axum::{debug_handler, extract::State, Json};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
	catalog::{Effects, EquipmentRecord, IconIndex},
	http::DisplayConfig,
	query::{self, Hit},
};

use super::{
	api::ApiState,
	error::{Error, Result},
	extract::{LoadedDataset, Path, Query},
};

pub fn router(state: ApiState) -> ApiRouter {
	ApiRouter::new().api_route("/{index}", get_with(equipment, equipment_docs).with_state(state))
}

/// Path variables accepted by the equipment endpoint.
#[derive(Deserialize, JsonSchema)]
struct EquipmentPath {
	/// Position of the record within the catalog, as reported by search results.
	index: usize,
}

/// Query parameters accepted by endpoints that display effect values.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct DisplayQuery {
	/// If `true`, every number within effect values is scaled to its max-level figure.
	pub max: Option<bool>,
}

impl DisplayQuery {
	pub fn factor(&self, display: DisplayConfig) -> Option<f64> {
		self.max.unwrap_or(false).then_some(display.maxfactor)
	}
}

/// A single effect, in source order.
#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct EffectEntry {
	/// Effect name.
	pub name: String,

	/// Effect value as displayed, scaled if max-level figures were requested.
	pub value: String,
}

impl EffectEntry {
	pub fn list(effects: &Effects, factor: Option<f64>) -> Vec<Self> {
		effects
			.iter()
			.map(|(name, value)| Self {
				name: name.into(),
				value: query::display_value(value, factor),
			})
			.collect()
	}
}

/// Card-level summary of an equipment record.
#[derive(Debug, Serialize, JsonSchema)]
pub struct EquipmentSummary {
	/// Position of the record within the catalog.
	pub index: usize,

	/// Display name of the equipment.
	pub name: String,

	/// Rarity tier, from 1 to 8. 0 if the record carries no usable rarity.
	pub rarity: u8,

	/// Slot type label, i.e. `武器`.
	pub slot_type: String,

	/// URL of the equipment icon, if one is known.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,

	/// Basic effects of the equipment.
	pub basic_effects: Vec<EffectEntry>,

	/// One-line summary of the advanced effect trigger condition.
	pub trigger: String,

	/// One-line summary of the Skill+ enhancement.
	pub skill_plus: String,
}

impl EquipmentSummary {
	pub fn new(hit: Hit<'_>, icons: &IconIndex, factor: Option<f64>) -> Self {
		let Hit { index, record } = hit;
		Self {
			index,
			name: query::display_name(record).into(),
			rarity: record.rarity,
			slot_type: record.slot_type.clone(),
			icon: icons.url(&record.name),
			basic_effects: EffectEntry::list(&record.basic_effects, factor),
			trigger: query::trigger_summary(record),
			skill_plus: query::skill_plus_summary(record),
		}
	}
}

/// Full detail of an equipment record.
#[derive(Debug, Serialize, JsonSchema)]
struct EquipmentDetail {
	#[serde(flatten)]
	summary: EquipmentSummary,

	/// Advanced effect trigger condition, verbatim.
	#[serde(skip_serializing_if = "Option::is_none")]
	trigger_condition: Option<String>,

	/// Effects that can be switched while the advanced effect is active.
	toggleable_effects: Vec<EffectEntry>,
}

impl EquipmentDetail {
	fn new(hit: Hit<'_>, icons: &IconIndex, factor: Option<f64>) -> Self {
		let record: &EquipmentRecord = hit.record;

		// Toggleable effects are always shown as-is.
		let toggleable_effects = record
			.advanced_effects
			.as_ref()
			.and_then(|advanced| advanced.toggleable_effects.as_ref())
			.map(|effects| EffectEntry::list(effects, None))
			.unwrap_or_default();

		Self {
			summary: EquipmentSummary::new(hit, icons, factor),
			trigger_condition: record.trigger_condition().map(str::to_owned),
			toggleable_effects,
		}
	}
}

fn equipment_docs(operation: TransformOperation) -> TransformOperation {
	operation
		.summary("read an equipment record")
		.description("Read the full detail of a single equipment record by its catalog index.")
		.response_with::<200, Json<EquipmentDetail>, _>(|response| {
			response.example(EquipmentDetail {
				summary: EquipmentSummary {
					index: 0,
					name: "炎之劍".into(),
					rarity: 5,
					slot_type: "武器".into(),
					icon: Some("/gear_icon/1001_icon.png".into()),
					basic_effects: vec![EffectEntry {
						name: "攻擊力".into(),
						value: "+10".into(),
					}],
					trigger: "隊伍中有火屬性角色".into(),
					skill_plus: "猛攻 +5~10".into(),
				},
				trigger_condition: Some("隊伍中有火屬性角色".into()),
				toggleable_effects: vec![EffectEntry {
					name: "暴擊率".into(),
					value: "+5%".into(),
				}],
			})
		})
}

#[debug_handler(state = ApiState)]
async fn equipment(
	Path(path): Path<EquipmentPath>,
	Query(query): Query<DisplayQuery>,
	LoadedDataset(dataset): LoadedDataset,
	State(display): State<DisplayConfig>,
) -> Result<Json<EquipmentDetail>> {
	let record = dataset
		.record(path.index)
		.ok_or_else(|| Error::NotFound(format!("equipment {}", path.index)))?;

	let hit = Hit {
		index: path.index,
		record,
	};

	Ok(Json(EquipmentDetail::new(
		hit,
		dataset.icons(),
		query.factor(display),
	)))
}
