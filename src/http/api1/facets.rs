use aide::{
	axum::{routing::get_with, ApiRouter},
	transform::TransformOperation,
};
use axum::{debug_handler, Json};
use schemars::JsonSchema;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
	catalog::Dataset,
	query::{Attribute, Class, Mode, SlotType, RARITIES},
};

use super::{api::ApiState, error::Result, extract::LoadedDataset};

pub fn router(state: ApiState) -> ApiRouter {
	ApiRouter::new().api_route("/", get_with(facets, facets_docs).with_state(state))
}

/// Values accepted by each search facet.
#[derive(Debug, PartialEq, Serialize, JsonSchema)]
struct FacetsResponse {
	/// Selectable rarity tiers.
	rarities: Vec<u8>,

	/// Selectable slot types.
	slot_types: Vec<String>,

	/// Every basic effect name present in the catalog, sorted.
	basic_effects: Vec<String>,

	/// Modes for combining multiple basic effect selections.
	basic_modes: Vec<String>,

	/// Attributes detectable in advanced effect trigger conditions.
	attributes: Vec<String>,

	/// Classes detectable in advanced effect trigger conditions.
	classes: Vec<String>,
}

impl FacetsResponse {
	fn new(dataset: &Dataset) -> Self {
		Self {
			rarities: RARITIES.collect(),
			slot_types: SlotType::iter().map(|slot_type| slot_type.to_string()).collect(),
			basic_effects: dataset.basic_effect_keys().to_vec(),
			basic_modes: Mode::iter().map(|mode| mode.to_string()).collect(),
			attributes: Attribute::iter().map(|attribute| attribute.to_string()).collect(),
			classes: Class::iter().map(|class| class.to_string()).collect(),
		}
	}
}

fn facets_docs(operation: TransformOperation) -> TransformOperation {
	operation
		.summary("list facet values")
		.description("List the values accepted by every facet of the search endpoint.")
		.response_with::<200, Json<FacetsResponse>, _>(|response| {
			response.example(FacetsResponse {
				rarities: RARITIES.collect(),
				slot_types: vec!["武器".into(), "防具".into(), "飾品".into()],
				basic_effects: vec!["攻擊力".into(), "防禦力".into()],
				basic_modes: vec!["OR".into(), "AND".into()],
				attributes: vec!["火".into(), "水".into(), "木".into(), "光".into(), "暗".into()],
				classes: vec!["智慧型".into(), "敏捷型".into(), "力量型".into()],
			})
		})
}

#[debug_handler(state = ApiState)]
async fn facets(LoadedDataset(dataset): LoadedDataset) -> Result<Json<FacetsResponse>> {
	Ok(Json(FacetsResponse::new(&dataset)))
}
