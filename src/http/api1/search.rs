use std::{collections::BTreeSet, str::FromStr};

use aide::{
	axum::{routing::get_with, ApiRouter},
	transform::TransformOperation,
};
use axum::{
	debug_handler,
	extract::{FromRef, State},
	Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
	catalog::Dataset,
	http::{service::Service, DisplayConfig},
	query::{self, Attribute, Class, FacetSelection, Mode, SlotType, RARITIES},
};

use super::{
	api::ApiState,
	equipment::{DisplayQuery, EffectEntry, EquipmentSummary},
	error::{Error, Result},
	extract::{LoadedDataset, Query},
	list::ListString,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	limit: LimitConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LimitConfig {
	default: usize,
	max: usize,
}

#[derive(Clone, FromRef)]
struct SearchState {
	services: Service,
	display: DisplayConfig,
	limit_config: LimitConfig,
}

pub fn router(config: Config, state: ApiState) -> ApiRouter {
	let state = SearchState {
		services: state.services,
		display: state.display,
		limit_config: config.limit,
	};

	ApiRouter::new().api_route("/", get_with(search, search_docs).with_state(state))
}

/// Query parameters accepted by the search endpoint.
///
/// Facets combine with AND. Within a facet, multiple values combine with OR,
/// except basic effects which follow `mode`. An omitted or empty facet does
/// not filter.
#[derive(Debug, Default, Deserialize, JsonSchema)]
struct SearchQuery {
	/// Rarity tiers to match, i.e. `5,7`. Accepts values from 1 to 8.
	rarity: Option<ListString>,

	/// Slot types to match, i.e. `武器,飾品`.
	slot: Option<ListString>,

	/// Basic effect names to match. Must be names listed by the facets endpoint.
	basic: Option<ListString>,

	/// How multiple basic effects combine, `or` (any) or `and` (all). Defaults to `or`.
	mode: Option<String>,

	/// Attributes to look for in advanced effect trigger conditions, i.e. `火,暗`.
	attribute: Option<ListString>,

	/// Classes to look for in advanced effect trigger conditions, i.e. `敏捷型`.
	class: Option<ListString>,

	/// Maximum number of results to return. `count` always reports the full total.
	limit: Option<usize>,

	/// If `true`, every number within effect values is scaled to its max-level figure.
	max: Option<bool>,
}

impl SearchQuery {
	fn selection(&self, dataset: &Dataset) -> Result<FacetSelection> {
		let basic_mode = match &self.mode {
			None => Mode::default(),
			Some(mode) => Mode::from_str(mode)
				.map_err(|_| Error::Invalid(format!("unknown mode \"{mode}\"")))?,
		};

		let known_basic_effects = dataset.basic_effect_keys();

		Ok(FacetSelection {
			rarities: parse_facet(&self.rarity, "rarity", |value| {
				value.parse::<u8>().ok().filter(|rarity| RARITIES.contains(rarity))
			})?,
			slot_types: parse_facet(&self.slot, "slot type", |value| value.parse::<SlotType>().ok())?,
			basic_effects: parse_facet(&self.basic, "basic effect", |value| {
				known_basic_effects
					.binary_search_by(|key| key.as_str().cmp(value))
					.ok()
					.map(|_| value.to_string())
			})?,
			basic_mode,
			attributes: parse_facet(&self.attribute, "attribute", |value| {
				value.parse::<Attribute>().ok()
			})?,
			classes: parse_facet(&self.class, "class", |value| value.parse::<Class>().ok())?,
		})
	}
}

fn parse_facet<T: Ord>(
	list: &Option<ListString>,
	facet: &str,
	parse: impl Fn(&str) -> Option<T>,
) -> Result<BTreeSet<T>> {
	list.iter()
		.flat_map(|list| list.iter())
		.map(|value| parse(value).ok_or_else(|| Error::Invalid(format!("unknown {facet} \"{value}\""))))
		.collect()
}

/// Response structure for the search endpoint.
#[derive(Debug, Serialize, JsonSchema)]
struct SearchResponse {
	/// Total number of matching records, regardless of `limit`.
	count: usize,

	/// Matching records, highest rarity first, then by slot type and name.
	results: Vec<EquipmentSummary>,
}

fn search_docs(operation: TransformOperation) -> TransformOperation {
	operation
		.summary("search the equipment catalog")
		.description(
			"Fetch summaries of every equipment record matching the provided facet selection.",
		)
		.response_with::<200, Json<SearchResponse>, _>(|response| {
			response.example(SearchResponse {
				count: 1,
				results: vec![EquipmentSummary {
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
					skill_plus: "無".into(),
				}],
			})
		})
}

#[debug_handler(state = SearchState)]
async fn search(
	Query(search_query): Query<SearchQuery>,
	LoadedDataset(dataset): LoadedDataset,
	State(limit_config): State<LimitConfig>,
	State(display): State<DisplayConfig>,
) -> Result<Json<SearchResponse>> {
	let selection = search_query.selection(&dataset)?;

	let limit = search_query
		.limit
		.unwrap_or(limit_config.default)
		.min(limit_config.max);

	let factor = DisplayQuery {
		max: search_query.max,
	}
	.factor(display);
	let hits = query::search(dataset.records(), &selection);

	tracing::debug!(?selection, count = hits.len(), limit, "api search");

	let response = SearchResponse {
		count: hits.len(),
		results: hits
			.into_iter()
			.take(limit)
			.map(|hit| EquipmentSummary::new(hit, dataset.icons(), factor))
			.collect(),
	};

	Ok(Json(response))
}

#[cfg(test)]
mod test {
	use pretty_assertions::assert_eq;

	use crate::catalog::{Effects, EquipmentRecord, IconIndex};

	use super::*;

	fn dataset() -> Dataset {
		let records = vec![EquipmentRecord {
			name: "炎之劍".into(),
			rarity: 5,
			slot_type: "武器".into(),
			basic_effects: Effects::from_iter([("攻擊力", "+10"), ("暴擊率", "2%")]),
			..Default::default()
		}];
		Dataset::new(records, IconIndex::default())
	}

	fn list(input: &str) -> Option<ListString> {
		Some(input.parse().expect("list should parse"))
	}

	fn invalid_message(query: SearchQuery) -> String {
		match query.selection(&dataset()) {
			Err(Error::Invalid(message)) => message,
			other => panic!("expected invalid request, got {other:?}"),
		}
	}

	#[test]
	fn empty_query_selects_nothing() {
		let selection = SearchQuery::default()
			.selection(&dataset())
			.expect("selection should build");
		assert_eq!(selection, FacetSelection::default());
	}

	#[test]
	fn full_query() {
		let query = SearchQuery {
			rarity: list("5,7"),
			slot: list("武器"),
			basic: list("攻擊力,暴擊率"),
			mode: Some("and".into()),
			attribute: list("火"),
			class: list("敏捷型,力量型"),
			..Default::default()
		};

		let selection = query.selection(&dataset()).expect("selection should build");

		assert_eq!(
			selection,
			FacetSelection {
				rarities: BTreeSet::from([5, 7]),
				slot_types: BTreeSet::from([SlotType::Weapon]),
				basic_effects: BTreeSet::from(["攻擊力".to_string(), "暴擊率".to_string()]),
				basic_mode: Mode::And,
				attributes: BTreeSet::from([Attribute::Fire]),
				classes: BTreeSet::from([Class::Agility, Class::Strength]),
			}
		);
	}

	#[test]
	fn rarity_out_of_range() {
		let query = SearchQuery {
			rarity: list("9"),
			..Default::default()
		};
		assert_eq!(invalid_message(query), "unknown rarity \"9\"");

		let query = SearchQuery {
			rarity: list("0"),
			..Default::default()
		};
		assert_eq!(invalid_message(query), "unknown rarity \"0\"");
	}

	#[test]
	fn unknown_vocabulary() {
		let query = SearchQuery {
			attribute: list("風"),
			..Default::default()
		};
		assert_eq!(invalid_message(query), "unknown attribute \"風\"");

		let query = SearchQuery {
			basic: list("不存在"),
			..Default::default()
		};
		assert_eq!(invalid_message(query), "unknown basic effect \"不存在\"");

		let query = SearchQuery {
			mode: Some("xor".into()),
			..Default::default()
		};
		assert_eq!(invalid_message(query), "unknown mode \"xor\"");
	}
}
