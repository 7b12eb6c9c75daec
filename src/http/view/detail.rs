use axum::{
	debug_handler,
	extract::{Path, Query, State},
};
use maud::{html, Markup, Render};
use serde::Deserialize;

use crate::{
	catalog::IconIndex,
	http::{http::HttpState, service::Service, DisplayConfig},
	query::{self, Hit},
};

use super::{
	base::BaseTemplate,
	card::{EffectList, Icon},
	error::{Error, Result},
};

const NO_ADVANCED_EFFECTS: &str = "（無高級效果）";
const NO_TRIGGER: &str = "（無）";

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
	max: Option<bool>,
}

#[debug_handler(state = HttpState)]
pub async fn detail(
	State(Service { catalog }): State<Service>,
	State(display): State<DisplayConfig>,
	Path(index): Path<usize>,
	Query(params): Query<DetailQuery>,
) -> Result<Markup> {
	let dataset = catalog.dataset()?;
	let record = dataset
		.record(index)
		.ok_or_else(|| Error::NotFound(format!("equipment {index}")))?;

	let factor = params.max.unwrap_or(false).then_some(display.maxfactor);

	Ok(DetailPage {
		hit: Hit { index, record },
		icons: dataset.icons(),
		factor,
	}
	.render())
}

struct DetailPage<'a> {
	hit: Hit<'a>,
	icons: &'a IconIndex,
	factor: Option<f64>,
}

impl Render for DetailPage<'_> {
	fn render(&self) -> Markup {
		let record = self.hit.record;
		let name = query::display_name(record);

		let advanced = record
			.advanced_effects
			.as_ref()
			.filter(|advanced| !advanced.is_empty());

		BaseTemplate {
			title: name.into(),
			content: html! {
				article {
					header {
						(Icon { icons: self.icons, name: &record.name })
						h2 { (name) }
						p {
							mark { (query::star_label(record.rarity)) }
							" | "
							mark { (record.slot_type) }
						}
					}

					div.grid {
						section {
							h3 { "基本效果" }
							(EffectList {
								effects: &record.basic_effects,
								factor: self.factor,
								separator: "：",
							})

							h3 { "Skill+" }
							p { (query::skill_plus_summary(record)) }
						}

						section {
							h3 { "高級效果" }
							@match advanced {
								Some(advanced) => {
									p {
										"觸發條件："
										(advanced.trigger_condition.as_deref().filter(|trigger| !trigger.is_empty()).unwrap_or(NO_TRIGGER))
									}
									@if let Some(toggleable) = &advanced.toggleable_effects {
										p { "可切換的效果：" }
										ul {
											@for (effect, value) in toggleable.iter() {
												li { "・" (effect) "：" (value.to_string()) }
											}
										}
									}
								}
								None => {
									p { (NO_ADVANCED_EFFECTS) }
								}
							}
						}
					}

					footer {
						a href="/" { "返回查詢" }
					}
				}
			},
		}
		.render()
	}
}
