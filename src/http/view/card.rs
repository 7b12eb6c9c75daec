use maud::{html, Markup, Render};

use crate::{
	catalog::{Effects, IconIndex},
	query::{self, Hit},
};

/// Placeholder shown where an equipment icon is unavailable.
pub const NO_ICON: &str = "無圖";

/// Placeholder shown for an empty effect list.
pub const NO_EFFECTS: &str = "（無）";

/// Result card for a single search hit.
pub struct Card<'a> {
	pub hit: Hit<'a>,
	pub icons: &'a IconIndex,
	pub factor: Option<f64>,
}

impl Card<'_> {
	fn detail_href(&self) -> String {
		let index = self.hit.index;
		match self.factor {
			Some(_) => format!("/item/{index}?max=true"),
			None => format!("/item/{index}"),
		}
	}
}

impl Render for Card<'_> {
	fn render(&self) -> Markup {
		let record = self.hit.record;

		html! {
			article.card {
				header {
					(Icon { icons: self.icons, name: &record.name })
					h3 { (query::display_name(record)) }
					p { (query::star_label(record.rarity)) " | " (record.slot_type) }
				}

				h4 { "基本效果：" }
				(EffectList {
					effects: &record.basic_effects,
					factor: self.factor,
					separator: ": ",
				})

				h4 { "高級效果觸發條件：" }
				p { (query::trigger_summary(record)) }

				h4 { "Skill+：" }
				p { (query::skill_plus_summary(record)) }

				footer {
					a href=(self.detail_href()) { "查看詳情" }
				}
			}
		}
	}
}

pub struct Icon<'a> {
	pub icons: &'a IconIndex,
	pub name: &'a str,
}

impl Render for Icon<'_> {
	fn render(&self) -> Markup {
		html! {
			@match self.icons.url(self.name) {
				Some(url) => {
					img.icon src=(url) alt=(self.name) width="80" height="80";
				}
				None => {
					span.icon { (NO_ICON) }
				}
			}
		}
	}
}

/// Effects one per line, in source order.
pub struct EffectList<'a> {
	pub effects: &'a Effects,
	pub factor: Option<f64>,
	/// Placed between an effect's name and its value.
	pub separator: &'a str,
}

impl Render for EffectList<'_> {
	fn render(&self) -> Markup {
		html! {
			@if self.effects.is_empty() {
				p { (NO_EFFECTS) }
			} @else {
				ul {
					@for (name, value) in self.effects.iter() {
						li { (name) (self.separator) (query::display_value(value, self.factor)) }
					}
				}
			}
		}
	}
}
