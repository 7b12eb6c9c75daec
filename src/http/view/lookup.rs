use axum::{
	debug_handler,
	extract::{Query, State},
};
use maud::{html, Markup, Render};
use strum::{EnumString, IntoEnumIterator};

use crate::{
	catalog::{Dataset, Status},
	http::{api1::ListString, http::HttpState, service::Service, DisplayConfig},
	query::{self, Attribute, Class, Mode, Session, SlotType, RARITIES},
};

use super::{base::BaseTemplate, card::Card};

pub const LOADING: &str = "正在載入資料…";
pub const PROMPT: &str = "請設定條件後按「搜尋」。";
const LOAD_FAILED: &str =
	"自動載入失敗，請確認 public/ 內是否包含「裝備資料庫.json」「id_dict.json」與「gear_icon/」。";

/// Form buttons. Filtering only happens when a search is explicitly requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
enum Action {
	Search,
	Clear,
}

#[debug_handler(state = HttpState)]
pub async fn lookup(
	State(Service { catalog }): State<Service>,
	State(display): State<DisplayConfig>,
	Query(pairs): Query<Vec<(String, String)>>,
) -> Markup {
	let (mut session, action) = read_session(&pairs);
	let status = catalog.status();

	match (action, &status) {
		(Some(Action::Search), Status::Ready(dataset)) => {
			session.search(dataset.clone());
		}
		(Some(Action::Search), _) => {
			tracing::debug!("search requested before catalog is ready");
		}
		(Some(Action::Clear), _) => session.clear_all(),
		(None, _) => {}
	}

	LookupPage {
		session: &session,
		status: &status,
		display,
	}
	.render()
}

/// Rebuild lookup state from submitted form fields.
///
/// Facet fields may repeat, and each value may itself be a comma separated
/// list. Values that don't belong to a facet's vocabulary are ignored.
fn read_session(pairs: &[(String, String)]) -> (Session, Option<Action>) {
	let mut session = Session::new();
	let mut action = None;

	for (key, value) in pairs {
		match key.as_str() {
			"action" => action = value.parse::<Action>().ok(),
			"mode" => match value.parse::<Mode>() {
				Ok(mode) => session.set_basic_mode(mode),
				Err(_) => tracing::debug!(value, "ignoring unknown mode"),
			},
			"max" => session.set_show_max(matches!(value.as_str(), "true" | "on" | "1")),
			facet => {
				let list = match value.parse::<ListString>() {
					Ok(list) => list,
					Err(error) => {
						tracing::debug!(facet, %error, "ignoring malformed field");
						continue;
					}
				};
				for item in list.iter() {
					if !toggle_facet(&mut session, facet, item) {
						tracing::debug!(facet, item, "ignoring unknown facet value");
					}
				}
			}
		}
	}

	(session, action)
}

fn toggle_facet(session: &mut Session, facet: &str, value: &str) -> bool {
	match facet {
		"rarity" => match value.parse::<u8>() {
			Ok(rarity) if RARITIES.contains(&rarity) => session.toggle_rarity(rarity, true),
			_ => return false,
		},
		"slot" => match value.parse::<SlotType>() {
			Ok(slot_type) => session.toggle_slot_type(slot_type, true),
			Err(_) => return false,
		},
		"basic" => session.toggle_basic_effect(value, true),
		"attribute" => match value.parse::<Attribute>() {
			Ok(attribute) => session.toggle_attribute(attribute, true),
			Err(_) => return false,
		},
		"class" => match value.parse::<Class>() {
			Ok(class) => session.toggle_class(class, true),
			Err(_) => return false,
		},
		_ => return false,
	}

	true
}

fn status_line(status: &Status, session: &Session) -> Option<String> {
	match (status, session.results()) {
		(Status::Pending, _) => Some(LOADING.into()),
		(Status::Failed(_), _) => None,
		(Status::Ready(_), Some(results)) if !results.is_empty() => {
			Some(format!("符合條件的裝備：{} 件", results.len()))
		}
		(Status::Ready(_), _) => Some(PROMPT.into()),
	}
}

struct LookupPage<'a> {
	session: &'a Session,
	status: &'a Status,
	display: DisplayConfig,
}

impl Render for LookupPage<'_> {
	fn render(&self) -> Markup {
		let dataset = match self.status {
			Status::Ready(dataset) => Some(dataset.as_ref()),
			_ => None,
		};

		let factor = self
			.session
			.show_max()
			.then_some(self.display.maxfactor);

		BaseTemplate {
			title: "查詢".into(),
			content: html! {
				@if let Status::Failed(message) = self.status {
					article.error role="alert" {
						(LOAD_FAILED)
						br;
						"錯誤：" (message)
					}
				}

				div.grid {
					aside {
						(SelectionForm { session: self.session, dataset })
					}

					section {
						@if let Some(line) = status_line(self.status, self.session) {
							p.status { (line) }
						}

						@if let Some(results) = self.session.results() {
							@for hit in results.iter() {
								(Card { hit, icons: results.dataset().icons(), factor })
							}
						}
					}
				}
			},
		}
		.render()
	}
}

struct SelectionForm<'a> {
	session: &'a Session,
	dataset: Option<&'a Dataset>,
}

impl Render for SelectionForm<'_> {
	fn render(&self) -> Markup {
		let selection = self.session.selection();
		let basic_effect_keys = self
			.dataset
			.map(Dataset::basic_effect_keys)
			.unwrap_or_default();

		html! {
			form method="get" action="/" {
				fieldset {
					legend { "星數" }
					@for rarity in RARITIES {
						label {
							input type="checkbox" name="rarity" value=(rarity)
								checked[selection.rarities.contains(&rarity)];
							(query::star_label(rarity))
						}
					}
				}

				fieldset {
					legend { "類型" }
					@for slot_type in SlotType::iter() {
						label {
							input type="checkbox" name="slot" value=(slot_type.as_ref())
								checked[selection.slot_types.contains(&slot_type)];
							(slot_type.as_ref())
						}
					}
				}

				fieldset {
					legend { "基礎效果" }
					@for mode in Mode::iter() {
						label {
							input type="radio" name="mode" value=(mode.to_string())
								checked[selection.basic_mode == mode];
							(mode.to_string())
						}
					}
					hr;
					@for key in basic_effect_keys {
						label {
							input type="checkbox" name="basic" value=(ListString::escape(key))
								checked[selection.basic_effects.contains(key)];
							(key)
						}
					}
				}

				fieldset {
					legend { "觸發條件" }
					@for attribute in Attribute::iter() {
						label {
							input type="checkbox" name="attribute" value=(attribute.as_ref())
								checked[selection.attributes.contains(&attribute)];
							(attribute.as_ref())
						}
					}
					@for class in Class::iter() {
						label {
							input type="checkbox" name="class" value=(class.as_ref())
								checked[selection.classes.contains(&class)];
							(class.as_ref())
						}
					}
				}

				div.grid {
					button type="submit" name="action" value="search" disabled[self.dataset.is_none()] {
						"搜尋"
					}
					button.secondary type="submit" name="action" value="clear" {
						"全部清空"
					}
				}

				fieldset {
					legend { "額外設置" }
					label {
						input type="checkbox" name="max" value="true" checked[self.session.show_max()];
						"顯示滿等數值"
					}
				}
			}
		}
	}
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use pretty_assertions::assert_eq;

	use crate::catalog::{Effects, EquipmentRecord, IconIndex};

	use super::*;

	fn pairs(input: &[(&str, &str)]) -> Vec<(String, String)> {
		input
			.iter()
			.map(|(key, value)| (key.to_string(), value.to_string()))
			.collect()
	}

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
				basic_effects: Effects::from_iter([("防禦力", "+5")]),
				..Default::default()
			},
		];
		Arc::new(Dataset::new(records, IconIndex::default()))
	}

	fn render(session: &Session, status: &Status) -> String {
		LookupPage {
			session,
			status,
			display: DisplayConfig::default(),
		}
		.render()
		.into_string()
	}

	#[test]
	fn read_form_fields() {
		let (session, action) = read_session(&pairs(&[
			("rarity", "5"),
			("rarity", "3,7"),
			("slot", "武器"),
			("basic", r"攻擊力,暴擊\,傷害"),
			("mode", "AND"),
			("attribute", "火"),
			("class", "敏捷型"),
			("max", "true"),
			("action", "search"),
		]));

		let selection = session.selection();
		assert_eq!(action, Some(Action::Search));
		assert_eq!(selection.rarities.iter().copied().collect::<Vec<_>>(), vec![3, 5, 7]);
		assert!(selection.slot_types.contains(&SlotType::Weapon));
		assert_eq!(
			selection.basic_effects.iter().cloned().collect::<Vec<_>>(),
			vec!["攻擊力".to_string(), "暴擊,傷害".to_string()]
		);
		assert_eq!(selection.basic_mode, Mode::And);
		assert!(selection.attributes.contains(&Attribute::Fire));
		assert!(selection.classes.contains(&Class::Agility));
		assert!(session.show_max());
	}

	#[test]
	fn unknown_values_ignored() {
		let (session, action) = read_session(&pairs(&[
			("rarity", "9"),
			("slot", "頭盔"),
			("attribute", "a,,b"),
			("mode", "xor"),
			("unknown", "1"),
			("action", "explode"),
		]));

		assert!(session.selection().is_empty());
		assert_eq!(session.selection().basic_mode, Mode::Or);
		assert_eq!(action, None);
	}

	#[test]
	fn status_lines() {
		let mut session = Session::new();
		assert_eq!(status_line(&Status::Pending, &session).as_deref(), Some(LOADING));
		assert_eq!(status_line(&Status::Failed("boom".into()), &session), None);

		let ready = Status::Ready(dataset());
		assert_eq!(status_line(&ready, &session).as_deref(), Some(PROMPT));

		session.toggle_rarity(5, true);
		session.search(dataset());
		assert_eq!(
			status_line(&ready, &session).as_deref(),
			Some("符合條件的裝備：1 件")
		);

		session.toggle_rarity(5, false);
		session.toggle_rarity(8, true);
		session.search(dataset());
		assert_eq!(status_line(&ready, &session).as_deref(), Some(PROMPT));
	}

	#[test]
	fn page_without_search_has_no_results() {
		let (session, _) = read_session(&pairs(&[("rarity", "5")]));
		let html = render(&session, &Status::Ready(dataset()));

		assert!(html.contains(PROMPT));
		assert!(!html.contains("查看詳情"));
		// The selection is still reflected in the form.
		assert!(html.contains(r#"name="rarity" value="5" checked"#));
	}

	#[test]
	fn page_with_results() {
		let (mut session, _) = read_session(&pairs(&[("rarity", "5")]));
		session.search(dataset());
		let html = render(&session, &Status::Ready(dataset()));

		assert!(html.contains("符合條件的裝備：1 件"));
		assert!(html.contains("炎之劍"));
		assert!(!html.contains("冰之盾"));
		assert!(html.contains(r#"name="basic" value="防禦力""#));
	}

	#[test]
	fn page_pending() {
		let html = render(&Session::new(), &Status::Pending);

		assert!(html.contains(LOADING));
		assert!(html.contains(r#"value="search" disabled"#));
	}

	#[test]
	fn page_failed() {
		let html = render(&Session::new(), &Status::Failed("id_dict.json not found".into()));

		assert!(html.contains(LOAD_FAILED));
		assert!(html.contains("錯誤：id_dict.json not found"));
		assert!(!html.contains(LOADING));
		assert!(html.contains(r#"value="search" disabled"#));
	}
}
