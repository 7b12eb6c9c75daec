use maud::{html, Markup, Render, DOCTYPE};

pub struct BaseTemplate {
	pub title: String,
	pub content: Markup,
}

impl Render for BaseTemplate {
	fn render(&self) -> Markup {
		html! {
			(DOCTYPE)
			html lang="zh-Hant" {
				head {
					title { "裝備查詢 | " (self.title) }
					meta charset="utf-8";
					meta name="viewport" content="width=device-width, initial-scale=1";
					link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
				}
				body {
					header.container {
						nav {
							ul {
								li { strong { a href="/" { "裝備查詢系統" } } }
								li { (self.title) }
							}
							ul {
								li { a href="/api/1/docs" { "API" } }
							}
						}
					}

					main.container {
						(self.content)
					}
				}
			}
		}
	}
}
