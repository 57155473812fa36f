//! Full-page layout around the sidebar and the main panel.

use chrono::{DateTime, Utc};
use evdash_core::Theme;

use crate::html::{Element, Node, el};

const STYLE: &str = r"
body { margin: 0; display: flex; font-family: system-ui, sans-serif; color: #1d232a; background: #f7f8fa; }
.sidebar { width: 260px; min-height: 100vh; padding: 1rem; background: #e9edf2; }
.vendor-header { display: block; font-weight: 600; color: inherit; text-decoration: none; padding: .4rem 0; cursor: pointer; }
.project-link { display: block; padding: .2rem .6rem; color: inherit; text-decoration: none; border-radius: 4px; }
.project-link.active { background: #2f6fdb; color: #fff; }
.content { flex: 1; padding: 1rem 2rem; }
.tabs { display: flex; gap: .5rem; border-bottom: 1px solid #c5ccd6; margin-bottom: 1rem; }
.tab { padding: .4rem .8rem; text-decoration: none; color: inherit; }
.tab.active { border-bottom: 2px solid #2f6fdb; font-weight: 600; }
.config-table { border-collapse: collapse; width: 100%; margin-bottom: 1.5rem; }
.config-table th, .config-table td { border: 1px solid #c5ccd6; padding: .3rem .5rem; }
.config-table th[aria-sort] { background: #dce6f7; }
.sort-link { color: inherit; text-decoration: none; }
.placeholder { color: #8a939e; text-align: center; }
.error { color: #b3261e; }
html.dark-mode body { color: #e3e7ec; background: #14181d; }
html.dark-mode .sidebar { background: #1d232a; }
html.dark-mode .config-table th, html.dark-mode .config-table td { border-color: #3a434e; }
html.dark-mode .config-table th[aria-sort] { background: #26344a; }
";

/// Everything outside the sidebar and the main panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub title: String,
    pub theme: Theme,
    /// Current table search term, echoed back into the search box.
    pub search_term: String,
    /// Page the table search submits to; the current page when `None`.
    pub search_action: Option<String>,
    /// View state the table search carries along as hidden inputs.
    pub search_fields: Vec<(&'static str, String)>,
    pub generated_at: DateTime<Utc>,
}

impl Layout {
    pub fn new(title: impl Into<String>, theme: Theme) -> Self {
        Self {
            title: title.into(),
            theme,
            search_term: String::new(),
            search_action: None,
            search_fields: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Submit the table search to `action`, keeping `fields` (tab, sort and
    /// so on) in the request.
    #[must_use]
    pub fn with_search_form(
        mut self,
        action: impl Into<String>,
        fields: Vec<(&'static str, String)>,
    ) -> Self {
        self.search_action = Some(action.into());
        self.search_fields = fields;
        self
    }

    /// Serialize a complete HTML document.
    #[must_use]
    pub fn render(&self, sidebar: Element, main: Element) -> String {
        let html = el("html")
            .attr("lang", "en")
            .attr_if(
                self.theme.root_class().is_some(),
                "class",
                self.theme.root_class().unwrap_or_default(),
            )
            .child(
                el("head")
                    .child(el("meta").attr("charset", "utf-8"))
                    .child(el("title").text(self.title.clone()))
                    .child(el("style").child(Node::Raw(STYLE.to_string()))),
            )
            .child(
                el("body")
                    .child(sidebar)
                    .child(
                        el("div")
                            .class("content")
                            .child(self.toolbar())
                            .child(main)
                            .child(
                                el("footer").text(format!(
                                    "Rendered {}",
                                    self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
                                )),
                            ),
                    ),
            );
        format!("<!DOCTYPE html>{}", Node::from(html).render())
    }

    fn toolbar(&self) -> Element {
        el("header")
            .class("toolbar")
            .child(el("a").attr("href", "/").text("Dashboard"))
            .child(el("a").attr("href", "/generate").text("Generate Report"))
            .child(
                el("form")
                    .class("table-search")
                    .attr_if(
                        self.search_action.is_some(),
                        "action",
                        self.search_action.clone().unwrap_or_default(),
                    )
                    .attr("method", "get")
                    .child(
                        el("input")
                            .attr("type", "search")
                            .attr("name", "q")
                            .attr("placeholder", "Search tables...")
                            .attr("value", self.search_term.clone()),
                    )
                    .children(self.search_fields.iter().map(|(name, value)| {
                        el("input")
                            .attr("type", "hidden")
                            .attr("name", *name)
                            .attr("value", value.clone())
                    })),
            )
            .child(
                el("form")
                    .attr("action", "/theme/toggle")
                    .attr("method", "post")
                    .child(
                        el("button")
                            .attr("type", "submit")
                            .class("theme-toggle")
                            .text(match self.theme {
                                Theme::Light => "Dark mode",
                                Theme::Dark => "Light mode",
                            }),
                    ),
            )
    }
}
