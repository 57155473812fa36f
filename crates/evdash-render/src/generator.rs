//! Report generator form.

use serde::Serialize;

use crate::html::{Element, el};

pub const GENERATE_ENDPOINT: &str = "/api/generate_report";
pub const DOWNLOAD_LABEL: &str = "Download Report";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScriptList {
    Ready { scripts: Vec<String> },
    Failed { message: String },
}

/// What the last submission produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerateOutcome {
    Download { href: String, file_name: String },
    /// Raw error text from the backend.
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorPanel {
    pub scripts: ScriptList,
    pub result: Option<GenerateOutcome>,
}

impl GeneratorPanel {
    #[must_use]
    pub const fn new(scripts: ScriptList) -> Self {
        Self {
            scripts,
            result: None,
        }
    }

    #[must_use]
    pub fn with_result(mut self, result: GenerateOutcome) -> Self {
        self.result = Some(result);
        self
    }

    pub fn to_element(&self) -> Element {
        let select = match &self.scripts {
            ScriptList::Ready { scripts } => el("select")
                .attr("name", "script")
                .id("script")
                .flag(true, "required")
                .children(
                    scripts
                        .iter()
                        .map(|s| el("option").attr("value", s.clone()).text(s.clone())),
                ),
            ScriptList::Failed { message } => el("p").class("error").text(message.clone()),
        };

        let form = el("form")
            .class("generator-form")
            .attr("action", GENERATE_ENDPOINT)
            .attr("method", "post")
            .attr("enctype", "multipart/form-data")
            .child(el("label").attr("for", "script").text("Script"))
            .child(select)
            .child(number_input("eye_height", "Eye Height"))
            .child(number_input("eye_width", "Eye Width"))
            .child(el("label").attr("for", "files").text("Files"))
            .child(
                el("input")
                    .attr("type", "file")
                    .attr("name", "files")
                    .id("files")
                    .flag(true, "multiple"),
            )
            .child(el("button").attr("type", "submit").text("Generate"));

        let mut panel = el("section")
            .class("generator")
            .id("generator-panel")
            .child(el("h2").text("Generate Report"))
            .child(form);

        if let Some(result) = &self.result {
            let node = match result {
                GenerateOutcome::Download { href, file_name } => el("a")
                    .class("download-link")
                    .attr("href", href.clone())
                    .attr("download", file_name.clone())
                    .text(DOWNLOAD_LABEL),
                GenerateOutcome::Error { message } => {
                    el("p").class("error").text(format!("Error: {message}"))
                }
            };
            panel = panel.child(el("div").id("generator-result").child(node));
        }
        panel
    }
}

fn number_input(name: &'static str, label: &'static str) -> Element {
    el("label").attr("for", name).text(label).child(
        el("input")
            .attr("type", "number")
            .attr("step", "any")
            .attr("name", name)
            .id(name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::Node;

    fn render(panel: &GeneratorPanel) -> String {
        Node::from(panel.to_element()).render()
    }

    #[test]
    fn form_posts_multipart_to_generate_endpoint() {
        let panel = GeneratorPanel::new(ScriptList::Ready {
            scripts: vec!["eye_scan.py".into(), "margin.py".into()],
        });
        let html = render(&panel);
        assert!(html.contains(
            "action=\"/api/generate_report\" method=\"post\" enctype=\"multipart/form-data\""
        ));
        assert!(html.contains("<option value=\"margin.py\">margin.py</option>"));
        assert!(html.contains("name=\"files\" id=\"files\" multiple>"));
    }

    #[test]
    fn error_text_is_surfaced_escaped() {
        let panel = GeneratorPanel::new(ScriptList::Ready { scripts: vec![] }).with_result(
            GenerateOutcome::Error {
                message: "Missing <script>".into(),
            },
        );
        assert!(render(&panel).contains("Error: Missing &lt;script&gt;"));
    }

    #[test]
    fn success_offers_download() {
        let panel = GeneratorPanel::new(ScriptList::Ready { scripts: vec![] }).with_result(
            GenerateOutcome::Download {
                href: "/reports/generated_report_eye.html".into(),
                file_name: "generated_report_eye.html".into(),
            },
        );
        let html = render(&panel);
        assert!(html.contains("download=\"generated_report_eye.html\">Download Report</a>"));
    }
}
