//! Vendor accordion with project links.
//!
//! Each vendor header toggles only its own section. Selecting a project
//! highlights it exclusively across every vendor. The name filter hides
//! non-matching links and empty sections, and forces matching sections open
//! while a term is present.
//!
//! Headers are links: each one points at the page with that section's
//! expanded state flipped, so the accordion works without scripts.

use evdash_core::{Project, Selection, VendorGroup, group_by_vendor};
use serde::Serialize;

use crate::error::RenderError;
use crate::html::{Element, el};
use crate::search::normalize_term;

pub const LOAD_FAILED: &str = "Failed to load projects";
pub const NO_MATCHES: &str = "No matching projects";

/// Where the links of a rendered sidebar point.
///
/// Any `Fn(&Project) -> String` is a `SidebarLinks` whose headers have no
/// target.
pub trait SidebarLinks {
    fn project(&self, project: &Project) -> String;

    /// Target of a vendor header: the page with exactly the sections at
    /// `expanded` open.
    fn sections(&self, expanded: &[usize]) -> Option<String> {
        let _ = expanded;
        None
    }

    /// Extra state the filter form submits along with the term.
    fn filter_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

impl<F> SidebarLinks for F
where
    F: Fn(&Project) -> String,
{
    fn project(&self, project: &Project) -> String {
        self(project)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLink {
    pub project: Project,
    pub active: bool,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorSection {
    pub vendor: String,
    pub expanded: bool,
    pub hidden: bool,
    pub links: Vec<ProjectLink>,
}

impl VendorSection {
    fn has_visible_links(&self) -> bool {
        self.links.iter().any(|l| !l.hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Sidebar {
    Loaded {
        sections: Vec<VendorSection>,
        filter: String,
    },
    Failed,
}

impl Sidebar {
    /// One collapsed section per vendor, in first-seen order.
    #[must_use]
    pub fn new(projects: &[Project]) -> Self {
        Self::from_groups(group_by_vendor(projects))
    }

    #[must_use]
    pub fn from_groups(groups: Vec<VendorGroup>) -> Self {
        let sections = groups
            .into_iter()
            .map(|group| VendorSection {
                vendor: group.vendor,
                expanded: false,
                hidden: false,
                links: group
                    .projects
                    .into_iter()
                    .map(|project| ProjectLink {
                        project,
                        active: false,
                        hidden: false,
                    })
                    .collect(),
            })
            .collect();
        Self::Loaded {
            sections,
            filter: String::new(),
        }
    }

    /// The sidebar shown when the project list cannot be fetched.
    #[must_use]
    pub const fn failed() -> Self {
        Self::Failed
    }

    #[must_use]
    pub fn sections(&self) -> &[VendorSection] {
        match self {
            Self::Loaded { sections, .. } => sections,
            Self::Failed => &[],
        }
    }

    fn sections_mut(&mut self) -> &mut [VendorSection] {
        match self {
            Self::Loaded { sections, .. } => sections,
            Self::Failed => &mut [],
        }
    }

    /// Toggle one vendor section. Other sections are left as they are.
    /// Returns the new expanded state.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownVendor`] if no section has that vendor.
    pub fn toggle(&mut self, vendor: &str) -> Result<bool, RenderError> {
        let section = self
            .sections_mut()
            .iter_mut()
            .find(|s| s.vendor == vendor)
            .ok_or_else(|| RenderError::UnknownVendor(vendor.to_string()))?;
        section.expanded = !section.expanded;
        Ok(section.expanded)
    }

    /// Mark `selection` active and every other project inactive. The owning
    /// section is opened.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownProject`] if the project is not listed;
    /// highlighting is unchanged in that case.
    pub fn select(&mut self, selection: &Selection) -> Result<(), RenderError> {
        let listed = self.sections().iter().any(|s| {
            s.links
                .iter()
                .any(|l| l.project.vendor == selection.vendor && l.project.name == selection.name)
        });
        if !listed {
            return Err(RenderError::UnknownProject(selection.to_string()));
        }
        for section in self.sections_mut() {
            let mut owns = false;
            for link in &mut section.links {
                link.active = link.project.vendor == selection.vendor
                    && link.project.name == selection.name;
                owns |= link.active;
            }
            if owns {
                section.expanded = true;
            }
        }
        Ok(())
    }

    /// The highlighted project, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Project> {
        self.sections()
            .iter()
            .flat_map(|s| s.links.iter())
            .find(|l| l.active)
            .map(|l| &l.project)
    }

    /// Indices of the expanded sections.
    #[must_use]
    pub fn expanded_sections(&self) -> Vec<usize> {
        self.sections()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.expanded)
            .map(|(index, _)| index)
            .collect()
    }

    /// Expand exactly the sections at `indices`; out-of-range indices are
    /// ignored. Hidden sections stay hidden.
    pub fn set_expanded_sections(&mut self, indices: &[usize]) {
        for (index, section) in self.sections_mut().iter_mut().enumerate() {
            section.expanded = indices.contains(&index);
        }
    }

    /// Filter project links by name. Returns the number of visible links.
    pub fn apply_filter(&mut self, term: &str) -> usize {
        let normalized = normalize_term(term);
        if let Self::Loaded { filter, .. } = self {
            *filter = term.trim().to_string();
        }
        for section in self.sections_mut() {
            for link in &mut section.links {
                link.hidden = !normalized.is_empty()
                    && !link.project.name.to_lowercase().contains(&normalized);
            }
            if normalized.is_empty() {
                section.hidden = false;
                section.expanded = false;
            } else {
                section.hidden = !section.has_visible_links();
                section.expanded = !section.hidden;
            }
        }
        self.visible_count()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.sections()
            .iter()
            .flat_map(|s| s.links.iter())
            .filter(|l| !l.hidden)
            .count()
    }

    /// Render the sidebar. `href` gives each project's link target.
    pub fn to_element(&self, href: impl Fn(&Project) -> String) -> Element {
        self.to_element_with(&href)
    }

    /// Render the sidebar with every link target taken from `links`.
    pub fn to_element_with<L: SidebarLinks>(&self, links: &L) -> Element {
        let root = el("aside").class("sidebar").id("project-list");
        let (sections, filter) = match self {
            Self::Failed => {
                return root.child(el("p").class("sidebar-error").text(LOAD_FAILED));
            }
            Self::Loaded { sections, filter } => (sections, filter),
        };

        let root = root.child(
            el("form")
                .class("sidebar-search")
                .attr("method", "get")
                .child(
                    el("input")
                        .attr("type", "search")
                        .attr("name", "projects")
                        .attr("placeholder", "Search projects...")
                        .attr("value", filter.clone()),
                )
                .children(links.filter_fields().into_iter().map(|(name, value)| {
                    el("input")
                        .attr("type", "hidden")
                        .attr("name", name)
                        .attr("value", value)
                })),
        );
        let expanded = self.expanded_sections();

        if !filter.is_empty() && self.visible_count() == 0 {
            return root.child(el("p").class("no-matches").text(NO_MATCHES));
        }

        root.children(sections.iter().enumerate().map(|(index, section)| {
            let list_id = format!("vendor-{index}-projects");
            let flipped: Vec<usize> = if section.expanded {
                expanded.iter().copied().filter(|&i| i != index).collect()
            } else {
                let mut open = expanded.clone();
                open.push(index);
                open.sort_unstable();
                open
            };
            let toggle = links.sections(&flipped);
            el("section")
                .class("vendor-section")
                .flag(section.hidden, "hidden")
                .child(
                    el("a")
                        .class("vendor-header")
                        .attr("role", "button")
                        .attr_if(toggle.is_some(), "href", toggle.unwrap_or_default())
                        .attr("aria-expanded", section.expanded.to_string())
                        .attr("aria-controls", list_id.clone())
                        .text(section.vendor.clone()),
                )
                .child(
                    el("ul")
                        .class("project-links")
                        .id(list_id)
                        .flag(!section.expanded, "hidden")
                        .children(section.links.iter().map(|link| {
                            el("li").flag(link.hidden, "hidden").child(
                                el("a")
                                    .class(if link.active {
                                        "project-link active"
                                    } else {
                                        "project-link"
                                    })
                                    .attr("href", links.project(&link.project))
                                    .text(link.project.name.clone()),
                            )
                        })),
                )
        }))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::html::Node;

    fn sidebar() -> Sidebar {
        Sidebar::new(&[
            Project::new("Acme", "X1"),
            Project::new("Kioxia", "CM7"),
            Project::new("Acme", "X2"),
        ])
    }

    fn expanded(sidebar: &Sidebar) -> Vec<bool> {
        sidebar.sections().iter().map(|s| s.expanded).collect()
    }

    #[test]
    fn sections_start_collapsed_and_toggle_independently() {
        let mut sidebar = sidebar();
        assert_eq!(expanded(&sidebar), vec![false, false]);
        assert_eq!(sidebar.toggle("Acme"), Ok(true));
        assert_eq!(sidebar.toggle("Kioxia"), Ok(true));
        assert_eq!(expanded(&sidebar), vec![true, true]);
        assert_eq!(sidebar.toggle("Acme"), Ok(false));
        assert_eq!(expanded(&sidebar), vec![false, true]);
        assert!(sidebar.toggle("Nobody").is_err());
    }

    #[test]
    fn selection_is_exclusive_across_vendors() {
        let mut sidebar = sidebar();
        sidebar.select(&Selection::new("Acme", "X1").unwrap()).unwrap();
        sidebar.select(&Selection::new("Kioxia", "CM7").unwrap()).unwrap();
        let active: Vec<&str> = sidebar
            .sections()
            .iter()
            .flat_map(|s| s.links.iter())
            .filter(|l| l.active)
            .map(|l| l.project.name.as_str())
            .collect();
        assert_eq!(active, vec!["CM7"]);
    }

    #[test]
    fn unknown_selection_keeps_highlight() {
        let mut sidebar = sidebar();
        sidebar.select(&Selection::new("Acme", "X2").unwrap()).unwrap();
        assert!(sidebar.select(&Selection::new("Acme", "Z9").unwrap()).is_err());
        assert_eq!(sidebar.active(), Some(&Project::new("Acme", "X2")));
    }

    #[test]
    fn filter_hides_empty_sections_and_opens_matches() {
        let mut sidebar = sidebar();
        assert_eq!(sidebar.apply_filter("cm"), 1);
        let sections = sidebar.sections();
        assert!(sections[0].hidden);
        assert!(!sections[1].hidden);
        assert!(sections[1].expanded);
    }

    #[test]
    fn clearing_the_filter_restores_and_collapses() {
        let mut sidebar = sidebar();
        sidebar.toggle("Acme").unwrap();
        sidebar.apply_filter("x");
        assert_eq!(sidebar.apply_filter("  "), 3);
        assert_eq!(expanded(&sidebar), vec![false, false]);
        assert!(sidebar.sections().iter().all(|s| !s.hidden));
    }

    #[test]
    fn no_matches_message() {
        let mut sidebar = sidebar();
        assert_eq!(sidebar.apply_filter("zzz"), 0);
        let html = Node::from(sidebar.to_element(|p| p.name.clone())).render();
        assert!(html.contains(NO_MATCHES));
    }

    #[test]
    fn failed_sidebar_shows_message() {
        let html = Node::from(Sidebar::failed().to_element(|p| p.name.clone())).render();
        assert!(html.contains(LOAD_FAILED));
        assert!(Sidebar::failed().sections().is_empty());
    }

    #[test]
    fn header_exposes_aria_expanded() {
        let mut sidebar = sidebar();
        sidebar.toggle("Kioxia").unwrap();
        let html = Node::from(sidebar.to_element(|p| p.name.clone())).render();
        assert!(html.contains("aria-expanded=\"false\" aria-controls=\"vendor-0-projects\">Acme"));
        assert!(html.contains("aria-expanded=\"true\" aria-controls=\"vendor-1-projects\">Kioxia"));
    }

    struct Accordion;

    impl SidebarLinks for Accordion {
        fn project(&self, project: &Project) -> String {
            format!("/p/{}", project.name)
        }

        fn sections(&self, expanded: &[usize]) -> Option<String> {
            let open: Vec<String> = expanded.iter().map(ToString::to_string).collect();
            Some(format!("/?open={}", open.join(",")))
        }

        fn filter_fields(&self) -> Vec<(&'static str, String)> {
            vec![("tab", "summary-tab".to_string())]
        }
    }

    #[test]
    fn headers_link_to_the_flipped_state() {
        let mut sidebar = sidebar();
        sidebar.toggle("Kioxia").unwrap();
        let html = Node::from(sidebar.to_element_with(&Accordion)).render();
        assert!(html.contains("role=\"button\" href=\"/?open=0,1\" aria-expanded=\"false\""));
        assert!(html.contains("role=\"button\" href=\"/?open=\" aria-expanded=\"true\""));
        assert!(html.contains("<input type=\"hidden\" name=\"tab\" value=\"summary-tab\">"));
        assert!(html.contains("href=\"/p/CM7\""));
    }

    #[test]
    fn expanded_sections_round_trip() {
        let mut sidebar = sidebar();
        sidebar.set_expanded_sections(&[1, 7]);
        assert_eq!(expanded(&sidebar), vec![false, true]);
        assert_eq!(sidebar.expanded_sections(), vec![1]);
    }
}
