//! Projects, selections, and vendor grouping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::report_file::validate_segment;

/// A validation project as listed by `/api/projects`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub vendor: String,
}

impl Project {
    #[must_use]
    pub fn new(vendor: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vendor: vendor.into(),
        }
    }

    /// The immutable selection that identifies this project.
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection {
            vendor: self.vendor.clone(),
            name: self.name.clone(),
        }
    }
}

/// The `(vendor, project)` pair that drives navigation and rendering.
///
/// Passed explicitly through every navigation and render call; there is no
/// process-wide "current project".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub vendor: String,
    pub name: String,
}

impl Selection {
    /// Build a selection, rejecting segments that are unsafe inside a path.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSegment`] if either part is empty, `.`/`..`,
    /// or contains a path separator.
    pub fn new(vendor: impl Into<String>, name: impl Into<String>) -> Result<Self, CoreError> {
        let vendor = vendor.into();
        let name = name.into();
        validate_segment(&vendor)?;
        validate_segment(&name)?;
        Ok(Self { vendor, name })
    }

    /// `"{vendor}/{name}"`, the relative location under the reports root.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.vendor, self.name)
    }

    /// Default target for result links that carry a flag instead of a URL.
    #[must_use]
    pub fn report_page(&self) -> String {
        format!("reports/{}/report.html", self.path())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vendor, self.name)
    }
}

/// Projects of one vendor, in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorGroup {
    pub vendor: String,
    pub projects: Vec<Project>,
}

/// Group projects by vendor, preserving first-seen vendor order.
#[must_use]
pub fn group_by_vendor(projects: &[Project]) -> Vec<VendorGroup> {
    let mut groups: Vec<VendorGroup> = Vec::new();
    for project in projects {
        match groups.iter_mut().find(|g| g.vendor == project.vendor) {
            Some(group) => group.projects.push(project.clone()),
            None => groups.push(VendorGroup {
                vendor: project.vendor.clone(),
                projects: vec![project.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn groups_keep_first_seen_vendor_order() {
        let projects = vec![
            Project::new("Kioxia", "CM7"),
            Project::new("Acme", "X1"),
            Project::new("Kioxia", "CD8"),
            Project::new("Acme", "X2"),
        ];
        let groups = group_by_vendor(&projects);
        let vendors: Vec<&str> = groups.iter().map(|g| g.vendor.as_str()).collect();
        assert_eq!(vendors, vec!["Kioxia", "Acme"]);
        let kioxia: Vec<&str> = groups[0].projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(kioxia, vec!["CM7", "CD8"]);
    }

    #[test]
    fn empty_list_has_no_groups() {
        assert!(group_by_vendor(&[]).is_empty());
    }

    #[test]
    fn selection_path_joins_vendor_and_name() {
        let selection = Selection::new("Acme", "X1").unwrap();
        assert_eq!(selection.path(), "Acme/X1");
        assert_eq!(selection.report_page(), "reports/Acme/X1/report.html");
        assert_eq!(selection.to_string(), "Acme/X1");
    }

    #[test]
    fn selection_rejects_traversal() {
        assert!(Selection::new("..", "X1").is_err());
        assert!(Selection::new("Acme", "a/b").is_err());
        assert!(Selection::new("", "X1").is_err());
    }

    #[test]
    fn project_deserializes_from_api_shape() {
        let project: Project = serde_json::from_str(r#"{"name":"X1","vendor":"Acme"}"#).unwrap();
        assert_eq!(project.selection(), Selection::new("Acme", "X1").unwrap());
    }
}
