// src/sources/mod.rs

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Where a tab's CSV comes from.
///
/// Spreadsheet tabs are reachable two ways: a computed export URL built from
/// a document id and a sheet name, or a pre-published CSV link used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabSource {
    /// gviz CSV export of one sheet inside a spreadsheet document.
    SheetExport { document_id: String, sheet: String },
    /// An already-complete published CSV URL.
    Published { url: String },
}

impl TabSource {
    /// Compose the retrieval URL. Pure string work, no network access.
    ///
    /// Sheet names are percent-encoded; the production set contains spaces,
    /// parentheses and accented characters.
    pub fn url(&self) -> String {
        match self {
            TabSource::SheetExport { document_id, sheet } => format!(
                "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&sheet={}",
                document_id,
                urlencoding::encode(sheet)
            ),
            TabSource::Published { url } => url.clone(),
        }
    }

    /// Caption shown under the rendered view.
    pub fn description(&self) -> &'static str {
        match self {
            TabSource::SheetExport { .. } => "spreadsheet sheet export (CSV)",
            TabSource::Published { .. } => "published spreadsheet (CSV)",
        }
    }
}

/// One named tab: the key the rest of the pipeline works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub source: TabSource,
    /// Whether the municipality/year selectors apply to this tab.
    #[serde(default = "default_true")]
    pub filterable: bool,
}

fn default_true() -> bool {
    true
}

/// Static mapping from tab name to retrieval URL, fixed at process start.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    tabs: Vec<TabDescriptor>,
}

impl SourceRegistry {
    pub fn new(tabs: Vec<TabDescriptor>) -> Self {
        Self { tabs }
    }

    /// Registered tab names, in registration order.
    pub fn tab_names(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().map(|t| t.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&TabDescriptor> {
        self.tabs.iter().find(|t| t.name == name)
    }

    /// Resolve a tab name to its retrieval URL.
    pub fn resolve(&self, name: &str) -> Result<String, PipelineError> {
        self.get(name)
            .map(|t| t.source.url())
            .ok_or_else(|| PipelineError::UnknownTab(name.to_string()))
    }
}
