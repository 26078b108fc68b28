// src/config/mod.rs

use crate::session::Credential;
use crate::sources::{SourceRegistry, TabDescriptor, TabSource};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default lifetime of a cached table, one hour.
pub const DEFAULT_TTL_SECS: u64 = 3600;

// Spreadsheet documents backing the built-in registry.
const BASE_DOCUMENT: &str = "1k_aWceBCN_V0VaRJa1Jw42t6hfrER4T4bE2fS88mLDI";
const SUBREGISTRO_DOCUMENT: &str = "1UD1B9_5_zwd_QD0drE1fo3AokpE6EDnYTCwywrGkD-Y";
const PUBLISHED_CSV: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRtKiqlosLL5_CJgGom7BlWpFYExhLTQEjQT_Pdgnv3uEYMlWPpsSeaxfjqy0IxTluVlKSpcZ1IoXQY/pub?output=csv";

/// Process configuration: the source registry, the credential allow-list and
/// the cache TTL. Loadable from YAML; the built-in default mirrors the
/// production spreadsheet set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    pub tabs: Vec<TabDescriptor>,
    /// Empty list means the credential gate is open.
    #[serde(default)]
    pub users: Vec<Credential>,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn export_tab(name: &str, document_id: &str, sheet: &str, filterable: bool) -> TabDescriptor {
    TabDescriptor {
        name: name.to_string(),
        source: TabSource::SheetExport {
            document_id: document_id.to_string(),
            sheet: sheet.to_string(),
        },
        filterable,
    }
}

impl Config {
    /// The production registry: ten tabs over two spreadsheet documents and
    /// one published CSV, no credential gate, one-hour TTL.
    pub fn builtin() -> Self {
        let tabs = vec![
            export_tab("CAIXA DE ENTRADA", BASE_DOCUMENT, "Respostas ao formulário 2", true),
            export_tab(
                "QUANTITATIVO (2024 E 2025)",
                BASE_DOCUMENT,
                "QUANTITATIVO (2024 E 2025)",
                false,
            ),
            export_tab("FILTRADOS", BASE_DOCUMENT, "(NÃO ALTERE OS FILTROS OU DADOS)", true),
            export_tab("RECEBIMENTO POR MUNICÍPIO", BASE_DOCUMENT, "Página11", true),
            export_tab("STATUS DE RECEBIMENTO", BASE_DOCUMENT, "STATUS DE RECEBIMENTO", true),
            export_tab("GRAPH SITE", BASE_DOCUMENT, "GRAPH SITE", false),
            export_tab("DADOS ORGANIZADOS", BASE_DOCUMENT, "DADOS ORGANIZADOS", true),
            export_tab("SUB-REGISTRO", SUBREGISTRO_DOCUMENT, "subregistro", true),
            TabDescriptor {
                name: "DADOS COMPLETOS".into(),
                source: TabSource::Published {
                    url: PUBLISHED_CSV.into(),
                },
                filterable: true,
            },
            export_tab("ANÁLISE DE STATUS", BASE_DOCUMENT, "Respostas ao formulário 2", false),
        ];
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            tabs,
            users: Vec::new(),
        }
    }

    /// Read and validate a YAML configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn registry(&self) -> SourceRegistry {
        SourceRegistry::new(self.tabs.clone())
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for tab in &self.tabs {
            if !seen.insert(tab.name.as_str()) {
                bail!("duplicate tab name {:?}", tab.name);
            }
            Url::parse(&tab.source.url())
                .with_context(|| format!("tab {:?} resolves to an invalid URL", tab.name))?;
        }
        Ok(())
    }
}
