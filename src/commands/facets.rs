//! Search facet CLI command.

use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use datahub_core::config::AppConfig;
use datahub_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Which search page the facets are for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FacetPage {
    /// Dataset search
    Dataset,
    /// Group page
    Group,
    /// Organization page
    Organization,
}

/// Arguments for the facets command
#[derive(Debug, Args)]
pub struct FacetsArgs {
    /// Search page
    #[arg(value_enum, default_value = "dataset")]
    pub page: FacetPage,

    /// Dataset type being searched
    #[arg(long, default_value = "dataset")]
    pub package_type: String,

    /// Group or organization type, for group and organization pages
    #[arg(long)]
    pub group_type: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct FacetRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Label")]
    label: String,
}

/// Execute the facets command
pub fn execute(args: &FacetsArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    super::with_session(config, |session| {
        let dispatcher = &session.dispatcher;
        let package_type = Some(args.package_type.as_str());

        let facets = match args.page {
            FacetPage::Dataset => dispatcher.dataset_facets(&args.package_type)?,
            FacetPage::Group => dispatcher.group_facets(
                args.group_type.as_deref().unwrap_or("group"),
                package_type,
            )?,
            FacetPage::Organization => dispatcher.organization_facets(
                args.group_type.as_deref().unwrap_or("organization"),
                package_type,
            )?,
        };

        let rows: Vec<FacetRow> = facets
            .into_iter()
            .map(|(key, label)| FacetRow { key, label })
            .collect();
        output::print_list(&rows, format, "No facets.");
        Ok(())
    })
}
