use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::assembler::TemplateConfig;
use crate::form::{FormDate, FormField, FormFieldMap};
use crate::orchestrator::OrchestratorConfig;
use crate::resolver::ResolverConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub recipient: RecipientConfig,
}

/// Flags and inputs for a single run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// Skip every remote lookup.
    #[serde(default)]
    pub offline: bool,
    /// Produce a single notice with every field left blank.
    #[serde(default)]
    pub empty: bool,
    /// Only log warnings and errors.
    #[serde(default)]
    pub quiet: bool,
    /// Tracking codes to generate notices for.
    #[serde(default)]
    pub tracking_codes: Vec<String>,
    /// Directory receiving the generated `.odg` files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            offline: false,
            empty: false,
            quiet: false,
            tracking_codes: Vec::new(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Recipient data shared by every notice of a run
///
/// Missing values are printed as empty strings. Dates use `yyyy-mm-dd`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecipientConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub id_type: Option<String>,
    #[serde(default)]
    pub id_series: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub id_issued_by: Option<String>,
    #[serde(default)]
    pub registered_at: Option<String>,
    /// Issue date of the identity document; left blank when unset.
    #[serde(default)]
    pub id_issue_date: Option<String>,
    /// Notice generation date; defaults to today.
    #[serde(default)]
    pub generation_date: Option<String>,
    /// Pickup date; defaults to today.
    #[serde(default)]
    pub pickup_date: Option<String>,
}

impl RecipientConfig {
    /// Build the session-wide field map every job starts from.
    pub fn to_field_map(&self, today: NaiveDate) -> FormFieldMap {
        let mut map = FormFieldMap::template();

        let text_fields = [
            (FormField::RecipientName, &self.name),
            (FormField::RecipientAddress, &self.address),
            (FormField::IdType, &self.id_type),
            (FormField::IdSeries, &self.id_series),
            (FormField::IdNumber, &self.id_number),
            (FormField::IdIssuedBy, &self.id_issued_by),
            (FormField::RegistrationAddress, &self.registered_at),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                map.set(field, value.as_str());
            }
        }

        if let Some(issued) = self.id_issue_date.as_deref() {
            if !issued.trim().is_empty() {
                FormDate::IdIssue.apply_or(Some(issued), today, &mut map);
            }
        }
        FormDate::Generation.apply_or(self.generation_date.as_deref(), today, &mut map);
        FormDate::Pickup.apply_or(self.pickup_date.as_deref(), today, &mut map);

        map
    }
}
