//! Template tree to `.odg` archive.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::form::{paragraph, FormField, FormFieldMap};
use crate::metrics::{ARCHIVES_TOTAL, ARCHIVE_DURATION};

use super::config::TemplateConfig;
use super::error::AssemblerError;

/// ODF requires this entry to be stored uncompressed.
const MIMETYPE_ENTRY: &str = "mimetype";

/// What an assembly did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Number of entries written.
    pub entries: usize,
    /// Whether the text entry had its tokens replaced.
    pub text_substituted: bool,
    /// Whether the barcode image was replaced.
    pub barcode_substituted: bool,
}

/// A regular file of the template tree.
#[derive(Debug, Clone)]
struct TemplateEntry {
    /// `/`-separated path relative to the template root.
    name: String,
    path: PathBuf,
}

impl TemplateEntry {
    fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Writes filled notice archives from an unpacked template.
#[derive(Debug, Clone)]
pub struct TemplateAssembler {
    config: TemplateConfig,
}

impl TemplateAssembler {
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Write the archive for `fields` to `output`.
    ///
    /// `barcode` replaces the placeholder image unless absent or empty. A
    /// partially written output is removed on failure.
    pub fn assemble(
        &self,
        fields: &FormFieldMap,
        barcode: Option<&[u8]>,
        output: &Path,
    ) -> Result<AssemblyReport, AssemblerError> {
        let started = Instant::now();
        let result = self.write_archive(fields, barcode.filter(|b| !b.is_empty()), output);

        let label = match &result {
            Ok(report) => {
                info!(
                    output = %output.display(),
                    entries = report.entries,
                    barcode = report.barcode_substituted,
                    "Notice written"
                );
                "written"
            }
            Err(e) => {
                warn!(output = %output.display(), error = %e, "Failed to write notice");
                if output.is_file() {
                    if let Err(e) = fs::remove_file(output) {
                        debug!(output = %output.display(), error = %e, "Could not remove partial output");
                    }
                }
                "failed"
            }
        };

        ARCHIVES_TOTAL.with_label_values(&[label]).inc();
        ARCHIVE_DURATION
            .with_label_values(&[label])
            .observe(started.elapsed().as_secs_f64());

        result
    }

    fn write_archive(
        &self,
        fields: &FormFieldMap,
        barcode: Option<&[u8]>,
        output: &Path,
    ) -> Result<AssemblyReport, AssemblerError> {
        let entries = collect_entries(&self.config.dir)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AssemblerError::io(parent, e))?;
        }

        let file = File::create(output).map_err(|e| AssemblerError::io(output, e))?;
        let mut archive = ZipWriter::new(BufWriter::new(file));
        let mut report = AssemblyReport::default();

        for entry in &entries {
            let bytes = if entry.file_name() == self.config.content_entry {
                let raw = fs::read(&entry.path).map_err(|e| AssemblerError::io(&entry.path, e))?;
                let source = String::from_utf8(raw).map_err(|_| AssemblerError::NotUtf8 {
                    path: entry.path.clone(),
                })?;
                report.text_substituted = true;
                fill_template(&source, fields.clone()).into_bytes()
            } else if let Some(image) =
                barcode.filter(|_| entry.file_name() == self.config.barcode_entry)
            {
                report.barcode_substituted = true;
                image.to_vec()
            } else {
                fs::read(&entry.path).map_err(|e| AssemblerError::io(&entry.path, e))?
            };

            let method = if entry.name == MIMETYPE_ENTRY {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let options = SimpleFileOptions::default().compression_method(method);

            archive.start_file(entry.name.as_str(), options)?;
            archive
                .write_all(&bytes)
                .map_err(|e| AssemblerError::io(output, e))?;
            report.entries += 1;
        }

        let mut writer = archive.finish()?;
        writer.flush().map_err(|e| AssemblerError::io(output, e))?;

        Ok(report)
    }
}

/// Replace every `${key}` token of `source` with its value from `fields`.
///
/// The pickup office address is already a run of paragraphs, so its
/// paragraph-wrapped token is replaced as a whole first and the field is
/// dropped from the map.
pub fn fill_template(source: &str, mut fields: FormFieldMap) -> String {
    let address = fields
        .take(FormField::PickupOfficeAddress)
        .unwrap_or_default();
    let mut text = source.replace(
        &paragraph(&FormField::PickupOfficeAddress.token()),
        &address,
    );

    for (field, value) in fields.iter() {
        text = text.replace(&field.token(), value);
    }
    text
}

/// Regular files under `root`, sorted by relative path.
fn collect_entries(root: &Path) -> Result<Vec<TemplateEntry>, AssemblerError> {
    if !root.is_dir() {
        return Err(AssemblerError::TemplateNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| AssemblerError::Walk {
            path: root.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        entries.push(TemplateEntry {
            name,
            path: entry.path().to_path_buf(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(root = %root.display(), entries = entries.len(), "Template scanned");
    Ok(entries)
}
