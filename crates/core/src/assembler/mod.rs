//! Notice archive assembly.
//!
//! A notice is an OpenDocument drawing: a ZIP archive whose entries are the
//! files of an unpacked template tree. The assembler copies that tree into a
//! new archive, filling the `${key}` tokens of the text entry and swapping the
//! placeholder barcode image. Every other entry is copied byte for byte.

mod archive;
mod config;
mod error;

pub use archive::{fill_template, AssemblyReport, TemplateAssembler};
pub use config::TemplateConfig;
pub use error::AssemblerError;
