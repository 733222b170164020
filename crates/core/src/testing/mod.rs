//! Testing utilities and mock implementations.
//!
//! Mocks stand in for the tracking service and the barcode renderer so the
//! orchestrator can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use form22_core::testing::{fixtures, MockBarcodeEncoder, MockResolver};
//!
//! let resolver = MockResolver::new();
//! resolver.set_response(fixtures::resolved_fields("Москва"), ResolutionStatus::Complete).await;
//!
//! let encoder = MockBarcodeEncoder::with_image(b"PNG".to_vec());
//! ```

mod mock_encoder;
mod mock_resolver;

pub use mock_encoder::MockBarcodeEncoder;
pub use mock_resolver::MockResolver;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::fs;
    use std::io;
    use std::path::Path;

    use crate::form::{paragraph, FormField, FormFieldMap};

    /// Barcode placeholder name used by the stock template.
    pub const BARCODE_ENTRY: &str = "10000000000001F400000064723B2F633C7B66BB.png";

    /// Remote fields as a complete lookup would return them.
    pub fn resolved_fields(sender: &str) -> FormFieldMap {
        let mut fields = FormFieldMap::remote();
        fields.set(FormField::SenderAddress, sender);
        fields.set(FormField::MailTypeAndCategory, "Посылка, Обыкновенная");
        fields.set(FormField::MailRank, "Без разряда");
        fields.set(FormField::Weight, "1 кг 500 г");
        fields.set(FormField::DeclaredValue, "150 руб. 50 коп.");
        fields.set(FormField::StorageDeadline, "15.03.2021");
        fields.set(FormField::PickupOfficeAddress, paragraph("ул. Ленина, 1"));
        fields.set(FormField::CourierCall, "+7 800 100-00-00");
        fields
    }

    /// Text entry containing every token of the notice.
    pub fn content_xml() -> String {
        let mut text = String::from("<office:document-content><office:body>");
        for field in FormField::ALL {
            if field == FormField::PickupOfficeAddress {
                text.push_str(&paragraph(&field.token()));
            } else {
                text.push_str(&format!("<text:span>{}</text:span>", field.token()));
            }
        }
        text.push_str("</office:body></office:document-content>");
        text
    }

    /// Write a minimal notice template under `root`.
    pub fn write_template(root: &Path) -> io::Result<()> {
        let content = content_xml();
        let picture = format!("Pictures/{}", BARCODE_ENTRY);
        let files: [(&str, &[u8]); 5] = [
            ("mimetype", b"application/vnd.oasis.opendocument.graphics"),
            ("META-INF/manifest.xml", b"<manifest:manifest/>"),
            ("styles.xml", b"<office:document-styles/>"),
            ("content.xml", content.as_bytes()),
            (picture.as_str(), b"placeholder"),
        ];
        for (name, bytes) in files {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, bytes)?;
        }
        Ok(())
    }
}
