//! Mock barcode encoder for testing.

use std::sync::Mutex;

use crate::barcode::BarcodeEncoder;

/// Barcode encoder returning fixed bytes and recording its inputs.
#[derive(Debug, Default)]
pub struct MockBarcodeEncoder {
    image: Vec<u8>,
    encoded: Mutex<Vec<String>>,
}

impl MockBarcodeEncoder {
    /// Encoder that fails every time (returns no bytes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoder returning `image` for every input.
    pub fn with_image(image: Vec<u8>) -> Self {
        Self {
            image,
            encoded: Mutex::new(Vec::new()),
        }
    }

    /// Texts passed to encode so far.
    pub fn encoded(&self) -> Vec<String> {
        self.encoded
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }
}

impl BarcodeEncoder for MockBarcodeEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        if let Ok(mut encoded) = self.encoded.lock() {
            encoded.push(text.to_string());
        }
        self.image.clone()
    }
}
