//! Code 128 encoder rendering grayscale PNG images.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use tracing::warn;

use super::{BarcodeEncoder, BarcodeError};

/// Bar/space widths for every Code 128 symbol value, starting with a bar.
const PATTERNS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312",
    "132212", "221213", "221312", "231212", "112232", "122132", "122231", "113222",
    "123122", "123221", "223211", "221132", "221231", "213212", "223112", "312131",
    "311222", "321122", "321221", "312212", "322112", "322211", "212123", "212321",
    "232121", "111323", "131123", "131321", "112313", "132113", "132311", "211313",
    "231113", "231311", "112133", "112331", "132131", "113123", "113321", "133121",
    "313121", "211331", "231131", "213113", "213311", "213131", "311123", "311321",
    "331121", "312113", "312311", "332111", "314111", "221411", "431111", "111224",
    "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111",
    "111242", "121142", "121241", "114212", "124112", "124211", "411212", "421112",
    "421211", "212141", "214121", "412121", "111143", "111341", "131141", "114113",
    "114311", "411113", "411311", "113141", "114131", "311141", "411131", "211412",
    "211214", "211232", "2331112",
];

const START_B: u16 = 104;
const START_C: u16 = 105;
const STOP: u16 = 106;

/// Rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code128Options {
    /// Width of the narrowest bar in pixels.
    pub module_width: u32,
    /// Bar height in pixels.
    pub bar_height: u32,
    /// Blank modules on each side of the symbol.
    pub quiet_zone: u32,
}

impl Default for Code128Options {
    fn default() -> Self {
        Self {
            module_width: 2,
            bar_height: 64,
            quiet_zone: 10,
        }
    }
}

/// Code 128 barcode encoder without human readable text.
#[derive(Debug, Clone, Default)]
pub struct Code128Encoder {
    options: Code128Options,
}

impl Code128Encoder {
    pub fn new(options: Code128Options) -> Self {
        Self { options }
    }

    /// Render `text` as PNG bytes.
    pub fn render(&self, text: &str) -> Result<Vec<u8>, BarcodeError> {
        let modules = modules(&symbols(text)?);
        let module_width = self.options.module_width.max(1);
        let quiet = self.options.quiet_zone as usize;
        let total_modules = modules.len() + 2 * quiet;

        let width = total_modules as u32 * module_width;
        let height = self.options.bar_height.max(1);

        let image = GrayImage::from_fn(width, height, |x, _| {
            let module = (x / module_width) as usize;
            let dark = module >= quiet && module - quiet < modules.len() && modules[module - quiet];
            if dark {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

impl BarcodeEncoder for Code128Encoder {
    fn name(&self) -> &str {
        "code128"
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        match self.render(text) {
            Ok(png) => png,
            Err(e) => {
                warn!(text = text, error = %e, "Failed to render barcode");
                Vec::new()
            }
        }
    }
}

/// Symbol values for `text`: start code, data, checksum, stop code.
///
/// Even-length digit strings use code set C (two digits per symbol),
/// everything else code set B.
fn symbols(text: &str) -> Result<Vec<u16>, BarcodeError> {
    if text.is_empty() {
        return Err(BarcodeError::Empty);
    }

    let bytes = text.as_bytes();
    let (start, data): (u16, Vec<u16>) =
        if bytes.len() % 2 == 0 && bytes.iter().all(u8::is_ascii_digit) {
            let pairs = bytes
                .chunks(2)
                .map(|pair| ((pair[0] - b'0') * 10 + (pair[1] - b'0')) as u16)
                .collect();
            (START_C, pairs)
        } else {
            let values = text
                .chars()
                .map(|c| match c {
                    ' '..='~' => Ok(c as u16 - 32),
                    other => Err(BarcodeError::UnsupportedCharacter(other)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            (START_B, values)
        };

    let checksum = data
        .iter()
        .enumerate()
        .fold(start as u32, |acc, (i, v)| acc + (i as u32 + 1) * *v as u32)
        % 103;

    let mut symbols = Vec::with_capacity(data.len() + 3);
    symbols.push(start);
    symbols.extend(data);
    symbols.push(checksum as u16);
    symbols.push(STOP);
    Ok(symbols)
}

/// Expand symbol values into dark/light modules.
fn modules(symbols: &[u16]) -> Vec<bool> {
    let mut modules = Vec::new();
    for symbol in symbols {
        for (i, width) in PATTERNS[*symbol as usize].bytes().enumerate() {
            let dark = i % 2 == 0;
            modules.extend(std::iter::repeat(dark).take((width - b'0') as usize));
        }
    }
    modules
}
