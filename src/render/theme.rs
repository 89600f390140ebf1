//! Colour palettes. Plain data, handed to renderers at construction.

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub const fn to_hex(self) -> u32 {
        ((self.0 as u32) << 16) | ((self.1 as u32) << 8) | self.2 as u32
    }
}

/// Colours of the simple PDF layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPalette {
    pub text: Rgb,
    pub muted: Rgb,
    pub rule: Rgb,
    pub section_fill: Rgb,
    pub action_open: Rgb,
    pub action_closed: Rgb,
}

impl Default for PdfPalette {
    fn default() -> Self {
        Self {
            text: Rgb(0, 0, 0),
            muted: Rgb(127, 140, 141),
            rule: Rgb(189, 195, 199),
            section_fill: Rgb(236, 240, 241),
            action_open: Rgb(248, 206, 204),
            action_closed: Rgb(213, 232, 212),
        }
    }
}

/// Colours of the styled PDF layout: cream paper, brown ink, status stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledPdfPalette {
    pub background: Rgb,
    pub border: Rgb,
    pub text_dark: Rgb,
    pub text_brown: Rgb,
    pub open_stamp_fill: Rgb,
    pub open_stamp_border: Rgb,
    pub closed_stamp_fill: Rgb,
    pub closed_stamp_border: Rgb,
    pub block_fill: Rgb,
    pub summary_fill: Rgb,
    pub action_open: Rgb,
    pub action_closed: Rgb,
}

impl Default for StyledPdfPalette {
    fn default() -> Self {
        Self {
            background: Rgb(247, 243, 233),
            border: Rgb(224, 207, 163),
            text_dark: Rgb(45, 36, 24),
            text_brown: Rgb(122, 92, 27),
            open_stamp_fill: Rgb(224, 112, 112),
            open_stamp_border: Rgb(224, 26, 26),
            closed_stamp_fill: Rgb(127, 186, 0),
            closed_stamp_border: Rgb(170, 240, 18),
            block_fill: Rgb(255, 251, 231),
            summary_fill: Rgb(244, 236, 217),
            action_open: Rgb(224, 112, 112),
            action_closed: Rgb(198, 223, 144),
        }
    }
}

/// Colours of the single-record workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct XlsxPalette {
    pub title: Rgb,
    pub header_fill: Rgb,
    pub label_fill: Rgb,
    pub border: Rgb,
    pub band_fill: Rgb,
    pub actions_header_fill: Rgb,
    pub action_open: Rgb,
    pub action_closed: Rgb,
    pub summary_tab: Rgb,
    pub details_tab: Rgb,
    pub actions_tab: Rgb,
}

impl Default for XlsxPalette {
    fn default() -> Self {
        Self {
            title: Rgb::from_hex(0x1F497D),
            header_fill: Rgb::from_hex(0xDCE6F1),
            label_fill: Rgb::from_hex(0xF2F2F2),
            border: Rgb::from_hex(0xBFBFBF),
            band_fill: Rgb::from_hex(0x4BACC6),
            actions_header_fill: Rgb::from_hex(0x404040),
            action_open: Rgb::from_hex(0xF8CECC),
            action_closed: Rgb::from_hex(0xD5E8D4),
            summary_tab: Rgb::from_hex(0x1F497D),
            details_tab: Rgb::from_hex(0x76933C),
            actions_tab: Rgb::from_hex(0xC0504D),
        }
    }
}

/// Colours of the list workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct XlsxListPalette {
    pub header_fill: Rgb,
    pub odd_row_fill: Rgb,
    pub even_row_fill: Rgb,
    pub border: Rgb,
}

impl Default for XlsxListPalette {
    fn default() -> Self {
        Self {
            header_fill: Rgb::from_hex(0xD9D9D9),
            odd_row_fill: Rgb::from_hex(0xFFFFFF),
            even_row_fill: Rgb::from_hex(0xF2F2F2),
            border: Rgb::from_hex(0xBFBFBF),
        }
    }
}

/// Colours of the free-form document PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPalette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub light: Rgb,
    pub muted: Rgb,
    pub white: Rgb,
}

impl Default for DocumentPalette {
    fn default() -> Self {
        Self {
            primary: Rgb(41, 128, 185),
            secondary: Rgb(52, 73, 94),
            light: Rgb(236, 240, 241),
            muted: Rgb(127, 140, 141),
            white: Rgb(255, 255, 255),
        }
    }
}

/// Colours of the free-form document workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct XlsxDocumentPalette {
    pub header_fill: Rgb,
    pub border: Rgb,
}

impl Default for XlsxDocumentPalette {
    fn default() -> Self {
        Self {
            header_fill: Rgb::from_hex(0xCCE5FF),
            border: Rgb::from_hex(0xBFBFBF),
        }
    }
}
