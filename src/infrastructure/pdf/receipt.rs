use encoding_rs::WINDOWS_1252;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::warn;

use super::PaystubRenderer;
use crate::domain::country_profile::CountryProfile;
use crate::domain::error::{AppError, Result};
use crate::domain::paystub::PaystubRecord;

// A4 in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_LEFT: i64 = 50;
const LINE_HEIGHT: i64 = 22;

/// Single-page paystub receipt drawn with the standard Helvetica fonts
#[derive(Debug, Default, Clone)]
pub struct ReceiptRenderer;

impl ReceiptRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Label/value lines in print order
    fn lines(record: &PaystubRecord, profile: CountryProfile) -> Vec<String> {
        let l = profile.labels();
        vec![
            format!("{}: {}", l.name, record.full_name()),
            format!("{}: {}", l.position, record.position()),
            format!("{}: {}", l.period, record.period()),
            format!("{}: {}", l.gross_salary, record.gross_salary()),
            format!("{}: {}", l.gross_payment, record.gross_payment()),
            format!("{}: {}", l.net_payment, record.net_payment()),
            format!("{}: {}", l.health, record.health_discount_amount()),
            format!("{}: {}", l.social, record.social_discount_amount()),
            format!("{}: {}", l.taxes, record.taxes_discount_amount()),
            format!("{}: {}", l.others, record.other_discount_amount()),
            format!("{}: {}", l.total_discounts, record.total_discounts()),
        ]
    }

    fn page_content(record: &PaystubRecord, profile: CountryProfile, company: &str) -> Content {
        let mut operations = Vec::new();
        let mut y = PAGE_HEIGHT - 60;

        text_line(&mut operations, "F2", 16, y, company);
        y -= 28;
        text_line(&mut operations, "F2", 14, y, profile.bundle().receipt_title);
        y -= 40;

        for line in Self::lines(record, profile) {
            text_line(&mut operations, "F1", 12, y, &line);
            y -= LINE_HEIGHT;
        }

        Content { operations }
    }
}

/// Standard fonts only cover WinAnsi, so text is re-encoded and characters
/// outside it print as `?`
fn win_ansi(text: &str) -> Vec<u8> {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(text);
    if !unmappable {
        return bytes.into_owned();
    }

    warn!(text = %text, "Receipt text has characters outside WinAnsi");
    let mut buf = [0u8; 4];
    text.chars()
        .flat_map(|c| {
            let (bytes, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
            if unmappable {
                vec![b'?']
            } else {
                bytes.into_owned()
            }
        })
        .collect()
}

fn text_line(operations: &mut Vec<Operation>, font: &str, size: i64, y: i64, text: &str) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
    ));
    operations.push(Operation::new(
        "Td",
        vec![Object::Integer(MARGIN_LEFT), Object::Integer(y)],
    ));
    operations.push(Operation::new(
        "Tj",
        vec![Object::string_literal(win_ansi(text))],
    ));
    operations.push(Operation::new("ET", vec![]));
}

impl PaystubRenderer for ReceiptRenderer {
    fn render(
        &self,
        record: &PaystubRecord,
        profile: CountryProfile,
        company: &str,
    ) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let content = Self::page_content(record, profile, company)
            .encode()
            .map_err(|e| AppError::RenderError(format!("Failed to encode page: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| AppError::RenderError(format!("Failed to write PDF: {}", e)))?;

        Ok(buffer)
    }
}
