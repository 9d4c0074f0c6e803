//! In-memory XLSX workbooks for integration tests and benchmarks.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A cell as written into a test worksheet.
#[derive(Debug, Clone)]
pub enum Cell {
    Blank,
    /// Stored in the shared strings table
    Text(String),
    /// Stored inline (`t="inlineStr"`)
    Inline(String),
    Number(f64),
    /// Formula with a cached numeric result
    Formula(String, f64),
}

pub fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

pub fn num(n: f64) -> Cell {
    Cell::Number(n)
}

/// The usual trial-balance header row.
pub fn header_row() -> Vec<Cell> {
    [
        "Cont",
        "Denumire cont",
        "Sold initial debitor",
        "Sold initial creditor",
        "Rulaj debitor",
        "Rulaj creditor",
        "Sold final debitor",
        "Sold final creditor",
    ]
    .iter()
    .map(|h| text(h))
    .collect()
}

/// An account row with numeric amounts.
pub fn account_row(code: &str, name: &str, amounts: [f64; 6]) -> Vec<Cell> {
    let mut row = vec![text(code), text(name)];
    row.extend(amounts.iter().map(|a| num(*a)));
    row
}

/// An account row with amounts written as text.
pub fn text_row(code: &str, name: &str, amounts: [&str; 6]) -> Vec<Cell> {
    let mut row = vec![text(code), text(name)];
    row.extend(amounts.iter().map(|a| text(a)));
    row
}

/// Builds a minimal but complete XLSX package.
#[derive(Debug, Default)]
pub struct WorkbookBuilder {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
    dimension: Option<String>,
    origin: (usize, usize),
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }

    /// Write every sheet starting at this 0-based (row, col) offset.
    pub fn offset(mut self, row: usize, col: usize) -> Self {
        self.origin = (row, col);
        self
    }

    /// Declare `<dimension ref="..."/>` on every sheet.
    pub fn dimension(mut self, reference: &str) -> Self {
        self.dimension = Some(reference.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut shared = SharedTable::default();
        let sheet_xml: Vec<String> = self
            .sheets
            .iter()
            .map(|(_, rows)| self.worksheet_xml(rows, &mut shared))
            .collect();

        let mut buffer = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut overrides = String::new();
        for i in 1..=self.sheets.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i
            ));
        }
        write_part(
            &mut zip,
            options,
            "[Content_Types].xml",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
  {}
</Types>"#,
                overrides
            ),
        );

        write_part(
            &mut zip,
            options,
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
        );

        let mut sheets = String::new();
        let mut rels = String::new();
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            let n = i + 1;
            sheets.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(name),
                n,
                n
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                n, n
            ));
        }
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            self.sheets.len() + 1
        ));

        write_part(
            &mut zip,
            options,
            "xl/workbook.xml",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>{}</sheets>
</workbook>"#,
                sheets
            ),
        );
        write_part(
            &mut zip,
            options,
            "xl/_rels/workbook.xml.rels",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                rels
            ),
        );
        write_part(&mut zip, options, "xl/sharedStrings.xml", &shared.to_xml());

        for (i, xml) in sheet_xml.iter().enumerate() {
            write_part(&mut zip, options, &format!("xl/worksheets/sheet{}.xml", i + 1), xml);
        }

        zip.finish().unwrap();
        buffer
    }

    fn worksheet_xml(&self, rows: &[Vec<Cell>], shared: &mut SharedTable) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        if let Some(ref reference) = self.dimension {
            xml.push_str(&format!(r#"<dimension ref="{}"/>"#, reference));
        }
        xml.push_str("<sheetData>");

        for (r, row) in rows.iter().enumerate() {
            let row_number = r + self.origin.0 + 1;
            xml.push_str(&format!(r#"<row r="{}">"#, row_number));
            for (c, cell) in row.iter().enumerate() {
                let reference = format!("{}{}", column_letters(c + self.origin.1), row_number);
                match cell {
                    Cell::Blank => {}
                    Cell::Text(s) => xml.push_str(&format!(
                        r#"<c r="{}" t="s"><v>{}</v></c>"#,
                        reference,
                        shared.index(s)
                    )),
                    Cell::Inline(s) => xml.push_str(&format!(
                        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        reference,
                        escape(s)
                    )),
                    Cell::Number(n) => {
                        xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n))
                    }
                    Cell::Formula(f, cached) => xml.push_str(&format!(
                        r#"<c r="{}"><f>{}</f><v>{}</v></c>"#,
                        reference,
                        escape(f),
                        cached
                    )),
                }
            }
            xml.push_str("</row>");
        }

        xml.push_str("</sheetData></worksheet>");
        xml
    }
}

/// Shorthand for a single-sheet trial balance.
pub fn workbook(rows: Vec<Vec<Cell>>) -> Vec<u8> {
    WorkbookBuilder::new().sheet("Balanta", rows).build()
}

#[derive(Default)]
struct SharedTable {
    strings: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl SharedTable {
    fn index(&mut self, s: &str) -> usize {
        if let Some(&i) = self.lookup.get(s) {
            return i;
        }
        let i = self.strings.len();
        self.strings.push(s.to_string());
        self.lookup.insert(s.to_string(), i);
        i
    }

    fn to_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
            self.strings.len()
        );
        for s in &self.strings {
            xml.push_str(&format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)));
        }
        xml.push_str("</sst>");
        xml
    }
}

fn write_part(zip: &mut ZipWriter<Cursor<&mut Vec<u8>>>, options: SimpleFileOptions, name: &str, content: &str) {
    zip.start_file(name, options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
}

fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Escape text for XML content and attributes.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
