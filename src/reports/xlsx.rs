use super::html::escape;
use crate::domain::model::Project;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const SHEET_NAME: &str = "Proyectos Aprobados";
const COLUMN_WIDTH: u32 = 25;

pub const COLUMNS: [&str; 12] = [
    "Nombre del Proyecto",
    "Aprobado",
    "Nivel TRL",
    "Segmento TRL",
    "Docente Acompañante",
    "Ubicación",
    "Nivel de Inglés",
    "Puntaje TRL 1-3",
    "Puntaje TRL 4-7",
    "Puntaje TRL 8-9",
    "Puntaje Total",
    "Insights",
];

// cellXfs 索引
const BODY_STYLE: u32 = 1;
const HEADER_STYLE: u32 = 2;

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><color rgb="FFFFFFFF"/><name val="Calibri"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FF6D28D9"/><bgColor rgb="FF6D28D9"/></patternFill></fill></fills><borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"/><right style="thin"/><top style="thin"/><bottom style="thin"/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1"/><xf numFmtId="0" fontId="1" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1"><alignment horizontal="center" vertical="center"/></xf></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// A1-style column letters; only single letters are needed for 12 columns.
fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape(SHEET_NAME)
    )
}

fn push_cell(xml: &mut String, reference: &str, style: u32, cell: Cell<'_>) {
    match cell {
        Cell::Text(text) => xml.push_str(&format!(
            r#"<c r="{reference}" s="{style}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            escape(text)
        )),
        Cell::Number(value) => xml.push_str(&format!(
            r#"<c r="{reference}" s="{style}"><v>{value}</v></c>"#
        )),
        Cell::Bool(value) => xml.push_str(&format!(
            r#"<c r="{reference}" s="{style}" t="b"><v>{}</v></c>"#,
            u8::from(value)
        )),
    }
}

fn project_cells<'a>(project: &'a Project, insights: &'a str) -> [Cell<'a>; 12] {
    [
        Cell::Text(&project.name),
        Cell::Text(project.approval.label()),
        Cell::Number(project.trl_level),
        Cell::Text(project.segment.label()),
        Cell::Bool(project.has_mentor),
        Cell::Text(project.location.as_deref().unwrap_or("")),
        Cell::Text(&project.english_level),
        Cell::Number(project.score_initial),
        Cell::Number(project.score_development),
        Cell::Number(project.score_ready),
        Cell::Number(project.total_score),
        Cell::Text(insights),
    ]
}

fn sheet_xml(projects: &[Project]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str(&format!(
        r#"<cols><col min="1" max="{}" width="{}" customWidth="1"/></cols><sheetData>"#,
        COLUMNS.len(),
        COLUMN_WIDTH
    ));

    xml.push_str(r#"<row r="1">"#);
    for (index, header) in COLUMNS.iter().enumerate() {
        let reference = format!("{}1", column_letter(index));
        push_cell(&mut xml, &reference, HEADER_STYLE, Cell::Text(header));
    }
    xml.push_str("</row>");

    for (offset, project) in projects.iter().enumerate() {
        let row = offset + 2;
        let insights = project.insights.join(", ");
        xml.push_str(&format!(r#"<row r="{row}">"#));
        for (index, cell) in project_cells(project, &insights).into_iter().enumerate() {
            let reference = format!("{}{}", column_letter(index), row);
            push_cell(&mut xml, &reference, BODY_STYLE, cell);
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Builds the approved-projects workbook in memory.
pub fn approved_workbook(projects: &[Project]) -> Result<Vec<u8>> {
    tracing::debug!("Building workbook with {} row(s)", projects.len());

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/styles.xml", STYLES.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(projects)),
    ];

    for (name, content) in parts {
        zip.start_file::<_, ()>(name, FileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
