//! Paragraph, table, and run model over the main document part
//!
//! The part is kept as the flat list of XML events it was read from. On
//! top of that list the parser records which events make up each run's
//! content, and groups runs into paragraphs, paragraphs into table cells,
//! and cells into rows and tables. Writing the part back re-emits every
//! original event except the content of runs whose text was replaced.
//! Elements are matched under the prefix the root element binds to the
//! WordprocessingML namespace, `w` if it declares none.
//!
//! ## Run text
//!
//! A run's text is the concatenation of its `w:t` children, with `w:tab`
//! read as `\t` and `w:br`/`w:cr` read as `\n` (page and column breaks
//! contribute nothing). Replacing the text keeps the run's `w:rPr`, so
//! the formatting is unchanged, and regenerates everything after it.
//! Written text maps `\t` to `w:tab` and each line ending (`\n`, `\r\n`
//! or `\r`) to one `w:br`.

use crate::error::{TemplateError, TemplateResult};
use crate::xml::{is_xml_char, XmlParser};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::ops::Range;

/// Index of a run within a [`DocumentBody`]
pub type RunId = usize;

/// A paragraph (`w:p`): the runs it directly or indirectly contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    runs: Vec<RunId>,
}

impl Paragraph {
    /// Runs in document order
    pub fn runs(&self) -> &[RunId] {
        &self.runs
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }
}

/// A table (`w:tbl`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<TableRow>,
}

impl Table {
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// All cells of the table, row by row
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }
}

/// A table row (`w:tr`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<TableCell>,
}

impl TableRow {
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }
}

/// A table cell (`w:tc`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    paragraphs: Vec<Paragraph>,
    tables: Vec<Table>,
}

impl TableCell {
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Tables nested inside this cell
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

#[derive(Debug, Clone)]
struct RunData {
    /// Namespace prefix of the `w:r` element, reused for generated children
    prefix: Option<String>,
    /// Events replaced when the text is rewritten (everything after `w:rPr`)
    content: Range<usize>,
    text: String,
    rewritten: Option<String>,
    /// Runs wrapping nested paragraphs (text boxes) are never rewritten
    locked: bool,
}

impl RunData {
    fn current_text(&self) -> &str {
        self.rewritten.as_deref().unwrap_or(&self.text)
    }
}

/// The main document part, parsed
#[derive(Debug, Clone)]
pub struct DocumentBody {
    events: Vec<Event<'static>>,
    runs: Vec<RunData>,
    paragraphs: Vec<Paragraph>,
    tables: Vec<Table>,
}

impl DocumentBody {
    /// Parse the XML of a main document part
    pub fn parse(content: &str) -> TemplateResult<Self> {
        BodyBuilder::default().build(content)
    }

    /// Top-level paragraphs (everything not inside a table cell)
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Top-level tables
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Every paragraph the filler visits: top-level paragraphs first, then
    /// the paragraphs of each table cell, row by row, nested tables after
    /// the paragraphs of the cell that holds them.
    pub fn reachable_paragraphs(&self) -> Vec<&Paragraph> {
        let mut out: Vec<&Paragraph> = self.paragraphs.iter().collect();
        for table in &self.tables {
            collect_table_paragraphs(table, &mut out);
        }
        out
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Current text of a run
    pub fn run_text(&self, run: RunId) -> &str {
        self.runs.get(run).map(RunData::current_text).unwrap_or_default()
    }

    /// Concatenated text of a paragraph's runs
    pub fn paragraph_text(&self, paragraph: &Paragraph) -> String {
        paragraph.runs.iter().map(|&run| self.run_text(run)).collect()
    }

    /// Whether the run can be rewritten
    pub fn is_locked(&self, run: RunId) -> bool {
        self.runs.get(run).map_or(true, |r| r.locked)
    }

    /// Overwrite a run's text. Returns `false` (and changes nothing) for
    /// locked or unknown runs.
    pub fn set_run_text(&mut self, run: RunId, text: impl Into<String>) -> bool {
        match self.runs.get_mut(run) {
            Some(data) if !data.locked => {
                let text = text.into();
                data.rewritten = if text == data.text { None } else { Some(text) };
                true
            }
            _ => false,
        }
    }

    /// Number of runs whose text differs from the template
    pub fn rewritten_run_count(&self) -> usize {
        self.runs.iter().filter(|r| r.rewritten.is_some()).count()
    }

    /// Serialize the part back to XML
    pub fn to_xml(&self) -> TemplateResult<Vec<u8>> {
        let mut rewrites: Vec<&RunData> =
            self.runs.iter().filter(|r| r.rewritten.is_some()).collect();
        rewrites.sort_by_key(|r| r.content.start);
        let mut rewrites = rewrites.into_iter().peekable();

        let mut writer = Writer::new(Vec::new());
        let mut index = 0;
        while index < self.events.len() {
            if let Some(run) = rewrites.next_if(|r| r.content.start == index) {
                write_run_content(&mut writer, run.prefix.as_deref(), run.current_text())?;
                index = run.content.end;
                continue;
            }
            writer
                .write_event(self.events[index].borrow())
                .map_err(|e| TemplateError::XmlParse(e.to_string()))?;
            index += 1;
        }

        Ok(writer.into_inner())
    }
}

fn collect_table_paragraphs<'a>(table: &'a Table, out: &mut Vec<&'a Paragraph>) {
    for cell in table.cells() {
        out.extend(cell.paragraphs.iter());
        for nested in &cell.tables {
            collect_table_paragraphs(nested, out);
        }
    }
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

/// Write replacement run content: `w:t` pieces separated by `w:tab`/`w:br`
fn write_run_content(
    writer: &mut Writer<Vec<u8>>,
    prefix: Option<&str>,
    text: &str,
) -> TemplateResult<()> {
    let t_name = qualified(prefix, "t");
    let tab_name = qualified(prefix, "tab");
    let br_name = qualified(prefix, "br");

    let mut pending = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            continue;
        }
        match c {
            '\t' | '\n' | '\r' => {
                flush_text(writer, &t_name, &mut pending)?;
                let name = if c == '\t' { &tab_name } else { &br_name };
                write(writer, Event::Empty(BytesStart::new(name.as_str())))?;
            }
            c if is_xml_char(c) => pending.push(c),
            _ => {}
        }
    }
    flush_text(writer, &t_name, &mut pending)
}

fn flush_text(writer: &mut Writer<Vec<u8>>, t_name: &str, pending: &mut String) -> TemplateResult<()> {
    if pending.is_empty() {
        return Ok(());
    }
    let mut start = BytesStart::new(t_name);
    start.push_attribute(("xml:space", "preserve"));
    write(writer, Event::Start(start))?;
    write(writer, Event::Text(BytesText::new(pending)))?;
    write(writer, Event::End(BytesEnd::new(t_name)))?;
    pending.clear();
    Ok(())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> TemplateResult<()> {
    writer
        .write_event(event)
        .map_err(|e| TemplateError::XmlParse(e.to_string()))
}

// =============================================================================
// Parsing
// =============================================================================

#[derive(Debug)]
struct RunBuilder {
    prefix: Option<String>,
    content_start: usize,
    text: String,
    props_depth: usize,
    in_text: bool,
    locked: bool,
}

#[derive(Debug)]
enum Frame {
    Table(Table),
    Row(TableRow),
    Cell(TableCell),
    Paragraph(Paragraph),
    Run(RunBuilder),
    /// A structural element in a position where it carries no meaning
    /// (e.g. `w:tc` outside a row); kept so start and end tags stay paired
    Ignored,
}

/// WordprocessingML main namespace
const WML_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Prefix assumed when the root element does not declare the namespace
const DEFAULT_WML_PREFIX: &str = "w";

#[derive(Debug, Default)]
struct BodyBuilder {
    events: Vec<Event<'static>>,
    runs: Vec<RunData>,
    paragraphs: Vec<Paragraph>,
    tables: Vec<Table>,
    stack: Vec<Frame>,
    /// Prefix bound to [`WML_NAMESPACE`] on the root element
    wml_prefix: Option<String>,
    root_seen: bool,
}

const STRUCTURAL: [&str; 5] = ["tbl", "tr", "tc", "p", "r"];

impl BodyBuilder {
    fn wml(&self) -> &str {
        self.wml_prefix.as_deref().unwrap_or(DEFAULT_WML_PREFIX)
    }

    fn is_wml(&self, name: &[u8], local: &str) -> bool {
        XmlParser::is_qualified(name, self.wml(), local)
    }

    fn structural_name(&self, name: &[u8]) -> Option<&'static str> {
        STRUCTURAL.iter().copied().find(|local| self.is_wml(name, local))
    }

    fn bind_namespace(&mut self, root: &BytesStart<'_>) {
        self.root_seen = true;
        self.wml_prefix = XmlParser::declared_prefix(root, WML_NAMESPACE);
        if let Some(prefix) = self.wml_prefix.as_deref().filter(|p| *p != DEFAULT_WML_PREFIX) {
            tracing::debug!(prefix, "Document binds WordprocessingML to a non-default prefix");
        }
    }
}

impl BodyBuilder {
    fn build(mut self, content: &str) -> TemplateResult<DocumentBody> {
        let mut reader = XmlParser::from_string(content);

        loop {
            let event = reader.read_event().map_err(TemplateError::from)?;
            let index = self.events.len();
            match &event {
                Event::Eof => break,
                Event::Start(e) | Event::Empty(e) if !self.root_seen => {
                    self.bind_namespace(e);
                    if matches!(event, Event::Start(_)) {
                        self.open(e, index);
                    } else {
                        self.empty(e, index);
                    }
                }
                Event::Start(e) => self.open(e, index),
                Event::Empty(e) => self.empty(e, index),
                Event::End(e) => self.close(e, index)?,
                Event::Text(e) => {
                    if let Some(run) = self.text_run() {
                        let text = e
                            .unescape()
                            .map_err(|e| TemplateError::XmlParse(e.to_string()))?;
                        run.text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if let Some(run) = self.text_run() {
                        run.text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                _ => {}
            }
            self.events.push(event.into_owned());
        }

        if !self.stack.is_empty() {
            return Err(TemplateError::InvalidStructure(format!(
                "{} unclosed paragraph/table elements at end of document",
                self.stack.len()
            )));
        }

        if self.paragraphs.is_empty() && self.tables.is_empty() {
            tracing::warn!(
                prefix = self.wml(),
                "No paragraphs found in document part; nothing will be filled"
            );
        }

        Ok(DocumentBody {
            events: self.events,
            runs: self.runs,
            paragraphs: self.paragraphs,
            tables: self.tables,
        })
    }

    /// The run currently collecting `w:t` text, if any
    fn text_run(&mut self) -> Option<&mut RunBuilder> {
        match self.stack.last_mut() {
            Some(Frame::Run(run)) if run.in_text && run.props_depth == 0 => Some(run),
            _ => None,
        }
    }

    fn top_run(&mut self) -> Option<&mut RunBuilder> {
        match self.stack.last_mut() {
            Some(Frame::Run(run)) => Some(run),
            _ => None,
        }
    }

    /// Which run-level element `name` is, if any
    fn run_child(&self, name: &[u8]) -> Option<&'static str> {
        ["rPr", "t", "tab", "cr", "br"]
            .into_iter()
            .find(|local| self.is_wml(name, local))
    }

    /// Whether the innermost paragraph-or-run frame is a paragraph
    fn in_paragraph(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Paragraph(_) => Some(true),
                Frame::Run(_) => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    fn open(&mut self, e: &BytesStart<'_>, index: usize) {
        let name = e.name();
        let name = name.as_ref();

        if let Some(local) = self.structural_name(name) {
            let frame = match local {
                "tbl" => Frame::Table(Table::default()),
                "tr" if matches!(self.stack.last(), Some(Frame::Table(_))) => {
                    Frame::Row(TableRow::default())
                }
                "tc" if matches!(self.stack.last(), Some(Frame::Row(_))) => {
                    Frame::Cell(TableCell::default())
                }
                "p" => {
                    for frame in self.stack.iter_mut() {
                        if let Frame::Run(run) = frame {
                            run.locked = true;
                        }
                    }
                    Frame::Paragraph(Paragraph::default())
                }
                "r" if self.in_paragraph() => Frame::Run(RunBuilder {
                    prefix: XmlParser::prefix(name).map(str::to_string),
                    content_start: index + 1,
                    text: String::new(),
                    props_depth: 0,
                    in_text: false,
                    locked: false,
                }),
                _ => Frame::Ignored,
            };
            self.stack.push(frame);
            return;
        }

        let child = self.run_child(name);
        if let Some(run) = self.top_run() {
            match child {
                Some("rPr") => run.props_depth += 1,
                Some("t") if run.props_depth == 0 => run.in_text = true,
                _ => {}
            }
        }
    }

    fn empty(&mut self, e: &BytesStart<'_>, index: usize) {
        let name = e.name();
        let name = name.as_ref();

        if self.is_wml(name, "p") {
            let paragraph = Paragraph::default();
            self.attach_paragraph(paragraph);
            return;
        }

        let child = self.run_child(name);
        let break_type = match child {
            Some("br") => {
                let prefix = Some(self.wml()).filter(|p| !p.is_empty());
                let qualified_type = qualified(prefix, "type");
                XmlParser::get_attribute(e, qualified_type.as_bytes())
                    .or_else(|| XmlParser::get_attribute(e, b"type"))
            }
            _ => None,
        };
        let Some(run) = self.top_run() else {
            return;
        };
        if run.props_depth > 0 {
            return;
        }
        match child {
            Some("rPr") => run.content_start = index + 1,
            Some("tab") => run.text.push('\t'),
            Some("cr") => run.text.push('\n'),
            Some("br") if matches!(break_type.as_deref(), None | Some("textWrapping")) => {
                run.text.push('\n');
            }
            _ => {}
        }
    }

    fn close(&mut self, e: &BytesEnd<'_>, index: usize) -> TemplateResult<()> {
        let name = e.name();
        let name = name.as_ref();

        if self.structural_name(name).is_some() {
            let frame = self.stack.pop().ok_or_else(|| {
                TemplateError::InvalidStructure(format!(
                    "unexpected closing tag </{}>",
                    String::from_utf8_lossy(name)
                ))
            })?;
            match frame {
                Frame::Run(run) => self.finish_run(run, index),
                Frame::Paragraph(paragraph) => self.attach_paragraph(paragraph),
                Frame::Table(table) => match self.nearest_cell() {
                    Some(cell) => cell.tables.push(table),
                    None => self.tables.push(table),
                },
                Frame::Row(row) => {
                    if let Some(Frame::Table(table)) = self.stack.last_mut() {
                        table.rows.push(row);
                    }
                }
                Frame::Cell(cell) => {
                    if let Some(Frame::Row(row)) = self.stack.last_mut() {
                        row.cells.push(cell);
                    }
                }
                Frame::Ignored => {}
            }
            return Ok(());
        }

        let child = self.run_child(name);
        if let Some(run) = self.top_run() {
            match child {
                Some("rPr") if run.props_depth > 0 => {
                    run.props_depth -= 1;
                    if run.props_depth == 0 {
                        run.content_start = index + 1;
                    }
                }
                Some("t") => run.in_text = false,
                _ => {}
            }
        }
        Ok(())
    }

    fn finish_run(&mut self, run: RunBuilder, end: usize) {
        let id = self.runs.len();
        self.runs.push(RunData {
            prefix: run.prefix,
            content: run.content_start.min(end)..end,
            text: run.text,
            rewritten: None,
            locked: run.locked,
        });
        let paragraph = self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Paragraph(p) => Some(p),
            _ => None,
        });
        if let Some(paragraph) = paragraph {
            paragraph.runs.push(id);
        }
    }

    fn nearest_cell(&mut self) -> Option<&mut TableCell> {
        self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Cell(cell) => Some(cell),
            _ => None,
        })
    }

    fn attach_paragraph(&mut self, paragraph: Paragraph) {
        match self.nearest_cell() {
            Some(cell) => cell.paragraphs.push(paragraph),
            None => self.paragraphs.push(paragraph),
        }
    }
}
