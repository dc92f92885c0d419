//! PDF rendering of event proposals and daily agendas.

use chrono::NaiveDate;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::domain::client::Client;
use crate::domain::event::{Event, EventStatus, EventSummary, SnapshotDish, WineLine};
use crate::domain::menu::{CourseStage, Menu};
use crate::notifications::{AgendaEntry, format_date};

const PAGE_W: f32 = 595.0;
const PAGE_H: f32 = 842.0;
const MARGIN: f32 = 50.0;
/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_RATIO: f32 = 0.5;

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

/// Maps text to WinAnsiEncoding; characters outside it become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '€' => 0x80,
            '‚' => 0x82,
            '…' => 0x85,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_RATIO
}

/// Greedy word wrap to at most `max_chars` characters per line.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = line.chars().count() + word.chars().count() + usize::from(!line.is_empty());
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

#[derive(Clone, Copy)]
enum Align {
    Left(f32),
    Center,
}

/// Flowing single-column A4 document.
struct PdfDocument {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    regular_id: Ref,
    bold_id: Ref,
    page_refs: Vec<Ref>,
    next_id: i32,
    content_id: Ref,
    content: Content,
    cursor: f32,
}

impl PdfDocument {
    fn new() -> Self {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let regular_id = Ref::new(3);
        let bold_id = Ref::new(4);

        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let mut doc = Self {
            pdf,
            catalog_id,
            pages_id,
            regular_id,
            bold_id,
            page_refs: Vec::new(),
            next_id: 5,
            content_id: Ref::new(5),
            content: Content::new(),
            cursor: PAGE_H - MARGIN,
        };
        doc.content_id = doc.add_page();
        doc
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// Registers a page object and returns the id of its content stream.
    fn add_page(&mut self) -> Ref {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H))
            .contents(content_id);
        page.resources()
            .fonts()
            .pair(REGULAR, self.regular_id)
            .pair(BOLD, self.bold_id);

        content_id
    }

    fn flush_page(&mut self) {
        let content = std::mem::replace(&mut self.content, Content::new());
        self.pdf.stream(self.content_id, &content.finish());
    }

    fn new_page(&mut self) {
        self.flush_page();
        self.content_id = self.add_page();
        self.cursor = PAGE_H - MARGIN;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < MARGIN {
            self.new_page();
        }
    }

    fn draw(&mut self, text: &str, size: f32, bold: bool, align: Align) {
        let line_height = size * 1.4;
        self.ensure_space(line_height);
        self.cursor -= line_height;

        let x = match align {
            Align::Left(indent) => MARGIN + indent,
            Align::Center => ((PAGE_W - text_width(text, size)) / 2.0).max(MARGIN),
        };
        let y = self.cursor;
        let font = if bold { BOLD } else { REGULAR };
        let bytes = win_ansi(text);

        let content = &mut self.content;
        content.begin_text();
        content.set_font(font, size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn title(&mut self, text: &str, size: f32) {
        self.draw(text, size, true, Align::Center);
    }

    fn centered(&mut self, text: &str, size: f32) {
        self.draw(text, size, false, Align::Center);
    }

    fn heading(&mut self, text: &str) {
        self.gap(6.0);
        self.draw(text, 14.0, true, Align::Left(0.0));
        self.gap(2.0);
    }

    fn line(&mut self, text: &str) {
        self.draw(text, 11.0, false, Align::Left(0.0));
    }

    fn bold_line(&mut self, text: &str, size: f32, indent: f32) {
        self.draw(text, size, true, Align::Left(indent));
    }

    /// Wrapped paragraph within the page margins.
    fn paragraph(&mut self, text: &str, size: f32, indent: f32) {
        let usable = PAGE_W - 2.0 * MARGIN - indent;
        let max_chars = (usable / (size * GLYPH_RATIO)).max(10.0) as usize;
        for line in wrap(text, max_chars) {
            self.draw(&line, size, false, Align::Left(indent));
        }
    }

    fn gap(&mut self, height: f32) {
        self.cursor -= height;
    }

    /// Filled band behind the next line, used to flag cancelled events.
    fn highlight(&mut self, height: f32, rgb: (f32, f32, f32)) {
        self.ensure_space(height + 4.0);
        let y = self.cursor - height - 2.0;
        let content = &mut self.content;
        content.save_state();
        content.set_fill_rgb(rgb.0, rgb.1, rgb.2);
        content.rect(MARGIN - 4.0, y, PAGE_W - 2.0 * MARGIN + 8.0, height + 2.0);
        content.fill_nonzero();
        content.restore_state();
    }

    fn finish(mut self) -> Vec<u8> {
        self.flush_page();
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        {
            let mut pages = self.pdf.pages(self.pages_id);
            pages.count(self.page_refs.len() as i32);
            pages.kids(self.page_refs.iter().copied());
        }
        self.pdf.finish()
    }
}

/// Everything printed on an event proposal.
pub struct ProposalContent<'a> {
    pub venue_name: &'a str,
    pub event: &'a Event,
    pub client: &'a Client,
    pub menu: &'a Menu,
    pub dishes: &'a [SnapshotDish],
    pub wines: &'a [WineLine],
}

pub fn render_proposal(content: &ProposalContent<'_>) -> Vec<u8> {
    let ProposalContent {
        venue_name,
        event,
        client,
        menu,
        dishes,
        wines,
    } = content;
    let mut doc = PdfDocument::new();

    doc.title(venue_name, 20.0);
    doc.title("Proposta de Evento", 16.0);
    doc.gap(20.0);

    doc.heading("Dados do Cliente");
    doc.line(&format!("Nome: {}", client.full_name));
    doc.line(&format!("Telefone: {}", client.phone));
    if let Some(email) = &client.email {
        doc.line(&format!("E-mail: {email}"));
    }
    if let Some(address) = &client.address {
        doc.line(&format!("Endereço: {address}"));
    }
    if let Some(company) = &client.company {
        doc.line(&format!("Empresa: {company}"));
    }

    doc.heading("Dados do Evento");
    doc.line(&format!("Data: {}", format_date(event.event_date)));
    doc.line(&format!("Horário: {}", event.event_time));
    doc.line(&format!("Local: {}", event.venue.label()));
    doc.line(&format!("Tipo de Evento: {}", event.event_type));
    doc.line(&format!("Quantidade de Pessoas: {}", event.headcount));

    doc.heading(&format!("Menu: {}", menu.name));
    for course in CourseStage::ALL.iter().copied() {
        let mut course_dishes = dishes.iter().filter(|d| d.course == course).peekable();
        if course_dishes.peek().is_none() {
            continue;
        }
        doc.gap(4.0);
        doc.bold_line(course.label(), 12.0, 0.0);
        for dish in course_dishes {
            doc.bold_line(&format!("• {}", dish.name), 11.0, 20.0);
            if let Some(description) = &dish.description {
                doc.paragraph(description, 10.0, 30.0);
            }
        }
    }

    if !wines.is_empty() {
        doc.heading("Vinhos");
        for wine in wines.iter() {
            doc.line(&format!(
                "{} x {} ({} por garrafa): {}",
                wine.quantity,
                wine.wine_name,
                wine.bottle_price.format_brl(),
                wine.subtotal().format_brl()
            ));
        }
    }

    let pricing = &event.pricing;
    doc.heading("Valores");
    doc.line(&format!(
        "Valor por pessoa (menu): {}",
        event.price_per_person.format_brl()
    ));
    doc.line(&format!("Subtotal menu: {}", pricing.menu_subtotal.format_brl()));
    if event.drinks_package {
        doc.line(&format!(
            "Pacote de bebidas por pessoa: {}",
            event.drinks_price_per_person.format_brl()
        ));
        doc.line(&format!(
            "Subtotal bebidas: {}",
            pricing.drinks_subtotal.format_brl()
        ));
    }
    if !wines.is_empty() {
        doc.line(&format!("Subtotal vinhos: {}", pricing.wine_subtotal.format_brl()));
    }
    doc.line(&format!(
        "Taxa de serviço (10%): {}",
        pricing.service_charge.format_brl()
    ));
    doc.gap(4.0);
    doc.bold_line(
        &format!("Total do Evento: {}", pricing.total.format_brl()),
        13.0,
        0.0,
    );

    doc.gap(12.0);
    doc.paragraph(
        "Os vinhos e as bebidas não estão incluídos no valor do menu, salvo se contratado o pacote de bebidas.",
        10.0,
        0.0,
    );

    if let Some(notes) = &event.notes {
        doc.gap(8.0);
        doc.bold_line("Observações:", 11.0, 0.0);
        doc.paragraph(notes, 10.0, 0.0);
    }

    doc.gap(24.0);
    doc.centered(venue_name, 9.0);
    doc.centered("Obrigado pela preferência!", 9.0);

    doc.finish()
}

pub fn render_agenda(
    venue_name: &str,
    date: NaiveDate,
    entries: &[AgendaEntry],
    summary: &EventSummary,
) -> Vec<u8> {
    let mut doc = PdfDocument::new();

    doc.title(venue_name, 18.0);
    doc.title(&format!("Agenda do Dia - {}", format_date(date)), 14.0);
    doc.gap(20.0);

    if entries.is_empty() {
        doc.centered("Nenhum evento agendado para este dia.", 12.0);
        return doc.finish();
    }

    for AgendaEntry { event, client } in entries {
        let cancelled = event.status == EventStatus::Cancelled;
        if cancelled {
            doc.highlight(11.0 * 1.4, (1.0, 0.85, 0.85));
        }
        let headline = if cancelled {
            format!("CANCELADO - {} - {}", event.event_time, client.full_name)
        } else {
            format!("{} - {}", event.event_time, client.full_name)
        };
        doc.bold_line(&headline, 11.0, 0.0);
        for detail in [
            format!("Tipo: {}", event.event_type),
            format!("Local: {}", event.venue.label()),
            format!("Status: {}", event.status.label()),
            format!("Pessoas: {}", event.headcount),
            format!("Total: {}", event.pricing.total.format_brl()),
        ] {
            doc.draw(&detail, 10.0, false, Align::Left(12.0));
        }
        doc.gap(8.0);
    }

    doc.heading("Resumo do Dia");
    doc.line(&format!("Eventos em análise: {}", summary.under_review));
    doc.line(&format!("Eventos confirmados: {}", summary.confirmed));
    doc.line(&format!("Eventos cancelados: {}", summary.cancelled));
    doc.gap(4.0);
    doc.bold_line(
        &format!("Total (não cancelados): {}", summary.revenue.format_brl()),
        12.0,
        0.0,
    );

    doc.finish()
}
