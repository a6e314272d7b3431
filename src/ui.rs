use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, Focus, SaveDialog, StatusKind};
use crate::pane::Pane;
use crate::target::Target;

const PROMPT_PLACEHOLDER: &str = "e.g., 'create a calculator with pyqt5'";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, prompt_area, body_area, footer_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_prompt(app, frame, prompt_area);

    let [code_area, docs_area] = Layout::vertical([
        Constraint::Percentage(55),
        Constraint::Percentage(45),
    ])
    .areas(body_area);

    // Store areas for mouse hit-testing
    app.code_area = Some(code_area);
    app.docs_area = Some(docs_area);

    render_pane(app, frame, code_area, Target::Code);
    render_pane(app, frame, docs_area, Target::Documentation);

    render_footer(app, frame, footer_area);
    render_status(app, frame, status_area);

    if let Some(dialog) = &app.save_dialog {
        render_save_dialog(dialog, frame, area);
    }

    if let Some(input) = &app.key_input {
        render_key_input(input, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" ✨ promptsmith ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("[{}]", app.model()), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn border_color(focused: bool) -> Color {
    if focused { Color::Cyan } else { Color::DarkGray }
}

fn dialog_open(app: &App) -> bool {
    app.save_dialog.is_some() || app.key_input.is_some()
}

fn render_prompt(app: &App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Prompt && !dialog_open(app);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(focused)))
        .title(" Prompt (Enter to generate) ");

    // Horizontal scrolling keeps the cursor inside the box
    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible, cursor_x) = app.prompt.line_window(inner_width);

    let input = if app.prompt.is_empty() {
        Paragraph::new(Span::styled(PROMPT_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(visible).style(Style::default().fg(Color::White))
    };

    frame.render_widget(input.block(block), area);

    if focused {
        frame.set_cursor_position((area.x + cursor_x as u16 + 1, area.y + 1));
    }
}

fn render_pane(app: &App, frame: &mut Frame, area: Rect, target: Target) {
    let focused = Focus::from(target) == app.focus && !dialog_open(app);
    let pane = app.pane(target);
    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut title = format!(" {} ", target.pane_title());
    if app.is_pending(target) {
        title.push_str("· working ");
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(focused)))
        .title(title);

    // Rows are pre-wrapped by the pane so the cursor math matches the screen
    let text = if !pane.is_empty() {
        Text::from(pane.wrapped_lines(inner_width).into_iter().map(Line::from).collect::<Vec<_>>())
    } else if app.is_pending(target) {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        Text::from(Span::styled(
            format!("Generating{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Text::from(Span::styled(target.placeholder(), Style::default().fg(Color::DarkGray)))
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(block)
        .scroll((pane.scroll, 0));

    frame.render_widget(paragraph, area);

    if focused {
        let (row, col) = pane.cursor_row_col(inner_width);
        let scroll = pane.scroll as usize;

        if inner_width > 0 && row >= scroll && row < scroll + inner_height {
            // A full row leaves the cursor one past its last cell
            let x = col.min(inner_width - 1) as u16;
            let y = (row - scroll) as u16;
            frame.set_cursor_position((area.x + 1 + x, area.y + 1 + y));
        }
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if app.key_input.is_some() {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" store key ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" cancel ", label_style),
        ]
    } else if app.save_dialog.is_some() {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" save ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" cancel ", label_style),
        ]
    } else {
        let mut hints = match app.focus {
            Focus::Prompt => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" generate ", label_style),
            ],
            Focus::Code | Focus::Documentation => vec![
                Span::styled(" ↑↓ PgUp/PgDn ", key_style),
                Span::styled(" move ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" prompt ", label_style),
            ],
        };
        hints.extend(vec![
            Span::styled(" Tab ", key_style),
            Span::styled(" focus ", label_style),
            Span::styled(" F2 ", key_style),
            Span::styled(" save code ", label_style),
            Span::styled(" F3 ", key_style),
            Span::styled(" save README ", label_style),
            Span::styled(" ^S ", key_style),
            Span::styled(" save focused ", label_style),
            Span::styled(" ^K ", key_style),
            Span::styled(" API key ", label_style),
            Span::styled(" ^Q ", key_style),
            Span::styled(" quit ", label_style),
        ]);
        hints
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let color = match app.status_kind {
        StatusKind::Info => Color::DarkGray,
        StatusKind::Working => Color::Cyan,
        StatusKind::Success => Color::Green,
        StatusKind::Warning => Color::Yellow,
        StatusKind::Error => Color::Red,
    };

    let status = Paragraph::new(format!("{} ", app.status))
        .style(Style::default().fg(color))
        .alignment(Alignment::Right);

    frame.render_widget(status, area);
}

/// Centered bordered popup; returns its inner area, or `None` when the
/// terminal is too small to hold it.
fn render_popup(frame: &mut Frame, area: Rect, title: &str) -> Option<Rect> {
    let popup_width = 60u16.min(area.width.saturating_sub(4));
    let popup_height: u16 = 7;

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height.min(area.height));

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", title));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    (inner.height >= 5 && inner.width > 0).then_some(inner)
}

fn render_popup_text(frame: &mut Frame, inner: Rect, row: u16, text: &str) {
    let line = Paragraph::new(text.to_string()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(line, Rect::new(inner.x, inner.y + row, inner.width, 1));
}

/// Single-line input on the popup's third row, with the cursor.
fn render_popup_input(frame: &mut Frame, inner: Rect, input: &Pane) {
    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
    let (visible, cursor_x) = input.line_window(input_area.width as usize);

    frame.render_widget(Paragraph::new(visible).style(Style::default().fg(Color::Cyan)), input_area);
    frame.set_cursor_position((input_area.x + cursor_x as u16, input_area.y));
}

fn render_save_dialog(dialog: &SaveDialog, frame: &mut Frame, area: Rect) {
    let Some(inner) = render_popup(frame, area, dialog.spec.title) else {
        return;
    };

    render_popup_text(frame, inner, 0, &format!("Type: {}", dialog.spec.filter));
    render_popup_input(frame, inner, &dialog.path);
    render_popup_text(frame, inner, 4, "Enter to save, Esc to cancel.");
}

/// All but the last four characters are masked.
fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let masked_len = count - 4;
    let last_four: String = key.chars().skip(masked_len).collect();
    format!("{}...{}", "*".repeat(masked_len.min(20)), last_four)
}

fn render_key_input(input: &Pane, frame: &mut Frame, area: Rect) {
    let Some(inner) = render_popup(frame, area, "Enter OpenAI API Key") else {
        return;
    };

    render_popup_text(frame, inner, 0, "Paste your API key below. Press Enter to save, Esc to cancel.");

    let mut masked = Pane::default();
    masked.set_text(mask_key(input.text()));
    masked.move_end();
    render_popup_input(frame, inner, &masked);

    render_popup_text(frame, inner, 4, "Stored in the config file.");
}
