use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, Focus};
use crate::pane::Pane;
use crate::target::Target;
use crate::tui::AppEvent;

/// Pane size assumed before the first render.
const DEFAULT_PAGE: u16 = 10;
const DEFAULT_WIDTH: u16 = 80;
const WHEEL_LINES: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys that work in any mode
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        app.should_quit = true;
        return;
    }

    if app.key_input.is_some() {
        handle_key_input(app, key);
        return;
    }

    if app.save_dialog.is_some() {
        handle_save_dialog(app, key);
        return;
    }

    match key.code {
        KeyCode::F(2) => app.request_save(Target::Code),
        KeyCode::F(3) => app.request_save(Target::Documentation),
        KeyCode::Char('s') if ctrl => {
            let target = app.focus.target().unwrap_or(Target::Code);
            app.request_save(target);
        }
        KeyCode::Char('k') if ctrl => app.open_key_input(),
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::Esc => app.focus = Focus::Prompt,
        _ => match app.focus.target() {
            None => handle_prompt_key(app, key),
            Some(target) => handle_pane_key(app, target, key),
        },
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Enter {
        app.submit();
    } else {
        edit_line(&mut app.prompt, key);
    }
}

fn handle_save_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_save(),
        KeyCode::Enter => app.confirm_save(),
        _ => {
            if let Some(dialog) = app.save_dialog.as_mut() {
                edit_line(&mut dialog.path, key);
            }
        }
    }
}

fn handle_key_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_key_input(),
        KeyCode::Enter => app.confirm_key_input(),
        _ => {
            if let Some(input) = app.key_input.as_mut() {
                edit_line(input, key);
            }
        }
    }
}

/// Pasted text goes wherever typed text would. Single-line inputs get their
/// line breaks flattened, so a multi-line paste never submits the prompt.
fn handle_paste(app: &mut App, text: &str) {
    if let Some(input) = app.key_input.as_mut() {
        input.insert_str(&single_line(text.trim()));
        return;
    }

    if let Some(dialog) = app.save_dialog.as_mut() {
        dialog.path.insert_str(&single_line(text));
        return;
    }

    match app.focus.target() {
        None => app.prompt.insert_str(&single_line(text)),
        Some(target) => {
            let (height, width) = view_size(app, target);
            let pane = app.pane_mut(target);
            pane.insert_str(text);
            pane.ensure_cursor_visible(height, width);
        }
    }
}

fn single_line(text: &str) -> String {
    text.trim_end_matches(['\r', '\n'])
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}

/// Single-line editing shared by the prompt, the save path and the key popup.
fn edit_line(line: &mut Pane, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => line.insert_char(c),
        KeyCode::Backspace => line.backspace(),
        KeyCode::Delete => line.delete(),
        KeyCode::Left => line.move_left(),
        KeyCode::Right => line.move_right(),
        KeyCode::Home => line.move_home(),
        KeyCode::End => line.move_end(),
        _ => {}
    }
}

fn handle_pane_key(app: &mut App, target: Target, key: KeyEvent) {
    let (height, width) = view_size(app, target);
    let pane = app.pane_mut(target);

    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => pane.insert_char(c),
        KeyCode::Enter => pane.insert_newline(),
        KeyCode::Backspace => pane.backspace(),
        KeyCode::Delete => pane.delete(),
        KeyCode::Left => pane.move_left(),
        KeyCode::Right => pane.move_right(),
        KeyCode::Up => pane.move_up(),
        KeyCode::Down => pane.move_down(),
        KeyCode::Home => pane.move_home(),
        KeyCode::End => pane.move_end(),
        KeyCode::PageDown => {
            for _ in 0..height {
                pane.move_down();
            }
        }
        KeyCode::PageUp => {
            for _ in 0..height {
                pane.move_up();
            }
        }
        _ => return,
    }

    pane.ensure_cursor_visible(height, width);
}

/// Inner (height, width) of a pane's last rendered area.
fn view_size(app: &App, target: Target) -> (u16, usize) {
    let area = match target {
        Target::Code => app.code_area,
        Target::Documentation => app.docs_area,
    };
    let inner = |outer: u16, fallback: u16| match outer.saturating_sub(2) {
        0 => fallback,
        n => n,
    };
    match area {
        Some(r) => (inner(r.height, DEFAULT_PAGE), inner(r.width, DEFAULT_WIDTH) as usize),
        None => (DEFAULT_PAGE, DEFAULT_WIDTH as usize),
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn target_at(app: &App, x: u16, y: u16) -> Option<Target> {
    if app.code_area.is_some_and(|r| point_in_rect(x, y, r)) {
        Some(Target::Code)
    } else if app.docs_area.is_some_and(|r| point_in_rect(x, y, r)) {
        Some(Target::Documentation)
    } else {
        None
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.save_dialog.is_some() || app.key_input.is_some() {
        return;
    }

    let Some(target) = target_at(app, mouse.column, mouse.row) else {
        return;
    };

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            let (_, width) = view_size(app, target);
            app.pane_mut(target).scroll_down(WHEEL_LINES, width);
        }
        MouseEventKind::ScrollUp => app.pane_mut(target).scroll_up(WHEEL_LINES),
        MouseEventKind::Down(MouseButton::Left) => app.focus = Focus::from(target),
        _ => {}
    }
}
