// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use menuboard_app::{
    Catalog, Category, CategoryId, MenuItem, TabCommand, TabController, TabEvent, TabMetrics,
    TabStrip, TransitionToken,
};
use menuboard_render::Renderer;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// Tab widths in cells: label plus the padding and divider `Tabs` draws.
pub const TERMINAL_TAB_METRICS: TabMetrics = TabMetrics {
    char_width: 1.0,
    tab_padding: 3.0,
};

const SWIPE_HINT: &str = "Swipe for more categories  ←/→";
const KEY_HINTS: &str = "←/→ tab  1-9 jump  ↑/↓ scroll  q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    Settle { token: TransitionToken },
}

/// Rendered lines of the displayed category.
#[derive(Debug, Clone, Default, PartialEq)]
struct CategoryPane {
    lines: Vec<Line<'static>>,
}

impl Renderer for CategoryPane {
    fn render(&mut self, catalog: &Catalog, active: CategoryId) {
        self.lines = catalog
            .category(active)
            .map(category_lines)
            .unwrap_or_default();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ViewData {
    pane: CategoryPane,
    active: Option<CategoryId>,
    fading: bool,
    swipe_hint: bool,
    scroll_left: f64,
    body_scroll: u16,
    width: u16,
}

/// Interactive browser over one catalog. Returns when the user quits.
pub fn run_browser(
    title: &str,
    catalog: &Catalog,
    controller: &mut TabController,
    initial: CategoryId,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let (width, _) = terminal::size().context("read terminal size")?;
    view_data.width = width;
    let events = controller.dispatch(TabCommand::Load {
        initial,
        strip: strip_for_width(catalog, width),
    });
    apply_events(catalog, &mut view_data, &internal_tx, events);

    let mut result = Ok(());
    loop {
        process_internal_events(catalog, controller, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, title, catalog, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(50)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(catalog, controller, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(width, _) => {
                    view_data.width = width;
                    let events =
                        controller.dispatch(TabCommand::Resize(strip_for_width(catalog, width)));
                    apply_events(catalog, &mut view_data, &internal_tx, events);
                    view_data.scroll_left = controller.scroll_left();
                }
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

pub fn strip_for_width(catalog: &Catalog, width: u16) -> TabStrip {
    // Two cells go to the block border.
    let inner = f64::from(width.saturating_sub(2));
    TabStrip::full_width(TERMINAL_TAB_METRICS.estimate(catalog.names()), inner)
}

fn process_internal_events(
    catalog: &Catalog,
    controller: &mut TabController,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::Settle { token } => {
                let events = controller.dispatch(TabCommand::Settle(token));
                apply_events(catalog, view_data, tx, events);
            }
        }
    }
}

fn schedule_settle(internal_tx: &Sender<InternalEvent>, token: TransitionToken, delay: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = sender.send(InternalEvent::Settle { token });
    });
}

fn apply_events(
    catalog: &Catalog,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: Vec<TabEvent>,
) {
    for event in events {
        match event {
            TabEvent::Rendered(id) => {
                view_data.pane.render(catalog, id);
                view_data.body_scroll = 0;
            }
            TabEvent::ActiveTabChanged(id) => view_data.active = Some(id),
            TabEvent::Scrolled(left) => view_data.scroll_left = left,
            TabEvent::FadeOut { .. } => view_data.fading = true,
            TabEvent::FadeIn => view_data.fading = false,
            TabEvent::SwipeHintChanged(visible) => view_data.swipe_hint = visible,
            TabEvent::SwitchScheduled { token, delay } => {
                schedule_settle(internal_tx, token, delay);
            }
            TabEvent::SwitchCancelled(token) => {
                tracing::debug!(token = token.get(), "tab switch superseded");
            }
            TabEvent::Ready(_) => {}
        }
    }
}

/// Returns true when the browser should close.
fn handle_key_event(
    catalog: &Catalog,
    controller: &mut TabController,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    let count = catalog.len();
    let target = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Up | KeyCode::Char('k') => {
            view_data.body_scroll = view_data.body_scroll.saturating_sub(1);
            return false;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_data.body_scroll = view_data.body_scroll.saturating_add(1);
            return false;
        }
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => {
            pending_target(controller).map(|current| (current.get() + 1) % count)
        }
        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => {
            pending_target(controller).map(|current| (current.get() + count - 1) % count)
        }
        KeyCode::Char(digit @ '1'..='9') => digit
            .to_digit(10)
            .map(|value| value as usize - 1)
            .filter(|index| *index < count),
        _ => None,
    };

    if let Some(index) = target {
        let events = controller.dispatch(TabCommand::Activate(CategoryId::new(index)));
        apply_events(catalog, view_data, internal_tx, events);
    }
    false
}

/// Arrow keys step from where the user is heading, not from what is shown.
fn pending_target(controller: &TabController) -> Option<CategoryId> {
    match controller.phase() {
        menuboard_app::TabPhase::Idle => None,
        menuboard_app::TabPhase::Ready { active } => Some(active),
        menuboard_app::TabPhase::Switching { to, .. } => Some(to),
    }
}

/// Index of the first tab whose right edge is past the scroll position.
fn first_visible_tab(widths: &[f64], scroll_left: f64) -> usize {
    let mut right = 0.0;
    for (index, width) in widths.iter().enumerate() {
        right += width;
        if right > scroll_left {
            return index;
        }
    }
    widths.len().saturating_sub(1)
}

fn render(frame: &mut ratatui::Frame<'_>, title: &str, catalog: &Catalog, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let widths = TERMINAL_TAB_METRICS.estimate(catalog.names());
    let offset = first_visible_tab(&widths, view_data.scroll_left);
    let titles: Vec<String> = catalog.names().skip(offset).map(str::to_owned).collect();
    let selected = view_data
        .active
        .map(|id| id.get().saturating_sub(offset))
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(Block::default().title(title.to_owned()).borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    if view_data.swipe_hint {
        let hint = Paragraph::new(SWIPE_HINT).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, layout[1]);
    }

    let mut body_style = Style::default();
    if view_data.fading {
        body_style = body_style.add_modifier(Modifier::DIM);
    }
    let body = Paragraph::new(view_data.pane.lines.clone())
        .style(body_style)
        .wrap(Wrap { trim: false })
        .scroll((view_data.body_scroll, 0))
        .block(Block::default().borders(Borders::LEFT | Borders::RIGHT));
    frame.render_widget(body, layout[2]);

    let status = Paragraph::new(KEY_HINTS).style(Style::default().fg(Color::Yellow));
    frame.render_widget(status, layout[3]);
}

fn category_lines(category: &Category) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        category.name.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(description) = &category.description {
        lines.push(Line::from(Span::styled(
            description.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    for group in &category.groups {
        lines.push(Line::default());
        if let Some(heading) = group.heading() {
            lines.push(Line::from(Span::styled(
                heading.to_owned(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )));
        }
        for item in &group.items {
            push_item_lines(&mut lines, item);
        }
    }
    lines
}

fn push_item_lines(lines: &mut Vec<Line<'static>>, item: &MenuItem) {
    let mut title = vec![
        Span::raw("  "),
        Span::styled(
            item.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(notes) = &item.notes {
        title.push(Span::styled(
            format!(" ({notes})"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(price) = &item.price {
        title.push(Span::raw("  "));
        title.push(Span::styled(price.clone(), Style::default().fg(Color::Green)));
    }
    lines.push(Line::from(title));

    let secondary = [
        (&item.description, Style::default()),
        (&item.mods, Style::default().add_modifier(Modifier::ITALIC)),
        (
            &item.price_description,
            Style::default().add_modifier(Modifier::ITALIC),
        ),
    ];
    for (text, style) in secondary {
        let Some(text) = text else {
            continue;
        };
        for line in text.lines() {
            lines.push(Line::from(Span::styled(format!("    {line}"), style)));
        }
    }
}
