#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Tabs;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::GenerationRecord;
use crate::domain::models::Loading;
use crate::domain::models::ModelOption;
use crate::domain::models::TextArea;
use crate::domain::models::View;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::Downloads;

const ACCENT: Color = Color::Rgb(37, 99, 235);

fn key_input(key: Key) -> Input {
    return Input {
        key,
        ctrl: false,
        alt: false,
    };
}

fn type_text(textarea: &mut tui_textarea::TextArea, text: &str) {
    for char in text.chars() {
        if char == '\n' {
            textarea.input(key_input(Key::Enter));
        } else {
            textarea.input(key_input(Key::Char(char)));
        }
    }
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        return format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0));
    }
    if bytes >= 1024 {
        return format!("{:.1} KB", bytes as f64 / 1024.0);
    }

    return format!("{bytes} B");
}

fn record_lines(record: &GenerationRecord) -> Vec<Line<'static>> {
    let mut details = format_size(record.image.size());
    if let Some((width, height)) = record.image.dimensions() {
        details = format!("{width}x{height} PNG, {details}");
    }

    return vec![
        Line::from(vec![
            Span::styled("Prompt: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(record.prompt.replace('\n', " ")),
        ]),
        Line::from(Span::styled(
            format!("Model: {}", record.model_display_name()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("Created: {}", record.created_at_display()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("Image: {details}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
}

fn tab_titles(app_state: &AppState) -> Vec<Line<'static>> {
    return vec![
        Line::from("Generate"),
        Line::from(format!("Gallery ({})", app_state.gallery.len())),
    ];
}

fn status_lines(app_state: &AppState) -> Vec<Line<'static>> {
    let mut lines = vec![];
    if let Some(err) = &app_state.last_error {
        lines.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(notice) = &app_state.notice {
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Green),
        )));
    }

    return lines;
}

fn render_generate<B: Backend>(
    frame: &mut Frame<B>,
    rect: Rect,
    app_state: &AppState,
    textarea: &tui_textarea::TextArea,
    loading: &Loading,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(rect);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Model: "),
            Span::styled(
                ModelOption::display_name_for(&app_state.selected_model),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (CTRL+N / CTRL+P to change)", Style::default().fg(Color::DarkGray)),
        ])),
        layout[0],
    );

    frame.render_widget(textarea.widget(), layout[1]);

    if app_state.is_loading {
        loading.render(frame, layout[2]);
    } else {
        frame.render_widget(
            Paragraph::new("Generate Image (Enter)")
                .style(Style::default().fg(Color::White).bg(ACCENT))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Double)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .alignment(Alignment::Center),
            layout[2],
        );
    }

    frame.render_widget(
        Paragraph::new(status_lines(app_state)).wrap(Wrap { trim: true }),
        layout[3],
    );

    if let Some(record) = &app_state.current_image {
        let mut lines = record_lines(record);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Download Image (CTRL+S)",
            Style::default().fg(Color::Green),
        )));

        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Current Image")
                    .padding(Padding::new(1, 1, 0, 0)),
            ),
            layout[4],
        );
    }
}

fn render_gallery<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Length(2)])
        .split(rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Generated Images ({})", app_state.gallery.len()))
        .padding(Padding::new(1, 1, 0, 0));

    if app_state.gallery.is_empty() {
        frame.render_widget(
            Paragraph::new("No images generated yet. Create some in the Generate tab!")
                .wrap(Wrap { trim: true })
                .block(block),
            layout[0],
        );
    } else {
        let items = app_state
            .gallery
            .records()
            .iter()
            .map(|record| {
                let mut lines = record_lines(record);
                lines.push(Line::from(""));
                return ListItem::new(lines);
            })
            .collect::<Vec<ListItem>>();

        let mut state = ListState::default();
        state.select(Some(app_state.gallery_selected));

        frame.render_stateful_widget(
            List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> "),
            layout[0],
            &mut state,
        );
    }

    let mut lines = status_lines(app_state);
    if !app_state.gallery.is_empty() {
        lines.push(Line::from(Span::styled(
            "Download selected image (Enter)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        layout[1],
    );
}

fn render<B: Backend>(
    frame: &mut Frame<B>,
    app_state: &AppState,
    textarea: &tui_textarea::TextArea,
    loading: &Loading,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3), Constraint::Min(1)])
        .split(frame.size());

    frame.render_widget(
        Tabs::new(tab_titles(app_state))
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .title("Text to Image Generator"),
            )
            .select(app_state.active_view.index())
            .highlight_style(Style::default().fg(Color::White).bg(ACCENT)),
        layout[0],
    );

    match app_state.active_view {
        View::Generate => render_generate(frame, layout[1], app_state, textarea, loading),
        View::Gallery => render_gallery(frame, layout[1], app_state),
    }
}

/// Applies a single event to the app state, sending any resulting work to
/// the actions service. Returns true when the UI should exit.
fn handle_event(
    event: Event,
    app_state: &mut AppState,
    textarea: &mut tui_textarea::TextArea,
    tx: &mpsc::UnboundedSender<Action>,
) -> Result<bool> {
    match event {
        Event::KeyboardCTRLC() => {
            return Ok(true);
        }
        Event::KeyboardTab() => {
            app_state.toggle_view();
        }
        Event::KeyboardCTRLN() => {
            app_state.select_next_model();
        }
        Event::KeyboardCTRLP() => {
            app_state.select_previous_model();
        }
        Event::KeyboardCTRLS() => {
            if let Some(record) = &app_state.current_image {
                tx.send(Action::Download(
                    record.image.clone(),
                    Downloads::file_name_now(None),
                ))?;
            }
        }
        Event::KeyboardEnter() => match app_state.active_view {
            View::Generate => {
                app_state.set_prompt(&textarea.lines().join("\n"));
                if let Ok(request) = app_state.begin_generation() {
                    tx.send(Action::Generate(request))?;
                }
            }
            View::Gallery => {
                if let Some(record) = app_state.selected_record() {
                    tx.send(Action::Download(
                        record.image.clone(),
                        Downloads::file_name_now(Some(app_state.gallery_selected)),
                    ))?;
                }
            }
        },
        Event::KeyboardCharInput(input) => {
            if app_state.active_view == View::Generate {
                textarea.input(input);
                app_state.set_prompt(&textarea.lines().join("\n"));
            }
        }
        Event::KeyboardPaste(text) => {
            if app_state.active_view == View::Generate {
                type_text(textarea, &text);
                app_state.set_prompt(&textarea.lines().join("\n"));
            }
        }
        Event::UIScrollUp() => match app_state.active_view {
            View::Generate => {
                textarea.input(key_input(Key::Up));
            }
            View::Gallery => {
                app_state.gallery_up();
            }
        },
        Event::UIScrollDown() => match app_state.active_view {
            View::Generate => {
                textarea.input(key_input(Key::Down));
            }
            View::Gallery => {
                app_state.gallery_down();
            }
        },
        Event::GenerationResponse(request, res) => {
            app_state.complete_generation(request, res);
        }
        Event::DownloadResponse(res) => match res {
            Ok(file_path) => {
                app_state.notice = Some(format!(
                    "Saved image to {}",
                    file_path.to_string_lossy()
                ));
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to save image");
                app_state.last_error = Some(err);
            }
        },
        Event::UITick() => (),
    }

    return Ok(false);
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut textarea = TextArea::default();
    let loading = Loading::default();

    #[cfg(feature = "dev")]
    {
        type_text(&mut textarea, "a red fox in snow");
        app_state.set_prompt(&textarea.lines().join("\n"));
    }

    loop {
        terminal.draw(|frame| {
            render(frame, app_state, &textarea, &loading);
        })?;

        let event = events.next().await?;
        if handle_event(event, app_state, &mut textarea, &tx)? {
            break;
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;
    let mut app_state = AppState::new(&Config::get(ConfigKey::Model));

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
