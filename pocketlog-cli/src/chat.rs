use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pocketlog_core::format_money;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use std::io::{self, Stdout};
use std::sync::mpsc::Receiver;
use tokio::sync::mpsc::UnboundedSender;

use crate::reply;
use crate::reply_worker::{ReplyEvent, ReplyRequest};
use crate::session::Session;

#[derive(Clone, Debug)]
struct Msg {
    role: Role,
    content: String,
}

#[derive(Clone, Copy, Debug)]
enum Role {
    User,
    Assistant,
}

pub fn run_chat(
    session: Session,
    requests: UnboundedSender<ReplyRequest>,
    events: Receiver<ReplyEvent>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = chat_loop(&mut terminal, session, requests, events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn chat_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut session: Session,
    requests: UnboundedSender<ReplyRequest>,
    events: Receiver<ReplyEvent>,
) -> Result<()> {
    let mut messages: Vec<Msg> = vec![Msg {
        role: Role::Assistant,
        content: "Hi! Tell me what you spent or earned, e.g. \"Spent $50 on groceries\".".to_string(),
    }];

    let mut input = String::new();
    let mut show_help = true;
    let mut next_request_id: u64 = 0;
    let mut pending: usize = 0;

    tracing::info!("chat session started");

    loop {
        for ev in events.try_iter() {
            match ev {
                ReplyEvent::Typing { request_id } => {
                    tracing::debug!(request_id, "typing");
                }
                ReplyEvent::Delivered { text, .. } => {
                    pending = pending.saturating_sub(1);
                    messages.push(Msg {
                        role: Role::Assistant,
                        content: text,
                    });
                }
            }
        }

        terminal.draw(|f| {
            let size = f.area();
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(4),
                    Constraint::Min(5),
                    Constraint::Length(3),
                ])
                .split(size);
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(rows[1]);

            let splash = Paragraph::new(Text::from(vec![
                Line::from(Span::styled(
                    "pocketlog",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "log money by chatting | F1 help | Esc quit",
                    Style::default().fg(Color::Gray),
                )),
            ]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(splash, rows[0]);

            let mut lines: Vec<Line> = Vec::new();
            if show_help {
                lines.push(Line::from(Span::styled(
                    "Shortcuts: Enter=send, Esc=quit, F1=toggle help",
                    Style::default().fg(Color::Gray),
                )));
                lines.push(Line::raw("Commands: /help /summary /list /categories"));
                lines.push(Line::raw(""));
            }

            for m in &messages {
                let (tag, color) = match m.role {
                    Role::User => ("you", Color::Cyan),
                    Role::Assistant => ("pocketlog", Color::Magenta),
                };
                for (i, text) in m.content.lines().enumerate() {
                    if i == 0 {
                        lines.push(Line::from(vec![
                            Span::styled(format!("{tag}: "), Style::default().fg(color)),
                            Span::raw(text.to_string()),
                        ]));
                    } else {
                        lines.push(Line::raw(format!("  {text}")));
                    }
                }
                lines.push(Line::raw(""));
            }
            if pending > 0 {
                lines.push(Line::from(Span::styled(
                    "pocketlog is typing…",
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }

            // keep the newest lines in view
            let visible = body[0].height.saturating_sub(2) as usize;
            let scroll = lines.len().saturating_sub(visible) as u16;
            let history = Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL).title("conversation"))
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0));
            f.render_widget(history, body[0]);

            f.render_widget(ledger_panel(&session), body[1]);

            let input_widget = Paragraph::new(input.as_str())
                .block(Block::default().borders(Borders::ALL).title("message"))
                .style(Style::default().fg(Color::White));
            f.render_widget(input_widget, rows[2]);
        })?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::F(1) => {
                        show_help = !show_help;
                    }
                    KeyCode::Enter => {
                        if let Some(answer) = session.handle(&input) {
                            messages.push(Msg {
                                role: Role::User,
                                content: input.trim().to_string(),
                            });
                            next_request_id += 1;
                            let sent = requests.send(ReplyRequest {
                                request_id: next_request_id,
                                text: answer.text.clone(),
                            });
                            match sent {
                                Ok(()) => pending += 1,
                                // worker is gone; show the reply right away
                                Err(_) => messages.push(Msg {
                                    role: Role::Assistant,
                                    content: answer.text,
                                }),
                            }
                        }
                        input.clear();
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                    }
                    _ => {}
                }
            }
        }
    }

    tracing::info!(transactions = session.ledger().len(), "chat session ended");
    Ok(())
}

fn ledger_panel(session: &Session) -> Paragraph<'static> {
    let ledger = session.ledger();
    let totals = ledger.totals();
    let balance_color = if totals.balance < 0.0 { Color::Red } else { Color::Green };

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Balance  "),
            Span::styled(
                format_money(totals.balance),
                Style::default()
                    .fg(balance_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Income   "),
            Span::styled(format_money(totals.income), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::raw("Expenses "),
            Span::styled(format_money(totals.expense), Style::default().fg(Color::Red)),
        ]),
        Line::raw(""),
    ];

    if ledger.is_empty() {
        lines.push(Line::from(Span::styled(
            "No transactions yet.",
            Style::default().fg(Color::Gray),
        )));
    }
    for r in ledger.recent(session.recent_limit()) {
        let color = if r.is_income() { Color::Green } else { Color::Red };
        lines.push(Line::from(Span::styled(reply::list_line(r), Style::default().fg(color))));
    }

    Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("transactions"))
        .wrap(Wrap { trim: true })
}
