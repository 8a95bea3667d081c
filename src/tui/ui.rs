//! TUI UI Rendering
//!
//! Renders the dashboard with ratatui:
//! - Boot screen: title and loading bar until the screen is ready
//! - Header: terminal title, node, sync status
//! - Sidebar: module selector
//! - Viewport: the active module (PULSE, STRIKE, LOGS, TEE)
//! - Right column: numbered audit trail and the strike target bar
//! - Footer: grid id, uptime, copyright

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::config::{TokenIdentity, Variant};
use crate::core::{EnclaveState, ModuleId, ScreenState};

use super::app::App;

/// Cosmetic graduation progress shown in PULSE and STRIKE_TARGET
pub const GRADUATION_PERCENT: u16 = 42;

const ACCENT: Color = Color::Cyan;
const STRIKE_RED: Color = Color::LightRed;
const MUTED: Color = Color::DarkGray;

const SIDEBAR_WIDTH: u16 = 16;
const LOG_PANEL_WIDTH: u16 = 44;

/// Main draw function - renders the entire UI
pub fn draw(frame: &mut Frame, app: &App) {
    // Render from a copy so the state lock is not held while drawing
    let state = app.screen.read(|s| s.clone());

    if !state.boot.booted {
        draw_boot(frame, frame.area(), app, &state);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app, &state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH),
            Constraint::Min(20),
            Constraint::Length(LOG_PANEL_WIDTH),
        ])
        .split(chunks[1]);

    draw_sidebar(frame, body[0], &state);

    let token = &app.screen.config().token;
    match state.active_module() {
        ModuleId::Pulse => draw_pulse(frame, body[1], &state, token),
        ModuleId::Strike => draw_strike(frame, body[1], app, &state),
        ModuleId::Logs => draw_full_logs(frame, body[1], app, &state),
        ModuleId::Tee => draw_tee(frame, body[1], &state),
    }

    draw_log_column(frame, body[2], &state);
    draw_footer(frame, chunks[2], app);
}

/// Loading screen with a progress bar
fn draw_boot(frame: &mut Frame, area: Rect, app: &App, state: &ScreenState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(rows[3]);

    let title = Paragraph::new(Line::from(Span::styled(
        "Initializing_Sovereign_Mind...",
        Style::default().fg(STRIKE_RED).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, rows[1]);

    let ratio = app.boot_ratio(state.boot.progress);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(STRIKE_RED).bg(Color::Black))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    frame.render_widget(gauge, columns[1]);
}

/// Terminal title, node and sync status
fn draw_header(frame: &mut Frame, area: Rect, app: &App, state: &ScreenState) {
    let config = app.screen.config();
    let title = match config.variant {
        Variant::Terminal => "Sovereign_Terminal",
        Variant::Sentinel => "Sovereign_Sentinel",
    };

    let (status_text, status_color) = if state.is_syncing() {
        ("◌ SYNCING", Color::Yellow)
    } else {
        ("● Substrate_Online", Color::Green)
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default().fg(STRIKE_RED).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  │  ACCESS_LEVEL: COMMANDER // NODE: {}",
                short_address(&config.token.pool_address)
            ),
            Style::default().fg(MUTED),
        ),
        Span::raw("  │  "),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::styled("  [r] refresh", Style::default().fg(MUTED)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// Module selector; the active module is highlighted
fn draw_sidebar(frame: &mut Frame, area: Rect, state: &ScreenState) {
    let active = state.active_module();
    let items: Vec<ListItem> = ModuleId::ALL
        .iter()
        .enumerate()
        .map(|(idx, module)| {
            let (marker, style) = if *module == active {
                let color = if *module == ModuleId::Strike {
                    STRIKE_RED
                } else {
                    ACCENT
                };
                ("▶ ", Style::default().fg(color).add_modifier(Modifier::BOLD))
            } else {
                ("  ", Style::default().fg(MUTED))
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(format!("F{} {}", idx + 1, module.label()), style),
            ]))
        })
        .collect();

    let sidebar = List::new(items).block(Block::default().borders(Borders::ALL).title("MODULES"));
    frame.render_widget(sidebar, area);
}

/// Market data cards, liquidity/volume and the pool link
fn draw_pulse(frame: &mut Frame, area: Rect, state: &ScreenState, token: &TokenIdentity) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Market_Intelligence");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Subtitle
            Constraint::Length(4), // Cards
            Constraint::Length(2), // Liquidity / volume
            Constraint::Min(1),    // Pool link
        ])
        .split(inner);

    let subtitle = Paragraph::new(Line::from(vec![
        Span::styled("Base_Network_Protocol  ", Style::default().fg(MUTED)),
        Span::styled(
            format!("{} // Bedrock_Sync", token.ticker),
            Style::default().fg(ACCENT),
        ),
    ]));
    frame.render_widget(subtitle, rows[0]);

    let snapshot = state.snapshot.as_ref();
    let price = snapshot
        .map(|s| format!("${}", s.price_usd))
        .unwrap_or_else(|| "$---".to_string());
    let mcap = snapshot
        .map(|s| format!("${}", s.market_cap_display))
        .unwrap_or_else(|| "$---".to_string());
    let (change, change_color) = match snapshot.and_then(|s| s.change_label().map(|l| (l, s.is_up()))) {
        Some((label, true)) => (label, Color::Green),
        Some((label, false)) => (label, Color::Red),
        None => ("---".to_string(), MUTED),
    };

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[1]);
    draw_card(frame, cards[0], "Price_USD", price, Color::White);
    draw_card(frame, cards[1], "24H_Change", change, change_color);
    draw_card(frame, cards[2], "Market_Cap", mcap, Color::White);
    draw_card(
        frame,
        cards[3],
        "Graduation_Status",
        format!("{}%", GRADUATION_PERCENT),
        STRIKE_RED,
    );

    let liquidity = snapshot
        .map(|s| format!("${}", s.liquidity_display))
        .unwrap_or_else(|| "---".to_string());
    let volume = snapshot
        .map(|s| format!("${}", s.volume_24h_display))
        .unwrap_or_else(|| "---".to_string());
    let depth = Paragraph::new(Line::from(vec![
        Span::raw("Liquidity: "),
        Span::styled(liquidity, Style::default().fg(Color::Yellow)),
        Span::raw("  │  Volume_24H: "),
        Span::styled(volume, Style::default().fg(Color::Yellow)),
    ]));
    frame.render_widget(depth, rows[2]);

    let pool = Paragraph::new(vec![
        Line::from(Span::styled("Pool_Chart:", Style::default().fg(MUTED))),
        Line::from(Span::styled(
            token.pool_explorer_url(),
            Style::default().fg(ACCENT).add_modifier(Modifier::UNDERLINED),
        )),
    ])
    .wrap(Wrap { trim: false });
    frame.render_widget(pool, rows[3]);
}

fn draw_card(frame: &mut Frame, area: Rect, title: &str, value: String, color: Color) {
    let card = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED))
            .title(Span::styled(title.to_string(), Style::default().fg(MUTED))),
    );
    frame.render_widget(card, area);
}

/// Trend input and synthesized narrative
fn draw_strike(frame: &mut Frame, area: Rect, app: &App, state: &ScreenState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Strike_Narrative_Generator");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Hint
            Constraint::Length(3), // Input
            Constraint::Min(3),    // Result
        ])
        .split(inner);

    let hint = Paragraph::new(Span::styled(
        "Enter trending topic to synthesize professional sovereign content.",
        Style::default().fg(MUTED),
    ));
    frame.render_widget(hint, rows[0]);

    let cursor = if app.cursor_visible() { "█" } else { " " };
    let input_line = if state.trend_input.is_empty() {
        Line::from(vec![
            Span::raw("> "),
            Span::styled(cursor, Style::default().fg(ACCENT)),
            Span::styled(
                "ENTER TREND (e.g. ELON_X, BASE_SURGE)...",
                Style::default().fg(MUTED),
            ),
        ])
    } else {
        Line::from(vec![
            Span::raw("> "),
            Span::styled(state.trend_input.clone(), Style::default().fg(Color::White)),
            Span::styled(cursor, Style::default().fg(ACCENT)),
        ])
    };
    let status = if state.is_striking {
        Span::styled(" SYNTHESIZING... ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" [Enter] STRIKE ", Style::default().fg(STRIKE_RED))
    };
    let input = Paragraph::new(input_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(STRIKE_RED))
            .title(status),
    );
    frame.render_widget(input, rows[1]);

    if let Some(narrative) = &state.narrative {
        let lines: Vec<Line> = narrative
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        let result = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled("Synthesized_Narrative", Style::default().fg(ACCENT))),
        );
        frame.render_widget(result, rows[2]);
    }
}

/// Full audit trail with scrollback
fn draw_full_logs(frame: &mut Frame, area: Rect, app: &App, state: &ScreenState) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines = state.logs.numbered_lines();
    let end = lines.len().saturating_sub(app.log_scroll_offset);
    let start = end.saturating_sub(visible);

    let items: Vec<ListItem> = lines[start..end]
        .iter()
        .map(|(n, text)| log_item(*n, text))
        .collect();

    let title = format!(
        "Audit_Trail ({}/{}, ↑/↓ scroll)",
        state.logs.len(),
        state.logs.capacity()
    );
    let logs = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(logs, area);
}

/// Enclave panel; attestation is cosmetic
fn draw_tee(frame: &mut Frame, area: Rect, state: &ScreenState) {
    let (attestation, attestation_color) = if state.enclave_verified() {
        ("VERIFIED", Color::Green)
    } else {
        ("PENDING", Color::Yellow)
    };
    let (isolation, isolation_color) = if state.enclave_verified() {
        ("ACTIVE", ACCENT)
    } else {
        ("STANDBY", MUTED)
    };
    let enclave_color = match state.enclave {
        EnclaveState::Locked => STRIKE_RED,
        EnclaveState::Unlocking => Color::Yellow,
        EnclaveState::Unlocked => Color::Green,
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Secure_Enclave_V1.0",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "All data drilling and strategic strike logic is executed within this \
             TEE-hardened environment. Zero human access. Zero leakage.",
            Style::default().fg(MUTED),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Attestation_Status: "),
            Span::styled(attestation, Style::default().fg(attestation_color)),
        ]),
        Line::from(vec![
            Span::raw("Key_Isolation:      "),
            Span::styled(isolation, Style::default().fg(isolation_color)),
        ]),
    ];

    if state.variant == Variant::Sentinel {
        lines.push(Line::from(vec![
            Span::raw("Enclave:            "),
            Span::styled(state.enclave.label(), Style::default().fg(enclave_color)),
        ]));
        if state.enclave == EnclaveState::Locked {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[u] UNLOCK",
                Style::default().fg(STRIKE_RED),
            )));
        }
    }

    let tee = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("TEE"));
    frame.render_widget(tee, area);
}

/// Right column: newest log lines plus the strike target bar
fn draw_log_column(frame: &mut Frame, area: Rect, state: &ScreenState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(4)])
        .split(area);

    let visible = chunks[0].height.saturating_sub(2) as usize;
    let lines = state.logs.numbered_lines();
    let skip = lines.len().saturating_sub(visible);
    let items: Vec<ListItem> = lines
        .iter()
        .skip(skip)
        .map(|(n, text)| log_item(*n, text))
        .collect();
    let logs = List::new(items).block(Block::default().borders(Borders::ALL).title("System_Logs"));
    frame.render_widget(logs, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Strike_Target: Virtuals_Protocol_Graduation"),
        )
        .gauge_style(Style::default().fg(STRIKE_RED).bg(Color::Black))
        .percent(GRADUATION_PERCENT);
    frame.render_widget(gauge, chunks[1]);
}

/// One numbered audit line, colored by its prefix
fn log_item(number: usize, text: &str) -> ListItem<'static> {
    let color = if text.contains("ERROR") {
        Color::Red
    } else if text.contains("SUCCESS") || text.contains("SYSTEM_READY") {
        Color::Green
    } else if text.contains("STRIKE") {
        STRIKE_RED
    } else {
        Color::White
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("{:>2} ", number), Style::default().fg(MUTED)),
        Span::styled(text.to_string(), Style::default().fg(color)),
    ]))
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Grid_ID: ZORA_BASE_01", Style::default().fg(MUTED)),
        Span::raw("  │  "),
        Span::styled(
            format!("Uptime: {}", app.uptime_str()),
            Style::default().fg(ACCENT),
        ),
        Span::raw("  │  "),
        Span::styled("© 2026_Sovereign_Sisters_Protocol", Style::default().fg(MUTED)),
    ]));
    frame.render_widget(footer, area);
}

/// `0x8828fc2e...371d7d` → `0x882...71d7d` (five characters each side)
fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{}...{}", head, tail)
}
