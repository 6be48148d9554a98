use dashboard_core::{AppViewModel, IntegrationsView, RunPanelView, Screen, ServiceRowView, Tone};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::layout::{integrations_areas, run_areas};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const COLOR_MUTED: Color = Color::DarkGray;
const COLOR_BUTTON: Color = Color::Indexed(63);

/// UI-local state that never reaches the core: focus, input buffer, spinner.
#[derive(Debug, Default)]
pub struct UiLocal {
    pub selected: usize,
    /// Present while the template path is being typed.
    pub template_input: Option<String>,
    pub spinner_frame: usize,
}

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::Gray,
        Tone::Info => Color::Blue,
        Tone::Accent => Color::Magenta,
        Tone::Affirmative => Color::Green,
        Tone::Negative => Color::Red,
    }
}

pub fn render(frame: &mut Frame, view: &AppViewModel, ui: &UiLocal) {
    match view.screen {
        Screen::Run => render_run(frame, &view.run, ui),
        Screen::Integrations => render_integrations(frame, &view.integrations, ui),
    }
}

fn render_run(frame: &mut Frame, run: &RunPanelView, ui: &UiLocal) {
    let areas = run_areas(frame.area());

    frame.render_widget(
        header(
            "CoSN Agent Dashboard",
            "Content automation for Chief of Staff Network",
            "[i] Integrations",
        ),
        areas.header,
    );

    let badge_style = Style::default()
        .fg(tone_color(run.badge.tone))
        .add_modifier(Modifier::BOLD);
    let card = Paragraph::new(vec![
        Line::from(Span::styled(
            "Pulls from Luma, Spotify & Webflow → generates .docx via Claude",
            Style::default().fg(COLOR_MUTED),
        )),
        Line::from(vec![
            Span::styled(format!(" {} ", run.badge.text), badge_style),
            Span::raw("   "),
            button(run.run_label, run.run_enabled),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Weekly Newsletter Draft "),
    );
    frame.render_widget(card, areas.card);

    frame.render_widget(template_picker(run, ui), areas.template);
    frame.render_widget(status_section(run, ui), areas.status);

    let help = if ui.template_input.is_some() {
        "Enter pick · Esc cancel · empty path clears"
    } else {
        "r/Enter Run Now · t template · i/Tab Integrations · q quit"
    };
    frame.render_widget(footer(help), areas.footer);
}

fn template_picker(run: &RunPanelView, ui: &UiLocal) -> Paragraph<'static> {
    let value = match &ui.template_input {
        Some(buffer) => Line::from(vec![
            Span::raw(buffer.clone()),
            Span::styled("▏", Style::default().fg(COLOR_BUTTON)),
        ]),
        None => match &run.template {
            Some(path) => Line::from(path.clone()),
            None => Line::from(Span::styled(
                "No file chosen",
                Style::default().fg(COLOR_MUTED),
            )),
        },
    };
    let mut lines = vec![
        Line::from(Span::styled(
            "Template override (optional .md or .txt)",
            Style::default().fg(COLOR_MUTED),
        )),
        value,
    ];
    if let Some(note) = &run.picker_note {
        lines.push(Line::from(Span::styled(
            note.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    Paragraph::new(lines).block(Block::default().borders(Borders::TOP))
}

fn status_section(run: &RunPanelView, ui: &UiLocal) -> Paragraph<'static> {
    let mut lines = Vec::new();
    if let Some(step) = &run.progress_step {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", SPINNER[ui.spinner_frame % SPINNER.len()]),
                Style::default().fg(COLOR_BUTTON),
            ),
            Span::raw(step.clone()),
        ]));
    }
    if let Some(success) = run.success_line {
        lines.push(Line::from(Span::styled(
            success,
            Style::default().fg(tone_color(Tone::Affirmative)),
        )));
        if let Some(path) = &run.saved_to {
            lines.push(Line::from(Span::styled(
                format!("Saved to {path}"),
                Style::default().fg(COLOR_MUTED),
            )));
        }
    }
    if let Some(error) = &run.error_line {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(tone_color(Tone::Negative)),
        )));
    }
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::TOP))
}

fn render_integrations(frame: &mut Frame, integrations: &IntegrationsView, ui: &UiLocal) {
    let areas = integrations_areas(frame.area(), integrations.rows.len());

    frame.render_widget(
        header(
            "Integrations",
            "API keys are loaded from .env at the repo root",
            "[a] ← Automations",
        ),
        areas.header,
    );

    for (index, (row, area)) in integrations
        .rows
        .iter()
        .zip(areas.services.iter().copied())
        .enumerate()
    {
        frame.render_widget(service_card(row, index == ui.selected), area);
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Update .env in the repo root, then restart the backend to pick up new keys.",
            Style::default().fg(COLOR_MUTED),
        ))
        .wrap(Wrap { trim: true }),
        areas.note,
    );
    frame.render_widget(
        footer("↑/↓ select · Enter/t Test Connection · a/Esc/Tab Automations · q quit"),
        areas.footer,
    );
}

fn service_card(row: &ServiceRowView, selected: bool) -> Paragraph<'static> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(row.label, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            button(row.button_label, row.button_enabled),
        ]),
        Line::from(Span::styled(row.placeholder, Style::default().fg(COLOR_MUTED))),
    ];
    if let Some(result) = &row.result {
        lines.push(Line::from(Span::styled(
            result.text.clone(),
            Style::default().fg(tone_color(result.tone)),
        )));
    }
    let border = if selected {
        Style::default().fg(COLOR_BUTTON)
    } else {
        Style::default().fg(COLOR_MUTED)
    };
    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).border_style(border))
}

fn header(title: &'static str, subtitle: &'static str, nav: &'static str) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(vec![
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled(nav, Style::default().fg(COLOR_MUTED)),
        ]),
        Line::from(Span::styled(subtitle, Style::default().fg(COLOR_MUTED))),
    ])
}

fn button(label: &'static str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default()
            .fg(Color::White)
            .bg(COLOR_BUTTON)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_MUTED).add_modifier(Modifier::DIM)
    };
    Span::styled(format!("[ {label} ]"), style)
}

fn footer(text: &'static str) -> Paragraph<'static> {
    Paragraph::new(Span::styled(text, Style::default().fg(COLOR_MUTED)))
}

#[cfg(test)]
mod tests {
    use dashboard_core::{status_badge, RunStatus};

    use super::*;

    #[test]
    fn badge_colors_follow_tone() {
        let colors: Vec<_> = RunStatus::ALL
            .iter()
            .map(|status| tone_color(status_badge(*status).tone))
            .collect();
        assert_eq!(
            colors,
            vec![
                Color::Gray,
                Color::Blue,
                Color::Magenta,
                Color::Green,
                Color::Red
            ]
        );
    }

    #[test]
    fn disabled_button_is_dimmed() {
        let enabled = button("Run Now", true);
        let disabled = button("Running…", false);
        assert_eq!(enabled.content, "[ Run Now ]");
        assert_eq!(disabled.content, "[ Running… ]");
        assert!(disabled.style.add_modifier.contains(Modifier::DIM));
        assert!(!enabled.style.add_modifier.contains(Modifier::DIM));
    }
}
