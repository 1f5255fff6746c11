use std::borrow::Cow;
use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::particles::{Particle, ParticleSystem, Tint};
use crate::game::{PowerUpKind, Position, ScreenKind, Snapshot};
use crate::metrics::GameMetrics;

/// Power-ups start blinking when this few ticks are left
const BLINK_BELOW: u32 = 20;

fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::SpeedBoost => Color::Yellow,
        PowerUpKind::Invincibility => Color::Cyan,
        PowerUpKind::ScoreMultiplier => Color::Magenta,
    }
}

fn power_up_glyph(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::SpeedBoost => "» ",
        PowerUpKind::Invincibility => "◆ ",
        PowerUpKind::ScoreMultiplier => "× ",
    }
}

fn key<'a>(label: impl Into<Cow<'a, str>>) -> Span<'a> {
    Span::styled(
        label,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )
}

fn text<'a>(label: impl Into<Cow<'a, str>>) -> Span<'a> {
    Span::styled(label, Style::default().fg(Color::Gray))
}

pub struct Renderer {
    /// Frames drawn so far, drives pulsing and blinking
    frame: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self { frame: 0 }
    }

    /// Alternates every few frames; used for glow effects
    fn pulse(&self) -> bool {
        (self.frame / 4) % 2 == 0
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        particles: &ParticleSystem,
        metrics: &GameMetrics,
    ) {
        self.frame = self.frame.wrapping_add(1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let header = self.render_stats(snapshot, metrics);
        frame.render_widget(header, chunks[0]);

        // Center the game area horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.screen {
            ScreenKind::Menu => frame.render_widget(self.render_menu(snapshot), game_area),
            ScreenKind::Playing => {
                frame.render_widget(self.render_grid(snapshot, particles), game_area)
            }
            ScreenKind::ScoreBoard => {
                frame.render_widget(self.render_score_board(snapshot), game_area)
            }
            ScreenKind::GameOver => {
                frame.render_widget(self.render_game_over(snapshot), game_area)
            }
        }

        let footer = self.render_controls(snapshot);
        frame.render_widget(footer, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot, particles: &ParticleSystem) -> Paragraph<'_> {
        let sparks: HashMap<(i32, i32), &Particle> = particles
            .cells(snapshot.grid_width, snapshot.grid_height)
            .map(|(x, y, p)| ((x, y), p))
            .collect();
        let invincible = snapshot
            .effects
            .iter()
            .any(|e| e.kind == PowerUpKind::Invincibility);
        let head = snapshot.snake.first().copied();

        let mut lines = Vec::with_capacity(snapshot.grid_height);

        for y in 0..snapshot.grid_height {
            let mut spans = Vec::with_capacity(snapshot.grid_width);

            for x in 0..snapshot.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    let color = if invincible && self.pulse() {
                        Color::White
                    } else {
                        Color::Cyan
                    };
                    Span::styled(
                        "■ ",
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(&pos) {
                    let color = if invincible { Color::LightCyan } else { Color::Green };
                    Span::styled("□ ", Style::default().fg(color))
                } else if snapshot.obstacles.contains(&pos) {
                    Span::styled("▓▓", Style::default().fg(Color::DarkGray))
                } else if Some(pos) == snapshot.food {
                    // Food glows between two shades of red
                    let color = if self.pulse() { Color::LightRed } else { Color::Red };
                    Span::styled(
                        "● ",
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                } else if let Some(power_up) = snapshot.power_up.filter(|p| p.cell == pos) {
                    let fading = power_up.remaining_lifetime < BLINK_BELOW && !self.pulse();
                    if fading {
                        Span::styled(". ", Style::default().fg(Color::DarkGray))
                    } else {
                        Span::styled(
                            power_up_glyph(power_up.kind),
                            Style::default()
                                .fg(power_up_color(power_up.kind))
                                .add_modifier(Modifier::BOLD),
                        )
                    }
                } else if let Some(spark) = sparks.get(&(pos.x, pos.y)) {
                    let color = match spark.tint {
                        Tint::Food => Color::LightYellow,
                        Tint::PowerUp(kind) => power_up_color(kind),
                        Tint::Crash => Color::LightRed,
                    };
                    let glyph = if spark.fade() > 0.5 { "* " } else { "· " };
                    Span::styled(glyph, Style::default().fg(color))
                } else {
                    // Empty cell
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if snapshot.obstacle_mode {
            " Metal Snake - Obstacles "
        } else {
            " Metal Snake "
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let best = if snapshot.obstacle_mode {
            snapshot.obstacle_best
        } else {
            snapshot.classic_best
        };

        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(best.to_string(), Style::default().fg(Color::White)),
        ];

        if snapshot.screen == ScreenKind::Playing {
            spans.extend([
                Span::raw("    "),
                Span::styled("Multiplier: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("x{}", snapshot.multiplier),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Time: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            ]);
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_menu(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        // Title glow
        let title_style = if self.pulse() {
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        };
        let obstacles = if snapshot.obstacle_mode { "ON" } else { "OFF" };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("M E T A L   S N A K E", title_style)),
            Line::from(""),
            Line::from(vec![key("[P]"), text(" Play Game")]),
            Line::from(vec![key("[H]"), text(" High Scores")]),
            Line::from(vec![key("[O]"), text(format!(" Obstacles: {}", obstacles))]),
            Line::from(vec![key("[Q]"), text(" Quit")]),
        ];

        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_score_board(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let row = |label: &'static str, value: u32| {
            Line::from(vec![
                Span::styled(label, Style::default().fg(Color::Yellow)),
                Span::styled(
                    value.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "HIGH SCORES",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            row("Classic:  ", snapshot.classic_best),
            row("Obstacle: ", snapshot.obstacle_best),
            Line::from(""),
            Line::from(text("Press any key to return")),
        ];

        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightBlue)),
        )
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let (score, best, new_record) = snapshot
            .last_run
            .map(|run| (run.score, run.best, run.new_record))
            .unwrap_or_default();

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(best.to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        if new_record {
            let color = if self.pulse() { Color::LightYellow } else { Color::Yellow };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "NEW HIGH SCORE!",
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            key("[R]"),
            text(" Restart  "),
            key("[H]"),
            text(" High Scores  "),
            key("[Esc]"),
            text(" Menu"),
        ]));

        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let mut spans = Vec::new();

        if snapshot.screen == ScreenKind::Playing {
            for effect in &snapshot.effects {
                spans.push(Span::styled(
                    format!("{} {} ", power_up_glyph(effect.kind).trim_end(), effect.kind.label()),
                    Style::default().fg(power_up_color(effect.kind)),
                ));
                spans.push(Span::styled(
                    format!("{}  ", effect.remaining_duration),
                    Style::default().fg(Color::White),
                ));
            }
            spans.extend([
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Esc", Style::default().fg(Color::Red)),
                Span::raw(" menu"),
            ]);
        } else {
            spans.extend([
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]);
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
