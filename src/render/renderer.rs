use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::collections::HashSet;

use crate::game::{GridState, Position};
use crate::metrics::GameMetrics;

/// Which key bindings the footer advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    Human,
    Agent,
}

/// Draws a read-only game state
///
/// Each board cell of `cell_size` units becomes one two-character terminal cell.
pub struct Renderer {
    title: String,
    controls: Controls,
}

impl Renderer {
    pub fn new(title: impl Into<String>, controls: Controls) -> Self {
        Self {
            title: title.into(),
            controls,
        }
    }

    pub fn render(&self, frame: &mut Frame, state: &GridState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], state, metrics);
        frame.render_widget(stats, chunks[0]);

        if state.is_alive {
            let grid = self.render_grid(chunks[1], state);
            frame.render_widget(grid, chunks[1]);
        } else {
            let game_over = self.render_game_over(chunks[1], state);
            frame.render_widget(game_over, chunks[1]);
        }

        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, _area: Rect, state: &GridState) -> Paragraph<'_> {
        let body: HashSet<Position> = state.snake.body_segments().iter().copied().collect();
        let head = state.snake.head();
        let cell = state.cell_size;

        let mut lines = Vec::new();

        for row in 0..state.height / cell {
            let mut spans = Vec::new();

            for col in 0..state.width / cell {
                let pos = Position::new(col * cell, row * cell);

                let span = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&pos) {
                    Span::styled("■ ", Style::default().fg(Color::Green))
                } else if state.fruit == Some(pos) {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("  ", Style::default().bg(Color::Black))
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(format!(" {} ", self.title)),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, _area: Rect, state: &GridState, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Steps: ", label),
            Span::styled(state.steps.to_string(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, _area: Rect, state: &GridState) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);

        let spans = match self.controls {
            Controls::Human => vec![
                Span::styled("↑↓←→", key),
                Span::raw(" or "),
                Span::styled("WASD", key),
                Span::raw(" to move | "),
                Span::styled("Space", key),
                Span::raw(" pause | "),
                Span::styled("R", key),
                Span::raw(" restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ],
            Controls::Agent => vec![
                Span::styled("Space", key),
                Span::raw(" pause | "),
                Span::styled("R", key),
                Span::raw(" restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ],
        };

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new("Snake", Controls::Human)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(renderer: &Renderer, state: &GridState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let metrics = GameMetrics::new();

        terminal
            .draw(|frame| renderer.render(frame, state, &metrics))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn small_state() -> GridState {
        let snake = Snake::new(Position::new(50, 50), Direction::Right, 3, 10);
        GridState::new(snake, Some(Position::new(10, 10)), 100, 100, 10)
    }

    #[test]
    fn test_renders_snake_and_fruit() {
        let renderer = Renderer::new("Snake", Controls::Human);
        let state = small_state();

        let screen = draw(&renderer, &state);

        assert!(screen.contains("Score:"));
        assert!(screen.contains("Snake"));
        assert_eq!(screen.matches('■').count(), 3);
        assert_eq!(screen.matches('●').count(), 1);
    }

    #[test]
    fn test_renders_game_over() {
        let renderer = Renderer::new("Agent", Controls::Agent);
        let mut state = small_state();
        state.is_alive = false;

        let screen = draw(&renderer, &state);

        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("pause"));
    }

    #[test]
    fn test_human_footer_lists_every_binding() {
        let renderer = Renderer::new("Snake", Controls::Human);

        let screen = draw(&renderer, &small_state());

        for hint in ["WASD", "Space", "pause", "restart", "quit"] {
            assert!(screen.contains(hint), "footer is missing {:?}", hint);
        }
    }

    #[test]
    fn test_render_leaves_state_untouched() {
        let renderer = Renderer::default();
        let state = small_state();
        let before = state.clone();

        draw(&renderer, &state);

        assert_eq!(state, before);
    }
}
