use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Busy indicator for the status line. Visible only while a discussion turn
/// is in progress.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    busy: bool,
    status_text: String,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        if !busy {
            self.status_text.clear();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_text = status.into();
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.busy {
            return;
        }

        let spinner_frames = ["◐", "◓", "◑", "◒"];
        let spinner = spinner_frames[self.spinner_idx % spinner_frames.len()];

        let status_text = if self.status_text.is_empty() {
            "ディスカッション中…"
        } else {
            &self.status_text
        };

        let status = Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(status_text, Style::default().fg(Color::DarkGray)),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }
}
