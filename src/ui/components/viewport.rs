/// Fixed-height window over a list of rendered lines.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    lines: Vec<String>,
    y_offset: usize,
    width: u16,
    height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Replace the content, keeping the offset in range
    pub fn set_content(&mut self, content: &str) {
        self.lines = if content.is_empty() {
            Vec::new()
        } else {
            content.split('\n').map(str::to_string).collect()
        };
        self.y_offset = self.y_offset.min(self.max_offset());
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.y_offset = self.y_offset.min(self.max_offset());
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height as usize)
    }

    pub fn at_bottom(&self) -> bool {
        self.y_offset >= self.max_offset()
    }

    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_offset();
    }

    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.y_offset = self.y_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.y_offset = (self.y_offset + lines).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.scroll_up((self.height as usize).max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down((self.height as usize).max(1));
    }

    /// Lines currently inside the window
    pub fn visible_lines(&self) -> &[String] {
        let start = self.y_offset.min(self.lines.len());
        let end = (start + self.height as usize).min(self.lines.len());
        &self.lines[start..end]
    }

    /// Visible lines joined for display
    pub fn view(&self) -> String {
        self.visible_lines().join("\n")
    }
}
