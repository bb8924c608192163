use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq)]
pub enum Segment {
    Year,
    Month,
    Day,
}

/// Segmented editor for a calendar date field. Digits fill the active
/// segment; once it is full the value is applied only if it still forms a
/// real date, otherwise the input is dropped and the old date stays.
pub struct DateInput {
    pub date: NaiveDate,
    pub editing: bool,
    segment: Segment,
    buffer: String,
}

impl DateInput {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            segment: Segment::Year,
            buffer: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        self.segment = Segment::Year;
        self.buffer.clear();
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
        self.buffer.clear();
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.buffer.push(c);
                if self.buffer.len() == self.segment_width() {
                    self.apply_buffer();
                }
            }
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Right => self.next_segment(),
            KeyCode::Left => self.previous_segment(),
            _ => {}
        }
    }

    fn segment_width(&self) -> usize {
        match self.segment {
            Segment::Year => 4,
            Segment::Month | Segment::Day => 2,
        }
    }

    fn next_segment(&mut self) {
        self.segment = match self.segment {
            Segment::Year => Segment::Month,
            Segment::Month => Segment::Day,
            Segment::Day => Segment::Year,
        };
        self.buffer.clear();
    }

    fn previous_segment(&mut self) {
        self.segment = match self.segment {
            Segment::Year => Segment::Day,
            Segment::Month => Segment::Year,
            Segment::Day => Segment::Month,
        };
        self.buffer.clear();
    }

    fn apply_buffer(&mut self) {
        if let Ok(value) = self.buffer.parse::<u32>() {
            let candidate = match self.segment {
                Segment::Year => {
                    NaiveDate::from_ymd_opt(value as i32, self.date.month(), self.date.day())
                }
                Segment::Month => NaiveDate::from_ymd_opt(self.date.year(), value, self.date.day()),
                Segment::Day => NaiveDate::from_ymd_opt(self.date.year(), self.date.month(), value),
            };
            if let Some(date) = candidate {
                self.date = date;
            }
        }
        self.buffer.clear();
    }

    /// The field text shown in the form: plain ISO when idle, the active
    /// segment bracketed while editing.
    pub fn display(&self) -> String {
        if !self.editing {
            return self.date.format("%Y-%m-%d").to_string();
        }

        let marker = |placeholder: &str| {
            if self.buffer.is_empty() {
                format!("[{placeholder}]")
            } else {
                format!("[{}]", self.buffer)
            }
        };

        let year = format!("{:04}", self.date.year());
        let month = format!("{:02}", self.date.month());
        let day = format!("{:02}", self.date.day());

        match self.segment {
            Segment::Year => format!("{}-{month}-{day}", marker("YYYY")),
            Segment::Month => format!("{year}-{}-{day}", marker("MM")),
            Segment::Day => format!("{year}-{month}-{}", marker("DD")),
        }
    }
}
