use tui::style::Color;

/// Project status. The tracker recognizes four values; anything else found
/// in the worksheet is carried through as `Other` and gets no progress value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    NotStarted,
    InProgress,
    OnHold,
    Completed,
    Other(String),
}

/// The four selectable statuses, in form and filter order.
pub const STATUS_CHOICES: [Status; 4] = [
    Status::NotStarted,
    Status::InProgress,
    Status::OnHold,
    Status::Completed,
];

impl Status {
    /// Parse a raw worksheet value: trim, title-case, then match against the
    /// fixed set. Unrecognized values keep their normalized form.
    pub fn parse(raw: &str) -> Self {
        let normalized = title_case(raw.trim());
        match normalized.as_str() {
            "Not Started" => Status::NotStarted,
            "In Progress" => Status::InProgress,
            "On Hold" => Status::OnHold,
            "Completed" => Status::Completed,
            _ => Status::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::OnHold => "On Hold",
            Status::Completed => "Completed",
            Status::Other(s) => s,
        }
    }

    /// Fixed progress mapping. `None` for statuses outside the fixed set.
    pub fn progress(&self) -> Option<u8> {
        match self {
            Status::NotStarted => Some(0),
            Status::InProgress => Some(50),
            Status::OnHold => Some(25),
            Status::Completed => Some(100),
            Status::Other(_) => None,
        }
    }

    pub fn hex_color(&self) -> &'static str {
        match self {
            Status::NotStarted => "#636E72",
            Status::InProgress => "#0984E3",
            Status::OnHold => "#FD9644",
            Status::Completed => "#00B894",
            Status::Other(_) => "#B2BEC3",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Status::NotStarted => Color::Rgb(0x63, 0x6E, 0x72),
            Status::InProgress => Color::Rgb(0x09, 0x84, 0xE3),
            Status::OnHold => Color::Rgb(0xFD, 0x96, 0x44),
            Status::Completed => Color::Rgb(0x00, 0xB8, 0x94),
            Status::Other(_) => Color::Rgb(0xB2, 0xBE, 0xC3),
        }
    }
}

/// Capitalize the first letter of each whitespace-separated word and
/// lowercase the rest.
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_normalizes_whitespace_and_case() {
        assert_eq!(Status::parse("  in progress "), Status::InProgress);
        assert_eq!(Status::parse("COMPLETED"), Status::Completed);
        assert_eq!(Status::parse("on  hold"), Status::OnHold);
        assert_eq!(Status::parse("not started"), Status::NotStarted);
    }

    #[test]
    fn parse_keeps_unknown_values() {
        assert_eq!(
            Status::parse(" cancelled "),
            Status::Other("Cancelled".to_string())
        );
    }

    #[test]
    fn progress_follows_fixed_mapping() {
        assert_eq!(Status::NotStarted.progress(), Some(0));
        assert_eq!(Status::OnHold.progress(), Some(25));
        assert_eq!(Status::InProgress.progress(), Some(50));
        assert_eq!(Status::Completed.progress(), Some(100));
    }

    #[test]
    fn unknown_status_has_no_progress() {
        assert_eq!(Status::Other("Cancelled".to_string()).progress(), None);
    }
}
