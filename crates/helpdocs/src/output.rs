//! Colored terminal output on stderr.

use console::{Style, Term};

/// How a line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Heading,
}

impl Tone {
    fn style(self) -> Option<Style> {
        match self {
            Self::Plain => None,
            Self::Success => Some(Style::new().green()),
            Self::Warning => Some(Style::new().yellow()),
            Self::Error => Some(Style::new().red()),
            Self::Heading => Some(Style::new().cyan().bold()),
        }
    }
}

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Write one line; write failures on stderr are ignored.
    pub(crate) fn line(&self, tone: Tone, msg: &str) {
        let _ = match tone.style() {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }

    /// Heading with a count followed by one indented bullet per item.
    /// Nothing is written for an empty list.
    pub(crate) fn list<I>(&self, tone: Tone, heading: &str, items: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        if items.len() == 0 {
            return;
        }
        self.line(tone, &format!("\n{heading} ({}):", items.len()));
        for item in items {
            self.line(tone, &format!("  - {}", item.as_ref()));
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(Tone::Success, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(Tone::Error, msg);
    }

    pub(crate) fn highlight(&self, msg: &str) {
        self.line(Tone::Heading, msg);
    }

    pub(crate) fn separator(&self) {
        self.info(&"-".repeat(60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_plain_lines_are_unstyled() {
        assert!(Tone::Plain.style().is_none());
        for tone in [Tone::Success, Tone::Warning, Tone::Error, Tone::Heading] {
            assert!(tone.style().is_some(), "{tone:?}");
        }
    }
}
