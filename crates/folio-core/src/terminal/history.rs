#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Success,
    Prompt,
    Error,
    Plain,
}

/// Presentation category of a history line. First match wins.
pub fn classify_line(line: &str, prompt_marker: &str) -> LineKind {
    if line.contains('>') {
        LineKind::Info
    } else if line.contains("DONE") {
        LineKind::Success
    } else if !prompt_marker.is_empty() && line.starts_with(prompt_marker) {
        LineKind::Prompt
    } else if line.contains("Command not found") {
        LineKind::Error
    } else {
        LineKind::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MARKER: &str = "visitor@";

    #[test]
    fn classification_follows_marker_precedence() {
        assert_eq!(classify_line("> building site...", MARKER), LineKind::Info);
        assert_eq!(
            classify_line("DONE compiled successfully in 1240ms", MARKER),
            LineKind::Success
        );
        assert_eq!(
            classify_line("visitor@portfolio:~$ ls", MARKER),
            LineKind::Prompt
        );
        assert_eq!(
            classify_line(
                "Command not found: vim. Type 'help' for available commands.",
                MARKER
            ),
            LineKind::Error
        );
        assert_eq!(classify_line("about.md", MARKER), LineKind::Plain);
    }

    #[test]
    fn info_marker_wins_over_prompt() {
        assert_eq!(
            classify_line("visitor@portfolio:~$ echo a>b", MARKER),
            LineKind::Info
        );
    }

}
