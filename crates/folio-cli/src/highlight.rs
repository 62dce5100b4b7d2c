use std::collections::HashMap;
use std::sync::OnceLock;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::Theme;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxReference;
use syntect::parsing::SyntaxSet;

use folio_core::files::FileType;
use folio_core::files::PortfolioFile;
use folio_core::state::UiTheme;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn get_syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn get_theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn syntect_theme_name(theme: UiTheme) -> &'static str {
    match theme {
        UiTheme::Dark => "base16-ocean.dark",
        UiTheme::Light => "InspiredGitHub",
        UiTheme::Monokai => "base16-mocha.dark",
    }
}

fn syntect_theme(theme: UiTheme) -> Option<&'static Theme> {
    let themes = &get_theme_set().themes;
    themes
        .get(syntect_theme_name(theme))
        .or_else(|| themes.values().next())
}

/// The default syntax set has no TypeScript grammar; JavaScript is close enough.
fn syntax_for(file_type: FileType) -> &'static SyntaxReference {
    let ps = get_syntax_set();
    let by_ext = |ext: &str| ps.find_syntax_by_extension(ext);
    let found = match file_type {
        FileType::Markdown => by_ext("md"),
        FileType::Json => by_ext("json"),
        FileType::TypeScript => by_ext("ts").or_else(|| by_ext("js")),
        FileType::Log => None,
    };
    found.unwrap_or_else(|| ps.find_syntax_plain_text())
}

pub fn highlight(content: &str, file_type: FileType, theme: UiTheme) -> Vec<Line<'static>> {
    let ps = get_syntax_set();
    let Some(syntect_theme) = syntect_theme(theme) else {
        return content.lines().map(|line| Line::from(line.to_string())).collect();
    };
    let mut h = HighlightLines::new(syntax_for(file_type), syntect_theme);

    content
        .lines()
        .map(|line| {
            // Newline-aware grammars expect the terminator.
            let with_newline = format!("{line}\n");
            match h.highlight_line(&with_newline, ps) {
                Ok(ranges) => Line::from(
                    ranges
                        .into_iter()
                        .map(|(style, text)| {
                            let fg = Color::Rgb(
                                style.foreground.r,
                                style.foreground.g,
                                style.foreground.b,
                            );
                            Span::styled(
                                text.trim_end_matches('\n').to_string(),
                                Style::default().fg(fg),
                            )
                        })
                        .collect::<Vec<_>>(),
                ),
                Err(_) => Line::from(line.to_string()),
            }
        })
        .collect()
}

/// Highlighted lines per file and theme; the bundled files never change.
#[derive(Default)]
pub struct HighlightCache {
    entries: HashMap<(&'static str, UiTheme), Vec<Line<'static>>>,
}

impl HighlightCache {
    pub fn lines(&mut self, file: &PortfolioFile, theme: UiTheme) -> &[Line<'static>] {
        self.entries
            .entry((file.id, theme))
            .or_insert_with(|| highlight(file.content, file.file_type, theme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::files;
    use pretty_assertions::assert_eq;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn every_line_is_kept_verbatim() {
        for file in files::FILES.iter() {
            let lines = highlight(file.content, file.file_type, UiTheme::Dark);
            let expected: Vec<&str> = file.content.lines().collect();
            let rendered: Vec<String> = lines.iter().map(plain).collect();
            assert_eq!(rendered, expected, "{}", file.name);
        }
    }

    #[test]
    fn typescript_gets_colored_spans() {
        let lines = highlight("const x = 1;", FileType::TypeScript, UiTheme::Monokai);
        assert!(lines[0].spans.len() > 1);
    }

    #[test]
    fn cache_reuses_entries_per_theme() {
        let mut cache = HighlightCache::default();
        let file = files::default_file();
        let dark = cache.lines(file, UiTheme::Dark).len();
        let light = cache.lines(file, UiTheme::Light).len();
        assert_eq!(dark, light);
        assert_eq!(cache.entries.len(), 2);
    }
}
