//! Rendered views of the portfolio files (markdown and JSON previews).

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::files::FileType;
use super::files::PortfolioFile;
use super::files::CERTIFICATIONS_ID;
use super::files::PROJECTS_ID;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Error parsing {what} data.")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("No preview available for {0}.")]
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
    pub status: String,
    pub demo_url: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub credential_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownBlock {
    Heading { level: usize, text: String },
    Bullet(String),
    Quote(String),
    Text(String),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Markdown(Vec<MarkdownBlock>),
    Projects(Vec<Project>),
    Certifications(Vec<Certification>),
}

pub fn parse_projects(content: &str) -> Result<Vec<Project>, PreviewError> {
    serde_json::from_str(content).map_err(|source| PreviewError::Parse {
        what: "projects",
        source,
    })
}

pub fn parse_certifications(content: &str) -> Result<Vec<Certification>, PreviewError> {
    serde_json::from_str(content).map_err(|source| PreviewError::Parse {
        what: "certifications",
        source,
    })
}

pub fn parse_markdown(content: &str) -> Vec<MarkdownBlock> {
    content
        .lines()
        .map(|line| {
            let trimmed = line.trim_end();
            if trimmed.trim().is_empty() {
                return MarkdownBlock::Blank;
            }
            let hashes = trimmed.chars().take_while(|c| *c == '#').count();
            if hashes > 0 && trimmed[hashes..].starts_with(' ') {
                return MarkdownBlock::Heading {
                    level: hashes,
                    text: trimmed[hashes..].trim().to_string(),
                };
            }
            if let Some(rest) = trimmed.strip_prefix("- ") {
                return MarkdownBlock::Bullet(rest.to_string());
            }
            if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() > 1 {
                return MarkdownBlock::Quote(trimmed[1..trimmed.len() - 1].to_string());
            }
            MarkdownBlock::Text(trimmed.to_string())
        })
        .collect()
}

pub fn preview_for(file: &PortfolioFile) -> Result<Preview, PreviewError> {
    match (file.file_type, file.id) {
        (FileType::Markdown, _) => Ok(Preview::Markdown(parse_markdown(file.content))),
        (FileType::Json, PROJECTS_ID) => parse_projects(file.content).map(Preview::Projects),
        (FileType::Json, CERTIFICATIONS_ID) => {
            parse_certifications(file.content).map(Preview::Certifications)
        }
        _ => Err(PreviewError::Unsupported(file.name.to_string())),
    }
}
