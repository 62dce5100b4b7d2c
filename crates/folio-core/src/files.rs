use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Markdown,
    Json,
    TypeScript,
    Log,
}

impl FileType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Json => "JSON",
            Self::TypeScript => "TypeScript",
            Self::Log => "Log",
        }
    }

    /// File extension used to pick a syntax definition.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::TypeScript => "ts",
            Self::Log => "log",
        }
    }

    pub fn supports_preview(self) -> bool {
        matches!(self, Self::Markdown | Self::Json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortfolioFile {
    pub id: &'static str,
    pub name: &'static str,
    pub file_type: FileType,
    pub content: &'static str,
}

pub const ABOUT_ID: &str = "about.md";
pub const PROJECTS_ID: &str = "projects.json";
pub const CERTIFICATIONS_ID: &str = "certifications.json";

pub static FILES: [PortfolioFile; 5] = [
    PortfolioFile {
        id: ABOUT_ID,
        name: "about.md",
        file_type: FileType::Markdown,
        content: r#"# Alex Rivera
## Full Stack Developer

Full-stack developer building end-to-end web applications, from
interfaces people enjoy using to backends that stay up.

Focused on performance, clean code, and user-centric design.

### Quick Stats
- Based in: Lisbon, Portugal
- Favorite Stack: Rust, TypeScript, Postgres
- Hobbies: Mechanical keyboards, open source, hiking

"Code is like humor. When you have to explain it, it's bad.""#,
    },
    PortfolioFile {
        id: PROJECTS_ID,
        name: "projects.json",
        file_type: FileType::Json,
        content: r#"[
  {
    "name": "CloudScale AI",
    "description": "An enterprise-grade LLM orchestration platform.",
    "tech": ["Next.js", "Python", "Kubernetes"],
    "status": "Deployed",
    "demoUrl": "https://example.com/demo1",
    "videoUrl": "https://example.com/video1"
  },
  {
    "name": "EtherFlow",
    "description": "Real-time Ethereum gas price predictor and dashboard.",
    "tech": ["Web3.js", "Redis", "React"],
    "status": "Archived",
    "demoUrl": "https://example.com/demo2",
    "videoUrl": "https://example.com/video2"
  },
  {
    "name": "NexusOS",
    "description": "A browser-based operating system shell.",
    "tech": ["TypeScript", "WebAssembly", "SCSS"],
    "status": "Active",
    "demoUrl": "https://example.com/demo3",
    "videoUrl": "https://example.com/video3"
  }
]"#,
    },
    PortfolioFile {
        id: "skills.ts",
        name: "skills.ts",
        file_type: FileType::TypeScript,
        content: r#"export const skills: Skill[] = [
  {
    category: "Frontend",
    items: ["Next.js", "React", "Tailwind", "HTML", "CSS", "Figma"]
  },
  {
    category: "Backend",
    items: ["Rust", "Node.js", "Express", "PostgreSQL", "Prisma"]
  },
  {
    category: "Infrastructure",
    items: ["GitHub Actions", "Docker", "AWS", "Netlify", "Vercel"]
  }
];"#,
    },
    PortfolioFile {
        id: "experience.log",
        name: "experience.log",
        file_type: FileType::Log,
        content: r#"[2023-02-14] INFO: Built an event organizer platform with Next.js and Node.js.
[2024-01-08] INFO: Joined Northwind Labs as Full Stack Developer Intern.
[2024-02-28] DEBUG: Shipping full stack features with Next.js and Rust services.
[2024-06-16] WARN: Promoted to Full Stack Developer."#,
    },
    PortfolioFile {
        id: CERTIFICATIONS_ID,
        name: "certifications.json",
        file_type: FileType::Json,
        content: r#"[
  {
    "name": "Full Stack Developer",
    "issuer": "Road To Code",
    "date": "2023-07",
    "credentialUrl": "https://example.com/cert/full-stack"
  },
  {
    "name": "Node.js Backend Developer",
    "issuer": "Udemy",
    "date": "2024-05",
    "credentialUrl": "https://example.com/cert/node"
  },
  {
    "name": "Meta Frontend Developer",
    "issuer": "Meta",
    "date": "2022-08",
    "credentialUrl": "https://example.com/cert/meta-frontend"
  }
]"#,
    },
];

pub fn find(id: &str) -> Option<&'static PortfolioFile> {
    FILES.iter().find(|file| file.id == id)
}

pub fn default_file() -> &'static PortfolioFile {
    &FILES[0]
}

/// All file contents, used as grounding context for the chat assistant.
pub fn portfolio_context() -> String {
    FILES
        .iter()
        .map(|file| format!("File: {}\nContent:\n{}", file.name, file.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = FILES.iter().map(|file| file.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), FILES.len());
    }

    #[test]
    fn find_resolves_known_ids_only() {
        assert_eq!(find("skills.ts").map(|f| f.file_type), Some(FileType::TypeScript));
        assert!(find("secrets.env").is_none());
        assert_eq!(default_file().id, ABOUT_ID);
    }

    #[test]
    fn preview_only_for_markdown_and_json() {
        assert!(FileType::Markdown.supports_preview());
        assert!(FileType::Json.supports_preview());
        assert!(!FileType::TypeScript.supports_preview());
        assert!(!FileType::Log.supports_preview());
    }

    #[test]
    fn context_mentions_every_file() {
        let context = portfolio_context();
        for file in FILES {
            assert!(context.contains(&format!("File: {}", file.name)));
        }
    }
}
