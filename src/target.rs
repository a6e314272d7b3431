/// One of the two kinds of output generated for every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Code,
    Documentation,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Code => "code",
            Target::Documentation => "documentation",
        }
    }

    pub fn all() -> [Target; 2] {
        [Target::Code, Target::Documentation]
    }

    /// Name used in failure messages ("Code generation failed: ...").
    pub fn display_name(&self) -> &'static str {
        match self {
            Target::Code => "Code",
            Target::Documentation => "README",
        }
    }

    pub fn pane_title(&self) -> &'static str {
        match self {
            Target::Code => "Generated Code",
            Target::Documentation => "Generated README.md",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Target::Code => "Your generated code will appear here...",
            Target::Documentation => "Your generated documentation will appear here...",
        }
    }
}
