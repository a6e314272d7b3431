//! Fixed prompt templates sent to the model for each target.

use crate::target::Target;

/// A rendered prompt for one target, consumed by exactly one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub target: Target,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(target: Target, user_prompt: &str) -> Self {
        let prompt = match target {
            Target::Code => build_code_prompt(user_prompt),
            Target::Documentation => build_readme_prompt(user_prompt),
        };
        Self { target, prompt }
    }

    /// Both requests for one submit, code first.
    pub fn pair(user_prompt: &str) -> [GenerationRequest; 2] {
        Target::all().map(|target| GenerationRequest::new(target, user_prompt))
    }
}

pub fn build_code_prompt(user_prompt: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("Please generate complete, functional Python code based on:\n");
    prompt.push_str(user_prompt);
    prompt.push_str("\n\nRequirements:\n");
    prompt.push_str("1. Provide ONLY the complete Python code\n");
    prompt.push_str("2. No explanations or comments outside the code\n");
    prompt.push_str("3. Include all necessary imports\n");
    prompt.push_str("4. Add # -*- coding: utf-8 -*- at the top\n");
    prompt.push_str("5. Ensure PEP 8 compliance");

    prompt
}

pub fn build_readme_prompt(user_prompt: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("Create a professional README.md for a Python project that:\n");
    prompt.push_str(user_prompt);
    prompt.push_str("\n\nInclude these sections:\n");
    for heading in README_SECTIONS {
        prompt.push_str(heading);
        prompt.push('\n');
    }
    prompt.push_str("\nFormat with proper Markdown syntax and make it comprehensive.");

    prompt
}

const README_SECTIONS: [&str; 7] = [
    "# Project Title",
    "## Description",
    "## Features",
    "## Installation",
    "## Usage",
    "## Dependencies",
    "## License (MIT)",
];
