// Study Relay - prompt compiler
//
// Turns an action keyword plus the caller's content into the ordered part
// list sent to Gemini: [file?, instruction, user text?].

use crate::config::Variant;
use crate::models::{FileHandle, PromptPart};

// ── Instruction table ───────────────────────────────────────────────────────

const SUMMARIZE: &str = "You are an expert summarizer. Create a clear, concise summary. \
Do NOT provide intro text. Output ONLY the summary.";

const QUIZ: &str = "\
You are a teacher. Create a multiple-choice quiz (15 questions).\n\
Return a strict JSON Object (no markdown).\n\
Structure:\n\
{\n\
    \"message_success\": \"A funny, encouraging pun related to the topic for a high score.\",\n\
    \"message_failure\": \"A funny, roast-style encouraging pun related to the topic for a low score.\",\n\
    \"questions\": [\n\
        {\"question\": \"...\", \"options\": [\"A)...\", \"B)...\"], \"answer\": \"...\", \"why_is_it_correct\": \"...\"}\n\
    ]\n\
}";

const NOTES: &str = "\
You are an expert student tutor. Create 'Smart Revision Notes' using strict HTML5 formatting.\n\
- Use <h3> for main headings.\n\
- Use <ul> and <li> for bullet points (Do not use dashes or plain text indentation).\n\
- Use <strong> for key terms.\n\
- Do NOT use Markdown.\n\
- Do NOT include <html>, <head>, or <body> tags. Just return the content <div>.";

const QA_SHORT: &str = "Create 10-15 Short Answer Questions. Question followed strictly by \
1-2 sentence Answer. No conversational filler.";

const QA_LONG: &str = "Create 3 Deep-Dive Essay Questions with detailed model answers. No intro/outro.";

const QUESTIONS_ONLY: &str = "Create 10 Practice Questions. No answers. No filler.";

const EXPLAIN: &str = "You are a patient tutor. Explain this content in plain language for a \
student seeing it for the first time. Use short examples where they help. No intro/outro.";

const ASSIST: &str = "Assist with this content.";

/// Appended to every instruction whose action does not define its own
/// output contract.
pub const FORMATTING_RULES: &str =
    "\n\nFORMATTING: Use HTML tags (<strong>, <em>, <ul>, <li>, <br>). Do not use Markdown syntax.";

// ── Action keywords ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKeyword {
    Summarize,
    Quiz,
    Notes,
    QaShort,
    QaLong,
    QuestionsOnly,
    /// Text-only deployments.
    Explain,
    /// Fallback for anything unrecognized.
    Assist,
}

impl ActionKeyword {
    pub const ALL: [ActionKeyword; 8] = [
        ActionKeyword::Summarize,
        ActionKeyword::Quiz,
        ActionKeyword::Notes,
        ActionKeyword::QaShort,
        ActionKeyword::QaLong,
        ActionKeyword::QuestionsOnly,
        ActionKeyword::Explain,
        ActionKeyword::Assist,
    ];

    /// Parse the wire keyword. Never fails: unknown keywords (and `explain`
    /// outside the text-only variant) fall back to [`ActionKeyword::Assist`].
    pub fn parse(keyword: &str, variant: Variant) -> Self {
        match keyword {
            "summarize" => ActionKeyword::Summarize,
            "quiz" => ActionKeyword::Quiz,
            "notes" => ActionKeyword::Notes,
            "qa-short" => ActionKeyword::QaShort,
            "qa-long" => ActionKeyword::QaLong,
            "questions-only" => ActionKeyword::QuestionsOnly,
            "explain" if variant == Variant::Text => ActionKeyword::Explain,
            _ => ActionKeyword::Assist,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKeyword::Summarize => "summarize",
            ActionKeyword::Quiz => "quiz",
            ActionKeyword::Notes => "notes",
            ActionKeyword::QaShort => "qa-short",
            ActionKeyword::QaLong => "qa-long",
            ActionKeyword::QuestionsOnly => "questions-only",
            ActionKeyword::Explain => "explain",
            ActionKeyword::Assist => "assist",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            ActionKeyword::Summarize => SUMMARIZE,
            ActionKeyword::Quiz => QUIZ,
            ActionKeyword::Notes => NOTES,
            ActionKeyword::QaShort => QA_SHORT,
            ActionKeyword::QaLong => QA_LONG,
            ActionKeyword::QuestionsOnly => QUESTIONS_ONLY,
            ActionKeyword::Explain => EXPLAIN,
            ActionKeyword::Assist => ASSIST,
        }
    }

    /// `quiz` returns JSON and `notes` carries its own HTML rules, so the
    /// generic formatting block must stay out of both.
    pub fn suppresses_formatting(self) -> bool {
        matches!(self, ActionKeyword::Quiz | ActionKeyword::Notes)
    }
}

impl std::fmt::Display for ActionKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Compilation ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    /// Base instruction, without formatting rules.
    pub text: &'static str,
    pub append_formatting: bool,
}

impl CompiledInstruction {
    /// Instruction text as sent to the model.
    pub fn render(&self) -> String {
        if self.append_formatting {
            format!("{}{}", self.text, FORMATTING_RULES)
        } else {
            self.text.to_string()
        }
    }
}

pub fn compile(action: ActionKeyword) -> CompiledInstruction {
    CompiledInstruction {
        text: action.instruction(),
        append_formatting: !action.suppresses_formatting(),
    }
}

/// Assemble the ordered part list. Empty text counts as no text.
pub fn build_parts(
    action: ActionKeyword,
    file: Option<&FileHandle>,
    text: Option<&str>,
) -> Vec<PromptPart> {
    let mut parts = Vec::with_capacity(3);

    if let Some(handle) = file {
        parts.push(PromptPart::file(handle));
    }

    parts.push(PromptPart::text(compile(action).render()));

    if let Some(text) = text.filter(|t| !t.is_empty()) {
        parts.push(PromptPart::text(format!("\nUSER INPUT: \"{}\"", text)));
    }

    parts
}
