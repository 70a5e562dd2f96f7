//! The extraction instruction sent to the summarization backend

use crate::summary::Section;

/// Bumped whenever the requested structure changes
pub const PROMPT_VERSION: u32 = 1;

fn section_guidance(section: Section) -> &'static str {
    match section {
        Section::CurrentApproach => "The implementation approach that has been chosen. Be specific.",
        Section::RejectedApproaches => {
            "Every approach that was considered and rejected, with the reason.\n\
             Format each as: \"- [REJECTED] <approach>: <why it was rejected>\"\n\
             Be exhaustive. Anything tried and abandoned belongs here."
        }
        Section::KeyDecisions => {
            "Numbered list of concrete decisions, each as \"<decision>: <rationale>\"."
        }
        Section::HardConstraints => {
            "Bulleted list of technical requirements, non-negotiables and environment constraints."
        }
        Section::DoNots => "Bulleted list of specific things NOT to do, derived from the above.",
        Section::CurrentState => "What has been built or decided so far, and what remains.",
    }
}

/// Build the full prompt for a rendered conversation
pub fn build_prompt(conversation: &str, cwd: &str) -> String {
    let mut prompt = format!(
        "You are preserving design context before a context window compaction event.\n\
         \n\
         Project: {cwd}\n\
         \n\
         Conversation history:\n\
         ===\n\
         {conversation}\n\
         ===\n\
         \n\
         Produce a structured \"Design Decisions & Anti-Regression Guide\".\n\
         Rejected approaches matter most: losing them is the main cause of \
         regressions after compaction.\n\
         \n\
         Use exactly these six markdown headings, in this order, and nothing else \
         at heading level. Write \"None.\" under a heading with nothing to report.\n"
    );

    for section in Section::ALL {
        prompt.push_str(&format!(
            "\n## {}\n{}\n",
            section.heading(),
            section_guidance(section)
        ));
    }

    prompt.push_str("\nKeep each section concise but complete.\n");
    prompt
}
