//! Prompt building functions for story LLM requests

use crate::domain::entities::Personality;

/// Rules of the improv game, sent as the system prompt for every story turn
pub const IMPROV_SYSTEM_INSTRUCTION: &str = "You are an expert improv comedian playing a game of 'Yes, And...'.
Your goal is to collaboratively build a story.
You MUST accept the previous parts of the story as fact and build upon them.
You MUST stay in character based on the personality provided to you.
You MUST only add one or two new sentences to the story.
Do NOT add any prefixes like your character name. Just output the story sentence(s).";

const EMPTY_STORY_PLACEHOLDER: &str = "(The story is just beginning...)";

/// Build the user prompt asking `personality` to continue the story
pub fn build_next_turn_prompt(story_so_far: &str, personality: &Personality) -> String {
    let story = if story_so_far.trim().is_empty() {
        EMPTY_STORY_PLACEHOLDER
    } else {
        story_so_far
    };

    format!(
        "Here is the story so far:\n---\n{}\n---\nNow, as the character \"{}\" whose personality is: \"{}\", continue the story.",
        story,
        personality.name(),
        personality.prompt()
    )
}

/// Build the system prompt for the editor's first-person recap.
///
/// Each personality prompt becomes one `- ` line of the blended persona.
pub fn build_summary_system_prompt(personality_prompts: &[String]) -> String {
    let traits = personality_prompts
        .iter()
        .map(|p| format!("- {}", p))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = String::new();
    prompt.push_str("You are a master storyteller with a complex, multifaceted personality. Your task is to narrate a sequence of events from a singular, first-person (\"I\") perspective.\n");
    prompt.push_str("Your personality is a seamless blend of the following characteristics:\n---\n");
    prompt.push_str(&traits);
    prompt.push_str("\n---\n\n");
    prompt.push_str("You will be given a block of raw, unordered text representing a series of events or thoughts. Your job is to synthesize this text into a single, coherent story passage, told through your unique, blended personality.\n\n");
    prompt.push_str("- Do not act as separate characters. You are one person who contains all these traits.\n");
    prompt.push_str("- Weave the different personality flavors into your narrative naturally.\n");
    prompt.push_str("- The final output must be a smooth, flowing story paragraph from a single \"I\" perspective.");
    prompt
}

pub fn build_summary_prompt(full_story: &str) -> String {
    format!(
        "Here are the raw story fragments. Narrate them as a single, first-person story using your blended personality:\n---\n{}\n---",
        full_story
    )
}
