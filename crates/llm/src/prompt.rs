//! System prompt and provider message composition.

use crate::messages::{ChatMessage, ChatRole};

/// Only this many trailing history turns are forwarded to the provider.
pub(crate) const HISTORY_LIMIT: usize = 10;

/// Instruction text prepended as the first turn of every provider
/// conversation. Defines the two response modes of the culinary assistant:
/// strict JSON when ingredients are present, free text otherwise.
pub(crate) const SYSTEM_PROMPT: &str = r#"
You are a culinary assistant.
Your behavior depends on whether the user provides ingredients:

CASE 1: If the user provides ingredients
----------------------------------------
- Return ONLY valid JSON that matches the schema below—no prose, no Markdown.
- Propose 2–3 recipes that can be made primarily from the provided ingredients.
- You may add basic pantry items if missing: water, salt, pepper, oil, sugar, flour.
- Respect any dietary preferences, allergens, excluded ingredients, cuisine, and time limit.
- Provide cookingTime in minutes (integer).
- difficulty ∈ {"Easy","Medium","Hard"}.
- nutrition is PER SERVING; round to whole numbers; include calories (kcal), protein (g), carbs (g), fat (g).
- Use the requested units (metric or US).
- Keep steps concise, imperative.
- If servings provided, scale ingredient amounts accordingly.
- No nulls/undefined, no trailing commas, no comments.

JSON Schema (must match):
{
  "type": "object",
  "properties": {
    "recipes": {
      "type": "array",
      "minItems": 2,
      "maxItems": 3,
      "items": {
        "type": "object",
        "properties": {
          "name": {"type":"string"},
          "ingredients": {"type":"array","items":{"type":"string"}},
          "instructions": {"type":"array","items":{"type":"string"}},
          "cookingTime": {"type":"integer"},
          "difficulty": {"type":"string","enum":["Easy","Medium","Hard"]},
          "nutrition": {
            "type":"object",
            "properties": {
              "calories":{"type":"integer"},
              "protein":{"type":"integer"},
              "carbs":{"type":"integer"},
              "fat":{"type":"integer"}
            },
            "required":["calories","protein","carbs","fat"]
          }
        },
        "required":["name","ingredients","instructions","cookingTime","difficulty","nutrition"]
      }
    }
  },
  "required": ["recipes"]
}

CASE 2: If the user does NOT provide ingredients
------------------------------------------------
- Ignore the JSON schema.
- Respond in normal conversational text (natural language).
- Provide helpful cooking tips, general recipe ideas, or food-related advice.
"#;

/// Build the message sequence for a provider request: the system prompt
/// first, then the most recent history turns in their original order, then
/// the current user message.
pub(crate) fn compose(history: &[ChatMessage], message: &str) -> Vec<ChatMessage> {
    let recent = &history[history.len().saturating_sub(HISTORY_LIMIT)..];

    let mut messages = Vec::with_capacity(recent.len() + 2);

    messages.push(ChatMessage {
        role: ChatRole::System,
        content: SYSTEM_PROMPT.to_string(),
    });

    messages.extend_from_slice(recent);

    messages.push(ChatMessage {
        role: ChatRole::User,
        content: message.to_string(),
    });

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: ChatRole, content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role,
            content: content.into(),
        }
    }

    #[test]
    fn system_prompt_comes_first_and_user_message_last() {
        let history = vec![turn(ChatRole::User, "hi"), turn(ChatRole::Assistant, "hello")];
        let messages = compose(&history, "what can I cook?");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].content, "hi");
        assert_eq!(messages[2].content, "hello");
        assert_eq!(messages[3].role, ChatRole::User);
        assert_eq!(messages[3].content, "what can I cook?");
    }

    #[test]
    fn history_is_truncated_to_the_most_recent_ten_turns() {
        let history: Vec<_> = (0..15)
            .map(|i| turn(ChatRole::User, format!("turn {i}")))
            .collect();

        let messages = compose(&history, "latest");

        // system prompt + 10 history turns + current message
        assert_eq!(messages.len(), 12);
        assert_eq!(messages[0].role, ChatRole::System);

        // turns 5..=14 survive, in their original relative order
        for (offset, message) in messages[1..11].iter().enumerate() {
            assert_eq!(message.content, format!("turn {}", offset + 5));
        }

        assert_eq!(messages[11].content, "latest");
    }

    #[test]
    fn empty_history_yields_prompt_and_message_only() {
        let messages = compose(&[], "hello");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].content, "hello");
    }
}
