// server/src/services/prompt.rs

//! The shopping-assistant prompt: catalog context plus the user's message.

/// One line per product: `name: description`, or just `name` when there is no description.
pub fn build_catalog_context(pairs: &[(String, Option<String>)]) -> String {
  pairs
    .iter()
    .map(|(name, description)| match description.as_deref() {
      Some(description) if !description.is_empty() => format!("{}: {}", name, description),
      _ => name.clone(),
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn build_chat_prompt(catalog: &str, user_message: &str) -> String {
  format!(
    r#"
You are UpLyft Assistant 🤖🛍️, a witty and upbeat shopping helper.

This is the UpLyft product catalog:
--- CATALOG START ---
{catalog}
--- CATALOG END ---

Guidelines:
1. When the user asks about a product (or anything close to one), answer from the catalog with a fun tone and emojis.
2. When the question is off-topic, reply playfully 🤪 and steer back to the products. Never call the question invalid and never say you can't help.
3. When unsure, make a cheerful guess and gently redirect.
4. Stay confident, charming and never boring 😄

Example:
User: do you sell watches?
Assistant: ⌚ I wish we did! No watches here yet. Want to see what's hot in the current collection? 🔥

Now answer this:

User: {user_message}
Assistant:
"#
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn catalog_lines_skip_missing_descriptions() {
    let pairs = vec![
      ("Blue Mug".to_string(), None),
      ("Large Mug".to_string(), Some("Ceramic, 350 ml".to_string())),
      ("Sticker".to_string(), Some(String::new())),
    ];
    assert_eq!(build_catalog_context(&pairs), "Blue Mug\nLarge Mug: Ceramic, 350 ml\nSticker");
    assert_eq!(build_catalog_context(&[]), "");
  }

  #[test]
  fn prompt_embeds_catalog_and_message() {
    let prompt = build_chat_prompt("Blue Mug", "got any mugs?");
    assert!(prompt.contains("--- CATALOG START ---\nBlue Mug\n--- CATALOG END ---"));
    assert!(prompt.trim_end().ends_with("User: got any mugs?\nAssistant:"));
  }
}
