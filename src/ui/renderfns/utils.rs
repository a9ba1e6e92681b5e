use ratatui::prelude::Color;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Get the display color for an elemental type
pub fn type_color(type_name: &str) -> Color {
  match type_name {
    "grass" | "bug" => Color::Green,
    "fire" => Color::Red,
    "water" | "ice" => Color::Blue,
    "electric" => Color::Yellow,
    "poison" | "ghost" | "psychic" => Color::Magenta,
    "ground" | "rock" | "fighting" => Color::LightRed,
    "flying" | "dragon" => Color::Cyan,
    _ => Color::White,
  }
}

/// Join items as an en-GB short conjunction list: "a, b and c".
///
/// Zero items give an empty string and a single item is returned unchanged.
pub fn join_conjunction<S: AsRef<str>>(items: &[S]) -> String {
  match items {
    [] => String::new(),
    [only] => only.as_ref().to_string(),
    [init @ .., last] => {
      let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
      format!("{} and {}", head.join(", "), last.as_ref())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("flabébé-white", 8), "flabé...");
  }

  #[test]
  fn test_type_color() {
    assert_eq!(type_color("grass"), Color::Green);
    assert_eq!(type_color("fire"), Color::Red);
    assert_eq!(type_color("poison"), Color::Magenta);
    assert_eq!(type_color("shadow"), Color::White);
  }

  #[test]
  fn test_join_empty() {
    let items: [&str; 0] = [];
    assert_eq!(join_conjunction(&items), "");
  }

  #[test]
  fn test_join_single() {
    assert_eq!(join_conjunction(&["grass"]), "grass");
  }

  #[test]
  fn test_join_pair() {
    assert_eq!(join_conjunction(&["grass", "poison"]), "grass and poison");
  }

  #[test]
  fn test_join_many_has_no_serial_comma() {
    assert_eq!(
      join_conjunction(&["fire", "flying", "dragon"]),
      "fire, flying and dragon"
    );
  }
}
