pub const MAX_PLAYER_NAME_LENGTH: usize = 20;

pub fn sanitize_player_name(name: &str, fallback: &str) -> String {
    let cleaned = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned.chars().take(MAX_PLAYER_NAME_LENGTH).collect()
}

pub fn bot_name(index: u64) -> String {
    format!("Bot-{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_names_are_collapsed_and_capped() {
        assert_eq!(sanitize_player_name("  Ada   Lovelace ", "Player"), "Ada Lovelace");
        assert_eq!(sanitize_player_name("   ", "Player"), "Player");
        assert_eq!(
            sanitize_player_name("abcdefghijklmnopqrstuvwxyz", "Player").len(),
            MAX_PLAYER_NAME_LENGTH
        );
    }

    #[test]
    fn bot_names_follow_spawn_order() {
        assert_eq!(bot_name(1), "Bot-1");
        assert_eq!(bot_name(12), "Bot-12");
    }
}
