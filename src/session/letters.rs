use icu_normalizer::ComposingNormalizerBorrowed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterSlot {
    pub ch: char,
    pub solved: bool,
}

/// Trim, compose to NFC and uppercase a raw target word.
pub fn normalize_target(raw: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc().normalize(raw.trim());
    nfc.to_uppercase()
}

/// Uppercase a single key press, keeping it only if it stays one character.
pub fn normalize_key(ch: char) -> Option<char> {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(first), None) => Some(first),
        _ => None,
    }
}

pub fn slots_for(word: &str) -> Vec<LetterSlot> {
    word.chars()
        .map(|ch| LetterSlot { ch, solved: false })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_uppercases() {
        assert_eq!(normalize_target("  ada lovelace \n"), "ADA LOVELACE");
    }

    #[test]
    fn test_normalize_composes_combining_marks() {
        // "n" + COMBINING TILDE
        let decomposed = "n\u{0303}and\u{0075}\u{0301}";
        assert_eq!(normalize_target(decomposed), "ÑANDÚ");
        assert_eq!(normalize_target(decomposed).chars().count(), 5);
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key('a'), Some('A'));
        assert_eq!(normalize_key('ñ'), Some('Ñ'));
        assert_eq!(normalize_key('7'), Some('7'));
        assert_eq!(normalize_key('ß'), None);
    }

    #[test]
    fn test_slots_start_unsolved() {
        let slots = slots_for("AB");
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| !s.solved));
        assert_eq!(slots[1].ch, 'B');
    }
}
