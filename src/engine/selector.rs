use rand::Rng;

use crate::engine::ChallengeKind;

/// Pick the next challenge kind uniformly, never repeating `last`.
pub fn select<R: Rng + ?Sized>(last: Option<ChallengeKind>, rng: &mut R) -> ChallengeKind {
    let eligible: Vec<ChallengeKind> = ChallengeKind::ALL
        .into_iter()
        .filter(|&kind| Some(kind) != last)
        .collect();
    eligible[rng.gen_range(0..eligible.len())]
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_never_repeats_previous_kind() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut last = None;
        for _ in 0..1000 {
            let kind = select(last, &mut rng);
            assert_ne!(Some(kind), last);
            last = Some(kind);
        }
    }

    #[test]
    fn test_first_pick_can_be_any_kind() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut seen = HashMap::new();
        for _ in 0..400 {
            *seen.entry(select(None, &mut rng)).or_insert(0) += 1;
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_excluding_one_leaves_three_roughly_even() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut seen: HashMap<ChallengeKind, u32> = HashMap::new();
        for _ in 0..3000 {
            *seen.entry(select(Some(ChallengeKind::RhythmTap), &mut rng)).or_insert(0) += 1;
        }
        assert_eq!(seen.len(), 3);
        assert!(!seen.contains_key(&ChallengeKind::RhythmTap));
        for &count in seen.values() {
            assert!((800..1200).contains(&count), "skewed selection: {seen:?}");
        }
    }
}
