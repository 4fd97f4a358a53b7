use rand::Rng;

use crate::quran::{SurahCatalog, SurahRecord};

/// One random draw: a surah and a verse inside it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerseChoice<'a> {
    /// Position in the catalog
    pub index: usize,
    pub surah: &'a SurahRecord,
    pub ayah: u32,
}

/// Uniform verse number in `1..=total`; a surah of one verse (or an
/// unknown count) always yields 1.
pub fn pick_ayah<R: Rng + ?Sized>(total: u32, rng: &mut R) -> u32 {
    if total > 1 {
        rng.gen_range(1..=total)
    } else {
        1
    }
}

/// Uniform surah, then uniform verse within it. Repeats are allowed.
pub fn pick_verse<'a, R: Rng + ?Sized>(catalog: &'a SurahCatalog, rng: &mut R) -> Option<VerseChoice<'a>> {
    if catalog.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..catalog.len());
    let surah = catalog.get(index)?;
    Some(VerseChoice {
        index,
        surah,
        ayah: pick_ayah(surah.total_ayah(), rng),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_single_verse_surah_always_one() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            assert_eq!(pick_ayah(1, &mut rng), 1);
            assert_eq!(pick_ayah(0, &mut rng), 1);
        }
    }

    #[test]
    fn test_every_verse_reachable_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let total = 7;
        let seen: HashSet<u32> = (0..2_000).map(|_| pick_ayah(total, &mut rng)).collect();
        assert_eq!(seen, (1..=total).collect::<HashSet<_>>());
    }

    #[test]
    fn test_pick_verse_respects_surah_length() {
        let catalog = SurahCatalog::new(vec![
            SurahRecord {
                total_ayah: Some(1),
                ..Default::default()
            },
            SurahRecord {
                total_ayah: Some(286),
                ..Default::default()
            },
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut indices = HashSet::new();

        for _ in 0..500 {
            let choice = pick_verse(&catalog, &mut rng).unwrap();
            indices.insert(choice.index);
            assert_eq!(choice.surah.number() as usize, choice.index + 1);
            assert!(choice.ayah >= 1 && choice.ayah <= choice.surah.total_ayah());
            if choice.index == 0 {
                assert_eq!(choice.ayah, 1);
            }
        }
        assert_eq!(indices.len(), 2);
    }

    #[test]
    fn test_empty_catalog_yields_nothing() {
        let catalog = SurahCatalog::new(Vec::new());
        assert!(pick_verse(&catalog, &mut StdRng::seed_from_u64(0)).is_none());
    }
}
