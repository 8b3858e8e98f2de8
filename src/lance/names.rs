//! Display names derived from a member's flavor seed

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const GIVEN_NAMES: &[&str] = &[
    "Aldric", "Bertram", "Cedric", "Dunstan", "Edric", "Falk", "Gareth", "Hugh",
    "Ivo", "Jory", "Kenric", "Leofric", "Merek", "Norbert", "Osric", "Piers",
    "Quentin", "Roderick", "Sigurd", "Tobin", "Ulric", "Walter", "Wystan", "Yvo",
];

const BYNAMES: &[&str] = &[
    "the Tall", "Ironhand", "of the Marches", "Blackbrook", "the Younger", "Longshanks",
    "Redbeard", "the Quiet", "Stonewall", "of Ashford", "Halfhelm", "the Lucky",
];

/// Deterministic name for a seed; the same seed always yields the same name
pub fn display_name(seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let given = GIVEN_NAMES.choose(&mut rng).copied().unwrap_or("Nameless");
    let byname = BYNAMES.choose(&mut rng).copied().unwrap_or("the Unknown");
    format!("{} {}", given, byname)
}
