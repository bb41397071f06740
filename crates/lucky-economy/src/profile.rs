//! Player profile: generated three-word nicknames and name changes.

use chrono::{DateTime, Utc};
use lucky_types::Profile;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::EconomyError;

/// Shortest accepted free display name, in characters.
pub const MIN_DISPLAY_NAME_LEN: usize = 3;

/// Longest accepted free display name, in characters.
pub const MAX_DISPLAY_NAME_LEN: usize = 16;

/// Safe nickname vocabulary. All three slots draw from the same pool.
pub const NICK_WORDS: &[&str] = &[
    // colors
    "Amber", "Aqua", "Azure", "Beige", "Black", "Blue", "Bronze", "Coral", "Crimson", "Cyan",
    "Emerald", "Gold", "Gray", "Green", "Indigo", "Ivory", "Jade", "Lavender", "Lime",
    "Magenta", "Maroon", "Mint", "Navy", "Neon", "Olive", "Orange", "Peach", "Pink", "Plum",
    "Purple", "Red", "Rose", "Ruby", "Saffron", "Scarlet", "Silver", "Teal", "Turquoise",
    "Violet", "White", "Yellow",
    // adjectives
    "Agile", "Alert", "Bold", "Bright", "Calm", "Clever", "Crisp", "Daring", "Eager", "Fancy",
    "Fast", "Fierce", "Focused", "Gentle", "Grand", "Happy", "Icy", "Jolly", "Keen", "Kind",
    "Lucky", "Mighty", "Nimble", "Noble", "Patient", "Playful", "Proud", "Quick", "Rapid",
    "Ready", "Sharp", "Silent", "Smart", "Smooth", "Solid", "Steady", "Steel", "Sunny", "Swift",
    "Tidy", "Vivid", "Wise", "Zesty",
    // animals
    "Ant", "Bear", "Beaver", "Bee", "Bison", "Cat", "Cheetah", "Cobra", "Crane", "Crow", "Deer",
    "Dolphin", "Dragon", "Eagle", "Falcon", "Finch", "Fox", "Frog", "Gecko", "Hawk", "Horse",
    "Hound", "Koala", "Lion", "Lynx", "Mantis", "Moose", "Otter", "Owl", "Panda", "Panther",
    "Penguin", "Pigeon", "Puma", "Rabbit", "Raven", "Seal", "Shark", "Sparrow", "Tiger",
    "Turtle", "Whale", "Wolf", "Wren", "Yak", "Zebra",
    // objects
    "Anchor", "Arrow", "Beacon", "Blade", "Bolt", "Book", "Bridge", "Cannon", "Clock",
    "Compass", "Crystal", "Cube", "Disk", "Drone", "Engine", "Feather", "Flame", "Gadget",
    "Gear", "Globe", "Hammer", "Helmet", "Jet", "Key", "Lantern", "Laser", "Lens", "Magnet",
    "Mirror", "Needle", "Nova", "Orb", "Pixel", "Planet", "Prism", "Radar", "Rocket", "Shield",
    "Signal", "Socket", "Spark", "Sphere", "Star", "Stone", "Switch", "Tablet", "Tower",
    "Wheel", "Wing",
    // coding
    "Agent", "Algorithm", "Array", "Binary", "Branch", "Buffer", "Cache", "Class", "Cloud",
    "Code", "Commit", "Compiler", "Cookie", "Cursor", "Data", "Debug", "Deploy", "Docker",
    "Field", "Flux", "Frame", "Function", "Gateway", "Git", "Graph", "Hash", "Hook", "Index",
    "Kernel", "Lambda", "Library", "Linker", "Logic", "Loop", "Matrix", "Method", "Module",
    "Object", "Packet", "Parser", "Patch", "Pilot", "Pipeline", "Pointer", "Process",
    "Protocol", "Query", "Queue", "Script", "Server", "Stack", "Stream", "Syntax", "Tensor",
    "Thread", "Token", "Variable", "Vector",
];

/// A requested name change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NicknameUpdate {
    /// Three words from [`NICK_WORDS`].
    Parts {
        /// First word.
        part_a: String,
        /// Second word.
        part_b: String,
        /// Third word.
        part_c: String,
    },
    /// A free display name.
    DisplayName {
        /// Requested name, 3-16 characters of `[A-Za-z0-9_]`.
        display_name: String,
    },
}

fn pick_word(rng: &mut impl Rng) -> &'static str {
    NICK_WORDS.choose(rng).copied().unwrap_or("Lucky")
}

/// A generated profile of three random words.
pub fn random_profile(rng: &mut impl Rng, now: DateTime<Utc>) -> Profile {
    let a = pick_word(rng);
    let b = pick_word(rng);
    let c = pick_word(rng);
    Profile {
        nick_part_a: a.to_owned(),
        nick_part_b: b.to_owned(),
        nick_part_c: c.to_owned(),
        display_name: format!("{a} {b} {c}"),
        name_customized: false,
        updated_at: now,
    }
}

/// Whether `word` is in the nickname vocabulary.
pub fn is_nick_word(word: &str) -> bool {
    NICK_WORDS.contains(&word)
}

/// Check a free display name and return it trimmed.
///
/// # Errors
///
/// [`EconomyError::InvalidNickname`] when the length or character set is off.
pub fn validate_display_name(name: &str) -> Result<&str, EconomyError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(MIN_DISPLAY_NAME_LEN..=MAX_DISPLAY_NAME_LEN).contains(&len) {
        return Err(EconomyError::InvalidNickname {
            reason: format!("must be {MIN_DISPLAY_NAME_LEN}-{MAX_DISPLAY_NAME_LEN} characters"),
        });
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(EconomyError::InvalidNickname {
            reason: "only letters, digits and underscores are allowed".to_owned(),
        });
    }
    Ok(trimmed)
}

/// Apply `update` to `profile`. Nothing changes on error.
///
/// # Errors
///
/// [`EconomyError::InvalidNickname`] for an unknown word or a bad display name.
pub fn apply_nickname(profile: &mut Profile, update: &NicknameUpdate, now: DateTime<Utc>) -> Result<(), EconomyError> {
    match update {
        NicknameUpdate::Parts { part_a, part_b, part_c } => {
            for (slot, word) in [("A", part_a), ("B", part_b), ("C", part_c)] {
                if !is_nick_word(word) {
                    return Err(EconomyError::InvalidNickname {
                        reason: format!("invalid nickname part {slot}: {word}"),
                    });
                }
            }
            profile.nick_part_a.clone_from(part_a);
            profile.nick_part_b.clone_from(part_b);
            profile.nick_part_c.clone_from(part_c);
            profile.display_name = format!("{part_a} {part_b} {part_c}");
            profile.name_customized = false;
        }
        NicknameUpdate::DisplayName { display_name } => {
            let name = validate_display_name(display_name)?;
            profile.display_name = name.to_owned();
            profile.name_customized = true;
        }
    }
    profile.updated_at = now;
    Ok(())
}
