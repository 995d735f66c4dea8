//! Domain factories for creating identifiers and fallback identities.

use rand::{Rng, seq::SliceRandom};

use super::value_object::{MessageId, SessionId};

/// Avatar used when the client does not send one
pub const DEFAULT_AVATAR: &str = "🤖";

const NAME_ADJECTIVES: [&str; 6] = ["Mysterious", "Happy", "Pensive", "Brave", "Clever", "Curious"];
const NAME_NOUNS: [&str; 6] = ["Visitor", "Traveler", "Thinker", "Explorer", "Dreamer", "Observer"];

/// Factory for generating MessageId instances.
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// Generate a new MessageId with a random UUID v4.
    pub fn generate() -> MessageId {
        MessageId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating SessionId instances.
pub struct SessionIdFactory;

impl SessionIdFactory {
    pub fn generate() -> SessionId {
        SessionId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for fallback display names.
///
/// Names look like `CuriousExplorer_4821`: one adjective, one noun and a
/// four-digit suffix. The entropy source is passed in so callers control
/// determinism.
pub struct DisplayNameFactory;

impl DisplayNameFactory {
    pub fn generate<R: Rng>(rng: &mut R) -> String {
        let adjective = NAME_ADJECTIVES.choose(rng).copied().unwrap_or("Mysterious");
        let noun = NAME_NOUNS.choose(rng).copied().unwrap_or("Visitor");
        let suffix: u16 = rng.gen_range(1000..=9999);
        format!("{adjective}{noun}_{suffix}")
    }
}
