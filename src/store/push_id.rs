//! Push id generation.
//!
//! Push ids are 20 characters: 8 characters of millisecond timestamp
//! followed by 12 random characters, all drawn from an alphabet whose byte
//! order matches its value order. Ids therefore sort chronologically, and
//! ids generated within the same millisecond stay ordered because the
//! random part is incremented instead of redrawn.

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIME_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;

/// Bytes of a v4 uuid carrying the version and variant bits.
const FIXED_UUID_BYTES: [usize; 2] = [6, 8];

#[derive(Debug, Default)]
struct GeneratorState {
    last_millis: i64,
    last_random: [u8; RANDOM_CHARS],
}

/// Generator of chronologically sortable ids.
#[derive(Debug, Default)]
pub struct PushIdGenerator {
    state: Mutex<GeneratorState>,
}

impl PushIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an id for the current time.
    pub fn next_id(&self) -> String {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    /// Generate an id for the given millisecond timestamp.
    ///
    /// A timestamp earlier than the previous one is treated as the previous
    /// one, so a clock step backwards never breaks ordering.
    pub fn next_id_at(&self, millis: i64) -> String {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let millis = millis.max(state.last_millis);

        if millis == state.last_millis && state.last_millis != 0 {
            increment(&mut state.last_random);
        } else {
            state.last_random = random_digits(Uuid::new_v4().as_bytes());
        }
        state.last_millis = millis;

        let mut id = String::with_capacity(TIME_CHARS + RANDOM_CHARS);
        let mut time_chars = [0u8; TIME_CHARS];
        let mut remaining = millis;
        for slot in time_chars.iter_mut().rev() {
            *slot = PUSH_CHARS[(remaining % 64) as usize];
            remaining /= 64;
        }
        id.extend(time_chars.iter().map(|&c| c as char));
        id.extend(
            state
                .last_random
                .iter()
                .map(|&i| PUSH_CHARS[i as usize] as char),
        );
        id
    }
}

/// Turn uuid bytes into base-64 digits, skipping the fixed bytes.
fn random_digits(bytes: &[u8; 16]) -> [u8; RANDOM_CHARS] {
    let mut digits = [0u8; RANDOM_CHARS];
    let random = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| !FIXED_UUID_BYTES.contains(i))
        .map(|(_, byte)| byte % 64);
    for (slot, digit) in digits.iter_mut().zip(random) {
        *slot = digit;
    }
    digits
}

/// Add one to the random part, carrying from the right.
fn increment(random: &mut [u8; RANDOM_CHARS]) {
    for digit in random.iter_mut().rev() {
        if *digit == 63 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_shape() {
        let id = PushIdGenerator::new().next_id();
        assert_eq!(id.len(), 20);
        assert!(id.bytes().all(|b| PUSH_CHARS.contains(&b)));
    }

    #[test]
    fn test_same_millisecond_ids_increase() {
        let generator = PushIdGenerator::new();
        let ids: Vec<String> = (0..50).map(|_| generator.next_id_at(1_700_000_000_000)).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
        assert!(ids.iter().all(|id| id[..8] == ids[0][..8]));
    }

    #[test]
    fn test_later_timestamp_sorts_after() {
        let generator = PushIdGenerator::new();
        let first = generator.next_id_at(1_700_000_000_000);
        let second = generator.next_id_at(1_700_000_000_001);
        assert!(first < second);
    }

    #[test]
    fn test_clock_going_backwards_keeps_order() {
        let generator = PushIdGenerator::new();
        let first = generator.next_id_at(1_700_000_000_500);
        let second = generator.next_id_at(1_700_000_000_100);
        assert!(first < second);
    }

    #[test]
    fn test_random_digits_skip_version_and_variant() {
        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = i as u8 + 10;
        }
        bytes[6] = 0x40;
        bytes[8] = 0x80;
        assert_eq!(
            random_digits(&bytes),
            [10, 11, 12, 13, 14, 15, 17, 19, 20, 21, 22, 23]
        );
    }

    #[test]
    fn test_every_random_position_spans_the_alphabet() {
        let mut seen = [[false; 64]; RANDOM_CHARS];
        for _ in 0..2000 {
            let digits = random_digits(Uuid::new_v4().as_bytes());
            for (position, &digit) in digits.iter().enumerate() {
                seen[position][digit as usize] = true;
            }
        }
        for (position, values) in seen.iter().enumerate() {
            let distinct = values.iter().filter(|&&v| v).count();
            assert!(distinct > 32, "position {} only saw {} values", position, distinct);
        }
    }

    #[test]
    fn test_increment_carries() {
        let mut random = [63u8; RANDOM_CHARS];
        random[0] = 5;
        increment(&mut random);
        assert_eq!(random[0], 6);
        assert!(random[1..].iter().all(|&d| d == 0));
    }
}
