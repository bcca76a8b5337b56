use chrono::Utc;
use rand::Rng;

/// Generates the human-traceable reference code a resident writes on the
/// bank transfer form. The format encodes the submission date, a fragment
/// of the submitter identity, a fragment of the linked due (when present)
/// and a random disambiguator:
///
/// `TRF-20260807-AB12-X7K9QF` or `TRF-20260807-AB12-X7K9QF-D4C2`
///
/// The store's uniqueness constraint on the code remains the ultimate
/// guard against collisions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ReferenceCodeProvider: Send + Sync {
    fn generate<'a>(&self, user_id: &str, due_id: Option<&'a str>) -> String;
}

/// Random-disambiguator implementation of `ReferenceCodeProvider`
pub struct RandomReferenceCodeProvider {
    prefix: String,
}

const DISAMBIGUATOR_LEN: usize = 6;
const FRAGMENT_LEN: usize = 4;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

impl RandomReferenceCodeProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ReferenceCodeProvider for RandomReferenceCodeProvider {
    fn generate<'a>(&self, user_id: &str, due_id: Option<&'a str>) -> String {
        let date = Utc::now().format("%Y%m%d");
        let user_fragment = id_fragment(user_id);
        let disambiguator = random_disambiguator();

        match due_id {
            Some(due_id) => format!(
                "{}-{}-{}-{}-{}",
                self.prefix,
                date,
                user_fragment,
                disambiguator,
                id_fragment(due_id)
            ),
            None => format!(
                "{}-{}-{}-{}",
                self.prefix, date, user_fragment, disambiguator
            ),
        }
    }
}

/// Trailing alphanumeric characters of an entity ID, uppercased
fn id_fragment(id: &str) -> String {
    let alnum: Vec<char> = id.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let start = alnum.len().saturating_sub(FRAGMENT_LEN);
    alnum[start..].iter().collect::<String>().to_ascii_uppercase()
}

fn random_disambiguator() -> String {
    let mut rng = rand::thread_rng();
    (0..DISAMBIGUATOR_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_format_without_due() {
        let provider = RandomReferenceCodeProvider::new("TRF");
        let code = provider.generate("user-ab12", None);

        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "TRF");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2], "AB12");
        assert_eq!(parts[3].len(), DISAMBIGUATOR_LEN);
    }

    #[test]
    fn test_code_format_with_due() {
        let provider = RandomReferenceCodeProvider::new("TRF");
        let code = provider.generate("user-ab12", Some("due-77xy"));

        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[4], "77XY");
    }

    #[test]
    fn test_short_ids_use_available_characters() {
        let provider = RandomReferenceCodeProvider::new("TRF");
        let code = provider.generate("u1", None);
        let parts: Vec<&str> = code.split('-').collect();
        assert_eq!(parts[2], "U1");
    }

    #[test]
    fn test_codes_are_disambiguated_for_same_user_and_day() {
        let provider = RandomReferenceCodeProvider::new("TRF");
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            assert!(seen.insert(provider.generate("user-1", None)));
        }
    }
}
