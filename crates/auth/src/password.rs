//! Random password generation.
//!
//! The random source is injected (any [`rand::Rng`]), so callers pick
//! `thread_rng`, an OS RNG, or a seeded RNG in tests.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const NON_ALPHANUMERIC: &[u8] = b"!@#$%^&*()-_=+[]{};:,.?";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password length {length} is shorter than the {required} characters the options require")]
    LengthTooShort { length: usize, required: usize },

    #[error("{required} unique characters required but only {available} are available")]
    UniqueCharsUnsatisfiable { required: usize, available: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordOptions {
    pub length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
    pub required_unique_chars: usize,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 12,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
            required_unique_chars: 1,
        }
    }
}

impl PasswordOptions {
    /// Character classes that must each appear at least once.
    fn required_classes(&self) -> Vec<&'static [u8]> {
        [
            (self.require_lowercase, LOWERCASE),
            (self.require_uppercase, UPPERCASE),
            (self.require_digit, DIGITS),
            (self.require_non_alphanumeric, NON_ALPHANUMERIC),
        ]
        .into_iter()
        .filter_map(|(required, class)| required.then_some(class))
        .collect()
    }

    /// Characters the password is drawn from. With no class required, every
    /// class is allowed.
    fn alphabet(&self) -> Vec<u8> {
        let classes = self.required_classes();
        let classes = if classes.is_empty() {
            vec![LOWERCASE, UPPERCASE, DIGITS, NON_ALPHANUMERIC]
        } else {
            classes
        };
        classes.concat()
    }

    fn validate(&self, alphabet: &[u8]) -> Result<(), PasswordError> {
        let required = self.required_classes().len().max(self.required_unique_chars);
        if self.length < required {
            return Err(PasswordError::LengthTooShort {
                length: self.length,
                required,
            });
        }
        if alphabet.len() < self.required_unique_chars {
            return Err(PasswordError::UniqueCharsUnsatisfiable {
                required: self.required_unique_chars,
                available: alphabet.len(),
            });
        }
        Ok(())
    }
}

/// Generate a password satisfying `options`, drawing randomness from `rng`.
pub fn generate_password<R>(options: &PasswordOptions, rng: &mut R) -> Result<String, PasswordError>
where
    R: Rng + ?Sized,
{
    let alphabet = options.alphabet();
    options.validate(&alphabet)?;

    let mut chars: Vec<u8> = Vec::with_capacity(options.length);
    let mut used: HashSet<u8> = HashSet::new();

    // Classes are disjoint, so these picks are already distinct.
    for class in options.required_classes() {
        let c = class[rng.gen_range(0..class.len())];
        chars.push(c);
        used.insert(c);
    }

    while chars.len() < options.length {
        let remaining = options.length - chars.len();
        let missing_unique = options.required_unique_chars.saturating_sub(used.len());

        let c = if remaining <= missing_unique {
            let unused: Vec<u8> = alphabet.iter().copied().filter(|c| !used.contains(c)).collect();
            unused[rng.gen_range(0..unused.len())]
        } else {
            alphabet[rng.gen_range(0..alphabet.len())]
        };

        chars.push(c);
        used.insert(c);
    }

    chars.shuffle(rng);
    Ok(chars.into_iter().map(char::from).collect())
}

/// [`generate_password`] backed by the thread-local RNG.
pub fn generate_random_password(options: &PasswordOptions) -> Result<String, PasswordError> {
    generate_password(options, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn default_options_cover_every_class() {
        let password = generate_password(&PasswordOptions::default(), &mut rng()).unwrap();
        assert_eq!(password.len(), 12);
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert!(password.chars().any(|c| !c.is_ascii_alphanumeric()));
    }

    #[test]
    fn digits_only() {
        let options = PasswordOptions {
            length: 8,
            require_digit: true,
            require_lowercase: false,
            require_uppercase: false,
            require_non_alphanumeric: false,
            required_unique_chars: 8,
        };
        let password = generate_password(&options, &mut rng()).unwrap();
        assert!(password.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(password.chars().collect::<HashSet<_>>().len(), 8);
    }

    #[test]
    fn too_short_for_required_classes() {
        let options = PasswordOptions {
            length: 3,
            ..PasswordOptions::default()
        };
        assert_eq!(
            generate_password(&options, &mut rng()),
            Err(PasswordError::LengthTooShort { length: 3, required: 4 })
        );
    }

    #[test]
    fn too_many_unique_chars_for_alphabet() {
        let options = PasswordOptions {
            length: 20,
            require_digit: true,
            require_lowercase: false,
            require_uppercase: false,
            require_non_alphanumeric: false,
            required_unique_chars: 11,
        };
        assert_eq!(
            generate_password(&options, &mut rng()),
            Err(PasswordError::UniqueCharsUnsatisfiable { required: 11, available: 10 })
        );
    }

    #[test]
    fn thread_rng_variant_works() {
        let password = generate_random_password(&PasswordOptions::default()).unwrap();
        assert_eq!(password.len(), 12);
    }

    proptest! {
        /// Property: any satisfiable options yield a password of the right
        /// length that honors every requirement.
        #[test]
        fn generated_passwords_meet_options(
            seed in any::<u64>(),
            length in 4usize..40,
            digit in any::<bool>(),
            lower in any::<bool>(),
            upper in any::<bool>(),
            symbol in any::<bool>(),
            unique in 0usize..12,
        ) {
            let options = PasswordOptions {
                length,
                require_digit: digit,
                require_lowercase: lower,
                require_uppercase: upper,
                require_non_alphanumeric: symbol,
                required_unique_chars: unique.min(length),
            };
            let alphabet = options.alphabet();

            match generate_password(&options, &mut StdRng::seed_from_u64(seed)) {
                Ok(password) => {
                    prop_assert_eq!(password.len(), length);
                    prop_assert!(password.bytes().all(|b| alphabet.contains(&b)));
                    prop_assert!(password.chars().collect::<HashSet<_>>().len() >= options.required_unique_chars);
                    if digit { prop_assert!(password.chars().any(|c| c.is_ascii_digit())); }
                    if lower { prop_assert!(password.chars().any(|c| c.is_ascii_lowercase())); }
                    if upper { prop_assert!(password.chars().any(|c| c.is_ascii_uppercase())); }
                    if symbol { prop_assert!(password.chars().any(|c| !c.is_ascii_alphanumeric())); }
                }
                Err(PasswordError::UniqueCharsUnsatisfiable { available, .. }) => {
                    prop_assert!(available < options.required_unique_chars);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}
