//! # Package Identifier Grammar
//!
//! This module owns the rule defining which strings are legal package identifiers.
//! The rule catalog consumes it through the [`IdentifierGrammar`] trait, so an
//! alternative grammar can be supplied without touching the rules themselves.
//!
//! ## Identifier Rules
//!
//! Package identifiers must:
//! - Not be empty
//! - Not exceed the configured maximum length (measured in characters, 100 by default)
//! - Start and end with a word character
//! - Contain only word characters, separated by single dots (`.`) or hyphens (`-`)
//!
//! Word characters are those of the Unicode general categories for letters (`Lu`, `Ll`,
//! `Lt`, `Lm`, `Lo`), nonspacing marks (`Mn`), decimal digits (`Nd`) and connector
//! punctuation (`Pc`, which includes `_`). Other numerics such as `½` (`No`) or `Ⅻ`
//! (`Nl`) are not word characters.
//!
//! ```rust
//! use manifest::id::{IdentifierGrammar, PackageIdGrammar};
//!
//! let grammar = PackageIdGrammar::default();
//! assert!(grammar.is_valid("Newtonsoft.Json"));
//! assert!(!grammar.is_valid("-leading.hyphen"));
//! ```

use config::{DEFAULT_MAX_ID_LENGTH, ValidationConfig};
use thiserror::Error;
use unic_ucd_category::GeneralCategory;

//================================================================================================
// Types
//================================================================================================

/// Decides whether a string is a legal package identifier.
pub trait IdentifierGrammar {
    /// Returns `true` when `id` satisfies the grammar, including its length ceiling.
    fn is_valid(&self, id: &str) -> bool;
    /// The maximum identifier length, in characters, this grammar accepts.
    fn max_length(&self) -> usize;
}

/// The default package identifier grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageIdGrammar {
    max_length: usize,
}

/// Reasons an identifier is rejected by [`PackageIdGrammar`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The id is longer than the grammar's ceiling.
    #[error("A package id cannot be more than {max} characters, found {len}")]
    TooLong {
        /// Length of the id, in characters.
        len: usize,
        /// The ceiling it exceeded.
        max: usize,
    },
    /// The id is empty.
    #[error("A package id cannot be empty")]
    Empty,
    /// The first character is not a word character.
    #[error("A package id cannot start with: '{0}'")]
    InvalidStart(char),
    /// The id ends with a separator.
    #[error("A package id cannot end with: '{0}'")]
    InvalidEnd(char),
    /// Two separators follow each other.
    #[error("A package id cannot contain consecutive separators: '{0}'")]
    ConsecutiveSeparators(String),
    /// Characters that are neither word characters nor separators, in order.
    #[error("The package id contains invalid characters: '{0}'")]
    InvalidCharacters(String),
}

//================================================================================================
// Impls
//================================================================================================

impl Default for PackageIdGrammar {
    fn default() -> Self {
        PackageIdGrammar::new(DEFAULT_MAX_ID_LENGTH)
    }
}

impl From<&ValidationConfig> for PackageIdGrammar {
    fn from(config: &ValidationConfig) -> Self {
        PackageIdGrammar::new(config.max_id_length)
    }
}

impl IdentifierGrammar for PackageIdGrammar {
    fn is_valid(&self, id: &str) -> bool {
        self.validate(id).is_ok()
    }

    fn max_length(&self) -> usize {
        self.max_length
    }
}

impl PackageIdGrammar {
    /// Creates a grammar with the given length ceiling.
    pub fn new(max_length: usize) -> Self {
        PackageIdGrammar { max_length }
    }

    /// Validates `s`, returning the first reason it is rejected.
    pub fn validate(&self, s: &str) -> Result<(), Error> {
        let len = s.chars().count();
        if len > self.max_length {
            return Err(Error::TooLong {
                len,
                max: self.max_length,
            });
        }

        let (first, last) = match (s.chars().next(), s.chars().next_back()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(Error::Empty),
        };

        if !PackageIdGrammar::is_word_char(first) {
            return Err(Error::InvalidStart(first));
        }

        let invalid_chars: String = s
            .chars()
            .filter(|&c| !PackageIdGrammar::is_valid_char(c))
            .collect();

        if !invalid_chars.is_empty() {
            return Err(Error::InvalidCharacters(invalid_chars));
        }

        if PackageIdGrammar::is_separator(last) {
            return Err(Error::InvalidEnd(last));
        }

        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if let Some(&next) = chars.peek() {
                if PackageIdGrammar::is_separator(c) && PackageIdGrammar::is_separator(next) {
                    return Err(Error::ConsecutiveSeparators(format!("{c}{next}")));
                }
            }
        }

        Ok(())
    }

    fn is_word_char(c: char) -> bool {
        matches!(
            GeneralCategory::of(c),
            GeneralCategory::UppercaseLetter
                | GeneralCategory::LowercaseLetter
                | GeneralCategory::TitlecaseLetter
                | GeneralCategory::ModifierLetter
                | GeneralCategory::OtherLetter
                | GeneralCategory::NonspacingMark
                | GeneralCategory::DecimalNumber
                | GeneralCategory::ConnectorPunctuation
        )
    }

    fn is_separator(c: char) -> bool {
        c == '.' || c == '-'
    }

    fn is_valid_char(c: char) -> bool {
        PackageIdGrammar::is_word_char(c) || PackageIdGrammar::is_separator(c)
    }
}
