//! Built-in French stopword list

/// Common French function words removed during cleaning.
///
/// Words of two characters or fewer are dropped by the normalizer regardless
/// of this list, so short entries only matter for documentation.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "le", "de", "et", "à", "un", "il", "être", "en", "avoir", "que", "pour", "dans", "ce",
    "son", "une", "sur", "avec", "ne", "se", "pas", "tout", "plus", "par", "grand", "les",
    "des", "du", "la", "au", "aux", "ces", "ses", "nos", "vos", "leurs", "est", "sont",
    "était", "ont", "cette", "mais", "très", "bien", "sans", "peut", "fait", "faire", "voir",
    "deux", "comme", "aussi",
];
