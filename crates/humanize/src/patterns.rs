//! Phrase libraries and rewrite rules. Pure data; the passes that use them live
//! in `enhancer`, `normalizer` and `prompt`.

/// A boilerplate phrase and what to put in its place.
///
/// `pattern` is a regex fragment matched case-insensitively on word boundaries.
/// Rules with an empty `replacement` also swallow one trailing `,`, `;` or `:`
/// and the spaces after it, so a stripped lead-in leaves no dangling comma.
#[derive(Debug, Clone, Copy)]
pub struct BoilerplateRule {
    /// Human-readable form, listed as banned in generation prompts.
    pub label: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

const fn strip(label: &'static str, pattern: &'static str) -> BoilerplateRule {
    BoilerplateRule { label, pattern, replacement: "" }
}

const fn swap(
    label: &'static str,
    pattern: &'static str,
    replacement: &'static str,
) -> BoilerplateRule {
    BoilerplateRule { label, pattern, replacement }
}

/// Evaluated in order. Longer phrases precede their prefixes. Patterns accept
/// both expanded and contracted forms because cleanup contracts first.
pub const BOILERPLATE_RULES: &[BoilerplateRule] = &[
    strip("It is important to note that", r"it(?: is|'s) important to note(?: that)?"),
    strip("It is worth noting that", r"it(?: is|'s) worth noting(?: that)?"),
    strip("It goes without saying", r"it goes without saying(?: that)?"),
    strip("In today's fast-paced world", r"in today's fast-paced world"),
    strip("As previously mentioned", r"as previously mentioned"),
    strip("In conclusion", r"in conclusion"),
    strip("In summary", r"in summary"),
    strip("To sum up", r"to sum up"),
    strip("To put it simply", r"to put it simply"),
    strip("Furthermore", r"furthermore"),
    strip("Additionally", r"additionally"),
    strip("Moreover", r"moreover"),
    strip("Consequently", r"consequently"),
    strip("Therefore", r"therefore"),
    swap("Delve into", r"delve into", "dig into"),
    swap("In the realm of", r"in the realm of", "in"),
    swap("A testament to", r"a testament to", "proof of"),
    swap("Ever-evolving", r"ever-evolving", "changing"),
];

/// Expanded form and its contraction.
pub const CONTRACTIONS: &[(&str, &str)] = &[
    ("do not", "don't"),
    ("does not", "doesn't"),
    ("did not", "didn't"),
    ("cannot", "can't"),
    ("will not", "won't"),
    ("would not", "wouldn't"),
    ("should not", "shouldn't"),
    ("could not", "couldn't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("was not", "wasn't"),
    ("were not", "weren't"),
    ("have not", "haven't"),
    ("has not", "hasn't"),
    ("it is", "it's"),
    ("that is", "that's"),
    ("there is", "there's"),
    ("I am", "I'm"),
    ("you are", "you're"),
    ("we are", "we're"),
    ("they are", "they're"),
];

/// Sentence lead-ins. None of these may match a boilerplate rule.
pub const TRANSITIONS: &[&str] = &[
    "That said,",
    "Even so,",
    "Still,",
    "On top of that,",
    "In practice,",
    "At the same time,",
    "Beyond that,",
    "With that in mind,",
    "Put another way,",
];

/// Spliced after a sentence's first comma.
pub const HEDGES: &[&str] = &[
    "arguably",
    "I think",
    "in most cases",
    "as far as I can tell",
    "more or less",
    "by and large",
    "to some extent",
];

/// Trailing em-dash clauses.
pub const CLARIFICATIONS: &[&str] = &[
    "at least in most cases",
    "or so it seems",
    "give or take",
    "at least from what I've seen",
    "for the most part",
    "in practice, anyway",
];

pub const EMPHASIS: &[&str] = &[
    "Honestly,",
    "Frankly,",
    "Truth be told,",
    "Make no mistake,",
    "Here's the thing:",
    "Crucially,",
];

/// Labels of every boilerplate rule, for prompt construction.
pub fn banned_phrases() -> Vec<&'static str> {
    BOILERPLATE_RULES.iter().map(|r| r.label).collect()
}
