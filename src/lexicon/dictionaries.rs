use super::CategoryLexicon;

// Emotions. Neutral has no dictionary: it is the fallback when nothing scores.

pub const EXCITED: CategoryLexicon = CategoryLexicon::new(
    &["excited", "awesome", "amazing", "love", "cool", "yay", "fantastic", "wow", "fun"],
    &["can't wait", "this is fun", "love this", "so cool", "let's go"],
    &["!"],
    1.2,
);

pub const CURIOUS: CategoryLexicon = CategoryLexicon::new(
    &["curious", "wonder", "interesting", "fascinating", "why", "explore"],
    &["i wonder", "what if", "how does", "why does", "tell me more", "what happens"],
    &["?"],
    1.0,
);

pub const CONFUSED: CategoryLexicon = CategoryLexicon::new(
    &["confused", "confusing", "unclear", "lost", "huh", "puzzled", "unsure"],
    &["don't get", "doesn't make sense", "not sure", "what do you mean", "i'm lost", "can you repeat"],
    &["?"],
    1.3,
);

pub const FRUSTRATED: CategoryLexicon = CategoryLexicon::new(
    &["frustrated", "frustrating", "annoying", "annoyed", "ugh", "hate", "stuck", "stupid", "pointless"],
    &["don't understand", "at all", "makes no sense", "i give up", "still don't", "never get"],
    &["!"],
    1.5,
);

pub const OVERWHELMED: CategoryLexicon = CategoryLexicon::new(
    &["overwhelmed", "overload", "too much", "so much", "too many", "drowning", "swamped"],
    &["can't keep up", "too much information", "all at once", "where do i start", "so many things"],
    &[],
    1.4,
);

pub const CONFIDENT: CategoryLexicon = CategoryLexicon::new(
    &["easy", "confident", "totally", "definitely", "obviously", "simple", "nailed", "sure"],
    &["got it", "get it", "i understand", "makes sense", "i know", "no problem", "piece of cake"],
    &[],
    1.2,
);

pub const ANXIOUS: CategoryLexicon = CategoryLexicon::new(
    &["worried", "nervous", "scared", "afraid", "anxious", "stress", "panic", "exam"],
    &["what if i fail", "i'm afraid", "running out of time", "test tomorrow"],
    &[],
    1.3,
);

pub const TIRED: CategoryLexicon = CategoryLexicon::new(
    &["tired", "exhausted", "sleepy", "bored", "boring", "drained", "yawn"],
    &["long day", "need a break", "can't focus", "so late"],
    &[],
    1.1,
);

// Learning styles. Weights: kinesthetic 1.3 > auditory 1.2 > visual 1.1 > reading 1.0.

pub const VISUAL: CategoryLexicon = CategoryLexicon::new(
    &["diagram", "chart", "graph", "picture", "image", "visual", "draw", "colour", "color", "video", "map", "illustrat"],
    &["show me", "i see", "looks like", "visualize", "can you draw", "mind map"],
    &[],
    1.1,
);

pub const AUDITORY: CategoryLexicon = CategoryLexicon::new(
    &["hear", "listen", "sound", "audio", "podcast", "discuss", "talk", "rhythm", "lecture"],
    &["tell me", "sounds like", "talk through", "explain it to me", "say it"],
    &[],
    1.2,
);

pub const KINESTHETIC: CategoryLexicon = CategoryLexicon::new(
    &["practice", "hands-on", "build", "exercise", "experiment", "interactive", "simulate", "activity", "try"],
    &["let me try", "hands on", "real world", "by doing", "step by step"],
    &[],
    1.3,
);

pub const READING: CategoryLexicon = CategoryLexicon::new(
    &["read", "write", "notes", "article", "book", "definition", "written", "summary", "document", "text"],
    &["write down", "read about", "in writing", "list of"],
    &[],
    1.0,
);

// Confidence polarity tiers, checked in this order; the first hit wins.

pub const STRONG_NEGATIVE: &[&str] = &[
    "don't understand",
    "no idea",
    "completely lost",
    "hopeless",
    "give up",
    "makes no sense",
    "can't do this",
];

pub const NEGATIVE: &[&str] = &[
    "confused",
    "not sure",
    "difficult",
    "struggling",
    "stuck",
    "hard",
    "unsure",
    "don't get",
];

pub const STRONG_POSITIVE: &[&str] = &[
    "easy",
    "totally",
    "perfectly",
    "definitely",
    "piece of cake",
    "100%",
    "mastered",
    "nailed",
];

pub const POSITIVE: &[&str] = &[
    "understand",
    "got it",
    "makes sense",
    "i think i",
    "okay",
    "clear",
    "good",
];

pub const COMPLEXITY_INDICATORS: &[&str] =
    &["complex", "complicated", "advanced", "tricky", "challenging"];

pub const SIMPLICITY_INDICATORS: &[&str] = &["simple", "basic", "easy", "straightforward"];

// Topic complexity.

pub const HIGH_COMPLEXITY: CategoryLexicon = CategoryLexicon::keywords_only(
    &[
        "calculus",
        "derivative",
        "integral",
        "quantum",
        "algorithm",
        "recursion",
        "thermodynamics",
        "proof",
        "theorem",
        "organic chemistry",
        "differential",
        "matrix",
        "statistics",
    ],
    1.0,
);

pub const MEDIUM_COMPLEXITY: CategoryLexicon = CategoryLexicon::keywords_only(
    &[
        "algebra",
        "equation",
        "function",
        "chemistry",
        "physics",
        "grammar",
        "essay",
        "geometry",
        "probability",
        "biology",
    ],
    1.0,
);

pub const LOW_COMPLEXITY: CategoryLexicon = CategoryLexicon::keywords_only(
    &[
        "addition",
        "subtraction",
        "spelling",
        "alphabet",
        "counting",
        "colors",
        "shapes",
        "vocabulary",
        "basic",
    ],
    1.0,
);

// Subjects.

pub const MATHEMATICS: CategoryLexicon = CategoryLexicon::keywords_only(
    &["math", "algebra", "calculus", "equation", "geometry", "fraction", "number", "derivative", "integral"],
    1.0,
);

pub const SCIENCE: CategoryLexicon = CategoryLexicon::keywords_only(
    &["science", "physics", "chemistry", "biology", "atom", "cell", "energy", "molecule"],
    1.0,
);

pub const PROGRAMMING: CategoryLexicon = CategoryLexicon::keywords_only(
    &["code", "programming", "python", "rust", "javascript", "function", "algorithm", "variable", "loop", "recursion"],
    1.0,
);

pub const LANGUAGE: CategoryLexicon = CategoryLexicon::keywords_only(
    &["grammar", "vocabulary", "spelling", "essay", "verb", "noun", "sentence", "english", "spanish"],
    1.0,
);

pub const HISTORY: CategoryLexicon = CategoryLexicon::keywords_only(
    &["history", "war", "revolution", "century", "empire", "ancient"],
    1.0,
);
