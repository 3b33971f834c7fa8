use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct Username(String);

impl Username {
    const MAX_GRAPHEMES: usize = 256;

    /// Returns an instance of `Username` if the input satisfies all
    /// our validation constraints on usernames
    pub fn parse(s: String) -> Result<Self, String> {
        // `.trim()` returns a view over the input `s` without trailing
        // whitespace-like characters
        let is_empty_or_whitespace = s.trim().is_empty();

        // A grapheme is defined by the Unicode standard as a "user-perceived"
        // character: `å` is a single grapheme, but it is composed of two characters
        let is_too_long = s.graphemes(true).count() > Self::MAX_GRAPHEMES;

        if is_empty_or_whitespace || is_too_long {
            Err(format!("{} is not a valid username", s))
        } else {
            Ok(Self(s))
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
