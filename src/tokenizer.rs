
use std::fmt::Display;


/// Splits one (already stripped) sentence into an ordered list of tokens.
///
/// Implementations must be deterministic, otherwise vocabulary order is not
/// reproducible between runs. An `Err` means the tokenizer could not produce
/// a sequence of strings for this input; the builder reports it as a
/// `TypeError`-kind failure.
pub trait Tokenizer {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, String>;
}

// any plain closure over &str is an infallible tokenizer
impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, String> {
        Ok(self(sentence))
    }
}


/// Adapter for closures that can fail.
pub struct Fallible<F>(pub F);

impl<F, E> Tokenizer for Fallible<F>
where
    F: Fn(&str) -> Result<Vec<String>, E>,
    E: Display,
{
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, String> {
        (self.0)(sentence).map_err(|e| e.to_string())
    }
}


/// Whitespace splitting with optional lower casing and sentence markers.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceTokenizer {
    pub lowercase: bool,
    pub use_os: bool,
}

impl WhitespaceTokenizer {

    pub const SOS: &'static str = "SOS";
    pub const EOS: &'static str = "EOS";

    pub fn new(lowercase: bool, use_os: bool) -> WhitespaceTokenizer {
        Self { lowercase, use_os }
    }
}

impl Tokenizer for WhitespaceTokenizer {

    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, String> {

        // markers are added even around an empty line, "SOS EOS" still co-occur
        let mut tokens = Vec::new();
        if self.use_os {
            tokens.push(Self::SOS.to_string());
        }
        for word in sentence.split_whitespace() {
            if self.lowercase {
                tokens.push(word.to_lowercase());
            } else {
                tokens.push(word.to_string());
            }
        }
        if self.use_os {
            tokens.push(Self::EOS.to_string());
        }
        Ok(tokens)
    }
}
