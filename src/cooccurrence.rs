
// imports
use crate::error::CoocError;
use crate::matrix::{CooMatrix, Entry};
use crate::tokenizer::Tokenizer;
use crate::vocab::Vocab;

use rayon::{prelude::*, ThreadPoolBuilder};
use tracing::{debug, info};


// every PROGRESS_EVERY sentences a debug line is emitted while counting
const PROGRESS_EVERY: usize = 200000;


pub struct Counts {}

impl Counts {

    fn check_window(window_size: i32) -> Result<usize, CoocError> {

        // checked before any sentence is touched, so nothing partial is ever returned
        usize::try_from(window_size).map_err(|_| CoocError::InvalidWindowSize { window_size })
    }

    fn parse_line<T: Tokenizer + ?Sized>(sentence: &str, sentence_i: usize, tokenizer: &T) -> Result<Vec<String>, CoocError> {

        // the sentence is stripped of leading and trailing whitespace before tokenizing,
        // empty tokens coming back from the tokenizer are dropped.
        let tokens = tokenizer.tokenize(sentence.trim()).map_err(|reason| {
            CoocError::TokenizerContract { sentence: sentence_i, reason }
        })?;

        Ok(tokens.into_iter().filter(|tok| !tok.is_empty()).collect())
    }

    /// Number of entries a sentence of `len` tokens contributes with the given window.
    pub fn count_entries(len: usize, window_size: usize) -> usize {

        (0..len)
        .map(|pos| {
            let (start, end) = Counts::window(pos, len, window_size);
            end - start - 1
        })
        .sum()
    }

    fn window(pos: usize, len: usize, window_size: usize) -> (usize, usize) {
        let start = pos.saturating_sub(window_size);
        let end = pos.saturating_add(window_size).saturating_add(1).min(len);
        (start, end)
    }

    fn accumulate(tokens: &[String], window_size: usize, vocab: &mut Vocab, entries: &mut Vec<Entry>) {

        // the center token is indexed before any of its neighbors. neighbors are then
        // indexed left to right, which can place a later token of the sentence into the
        // vocabulary before it is visited as a center.
        for (pos, tok) in tokens.iter().enumerate() {

            let token_i = vocab.get_or_insert(tok);
            let (start, end) = Counts::window(pos, tokens.len(), window_size);

            for pos2 in start..end {

                if pos2 == pos { continue }

                let context_j = vocab.get_or_insert(&tokens[pos2]);
                entries.push((token_i, context_j, 1.0));
            }
        }
    }

    /// Runs the single pass over `corpus` and returns the vocabulary together with
    /// the raw, unsummed `(row, col, 1.0)` entries in the order they were produced.
    ///
    /// Fails with an `InvalidArgument` kind error for a negative `window_size`, and
    /// with a `TypeError` kind error when the tokenizer fails on a sentence.
    pub fn build_entries<I, S, T>(corpus: I, tokenizer: &T, window_size: i32) -> Result<(Vocab, Vec<Entry>), CoocError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        T: Tokenizer + ?Sized,
    {

        let window_size = Counts::check_window(window_size)?;

        let mut vocab = Vocab::new();
        let mut entries: Vec<Entry> = Vec::new();
        let mut n_sentences = 0;

        for (k, sentence) in corpus.into_iter().enumerate() {

            if k > 0 && k % PROGRESS_EVERY == 0 {
                debug!(sentences = k, vocab = vocab.len(), entries = entries.len(), "counting");
            }

            let tokens = Counts::parse_line(sentence.as_ref(), k, tokenizer)?;
            Counts::accumulate(&tokens, window_size, &mut vocab, &mut entries);
            n_sentences += 1;
        }

        info!(sentences = n_sentences, vocab = vocab.len(), entries = entries.len(), "finished counting");
        Ok((vocab, entries))
    }

    /// Builds the vocabulary and the summed co-occurrence matrix.
    ///
    /// The matrix is always `|vocab| x |vocab|`, also when the last tokens added to
    /// the vocabulary never became a coordinate (e.g. a trailing one-word sentence).
    /// Use [`Counts::build_entries`] with [`CooMatrix::from_entries`] for a shape
    /// inferred from the coordinates alone.
    pub fn build<I, S, T>(corpus: I, tokenizer: &T, window_size: i32) -> Result<(Vocab, CooMatrix), CoocError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        T: Tokenizer + ?Sized,
    {

        let (vocab, entries) = Counts::build_entries(corpus, tokenizer, window_size)?;
        let n = vocab.len();
        let matrix = CooMatrix::from_entries(entries).with_shape((n, n))?;
        Ok((vocab, matrix))
    }

    /// Same result as [`Counts::build`], with sentences counted on `num_threads` threads.
    ///
    /// Windows never cross sentences, so every sentence is counted against its own
    /// local vocabulary. The local vocabularies are then merged in corpus order,
    /// which hands out global indices exactly as the sequential pass does.
    pub fn build_parallel<S, T>(corpus: &[S], tokenizer: &T, window_size: i32, num_threads: usize) -> Result<(Vocab, CooMatrix), CoocError>
    where
        S: AsRef<str> + Sync,
        T: Tokenizer + Sync + ?Sized,
    {

        let window_size = Counts::check_window(window_size)?;
        let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
        debug!(threads = pool.current_num_threads(), sentences = corpus.len(), "counting in parallel");

        let per_sentence: Vec<Result<(Vocab, Vec<Entry>), CoocError>> = pool.install(|| {
            corpus.par_iter().enumerate().map(|(k, sentence)| -> Result<(Vocab, Vec<Entry>), CoocError> {
                let tokens = Counts::parse_line(sentence.as_ref(), k, tokenizer)?;
                let mut local_vocab = Vocab::new();
                let mut local_entries = Vec::with_capacity(Counts::count_entries(tokens.len(), window_size));
                Counts::accumulate(&tokens, window_size, &mut local_vocab, &mut local_entries);
                Ok((local_vocab, local_entries))
            }).collect()
        });

        // merge in sentence order, the first failing sentence wins as it would sequentially
        let mut vocab = Vocab::new();
        let mut entries: Vec<Entry> = Vec::new();
        for counted in per_sentence {
            let (local_vocab, local_entries) = counted?;
            let local2global: Vec<usize> = local_vocab.iter().map(|(tok, _)| vocab.get_or_insert(tok)).collect();
            entries.extend(local_entries.into_iter().map(|(i, j, v)| (local2global[i], local2global[j], v)));
        }

        info!(sentences = corpus.len(), vocab = vocab.len(), entries = entries.len(), "finished counting");
        let n = vocab.len();
        let matrix = CooMatrix::from_entries(entries).with_shape((n, n))?;
        Ok((vocab, matrix))
    }

}


#[cfg(test)]
mod tests {

    use std::collections::HashSet;
    use super::Counts;
    use crate::error::ErrorKind;
    use crate::matrix::CooMatrix;
    use crate::tokenizer::{Fallible, WhitespaceTokenizer};

    fn split(sentence: &str) -> Vec<String> {
        sentence.split(' ').map(|x| x.to_string()).collect()
    }

    #[test]
    fn three_words_window_one() {

        let (vocab, entries) = Counts::build_entries(["a b c"], &split, 1).unwrap();
        assert_eq!(vocab.get("a"), Some(0));
        assert_eq!(vocab.get("b"), Some(1));
        assert_eq!(vocab.get("c"), Some(2));
        assert_eq!(entries, vec![(0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0), (2, 1, 1.0)]);

        let (_, matrix) = Counts::build(["a b c"], &split, 1).unwrap();
        assert_eq!(matrix.shape(), (3, 3));
        for i in 0..3 {
            for j in 0..3 {
                let expected = if (i as i32 - j as i32).abs() == 1 { 1.0 } else { 0.0 };
                assert_eq!(matrix.get(i, j), expected, "at ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn repeated_token_sums() {

        let (vocab, entries) = Counts::build_entries(["a a"], &split, 1).unwrap();
        assert_eq!(vocab.len(), 1);
        assert_eq!(entries, vec![(0, 0, 1.0), (0, 0, 1.0)]);

        let (_, matrix) = Counts::build(["a a"], &split, 1).unwrap();
        assert_eq!(matrix.nnz(), 1);
        assert_eq!(matrix.get(0, 0), 2.0);
    }

    #[test]
    fn empty_inputs() {

        let (vocab, matrix) = Counts::build([""], &split, 1).unwrap();
        assert!(vocab.is_empty());
        assert_eq!(matrix.shape(), (0, 0));

        let nothing: Vec<String> = Vec::new();
        let (vocab, matrix) = Counts::build(nothing, &split, 3).unwrap();
        assert!(vocab.is_empty());
        assert_eq!(matrix.shape(), (0, 0));
        assert_eq!(matrix.nnz(), 0);
    }

    #[test]
    fn negative_window_fails_before_tokenizing() {

        let called = std::cell::Cell::new(false);
        let spy = |s: &str| {
            called.set(true);
            split(s)
        };
        let err = Counts::build(["a b"], &spy, -1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(!called.get());

        let err = Counts::build_parallel(&["a b"], &split, -3, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn tokenizer_failure_is_type_error() {

        let picky = Fallible(|s: &str| {
            if s.starts_with('#') { Err(format!("cannot tokenize {:?}", s)) } else { Ok(split(s)) }
        });

        let err = Counts::build(["a b", "  # c"], &picky, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
        assert!(err.to_string().contains("sentence 1"));

        let err = Counts::build_parallel(&["# a", "b", "# c"], &picky, 2, 3).unwrap_err();
        assert!(err.to_string().contains("sentence 0"));
    }

    #[test]
    fn stripping_and_empty_tokens() {

        // splitting on single spaces leaves empty tokens between double spaces
        let (vocab, entries) = Counts::build_entries(["  a  b \n"], &split, 1).unwrap();
        assert_eq!(vocab.inverse(), vec!["a", "b"]);
        assert_eq!(entries, vec![(0, 1, 1.0), (1, 0, 1.0)]);
    }

    #[test]
    fn zero_window_and_single_tokens() {

        let corpus = ["the cat sat on the mat", "dog", "a b c d"];
        let (vocab, entries) = Counts::build_entries(corpus, &split, 0).unwrap();
        assert!(entries.is_empty());
        assert_eq!(vocab.len(), 10);

        let (_, entries) = Counts::build_entries(["dog", "cat"], &split, 5).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn windows_stop_at_sentences() {

        let (vocab, matrix) = Counts::build(["a b", "c d"], &split, 10).unwrap();
        let a = vocab.get("a").unwrap();
        let c = vocab.get("c").unwrap();
        assert_eq!(matrix.get(a, c), 0.0);
        assert_eq!(matrix.sum(), 4.0);
    }

    #[test]
    fn vocab_is_first_seen_order() {

        let (vocab, _) = Counts::build_entries(["b a", "c a b"], &split, 1).unwrap();
        assert_eq!(vocab.inverse(), vec!["b", "a", "c"]);

        // with a wide window the neighbours are indexed as they are scanned
        let (vocab, _) = Counts::build_entries(["x y z"], &split, 2).unwrap();
        assert_eq!(vocab.inverse(), vec!["x", "y", "z"]);
    }

    #[test]
    fn entry_count_matches_formula() {

        let sentences = [
            "What you say makes a lot of sense to me , you are right",
            "Are you playing basketball just for fun or are you a pro ?",
            "one",
            "",
            "two words",
        ];

        for window_size in 0..8usize {
            let (_, entries) = Counts::build_entries(sentences, &split, window_size as i32).unwrap();
            let expected: usize = sentences
            .iter()
            .map(|s| Counts::count_entries(split(s.trim()).iter().filter(|t| !t.is_empty()).count(), window_size))
            .sum();
            assert_eq!(entries.len(), expected);
        }

        // sum over pos of min(L, pos+W+1) - max(0, pos-W) - 1 for L=4, W=1: 1 + 2 + 2 + 1
        assert_eq!(Counts::count_entries(4, 1), 6);
        assert_eq!(Counts::count_entries(4, 100), 12);
        assert_eq!(Counts::count_entries(1, 3), 0);
        assert_eq!(Counts::count_entries(0, 3), 0);
        assert_eq!(Counts::count_entries(5, 0), 0);
    }

    #[test]
    fn vocab_counts_distinct_tokens() {

        let sentences = ["the cat sat", "the  dog sat", " a cat "];
        let (vocab, _) = Counts::build_entries(sentences, &split, 2).unwrap();
        let distinct: HashSet<&str> = sentences.into_iter().flat_map(str::split_whitespace).collect();
        assert_eq!(vocab.len(), distinct.len());
    }

    #[test]
    fn matrix_is_symmetric() {

        let sentences = [
            "What you say makes a lot of sense to me , you are right",
            "Are you playing basketball just for fun or are you a pro ?"
        ];
        let tokenizer = WhitespaceTokenizer::new(true, true);

        for window_size in [1, 3, 10] {
            let (vocab, matrix) = Counts::build(sentences, &tokenizer, window_size).unwrap();
            assert!(matrix.is_symmetric());
            assert_eq!(matrix.shape(), (vocab.len(), vocab.len()));
        }
    }

    #[test]
    fn golden_counts_with_markers() {

        // "SOS you are you EOS", window 1, lower cased
        // vocab: sos 0, you 1, are 2, eos 3
        let tokenizer = WhitespaceTokenizer::new(true, true);
        let (vocab, matrix) = Counts::build(["You are you"], &tokenizer, 1).unwrap();
        assert_eq!(vocab.inverse(), vec!["SOS", "you", "are", "EOS"]);

        assert_eq!(matrix.get(0, 1), 1.0);
        assert_eq!(matrix.get(1, 0), 1.0);
        assert_eq!(matrix.get(1, 2), 2.0);
        assert_eq!(matrix.get(2, 1), 2.0);
        assert_eq!(matrix.get(1, 3), 1.0);
        assert_eq!(matrix.get(3, 1), 1.0);
        assert_eq!(matrix.nnz(), 6);
        assert_eq!(matrix.sum(), 8.0);
    }

    #[test]
    fn padding_covers_late_tokens() {

        // "c" enters the vocabulary but never becomes a coordinate
        let (vocab, entries) = Counts::build_entries(["a b", "c"], &split, 1).unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(CooMatrix::from_entries(entries).shape(), (2, 2));

        let (_, matrix) = Counts::build(["a b", "c"], &split, 1).unwrap();
        assert_eq!(matrix.shape(), (3, 3));
        assert_eq!(matrix.row_sums()[2], 0.0);
    }

    #[test]
    fn runs_are_deterministic() {

        let sentences = ["a b c a", "c d e", "e a", "f"];
        let first = Counts::build(sentences, &split, 2).unwrap();
        let second = Counts::build(sentences, &split, 2).unwrap();
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn parallel_matches_sequential() {

        let sentences: Vec<String> = (0..500)
        .map(|k| format!("w{} w{} shared w{} w{}  w{}", k % 7, k % 13, k % 5, k, k % 3))
        .collect();

        for window_size in [0, 1, 2, 6] {
            let (vocab, matrix) = Counts::build(&sentences, &split, window_size).unwrap();
            let (par_vocab, par_matrix) = Counts::build_parallel(&sentences, &split, window_size, 4).unwrap();
            assert_eq!(par_vocab, vocab);
            assert_eq!(par_matrix, matrix);
        }
    }
}
