
// imports
use crate::config::{files_handling, Config, JsonTypes};
use crate::cooccurrence::Counts;
use crate::error::CoocError;
use crate::matrix::CooMatrix;
use crate::tokenizer::WhitespaceTokenizer;
use crate::vocab::Vocab;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;


pub struct Pipeline {}

impl Pipeline {

    // runs the program in 3 steps -
    // -> configuration of arguments
    // -> cooccurrences counting
    // -> saving vocabulary and counts

    pub fn run(args: &[String]) -> Result<(), Box<dyn Error>> {

        let params = Config::new(args)?.get_params();

        // RUST_LOG wins over the verbosity flag
        let default_level = if params.progress_verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        tracing_subscriber::fmt().with_env_filter(filter).init();

        info!("{}", params);
        let timer = Instant::now();
        let (vocab, matrix) = Pipeline::count(&params)?;
        info!(
            vocab = vocab.len(), nnz = matrix.nnz(), seconds = timer.elapsed().as_secs(),
            "finished, saved vocabulary and counts to {}", params.output_dir
        );
        Ok(())
    }

    fn read_corpus(file_path: &str) -> Result<Vec<String>, CoocError> {

        let f = File::open(file_path)?;
        let lines = io::BufReader::new(f).lines().collect::<Result<Vec<String>, io::Error>>()?;
        Ok(lines)
    }

    /// Counts the corpus named in `params` and writes `words.txt`, `cooc.gz` and
    /// optionally `cooc.npy` into the output directory.
    pub fn count(params: &JsonTypes) -> Result<(Vocab, CooMatrix), CoocError> {

        let sentences = Pipeline::read_corpus(&params.corpus_file)?;
        debug!(sentences = sentences.len(), "loaded corpus from {}", params.corpus_file);

        let tokenizer = WhitespaceTokenizer::new(params.lowercase, params.use_os);
        let (vocab, matrix) = if params.num_threads > 1 {
            Counts::build_parallel(&sentences, &tokenizer, params.window_size, params.num_threads)?
        } else {
            Counts::build(&sentences, &tokenizer, params.window_size)?
        };

        // without padding the shape follows the stored coordinates only
        let matrix = if params.pad_to_vocab {
            matrix
        } else {
            CooMatrix::from_entries(matrix.iter().collect())
        };

        files_handling::save_output(&params.output_dir, "words", &vocab)?;
        files_handling::save_output(&params.output_dir, "cooc", &matrix)?;
        if params.save_dense {
            files_handling::save_output(&params.output_dir, "cooc", &matrix.to_dense())?;
        }

        Ok((vocab, matrix))
    }

}
