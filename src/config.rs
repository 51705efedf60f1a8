use serde_json::Value;
use std::{fs, fmt::Display};
use crate::error::CoocError;


#[derive(Clone, Debug)]
pub struct JsonTypes {
    pub corpus_file: String,
    pub output_dir: String,
    pub window_size: i32,
    pub lowercase: bool,
    pub use_os: bool,
    pub num_threads: usize,
    pub pad_to_vocab: bool,
    pub progress_verbose: bool,
    pub save_dense: bool,
}


impl Display for JsonTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using hyper-params:
        corpus_file: {}
        output_dir: {}
        window_size: {}
        lowercase: {}
        use_os: {}
        num_threads: {}
        pad_to_vocab: {}
        progress_verbose: {}
        save_dense: {}",
        self.corpus_file, self.output_dir, self.window_size, self.lowercase, self.use_os,
        self.num_threads, self.pad_to_vocab, self.progress_verbose, self.save_dense)
    }
}

pub struct Config {
    params: JsonTypes
}

impl Config {

    pub fn get_params(&self) -> JsonTypes {
        self.params.clone()
    }

    /// Reads parameters from the json file named by the single program argument.
    pub fn new(args: &[String]) -> Result<Config, CoocError> {

        if args.len() != 2 {
            return Err(CoocError::Config("input should be a path to json file only".to_string()));
        }

        let f = fs::File::open(&args[1])?;
        let json: Value = serde_json::from_reader(f)?;
        Config::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<Config, CoocError> {

        // input and output locations have no defaults
        let corpus_file = Config::required_str(json, "corpus_file")?;
        let output_dir = Config::required_str(json, "output_dir")?;

        // handle default vs input parameters
        let window_size = Config::int_or(json, "window_size", 10)?;
        let num_threads = Config::int_or(json, "num_threads", 1)?;
        let lowercase = Config::bool_or(json, "lowercase", true)?;
        let use_os = Config::bool_or(json, "use_os", false)?;
        let pad_to_vocab = Config::bool_or(json, "pad_to_vocab", true)?;
        let progress_verbose = Config::bool_or(json, "progress_verbose", false)?;
        let save_dense = Config::bool_or(json, "save_dense", false)?;

        let window_size = i32::try_from(window_size)
        .map_err(|_| CoocError::Config(format!("window_size {} does not fit in 32 bits", window_size)))?;
        if window_size < 0 {
            return Err(CoocError::InvalidWindowSize { window_size });
        }
        if num_threads < 1 {
            return Err(CoocError::Config(format!("num_threads must be at least 1, got {}", num_threads)));
        }

        let params = JsonTypes {
            corpus_file,
            output_dir,
            window_size,
            lowercase,
            use_os,
            num_threads: num_threads as usize,
            pad_to_vocab,
            progress_verbose,
            save_dense,
        };

        Ok(Self { params })
    }

    fn required_str(json: &Value, key: &str) -> Result<String, CoocError> {
        match json.get(key) {
            Some(v) => v.as_str()
            .map(|s| s.to_owned())
            .ok_or_else(|| CoocError::Config(format!("{} should be a string", key))),
            None => Err(CoocError::Config(format!("{} was not supplied through json", key)))
        }
    }

    fn int_or(json: &Value, key: &str, default: i64) -> Result<i64, CoocError> {
        match json.get(key) {
            Some(v) => v.as_i64().ok_or_else(|| CoocError::Config(format!("given {} is not numeric", key))),
            None => Ok(default)
        }
    }

    fn bool_or(json: &Value, key: &str, default: bool) -> Result<bool, CoocError> {
        match json.get(key) {
            Some(v) => v.as_bool().ok_or_else(|| CoocError::Config(format!("given {} is not boolean", key))),
            None => Ok(default)
        }
    }

}


pub mod files_handling {

    use ndarray::Array2;
    use ndarray_npy::{read_npy, write_npy};
    use std::{fs::{self, File}, io::{BufWriter, BufReader}, path::Path};
    use std::io::prelude::*;
    use flate2::{Compression, read::GzDecoder, write::GzEncoder};
    use crate::error::CoocError;
    use crate::matrix::CooMatrix;
    use crate::vocab::Vocab;

    pub fn read_input<R: ReadFile>(file_path: &str) -> Result<R, CoocError> {
        R::read_file(file_path)
    }

    pub fn save_output<S: SaveFile>(output_dir: &str, file_name: &str, item: &S) -> Result<(), CoocError> {

        // create output folder
        fs::create_dir_all(output_dir)?;
        item.save_file(output_dir, file_name)
    }

    fn out_path(output_dir: &str, file_name: &str, extension: &str) -> String {
        Path::new(output_dir).join(format!("{}.{}", file_name, extension)).display().to_string()
    }

    /// `file_path` is given without its extension.
    pub trait ReadFile: Sized {
        fn read_file(file_path: &str) -> Result<Self, CoocError>;
    }

    pub trait SaveFile {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), CoocError>;
    }

    // vocabulary: json object {token: index} in a .txt file
    impl SaveFile for Vocab {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), CoocError> {
            let out = out_path(output_dir, file_name, "txt");
            let mut f = BufWriter::new(File::create(out)?);
            serde_json::to_writer(&mut f, self)?;
            f.flush()?;
            Ok(())
        }
    }

    impl ReadFile for Vocab {
        fn read_file(file_path: &str) -> Result<Self, CoocError> {
            let in_file = file_path.to_string() + ".txt";
            let f = BufReader::new(File::open(in_file)?);
            let item = serde_json::from_reader(f)?;
            Ok(item)
        }
    }

    // counts: parallel rows / cols (u64) and values (f64), bincode encoded and gzipped.
    // the leading u64 pair stores the shape, so padding survives a round trip.
    type SavedCounts = (u64, u64, Vec<u64>, Vec<u64>, Vec<f64>);

    impl SaveFile for CooMatrix {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), CoocError> {

            let out = out_path(output_dir, file_name, "gz");
            let f = BufWriter::new(File::create(out)?);
            let mut writer = GzEncoder::new(f, Compression::default());

            let (n_rows, n_cols) = self.shape();
            let save_item: SavedCounts = (
                n_rows as u64,
                n_cols as u64,
                self.rows().iter().map(|i| *i as u64).collect(),
                self.cols().iter().map(|j| *j as u64).collect(),
                self.values().to_vec(),
            );
            bincode::serialize_into(&mut writer, &save_item)?;
            writer.finish()?.flush()?;
            Ok(())
        }
    }

    impl ReadFile for CooMatrix {
        fn read_file(file_path: &str) -> Result<Self, CoocError> {

            let in_file = file_path.to_string() + ".gz";
            let f = BufReader::new(File::open(in_file)?);
            let mut reader = GzDecoder::new(f);
            let mut buf: Vec<u8> = Vec::new();
            reader.read_to_end(&mut buf)?;

            let (n_rows, n_cols, rows, cols, values): SavedCounts = bincode::deserialize(&buf)?;
            if rows.len() != values.len() || cols.len() != values.len() {
                return Err(CoocError::Triplets(format!(
                    "{} rows, {} cols and {} values do not line up", rows.len(), cols.len(), values.len()
                )));
            }

            // the saved shape must still cover every stored coordinate
            let entries = rows.into_iter().zip(cols).zip(values).map(|((i, j), v)| (i as usize, j as usize, v)).collect();
            CooMatrix::from_entries(entries).with_shape((n_rows as usize, n_cols as usize))
        }
    }

    // dense matrix as .npy
    impl SaveFile for Array2<f64> {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), CoocError> {
            let out = out_path(output_dir, file_name, "npy");
            write_npy(out, self)?;
            Ok(())
        }
    }

    impl ReadFile for Array2<f64> {
        fn read_file(file_path: &str) -> Result<Self, CoocError> {
            let in_file = file_path.to_string() + ".npy";
            let item = read_npy(in_file)?;
            Ok(item)
        }
    }
}
