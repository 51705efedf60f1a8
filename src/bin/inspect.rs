
use std::{error::Error, env, fs::File, io::{self, BufRead}};
use cooc_builder::{files_handling, Contexts, CooMatrix, Vocab};


// looks at saved counts, independently of the counting program.
// arguments:
// a letter selector: "c" for most frequent contexts, "s" for pairs similarity
// path to an input file, one token (c) or two tokens (s) per line
// path to the output directory holding words.txt and cooc.gz
// example: ... c Input/words.txt Output

fn main() -> Result<(), Box<dyn Error>> {

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        return Err("expected a selector, an input file and the output directory".into());
    }
    let selector = args[1].as_str();

    let lines = io::BufReader::new(File::open(&args[2])?)
    .lines()
    .collect::<Result<Vec<String>, io::Error>>()?;

    let vocab: Vocab = files_handling::read_input(&format!("{}/words", args[3]))?;
    let matrix: CooMatrix = files_handling::read_input(&format!("{}/cooc", args[3]))?;
    println!("loaded {} tokens, {} stored pairs", vocab.len(), matrix.nnz());
    let contexts = Contexts::new(vocab, matrix)?;

    match selector {
        "c" => run_contexts(&lines, 10, &contexts),
        "s" => run_similarity(&lines, &contexts),
        _ => Err(format!("unrecognized pattern in first argument {}", selector).into())
    }
}


fn run_contexts(inputs: &[String], k: usize, contexts: &Contexts) -> Result<(), Box<dyn Error>> {

    for token in inputs.iter().map(|line| line.trim()).filter(|t| !t.is_empty()) {

        println!("{} most frequent contexts of {}", k, token);
        for (i, (context, count)) in contexts.find_k_most_frequent(token, k)?.iter().enumerate() {
            println!("{} : {} ? {} = {}", i, token, context, count);
        }
        println!();
    }
    Ok(())
}

fn run_similarity(inputs: &[String], contexts: &Contexts) -> Result<(), Box<dyn Error>> {

    // each line holds two tokens separated by a space
    for line in inputs {

        let pair: Vec<&str> = line.split_whitespace().collect();
        if pair.len() != 2 {
            return Err(format!("expected two tokens in line {:?}", line).into());
        }
        println!("{} ~ {} = {}", pair[0], pair[1], contexts.cosine(pair[0], pair[1])?);
    }
    Ok(())
}
