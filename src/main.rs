use std::env;
use std::error::Error;
use cooc_builder::Pipeline;

// expects a single argument, a path to a json file with the parameters

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    Pipeline::run(&args)
}
