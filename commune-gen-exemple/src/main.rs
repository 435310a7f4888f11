use std::io::ErrorKind;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info, Level};

use commune_gen_core::{
    generate_request, CorpusConfig, GenError, GenResult, GenerationRequest, MarkovChain,
    DEFAULT_MAX_ATTEMPTS,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generates new French commune names", long_about = None)]
struct Cli {
    /// Delimited file listing the communes (name in the 9th column)
    #[arg(short, long, default_value = "data/communes-01042019.csv")]
    corpus: PathBuf,

    /// Window size of the Markov chain
    #[arg(short, default_value_t = 3)]
    n: usize,

    /// Number of names to generate
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Beginning of the generated names
    #[arg(short, long)]
    start: Option<String>,

    /// Exact length of the generated names
    #[arg(long)]
    size: Option<usize>,

    /// Candidates drawn before giving up on a name
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,

    /// Always rebuild the chain from the corpus, without reading or writing the cache
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Log every rejected candidate
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn run(cli: &Cli) -> GenResult<Vec<String>> {
    // Reading the corpus (or its cache) and building the chain
    let config = CorpusConfig::new(&cli.corpus).with_cache(!cli.no_cache);
    let chain = MarkovChain::from_corpus(&config, cli.n)?;

    let request = GenerationRequest {
        start: cli.start.clone(),
        size: cli.size,
        max_attempts: cli.max_attempts,
    };

    (0..cli.count).map(|_| generate_request(&chain, &request)).collect()
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let start = Instant::now();

    let result = run(&cli);

    info!("Done in {} ms", start.elapsed().as_millis());

    match result {
        Ok(names) => {
            for name in names {
                println!("{name}");
            }
        }
        Err(GenError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            error!("Corpus file not found: {}", cli.corpus.display());
            process::exit(1);
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
