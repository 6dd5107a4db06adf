use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sha2::digest::DynDigest;

use veritree::{Algorithm, VerityParams, DEFAULT_BLOCK_SIZE};

/// Compute fs-verity digests of files.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Hash algorithm for the Merkle tree and descriptor
    #[arg(long, default_value_t = Algorithm::Sha256)]
    hash_alg: Algorithm,

    /// Merkle tree block size in bytes (power of two)
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Salt mixed into every block hash, as a hex string
    #[arg(long, default_value = "")]
    salt: String,

    /// Print only the hex digest
    #[arg(long)]
    compact: bool,

    /// Files to hash; stdin when none are given
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let salt = hex::decode(&args.salt).context("salt must be a hex string")?;
    let params = VerityParams {
        algorithm: args.hash_alg,
        block_size: args.block_size,
        salt: salt.into(),
    };

    if args.files.is_empty() {
        let digest = hash_stream(&params, &mut io::stdin().lock())?;
        print_digest(&args, &digest, "-");
    } else {
        for path in &args.files {
            let file = File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            let digest = hash_stream(&params, &mut BufReader::new(file))?;
            print_digest(&args, &digest, &path.display().to_string());
        }
    }

    Ok(())
}

fn hash_stream(params: &VerityParams, input: &mut impl Read) -> anyhow::Result<Box<[u8]>> {
    let mut hasher = params.build()?;
    io::copy(input, &mut hasher)?;
    Ok(hasher.finalize())
}

fn print_digest(args: &Args, digest: &[u8], name: &str) {
    if args.compact {
        println!("{}", hex::encode(digest));
    } else {
        println!("{}:{} {}", args.hash_alg, hex::encode(digest), name);
    }
}
