use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use poseidon_round_numbers::{finalize, FieldSize, SBox};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compute Poseidon round numbers for a field, width, S-box and security level",
    long_about = None
)]
struct Args {
    /// Field modulus: a preset (bn254, bls12_381, goldilocks, baby_bear, mersenne31),
    /// a decimal integer or a 0x-prefixed hex integer
    #[arg(short, long, default_value = "bn254")]
    field: String,

    /// State width t
    #[arg(short = 't', long)]
    width: usize,

    /// S-box exponent alpha; -1 selects the inverse S-box
    #[arg(short, long, default_value_t = 5, allow_negative_numbers = true)]
    alpha: i64,

    /// Target security level M in bits
    #[arg(short = 'M', long, default_value_t = 128)]
    security_bits: usize,

    /// Pad the result with two full rounds and 7.5% more partial rounds
    #[arg(short, long)]
    security_margin: bool,

    /// Print the parameters as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let field: FieldSize = args
        .field
        .parse()
        .with_context(|| format!("Invalid field '{}'", args.field))?;
    let sbox = SBox::from_exponent(args.alpha).context("Invalid S-box")?;
    info!("field {}, t = {}, S-box {}", field, args.width, sbox);

    let params = finalize(
        &field,
        args.width,
        sbox,
        args.security_bits,
        args.security_margin,
    )
    .context("Round number search failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&params)?);
    } else {
        println!("{}", params);
    }

    Ok(())
}
