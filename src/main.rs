use anyhow::{Context, Result, bail};
use argonize::{HashResult, OsEntropy, ParameterSet, Salt};
use base64::{Engine, prelude::BASE64_STANDARD};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
mod auth;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// RFC 9106 first recommendation: t=1, m=2 GiB, p=4
    First,
    /// RFC 9106 second recommendation: t=3, m=64 MiB, p=4
    Second,
}

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Base parameter preset
    #[arg(long, value_enum, default_value_t = Preset::Second)]
    preset: Preset,

    /// Argon2 memory cost in KiB (overrides the preset)
    #[arg(long = "argon-mem")]
    mem_cost_kib: Option<u32>,

    /// Argon2 time cost / iterations (overrides the preset)
    #[arg(long = "argon-time")]
    time_cost: Option<u32>,

    /// Argon2 parallelism (overrides the preset)
    #[arg(long = "argon-parallelism")]
    parallelism: Option<u8>,

    /// Length of the generated salt in bytes
    #[arg(long)]
    salt_length: Option<u32>,

    /// Length of the derived key in bytes
    #[arg(long)]
    key_length: Option<u32>,
}

impl Argon2Args {
    fn to_params(&self) -> ParameterSet {
        let base = match self.preset {
            Preset::First => ParameterSet::RFC9106_FIRST,
            Preset::Second => ParameterSet::RFC9106_SECOND,
        };

        base.with_memory_cost_kib(self.mem_cost_kib.unwrap_or(base.memory_cost_kib()))
            .with_iterations(self.time_cost.unwrap_or(base.iterations()))
            .with_parallelism(self.parallelism.unwrap_or(base.parallelism()))
            .with_salt_length(self.salt_length.unwrap_or(base.salt_length()))
            .with_key_length(self.key_length.unwrap_or(base.key_length()))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    /// $argon2id$v=19$m=..,t=..,p=..$salt$key
    Phc,
    /// Base64 of the opaque byte form
    Bytes,
}

#[derive(Debug, Parser)]
#[command(name = "argonize")]
#[command(
    version,
    about = "Hash and verify passwords with Argon2id."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password and prints the encoded hash
    Hash {
        #[command(flatten)]
        argon2: Argon2Args,

        /// Use this salt instead of a random one
        #[arg(long)]
        salt: Option<String>,

        /// Append this pepper to the salt
        #[arg(long, env = "ARGONIZE_PEPPER", hide_env_values = true)]
        pepper: Option<String>,

        /// Output encoding
        #[arg(long, value_enum, default_value_t = Output::Phc)]
        format: Output,
    },

    /// Checks a password against an encoded hash
    #[command(arg_required_else_help = true)]
    Verify { encoded: String },

    /// Prints the parameters of an encoded hash as JSON
    #[command(arg_required_else_help = true)]
    Inspect { encoded: String },
}

#[derive(Serialize)]
struct Inspection<'a> {
    variant: &'static str,
    version: u32,
    params: &'a ParameterSet,
}

/// Accepts either a PHC string or base64 of the opaque byte form.
fn parse_encoded(encoded: &str) -> Result<HashResult> {
    let encoded = encoded.trim();
    if encoded.starts_with('$') {
        return argonize::decode(encoded).context("failed to decode hash string");
    }

    let bytes = BASE64_STANDARD
        .decode(encoded)
        .context("hash is neither a PHC string nor base64")?;
    argonize::deserialize(&bytes).context("failed to deserialize hash bytes")
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "argonize=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Cli::parse();
    match args.command {
        Commands::Hash {
            argon2,
            salt,
            pepper,
            format,
        } => {
            let params = argon2.to_params();
            let password = auth::read_password("Password: ")?;

            let salt = match (salt, pepper) {
                (salt, Some(pepper)) => {
                    let base = match salt {
                        Some(s) => Salt::from(s.into_bytes()),
                        None => Salt::generate(params.salt_length(), &OsEntropy)?,
                    };
                    Some(base.with_pepper(pepper.as_bytes()))
                }
                (salt, None) => salt.map(|s| Salt::from(s.into_bytes())),
            };

            let hashed = argonize::hash_custom(password.as_bytes(), Some(&params), salt)
                .context("failed to hash password")?;
            drop(password);

            match format {
                Output::Phc => println!("{hashed}"),
                Output::Bytes => println!("{}", BASE64_STANDARD.encode(hashed.to_bytes()?)),
            }
        }
        Commands::Verify { encoded } => {
            let hashed = parse_encoded(&encoded)?;
            let password = auth::read_password("Password: ")?;

            if !hashed.is_valid(password.as_bytes()) {
                bail!("invalid password");
            }
            println!("valid");
        }
        Commands::Inspect { encoded } => {
            let hashed = parse_encoded(&encoded)?;
            let inspection = Inspection {
                variant: argonize::VARIANT,
                version: argonize::ARGON2_VERSION,
                params: hashed.params(),
            };
            println!("{}", serde_json::to_string_pretty(&inspection)?);
        }
    }

    Ok(())
}
