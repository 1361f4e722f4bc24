//! Gateway signing key generator for the local devnet.
//!
//! The devnet accepts input and decryption proofs only when they are signed
//! by this key. Point `MYSTERYBOX_GATEWAY_SEED_FILE` at the seed file to keep
//! proofs valid across runs.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_gateway_key -- --out-seed <path> [--out-pub <path>] [--force]
//! ```
//!
//! The seed is generated from OS entropy, written with 0600 permissions on
//! unix and wiped from memory afterwards. Only the public key is printed.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use zeroize::Zeroizing;

const USAGE: &str = "Usage: generate_gateway_key --out-seed <path> [--out-pub <path>] [--force]";

struct Args {
    out_seed: PathBuf,
    out_pub: Option<PathBuf>,
    force: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut out_seed = None;
    let mut out_pub = None;
    let mut force = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out-seed" => {
                let p = args.next().filter(|p| !p.is_empty()).ok_or_else(|| anyhow!(USAGE))?;
                out_seed = Some(PathBuf::from(p));
            }
            "--out-pub" => {
                let p = args.next().filter(|p| !p.is_empty()).ok_or_else(|| anyhow!(USAGE))?;
                out_pub = Some(PathBuf::from(p));
            }
            "--force" => force = true,
            "-h" | "--help" => return Ok(None),
            _ => bail!("Unknown arg: {arg}\n{USAGE}"),
        }
    }

    Ok(Some(Args {
        out_seed: out_seed.ok_or_else(|| anyhow!(USAGE))?,
        out_pub,
        force,
    }))
}

fn write_file(path: &Path, contents: &[u8], mode: u32, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("Refusing to overwrite existing file {:?}. Use --force.", path);
    }
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        opts.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = opts
        .open(path)
        .with_context(|| format!("Failed to open {path:?}"))?;
    file.write_all(contents)?;
    file.write_all(b"\n")?;
    Ok(())
}

fn main() -> Result<()> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!(
            "{USAGE}\n\nWrites the base64 Ed25519 gateway seed to <path> with 0600 permissions. Optionally writes the base64 public key to --out-pub. Prints only non-secret material."
        );
        return Ok(());
    };

    if let Some(pub_path) = &args.out_pub {
        if pub_path.exists() && !args.force {
            bail!("Refusing to overwrite existing file {:?}. Use --force.", pub_path);
        }
    }

    let mut seed = Zeroizing::new([0u8; 32]);
    OsRng.fill_bytes(&mut seed[..]);

    let signing_key = SigningKey::from_bytes(&seed);
    let verifying_key = signing_key.verifying_key();

    let seed_b64 = Zeroizing::new(general_purpose::STANDARD.encode(&seed[..]));
    let pub_b64 = general_purpose::STANDARD.encode(verifying_key.as_bytes());

    write_file(&args.out_seed, seed_b64.as_bytes(), 0o600, args.force)?;
    println!("Wrote gateway seed (base64) to {:?}", args.out_seed);

    if let Some(pub_path) = &args.out_pub {
        // Public key is non-secret; allow read access.
        write_file(pub_path, pub_b64.as_bytes(), 0o644, args.force)?;
        println!("Wrote gateway public key (base64) to {:?}", pub_path);
    }

    println!("GATEWAY_PUBKEY (base64)={pub_b64}");
    println!("export MYSTERYBOX_GATEWAY_SEED_FILE={}", args.out_seed.display());
    Ok(())
}
