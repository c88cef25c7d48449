
use ab_blake2s::{Blake2s, Blake2sDigest, Blake2sError, OUT_LEN};
use clap::Parser;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Message that is hashed when no files are specified
pub(crate) const DEFAULT_MESSAGE: &str = "ajay";
/// Size of a single read from the file being hashed
pub(crate) const READ_CHUNK_SIZE: usize = 64;

/// Error for [`Cli`]
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    /// Invalid output length or key
    #[error("Invalid hashing parameters: {error}")]
    Parameters {
        /// Low-level error
        #[from]
        error: Blake2sError,
    },
    /// Failed to open the file
    #[error("Unable to open {}: {error}", .path.display())]
    OpenFile {
        /// Path to the file
        path: PathBuf,
        /// Low-level error
        error: io::Error,
    },
    /// Failed to read the file
    #[error("Unable to read {}: {error}", .path.display())]
    ReadFile {
        /// Path to the file
        path: PathBuf,
        /// Low-level error
        error: io::Error,
    },
    /// Failed to write results
    #[error("Failed to write output: {error}")]
    WriteOutput {
        /// Low-level error
        error: io::Error,
    },
}

/// Hex-encoded key
#[derive(Debug, Default, Clone)]
pub(crate) struct HexKey(Vec<u8>);

impl FromStr for HexKey {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(Self)
    }
}

/// Print BLAKE2s digests of files, or of the default message if no files are specified
#[derive(Debug, Parser)]
#[clap(about, version)]
pub(crate) struct Cli {
    /// Files to hash, processed in order.
    ///
    /// Processing stops at the first file that can't be opened or read.
    files: Vec<PathBuf>,
    /// Hex-encoded secret key, up to 32 bytes
    #[arg(long)]
    key: Option<HexKey>,
    /// Digest length in bytes, from 1 to 32
    #[arg(long, default_value_t = OUT_LEN)]
    length: usize,
}

impl Cli {
    /// Run the command, printing results to stdout
    pub(crate) fn run(self) -> Result<(), CliError> {
        self.run_with_output(&mut io::stdout().lock())
    }

    fn run_with_output<W>(self, output: &mut W) -> Result<(), CliError>
    where
        W: Write,
    {
        let Self { files, key, length } = self;
        let key = key.unwrap_or_default();

        // Parameters are checked before any file is touched
        let hasher = Blake2s::new_keyed(length, &key.0)?;
        let label = digest_label(length);

        if files.is_empty() {
            info!("No files were specified, hashing default message");

            let mut hasher = hasher;
            hasher.update(DEFAULT_MESSAGE.as_bytes());
            let digest = hasher.finalize();

            writeln!(
                output,
                "{label} HASH for \"{DEFAULT_MESSAGE}\": {}",
                hex::encode(digest)
            )
            .map_err(|error| CliError::WriteOutput { error })?;

            return Ok(());
        }

        for path in &files {
            let digest = hash_file(path, hasher.clone())?;

            writeln!(
                output,
                "{label} HASH for \"{}\" is: {}",
                path.display(),
                hex::encode(digest)
            )
            .map_err(|error| CliError::WriteOutput { error })?;
        }

        Ok(())
    }
}

/// Algorithm name for digests of `length` bytes, `BLAKE2s-256` for the full length
pub(crate) fn digest_label(length: usize) -> String {
    format!("BLAKE2s-{}", length * 8)
}

/// Stream file contents through `hasher` in [`READ_CHUNK_SIZE`] reads
fn hash_file(path: &Path, mut hasher: Blake2s) -> Result<Blake2sDigest, CliError> {
    let mut file = File::open(path).map_err(|error| CliError::OpenFile {
        path: path.to_path_buf(),
        error,
    })?;

    let mut chunk = [0; READ_CHUNK_SIZE];
    loop {
        let bytes_read = match file.read(&mut chunk) {
            Ok(0) => {
                break;
            }
            Ok(bytes_read) => bytes_read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {
                continue;
            }
            Err(error) => {
                return Err(CliError::ReadFile {
                    path: path.to_path_buf(),
                    error,
                });
            }
        };

        hasher.update(&chunk[..bytes_read]);
    }

    debug!(path = %path.display(), bytes = hasher.count(), "File hashed");

    Ok(hasher.finalize())
}
