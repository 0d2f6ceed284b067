use std::{
    fs::File,
    io::{self, Seek, SeekFrom},
    path::{Path, PathBuf},
    time::Duration,
};

use libstress::clock::PhaseClock;
use tracing::debug;

use super::error::BenchError;

/// Duplicates one input file `copies` times into a trial directory.
///
/// Each invocation opens its own handle on the input and re-reads it from the
/// start for every copy.
#[derive(Debug, Clone)]
pub struct FileReplicator {
    input: PathBuf,
    copies: usize,
    clock: PhaseClock,
}

impl FileReplicator {
    pub fn new(input: impl Into<PathBuf>, copies: usize, clock: PhaseClock) -> Self {
        Self {
            input: input.into(),
            copies,
            clock,
        }
    }

    /// `gpl.txt` becomes `gpl.<index>.txt`.
    pub fn copy_name(&self, index: usize) -> String {
        let stem = self
            .input
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();

        match self.input.extension() {
            Some(ext) => format!("{}.{}.{}", stem, index, ext.to_string_lossy()),
            None => format!("{}.{}", stem, index),
        }
    }

    pub fn replicate(&self, dir: &Path) -> Result<Duration, BenchError> {
        let begin = self.clock.now();

        let open_input = |source| BenchError::OpenInput {
            path: self.input.clone(),
            source,
        };
        let mut input = File::open(&self.input).map_err(open_input)?;

        for i in 0..self.copies {
            let path = dir.join(self.copy_name(i));

            input.seek(SeekFrom::Start(0)).map_err(open_input)?;
            copy_into(&mut input, &path).map_err(|source| BenchError::WriteCopy { path, source })?;
        }

        let elapsed = self.clock.elapsed(begin);
        debug!(copies = self.copies, dir = %dir.display(), ?elapsed, "replicated input file");

        Ok(elapsed)
    }
}

fn copy_into(input: &mut File, path: &Path) -> io::Result<()> {
    let mut output = File::create(path)?;
    io::copy(input, &mut output)?;
    Ok(())
}
