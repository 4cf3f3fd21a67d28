//! Program archive for saving evolved programs to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::compute::Program;

/// Directory that receives per-generation program snapshots.
#[derive(Debug, Clone)]
pub struct ProgramArchive {
    output_dir: PathBuf,
}

impl ProgramArchive {
    /// Create the archive, creating `dir` if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let output_dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Path of the snapshot for `generation`.
    pub fn generation_path(&self, generation: usize) -> PathBuf {
        self.output_dir.join(format!("gen{generation}.txt"))
    }

    /// Save the best program of a generation as `gen<N>.txt`.
    pub fn save_generation(&self, generation: usize, program: &Program) -> io::Result<PathBuf> {
        let path = self.generation_path(generation);
        save_program(&path, program)?;
        Ok(path)
    }
}

/// Write a program in text format to `path`, replacing any existing file.
pub fn save_program<P: AsRef<Path>>(path: P, program: &Program) -> io::Result<()> {
    fs::write(path, program.serialize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_save_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.txt");
        let program = Program::random(5, &mut StdRng::seed_from_u64(42));

        save_program(&path, &program).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, program.to_string());
        assert_eq!(text.lines().count(), 45);
    }

    #[test]
    fn test_archive_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("a");
        let archive = ProgramArchive::new(&nested).unwrap();
        assert!(nested.is_dir());

        let program = Program::random(3, &mut StdRng::seed_from_u64(1));
        let path = archive.save_generation(7, &program).unwrap();
        assert_eq!(path, nested.join("gen7.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), program.serialize());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("best.txt");
        let program = Program::random(2, &mut StdRng::seed_from_u64(2));
        assert!(save_program(path, &program).is_err());
    }
}
