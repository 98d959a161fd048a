//! Atomic report writes with automatic parent creation.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub fn atomic_write(dest: impl AsRef<Path>, bytes: impl AsRef<[u8]>) -> io::Result<()> {
    let dest = dest.as_ref();
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes.as_ref())?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("reports").join("lab.txt");
        atomic_write(&dest, "λ1 = 2").unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "λ1 = 2");
        atomic_write(&dest, "λ1 = 5").unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "λ1 = 5");
    }
}
