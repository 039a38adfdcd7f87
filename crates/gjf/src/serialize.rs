use std::{
    fmt::{self, Display},
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::{JobDeck, LINK1};

impl Display for JobDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.link0.lines() {
            f.write_str(line)?;
        }
        for line in &self.route {
            f.write_str(line)?;
        }
        writeln!(f)?;
        if !self.geom_from_chk {
            for line in &self.title {
                f.write_str(line)?;
            }
            writeln!(f)?;
            for line in &self.molecule {
                f.write_str(line)?;
            }
            writeln!(f)?;
        }
        if !self.tail.is_empty() {
            for line in &self.tail {
                f.write_str(line)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Write `decks` to `w` as a single input file, with [LINK1] between
/// consecutive jobs
pub fn write_decks<W: Write>(w: &mut W, decks: &[JobDeck]) -> io::Result<()> {
    for (i, deck) in decks.iter().enumerate() {
        if i > 0 {
            writeln!(w, "{LINK1}")?;
        }
        write!(w, "{deck}")?;
    }
    Ok(())
}

/// render `decks` into a [String] in the same format as [write_decks]
pub fn to_string(decks: &[JobDeck]) -> String {
    use std::fmt::Write;
    let mut s = String::new();
    for (i, deck) in decks.iter().enumerate() {
        if i > 0 {
            writeln!(s, "{LINK1}").unwrap();
        }
        write!(s, "{deck}").unwrap();
    }
    s
}

/// Write `decks` to a new temporary file in `dir` named like `{stem}XXXXXX{ext}`.
/// The file is deleted when the returned handle is dropped
pub fn write_temp(
    decks: &[JobDeck],
    dir: impl AsRef<Path>,
    stem: &str,
    ext: &str,
) -> io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(stem)
        .suffix(ext)
        .tempfile_in(dir)?;
    write_decks(&mut file, decks)?;
    file.flush()?;
    log::debug!("wrote {}", file.path().display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Overrides, parse};

    #[test]
    fn display() {
        let got = JobDeck::test_job().to_string();
        let want = "%NProcShared=1\n%Mem=1GB\n# HF/3-21G\nGeom=(ModelA)\n\n\
                    Test calculation\n\n0 1\n C O H H \n\n";
        assert_eq!(got, want);
    }

    #[test]
    fn link1_between_jobs() {
        let mut second = JobDeck::new();
        second.route.push("# HF Geom=AllCheck\n".to_owned());
        second.geom_from_chk = true;
        let decks = [JobDeck::test_job(), second];
        let got = to_string(&decks);
        assert!(got.ends_with("\n\n--Link1--\n# HF Geom=AllCheck\n\n"));

        let mut buf = Vec::new();
        write_decks(&mut buf, &decks).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), got);
    }

    #[test]
    fn temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut decks = parse("# HF\n\nt\n\n0 1\nH\n\n").unwrap();
        Overrides::default().apply(&mut decks, 1).unwrap();
        let file = write_temp(&decks, dir.path(), "water", ".gjf").unwrap();
        let name = file.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("water"));
        assert!(name.ends_with(".gjf"));
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "%Mem=1GB\n# HF\n\nt\n\n0 1\nH\n\n"
        );
        let path = file.path().to_owned();
        drop(file);
        assert!(!path.exists());
    }
}
