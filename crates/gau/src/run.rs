use std::{
    collections::BTreeSet,
    ffi::OsStr,
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, bail};
use gjf::{JobDeck, Syntax};

use crate::config::Config;

/// Input file extensions Gaussian accepts
pub const EXTENSIONS: [&str; 2] = ["com", "gjf"];

/// the input name that runs [JobDeck::test_job] when no such file exists
pub const TEST_INPUT: &str = "test";

/// Whether `path` is an acceptable input file name
pub fn valid_input(path: &Path) -> bool {
    path == Path::new(TEST_INPUT)
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| EXTENSIONS.contains(&e))
}

/// Read and parse the jobs in `path`. A missing file named [TEST_INPUT] gives
/// the built-in test job
pub fn load_decks(path: &Path, syntax: &Syntax) -> anyhow::Result<Vec<JobDeck>> {
    if !path.exists() && path.file_stem() == Some(OsStr::new(TEST_INPUT)) {
        log::info!("running the built-in test job");
        return Ok(vec![JobDeck::test_job()]);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let decks = syntax
        .parse(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(decks)
}

/// The output file for `input`: `output` if given, otherwise `input` with a
/// `.log` extension
pub fn output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(o) => o.to_owned(),
        None => input.with_extension("log"),
    }
}

/// the distinct checkpoint files named in `decks`
pub fn checkpoints(decks: &[JobDeck]) -> BTreeSet<String> {
    decks.iter().filter_map(|d| d.chk()).map(String::from).collect()
}

/// Runs Gaussian and its utilities from one installation
#[derive(Debug)]
pub struct Launcher<'a> {
    config: &'a Config,

    /// the Gaussian installation directory, the value of `g16root`
    root: PathBuf,

    /// the scratch directory, the value of `GAUSS_SCRDIR`
    scratch: PathBuf,

    /// an optional development tree whose executables take precedence
    working: Option<PathBuf>,
}

impl<'a> Launcher<'a> {
    pub fn new(
        config: &'a Config,
        root: PathBuf,
        scratch: PathBuf,
        working: Option<PathBuf>,
    ) -> Self {
        Self {
            config,
            root,
            scratch,
            working,
        }
    }

    /// the shell command that loads the Gaussian environment
    fn source_profile(&self) -> String {
        format!(
            "source {}",
            self.root.join("g16").join("bsd").join("g16.profile").display()
        )
    }

    /// The full shell command for running Gaussian, reading the input from
    /// stdin. With a working tree, `working/exe-dir` (if it exists) and
    /// `working` are put in front of `$GAUSS_EXEDIR`
    pub fn gaussian_cmd(&self) -> String {
        let mut cmd = format!("{}; {}", self.source_profile(), self.config.command);
        if let Some(working) = &self.working {
            let mut exedir = Vec::new();
            let srcexe = working.join("exe-dir");
            if srcexe.is_dir() {
                exedir.push(srcexe.display().to_string());
            }
            exedir.push(working.display().to_string());
            exedir.push(String::from("$GAUSS_EXEDIR"));
            cmd.push_str(&format!(" -exedir=\"{}\"", exedir.join(":")));
        }
        cmd
    }

    /// the `formchk` command converting `chk` to a `.fchk` file next to it
    pub fn formchk_cmd(&self, chk: &str) -> String {
        let fchk = Path::new(chk).with_extension("fchk");
        format!(
            "{}; {} {chk} {}",
            self.source_profile(),
            self.config.formchk,
            fchk.display()
        )
    }

    /// a [Command] running `script` in the configured shell with the Gaussian
    /// variables set
    fn command(&self, script: &str) -> Command {
        let mut cmd = Command::new(&self.config.shell);
        cmd.arg("-c")
            .arg(script)
            .env("g16root", &self.root)
            .env("GAUSS_SCRDIR", &self.scratch);
        cmd
    }

    /// Run Gaussian on `input`, writing its output to `output`. When `append`
    /// is true, `output` is appended to instead of truncated
    pub fn run(
        &self,
        input: &Path,
        output: &Path,
        append: bool,
    ) -> anyhow::Result<()> {
        let stdin = File::open(input)
            .with_context(|| format!("failed to open {}", input.display()))?;
        let stdout = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(output)
            .with_context(|| format!("failed to open {}", output.display()))?;
        let script = self.gaussian_cmd();
        log::info!("{script} < {} > {}", input.display(), output.display());
        let status = self
            .command(&script)
            .stdin(stdin)
            .stdout(stdout)
            .status()
            .with_context(|| format!("failed to start {}", self.config.shell))?;
        if !status.success() {
            bail!("{} exited with {status}", self.config.command);
        }
        Ok(())
    }

    /// Run `formchk` on every checkpoint file named in `decks`. Failures are
    /// logged and skipped
    pub fn formchk(&self, decks: &[JobDeck]) {
        for chk in checkpoints(decks) {
            let script = self.formchk_cmd(&chk);
            log::info!("{script}");
            match self.command(&script).output() {
                Ok(out) if out.status.success() => {
                    log::debug!("{}", String::from_utf8_lossy(&out.stdout));
                }
                Ok(out) => log::warn!(
                    "{} {chk} failed with `{}`",
                    self.config.formchk,
                    String::from_utf8_lossy(&out.stderr).trim()
                ),
                Err(e) => log::warn!("{} {chk} failed with {e}", self.config.formchk),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;

    #[test_case("water.gjf", true)]
    #[test_case("dir/water.com", true)]
    #[test_case("test", true)]
    #[test_case("water.inp", false)]
    #[test_case("water", false)]
    #[test_case("water.GJF", false)]
    fn valid(path: &str, want: bool) {
        assert_eq!(valid_input(Path::new(path)), want);
    }

    #[test]
    fn outputs() {
        assert_eq!(
            output_path(Path::new("dir/water.gjf"), None),
            PathBuf::from("dir/water.log")
        );
        assert_eq!(
            output_path(Path::new("water.gjf"), Some(Path::new("all.out"))),
            PathBuf::from("all.out")
        );
    }

    #[test]
    fn test_job() {
        let got = load_decks(Path::new("test"), &Syntax::default()).unwrap();
        assert_eq!(got, [JobDeck::test_job()]);
    }

    #[test]
    fn parse_failure() {
        let got = load_decks(Path::new("testfiles/noroute.gjf"), &Syntax::default());
        let err = format!("{:#}", got.unwrap_err());
        assert!(err.contains("route section not found"), "{err}");
    }

    #[test]
    fn chks() {
        let input = std::fs::read_to_string("testfiles/water.gjf").unwrap();
        let decks = gjf::parse(&input).unwrap();
        assert_eq!(checkpoints(&decks).into_iter().collect::<Vec<_>>(), ["water.chk"]);
    }

    #[test]
    fn commands() {
        let config = Config::default();
        let launcher = Launcher::new(
            &config,
            PathBuf::from("/opt/g16"),
            PathBuf::from("/tmp/scr"),
            None,
        );
        assert_eq!(
            launcher.gaussian_cmd(),
            "source /opt/g16/g16/bsd/g16.profile; g16"
        );
        assert_eq!(
            launcher.formchk_cmd("out/water.chk"),
            "source /opt/g16/g16/bsd/g16.profile; formchk out/water.chk out/water.fchk"
        );
    }

    #[test]
    fn working_tree() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let working = dir.path().to_owned();
        let launcher = Launcher::new(
            &config,
            PathBuf::from("/opt/g16"),
            PathBuf::from("/tmp/scr"),
            Some(working.clone()),
        );
        let want = format!(
            "source /opt/g16/g16/bsd/g16.profile; g16 -exedir=\"{}:$GAUSS_EXEDIR\"",
            working.display()
        );
        assert_eq!(launcher.gaussian_cmd(), want);

        std::fs::create_dir(working.join("exe-dir")).unwrap();
        let want = format!(
            "source /opt/g16/g16/bsd/g16.profile; g16 -exedir=\"{}:{}:$GAUSS_EXEDIR\"",
            working.join("exe-dir").display(),
            working.display()
        );
        assert_eq!(launcher.gaussian_cmd(), want);
    }

    #[test]
    fn run_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.gjf");
        std::fs::write(&input, "# HF\n\nt\n\n0 1\nH\n\n").unwrap();
        let config = Config {
            command: String::from("false"),
            ..Config::default()
        };
        // there's no profile to source either, so this fails either way
        let launcher = Launcher::new(
            &config,
            dir.path().to_owned(),
            dir.path().to_owned(),
            None,
        );
        let got = launcher.run(&input, &dir.path().join("in.log"), false);
        assert!(got.is_err());
        assert!(dir.path().join("in.log").exists());
    }
}
