//! Installation paths and defaults for running Gaussian, optionally loaded from
//! a TOML file

use std::{
    collections::BTreeMap,
    fmt::Debug,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;


#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// The shell used to source the Gaussian profile and run the program.
    /// Defaults to /bin/bash.
    shell: Option<String>,

    /// Named Gaussian installations. The names can be passed to -g/--gauroot
    /// in place of a path.
    roots: Option<BTreeMap<String, PathBuf>>,

    /// The installation to use when -g/--gauroot is not given. Either a key of
    /// `roots` or a path.
    default_root: Option<String>,

    /// The Gaussian executable. Defaults to g16.
    command: Option<String>,

    /// The checkpoint formatting utility. Defaults to formchk.
    formchk: Option<String>,

    /// The %Mem value added to jobs that don't set one. Defaults to 1GB.
    default_mem: Option<String>,

    /// Candidate parent directories for the scratch directory, tried in
    /// order. The first one that exists is used, with $USER/gaussian appended.
    scratch: Option<Vec<PathBuf>>,

    /// The development tree and installation used by --fq.
    fq: Option<Fq>,
}

/// A Gaussian development build: a working tree whose executables override
/// those of an installation
#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Fq {
    pub working: PathBuf,

    /// a key of [Config::roots] or a path
    pub root: String,
}

/// Construct a full [Config] using [Config::load] on a TOML file, or use
/// [Config::default]
#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(from = "RawConfig")]
pub struct Config {
    pub shell: String,
    pub roots: BTreeMap<String, PathBuf>,
    pub default_root: String,
    pub command: String,
    pub formchk: String,
    pub default_mem: String,
    pub scratch: Vec<PathBuf>,
    pub fq: Fq,
}

fn default_roots() -> BTreeMap<String, PathBuf> {
    [
        ("a03", "/opt/gaussian/g16a03"),
        ("b01", "/opt/gaussian/g16b01"),
        ("c01", "/opt/gaussian/g16c01"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), PathBuf::from(v)))
    .collect()
}

fn default_scratch() -> Vec<PathBuf> {
    let mut ret: Vec<PathBuf> = ["/tmp", "/var/tmp", "/usr/tmp"]
        .into_iter()
        .map(PathBuf::from)
        .collect();
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        ret.push(home.join("tmp"));
        ret.push(home);
    }
    ret
}

impl From<RawConfig> for Config {
    fn from(rc: RawConfig) -> Self {
        Self {
            shell: rc.shell.unwrap_or_else(|| String::from("/bin/bash")),
            roots: rc.roots.unwrap_or_else(default_roots),
            default_root: rc.default_root.unwrap_or_else(|| "c01".to_owned()),
            command: rc.command.unwrap_or_else(|| "g16".to_owned()),
            formchk: rc.formchk.unwrap_or_else(|| "formchk".to_owned()),
            default_mem: rc
                .default_mem
                .unwrap_or_else(|| gjf::DEFAULT_MEM.to_owned()),
            scratch: rc.scratch.unwrap_or_else(default_scratch),
            fq: rc.fq.unwrap_or_else(|| Fq {
                working: PathBuf::from("/opt/gaussian/working/g16a03_fq"),
                root: "a03".to_owned(),
            }),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

impl Config {
    /// load a [Config] from the TOML file specified by `filename`. fields
    /// missing from the file take their default values
    pub fn load<P>(filename: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path> + Debug,
    {
        let contents = std::fs::read_to_string(&filename)
            .with_context(|| format!("failed to load config file {filename:?}"))?;
        toml::from_str(&contents).with_context(|| {
            format!("failed to deserialize config file {filename:?}")
        })
    }

    /// Resolve `root` to an installation directory: a key of `self.roots` is
    /// replaced by its path, anything else is taken as a path
    pub fn root(&self, root: &str) -> PathBuf {
        self.roots
            .get(root)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(root))
    }

    /// The default scratch directory: `$USER/gaussian` under the first
    /// existing directory in `self.scratch`. `None` if none of them exist
    pub fn scratch_dir(&self) -> Option<PathBuf> {
        let parent = self.scratch.iter().find(|p| p.is_dir())?;
        let user = std::env::var("USER").unwrap_or_else(|_| "gaussian".into());
        Some(parent.join(user).join("gaussian"))
    }
}
