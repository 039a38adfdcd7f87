use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;


static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*%\s*(\w*)\s*(?:=(.*))?").unwrap());

/// The logical key of a Link0 directive. Keys other than the four the
/// rewriter manages are kept as [Key::Other] with their lowercase name
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Key {
    /// `%Mem`
    Mem,
    /// `%NProc` or `%NProcShared`
    NProc,
    /// `%CPU`
    Cpu,
    /// `%Chk`. `%OldChk` is [Key::Other]
    Chk,
    Other(String),
}

impl Key {
    fn from_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "mem" => Self::Mem,
            "nproc" | "nprocshared" => Self::NProc,
            "cpu" => Self::Cpu,
            "chk" => Self::Chk,
            _ => Self::Other(name),
        }
    }

    /// the spelling used when writing a new directive for this key
    fn spelling(&self) -> &str {
        match self {
            Key::Mem => "Mem",
            Key::NProc => "NProcShared",
            Key::Cpu => "CPU",
            Key::Chk => "Chk",
            Key::Other(s) => s,
        }
    }
}

/// A single Link0 line. `line` is kept exactly as read (including its newline)
/// so that untouched directives are written back unchanged
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub key: Key,
    pub line: String,
}

impl Directive {
    /// build a new directive line for `key` with `value`
    pub fn new(key: Key, value: &str) -> Self {
        let line = format!("%{}={value}\n", key.spelling());
        Self { key, line }
    }

    /// classify an existing `%` line
    pub fn from_line(line: &str) -> Self {
        let key = DIRECTIVE
            .captures(line)
            .map(|c| Key::from_name(&c[1]))
            .unwrap_or_else(|| Key::Other(String::new()));
        Self {
            key,
            line: line.to_owned(),
        }
    }

    /// the text after `=`, up to an optional `!` comment, with surrounding
    /// whitespace removed. `None` for directives without a value, like
    /// `%NoSave`
    pub fn value(&self) -> Option<&str> {
        let raw = DIRECTIVE.captures(&self.line)?.get(2)?.as_str();
        let raw = raw.split('!').next().unwrap_or_default().trim();
        if raw.is_empty() { None } else { Some(raw) }
    }
}

/// The ordered Link0 (resource directive) section of a [JobDeck]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Link0 {
    directives: Vec<Directive>,
}

impl Link0 {
    pub fn new() -> Self {
        Self::default()
    }

    /// append a raw `%` line as read from an input file, without replacing any
    /// existing directive
    pub fn push_line(&mut self, line: &str) {
        self.directives.push(Directive::from_line(line));
    }

    /// return the first directive with `key`
    pub fn get(&self, key: &Key) -> Option<&Directive> {
        self.directives.iter().find(|d| &d.key == key)
    }

    /// return the value of the first directive with `key`
    pub fn value(&self, key: &Key) -> Option<&str> {
        self.get(key).and_then(Directive::value)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// remove every directive with `key`, then append a new one with `value`.
    /// after this call `key` occurs exactly once
    pub fn set(&mut self, key: Key, value: &str) {
        self.remove(&key);
        self.directives.push(Directive::new(key, value));
    }

    /// remove every directive with `key`
    pub fn remove(&mut self, key: &Key) {
        self.directives.retain(|d| &d.key != key);
    }

    /// the number of directives with `key`
    pub fn count(&self, key: &Key) -> usize {
        self.directives.iter().filter(|d| &d.key == key).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.directives.iter()
    }

    /// the raw lines, in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().map(|d| d.line.as_str())
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

impl<'a> IntoIterator for &'a Link0 {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One Gaussian job: Link0 directives, the route section, the optional title
/// and molecule specification, and whatever follows them
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JobDeck {
    pub link0: Link0,

    /// the route (`#`) section. never empty for a parsed deck
    pub route: Vec<String>,

    pub title: Vec<String>,

    /// charge and multiplicity followed by the geometry
    pub molecule: Vec<String>,

    /// everything after the molecule specification, without trailing blank
    /// lines
    pub tail: Vec<String>,

    /// the route reads the geometry from the checkpoint, so the title and
    /// molecule sections are absent
    pub geom_from_chk: bool,
}

impl JobDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// The small job run when the input file is named `test` and doesn't
    /// exist, for checking that an installation works
    pub fn test_job() -> Self {
        let mut link0 = Link0::new();
        link0.push_line("%NProcShared=1\n");
        link0.push_line("%Mem=1GB\n");
        Self {
            link0,
            route: vec!["# HF/3-21G\n".to_owned(), "Geom=(ModelA)\n".to_owned()],
            title: vec!["Test calculation\n".to_owned()],
            molecule: vec!["0 1\n".to_owned(), " C O H H \n".to_owned()],
            tail: Vec::new(),
            geom_from_chk: false,
        }
    }

    /// the checkpoint file name from `%Chk`
    pub fn chk(&self) -> Option<&str> {
        self.link0.value(&Key::Chk)
    }

    /// the memory from `%Mem`
    pub fn mem(&self) -> Option<&str> {
        self.link0.value(&Key::Mem)
    }

    /// the processor list from `%CPU`
    pub fn cpu(&self) -> Option<&str> {
        self.link0.value(&Key::Cpu)
    }

    /// the processor count from `%NProcShared` or `%NProc`, if present and
    /// numeric
    pub fn nproc(&self) -> Option<usize> {
        self.link0.value(&Key::NProc)?.parse().ok()
    }

    /// The number of processors Gaussian will use for this job: `%NProcShared`
    /// if set, otherwise the size of the `%CPU` list, otherwise 1
    pub fn nprocs(&self) -> usize {
        self.nproc()
            .or_else(|| self.cpu().and_then(count_cpus))
            .unwrap_or(1)
    }

    /// the route section joined into a single line
    pub fn route_line(&self) -> String {
        self.route
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// count the processors in a `%CPU` list like `0-7`, `0,2,4,6`, or `0-15/2`.
/// returns `None` for anything unparseable or too large to count
pub(crate) fn count_cpus(list: &str) -> Option<usize> {
    let mut n = 0;
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (range, step) = match item.split_once('/') {
            Some((r, s)) => (r, s.trim().parse::<usize>().ok()?),
            None => (item, 1),
        };
        if step == 0 {
            return None;
        }
        match range.split_once('-') {
            Some((lo, hi)) => {
                let lo: usize = lo.trim().parse().ok()?;
                let hi: usize = hi.trim().parse().ok()?;
                if hi < lo {
                    return None;
                }
                n = ((hi - lo) / step).checked_add(1)?.checked_add(n)?;
            }
            None => {
                range.trim().parse::<usize>().ok()?;
                n = n.checked_add(1)?;
            }
        }
    }
    if n > 0 { Some(n) } else { None }
}
