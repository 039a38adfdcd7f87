//! Value parsers for the command-line options that become Link0 directives

use std::{fmt::Display, str::FromStr};

use crate::cpus::Cpus;

/// A processor count given on the command line, either literally or relative
/// to the machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NProc {
    Count(usize),
    /// every processor in the machine
    All,
    /// half of the processors in the machine
    Half,
    /// the processors not currently busy
    Free,
    /// half of the free processors
    HalfFree,
}

impl NProc {
    /// the number of processors `self` stands for on a machine with `cpus`
    pub fn resolve(&self, cpus: &Cpus) -> usize {
        match self {
            NProc::Count(n) => *n,
            NProc::All => cpus.total,
            NProc::Half => (cpus.total / 2).max(1),
            NProc::Free => cpus.free.max(1),
            NProc::HalfFree => (cpus.free / 2).max(1),
        }
    }
}

impl FromStr for NProc {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "max" => Ok(Self::All),
            "half" | "hlf" => Ok(Self::Half),
            "free" | "rest" => Ok(Self::Free),
            "halfree" | "hlfree" => Ok(Self::HalfFree),
            n => match n.parse::<usize>() {
                Ok(0) => Err(String::from("processor count must be positive")),
                Ok(n) => Ok(Self::Count(n)),
                Err(_) => Err(format!(
                    "invalid processor count `{s}`, expected a number or one \
                     of all, max, half, hlf, free, rest, halfree, hlfree"
                )),
            },
        }
    }
}

impl Display for NProc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NProc::Count(n) => write!(f, "{n}"),
            NProc::All => write!(f, "all"),
            NProc::Half => write!(f, "half"),
            NProc::Free => write!(f, "free"),
            NProc::HalfFree => write!(f, "halfree"),
        }
    }
}

/// parse a `--mem` value. bare integers up to 128 are taken as GB and larger
/// ones as MB. anything else is passed to Gaussian as written
pub fn parse_mem(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err(String::from("memory can't be empty"));
    }
    match s.parse::<u64>() {
        Ok(0) => Err(String::from("memory must be positive")),
        Ok(n) if n <= 128 => Ok(format!("{n}GB")),
        Ok(n) => Ok(format!("{n}MB")),
        Err(_) => Ok(s.to_owned()),
    }
}
