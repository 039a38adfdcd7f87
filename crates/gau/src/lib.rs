//! Run Gaussian on one or more input files, rewriting their Link0 directives
//! and route sections on the way

pub mod args;
pub mod config;
pub mod cpus;
pub mod run;

/// print `$($t)*` to stderr and exit with status 1
#[macro_export]
macro_rules! die {
    ($($t:tt)*) => {{
        eprintln!("ERROR: {}", format!($($t)*));
        std::process::exit(1);
    }};
}
