use std::path::PathBuf;

use clap::Parser;
use gau::{
    args::{NProc, parse_mem},
    config::Config,
    cpus::Cpus,
    die,
    run::{Launcher, load_decks, output_path, valid_input},
};
use gjf::{Overrides, Syntax};

/// Run Gaussian 16 on one or more input files
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// Input file(s) with .com or .gjf extensions. An input named `test` that
    /// doesn't exist runs a small built-in job
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Output file. Defaults to the input name with a .log extension. With
    /// several inputs, every run after the first is appended
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gaussian installation directory, or the name of one from the config
    #[arg(short, long, value_name = "GAUROOT")]
    gauroot: Option<String>,

    /// Development working tree whose executables take precedence over the
    /// installation
    #[arg(short, long, value_name = "WRKDIR")]
    working: Option<PathBuf>,

    /// Extra route keywords to add to every job. May be repeated
    #[arg(short, long = "add", value_name = "KEYWORDS")]
    add: Vec<String>,

    /// Memory for every job. Bare numbers up to 128 are GB, larger ones MB
    #[arg(short, long, value_parser = parse_mem)]
    mem: Option<String>,

    /// Number of processors: a number or one of all, max, half, hlf, free,
    /// rest, halfree, hlfree
    #[arg(short = 'p', long)]
    nproc: Option<NProc>,

    /// List of processors for %CPU, replaces the input's processor count
    #[arg(short = 'c', long, value_name = "CPULIST")]
    cpulist: Option<String>,

    /// Scratch directory. Defaults to $USER/gaussian in the first existing
    /// directory from the config's scratch list
    #[arg(short, long = "tmp", value_name = "GAUSS_SCRDIR")]
    tmp: Option<PathBuf>,

    /// Add a checkpoint file to every job that doesn't have one
    #[arg(long, default_value_t = false)]
    chk: bool,

    /// Make formatted checkpoint files after the run
    #[arg(long, default_value_t = false)]
    fchk: bool,

    /// Use the FQ development build from the config
    #[arg(long, default_value_t = false)]
    fq: bool,

    /// TOML file with installation paths and defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase the printing level. May be repeated
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Rewrite the inputs and print them without running Gaussian
    #[arg(long, default_value_t = false, hide = true)]
    dry: bool,

    /// Print the rewritten jobs as JSON and exit
    #[arg(long, default_value_t = false, hide = true)]
    json: bool,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level),
    )
    .init();
}

/// `dir` if it's a directory, otherwise exit with an error naming `what`
fn check_dir(dir: PathBuf, what: &str) -> PathBuf {
    if !dir.is_dir() {
        die!("Invalid {what} {}", dir.display());
    }
    dir
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    for input in &args.inputs {
        if !valid_input(input) {
            die!("Invalid file extension for {}", input.display());
        }
    }

    let (root, working) = if args.fq {
        (config.root(&config.fq.root), Some(config.fq.working.clone()))
    } else {
        let root = args.gauroot.as_deref().unwrap_or(&config.default_root);
        (config.root(root), args.working.clone())
    };
    let root = check_dir(root, "Gaussian directory");
    let working = working.map(|w| check_dir(w, "Gaussian working directory"));

    let scratch = match args.tmp.clone().or_else(|| config.scratch_dir()) {
        Some(s) => s,
        None => die!("no directory for Gaussian scratch files"),
    };
    if args.tmp.is_none() {
        std::fs::create_dir_all(&scratch)?;
    }
    let scratch = check_dir(scratch, "Gaussian scratch directory");
    log::info!("Gaussian directory set to {}", root.display());
    log::info!("Gaussian scratch directory set to {}", scratch.display());

    let cpus = Cpus::detect();
    let nproc = args.nproc.map(|n| {
        let count = n.resolve(&cpus);
        log::info!("--nproc {n} resolved to {count} processor(s)");
        count
    });
    let syntax = Syntax::default();
    let launcher = Launcher::new(&config, root, scratch.clone(), working);

    for (i, input) in args.inputs.iter().enumerate() {
        let mut decks = match load_decks(input, &syntax) {
            Ok(d) => d,
            Err(e) => die!("{e:#}"),
        };

        let overrides = Overrides {
            nproc,
            cpu: args.cpulist.clone(),
            mem: args.mem.clone(),
            keywords: args.add.clone(),
            chk: args.chk,
            fchk: args.fchk,
            chk_name: input.with_extension("chk").display().to_string(),
            default_mem: config.default_mem.clone(),
        };
        if let Err(errs) = overrides.apply(&mut decks, cpus.free) {
            for e in errs {
                log::warn!("{}: {e}", input.display());
            }
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(&decks)?);
            continue;
        }

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = input
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_else(|| String::from(".gjf"));
        let tmp = gjf::write_temp(&decks, &scratch, &stem, &ext)?;
        log::info!("Written file {}", tmp.path().display());

        let output = output_path(input, args.output.as_deref());
        let append = args.output.is_some() && i > 0;

        if args.dry {
            print!("{}", gjf::to_string(&decks));
            log::info!(
                "{} < {} > {}",
                launcher.gaussian_cmd(),
                tmp.path().display(),
                output.display()
            );
        } else {
            match launcher.run(tmp.path(), &output, append) {
                Ok(()) if args.fchk => launcher.formchk(&decks),
                Ok(()) => {}
                Err(e) => log::warn!(
                    "Calculation on {} failed: {e:#}",
                    input.display()
                ),
            }
        }

        remove_temp(tmp);
    }

    Ok(())
}

fn remove_temp(tmp: tempfile::NamedTempFile) {
    let name = tmp.path().display().to_string();
    match tmp.close() {
        Ok(()) => log::info!("File {name} removed"),
        Err(e) => log::warn!("failed to remove {name}: {e}"),
    }
}
