use std::path::Path;

use assert_cmd::Command;
use tempfile::{TempDir, tempdir};
use test_case::test_case;

/// a scratch directory holding copies of `files` from testfiles, and a
/// [Command] for gau running inside it with a fake installation and scratch
/// directory
fn setup(files: &[&str]) -> std::io::Result<(TempDir, Command)> {
    let dir = tempdir()?;
    for file in files {
        std::fs::copy(Path::new("testfiles").join(file), dir.path().join(file))?;
    }
    let mut cmd = Command::cargo_bin("gau").unwrap();
    cmd.current_dir(&dir)
        .env_remove("RUST_LOG")
        .arg("--dry")
        .arg("-g")
        .arg(dir.path())
        .arg("-t")
        .arg(dir.path());
    Ok((dir, cmd))
}

#[test]
fn dry_run() -> std::io::Result<()> {
    let (_dir, mut cmd) = setup(&["water.gjf"])?;
    let output = cmd.args(["-p", "1", "water.gjf"]).output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let want = "%Chk=water.chk
%Mem=2GB
%NProcShared=1
# B3LYP/6-31G(d) Opt

water optimization

0 1
O    0.000000    0.000000    0.117790
H    0.000000    0.755453   -0.471161
H    0.000000   -0.755453   -0.471161

--Link1--
%Chk=water.chk
%Mem=2GB
%NProcShared=1
# B3LYP/6-31G(d) Freq Geom=AllCheck Guess=Read

";
    assert_eq!(String::from_utf8_lossy(&output.stdout), want);
    Ok(())
}

#[test]
fn memory_and_keywords() -> std::io::Result<()> {
    let (_dir, mut cmd) = setup(&["water.gjf"])?;
    let output = cmd
        .args(["-p", "1", "-m", "16", "-a", "SCF=Tight", "water.gjf"])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("%Mem=16GB\n").count(), 2);
    assert!(!stdout.contains("%Mem=2GB"));
    assert_eq!(stdout.matches("SCF=Tight\n\n").count(), 2);
    Ok(())
}

#[test]
fn builtin_test_job() -> std::io::Result<()> {
    let (_dir, mut cmd) = setup(&[])?;
    let output = cmd.arg("test").output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "%NProcShared=1\n%Mem=1GB\n# HF/3-21G\nGeom=(ModelA)\n\n\
         Test calculation\n\n0 1\n C O H H \n\n"
    );
    Ok(())
}

#[test]
fn json() -> std::io::Result<()> {
    let (_dir, mut cmd) = setup(&["water.gjf"])?;
    let output = cmd.args(["--json", "-p", "1", "water.gjf"]).output()?;
    assert!(output.status.success());
    let got: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let decks = got.as_array().unwrap();
    assert_eq!(decks.len(), 2);
    assert_eq!(decks[0]["geom_from_chk"], false);
    assert_eq!(decks[1]["geom_from_chk"], true);
    assert_eq!(decks[1]["title"].as_array().unwrap().len(), 0);
    Ok(())
}

#[test]
fn missing_route() -> std::io::Result<()> {
    let (_dir, mut cmd) = setup(&["noroute.gjf"])?;
    let output = cmd.arg("noroute.gjf").output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("route section not found in job 1"), "{stderr}");
    Ok(())
}

#[test_case(&["water.inp"], "Invalid file extension"; "extension")]
#[test_case(&["-p", "none", "water.gjf"], "invalid value"; "nproc")]
#[test_case(&["-m", "0", "water.gjf"], "invalid value"; "mem")]
fn rejected(args: &[&str], msg: &str) -> std::io::Result<()> {
    let (_dir, mut cmd) = setup(&["water.gjf"])?;
    let output = cmd.args(args).output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(msg), "{stderr}");
    Ok(())
}

#[test]
fn bad_root() -> std::io::Result<()> {
    let dir = tempdir()?;
    let output = Command::cargo_bin("gau")
        .unwrap()
        .current_dir(&dir)
        .args(["--dry", "-g", "/nonexistent/g16", "test"])
        .output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid Gaussian directory"), "{stderr}");
    Ok(())
}
