use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_cli_compress_decompress_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("letters.txt");
    fs::write(&input, b"ABCDEFGHIJ")?;

    let mut cmd = Command::cargo_bin("parchunk")?;
    cmd.arg("compress").arg(&input).arg("--threads").arg("2");
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("Compressing '")
                .and(predicate::str::contains("Worker 0: processed 5 bytes starting at 0"))
                .and(predicate::str::contains("Worker 1: processed 5 bytes starting at 5"))
                .and(predicate::str::contains("Compression completed.")),
        );

    let compressed = dir.path().join("compressed_letters.txt");
    assert_eq!(fs::read(&compressed)?, b"EDCBAJIHGF");

    let mut cmd = Command::cargo_bin("parchunk")?;
    cmd.arg("decompress").arg(&compressed).arg("--threads").arg("2");
    cmd.assert().success().stdout(predicate::str::contains("Decompression completed."));

    let restored = dir.path().join("decompressed_compressed_letters.txt");
    assert_eq!(fs::read(&restored)?, b"ABCDEFGHIJ");
    Ok(())
}

#[test]
fn test_cli_explicit_output_and_xor() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("in.bin");
    let packed = dir.path().join("packed.bin");
    let unpacked = dir.path().join("unpacked.bin");
    let data: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
    fs::write(&input, &data)?;

    for (src, dst, sub) in [(&input, &packed, "c"), (&packed, &unpacked, "d")] {
        Command::cargo_bin("parchunk")?
            .args([sub, "--transform", "xor", "--xor-key", "129", "--threads", "7", "-o"])
            .arg(dst)
            .arg(src)
            .assert()
            .success();
    }

    assert_ne!(fs::read(&packed)?, data);
    assert_eq!(fs::read(&unpacked)?, data);
    Ok(())
}

#[test]
fn test_cli_empty_input_fails_without_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("empty.txt");
    fs::write(&input, b"")?;

    Command::cargo_bin("parchunk")?
        .arg("compress")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("empty")))
        .stdout(predicate::str::contains("Worker").not());

    assert!(!dir.path().join("compressed_empty.txt").exists());
    Ok(())
}

#[test]
fn test_cli_missing_input_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    Command::cargo_bin("parchunk")?
        .arg("compress")
        .arg(dir.path().join("nope.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not open"));
    Ok(())
}

#[test]
fn test_cli_plan_over_provisioned() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("abc.txt");
    fs::write(&input, b"abc")?;

    Command::cargo_bin("parchunk")?
        .args(["plan", "--threads", "8"])
        .arg(&input)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("3 chunks")
                .and(predicate::str::contains("Chunk 2: bytes [2, 3) (1 bytes)"))
                .and(predicate::str::contains("Chunk 3").not()),
        );
    Ok(())
}

#[test]
fn test_cli_threads_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("env.txt");
    fs::write(&input, b"0123456789ab")?;

    Command::cargo_bin("parchunk")?
        .env("PARCHUNK_THREADS", "3")
        .arg("plan")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 workers requested, 3 chunks"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_cli_unreadable_input_fails_after_completion() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let input = dir.path().join("locked.bin");
    fs::write(&input, b"0123456789")?;
    fs::set_permissions(&input, fs::Permissions::from_mode(0o000))?;
    if fs::File::open(&input).is_ok() {
        // Privileged users bypass file modes; workers could still read the input.
        return Ok(());
    }

    Command::cargo_bin("parchunk")?
        .arg("compress")
        .arg(&input)
        .args(["--threads", "2"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Compression completed.").and(predicate::str::contains("Worker").not()))
        .stderr(predicate::str::contains("2 of 2 chunks failed"));

    assert_eq!(fs::metadata(dir.path().join("compressed_locked.bin"))?.len(), 10);
    Ok(())
}
