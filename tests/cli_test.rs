use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

fn roundtrip(body: &[u8], b2f: bool) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("input.txt");
    let cmp_path = temp_dir.path().join("input.lzh");
    let out_path = temp_dir.path().join("output.txt");
    std::fs::write(&in_path, body)?;

    let mut compress = Command::cargo_bin("lzhuf-yapp")?;
    compress.arg("compress").arg("-i").arg(&in_path).arg("-o").arg(&cmp_path);
    if b2f {
        compress.arg("--b2f");
    }
    compress.assert().success();

    let mut expand = Command::cargo_bin("lzhuf-yapp")?;
    expand.arg("expand").arg("-i").arg(&cmp_path).arg("-o").arg(&out_path);
    if b2f {
        expand.arg("--b2f");
    }
    expand.assert().success();

    let roundtripped = std::fs::read(&out_path)?;
    assert_eq!(roundtripped, body);
    Ok(())
}

#[test]
fn compress_then_expand_round_trips_plain_text() -> STDRESULT {
    roundtrip(b"This is the chaunt of the priests.  The chaunt of the priests of Mung.", false)
}

#[test]
fn compress_then_expand_round_trips_with_b2f_prefix() -> STDRESULT {
    roundtrip(b"This is the chaunt of the priests.  The chaunt of the priests of Mung.", true)
}

#[test]
fn compress_then_expand_round_trips_repetitive_binary() -> STDRESULT {
    let body: Vec<u8> = (0..8000u32).map(|i| (i % 191) as u8).collect();
    roundtrip(&body, true)
}

#[test]
fn compress_rejects_empty_input() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("empty.txt");
    let out_path = temp_dir.path().join("empty.lzh");
    std::fs::write(&in_path, b"")?;

    let mut cmd = Command::cargo_bin("lzhuf-yapp")?;
    cmd.arg("compress").arg("-i").arg(&in_path).arg("-o").arg(&out_path);
    cmd.assert().failure().stderr(predicate::str::contains("empty"));
    Ok(())
}

#[test]
fn expand_rejects_missing_input_file() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let missing = temp_dir.path().join("does-not-exist.lzh");
    let out_path = temp_dir.path().join("out.txt");

    let mut cmd = Command::cargo_bin("lzhuf-yapp")?;
    cmd.arg("expand").arg("-i").arg(&missing).arg("-o").arg(&out_path);
    cmd.assert().failure();
    Ok(())
}
