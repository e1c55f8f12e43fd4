use predicates::prelude::*;
use serde_json::{json, Value};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct SampleFile {
    dir: TempDir,
    save_path: PathBuf,
}

fn sbvj() -> Result<assert_cmd::Command, Box<dyn Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("sbvj")?;
    cmd.env_remove("SBVJ_UTF8")
        .env_remove("SBVJ_BYTE_STRUCT")
        .env_remove("SBVJ_ORDERED_MAP")
        .env_remove("RUST_LOG");
    Ok(cmd)
}

fn pack(dir: &Path, name: &str, envelope: &Value) -> Result<PathBuf, Box<dyn Error>> {
    let json_path = dir.join(format!("{name}.json"));
    let save_path = dir.join(format!("{name}.player"));
    fs::write(&json_path, serde_json::to_vec(envelope)?)?;

    sbvj()?
        .args([
            "pack",
            json_path.to_str().unwrap(),
            "-o",
            save_path.to_str().unwrap(),
        ])
        .assert()
        .success();
    Ok(save_path)
}

fn player(level: i64) -> Value {
    json!({
        "entity": "PlayerEntity",
        "content": {
            "name": "Alen",
            "level": level,
            "position": [12.5, -3.0],
            "ship": null,
            "alive": true
        }
    })
}

fn build_sample_file() -> Result<SampleFile, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let save_path = pack(dir.path(), "hero", &player(12))?;
    Ok(SampleFile { dir, save_path })
}

#[test]
fn pack_writes_sbvj01_marker() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_file()?;
    let bytes = fs::read(&sample.save_path)?;
    assert_eq!(&bytes[..6], b"SBVJ01");
    assert_eq!(bytes[6], 12);
    assert_eq!(&bytes[7..19], b"PlayerEntity");
    assert_eq!(&bytes[19..24], &[0u8; 5]);
    Ok(())
}

#[test]
fn dump_reproduces_envelope() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_file()?;
    let output = sbvj()?
        .args(["dump", sample.save_path.to_str().unwrap(), "--compact"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["format"], "SBVJ01");
    assert_eq!(value["entity"], "PlayerEntity");
    assert_eq!(value["flags"], json!([0, 0, 0, 0, 0]));
    assert_eq!(value["content"], player(12)["content"]);

    let keys: Vec<&String> = value["content"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["name", "level", "position", "ship", "alive"]);
    Ok(())
}

#[test]
fn info_summarises_header() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_file()?;
    sbvj()?
        .args(["info", sample.save_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entity: PlayerEntity"))
        .stdout(predicate::str::contains("Flags: 00 00 00 00 00"))
        .stdout(predicate::str::contains("Content: map (5 keys)"));
    Ok(())
}

#[test]
fn verify_accepts_packed_file() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_file()?;
    sbvj()?
        .args(["verify", sample.save_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("OK"));
    Ok(())
}

#[test]
fn verify_reports_non_minimal_varint() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("padded.player");
    let mut bytes = b"SBVJ01\x01E\x00\x00\x00\x00\x00".to_vec();
    // int 1 with a padded zig-zag varint
    bytes.extend_from_slice(&[0x04, 0x80, 0x02]);
    fs::write(&path, &bytes)?;

    sbvj()?
        .args(["verify", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("first difference at offset 14"));
    Ok(())
}

#[test]
fn verify_rejects_trailing_bytes() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_file()?;
    let mut bytes = fs::read(&sample.save_path)?;
    bytes.push(0x01);
    fs::write(&sample.save_path, &bytes)?;

    sbvj()?
        .args(["verify", sample.save_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Trailing bytes"));
    Ok(())
}

#[test]
fn diff_identical_files_succeeds() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_file()?;
    let other = pack(sample.dir.path(), "copy", &player(12))?;
    sbvj()?
        .args([
            "diff",
            sample.save_path.to_str().unwrap(),
            other.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 difference(s)"));
    Ok(())
}

#[test]
fn diff_reports_changed_value() -> Result<(), Box<dyn Error>> {
    let sample = build_sample_file()?;
    let other = pack(sample.dir.path(), "levelled", &player(13))?;
    sbvj()?
        .args([
            "diff",
            sample.save_path.to_str().unwrap(),
            other.to_str().unwrap(),
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("base.level"))
        .stdout(predicate::str::contains("1 difference(s)"));
    Ok(())
}

#[test]
fn non_ascii_requires_utf8_flag() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let json_path = dir.path().join("crew.json");
    let save_path = dir.path().join("crew.player");
    let envelope = json!({ "entity": "Crew", "content": "naïve" });
    fs::write(&json_path, serde_json::to_vec(&envelope)?)?;

    sbvj()?
        .args([
            "pack",
            json_path.to_str().unwrap(),
            "-o",
            save_path.to_str().unwrap(),
        ])
        .assert()
        .failure();

    sbvj()?
        .args([
            "--utf8",
            "pack",
            json_path.to_str().unwrap(),
            "-o",
            save_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    sbvj()?
        .args(["dump", save_path.to_str().unwrap(), "--utf8", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("naïve"));
    Ok(())
}

#[test]
fn pack_rejects_bad_format_marker() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let envelope = json!({ "format": "SBVJ1", "entity": "E", "content": null });
    let json_path = dir.path().join("bad.json");
    fs::write(&json_path, serde_json::to_vec(&envelope)?)?;

    sbvj()?
        .args([
            "pack",
            json_path.to_str().unwrap(),
            "-o",
            dir.path().join("bad.player").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("format marker"));
    Ok(())
}
