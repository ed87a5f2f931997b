//! Runs the CLI commands in order on a small generated study.

use cortexgan::cli::run_command;
use cortexgan::config::{parse_args, load_spec};
use cortexgan::data::{LatentArchive, ResponseArchive};
use cortexgan::latent::{sample_noise, seeded_rng};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = r#"
generator:
  z_dim: 6
  w_dim: 4
  num_ws: 2
  resolution: 32
generation:
  n_train: 10
  n_test: 5
  batch_size: 3
features:
  layers: [pool4]
  pyramid:
    widths: [2, 2, 2, 2, 2]
    input_size: 32
extraction:
  batch_size: 5
  n_batches: 2
encoding:
  alphas: [1.0]
  folds: 2
data:
  mask:
    excluded: { start: 0, end: 0 }
regions:
  - { name: all, start: 0, end: 5 }
"#;

fn run(args: &[&str]) -> Result<(), String> {
    let cli = parse_args(std::iter::once("cortexgan").chain(args.iter().copied()))
        .map_err(|e| e.to_string())?;
    run_command(cli)
}

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("study.yaml");
    std::fs::write(&path, CONFIG).unwrap();
    path
}

#[test]
fn test_commands_run_in_sequence() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let config = config.to_str().unwrap();

    run(&["-q", "validate", config, "--detailed"]).unwrap();
    run(&["-q", "generate", config, "--seed", "3"]).unwrap();

    let spec = load_spec(Path::new(config)).unwrap();
    let latents = LatentArchive::load(&spec.data.resolve(&spec.data.latents)).unwrap();
    assert_eq!(latents.train.dim(), (10, 4));
    assert_eq!(latents.test.dim(), (5, 4));

    run(&["-q", "extract", config]).unwrap();

    let mut rng = seeded_rng(8);
    let train = sample_noise(&mut rng, 10, 5);
    let test = sample_noise(&mut rng, 5, 5);
    ResponseArchive::save_raw(&spec.data.resolve(&spec.data.responses), train.view(), test.view())
        .unwrap();

    run(&["-q", "encode", config]).unwrap();
    assert!(spec.data.resolve(&spec.data.models).join("encoder_pool4.safetensors").is_file());

    run(&["-q", "decode", config, "--no-images", "-b", "2"]).unwrap();
    assert!(spec.data.resolve(&spec.data.models).join("decoder.safetensors").is_file());
    assert!(!spec.data.resolve(&spec.data.reconstructions).exists());
}

#[test]
fn test_generate_output_override() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let out = dir.path().join("elsewhere");

    run(&["-q", "generate", config.to_str().unwrap(), "-o", out.to_str().unwrap(), "-n", "2", "--n-test", "1"])
        .unwrap();
    assert!(out.join("latents.safetensors").is_file());
    assert!(out.join("images/train/000001.png").is_file());
    assert!(!out.join("images/train/000002.png").exists());
}

#[test]
fn test_encode_before_extract_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let err = run(&["-q", "encode", config.to_str().unwrap()]).unwrap_err();
    assert!(err.starts_with("Encoding failed"), "{err}");
}

#[test]
fn test_invalid_override_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let err = run(&["-q", "generate", config.to_str().unwrap(), "--psi", "2"]).unwrap_err();
    assert!(err.contains("psi"), "{err}");
}
