//! Synth command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn synth_writes_manifest_file() {
  let env = TestEnv::from_fixture("accessor.lua");
  let out = env.path("out/manifest.json");

  env
    .xa_cmd()
    .arg("synth")
    .arg(&env.config_path)
    .arg("-o")
    .arg(&out)
    .assert()
    .success()
    .stdout(predicate::str::contains("Manifest written"));

  let manifest: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
  let manager = &manifest["managers"]["bucket-policy/assets"];
  assert_eq!(manager["agent"]["function_name"], "assets-xa-mgmt-fn");
  assert_eq!(manager["requests"]["create"]["physical_resource_id"], "xa-mgmt-lambda-caller");
  assert_eq!(manager["requests"]["delete"]["payload"]["operation"], "delete");
}

#[test]
fn synth_to_stdout_is_stable() {
  let env = TestEnv::from_fixture("accessor.lua");

  let first = env.xa_cmd().arg("synth").arg(&env.config_path).output().unwrap();
  let second = env.xa_cmd().arg("synth").arg(&env.config_path).output().unwrap();

  assert!(first.status.success());
  assert_eq!(first.stdout, second.stdout);
}
