//! Dispatch command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn dispatch_prints_delivered_payload() {
  let env = TestEnv::from_fixture("accessor.lua");

  env
    .xa_cmd()
    .args(["dispatch", "--operation", "update"])
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("bucket-policy/assets"))
    .stdout(predicate::str::contains(
      r#"{"operation":"update","accessors":{"E1A2B3":["s3:GetObject"],"E4C5D6":["s3:GetObject","s3:ListBucket"]}}"#,
    ));
}

#[test]
fn dispatch_json_output() {
  let env = TestEnv::from_fixture("accessor.lua");

  let output = env
    .xa_cmd()
    .args(["dispatch", "--operation", "delete", "--json"])
    .arg(&env.config_path)
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["operation"], "delete");
  assert_eq!(json["delivered"][0]["function_name"], "assets-xa-mgmt-fn");
  assert_eq!(json["delivered"][0]["payload"]["operation"], "delete");
  assert!(json["failed"].as_array().unwrap().is_empty());
}

#[test]
fn dispatch_without_managers_is_a_no_op() {
  let env = TestEnv::from_fixture("owner.lua");

  env
    .xa_cmd()
    .args(["dispatch", "--operation", "create"])
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("No managers declared"));
}

#[test]
fn dispatch_rejects_unknown_operation() {
  let env = TestEnv::from_fixture("accessor.lua");

  env
    .xa_cmd()
    .args(["dispatch", "--operation", "destroy"])
    .arg(&env.config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown operation"));
}
