//! Plan command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_lists_managers_and_accessors() {
  let env = TestEnv::from_fixture("accessor.lua");

  env
    .xa_cmd()
    .arg("plan")
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Managers: 1"))
    .stdout(predicate::str::contains("bucket-policy/assets"))
    .stdout(predicate::str::contains("E4C5D6: s3:GetObject, s3:ListBucket"))
    .stdout(predicate::str::contains("caller timeout 1m 30s"));
}

#[test]
fn plan_json_is_parseable() {
  let env = TestEnv::from_fixture("accessor.lua");

  let output = env
    .xa_cmd()
    .args(["plan", "--json", "--unit", "web"])
    .arg(&env.config_path)
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["unit"], "web");
  assert_eq!(json["account_id"], "111111111111");
  assert_eq!(json["managers"][0]["key"], "bucket-policy/assets");
  assert_eq!(json["managers"][0]["accessors"]["E1A2B3"][0], "s3:GetObject");
}

#[test]
fn plan_unit_name_defaults_to_file_stem() {
  let env = TestEnv::from_fixture("owner.lua");

  env
    .xa_cmd()
    .arg("plan")
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Unit: init (111111111111)"))
    .stdout(predicate::str::contains("assets-xa-mgmt"))
    .stdout(predicate::str::contains("arn:aws:iam::111111111111:role/assets-xa-mgmt-ex"));
}

#[test]
fn plan_warns_about_unmanaged_grants() {
  let env = TestEnv::from_fixture("unmanaged.lua");

  env
    .xa_cmd()
    .arg("plan")
    .arg(&env.config_path)
    .assert()
    .success()
    .stderr(predicate::str::contains("key-policy grants without a manager: orphan-key"));
}

#[test]
fn plan_fails_on_late_grant() {
  let env = TestEnv::from_fixture("late_grant.lua");

  env
    .xa_cmd()
    .arg("plan")
    .arg(&env.config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("after creation"));
}
