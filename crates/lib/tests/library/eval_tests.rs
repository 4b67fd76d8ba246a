use xaccess_lib::eval::{EvalError, evaluate_config};
use xaccess_lib::manager::Operation;
use xaccess_lib::util::hash::Hashable;

use super::common::{accessor_unit, fixture_path};

#[test]
fn accessor_fixture_builds_both_managers() {
  let manifest = evaluate_config(&fixture_path("accessor.lua"), accessor_unit()).unwrap();

  assert_eq!(
    manifest.managers.keys().collect::<Vec<_>>(),
    vec!["bucket-policy/assets", "key-policy/assets-key"]
  );

  let bucket = &manifest.managers["bucket-policy/assets"];
  assert_eq!(
    bucket.payload(Operation::Update).to_json().unwrap(),
    r#"{"operation":"update","accessors":{"E1A2B3":["s3:GetObject"],"E4C5D6":["s3:GetObject","s3:ListBucket"]}}"#
  );
  assert_eq!(bucket.agent.timeout_secs, 60);
  assert_eq!(bucket.agent.environment["ACCESSOR_STACK_NAME"], "accessor-stack");

  let key = &manifest.managers["key-policy/assets-key"];
  assert_eq!(key.accessors.len(), 1);
  assert!(manifest.unmanaged_targets.is_empty());
}

#[test]
fn owner_fixture_declares_roles() {
  let manifest = evaluate_config(&fixture_path("owner.lua"), accessor_unit()).unwrap();

  assert!(manifest.managers.is_empty());
  let role = &manifest.management_roles["assets-xa-mgmt"];
  assert_eq!(role.policy.resources, vec!["arn:aws:s3:::assets"]);
  assert_eq!(
    role.trusted_principals(),
    [
      "arn:aws:iam::111111111111:role/assets-xa-mgmt-ex",
      "arn:aws:iam::222222222222:role/assets-xa-mgmt-ex",
    ]
  );
  assert!(manifest.management_roles.contains_key("assets-key-xa-mgmt"));
}

#[test]
fn evaluation_is_deterministic() {
  let first = evaluate_config(&fixture_path("accessor.lua"), accessor_unit()).unwrap();
  let second = evaluate_config(&fixture_path("accessor.lua"), accessor_unit()).unwrap();
  assert_eq!(first.compute_hash().unwrap(), second.compute_hash().unwrap());
}

#[test]
fn duplicate_manager_fixture_fails() {
  let err = evaluate_config(&fixture_path("duplicate_manager.lua"), accessor_unit()).unwrap_err();
  assert!(matches!(err, EvalError::Lua(_)));
  assert!(err.to_string().contains("has already been consumed"), "{}", err);
}
