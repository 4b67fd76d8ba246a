use std::sync::Arc;
use std::thread;

use xaccess_lib::manager::{BucketPolicy, KeyPolicy, ManagedResource};
use xaccess_lib::registry::{self, GrantRequest, ManagerFamily, RegistryError};
use xaccess_lib::unit::DeploymentUnit;

use super::common::{accessor_unit, strings};

const CUSTOM: ManagerFamily = ManagerFamily::new("custom-policy");

#[test]
fn consumed_grants_match_registrations() {
  let unit = accessor_unit();
  registry::register(&unit, CUSTOM, "T", "z", ["a"]).unwrap();
  registry::register(&unit, CUSTOM, "T", "a", ["b", "a"]).unwrap();
  registry::register_grant(&unit, GrantRequest::new(CUSTOM, "T", "m").with_permissions(["c"])).unwrap();

  let grants = registry::consume(&unit, CUSTOM, "T").unwrap();

  let accessors: Vec<&str> = grants.iter().map(|g| g.accessor.as_str()).collect();
  assert_eq!(accessors, vec!["z", "a", "m"]);
  assert_eq!(grants[1].sorted_permissions(), strings(&["a", "b"]));
}

#[test]
fn consume_is_one_shot() {
  let unit = accessor_unit();
  registry::register(&unit, CUSTOM, "T", "distA", ["read"]).unwrap();
  registry::consume(&unit, CUSTOM, "T").unwrap();

  let err = registry::consume(&unit, CUSTOM, "T").unwrap_err();
  assert_eq!(
    err,
    RegistryError::AlreadyConsumed {
      target: "T".to_string(),
      accessor: None
    }
  );

  let err = registry::register(&unit, CUSTOM, "T", "distB", ["read"]).unwrap_err();
  assert_eq!(
    err.to_string(),
    "Cannot register resources for `T` manager after creation (registering `distB`)"
  );
}

#[test]
fn consuming_an_unregistered_target_freezes_it() {
  let unit = accessor_unit();
  assert!(registry::consume(&unit, CUSTOM, "never-registered").unwrap().is_empty());
  assert!(registry::is_consumed(&unit, CUSTOM, "never-registered"));
}

#[test]
fn families_and_units_are_isolated() {
  let first = accessor_unit();
  let second = accessor_unit();

  BucketPolicy::allow(&first, "shared", "distA").unwrap();
  KeyPolicy::allow(&first, "shared", "distA").unwrap();
  BucketPolicy::allow(&second, "shared", "distB").unwrap();

  registry::consume(&first, BucketPolicy::FAMILY, "shared").unwrap();

  assert!(!registry::is_consumed(&first, KeyPolicy::FAMILY, "shared"));
  assert!(!registry::is_consumed(&second, BucketPolicy::FAMILY, "shared"));
  let grants = registry::consume(&second, BucketPolicy::FAMILY, "shared").unwrap();
  assert_eq!(grants[0].accessor, "distB");
}

#[test]
fn sealed_unit_rejects_new_grants() {
  let unit = accessor_unit();
  unit.seal().unwrap();

  let err = BucketPolicy::allow(&unit, "bucket1", "distA").unwrap_err();
  assert!(matches!(err, RegistryError::DeclarationsSealed { .. }));
  assert_eq!(err.target(), Some("bucket1"));
}

#[test]
fn concurrent_registration_and_consumption_lose_nothing() {
  for _ in 0..20 {
    let unit = Arc::new(DeploymentUnit::new("race", "111111111111"));

    let registrars: Vec<_> = (0..8)
      .map(|i| {
        let unit = unit.clone();
        thread::spawn(move || registry::register(&unit, CUSTOM, "T", &format!("acc{}", i), ["read"]))
      })
      .collect();
    let consumer = {
      let unit = unit.clone();
      thread::spawn(move || registry::consume(&unit, CUSTOM, "T"))
    };

    let registered: Vec<_> = registrars.into_iter().map(|h| h.join().unwrap()).collect();
    let consumed = consumer.join().unwrap().unwrap();

    let succeeded = registered.iter().filter(|r| r.is_ok()).count();
    assert_eq!(consumed.len(), succeeded);
    assert!(
      registered
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, RegistryError::AlreadyConsumed { .. }))
    );
  }
}
