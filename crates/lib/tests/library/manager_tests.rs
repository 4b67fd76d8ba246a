use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use xaccess_lib::execute::{self, DispatchConfig, RecordingAgent};
use xaccess_lib::manager::{
  BucketPolicy, KeyPolicy, LifecycleManager, ManagedResource, ManagerError, ManagerProps, Operation,
};
use xaccess_lib::registry::RegistryError;

use super::common::{OWNER_ACCOUNT, accessor_unit, strings};

#[test]
fn bucket_manager_end_to_end() {
  let unit = accessor_unit();
  BucketPolicy::allow_with(&unit, "bucket1", "distA", ["read"]).unwrap();
  BucketPolicy::allow_with(&unit, "bucket1", "distB", ["write", "read"]).unwrap();
  unit.seal().unwrap();

  let manager = LifecycleManager::new::<BucketPolicy>(&unit, ManagerProps::new("bucket1", OWNER_ACCOUNT)).unwrap();

  let expected = BTreeMap::from([
    ("distA".to_string(), strings(&["read"])),
    ("distB".to_string(), strings(&["read", "write"])),
  ]);
  for request in manager.requests.iter() {
    assert_eq!(request.payload.accessors, expected);
  }

  let err = BucketPolicy::allow(&unit, "bucket1", "distC").unwrap_err();
  assert!(matches!(err, RegistryError::AlreadyConsumed { .. }));
}

#[test]
fn key_manager_uses_key_defaults() {
  let unit = accessor_unit();
  KeyPolicy::allow(&unit, "key1", "distA").unwrap();
  unit.seal().unwrap();

  let manager = LifecycleManager::new::<KeyPolicy>(&unit, ManagerProps::new("key1", OWNER_ACCOUNT)).unwrap();
  assert_eq!(
    manager.payload(Operation::Create).accessors["distA"],
    strings(&["kms:Decrypt", "kms:DescribeKey", "kms:Encrypt", "kms:GenerateDataKey*"])
  );
  assert_eq!(manager.family, KeyPolicy::FAMILY.as_str());
}

#[test]
fn second_manager_is_rejected_before_any_request() {
  let unit = accessor_unit();
  unit.seal().unwrap();
  LifecycleManager::new::<BucketPolicy>(&unit, ManagerProps::new("bucket1", OWNER_ACCOUNT)).unwrap();

  let err = LifecycleManager::new::<BucketPolicy>(&unit, ManagerProps::new("bucket1", OWNER_ACCOUNT)).unwrap_err();
  assert!(matches!(err, ManagerError::Registry(RegistryError::AlreadyConsumed { .. })));
  assert_eq!(err.to_string(), "Manager for `bucket1` has already been consumed");
}

#[test]
fn payload_bytes_do_not_depend_on_registration_order() {
  let payload = |order: &[&str]| {
    let unit = accessor_unit();
    for accessor in order {
      BucketPolicy::allow_with(&unit, "T", accessor, ["s3:PutObject", "s3:GetObject"]).unwrap();
    }
    unit.seal().unwrap();
    let manager = LifecycleManager::new::<BucketPolicy>(&unit, ManagerProps::new("T", OWNER_ACCOUNT)).unwrap();
    manager.payload(Operation::Delete).to_json().unwrap()
  };

  assert_eq!(payload(&["z", "a", "m"]), payload(&["m", "z", "a"]));
}

#[tokio::test]
async fn dispatch_delivers_all_three_operations() {
  let unit = accessor_unit();
  BucketPolicy::allow(&unit, "bucket1", "distA").unwrap();
  unit.seal().unwrap();
  let props = ManagerProps::new("bucket1", OWNER_ACCOUNT).with_caller_timeout(Duration::from_secs(5));
  let manager = LifecycleManager::new::<BucketPolicy>(&unit, props).unwrap();

  let agent = Arc::new(RecordingAgent::new());
  for operation in Operation::ALL {
    let report = execute::dispatch_all(
      std::slice::from_ref(&manager),
      operation,
      agent.clone(),
      &DispatchConfig::default(),
    )
    .await;
    assert!(report.is_success());
  }

  let delivered = agent.delivered().await;
  let operations: Vec<Operation> = delivered.iter().map(|r| r.operation()).collect();
  assert_eq!(operations, Operation::ALL.to_vec());
  assert!(
    delivered
      .iter()
      .all(|r| r.physical_resource_id == "xa-mgmt-lambda-caller")
  );
}
