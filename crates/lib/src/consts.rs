//! Crate-wide constants.

/// Length of the truncated content hash used for manifest and request ids.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Suffix appended to a resource identifier to name its management role.
pub const MANAGEMENT_ROLE_SUFFIX: &str = "-xa-mgmt";

/// Suffix appended to a resource identifier to name the accessor-side execution role.
pub const EXECUTION_ROLE_SUFFIX: &str = "-xa-mgmt-ex";

/// Suffix appended to a resource identifier to name the agent function.
pub const AGENT_FUNCTION_SUFFIX: &str = "-xa-mgmt-fn";

/// Longest resource identifier that still yields valid role names.
///
/// IAM role names are capped at 64 characters and the longest suffix is 11.
pub const MAX_RESOURCE_IDENTIFIER_LEN: usize = 52;

/// Default execution budget for the remote agent, in seconds.
pub const DEFAULT_MANAGER_TIMEOUT_SECS: u64 = 30;

/// Default budget for the orchestration layer's wait on the agent, in seconds.
pub const DEFAULT_CALLER_TIMEOUT_SECS: u64 = 30;

/// Physical id shared by the create/update/delete requests of one manager.
pub const CALLER_PHYSICAL_ID: &str = "xa-mgmt-lambda-caller";

/// Service principal that runs the agent function.
pub const AGENT_SERVICE_PRINCIPAL: &str = "lambda.amazonaws.com";
