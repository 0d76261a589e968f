//! Feature names used to order extensions by what they provide and require.
pub const CORE: &str = "dsc:core";
pub const RETRY_SETTINGS: &str = "dsc:core:retry";
pub const HTTP_CLIENT: &str = "dsc:core:http-client";
pub const HEALTH_CHECK: &str = "dsc:core:health";
pub const DISPATCHER_REGISTRY: &str = "dsc:core:message-dispatcher-registry";
pub const VAULT: &str = "dsc:core:vault";

pub const ASSET_INDEX: &str = "dsc:assets:index";
pub const CONTRACT_DEFINITION_STORE: &str = "dsc:contracts:definition-store";
pub const CONTRACT_NEGOTIATION_STORE: &str = "dsc:contracts:negotiation-store";
pub const TRANSFER_PROCESS_STORE: &str = "dsc:transfer:store";
pub const TRANSFER_PROCESS_MANAGER: &str = "dsc:core:transfer:transferprocessmanager";
pub const COMMAND_HANDLER_REGISTRY: &str = "dsc:core:command-handler-registry";

pub const WEB_SERVICE: &str = "dsc:web:service";
pub const AUTHENTICATION_SERVICE: &str = "dsc:api:authentication";

pub const DATA_OPERATOR_REGISTRY: &str = "dsc:dataplane:operator-registry";
pub const DATA_PLANE_MANAGER: &str = "dsc:dataplane:manager";
pub const TOKEN_VALIDATION: &str = "dsc:dataplane:token-validation";

pub const NODE_DIRECTORY: &str = "dsc:catalog:node-directory";
