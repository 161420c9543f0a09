// Defaults
pub static DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";
pub static DEFAULT_IDL_DIR: &str = "target/idl";
pub static DEFAULT_INSTRUCTION: &str = "initialize";

// Header names
pub static REQUEST_ID_HEADER: &str = "X-Request-Id";
pub static SIGNATURE_HEADER: &str = "X-Signature";

// JSON-RPC
pub static JSONRPC_VERSION: &str = "2.0";
pub static SEND_INSTRUCTION_METHOD: &str = "sendInstruction";
