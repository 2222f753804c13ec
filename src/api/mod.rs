// HTTP login endpoint

mod rpc;

pub use rpc::{create_router, RpcCall, RpcError, RpcReply, RpcState, ECHO_METHOD, LOGIN_METHOD};
