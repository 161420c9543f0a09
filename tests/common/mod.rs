#[cfg(not(feature = "acceptance-tests"))]
pub mod mock_server;
pub mod test_context;
