pub mod mock_feed_server;

pub use mock_feed_server::MockFeedServer;
