mod commander;
mod feed;

pub use commander::Commander;
pub use feed::Feed;
