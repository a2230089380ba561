pub mod build_reply;

pub use build_reply::BuildReplyUseCase;
