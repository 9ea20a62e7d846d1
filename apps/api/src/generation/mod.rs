pub mod cache;
pub mod export;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod queue;
pub mod retry;
