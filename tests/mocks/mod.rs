pub mod provider;
pub mod summarizer;
