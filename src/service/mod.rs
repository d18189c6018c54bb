pub mod analysis;
pub mod export;
pub mod summary;

pub use analysis::{AnalysisService, FeedAnalysis, TextAnalysis};
pub use export::{EXPORT_FILENAME, history_to_csv};
pub use summary::{HistoryOverview, SentimentCounts};
