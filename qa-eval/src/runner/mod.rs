//! Answer collection engine

pub mod collector;

pub use collector::{
    AnswerCollector, ConsoleProgress, GenerationSettings, NoOpProgress, ProgressCallback,
};
