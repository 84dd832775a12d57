pub mod generation;

pub use generation::GenerationService;
