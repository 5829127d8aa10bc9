pub mod generator;
pub mod provider;

pub use generator::MockGenerator;
pub use provider::MockProvider;
