// Application layer - Use case interactors

pub mod convert_interactor;
pub mod inspect_interactor;

// Re-export interactors
pub use convert_interactor::{ConvertInteractor, RenderOutcome};
pub use inspect_interactor::{InspectInteractor, InspectReport, ReportFormat};
