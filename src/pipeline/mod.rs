pub mod content;
pub mod enrich;
pub mod error;
pub mod publish;

pub use content::generate_email;
pub use enrich::{ResearchOutcome, enrich};
pub use error::{PublishError, PublishErrorKind};
pub use publish::{SendLog, send};
