pub mod plan;
pub mod request;

pub use plan::{Bibliography, ContentPdaPair, Evaluation, LessonPlan, Phase, Session};
pub use request::{Methodology, PlanningRequest};
