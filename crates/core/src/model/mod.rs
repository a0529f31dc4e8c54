mod course;
mod ids;
mod progress;
mod record;
mod session;

pub use course::{Course, CourseError, Lesson, Quiz};
pub use ids::{CourseId, LearnerId, LessonId, ParseIdError, ProgressKey, QuizId};
pub use progress::{ProgressState, QuizState};
pub use record::ProgressRecord;
pub use session::SessionContext;
