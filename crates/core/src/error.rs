use thiserror::Error;

use crate::model::{CourseError, ParseIdError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseId, LessonId};

    #[test]
    fn wraps_layer_errors() {
        let err: Error = CourseError::DuplicateLessonId(LessonId::new("l1")).into();
        assert_eq!(err.to_string(), "lesson id l1 appears more than once");

        let err: Error = " ".parse::<CourseId>().unwrap_err().into();
        assert!(matches!(err, Error::Id(_)));
    }
}
