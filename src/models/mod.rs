// Estructuras de datos principales
mod class_group;
mod report;
mod schedule;
mod student;
mod subject;

pub use class_group::ClassGroup;
pub use report::{Report, SectionOutcome, StudentRef};
pub use schedule::{Schedule, DAY_MINUTES};
pub use student::{CompletedSubject, Student};
pub use subject::{Subject, SubjectKind};
