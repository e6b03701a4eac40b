pub mod answer;
pub mod module;
pub mod question;

pub use answer::{AnswerRecord, ChoiceSet, Verdict};
pub use module::{parse_percent, Module};
pub use question::{Question, QuestionKind};
