//! Bank questions and the values that gate their eligibility.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ExamError;
use super::topic::TopicId;

pub type QuestionId = u32;
pub type RequirementId = u32;
pub type PictureId = u32;

/// Certificate used when a caller does not ask for a specific level
/// (practice exams).
pub const DEFAULT_CERTIFICATE: Certificate = Certificate::B2;

/// Qualification tier an exam is composed for.
///
/// Only levels 2 and 3 exist. Raw levels are converted with
/// [`Certificate::try_from`], which rejects everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Certificate {
    B2,
    B3,
}

impl Certificate {
    /// Numeric level (2 or 3).
    pub fn level(self) -> u8 {
        match self {
            Certificate::B2 => 2,
            Certificate::B3 => 3,
        }
    }
}

impl TryFrom<u8> for Certificate {
    type Error = ExamError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            2 => Ok(Certificate::B2),
            3 => Ok(Certificate::B3),
            other => Err(ExamError::InvalidCertificate(other)),
        }
    }
}

impl From<Certificate> for u8 {
    fn from(certificate: Certificate) -> Self {
        certificate.level()
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.level())
    }
}

/// Language a question is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Nl,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Nl => "nl",
        }
    }
}

impl FromStr for Language {
    type Err = ExamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "nl" => Ok(Language::Nl),
            _ => Err(ExamError::InvalidLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A question in the bank.
///
/// Questions are read-only for the duration of a composition run; the
/// engine only ever holds references to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub topic: TopicId,
    pub requirement: RequirementId,
    pub language: Language,

    /// Eligible for certificate level 2.
    #[serde(default)]
    pub allow_b2: bool,

    /// Eligible for certificate level 3.
    #[serde(default)]
    pub allow_b3: bool,

    /// Excluded from every composition.
    #[serde(default)]
    pub ignore: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<PictureId>,

    /// Free-text label; at most one question per group ends up in an exam.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_group: Option<String>,

    #[serde(default)]
    pub text: String,

    /// Answer key (e.g. `"B"`), snapshotted onto the exam sheet.
    #[serde(default)]
    pub answer: String,
}

impl Question {
    /// Create a question eligible for both certificates, with no picture and
    /// no exam group.
    pub fn new(
        id: QuestionId,
        topic: TopicId,
        requirement: RequirementId,
        language: Language,
    ) -> Self {
        Self {
            id,
            topic,
            requirement,
            language,
            allow_b2: true,
            allow_b3: true,
            ignore: false,
            picture: None,
            exam_group: None,
            text: String::new(),
            answer: String::new(),
        }
    }

    pub fn with_picture(mut self, picture: PictureId) -> Self {
        self.picture = Some(picture);
        self
    }

    pub fn with_exam_group(mut self, group: impl Into<String>) -> Self {
        self.exam_group = Some(group.into());
        self
    }

    pub fn with_certificates(mut self, allow_b2: bool, allow_b3: bool) -> Self {
        self.allow_b2 = allow_b2;
        self.allow_b3 = allow_b3;
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = answer.into();
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Exam group tag, treating an empty tag as no tag.
    pub fn exam_group(&self) -> Option<&str> {
        self.exam_group.as_deref().filter(|g| !g.is_empty())
    }

    /// Whether this question may appear on an exam for the given raw level.
    ///
    /// Any level other than 2 or 3 admits nothing.
    pub fn allows_certificate(&self, level: u8) -> bool {
        match level {
            2 => self.allow_b2,
            3 => self.allow_b3,
            _ => false,
        }
    }

    /// Practice questions are the ones with an even id.
    pub fn is_practice(&self) -> bool {
        self.id % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_try_from() {
        assert_eq!(Certificate::try_from(2).unwrap(), Certificate::B2);
        assert_eq!(Certificate::try_from(3).unwrap(), Certificate::B3);
        assert!(matches!(
            Certificate::try_from(1),
            Err(ExamError::InvalidCertificate(1))
        ));
    }

    #[test]
    fn test_certificate_serde_as_level() {
        let json = serde_json::to_string(&Certificate::B3).unwrap();
        assert_eq!(json, "3");
        let parsed: Certificate = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Certificate::B2);
        assert!(serde_json::from_str::<Certificate>("4").is_err());
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("nl".parse::<Language>().unwrap(), Language::Nl);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_allows_certificate_checks_matching_flag() {
        let q = Question::new(1, 1, 1, Language::En).with_certificates(true, false);
        assert!(q.allows_certificate(2));
        assert!(!q.allows_certificate(3));
        assert!(!q.allows_certificate(4));
        assert!(!q.allows_certificate(0));
    }

    #[test]
    fn test_empty_exam_group_is_no_group() {
        let q = Question::new(1, 1, 1, Language::En).with_exam_group("");
        assert_eq!(q.exam_group(), None);
        let q = q.with_exam_group("knots");
        assert_eq!(q.exam_group(), Some("knots"));
    }

    #[test]
    fn test_question_deserializes_with_defaults() {
        let q: Question =
            serde_json::from_str(r#"{"id":4,"topic":1,"requirement":9,"language":"nl"}"#).unwrap();
        assert_eq!(q.language, Language::Nl);
        assert!(!q.allow_b2 && !q.allow_b3 && !q.ignore);
        assert_eq!(q.picture, None);
        assert!(q.is_practice());
    }
}
