//! File-backed question bank and exam ledger.
//!
//! The whole bank lives in one JSON document (`BankSnapshot`). Reads are
//! served from memory; every write is applied to a copy, persisted through a
//! temporary file plus rename, and only then made visible.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use exam_core::{Exam, ExamAnswer, ExamQuestion, ExamSheet, Question, Topic};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::snapshot::BankSnapshot;
use crate::storage_traits::*;

/// Question bank and exam ledger stored in a single JSON file.
#[derive(Debug)]
pub struct JsonBankStore {
    path: PathBuf,
    state: Mutex<BankSnapshot>,
}

impl JsonBankStore {
    /// Load an existing bank file.
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path).await?;
        let snapshot: BankSnapshot = serde_json::from_slice(&bytes)?;
        info!(
            path = %path.display(),
            topics = snapshot.topics.len(),
            questions = snapshot.questions.len(),
            exams = snapshot.exams.len(),
            "JsonBankStore opened"
        );
        Ok(Self {
            path,
            state: Mutex::new(snapshot),
        })
    }

    /// Write `snapshot` to `path`, replacing any existing file, and open it.
    pub async fn create(path: impl AsRef<Path>, snapshot: BankSnapshot) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        write_atomically(&path, &snapshot).await?;
        info!(path = %path.display(), "JsonBankStore created");
        Ok(Self {
            path,
            state: Mutex::new(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the state, persist it, then commit.
    async fn update<T, F>(&self, change: F) -> StorageResult<T>
    where
        F: FnOnce(&mut BankSnapshot) -> StorageResult<T> + Send,
        T: Send,
    {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let out = change(&mut next)?;
        write_atomically(&self.path, &next).await?;
        *state = next;
        Ok(out)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn write_atomically(path: &Path, snapshot: &BankSnapshot) -> StorageResult<()> {
    let bytes = serde_json::to_vec_pretty(snapshot)?;
    let temp = temp_path(path);
    fs::write(&temp, &bytes).await?;
    fs::rename(&temp, path).await?;
    debug!(path = %path.display(), bytes = bytes.len(), "bank persisted");
    Ok(())
}

#[async_trait]
impl QuestionBank for JsonBankStore {
    async fn questions(&self) -> StorageResult<Vec<Question>> {
        Ok(self.state.lock().await.questions.clone())
    }

    async fn topics(&self) -> StorageResult<Vec<Topic>> {
        Ok(self.state.lock().await.sorted_topics())
    }
}

#[async_trait]
impl ExamLedger for JsonBankStore {
    async fn next_exam_id(&self) -> StorageResult<u32> {
        self.update(|s| Ok(s.next_exam_id())).await
    }

    async fn save_exam(&self, exam: Exam, sheet: ExamSheet) -> StorageResult<()> {
        debug!(exam_id = exam.id, questions = sheet.len(), "saving exam");
        self.update(move |s| s.save_exam(exam, sheet)).await
    }

    async fn exam(&self, exam_id: u32) -> StorageResult<Exam> {
        Ok(self.state.lock().await.record(exam_id)?.exam.clone())
    }

    async fn sheet(&self, exam_id: u32) -> StorageResult<ExamSheet> {
        Ok(self.state.lock().await.record(exam_id)?.sheet.clone())
    }

    async fn list_exams(&self) -> StorageResult<Vec<Exam>> {
        Ok(self.state.lock().await.list_exams())
    }

    async fn set_question(
        &self,
        exam_question_id: u32,
        question: &Question,
    ) -> StorageResult<ExamQuestion> {
        debug!(exam_question_id, question_id = question.id, "replacing exam question");
        self.update(|s| s.set_question(exam_question_id, question)).await
    }

    async fn delete_exam(&self, exam_id: u32) -> StorageResult<()> {
        debug!(exam_id, "deleting exam");
        self.update(|s| s.delete_exam(exam_id)).await
    }

    async fn record_answers(&self, answers: Vec<ExamAnswer>) -> StorageResult<()> {
        self.update(move |s| s.record_answers(answers)).await
    }

    async fn answers_for_exam(&self, exam_id: u32) -> StorageResult<Vec<ExamAnswer>> {
        self.state.lock().await.answers_for_exam(exam_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_sits_next_to_target() {
        let temp = temp_path(Path::new("/var/lib/exam/bank.json"));
        assert_eq!(temp, PathBuf::from("/var/lib/exam/bank.json.tmp"));
    }
}
