//! Exam Bank CLI
//!
//! The `exam` command composes certification exams from a question bank
//! file and maintains the exams it composed.
//!
//! ## Commands
//!
//! - `init`: Create a bank file from a list of topics and questions
//! - `compose`: Compose, number and store a new exam
//! - `alternatives`: Rank substitutes for a question on an exam
//! - `replace`: Swap a question on an exam for another one
//! - `practice`: Draw a practice selection for one topic
//! - `list`, `show`, `delete`: Inspect and remove stored exams
//! - `record`, `score`: Record student answers and score an exam

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{info, Level};

use exam_core::{
    alternatives_for, compose_practice, compose_with_plan, exam_of, index_by_id, is_eligible,
    Certificate, CompositionPlan, CompositionSpan, DrawSource, EngineConfig, Exam, ExamAnswer,
    ExamScores, ExamSheet, Language, PassCriteria, Question, METRICS,
};
use exam_state::{BankSnapshot, ExamLedger, JsonBankStore, QuestionBank};

#[derive(Parser)]
#[command(name = "exam")]
#[command(author = "Exam Bank Maintainers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compose certification exams from a question bank", long_about = None)]
struct Cli {
    /// Question bank file
    #[arg(long, global = true, env = "EXAM_BANK", default_value = "bank.json")]
    bank: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(long, global = true, env = "EXAM_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON log lines and JSON command output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the bank file from a JSON document with topics and questions
    Init {
        /// JSON file with `topics` and `questions`
        #[arg(long)]
        source: PathBuf,

        /// Overwrite an existing bank file
        #[arg(long)]
        force: bool,
    },

    /// Compose a new exam and store it
    Compose {
        /// Exam label, e.g. "2026-autumn"
        #[arg(short, long)]
        label: String,

        /// Certificate level (2 or 3)
        #[arg(short, long, value_parser = parse_certificate)]
        certificate: Certificate,

        /// Question language (en or nl)
        #[arg(long, default_value = "en")]
        language: Language,
    },

    /// Rank alternative questions for one exam question
    Alternatives {
        /// Exam-question id as printed by `show`
        #[arg(long)]
        exam_question: u32,
    },

    /// Replace one exam question with another bank question
    Replace {
        /// Exam-question id as printed by `show`
        #[arg(long)]
        exam_question: u32,

        /// Id of the bank question to put in its place
        #[arg(long = "with")]
        question: u32,
    },

    /// Draw practice questions for one topic
    Practice {
        #[arg(short, long)]
        topic: u32,

        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        #[arg(long, default_value = "en")]
        language: Language,
    },

    /// List stored exams
    List,

    /// Show one exam with its numbered questions
    Show {
        #[arg(long)]
        exam: u32,
    },

    /// Delete an exam and its recorded answers
    Delete {
        #[arg(long)]
        exam: u32,
    },

    /// Record student answers for an exam from a JSON file
    Record {
        #[arg(long)]
        exam: u32,

        /// JSON array of `{ "student", "exam_question", "answer" }`
        #[arg(long)]
        answers: PathBuf,
    },

    /// Score the recorded answers of an exam
    Score {
        #[arg(long)]
        exam: u32,
    },
}

fn parse_certificate(raw: &str) -> std::result::Result<Certificate, String> {
    let level: u8 = raw
        .trim()
        .trim_start_matches(['B', 'b'])
        .parse()
        .map_err(|_| format!("certificate must be 2 or 3, got {raw:?}"))?;
    Certificate::try_from(level).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    exam_core::init_tracing(cli.json, level);

    let config = EngineConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let out = Output { json: cli.json };

    let result = match cli.command {
        Commands::Init { source, force } => cmd_init(&cli.bank, &source, force).await,
        command => {
            let store = JsonBankStore::open(&cli.bank)
                .await
                .with_context(|| format!("Failed to open bank {:?}", cli.bank))?;
            run(&store, &config, out, command).await
        }
    };

    METRICS.flush();
    result
}

async fn run<S>(store: &S, config: &EngineConfig, out: Output, command: Commands) -> Result<()>
where
    S: QuestionBank + ExamLedger,
{
    match command {
        Commands::Init { .. } => bail!("init does not run against an open bank"),
        Commands::Compose {
            label,
            certificate,
            language,
        } => {
            let (exam, sheet) = {
                let mut rng = rand::rng();
                compose_and_store(store, config, &label, certificate, language, &mut rng).await?
            };
            out.sheet(&exam, &sheet, &store.questions().await?)
        }
        Commands::Alternatives { exam_question } => {
            let questions = store.questions().await?;
            let ranked = alternatives(store, config, &questions, exam_question).await?;
            out.questions(&ranked)
        }
        Commands::Replace {
            exam_question,
            question,
        } => {
            let slot = replace_question(store, exam_question, question).await?;
            info!(exam_question, question, "exam question replaced");
            out.line(&slot, format!("{} -> question {}", slot.id, slot.question_id))
        }
        Commands::Practice {
            topic,
            count,
            language,
        } => {
            let topics = store.topics().await?;
            let questions = store.questions().await?;
            let mut rng = rand::rng();
            let entries = compose_practice(
                &topics,
                &questions,
                topic,
                count,
                language,
                config.max_strictness,
                &mut rng,
            )?;
            let picked: Vec<&Question> = entries.iter().map(|e| e.question).collect();
            out.questions(&picked)
        }
        Commands::List => {
            let exams = store.list_exams().await?;
            if !out.json && exams.is_empty() {
                println!("No exams found. Run 'exam compose' first.");
                return Ok(());
            }
            out.exams(&exams)
        }
        Commands::Show { exam } => {
            let record = store.exam(exam).await?;
            let sheet = store.sheet(exam).await?;
            out.sheet(&record, &sheet, &store.questions().await?)
        }
        Commands::Delete { exam } => {
            store.delete_exam(exam).await?;
            info!(exam, "exam deleted");
            out.line(&exam, format!("Deleted exam {exam}"))
        }
        Commands::Record { exam, answers } => {
            let rows: Vec<AnswerRow> = read_json_file(&answers)?;
            let recorded = record_answers(store, exam, rows).await?;
            out.line(&recorded, format!("Recorded {recorded} answers for exam {exam}"))
        }
        Commands::Score { exam } => {
            let report = score_exam(store, config, exam).await?;
            out.score(&report)
        }
    }
}

async fn cmd_init(bank: &Path, source: &Path, force: bool) -> Result<()> {
    if bank.exists() && !force {
        bail!("Bank {:?} already exists (use --force to overwrite)", bank);
    }
    let imported: BankSnapshot = read_json_file(source)?;
    let snapshot = BankSnapshot::new(imported.topics, imported.questions);
    let (topics, questions) = (snapshot.topics.len(), snapshot.questions.len());

    JsonBankStore::create(bank, snapshot)
        .await
        .with_context(|| format!("Failed to write bank {:?}", bank))?;
    println!(
        "Initialized bank at {:?} ({} topics, {} questions)",
        bank, topics, questions
    );
    Ok(())
}

/// Compose a full exam, number it and store it.
async fn compose_and_store<S, D>(
    store: &S,
    config: &EngineConfig,
    label: &str,
    certificate: Certificate,
    language: Language,
    draws: &mut D,
) -> Result<(Exam, ExamSheet)>
where
    S: QuestionBank + ExamLedger,
    D: DrawSource + ?Sized,
{
    let topics = store.topics().await?;
    let questions = store.questions().await?;

    let entries = {
        let _span = CompositionSpan::enter(label, certificate, language);
        compose_with_plan(
            &topics,
            &questions,
            certificate,
            language,
            &CompositionPlan::full_exam(),
            config.max_strictness,
            draws,
        )
        .with_context(|| format!("Failed to compose exam {label:?}"))?
    };

    let exam_id = store.next_exam_id().await?;
    let exam = Exam::new(exam_id, label, certificate, language);
    let sheet = ExamSheet::from_selection(exam_id, &entries)?;
    store.save_exam(exam.clone(), sheet.clone()).await?;

    info!(exam_id, label, questions = sheet.len(), "exam stored");
    Ok((exam, sheet))
}

async fn alternatives<'q, S>(
    store: &S,
    config: &EngineConfig,
    questions: &'q [Question],
    exam_question: u32,
) -> Result<Vec<&'q Question>>
where
    S: QuestionBank + ExamLedger,
{
    let exam_id = exam_of(exam_question);
    let exam = store.exam(exam_id).await?;
    let sheet = store.sheet(exam_id).await?;
    let topics = store.topics().await?;

    Ok(alternatives_for(
        &sheet,
        exam_question,
        &exam,
        &topics,
        questions,
        config,
    )?)
}

/// Put bank question `question_id` into slot `exam_question`.
///
/// The question must be eligible for the exam and not already on it.
async fn replace_question<S>(
    store: &S,
    exam_question: u32,
    question_id: u32,
) -> Result<exam_core::ExamQuestion>
where
    S: QuestionBank + ExamLedger,
{
    let exam_id = exam_of(exam_question);
    let exam = store.exam(exam_id).await?;
    let sheet = store.sheet(exam_id).await?;
    let slot = sheet.find(exam_question)?;

    let questions = store.questions().await?;
    let index = index_by_id(&questions);
    let question = index
        .get(&question_id)
        .copied()
        .ok_or(exam_core::ExamError::UnknownQuestion(question_id))?;

    if sheet
        .questions
        .iter()
        .any(|eq| eq.question_id == question_id && eq.id != slot.id)
    {
        bail!("Question {} is already on exam {}", question_id, exam_id);
    }
    let topics = store.topics().await?;
    let topic = exam_core::find_topic(&topics, slot.topic_id)?;
    if !is_eligible(question, exam.language, exam.certificate, topic) {
        bail!(
            "Question {} is not eligible for topic {} of exam {} ({}, {})",
            question_id,
            slot.topic_id,
            exam_id,
            exam.certificate,
            exam.language
        );
    }

    Ok(store.set_question(exam_question, question).await?)
}

/// One answer as supplied on the command line.
#[derive(Debug, Deserialize)]
struct AnswerRow {
    student: String,
    exam_question: u32,
    answer: String,
}

/// Resolve rows against the exam sheet and store them. Returns the count.
async fn record_answers<S>(store: &S, exam_id: u32, rows: Vec<AnswerRow>) -> Result<usize>
where
    S: ExamLedger,
{
    let sheet = store.sheet(exam_id).await?;
    let answers = rows
        .into_iter()
        .map(|row| {
            let slot = sheet.find(row.exam_question)?;
            ExamAnswer::new(
                row.student,
                exam_id,
                slot.question_id,
                slot.topic_id,
                slot.answer_key.clone(),
                row.answer,
            )
        })
        .collect::<exam_core::Result<Vec<_>>>()?;

    let count = answers.len();
    store.record_answers(answers).await?;
    Ok(count)
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    exam: u32,
    answers: usize,
    score_percentage: f64,
    percentage_passed: f64,
    criteria: PassCriteria,
    students: std::collections::BTreeMap<String, bool>,
}

async fn score_exam<S>(store: &S, config: &EngineConfig, exam_id: u32) -> Result<ScoreReport>
where
    S: ExamLedger,
{
    let sheet = store.sheet(exam_id).await?;
    let topics: BTreeSet<u32> = sheet.questions.iter().map(|eq| eq.topic_id).collect();
    let criteria = PassCriteria::new(topics.len(), config.thresholds);

    let scores = ExamScores::new().add_all(store.answers_for_exam(exam_id).await?);
    Ok(ScoreReport {
        exam: exam_id,
        answers: scores.len(),
        score_percentage: scores.score_percentage(),
        percentage_passed: scores.percentage_passed(&criteria),
        criteria,
        students: scores.verdicts(&criteria),
    })
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
}

#[derive(Serialize)]
struct SheetRow<'a> {
    exam_question: u32,
    number: usize,
    topic: u32,
    question: u32,
    answer_key: &'a str,
    text: &'a str,
}

impl Output {
    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn line<T: Serialize + ?Sized>(&self, value: &T, text: String) -> Result<()> {
        if self.json {
            return self.print_json(value);
        }
        println!("{}", text);
        Ok(())
    }

    fn sheet(&self, exam: &Exam, sheet: &ExamSheet, questions: &[Question]) -> Result<()> {
        let index = index_by_id(questions);
        let rows: Vec<SheetRow> = sheet
            .questions
            .iter()
            .map(|eq| SheetRow {
                exam_question: eq.id,
                number: eq.question_index + 1,
                topic: eq.topic_id,
                question: eq.question_id,
                answer_key: &eq.answer_key,
                text: index.get(&eq.question_id).map_or("", |q| q.text.as_str()),
            })
            .collect();

        if self.json {
            return self.print_json(&serde_json::json!({ "exam": exam, "questions": rows }));
        }

        println!(
            "Exam {}: {} ({}, {}, {} questions)",
            exam.id,
            exam.label,
            exam.certificate,
            exam.language,
            rows.len()
        );
        println!("Created: {}", exam.created_at.format("%Y-%m-%d %H:%M"));
        println!();
        for row in rows {
            println!(
                "{:>3}. [{}] topic {:<3} question {:<6} key {:<3} {}",
                row.number,
                row.exam_question,
                row.topic,
                row.question,
                row.answer_key,
                summary(row.text)
            );
        }
        Ok(())
    }

    fn questions(&self, questions: &[&Question]) -> Result<()> {
        if self.json {
            return self.print_json(questions);
        }
        for q in questions {
            println!(
                "question {:<6} topic {:<3} requirement {:<5} {}",
                q.id,
                q.topic,
                q.requirement,
                summary(&q.text)
            );
        }
        Ok(())
    }

    fn exams(&self, exams: &[Exam]) -> Result<()> {
        if self.json {
            return self.print_json(exams);
        }
        for exam in exams {
            println!(
                "{:<6} {:<24} {} {} {}",
                exam.id,
                exam.label,
                exam.certificate,
                exam.language,
                exam.created_at.format("%Y-%m-%d")
            );
        }
        Ok(())
    }

    fn score(&self, report: &ScoreReport) -> Result<()> {
        if self.json {
            return self.print_json(report);
        }
        println!("Exam {}: {} answers", report.exam, report.answers);
        println!("Score:  {:.1}%", report.score_percentage);
        println!(
            "Passed: {:.1}% (per topic >= {}%, overall >= {}%)",
            report.percentage_passed,
            report.criteria.threshold_per_topic,
            report.criteria.threshold_overall
        );
        for (student, passed) in &report.students {
            println!("  {:<20} {}", student, if *passed { "pass" } else { "fail" });
        }
        Ok(())
    }
}

/// First line of a question text, cut to 60 characters.
fn summary(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() <= 60 {
        return line.to_string();
    }
    let cut: String = line.chars().take(57).collect();
    format!("{cut}...")
}
