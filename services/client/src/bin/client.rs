//! services/client/src/bin/client.rs
//!
//! The interactive terminal entry point: wires configuration, logging, the
//! HTTP backend adapter, and the application context together, then runs a
//! chat loop over one workspace.

use client_lib::{
    adapters::HttpBackend,
    config::Config,
    context::{AppContext, Services},
    error::ClientError,
    quiz_task::{FeedbackTiming, QuizRunner},
};
use std::sync::Arc;
use studymate_core::{
    classify::{ClassifiedMessage, ResponseKind},
    domain::{Question, Role},
    evaluation::{Presentation, ScoreTier},
    ports::PortError,
    quiz::{QuizPhase, Submission},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Backend: {}", config.api_base_url);

    // --- 2. Initialize the Backend Adapter ---
    let backend = Arc::new(HttpBackend::new(config.api_base_url.clone()));
    let services = Services {
        auth: backend.clone(),
        workspaces: backend.clone(),
        documents: backend.clone(),
        chat: backend.clone(),
    };

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    // --- 3. Log In (or Sign Up) ---
    let mut context = authenticate(&services, &mut input).await?;
    println!("Welcome, {}!", context.user().full_name);

    // --- 4. Open a Workspace ---
    open_workspace(&mut context, &mut input).await?;
    if let Some(workspace) = context.current_workspace() {
        println!("Workspace '{}' ({})", workspace.name, workspace.subject);
    }

    // --- 5. Chat Loop ---
    let mut chat = context.chat_view(config.history_limit)?;
    chat.load_history().await?;
    for message in chat.messages() {
        print_message(message);
    }
    println!("Type a message, or /help for commands.");

    loop {
        let line = prompt(&mut input, "> ").await?;
        match line.split_whitespace().next() {
            Some("/quit") | Some("/logout") => break,
            Some("/help") => print_help(),
            Some("/docs") => {
                for doc in context.list_documents().await? {
                    println!("  {} (#{})", doc.file_name, doc.id);
                }
            }
            Some("/upload") => {
                let path = line.trim_start_matches("/upload").trim();
                if path.is_empty() {
                    println!("usage: /upload <path>");
                } else {
                    upload(&context, path).await?;
                }
            }
            Some("/clear") => {
                chat.clear().await?;
                println!("History cleared.");
            }
            Some("/quiz") => match chat.latest_question_set() {
                Some(questions) => run_quiz(questions.to_vec(), &mut input).await?,
                None => println!("No quiz or flashcard set in this chat yet. Try 'Quiz me'."),
            },
            Some(word) if word.starts_with('/') => {
                println!("Unknown command '{word}'. Try /help.");
            }
            Some(_) => {
                if let Err(e) = chat.send(&line).await {
                    println!("Send failed: {e}");
                    continue;
                }
                if let Some(message) = chat.messages().last() {
                    print_message(message);
                }
                if chat.latest_question_set().is_some() {
                    println!("(type /quiz to start)");
                }
            }
            None => {}
        }
    }

    context.logout();
    Ok(())
}

//=========================================================================================
// Login and Workspace Selection
//=========================================================================================

async fn authenticate(services: &Services, input: &mut Input) -> Result<AppContext, ClientError> {
    let email = prompt(input, "Email: ").await?;
    let password = prompt(input, "Password: ").await?;

    match AppContext::login(services.clone(), &email, &password).await {
        Ok(context) => Ok(context),
        Err(PortError::Unauthorized) => {
            let answer = prompt(input, "Login failed. Create an account? [y/N] ").await?;
            if !answer.eq_ignore_ascii_case("y") {
                return Err(PortError::Unauthorized.into());
            }
            let full_name = prompt(input, "Full name: ").await?;
            services.auth.signup(&email, &password, &full_name).await?;
            Ok(AppContext::login(services.clone(), &email, &password).await?)
        }
        Err(e) => Err(e.into()),
    }
}

async fn open_workspace(context: &mut AppContext, input: &mut Input) -> Result<(), ClientError> {
    let workspaces = context.list_workspaces().await?;
    if workspaces.is_empty() {
        println!("No workspaces yet; let's create one.");
    } else {
        println!("Your workspaces:");
        for workspace in &workspaces {
            println!("  #{} {} ({})", workspace.id, workspace.name, workspace.subject);
        }
    }

    loop {
        let choice = prompt(input, "Open workspace id, or 'new': ").await?;
        if choice.eq_ignore_ascii_case("new") {
            let name = prompt(input, "Name: ").await?;
            let subject = prompt(input, "Subject: ").await?;
            context.create_workspace(&name, &subject).await?;
            return Ok(());
        }
        match choice.parse::<i64>() {
            Ok(id) => match context.open_workspace(id).await {
                Ok(_) => return Ok(()),
                Err(PortError::NotFound(_)) => println!("No workspace with id {id}."),
                Err(e) => return Err(e.into()),
            },
            Err(_) => println!("Enter a numeric id or 'new'."),
        }
    }
}

async fn upload(context: &AppContext, path: &str) -> Result<(), ClientError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.txt");
    let doc = context.upload_document(file_name, bytes).await?;
    println!("Uploaded '{}' (#{}).", doc.file_name, doc.id);
    Ok(())
}

//=========================================================================================
// Rendering
//=========================================================================================

fn print_help() {
    println!("  /quiz          start the latest generated quiz or flashcard set");
    println!("  /upload <path> upload a document into this workspace");
    println!("  /docs          list uploaded documents");
    println!("  /clear         clear the chat history");
    println!("  /quit          log out and exit");
}

fn print_message(message: &ClassifiedMessage) {
    let who = match message.message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    match &message.kind {
        ResponseKind::Evaluation(result) => {
            println!("[{who}] Evaluation result:");
            print_evaluation(result);
        }
        _ => println!("[{who}] {}", message.display_content),
    }
}

fn tier_marker(tier: ScoreTier) -> &'static str {
    match tier {
        ScoreTier::Good => "✅",
        ScoreTier::Partial => "🟡",
        ScoreTier::Poor => "❌",
    }
}

fn print_evaluation(result: &studymate_core::domain::EvaluationResult) {
    if result.presentation() == Presentation::Batch {
        println!(
            "  {} Overall: {:.0}% across {} answers",
            tier_marker(result.overall_tier()),
            result.overall_score() * 100.0,
            result.items().len(),
        );
    }
    for item in result.items() {
        println!(
            "  {} {:.0}% {}",
            tier_marker(item.tier()),
            item.score * 100.0,
            item.question,
        );
        if !item.feedback.is_empty() {
            println!("     {}", item.feedback);
        }
    }
}

//=========================================================================================
// Quiz Loop
//=========================================================================================

async fn run_quiz(questions: Vec<Question>, input: &mut Input) -> Result<(), ClientError> {
    let timing = FeedbackTiming::default();
    let runner = QuizRunner::new(questions, timing);
    let session_lock = runner.session();

    loop {
        loop {
            let (question, index, total) = {
                let session = session_lock.lock().await;
                if session.phase() == QuizPhase::Complete {
                    break;
                }
                let question = session
                    .current_question()
                    .cloned()
                    .ok_or_else(|| ClientError::Internal("no current question".to_string()))?;
                (question, session.current_index(), session.questions().len())
            };

            println!("\nQuestion {} of {}: {}", index + 1, total, question.prompt());
            for (i, option) in question.options().iter().enumerate() {
                println!("  {}. {}", i + 1, option);
            }

            let answer = prompt(input, "answer> ").await?;
            if question.is_multiple_choice() {
                // Accept either the option number or the option text.
                let answer = answer
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| question.options().get(i).cloned())
                    .unwrap_or(answer);

                match runner.submit(&answer).await {
                    Submission::Feedback { correct: true, hold } => {
                        println!("Correct!");
                        tokio::time::sleep(timing.duration_for(hold)).await;
                    }
                    Submission::Feedback { correct: false, hold } => {
                        if let Some(expected) = question.correct_answer() {
                            println!("Not quite. Correct answer: {expected}");
                        }
                        tokio::time::sleep(timing.duration_for(hold)).await;
                    }
                    _ => {}
                }
                // Give the scheduled advance a moment to land.
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            } else {
                runner.continue_free_text(&answer).await;
            }
        }

        {
            let session = session_lock.lock().await;
            println!(
                "\nQuiz complete! {}/{} ({}%)",
                session.score(),
                session.questions().len(),
                session.percentage(),
            );
            for (i, item) in session.review().iter().enumerate() {
                let marker = match item.verdict {
                    Some(true) => "✅",
                    Some(false) => "❌",
                    None => "📝",
                };
                println!("  {} Q{}: {}", marker, i + 1, item.question.prompt());
                println!("     your answer: {}", item.user_answer);
                if item.verdict == Some(false) {
                    if let Some(expected) = item.correct_answer {
                        println!("     correct answer: {expected}");
                    }
                }
            }
        }

        let again = prompt(input, "Restart this quiz? [y/N] ").await?;
        if !again.eq_ignore_ascii_case("y") {
            return Ok(());
        }
        runner.restart().await;
    }
}

//=========================================================================================
// Terminal Helpers
//=========================================================================================

async fn prompt(input: &mut Input, label: &str) -> Result<String, ClientError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;
    let line = input
        .next_line()
        .await?
        .ok_or_else(|| ClientError::Internal("stdin closed".to_string()))?;
    Ok(line.trim().to_string())
}
